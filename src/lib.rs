//! dlsort - sort a Downloads folder into category subdirectories
//!
//! This library classifies the immediate entries of a directory by file
//! extension, moves them into one subdirectory per category, and resolves
//! name collisions by appending a `(N)` marker to the stem.

pub mod cli;
pub mod file_category;
pub mod file_organizer;
pub mod output;

pub use cli::{Cli, CliError, Confirm, OrganizeCommand, RunOutcome, StdinConfirm, run_cli};
pub use file_category::{Category, CategoryTable};
pub use file_organizer::{MoveFailure, MoveOutcome, OrganizeError, Organizer, Summary};
