//! Command-line interface module for dlsort.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing
//! - The confirmation prompt
//! - Dispatching to a real run or a dry run

use crate::file_category::CategoryTable;
use crate::file_organizer::{OrganizeError, Organizer, PlannedMove, Summary};
use crate::output::OutputFormatter;
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Sort the files of your Downloads folder into category subdirectories.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "dlsort", version, about, long_about = None)]
pub struct Cli {
    /// Organize without asking for confirmation
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Show where files would go without creating or moving anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Enable verbose logging (debug level)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Returns the command selected by the parsed flags.
    ///
    /// `--dry-run` wins over `--yes`.
    ///
    /// # Example
    ///
    /// ```
    /// use clap::Parser;
    /// use dlsort::cli::{Cli, OrganizeCommand};
    ///
    /// let cli = Cli::parse_from(["dlsort", "--yes"]);
    /// assert_eq!(cli.command(), OrganizeCommand::Organize { assume_yes: true });
    /// ```
    pub fn command(&self) -> OrganizeCommand {
        if self.dry_run {
            OrganizeCommand::DryRun
        } else {
            OrganizeCommand::Organize {
                assume_yes: self.yes,
            }
        }
    }
}

/// Represents a CLI command to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrganizeCommand {
    /// Organize files in a directory, after confirmation unless `assume_yes`.
    Organize { assume_yes: bool },
    /// Report where files would go without touching anything.
    DryRun,
}

/// What a CLI invocation ended up doing.
#[derive(Debug)]
pub enum RunOutcome {
    /// Files were organized.
    Organized(Summary),
    /// A dry run was planned.
    Planned(Vec<PlannedMove>),
    /// The user declined the prompt; nothing was touched.
    Cancelled,
}

/// Errors that end a CLI invocation.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("could not determine the home directory")]
    NoHomeDirectory,
    #[error("failed to read confirmation: {0}")]
    Prompt(#[source] io::Error),
    #[error(transparent)]
    Organize(#[from] OrganizeError),
}

/// Asks the user whether to go ahead.
///
/// The organizing logic never reads stdin itself; callers hand in an
/// implementation.
///
/// # Example
///
/// ```
/// use dlsort::cli::Confirm;
/// use std::io;
///
/// struct Always(bool);
///
/// impl Confirm for Always {
///     fn confirm(&mut self, _prompt: &str) -> io::Result<bool> {
///         Ok(self.0)
///     }
/// }
///
/// assert!(Always(true).confirm("Proceed? ").unwrap());
/// ```
pub trait Confirm {
    /// Shows `prompt` and returns true only on an affirmative answer.
    fn confirm(&mut self, prompt: &str) -> io::Result<bool>;
}

/// Reads the answer from standard input.
#[derive(Debug, Default)]
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        let mut stdout = io::stdout();
        write!(stdout, "{}", prompt)?;
        stdout.flush()?;

        let mut response = String::new();
        io::stdin().lock().read_line(&mut response)?;
        Ok(is_affirmative(&response))
    }
}

/// True only for `y` or `Y`, ignoring the line terminator.
///
/// # Arguments
///
/// * `response` - The raw line read from the user, terminator included
///
/// # Example
///
/// ```
/// use dlsort::cli::is_affirmative;
///
/// assert!(is_affirmative("y\n"));
/// assert!(is_affirmative("Y\r\n"));
/// assert!(!is_affirmative("yes\n"));
/// ```
pub fn is_affirmative(response: &str) -> bool {
    response.trim_end_matches(['\r', '\n']).to_lowercase() == "y"
}

/// The fixed directory dlsort organizes: `~/Downloads`.
///
/// # Errors
///
/// Returns `CliError::NoHomeDirectory` if the home directory cannot be
/// determined.
pub fn downloads_dir() -> Result<PathBuf, CliError> {
    dirs::home_dir()
        .map(|home| home.join("Downloads"))
        .ok_or(CliError::NoHomeDirectory)
}

/// Runs the CLI application with the given command and directory path.
///
/// Uses the default category table. A real run prints the intro, asks
/// `confirm` unless `assume_yes` is set, organizes, and prints the summary.
/// A dry run prints the plan and never asks.
///
/// # Arguments
///
/// * `command` - The command to execute (Organize or DryRun)
/// * `dir_path` - The directory to organize
/// * `confirm` - Source of the answer to the confirmation prompt
///
/// # Returns
///
/// What the invocation did, or a `CliError` if the run could not start or
/// had to abort. Individual move failures are reported in the summary, not
/// as an error.
///
/// # Examples
///
/// ```no_run
/// use dlsort::cli::{run_cli, OrganizeCommand, StdinConfirm};
/// use std::path::Path;
///
/// let result = run_cli(
///     OrganizeCommand::Organize { assume_yes: false },
///     Path::new("/home/me/Downloads"),
///     &mut StdinConfirm,
/// );
/// if let Err(e) = result {
///     eprintln!("Error: {}", e);
/// }
/// ```
pub fn run_cli(
    command: OrganizeCommand,
    dir_path: &Path,
    confirm: &mut dyn Confirm,
) -> Result<RunOutcome, CliError> {
    run_cli_with_table(command, dir_path, CategoryTable::default(), confirm)
}

/// Runs the CLI application with a custom category table.
///
/// # Arguments
///
/// * `command` - The command to execute (Organize or DryRun)
/// * `dir_path` - The directory to organize
/// * `table` - The categories to sort into, in lookup order
/// * `confirm` - Source of the answer to the confirmation prompt
pub fn run_cli_with_table(
    command: OrganizeCommand,
    dir_path: &Path,
    table: CategoryTable,
    confirm: &mut dyn Confirm,
) -> Result<RunOutcome, CliError> {
    let organizer = Organizer::new(table);
    match command {
        OrganizeCommand::Organize { assume_yes } => {
            organize_directory(&organizer, dir_path, assume_yes, confirm)
        }
        OrganizeCommand::DryRun => organize_directory_dry_run(&organizer, dir_path),
    }
}

/// Prompts, then moves every eligible entry of `base_path` into its category.
///
/// # Arguments
///
/// * `organizer` - The organizer to run
/// * `base_path` - The directory to organize
/// * `assume_yes` - Skip the prompt
/// * `confirm` - Source of the answer when prompting
fn organize_directory(
    organizer: &Organizer,
    base_path: &Path,
    assume_yes: bool,
    confirm: &mut dyn Confirm,
) -> Result<RunOutcome, CliError> {
    OutputFormatter::intro();

    let proceed = assume_yes
        || confirm
            .confirm("Do you want to proceed? (y/n): ")
            .map_err(CliError::Prompt)?;
    if !proceed {
        info!("organization cancelled by user");
        OutputFormatter::plain("Operation cancelled.");
        return Ok(RunOutcome::Cancelled);
    }

    let summary = organizer.run(base_path)?;
    OutputFormatter::summary(&summary);
    OutputFormatter::plain("");
    OutputFormatter::success("Organization complete!");
    Ok(RunOutcome::Organized(summary))
}

/// Prints the moves a real run would make, without touching the filesystem.
fn organize_directory_dry_run(
    organizer: &Organizer,
    base_path: &Path,
) -> Result<RunOutcome, CliError> {
    OutputFormatter::dry_run_notice(&format!("Analyzing contents of: {}", base_path.display()));

    let moves = organizer.plan(base_path)?;
    let mut summary = Summary::new(base_path, organizer.table());
    for planned in &moves {
        summary.record(&planned.category);
    }

    OutputFormatter::dry_run_plan(&moves, &summary);
    Ok(RunOutcome::Planned(moves))
}
