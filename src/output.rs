//! Output formatting and styling module.
//!
//! Every line the user sees goes through [`OutputFormatter`], so colors and
//! layout can be changed in one place. Diagnostics go through `tracing`
//! instead and end up on stderr.

use crate::file_organizer::{PlannedMove, Summary};
use colored::*;
use std::path::Path;

const RULE_WIDTH: usize = 50;

/// Manages all CLI output with consistent styling and formatting.
///
/// This struct provides methods for:
/// - Error messages (red with ✗)
/// - Warning messages (yellow with ⚠)
/// - Info messages (cyan)
/// - The end-of-run summary block
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to display
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dlsort::output::OutputFormatter;
    /// OutputFormatter::success("Organization complete!");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to display
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dlsort::output::OutputFormatter;
    /// OutputFormatter::error("Error moving report.pdf: permission denied");
    /// ```
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to display
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dlsort::output::OutputFormatter;
    /// OutputFormatter::warning("2 files could not be moved.");
    /// ```
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to display
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a regular message without styling.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to display
    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a bold title framed by horizontal rules.
    ///
    /// # Arguments
    ///
    /// * `title` - The text between the rules
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dlsort::output::OutputFormatter;
    /// OutputFormatter::banner("FILE ORGANIZATION COMPLETE");
    /// ```
    pub fn banner(title: &str) {
        let rule = "=".repeat(RULE_WIDTH);
        println!("\n{}", rule);
        println!("{}", title.bold());
        println!("{}", rule);
    }

    /// Prints the intro shown before the confirmation prompt.
    pub fn intro() {
        Self::info("Starting Downloads folder organization...");
        Self::plain("This will organize files into categorized folders.");
        Self::plain("Original files will be moved, not copied.\n");
    }

    /// Prints the end-of-run summary.
    ///
    /// Only categories that received at least one file are listed, in
    /// category table order. A warning with the failure count follows when any
    /// move failed.
    ///
    /// # Arguments
    ///
    /// * `summary` - The counts and failures of a finished run
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dlsort::file_category::CategoryTable;
    /// use dlsort::file_organizer::Summary;
    /// use dlsort::output::OutputFormatter;
    /// use std::path::Path;
    ///
    /// let table = CategoryTable::default();
    /// let mut summary = Summary::new(Path::new("/home/me/Downloads"), &table);
    /// summary.record("Documents");
    /// OutputFormatter::summary(&summary);
    /// ```
    pub fn summary(summary: &Summary) {
        Self::banner("FILE ORGANIZATION COMPLETE");
        Self::counts(summary);
        println!(
            "\nTotal files organized: {}",
            summary.total().to_string().green().bold()
        );
        Self::source_line(&summary.source_dir);

        let failed = summary.failures.len();
        if failed > 0 {
            Self::warning(&format!(
                "{} {} could not be moved. Please review errors above.",
                failed,
                if failed == 1 { "file" } else { "files" }
            ));
        }
    }

    /// Prints what a dry run would do, followed by the would-be counts.
    ///
    /// Each planned move is printed as `<name> -> <Category>/<destination>`.
    ///
    /// # Arguments
    ///
    /// * `moves` - The planned moves, in listing order
    /// * `summary` - Counts built from `moves`
    pub fn dry_run_plan(moves: &[PlannedMove], summary: &Summary) {
        if moves.is_empty() {
            Self::dry_run_notice("No files found to organize.");
            return;
        }

        Self::dry_run_notice("Files would be organized as follows:");
        for planned in moves {
            println!(" - {}", Self::plan_line(planned));
        }

        Self::banner("DRY RUN SUMMARY");
        Self::counts(summary);
        println!("\nTotal files: {}", summary.total().to_string().green().bold());
        Self::source_line(&summary.source_dir);
        Self::success("Dry run complete. No files were modified.");
    }

    /// Formats one planned move as `<name> -> <Category>/<destination>`.
    ///
    /// # Example
    ///
    /// ```
    /// use dlsort::file_organizer::PlannedMove;
    /// use dlsort::output::OutputFormatter;
    /// use std::path::PathBuf;
    ///
    /// let planned = PlannedMove {
    ///     source: PathBuf::from("/dl/notes.txt"),
    ///     category: "Documents".to_string(),
    ///     destination: PathBuf::from("/dl/Documents/notes(1).txt"),
    /// };
    /// assert_eq!(
    ///     OutputFormatter::plan_line(&planned),
    ///     "notes.txt -> Documents/notes(1).txt"
    /// );
    /// ```
    pub fn plan_line(planned: &PlannedMove) -> String {
        format!(
            "{} -> {}/{}",
            file_name_lossy(&planned.source),
            planned.category,
            file_name_lossy(&planned.destination)
        )
    }

    /// Prints a dry-run notice message.
    ///
    /// # Arguments
    ///
    /// * `message` - The dry-run message
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    fn counts(summary: &Summary) {
        for (category, count) in summary.non_zero() {
            println!("{}: {} file(s)", category, count.to_string().green());
        }
    }

    fn source_line(source_dir: &Path) {
        println!("Source: {}", source_dir.display());
    }
}

fn file_name_lossy(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}
