//! Output formatting and styling module.
//!
//! All user-facing result lines go through [`OutputFormatter`] so colors and
//! symbols stay consistent. Diagnostics go through `tracing` instead.

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

/// Manages all CLI output with consistent styling and formatting.
///
/// - Success messages (green with ✓)
/// - Error messages (red with ✗, on stderr)
/// - Warning messages (yellow with ⚠)
/// - Info messages (cyan)
/// - Progress bars for the move loop
pub struct OutputFormatter;

impl OutputFormatter {
    /// Turns colors off for the rest of the process. Passing `true` keeps
    /// the environment-based detection (`NO_COLOR`, `CLICOLOR`).
    pub fn set_color(enabled: bool) {
        if !enabled {
            colored::control::set_override(false);
        }
    }

    /// Prints a success message in green with a checkmark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use extarrange::output::OutputFormatter;
    /// OutputFormatter::success("Folder 'docs' created.");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a regular message without styling.
    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Creates a progress bar for `total` file moves.
    ///
    /// The bar draws on stderr and hides itself when stderr is not a terminal.
    ///
    /// ```no_run
    /// use extarrange::output::OutputFormatter;
    /// let pb = OutputFormatter::create_progress_bar(3);
    /// pb.inc(1);
    /// pb.finish_and_clear();
    /// ```
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        pb.set_style(style);
        pb
    }

    /// `"file"` or `"files"` depending on `count`.
    pub fn plural(count: usize) -> &'static str {
        if count == 1 { "file" } else { "files" }
    }
}
