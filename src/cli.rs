//! Command-line front end for extarrange.
//!
//! Ties the pieces together for one interactive run:
//! - Lists the working directory
//! - Collects and validates the three answers
//! - Runs the arranger and renders its progress on the console

use crate::arranger::{
    ArrangeError, ArrangeObserver, ArrangeReport, Arranger, FolderStatus, MoveErrorKind,
    MoveOutcome,
};
use crate::config::Settings;
use crate::input::{Extension, FolderName, InputError, Prompter, list_entries};
use crate::output::OutputFormatter;
use indicatif::ProgressBar;
use std::ffi::{OsStr, OsString};
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::debug;

/// Errors that end a run before or during folder setup.
#[derive(Debug)]
pub enum CliError {
    /// Listing or prompting failed, or an answer was invalid.
    Input(InputError),
    /// The destination folder could not be prepared.
    Arrange(ArrangeError),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Input(e) => write!(f, "{}", e),
            Self::Arrange(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Input(e) => Some(e),
            Self::Arrange(e) => Some(e),
        }
    }
}

impl From<InputError> for CliError {
    fn from(e: InputError) -> Self {
        Self::Input(e)
    }
}

impl From<ArrangeError> for CliError {
    fn from(e: ArrangeError) -> Self {
        Self::Arrange(e)
    }
}

/// Runs one interactive session against `base_dir`.
///
/// Prompts are written to `output` and answers read from `input`; result
/// lines go to the process stdout/stderr through [`OutputFormatter`].
///
/// # Examples
///
/// ```no_run
/// use extarrange::cli::run_cli;
/// use extarrange::config::Settings;
/// use std::io;
/// use std::path::Path;
///
/// let stdin = io::stdin();
/// match run_cli(Path::new("."), &Settings::default(), stdin.lock(), io::stdout()) {
///     Ok(report) => println!("{} moved", report.moved_count()),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli<R: BufRead, W: Write>(
    base_dir: &Path,
    settings: &Settings,
    input: R,
    output: W,
) -> Result<ArrangeReport, CliError> {
    // Listing happens before any question is asked.
    let entries = list_entries(base_dir)?;

    let config = Prompter::new(input, output).collect()?;

    let arranger = Arranger::new(base_dir, config.folder_name, config.mode)
        .require_existing(settings.folders.require_existing);
    let mut observer = ConsoleObserver::new(settings.output.progress);

    let report = arranger.arrange(&entries, &config.extension, &mut observer)?;
    debug!(
        "Run finished: {} moved, {} skipped, {} failed",
        report.moved_count(),
        report.skipped_count(),
        report.error_count()
    );
    Ok(report)
}

/// Renders arranger notifications on the terminal.
pub struct ConsoleObserver {
    show_progress: bool,
    bar: Option<ProgressBar>,
    folder: String,
}

impl ConsoleObserver {
    pub fn new(show_progress: bool) -> Self {
        Self {
            show_progress,
            bar: None,
            folder: String::new(),
        }
    }

    /// Prints without tearing the progress bar, if one is active.
    fn print(&self, f: impl FnOnce()) {
        match &self.bar {
            Some(bar) => bar.suspend(f),
            None => f(),
        }
    }
}

impl ArrangeObserver for ConsoleObserver {
    fn no_matches(&mut self, extension: &Extension) {
        OutputFormatter::info(&format!("No {} files found.", extension));
    }

    fn folder_ready(&mut self, folder: &FolderName, status: FolderStatus) {
        self.folder = folder.to_string();
        match status {
            FolderStatus::Created => {
                OutputFormatter::success(&format!("Folder '{}' created.", folder))
            }
            FolderStatus::Reused => {
                OutputFormatter::info(&format!("Using existing folder '{}'.", folder))
            }
        }
    }

    fn started(&mut self, candidates: &[OsString]) {
        if self.show_progress {
            self.bar = Some(OutputFormatter::create_progress_bar(
                candidates.len() as u64,
            ));
        }
    }

    fn file_processed(&mut self, name: &OsStr, outcome: &MoveOutcome) {
        let name = Path::new(name).display();
        match outcome {
            MoveOutcome::Moved => {}
            MoveOutcome::SkippedExists => self.print(|| {
                OutputFormatter::warning(&format!(
                    "{} already exists in '{}', skipped.",
                    name, self.folder
                ))
            }),
            MoveOutcome::Error(MoveErrorKind::PermissionDenied, _) => self.print(|| {
                OutputFormatter::error(&format!("Permission denied while moving: {}", name))
            }),
            MoveOutcome::Error(MoveErrorKind::NotFound, _) => {
                self.print(|| OutputFormatter::error(&format!("File not found: {}", name)))
            }
            MoveOutcome::Error(MoveErrorKind::Other, message) => self.print(|| {
                OutputFormatter::error(&format!("Error moving {}: {}", name, message))
            }),
        }

        if let Some(bar) = &self.bar {
            bar.set_message(name.to_string());
            bar.inc(1);
        }
    }

    fn finished(&mut self, report: &ArrangeReport) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }

        OutputFormatter::plain("");
        OutputFormatter::success(&format!(
            "{} file(s) moved to '{}'.",
            report.moved_count(),
            report.folder
        ));
        if report.has_errors() {
            let failed = report.error_count();
            OutputFormatter::warning(&format!(
                "{} {} could not be moved. Please review errors above.",
                failed,
                OutputFormatter::plural(failed)
            ));
        }
        OutputFormatter::plain("");
    }
}
