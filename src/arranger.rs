/// Moves files with a given extension into a single destination folder.
///
/// The arranger filters a directory listing down to candidate files, makes
/// sure the destination folder exists and then moves every candidate on its
/// own. A failure on one file is recorded and the loop carries on; only
/// folder setup can abort a run.
use crate::input::{Extension, FolderMode, FolderName};
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Why a single file could not be moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveErrorKind {
    PermissionDenied,
    /// The source disappeared before it could be moved.
    NotFound,
    Other,
}

/// Result of processing one candidate file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The file now lives in the destination folder.
    Moved,
    /// The destination already had an entry with this name; nothing was touched.
    SkippedExists,
    /// The move failed with the given kind and message.
    Error(MoveErrorKind, String),
}

impl MoveOutcome {
    /// Maps an I/O failure from the move onto an outcome.
    pub fn from_io_error(error: &io::Error) -> Self {
        let kind = match error.kind() {
            io::ErrorKind::PermissionDenied => MoveErrorKind::PermissionDenied,
            io::ErrorKind::NotFound => MoveErrorKind::NotFound,
            _ => MoveErrorKind::Other,
        };
        Self::Error(kind, error.to_string())
    }
}

/// State of the destination folder once it is ready to receive files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderStatus {
    Created,
    Reused,
}

/// A candidate file paired with what happened to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub name: OsString,
    pub outcome: MoveOutcome,
}

/// Everything a run did, in processing order.
#[derive(Debug, Clone)]
pub struct ArrangeReport {
    pub folder: FolderName,
    /// `None` when no candidate matched and the folder was left alone.
    pub folder_status: Option<FolderStatus>,
    pub outcomes: Vec<FileOutcome>,
}

impl ArrangeReport {
    fn new(folder: FolderName) -> Self {
        Self {
            folder,
            folder_status: None,
            outcomes: Vec::new(),
        }
    }

    pub fn candidate_count(&self) -> usize {
        self.outcomes.len()
    }

    pub fn moved_count(&self) -> usize {
        self.count(|o| matches!(o, MoveOutcome::Moved))
    }

    pub fn skipped_count(&self) -> usize {
        self.count(|o| matches!(o, MoveOutcome::SkippedExists))
    }

    pub fn error_count(&self) -> usize {
        self.count(|o| matches!(o, MoveOutcome::Error(..)))
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    fn count(&self, pred: impl Fn(&MoveOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|f| pred(&f.outcome)).count()
    }
}

/// Errors that abort a whole run before any file is moved.
#[derive(Debug)]
pub enum ArrangeError {
    /// The destination folder was absent and could not be created.
    FolderCreationFailed { path: PathBuf, source: io::Error },
    /// Looking up the destination folder failed for a reason other than
    /// it being absent.
    FolderInaccessible { path: PathBuf, source: io::Error },
    /// "Use an existing folder" was chosen, the folder is absent and the
    /// settings forbid creating it.
    FolderMissing { path: PathBuf },
    /// Something other than a directory occupies the destination path.
    NotADirectory { path: PathBuf },
}

impl std::fmt::Display for ArrangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FolderCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create folder {}: {}",
                    path.display(),
                    source
                )
            }
            Self::FolderInaccessible { path, source } => {
                write!(f, "Cannot access folder {}: {}", path.display(), source)
            }
            Self::FolderMissing { path } => {
                write!(f, "Folder {} does not exist", path.display())
            }
            Self::NotADirectory { path } => {
                write!(f, "{} exists but is not a folder", path.display())
            }
        }
    }
}

impl std::error::Error for ArrangeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::FolderCreationFailed { source, .. } => Some(source),
            Self::FolderInaccessible { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Result type for arranging operations.
pub type ArrangeResult<T> = Result<T, ArrangeError>;

/// Receives progress notifications while a run is under way.
///
/// Every method has an empty default so implementors only override what
/// they display.
pub trait ArrangeObserver {
    fn no_matches(&mut self, _extension: &Extension) {}
    fn folder_ready(&mut self, _folder: &FolderName, _status: FolderStatus) {}
    fn started(&mut self, _candidates: &[OsString]) {}
    fn file_processed(&mut self, _name: &OsStr, _outcome: &MoveOutcome) {}
    fn finished(&mut self, _report: &ArrangeReport) {}
}

/// Observer that ignores every notification.
pub struct NoopObserver;

impl ArrangeObserver for NoopObserver {}

/// Moves candidate files from `base_dir` into `base_dir/<folder>`.
pub struct Arranger {
    base_dir: PathBuf,
    folder: FolderName,
    mode: FolderMode,
    require_existing: bool,
}

impl Arranger {
    /// Creates an arranger that treats both folder modes as
    /// "create if absent, otherwise reuse".
    pub fn new(base_dir: impl Into<PathBuf>, folder: FolderName, mode: FolderMode) -> Self {
        Self {
            base_dir: base_dir.into(),
            folder,
            mode,
            require_existing: false,
        }
    }

    /// When set, [`FolderMode::UseExisting`] refuses to create a missing folder.
    pub fn require_existing(mut self, require: bool) -> Self {
        self.require_existing = require;
        self
    }

    /// Full path of the destination folder.
    pub fn folder_path(&self) -> PathBuf {
        self.base_dir.join(self.folder.as_str())
    }

    /// Returns the entries that are regular files ending in `extension`,
    /// keeping their listing order.
    ///
    /// ```no_run
    /// use extarrange::arranger::Arranger;
    /// use extarrange::input::{Extension, FolderMode, FolderName};
    /// use std::ffi::OsString;
    ///
    /// let arranger = Arranger::new(
    ///     ".",
    ///     FolderName::parse("texts").unwrap(),
    ///     FolderMode::CreateNew,
    /// );
    /// let entries: Vec<OsString> = vec!["a.txt".into(), "b.TXT".into()];
    /// let ext = Extension::parse(".txt").unwrap();
    /// println!("{:?}", arranger.candidates(&entries, &ext));
    /// ```
    pub fn candidates(&self, entries: &[OsString], extension: &Extension) -> Vec<OsString> {
        entries
            .iter()
            .filter(|name| extension.matches(name) && self.base_dir.join(name).is_file())
            .cloned()
            .collect()
    }

    /// Makes sure the destination folder exists, creating a single level if needed.
    pub fn ensure_folder(&self) -> ArrangeResult<FolderStatus> {
        let path = self.folder_path();

        match fs::metadata(&path) {
            Ok(meta) if meta.is_dir() => Ok(FolderStatus::Reused),
            Ok(_) => Err(ArrangeError::NotADirectory { path }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                if self.require_existing && self.mode == FolderMode::UseExisting {
                    return Err(ArrangeError::FolderMissing { path });
                }
                fs::create_dir(&path)
                    .map_err(|e| ArrangeError::FolderCreationFailed {
                        path: path.clone(),
                        source: e,
                    })?;
                debug!("Created folder {}", path.display());
                Ok(FolderStatus::Created)
            }
            Err(e) => Err(ArrangeError::FolderInaccessible { path, source: e }),
        }
    }

    /// Moves one file into the destination folder under its own name.
    ///
    /// Never overwrites: an existing entry at the destination yields
    /// [`MoveOutcome::SkippedExists`]. The file is hard-linked into place and
    /// then unlinked from the source, so an entry that shows up at the
    /// destination mid-move makes the link fail instead of being replaced.
    /// Where hard links are unavailable it falls back to `rename_if_absent`.
    pub fn move_file(&self, name: &OsStr) -> MoveOutcome {
        let source = self.base_dir.join(name);
        let destination = self.folder_path().join(name);

        match fs::hard_link(&source, &destination) {
            Ok(()) => unlink_source(&source, &destination),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => MoveOutcome::SkippedExists,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Move of {} failed: {}", source.display(), e);
                MoveOutcome::from_io_error(&e)
            }
            Err(e) => {
                debug!(
                    "Hard link of {} failed ({}), falling back to rename",
                    source.display(),
                    e
                );
                rename_if_absent(&source, &destination)
            }
        }
    }

    /// Runs a full pass: filter, prepare the folder, move every candidate.
    ///
    /// # Errors
    ///
    /// Only folder setup is fatal. Per-file failures end up in the report.
    pub fn arrange(
        &self,
        entries: &[OsString],
        extension: &Extension,
        observer: &mut dyn ArrangeObserver,
    ) -> ArrangeResult<ArrangeReport> {
        let mut report = ArrangeReport::new(self.folder.clone());

        let candidates = self.candidates(entries, extension);
        if candidates.is_empty() {
            debug!("No candidates for {} among {} entries", extension, entries.len());
            observer.no_matches(extension);
            return Ok(report);
        }

        let status = self.ensure_folder()?;
        report.folder_status = Some(status);
        observer.folder_ready(&self.folder, status);

        observer.started(&candidates);
        for name in candidates {
            let outcome = self.move_file(&name);
            observer.file_processed(&name, &outcome);
            report.outcomes.push(FileOutcome { name, outcome });
        }

        observer.finished(&report);
        Ok(report)
    }
}

/// Second half of a link-based move. If the source cannot be removed the new
/// link is dropped again so the file is never left in both places.
fn unlink_source(source: &Path, destination: &Path) -> MoveOutcome {
    match fs::remove_file(source) {
        Ok(()) => {
            debug!("Moved {} to {}", source.display(), destination.display());
            MoveOutcome::Moved
        }
        Err(e) => {
            debug!("Removing {} after linking failed: {}", source.display(), e);
            if let Err(undo) = fs::remove_file(destination) {
                debug!("Could not remove link {}: {}", destination.display(), undo);
            }
            MoveOutcome::from_io_error(&e)
        }
    }
}

/// Existence check followed by `fs::rename`, for filesystems without hard
/// links. An entry created between the two calls would be replaced.
fn rename_if_absent(source: &Path, destination: &Path) -> MoveOutcome {
    match entry_exists(destination) {
        Ok(true) => return MoveOutcome::SkippedExists,
        Ok(false) => {}
        Err(e) => return MoveOutcome::from_io_error(&e),
    }

    match fs::rename(source, destination) {
        Ok(()) => {
            debug!("Moved {} to {}", source.display(), destination.display());
            MoveOutcome::Moved
        }
        Err(e) => {
            debug!("Move of {} failed: {}", source.display(), e);
            MoveOutcome::from_io_error(&e)
        }
    }
}

/// Like `Path::exists` but does not follow symlinks, so a dangling link
/// still counts as occupied.
fn entry_exists(path: &Path) -> io::Result<bool> {
    match fs::symlink_metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}
