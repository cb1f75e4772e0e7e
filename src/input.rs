//! Interactive input collection.
//!
//! Lists the working directory and asks the user three questions (extension,
//! folder mode, folder name). Every answer is validated as soon as it is read
//! and the first invalid one ends the run; nothing is retried.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Errors raised while collecting the run configuration.
#[derive(Debug)]
pub enum InputError {
    /// The working directory could not be listed.
    DirectoryUnreadable { path: PathBuf, source: io::Error },
    /// The extension does not start with a dot.
    InvalidExtension(String),
    /// The folder mode answer was neither "1" nor "2".
    InvalidChoice(String),
    /// The folder name was blank.
    EmptyFolderName,
    /// Standard input closed before an answer was given.
    EndOfInput,
    /// Reading an answer or writing a prompt failed.
    Io(io::Error),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DirectoryUnreadable { path, source } => {
                write!(f, "Cannot read directory {}: {}", path.display(), source)
            }
            Self::InvalidExtension(raw) => {
                write!(f, "Extension must start with '.' (got '{}')", raw)
            }
            Self::InvalidChoice(raw) => {
                write!(f, "Invalid choice '{}'. Please enter 1 or 2.", raw)
            }
            Self::EmptyFolderName => write!(f, "Folder name cannot be empty."),
            Self::EndOfInput => write!(f, "Input ended before all answers were given."),
            Self::Io(e) => write!(f, "Failed to read input: {}", e),
        }
    }
}

impl std::error::Error for InputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DirectoryUnreadable { source, .. } => Some(source),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for InputError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// A validated file extension such as `.pdf`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension(String);

impl Extension {
    /// Trims the raw answer and checks that it starts with a dot.
    ///
    /// ```
    /// use extarrange::input::Extension;
    ///
    /// assert_eq!(Extension::parse("  .jpg ").unwrap().as_str(), ".jpg");
    /// assert!(Extension::parse("jpg").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, InputError> {
        let trimmed = raw.trim();
        if !trimmed.starts_with('.') {
            return Err(InputError::InvalidExtension(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-sensitive, byte-exact suffix test against an entry name.
    ///
    /// Works on the raw name so entries that are not valid UTF-8 still match.
    pub fn matches(&self, name: &OsStr) -> bool {
        name.as_encoded_bytes().ends_with(self.0.as_bytes())
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How the user wants the destination folder handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderMode {
    /// Menu option 1.
    UseExisting,
    /// Menu option 2.
    CreateNew,
}

impl FolderMode {
    /// Accepts exactly `1` or `2` after trimming.
    pub fn parse(raw: &str) -> Result<Self, InputError> {
        match raw.trim() {
            "1" => Ok(Self::UseExisting),
            "2" => Ok(Self::CreateNew),
            other => Err(InputError::InvalidChoice(other.to_string())),
        }
    }
}

/// A non-blank destination folder name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderName(String);

impl FolderName {
    pub fn parse(raw: &str) -> Result<Self, InputError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(InputError::EmptyFolderName);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FolderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fully validated answers for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrangeConfig {
    pub extension: Extension,
    pub mode: FolderMode,
    pub folder_name: FolderName,
}

/// Lists the immediate entries of `dir`, files and folders alike.
pub fn list_entries(dir: &Path) -> Result<Vec<OsString>, InputError> {
    let read_dir = fs::read_dir(dir).map_err(|e| InputError::DirectoryUnreadable {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut names = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|e| InputError::DirectoryUnreadable {
            path: dir.to_path_buf(),
            source: e,
        })?;
        names.push(entry.file_name());
    }

    debug!("Listed {} entries in {}", names.len(), dir.display());
    Ok(names)
}

/// Asks questions on `output` and reads one line per answer from `input`.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Prints `prompt` and returns the next line without its line ending.
    fn ask(&mut self, prompt: &str) -> Result<String, InputError> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(InputError::EndOfInput);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    pub fn ask_extension(&mut self) -> Result<Extension, InputError> {
        let raw = self.ask("Enter file extension (e.g. .jpg, .pdf): ")?;
        Extension::parse(&raw)
    }

    pub fn ask_folder_mode(&mut self) -> Result<FolderMode, InputError> {
        writeln!(self.output)?;
        writeln!(self.output, "Choose folder option:")?;
        writeln!(self.output, "1. Use an existing folder")?;
        writeln!(self.output, "2. Create a new folder")?;
        writeln!(self.output)?;
        let raw = self.ask("Enter 1 or 2: ")?;
        writeln!(self.output)?;
        FolderMode::parse(&raw)
    }

    pub fn ask_folder_name(&mut self) -> Result<FolderName, InputError> {
        let raw = self.ask("Enter folder name: ")?;
        writeln!(self.output)?;
        FolderName::parse(&raw)
    }

    /// Runs the three prompts in order, stopping at the first invalid answer.
    pub fn collect(&mut self) -> Result<ArrangeConfig, InputError> {
        let extension = self.ask_extension()?;
        let mode = self.ask_folder_mode()?;
        let folder_name = self.ask_folder_name()?;

        debug!(
            "Collected extension={} mode={:?} folder={}",
            extension, mode, folder_name
        );
        Ok(ArrangeConfig {
            extension,
            mode,
            folder_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn prompter(answers: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(answers.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_extension_is_trimmed() {
        let ext = Extension::parse("  .txt\t").unwrap();
        assert_eq!(ext.as_str(), ".txt");
    }

    #[test]
    fn test_extension_without_dot_rejected() {
        assert!(matches!(
            Extension::parse("txt"),
            Err(InputError::InvalidExtension(_))
        ));
        assert!(matches!(
            Extension::parse("   "),
            Err(InputError::InvalidExtension(_))
        ));
    }

    #[test]
    fn test_extension_match_is_case_sensitive() {
        let ext = Extension::parse(".txt").unwrap();
        assert!(ext.matches(OsStr::new("a.txt")));
        assert!(!ext.matches(OsStr::new("b.TXT")));
        assert!(!ext.matches(OsStr::new("c.txt.bak")));
    }

    #[test]
    fn test_folder_mode_choices() {
        assert_eq!(FolderMode::parse(" 1 ").unwrap(), FolderMode::UseExisting);
        assert_eq!(FolderMode::parse("2").unwrap(), FolderMode::CreateNew);
        assert!(matches!(
            FolderMode::parse("3"),
            Err(InputError::InvalidChoice(_))
        ));
        assert!(matches!(
            FolderMode::parse("12"),
            Err(InputError::InvalidChoice(_))
        ));
    }

    #[test]
    fn test_blank_folder_name_rejected() {
        assert!(matches!(
            FolderName::parse("  \t "),
            Err(InputError::EmptyFolderName)
        ));
        assert_eq!(FolderName::parse(" docs ").unwrap().as_str(), "docs");
    }

    #[test]
    fn test_collect_reads_answers_in_order() {
        let mut p = prompter(".pdf\n2\nreports\n");
        let config = p.collect().unwrap();

        assert_eq!(config.extension.as_str(), ".pdf");
        assert_eq!(config.mode, FolderMode::CreateNew);
        assert_eq!(config.folder_name.as_str(), "reports");

        let shown = String::from_utf8(p.output).unwrap();
        let ext_at = shown.find("Enter file extension").unwrap();
        let mode_at = shown.find("Enter 1 or 2").unwrap();
        let name_at = shown.find("Enter folder name").unwrap();
        assert!(ext_at < mode_at && mode_at < name_at);
    }

    #[test]
    fn test_collect_handles_crlf() {
        let mut p = prompter(".jpg\r\n1\r\nphotos\r\n");
        let config = p.collect().unwrap();
        assert_eq!(config.extension.as_str(), ".jpg");
        assert_eq!(config.folder_name.as_str(), "photos");
    }

    #[test]
    fn test_collect_stops_at_first_invalid_answer() {
        let mut p = prompter("jpg\n1\nphotos\n");
        assert!(matches!(p.collect(), Err(InputError::InvalidExtension(_))));

        let shown = String::from_utf8(p.output).unwrap();
        assert!(!shown.contains("Enter 1 or 2"));
    }

    #[test]
    fn test_collect_reports_end_of_input() {
        let mut p = prompter(".jpg\n");
        assert!(matches!(p.collect(), Err(InputError::EndOfInput)));
    }

    #[test]
    fn test_list_entries_includes_files_and_dirs() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp_dir.path().join("a.txt"), "a").unwrap();
        fs::create_dir(temp_dir.path().join("sub")).unwrap();

        let mut names = list_entries(temp_dir.path()).unwrap();
        names.sort();
        assert_eq!(names, vec![OsString::from("a.txt"), OsString::from("sub")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_extension_matches_non_utf8_name() {
        use std::os::unix::ffi::OsStrExt;

        let ext = Extension::parse(".txt").unwrap();
        assert!(ext.matches(OsStr::from_bytes(b"caf\xe9.txt")));
        assert!(!ext.matches(OsStr::from_bytes(b"caf\xe9.TXT")));
    }

    #[cfg(unix)]
    #[test]
    fn test_list_entries_keeps_non_utf8_names() {
        use std::os::unix::ffi::OsStrExt;

        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let raw = OsStr::from_bytes(b"caf\xe9.txt");
        fs::write(temp_dir.path().join(raw), "x").unwrap();

        let names = list_entries(temp_dir.path()).unwrap();
        assert_eq!(names, vec![raw.to_os_string()]);
    }

    #[test]
    fn test_list_entries_missing_directory() {
        let result = list_entries(Path::new("/non/existent/path"));
        assert!(matches!(
            result,
            Err(InputError::DirectoryUnreadable { .. })
        ));
    }
}
