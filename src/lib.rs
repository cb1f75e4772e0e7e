//! extarrange - move files of one extension into a single folder
//!
//! This library lists a directory, collects a validated configuration
//! interactively, and moves every matching file into the chosen folder
//! without ever overwriting an existing entry.

pub mod arranger;
pub mod cli;
pub mod config;
pub mod input;
pub mod output;

pub use arranger::{
    ArrangeError, ArrangeObserver, ArrangeReport, Arranger, FolderStatus, MoveErrorKind,
    MoveOutcome, NoopObserver,
};
pub use config::{ConfigError, Settings};
pub use input::{ArrangeConfig, Extension, FolderMode, FolderName, InputError, Prompter};

pub use cli::{CliError, run_cli};
