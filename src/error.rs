use std::path::PathBuf;
use thiserror::Error;

use crate::source::Origin;
use crate::validate::ValidationReport;

#[derive(Debug, Error)]
pub enum FieldfigError {
    #[error("Invalid default for '{field}': {value:?} ({reason})")]
    InvalidDefault {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid validation rule '{rule}' on '{field}': {reason}")]
    InvalidRule {
        field: String,
        rule: String,
        reason: String,
    },

    #[error("duplicate flag: --{0}")]
    DuplicateFlag(String),

    #[error("Program name is required, call .program_name() on the builder")]
    ProgramNameRequired,

    #[error("{0}")]
    Cli(#[from] clap::Error),

    #[error("Failed to parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to read {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid value {value:?} for --{flag} from {origin}: {reason}")]
    InvalidValue {
        flag: String,
        origin: Origin,
        value: String,
        reason: String,
    },

    #[error("{0}")]
    Validation(ValidationReport),

    /// Help or version output was requested. Carries the rendered text.
    #[error("{0}")]
    HelpRequested(String),

    #[error("Key '{key}' is both a value and a section")]
    KeyConflict { key: String },
}

impl FieldfigError {
    pub fn is_help_requested(&self) -> bool {
        matches!(self, FieldfigError::HelpRequested(_))
    }
}
