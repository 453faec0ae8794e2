/// Requirements parsing error types
use crate::statement::Visibility;
use std::path::PathBuf;
use thiserror::Error;

pub type ReqResult<T> = Result<T, ReqError>;

#[derive(Debug, Error)]
pub enum ReqError {
    #[error("Failed to read requirements file {}: {error}", .path.display())]
    Io {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("{}:{line}: unknown directive '{directive}'", .path.display())]
    UnknownDirective {
        path: PathBuf,
        line: usize,
        directive: String,
    },

    #[error("{}:{line}: '{directive}' is missing its {what}", .path.display())]
    MissingToken {
        path: PathBuf,
        line: usize,
        directive: String,
        what: &'static str,
    },

    #[error("{}:{line}: '{directive}' without a matching open section", .path.display())]
    UnbalancedSection {
        path: PathBuf,
        line: usize,
        directive: String,
    },

    #[error("{}:{line}: '{directive}' while a {open} section is open", .path.display())]
    MismatchedSection {
        path: PathBuf,
        line: usize,
        directive: String,
        open: Visibility,
    },
}

impl ReqError {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, error: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            error,
        }
    }

    /// Path of the file the error was raised for
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Io { path, .. }
            | Self::UnknownDirective { path, .. }
            | Self::MissingToken { path, .. }
            | Self::UnbalancedSection { path, .. }
            | Self::MismatchedSection { path, .. } => path,
        }
    }

    /// Line number of the offending logical line, if any
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Io { .. } => None,
            Self::UnknownDirective { line, .. }
            | Self::MissingToken { line, .. }
            | Self::UnbalancedSection { line, .. }
            | Self::MismatchedSection { line, .. } => Some(*line),
        }
    }
}
