/// Translation error types
use cmtport_syntax::ReqError;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub type ConvertResult<T> = Result<T, ConvertError>;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Syntax(#[from] ReqError),

    #[error("Empty {pattern} target name (package={package}, args={args:?})")]
    EmptyTargetName {
        pattern: String,
        package: String,
        args: Vec<String>,
    },

    #[error("Malformed argument [{arg}] to {pattern} in package {package}: {reason}")]
    MalformedArgument {
        pattern: String,
        package: String,
        arg: String,
        reason: &'static str,
    },

    #[error("Unknown profile '{name}' (available: {})", .available.join(", "))]
    UnknownProfile {
        name: String,
        available: Vec<String>,
    },

    #[error("Failed to translate {}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: Box<ConvertError>,
    },
}

impl ConvertError {
    /// Create an empty target name error
    pub fn empty_target(
        pattern: impl Into<String>,
        package: impl Into<String>,
        args: &[String],
    ) -> Self {
        Self::EmptyTargetName {
            pattern: pattern.into(),
            package: package.into(),
            args: args.to_vec(),
        }
    }

    /// Create a malformed `key=value` argument error
    pub fn malformed(
        pattern: impl Into<String>,
        package: impl Into<String>,
        arg: impl Into<String>,
        reason: &'static str,
    ) -> Self {
        Self::MalformedArgument {
            pattern: pattern.into(),
            package: package.into(),
            arg: arg.into(),
            reason,
        }
    }

    /// Attach the path of the file being translated
    ///
    /// Errors that already name their file are returned unchanged.
    pub fn in_file(self, path: &Path) -> Self {
        match self {
            Self::File { .. } | Self::Syntax(_) => self,
            other => Self::File {
                path: path.to_path_buf(),
                source: Box::new(other),
            },
        }
    }

    /// Path of the file the error belongs to, when known
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Syntax(err) => Some(err.path()),
            Self::File { path, .. } => Some(path),
            _ => None,
        }
    }
}
