//! Parsed requirements file

use crate::statement::{Statement, UsePkg};
use serde::Serialize;
use std::path::{Component, Path, PathBuf};

/// Conventional name of a requirements file
pub const REQUIREMENTS_FILE: &str = "requirements";

/// One requirements file: its path, resolved package name and statements
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReqFile {
    pub path: PathBuf,
    /// Declared `package` name, else the name derived from the path
    pub package: String,
    pub statements: Vec<Statement>,
}

impl ReqFile {
    /// Create an empty file record; the package name comes from the path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let package = package_dir(&path)
            .and_then(|dir| dir.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path,
            package,
            statements: Vec::new(),
        }
    }

    /// Package directory: two levels above `<package>/cmt/requirements`
    pub fn package_dir(&self) -> Option<&Path> {
        package_dir(&self.path)
    }

    /// Package directory as a `/`-separated string (`Control/AthenaKernel`)
    ///
    /// Root and `..` components are dropped.
    pub fn package_path(&self) -> String {
        self.package_dir()
            .map(|dir| {
                dir.components()
                    .filter_map(|c| match c {
                        Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                        _ => None,
                    })
                    .collect::<Vec<_>>()
                    .join("/")
            })
            .unwrap_or_default()
    }

    pub fn uses(&self) -> impl Iterator<Item = &UsePkg> {
        self.statements.iter().filter_map(|stmt| match stmt {
            Statement::Use(u) => Some(u),
            _ => None,
        })
    }
}

fn package_dir(path: &Path) -> Option<&Path> {
    path.parent()
        .and_then(Path::parent)
        .filter(|dir| !dir.as_os_str().is_empty())
}
