//! Existing-output detection
//!
//! Generated build scripts start with a sentinel comment. An output file
//! without it was written by hand and must not be replaced.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Bytes of an output file inspected for the sentinel
const HEADER_LEN: usize = 64;

pub struct OutputDetector {
    files: Vec<String>,
    sentinel: String,
}

impl OutputDetector {
    pub fn new(files: Vec<String>, sentinel: impl Into<String>) -> Self {
        Self {
            files,
            sentinel: sentinel.into(),
        }
    }

    /// First hand-written output file in `package_dir`, if any
    pub fn hand_written(&self, package_dir: &Path) -> Option<PathBuf> {
        self.files
            .iter()
            .map(|name| package_dir.join(name))
            .filter(|path| path.is_file())
            .find(|path| match self.is_generated(path) {
                Ok(generated) => !generated,
                Err(err) => {
                    log::warn!("cannot read {}: {err}", path.display());
                    true
                }
            })
    }

    fn is_generated(&self, path: &Path) -> io::Result<bool> {
        let mut header = Vec::with_capacity(HEADER_LEN);
        File::open(path)?
            .take(HEADER_LEN.max(self.sentinel.len()) as u64)
            .read_to_end(&mut header)?;
        Ok(String::from_utf8_lossy(&header)
            .trim_start()
            .starts_with(&self.sentinel))
    }
}
