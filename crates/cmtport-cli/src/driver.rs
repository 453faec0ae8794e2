//! Batch driver - translate discovered files in parallel

use crate::detector::OutputDetector;
use crate::discovery::package_dir;
use anyhow::{Context, Result};
use cmtport_build::{translate_file, ConvertError, PackageGraph, Profile};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Result of translating a single file
#[derive(Debug)]
pub enum Outcome {
    Converted(Box<PackageGraph>),
    /// Package keeps a hand-written output file
    Skipped { existing: PathBuf },
    Failed(ConvertError),
}

/// A completed translation
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub outcome: Outcome,
}

impl FileOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, Outcome::Failed(_))
    }
}

/// Runs one translation task per file
pub struct Driver<'a> {
    profile: &'a Profile,
    detector: &'a OutputDetector,
    jobs: Option<usize>,
}

impl<'a> Driver<'a> {
    pub fn new(profile: &'a Profile, detector: &'a OutputDetector) -> Self {
        Self {
            profile,
            detector,
            jobs: None,
        }
    }

    /// Cap the worker pool size
    pub fn with_jobs(mut self, jobs: Option<usize>) -> Self {
        self.jobs = jobs;
        self
    }

    /// Translate every file; outcomes keep the input order
    ///
    /// A failing file never stops its siblings.
    pub fn run(&self, files: &[PathBuf]) -> Result<Vec<FileOutcome>> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs.unwrap_or(0))
            .build()
            .context("Failed to start worker threads")?;

        Ok(pool.install(|| files.par_iter().map(|path| self.process(path)).collect()))
    }

    fn process(&self, path: &Path) -> FileOutcome {
        let existing = package_dir(path).and_then(|dir| self.detector.hand_written(dir));
        let outcome = match existing {
            Some(existing) => {
                log::info!("{}: keeping hand-written {}", path.display(), existing.display());
                Outcome::Skipped { existing }
            }
            None => match translate_file(path, self.profile) {
                Ok(graph) => Outcome::Converted(Box::new(graph)),
                Err(err) => {
                    log::debug!("{}: {err}", path.display());
                    Outcome::Failed(err)
                }
            },
        };

        FileOutcome {
            path: path.to_path_buf(),
            outcome,
        }
    }
}
