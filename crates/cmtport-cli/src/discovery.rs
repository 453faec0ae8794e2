//! Requirements file discovery

use cmtport_syntax::REQUIREMENTS_FILE;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Find every requirements file below `root`, sorted by path
///
/// Unreadable directory entries are skipped.
pub fn discover(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                log::warn!("skipping unreadable entry: {err}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && entry.file_name() == REQUIREMENTS_FILE)
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    log::debug!("found {} requirements files below {}", files.len(), root.display());
    files
}

/// Package directory of a requirements file (`<package>/cmt/requirements`)
pub fn package_dir(requirements: &Path) -> Option<&Path> {
    requirements.parent()?.parent()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_discover_only_requirements() {
        let dir = TempDir::new().unwrap();
        for pkg in ["Event/EventInfo", "Control/AthenaKernel"] {
            let cmt = dir.path().join(pkg).join("cmt");
            fs::create_dir_all(&cmt).unwrap();
            fs::write(cmt.join("requirements"), "package x\n").unwrap();
            fs::write(cmt.join("requirements.bak"), "").unwrap();
        }
        fs::create_dir_all(dir.path().join("requirements")).unwrap();

        let files = discover(dir.path());
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("Control/AthenaKernel/cmt/requirements"));
        assert!(files[1].ends_with("Event/EventInfo/cmt/requirements"));
    }

    #[test]
    fn test_package_dir() {
        let path = Path::new("Event/EventInfo/cmt/requirements");
        assert_eq!(package_dir(path), Some(Path::new("Event/EventInfo")));
    }
}
