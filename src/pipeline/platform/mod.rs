//! Platform-specific installer creation.
//!
//! Each submodule owns one OS family's packaging subtype flags and
//! signing flow. All of them leave their installers in the run's
//! `binaries/` folder.

pub mod linux;
pub mod macos;
pub mod windows;

use crate::pipeline::error::{Error, ErrorExt, Result};
use std::path::{Path, PathBuf};

/// Finds the single installer with the given extension in the output
/// folder.
///
/// jpackage chooses the final file name itself, so the produced installer
/// is located by extension rather than predicted.
pub fn find_installer(dir: &Path, extension: &str) -> Result<PathBuf> {
    let mut matches: Vec<PathBuf> = std::fs::read_dir(dir)
        .fs_context("listing output folder", dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|e| e == extension))
        .collect();
    matches.sort();

    match matches.len() {
        0 => Err(Error::GenericError(format!(
            "jpackage reported success but no .{} was produced in {}",
            extension,
            dir.display()
        ))),
        1 => Ok(matches.remove(0)),
        n => Err(Error::GenericError(format!(
            "Expected one .{} in {}, found {}",
            extension,
            dir.display(),
            n
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_installer_rejects_empty_and_ambiguous() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_installer(dir.path(), "exe").is_err());

        std::fs::write(dir.path().join("a.exe"), b"MZ").unwrap();
        assert!(find_installer(dir.path(), "exe").is_ok());

        std::fs::write(dir.path().join("b.exe"), b"MZ").unwrap();
        assert!(find_installer(dir.path(), "exe").is_err());
    }
}
