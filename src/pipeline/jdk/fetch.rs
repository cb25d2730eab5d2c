//! JDK download, verification, and jpackage discovery.
//!
//! The checksum gate sits between download and extraction: an archive
//! whose hash does not match the recorded value is never unpacked.

use super::JdkBinary;
use crate::pipeline::context::WorkDirs;
use crate::pipeline::error::{Error, Result};
use crate::pipeline::utils::{checksum, extract, http};
use std::path::{Path, PathBuf};

/// Executables located inside the provisioned JDK.
#[derive(Clone, Debug)]
pub struct PackagingTool {
    /// Path to the jpackage executable.
    pub jpackage: PathBuf,

    /// Path to the jar tool next to it, when present.
    ///
    /// Used on macOS to reinsert signed native libraries into the
    /// distributable jar.
    pub jar: Option<PathBuf>,
}

/// Downloads, verifies, and extracts the JDK, then locates jpackage.
///
/// The archive lands in the run's `binaries/` folder and is unpacked into
/// `jdk-jpackage/`. A checksum mismatch or a missing jpackage executable
/// aborts the run.
pub async fn provision(dirs: &WorkDirs, binary: &JdkBinary) -> Result<PackagingTool> {
    let archive_path = dirs.binaries.join(binary.archive_name());

    http::download_to(binary.url, &archive_path).await?;
    checksum::verify_sha256(&archive_path, binary.sha256).await?;

    log::info!("Extracting {}", archive_path.display());
    extract::unpack_archive(&archive_path, &dirs.jdk).await?;

    let jpackage = find_executable(&dirs.jdk, "jpackage")
        .ok_or_else(|| Error::PackagingToolMissing(dirs.jdk.clone()))?;
    log::info!("✓ Found jpackage at {}", jpackage.display());

    let jar = jpackage
        .parent()
        .and_then(|bin_dir| find_executable(bin_dir, "jar"));

    Ok(PackagingTool { jpackage, jar })
}

/// Searches a directory tree for an executable by file stem.
///
/// Matches `name` and `name.exe`. Returns the first hit in walk order.
pub fn find_executable(root: &Path, name: &str) -> Option<PathBuf> {
    let windows_name = format!("{}.exe", name);

    walkdir::WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .find(|e| {
            e.file_name() == std::ffi::OsStr::new(name)
                || e.file_name() == std::ffi::OsStr::new(windows_name.as_str())
        })
        .map(|e| e.path().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_nested_executable() {
        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("jdk-21.0.5+11/bin");
        std::fs::create_dir_all(&bin).unwrap();
        std::fs::write(bin.join("jpackage"), b"#!/bin/sh\n").unwrap();
        std::fs::write(bin.join("javac"), b"#!/bin/sh\n").unwrap();

        let found = find_executable(dir.path(), "jpackage").unwrap();
        assert!(found.ends_with("bin/jpackage"));
    }

    #[test]
    fn finds_windows_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("jdk/bin");
        std::fs::create_dir_all(&bin).unwrap();
        std::fs::write(bin.join("jpackage.exe"), b"MZ").unwrap();

        assert!(find_executable(dir.path(), "jpackage").is_some());
    }

    #[test]
    fn missing_executable_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_executable(dir.path(), "jpackage").is_none());
    }
}
