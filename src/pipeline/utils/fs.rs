//! File system utilities for the pipeline.
//!
//! Safe file operations with automatic parent directory creation and
//! idempotent directory handling.

use crate::pipeline::error::Result;
use std::{
    io,
    path::Path,
};
use tokio::fs;

/// Creates the given directory path, erasing it first if specified.
///
/// jpackage requires an empty scratch directory per invocation, so the
/// erase path is exercised between the .deb and .rpm builds.
pub async fn create_dir(path: &Path, erase: bool) -> Result<()> {
    if erase {
        match fs::remove_dir_all(path).await {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }

    match fs::create_dir(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Creates all of the directories of the specified path, erasing it first
/// if specified.
pub async fn create_dir_all(path: &Path, erase: bool) -> Result<()> {
    if erase {
        match fs::remove_dir_all(path).await {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }

    Ok(fs::create_dir_all(path).await?)
}

/// Copies a regular file from one path to another, creating any parent
/// directories of the destination path as necessary.
///
/// Fails if the source path is a directory or doesn't exist.
pub async fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if !from.exists() {
        return Err(crate::pipeline::error::Error::GenericError(format!(
            "{from:?} does not exist"
        )));
    }
    if !from.is_file() {
        return Err(crate::pipeline::error::Error::GenericError(format!(
            "{from:?} is not a file"
        )));
    }
    if let Some(dest_dir) = to.parent() {
        fs::create_dir_all(dest_dir).await?;
    }
    fs::copy(from, to).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_dir_erase_clears_contents() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = dir.path().join("scratch");
        create_dir(&scratch, false).await.unwrap();
        tokio::fs::write(scratch.join("leftover"), b"x").await.unwrap();

        create_dir(&scratch, true).await.unwrap();
        assert!(scratch.exists());
        assert_eq!(std::fs::read_dir(&scratch).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn copy_file_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("a.jar");
        tokio::fs::write(&src, b"jar").await.unwrap();

        let dest = dir.path().join("nested/input/a.jar");
        copy_file(&src, &dest).await.unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"jar");
    }

    #[tokio::test]
    async fn copy_file_rejects_directory_source() {
        let dir = tempfile::tempdir().unwrap();
        let err = copy_file(dir.path(), &dir.path().join("out")).await.unwrap_err();
        assert!(err.to_string().contains("is not a file"));
    }
}
