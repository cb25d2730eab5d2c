//! Artifact checksum calculation.
//!
//! SHA-256 over file contents, used both to verify the downloaded JDK
//! archive and to produce the `.SHA256` sidecars for release artifacts.

use crate::pipeline::error::{ErrorExt, Result};
use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::io::AsyncReadExt;

/// Calculates the SHA-256 checksum of a file.
///
/// Reads the file in 8KB chunks to handle large files efficiently.
/// Returns the hex-encoded hash (64 characters, lowercase).
pub async fn file_sha256(path: &Path) -> Result<String> {
    let mut file = tokio::fs::File::open(path)
        .await
        .fs_context("opening file for hashing", path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; 8192];

    loop {
        let n = file
            .read(&mut buffer)
            .await
            .fs_context("reading file for hash calculation", path)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Verifies that a file's SHA-256 matches the expected hex digest.
///
/// The comparison is case-insensitive. A mismatch is fatal: the download
/// must not be used.
pub async fn verify_sha256(path: &Path, expected: &str) -> Result<()> {
    let actual = file_sha256(path).await?;
    if actual.eq_ignore_ascii_case(expected) {
        log::info!("✓ Checksum verified for {}", path.display());
        Ok(())
    } else {
        Err(crate::pipeline::error::Error::ChecksumMismatch {
            path: path.to_path_buf(),
            expected: expected.to_string(),
            actual,
        })
    }
}

/// Writes a `<file>.SHA256` sidecar next to the given file.
///
/// The sidecar holds `<hex digest>  <file name>`, the format `sha256sum -c`
/// accepts.
pub async fn write_sidecar(path: &Path) -> Result<std::path::PathBuf> {
    let digest = file_sha256(path).await?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let sidecar = path.with_file_name(format!("{}.SHA256", file_name));
    tokio::fs::write(&sidecar, format!("{}  {}\n", digest, file_name))
        .await
        .fs_context("writing checksum sidecar", &sidecar)?;

    Ok(sidecar)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::error::Error;

    #[tokio::test]
    async fn known_digest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payload.bin");
        tokio::fs::write(&path, b"abc").await.unwrap();

        let digest = file_sha256(&path).await.unwrap();
        assert_eq!(
            digest,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[tokio::test]
    async fn verify_accepts_matching_hash_any_case() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payload.bin");
        tokio::fs::write(&path, b"abc").await.unwrap();

        verify_sha256(
            &path,
            "BA7816BF8F01CFEA414140DE5DAE2223B00361A396177A9CB410FF61F20015AD",
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn verify_rejects_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payload.bin");
        tokio::fs::write(&path, b"tampered contents").await.unwrap();

        let err = verify_sha256(&path, &"0".repeat(64)).await.unwrap_err();
        assert!(matches!(err, Error::ChecksumMismatch { .. }));
    }

    #[tokio::test]
    async fn sidecar_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fathom.deb");
        tokio::fs::write(&path, b"deb bytes").await.unwrap();

        let sidecar = write_sidecar(&path).await.unwrap();
        assert_eq!(sidecar.file_name().unwrap(), "fathom.deb.SHA256");

        let text = tokio::fs::read_to_string(&sidecar).await.unwrap();
        assert!(text.ends_with("  fathom.deb\n"));
        assert_eq!(text.split_whitespace().next().unwrap().len(), 64);
    }
}
