//! HTTP download support.
//!
//! Streams the JDK archive to disk so that hashing happens against the
//! file the pipeline actually keeps.

use crate::pipeline::error::{Error, ErrorExt, Result};
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// Downloads a URL to the given destination path.
///
/// The response body is streamed chunk by chunk; nothing is buffered in
/// memory beyond the current chunk. HTTP error statuses fail the download.
pub async fn download_to(url: &str, dest: &Path) -> Result<()> {
    log::info!("Downloading {}", url);

    let mut response = reqwest::get(url)
        .await
        .map_err(|e| Error::GenericError(format!("Download failed: {}", e)))?
        .error_for_status()
        .map_err(|e| Error::GenericError(format!("Download failed: {}", e)))?;

    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .fs_context("creating download directory", parent)?;
    }

    let mut file = tokio::fs::File::create(dest)
        .await
        .fs_context("creating download file", dest)?;

    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| Error::GenericError(format!("Failed to read response: {}", e)))?
    {
        file.write_all(&chunk)
            .await
            .fs_context("writing download chunk", dest)?;
    }

    file.flush().await.fs_context("flushing download", dest)?;
    log::info!("✓ Downloaded to {}", dest.display());

    Ok(())
}
