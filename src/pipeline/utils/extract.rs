//! Archive extraction for the downloaded JDK.
//!
//! The packaging tool inside the archive must stay executable, so unix
//! modes are preserved: tar entries keep their mode bits, and zip entries
//! re-apply the mode recorded in the archive.

use crate::pipeline::error::{Context, Error, ErrorExt, Result};
use std::path::Path;

/// Unpacks a `.tar.gz` or `.zip` archive into the destination directory.
///
/// The archive kind is chosen by file extension. Extraction runs on the
/// blocking pool since both archive crates are synchronous.
pub async fn unpack_archive(archive: &Path, dest: &Path) -> Result<()> {
    let archive = archive.to_path_buf();
    let dest = dest.to_path_buf();

    let name = archive.to_string_lossy().into_owned();
    let handle = tokio::task::spawn_blocking(move || {
        if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            unpack_tar_gz(&archive, &dest)
        } else if name.ends_with(".zip") {
            unpack_zip(&archive, &dest)
        } else {
            Err(Error::GenericError(format!(
                "Unsupported archive format: {}",
                archive.display()
            )))
        }
    });

    handle
        .await
        .context("archive extraction task panicked")?
}

fn unpack_tar_gz(archive: &Path, dest: &Path) -> Result<()> {
    let file = std::fs::File::open(archive).fs_context("opening archive", archive)?;
    let decoder = flate2::read::GzDecoder::new(file);
    let mut tar = tar::Archive::new(decoder);
    tar.set_preserve_permissions(true);
    tar.unpack(dest).fs_context("unpacking tar archive", archive)?;
    Ok(())
}

fn unpack_zip(archive: &Path, dest: &Path) -> Result<()> {
    let file = std::fs::File::open(archive).fs_context("opening archive", archive)?;
    let mut zip = zip::ZipArchive::new(file)
        .with_context(|| format!("reading zip archive {}", archive.display()))?;

    for i in 0..zip.len() {
        let mut entry = zip
            .by_index(i)
            .with_context(|| format!("reading zip entry {} in {}", i, archive.display()))?;

        let Some(rel_path) = entry.enclosed_name() else {
            // Entry escapes the destination root, skip it
            log::warn!("Skipping unsafe zip entry: {}", entry.name());
            continue;
        };
        let out_path = dest.join(rel_path);

        if entry.is_dir() {
            std::fs::create_dir_all(&out_path).fs_context("creating directory", &out_path)?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent).fs_context("creating directory", parent)?;
        }

        let mut out = std::fs::File::create(&out_path).fs_context("creating file", &out_path)?;
        std::io::copy(&mut entry, &mut out).fs_context("writing file", &out_path)?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&out_path, std::fs::Permissions::from_mode(mode))
                .fs_context("restoring file mode", &out_path)?;
        }
    }

    Ok(())
}
