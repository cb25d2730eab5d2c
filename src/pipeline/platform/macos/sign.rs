//! macOS code signing.
//!
//! Signs the native libraries carried inside the jar, the runtime
//! embedded in the app image, the image itself, and the final disk
//! image, all with the configured Developer ID identity.

use crate::pipeline::context::ReleaseContext;
use crate::pipeline::error::{Context, Error, ErrorExt, Result};
use crate::pipeline::jdk::PackagingTool;
use crate::pipeline::utils::command;
use std::path::{Path, PathBuf};

/// Signs a single file or bundle with the hardened runtime enabled.
pub async fn codesign(path: &Path, identity: &str) -> Result<()> {
    let path_arg = path.to_string_lossy();
    command::run_checked(
        "codesign",
        &[
            "--force",
            "--timestamp",
            "--options",
            "runtime",
            "--sign",
            identity,
            &*path_arg,
        ],
    )
    .await?;
    log::info!("✓ Signed {}", path.display());
    Ok(())
}

/// Extracts the descriptor-listed native libraries from the staged jar,
/// signs each one, and reinserts them.
///
/// The gatekeeper checks every Mach-O inside the archive, so libraries
/// buried in the jar need individual signatures before the app image is
/// built around it.
pub async fn sign_jar_natives(
    ctx: &ReleaseContext,
    tool: &PackagingTool,
    staged_jar: &Path,
    identity: &str,
) -> Result<()> {
    let entries = &ctx.descriptor.macos.jar_dylibs;
    if entries.is_empty() {
        return Ok(());
    }

    let jar_tool = tool
        .jar
        .as_deref()
        .context("jar tool not found next to jpackage, cannot reinsert signed libraries")?;

    for entry in entries {
        let extracted = extract_jar_entry(staged_jar, entry, &ctx.dirs.dylibs_to_sign).await?;
        codesign(&extracted, identity).await?;

        // jar -C replaces the entry under the same relative path
        command::run_checked(
            jar_tool,
            &[
                std::ffi::OsStr::new("uf"),
                staged_jar.as_os_str(),
                std::ffi::OsStr::new("-C"),
                ctx.dirs.dylibs_to_sign.as_os_str(),
                std::ffi::OsStr::new(entry),
            ],
        )
        .await?;
        log::info!("✓ Reinserted signed {}", entry);
    }

    Ok(())
}

/// Signs the runtime libraries embedded in the app image, then the image
/// itself.
pub async fn sign_app_image(app: &Path, identity: &str) -> Result<()> {
    let runtime = app.join("Contents/runtime");

    if runtime.is_dir() {
        let mut libraries: Vec<PathBuf> = walkdir::WalkDir::new(&runtime)
            .follow_links(false)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.path().to_path_buf())
            .filter(|p| {
                p.extension()
                    .is_some_and(|ext| ext == "dylib" || ext == "jnilib")
            })
            .collect();
        libraries.sort();

        for library in &libraries {
            codesign(library, identity).await?;
        }
        codesign(&runtime, identity).await?;
    }

    codesign(app, identity).await
}

/// Pulls one entry out of the jar, preserving its relative path under
/// the destination root.
async fn extract_jar_entry(jar: &Path, entry: &str, dest_root: &Path) -> Result<PathBuf> {
    let jar = jar.to_path_buf();
    let entry = entry.to_string();
    let dest_root = dest_root.to_path_buf();

    let handle = tokio::task::spawn_blocking(move || -> Result<PathBuf> {
        let file = std::fs::File::open(&jar).fs_context("opening jar", &jar)?;
        let mut archive = zip::ZipArchive::new(file)
            .with_context(|| format!("reading jar {}", jar.display()))?;

        let mut source = archive.by_name(&entry).map_err(|e| {
            Error::GenericError(format!("jar has no entry {}: {}", entry, e))
        })?;

        let dest = dest_root.join(&entry);
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).fs_context("creating directory", parent)?;
        }

        let mut out = std::fs::File::create(&dest).fs_context("creating file", &dest)?;
        std::io::copy(&mut source, &mut out).fs_context("extracting jar entry", &dest)?;
        Ok(dest)
    });

    handle.await.context("jar extraction task panicked")?
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn jar_with_entry(dir: &Path, entry: &str, bytes: &[u8]) -> PathBuf {
        let jar = dir.join("Fathom.jar");
        let file = std::fs::File::create(&jar).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        writer
            .start_file(entry, zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(bytes).unwrap();
        writer.finish().unwrap();
        jar
    }

    #[tokio::test]
    async fn extracts_entry_under_relative_path() {
        let dir = tempfile::tempdir().unwrap();
        let jar = jar_with_entry(dir.path(), "native/libfathom.dylib", b"macho");

        let dest_root = dir.path().join("dylibs-to-sign");
        let extracted = extract_jar_entry(&jar, "native/libfathom.dylib", &dest_root)
            .await
            .unwrap();

        assert_eq!(extracted, dest_root.join("native/libfathom.dylib"));
        assert_eq!(std::fs::read(&extracted).unwrap(), b"macho");
    }

    #[tokio::test]
    async fn missing_entry_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let jar = jar_with_entry(dir.path(), "other.txt", b"x");

        let err = extract_jar_entry(&jar, "native/libfathom.dylib", dir.path())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no entry"));
    }
}
