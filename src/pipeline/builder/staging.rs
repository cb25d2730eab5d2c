//! Distributable staging and normalization.
//!
//! jpackage ingests its entire input directory, so the jar is staged into
//! a folder that holds nothing else.

use crate::pipeline::context::ReleaseContext;
use crate::pipeline::error::{Context, Error, Result};
use crate::pipeline::utils::{command, fs};
use std::path::{Path, PathBuf};

/// Copies the distributable jar into the isolated input folder and
/// normalizes it. Returns the staged path.
pub async fn stage_distributable(ctx: &ReleaseContext) -> Result<PathBuf> {
    let file_name = ctx
        .jar
        .file_name()
        .context("distributable jar path has no file name")?;
    let staged = ctx.dirs.input.join(file_name);

    // Erase first: leftovers from a previous attempt would end up inside
    // the installer.
    fs::create_dir_all(&ctx.dirs.input, true).await?;
    fs::copy_file(&ctx.jar, &staged).await?;
    log::info!("Staged {} for packaging", staged.display());

    normalize_jar(&staged).await?;

    Ok(staged)
}

/// Strips timestamps and build metadata from the jar so repeated builds
/// of the same sources produce identical bytes.
async fn normalize_jar(jar: &Path) -> Result<()> {
    match command::run_capture("strip-nondeterminism", &[jar]).await {
        Ok(output) => {
            if !output.trim().is_empty() {
                log::debug!("strip-nondeterminism: {}", output.trim());
            }
            log::info!("✓ Normalized {}", jar.display());
            Ok(())
        }
        Err(Error::CommandFailed { .. }) => {
            log::warn!("strip-nondeterminism not available, jar left as built");
            Ok(())
        }
        Err(e) => Err(e),
    }
}
