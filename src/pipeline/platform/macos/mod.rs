//! macOS disk image creation with optional signing and notarization.
//!
//! The signed path builds an unsigned app image first, signs it inside
//! out (jar natives, embedded runtime, image), wraps it into a dmg,
//! signs the dmg, and notarizes. Declining the signing gate produces an
//! unsigned dmg straight from the staged input.

pub mod notarize;
pub mod sign;

use crate::pipeline::SIGNING_IDENTITY_ENV;
use crate::pipeline::builder::jpackage::JpackageCommand;
use crate::pipeline::context::ReleaseContext;
use crate::pipeline::error::{Error, Result};
use crate::pipeline::jdk::PackagingTool;
use crate::pipeline::utils::{fs, prompt};
use std::path::{Path, PathBuf};

/// Builds the macOS `.dmg` installer.
pub async fn build_installer(
    ctx: &ReleaseContext,
    tool: &PackagingTool,
    staged_jar: &Path,
) -> Result<Vec<PathBuf>> {
    let wants_signing =
        prompt::confirm("Sign and notarize this release?", ctx.options.assume_yes)?;

    let identity = std::env::var(SIGNING_IDENTITY_ENV).ok();
    let dmg = match (wants_signing, identity) {
        (true, Some(identity)) => build_signed(ctx, tool, staged_jar, &identity).await?,
        (true, None) => {
            log::warn!(
                "{} not set, falling back to an unsigned disk image",
                SIGNING_IDENTITY_ENV
            );
            build_unsigned(ctx, tool).await?
        }
        (false, _) => {
            log::info!("Signing declined, building an unsigned disk image");
            build_unsigned(ctx, tool).await?
        }
    };

    Ok(vec![dmg])
}

async fn build_unsigned(ctx: &ReleaseContext, tool: &PackagingTool) -> Result<PathBuf> {
    fs::create_dir(&ctx.dirs.jpackage_temp, true).await?;

    let mut cmd = JpackageCommand::for_application(&tool.jpackage, ctx)?.package_type("dmg");
    if let Some(icon) = &ctx.descriptor.macos.icon {
        cmd = cmd.option("--icon", icon);
    }
    cmd.run().await?;

    super::find_installer(&ctx.dirs.binaries, "dmg")
}

async fn build_signed(
    ctx: &ReleaseContext,
    tool: &PackagingTool,
    staged_jar: &Path,
    identity: &str,
) -> Result<PathBuf> {
    sign::sign_jar_natives(ctx, tool, staged_jar, identity).await?;

    // Unsigned app image first; jpackage ad-hoc signs otherwise
    let image_root = ctx.dirs.root.join("app-image");
    fs::create_dir_all(&image_root, true).await?;
    fs::create_dir(&ctx.dirs.jpackage_temp, true).await?;

    let mut cmd = JpackageCommand::for_application(&tool.jpackage, ctx)?
        .package_type("app-image")
        .dest(&image_root);
    if let Some(icon) = &ctx.descriptor.macos.icon {
        cmd = cmd.option("--icon", icon);
    }
    cmd.run().await?;

    let app = find_app_bundle(&image_root)?;
    sign::sign_app_image(&app, identity).await?;

    // Wrap the signed image into the disk image
    fs::create_dir(&ctx.dirs.jpackage_temp, true).await?;
    JpackageCommand::for_app_image(&tool.jpackage, ctx, &app)
        .package_type("dmg")
        .run()
        .await?;

    let dmg = super::find_installer(&ctx.dirs.binaries, "dmg")?;
    sign::codesign(&dmg, identity).await?;

    notarize::run(ctx, &dmg).await?;

    Ok(dmg)
}

/// Finds the `.app` bundle jpackage left in the image directory.
fn find_app_bundle(image_root: &Path) -> Result<PathBuf> {
    std::fs::read_dir(image_root)
        .map_err(Error::IoError)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .find(|p| p.is_dir() && p.extension().is_some_and(|ext| ext == "app"))
        .ok_or_else(|| {
            Error::GenericError(format!(
                "no .app bundle produced in {}",
                image_root.display()
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locates_app_bundle() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("Fathom.app")).unwrap();
        std::fs::write(dir.path().join("stray.txt"), b"x").unwrap();

        let app = find_app_bundle(dir.path()).unwrap();
        assert!(app.ends_with("Fathom.app"));
    }

    #[test]
    fn missing_app_bundle_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_app_bundle(dir.path()).is_err());
    }
}
