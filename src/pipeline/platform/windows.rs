//! Windows installer creation.
//!
//! jpackage produces the `.exe`; the read-only attribute it sets on the
//! output must be cleared before signtool can rewrite the file.

use crate::pipeline::SIGNING_IDENTITY_ENV;
use crate::pipeline::builder::jpackage::JpackageCommand;
use crate::pipeline::context::ReleaseContext;
use crate::pipeline::error::{ErrorExt, Result};
use crate::pipeline::jdk::PackagingTool;
use crate::pipeline::utils::{command, fs};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Check if signtool is available for Authenticode signing.
///
/// Cached result to avoid repeated lookups during bundling.
static HAS_SIGNTOOL: LazyLock<bool> = LazyLock::new(|| match which::which("signtool") {
    Ok(path) => {
        log::debug!("Found signtool at: {}", path.display());
        true
    }
    Err(e) => {
        log::debug!("signtool not found in PATH: {}", e);
        false
    }
});

/// Builds the Windows `.exe` installer, clears its read-only attribute,
/// and signs it when a signing identity is configured.
pub async fn build_installer(ctx: &ReleaseContext, tool: &PackagingTool) -> Result<Vec<PathBuf>> {
    fs::create_dir(&ctx.dirs.jpackage_temp, true).await?;

    let mut cmd = JpackageCommand::for_application(&tool.jpackage, ctx)?.package_type("exe");
    if let Some(icon) = &ctx.descriptor.windows.icon {
        cmd = cmd.option("--icon", icon);
    }
    if let Some(group) = &ctx.descriptor.windows.menu_group {
        cmd = cmd.option("--win-menu-group", group);
    }
    cmd = cmd
        .flag("--win-menu")
        .flag("--win-shortcut")
        .flag("--win-dir-chooser");
    cmd.run().await?;

    let installer = super::find_installer(&ctx.dirs.binaries, "exe")?;

    clear_read_only(&installer)?;
    sign_if_configured(&installer).await?;

    Ok(vec![installer])
}

/// Clears the read-only attribute on the produced installer.
pub fn clear_read_only(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let metadata = std::fs::metadata(path).fs_context("reading permissions", path)?;
        let mut permissions = metadata.permissions();
        permissions.set_mode(permissions.mode() | 0o200);
        std::fs::set_permissions(path, permissions).fs_context("clearing read-only", path)?;
    }

    #[cfg(windows)]
    {
        let metadata = std::fs::metadata(path).fs_context("reading permissions", path)?;
        let mut permissions = metadata.permissions();
        permissions.set_readonly(false);
        std::fs::set_permissions(path, permissions).fs_context("clearing read-only", path)?;
    }

    log::info!("✓ Cleared read-only attribute on {}", path.display());
    Ok(())
}

async fn sign_if_configured(installer: &Path) -> Result<()> {
    let Ok(identity) = std::env::var(SIGNING_IDENTITY_ENV) else {
        log::warn!("{} not set, installer left unsigned", SIGNING_IDENTITY_ENV);
        return Ok(());
    };

    if !*HAS_SIGNTOOL {
        log::warn!("signtool not available, installer left unsigned");
        return Ok(());
    }

    log::info!("Signing {}", installer.display());
    let installer_arg = installer.to_string_lossy();
    command::run_checked(
        "signtool",
        &[
            "sign",
            "/fd",
            "SHA256",
            "/td",
            "SHA256",
            "/tr",
            "http://timestamp.digicert.com",
            "/n",
            identity.as_str(),
            &*installer_arg,
        ],
    )
    .await?;
    log::info!("✓ Signed {}", installer.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_read_only_makes_file_writable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Fathom-3.4.0.exe");
        std::fs::write(&path, b"MZ").unwrap();

        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_readonly(true);
        std::fs::set_permissions(&path, perms).unwrap();
        assert!(std::fs::metadata(&path).unwrap().permissions().readonly());

        clear_read_only(&path).unwrap();
        assert!(!std::fs::metadata(&path).unwrap().permissions().readonly());
    }
}
