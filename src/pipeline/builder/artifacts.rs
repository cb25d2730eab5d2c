//! Artifact collection, checksumming, and publishing.

use crate::pipeline::context::ReleaseContext;
use crate::pipeline::error::{ErrorExt, Result};
use crate::pipeline::utils::{checksum, fs, prompt};
use std::path::{Path, PathBuf};

/// Environment variable naming the shared folder artifacts are copied to.
pub const SHARED_DIR_ENV: &str = "FATHOM_SHARED_DIR";

/// One finished release artifact.
#[derive(Clone, Debug)]
pub struct ReleaseArtifact {
    /// Location in the `binaries/` output folder.
    pub path: PathBuf,
    /// Size in bytes.
    pub size: u64,
    /// Hex-encoded SHA-256.
    pub sha256: String,
}

/// Copies the distributable jar into the output folder under its
/// OS-suffixed name, then checksums every artifact in `binaries/`.
///
/// The downloaded runtime archive shares the folder with the artifacts;
/// it and existing `.SHA256` sidecars are left out of the sweep.
pub async fn collect(ctx: &ReleaseContext, staged_jar: &Path) -> Result<Vec<ReleaseArtifact>> {
    let jar_dest = ctx.dirs.binaries.join(ctx.artifact_jar_name());
    fs::copy_file(staged_jar, &jar_dest).await?;
    log::info!("Copied distributable to {}", jar_dest.display());

    let mut artifacts = Vec::new();

    let mut entries: Vec<PathBuf> = std::fs::read_dir(&ctx.dirs.binaries)
        .fs_context("listing output folder", &ctx.dirs.binaries)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && is_artifact(p))
        .collect();
    entries.sort();

    for path in entries {
        checksum::write_sidecar(&path).await?;

        let metadata = tokio::fs::metadata(&path)
            .await
            .fs_context("reading artifact metadata", &path)?;
        let sha256 = checksum::file_sha256(&path).await?;

        artifacts.push(ReleaseArtifact {
            path,
            size: metadata.len(),
            sha256,
        });
    }

    log::info!("✓ Collected {} artifacts", artifacts.len());
    Ok(artifacts)
}

/// Optionally copies all artifacts to the shared folder and opens it in
/// the host file browser. Skipped when the operator declines or the
/// folder is not configured.
pub async fn publish(ctx: &ReleaseContext, artifacts: &[ReleaseArtifact]) -> Result<()> {
    if artifacts.is_empty() {
        return Ok(());
    }

    if !prompt::confirm("Copy artifacts to the shared folder?", ctx.options.assume_yes)? {
        log::info!("Skipping shared folder copy");
        return Ok(());
    }

    let Ok(shared) = std::env::var(SHARED_DIR_ENV) else {
        log::warn!("{} not set, skipping shared folder copy", SHARED_DIR_ENV);
        return Ok(());
    };
    let shared = PathBuf::from(shared);

    for artifact in artifacts {
        copy_with_sidecar(&artifact.path, &shared).await?;
    }
    log::info!("✓ Copied {} artifacts to {}", artifacts.len(), shared.display());

    if let Err(e) = opener::open(&shared) {
        log::warn!("Could not open {} in the file browser: {}", shared.display(), e);
    }

    Ok(())
}

async fn copy_with_sidecar(artifact: &Path, dest_dir: &Path) -> Result<()> {
    for source in [artifact.to_path_buf(), sidecar_path(artifact)] {
        if let Some(name) = source.file_name() {
            fs::copy_file(&source, &dest_dir.join(name)).await?;
        }
    }
    Ok(())
}

fn sidecar_path(artifact: &Path) -> PathBuf {
    let name = artifact
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    artifact.with_file_name(format!("{}.SHA256", name))
}

/// Artifact sweep filter: installers and the OS-suffixed jar count,
/// sidecars and the downloaded runtime archive do not.
fn is_artifact(path: &Path) -> bool {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    !name.ends_with(".SHA256") && !name.ends_with(".tar.gz") && !name.ends_with(".zip")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::context::{RunOptions, WorkDirs};
    use crate::pipeline::jdk::OsFamily;

    fn context(dir: &Path, family: OsFamily) -> ReleaseContext {
        let descriptor = toml::from_str(
            r#"
[application]
name = "Fathom"
version = "3.4.0-beta.2"
description = "d"
vendor = "v"
copyright = "c"
main-class = "org.fathom.Main"
"#,
        )
        .unwrap();

        ReleaseContext {
            descriptor,
            family,
            dirs: WorkDirs::create(dir).unwrap(),
            jar: dir.join("Fathom.jar"),
            project_root: dir.to_path_buf(),
            options: RunOptions {
                assume_yes: true,
                ..RunOptions::default()
            },
        }
    }

    #[tokio::test]
    async fn collect_renames_jar_and_writes_sidecars() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path(), OsFamily::Linux);

        tokio::fs::write(&ctx.jar, b"jar bytes").await.unwrap();
        let staged = ctx.dirs.input.join("Fathom.jar");
        tokio::fs::write(&staged, b"jar bytes").await.unwrap();

        // An installer produced by a previous stage and the downloaded
        // runtime archive sharing the folder
        tokio::fs::write(ctx.dirs.binaries.join("fathom_3.4.0_amd64.deb"), b"deb")
            .await
            .unwrap();
        tokio::fs::write(ctx.dirs.binaries.join("OpenJDK21U.tar.gz"), b"jdk")
            .await
            .unwrap();

        let artifacts = collect(&ctx, &staged).await.unwrap();

        let names: Vec<String> = artifacts
            .iter()
            .map(|a| a.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["Fathom-3.4.0-linux.jar", "fathom_3.4.0_amd64.deb"]);

        for artifact in &artifacts {
            assert_eq!(artifact.sha256.len(), 64);
            assert!(sidecar_path(&artifact.path).is_file());
        }

        // The runtime archive is neither collected nor checksummed
        assert!(!ctx.dirs.binaries.join("OpenJDK21U.tar.gz.SHA256").exists());
    }

    #[tokio::test]
    async fn publish_copies_artifacts_and_sidecars() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path(), OsFamily::Linux);

        let staged = ctx.dirs.input.join("Fathom.jar");
        tokio::fs::write(&staged, b"jar bytes").await.unwrap();
        let artifacts = collect(&ctx, &staged).await.unwrap();

        let shared = dir.path().join("shared");
        std::fs::create_dir_all(&shared).unwrap();

        // Env var scope: set, publish, restore
        unsafe { std::env::set_var(SHARED_DIR_ENV, &shared) };
        publish(&ctx, &artifacts).await.unwrap();
        unsafe { std::env::remove_var(SHARED_DIR_ENV) };

        assert!(shared.join("Fathom-3.4.0-linux.jar").is_file());
        assert!(shared.join("Fathom-3.4.0-linux.jar.SHA256").is_file());
    }
}
