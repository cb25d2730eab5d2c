//! Context threaded through the pipeline stages.
//!
//! Every stage reads from one [`ReleaseContext`] instead of sharing
//! mutable globals; stage results flow back as return values.

use crate::descriptor::ReleaseDescriptor;
use crate::pipeline::error::{ErrorExt, Result};
use crate::pipeline::jdk::OsFamily;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Working directories for one pipeline run.
///
/// A uniquely-named temporary root is created per run and never cleaned
/// up automatically, so a failed run can be inspected afterwards. The
/// next run supersedes it.
#[derive(Clone, Debug)]
pub struct WorkDirs {
    /// Per-run root, `<build-root>/temp-<timestamp>`.
    pub root: PathBuf,

    /// Downloaded archives and final artifacts with their `.SHA256` files.
    pub binaries: PathBuf,

    /// jpackage scratch space, recreated empty before each invocation.
    pub jpackage_temp: PathBuf,

    /// Extraction target for the downloaded JDK.
    pub jdk: PathBuf,

    /// Native libraries pulled out of the jar for individual signing.
    pub dylibs_to_sign: PathBuf,

    /// Isolated jpackage input folder holding only the distributable jar.
    pub input: PathBuf,
}

impl WorkDirs {
    /// Creates the per-run directory tree under the given build root.
    pub fn create(build_root: &Path) -> Result<Self> {
        let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
        let root = build_root.join(format!("temp-{}", stamp));

        let dirs = Self {
            binaries: root.join("binaries"),
            jpackage_temp: root.join("jpackage-temp"),
            jdk: root.join("jdk-jpackage"),
            dylibs_to_sign: root.join("dylibs-to-sign"),
            input: root.join("input"),
            root,
        };

        for dir in [
            &dirs.binaries,
            &dirs.jpackage_temp,
            &dirs.jdk,
            &dirs.dylibs_to_sign,
            &dirs.input,
        ] {
            std::fs::create_dir_all(dir).fs_context("creating working directory", dir)?;
        }

        log::info!("Working directory: {}", dirs.root.display());
        Ok(dirs)
    }

    /// Builds the struct over an existing tree without touching the
    /// filesystem layout conventions.
    pub fn at_root(root: PathBuf) -> Self {
        Self {
            binaries: root.join("binaries"),
            jpackage_temp: root.join("jpackage-temp"),
            jdk: root.join("jdk-jpackage"),
            dylibs_to_sign: root.join("dylibs-to-sign"),
            input: root.join("input"),
            root,
        }
    }
}

/// Knobs from the CLI that alter pipeline behavior.
#[derive(Clone, Debug)]
pub struct RunOptions {
    /// Answer yes to every confirmation gate (non-interactive runs).
    pub assume_yes: bool,

    /// Upper bound on notarization status checks.
    pub notarize_attempts: u32,

    /// Delay between notarization status checks.
    pub notarize_interval: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            assume_yes: false,
            notarize_attempts: 60,
            notarize_interval: Duration::from_secs(60),
        }
    }
}

/// Everything the pipeline stages need, constructed once at startup.
#[derive(Clone, Debug)]
pub struct ReleaseContext {
    /// Application metadata from `release.toml`.
    pub descriptor: ReleaseDescriptor,

    /// Host OS family the installers are built for.
    pub family: OsFamily,

    /// Per-run working directories.
    pub dirs: WorkDirs,

    /// Path to the distributable jar fed into the installer builder.
    pub jar: PathBuf,

    /// Project root holding `release.toml` and the git checkout.
    pub project_root: PathBuf,

    /// CLI-derived behavior knobs.
    pub options: RunOptions,
}

impl ReleaseContext {
    /// Name of the OS-suffixed jar copied into the artifact folder.
    pub fn artifact_jar_name(&self) -> String {
        format!(
            "{}-{}-{}.jar",
            self.descriptor.application.name,
            self.descriptor.application.normalized_version(),
            self.family.identifier()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ReleaseDescriptor;

    fn descriptor() -> ReleaseDescriptor {
        toml::from_str(
            r#"
[application]
name = "Fathom"
version = "3.4.0-beta.2"
description = "Fathom desktop client"
vendor = "Fathom Project"
copyright = "Copyright 2026 Fathom Project"
main-class = "org.fathom.desktop.Launcher"
"#,
        )
        .unwrap()
    }

    #[test]
    fn jar_name_embeds_each_os_identifier() {
        let dir = tempfile::tempdir().unwrap();

        for (family, expected) in [
            (OsFamily::Windows, "Fathom-3.4.0-windows.jar"),
            (OsFamily::MacOs, "Fathom-3.4.0-macos.jar"),
            (OsFamily::Linux, "Fathom-3.4.0-linux.jar"),
        ] {
            let ctx = ReleaseContext {
                descriptor: descriptor(),
                family,
                dirs: WorkDirs::at_root(dir.path().join("run")),
                jar: dir.path().join("fathom.jar"),
                project_root: dir.path().to_path_buf(),
                options: RunOptions::default(),
            };
            assert_eq!(ctx.artifact_jar_name(), expected);
        }
    }

    #[test]
    fn work_dirs_create_expected_layout() {
        let dir = tempfile::tempdir().unwrap();
        let dirs = WorkDirs::create(dir.path()).unwrap();

        assert!(dirs.root.file_name().unwrap().to_str().unwrap().starts_with("temp-"));
        for sub in ["binaries", "jpackage-temp", "jdk-jpackage", "dylibs-to-sign", "input"] {
            assert!(dirs.root.join(sub).is_dir(), "missing {}", sub);
        }
    }
}
