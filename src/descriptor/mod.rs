//! Release descriptor loading.
//!
//! The descriptor (`release.toml` at the project root) carries the
//! application metadata that parametrizes every jpackage invocation, the
//! required JDK major version, the JVM tuning flags, and the per-platform
//! packaging options. It is read once at pipeline start.

use crate::error::{CliError, ReleaseError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Release descriptor for one application.
///
/// # Configuration
///
/// ```toml
/// [application]
/// name = "Fathom"
/// version = "3.4.0-beta.2"
/// description = "Fathom desktop client"
/// vendor = "Fathom Project"
/// copyright = "Copyright 2026 Fathom Project"
///
/// [toolchain]
/// required-major = 21
///
/// [jvm]
/// options = ["-Xss4m", "-Dfile.encoding=UTF-8"]
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ReleaseDescriptor {
    /// Application metadata used across all platforms.
    pub application: ApplicationInfo,

    /// Toolchain requirements checked during preflight.
    #[serde(default)]
    pub toolchain: ToolchainInfo,

    /// JVM tuning flags passed through `--java-options`.
    #[serde(default)]
    pub jvm: JvmInfo,

    /// Windows packaging options.
    #[serde(default)]
    pub windows: WindowsInfo,

    /// Linux packaging options.
    #[serde(default)]
    pub linux: LinuxInfo,

    /// macOS packaging options.
    #[serde(default)]
    pub macos: MacOsInfo,
}

/// Application metadata shared by every installer.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ApplicationInfo {
    /// Product name displayed in installers and menus.
    pub name: String,

    /// Version string, possibly carrying a pre-release suffix.
    ///
    /// Installers get the normalized form (suffix stripped); see
    /// [`ApplicationInfo::normalized_version`].
    pub version: String,

    /// Brief description used by the installers.
    pub description: String,

    /// Vendor name.
    pub vendor: String,

    /// Copyright line.
    pub copyright: String,

    /// Fully-qualified main class launched by the installed app.
    pub main_class: String,
}

impl ApplicationInfo {
    /// Returns the version with any pre-release suffix stripped.
    ///
    /// `3.4.0-beta.2` becomes `3.4.0`. Already-normalized input comes back
    /// unchanged, so applying this twice yields the same result as once.
    pub fn normalized_version(&self) -> String {
        normalize_version(&self.version)
    }
}

/// Toolchain requirements.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ToolchainInfo {
    /// Required JDK major version, checked against `javac -version`.
    #[serde(default = "default_required_major")]
    pub required_major: u32,
}

impl Default for ToolchainInfo {
    fn default() -> Self {
        Self {
            required_major: default_required_major(),
        }
    }
}

fn default_required_major() -> u32 {
    21
}

/// JVM flags baked into the launcher.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JvmInfo {
    /// Passed one by one through jpackage `--java-options`.
    #[serde(default)]
    pub options: Vec<String>,
}

/// Windows installer options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct WindowsInfo {
    /// Path to the `.ico` icon.
    #[serde(default)]
    pub icon: Option<PathBuf>,

    /// Start-menu group the shortcut is placed in.
    #[serde(default)]
    pub menu_group: Option<String>,
}

/// Linux package options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LinuxInfo {
    /// Path to the `.png` icon.
    #[serde(default)]
    pub icon: Option<PathBuf>,

    /// Debian package maintainer line.
    #[serde(default)]
    pub maintainer: Option<String>,
}

/// macOS packaging and signing options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MacOsInfo {
    /// Path to the `.icns` icon.
    #[serde(default)]
    pub icon: Option<PathBuf>,

    /// Native libraries inside the jar that need individual signatures.
    ///
    /// Entry names as they appear in the jar, e.g.
    /// `native/libfathom-arm64.dylib`. Each is extracted, signed, and
    /// reinserted before the app image is built.
    #[serde(default)]
    pub jar_dylibs: Vec<String>,
}

/// Loads the release descriptor from `release.toml` in the project root.
pub fn load(project_root: &Path) -> Result<ReleaseDescriptor> {
    let path = project_root.join("release.toml");

    let text = std::fs::read_to_string(&path).map_err(|e| {
        ReleaseError::Cli(CliError::InvalidArguments {
            reason: format!("Failed to read {}: {}", path.display(), e),
        })
    })?;

    let descriptor: ReleaseDescriptor = toml::from_str(&text)?;

    if descriptor.application.name.is_empty() {
        return Err(ReleaseError::Cli(CliError::InvalidArguments {
            reason: "application.name must not be empty".to_string(),
        }));
    }
    if descriptor.application.version.is_empty() {
        return Err(ReleaseError::Cli(CliError::InvalidArguments {
            reason: "application.version must not be empty".to_string(),
        }));
    }

    Ok(descriptor)
}

/// Strips a trailing pre-release suffix from a version string.
///
/// Semver input drops its pre-release and build components; anything else
/// is cut at the first `-`. Idempotent.
pub fn normalize_version(version: &str) -> String {
    if let Ok(parsed) = semver::Version::parse(version) {
        return format!("{}.{}.{}", parsed.major, parsed.minor, parsed.patch);
    }

    match version.split_once('-') {
        Some((release, _suffix)) => release.to_string(),
        None => version.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_prerelease_suffix() {
        assert_eq!(normalize_version("3.4.0-beta.2"), "3.4.0");
        assert_eq!(normalize_version("1.0.0-rc.1+build.5"), "1.0.0");
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = normalize_version("2.1.0-snapshot");
        let twice = normalize_version(&once);
        assert_eq!(once, twice);
        assert_eq!(once, "2.1.0");
    }

    #[test]
    fn plain_version_unchanged() {
        assert_eq!(normalize_version("3.4.0"), "3.4.0");
    }

    #[test]
    fn non_semver_falls_back_to_dash_split() {
        assert_eq!(normalize_version("3.4-beta"), "3.4");
    }

    #[test]
    fn loads_full_descriptor() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("release.toml"),
            r#"
[application]
name = "Fathom"
version = "3.4.0-beta.2"
description = "Fathom desktop client"
vendor = "Fathom Project"
copyright = "Copyright 2026 Fathom Project"
main-class = "org.fathom.desktop.Launcher"

[toolchain]
required-major = 21

[jvm]
options = ["-Xss4m"]

[macos]
jar-dylibs = ["native/libfathom.dylib"]
"#,
        )
        .unwrap();

        let descriptor = load(dir.path()).unwrap();
        assert_eq!(descriptor.application.name, "Fathom");
        assert_eq!(descriptor.application.normalized_version(), "3.4.0");
        assert_eq!(descriptor.toolchain.required_major, 21);
        assert_eq!(descriptor.jvm.options, vec!["-Xss4m"]);
        assert_eq!(descriptor.macos.jar_dylibs, vec!["native/libfathom.dylib"]);
    }

    #[test]
    fn missing_descriptor_is_a_cli_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(dir.path()).is_err());
    }
}
