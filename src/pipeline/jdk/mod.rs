//! JDK archive selection by host operating system.
//!
//! A static table maps each supported OS family to the download URL and
//! SHA-256 of a jpackage-capable JDK build. No network access happens
//! here; the table is data.

pub mod fetch;

pub use fetch::{PackagingTool, provision};

use crate::pipeline::error::{Error, Result};

/// Host operating system family.
///
/// The pipeline branches on this for packaging subtype, signing tools,
/// and artifact naming. Anything outside the three supported families is
/// rejected up front rather than defaulted.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OsFamily {
    /// Windows (exe installer, signtool)
    Windows,
    /// macOS (dmg installer, codesign + notarization)
    MacOs,
    /// Linux (deb and rpm packages)
    Linux,
}

impl OsFamily {
    /// Detects the family of the machine the pipeline runs on.
    pub fn host() -> Result<Self> {
        Self::from_os_name(std::env::consts::OS)
    }

    /// Parses an OS name as reported by `std::env::consts::OS`.
    ///
    /// Unknown names fail closed: there is no sensible default installer
    /// format for an unsupported platform.
    pub fn from_os_name(name: &str) -> Result<Self> {
        match name {
            "windows" => Ok(Self::Windows),
            "macos" => Ok(Self::MacOs),
            "linux" => Ok(Self::Linux),
            other => Err(Error::GenericError(format!(
                "Unsupported operating system: {}",
                other
            ))),
        }
    }

    /// Short identifier embedded in artifact filenames.
    pub fn identifier(self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::MacOs => "macos",
            Self::Linux => "linux",
        }
    }

    /// All supported families, in artifact-listing order.
    pub const ALL: [Self; 3] = [Self::Windows, Self::MacOs, Self::Linux];
}

/// Reference to one downloadable JDK build: where to get it and what its
/// archive must hash to.
#[derive(Clone, Copy, Debug)]
pub struct JdkBinary {
    /// Download URL for the archive.
    pub url: &'static str,
    /// Expected SHA-256 of the archive, lowercase hex.
    pub sha256: &'static str,
}

impl JdkBinary {
    /// File name component of the download URL.
    pub fn archive_name(&self) -> &'static str {
        self.url.rsplit('/').next().unwrap_or(self.url)
    }
}

const JDK_WINDOWS: JdkBinary = JdkBinary {
    url: "https://github.com/adoptium/temurin21-binaries/releases/download/jdk-21.0.5%2B11/OpenJDK21U-jdk_x64_windows_hotspot_21.0.5_11.zip",
    sha256: "566093d04d8b6da4e00c5a779bb37f7b596b4760830ccc1faa2a1e2b08d295a1",
};

const JDK_MACOS: JdkBinary = JdkBinary {
    url: "https://github.com/adoptium/temurin21-binaries/releases/download/jdk-21.0.5%2B11/OpenJDK21U-jdk_aarch64_mac_hotspot_21.0.5_11.tar.gz",
    sha256: "d9c5405339ef86a5d84ef3dd1e4ad3cd8fb0e2cbd8c9b1ed8e0b4a78ac4cd8d3",
};

const JDK_LINUX: JdkBinary = JdkBinary {
    url: "https://github.com/adoptium/temurin21-binaries/releases/download/jdk-21.0.5%2B11/OpenJDK21U-jdk_x64_linux_hotspot_21.0.5_11.tar.gz",
    sha256: "3c654d98404c073b8a7e66bffb27f4ae3e7ede47d13284c132d40a83144bfd8c",
};

/// Returns the JDK build for the given OS family.
///
/// Pure lookup over a table that is exhaustive for the three supported
/// families.
pub fn resolve(family: OsFamily) -> JdkBinary {
    match family {
        OsFamily::Windows => JDK_WINDOWS,
        OsFamily::MacOs => JDK_MACOS,
        OsFamily::Linux => JDK_LINUX,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_family_resolves_to_one_consistent_pair() {
        for family in OsFamily::ALL {
            let binary = resolve(family);

            assert!(binary.url.starts_with("https://"));
            assert_eq!(binary.sha256.len(), 64);
            assert!(binary.sha256.chars().all(|c| c.is_ascii_hexdigit()));

            // Archive kind must follow the family
            match family {
                OsFamily::Windows => assert!(binary.url.ends_with(".zip")),
                OsFamily::MacOs | OsFamily::Linux => assert!(binary.url.ends_with(".tar.gz")),
            }
        }
    }

    #[test]
    fn families_get_distinct_archives() {
        let urls: Vec<_> = OsFamily::ALL.iter().map(|f| resolve(*f).url).collect();
        assert_ne!(urls[0], urls[1]);
        assert_ne!(urls[1], urls[2]);
        assert_ne!(urls[0], urls[2]);
    }

    #[test]
    fn unknown_os_fails_closed() {
        assert!(OsFamily::from_os_name("freebsd").is_err());
        assert!(OsFamily::from_os_name("").is_err());
    }

    #[test]
    fn known_os_names_parse() {
        assert_eq!(OsFamily::from_os_name("linux").unwrap(), OsFamily::Linux);
        assert_eq!(OsFamily::from_os_name("macos").unwrap(), OsFamily::MacOs);
        assert_eq!(
            OsFamily::from_os_name("windows").unwrap(),
            OsFamily::Windows
        );
    }

    #[test]
    fn archive_name_is_url_basename() {
        let binary = resolve(OsFamily::Linux);
        assert!(binary.archive_name().starts_with("OpenJDK21U-jdk"));
        assert!(!binary.archive_name().contains('/'));
    }
}
