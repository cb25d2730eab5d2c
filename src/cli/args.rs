//! Command line argument parsing and validation.

use clap::Parser;
use std::path::PathBuf;

/// Release pipeline for the Fathom desktop application
#[derive(Parser, Debug)]
#[command(
    name = "fathom-release",
    version,
    about = "Builds the Fathom platform installers",
    long_about = "Builds the platform installers for the Fathom desktop application.

Downloads a jpackage-capable JDK, verifies it, packages the distributable jar
into the host platform's installer format (.exe, .dmg, .deb/.rpm), and runs
the platform signing and notarization tools.

Usage:
  fathom-release --jar build/libs/Fathom.jar
  fathom-release --jar Fathom.jar --build-root build --assume-yes

Artifacts and their .SHA256 files land in <build-root>/temp-<timestamp>/binaries."
)]
pub struct Args {
    /// Path to the distributable application jar
    #[arg(long, value_name = "PATH")]
    pub jar: PathBuf,

    /// Project root holding release.toml and the git checkout
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub project_root: PathBuf,

    /// Directory the per-run temp folder is created under
    #[arg(long, value_name = "DIR", default_value = "build")]
    pub build_root: PathBuf,

    /// Answer yes to every confirmation prompt (non-interactive runs)
    #[arg(short = 'y', long)]
    pub assume_yes: bool,

    /// Upper bound on notarization status checks
    #[arg(long, value_name = "N", default_value_t = 60)]
    pub notarize_attempts: u32,

    /// Seconds between notarization status checks
    #[arg(long, value_name = "SECS", default_value_t = 60)]
    pub notarize_interval_secs: u64,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if !self.jar.is_file() {
            return Err(format!(
                "Distributable jar not found: {}",
                self.jar.display()
            ));
        }

        if self.notarize_attempts == 0 {
            return Err("--notarize-attempts must be at least 1".to_string());
        }

        Ok(())
    }
}
