//! Release pipeline library for the Fathom desktop application.
//!
//! Orchestrates one release run end to end:
//! - preflight toolchain and checkout review
//! - JDK provisioning with checksum verification
//! - jpackage installers for Windows (.exe), macOS (.dmg), Linux (.deb/.rpm)
//! - platform code signing and macOS notarization
//! - artifact collection with SHA-256 sidecars
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod cli;
pub mod descriptor;
pub mod error;
pub mod pipeline;

// Re-export commonly used types
pub use error::{CliError, ReleaseError};
pub use pipeline::{InstallerBuilder, OsFamily, ReleaseContext};
