//! Release pipeline stages.
//!
//! One run flows through four stages, each gated by the previous:
//!
//! 1. [`preflight`] - toolchain and checkout review
//! 2. [`jdk`] - JDK selection, download, verification, jpackage lookup
//! 3. [`builder`] - staging, jpackage invocation, artifact collection
//! 4. platform modules under [`platform`] - per-OS packaging and signing
//!
//! Stages communicate through [`context::ReleaseContext`] and their
//! return values; nothing is shared through globals.

pub mod builder;
pub mod context;
pub mod error;
pub mod jdk;
pub mod platform;
pub mod preflight;
pub mod utils;

pub use builder::{InstallerBuilder, ReleaseArtifact};
pub use context::{ReleaseContext, RunOptions, WorkDirs};
pub use error::{Error, Result};
pub use jdk::{OsFamily, PackagingTool};

/// Environment variable holding the code-signing identity.
///
/// Used as the certificate subject for signtool on Windows and as the
/// Developer ID identity for codesign on macOS.
pub const SIGNING_IDENTITY_ENV: &str = "FATHOM_SIGNING_IDENTITY";
