//! Installer build orchestration.
//!
//! The builder stages the distributable, delegates to the platform
//! module for the host family, and collects the finished artifacts.

pub mod artifacts;
pub mod jpackage;
pub mod staging;

pub use artifacts::ReleaseArtifact;

use crate::pipeline::context::ReleaseContext;
use crate::pipeline::error::Result;
use crate::pipeline::jdk::{OsFamily, PackagingTool};
use crate::pipeline::platform;

/// Builds the installers for one release.
#[derive(Debug)]
pub struct InstallerBuilder<'a> {
    ctx: &'a ReleaseContext,
    tool: PackagingTool,
}

impl<'a> InstallerBuilder<'a> {
    /// Creates a builder around a provisioned packaging tool.
    pub fn new(ctx: &'a ReleaseContext, tool: PackagingTool) -> Self {
        Self { ctx, tool }
    }

    /// Runs the full build: stage, package, collect, publish.
    ///
    /// Returns the collected artifacts (installers plus the OS-suffixed
    /// jar), each already checksummed into its `.SHA256` sidecar.
    pub async fn build(&self) -> Result<Vec<ReleaseArtifact>> {
        let staged = staging::stage_distributable(self.ctx).await?;

        let installers = match self.ctx.family {
            OsFamily::Windows => {
                platform::windows::build_installer(self.ctx, &self.tool).await?
            }
            OsFamily::Linux => platform::linux::build_installer(self.ctx, &self.tool).await?,
            OsFamily::MacOs => {
                platform::macos::build_installer(self.ctx, &self.tool, &staged).await?
            }
        };

        for installer in &installers {
            log::info!("Built {}", installer.display());
        }

        let collected = artifacts::collect(self.ctx, &staged).await?;
        artifacts::publish(self.ctx, &collected).await?;

        Ok(collected)
    }
}
