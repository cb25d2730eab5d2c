//! Linux package creation.
//!
//! Produces a `.deb` and a `.rpm` from the same staged input. jpackage
//! requires an empty scratch directory per invocation, so the scratch is
//! cleared and recreated between the two.

use crate::pipeline::builder::jpackage::JpackageCommand;
use crate::pipeline::context::ReleaseContext;
use crate::pipeline::error::Result;
use crate::pipeline::jdk::PackagingTool;
use crate::pipeline::utils::fs;
use std::path::PathBuf;

/// Builds the `.deb` and `.rpm` packages.
pub async fn build_installer(ctx: &ReleaseContext, tool: &PackagingTool) -> Result<Vec<PathBuf>> {
    fs::create_dir(&ctx.dirs.jpackage_temp, true).await?;
    package(ctx, tool, "deb").await?;
    let deb = super::find_installer(&ctx.dirs.binaries, "deb")?;

    fs::create_dir(&ctx.dirs.jpackage_temp, true).await?;
    package(ctx, tool, "rpm").await?;
    let rpm = super::find_installer(&ctx.dirs.binaries, "rpm")?;

    Ok(vec![deb, rpm])
}

async fn package(ctx: &ReleaseContext, tool: &PackagingTool, ty: &str) -> Result<()> {
    let mut cmd = JpackageCommand::for_application(&tool.jpackage, ctx)?.package_type(ty);

    if let Some(icon) = &ctx.descriptor.linux.icon {
        cmd = cmd.option("--icon", icon);
    }
    if let Some(maintainer) = &ctx.descriptor.linux.maintainer {
        cmd = cmd.option("--linux-deb-maintainer", maintainer);
    }
    cmd = cmd.flag("--linux-shortcut");

    cmd.run().await
}
