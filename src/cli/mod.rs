//! Command line interface for the release pipeline.
//!
//! Wires the stages together in their fixed order: preflight, JDK
//! resolution and provisioning, installer build.

mod args;

pub use args::Args;

use crate::descriptor;
use crate::error::{CliError, ReleaseError, Result};
use crate::pipeline::context::{ReleaseContext, RunOptions, WorkDirs};
use crate::pipeline::{InstallerBuilder, OsFamily, jdk, preflight};
use std::time::Duration;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    if let Err(reason) = args.validate() {
        return Err(ReleaseError::Cli(CliError::InvalidArguments { reason }));
    }

    let descriptor = descriptor::load(&args.project_root)?;
    let family = OsFamily::host().map_err(ReleaseError::Pipeline)?;

    log::info!(
        "Releasing {} {} for {}",
        descriptor.application.name,
        descriptor.application.normalized_version(),
        family.identifier()
    );

    let dirs = WorkDirs::create(&args.build_root)?;
    let ctx = ReleaseContext {
        descriptor,
        family,
        dirs,
        jar: args.jar.clone(),
        project_root: args.project_root.clone(),
        options: RunOptions {
            assume_yes: args.assume_yes,
            notarize_attempts: args.notarize_attempts,
            notarize_interval: Duration::from_secs(args.notarize_interval_secs),
        },
    };

    preflight::run(&ctx).await?;

    let binary = jdk::resolve(ctx.family);
    let tool = jdk::provision(&ctx.dirs, &binary).await?;

    let artifacts = InstallerBuilder::new(&ctx, tool).build().await?;

    println!("\nRelease artifacts in {}:", ctx.dirs.binaries.display());
    for artifact in &artifacts {
        println!(
            "  {}  ({} bytes)\n    SHA256 {}",
            artifact
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            artifact.size,
            artifact.sha256
        );
    }

    Ok(0)
}
