//! Preflight checks before anything is downloaded or built.
//!
//! Verifies the host JDK toolchain and walks the operator through the
//! state of the checkout. Either gate can abort the whole run.

use crate::pipeline::context::ReleaseContext;
use crate::pipeline::error::{Error, Result};
use crate::pipeline::utils::{command, prompt};

/// Runs all preflight checks for the given context.
pub async fn run(ctx: &ReleaseContext) -> Result<()> {
    verify_toolchain(ctx.descriptor.toolchain.required_major).await?;
    review_checkout(ctx).await?;
    Ok(())
}

/// Checks that `javac` reports the required major version.
pub async fn verify_toolchain(required_major: u32) -> Result<()> {
    let reported = command::run_capture("javac", &["-version"]).await?;

    let found = parse_javac_major(&reported).ok_or_else(|| Error::ToolchainMismatch {
        required: required_major,
        found: reported.trim().to_string(),
    })?;

    if found != required_major {
        return Err(Error::ToolchainMismatch {
            required: required_major,
            found: reported.trim().to_string(),
        });
    }

    log::info!("✓ JDK {} toolchain present", required_major);
    Ok(())
}

/// Shows recent history and working-tree status, gated on confirmation.
async fn review_checkout(ctx: &ReleaseContext) -> Result<()> {
    let assume_yes = ctx.options.assume_yes;

    let recent =
        command::run_capture_in(&ctx.project_root, "git", &["log", "-5", "--oneline"]).await?;
    println!("Latest commits:\n{}", recent.trim_end());

    if !prompt::confirm("Release from these commits?", assume_yes)? {
        return Err(Error::OperatorAborted("commit review".to_string()));
    }

    let status =
        command::run_capture_in(&ctx.project_root, "git", &["status", "--short"]).await?;
    if status.trim().is_empty() {
        println!("Working tree clean.");
    } else {
        println!("Working tree changes:\n{}", status.trim_end());
    }

    if !prompt::confirm("Continue with this working tree?", assume_yes)? {
        return Err(Error::OperatorAborted("working tree review".to_string()));
    }

    Ok(())
}

/// Extracts the major version from `javac -version` output.
///
/// Accepts `javac 21.0.5`, `javac 21`, and the JDK 8 style `javac 1.8.0_402`
/// (mapped to 8).
fn parse_javac_major(text: &str) -> Option<u32> {
    let version = text.split_whitespace().find(|w| {
        w.chars().next().is_some_and(|c| c.is_ascii_digit())
    })?;

    let mut parts = version.split('.');
    let first: u32 = parts.next()?.parse().ok()?;

    if first == 1 {
        // Legacy 1.x numbering
        parts.next()?.parse().ok()
    } else {
        Some(first)
    }
}
