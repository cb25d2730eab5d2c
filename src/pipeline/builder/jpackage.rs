//! jpackage invocation assembly.
//!
//! Builds the argument list for the two jpackage modes the pipeline uses:
//! packaging the staged application input, and wrapping a pre-built
//! (signed) app image into an installer.

use crate::pipeline::context::ReleaseContext;
use crate::pipeline::error::{Context, Result};
use crate::pipeline::utils::command;
use std::ffi::OsString;
use std::path::Path;

/// One jpackage invocation under construction.
#[derive(Debug)]
pub struct JpackageCommand {
    program: OsString,
    args: Vec<OsString>,
}

impl JpackageCommand {
    /// Starts an invocation that packages the staged application input.
    ///
    /// Carries the common option set: name, version, description, vendor,
    /// copyright, entry point, and the JVM tuning flags from the release
    /// descriptor. Platform modules add the `--type` and their own options.
    pub fn for_application(jpackage: &Path, ctx: &ReleaseContext) -> Result<Self> {
        let main_jar = ctx
            .jar
            .file_name()
            .context("distributable jar path has no file name")?;

        let mut cmd = Self {
            program: jpackage.as_os_str().to_os_string(),
            args: Vec::new(),
        };

        cmd.arg_pair("--name", &ctx.descriptor.application.name);
        cmd.arg_pair("--app-version", ctx.descriptor.application.normalized_version());
        cmd.arg_pair("--description", &ctx.descriptor.application.description);
        cmd.arg_pair("--vendor", &ctx.descriptor.application.vendor);
        cmd.arg_pair("--copyright", &ctx.descriptor.application.copyright);
        cmd.arg_pair("--input", &ctx.dirs.input);
        cmd.arg_pair("--dest", &ctx.dirs.binaries);
        cmd.arg_pair("--temp", &ctx.dirs.jpackage_temp);
        cmd.arg_pair("--main-jar", main_jar);
        cmd.arg_pair("--main-class", &ctx.descriptor.application.main_class);

        for option in &ctx.descriptor.jvm.options {
            cmd.arg_pair("--java-options", option);
        }

        Ok(cmd)
    }

    /// Starts an invocation that wraps an existing app image.
    ///
    /// jpackage rejects input/main-jar options together with
    /// `--app-image`, so only naming and destination options are set.
    pub fn for_app_image(jpackage: &Path, ctx: &ReleaseContext, app_image: &Path) -> Self {
        let mut cmd = Self {
            program: jpackage.as_os_str().to_os_string(),
            args: Vec::new(),
        };

        cmd.arg_pair("--name", &ctx.descriptor.application.name);
        cmd.arg_pair("--app-version", ctx.descriptor.application.normalized_version());
        cmd.arg_pair("--app-image", app_image);
        cmd.arg_pair("--dest", &ctx.dirs.binaries);
        cmd.arg_pair("--temp", &ctx.dirs.jpackage_temp);

        cmd
    }

    /// Sets the installer type (`exe`, `dmg`, `app-image`, `deb`, `rpm`).
    pub fn package_type(mut self, ty: &str) -> Self {
        self.arg_pair("--type", ty);
        self
    }

    /// Overrides the destination directory.
    pub fn dest(mut self, dir: &Path) -> Self {
        if let Some(pos) = self.args.iter().position(|a| a == "--dest") {
            self.args[pos + 1] = dir.as_os_str().to_os_string();
        } else {
            self.arg_pair("--dest", dir);
        }
        self
    }

    /// Adds a flag/value option pair.
    pub fn option(mut self, flag: &str, value: impl AsRef<std::ffi::OsStr>) -> Self {
        self.arg_pair(flag, value);
        self
    }

    /// Adds a bare flag.
    pub fn flag(mut self, flag: &str) -> Self {
        self.args.push(OsString::from(flag));
        self
    }

    /// Returns the assembled argument list.
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Runs jpackage, failing the pipeline on non-zero exit.
    pub async fn run(self) -> Result<()> {
        log::info!("Running jpackage {:?}", summarize(&self.args));
        command::run_checked(&self.program, &self.args).await?;
        log::info!("✓ jpackage finished");
        Ok(())
    }

    fn arg_pair(&mut self, flag: &str, value: impl AsRef<std::ffi::OsStr>) {
        self.args.push(OsString::from(flag));
        self.args.push(value.as_ref().to_os_string());
    }
}

/// Flag-only view of an argument list for logging.
fn summarize(args: &[OsString]) -> Vec<&str> {
    args.iter()
        .filter_map(|a| a.to_str())
        .filter(|a| a.starts_with("--"))
        .collect()
}
