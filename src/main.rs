//! Fathom release pipeline - builds the platform installers.
//!
//! One invocation downloads a jpackage-capable JDK, packages the
//! distributable jar into the host platform's installer format, and runs
//! the platform signing and notarization tools.

use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Run CLI and get exit code
    let exit_code = match fathom_release::cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}
