//! Notarization submission, status polling, and stapling.
//!
//! The status CLI reports progress as free text, so the wait loop keys
//! off substring markers rather than exit codes. Polling is bounded: a
//! submission that never resolves fails the run instead of hanging it.

use crate::pipeline::context::ReleaseContext;
use crate::pipeline::error::{Error, Result};
use crate::pipeline::utils::command;
use std::path::Path;
use std::time::Duration;

/// Environment variable holding the notarization account username.
pub const APPLE_ID_ENV: &str = "FATHOM_NOTARIZATION_APPLE_ID";

/// Environment variable holding the App Store Connect provider short name.
pub const PROVIDER_ENV: &str = "FATHOM_NOTARIZATION_PROVIDER";

/// Environment variable holding the primary bundle identifier.
pub const BUNDLE_ID_ENV: &str = "FATHOM_PRIMARY_BUNDLE_ID";

/// Keychain item the notarization password is stored under.
const PASSWORD_KEYCHAIN_REF: &str = "@keychain:AC_PASSWORD";

/// Marker in the status output for an accepted submission.
pub const SUCCESS_MARKER: &str = "Status: success";

/// Marker in the status output for a rejected submission.
pub const FAILURE_MARKER: &str = "Status: invalid";

/// State of one notarization ticket.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TicketState {
    /// Upload accepted, no status check performed yet.
    Submitted,
    /// Waiting for the service to finish scanning.
    Polling,
    /// Terminal: the ticket can be stapled.
    Succeeded,
    /// Terminal: the submission was rejected.
    Failed,
}

impl TicketState {
    /// Advances the state from one status response.
    ///
    /// Ambiguous text (in-progress messages, transient service chatter)
    /// keeps the ticket polling; only the explicit markers are terminal.
    pub fn advance(self, status_text: &str) -> Self {
        match self {
            Self::Succeeded | Self::Failed => self,
            Self::Submitted | Self::Polling => {
                if status_text.contains(SUCCESS_MARKER) {
                    Self::Succeeded
                } else if status_text.contains(FAILURE_MARKER) {
                    Self::Failed
                } else {
                    Self::Polling
                }
            }
        }
    }
}

/// Submits the disk image for notarization and waits for the ticket,
/// stapling it on success. Returns without submitting when the
/// notarization account is not configured.
pub async fn run(ctx: &ReleaseContext, dmg: &Path) -> Result<()> {
    let Ok(apple_id) = std::env::var(APPLE_ID_ENV) else {
        log::warn!("{} not set, skipping notarization", APPLE_ID_ENV);
        return Ok(());
    };
    let provider = std::env::var(PROVIDER_ENV).ok();
    let bundle_id = std::env::var(BUNDLE_ID_ENV)
        .unwrap_or_else(|_| "org.fathom.desktop".to_string());

    let request_id = submit(dmg, &apple_id, provider.as_deref(), &bundle_id).await?;
    log::info!("Notarization request {} submitted", request_id);

    wait_for_ticket(
        || check_status(&request_id, &apple_id, provider.as_deref()),
        ctx.options.notarize_attempts,
        ctx.options.notarize_interval,
    )
    .await?;

    staple(dmg).await
}

/// Uploads the disk image and returns the request identifier.
async fn submit(
    dmg: &Path,
    apple_id: &str,
    provider: Option<&str>,
    bundle_id: &str,
) -> Result<String> {
    log::info!("Submitting {} for notarization", dmg.display());

    let dmg_arg = dmg.to_string_lossy();
    let mut args = vec![
        "altool",
        "--notarize-app",
        "--primary-bundle-id",
        bundle_id,
        "--username",
        apple_id,
        "--password",
        PASSWORD_KEYCHAIN_REF,
        "--file",
        &*dmg_arg,
    ];
    if let Some(provider) = provider {
        args.push("--asc-provider");
        args.push(provider);
    }

    let output = command::run_capture("xcrun", &args).await?;

    parse_request_id(&output).ok_or_else(|| {
        Error::NotarizationFailed(format!(
            "submission returned no RequestUUID: {}",
            output.trim()
        ))
    })
}

/// Queries the notarization service for the request's status text.
async fn check_status(
    request_id: &str,
    apple_id: &str,
    provider: Option<&str>,
) -> Result<String> {
    let mut args = vec![
        "altool",
        "--notarization-info",
        request_id,
        "--username",
        apple_id,
        "--password",
        PASSWORD_KEYCHAIN_REF,
    ];
    if let Some(provider) = provider {
        args.push("--asc-provider");
        args.push(provider);
    }

    command::run_capture("xcrun", &args).await
}

/// Attaches the notarization ticket to the disk image.
async fn staple(dmg: &Path) -> Result<()> {
    let dmg_arg = dmg.to_string_lossy();
    command::run_checked("xcrun", &["stapler", "staple", &*dmg_arg]).await?;
    log::info!("✓ Stapled notarization ticket onto {}", dmg.display());
    Ok(())
}

/// Polls the status source until the ticket resolves.
///
/// One status check per attempt, `interval` apart. Exhausting the bound
/// is an error: the operator re-runs rather than the pipeline hanging on
/// a stuck submission.
pub async fn wait_for_ticket<F, Fut>(
    mut check: F,
    attempts: u32,
    interval: Duration,
) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<String>>,
{
    let mut state = TicketState::Submitted;

    for attempt in 1..=attempts {
        let status_text = check().await?;
        state = state.advance(&status_text);

        match state {
            TicketState::Succeeded => {
                log::info!("✓ Notarization succeeded after {} status checks", attempt);
                return Ok(());
            }
            TicketState::Failed => {
                return Err(Error::NotarizationFailed(
                    first_relevant_line(&status_text),
                ));
            }
            TicketState::Submitted | TicketState::Polling => {
                log::info!(
                    "Notarization pending (check {}/{}), retrying in {}s",
                    attempt,
                    attempts,
                    interval.as_secs()
                );
                if attempt < attempts {
                    tokio::time::sleep(interval).await;
                }
            }
        }
    }

    Err(Error::NotarizationTimeout { attempts })
}

/// Pulls the request identifier out of the submission output.
///
/// altool prints a line of the form `RequestUUID = 1234abcd-...`.
pub fn parse_request_id(output: &str) -> Option<String> {
    output
        .lines()
        .find(|line| line.contains("RequestUUID"))
        .and_then(|line| line.rsplit(['=', ' ']).next())
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
}

fn first_relevant_line(status_text: &str) -> String {
    status_text
        .lines()
        .find(|line| line.contains("Status"))
        .unwrap_or("rejected by the notarization service")
        .trim()
        .to_string()
}
