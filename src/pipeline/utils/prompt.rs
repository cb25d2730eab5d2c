//! Interactive confirmation gates.

use crate::pipeline::error::{Error, Result};
use inquire::Confirm;

/// Asks the operator a yes/no question.
///
/// With `assume_yes` set (non-interactive runs) every gate answers yes
/// without touching the terminal. The default answer is no: pressing
/// enter at a gate aborts rather than ships.
pub fn confirm(message: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        log::debug!("Auto-confirming: {}", message);
        return Ok(true);
    }

    Confirm::new(message)
        .with_default(false)
        .prompt()
        .map_err(|e| Error::GenericError(format!("Prompt failed: {}", e)))
}
