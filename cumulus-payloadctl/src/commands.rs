use anyhow::{Context, Result};
use cumulus_payloads::{AnyPayload, PayloadKind};
use tracing::{debug, info};

use crate::cli::Commands;

/// Runs `command` against the payload text and returns what to print
pub fn execute(command: &Commands, kind: Option<PayloadKind>, text: &str) -> Result<String> {
    let payload = match kind {
        Some(kind) => AnyPayload::decode(kind, text),
        None => AnyPayload::decode_detect(text),
    }
    .map_err(|error| {
        debug!(code = error.code(), field = ?error.field(), "payload rejected");
        error
    })
    .context("failed to decode payload")?;

    info!(kind = %payload.kind(), "payload decoded");

    let output = match command {
        Commands::Check(_) => format!("ok: {}\n", payload.kind()),
        Commands::Normalize(_) => payload.encode().context("failed to encode payload")?,
        Commands::Show(_) => {
            let mut json = serde_json::to_string_pretty(&payload)?;
            json.push('\n');
            json
        }
    };
    Ok(output)
}
