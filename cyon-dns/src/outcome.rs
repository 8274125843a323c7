//! Mutation outcome evaluator

use serde::Deserialize;
use serde_json::Value;

use crate::error::{PanelError, Result};
use crate::http_client::HttpUtils;
use crate::types::MutationKind;

/// Envelope returned by the `*-record-async` endpoints.
#[derive(Debug, Deserialize)]
struct MutationEnvelope {
    status: bool,
    #[serde(default)]
    form: Option<EnvelopeForm>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EnvelopeForm {
    #[serde(rename = "invalidParts", default)]
    invalid_parts: Option<Value>,
}

/// Classifies a mutation response.
///
/// `Ok(())` means the panel accepted the change; the caller must then
/// invalidate the domain's record cache, since the body does not contain the
/// new state. Rejections prefer `message`, then `form.invalidParts`, then the
/// generic message for `kind`.
pub(crate) fn evaluate(kind: MutationKind, endpoint: &str, status: u16, body: &str) -> Result<()> {
    HttpUtils::ensure_success(status, body, endpoint)?;

    let envelope: MutationEnvelope = HttpUtils::parse_json(body, "envelope")?;
    if envelope.status {
        log::debug!("[cyon] {kind} accepted");
        return Ok(());
    }

    let reason = non_blank(envelope.message).or_else(|| {
        envelope
            .form
            .and_then(|form| form.invalid_parts)
            .and_then(render_invalid_parts)
    });

    let generic = kind.failure_message();
    let message = match reason {
        Some(reason) => format!("{generic} Panel said: {reason}"),
        None => generic.to_string(),
    };

    log::warn!("[cyon] {kind} rejected: {message}");
    Err(PanelError::RemoteRejected {
        operation: kind,
        message,
    })
}

fn non_blank(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}

/// `invalidParts` is usually a string but may arrive structured.
fn render_invalid_parts(parts: Value) -> Option<String> {
    match parts {
        Value::Null => None,
        Value::String(s) => non_blank(Some(s)),
        Value::Array(ref items) if items.is_empty() => None,
        Value::Object(ref map) if map.is_empty() => None,
        other => Some(other.to_string()),
    }
}
