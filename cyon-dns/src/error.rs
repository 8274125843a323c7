use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::MutationKind;

/// Which half of the two-step login produced an authentication failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthStage {
    /// `POST /auth/index/dologin-async`
    Login,
    /// `POST /` against the root app.
    Validate,
}

impl std::fmt::Display for AuthStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Login => write!(f, "login"),
            Self::Validate => write!(f, "session validation"),
        }
    }
}

/// Unified error type for all panel operations.
///
/// Every failure surfaces as one of these variants; nothing is retried and
/// nothing is logged-and-ignored. The variant tells the caller what to do next:
///
/// - [`AuthenticationFailed`](Self::AuthenticationFailed) — fix credentials
/// - [`ScopeSwitchFailed`](Self::ScopeSwitchFailed) — the remote session is in an
///   unknown scope, do not continue with listing/mutation
/// - [`ParseFailed`](Self::ParseFailed) — the panel changed its markup or payload shape
/// - [`ValidationFailed`](Self::ValidationFailed) — fix the input (or re-list to obtain a hash)
/// - [`RemoteRejected`](Self::RemoteRejected) — the panel refused the mutation; a stale
///   record hash lands here, so re-list before trying again
/// - [`NetworkError`](Self::NetworkError), [`Timeout`](Self::Timeout),
///   [`HttpStatus`](Self::HttpStatus) — transport failures
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum PanelError {
    /// Login or session validation returned a non-success status.
    #[error("Authentication failed during {stage} (HTTP {status}): {detail}")]
    AuthenticationFailed {
        /// Which request of the login sequence failed.
        stage: AuthStage,
        /// HTTP status returned by the panel.
        status: u16,
        /// Truncated response body.
        detail: String,
    },

    /// The domain-context switch returned a non-success status.
    ///
    /// The active-domain marker is left unchanged.
    #[error("Could not switch panel scope to '{domain}' (HTTP {status}): {detail}")]
    ScopeSwitchFailed {
        /// Domain that was being scoped.
        domain: String,
        /// HTTP status returned by the panel.
        status: u16,
        /// Truncated response body.
        detail: String,
    },

    /// A listing payload could not be decoded.
    #[error("Parse error{}: {detail}", location(.row, .field))]
    ParseFailed {
        /// Zero-based row index, when the failure belongs to a specific row.
        row: Option<usize>,
        /// Offending field (`name`, `ttl`, `type`, `value`, `hash`, `envelope`, ...).
        field: String,
        /// What was wrong with it.
        detail: String,
    },

    /// A local precondition was violated before any request was sent.
    #[error("Invalid '{field}': {detail}")]
    ValidationFailed {
        /// Name of the invalid input.
        field: String,
        /// Description of what's wrong.
        detail: String,
    },

    /// The mutation reached the panel but was refused (`status = false`).
    #[error("{message}")]
    RemoteRejected {
        /// Which mutation was refused.
        operation: MutationKind,
        /// Human-readable reason, already prefixed with the operation message.
        message: String,
    },

    /// A network-level error occurred (DNS resolution failure, connection refused, etc.).
    #[error("Network error: {detail}")]
    NetworkError {
        /// Error details.
        detail: String,
    },

    /// The request (or a caller-supplied deadline) timed out.
    #[error("Request timeout: {detail}")]
    Timeout {
        /// Error details.
        detail: String,
    },

    /// A request outside the login/scope sequence returned a non-success status.
    #[error("HTTP {status} from {endpoint}: {body}")]
    HttpStatus {
        /// Endpoint path that was called.
        endpoint: String,
        /// HTTP status code.
        status: u16,
        /// Truncated response body.
        body: String,
    },

    /// A [`Domain`](crate::Domain) handle was used after its client was dropped.
    #[error("Session for domain '{domain}' is no longer alive")]
    SessionClosed {
        /// Name of the orphaned domain handle.
        domain: String,
    },
}

fn location(row: &Option<usize>, field: &str) -> String {
    match row {
        Some(row) => format!(" in row {row}, field '{field}'"),
        None => format!(" in field '{field}'"),
    }
}

impl PanelError {
    /// Log-level classification.
    ///
    /// Returns `true` for outcomes a caller can remedy (`warn` level) and `false`
    /// for failures that point at the transport or the panel itself (`error` level).
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::AuthenticationFailed { .. }
                | Self::ValidationFailed { .. }
                | Self::RemoteRejected { .. }
        )
    }

    /// Whether the failure happened below the panel protocol (network, timeout, HTTP status).
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::NetworkError { .. } | Self::Timeout { .. } | Self::HttpStatus { .. }
        )
    }

    pub(crate) fn parse(row: Option<usize>, field: &str, detail: impl Into<String>) -> Self {
        Self::ParseFailed {
            row,
            field: field.to_string(),
            detail: detail.into(),
        }
    }

    pub(crate) fn validation(field: &str, detail: impl Into<String>) -> Self {
        Self::ValidationFailed {
            field: field.to_string(),
            detail: detail.into(),
        }
    }
}

/// Convenience type alias for `Result<T, PanelError>`.
pub type Result<T> = std::result::Result<T, PanelError>;
