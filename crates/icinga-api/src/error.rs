use thiserror::Error;

/// The kind of operation an error is attributed to.
///
/// Rendered lowercase (`create`, `update`, ...) because it is the first word
/// of every reconciliation and API failure message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum OperationKind {
    Create,
    Update,
    Delete,
    Get,
    List,
}

/// Top-level error type for the `icinga-api` crate.
///
/// Covers the live client (transport, reconciliation, decoding) and the mock
/// client (plain key-existence checks). The two clients do not produce the
/// same message shapes for the same logical failure; match on variants or use
/// the helper predicates instead of comparing strings across implementations.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, TLS, timeout).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS backend or certificate error while building the transport.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Bulk mutation endpoints ─────────────────────────────────────
    /// A create/update/action response carried failing items and/or a
    /// non-success transport status.
    ///
    /// `detail` is either the accumulated per-item report, or
    /// `"<status text> - <report>"` when the transport status was >= 400.
    /// The rendered message is a stable contract.
    #[error("{kind} {target} : {detail}")]
    Reconciliation {
        kind: OperationKind,
        target: String,
        status: u16,
        detail: String,
    },

    // ── Read / delete endpoints ─────────────────────────────────────
    /// Non-success status on a read, list or delete request.
    #[error("{kind} {target} : {message}")]
    Api {
        kind: OperationKind,
        target: String,
        status: u16,
        message: String,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Object existence ────────────────────────────────────────────
    #[error("{kind} {name} not found")]
    NotFound { kind: &'static str, name: String },

    #[error("{kind} {name} already exists")]
    AlreadyExists { kind: &'static str, name: String },

    /// Object names are path segments and must not be empty.
    #[error("{kind} name must not be empty")]
    InvalidName { kind: &'static str },
}

impl Error {
    /// Returns `true` if this is a "not found" error, from either client.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Api { status, .. } => *status == 404,
            _ => false,
        }
    }

    /// Returns `true` if this is a transient error worth retrying.
    ///
    /// Nothing in this crate retries; the predicate is for callers.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Reconciliation { status, .. } | Self::Api { status, .. } => {
                matches!(status, 502..=504)
            }
            _ => false,
        }
    }

    /// The HTTP status attached to this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::Reconciliation { status, .. } | Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
