//! Error types for the clients API.
//!
//! # Design
//! Callers branch on the variant, never on message text. Every non-2xx
//! response becomes `Request`, including 404, with the status kept so
//! `is_not_found` can tell the not-found class apart. A fired cancellation
//! token is always `Cancelled`, even if the server may already have acted.

use thiserror::Error;

/// Boxed error returned by [`crate::Transport`] implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned by every clients API operation.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a non-2xx status.
    ///
    /// `body` is only captured for modify, where the server's validation
    /// message is returned verbatim.
    #[error("error connecting to {url}: {reason}{}", body_suffix(.body))]
    Request {
        url: String,
        status: u16,
        reason: String,
        body: Option<String>,
    },

    /// The caller's cancellation token fired before the exchange completed.
    #[error("operation cancelled")]
    Cancelled,

    /// A payload could not be encoded, or a response body did not match the
    /// expected schema.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// No HTTP response was received at all.
    #[error("transport failed for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: BoxError,
    },

    /// Modify and unregister address a client by id, which was empty.
    #[error("client id is required")]
    MissingClientId,

    /// The client was closed and its transport released.
    #[error("client has been closed")]
    Closed,
}

impl ClientError {
    /// Returns the HTTP status for `Request` failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Request { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ClientError::Cancelled)
    }
}

fn body_suffix(body: &Option<String>) -> String {
    body.as_deref().map(|b| format!(" / {b}")).unwrap_or_default()
}
