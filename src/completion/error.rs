//! Typed errors for the completion client.
//!
//! Every variant is recoverable from the chat loop's point of view: the
//! session reports the message and keeps awaiting the next input.

use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single completion request.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Transport-level failure (DNS, refused connection, timeout).
    #[error("Failed to connect to API endpoint: {url}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The service rejected the credential (401/403).
    #[error("Authentication failed ({status}): check your API key")]
    Auth { status: StatusCode },

    /// Rate limit or quota exhausted (429).
    #[error("Rate limit or quota exceeded ({status}), try again in a moment")]
    Quota { status: StatusCode },

    /// Any other non-success response.
    #[error("API request failed with status {status}: {body}")]
    Api { status: StatusCode, body: String },

    /// A 2xx response whose body could not be decoded.
    #[error("API returned an unreadable response")]
    Decode {
        #[source]
        source: reqwest::Error,
    },

    /// A 2xx response that carried no completion text.
    #[error("API response contained no completion text")]
    EmptyResponse,
}

impl CompletionError {
    /// Classifies a non-success HTTP response.
    pub fn from_status(status: StatusCode, body: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::Auth { status },
            StatusCode::TOO_MANY_REQUESTS => Self::Quota { status },
            _ => Self::Api { status, body },
        }
    }
}
