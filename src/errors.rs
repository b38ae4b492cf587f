use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Extra information the Bot API attaches to some failed calls.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseParameters {
    /// The group has been migrated to a supergroup with this identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub migrate_to_chat_id: Option<i64>,
    /// Seconds to wait before the request can be repeated after flood control.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
}

/// Defines errors that can occur when talking to the Bot API.
///
/// # Example: Handling API Errors
///
/// ```ignore
/// match client.send_message(params).await {
///     Err(BotError::Api { error_code: 403, description, .. }) => {
///         tracing::warn!("Bot was blocked: {}", description);
///     }
///     Err(e) if e.is_retryable() => {
///         tracing::warn!("Transient failure: {}", e);
///     }
///     // ...
/// }
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BotError {
    /// The token does not look like `<digits>:<secret>`.
    #[error("Invalid bot token: {0}")]
    InvalidToken(String),
    /// The Bot API rejected the call.
    ///
    /// `description` is exactly what the server sent, so callers can match on it.
    #[error("API error {error_code}: {description}")]
    Api {
        /// Error code from the envelope, or the HTTP status when the body had none
        error_code: i64,
        /// Human-readable description from the envelope
        description: String,
        /// Optional flood-control and migration hints
        parameters: Option<ResponseParameters>,
    },
    /// Transport-level failure: DNS, connect, reset, request timeout.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// A file download did not finish within its deadline.
    #[error("Download timed out after {0:?}")]
    DownloadTimeout(Duration),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
    /// Reading an upload source or writing a download destination failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A successful HTTP response whose body is not a valid envelope.
    #[error("Malformed API response: {0}")]
    MalformedResponse(String),
    /// Failed to build the HTTP client.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// The client's connection pool stopped handing out connections.
    #[error("Connection pool has been shut down")]
    PoolClosed,
}

impl BotError {
    /// Returns `true` if this error is likely transient and the request may succeed on retry.
    ///
    /// This only classifies the failure. The client itself never retries.
    ///
    /// ```rust
    /// use tgbot_rs::BotError;
    /// use std::time::Duration;
    ///
    /// let flood = BotError::Api {
    ///     error_code: 429,
    ///     description: "Too Many Requests: retry after 5".to_string(),
    ///     parameters: None,
    /// };
    /// assert!(flood.is_retryable());
    ///
    /// let bad_request = BotError::Api {
    ///     error_code: 400,
    ///     description: "Bad Request: chat not found".to_string(),
    ///     parameters: None,
    /// };
    /// assert!(!bad_request.is_retryable());
    ///
    /// assert!(BotError::DownloadTimeout(Duration::from_secs(30)).is_retryable());
    /// ```
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            BotError::Network(_) | BotError::DownloadTimeout(_) => true,
            BotError::Api { error_code, .. } => *error_code == 429 || *error_code >= 500,
            BotError::InvalidToken(_)
            | BotError::Json(_)
            | BotError::Io(_)
            | BotError::MalformedResponse(_)
            | BotError::ClientBuild(_)
            | BotError::InvalidInput(_)
            | BotError::PoolClosed => false,
        }
    }

    /// Seconds the server asked us to wait, if this is a flood-control error.
    #[must_use]
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            BotError::Api {
                parameters: Some(params),
                ..
            } => params.retry_after.map(Duration::from_secs),
            _ => None,
        }
    }

    /// The supergroup a migrated group now lives in, if the server reported one.
    #[must_use]
    pub fn migrate_to_chat_id(&self) -> Option<i64> {
        match self {
            BotError::Api {
                parameters: Some(params),
                ..
            } => params.migrate_to_chat_id,
            _ => None,
        }
    }
}
