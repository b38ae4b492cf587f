//! Envelope decoding and error context formatting.

use crate::errors::{BotError, ResponseParameters};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Maximum characters to include from a response body in error messages
const ERROR_BODY_PREVIEW_LENGTH: usize = 200;

/// The top-level JSON object every Bot API response is wrapped in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<ResponseParameters>,
}

impl ApiResponse {
    /// Splits the envelope into its result or an [`BotError::Api`].
    ///
    /// `status_code` is used as the error code when the envelope carries none.
    pub fn into_result(self, status_code: u16) -> Result<Value, BotError> {
        if self.ok {
            return Ok(self.result.unwrap_or(Value::Null));
        }
        Err(BotError::Api {
            error_code: self.error_code.unwrap_or_else(|| i64::from(status_code)),
            description: self
                .description
                .unwrap_or_else(|| format!("request failed with HTTP {status_code}")),
            parameters: self.parameters,
        })
    }
}

/// Decodes the body of a Bot API response.
///
/// # Errors
///
/// - [`BotError::Api`] if the status is not a success or the envelope has `ok: false`
/// - [`BotError::MalformedResponse`] if a success status carries no valid envelope
pub fn decode_envelope(status_code: u16, body: &str) -> Result<Value, BotError> {
    let is_success = (200..300).contains(&status_code);

    match serde_json::from_str::<ApiResponse>(body) {
        Ok(envelope) if is_success || !envelope.ok => envelope.into_result(status_code),
        // An error status with an envelope claiming success is still a failure.
        Ok(envelope) => Err(BotError::Api {
            error_code: i64::from(status_code),
            description: envelope
                .description
                .unwrap_or_else(|| truncate_for_context(body, ERROR_BODY_PREVIEW_LENGTH)),
            parameters: envelope.parameters,
        }),
        Err(e) if is_success => Err(BotError::MalformedResponse(format_json_parse_error(
            body, &e,
        ))),
        Err(_) => Err(BotError::Api {
            error_code: i64::from(status_code),
            description: truncate_for_context(body, ERROR_BODY_PREVIEW_LENGTH),
            parameters: None,
        }),
    }
}

/// Formats JSON parsing context by including a preview of the raw JSON.
pub fn format_json_parse_error(json_str: &str, error: &serde_json::Error) -> String {
    let preview = truncate_for_context(json_str, ERROR_BODY_PREVIEW_LENGTH);
    format!("JSON parse error: {} | Context: {}", error, preview)
}

/// Truncates a string to specified length, adding "..." if truncated.
///
/// Slices on a character boundary so multi-byte UTF-8 never panics.
pub(crate) fn truncate_for_context(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let truncate_at = s
            .char_indices()
            .take_while(|(i, c)| i + c.len_utf8() <= max_len)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        format!("{}...", &s[..truncate_at])
    }
}
