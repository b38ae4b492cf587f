//! Bot token validation and redaction.

use crate::errors::BotError;
use std::fmt;

/// Validates the shape of a bot token.
///
/// A token is `<digits>:<secret>`, e.g. `123456:ABC-DEF1234ghIkl-zyx57W2v1u123ew11`.
/// It must not be empty and must not contain whitespace. The secret is limited
/// to ASCII letters, digits, `_` and `-`, since it is pasted into request paths.
///
/// # Errors
///
/// Returns [`BotError::InvalidToken`] describing what is wrong with the token.
pub fn check_token(token: &str) -> Result<(), BotError> {
    if token.is_empty() {
        return Err(BotError::InvalidToken("token is empty".to_string()));
    }
    if token.chars().any(char::is_whitespace) {
        return Err(BotError::InvalidToken(
            "token must not contain whitespace".to_string(),
        ));
    }

    let Some((bot_id, secret)) = token.split_once(':') else {
        return Err(BotError::InvalidToken(
            "token is missing the ':' separator".to_string(),
        ));
    };

    if bot_id.is_empty() || !bot_id.chars().all(|c| c.is_ascii_digit()) {
        return Err(BotError::InvalidToken(
            "token must start with a numeric bot id".to_string(),
        ));
    }
    if secret.is_empty() {
        return Err(BotError::InvalidToken(
            "token secret part is empty".to_string(),
        ));
    }
    if !secret
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(BotError::InvalidToken(
            "token secret may only contain letters, digits, '_' and '-'".to_string(),
        ));
    }

    Ok(())
}

/// A validated bot token.
///
/// The secret part never shows up in `Debug` or `Display` output, so a token
/// can sit inside structs that get logged.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    /// Validates `raw` and wraps it.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::InvalidToken`] if the token fails [`check_token`].
    pub fn new(raw: impl Into<String>) -> Result<Self, BotError> {
        let raw = raw.into();
        check_token(&raw)?;
        Ok(Self(raw))
    }

    /// The numeric bot id, the part before `:`.
    #[must_use]
    pub fn bot_id(&self) -> &str {
        self.0.split_once(':').map_or("", |(id, _)| id)
    }

    /// The full token. Only used to build request URLs.
    pub(crate) fn expose(&self) -> &str {
        &self.0
    }

    /// Replaces every occurrence of the token in `text` with a redacted form.
    pub(crate) fn redact(&self, text: &str) -> String {
        text.replace(&self.0, &self.to_string())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:[REDACTED]", self.bot_id())
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token({self})")
    }
}

impl std::str::FromStr for Token {
    type Err = BotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
