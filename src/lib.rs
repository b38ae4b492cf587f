//! An async client for the Telegram Bot API.
//!
//! [`Client`] holds a validated bot token and a bounded connection pool. Each
//! Bot API method has a method on the client taking a parameter struct from
//! [`params`]; all of them go through [`Client::request`], which posts the
//! payload and unwraps the JSON response envelope.
//!
//! Media can be sent by `file_id` or uploaded from a reader or byte buffer
//! (see [`InputFile`]). Files are downloaded in chunks over dedicated,
//! non-pooled connections (see [`Client::download_file`]).
//!
//! # Example
//!
//! ```no_run
//! use tgbot_rs::{Client, SendMessage};
//!
//! # async fn run() -> Result<(), tgbot_rs::BotError> {
//! let client = Client::from_env()?;
//! let me = client.get_me().await?;
//! println!("Logged in as @{}", me["username"]);
//!
//! client.send_message(SendMessage::new(42, "Hello!")).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Debugging
//!
//! Set `LOUD_WIRE=1` to print every request and response to stderr. The
//! token never appears in logs or error messages.

mod client;
mod downloads;
mod errors;
mod http;
mod methods;
pub mod params;
mod payload;
mod token;


pub use client::{
    API_URL_ENV_VAR, Client, ClientBuilder, DEFAULT_CONNECTIONS_LIMIT, TOKEN_ENV_VAR,
};
pub use downloads::{DEFAULT_CHUNK_SIZE, DEFAULT_DOWNLOAD_TIMEOUT, DownloadOptions};
pub use errors::{BotError, ResponseParameters};
pub use http::common::{DEFAULT_API_URL, Method};
pub use http::error_helpers::{ApiResponse, decode_envelope};
pub use http::files::{FileKind, FilePart, InputFile, PreparedFile, ResolvedFile, prepare_file};
pub use params::{
    AnswerCallbackQuery, AnswerInlineQuery, AnswerPreCheckoutQuery, AnswerShippingQuery,
    ChatAction, ChatId, EditMessageCaption, EditMessageReplyMarkup, EditMessageText,
    ForwardMessage, GetGameHighScores, GetUpdates, GetUserProfilePhotos, LabeledPrice, ParseMode,
    SendAudio, SendContact, SendDocument, SendGame, SendInvoice, SendLocation, SendMessage,
    SendPhoto, SendSticker, SendVenue, SendVideo, SendVideoNote, SendVoice, SetGameScore,
    SetWebhook,
};
pub use payload::{Payload, generate_payload};
pub use token::{Token, check_token};
