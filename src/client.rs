use crate::errors::BotError;
use crate::http::common::{DEFAULT_API_URL, Method, construct_method_url};
use crate::http::error_helpers::decode_envelope;
use crate::http::files::{FileKind, FilePart, InputFile, prepare_file};
use crate::http::loud_wire;
use crate::payload::Payload;
use crate::token::Token;
use reqwest::Client as ReqwestClient;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Semaphore;

/// Default cap on simultaneous pooled connections.
pub const DEFAULT_CONNECTIONS_LIMIT: usize = 10;

/// Environment variable read by [`Client::from_env`] for the bot token.
pub const TOKEN_ENV_VAR: &str = "TELEGRAM_BOT_TOKEN";

/// Environment variable read by [`Client::from_env`] for an alternative API host.
pub const API_URL_ENV_VAR: &str = "TELEGRAM_API_URL";

/// The main client for the Telegram Bot API.
///
/// Cloning is cheap: clones share the connection pool, the concurrency limit
/// and the temporary-session count. All connections close once the last
/// clone is dropped.
#[derive(Debug, Clone)]
pub struct Client {
    pub(crate) token: Token,
    pub(crate) api_url: String,
    #[allow(clippy::struct_field_names)]
    pub(crate) http_client: ReqwestClient,
    /// One permit per pooled connection.
    pool_permits: Arc<Semaphore>,
    connections_limit: usize,
    pub(crate) temp_sessions: Arc<AtomicUsize>,
}

/// Builder for `Client` instances.
///
/// # Example
///
/// ```
/// use tgbot_rs::Client;
/// use std::time::Duration;
///
/// let client = Client::builder("123456:ABC-DEF1234ghIkl")
///     .connections_limit(20)
///     .timeout(Duration::from_secs(60))
///     .build()
///     .unwrap();
/// assert_eq!(client.connections_limit(), 20);
/// ```
#[derive(Debug)]
pub struct ClientBuilder {
    token: String,
    api_url: Option<String>,
    connections_limit: usize,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
}

impl ClientBuilder {
    /// Sets the API host, e.g. a self-hosted Bot API server or a test double.
    ///
    /// Defaults to `https://api.telegram.org`.
    #[must_use]
    pub fn api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = Some(api_url.into());
        self
    }

    /// Sets the maximum number of simultaneous pooled connections.
    ///
    /// Requests beyond this limit wait for a free connection. Defaults to 10.
    #[must_use]
    pub const fn connections_limit(mut self, limit: usize) -> Self {
        self.connections_limit = limit;
        self
    }

    /// Sets the total timeout of a single API call.
    ///
    /// Long polling with `getUpdates` needs this to exceed the polling timeout.
    /// If not set, uses reqwest's default (no timeout).
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout for pooled connections.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Builds the `Client`.
    ///
    /// # Errors
    ///
    /// - [`BotError::InvalidToken`] if the token is malformed
    /// - [`BotError::InvalidInput`] if the connection limit is zero
    /// - [`BotError::ClientBuild`] if the HTTP client cannot be created
    pub fn build(self) -> Result<Client, BotError> {
        let token = Token::new(self.token)?;

        if self.connections_limit == 0 {
            return Err(BotError::InvalidInput(
                "connections_limit must be at least 1".to_string(),
            ));
        }

        let mut builder = ReqwestClient::builder().pool_max_idle_per_host(self.connections_limit);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        if let Some(connect_timeout) = self.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }

        let http_client = builder
            .build()
            .map_err(|e| BotError::ClientBuild(e.to_string()))?;

        let api_url = self
            .api_url
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        tracing::debug!(
            "Built client for bot {} (api_url={}, connections_limit={})",
            token.bot_id(),
            api_url,
            self.connections_limit
        );

        Ok(Client {
            token,
            api_url,
            http_client,
            pool_permits: Arc::new(Semaphore::new(self.connections_limit)),
            connections_limit: self.connections_limit,
            temp_sessions: Arc::new(AtomicUsize::new(0)),
        })
    }
}

impl Client {
    /// Creates a new builder for `Client` instances.
    ///
    /// # Arguments
    ///
    /// * `token` - Bot token as issued by @BotFather.
    #[must_use]
    pub fn builder(token: impl Into<String>) -> ClientBuilder {
        ClientBuilder {
            token: token.into(),
            api_url: None,
            connections_limit: DEFAULT_CONNECTIONS_LIMIT,
            timeout: None,
            connect_timeout: None,
        }
    }

    /// Creates a client with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::InvalidToken`] if the token is malformed.
    pub fn new(token: impl Into<String>) -> Result<Self, BotError> {
        Self::builder(token).build()
    }

    /// Creates a client from `TELEGRAM_BOT_TOKEN` and, if set, `TELEGRAM_API_URL`.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::InvalidToken`] if the token variable is missing or malformed.
    pub fn from_env() -> Result<Self, BotError> {
        let token = std::env::var(TOKEN_ENV_VAR)
            .map_err(|_| BotError::InvalidToken(format!("{TOKEN_ENV_VAR} is not set")))?;

        let mut builder = Self::builder(token);
        if let Ok(api_url) = std::env::var(API_URL_ENV_VAR) {
            builder = builder.api_url(api_url);
        }
        builder.build()
    }

    /// The validated token. Its `Display` form is redacted.
    #[must_use]
    pub fn token(&self) -> &Token {
        &self.token
    }

    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    #[must_use]
    pub fn connections_limit(&self) -> usize {
        self.connections_limit
    }

    /// Number of temporary download sessions currently open.
    #[must_use]
    pub fn open_temp_sessions(&self) -> usize {
        self.temp_sessions.load(Ordering::SeqCst)
    }

    /// Calls a Bot API method and returns the `result` of its envelope.
    ///
    /// Without `files`, `data` is sent as `application/x-www-form-urlencoded`.
    /// With at least one file, the body is `multipart/form-data` carrying every
    /// payload field as a text part and every file as a binary part.
    ///
    /// # Errors
    ///
    /// - [`BotError::Api`] if the server rejects the call; the description is passed through verbatim
    /// - [`BotError::Network`] on connection, DNS or timeout failures (never retried)
    /// - [`BotError::MalformedResponse`] if a successful response is not a valid envelope
    pub async fn request(
        &self,
        method: Method,
        data: Option<Payload>,
        files: Option<Vec<FilePart>>,
    ) -> Result<Value, BotError> {
        let url = construct_method_url(&self.api_url, &self.token, method);
        let data = data.unwrap_or_default();
        let files = files.unwrap_or_default();

        tracing::debug!(
            "Calling {}: {} fields, {} files",
            method,
            data.len(),
            files.len()
        );

        let request_id = loud_wire::next_request_id();
        loud_wire::log_request(request_id, &self.token.redact(&url), Some(&data.to_json()));

        let request = self.http_client.post(&url);
        let request = if files.is_empty() {
            request.form(&data.to_form_fields())
        } else {
            request.multipart(multipart_form(&data, files, request_id))
        };

        // The client owns the semaphore and never closes it, so acquiring
        // only fails if that changes.
        let _permit = self
            .pool_permits
            .acquire()
            .await
            .map_err(|_| BotError::PoolClosed)?;

        let response = request.send().await.map_err(|e| {
            let e = e.without_url();
            tracing::warn!("{} failed to send: {}", method, e);
            BotError::Network(e)
        })?;

        let status = response.status().as_u16();
        loud_wire::log_response_status(request_id, status);

        let body = response
            .text()
            .await
            .map_err(|e| BotError::Network(e.without_url()))?;
        loud_wire::log_response_body(request_id, &body);

        let result = decode_envelope(status, &body).inspect_err(|e| {
            tracing::warn!("{} failed: {}", method, e);
        })?;

        tracing::debug!("{} succeeded", method);

        Ok(result)
    }

    /// Sends media of the given kind to its send method.
    ///
    /// A `file_id` goes into the payload under the kind's field name; a reader
    /// or byte buffer is uploaded as a single multipart part of that name.
    /// Either way exactly one request is made, to the kind's own method.
    ///
    /// # Errors
    ///
    /// Everything [`Client::request`] returns, plus [`BotError::Io`] if a reader fails.
    pub async fn send_file(
        &self,
        kind: FileKind,
        file: InputFile,
        payload: Payload,
    ) -> Result<Value, BotError> {
        let prepared = prepare_file(kind, file, payload).await?;
        self.request(prepared.method, Some(prepared.payload), prepared.files)
            .await
    }
}

fn multipart_form(data: &Payload, files: Vec<FilePart>, request_id: usize) -> Form {
    let form = data
        .to_form_fields()
        .into_iter()
        .fold(Form::new(), |form, (name, value)| form.text(name, value));

    files.into_iter().fold(form, |form, file| {
        loud_wire::log_upload_start(request_id, &file.name, &file.file_name, file.data.len());
        let length = file.data.len() as u64;
        let part = Part::stream_with_length(file.data, length).file_name(file.file_name);
        form.part(file.name, part)
    })
}
