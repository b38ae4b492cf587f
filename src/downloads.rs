//! Downloading files stored on Telegram's servers.
//!
//! Every download runs over its own [`TempSession`]: a fresh, non-pooled
//! connection that is closed when the download ends, however it ends.

use crate::client::Client;
use crate::errors::BotError;
use crate::http::common::construct_file_url;
use crate::http::download::{TempSession, body_reader, copy_in_chunks};
use crate::http::error_helpers::decode_envelope;
use crate::http::loud_wire;
use std::io::{Cursor, SeekFrom};
use std::path::Path;
use std::time::Duration;
use tokio::io::{AsyncSeek, AsyncSeekExt, AsyncWrite};

/// Default bound on a whole download.
pub const DEFAULT_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Default size of a single body read.
pub const DEFAULT_CHUNK_SIZE: usize = 65536;

/// Per-download settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DownloadOptions {
    /// Upper bound on the whole download, connection included.
    pub timeout: Duration,
    /// Maximum number of bytes read from the body before each write.
    pub chunk_size: usize,
    /// Rewind the destination to its start once the body is written.
    pub seek: bool,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_DOWNLOAD_TIMEOUT,
            chunk_size: DEFAULT_CHUNK_SIZE,
            seek: true,
        }
    }
}

impl DownloadOptions {
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub const fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    #[must_use]
    pub const fn with_seek(mut self, seek: bool) -> Self {
        self.seek = seek;
        self
    }
}

impl Client {
    /// Downloads `file_path` into memory.
    ///
    /// `file_path` is the value of `File.file_path` returned by `getFile`.
    ///
    /// # Errors
    ///
    /// See [`Client::download_file_to`].
    pub async fn download_file(
        &self,
        file_path: &str,
        options: DownloadOptions,
    ) -> Result<Cursor<Vec<u8>>, BotError> {
        self.download_file_to(file_path, Cursor::new(Vec::new()), options)
            .await
    }

    /// Downloads `file_path` into a local file, creating or truncating it.
    ///
    /// # Errors
    ///
    /// See [`Client::download_file_to`]. Failing to create the file is [`BotError::Io`].
    pub async fn download_file_to_path(
        &self,
        file_path: &str,
        local_path: impl AsRef<Path>,
        options: DownloadOptions,
    ) -> Result<tokio::fs::File, BotError> {
        let local_path = local_path.as_ref();
        let file = tokio::fs::File::create(local_path).await.map_err(|e| {
            tracing::warn!("Failed to create '{}': {}", local_path.display(), e);
            e
        })?;
        self.download_file_to(file_path, file, options).await
    }

    /// Downloads `file_path` into `destination` and hands it back.
    ///
    /// The body is copied in reads of at most `options.chunk_size` bytes,
    /// flushing after each one. With `options.seek` the destination is rewound
    /// to its start afterwards. A failed download leaves whatever was already
    /// written in place.
    ///
    /// # Errors
    ///
    /// - [`BotError::DownloadTimeout`] if the download outlives `options.timeout`
    /// - [`BotError::Api`] if the file server answers with an error status
    /// - [`BotError::Network`] on any other transport failure
    /// - [`BotError::Io`] if writing or seeking the destination fails
    /// - [`BotError::InvalidInput`] if `options.chunk_size` is zero
    pub async fn download_file_to<W>(
        &self,
        file_path: &str,
        mut destination: W,
        options: DownloadOptions,
    ) -> Result<W, BotError>
    where
        W: AsyncWrite + AsyncSeek + Unpin,
    {
        if options.chunk_size == 0 {
            return Err(BotError::InvalidInput(
                "chunk_size must be at least 1".to_string(),
            ));
        }

        let url = construct_file_url(&self.api_url, &self.token, file_path);
        let session = TempSession::open(&self.temp_sessions)?;

        tracing::debug!(
            "Downloading {} (chunk_size={}, timeout={:?})",
            file_path,
            options.chunk_size,
            options.timeout
        );

        let transfer = self.transfer(&session, &url, &mut destination, options);
        let total = match tokio::time::timeout(options.timeout, transfer).await {
            Ok(result) => result.map_err(|e| timeout_or(e, options.timeout))?,
            Err(_) => {
                tracing::warn!("Download of {} timed out after {:?}", file_path, options.timeout);
                return Err(BotError::DownloadTimeout(options.timeout));
            }
        };

        drop(session);

        if options.seek {
            destination.seek(SeekFrom::Start(0)).await?;
        }

        tracing::debug!("Downloaded {} ({} bytes)", file_path, total);

        Ok(destination)
    }

    /// Resolves `file_id` with `getFile` and downloads the result into memory.
    ///
    /// # Errors
    ///
    /// Everything [`Client::download_file`] returns, plus [`BotError::MalformedResponse`]
    /// if `getFile` answers without a `file_path` (the file is not downloadable).
    pub async fn download_file_by_id(
        &self,
        file_id: &str,
        options: DownloadOptions,
    ) -> Result<Cursor<Vec<u8>>, BotError> {
        let file = self.get_file(file_id).await?;
        let file_path = file
            .get("file_path")
            .and_then(|path| path.as_str())
            .ok_or_else(|| {
                BotError::MalformedResponse(format!("getFile result has no file_path: {file}"))
            })?;
        self.download_file(file_path, options).await
    }

    async fn transfer<W>(
        &self,
        session: &TempSession,
        url: &str,
        destination: &mut W,
        options: DownloadOptions,
    ) -> Result<u64, BotError>
    where
        W: AsyncWrite + Unpin,
    {
        let request_id = loud_wire::next_request_id();
        loud_wire::log_download_start(request_id, &self.token.redact(url), options.chunk_size);

        let response = session
            .http_client()
            .get(url)
            .timeout(options.timeout)
            .send()
            .await
            .map_err(|e| BotError::Network(e.without_url()))?;

        let status = response.status();
        loud_wire::log_response_status(request_id, status.as_u16());

        if !status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| BotError::Network(e.without_url()))?;
            loud_wire::log_response_body(request_id, &body);
            let error = decode_envelope(status.as_u16(), &body)
                .err()
                .unwrap_or_else(|| BotError::Api {
                    error_code: i64::from(status.as_u16()),
                    description: format!("unexpected status {status}"),
                    parameters: None,
                });
            tracing::warn!("Download failed: {}", error);
            return Err(error);
        }

        let mut reader = body_reader(response);
        let total = copy_in_chunks(&mut reader, destination, options.chunk_size).await?;
        loud_wire::log_download_complete(request_id, total);

        Ok(total)
    }
}

/// reqwest reports its own per-request timeout as a network error.
fn timeout_or(error: BotError, timeout: Duration) -> BotError {
    match error {
        BotError::Network(ref e) if e.is_timeout() => BotError::DownloadTimeout(timeout),
        other => other,
    }
}
