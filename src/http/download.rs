//! Single-use connections and chunked body copying for file downloads.

use crate::errors::BotError;
use futures_util::TryStreamExt;
use reqwest::Client as ReqwestClient;
use reqwest::header::{CONNECTION, HeaderMap, HeaderValue};
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::io::StreamReader;

/// A dedicated connection for one download.
///
/// Never pooled, never reused: the connection is closed after the response
/// and the socket goes away with the session. The owning client's open-session
/// count is incremented on creation and decremented exactly once on drop,
/// including when the download future is abandoned mid-flight.
#[derive(Debug)]
pub(crate) struct TempSession {
    http_client: ReqwestClient,
    open_sessions: Arc<AtomicUsize>,
}

impl TempSession {
    pub(crate) fn open(open_sessions: &Arc<AtomicUsize>) -> Result<Self, BotError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONNECTION, HeaderValue::from_static("close"));

        let http_client = ReqwestClient::builder()
            .pool_max_idle_per_host(0)
            .http1_only()
            .default_headers(headers)
            .build()
            .map_err(|e| BotError::ClientBuild(e.to_string()))?;

        let open = open_sessions.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::trace!("Opened temporary session ({} open)", open);

        Ok(Self {
            http_client,
            open_sessions: Arc::clone(open_sessions),
        })
    }

    pub(crate) fn http_client(&self) -> &ReqwestClient {
        &self.http_client
    }
}

impl Drop for TempSession {
    fn drop(&mut self) {
        let remaining = self.open_sessions.fetch_sub(1, Ordering::SeqCst) - 1;
        tracing::trace!("Released temporary session ({} open)", remaining);
    }
}

/// Adapts a response body into an `AsyncRead`.
pub(crate) fn body_reader(response: reqwest::Response) -> impl AsyncRead + Send + Unpin {
    let stream = response.bytes_stream().map_err(io::Error::other);
    StreamReader::new(Box::pin(stream))
}

/// Copies `reader` into `destination` in reads of at most `chunk_size` bytes,
/// flushing after every chunk. Returns the number of bytes copied.
pub(crate) async fn copy_in_chunks<R, W>(
    reader: &mut R,
    destination: &mut W,
    chunk_size: usize,
) -> Result<u64, BotError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buffer = vec![0u8; chunk_size];
    let mut total = 0u64;

    loop {
        let read = reader.read(&mut buffer).await.map_err(body_read_error)?;
        if read == 0 {
            break;
        }
        destination.write_all(&buffer[..read]).await?;
        destination.flush().await?;
        total += read as u64;
    }

    Ok(total)
}

/// Body read failures wrap the transport error; unwrap it so the caller sees
/// a network failure instead of a local I/O one.
fn body_read_error(error: io::Error) -> BotError {
    let kind = error.kind();
    match error.into_inner() {
        Some(inner) => match inner.downcast::<reqwest::Error>() {
            Ok(transport) => BotError::Network((*transport).without_url()),
            Err(other) => BotError::Io(io::Error::new(kind, other)),
        },
        None => BotError::Io(io::Error::from(kind)),
    }
}
