//! Attachments: how media is handed to the client and put on the wire.
//!
//! A file that already lives on Telegram's servers is sent by reference, as a
//! plain form field holding its `file_id`. Anything local (an open reader or a
//! byte buffer) becomes a named part of a `multipart/form-data` body.
//!
//! # Example
//!
//! ```ignore
//! use tgbot_rs::{Client, InputFile, SendDocument};
//!
//! # async fn example(client: Client) -> Result<(), tgbot_rs::BotError> {
//! // Re-send a document we already uploaded once
//! client.send_document(SendDocument::new(42, InputFile::file_id("BQACAgIAAxk..."))).await?;
//!
//! // Upload a local file
//! let report = InputFile::from_path("report.pdf").await?;
//! client.send_document(SendDocument::new(42, report)).await?;
//! # Ok(())
//! # }
//! ```

use super::common::Method;
use crate::errors::BotError;
use crate::payload::Payload;
use bytes::Bytes;
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::Path;
use tokio::io::{AsyncRead, AsyncReadExt};

/// The seven kinds of media with a dedicated send method.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FileKind {
    Photo,
    Audio,
    Document,
    Sticker,
    Video,
    Voice,
    VideoNote,
}

impl FileKind {
    /// All kinds, in declaration order.
    pub const ALL: [FileKind; 7] = [
        FileKind::Photo,
        FileKind::Audio,
        FileKind::Document,
        FileKind::Sticker,
        FileKind::Video,
        FileKind::Voice,
        FileKind::VideoNote,
    ];

    /// Form field (and multipart part) name the attachment travels under.
    #[must_use]
    pub const fn field_name(self) -> &'static str {
        match self {
            Self::Photo => "photo",
            Self::Audio => "audio",
            Self::Document => "document",
            Self::Sticker => "sticker",
            Self::Video => "video",
            Self::Voice => "voice",
            Self::VideoNote => "video_note",
        }
    }

    /// The send method for this kind.
    #[must_use]
    pub const fn method(self) -> Method {
        match self {
            Self::Photo => Method::SendPhoto,
            Self::Audio => Method::SendAudio,
            Self::Document => Method::SendDocument,
            Self::Sticker => Method::SendSticker,
            Self::Video => Method::SendVideo,
            Self::Voice => Method::SendVoice,
            Self::VideoNote => Method::SendVideoNote,
        }
    }
}

/// Media supplied by the caller.
pub enum InputFile {
    /// A `file_id` of a file already stored by Telegram.
    FileId(String),
    /// A local stream, read to the end at send time.
    Reader {
        reader: Box<dyn AsyncRead + Send + Unpin>,
        file_name: Option<String>,
    },
    /// An in-memory buffer, sent unchanged.
    Bytes {
        data: Bytes,
        file_name: Option<String>,
    },
}

impl InputFile {
    pub fn file_id(id: impl Into<String>) -> Self {
        Self::FileId(id.into())
    }

    pub fn bytes(data: impl Into<Bytes>) -> Self {
        Self::Bytes {
            data: data.into(),
            file_name: None,
        }
    }

    pub fn reader(reader: impl AsyncRead + Send + Unpin + 'static) -> Self {
        Self::Reader {
            reader: Box::new(reader),
            file_name: None,
        }
    }

    /// Opens a local file for upload, using its file name as the upload name.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::Io`] if the file cannot be opened.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, BotError> {
        let path = path.as_ref();
        let file = tokio::fs::File::open(path).await.map_err(|e| {
            tracing::warn!("Failed to open upload file '{}': {}", path.display(), e);
            e
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        Ok(Self::Reader {
            reader: Box::new(file),
            file_name,
        })
    }

    /// Sets the file name reported in the multipart part. Ignored for `FileId`.
    #[must_use]
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        match &mut self {
            Self::FileId(_) => {}
            Self::Reader { file_name, .. } | Self::Bytes { file_name, .. } => {
                *file_name = Some(name.into());
            }
        }
        self
    }

    /// Turns the attachment into either a reference or an upload part named `field`.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::Io`] if a reader fails before reaching end of stream.
    pub async fn resolve(self, field: &str) -> Result<ResolvedFile, BotError> {
        match self {
            Self::FileId(id) => Ok(ResolvedFile::Reference(id)),
            Self::Reader {
                mut reader,
                file_name,
            } => {
                let mut buffer = Vec::new();
                reader.read_to_end(&mut buffer).await?;
                Ok(ResolvedFile::Upload(FilePart::new(
                    field,
                    file_name.unwrap_or_else(|| field.to_string()),
                    buffer,
                )))
            }
            Self::Bytes { data, file_name } => Ok(ResolvedFile::Upload(FilePart::new(
                field,
                file_name.unwrap_or_else(|| field.to_string()),
                data,
            ))),
        }
    }
}

impl fmt::Debug for InputFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileId(id) => f.debug_tuple("FileId").field(id).finish(),
            Self::Reader { file_name, .. } => f
                .debug_struct("Reader")
                .field("file_name", file_name)
                .finish_non_exhaustive(),
            Self::Bytes { data, file_name } => f
                .debug_struct("Bytes")
                .field("len", &data.len())
                .field("file_name", file_name)
                .finish(),
        }
    }
}

/// A `file_id` serializes as the id string; local media has no inline form
/// and serializes as `null`, which the payload builder drops.
impl Serialize for InputFile {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::FileId(id) => serializer.serialize_str(id),
            Self::Reader { .. } | Self::Bytes { .. } => serializer.serialize_none(),
        }
    }
}

impl From<String> for InputFile {
    fn from(id: String) -> Self {
        Self::FileId(id)
    }
}

impl From<&str> for InputFile {
    fn from(id: &str) -> Self {
        Self::FileId(id.to_string())
    }
}

impl From<Vec<u8>> for InputFile {
    fn from(data: Vec<u8>) -> Self {
        Self::bytes(data)
    }
}

impl From<Bytes> for InputFile {
    fn from(data: Bytes) -> Self {
        Self::bytes(data)
    }
}

/// One binary part of a multipart request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilePart {
    /// Form field name
    pub name: String,
    /// File name sent in the part's `Content-Disposition`
    pub file_name: String,
    pub data: Bytes,
}

impl FilePart {
    pub fn new(name: impl Into<String>, file_name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            file_name: file_name.into(),
            data: data.into(),
        }
    }
}

/// What an [`InputFile`] turns into at send time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolvedFile {
    /// Goes into the payload as a plain field.
    Reference(String),
    /// Goes into the body as a multipart part.
    Upload(FilePart),
}

/// A fully resolved media call, ready for `Client::request`.
#[derive(Clone, Debug, PartialEq)]
pub struct PreparedFile {
    pub method: Method,
    pub payload: Payload,
    pub files: Option<Vec<FilePart>>,
}

/// Resolves an attachment into the request that sends it.
///
/// The method always comes from `kind`, whether the file goes by reference or
/// by upload. `payload` should not already contain the attachment field.
///
/// # Errors
///
/// Returns [`BotError::Io`] if reading a local stream fails.
pub async fn prepare_file(
    kind: FileKind,
    file: InputFile,
    mut payload: Payload,
) -> Result<PreparedFile, BotError> {
    let field = kind.field_name();
    let files = match file.resolve(field).await? {
        ResolvedFile::Reference(id) => {
            payload.insert(field, id);
            None
        }
        ResolvedFile::Upload(part) => Some(vec![part]),
    };

    Ok(PreparedFile {
        method: kind.method(),
        payload,
        files,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_file_id_goes_into_payload() {
        let prepared = prepare_file(
            FileKind::Photo,
            InputFile::file_id("AgACAgIAAxkBAAIB"),
            Payload::new(),
        )
        .await
        .unwrap();

        assert_eq!(prepared.method, Method::SendPhoto);
        assert!(prepared.files.is_none());
        assert_eq!(prepared.payload.get("photo"), Some(&json!("AgACAgIAAxkBAAIB")));
    }

    #[tokio::test]
    async fn test_bytes_become_single_part() {
        let prepared = prepare_file(
            FileKind::Voice,
            InputFile::bytes(b"OggS\x00\x02".to_vec()),
            Payload::new(),
        )
        .await
        .unwrap();

        let files = prepared.files.unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "voice");
        assert_eq!(files[0].data.as_ref(), b"OggS\x00\x02");
        assert!(!prepared.payload.contains("voice"));
    }

    #[tokio::test]
    async fn test_reader_is_read_fully() {
        let reader = std::io::Cursor::new(b"%PDF-1.4 body".to_vec());
        let prepared = prepare_file(
            FileKind::Document,
            InputFile::reader(reader).with_file_name("report.pdf"),
            Payload::new(),
        )
        .await
        .unwrap();

        let files = prepared.files.unwrap();
        assert_eq!(files[0].name, "document");
        assert_eq!(files[0].file_name, "report.pdf");
        assert_eq!(files[0].data.as_ref(), b"%PDF-1.4 body");
    }

    #[tokio::test]
    async fn test_every_kind_routes_to_its_own_method() {
        for kind in FileKind::ALL {
            let prepared = prepare_file(kind, InputFile::bytes(vec![1, 2, 3]), Payload::new())
                .await
                .unwrap();
            assert_eq!(prepared.method, kind.method(), "wrong method for {kind:?}");
            assert_eq!(prepared.files.unwrap()[0].name, kind.field_name());
        }
    }

    #[tokio::test]
    async fn test_binary_video_note_does_not_use_send_photo() {
        let prepared = prepare_file(
            FileKind::VideoNote,
            InputFile::bytes(vec![0u8; 16]),
            Payload::new(),
        )
        .await
        .unwrap();
        assert_eq!(prepared.method, Method::SendVideoNote);
        assert_ne!(prepared.method, Method::SendPhoto);
    }

    #[tokio::test]
    async fn test_existing_payload_fields_kept() {
        let mut payload = Payload::new();
        payload.insert("chat_id", 42);
        payload.insert("caption", "look");
        let prepared = prepare_file(FileKind::Photo, InputFile::bytes(vec![9]), payload)
            .await
            .unwrap();
        assert_eq!(prepared.payload.len(), 2);
    }

    #[tokio::test]
    async fn test_default_file_name_is_field_name() {
        let resolved = InputFile::bytes(vec![1]).resolve("sticker").await.unwrap();
        match resolved {
            ResolvedFile::Upload(part) => assert_eq!(part.file_name, "sticker"),
            other => panic!("Expected upload, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_from_path_uses_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cat.jpg");
        tokio::fs::write(&path, b"\xff\xd8\xff").await.unwrap();

        let resolved = InputFile::from_path(&path)
            .await
            .unwrap()
            .resolve("photo")
            .await
            .unwrap();
        assert_eq!(
            resolved,
            ResolvedFile::Upload(FilePart::new("photo", "cat.jpg", b"\xff\xd8\xff".to_vec()))
        );
    }

    #[tokio::test]
    async fn test_from_path_missing_file() {
        let err = InputFile::from_path("/definitely/not/here.bin").await.unwrap_err();
        assert!(matches!(err, BotError::Io(_)));
    }

    #[test]
    fn test_input_file_serialization() {
        assert_eq!(
            serde_json::to_value(InputFile::file_id("abc")).unwrap(),
            json!("abc")
        );
        assert_eq!(
            serde_json::to_value(InputFile::bytes(vec![1, 2])).unwrap(),
            serde_json::Value::Null
        );
    }

    #[test]
    fn test_input_file_debug_hides_content() {
        let debug = format!("{:?}", InputFile::bytes(vec![7u8; 1024]));
        assert!(debug.contains("1024"));
        assert!(!debug.contains("7, 7"));
    }

    #[test]
    fn test_conversions() {
        assert!(matches!(InputFile::from("id"), InputFile::FileId(_)));
        assert!(matches!(InputFile::from(vec![1u8]), InputFile::Bytes { .. }));
        assert!(matches!(
            InputFile::from(Bytes::from_static(b"x")),
            InputFile::Bytes { .. }
        ));
    }

    #[test]
    fn test_with_file_name_ignored_for_file_id() {
        let file = InputFile::file_id("abc").with_file_name("x.png");
        assert!(matches!(file, InputFile::FileId(ref id) if id == "abc"));
    }
}
