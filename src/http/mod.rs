//! HTTP layer for Bot API communication.
//!
//! URL construction, envelope decoding, attachments, download plumbing and
//! wire logging. `Client` in the crate root is the only caller.

pub(crate) mod common;
pub(crate) mod download;
pub(crate) mod error_helpers;
pub(crate) mod files;
pub(crate) mod loud_wire;
