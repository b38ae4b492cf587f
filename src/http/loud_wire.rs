//! Wire-level debugging via LOUD_WIRE environment variable.
//!
//! When `LOUD_WIRE` is set to any value, prints outgoing payloads and incoming
//! envelopes to stderr with pretty formatting and colors.
//!
//! # Usage
//!
//! ```bash
//! LOUD_WIRE=1 cargo test --test transport_tests
//! ```
//!
//! # Output Format
//!
//! - Green `>>>` for outgoing requests and uploads
//! - Red `<<<` for incoming responses
//! - Blue for file downloads
//! - Timestamps and request IDs for correlation
//!
//! URLs are expected to arrive here already redacted. Long string values are
//! truncated to keep output readable.

use colored::Colorize;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Request ID counter for correlating requests with responses
static REQUEST_COUNTER: AtomicUsize = AtomicUsize::new(1);

/// Cached check for whether LOUD_WIRE is enabled
static ENABLED: OnceLock<bool> = OnceLock::new();

/// Check if LOUD_WIRE debugging is enabled.
///
/// Cached after the first call, so `LOUD_WIRE` must be set before the first
/// request is made.
#[must_use]
pub fn is_enabled() -> bool {
    *ENABLED.get_or_init(|| std::env::var("LOUD_WIRE").is_ok())
}

/// Get the next request ID for correlation.
#[must_use]
pub fn next_request_id() -> usize {
    REQUEST_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// Maximum length of a string value before truncation.
const TRUNCATE_THRESHOLD: usize = 300;

/// Truncates long string values anywhere in a JSON tree.
fn truncate_long_fields(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::String(s) if s.len() > TRUNCATE_THRESHOLD => {
            let cut = (0..=TRUNCATE_THRESHOLD)
                .rev()
                .find(|i| s.is_char_boundary(*i))
                .unwrap_or(0);
            *s = format!("{}...", &s[..cut]);
        }
        serde_json::Value::Object(map) => {
            for val in map.values_mut() {
                truncate_long_fields(val);
            }
        }
        serde_json::Value::Array(arr) => {
            for item in arr.iter_mut() {
                truncate_long_fields(item);
            }
        }
        _ => {}
    }
}

/// Seconds since the Unix epoch with millisecond precision.
fn timestamp() -> String {
    let elapsed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:03}", elapsed.as_secs(), elapsed.subsec_millis())
}

/// Log prefix with timestamp and request ID.
fn prefix(request_id: usize) -> String {
    let ts = timestamp().dimmed();
    format!(
        "{} {} {}",
        "[LOUD_WIRE]".bold(),
        ts,
        format!("[REQ#{}]", request_id).cyan()
    )
}

fn print_json(prefix: &str, label: &str, value: &serde_json::Value) {
    let mut value = value.clone();
    truncate_long_fields(&mut value);
    eprintln!("{prefix} {label}:");
    let rendered = colored_json::to_colored_json_auto(&value)
        .ok()
        .or_else(|| serde_json::to_string_pretty(&value).ok());
    if let Some(rendered) = rendered {
        for line in rendered.lines() {
            eprintln!("{prefix} {line}");
        }
    }
}

/// Log an outgoing API call and its form fields.
pub fn log_request(request_id: usize, url: &str, payload: Option<&serde_json::Value>) {
    if !is_enabled() {
        return;
    }

    let prefix = prefix(request_id);
    let direction = ">>>".green().bold();

    eprintln!("{prefix} {direction} POST {url}");

    if let Some(payload) = payload {
        print_json(&prefix, &"Payload".green().to_string(), payload);
    }
}

/// Log a multipart part attached to an outgoing call.
pub fn log_upload_start(request_id: usize, field: &str, file_name: &str, size: usize) {
    if !is_enabled() {
        return;
    }

    let prefix = prefix(request_id);
    let direction = ">>>".green().bold();
    let size_kb = size as f64 / 1024.0;

    eprintln!(
        "{prefix} {direction} {} {field}=\"{file_name}\" ({size_kb:.1} KB)",
        "UPLOAD".green().bold()
    );
}

/// Log an incoming HTTP response status.
pub fn log_response_status(request_id: usize, status: u16) {
    if !is_enabled() {
        return;
    }

    let prefix = prefix(request_id);
    let direction = "<<<".red().bold();
    let status_text = if status < 300 {
        format!("{status} OK").green()
    } else {
        format!("{status} ERROR").red()
    };

    eprintln!("{prefix} {direction} {status_text}");
}

/// Log an incoming response body.
pub fn log_response_body(request_id: usize, body: &str) {
    if !is_enabled() {
        return;
    }

    let prefix = prefix(request_id);

    if let Ok(parsed) = serde_json::from_str::<serde_json::Value>(body) {
        print_json(&prefix, &"Response".red().to_string(), &parsed);
    } else {
        let truncated = super::error_helpers::truncate_for_context(body, 1000);
        eprintln!("{prefix} {}: {truncated}", "Response".red());
    }
}

/// Log the start of a file download.
pub fn log_download_start(request_id: usize, url: &str, chunk_size: usize) {
    if !is_enabled() {
        return;
    }

    let prefix = prefix(request_id);
    let direction = ">>>".blue().bold();

    eprintln!(
        "{prefix} {direction} {} GET {url} (chunk {chunk_size} bytes)",
        "DOWNLOAD".blue().bold()
    );
}

/// Log the end of a file download.
pub fn log_download_complete(request_id: usize, total_bytes: u64) {
    if !is_enabled() {
        return;
    }

    let prefix = prefix(request_id);
    let direction = "<<<".blue().bold();

    eprintln!(
        "{prefix} {direction} {} {total_bytes} bytes",
        "DOWNLOADED".blue().bold()
    );
}
