//! Database utility functions.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{SecondsFormat, Utc};
use uuid::Uuid;

/// Generate a 16-character hex ID for lists and items.
pub fn generate_entity_id() -> String {
    let simple = Uuid::new_v4().simple().to_string();
    simple[..16].to_string()
}

/// Generate an opaque share token (22 URL-safe characters).
pub fn generate_share_token() -> String {
    URL_SAFE_NO_PAD.encode(Uuid::new_v4().as_bytes())
}

/// Current time as a fixed-width RFC 3339 UTC string with millisecond
/// precision, e.g. `2025-03-01T12:00:00.123Z`.
///
/// Fixed width keeps lexical order equal to chronological order, which the
/// `createdAt` sorts rely on.
pub fn current_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
