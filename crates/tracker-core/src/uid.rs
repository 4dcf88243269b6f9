//! Stable 11-character identifiers for metadata objects.
//!
//! A UID starts with an ASCII letter followed by ten ASCII alphanumerics.

use std::sync::LazyLock;

use crate::error::{CoreError, Result};

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const ALPHANUMERICS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Length of every generated UID.
pub const UID_LENGTH: usize = 11;

static UID_REGEX: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^[a-zA-Z][a-zA-Z0-9]{10}$").expect("Invalid uid regex")
});

/// Generate a new random UID.
pub fn generate_uid() -> String {
    let mut uid = String::with_capacity(UID_LENGTH);
    uid.push(LETTERS[fastrand::usize(..LETTERS.len())] as char);
    for _ in 1..UID_LENGTH {
        uid.push(ALPHANUMERICS[fastrand::usize(..ALPHANUMERICS.len())] as char);
    }
    uid
}

/// Returns `true` if the string has the shape of a UID.
pub fn is_valid_uid(uid: &str) -> bool {
    UID_REGEX.is_match(uid)
}

/// Validate a UID, returning it unchanged on success.
pub fn validate_uid(uid: &str) -> Result<&str> {
    if is_valid_uid(uid) {
        Ok(uid)
    } else {
        Err(CoreError::invalid_uid(uid))
    }
}
