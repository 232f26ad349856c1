//! Keys and `/`-separated paths into the document tree.
use crate::error::StoreError;

pub const MAX_KEY_BYTES: usize = 768;

const FORBIDDEN: &[char] = &['.', '$', '#', '[', ']', '/'];

/// Checks that `key` can address exactly one child in the tree.
pub fn validate_key(key: &str) -> Result<&str, StoreError> {
    let valid = !key.is_empty()
        && key.len() <= MAX_KEY_BYTES
        && !key
            .chars()
            .any(|c| FORBIDDEN.contains(&c) || c.is_ascii_control());

    if valid {
        Ok(key)
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

/// Joins a validated `key` below `parent`.
pub fn child(parent: &str, key: &str) -> Result<String, StoreError> {
    let key = validate_key(key)?;
    let parent = parent.trim_matches('/');
    if parent.is_empty() {
        Ok(key.to_string())
    } else {
        Ok(format!("{parent}/{key}"))
    }
}

/// Splits a path into its non-empty segments. The empty path is the root.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}
