//! Lookup key normalization.
//!
//! Every word that reaches a collaborator goes through [`LookupKey::parse`],
//! so `"Apple"`, `" apple "` and `"apple"` share a single cache entry.

use std::fmt;

use serde::Serialize;

use crate::error::LookupError;

/// Longest word accepted, in characters.
pub const MAX_KEY_CHARS: usize = 64;

/// A normalized word: trimmed, lowercased, non-empty, no control characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct LookupKey(String);

impl LookupKey {
    /// Normalize and validate a raw word.
    ///
    /// Fails with [`LookupError::InvalidInput`] for empty or whitespace-only
    /// input, words longer than [`MAX_KEY_CHARS`], and words containing
    /// control characters.
    pub fn parse(raw: &str) -> Result<Self, LookupError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(LookupError::invalid_input("word is empty"));
        }

        if trimmed.chars().count() > MAX_KEY_CHARS {
            return Err(LookupError::invalid_input(format!(
                "word is longer than {} characters",
                MAX_KEY_CHARS
            )));
        }

        if trimmed.chars().any(char::is_control) {
            return Err(LookupError::invalid_input(
                "word contains control characters",
            ));
        }

        Ok(LookupKey(trimmed.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LookupKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
