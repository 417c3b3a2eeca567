// File:    alphabet.rs
// Author:  apezoo
// Date:    2026-10-19
//
// Description: Letter <-> number mapping over the 26-letter Latin alphabet and input normalization.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! The alphabet codec.
//!
//! This is the only place where raw ASCII arithmetic happens. Everything else
//! in the crate works on [`NormalizedText`], which is guaranteed to hold only
//! the uppercase letters `A`-`Z`.

use crate::error::{CipherError, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Number of letters in the alphabet.
pub const ALPHABET_LEN: usize = 26;

/// Converts an uppercase ASCII letter (`b'A'..=b'Z'`) to its index `0..=25`.
///
/// The caller guarantees the input is an uppercase letter.
#[must_use]
pub const fn letter_to_index(letter: u8) -> u8 {
    debug_assert!(letter.is_ascii_uppercase());
    letter - b'A'
}

/// Converts an index `0..=25` back to its uppercase ASCII letter.
///
/// The caller guarantees the index is below [`ALPHABET_LEN`].
#[must_use]
pub const fn index_to_letter(index: u8) -> u8 {
    debug_assert!(index < 26);
    b'A' + index
}

/// Strips every character that is not an ASCII letter and upper-cases the rest.
///
/// Never fails; an empty or letter-free input yields an empty text.
#[must_use]
pub fn normalize(raw: &str) -> NormalizedText {
    NormalizedText(
        raw.chars()
            .filter(char::is_ascii_alphabetic)
            .map(|c| c.to_ascii_uppercase())
            .collect(),
    )
}

/// A sequence made only of the letters `A`-`Z`.
///
/// Values are produced by [`normalize`] or by the cipher engine and are never
/// mutated in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NormalizedText(String);

impl NormalizedText {
    /// Builds a text from letter indices (`0..=25`).
    pub(crate) fn from_indices<I: IntoIterator<Item = u8>>(indices: I) -> Self {
        Self(
            indices
                .into_iter()
                .map(|i| char::from(index_to_letter(i)))
                .collect(),
        )
    }

    /// The letters as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The letters as ASCII bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Number of letters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the text holds no letters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the letter indices (`0..=25`).
    pub fn indices(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.bytes().map(letter_to_index)
    }

    /// Consumes the text, returning the underlying string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NormalizedText {
    fn from(raw: &str) -> Self {
        normalize(raw)
    }
}

/// A non-empty normalized key, applied cyclically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Key(NormalizedText);

#[allow(clippy::len_without_is_empty)]
impl Key {
    /// Normalizes `raw` and wraps it as a key.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidKey`] when `raw` contains no letters.
    pub fn new(raw: &str) -> Result<Self> {
        let text = normalize(raw);
        if text.is_empty() {
            return Err(CipherError::InvalidKey);
        }
        Ok(Self(text))
    }

    /// Number of letters in the key; always at least one.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The key letters.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// The shift amounts (`0..=25`) of each key letter, in order.
    #[must_use]
    pub fn shifts(&self) -> Vec<u8> {
        self.0.indices().collect()
    }
}

impl FromStr for Key {
    type Err = CipherError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
