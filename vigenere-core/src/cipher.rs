// File:    cipher.rs
// Author:  apezoo
// Date:    2026-10-19
//
// Description: The Vigenere cipher engine, for in-memory texts and for streams.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! This module contains the core cryptographic operations.
//!
//! The key advances once per letter of the *normalized* input: characters
//! that are not letters are dropped before indexing, so they never consume a
//! key position.

use crate::alphabet::{self, Key, NormalizedText};
use crate::error::Result;
use std::io::{Read, Write};

/// Whether letters are shifted forwards (encryption) or backwards (decryption).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// `(plain + key) mod 26`
    Encrypt,
    /// `(cipher - key + 26) mod 26`
    Decrypt,
}

impl Direction {
    const fn shift(self, letter: u8, key: u8) -> u8 {
        match self {
            Self::Encrypt => (letter + key) % 26,
            Self::Decrypt => (letter + 26 - key) % 26,
        }
    }
}

/// Shifts every letter of `text` by the cyclically repeated key.
#[must_use]
pub fn apply(text: &NormalizedText, key: &Key, direction: Direction) -> NormalizedText {
    let shifts = key.shifts();
    NormalizedText::from_indices(
        text.indices()
            .zip(shifts.iter().cycle())
            .map(|(letter, &k)| direction.shift(letter, k)),
    )
}

/// Encrypts `plaintext`; the output has the same length as the input.
#[must_use]
pub fn encrypt(plaintext: &NormalizedText, key: &Key) -> NormalizedText {
    apply(plaintext, key, Direction::Encrypt)
}

/// Decrypts `ciphertext`; `decrypt(&encrypt(p, k), k) == p` for every `p` and `k`.
#[must_use]
pub fn decrypt(ciphertext: &NormalizedText, key: &Key) -> NormalizedText {
    apply(ciphertext, key, Direction::Decrypt)
}

/// Normalizes both arguments, then encrypts.
///
/// # Errors
///
/// Returns [`CipherError::InvalidKey`](crate::error::CipherError::InvalidKey)
/// if `raw_key` contains no letters.
pub fn encrypt_text(raw_text: &str, raw_key: &str) -> Result<NormalizedText> {
    let key = Key::new(raw_key)?;
    Ok(encrypt(&alphabet::normalize(raw_text), &key))
}

/// Normalizes both arguments, then decrypts.
///
/// # Errors
///
/// Returns [`CipherError::InvalidKey`](crate::error::CipherError::InvalidKey)
/// if `raw_key` contains no letters.
pub fn decrypt_text(raw_text: &str, raw_key: &str) -> Result<NormalizedText> {
    let key = Key::new(raw_key)?;
    Ok(decrypt(&alphabet::normalize(raw_text), &key))
}

/// Encrypts or decrypts data from a reader and writes the letters to a writer.
///
/// Input is consumed in 4KB chunks. Bytes that are not ASCII letters are
/// dropped, and the key position carries over from one chunk to the next, so
/// the output equals [`apply`] on the normalized input.
///
/// # Arguments
///
/// * `reader` - The source of the plaintext or ciphertext.
/// * `writer` - The destination for the resulting ciphertext or plaintext.
/// * `key` - The key to cycle through.
/// * `direction` - Whether to encrypt or decrypt.
///
/// # Returns
///
/// The number of letters written.
///
/// # Errors
///
/// Returns [`CipherError::Io`](crate::error::CipherError::Io) if reading or
/// writing fails.
pub fn process_stream<R: Read, W: Write>(
    mut reader: R,
    mut writer: W,
    key: &Key,
    direction: Direction,
) -> Result<usize> {
    let shifts = key.shifts();
    let mut buffer = [0; 4096];
    let mut position = 0;

    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }

        let mut processed_chunk = Vec::with_capacity(bytes_read);
        for byte in buffer[..bytes_read].iter().filter(|b| b.is_ascii_alphabetic()) {
            let letter = alphabet::letter_to_index(byte.to_ascii_uppercase());
            let shifted = direction.shift(letter, shifts[position % shifts.len()]);
            processed_chunk.push(alphabet::index_to_letter(shifted));
            position += 1;
        }

        writer.write_all(&processed_chunk)?;
    }

    writer.flush()?;
    log::debug!("processed {position} letters ({direction:?})");
    Ok(position)
}
