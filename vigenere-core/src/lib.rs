// File:    lib.rs
// Author:  apezoo
// Date:    2026-10-19
//
// Description: The main library crate for vigenere-core, orchestrating the cipher engine and the cryptanalysis aids.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! # Vigenere Core Library
//!
//! This library provides the core functionality for Vigenere encryption and
//! decryption, together with the classical tools used to break it: letter
//! frequency counts and Kasiski examination of repeated substrings.
//!
//! Every entry point accepts arbitrary text and normalizes it to the letters
//! `A`-`Z` first; positions (such as which key letter applies) are defined
//! over the normalized text.
//!
//! ```
//! use vigenere_core::{cipher, kasiski};
//!
//! let ciphertext = cipher::encrypt_text("Hello", "KEY")?;
//! assert_eq!(ciphertext.as_str(), "RIJVS");
//!
//! let report = kasiski::analyze_text("ABCXYZABC", &kasiski::KasiskiConfig::default())?;
//! assert_eq!(report.candidates, vec![2, 3]);
//! # Ok::<(), vigenere_core::error::CipherError>(())
//! ```

/// Letter <-> number mapping and input normalization.
pub mod alphabet;
/// Practice challenge generation and solution checking.
pub mod challenge;
/// Vigenere encryption and decryption.
pub mod cipher;
/// Error types shared by every module.
pub mod error;
/// Single-letter frequency analysis.
pub mod frequency;
/// Kasiski examination for key length candidates.
pub mod kasiski;

pub use alphabet::{Key, NormalizedText, normalize};
pub use error::{CipherError, Result};
