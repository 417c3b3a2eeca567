// File:    challenge.rs
// Author:  apezoo
// Date:    2026-10-19
//
// Description: Generates practice ciphertexts with random keys and checks submitted solutions.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! Practice challenges: a random excerpt of a built-in English passage,
//! encrypted under a short random key.

use crate::alphabet::{self, Key, NormalizedText};
use crate::cipher;
use crate::error::{CipherError, Result};
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Excerpt lengths picked from when the caller does not choose one.
pub const EXCERPT_LENGTHS: [usize; 3] = [500, 750, 1000];

/// Key length used when the caller does not choose one.
pub const DEFAULT_KEY_LENGTH: usize = 3;

/// Longest key accepted for [`KeyStyle::Random`].
pub const MAX_RANDOM_KEY_LENGTH: usize = 20;

/// Three-letter English words used as keys by [`KeyStyle::Word`].
pub const WORD_KEYS: [&str; 19] = [
    "THE", "AND", "FOR", "BUT", "HAS", "CAN", "ARE", "WAS", "YOU", "TRY", "NEW", "KEY", "USE",
    "BIT", "SIX", "ONE", "TWO", "DAY", "RUN",
];

const SOURCE_PASSAGE: &str = "\
For three centuries the cipher of Blaise de Vigenere carried the reputation of being \
unbreakable, and diplomats, soldiers and merchants trusted their secrets to it. The idea \
is simple enough to explain in a sentence: every letter of the message is shifted by an \
amount taken from a short keyword, and when the keyword runs out it starts again from the \
beginning. Because the same plaintext letter is disguised in several different ways, the \
familiar trick of counting letters and matching the most common one with the letter E \
seems to fail. Yet the repetition of the keyword is also its weakness. When a common word \
such as THE happens to line up with the same part of the key twice, it produces the same \
group of cipher letters twice, and the distance between those two groups must be a \
multiple of the key length. Friedrich Kasiski published this observation in the middle of \
the nineteenth century, although Charles Babbage seems to have found it some years \
earlier and kept it to himself. Once the length of the key is known, the ciphertext can be \
written out in columns, one for every letter of the key. Each column was shifted by a \
single amount, so each column is nothing more than a Caesar cipher, and frequency \
analysis works again. The tallest bar in a column most likely stands for E, and the \
distance from E to that letter reveals one letter of the key. Repeat this for every \
column, read the key, and the whole message opens up. Patience matters more than \
cleverness here: write down the repeated groups, note how far apart they are, look for \
the numbers that divide most of those distances, and then test each candidate length in \
turn until the columns begin to look like ordinary English. Good luck, and enjoy the \
moment when the noise turns back into words.";

static SOURCE_LETTERS: LazyLock<NormalizedText> =
    LazyLock::new(|| alphabet::normalize(SOURCE_PASSAGE));

/// How the key of a challenge is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyStyle {
    /// A common three-letter English word from [`WORD_KEYS`].
    Word,
    /// Uniformly random letters.
    Random,
}

impl FromStr for KeyStyle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "word" => Ok(Self::Word),
            "random" => Ok(Self::Random),
            other => Err(format!("unknown key style '{other}' (expected 'word' or 'random')")),
        }
    }
}

impl fmt::Display for KeyStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Word => f.write_str("word"),
            Self::Random => f.write_str("random"),
        }
    }
}

/// Parameters for [`generate`]. `None` fields are chosen at random.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChallengeOptions {
    /// Number of plaintext letters; one of [`EXCERPT_LENGTHS`] when `None`.
    pub excerpt_length: Option<usize>,
    /// How the key is chosen; either style with equal odds when `None`.
    pub key_style: Option<KeyStyle>,
    /// Number of key letters.
    pub key_length: usize,
}

impl Default for ChallengeOptions {
    fn default() -> Self {
        Self {
            excerpt_length: None,
            key_style: None,
            key_length: DEFAULT_KEY_LENGTH,
        }
    }
}

/// A generated challenge. The key and plaintext are the answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Challenge {
    /// The text handed to the solver.
    pub ciphertext: NormalizedText,
    /// The key that produced `ciphertext`.
    pub key: Key,
    /// The excerpt that was encrypted.
    pub plaintext: NormalizedText,
    /// How `key` was chosen.
    pub key_style: KeyStyle,
}

/// Number of letters available in the built-in passage.
#[must_use]
pub fn source_length() -> usize {
    SOURCE_LETTERS.len()
}

/// Generates a challenge using the thread-local random generator.
///
/// # Errors
///
/// See [`generate_with_rng`].
pub fn generate(options: &ChallengeOptions) -> Result<Challenge> {
    generate_with_rng(&mut rand::rng(), options)
}

/// Generates a challenge from the given random source.
///
/// # Errors
///
/// Returns [`CipherError::OutOfRangeParameter`] when the excerpt length is zero
/// or longer than the built-in passage, when a word key is requested with a
/// length other than 3, or when a random key length is outside `1..=20`.
pub fn generate_with_rng<R: Rng + ?Sized>(rng: &mut R, options: &ChallengeOptions) -> Result<Challenge> {
    let source = &*SOURCE_LETTERS;

    let excerpt_length = match options.excerpt_length {
        Some(length) => length,
        None => *EXCERPT_LENGTHS.choose(rng).unwrap_or(&EXCERPT_LENGTHS[0]),
    };
    CipherError::check_bounds("excerpt_length", excerpt_length, 1, source.len())?;

    let key_style = options.key_style.unwrap_or_else(|| {
        if rng.random_bool(0.5) {
            KeyStyle::Word
        } else {
            KeyStyle::Random
        }
    });
    let key = match key_style {
        KeyStyle::Word => {
            CipherError::check_bounds("key_length", options.key_length, 3, 3)?;
            Key::new(WORD_KEYS.choose(rng).unwrap_or(&WORD_KEYS[0]))?
        }
        KeyStyle::Random => {
            CipherError::check_bounds("key_length", options.key_length, 1, MAX_RANDOM_KEY_LENGTH)?;
            let letters: String = (0..options.key_length)
                .map(|_| char::from(alphabet::index_to_letter(rng.random_range(0..26))))
                .collect();
            Key::new(&letters)?
        }
    };

    let start = rng.random_range(0..=source.len() - excerpt_length);
    let plaintext = alphabet::normalize(&source.as_str()[start..start + excerpt_length]);
    let ciphertext = cipher::encrypt(&plaintext, &key);
    log::debug!(
        "generated challenge: {excerpt_length} letters from offset {start}, {key_style} key of length {}",
        key.len()
    );

    Ok(Challenge {
        ciphertext,
        key,
        plaintext,
        key_style,
    })
}

/// Checks a submitted key and plaintext against a ciphertext.
///
/// The plaintext is re-encrypted under the key and compared with the
/// ciphertext, so any key/plaintext pair that reproduces it is accepted. All
/// three inputs are normalized first.
///
/// # Errors
///
/// Returns [`CipherError::InvalidKey`] if `key` contains no letters.
pub fn verify_solution(ciphertext: &str, key: &str, plaintext: &str) -> Result<bool> {
    let expected = alphabet::normalize(ciphertext);
    let submitted = alphabet::normalize(plaintext);
    if submitted.is_empty() {
        Key::new(key)?;
        return Ok(false);
    }
    Ok(cipher::encrypt_text(submitted.as_str(), key)? == expected)
}
