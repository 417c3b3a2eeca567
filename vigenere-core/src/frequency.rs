// File:    frequency.rs
// Author:  apezoo
// Date:    2026-10-19
//
// Description: Single-letter frequency counts, over a whole text or split into key-length columns.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! Letter frequency analysis.
//!
//! Purely descriptive: counts and percentages only. Interpreting them is up to
//! the presentation layer.

use crate::alphabet::{self, ALPHABET_LEN, NormalizedText};
use crate::error::{CipherError, Result};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Smallest key-length guess accepted by [`analyze_columns`].
pub const MIN_COLUMN_KEY_LENGTH: usize = 2;
/// Largest key-length guess accepted by [`analyze_columns`].
pub const MAX_COLUMN_KEY_LENGTH: usize = 20;

/// Per-letter counts over `A`-`Z`, always fully populated, plus the total.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LetterCounts {
    counts: [usize; ALPHABET_LEN],
    total: usize,
}

impl LetterCounts {
    /// Count for an uppercase ASCII letter.
    #[must_use]
    pub fn count(&self, letter: u8) -> usize {
        self.counts[usize::from(alphabet::letter_to_index(letter))]
    }

    /// All 26 counts, in alphabet order.
    #[must_use]
    pub const fn counts(&self) -> &[usize; ALPHABET_LEN] {
        &self.counts
    }

    /// Number of letters counted.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    /// `(letter, count)` pairs in alphabet order.
    pub fn iter(&self) -> impl Iterator<Item = (char, usize)> + '_ {
        (b'A'..=b'Z').map(char::from).zip(self.counts.iter().copied())
    }

    /// Share of `letter` in percent; `0.0` when nothing was counted.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percentage(&self, letter: u8) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(letter) as f64 / self.total as f64 * 100.0
    }

    /// Highest single-letter count.
    #[must_use]
    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// The letter with the highest count, the earliest letter on ties.
    ///
    /// `None` when nothing was counted.
    #[must_use]
    pub fn most_frequent(&self) -> Option<char> {
        let max = self.max_count();
        if max == 0 {
            return None;
        }
        self.iter().find(|&(_, count)| count == max).map(|(letter, _)| letter)
    }

    /// Length of a bar for `letter` when the most frequent letter spans `width`.
    #[must_use]
    pub fn bar_width(&self, letter: u8, width: usize) -> usize {
        let max = self.max_count();
        if max == 0 {
            return 0;
        }
        let scaled = self.count(letter) as u128 * width as u128 / max as u128;
        usize::try_from(scaled).unwrap_or(width)
    }
}

#[derive(Serialize)]
struct LetterCountsRepr {
    counts: BTreeMap<char, usize>,
    total: usize,
}

impl Serialize for LetterCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        LetterCountsRepr {
            counts: self.iter().collect(),
            total: self.total,
        }
        .serialize(serializer)
    }
}

/// Counts the letters of `text` in a single pass.
#[must_use]
pub fn analyze(text: &NormalizedText) -> LetterCounts {
    let mut counts = [0; ALPHABET_LEN];
    for index in text.indices() {
        counts[usize::from(index)] += 1;
    }
    LetterCounts {
        counts,
        total: text.len(),
    }
}

/// Share of `letter` in `counts`, in percent. Defined as `0.0` for an empty count.
#[must_use]
pub fn percentage(counts: &LetterCounts, letter: u8) -> f64 {
    counts.percentage(letter)
}

/// One group of letters that a single key letter would have shifted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnAnalysis {
    /// Zero-based position of the key letter this column belongs to.
    pub index: usize,
    /// The letters at positions `index`, `index + L`, `index + 2L`, ...
    pub text: NormalizedText,
    /// Letter counts over `text`.
    pub counts: LetterCounts,
}

/// Splits `text` into `key_length` columns and counts each one.
///
/// Letter `i` of the text goes to column `i mod key_length`. Under the right
/// key length, each column is a plain Caesar cipher.
///
/// # Errors
///
/// Returns [`CipherError::OutOfRangeParameter`] unless
/// `key_length` is within [`MIN_COLUMN_KEY_LENGTH`]..=[`MAX_COLUMN_KEY_LENGTH`].
pub fn analyze_columns(text: &NormalizedText, key_length: usize) -> Result<Vec<ColumnAnalysis>> {
    CipherError::check_bounds(
        "key_length",
        key_length,
        MIN_COLUMN_KEY_LENGTH,
        MAX_COLUMN_KEY_LENGTH,
    )?;

    let mut columns = vec![Vec::new(); key_length];
    for (i, letter) in text.indices().enumerate() {
        columns[i % key_length].push(letter);
    }

    Ok(columns
        .into_iter()
        .enumerate()
        .map(|(index, column)| {
            let text = NormalizedText::from_indices(column);
            let counts = analyze(&text);
            ColumnAnalysis {
                index,
                text,
                counts,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_letters() {
        let counts = analyze(&"AAB".into());
        assert_eq!(counts.count(b'A'), 2);
        assert_eq!(counts.count(b'B'), 1);
        assert_eq!(counts.total(), 3);
        for letter in b'C'..=b'Z' {
            assert_eq!(counts.count(letter), 0);
        }
    }

    #[test]
    fn counts_sum_to_total() {
        let text = alphabet::normalize("It was the best of times, it was the worst of times.");
        let counts = analyze(&text);
        assert_eq!(counts.counts().iter().sum::<usize>(), counts.total());
        assert_eq!(counts.total(), text.len());
    }

    #[test]
    fn empty_text_has_zero_percentages() {
        let counts = analyze(&NormalizedText::default());
        assert_eq!(counts.total(), 0);
        assert!(counts.iter().all(|(_, count)| count == 0));
        for letter in b'A'..=b'Z' {
            assert!(percentage(&counts, letter).abs() < f64::EPSILON);
            assert_eq!(counts.bar_width(letter, 50), 0);
        }
        assert_eq!(counts.most_frequent(), None);
    }

    #[test]
    fn percentages_and_bars() {
        let counts = analyze(&"AAAB".into());
        assert!((counts.percentage(b'A') - 75.0).abs() < 1e-9);
        assert!((counts.percentage(b'B') - 25.0).abs() < 1e-9);
        assert_eq!(counts.bar_width(b'A', 40), 40);
        assert_eq!(counts.bar_width(b'B', 40), 13);
        assert_eq!(counts.most_frequent(), Some('A'));
    }

    #[test]
    fn bars_scale_without_overflow() {
        let counts = analyze(&"AAB".into());
        assert_eq!(counts.bar_width(b'A', usize::MAX), usize::MAX);
        assert_eq!(counts.bar_width(b'B', usize::MAX), usize::MAX / 2);
        assert_eq!(counts.bar_width(b'C', usize::MAX), 0);
    }

    #[test]
    fn most_frequent_prefers_earlier_letter_on_ties() {
        assert_eq!(analyze(&"ZZBB".into()).most_frequent(), Some('B'));
    }

    #[test]
    fn splits_into_columns() {
        let columns = analyze_columns(&"ABCABCAB".into(), 3).unwrap();
        let texts: Vec<&str> = columns.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, ["AAA", "BBB", "CC"]);
        assert_eq!(columns[2].counts.count(b'C'), 2);
        assert_eq!(columns[1].index, 1);
    }

    #[test]
    fn column_key_length_is_bounded() {
        let text = NormalizedText::from("ABCDEF");
        assert!(matches!(
            analyze_columns(&text, 1),
            Err(CipherError::OutOfRangeParameter { value: 1, .. })
        ));
        assert!(analyze_columns(&text, 21).is_err());
        assert_eq!(analyze_columns(&text, 20).unwrap().len(), 20);
    }
}
