// File:    kasiski.rs
// Author:  apezoo
// Date:    2026-10-19
//
// Description: Kasiski examination: repeated substrings, their spacing, and key length candidates.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! Kasiski-style key length analysis.
//!
//! The pipeline runs in four stages, each exposed on its own:
//!
//! 1. [`find_patterns`] records the start positions of every substring whose
//!    length lies in the pattern window.
//! 2. [`distance_histogram`] turns consecutive positions of repeated patterns
//!    into distances and counts the ones inside the distance window.
//! 3. [`rank_hints`] keeps the most frequent distances and attaches their
//!    divisors in the key-length window.
//! 4. [`analyze`] runs the whole pipeline and collects the union of those
//!    divisors as the key length candidates.
//!
//! All windows are heuristic tuning knobs collected in [`KasiskiConfig`].
//! Repeats spaced further apart than `max_distance` are invisible to this
//! method; that is an accepted false negative.

use crate::alphabet::{self, NormalizedText};
use crate::error::{CipherError, Result};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Longest pattern length a configuration may ask for.
pub const PATTERN_LEN_LIMIT: usize = 64;

/// Largest distance a configuration may keep.
pub const DISTANCE_LIMIT: usize = 10_000;

/// Tuning knobs for the Kasiski analysis.
///
/// All windows are inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KasiskiConfig {
    /// Shortest substring considered a pattern.
    pub min_pattern_len: usize,
    /// Longest substring considered a pattern.
    pub max_pattern_len: usize,
    /// Smallest distance between two occurrences that is kept.
    pub min_distance: usize,
    /// Largest distance between two occurrences that is kept.
    pub max_distance: usize,
    /// How many of the most frequent distances become hints.
    pub max_hints: usize,
    /// How many example patterns are reported per hint.
    pub max_examples: usize,
    /// Smallest divisor reported as a plausible key length.
    pub min_key_len: usize,
    /// Largest divisor reported as a plausible key length.
    pub max_key_len: usize,
}

impl Default for KasiskiConfig {
    fn default() -> Self {
        Self {
            min_pattern_len: 3,
            max_pattern_len: 7,
            min_distance: 2,
            max_distance: 25,
            max_hints: 15,
            max_examples: 3,
            min_key_len: 2,
            max_key_len: 5,
        }
    }
}

impl KasiskiConfig {
    /// Rejects configurations that could only ever produce empty results.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::OutOfRangeParameter`] for a zero length, distance
    /// or limit, a key length below 2, or a pattern length or distance above
    /// [`PATTERN_LEN_LIMIT`] or [`DISTANCE_LIMIT`]. Returns
    /// [`CipherError::InvalidRange`] when a window's minimum exceeds its maximum.
    pub fn validate(&self) -> Result<()> {
        CipherError::check_bounds("min_pattern_len", self.min_pattern_len, 1, PATTERN_LEN_LIMIT)?;
        CipherError::check_bounds("max_pattern_len", self.max_pattern_len, 1, PATTERN_LEN_LIMIT)?;
        CipherError::check_window("pattern length", self.min_pattern_len, self.max_pattern_len)?;
        CipherError::check_bounds("min_distance", self.min_distance, 1, DISTANCE_LIMIT)?;
        CipherError::check_bounds("max_distance", self.max_distance, 1, DISTANCE_LIMIT)?;
        CipherError::check_window("distance", self.min_distance, self.max_distance)?;
        CipherError::check_bounds("min_key_len", self.min_key_len, 2, DISTANCE_LIMIT)?;
        CipherError::check_bounds("max_key_len", self.max_key_len, 2, DISTANCE_LIMIT)?;
        CipherError::check_window("key length", self.min_key_len, self.max_key_len)?;
        CipherError::check_bounds("max_hints", self.max_hints, 1, usize::MAX)?;
        CipherError::check_bounds("max_examples", self.max_examples, 1, usize::MAX)?;
        Ok(())
    }
}

/// Start positions of every substring of a text, keyed by the substring.
///
/// Patterns are kept in first-encounter order; each position list is
/// ascending because the text is scanned left to right.
#[derive(Debug, Clone, Default)]
pub struct PatternOccurrences<'a> {
    index: HashMap<&'a str, usize>,
    patterns: Vec<(&'a str, Vec<usize>)>,
}

impl<'a> PatternOccurrences<'a> {
    fn record(&mut self, pattern: &'a str, position: usize) {
        if let Some(&slot) = self.index.get(pattern) {
            self.patterns[slot].1.push(position);
        } else {
            self.index.insert(pattern, self.patterns.len());
            self.patterns.push((pattern, vec![position]));
        }
    }

    /// Positions recorded for `pattern`, if it was seen at all.
    #[must_use]
    pub fn positions(&self, pattern: &str) -> Option<&[usize]> {
        self.index
            .get(pattern)
            .map(|&slot| self.patterns[slot].1.as_slice())
    }

    /// All patterns with their positions, in first-encounter order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &[usize])> + '_ {
        self.patterns
            .iter()
            .map(|(pattern, positions)| (*pattern, positions.as_slice()))
    }

    /// Only the patterns that occur at least twice.
    pub fn repeated(&self) -> impl Iterator<Item = (&'a str, &[usize])> + '_ {
        self.iter().filter(|(_, positions)| positions.len() > 1)
    }

    /// Number of distinct patterns recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether no pattern was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Records every substring of `text` whose length is in `[min_len, max_len]`.
///
/// Substrings of different lengths are distinct patterns even when one is a
/// prefix of the other. A text no longer than `min_len` yields nothing that
/// can repeat.
#[must_use]
pub fn find_patterns(text: &NormalizedText, min_len: usize, max_len: usize) -> PatternOccurrences<'_> {
    let letters = text.as_str();
    let mut occurrences = PatternOccurrences::default();
    if min_len == 0 {
        return occurrences;
    }

    for start in 0..letters.len() {
        for len in min_len..=max_len {
            let end = start.saturating_add(len);
            if end > letters.len() {
                break;
            }
            occurrences.record(&letters[start..end], start);
        }
    }
    occurrences
}

/// How often one distance was observed, and by which patterns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DistanceStats {
    /// Number of consecutive-occurrence pairs spaced by this distance.
    pub count: usize,
    /// Distinct patterns that produced the distance, in encounter order.
    pub patterns: Vec<String>,
}

/// Distances between consecutive occurrences of repeated patterns, ascending.
pub type DistanceHistogram = BTreeMap<usize, DistanceStats>;

/// Tabulates the distances between consecutive occurrences of each repeated
/// pattern, keeping only those in `[min_distance, max_distance]`.
#[must_use]
pub fn distance_histogram(
    occurrences: &PatternOccurrences<'_>,
    min_distance: usize,
    max_distance: usize,
) -> DistanceHistogram {
    let mut histogram = DistanceHistogram::new();
    for (pattern, positions) in occurrences.repeated() {
        for pair in positions.windows(2) {
            let distance = pair[1] - pair[0];
            if distance < min_distance || distance > max_distance {
                continue;
            }
            let stats = histogram.entry(distance).or_default();
            stats.count += 1;
            // A pattern is processed in full before the next one starts, so a
            // repeat of the same distance can only come from the last entry.
            if stats.patterns.last().map(String::as_str) != Some(pattern) {
                stats.patterns.push(pattern.to_owned());
            }
        }
    }
    trace!("distance histogram: {histogram:?}");
    histogram
}

/// All divisors of `n` other than 1 and `n`, ascending.
///
/// Computed from the divisors up to `sqrt(n)` and their co-divisors.
#[must_use]
pub fn divisors(n: usize) -> Vec<usize> {
    let mut found = BTreeSet::new();
    let mut i = 2;
    while i * i <= n {
        if n % i == 0 {
            found.insert(i);
            found.insert(n / i);
        }
        i += 1;
    }
    found.into_iter().collect()
}

/// A frequently observed distance and the key lengths it suggests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyLengthHint {
    /// Distance between consecutive occurrences of a repeated pattern.
    pub distance: usize,
    /// How many occurrence pairs were spaced by `distance`.
    pub occurrence_count: usize,
    /// Divisors of `distance` in the key-length window; empty means "none".
    pub divisors: Vec<usize>,
    /// Up to `max_examples` patterns that produced the distance.
    pub example_patterns: Vec<String>,
}

/// Keeps the `max_hints` most frequent distances, most frequent first.
///
/// Ties keep ascending distance order. Hints whose distance has no divisor in
/// the key-length window are still reported, with an empty divisor list.
#[must_use]
pub fn rank_hints(histogram: &DistanceHistogram, config: &KasiskiConfig) -> Vec<KeyLengthHint> {
    let mut ranked: Vec<(&usize, &DistanceStats)> = histogram.iter().collect();
    ranked.sort_by(|a, b| b.1.count.cmp(&a.1.count));
    ranked.truncate(config.max_hints);

    ranked
        .into_iter()
        .map(|(&distance, stats)| KeyLengthHint {
            distance,
            occurrence_count: stats.count,
            divisors: divisors(distance)
                .into_iter()
                .filter(|d| (config.min_key_len..=config.max_key_len).contains(d))
                .collect(),
            example_patterns: stats.patterns.iter().take(config.max_examples).cloned().collect(),
        })
        .collect()
}

/// Result of a full Kasiski analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KasiskiReport {
    /// Ranked hints, most frequent distance first.
    pub hints: Vec<KeyLengthHint>,
    /// Union of all hint divisors, deduplicated and ascending.
    pub candidates: Vec<usize>,
}

impl KasiskiReport {
    /// Whether no repeating pattern survived the windows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hints.is_empty()
    }
}

/// Runs the full analysis over an already normalized text.
///
/// Never mutates `text`; every call builds fresh structures.
///
/// # Errors
///
/// Returns an error if `config` fails [`KasiskiConfig::validate`].
pub fn analyze(text: &NormalizedText, config: &KasiskiConfig) -> Result<KasiskiReport> {
    config.validate()?;

    let occurrences = find_patterns(text, config.min_pattern_len, config.max_pattern_len);
    let histogram = distance_histogram(&occurrences, config.min_distance, config.max_distance);
    let hints = rank_hints(&histogram, config);

    let candidates: BTreeSet<usize> = hints
        .iter()
        .flat_map(|hint| hint.divisors.iter().copied())
        .collect();

    debug!(
        "kasiski: {} letters, {} repeated patterns, {} distances, {} hints, candidates {:?}",
        text.len(),
        occurrences.repeated().count(),
        histogram.len(),
        hints.len(),
        candidates
    );

    Ok(KasiskiReport {
        hints,
        candidates: candidates.into_iter().collect(),
    })
}

/// Normalizes `raw_text`, then runs [`analyze`].
///
/// # Errors
///
/// Returns an error if `config` fails [`KasiskiConfig::validate`].
pub fn analyze_text(raw_text: &str, config: &KasiskiConfig) -> Result<KasiskiReport> {
    analyze(&alphabet::normalize(raw_text), config)
}
