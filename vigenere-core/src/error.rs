// File:    error.rs
// Author:  apezoo
// Date:    2026-10-19
//
// Description: Error taxonomy shared by the cipher engine and the analyzers.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! Errors returned by the core library.
//!
//! Every failure is a caller input problem and is recoverable by correcting
//! the input. Empty text is not an error: the analyzers return well-defined
//! empty results for it.

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CipherError>;

/// Errors produced by cipher and analysis operations.
#[derive(Debug, thiserror::Error)]
pub enum CipherError {
    /// The key contains no letters once normalized.
    #[error("Invalid key: the key must contain at least one letter A-Z")]
    InvalidKey,

    /// A tuning parameter or guess lies outside its accepted window.
    #[error("Parameter `{name}` = {value} is out of range (expected {})", describe_bounds(.min, .max))]
    OutOfRangeParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// Value supplied by the caller.
        value: usize,
        /// Smallest accepted value.
        min: usize,
        /// Largest accepted value, `usize::MAX` when unbounded.
        max: usize,
    },

    /// The lower bound of a window is greater than its upper bound.
    #[error("Invalid `{name}` window: minimum {min} is greater than maximum {max}")]
    InvalidRange {
        /// Name of the window.
        name: &'static str,
        /// Lower bound supplied by the caller.
        min: usize,
        /// Upper bound supplied by the caller.
        max: usize,
    },

    /// Reading or writing a stream failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CipherError {
    /// Checks that `value` lies in `[min, max]`.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::OutOfRangeParameter`] when it does not.
    pub fn check_bounds(name: &'static str, value: usize, min: usize, max: usize) -> Result<()> {
        if value < min || value > max {
            return Err(Self::OutOfRangeParameter {
                name,
                value,
                min,
                max,
            });
        }
        Ok(())
    }

    /// Checks that a `[min, max]` window is not inverted.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidRange`] when `min > max`.
    pub fn check_window(name: &'static str, min: usize, max: usize) -> Result<()> {
        if min > max {
            return Err(Self::InvalidRange { name, min, max });
        }
        Ok(())
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn describe_bounds(min: &usize, max: &usize) -> String {
    if *max == usize::MAX {
        format!(">= {min}")
    } else {
        format!("{min}..={max}")
    }
}
