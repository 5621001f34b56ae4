// Plexus Testdata - Errors
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

use thiserror::Error;

/// Errors raised while generating synthetic data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TestdataError {
    /// A pattern parameter is out of range.
    #[error("invalid {pattern} pattern: {reason}")]
    InvalidPattern {
        pattern: &'static str,
        reason: &'static str,
    },

    /// Channel coupling outside [0, 1].
    #[error("coupling for channel {label} must be in [0, 1], got {coupling}")]
    InvalidCoupling { label: String, coupling: f64 },
}

impl TestdataError {
    pub(crate) fn invalid(pattern: &'static str, reason: &'static str) -> Self {
        TestdataError::InvalidPattern { pattern, reason }
    }
}
