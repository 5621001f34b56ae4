// Plexus - Multiscale entropy and channel similarity networks
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Sample entropy estimation.
//!
//! SampEn(m, r) = -ln(A / B), where B counts ordered pairs of distinct
//! length-`m` templates within Chebyshev distance `r` and A does the same
//! for length `m + 1`. Both dimensions use the same `N - m` template start
//! positions, so every length-`m` match has a candidate extension.
//!
//! The tolerance is relative: `r = tolerance_ratio * std(series)` with the
//! population standard deviation of the series being scored.

use crate::stats;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Template counts below this run on the calling thread.
#[cfg(feature = "parallel")]
const PARALLEL_MIN_TEMPLATES: usize = 512;

/// Raw template match counts for one series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchCounts {
    /// Number of template start positions compared.
    pub templates: usize,
    /// Ordered matching pairs at dimension `m` (B).
    pub m_matches: u64,
    /// Ordered matching pairs at dimension `m + 1` (A).
    pub m1_matches: u64,
}

impl MatchCounts {
    /// `-ln(A / B)`, or `None` when either count is zero.
    pub fn entropy(&self) -> Option<f64> {
        if self.m_matches == 0 || self.m1_matches == 0 {
            return None;
        }
        // `+ 0.0` turns the `-0.0` of A == B into `0.0`.
        Some(-(self.m1_matches as f64 / self.m_matches as f64).ln() + 0.0)
    }
}

/// Count matching template pairs at dimensions `m` and `m + 1` using an
/// absolute tolerance `r`.
///
/// Pairs are ordered and exclude self-matches. Fewer than two templates
/// (series of `m + 1` samples or less) gives zero counts.
pub fn match_counts(series: &[f64], m: usize, r: f64) -> MatchCounts {
    let n = series.len();
    if m == 0 || m.checked_add(2).map_or(true, |min_len| n < min_len) {
        return MatchCounts {
            templates: n.saturating_sub(m),
            ..Default::default()
        };
    }

    let templates = n - m;

    #[cfg(feature = "parallel")]
    let (b, a) = if templates >= PARALLEL_MIN_TEMPLATES {
        (0..templates)
            .into_par_iter()
            .map(|i| row_matches(series, m, r, i, templates))
            .reduce(|| (0, 0), |x, y| (x.0 + y.0, x.1 + y.1))
    } else {
        sequential_matches(series, m, r, templates)
    };

    #[cfg(not(feature = "parallel"))]
    let (b, a) = sequential_matches(series, m, r, templates);

    MatchCounts {
        templates,
        // Each unordered match stands for (i, j) and (j, i).
        m_matches: 2 * b,
        m1_matches: 2 * a,
    }
}

fn sequential_matches(series: &[f64], m: usize, r: f64, templates: usize) -> (u64, u64) {
    (0..templates)
        .map(|i| row_matches(series, m, r, i, templates))
        .fold((0, 0), |acc, x| (acc.0 + x.0, acc.1 + x.1))
}

/// Unordered matches of template `i` against every later template.
#[inline]
fn row_matches(series: &[f64], m: usize, r: f64, i: usize, templates: usize) -> (u64, u64) {
    let mut b = 0u64;
    let mut a = 0u64;
    let head = &series[i..i + m];

    for j in (i + 1)..templates {
        let within = head
            .iter()
            .zip(&series[j..j + m])
            .all(|(x, y)| (x - y).abs() <= r);
        if within {
            b += 1;
            if (series[i + m] - series[j + m]).abs() <= r {
                a += 1;
            }
        }
    }

    (b, a)
}

/// Absolute tolerance `ratio * std(series)`.
///
/// `None` for an empty or constant series, where no meaningful scale of
/// variation exists.
pub fn tolerance(series: &[f64], ratio: f64) -> Option<f64> {
    if series.is_empty() || stats::is_constant(series) {
        return None;
    }
    let r = ratio * stats::population_std(series)?;
    if r > 0.0 && r.is_finite() {
        Some(r)
    } else {
        None
    }
}

/// Sample entropy of `series` with embedding dimension `m` and relative
/// tolerance `tolerance_ratio`.
///
/// Returns `None` when the value is undefined: empty or constant input,
/// too few templates, no matches at either dimension, non-finite samples,
/// or parameters outside their domain (`m == 0`, non-positive ratio).
pub fn sample_entropy(series: &[f64], m: usize, tolerance_ratio: f64) -> Option<f64> {
    if m == 0 || !tolerance_ratio.is_finite() || tolerance_ratio <= 0.0 {
        return None;
    }
    if series.iter().any(|x| !x.is_finite()) {
        return None;
    }

    let r = tolerance(series, tolerance_ratio)?;
    match_counts(series, m, r).entropy()
}
