// Plexus - Multiscale entropy and channel similarity networks
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Small descriptive statistics shared by the estimators.

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation (divides by `n`), `None` for an empty slice.
///
/// Finite input always gives a finite result: when the squared deviations
/// overflow, the series is rescaled into [-1, 1] and the deviation is
/// scaled back.
pub fn population_std(values: &[f64]) -> Option<f64> {
    let std = raw_population_std(values)?;
    if std.is_finite() {
        return Some(std);
    }
    match max_abs(values) {
        Some(scale) => raw_population_std(&rescaled(values, scale)).map(|s| s * scale),
        None => Some(std),
    }
}

fn raw_population_std(values: &[f64]) -> Option<f64> {
    let mu = mean(values)?;
    let sum_sq: f64 = values.iter().map(|x| (x - mu).powi(2)).sum();
    Some((sum_sq / values.len() as f64).sqrt())
}

/// Largest absolute value, `None` when it is zero or not finite.
fn max_abs(values: &[f64]) -> Option<f64> {
    let max = values.iter().fold(0.0, |acc: f64, x| acc.max(x.abs()));
    (max > 0.0 && max.is_finite()).then_some(max)
}

fn rescaled(values: &[f64], scale: f64) -> Vec<f64> {
    values.iter().map(|x| x / scale).collect()
}

/// True when every sample equals the first one.
///
/// Catches constant series whose computed deviation is a rounding
/// residue instead of an exact zero.
pub fn is_constant(values: &[f64]) -> bool {
    match values.first() {
        Some(first) => values.iter().all(|x| x == first),
        None => true,
    }
}

/// Pearson correlation coefficient of two equal-length series.
///
/// `None` when the lengths differ, fewer than two samples are given, or
/// either series has zero variance. Moments that overflow are recomputed
/// on the series rescaled into [-1, 1], which leaves the coefficient
/// unchanged.
pub fn pearson(a: &[f64], b: &[f64]) -> Option<f64> {
    if a.len() != b.len() || a.len() < 2 {
        return None;
    }
    if is_constant(a) || is_constant(b) {
        return None;
    }

    let moments = match co_moments(a, b) {
        Some(moments) => moments,
        None => {
            let a = rescaled(a, max_abs(a)?);
            let b = rescaled(b, max_abs(b)?);
            co_moments(&a, &b)?
        }
    };
    let (cov, var_a, var_b) = moments;

    let denom = (var_a * var_b).sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return None;
    }
    let r = cov / denom;
    if r.is_finite() {
        Some(r.clamp(-1.0, 1.0))
    } else {
        None
    }
}

/// `(cov, var_a, var_b)` sums of products of deviations, `None` on overflow.
fn co_moments(a: &[f64], b: &[f64]) -> Option<(f64, f64, f64)> {
    let mean_a = mean(a)?;
    let mean_b = mean(b)?;

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (x, y) in a.iter().zip(b) {
        let dx = x - mean_a;
        let dy = y - mean_b;
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    let finite = cov.is_finite() && var_a.is_finite() && var_b.is_finite();
    let denom_finite = (var_a * var_b).sqrt().is_finite();
    (finite && denom_finite).then_some((cov, var_a, var_b))
}

/// Weighted Pearson correlation over `(x, y, weight)` triples.
///
/// `None` for an empty input, a non-positive total weight, or zero
/// weighted variance in either coordinate.
pub fn weighted_pearson(samples: &[(f64, f64, f64)]) -> Option<f64> {
    let total: f64 = samples.iter().map(|(_, _, w)| w).sum();
    if samples.is_empty() || total <= 0.0 || !total.is_finite() {
        return None;
    }

    let mean_x = samples.iter().map(|(x, _, w)| w * x).sum::<f64>() / total;
    let mean_y = samples.iter().map(|(_, y, w)| w * y).sum::<f64>() / total;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y, w) in samples {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += w * dx * dy;
        var_x += w * dx * dx;
        var_y += w * dy * dy;
    }

    // Relative cutoff: integer-valued degrees leave rounding residue in
    // the weighted means even when every degree is identical.
    let scale = samples
        .iter()
        .map(|(x, y, _)| x.abs().max(y.abs()))
        .fold(0.0, f64::max)
        .max(1.0);
    let eps = total * (scale * 1e-12).powi(2);
    if var_x <= eps || var_y <= eps {
        return None;
    }

    let r = cov / (var_x * var_y).sqrt();
    if r.is_finite() {
        Some(r.clamp(-1.0, 1.0))
    } else {
        None
    }
}
