// Plexus - Multiscale entropy and channel similarity networks
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Coarse-graining by non-overlapping block averaging.

/// Average consecutive blocks of `scale` samples.
///
/// Returns `len / scale` values. Blocks start at the first sample and a
/// trailing remainder shorter than `scale` is dropped. A scale of 0 yields
/// an empty series.
pub fn coarse_grain(series: &[f64], scale: usize) -> Vec<f64> {
    if scale == 0 {
        return Vec::new();
    }
    if scale == 1 {
        return series.to_vec();
    }

    let width = scale as f64;
    series
        .chunks_exact(scale)
        .map(|block| {
            let sum: f64 = block.iter().sum();
            if sum.is_finite() {
                sum / width
            } else {
                // Block sum overflowed; average the pre-divided samples.
                block.iter().map(|x| x / width).sum()
            }
        })
        .collect()
}

/// Number of samples `coarse_grain` produces for a series of `len` samples.
#[inline]
pub fn coarse_len(len: usize, scale: usize) -> usize {
    if scale == 0 {
        0
    } else {
        len / scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_one_is_identity() {
        let series = vec![0.5, -1.25, 3.0, 7.75, 2.0];
        assert_eq!(coarse_grain(&series, 1), series);
    }

    #[test]
    fn test_block_means() {
        let series = [1.0, 3.0, 2.0, 4.0, 10.0, 20.0];
        assert_eq!(coarse_grain(&series, 2), vec![2.0, 3.0, 15.0]);
        assert_eq!(coarse_grain(&series, 3), vec![2.0, 34.0 / 3.0]);
    }

    #[test]
    fn test_remainder_discarded() {
        let series = [1.0, 1.0, 1.0, 5.0, 5.0, 5.0, 100.0];
        let coarse = coarse_grain(&series, 3);
        assert_eq!(coarse, vec![1.0, 5.0]);
    }

    #[test]
    fn test_output_length() {
        for n in 0..40 {
            let series: Vec<f64> = (0..n).map(|i| i as f64).collect();
            for scale in 1..12 {
                assert_eq!(coarse_grain(&series, scale).len(), n / scale);
                assert_eq!(coarse_len(n, scale), n / scale);
            }
        }
    }

    #[test]
    fn test_large_blocks_do_not_overflow() {
        let series = [f64::MAX, f64::MAX, -f64::MAX, -f64::MAX];
        let coarse = coarse_grain(&series, 2);
        assert_eq!(coarse, vec![f64::MAX, -f64::MAX]);
    }

    #[test]
    fn test_too_short_is_empty() {
        assert!(coarse_grain(&[1.0, 2.0], 3).is_empty());
        assert!(coarse_grain(&[], 4).is_empty());
    }

    #[test]
    fn test_zero_scale() {
        assert!(coarse_grain(&[1.0, 2.0, 3.0], 0).is_empty());
        assert_eq!(coarse_len(3, 0), 0);
    }
}
