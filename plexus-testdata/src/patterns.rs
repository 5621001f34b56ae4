// Plexus Testdata - Signal patterns
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Single-channel signal patterns.
//!
//! Patterns are generated sample by sample; stateful ones (random walk,
//! autoregressive) carry their state across the whole series.

use crate::error::TestdataError;
use rand::prelude::*;
use rand_distr::Normal;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Signal pattern definition.
///
/// Patterns can be summed using `Composite`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SignalPattern {
    /// Constant value.
    Constant { value: f64 },

    /// Sinusoidal wave.
    ///
    /// `value = offset + amplitude * sin(2*PI*i/period + phase)`
    Sine {
        amplitude: f64,
        /// Period in samples.
        period: f64,
        phase: f64,
        offset: f64,
    },

    /// Independent Gaussian samples.
    WhiteNoise { mean: f64, std: f64 },

    /// Random walk (Brownian motion).
    RandomWalk { start: f64, step_std: f64 },

    /// First-order autoregressive process.
    ///
    /// `x[i] = coefficient * x[i-1] + e[i]`, `e ~ N(0, noise_std)`
    Autoregressive { coefficient: f64, noise_std: f64 },

    /// Sum of multiple patterns.
    Composite(Vec<SignalPattern>),
}

impl SignalPattern {
    /// Sine with unit amplitude and zero offset.
    pub fn sine(period: f64) -> Self {
        SignalPattern::Sine {
            amplitude: 1.0,
            period,
            phase: 0.0,
            offset: 0.0,
        }
    }

    /// Zero-mean white noise.
    pub fn noise(std: f64) -> Self {
        SignalPattern::WhiteNoise { mean: 0.0, std }
    }

    /// Generate `n` samples.
    pub fn generate(&self, n: usize, rng: &mut impl Rng) -> Result<Vec<f64>, TestdataError> {
        match self {
            SignalPattern::Constant { value } => Ok(vec![*value; n]),

            SignalPattern::Sine {
                amplitude,
                period,
                phase,
                offset,
            } => {
                if period.is_nan() || *period <= 0.0 {
                    return Err(TestdataError::invalid("sine", "period must be positive"));
                }
                Ok((0..n)
                    .map(|i| offset + amplitude * (2.0 * PI * i as f64 / period + phase).sin())
                    .collect())
            }

            SignalPattern::WhiteNoise { mean, std } => {
                let normal = normal("white_noise", *mean, *std)?;
                Ok((0..n).map(|_| normal.sample(rng)).collect())
            }

            SignalPattern::RandomWalk { start, step_std } => {
                let step = normal("random_walk", 0.0, *step_std)?;
                let mut value = *start;
                Ok((0..n)
                    .map(|_| {
                        value += step.sample(rng);
                        value
                    })
                    .collect())
            }

            SignalPattern::Autoregressive {
                coefficient,
                noise_std,
            } => {
                if coefficient.abs() >= 1.0 {
                    return Err(TestdataError::invalid(
                        "autoregressive",
                        "coefficient must be inside (-1, 1)",
                    ));
                }
                let innovation = normal("autoregressive", 0.0, *noise_std)?;
                let mut value = 0.0;
                Ok((0..n)
                    .map(|_| {
                        value = coefficient * value + innovation.sample(rng);
                        value
                    })
                    .collect())
            }

            SignalPattern::Composite(patterns) => {
                let mut sum = vec![0.0; n];
                for pattern in patterns {
                    for (acc, x) in sum.iter_mut().zip(pattern.generate(n, rng)?) {
                        *acc += x;
                    }
                }
                Ok(sum)
            }
        }
    }

    /// Generate `n` samples from a fixed seed.
    pub fn generate_seeded(&self, n: usize, seed: u64) -> Result<Vec<f64>, TestdataError> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.generate(n, &mut rng)
    }
}

fn normal(pattern: &'static str, mean: f64, std: f64) -> Result<Normal<f64>, TestdataError> {
    Normal::new(mean, std)
        .map_err(|_| TestdataError::invalid(pattern, "standard deviation must be finite and >= 0"))
}
