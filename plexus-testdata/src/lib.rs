// Plexus Testdata - Synthetic multichannel signals
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! # Plexus Testdata
//!
//! Seeded synthetic signals for testing and benchmarking Plexus.
//!
//! - **Signal patterns**: Constant, sine, white noise, random walk, AR(1)
//! - **Multichannel recordings**: Channels coupled through a shared source
//!
//! ## Quick Start
//!
//! ```rust
//! use plexus_testdata::{MultichannelGenerator, SignalPattern};
//!
//! let recording = MultichannelGenerator::new(1000)
//!     .with_seed(42)
//!     .add_channel("Fp1", SignalPattern::noise(1.0), 0.8)
//!     .add_channel("Fp2", SignalPattern::noise(1.0), 0.8)
//!     .add_channel("O1", SignalPattern::sine(25.0), 0.0)
//!     .generate()
//!     .unwrap();
//!
//! assert_eq!(recording.channel_count(), 3);
//! ```

pub mod error;
pub mod patterns;
pub mod recording;

// Re-exports for convenience
pub use error::TestdataError;
pub use patterns::SignalPattern;
pub use recording::{coupled_channels, ChannelSpec, GeneratedRecording, MultichannelGenerator};
