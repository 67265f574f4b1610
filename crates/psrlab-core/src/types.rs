//! Core types for the pulsar detection pipeline
//!
//! This module defines the fundamental value types shared by the synthesis
//! and processing stages: real-valued sample buffers, sinusoidal tone
//! components, and the crate-wide error type.
//!
//! ## Signal representation
//!
//! All signals here are real-valued baseband waveforms: an ordered sequence
//! of amplitude samples at a fixed sample rate `fs`, with implicit uniform
//! time step `T = 1/fs` and `t[i] = i/fs` starting at zero. A synthetic
//! signal is the superposition of zero or more tone components plus an
//! independent Gaussian noise term:
//!
//! ```text
//! y[i] = Σ_k A_k · sin(2π f_k t[i] + φ_k)  +  σ · n[i],   n[i] ~ N(0, 1)
//! ```

use serde::{Deserialize, Serialize};

/// A floating point sample (real-valued signals).
pub type Sample = f64;

/// A buffer of real-valued samples.
pub type SampleBuffer = Vec<Sample>;

/// Result type for DSP operations.
pub type DspResult<T> = Result<T, DspError>;

/// Errors that can occur during signal synthesis or processing.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DspError {
    /// Synthesis parameters violate their preconditions (non-positive sample
    /// rate or duration, negative noise amplitude, non-finite values).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Filter specification violates its preconditions (cutoff outside
    /// `(0, fs/2)`, zero order).
    #[error("invalid filter specification: {0}")]
    InvalidFilterSpec(String),
}

/// One sinusoidal term `A·sin(2π f t + φ)` contributing to a synthetic signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToneComponent {
    /// Frequency in Hz.
    pub frequency_hz: f64,
    /// Peak amplitude (linear).
    pub amplitude: f64,
    /// Phase offset in radians.
    pub phase_rad: f64,
}

impl ToneComponent {
    /// Create a tone component.
    pub fn new(frequency_hz: f64, amplitude: f64, phase_rad: f64) -> Self {
        Self {
            frequency_hz,
            amplitude,
            phase_rad,
        }
    }

    /// Evaluate the tone at time `t` seconds.
    pub fn sample_at(&self, t: f64) -> f64 {
        self.amplitude * (2.0 * std::f64::consts::PI * self.frequency_hz * t + self.phase_rad).sin()
    }
}
