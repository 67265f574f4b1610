//! Spectral Analyzer
//!
//! Computes the one-sided power spectrum of a real-valued signal via FFT.
//!
//! ## One-sided spectrum
//!
//! A real signal's DFT is conjugate-symmetric, so only the non-negative
//! half carries information. For a signal of length `N` at sample rate
//! `fs`, the analyzer reports bins `k = 0 .. N/2` with
//!
//! ```text
//! f[k] = k · fs / N          (frequency axis)
//! P[k] = |X[k]|²             (unnormalized power)
//! ```
//!
//! Spectral resolution is `Δf = fs/N`: a longer capture (or higher rate)
//! packs the same band into more, narrower bins. That trade-off is the
//! reason the pipeline records the resolution alongside the spectrum.
//!
//! ## Example
//!
//! ```rust
//! use psrlab_core::spectrum::Spectrum;
//!
//! let fs = 1000.0;
//! let signal: Vec<f64> = (0..1000)
//!     .map(|i| (2.0 * std::f64::consts::PI * 50.0 * i as f64 / fs).sin())
//!     .collect();
//! let spectrum = Spectrum::compute(&signal, fs).unwrap();
//! assert_eq!(spectrum.frequencies.len(), 500);
//! assert!((spectrum.resolution - 1.0).abs() < 1e-12);
//! ```

use crate::types::{DspError, DspResult};
use num_complex::Complex64;
use rustfft::FftPlanner;
use serde::{Deserialize, Serialize};

/// One-sided power spectrum of a real-valued signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spectrum {
    /// Frequency axis `f[k] = k·fs/N`, length `⌊N/2⌋`.
    pub frequencies: Vec<f64>,
    /// Power per bin, `|X[k]|²`.
    pub power: Vec<f64>,
    /// Bin spacing `Δf = fs/N` in Hz (0 for an empty signal).
    pub resolution: f64,
    /// Sample rate in Hz.
    pub sample_rate: f64,
}

impl Spectrum {
    /// Compute the one-sided power spectrum.
    ///
    /// Signals of length 0 or 1 are valid degenerate inputs and yield
    /// empty axes.
    ///
    /// # Errors
    /// `DspError::InvalidParameter` for a non-positive sample rate.
    pub fn compute(signal: &[f64], fs: f64) -> DspResult<Self> {
        if !fs.is_finite() || fs <= 0.0 {
            return Err(DspError::InvalidParameter(format!(
                "sample rate must be positive, got {fs}"
            )));
        }

        let n = signal.len();
        let half = n / 2;
        if half == 0 {
            return Ok(Self {
                frequencies: Vec::new(),
                power: Vec::new(),
                resolution: if n > 0 { fs / n as f64 } else { 0.0 },
                sample_rate: fs,
            });
        }

        let mut buffer: Vec<Complex64> =
            signal.iter().map(|&x| Complex64::new(x, 0.0)).collect();
        FftPlanner::new().plan_fft_forward(n).process(&mut buffer);

        let resolution = fs / n as f64;
        let frequencies: Vec<f64> = (0..half).map(|k| k as f64 * resolution).collect();
        let power: Vec<f64> = buffer[..half].iter().map(Complex64::norm_sqr).collect();

        Ok(Self {
            frequencies,
            power,
            resolution,
            sample_rate: fs,
        })
    }

    /// Number of bins.
    pub fn len(&self) -> usize {
        self.power.len()
    }

    /// True when the signal was too short to produce any bins.
    pub fn is_empty(&self) -> bool {
        self.power.is_empty()
    }

    /// Total power over bins whose frequency lies in `[low_hz, high_hz)`.
    pub fn band_power(&self, low_hz: f64, high_hz: f64) -> f64 {
        self.frequencies
            .iter()
            .zip(self.power.iter())
            .filter(|(&f, _)| f >= low_hz && f < high_hz)
            .map(|(_, &p)| p)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn tone(freq: f64, n: usize, fs: f64) -> Vec<f64> {
        (0..n)
            .map(|i| (2.0 * PI * freq * i as f64 / fs).sin())
            .collect()
    }

    #[test]
    fn test_single_tone_lands_on_its_bin() {
        let fs = 1000.0;
        let spectrum = Spectrum::compute(&tone(50.0, 1000, fs), fs).unwrap();

        let peak_bin = (0..spectrum.len())
            .max_by(|&a, &b| spectrum.power[a].partial_cmp(&spectrum.power[b]).unwrap())
            .unwrap();
        assert_eq!(peak_bin, 50);
        assert!((spectrum.frequencies[peak_bin] - 50.0).abs() < 1e-9);

        // A full-scale sine of N samples concentrates |X|² ≈ (N/2)² in its bin.
        let expected = (1000.0f64 / 2.0).powi(2);
        assert!(
            (spectrum.power[peak_bin] - expected).abs() / expected < 1e-6,
            "peak power {}",
            spectrum.power[peak_bin]
        );
    }

    #[test]
    fn test_axis_length_is_half_n() {
        let fs = 1000.0;
        for n in [2usize, 3, 100, 1001, 2000] {
            let spectrum = Spectrum::compute(&tone(10.0, n, fs), fs).unwrap();
            assert_eq!(spectrum.len(), n / 2, "n = {n}");
            assert_eq!(spectrum.frequencies.len(), spectrum.power.len());
        }
    }

    #[test]
    fn test_doubling_length_halves_resolution() {
        let fs = 1000.0;
        let short = Spectrum::compute(&tone(10.0, 1000, fs), fs).unwrap();
        let long = Spectrum::compute(&tone(10.0, 2000, fs), fs).unwrap();

        assert!((short.resolution - 1.0).abs() < 1e-12);
        assert!((long.resolution - 0.5).abs() < 1e-12);
        assert!((short.resolution / long.resolution - 2.0).abs() < 1e-12);

        // Bin spacing on the axis agrees with the reported resolution.
        assert!((short.frequencies[1] - short.frequencies[0] - short.resolution).abs() < 1e-12);
        assert!((long.frequencies[1] - long.frequencies[0] - long.resolution).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_lengths() {
        let empty = Spectrum::compute(&[], 1000.0).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.resolution, 0.0);

        let single = Spectrum::compute(&[1.0], 1000.0).unwrap();
        assert!(single.is_empty());
    }

    #[test]
    fn test_rejects_bad_sample_rate() {
        assert!(matches!(
            Spectrum::compute(&[0.0; 16], 0.0),
            Err(DspError::InvalidParameter(_))
        ));
        assert!(matches!(
            Spectrum::compute(&[0.0; 16], -1.0),
            Err(DspError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_band_power_concentrated_around_tone() {
        let fs = 1000.0;
        let spectrum = Spectrum::compute(&tone(50.0, 2000, fs), fs).unwrap();
        let near = spectrum.band_power(40.0, 60.0);
        let far = spectrum.band_power(100.0, 400.0);
        assert!(near > 1e3 * far.max(1e-12), "near {near}, far {far}");
    }
}
