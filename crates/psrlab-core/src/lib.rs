//! # Pulsar Detection Core DSP Library
//!
//! This crate provides the numerical core of an educational toolkit that
//! simulates detection of periodic astrophysical signals ("pulsars") buried
//! in noise. It demonstrates, step by step, the classic pipeline used to
//! pull a periodic signal out of a noisy capture:
//!
//! - **Signal Synthesis**: superposition of sinusoidal tone components plus
//!   additive white Gaussian noise, under selectable generation policies
//! - **Zero-Phase Filtering**: Butterworth low-pass applied
//!   forward-backward so tonal timing is preserved
//! - **Spectral Analysis**: one-sided FFT power spectra of the raw and
//!   filtered signal
//! - **Peak Detection**: banded argmax over the filtered spectrum,
//!   converted to a period estimate
//!
//! ## Signal Flow
//!
//! ```text
//! Synthesizer → [ Low-Pass Filter → FFT ×2 → Peak Detector ] → ResultBundle
//!                \__________________pipeline________________/
//! ```
//!
//! Everything is a synchronous batch computation over in-memory vectors:
//! no streaming, no threads, no shared state. Randomness enters only
//! through an explicit seeded generator handle, so every run is
//! reproducible.
//!
//! ## Example
//!
//! ```rust
//! use psrlab_core::{
//!     detect::SearchBand,
//!     pipeline::{process_signal, FilterSpec},
//!     synth::{generate_signal_seeded, GenerationMode},
//! };
//!
//! // Synthesize two seconds of the fixed educational three-tone signal.
//! let sig = generate_signal_seeded(1000.0, 2.0, 0.5, GenerationMode::Educational, Some(42))
//!     .unwrap();
//!
//! // Filter, analyze, and hunt for the dominant tone.
//! let result = process_signal(
//!     &sig.samples,
//!     1000.0,
//!     &FilterSpec { cutoff_hz: 35.0, order: 5 },
//!     &SearchBand::default(),
//! )
//! .unwrap();
//!
//! println!(
//!     "detected {:.2} Hz (period {:.3} s)",
//!     result.detection.frequency_hz, result.detection.period_s
//! );
//! ```

pub mod butterworth;
pub mod detect;
pub mod io;
pub mod pipeline;
pub mod spectrum;
pub mod synth;
pub mod types;

pub use butterworth::ButterworthLowpass;
pub use detect::{detect_peak, PeakDetection, SearchBand};
pub use pipeline::{estimate_snr_db, process_signal, FilterSpec, ProcessingResult};
pub use spectrum::Spectrum;
pub use synth::{
    educational_tones, generate_signal, generate_signal_seeded, GeneratedSignal, GenerationMode,
    SignalClass, SignalMetadata,
};
pub use types::{DspError, DspResult, Sample, SampleBuffer, ToneComponent};
