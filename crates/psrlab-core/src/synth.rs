//! Signal Synthesizer
//!
//! Builds a sampled waveform as a superposition of sinusoidal tone components
//! plus additive white Gaussian noise. This is the "sky" of the teaching
//! toolkit: the synthesizer plays the role of a radio source whose periodic
//! emission the rest of the pipeline then tries to recover.
//!
//! ## Generation modes
//!
//! | Mode         | Tones                                               |
//! |--------------|-----------------------------------------------------|
//! | Educational  | Fixed: 5 Hz/1.5, 15 Hz/1.0/π⁄4, 25 Hz/0.8/π⁄2       |
//! | FullyRandom  | 2–5 tones, f ∈ U[1,50] Hz, A ∈ U[0.5,2.0]           |
//! | Archetype    | Pulsar / NoiseOnly / Irregular at 0.6 / 0.2 / 0.2   |
//!
//! The random generator is always an explicit handle supplied by the caller,
//! so a given seed plus parameters reproduces an identical signal.
//!
//! ## Example
//!
//! ```rust
//! use psrlab_core::synth::{generate_signal_seeded, GenerationMode};
//!
//! let sig = generate_signal_seeded(1000.0, 2.0, 0.5, GenerationMode::Educational, Some(42))
//!     .unwrap();
//! assert_eq!(sig.samples.len(), 2000);
//! assert_eq!(sig.metadata.tones.len(), 3);
//! ```

use crate::types::{DspError, DspResult, ToneComponent};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Tone-list generation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    /// Three fixed, well-separated tones for step-by-step teaching.
    Educational,
    /// 2–5 tones drawn uniformly at random.
    FullyRandom,
    /// Randomized signal class: clear pulsar, noise only, or irregular.
    Archetype,
}

/// Signal class resolved by [`GenerationMode::Archetype`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalClass {
    /// Fundamental plus harmonics or independent tones.
    Pulsar,
    /// No tonal content at all.
    NoiseOnly,
    /// Closely spaced low-amplitude tones (beating).
    Irregular,
}

/// Ground-truth description of a generated signal.
///
/// Consumed by the presentation layer for comparison against the detector's
/// output; the detector itself never sees this.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalMetadata {
    /// Generation policy that produced the signal.
    pub mode: GenerationMode,
    /// Resolved class when the mode was `Archetype`.
    pub class: Option<SignalClass>,
    /// Tone components summed into the signal, in generation order.
    pub tones: Vec<ToneComponent>,
    /// Gaussian noise standard deviation.
    pub noise_amplitude: f64,
    /// Sample rate in Hz.
    pub sample_rate: f64,
    /// Requested duration in seconds.
    pub duration: f64,
}

impl SignalMetadata {
    /// Number of tone components.
    pub fn component_count(&self) -> usize {
        self.tones.len()
    }
}

/// A freshly synthesized signal with its time axis and ground truth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedSignal {
    /// Amplitude samples, index 0 at t = 0.
    pub samples: Vec<f64>,
    /// Sample times `t[i] = i / fs`.
    pub time: Vec<f64>,
    /// Ground-truth metadata.
    pub metadata: SignalMetadata,
}

/// The fixed three-tone set used by [`GenerationMode::Educational`]:
/// a 5 Hz fundamental and two well-separated overtones, chosen so each
/// component is visible both in the time trace and as a distinct spectral
/// line.
pub fn educational_tones() -> Vec<ToneComponent> {
    vec![
        ToneComponent::new(5.0, 1.5, 0.0),
        ToneComponent::new(15.0, 1.0, PI / 4.0),
        ToneComponent::new(25.0, 0.8, PI / 2.0),
    ]
}

/// Generate a signal with an explicit random generator handle.
///
/// # Arguments
/// * `fs` - Sample rate in Hz, must be positive
/// * `duration` - Signal duration in seconds, must be positive
/// * `noise_amplitude` - Gaussian noise standard deviation, must be >= 0
/// * `mode` - Tone-list generation policy
/// * `rng` - Random generator; all stochastic draws come from here
///
/// # Errors
/// `DspError::InvalidParameter` when any precondition is violated; no
/// partial signal is constructed in that case.
pub fn generate_signal(
    fs: f64,
    duration: f64,
    noise_amplitude: f64,
    mode: GenerationMode,
    rng: &mut StdRng,
) -> DspResult<GeneratedSignal> {
    if !fs.is_finite() || fs <= 0.0 {
        return Err(DspError::InvalidParameter(format!(
            "sample rate must be positive, got {fs}"
        )));
    }
    if !duration.is_finite() || duration <= 0.0 {
        return Err(DspError::InvalidParameter(format!(
            "duration must be positive, got {duration}"
        )));
    }
    if !noise_amplitude.is_finite() || noise_amplitude < 0.0 {
        return Err(DspError::InvalidParameter(format!(
            "noise amplitude must be non-negative, got {noise_amplitude}"
        )));
    }

    let n = (duration * fs).floor() as usize;
    let time: Vec<f64> = (0..n).map(|i| i as f64 / fs).collect();

    let (tones, class) = resolve_tones(mode, fs, rng);

    // Superposition of the tone components. An empty tone list (NoiseOnly)
    // leaves a zero signal here.
    let mut samples = vec![0.0f64; n];
    for tone in &tones {
        for (s, &t) in samples.iter_mut().zip(time.iter()) {
            *s += tone.sample_at(t);
        }
    }

    // Additive Gaussian noise. Skipped entirely at zero amplitude so a pure
    // tonal signal is reproducible without touching the generator.
    if noise_amplitude > 0.0 {
        let unit = Normal::new(0.0, 1.0).unwrap();
        for s in samples.iter_mut() {
            *s += noise_amplitude * unit.sample(rng);
        }
    }

    tracing::debug!(
        mode = ?mode,
        class = ?class,
        components = tones.len(),
        samples = n,
        "synthesized signal"
    );

    Ok(GeneratedSignal {
        samples,
        time,
        metadata: SignalMetadata {
            mode,
            class,
            tones,
            noise_amplitude,
            sample_rate: fs,
            duration,
        },
    })
}

/// Generate a signal from an optional seed.
///
/// `Some(seed)` gives a fully reproducible signal; `None` draws entropy from
/// the operating system.
pub fn generate_signal_seeded(
    fs: f64,
    duration: f64,
    noise_amplitude: f64,
    mode: GenerationMode,
    seed: Option<u64>,
) -> DspResult<GeneratedSignal> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    generate_signal(fs, duration, noise_amplitude, mode, &mut rng)
}

/// Resolve the tone list for a generation mode.
fn resolve_tones(
    mode: GenerationMode,
    fs: f64,
    rng: &mut StdRng,
) -> (Vec<ToneComponent>, Option<SignalClass>) {
    match mode {
        GenerationMode::Educational => (educational_tones(), None),
        GenerationMode::FullyRandom => (random_tones(rng), None),
        GenerationMode::Archetype => {
            let class = draw_class(rng);
            let tones = match class {
                SignalClass::Pulsar => pulsar_tones(fs, rng),
                SignalClass::NoiseOnly => Vec::new(),
                SignalClass::Irregular => irregular_tones(rng),
            };
            (tones, Some(class))
        }
    }
}

/// 2–5 fully random tones: f ∈ U[1,50] Hz, A ∈ U[0.5,2.0], φ ∈ U[0,2π).
fn random_tones(rng: &mut StdRng) -> Vec<ToneComponent> {
    let count = rng.gen_range(2..=5);
    (0..count)
        .map(|_| {
            ToneComponent::new(
                rng.gen_range(1.0..50.0),
                rng.gen_range(0.5..2.0),
                rng.gen_range(0.0..2.0 * PI),
            )
        })
        .collect()
}

/// Draw the archetype class at the fixed 0.6 / 0.2 / 0.2 split.
fn draw_class(rng: &mut StdRng) -> SignalClass {
    let u: f64 = rng.gen();
    if u < 0.6 {
        SignalClass::Pulsar
    } else if u < 0.8 {
        SignalClass::NoiseOnly
    } else {
        SignalClass::Irregular
    }
}

/// Pulsar archetype: a fundamental in U[2,20] Hz plus 1–3 further tones,
/// each a harmonic of the fundamental with probability 0.7 (while it stays
/// comfortably below Nyquist) or an independent tone otherwise.
fn pulsar_tones(fs: f64, rng: &mut StdRng) -> Vec<ToneComponent> {
    let fundamental = rng.gen_range(2.0..20.0);
    let count = rng.gen_range(2..=4);
    let harmonic_cap = 0.45 * fs;

    let mut tones = vec![ToneComponent::new(
        fundamental,
        rng.gen_range(1.0..2.0),
        rng.gen_range(0.0..2.0 * PI),
    )];

    for m in 2..=count as u32 {
        let harmonic = fundamental * m as f64;
        let frequency = if rng.gen::<f64>() < 0.7 && harmonic < harmonic_cap {
            harmonic
        } else {
            rng.gen_range(1.0..50.0)
        };
        tones.push(ToneComponent::new(
            frequency,
            rng.gen_range(0.3..1.0),
            rng.gen_range(0.0..2.0 * PI),
        ));
    }

    tones
}

/// Irregular archetype: 1–3 closely spaced low-amplitude tones around a
/// random base frequency, producing a slow beat envelope.
fn irregular_tones(rng: &mut StdRng) -> Vec<ToneComponent> {
    let base: f64 = rng.gen_range(5.0..30.0);
    let count = rng.gen_range(1..=3);
    (0..count)
        .map(|_| {
            let frequency = (base + rng.gen_range(-1.5..1.5)).max(0.5);
            ToneComponent::new(
                frequency,
                rng.gen_range(0.2..0.6),
                rng.gen_range(0.0..2.0 * PI),
            )
        })
        .collect()
}
