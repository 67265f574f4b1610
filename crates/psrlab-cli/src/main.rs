//! Pulsar Detection Teaching Toolkit — Command-Line Interface
//!
//! Drives the core DSP library from the terminal:
//! - `demo` runs the seeded end-to-end walkthrough (generate → filter →
//!   analyze → detect) and prints a report of every stage
//! - `generate` synthesizes a signal under a chosen policy and optionally
//!   dumps it to a text file, one sample per line
//! - `analyze` reads such a dump and runs the detection pipeline over it
//!
//! The CLI is presentation only: it hands plain numeric vectors to the core
//! and formats what comes back.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use psrlab_core::detect::SearchBand;
use psrlab_core::io::{read_samples, write_samples};
use psrlab_core::pipeline::{process_signal, FilterSpec, ProcessingResult};
use psrlab_core::synth::{generate_signal_seeded, GeneratedSignal, GenerationMode};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "psrlab")]
#[command(author, version, about = "Pulsar detection teaching toolkit", long_about = None)]
struct Cli {
    /// Enable verbose output (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Signal generation policy.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Three fixed, well-separated tones
    Educational,
    /// 2-5 fully random tones
    Random,
    /// Random signal class: pulsar, noise-only, or irregular
    Archetype,
}

impl From<ModeArg> for GenerationMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Educational => GenerationMode::Educational,
            ModeArg::Random => GenerationMode::FullyRandom,
            ModeArg::Archetype => GenerationMode::Archetype,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run the seeded end-to-end detection walkthrough
    Demo {
        /// Sample rate in Hz
        #[arg(long, default_value = "1000")]
        fs: f64,

        /// Signal duration in seconds
        #[arg(long, default_value = "2.0")]
        duration: f64,

        /// Gaussian noise standard deviation
        #[arg(long, default_value = "0.5")]
        noise: f64,

        /// Low-pass cutoff frequency in Hz
        #[arg(long, default_value = "35.0")]
        cutoff: f64,

        /// Butterworth filter order
        #[arg(long, default_value = "5")]
        order: usize,

        /// Random seed for reproducibility
        #[arg(long, default_value = "42")]
        seed: u64,
    },

    /// Synthesize a signal and optionally dump it to a text file
    Generate {
        /// Generation policy
        #[arg(long, value_enum, default_value = "educational")]
        mode: ModeArg,

        /// Sample rate in Hz
        #[arg(long, default_value = "1000")]
        fs: f64,

        /// Signal duration in seconds
        #[arg(long, default_value = "2.0")]
        duration: f64,

        /// Gaussian noise standard deviation
        #[arg(long, default_value = "0.5")]
        noise: f64,

        /// Random seed; omit for entropy from the OS
        #[arg(long)]
        seed: Option<u64>,

        /// Output file, one sample per line
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Analyze a sample dump with the detection pipeline
    Analyze {
        /// Input file, one sample per line
        #[arg(short, long)]
        input: PathBuf,

        /// Sample rate the dump was recorded at, in Hz
        #[arg(long, default_value = "1000")]
        fs: f64,

        /// Low-pass cutoff frequency in Hz
        #[arg(long, default_value = "55.0")]
        cutoff: f64,

        /// Butterworth filter order
        #[arg(long, default_value = "5")]
        order: usize,

        /// Emit the full result bundle as JSON instead of a report
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_string()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Demo {
            fs,
            duration,
            noise,
            cutoff,
            order,
            seed,
        } => cmd_demo(fs, duration, noise, cutoff, order, seed),
        Commands::Generate {
            mode,
            fs,
            duration,
            noise,
            seed,
            output,
        } => cmd_generate(mode, fs, duration, noise, seed, output),
        Commands::Analyze {
            input,
            fs,
            cutoff,
            order,
            json,
        } => cmd_analyze(&input, fs, cutoff, order, json),
    }
}

fn cmd_demo(fs: f64, duration: f64, noise: f64, cutoff: f64, order: usize, seed: u64) -> Result<()> {
    println!("PULSAR DETECTION DEMO");
    println!("{}", "=".repeat(50));
    println!("Parameters:");
    println!("  sample rate:     {fs} Hz");
    println!("  duration:        {duration} s");
    println!("  noise sigma:     {noise}");
    println!("  filter:          Butterworth order {order}, cutoff {cutoff} Hz");
    println!("  seed:            {seed}");

    println!("\n[1/3] Synthesizing signal...");
    let sig = generate_signal_seeded(fs, duration, noise, GenerationMode::Educational, Some(seed))
        .context("signal generation failed")?;
    println!("  {} samples generated", sig.samples.len());
    print_tone_table(&sig);

    println!("\n[2/3] Filtering and analyzing...");
    let result = process_signal(
        &sig.samples,
        fs,
        &FilterSpec {
            cutoff_hz: cutoff,
            order,
        },
        &SearchBand::default(),
    )
    .context("signal processing failed")?;
    println!("  spectral resolution: {:.3} Hz", result.resolution_hz);
    println!("  estimated SNR:       {:.1} dB", result.snr_db);

    println!("\n[3/3] Detection:");
    print_detection(&result);
    Ok(())
}

fn cmd_generate(
    mode: ModeArg,
    fs: f64,
    duration: f64,
    noise: f64,
    seed: Option<u64>,
    output: Option<PathBuf>,
) -> Result<()> {
    let sig = generate_signal_seeded(fs, duration, noise, mode.into(), seed)
        .context("signal generation failed")?;

    println!(
        "Generated {} samples ({}s at {} Hz), mode {:?}",
        sig.samples.len(),
        duration,
        fs,
        sig.metadata.mode
    );
    if let Some(class) = sig.metadata.class {
        println!("Resolved class: {class:?}");
    }
    print_tone_table(&sig);

    if let Some(path) = output {
        write_samples(&path, &sig.samples)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), samples = sig.samples.len(), "wrote sample dump");
        println!("Saved to {}", path.display());
    }
    Ok(())
}

fn cmd_analyze(input: &PathBuf, fs: f64, cutoff: f64, order: usize, json: bool) -> Result<()> {
    let samples = read_samples(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    info!(samples = samples.len(), "loaded sample dump");

    let result = process_signal(
        &samples,
        fs,
        &FilterSpec {
            cutoff_hz: cutoff,
            order,
        },
        &SearchBand::default(),
    )
    .context("signal processing failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("Analyzed {} samples at {} Hz", samples.len(), fs);
        println!("  filter:              Butterworth order {order}, cutoff {cutoff} Hz");
        println!("  spectral resolution: {:.3} Hz", result.resolution_hz);
        println!("  estimated SNR:       {:.1} dB", result.snr_db);
        print_detection(&result);
    }
    Ok(())
}

fn print_tone_table(sig: &GeneratedSignal) {
    if sig.metadata.tones.is_empty() {
        println!("  no tonal components (pure noise)");
        return;
    }
    println!("  {:>12}  {:>9}  {:>9}", "freq (Hz)", "amp", "phase");
    for tone in &sig.metadata.tones {
        println!(
            "  {:>12.3}  {:>9.3}  {:>9.3}",
            tone.frequency_hz, tone.amplitude, tone.phase_rad
        );
    }
}

fn print_detection(result: &ProcessingResult) {
    if result.detection.is_detection() {
        println!(
            "  PULSAR DETECTED: {:.2} Hz (period {:.4} s)",
            result.detection.frequency_hz, result.detection.period_s
        );
    } else {
        println!("  NO DETECTION (search band empty or no usable peak)");
    }
}
