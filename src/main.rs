use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use serde::Serialize;

use logspec::axis::{Tick, DEFAULT_FREQUENCY_TICKS, DEFAULT_TIME_TICKS};
use logspec::{clamp_floor, compute_spectrogram, AudioInput, SpectrogramConfig, Window};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// path to the audio file (WAV format)
    input: PathBuf,

    /// STFT frame length in samples
    #[arg(long, default_value_t = 1024)]
    frame_size: usize,

    /// fraction of each frame shared with the next, in [0, 1)
    #[arg(long, default_value_t = 0.5)]
    overlap: f64,

    /// exponent of the frequency warp, 1.0 keeps linear bins
    #[arg(long, default_value_t = 1.0)]
    warp: f64,

    /// hann, hamming, blackman or rectangular
    #[arg(long, default_value_t = Window::Hann)]
    window: Window,

    /// lowest level written to the output, in dB
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    floor_db: f64,

    /// channel to analyse in a multi-channel file
    #[arg(long, default_value_t = 0)]
    channel: u16,

    /// JSON output path, stdout if not provided
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Serialize)]
struct Report {
    sample_rate: u32,
    sample_count: usize,
    frame_size: usize,
    freq_axis: Vec<f64>,
    /// one row per time frame
    decibels: Vec<Vec<f64>>,
    time_ticks: Vec<Tick>,
    frequency_ticks: Vec<Tick>,
}

fn main() -> Result<()> {
    // initialize the logger
    env_logger::init();

    // parse command-line arguments
    let args = Args::parse();

    let audio = AudioInput::open(&args.input, args.channel)
        .with_context(|| format!("failed to read {}", args.input.display()))?;

    let config = SpectrogramConfig {
        frame_size: args.frame_size,
        overlap: args.overlap,
        warp_factor: args.warp,
        window: args.window,
    };

    info!("Computing spectrogram with {:?}", config);
    let sample_rate = audio.sample_rate();
    let samples = audio.into_samples();
    let mut spectrogram = compute_spectrogram(&samples, sample_rate, &config)
        .context("spectrogram computation failed")?;

    // JSON has no -inf
    clamp_floor(&mut spectrogram.decibels, args.floor_db);

    let report = Report {
        sample_rate: spectrogram.sample_rate,
        sample_count: spectrogram.sample_count,
        frame_size: spectrogram.frame_size,
        decibels: spectrogram
            .decibels
            .rows()
            .into_iter()
            .map(|row| row.to_vec())
            .collect(),
        time_ticks: spectrogram.time_ticks(DEFAULT_TIME_TICKS),
        frequency_ticks: spectrogram.frequency_ticks(DEFAULT_FREQUENCY_TICKS),
        freq_axis: spectrogram.freq_axis,
    };

    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };
    serde_json::to_writer(&mut writer, &report).context("failed to write JSON")?;
    writeln!(writer)?;
    writer.flush()?;

    info!(
        "Wrote {} x {} spectrogram",
        report.decibels.len(),
        report.freq_axis.len()
    );
    Ok(())
}
