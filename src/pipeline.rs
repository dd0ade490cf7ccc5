use log::debug;
use ndarray::Array2;

use crate::axis::{self, Tick};
use crate::config::SpectrogramConfig;
use crate::decibel::to_decibel_matrix;
use crate::rebin::rebin_to_log_scale;
use crate::stft::StftEngine;
use crate::{Result, SpectrogramError};

/// A finished log-frequency spectrogram, ready for a renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrogram {
    /// `[timebins, M]` levels in dB; silent cells are `-inf`.
    pub decibels: Array2<f64>,
    /// Mean frequency in Hz of each of the `M` columns.
    pub freq_axis: Vec<f64>,
    pub sample_rate: u32,
    /// Length of the analysed signal before padding.
    pub sample_count: usize,
    pub frame_size: usize,
}

impl Spectrogram {
    pub fn timebins(&self) -> usize {
        self.decibels.nrows()
    }

    pub fn freqbins(&self) -> usize {
        self.decibels.ncols()
    }

    pub fn time_ticks(&self, count: usize) -> Vec<Tick> {
        axis::time_ticks(
            self.timebins(),
            self.sample_count,
            self.frame_size,
            self.sample_rate,
            count,
        )
    }

    pub fn frequency_ticks(&self, count: usize) -> Vec<Tick> {
        axis::frequency_ticks(&self.freq_axis, count)
    }
}

/// Runs framing, FFT, log-scale rebinning and dB conversion over `samples`.
pub fn compute_spectrogram(
    samples: &[f32],
    sample_rate: u32,
    config: &SpectrogramConfig,
) -> Result<Spectrogram> {
    config.validate()?;
    if sample_rate == 0 {
        return Err(SpectrogramError::InvalidParameter(
            "sample rate must be positive".into(),
        ));
    }

    let spec = StftEngine::new().transform(
        samples,
        sample_rate,
        config.frame_size,
        config.overlap,
        &config.window,
    )?;
    let rebinned = rebin_to_log_scale(&spec, sample_rate, config.warp_factor)?;
    let decibels = to_decibel_matrix(&rebinned.values);

    debug!(
        "spectrogram: {} x {} ({} window, warp {})",
        decibels.nrows(),
        decibels.ncols(),
        config.window,
        config.warp_factor
    );

    Ok(Spectrogram {
        decibels,
        freq_axis: rebinned.freq_axis,
        sample_rate,
        sample_count: samples.len(),
        frame_size: config.frame_size,
    })
}
