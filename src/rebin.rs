//! Log-scale frequency rebinning.
//!
//! The linear FFT bins are partitioned into contiguous groups whose boundaries
//! follow a power-law warp of the bin index, so low frequencies keep their
//! resolution and high frequencies are merged. Each group's complex values are
//! summed, which keeps the per-frame total of the spectrum unchanged.

use std::ops::Range;

use log::debug;
use ndarray::{s, Array1, Array2, Axis};
use rayon::prelude::*;
use rustfft::num_complex::Complex64;

use crate::{Result, SpectrogramError};

/// Output of [`rebin_to_log_scale`].
#[derive(Debug, Clone, PartialEq)]
pub struct Rebinned {
    /// `[timebins, M]` summed complex values.
    pub values: Array2<Complex64>,
    /// Mean frequency in Hz of the linear bins merged into each column.
    pub freq_axis: Vec<f64>,
    /// First linear bin of each column; the last column runs to the end.
    pub boundaries: Vec<usize>,
}

fn check_factor(factor: f64) -> Result<()> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(SpectrogramError::InvalidParameter(format!(
            "warp factor must be a positive finite number, got {}",
            factor
        )));
    }
    Ok(())
}

/// First linear bin index of every log-scaled bin.
///
/// Positions `j / (freqbins - 1)` are raised to `factor`, stretched back onto
/// `[0, freqbins - 1]`, rounded half-to-even and deduplicated. The result is
/// strictly increasing, starts at 0 and ends at `freqbins - 1`.
pub fn log_scale_boundaries(freqbins: usize, factor: f64) -> Result<Vec<usize>> {
    check_factor(factor)?;
    if freqbins == 0 {
        return Err(SpectrogramError::InvalidParameter(
            "spectrum has no frequency bins".into(),
        ));
    }
    if freqbins == 1 {
        return Ok(vec![0]);
    }

    // positions j * (1 / last), the final one pinned to exactly 1; rounding
    // ties depend on this order of operations
    let last = (freqbins - 1) as f64;
    let step = 1.0 / last;
    let scale: Vec<f64> = (0..freqbins)
        .map(|j| {
            let position = if j == freqbins - 1 { 1.0 } else { j as f64 * step };
            position.powf(factor)
        })
        .collect();
    let max = scale.iter().cloned().fold(f64::MIN, f64::max);
    let stretch = last / max;

    let mut boundaries: Vec<usize> = scale
        .iter()
        .map(|&v| (v * stretch).round_ties_even() as usize)
        .collect();
    boundaries.sort();
    boundaries.dedup();
    Ok(boundaries)
}

/// Absolute FFT frequencies `k * sr / (2 * freqbins)` for `k` in `0..freqbins`.
///
/// These are the bin frequencies of a virtual FFT of length `2 * freqbins`.
pub fn fft_bin_frequencies(freqbins: usize, sample_rate: u32) -> Vec<f64> {
    let step = f64::from(sample_rate) / (2 * freqbins) as f64;
    (0..freqbins).map(|k| k as f64 * step).collect()
}

fn bin_ranges(boundaries: &[usize], freqbins: usize) -> Vec<Range<usize>> {
    boundaries
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = boundaries.get(i + 1).copied().unwrap_or(freqbins);
            start..end
        })
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sums the columns of `spec` into log-spaced bins.
///
/// Column `i` of the result is the sum of `spec` columns
/// `boundaries[i]..boundaries[i + 1]`, the last column taking everything from
/// its boundary to the end.
pub fn rebin_to_log_scale(
    spec: &Array2<Complex64>,
    sample_rate: u32,
    factor: f64,
) -> Result<Rebinned> {
    if sample_rate == 0 {
        return Err(SpectrogramError::InvalidParameter(
            "sample rate must be positive".into(),
        ));
    }
    let (timebins, freqbins) = spec.dim();
    if timebins == 0 {
        return Err(SpectrogramError::InvalidParameter(
            "spectrum has no time frames".into(),
        ));
    }
    let boundaries = log_scale_boundaries(freqbins, factor)?;
    let ranges = bin_ranges(&boundaries, freqbins);

    let columns: Vec<Array1<Complex64>> = ranges
        .par_iter()
        .map(|range| spec.slice(s![.., range.clone()]).sum_axis(Axis(1)))
        .collect();

    let mut values = Array2::<Complex64>::zeros((timebins, ranges.len()));
    for (mut dst, src) in values.axis_iter_mut(Axis(1)).zip(columns.iter()) {
        dst.assign(src);
    }

    let allfreqs = fft_bin_frequencies(freqbins, sample_rate);
    let freq_axis: Vec<f64> = ranges
        .iter()
        .map(|range| mean(&allfreqs[range.clone()]))
        .collect();

    debug!(
        "rebin: {} linear bins -> {} log bins (factor {})",
        freqbins,
        boundaries.len(),
        factor
    );

    Ok(Rebinned {
        values,
        freq_axis,
        boundaries,
    })
}
