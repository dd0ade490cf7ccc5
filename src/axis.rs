//! Tick positions and labels for drawing a spectrogram.
//!
//! Positions are in matrix coordinates (row or column index), values are
//! seconds on the time axis and Hz on the frequency axis.

use serde::Serialize;

pub const DEFAULT_TIME_TICKS: usize = 5;
pub const DEFAULT_FREQUENCY_TICKS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tick {
    pub position: f64,
    pub value: f64,
}

impl Tick {
    pub fn label(&self) -> String {
        format!("{:.2}", self.value)
    }
}

/// `count` evenly spaced points from `start` to `stop` inclusive.
fn linspace(start: f64, stop: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (count - 1) as f64;
            (0..count).map(|i| start + i as f64 * step).collect()
        }
    }
}

/// Ticks along the time axis of a `timebins`-row spectrogram.
///
/// The label of a row is the time of its frame centre, counting the
/// half-frame of leading padding.
pub fn time_ticks(
    timebins: usize,
    sample_count: usize,
    frame_size: usize,
    sample_rate: u32,
    count: usize,
) -> Vec<Tick> {
    if timebins == 0 || sample_rate == 0 {
        return Vec::new();
    }
    let sr = f64::from(sample_rate);
    linspace(0.0, (timebins - 1) as f64, count)
        .into_iter()
        .map(|position| Tick {
            position,
            value: (position * sample_count as f64 / timebins as f64 + 0.5 * frame_size as f64)
                / sr,
        })
        .collect()
}

/// Ticks along the log-scaled frequency axis, labelled with the bin's mean Hz.
pub fn frequency_ticks(freq_axis: &[f64], count: usize) -> Vec<Tick> {
    if freq_axis.is_empty() {
        return Vec::new();
    }
    linspace(0.0, (freq_axis.len() - 1) as f64, count)
        .into_iter()
        .map(|loc| {
            let index = (loc.round_ties_even() as usize).min(freq_axis.len() - 1);
            Tick {
                position: index as f64,
                value: freq_axis[index],
            }
        })
        .collect()
}
