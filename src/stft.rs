use std::sync::Arc;

use log::{debug, warn};
use ndarray::Array2;
use rayon::prelude::*;
use rustfft::{num_complex::Complex64, num_traits::Zero, Fft, FftPlanner};

use crate::window::{self, WindowFunction};
use crate::{Result, SpectrogramError};

/// Number of samples between the starts of two consecutive frames.
///
/// `overlap` is the fraction of a frame shared with its successor and must lie
/// in `[0, 1)`.
pub fn hop_size(frame_size: usize, overlap: f64) -> Result<usize> {
    if frame_size == 0 {
        return Err(SpectrogramError::InvalidParameter(
            "frame size must be at least 1".into(),
        ));
    }
    if !overlap.is_finite() || !(0.0..1.0).contains(&overlap) {
        return Err(SpectrogramError::InvalidParameter(format!(
            "overlap factor must be in [0, 1), got {}",
            overlap
        )));
    }
    let shared = (overlap * frame_size as f64).floor() as usize;
    let hop = frame_size.saturating_sub(shared);
    if hop == 0 {
        return Err(SpectrogramError::InvalidParameter(format!(
            "overlap {} leaves no hop for frame size {}",
            overlap, frame_size
        )));
    }
    Ok(hop)
}

/// Number of frames extracted from a signal of `signal_len` samples.
///
/// The signal is shifted right by `frame_size / 2` zeros so the first frame is
/// centred on sample 0. The count is `ceil((padded - L) / H) + 1`, never less
/// than one.
pub fn frame_count(signal_len: usize, frame_size: usize, hop: usize) -> usize {
    let padded = frame_size / 2 + signal_len;
    if padded >= frame_size {
        (padded - frame_size).div_ceil(hop) + 1
    } else {
        // negative numerator: the formula gives <= 1 frame
        1
    }
}

/// Short-time Fourier transform over a complete mono buffer.
///
/// Holds an FFT planner so repeated transforms with the same frame size reuse
/// their plan.
pub struct StftEngine {
    fft_planner: FftPlanner<f64>,
}

impl Default for StftEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl StftEngine {
    pub fn new() -> Self {
        Self {
            fft_planner: FftPlanner::new(),
        }
    }

    /// Returns a `[frames, frame_size / 2 + 1]` matrix of complex coefficients.
    ///
    /// Frame `k` covers indices `[k * hop, k * hop + frame_size)` of the padded
    /// signal (`frame_size / 2` leading zeros, `frame_size` trailing zeros).
    /// Only the non-negative frequencies of each windowed frame are kept.
    pub fn transform<W>(
        &mut self,
        signal: &[f32],
        sample_rate: u32,
        frame_size: usize,
        overlap: f64,
        window: &W,
    ) -> Result<Array2<Complex64>>
    where
        W: WindowFunction + ?Sized,
    {
        let hop = hop_size(frame_size, overlap)?;
        if sample_rate == 0 {
            return Err(SpectrogramError::InvalidParameter(
                "sample rate must be positive".into(),
            ));
        }
        if signal.is_empty() {
            return Err(SpectrogramError::InvalidParameter(
                "signal is empty".into(),
            ));
        }
        let (padded_len, cells) = buffer_lengths(signal.len(), frame_size, hop)?;
        let weights = window.weights(frame_size);
        if weights.len() != frame_size {
            return Err(SpectrogramError::InvalidParameter(format!(
                "window produced {} weights for a frame of {}",
                weights.len(),
                frame_size
            )));
        }
        if frame_size > signal.len() {
            warn!(
                "frame size {} exceeds {} samples, zero-padding into {} frame(s)",
                frame_size,
                signal.len(),
                frame_count(signal.len(), frame_size, hop)
            );
        }

        let lead = frame_size / 2;
        let cols = frame_count(signal.len(), frame_size, hop);
        let freqbins = frame_size / 2 + 1;

        let mut padded = vec![0.0f64; padded_len];
        padded[lead..lead + signal.len()]
            .iter_mut()
            .zip(signal.iter())
            .for_each(|(dst, &s)| *dst = f64::from(s));

        let fft = self.fft_planner.plan_fft_forward(frame_size);
        let mut data = vec![Complex64::zero(); cells];

        data.par_chunks_mut(freqbins).enumerate().for_each_init(
            || FrameScratch::new(&fft, frame_size),
            |scratch, (k, row)| {
                let start = k * hop;
                scratch.load(&padded[start..start + frame_size], &weights);
                scratch.run(&fft);
                row.copy_from_slice(&scratch.spectrum[..freqbins]);
            },
        );

        debug!(
            "stft: {} samples -> {} frames x {} bins (frame {}, hop {})",
            signal.len(),
            cols,
            freqbins,
            frame_size,
            hop
        );

        Ok(Array2::from_shape_vec((cols, freqbins), data)?)
    }
}

/// Lengths of the padded signal and of the output matrix, rejecting frame
/// sizes whose buffers cannot be addressed.
fn buffer_lengths(signal_len: usize, frame_size: usize, hop: usize) -> Result<(usize, usize)> {
    let too_large = || {
        SpectrogramError::InvalidParameter(format!(
            "frame size {} is too large for a {}-sample signal",
            frame_size, signal_len
        ))
    };
    let fits = |len: usize, elem: usize| {
        len.checked_mul(elem)
            .filter(|&bytes| bytes <= isize::MAX as usize)
            .is_some()
    };

    let padded_len = (frame_size / 2)
        .checked_add(signal_len)
        .and_then(|n| n.checked_add(frame_size))
        .filter(|&n| fits(n, std::mem::size_of::<f64>()))
        .ok_or_else(too_large)?;
    let cells = frame_count(signal_len, frame_size, hop)
        .checked_mul(frame_size / 2 + 1)
        .filter(|&n| fits(n, std::mem::size_of::<Complex64>()))
        .ok_or_else(too_large)?;
    Ok((padded_len, cells))
}

/// Per-worker buffers for one frame.
struct FrameScratch {
    frame: Vec<f64>,
    spectrum: Vec<Complex64>,
    fft_scratch: Vec<Complex64>,
}

impl FrameScratch {
    fn new(fft: &Arc<dyn Fft<f64>>, frame_size: usize) -> Self {
        Self {
            frame: vec![0.0; frame_size],
            spectrum: vec![Complex64::zero(); frame_size],
            fft_scratch: vec![Complex64::zero(); fft.get_inplace_scratch_len()],
        }
    }

    fn load(&mut self, samples: &[f64], weights: &[f64]) {
        self.frame.copy_from_slice(samples);
        window::apply(&mut self.frame, weights);
        self.spectrum
            .iter_mut()
            .zip(self.frame.iter())
            .for_each(|(c, &x)| *c = Complex64::new(x, 0.0));
    }

    fn run(&mut self, fft: &Arc<dyn Fft<f64>>) {
        fft.process_with_scratch(&mut self.spectrum, &mut self.fft_scratch);
    }
}

/// One-shot STFT; see [`StftEngine::transform`].
pub fn compute_stft<W>(
    signal: &[f32],
    sample_rate: u32,
    frame_size: usize,
    overlap: f64,
    window: &W,
) -> Result<Array2<Complex64>>
where
    W: WindowFunction + ?Sized,
{
    StftEngine::new().transform(signal, sample_rate, frame_size, overlap, window)
}
