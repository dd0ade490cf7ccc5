//! Pipeline parameters.

use crate::stft::hop_size;
use crate::window::Window;
use crate::{Result, SpectrogramError};

/// Parameters for [`compute_spectrogram`](crate::compute_spectrogram).
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrogramConfig {
    /// STFT frame length in samples (default: 1024)
    pub frame_size: usize,

    /// Fraction of each frame shared with the next, in `[0, 1)` (default: 0.5)
    pub overlap: f64,

    /// Exponent of the frequency warp (default: 1.0)
    /// 1.0 keeps the linear bins; larger values merge more high-frequency bins
    pub warp_factor: f64,

    /// Taper applied to each frame (default: Hann)
    pub window: Window,
}

impl Default for SpectrogramConfig {
    fn default() -> Self {
        Self {
            frame_size: 1024,
            overlap: 0.5,
            warp_factor: 1.0,
            window: Window::Hann,
        }
    }
}

impl SpectrogramConfig {
    /// Checks every parameter without touching any audio.
    pub fn validate(&self) -> Result<()> {
        hop_size(self.frame_size, self.overlap)?;
        if !self.warp_factor.is_finite() || self.warp_factor <= 0.0 {
            return Err(SpectrogramError::InvalidParameter(format!(
                "warp factor must be a positive finite number, got {}",
                self.warp_factor
            )));
        }
        Ok(())
    }

    pub fn hop_size(&self) -> Result<usize> {
        hop_size(self.frame_size, self.overlap)
    }
}
