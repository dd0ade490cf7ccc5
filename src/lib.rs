//! Log-frequency spectrograms of mono audio buffers.
//!
//! The pipeline runs in three stages, each usable on its own:
//!
//! 1. [`compute_stft`]: centre-padded, overlapping, windowed frames through
//!    a forward FFT, keeping the `frame_size / 2 + 1` non-negative bins.
//! 2. [`rebin_to_log_scale`]: sums linear bins into power-law spaced bins and
//!    reports the mean frequency of each.
//! 3. [`to_decibel_matrix`]: `20 * log10(|v| / 10e-6)` per cell.
//!
//! [`compute_spectrogram`] chains them from a [`SpectrogramConfig`]. Drawing
//! the result is left to the caller; [`axis`] computes tick labels for it.

pub mod audio;
pub mod axis;
pub mod config;
pub mod decibel;
mod error;
pub mod pipeline;
pub mod rebin;
pub mod stft;
pub mod window;

pub use audio::AudioInput;
pub use config::SpectrogramConfig;
pub use decibel::{amplitude_to_db, clamp_floor, to_decibel_matrix, REFERENCE_AMPLITUDE};
pub use error::{Result, SpectrogramError};
pub use pipeline::{compute_spectrogram, Spectrogram};
pub use rebin::{fft_bin_frequencies, log_scale_boundaries, rebin_to_log_scale, Rebinned};
pub use stft::{compute_stft, frame_count, hop_size, StftEngine};
pub use window::{Window, WindowFunction};

pub use ndarray::Array2;
pub use rustfft::num_complex::Complex64;
