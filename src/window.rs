use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::SpectrogramError;

/// Maps a frame length to `len` non-negative weights.
///
/// Implemented for [`Window`] and for any `Fn(usize) -> Vec<f64>`, so a custom
/// taper can be handed to the STFT directly.
pub trait WindowFunction {
    fn weights(&self, len: usize) -> Vec<f64>;
}

impl<F> WindowFunction for F
where
    F: Fn(usize) -> Vec<f64>,
{
    fn weights(&self, len: usize) -> Vec<f64> {
        self(len)
    }
}

/// Symmetric tapering windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Window {
    #[default]
    Hann,
    Hamming,
    Blackman,
    Rectangular,
}

impl WindowFunction for Window {
    fn weights(&self, len: usize) -> Vec<f64> {
        match len {
            0 => Vec::new(),
            1 => vec![1.0],
            _ => {
                let denom = (len - 1) as f64;
                (0..len)
                    .map(|n| {
                        let phase = 2.0 * PI * n as f64 / denom;
                        match self {
                            Window::Hann => 0.5 - 0.5 * phase.cos(),
                            Window::Hamming => 0.54 - 0.46 * phase.cos(),
                            // clamp the -1e-17 style residue at the edges
                            Window::Blackman => {
                                (0.42 - 0.5 * phase.cos() + 0.08 * (2.0 * phase).cos()).max(0.0)
                            }
                            Window::Rectangular => 1.0,
                        }
                    })
                    .collect()
            }
        }
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Window::Hann => "hann",
            Window::Hamming => "hamming",
            Window::Blackman => "blackman",
            Window::Rectangular => "rectangular",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Window {
    type Err = SpectrogramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hann" | "hanning" => Ok(Window::Hann),
            "hamming" => Ok(Window::Hamming),
            "blackman" => Ok(Window::Blackman),
            "rectangular" | "rect" | "boxcar" => Ok(Window::Rectangular),
            other => Err(SpectrogramError::InvalidParameter(format!(
                "unknown window '{}'",
                other
            ))),
        }
    }
}

/// Multiplies `frame` by `weights` in place.
pub(crate) fn apply(frame: &mut [f64], weights: &[f64]) {
    frame
        .iter_mut()
        .zip(weights.iter())
        .for_each(|(x, w)| *x *= w);
}
