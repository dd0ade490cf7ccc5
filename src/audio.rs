use std::path::Path;

use hound::{SampleFormat, WavReader};
use log::{info, warn};

use crate::{Result, SpectrogramError};

/// One channel of a WAV file, decoded to `f32` in `[-1, 1]`.
pub struct AudioInput {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl AudioInput {
    /// Decodes channel `channel` of the WAV file at `path`.
    pub fn open<P: AsRef<Path>>(path: P, channel: u16) -> Result<Self> {
        let reader = WavReader::open(path.as_ref())?;
        let spec = reader.spec();

        if channel >= spec.channels {
            return Err(SpectrogramError::InvalidParameter(format!(
                "channel {} requested from a {}-channel file",
                channel, spec.channels
            )));
        }
        if spec.channels > 1 {
            warn!(
                "{} has {} channels, analysing channel {} only",
                path.as_ref().display(),
                spec.channels,
                channel
            );
        }

        let interleaved: Vec<f32> = match spec.sample_format {
            SampleFormat::Float => reader
                .into_samples::<f32>()
                .collect::<std::result::Result<Vec<f32>, hound::Error>>()?,
            SampleFormat::Int => {
                let max_value = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .into_samples::<i32>()
                    .map(|s| s.map(|s| s as f32 / max_value))
                    .collect::<std::result::Result<Vec<f32>, hound::Error>>()?
            }
        };

        let samples: Vec<f32> = interleaved
            .chunks(spec.channels as usize)
            .filter_map(|frame| frame.get(channel as usize).copied())
            .collect();

        info!(
            "loaded {} samples at {} Hz from {}",
            samples.len(),
            spec.sample_rate,
            path.as_ref().display()
        );

        Ok(Self {
            samples,
            sample_rate: spec.sample_rate,
        })
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }
}
