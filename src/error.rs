use thiserror::Error;

/// Errors raised by the spectrogram pipeline.
///
/// Every stage validates its inputs before allocating anything, so an error
/// never comes with a partially filled matrix.
#[derive(Error, Debug)]
pub enum SpectrogramError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("audio error: {0}")]
    Audio(#[from] hound::Error),

    #[error("matrix shape error: {0}")]
    Shape(String),
}

impl From<ndarray::ShapeError> for SpectrogramError {
    fn from(e: ndarray::ShapeError) -> Self {
        SpectrogramError::Shape(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SpectrogramError>;
