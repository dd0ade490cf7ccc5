use ndarray::Array2;
use rustfft::num_complex::Complex64;

/// Amplitude that maps to 0 dB.
pub const REFERENCE_AMPLITUDE: f64 = 10e-6;

/// `20 * log10(magnitude / REFERENCE_AMPLITUDE)`.
///
/// A zero magnitude gives `f64::NEG_INFINITY`; no floor is applied here.
#[inline]
pub fn amplitude_to_db(magnitude: f64) -> f64 {
    20.0 * (magnitude / REFERENCE_AMPLITUDE).log10()
}

/// Elementwise decibel magnitude of a complex matrix.
///
/// Silent cells come out as `-inf`. Consumers that need finite values should
/// run [`clamp_floor`] on the result.
pub fn to_decibel_matrix(values: &Array2<Complex64>) -> Array2<f64> {
    values.mapv(|v| amplitude_to_db(v.norm()))
}

/// Raises every value below `floor_db` (and every NaN) to `floor_db`.
pub fn clamp_floor(decibels: &mut Array2<f64>, floor_db: f64) {
    decibels.mapv_inplace(|db| if db >= floor_db { db } else { floor_db });
}
