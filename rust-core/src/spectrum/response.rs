//! Frequency response of a designed filter
//!
//! Evaluates H(e^jw) = Σ h[m]·e^(-jwm) on `points` frequencies
//! w_k = πk/points, k = 0..points, i.e. from DC up to (not including) Nyquist.
//! The evaluation is a zero-padded real FFT whose size is a multiple of
//! 2·points long enough to hold every tap, so each returned bin is an exact
//! DTFT sample.

use super::fft::FftEngine;
use num_complex::Complex64;
use std::f64::consts::PI;
use thiserror::Error;

/// Default number of frequency points
pub const DEFAULT_POINTS: usize = 100;

#[derive(Error, Debug)]
pub enum ResponseError {
    #[error("cannot evaluate the response of an empty filter")]
    EmptyFilter,

    #[error("number of frequency points must be greater than 0")]
    NoPoints,

    #[error("FFT failed: {0}")]
    Fft(#[from] realfft::FftError),
}

/// Sampled frequency response
#[derive(Debug, Clone)]
pub struct FrequencyResponse {
    /// Evaluation frequencies in Hz
    pub frequencies_hz: Vec<f64>,

    /// Complex response at each frequency
    pub response: Vec<Complex64>,
}

impl FrequencyResponse {
    /// |H|
    pub fn magnitude(&self) -> Vec<f64> {
        self.response.iter().map(|h| h.norm()).collect()
    }

    /// 20·log10|H|, clamped to avoid log(0)
    pub fn magnitude_db(&self) -> Vec<f64> {
        self.response
            .iter()
            .map(|h| 20.0 * h.norm().max(1e-10).log10())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.response.len()
    }

    pub fn is_empty(&self) -> bool {
        self.response.is_empty()
    }
}

/// Frequency response of `coefficients` sampled at `sampling_rate_hz`
pub fn frequency_response(
    coefficients: &[f64],
    sampling_rate_hz: f64,
    points: usize,
) -> Result<FrequencyResponse, ResponseError> {
    if coefficients.is_empty() {
        return Err(ResponseError::EmptyFilter);
    }
    if points == 0 {
        return Err(ResponseError::NoPoints);
    }

    let base = 2 * points;
    let stride = coefficients.len().div_ceil(base);
    let mut engine = FftEngine::new(base * stride);
    let spectrum = engine.compute_spectrum(coefficients)?;

    let response: Vec<Complex64> = (0..points).map(|k| spectrum[k * stride]).collect();
    let frequencies_hz = (0..points)
        .map(|k| {
            let w = PI * k as f64 / points as f64;
            w * sampling_rate_hz / (2.0 * PI)
        })
        .collect();

    Ok(FrequencyResponse {
        frequencies_hz,
        response,
    })
}
