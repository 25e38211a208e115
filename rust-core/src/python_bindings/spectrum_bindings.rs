//! Python bindings for frequency-response evaluation

use crate::spectrum::{frequency_response, DEFAULT_POINTS};
use numpy::{PyArray1, PyReadonlyArray1};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

/// Frequency response of arbitrary FIR coefficients
///
/// Args:
///     coefficients: Filter taps as numpy array
///     sample_rate: Sampling rate in Hz
///     points: Number of frequencies in [0, sample_rate/2) (default: 100)
///     db: Return magnitude in dB instead of linear (default: False)
///
/// Returns:
///     (frequencies in Hz, magnitude) as numpy arrays
#[pyfunction]
#[pyo3(
    name = "frequency_response",
    signature = (coefficients, sample_rate, points=DEFAULT_POINTS, db=false)
)]
pub fn py_frequency_response<'py>(
    py: Python<'py>,
    coefficients: PyReadonlyArray1<f64>,
    sample_rate: f64,
    points: usize,
    db: bool,
) -> PyResult<(&'py PyArray1<f64>, &'py PyArray1<f64>)> {
    let taps = coefficients
        .as_slice()
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    let response = frequency_response(taps, sample_rate, points)
        .map_err(|e| PyValueError::new_err(e.to_string()))?;

    let magnitude = if db {
        response.magnitude_db()
    } else {
        response.magnitude()
    };

    Ok((
        PyArray1::from_vec(py, response.frequencies_hz),
        PyArray1::from_vec(py, magnitude),
    ))
}
