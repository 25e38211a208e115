//! Python bindings for FIR filter design

use crate::config::Precision;
use crate::error::{ConfigError, DesignError};
use crate::filters::{FilterDesign, FirDesigner};
use crate::output::{half_sequence_matrix, CoefficientTable, HalfSequenceTable};
use crate::spectrum::{frequency_response, DEFAULT_POINTS};
use crate::validation::validate_config;
use numpy::{IntoPyArray, PyArray1, PyArray2};
use pyo3::exceptions::{
    PyKeyError, PyRuntimeError, PyTypeError, PyValueError, PyZeroDivisionError,
};
use pyo3::prelude::*;
use pyo3::types::{PyBool, PyDict, PyFloat, PyList, PyLong, PyString, PyTuple};
use serde_json::{Map, Number, Value};

/// Map a design failure onto the matching Python exception
pub(crate) fn design_error_to_py(err: DesignError) -> PyErr {
    let message = err.to_string();
    match err {
        DesignError::Config(ConfigError::MissingKeys(_)) => PyKeyError::new_err(message),
        DesignError::Config(ConfigError::IncorrectType(_) | ConfigError::NotAMap) => {
            PyTypeError::new_err(message)
        }
        DesignError::DivisionByZero { .. } => PyZeroDivisionError::new_err(message),
        DesignError::OrderNotDefined => PyRuntimeError::new_err(message),
        _ => PyValueError::new_err(message),
    }
}

/// Convert a Python value into JSON, leaving type checks to the validator
///
/// Values with no JSON counterpart become `null`, which the validator
/// reports as an incorrect type.
fn to_json(value: &PyAny) -> PyResult<Value> {
    if value.is_none() {
        return Ok(Value::Null);
    }
    // bool before int: Python bools are ints
    if let Ok(flag) = value.downcast::<PyBool>() {
        return Ok(Value::Bool(flag.is_true()));
    }
    if let Ok(int) = value.downcast::<PyLong>() {
        return Ok(match int.extract::<i64>() {
            Ok(n) => Value::from(n),
            Err(_) => float_value(int.extract::<f64>()?),
        });
    }
    if let Ok(float) = value.downcast::<PyFloat>() {
        return Ok(float_value(float.value()));
    }
    if let Ok(text) = value.downcast::<PyString>() {
        return Ok(Value::String(text.to_str()?.to_owned()));
    }
    if let Ok(list) = value.downcast::<PyList>() {
        return list.iter().map(to_json).collect::<PyResult<Vec<_>>>().map(Value::Array);
    }
    if let Ok(tuple) = value.downcast::<PyTuple>() {
        return tuple.iter().map(to_json).collect::<PyResult<Vec<_>>>().map(Value::Array);
    }
    if let Ok(dict) = value.downcast::<PyDict>() {
        return dict_to_json(dict);
    }
    Ok(Value::Null)
}

fn float_value(value: f64) -> Value {
    Number::from_f64(value).map(Value::Number).unwrap_or(Value::Null)
}

fn dict_to_json(dict: &PyDict) -> PyResult<Value> {
    let mut map = Map::new();
    for (key, value) in dict.iter() {
        map.insert(key.str()?.to_str()?.to_owned(), to_json(value)?);
    }
    Ok(Value::Object(map))
}

fn json_to_py(py: Python<'_>, value: &Value) -> PyResult<PyObject> {
    Ok(match value {
        Value::Null => py.None(),
        Value::Bool(flag) => flag.into_py(py),
        Value::Number(n) => match n.as_i64() {
            Some(i) => i.into_py(py),
            None => n.as_f64().unwrap_or(f64::NAN).into_py(py),
        },
        Value::String(s) => s.as_str().into_py(py),
        Value::Array(items) => {
            let converted = items
                .iter()
                .map(|item| json_to_py(py, item))
                .collect::<PyResult<Vec<_>>>()?;
            PyList::new(py, converted).into_py(py)
        }
        Value::Object(map) => {
            let dict = PyDict::new(py);
            for (key, item) in map {
                dict.set_item(key, json_to_py(py, item)?)?;
            }
            dict.into_py(py)
        }
    })
}

/// Designed FIR filter exposed to Python
#[pyclass(name = "FilterDesign")]
pub struct PyFilterDesign {
    design: FilterDesign,
}

#[pymethods]
impl PyFilterDesign {
    /// Full symmetric coefficient sequence (length N)
    #[getter]
    fn coefficients<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        PyArray1::from_slice(py, &self.design.coefficients)
    }

    /// Window taps w[0..=n]
    #[getter]
    fn window<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        PyArray1::from_slice(py, &self.design.window)
    }

    /// Ideal taps h[0..=n]
    #[getter]
    fn ideal<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        PyArray1::from_slice(py, &self.design.ideal)
    }

    /// Windowed half sequence h[k]·w[k]
    #[getter]
    fn half_coefficients<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        PyArray1::from_slice(py, &self.design.half_coefficients)
    }

    #[getter]
    fn sampling_rate(&self) -> f64 {
        self.design.sampling_rate_hz
    }

    /// Design diagnostics as a dict
    ///
    /// Keys: delta, AS, AP, D, alpha, N, N_o, n
    #[getter]
    fn parameters(&self, py: Python<'_>) -> PyResult<PyObject> {
        let p = self.design.parameters;
        let dict = PyDict::new(py);
        dict.set_item("delta", p.delta)?;
        dict.set_item("AS", p.attenuation_db)?;
        dict.set_item("AP", p.ripple_db)?;
        dict.set_item("D", p.d_factor)?;
        dict.set_item("alpha", p.alpha)?;
        dict.set_item("N", p.length)?;
        dict.set_item("N_o", p.raw_order)?;
        dict.set_item("n", p.half_order)?;
        Ok(dict.into_py(py))
    }

    /// Half sequence as an (n+1, 4) array: index, window, ideal, coefficient
    fn half_table<'py>(&self, py: Python<'py>) -> &'py PyArray2<f64> {
        half_sequence_matrix(&self.design).into_pyarray(py)
    }

    /// Box-drawn table of the coefficients
    ///
    /// Args:
    ///     half: Render the half-sequence breakdown instead (default: False)
    #[pyo3(signature = (half=false))]
    fn table(&self, half: bool) -> String {
        if half {
            HalfSequenceTable::new(&self.design).to_string()
        } else {
            CoefficientTable::new(&self.design.coefficients).to_string()
        }
    }

    /// Magnitude response on `points` frequencies in [0, F/2)
    ///
    /// Returns:
    ///     (frequencies in Hz, magnitude) as numpy arrays
    #[pyo3(signature = (points=DEFAULT_POINTS))]
    fn magnitude_response<'py>(
        &self,
        py: Python<'py>,
        points: usize,
    ) -> PyResult<(&'py PyArray1<f64>, &'py PyArray1<f64>)> {
        let response =
            frequency_response(&self.design.coefficients, self.design.sampling_rate_hz, points)
                .map_err(|e| PyValueError::new_err(e.to_string()))?;
        let magnitude = response.magnitude();

        Ok((
            PyArray1::from_vec(py, response.frequencies_hz),
            PyArray1::from_vec(py, magnitude),
        ))
    }

    /// Serialize the whole design as JSON
    fn to_json(&self) -> PyResult<String> {
        serde_json::to_string(&self.design).map_err(|e| PyValueError::new_err(e.to_string()))
    }

    fn __len__(&self) -> usize {
        self.design.length()
    }

    fn __repr__(&self) -> String {
        let p = self.design.parameters;
        format!(
            "FilterDesign(N={}, n={}, AS={}, D={})",
            p.length, p.half_order, p.attenuation_db, p.d_factor
        )
    }
}

/// Design a FIR filter from a configuration dict
///
/// Args:
///     config: Keys Ap, As, fp, fs, F, filter_type, filter_window
///         (plus fp2 and fs2 for bandpass/stopband)
///     precision: Decimal places every value is rounded to (default: 7)
///
/// Raises:
///     KeyError, TypeError, ValueError, ZeroDivisionError or RuntimeError
#[pyfunction]
#[pyo3(signature = (config, precision=Precision::DEFAULT_PLACES))]
pub fn design(config: &PyDict, precision: u32) -> PyResult<PyFilterDesign> {
    let candidate = dict_to_json(config)?;
    let precision = Precision::new(precision).map_err(design_error_to_py)?;
    let design = FirDesigner::new(precision)
        .design_value(&candidate)
        .map_err(design_error_to_py)?;

    Ok(PyFilterDesign { design })
}

/// Validate a configuration dict without designing
///
/// Returns:
///     The normalized configuration as a dict
#[pyfunction]
pub fn validate(py: Python<'_>, config: &PyDict) -> PyResult<PyObject> {
    let candidate = dict_to_json(config)?;
    let validated = validate_config(&candidate).map_err(|e| design_error_to_py(e.into()))?;
    let normalized =
        serde_json::to_value(&validated).map_err(|e| PyValueError::new_err(e.to_string()))?;

    json_to_py(py, &normalized)
}
