//! Error types for configuration validation and filter design

use thiserror::Error;

/// A single value-level fault found in a filter configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValueViolation {
    /// `filter_type` is not one of the known families
    #[error("filter type '{0}' must be one of lowpass, highpass, bandpass, stopband")]
    UnknownFilterType(String),

    /// `filter_window` is not one of the known windows
    #[error("filter window '{0}' must be one of hamming, blackman, kaiser")]
    UnknownWindow(String),

    /// Ap or As is zero or negative
    #[error("{key} must be greater than 0 (got {value})")]
    NonPositiveRipple { key: &'static str, value: f64 },

    /// A frequency is zero or negative
    #[error("{key} must be greater than 0 Hz (got {value})")]
    NonPositiveFrequency { key: &'static str, value: f64 },

    /// A frequency edge sits at or above the sampling frequency
    #[error("{key} must be lower than the sampling frequency {sampling_rate} Hz (got {value})")]
    AboveSamplingRate {
        key: &'static str,
        value: f64,
        sampling_rate: f64,
    },

    /// A band family was configured without its second edge
    #[error("{key} is required for band filters")]
    MissingBandEdge { key: &'static str },

    /// Edge ordering required by the filter family does not hold
    #[error("{rule}")]
    EdgeOrdering { rule: &'static str },

    /// Band family edges overlap so a transition band has no width
    #[error("band edges overlap, transition width must be positive (got {gap} Hz)")]
    NonPositiveTransition { gap: f64 },
}

/// Faults raised before any numeric work begins
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("filter configuration must be a key/value map")]
    NotAMap,

    #[error("filter configuration cannot be empty")]
    Empty,

    #[error("missing required keys: {}", .0.join(", "))]
    MissingKeys(Vec<String>),

    #[error("incorrect types for keys: {}", .0.join(", "))]
    IncorrectType(Vec<String>),

    #[error("invalid filter configuration: {}", join_violations(.0))]
    InvalidValues(Vec<ValueViolation>),
}

impl ConfigError {
    /// Keys named by a missing/incorrect-type error, empty otherwise
    pub fn keys(&self) -> &[String] {
        match self {
            ConfigError::MissingKeys(keys) | ConfigError::IncorrectType(keys) => keys,
            _ => &[],
        }
    }

    /// Value violations carried by the error, empty otherwise
    pub fn violations(&self) -> &[ValueViolation] {
        match self {
            ConfigError::InvalidValues(violations) => violations,
            _ => &[],
        }
    }
}

fn join_violations(violations: &[ValueViolation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Faults that abort a design run
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DesignError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("D cannot be 0")]
    ZeroOrderFactor,

    #[error("raw filter order {raw_order} is not a finite non-negative number")]
    InvalidOrder { raw_order: f64 },

    #[error("division by zero: sinc argument is 0 at tap {tap}")]
    DivisionByZero { tap: usize },

    #[error("filter order is not defined, calculate the filter order first")]
    OrderNotDefined,

    #[error("ideal response has {ideal} taps but window has {window}")]
    LengthMismatch { ideal: usize, window: usize },

    #[error("raw filter order {raw_order} exceeds the maximum filter length of {max_length} taps")]
    OrderTooLarge { raw_order: f64, max_length: usize },

    #[error("precision must be at most {max} decimal places (got {places})")]
    InvalidPrecision { places: u32, max: u32 },
}
