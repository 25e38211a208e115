//! Firwin - FIR Filter Design by the Window Method
//!
//! Validates a filter configuration, derives the ripple bound and filter
//! order, builds the ideal impulse response of the requested family, tapers
//! it with a Hamming, Blackman or Kaiser window and mirrors the result into
//! a symmetric linear-phase filter. Optional Python bindings behind the
//! `python` feature.

// Suppress PyO3 non-local impl warnings (harmless macro-generated code)
#![cfg_attr(feature = "python", allow(non_local_definitions))]

pub mod config;
pub mod error;
pub mod filters;
pub mod output;
pub mod spectrum;
pub mod sweep;
pub mod validation;

#[cfg(feature = "python")]
pub mod python_bindings;

pub use config::{FilterConfig, FilterKind, Precision, WindowKind};
pub use error::{ConfigError, DesignError, ValueViolation};
pub use filters::{FilterDesign, FirDesigner};
pub use validation::validate_config;
