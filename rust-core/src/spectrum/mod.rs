//! Frequency-domain view of designed filters

pub mod fft;
pub mod response;

pub use fft::FftEngine;
pub use response::{frequency_response, FrequencyResponse, ResponseError, DEFAULT_POINTS};
