//! Filter configuration types
//!
//! `FilterConfig` is the typed, immutable input to a design run. Untrusted
//! input arrives as a loosely typed map and goes through
//! [`crate::validation`] first.

use crate::error::DesignError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Filter family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    Lowpass,
    Highpass,
    Bandpass,
    /// Band-reject filter, spelled `stopband` in configurations
    #[serde(rename = "stopband")]
    Bandstop,
}

impl FilterKind {
    pub const NAMES: [&'static str; 4] = ["lowpass", "highpass", "bandpass", "stopband"];

    pub fn name(&self) -> &'static str {
        match self {
            FilterKind::Lowpass => "lowpass",
            FilterKind::Highpass => "highpass",
            FilterKind::Bandpass => "bandpass",
            FilterKind::Bandstop => "stopband",
        }
    }

    /// Whether the family needs the second pair of band edges
    pub fn is_band(&self) -> bool {
        matches!(self, FilterKind::Bandpass | FilterKind::Bandstop)
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FilterKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lowpass" => Ok(FilterKind::Lowpass),
            "highpass" => Ok(FilterKind::Highpass),
            "bandpass" => Ok(FilterKind::Bandpass),
            "stopband" => Ok(FilterKind::Bandstop),
            other => Err(other.to_string()),
        }
    }
}

/// Window family used to taper the ideal response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowKind {
    /// w[k] = 0.54 + 0.46*cos(2πk/(N-1))
    Hamming,

    /// w[k] = 0.42 + 0.5*cos(2πk/(N-1)) + 0.08*cos(4πk/(N-1))
    Blackman,

    /// w[k] = I0(beta_k) / I0(alpha), shape taken from the stopband attenuation
    Kaiser,
}

impl WindowKind {
    pub const NAMES: [&'static str; 3] = ["hamming", "blackman", "kaiser"];

    pub fn name(&self) -> &'static str {
        match self {
            WindowKind::Hamming => "hamming",
            WindowKind::Blackman => "blackman",
            WindowKind::Kaiser => "kaiser",
        }
    }
}

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WindowKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hamming" => Ok(WindowKind::Hamming),
            "blackman" => Ok(WindowKind::Blackman),
            "kaiser" => Ok(WindowKind::Kaiser),
            other => Err(other.to_string()),
        }
    }
}

/// Decimal rounding applied to every intermediate and final value
///
/// At most [`Precision::MAX_PLACES`] places: past that the scale factor no
/// longer fits an f64 mantissa and rounding stops being exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Precision(u32);

impl Precision {
    pub const DEFAULT_PLACES: u32 = 7;
    pub const MAX_PLACES: u32 = 15;

    pub fn new(places: u32) -> Result<Self, DesignError> {
        if places > Self::MAX_PLACES {
            return Err(DesignError::InvalidPrecision {
                places,
                max: Self::MAX_PLACES,
            });
        }
        Ok(Self(places))
    }

    pub fn places(&self) -> u32 {
        self.0
    }

    /// Round half away from zero to the configured number of decimal places
    #[inline]
    pub fn round(&self, value: f64) -> f64 {
        let factor = 10f64.powi(self.0 as i32);
        (value * factor).round() / factor
    }

    pub fn round_all(&self, values: &mut [f64]) {
        for v in values.iter_mut() {
            *v = self.round(*v);
        }
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self(Self::DEFAULT_PLACES)
    }
}

impl TryFrom<u32> for Precision {
    type Error = DesignError;

    fn try_from(places: u32) -> Result<Self, Self::Error> {
        Self::new(places)
    }
}

impl From<Precision> for u32 {
    fn from(precision: Precision) -> Self {
        precision.0
    }
}

/// Filter specification
///
/// Frequencies are in Hz, ripple and attenuation in dB.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    pub filter_type: FilterKind,

    pub filter_window: WindowKind,

    /// Passband ripple Ap (dB)
    #[serde(rename = "Ap")]
    pub passband_ripple_db: f64,

    /// Stopband attenuation As (dB)
    #[serde(rename = "As")]
    pub stopband_attenuation_db: f64,

    /// Passband edge fp, first passband edge for band filters
    #[serde(rename = "fp")]
    pub passband_edge_hz: f64,

    /// Stopband edge fs, first stopband edge for band filters
    #[serde(rename = "fs")]
    pub stopband_edge_hz: f64,

    /// Sampling frequency F
    #[serde(rename = "F")]
    pub sampling_rate_hz: f64,

    /// Second passband edge fp2 (band filters only)
    #[serde(rename = "fp2", default, skip_serializing_if = "Option::is_none")]
    pub passband_edge2_hz: Option<f64>,

    /// Second stopband edge fs2 (band filters only)
    #[serde(rename = "fs2", default, skip_serializing_if = "Option::is_none")]
    pub stopband_edge2_hz: Option<f64>,
}

/// Band filter edges sorted into lower/upper pairs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandEdges {
    pub pass_lo: f64,
    pub pass_hi: f64,
    pub stop_lo: f64,
    pub stop_hi: f64,
}

impl BandEdges {
    /// Sort each (fp, fp2) and (fs, fs2) pair
    pub fn new(fp: f64, fp2: f64, fs: f64, fs2: f64) -> Self {
        Self {
            pass_lo: fp.min(fp2),
            pass_hi: fp.max(fp2),
            stop_lo: fs.min(fs2),
            stop_hi: fs.max(fs2),
        }
    }

    /// Narrowest transition band of a bandpass layout (stop_lo < pass_lo < pass_hi < stop_hi)
    pub fn bandpass_transition(&self) -> f64 {
        (self.pass_lo - self.stop_lo).min(self.stop_hi - self.pass_hi)
    }

    /// Narrowest transition band of a bandstop layout (pass_lo < stop_lo < stop_hi < pass_hi)
    pub fn bandstop_transition(&self) -> f64 {
        (self.stop_lo - self.pass_lo).min(self.pass_hi - self.stop_hi)
    }
}

impl FilterConfig {
    /// Sorted band edges, `None` unless both second edges are set
    pub fn band_edges(&self) -> Option<BandEdges> {
        match (self.passband_edge2_hz, self.stopband_edge2_hz) {
            (Some(fp2), Some(fs2)) => Some(BandEdges::new(
                self.passband_edge_hz,
                fp2,
                self.stopband_edge_hz,
                fs2,
            )),
            _ => None,
        }
    }

    /// Highpass/Hamming reference design: Ap=0.4 dB, As=34 dB, fp=16 Hz, fs=8 Hz, F=80 Hz
    pub fn reference() -> Self {
        Self {
            filter_type: FilterKind::Highpass,
            filter_window: WindowKind::Hamming,
            passband_ripple_db: 0.4,
            stopband_attenuation_db: 34.0,
            passband_edge_hz: 16.0,
            stopband_edge_hz: 8.0,
            sampling_rate_hz: 80.0,
            passband_edge2_hz: None,
            stopband_edge2_hz: None,
        }
    }
}
