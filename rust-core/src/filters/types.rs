//! Filter family strategies: order estimation and truncated ideal response
//!
//! Every family follows the same two-step protocol. `calculate_filter_order`
//! fixes the filter length from the order-estimation factor D, after which
//! `impulse_response` yields the n+1 non-redundant taps of the ideal
//! (sinc-family) response, center tap first.

use crate::config::{BandEdges, FilterConfig, FilterKind, Precision};
use crate::error::{ConfigError, DesignError, ValueViolation};
use std::f64::consts::PI;
use tracing::{debug, trace};

/// Longest filter a design may produce
pub const MAX_FILTER_LENGTH: usize = 1 << 20;

/// Filter length derived from the raw order estimate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterOrder {
    /// N, always odd
    pub length: usize,

    /// N_o, estimate before forcing an odd length
    pub raw_order: f64,

    /// n = (N-1)/2
    pub half_order: usize,
}

impl FilterOrder {
    /// Force an odd length of at least floor(N_o) + 1
    ///
    /// Lengths above [`MAX_FILTER_LENGTH`] fail with
    /// [`DesignError::OrderTooLarge`].
    pub fn from_raw(raw_order: f64) -> Result<Self, DesignError> {
        if !raw_order.is_finite() || raw_order < 0.0 {
            return Err(DesignError::InvalidOrder { raw_order });
        }
        // floor(N_o) <= MAX - 2, so the odd bump stays within MAX
        if raw_order >= (MAX_FILTER_LENGTH - 1) as f64 {
            return Err(DesignError::OrderTooLarge {
                raw_order,
                max_length: MAX_FILTER_LENGTH,
            });
        }

        let whole = raw_order.floor() as usize;
        let length = if (whole + 1) % 2 == 0 { whole + 2 } else { whole + 1 };

        Ok(Self {
            length,
            raw_order,
            half_order: (length - 1) / 2,
        })
    }
}

/// Family-specific order estimation and ideal impulse response
pub trait FilterTypeStrategy {
    /// Estimate N, N_o and n from the order-estimation factor D
    ///
    /// Fails with [`DesignError::ZeroOrderFactor`] when `d` is 0.
    fn calculate_filter_order(&mut self, d: f64) -> Result<FilterOrder, DesignError>;

    /// Ideal taps h[0..=n]
    ///
    /// Fails with [`DesignError::OrderNotDefined`] until the order has been
    /// calculated.
    fn impulse_response(&self) -> Result<Vec<f64>, DesignError>;
}

fn checked_order(raw_order: f64, d: f64, precision: Precision) -> Result<FilterOrder, DesignError> {
    let order = FilterOrder::from_raw(precision.round(raw_order))?;
    debug!(
        d,
        raw_order = order.raw_order,
        length = order.length,
        half_order = order.half_order,
        "filter order"
    );
    Ok(order)
}

/// h[0] = center, h[k] = gain * sin(θk)/θk with θk = 2πk·fc/F
fn single_cutoff_taps(
    center: f64,
    gain: f64,
    cutoff: f64,
    sampling_rate: f64,
    half_order: usize,
    precision: Precision,
) -> Result<Vec<f64>, DesignError> {
    let mut taps = Vec::with_capacity(half_order + 1);
    taps.push(precision.round(center));

    for k in 1..=half_order {
        let theta = 2.0 * PI * k as f64 * cutoff / sampling_rate;
        if theta == 0.0 {
            return Err(DesignError::DivisionByZero { tap: k });
        }
        let tap = precision.round(gain * (theta.sin() / theta));
        trace!(k, theta, tap, "ideal tap");
        taps.push(tap);
    }

    Ok(taps)
}

/// h[0] = center, h[k] = (sin(2πk·fa/F) - sin(2πk·fb/F)) / (kπ)
fn two_cutoff_taps(
    center: f64,
    leading: f64,
    trailing: f64,
    sampling_rate: f64,
    half_order: usize,
    precision: Precision,
) -> Vec<f64> {
    let mut taps = Vec::with_capacity(half_order + 1);
    taps.push(precision.round(center));

    for k in 1..=half_order {
        let kf = k as f64;
        let lead = (2.0 * PI * kf * leading / sampling_rate).sin();
        let trail = (2.0 * PI * kf * trailing / sampling_rate).sin();
        let tap = precision.round((lead - trail) / (kf * PI));
        trace!(k, tap, "ideal tap");
        taps.push(tap);
    }

    taps
}

/// Lowpass: passband below stopband (fp < fs)
#[derive(Debug, Clone)]
pub struct LowpassStrategy {
    passband_edge: f64,
    stopband_edge: f64,
    sampling_rate: f64,
    precision: Precision,
    order: Option<FilterOrder>,
}

impl LowpassStrategy {
    pub fn new(
        passband_edge: f64,
        stopband_edge: f64,
        sampling_rate: f64,
        precision: Precision,
    ) -> Self {
        Self {
            passband_edge,
            stopband_edge,
            sampling_rate,
            precision,
            order: None,
        }
    }

    /// fc = (fp + fs) / 2
    pub fn cutoff(&self) -> f64 {
        0.5 * (self.passband_edge + self.stopband_edge)
    }
}

impl FilterTypeStrategy for LowpassStrategy {
    fn calculate_filter_order(&mut self, d: f64) -> Result<FilterOrder, DesignError> {
        if d == 0.0 {
            return Err(DesignError::ZeroOrderFactor);
        }
        let gap = (self.stopband_edge - self.passband_edge).abs();
        let order = checked_order(self.sampling_rate * d / gap + 2.0, d, self.precision)?;
        self.order = Some(order);
        Ok(order)
    }

    fn impulse_response(&self) -> Result<Vec<f64>, DesignError> {
        let order = self.order.ok_or(DesignError::OrderNotDefined)?;
        let gain = 2.0 * self.cutoff() / self.sampling_rate;
        single_cutoff_taps(
            gain,
            gain,
            self.cutoff(),
            self.sampling_rate,
            order.half_order,
            self.precision,
        )
    }
}

/// Highpass: passband above stopband (fp > fs)
#[derive(Debug, Clone)]
pub struct HighpassStrategy {
    passband_edge: f64,
    stopband_edge: f64,
    sampling_rate: f64,
    precision: Precision,
    order: Option<FilterOrder>,
}

impl HighpassStrategy {
    pub fn new(
        passband_edge: f64,
        stopband_edge: f64,
        sampling_rate: f64,
        precision: Precision,
    ) -> Self {
        Self {
            passband_edge,
            stopband_edge,
            sampling_rate,
            precision,
            order: None,
        }
    }

    /// fc = (fp + fs) / 2
    pub fn cutoff(&self) -> f64 {
        0.5 * (self.passband_edge + self.stopband_edge)
    }
}

impl FilterTypeStrategy for HighpassStrategy {
    fn calculate_filter_order(&mut self, d: f64) -> Result<FilterOrder, DesignError> {
        if d == 0.0 {
            return Err(DesignError::ZeroOrderFactor);
        }
        let gap = (self.passband_edge - self.stopband_edge).abs();
        let order = checked_order(self.sampling_rate * d / gap + 2.0, d, self.precision)?;
        self.order = Some(order);
        Ok(order)
    }

    fn impulse_response(&self) -> Result<Vec<f64>, DesignError> {
        let order = self.order.ok_or(DesignError::OrderNotDefined)?;
        let gain = 2.0 * self.cutoff() / self.sampling_rate;
        // Spectral inversion of the lowpass prototype
        single_cutoff_taps(
            1.0 - gain,
            -gain,
            self.cutoff(),
            self.sampling_rate,
            order.half_order,
            self.precision,
        )
    }
}

/// Bandpass: stop_lo < pass_lo < pass_hi < stop_hi
#[derive(Debug, Clone)]
pub struct BandpassStrategy {
    edges: BandEdges,
    sampling_rate: f64,
    precision: Precision,
    order: Option<FilterOrder>,
}

impl BandpassStrategy {
    pub fn new(edges: BandEdges, sampling_rate: f64, precision: Precision) -> Self {
        Self {
            edges,
            sampling_rate,
            precision,
            order: None,
        }
    }

    /// Cutoffs pushed half a transition band outside the passband
    pub fn cutoffs(&self) -> (f64, f64) {
        let delta = self.edges.bandpass_transition();
        (self.edges.pass_lo - delta / 2.0, self.edges.pass_hi + delta / 2.0)
    }
}

impl FilterTypeStrategy for BandpassStrategy {
    fn calculate_filter_order(&mut self, d: f64) -> Result<FilterOrder, DesignError> {
        if d == 0.0 {
            return Err(DesignError::ZeroOrderFactor);
        }
        let gap = self.edges.bandpass_transition();
        let order = checked_order(self.sampling_rate * d / gap + 1.0, d, self.precision)?;
        self.order = Some(order);
        Ok(order)
    }

    fn impulse_response(&self) -> Result<Vec<f64>, DesignError> {
        let order = self.order.ok_or(DesignError::OrderNotDefined)?;
        let (fc1, fc2) = self.cutoffs();
        Ok(two_cutoff_taps(
            2.0 * (fc2 - fc1) / self.sampling_rate,
            fc2,
            fc1,
            self.sampling_rate,
            order.half_order,
            self.precision,
        ))
    }
}

/// Bandstop: pass_lo < stop_lo < stop_hi < pass_hi
#[derive(Debug, Clone)]
pub struct BandstopStrategy {
    edges: BandEdges,
    sampling_rate: f64,
    precision: Precision,
    order: Option<FilterOrder>,
}

impl BandstopStrategy {
    pub fn new(edges: BandEdges, sampling_rate: f64, precision: Precision) -> Self {
        Self {
            edges,
            sampling_rate,
            precision,
            order: None,
        }
    }

    /// Cutoffs pulled half a transition band inside the passband edges
    pub fn cutoffs(&self) -> (f64, f64) {
        let delta = self.edges.bandstop_transition();
        (self.edges.pass_lo + delta / 2.0, self.edges.pass_hi - delta / 2.0)
    }
}

impl FilterTypeStrategy for BandstopStrategy {
    fn calculate_filter_order(&mut self, d: f64) -> Result<FilterOrder, DesignError> {
        if d == 0.0 {
            return Err(DesignError::ZeroOrderFactor);
        }
        let gap = self.edges.bandstop_transition();
        let order = checked_order(self.sampling_rate * d / gap + 1.0, d, self.precision)?;
        self.order = Some(order);
        Ok(order)
    }

    fn impulse_response(&self) -> Result<Vec<f64>, DesignError> {
        let order = self.order.ok_or(DesignError::OrderNotDefined)?;
        let (fc1, fc2) = self.cutoffs();
        Ok(two_cutoff_taps(
            2.0 * (fc1 - fc2) / self.sampling_rate + 1.0,
            fc1,
            fc2,
            self.sampling_rate,
            order.half_order,
            self.precision,
        ))
    }
}

/// Closed set of filter families
#[derive(Debug, Clone)]
pub enum TypeStrategy {
    Lowpass(LowpassStrategy),
    Highpass(HighpassStrategy),
    Bandpass(BandpassStrategy),
    Bandstop(BandstopStrategy),
}

impl TypeStrategy {
    /// Bind the strategy matching `config.filter_type`
    pub fn from_config(config: &FilterConfig, precision: Precision) -> Result<Self, DesignError> {
        let f = config.sampling_rate_hz;
        let fp = config.passband_edge_hz;
        let fs = config.stopband_edge_hz;

        let strategy = match config.filter_type {
            FilterKind::Lowpass => {
                TypeStrategy::Lowpass(LowpassStrategy::new(fp, fs, f, precision))
            }
            FilterKind::Highpass => {
                TypeStrategy::Highpass(HighpassStrategy::new(fp, fs, f, precision))
            }
            FilterKind::Bandpass => {
                TypeStrategy::Bandpass(BandpassStrategy::new(band_edges(config)?, f, precision))
            }
            FilterKind::Bandstop => {
                TypeStrategy::Bandstop(BandstopStrategy::new(band_edges(config)?, f, precision))
            }
        };

        Ok(strategy)
    }

    pub fn kind(&self) -> FilterKind {
        match self {
            TypeStrategy::Lowpass(_) => FilterKind::Lowpass,
            TypeStrategy::Highpass(_) => FilterKind::Highpass,
            TypeStrategy::Bandpass(_) => FilterKind::Bandpass,
            TypeStrategy::Bandstop(_) => FilterKind::Bandstop,
        }
    }
}

fn band_edges(config: &FilterConfig) -> Result<BandEdges, ConfigError> {
    config.band_edges().ok_or_else(|| {
        let missing = [
            ("fp2", config.passband_edge2_hz),
            ("fs2", config.stopband_edge2_hz),
        ]
        .into_iter()
        .filter(|(_, edge)| edge.is_none())
        .map(|(key, _)| ValueViolation::MissingBandEdge { key })
        .collect();
        ConfigError::InvalidValues(missing)
    })
}

impl FilterTypeStrategy for TypeStrategy {
    fn calculate_filter_order(&mut self, d: f64) -> Result<FilterOrder, DesignError> {
        match self {
            TypeStrategy::Lowpass(s) => s.calculate_filter_order(d),
            TypeStrategy::Highpass(s) => s.calculate_filter_order(d),
            TypeStrategy::Bandpass(s) => s.calculate_filter_order(d),
            TypeStrategy::Bandstop(s) => s.calculate_filter_order(d),
        }
    }

    fn impulse_response(&self) -> Result<Vec<f64>, DesignError> {
        match self {
            TypeStrategy::Lowpass(s) => s.impulse_response(),
            TypeStrategy::Highpass(s) => s.impulse_response(),
            TypeStrategy::Bandpass(s) => s.impulse_response(),
            TypeStrategy::Bandstop(s) => s.impulse_response(),
        }
    }
}
