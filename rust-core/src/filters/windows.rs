//! Window functions for FIR filter design
//!
//! Each window produces the taper for taps k = 0..=n, center tap first,
//! given the half-order n and the odd filter length N.

use crate::config::{Precision, WindowKind};
use std::f64::consts::PI;
use tracing::debug;

/// Number of terms kept from the I0 power series
pub const BESSEL_SERIES_TERMS: u32 = 25;

/// Family-specific window taper
pub trait FilterWindowStrategy {
    /// Taper w[0..=n] for a filter of length `length` (N = 2n + 1)
    ///
    /// `attenuation_db` is the recomputed stopband attenuation AS; only
    /// windows whose shape depends on it read it.
    fn calculate_window_coefficients(
        &self,
        half_order: usize,
        length: usize,
        attenuation_db: f64,
    ) -> Vec<f64>;
}

/// Sum of cosine terms: w[k] = a0 + a1*cos(2πk/(N-1)) + a2*cos(4πk/(N-1)) + ...
fn cosine_sum(coeffs: &[f64], half_order: usize, length: usize, precision: Precision) -> Vec<f64> {
    // A single tap has no taper
    if length <= 1 {
        return vec![1.0; half_order + 1];
    }

    let span = (length - 1) as f64;
    (0..=half_order)
        .map(|k| {
            let w: f64 = coeffs
                .iter()
                .enumerate()
                .map(|(m, a)| a * (2.0 * PI * (m * k) as f64 / span).cos())
                .sum();
            precision.round(w)
        })
        .collect()
}

/// Hamming window: w[k] = 0.54 + 0.46*cos(2πk/(N-1))
#[derive(Debug, Clone, Copy, Default)]
pub struct HammingWindow {
    precision: Precision,
}

impl HammingWindow {
    pub fn new(precision: Precision) -> Self {
        Self { precision }
    }
}

impl FilterWindowStrategy for HammingWindow {
    fn calculate_window_coefficients(
        &self,
        half_order: usize,
        length: usize,
        _attenuation_db: f64,
    ) -> Vec<f64> {
        cosine_sum(&[0.54, 0.46], half_order, length, self.precision)
    }
}

/// Blackman window: w[k] = 0.42 + 0.5*cos(2πk/(N-1)) + 0.08*cos(4πk/(N-1))
#[derive(Debug, Clone, Copy, Default)]
pub struct BlackmanWindow {
    precision: Precision,
}

impl BlackmanWindow {
    pub fn new(precision: Precision) -> Self {
        Self { precision }
    }
}

impl FilterWindowStrategy for BlackmanWindow {
    fn calculate_window_coefficients(
        &self,
        half_order: usize,
        length: usize,
        _attenuation_db: f64,
    ) -> Vec<f64> {
        cosine_sum(&[0.42, 0.5, 0.08], half_order, length, self.precision)
    }
}

/// Kaiser shape factor alpha from the stopband attenuation AS (dB)
pub fn kaiser_alpha(attenuation_db: f64, precision: Precision) -> f64 {
    if attenuation_db <= 21.0 {
        0.0
    } else if attenuation_db <= 50.0 {
        let excess = attenuation_db - 21.0;
        precision.round(0.5842 * excess.powf(0.4) + 0.07886 * excess)
    } else {
        precision.round(0.1102 * (attenuation_db - 8.7))
    }
}

/// Zero-order modified Bessel function of the first kind
///
/// I0(x) ≈ 1 + Σ_{k=1..25} [(x/2)^k / k!]², every term rounded.
pub fn bessel_i0(x: f64, precision: Precision) -> f64 {
    let half = x / 2.0;
    let mut ratio = 1.0;
    let mut sum = 0.0;

    for k in 1..=BESSEL_SERIES_TERMS {
        // (x/2)^k / k! built incrementally
        ratio *= half / k as f64;
        sum += precision.round(ratio * ratio);
    }

    sum + 1.0
}

/// Shape parameters of one Kaiser taper
#[derive(Debug, Clone, PartialEq)]
pub struct KaiserShape {
    pub alpha: f64,

    /// beta[k] = alpha * sqrt(1 - (2k/(N-1))²) for k = 0..=n
    pub betas: Vec<f64>,
}

/// Kaiser window: w[k] = I0(beta[k]) / I0(alpha)
#[derive(Debug, Clone, Copy, Default)]
pub struct KaiserWindow {
    precision: Precision,
}

impl KaiserWindow {
    pub fn new(precision: Precision) -> Self {
        Self { precision }
    }

    /// Alpha and betas for the given attenuation and length, computed fresh on every call
    pub fn shape(&self, half_order: usize, length: usize, attenuation_db: f64) -> KaiserShape {
        let alpha = kaiser_alpha(attenuation_db, self.precision);
        let span = length.saturating_sub(1) as f64;

        let betas = (0..=half_order)
            .map(|k| {
                let x = if span > 0.0 { 2.0 * k as f64 / span } else { 0.0 };
                self.precision.round(alpha * (1.0 - x * x).sqrt())
            })
            .collect();

        KaiserShape { alpha, betas }
    }
}

impl FilterWindowStrategy for KaiserWindow {
    fn calculate_window_coefficients(
        &self,
        half_order: usize,
        length: usize,
        attenuation_db: f64,
    ) -> Vec<f64> {
        let shape = self.shape(half_order, length, attenuation_db);
        let i0_alpha = bessel_i0(shape.alpha, self.precision);
        debug!(alpha = shape.alpha, i0_alpha, "kaiser shape");

        shape
            .betas
            .iter()
            .map(|&beta| self.precision.round(bessel_i0(beta, self.precision) / i0_alpha))
            .collect()
    }
}

/// Closed set of window families
#[derive(Debug, Clone, Copy)]
pub enum WindowStrategy {
    Hamming(HammingWindow),
    Blackman(BlackmanWindow),
    Kaiser(KaiserWindow),
}

impl WindowStrategy {
    pub fn from_kind(kind: WindowKind, precision: Precision) -> Self {
        match kind {
            WindowKind::Hamming => WindowStrategy::Hamming(HammingWindow::new(precision)),
            WindowKind::Blackman => WindowStrategy::Blackman(BlackmanWindow::new(precision)),
            WindowKind::Kaiser => WindowStrategy::Kaiser(KaiserWindow::new(precision)),
        }
    }

    pub fn kind(&self) -> WindowKind {
        match self {
            WindowStrategy::Hamming(_) => WindowKind::Hamming,
            WindowStrategy::Blackman(_) => WindowKind::Blackman,
            WindowStrategy::Kaiser(_) => WindowKind::Kaiser,
        }
    }
}

impl FilterWindowStrategy for WindowStrategy {
    fn calculate_window_coefficients(
        &self,
        half_order: usize,
        length: usize,
        attenuation_db: f64,
    ) -> Vec<f64> {
        match self {
            WindowStrategy::Hamming(w) => {
                w.calculate_window_coefficients(half_order, length, attenuation_db)
            }
            WindowStrategy::Blackman(w) => {
                w.calculate_window_coefficients(half_order, length, attenuation_db)
            }
            WindowStrategy::Kaiser(w) => {
                w.calculate_window_coefficients(half_order, length, attenuation_db)
            }
        }
    }
}
