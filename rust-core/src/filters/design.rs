//! FIR filter design using the windowing method
//!
//! [`FirDesigner`] runs one fixed pipeline per request:
//!
//! 1. delta = min(10^(-0.05·As), (10^(0.05·Ap) - 1) / (10^(0.05·Ap) + 1))
//! 2. AS = -20·log10(delta), AP = 20·log10((1 + delta) / (1 - delta))
//! 3. D = 0.9222 if AS <= 21, else (AS - 7.95) / 14.36
//! 4. alpha from AS (Kaiser shape factor, reported for every window)
//! 5. N, N_o, n from the filter family
//! 6. ideal taps h[0..=n] from the filter family
//! 7. taper w[0..=n] from the window family
//! 8. h[k]·w[k]
//! 9. mirror the half sequence into the full N-tap symmetric filter
//!
//! Every value is rounded to the designer's [`Precision`]. All intermediate
//! state lives on the stack of a single call.

use super::types::{FilterTypeStrategy, TypeStrategy};
use super::windows::{kaiser_alpha, FilterWindowStrategy, WindowStrategy};
use crate::config::{FilterConfig, Precision};
use crate::error::DesignError;
use crate::validation::{check_values, validate_config};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// D used when AS <= 21 dB
pub const LOW_ATTENUATION_D: f64 = 0.9222;

/// Derived design quantities, kept for tables and plots
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DesignParameters {
    /// Combined ripple bound
    pub delta: f64,

    /// AS, attenuation recomputed from delta (dB)
    pub attenuation_db: f64,

    /// AP, ripple recomputed from delta (dB)
    pub ripple_db: f64,

    /// D, order-estimation factor
    pub d_factor: f64,

    /// Kaiser shape factor
    pub alpha: f64,

    /// N
    pub length: usize,

    /// N_o
    pub raw_order: f64,

    /// n = (N-1)/2
    pub half_order: usize,
}

/// Result of one design run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterDesign {
    pub parameters: DesignParameters,

    /// F, carried along for frequency-response plots
    pub sampling_rate_hz: f64,

    /// Taper w[0..=n]
    pub window: Vec<f64>,

    /// Ideal taps h[0..=n]
    pub ideal: Vec<f64>,

    /// h[k]·w[k] for k = 0..=n
    pub half_coefficients: Vec<f64>,

    /// Full symmetric filter of length N
    pub coefficients: Vec<f64>,
}

impl FilterDesign {
    pub fn length(&self) -> usize {
        self.coefficients.len()
    }

    /// Group delay in samples of the linear-phase filter
    pub fn group_delay_samples(&self) -> f64 {
        self.parameters.half_order as f64
    }
}

/// Window-method FIR designer
#[derive(Debug, Clone, Copy, Default)]
pub struct FirDesigner {
    precision: Precision,
}

impl FirDesigner {
    pub fn new(precision: Precision) -> Self {
        Self { precision }
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Validate an untrusted configuration map, then design it
    pub fn design_value(&self, candidate: &Value) -> Result<FilterDesign, DesignError> {
        let config = validate_config(candidate)?;
        self.design(&config)
    }

    /// Design with the strategies selected by `config`
    pub fn design(&self, config: &FilterConfig) -> Result<FilterDesign, DesignError> {
        check_values(config)?;

        let mut filter = TypeStrategy::from_config(config, self.precision)?;
        let window = WindowStrategy::from_kind(config.filter_window, self.precision);

        self.design_with(config, &mut filter, &window)
    }

    /// Design with caller-bound strategies
    ///
    /// `config` supplies Ap, As and F. The strategies are used as given, so
    /// the filter family and window fields of `config` are not consulted.
    pub fn design_with<T, W>(
        &self,
        config: &FilterConfig,
        filter: &mut T,
        window: &W,
    ) -> Result<FilterDesign, DesignError>
    where
        T: FilterTypeStrategy + ?Sized,
        W: FilterWindowStrategy + ?Sized,
    {
        let p = self.precision;

        let (delta, attenuation_db, ripple_db) =
            self.ripple_parameters(config.passband_ripple_db, config.stopband_attenuation_db);
        let d_factor = self.order_factor(attenuation_db);
        let alpha = kaiser_alpha(attenuation_db, p);
        debug!(delta, attenuation_db, ripple_db, d_factor, alpha, "design parameters");

        let order = filter.calculate_filter_order(d_factor)?;
        let ideal = filter.impulse_response()?;
        let taper =
            window.calculate_window_coefficients(order.half_order, order.length, attenuation_db);

        let expected = order.half_order + 1;
        if ideal.len() != expected || taper.len() != expected {
            return Err(DesignError::LengthMismatch {
                ideal: ideal.len(),
                window: taper.len(),
            });
        }

        let half_coefficients: Vec<f64> = ideal
            .iter()
            .zip(taper.iter())
            .map(|(&h, &w)| p.round(h * w))
            .collect();
        let coefficients = mirror_coefficients(&half_coefficients);

        debug!(
            length = order.length,
            raw_order = order.raw_order,
            half_order = order.half_order,
            "filter designed"
        );

        Ok(FilterDesign {
            parameters: DesignParameters {
                delta,
                attenuation_db,
                ripple_db,
                d_factor,
                alpha,
                length: order.length,
                raw_order: order.raw_order,
                half_order: order.half_order,
            },
            sampling_rate_hz: config.sampling_rate_hz,
            window: taper,
            ideal,
            half_coefficients,
            coefficients,
        })
    }

    /// (delta, AS, AP) from the requested passband ripple and stopband attenuation
    pub fn ripple_parameters(
        &self,
        passband_ripple_db: f64,
        stopband_attenuation_db: f64,
    ) -> (f64, f64, f64) {
        let p = self.precision;

        let delta_s = 10f64.powf(-0.05 * stopband_attenuation_db);
        let ripple_gain = 10f64.powf(0.05 * passband_ripple_db);
        let delta_p = (ripple_gain - 1.0) / (ripple_gain + 1.0);
        let delta = p.round(delta_s.min(delta_p));

        let attenuation_db = p.round(-20.0 * delta.log10());
        let ripple_db = p.round(20.0 * ((1.0 + delta) / (1.0 - delta)).log10());

        (delta, attenuation_db, ripple_db)
    }

    /// D from the recomputed attenuation AS
    pub fn order_factor(&self, attenuation_db: f64) -> f64 {
        if attenuation_db <= 21.0 {
            LOW_ATTENUATION_D
        } else {
            self.precision.round((attenuation_db - 7.95) / 14.36)
        }
    }
}

/// Mirror h[0..=n] into h[n], ..., h[1], h[0], h[1], ..., h[n]
///
/// Signed zeros are written as +0.0.
pub fn mirror_coefficients(half: &[f64]) -> Vec<f64> {
    half.iter()
        .rev()
        .chain(half.iter().skip(1))
        .map(|&c| if c == 0.0 { 0.0 } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FilterKind, WindowKind};
    use crate::error::{ConfigError, ValueViolation};
    use crate::filters::types::FilterOrder;
    use serde_json::json;

    fn assert_palindrome(c: &[f64]) {
        let n = c.len();
        for i in 0..n / 2 {
            assert_eq!(c[i], c[n - 1 - i], "not symmetric at {}", i);
        }
    }

    fn bandpass_config(window: WindowKind) -> FilterConfig {
        FilterConfig {
            filter_type: FilterKind::Bandpass,
            filter_window: window,
            passband_ripple_db: 0.1,
            stopband_attenuation_db: 50.0,
            passband_edge_hz: 1000.0,
            stopband_edge_hz: 2500.0,
            sampling_rate_hz: 8000.0,
            passband_edge2_hz: Some(2000.0),
            stopband_edge2_hz: Some(500.0),
        }
    }

    fn bandstop_config(window: WindowKind) -> FilterConfig {
        FilterConfig {
            filter_type: FilterKind::Bandstop,
            filter_window: window,
            passband_ripple_db: 0.1,
            stopband_attenuation_db: 50.0,
            passband_edge_hz: 3000.0,
            stopband_edge_hz: 1000.0,
            sampling_rate_hz: 8000.0,
            passband_edge2_hz: Some(500.0),
            stopband_edge2_hz: Some(2000.0),
        }
    }

    fn lowpass_config(window: WindowKind) -> FilterConfig {
        FilterConfig {
            filter_type: FilterKind::Lowpass,
            filter_window: window,
            passband_edge_hz: 8.0,
            stopband_edge_hz: 16.0,
            ..FilterConfig::reference()
        }
    }

    #[test]
    fn test_reference_parameters() {
        let design = FirDesigner::default().design(&FilterConfig::reference()).unwrap();
        let p = design.parameters;

        assert_eq!(p.delta, 0.0199526);
        assert!((p.attenuation_db - 34.0000101).abs() < 1e-9);
        assert!((p.ripple_db - 0.3466582).abs() < 1e-9);
        assert!((p.d_factor - 1.8140676).abs() < 1e-9);
        assert!((p.alpha - 2.6549985).abs() < 1e-9);
        assert!((p.raw_order - 20.140676).abs() < 1e-9);
        assert_eq!(p.length, 21);
        assert_eq!(p.half_order, 10);

        // Published approximations of the same design
        assert!((p.attenuation_db - 34.0006).abs() < 1e-3);
        assert!((p.d_factor - 1.8145).abs() < 1e-3);
        assert!((p.raw_order - 20.145).abs() < 1e-2);
    }

    #[test]
    fn test_reference_coefficients() {
        let design = FirDesigner::default().design(&FilterConfig::reference()).unwrap();
        let expected_half = [
            0.7, -0.2517203, -0.1380675, -0.0265705, 0.0319071, 0.0343775, 0.0124062,
            -0.0037887, -0.0063517, -0.0029332, 0.0,
        ];

        assert_eq!(design.half_coefficients.len(), 11);
        for (a, e) in design.half_coefficients.iter().zip(expected_half) {
            assert!((a - e).abs() < 1e-9, "{} vs {}", a, e);
        }

        let c = &design.coefficients;
        assert_eq!(c.len(), 21);
        assert_palindrome(c);
        assert!((c[10] - 0.7).abs() < 1e-12);
        assert_eq!(c[0], 0.0);
        assert!(c[0].is_sign_positive());
        assert!(c[20].is_sign_positive());
        assert!((design.group_delay_samples() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_mirror_coefficients() {
        let full = mirror_coefficients(&[3.0, 2.0, -0.0]);
        assert_eq!(full, vec![0.0, 2.0, 3.0, 2.0, 0.0]);
        assert!(full[0].is_sign_positive());
        assert!(full[4].is_sign_positive());

        assert_eq!(mirror_coefficients(&[1.5]), vec![1.5]);
        assert!(mirror_coefficients(&[]).is_empty());
    }

    #[test]
    fn test_every_family_and_window_is_symmetric_and_odd() {
        let windows = [WindowKind::Hamming, WindowKind::Blackman, WindowKind::Kaiser];
        let designer = FirDesigner::default();

        for window in windows {
            let configs = [
                lowpass_config(window),
                FilterConfig {
                    filter_window: window,
                    ..FilterConfig::reference()
                },
                bandpass_config(window),
                bandstop_config(window),
            ];
            for config in configs {
                let design = designer.design(&config).unwrap();
                let p = design.parameters;
                assert_eq!(p.length % 2, 1);
                assert!(p.length >= p.raw_order.floor() as usize + 1);
                assert_eq!(design.coefficients.len(), p.length);
                assert_eq!(design.half_coefficients.len(), p.half_order + 1);
                assert_palindrome(&design.coefficients);
            }
        }
    }

    #[test]
    fn test_kaiser_window_design_succeeds_on_first_use() {
        let config = FilterConfig {
            filter_window: WindowKind::Kaiser,
            ..FilterConfig::reference()
        };
        let design = FirDesigner::default().design(&config).unwrap();
        assert_eq!(design.coefficients.len(), 21);
        assert!((design.window[10] - 0.2696403).abs() < 2e-7);
    }

    #[test]
    fn test_idempotent() {
        let designer = FirDesigner::default();
        let config = bandstop_config(WindowKind::Kaiser);
        let first = designer.design(&config).unwrap();
        let second = designer.design(&config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_attenuation_never_shrinks_order() {
        let designer = FirDesigner::default();
        let mut previous = 0;
        for step in 0..60 {
            let config = FilterConfig {
                stopband_attenuation_db: 10.0 + step as f64 * 1.5,
                ..FilterConfig::reference()
            };
            let length = designer.design(&config).unwrap().parameters.length;
            assert!(length >= previous, "As step {} shrank N", step);
            previous = length;
        }
    }

    #[test]
    fn test_low_attenuation_branch() {
        let config = FilterConfig {
            passband_ripple_db: 3.0,
            stopband_attenuation_db: 15.0,
            ..FilterConfig::reference()
        };
        let p = FirDesigner::default().design(&config).unwrap().parameters;
        assert!(p.attenuation_db <= 21.0);
        assert_eq!(p.d_factor, LOW_ATTENUATION_D);
        assert_eq!(p.alpha, 0.0);
    }

    #[test]
    fn test_values_rounded_to_precision() {
        let design = FirDesigner::new(Precision::new(3).unwrap())
            .design(&bandpass_config(WindowKind::Blackman))
            .unwrap();
        let values = design
            .coefficients
            .iter()
            .chain(&design.window)
            .chain(&design.ideal)
            .chain([&design.parameters.delta, &design.parameters.attenuation_db]);
        for &v in values {
            let scaled = v * 1e3;
            assert!((scaled - scaled.round()).abs() < 1e-6, "{} has more than 3 decimals", v);
        }
    }

    #[test]
    fn test_design_value_reports_missing_key() {
        let raw = json!({
            "filter_type": "highpass", "filter_window": "hamming",
            "Ap": 0.4, "fp": 16, "fs": 8, "F": 80,
        });
        let err = FirDesigner::default().design_value(&raw).unwrap_err();
        assert_eq!(err, DesignError::Config(ConfigError::MissingKeys(vec!["As".to_string()])));
    }

    #[test]
    fn test_design_rejects_invalid_typed_config() {
        let config = FilterConfig {
            filter_type: FilterKind::Lowpass,
            ..FilterConfig::reference()
        };
        let err = FirDesigner::default().design(&config).unwrap_err();
        assert_eq!(
            err,
            DesignError::Config(ConfigError::InvalidValues(vec![ValueViolation::EdgeOrdering {
                rule: "lowpass requires fp < fs"
            }]))
        );
    }

    #[test]
    fn test_tiny_transition_band_fails_cleanly() {
        let config = FilterConfig {
            filter_type: FilterKind::Lowpass,
            passband_edge_hz: 1e-17,
            stopband_edge_hz: 1.5e-17,
            ..FilterConfig::reference()
        };
        check_values(&config).unwrap();

        let err = FirDesigner::default().design(&config).unwrap_err();
        assert!(matches!(err, DesignError::OrderTooLarge { .. }), "{:?}", err);
    }

    struct ShortResponse;

    impl FilterTypeStrategy for ShortResponse {
        fn calculate_filter_order(&mut self, _d: f64) -> Result<FilterOrder, DesignError> {
            FilterOrder::from_raw(6.0)
        }

        fn impulse_response(&self) -> Result<Vec<f64>, DesignError> {
            Ok(vec![0.5; 2])
        }
    }

    #[test]
    fn test_design_with_custom_strategy_length_mismatch() {
        let window = WindowStrategy::from_kind(WindowKind::Hamming, Precision::default());
        let err = FirDesigner::default()
            .design_with(&FilterConfig::reference(), &mut ShortResponse, &window)
            .unwrap_err();
        assert_eq!(err, DesignError::LengthMismatch { ideal: 2, window: 4 });
    }

    #[test]
    fn test_design_with_trait_objects() {
        let config = FilterConfig::reference();
        let mut filter: Box<dyn FilterTypeStrategy> =
            Box::new(TypeStrategy::from_config(&config, Precision::default()).unwrap());
        let window: Box<dyn FilterWindowStrategy> =
            Box::new(WindowStrategy::from_kind(WindowKind::Hamming, Precision::default()));

        let design = FirDesigner::default()
            .design_with(&config, filter.as_mut(), window.as_ref())
            .unwrap();
        assert_eq!(design, FirDesigner::default().design(&config).unwrap());
    }
}
