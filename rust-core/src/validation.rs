//! Filter configuration validation
//!
//! Two passes run in order, each one short-circuiting the rest:
//!
//! 1. Structural: presence of required keys, then their types, then the
//!    types of optional keys, then enum membership. Produces a typed
//!    [`FilterConfig`].
//! 2. Semantic ([`check_values`]): signs, sampling-rate bounds and the edge
//!    ordering each family needs.
//!
//! Every category reports all of its faults together.

use crate::config::{BandEdges, FilterConfig, FilterKind, WindowKind};
use crate::error::{ConfigError, ValueViolation};
use serde_json::{Map, Value};
use tracing::{debug, warn};

pub const REQUIRED_KEYS: [&str; 7] = ["Ap", "As", "fp", "fs", "F", "filter_type", "filter_window"];
pub const OPTIONAL_KEYS: [&str; 2] = ["fp2", "fs2"];

const ENUM_KEYS: [&str; 2] = ["filter_type", "filter_window"];

/// Validate an untrusted configuration map and build the typed config
pub fn validate_config(candidate: &Value) -> Result<FilterConfig, ConfigError> {
    let map = candidate.as_object().ok_or(ConfigError::NotAMap)?;
    if map.is_empty() {
        return Err(reject(ConfigError::Empty));
    }

    check_required_keys(map)?;
    check_required_types(map)?;
    check_optional_types(map)?;
    let (filter_type, filter_window) = check_enum_values(map)?;

    let config = FilterConfig {
        filter_type,
        filter_window,
        passband_ripple_db: number(map, "Ap"),
        stopband_attenuation_db: number(map, "As"),
        passband_edge_hz: number(map, "fp"),
        stopband_edge_hz: number(map, "fs"),
        sampling_rate_hz: number(map, "F"),
        passband_edge2_hz: map.get("fp2").and_then(Value::as_f64),
        stopband_edge2_hz: map.get("fs2").and_then(Value::as_f64),
    };

    check_values(&config)?;
    debug!(
        filter_type = %config.filter_type,
        window = %config.filter_window,
        "configuration accepted"
    );

    Ok(config)
}

fn reject(err: ConfigError) -> ConfigError {
    warn!("rejecting filter configuration: {}", err);
    err
}

fn number(map: &Map<String, Value>, key: &str) -> f64 {
    map.get(key).and_then(Value::as_f64).unwrap_or(f64::NAN)
}

fn check_required_keys(map: &Map<String, Value>) -> Result<(), ConfigError> {
    let missing: Vec<String> = REQUIRED_KEYS
        .iter()
        .filter(|key| !map.contains_key(**key))
        .map(|key| key.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(reject(ConfigError::MissingKeys(missing)))
    }
}

fn check_required_types(map: &Map<String, Value>) -> Result<(), ConfigError> {
    let incorrect: Vec<String> = REQUIRED_KEYS
        .iter()
        .filter(|key| {
            let value = &map[**key];
            if ENUM_KEYS.contains(*key) {
                !value.is_string()
            } else {
                !value.is_number()
            }
        })
        .map(|key| key.to_string())
        .collect();

    if incorrect.is_empty() {
        Ok(())
    } else {
        Err(reject(ConfigError::IncorrectType(incorrect)))
    }
}

fn check_optional_types(map: &Map<String, Value>) -> Result<(), ConfigError> {
    let incorrect: Vec<String> = OPTIONAL_KEYS
        .iter()
        .filter(|key| match map.get(**key) {
            None | Some(Value::Null) => false,
            Some(value) => !value.is_number(),
        })
        .map(|key| key.to_string())
        .collect();

    if incorrect.is_empty() {
        Ok(())
    } else {
        Err(reject(ConfigError::IncorrectType(incorrect)))
    }
}

fn check_enum_values(map: &Map<String, Value>) -> Result<(FilterKind, WindowKind), ConfigError> {
    // Both keys were type-checked as strings already
    let filter_type = map["filter_type"].as_str().unwrap_or_default().parse::<FilterKind>();
    let filter_window = map["filter_window"].as_str().unwrap_or_default().parse::<WindowKind>();

    match (filter_type, filter_window) {
        (Ok(kind), Ok(window)) => Ok((kind, window)),
        (kind, window) => {
            let mut violations = Vec::new();
            if let Err(name) = kind {
                violations.push(ValueViolation::UnknownFilterType(name));
            }
            if let Err(name) = window {
                violations.push(ValueViolation::UnknownWindow(name));
            }
            Err(reject(ConfigError::InvalidValues(violations)))
        }
    }
}

/// Semantic checks on a typed configuration
///
/// Runs as part of [`validate_config`] and again at the start of every design
/// run, so hand-built configs get the same guarantees.
pub fn check_values(config: &FilterConfig) -> Result<(), ConfigError> {
    let mut violations = Vec::new();

    for (key, value) in [
        ("Ap", config.passband_ripple_db),
        ("As", config.stopband_attenuation_db),
    ] {
        if !(value > 0.0) {
            violations.push(ValueViolation::NonPositiveRipple { key, value });
        }
    }

    let f = config.sampling_rate_hz;
    let fp = config.passband_edge_hz;
    let fs = config.stopband_edge_hz;

    for (key, value) in [("fp", fp), ("fs", fs), ("F", f)] {
        if !(value > 0.0) {
            violations.push(ValueViolation::NonPositiveFrequency { key, value });
        }
    }
    check_below_sampling_rate(&mut violations, &[("fp", fp), ("fs", fs)], f);

    match config.filter_type {
        FilterKind::Lowpass => {
            if !(fp < fs) {
                violations.push(ValueViolation::EdgeOrdering {
                    rule: "lowpass requires fp < fs",
                });
            }
        }
        FilterKind::Highpass => {
            if !(fp > fs) {
                violations.push(ValueViolation::EdgeOrdering {
                    rule: "highpass requires fp > fs",
                });
            }
        }
        FilterKind::Bandpass | FilterKind::Bandstop => {
            check_band_edges(config, &mut violations);
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(reject(ConfigError::InvalidValues(violations)))
    }
}

fn check_below_sampling_rate(
    violations: &mut Vec<ValueViolation>,
    edges: &[(&'static str, f64)],
    sampling_rate: f64,
) {
    for &(key, value) in edges {
        if value >= sampling_rate {
            violations.push(ValueViolation::AboveSamplingRate {
                key,
                value,
                sampling_rate,
            });
        }
    }
}

fn check_band_edges(config: &FilterConfig, violations: &mut Vec<ValueViolation>) {
    let mut present = Vec::new();
    for (key, edge) in [
        ("fp2", config.passband_edge2_hz),
        ("fs2", config.stopband_edge2_hz),
    ] {
        match edge {
            None => violations.push(ValueViolation::MissingBandEdge { key }),
            Some(value) => {
                if !(value > 0.0) {
                    violations.push(ValueViolation::NonPositiveFrequency { key, value });
                }
                present.push((key, value));
            }
        }
    }
    check_below_sampling_rate(violations, &present, config.sampling_rate_hz);

    let (Some(fp2), Some(fs2)) = (config.passband_edge2_hz, config.stopband_edge2_hz) else {
        return;
    };
    let fp = config.passband_edge_hz;
    let fs = config.stopband_edge_hz;

    let edges = BandEdges::new(fp, fp2, fs, fs2);
    let gap = if config.filter_type == FilterKind::Bandpass {
        if !(fp < fp2) {
            violations.push(ValueViolation::EdgeOrdering {
                rule: "bandpass requires fp < fp2",
            });
        }
        if !(fs > fs2) {
            violations.push(ValueViolation::EdgeOrdering {
                rule: "bandpass requires fs > fs2",
            });
        }
        edges.bandpass_transition()
    } else {
        if !(fp > fp2) {
            violations.push(ValueViolation::EdgeOrdering {
                rule: "stopband requires fp > fp2",
            });
        }
        if !(fs < fs2) {
            violations.push(ValueViolation::EdgeOrdering {
                rule: "stopband requires fs < fs2",
            });
        }
        edges.bandstop_transition()
    };

    if !(gap > 0.0) {
        violations.push(ValueViolation::NonPositiveTransition { gap });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reference() -> Value {
        json!({
            "filter_type": "highpass",
            "filter_window": "hamming",
            "Ap": 0.4,
            "As": 34,
            "fp": 16,
            "fs": 8,
            "F": 80,
        })
    }

    fn violations(result: Result<FilterConfig, ConfigError>) -> Vec<ValueViolation> {
        match result {
            Err(ConfigError::InvalidValues(v)) => v,
            other => panic!("expected value violations, got {:?}", other),
        }
    }

    #[test]
    fn test_reference_config_is_valid() {
        let config = validate_config(&reference()).unwrap();
        assert_eq!(config, FilterConfig::reference());
    }

    #[test]
    fn test_not_a_map() {
        assert_eq!(validate_config(&json!([1, 2])), Err(ConfigError::NotAMap));
        assert_eq!(validate_config(&json!({})), Err(ConfigError::Empty));
    }

    #[test]
    fn test_missing_single_key() {
        let mut raw = reference();
        raw.as_object_mut().unwrap().remove("As");
        assert_eq!(
            validate_config(&raw),
            Err(ConfigError::MissingKeys(vec!["As".to_string()]))
        );
    }

    #[test]
    fn test_missing_keys_reported_together() {
        let raw = json!({ "filter_type": "lowpass", "fp": 1.0, "Ap": "oops" });
        let err = validate_config(&raw).unwrap_err();
        assert_eq!(err.keys(), ["As", "fs", "F", "filter_window"]);
    }

    #[test]
    fn test_incorrect_types_reported_together() {
        let mut raw = reference();
        let map = raw.as_object_mut().unwrap();
        map.insert("Ap".into(), json!("0.4"));
        map.insert("F".into(), json!(null));
        map.insert("filter_window".into(), json!(3));
        let err = validate_config(&raw).unwrap_err();
        assert_eq!(
            err,
            ConfigError::IncorrectType(vec![
                "Ap".to_string(),
                "F".to_string(),
                "filter_window".to_string()
            ])
        );
    }

    #[test]
    fn test_optional_key_types() {
        let mut raw = reference();
        let map = raw.as_object_mut().unwrap();
        map.insert("fp2".into(), json!(null));
        map.insert("fs2".into(), json!([4.0]));
        assert_eq!(
            validate_config(&raw),
            Err(ConfigError::IncorrectType(vec!["fs2".to_string()]))
        );
    }

    #[test]
    fn test_unknown_enum_values() {
        let mut raw = reference();
        let map = raw.as_object_mut().unwrap();
        map.insert("filter_type".into(), json!("passband"));
        map.insert("filter_window".into(), json!("hann"));
        // Semantic faults are not reported while enum values are wrong
        map.insert("Ap".into(), json!(-1));
        assert_eq!(
            violations(validate_config(&raw)),
            vec![
                ValueViolation::UnknownFilterType("passband".to_string()),
                ValueViolation::UnknownWindow("hann".to_string()),
            ]
        );
    }

    #[test]
    fn test_lowpass_ordering() {
        let mut raw = reference();
        raw["filter_type"] = json!("lowpass");
        assert_eq!(
            violations(validate_config(&raw)),
            vec![ValueViolation::EdgeOrdering {
                rule: "lowpass requires fp < fs"
            }]
        );
    }

    #[test]
    fn test_ripples_and_frequencies_batched() {
        let mut raw = reference();
        raw["Ap"] = json!(0);
        raw["As"] = json!(-3);
        raw["fp"] = json!(90);
        let found = violations(validate_config(&raw));
        assert_eq!(found.len(), 3);
        assert!(found.contains(&ValueViolation::NonPositiveRipple { key: "Ap", value: 0.0 }));
        assert!(found.contains(&ValueViolation::NonPositiveRipple { key: "As", value: -3.0 }));
        assert!(found.contains(&ValueViolation::AboveSamplingRate {
            key: "fp",
            value: 90.0,
            sampling_rate: 80.0
        }));
    }

    #[test]
    fn test_non_positive_frequency() {
        let mut raw = reference();
        raw["fs"] = json!(0);
        let found = violations(validate_config(&raw));
        assert!(found.contains(&ValueViolation::NonPositiveFrequency { key: "fs", value: 0.0 }));
    }

    #[test]
    fn test_bandpass_requires_second_edges() {
        let raw = json!({
            "filter_type": "bandpass",
            "filter_window": "blackman",
            "Ap": 0.1, "As": 50, "fp": 1000, "fs": 2500, "F": 8000,
        });
        let found = violations(validate_config(&raw));
        assert_eq!(
            found,
            vec![
                ValueViolation::MissingBandEdge { key: "fp2" },
                ValueViolation::MissingBandEdge { key: "fs2" },
            ]
        );
    }

    #[test]
    fn test_valid_bandpass() {
        let raw = json!({
            "filter_type": "bandpass",
            "filter_window": "kaiser",
            "Ap": 0.1, "As": 50,
            "fp": 1000, "fp2": 2000,
            "fs": 2500, "fs2": 500,
            "F": 8000,
        });
        let config = validate_config(&raw).unwrap();
        assert_eq!(config.filter_type, FilterKind::Bandpass);
        assert_eq!(config.passband_edge2_hz, Some(2000.0));
        assert_eq!(config.stopband_edge2_hz, Some(500.0));
    }

    #[test]
    fn test_bandpass_ordering_violations() {
        let raw = json!({
            "filter_type": "bandpass",
            "filter_window": "hamming",
            "Ap": 0.1, "As": 50,
            "fp": 2000, "fp2": 1000,
            "fs": 500, "fs2": 2500,
            "F": 8000,
        });
        let found = violations(validate_config(&raw));
        assert!(found.contains(&ValueViolation::EdgeOrdering {
            rule: "bandpass requires fp < fp2"
        }));
        assert!(found.contains(&ValueViolation::EdgeOrdering {
            rule: "bandpass requires fs > fs2"
        }));
    }

    #[test]
    fn test_stopband_ordering_and_overlap() {
        let mut raw = json!({
            "filter_type": "stopband",
            "filter_window": "hamming",
            "Ap": 0.1, "As": 50,
            "fp": 3000, "fp2": 500,
            "fs": 1000, "fs2": 2000,
            "F": 8000,
        });
        assert!(validate_config(&raw).is_ok());

        // Stopband edges outside the passband edges leave no transition band
        raw["fs"] = json!(400);
        let found = violations(validate_config(&raw));
        assert_eq!(found, vec![ValueViolation::NonPositiveTransition { gap: -100.0 }]);
    }

    #[test]
    fn test_band_edges_above_sampling_rate() {
        let raw = json!({
            "filter_type": "stopband",
            "filter_window": "hamming",
            "Ap": 0.1, "As": 50,
            "fp": 3000, "fp2": 500,
            "fs": 1000, "fs2": 9000,
            "F": 8000,
        });
        let found = violations(validate_config(&raw));
        assert!(found.contains(&ValueViolation::AboveSamplingRate {
            key: "fs2",
            value: 9000.0,
            sampling_rate: 8000.0
        }));
    }

    #[test]
    fn test_check_values_on_typed_config() {
        let mut config = FilterConfig::reference();
        assert!(check_values(&config).is_ok());
        config.passband_ripple_db = f64::NAN;
        assert!(check_values(&config).is_err());
    }
}
