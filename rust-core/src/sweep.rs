//! Parallel parameter sweeps
//!
//! Design runs share nothing, so a batch is a plain parallel map. Results
//! come back in input order.

use crate::config::FilterConfig;
use crate::error::DesignError;
use crate::filters::{FilterDesign, FirDesigner};
use rayon::prelude::*;
use tracing::debug;

/// Batch designer for many independent configurations
#[derive(Debug, Clone, Copy, Default)]
pub struct ParameterSweep {
    designer: FirDesigner,
}

impl ParameterSweep {
    pub fn new(designer: FirDesigner) -> Self {
        Self { designer }
    }

    /// Design every configuration, one run per config
    pub fn design_batch(&self, configs: &[FilterConfig]) -> Vec<Result<FilterDesign, DesignError>> {
        debug!(runs = configs.len(), "design batch");
        configs
            .par_iter()
            .map(|config| self.designer.design(config))
            .collect()
    }

    /// Re-design `base` once per stopband attenuation in `attenuations_db`
    pub fn sweep_attenuation(
        &self,
        base: &FilterConfig,
        attenuations_db: &[f64],
    ) -> Vec<Result<FilterDesign, DesignError>> {
        let configs: Vec<FilterConfig> = attenuations_db
            .iter()
            .map(|&db| FilterConfig {
                stopband_attenuation_db: db,
                ..base.clone()
            })
            .collect();

        self.design_batch(&configs)
    }
}
