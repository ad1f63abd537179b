use serde::Serialize;

use crate::core::{pass::DEFAULT_STRIDE_CONSTANT, state::Ticks};
use crate::error::{Result, SimError};

/// Knobs supplied by whoever drives the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimConfig {
    /// Total simulated time units. No slice may end past this point.
    pub horizon: Ticks,
    /// Time units consumed by one dispatch.
    pub quantum: Ticks,
    /// Numerator of the stride computation. Only rescales pass values.
    pub stride_constant: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            horizon: 1000,
            quantum: 1,
            stride_constant: DEFAULT_STRIDE_CONSTANT,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<()> {
        if self.quantum == 0 {
            return Err(SimError::InvalidConfig(
                "time quantum must be at least 1".to_string(),
            ));
        }
        if !self.stride_constant.is_finite() || self.stride_constant <= 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "stride constant must be a positive finite number, got {}",
                self.stride_constant
            )));
        }
        Ok(())
    }
}
