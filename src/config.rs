//! Acquisition configuration shared by the handler and the session thread.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::VarScopeError;

/// Settings for one monitoring session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcquisitionConfig {
    /// Sampling period of the acquisition actor.
    pub sample_period: Duration,
    /// Capacity of every time and series buffer, in samples. Together with
    /// `sample_period` this fixes the visible history window.
    pub buffer_capacity: usize,
    /// ELF image the symbol resolver reads addresses from, if any.
    pub elf_path: Option<PathBuf>,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            sample_period: Duration::from_millis(10),
            buffer_capacity: 10_000,
            elf_path: None,
        }
    }
}

impl AcquisitionConfig {
    /// Reject configurations that would make buffer construction fail or
    /// degenerate the sampling loop. Called once when the handler is created.
    pub fn validate(&self) -> Result<(), VarScopeError> {
        if self.buffer_capacity == 0 {
            return Err(VarScopeError::CapacityMisconfiguration(self.buffer_capacity));
        }
        if self.sample_period.is_zero() {
            return Err(VarScopeError::PeriodMisconfiguration);
        }
        Ok(())
    }
}
