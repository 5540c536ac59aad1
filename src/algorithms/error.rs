use thiserror::Error;

use crate::fleet::FleetError;

/// Invalid strategy configuration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be in {range}, got {value}")]
    OutOfRange {
        field: &'static str,
        range: &'static str,
        value: f64,
    },

    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f64 },
}

impl ConfigError {
    /// Checks `lo <= value <= hi` (or `lo < value` when `lo_open`).
    pub(crate) fn check_range(
        field: &'static str,
        value: f64,
        lo: f64,
        hi: f64,
        lo_open: bool,
        range: &'static str,
    ) -> Result<(), ConfigError> {
        let above_lo = if lo_open { value > lo } else { value >= lo };
        if value.is_finite() && above_lo && value <= hi {
            Ok(())
        } else {
            Err(ConfigError::OutOfRange {
                field,
                range,
                value,
            })
        }
    }

    pub(crate) fn check_finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
        if value.is_finite() {
            Ok(())
        } else {
            Err(ConfigError::NonFinite { field, value })
        }
    }
}

/// Errors returned by an allocation strategy.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AllocationError {
    #[error("malformed registry: {0}")]
    Fleet(#[from] FleetError),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
