//! Parameters for anomaly computation.

use crate::error::{AnomalyError, Result};
use crate::harmonic::max_harmonic;
use serde::{Deserialize, Serialize};

/// Default harmonic cutoff: annual mean plus three harmonics.
pub const DEFAULT_HARMONICS: usize = 3;

/// Tunable parameters of [`crate::anomaly::compute_anomaly_with`].
///
/// Deserializable from TOML, e.g.
///
/// ```
/// use climanom_core::params::AnomalyParams;
///
/// let params = AnomalyParams::from_toml_str("harmonics = 4").unwrap();
/// assert_eq!(params.harmonics, 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnomalyParams {
    /// Highest retained harmonic of the hour-of-year climatology
    pub harmonics: usize,
}

impl Default for AnomalyParams {
    fn default() -> Self {
        Self {
            harmonics: DEFAULT_HARMONICS,
        }
    }
}

impl AnomalyParams {
    pub fn new(harmonics: usize) -> Self {
        Self { harmonics }
    }

    /// Parse from a TOML document; missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Check the cutoff against an hour-of-year axis length.
    pub fn validate(&self, n_hours: usize) -> Result<()> {
        if n_hours < 2 {
            return Err(AnomalyError::InsufficientBuckets {
                required: 2,
                actual: n_hours,
            });
        }
        let max = max_harmonic(n_hours);
        if self.harmonics > max {
            return Err(AnomalyError::HarmonicOutOfRange {
                harmonics: self.harmonics,
                max,
            });
        }
        Ok(())
    }
}
