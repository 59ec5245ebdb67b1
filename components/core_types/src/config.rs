//! Engine semantics configuration.
//!
//! ```
//! use core_types::SemanticsConfig;
//!
//! let config = SemanticsConfig::from_json(r#"{ "approximate_number_equality": false }"#).unwrap();
//! assert!(!config.approximate_number_equality);
//! assert_eq!(config.number_equality_epsilon, 5e-324);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// `Number.MIN_VALUE`, the tolerance of approximate number equality.
pub const NUMBER_MIN_VALUE: f64 = 5e-324;

/// Failure to load a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid JSON for the target type.
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
    /// A field holds a value outside its domain.
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// Tunable language semantics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SemanticsConfig {
    /// Strict equality between two numbers tests `|a - b| < epsilon`
    /// instead of exact equality.
    pub approximate_number_equality: bool,
    /// Tolerance used while `approximate_number_equality` is on.
    pub number_equality_epsilon: f64,
}

impl Default for SemanticsConfig {
    fn default() -> Self {
        SemanticsConfig {
            approximate_number_equality: true,
            number_equality_epsilon: NUMBER_MIN_VALUE,
        }
    }
}

impl SemanticsConfig {
    /// Exact IEEE equality for numbers.
    pub fn exact() -> Self {
        SemanticsConfig {
            approximate_number_equality: false,
            ..Self::default()
        }
    }

    /// Load from a JSON document; missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: SemanticsConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check field domains.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let eps = self.number_equality_epsilon;
        if !eps.is_finite() || eps <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "number_equality_epsilon",
                reason: format!("must be a positive finite number, got {}", eps),
            });
        }
        Ok(())
    }

    /// Whether two finite numbers are equal under this configuration.
    pub fn numbers_equal(&self, a: f64, b: f64) -> bool {
        if self.approximate_number_equality {
            (a - b).abs() < self.number_equality_epsilon
        } else {
            a == b
        }
    }
}
