//! Coercion configuration
//!
//! The default configuration reproduces the documented behaviour: integer
//! narrowing wraps, float to integer truncates toward zero, and strings
//! are parsed exactly as given. Alternative policies can be loaded from RON:
//!
//! ```
//! use dynval_core::{CoercionConfig, Narrowing};
//!
//! let config = CoercionConfig::from_ron_str("(narrowing: Saturate, trim_strings: true)").unwrap();
//! assert_eq!(config.narrowing, Narrowing::Saturate);
//! assert!(config.trim_strings);
//! ```

use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// What happens when a numeric value does not fit the target kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Narrowing {
    /// Keep the low bits (two's complement wrap)
    ///
    /// Floats truncate toward zero and then wrap the same way, whatever
    /// their magnitude. NaN and infinities become 0.
    #[default]
    Wrap,
    /// Clamp to the target's minimum or maximum
    Saturate,
    /// Fail with [`Error::OutOfRange`](crate::Error::OutOfRange)
    Reject,
}

/// Settings for the coercion matrix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CoercionConfig {
    /// Policy for out-of-range numeric narrowing
    pub narrowing: Narrowing,
    /// Ignore surrounding whitespace when parsing strings as numbers
    pub trim_strings: bool,
}

impl CoercionConfig {
    /// Create a configuration with the given narrowing policy
    pub fn with_narrowing(narrowing: Narrowing) -> Self {
        Self {
            narrowing,
            ..Self::default()
        }
    }

    /// Parse a configuration from RON text
    pub fn from_ron_str(s: &str) -> Result<Self> {
        let config: CoercionConfig = ron::from_str(s)?;
        log::debug!(
            "loaded coercion config: narrowing={:?}, trim_strings={}",
            config.narrowing,
            config.trim_strings
        );
        Ok(config)
    }

    /// Load a configuration from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_ron_str(&content)
    }
}
