//! YAML description of a factored function.
//!
//! A single file may carry a state-value function (`bases`), an action-value
//! function (`q_bases`), or both. Tables are listed in partial-index order, i.e.
//! with the first scope variable varying fastest (see [`crate::partial`]).
//!
//! ```yaml
//! state_space: [2, 2]
//! action_space: [2]
//! bases:
//!   - scope: [0]
//!     values: [1.0, 2.0]
//! q_bases:
//!   - state_scope: [0]
//!     action_scope: [0]
//!     values: [[10.0, 20.0], [30.0, 40.0]]   # one row per state index
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FunctionConfig {
    /// Cardinality of each state variable.
    pub state_space: Vec<usize>,
    /// Cardinality of each action variable. Only needed with `q_bases`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub action_space: Vec<usize>,
    /// Vector-form bases (a state-value function).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bases: Vec<BasisConfig>,
    /// Matrix-form bases (an action-value function).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub q_bases: Vec<QBasisConfig>,
}

/// One vector-form basis: a scope and its flat table.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BasisConfig {
    pub scope: Vec<usize>,
    pub values: Vec<f64>,
}

/// One matrix-form basis. `values[row][col]`, row from the state scope, column from
/// the action scope.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct QBasisConfig {
    pub state_scope: Vec<usize>,
    pub action_scope: Vec<usize>,
    pub values: Vec<Vec<f64>>,
}

impl FunctionConfig {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: FunctionConfig = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: FunctionConfig = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Write configuration as YAML, replacing `path` via a temporary sibling file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let tmp = path.with_extension("yaml.tmp");
        std::fs::write(&tmp, self.to_yaml()?)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }
}
