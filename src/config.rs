//! Manager configuration with defaults and one-shot validation.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::progression::Progression;

/// Configuration for an [`EquilibriumManager`](crate::EquilibriumManager).
///
/// Every field has a stated default; validation happens once, at manager
/// construction (or explicitly via [`ManagerConfig::validate`] after
/// deserializing).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManagerConfig {
    /// Minimum fraction of worth reserved as cash. Caps the total target
    /// ratio at `1 - cash_ratio`.
    #[serde(default = "default_cash_ratio")]
    pub cash_ratio: f64,

    /// Step-size policy governing how much drift one tick may close.
    #[serde(default)]
    pub progression: Progression,

    /// Display identifier for the manager instance.
    #[serde(default)]
    pub name: Option<String>,
}

fn default_cash_ratio() -> f64 {
    0.03
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            cash_ratio: default_cash_ratio(),
            progression: Progression::default(),
            name: None,
        }
    }
}

impl ManagerConfig {
    /// Load a config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: ManagerConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate config invariants.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.cash_ratio) {
            return Err(Error::Config(format!(
                "cash_ratio must be in [0.0, 1.0), got {}",
                self.cash_ratio
            )));
        }
        self.progression.validate()?;
        Ok(())
    }
}
