//! Manager state persistence.
//!
//! The durable form is a single JSON document with two fields,
//! `equilibrium` and `params`. Loading reconstructs an equivalent
//! manager: the stored allocation becomes both the initial snapshot and
//! the running equilibrium.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::ManagerConfig;
use crate::equilibrium::RatioMap;
use crate::error::{Error, Result};
use crate::manager::{EquilibriumManager, Mode};

/// The serialized form of a manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagerState {
    pub equilibrium: RatioMap,
    pub params: ManagerConfig,
}

impl ManagerState {
    /// Load state from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::StateRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let state: ManagerState = serde_json::from_str(&contents)?;
        Ok(state)
    }

    /// Write state to a JSON file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| Error::StateWrite {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

impl EquilibriumManager {
    /// Snapshot the running equilibrium and config for persistence.
    pub fn state(&self) -> ManagerState {
        ManagerState {
            equilibrium: self.equilibrium().running().clone(),
            params: self.config().clone(),
        }
    }

    /// Save the manager's state to a JSON file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        self.state().save(path)
    }

    /// Reconstruct a manager from a JSON state file.
    ///
    /// The stored config is re-validated; the stored equilibrium becomes
    /// both the initial and the running allocation.
    pub fn load_json(path: &Path, mode: Mode) -> Result<Self> {
        let state = ManagerState::load(path)?;
        Self::new(mode, state.equilibrium, state.params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::Progression;
    use crate::types::Symbol;

    fn sample_manager() -> EquilibriumManager {
        let ratios: RatioMap = [(Symbol::new("BTC-USD"), 0.2), (Symbol::new("ETH-USD"), 0.1)]
            .into_iter()
            .collect();
        let config = ManagerConfig {
            cash_ratio: 0.05,
            progression: Progression::capped_daily(0.04, 0.3).unwrap(),
            name: Some("roundtrip".into()),
        };
        EquilibriumManager::new(Mode::Live, ratios, config).unwrap()
    }

    #[test]
    fn state_has_two_named_fields() {
        let state = sample_manager().state();
        let json = serde_json::to_value(&state).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert!(obj.contains_key("equilibrium"));
        assert!(obj.contains_key("params"));
    }

    #[test]
    fn file_roundtrip_reconstructs_equivalent_manager() {
        let manager = sample_manager();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        manager.save_json(&path).unwrap();
        let loaded = EquilibriumManager::load_json(&path, Mode::Live).unwrap();

        assert_eq!(loaded.config(), manager.config());
        assert_eq!(loaded.equilibrium().running(), manager.equilibrium().running());
        // loaded running allocation doubles as the initial snapshot
        assert_eq!(loaded.equilibrium().initial(), loaded.equilibrium().running());
        assert_eq!(loaded.name(), "roundtrip");
    }

    #[test]
    fn load_rejects_invalid_stored_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(
            &path,
            r#"{"equilibrium": {"AAPL": 0.9, "MSFT": 0.9}, "params": {}}"#,
        )
        .unwrap();

        // over-allocated against the default cash ratio
        assert!(EquilibriumManager::load_json(&path, Mode::Backtest).is_err());
    }

    #[test]
    fn load_missing_file_is_read_error() {
        let result = ManagerState::load(Path::new("/nonexistent/state.json"));
        assert!(matches!(result, Err(Error::StateRead { .. })));
    }

    #[test]
    fn running_changes_are_what_gets_saved() {
        let mut manager = sample_manager();
        let new_ratios: RatioMap = [(Symbol::new("SPY"), 0.5)].into_iter().collect();
        manager.set_equilibrium(new_ratios.clone()).unwrap();

        let state = manager.state();
        assert_eq!(state.equilibrium, new_ratios);
    }
}
