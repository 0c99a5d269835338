//! # Engine configuration
//!
//! Match rules, outcome-model tuning and persistence retry settings in one
//! serde-friendly struct, with presets per format.
//!
//! ```rust
//! use cricket_core::config::EngineConfig;
//!
//! let t20 = EngineConfig::default();
//! let odi = EngineConfig::odi();
//! assert_eq!(t20.rules.overs, 20);
//! assert_eq!(odi.rules.overs, 50);
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CricketError, Result};
use crate::stats::retry::RetryPolicy;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchRules {
    pub overs: u32,
    /// Super Overs played before a level match is shared
    pub max_super_overs: u32,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            overs: 20,
            max_super_overs: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutcomeTuning {
    /// Chance of an extra on any delivery outside the death overs
    pub extras_rate: f64,
    /// Chance of an extra in the death overs
    pub death_extras_rate: f64,
}

impl Default for OutcomeTuning {
    fn default() -> Self {
        Self { extras_rate: 0.08, death_extras_rate: 0.10 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub rules: MatchRules,
    pub outcome: OutcomeTuning,
    pub persistence: RetryPolicy,
}

impl EngineConfig {
    /// 20 overs a side (default)
    pub fn t20() -> Self {
        Self::default()
    }

    /// 50 overs a side
    pub fn odi() -> Self {
        let mut cfg = Self::default();
        cfg.rules.overs = 50;
        cfg
    }

    /// 10 overs a side, slightly looser bowling
    pub fn t10() -> Self {
        let mut cfg = Self::default();
        cfg.rules.overs = 10;
        cfg.outcome.extras_rate = 0.09;
        cfg.outcome.death_extras_rate = 0.11;
        cfg
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        let cfg: Self = serde_yaml::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&raw),
            _ => Self::from_json_str(&raw),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.rules.overs == 0 {
            return Err(CricketError::Config("overs must be at least 1".into()));
        }
        if self.rules.max_super_overs == 0 {
            return Err(CricketError::Config("max_super_overs must be at least 1".into()));
        }
        for (name, rate) in [
            ("extras_rate", self.outcome.extras_rate),
            ("death_extras_rate", self.outcome.death_extras_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(CricketError::Config(format!("{name} must be within 0..=1, got {rate}")));
            }
        }
        if self.persistence.max_attempts == 0 {
            return Err(CricketError::Config("persistence.max_attempts must be at least 1".into()));
        }
        Ok(())
    }
}
