//! TOML engine configuration.
//!
//! ```toml
//! catalog_path = "data/medicine_data.json"
//!
//! [profile]
//! age = 67
//! region = "US"
//! allergies = ["Penicillin"]
//! ulcer = true
//!
//! [[rules]]
//! id = "diclofenac-elderly"
//! message = "Diclofenac over 65: monitor kidney function."
//! requires_all = ["diclofenac"]
//! min_age = 65
//! ```
//!
//! Every section is optional. Extra rules run after the built-in rules.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::catalog::Catalog;
use crate::interactions::{InteractionRule, RuleSet};
use crate::models::PatientProfile;
use crate::session::Session;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid rule '{id}': {reason}")]
    InvalidRule { id: String, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Engine configuration loaded from TOML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Catalog JSON file; the bundled catalog is used when absent
    pub catalog_path: Option<PathBuf>,
    /// Starting patient profile
    pub profile: PatientProfile,
    /// Interaction rules appended after the built-ins
    pub rules: Vec<InteractionRule>,
}

impl EngineConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> ConfigResult<Self> {
        let config: EngineConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a TOML file.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        info!(path = %path.display(), extra_rules = config.rules.len(), "loaded engine config");
        Ok(config)
    }

    /// Check extra rules: each names at least one medicine and has a unique id.
    pub fn validate(&self) -> ConfigResult<()> {
        let builtin = RuleSet::builtin();
        let mut seen: HashSet<&str> = builtin.iter().map(|r| r.id.as_str()).collect();

        for rule in &self.rules {
            if rule.id.trim().is_empty() {
                return Err(ConfigError::InvalidRule {
                    id: rule.id.clone(),
                    reason: "rule id is empty".into(),
                });
            }
            if rule.requires_all.is_empty() {
                return Err(ConfigError::InvalidRule {
                    id: rule.id.clone(),
                    reason: "requires_all must name at least one medicine id".into(),
                });
            }
            if !seen.insert(rule.id.as_str()) {
                return Err(ConfigError::InvalidRule {
                    id: rule.id.clone(),
                    reason: "duplicate rule id".into(),
                });
            }
        }
        Ok(())
    }

    /// Built-in rules followed by the configured extra rules.
    pub fn rule_set(&self) -> RuleSet {
        RuleSet::builtin().with_extra(self.rules.iter().cloned())
    }

    /// Load the configured catalog, degrading to empty if it cannot be read.
    pub fn load_catalog(&self) -> Catalog {
        match &self.catalog_path {
            Some(path) => Catalog::load_or_empty(path),
            None => Catalog::bundled(),
        }
    }

    /// Start a session from this configuration.
    pub fn start_session(&self) -> Session {
        Session::with_rules(self.load_catalog(), self.rule_set()).with_profile(self.profile.clone())
    }
}
