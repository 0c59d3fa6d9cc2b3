//! Passport configuration with TOML file support.

use crate::PersonhoodError;
use passport_links::DEFAULT_MAX_ENTITIES_PER_PASSPORT;
use passport_lists::{DEFAULT_LIST_THRESHOLD, DEFAULT_SIGNALING_THRESHOLD};
use passport_types::{NetworkId, PersonhoodCheck, SecurityLevel};
use passport_utils::LogFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Initial settings of a passport deployment.
///
/// Can be loaded from a TOML file via [`PassportConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). Settings only seed the genesis
/// state; later changes go through the service's setters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassportConfig {
    /// Network the signing domain is bound to.
    #[serde(default)]
    pub network: NetworkId,

    /// Name in the typed-data signing domain.
    #[serde(default = "default_signing_domain_name")]
    pub signing_domain_name: String,

    /// Minimum decayed cumulative score for the participation check.
    #[serde(default = "default_threshold_pop_score")]
    pub threshold_pop_score: u64,

    /// Percentage carried-over score loses each round (0..=100).
    #[serde(default)]
    pub decay_rate: u64,

    /// Length of the cumulative score window, in rounds.
    #[serde(default = "default_rounds_for_cumulative_score")]
    pub rounds_for_cumulative_score: u64,

    #[serde(default = "default_minimum_galaxy_member_level")]
    pub minimum_galaxy_member_level: u64,

    #[serde(default = "default_max_entities_per_passport")]
    pub max_entities_per_passport: u32,

    /// Percent of a passport's entities that must be whitelisted.
    #[serde(default = "default_list_threshold")]
    pub whitelist_threshold: u8,

    /// Percent of a passport's entities that must be blacklisted.
    #[serde(default = "default_list_threshold")]
    pub blacklist_threshold: u8,

    #[serde(default = "default_signaling_threshold")]
    pub signaling_threshold: u64,

    #[serde(default)]
    pub security_multipliers: SecurityMultipliers,

    /// Checks switched on at genesis.
    #[serde(default)]
    pub enabled_checks: Vec<PersonhoodCheck>,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Points per action for each [`SecurityLevel`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityMultipliers {
    #[serde(default)]
    pub none: u64,
    #[serde(default = "default_low_multiplier")]
    pub low: u64,
    #[serde(default = "default_medium_multiplier")]
    pub medium: u64,
    #[serde(default = "default_high_multiplier")]
    pub high: u64,
}

impl SecurityMultipliers {
    pub fn get(&self, level: SecurityLevel) -> u64 {
        match level {
            SecurityLevel::None => self.none,
            SecurityLevel::Low => self.low,
            SecurityLevel::Medium => self.medium,
            SecurityLevel::High => self.high,
        }
    }
}

impl Default for SecurityMultipliers {
    fn default() -> Self {
        Self {
            none: 0,
            low: default_low_multiplier(),
            medium: default_medium_multiplier(),
            high: default_high_multiplier(),
        }
    }
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_signing_domain_name() -> String {
    "VoterPassport".to_string()
}

fn default_threshold_pop_score() -> u64 {
    2000
}

fn default_rounds_for_cumulative_score() -> u64 {
    12
}

fn default_minimum_galaxy_member_level() -> u64 {
    2
}

fn default_max_entities_per_passport() -> u32 {
    DEFAULT_MAX_ENTITIES_PER_PASSPORT
}

fn default_list_threshold() -> u8 {
    DEFAULT_LIST_THRESHOLD
}

fn default_signaling_threshold() -> u64 {
    DEFAULT_SIGNALING_THRESHOLD
}

fn default_low_multiplier() -> u64 {
    100
}

fn default_medium_multiplier() -> u64 {
    200
}

fn default_high_multiplier() -> u64 {
    400
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl PassportConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, PersonhoodError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| PersonhoodError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, PersonhoodError> {
        toml::from_str(s).map_err(|e| PersonhoodError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, PersonhoodError> {
        toml::to_string_pretty(self).map_err(|e| PersonhoodError::Config(e.to_string()))
    }

    /// Install the global tracing subscriber described by `log_format` and
    /// `log_level`. `RUST_LOG` overrides the level when set.
    pub fn init_logging(&self) -> Result<(), PersonhoodError> {
        passport_utils::init_logging(self.log_format, &self.log_level)?;
        Ok(())
    }
}

impl Default for PassportConfig {
    fn default() -> Self {
        Self {
            network: NetworkId::default(),
            signing_domain_name: default_signing_domain_name(),
            threshold_pop_score: default_threshold_pop_score(),
            decay_rate: 0,
            rounds_for_cumulative_score: default_rounds_for_cumulative_score(),
            minimum_galaxy_member_level: default_minimum_galaxy_member_level(),
            max_entities_per_passport: default_max_entities_per_passport(),
            whitelist_threshold: default_list_threshold(),
            blacklist_threshold: default_list_threshold(),
            signaling_threshold: default_signaling_threshold(),
            security_multipliers: SecurityMultipliers::default(),
            enabled_checks: Vec::new(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}
