//! # Authority Configuration
//!
//! Loaded once at startup from TOML. Every section is optional; missing keys
//! fall back to the built-in defaults.
//!
//! ```toml
//! tick_rate = 60
//! default_max_health = 100.0
//!
//! [regen]
//! enabled = true
//! rate_per_second = 5.0
//! delay_seconds = 4.0
//!
//! [body_parts]
//! head = 2.0
//! torso = 1.0
//! limbs = 0.75
//! ```

use std::path::Path;

use bastion_shared::{BodyPart, DEFAULT_MAX_HEALTH, TICK_RATE};
use serde::Deserialize;

use crate::error::{ConfigError, ConfigResult};

/// Top-level configuration for an authority node.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AuthorityConfig {
    /// Host tick rate (updates per second).
    pub tick_rate: u32,
    /// Max health for actors spawned without one.
    pub default_max_health: f32,
    /// Out-of-combat regeneration.
    pub regen: RegenConfig,
    /// Damage multipliers per hit zone.
    pub body_parts: BodyPartMultipliers,
}

impl Default for AuthorityConfig {
    fn default() -> Self {
        Self {
            tick_rate: TICK_RATE,
            default_max_health: DEFAULT_MAX_HEALTH,
            regen: RegenConfig::default(),
            body_parts: BodyPartMultipliers::default(),
        }
    }
}

impl AuthorityConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Rejects values the authority model cannot work with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.tick_rate == 0 {
            return Err(ConfigError::Invalid("tick_rate must be at least 1".into()));
        }
        if !self.default_max_health.is_finite() || self.default_max_health <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "default_max_health must be positive, got {}",
                self.default_max_health
            )));
        }
        if !self.regen.rate_per_second.is_finite() || self.regen.rate_per_second < 0.0 {
            return Err(ConfigError::Invalid("regen.rate_per_second must be >= 0".into()));
        }
        if !self.regen.delay_seconds.is_finite() || self.regen.delay_seconds < 0.0 {
            return Err(ConfigError::Invalid("regen.delay_seconds must be >= 0".into()));
        }
        for (name, value) in [
            ("head", self.body_parts.head),
            ("torso", self.body_parts.torso),
            ("limbs", self.body_parts.limbs),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "body_parts.{name} must be >= 0, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Regeneration settings.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RegenConfig {
    /// Whether living actors regenerate at all.
    pub enabled: bool,
    /// Health restored per second once regeneration kicks in.
    pub rate_per_second: f32,
    /// Seconds without taking damage before regeneration starts.
    pub delay_seconds: f32,
}

impl Default for RegenConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            rate_per_second: 5.0,
            delay_seconds: 5.0,
        }
    }
}

/// Damage multipliers per body part.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct BodyPartMultipliers {
    /// Head hits.
    pub head: f32,
    /// Torso hits.
    pub torso: f32,
    /// Arm and leg hits.
    pub limbs: f32,
}

impl Default for BodyPartMultipliers {
    fn default() -> Self {
        Self {
            head: 2.0,
            torso: 1.0,
            limbs: 0.75,
        }
    }
}

impl BodyPartMultipliers {
    /// Multiplier for a hit zone.
    #[must_use]
    pub const fn multiplier(&self, part: BodyPart) -> f32 {
        match part {
            BodyPart::Head => self.head,
            BodyPart::Torso => self.torso,
            BodyPart::Limbs => self.limbs,
        }
    }
}
