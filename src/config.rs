use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cell::Tier;
use crate::coords::GridCoord;
use crate::layers::LightLevels;
use crate::resolver::within_move_bounds;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config value: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub spawn: GridCoord,
    pub seed: u64,
    pub max_tier: u32,
    pub gem_tiers: Vec<u32>,
    pub terrain_ratio: f32,
    pub surface_light: f32,
    pub underground_light: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        let lights = LightLevels::default();
        Self {
            spawn: GridCoord::new(8, -1, 8),
            seed: 42,
            max_tier: Tier::DEFAULT_MAX.value(),
            gem_tiers: vec![1, 2, 4, 8],
            terrain_ratio: 0.35,
            surface_light: lights.surface,
            underground_light: lights.underground,
        }
    }
}

impl GameConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: GameConfig = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !within_move_bounds(self.spawn) {
            return Err(ConfigError::Invalid(format!("spawn {} outside the world", self.spawn)));
        }
        let max = self.max_tier()?;
        if max.value() < 2 {
            return Err(ConfigError::Invalid("max_tier must be at least 2".into()));
        }
        if self.gem_tiers.is_empty() {
            return Err(ConfigError::Invalid("gem_tiers is empty".into()));
        }
        for &t in &self.gem_tiers {
            match Tier::new(t) {
                Some(tier) if tier <= max => {}
                _ => return Err(ConfigError::Invalid(format!("gem tier {t} not a power of two up to {}", max.value()))),
            }
        }
        if !(0.0..=1.0).contains(&self.terrain_ratio) {
            return Err(ConfigError::Invalid(format!("terrain_ratio {} not in [0,1]", self.terrain_ratio)));
        }
        Ok(())
    }

    pub fn max_tier(&self) -> Result<Tier, ConfigError> {
        Tier::new(self.max_tier)
            .ok_or_else(|| ConfigError::Invalid(format!("max_tier {} is not a power of two", self.max_tier)))
    }

    pub fn gem_tiers(&self) -> Vec<Tier> {
        self.gem_tiers.iter().filter_map(|&t| Tier::new(t)).collect()
    }

    pub fn lights(&self) -> LightLevels {
        LightLevels {
            surface: self.surface_light,
            underground: self.underground_light,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = GameConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.spawn, GridCoord::new(8, -1, 8));
        assert_eq!(cfg.max_tier().unwrap(), Tier::DEFAULT_MAX);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg = GameConfig::from_json_str(r#"{ "seed": 7, "gem_tiers": [2, 4] }"#).unwrap();
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.gem_tiers().len(), 2);
        assert_eq!(cfg.max_tier, 2048);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            GameConfig::from_json_str(r#"{ "max_tier": 100 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            GameConfig::from_json_str(r#"{ "max_tier": 4, "gem_tiers": [8] }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            GameConfig::from_json_str(r#"{ "spawn": { "x": 20, "y": 0, "z": 0 } }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            GameConfig::from_json_str(r#"{ "terrain_ratio": 1.5 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(GameConfig::from_json_str("{"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            GameConfig::load("/nonexistent/digmerge.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
