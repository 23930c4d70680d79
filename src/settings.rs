//! Run settings and debug-overlay multipliers
//!
//! The simulation never reads global state: the debug overlay's two sliders
//! reach it as a [`DebugTuning`] value carried by each tick's input.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SimResult;

/// Player speed slider range
pub const SPEED_FACTOR_RANGE: (f32, f32) = (0.1, 5.0);
/// Player damage slider range
pub const DAMAGE_FACTOR_RANGE: (f32, f32) = (0.1, 10.0);

/// Scalar multipliers exposed by the debug overlay
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugTuning {
    /// Multiplies player swim speed
    pub speed_factor: f32,
    /// Multiplies projectile damage at fire time
    pub damage_factor: f32,
}

impl Default for DebugTuning {
    fn default() -> Self {
        Self {
            speed_factor: 1.0,
            damage_factor: 1.0,
        }
    }
}

impl DebugTuning {
    /// Set the speed factor (clamped to the slider range)
    pub fn with_speed_factor(mut self, factor: f32) -> Self {
        self.set_speed_factor(factor);
        self
    }

    /// Set the damage factor (clamped to the slider range)
    pub fn with_damage_factor(mut self, factor: f32) -> Self {
        self.set_damage_factor(factor);
        self
    }

    pub fn set_speed_factor(&mut self, factor: f32) {
        self.speed_factor = factor.clamp(SPEED_FACTOR_RANGE.0, SPEED_FACTOR_RANGE.1);
    }

    pub fn set_damage_factor(&mut self, factor: f32) {
        self.damage_factor = factor.clamp(DAMAGE_FACTOR_RANGE.0, DAMAGE_FACTOR_RANGE.1);
    }

    /// Re-apply the slider bounds (after deserializing untrusted values)
    pub fn clamped(self) -> Self {
        Self::default()
            .with_speed_factor(self.speed_factor)
            .with_damage_factor(self.damage_factor)
    }
}

/// Settings for a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Run seed (world generation and spawn rolls)
    pub seed: u64,
    /// Initial debug-overlay multipliers
    pub tuning: DebugTuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 42,
            tuning: DebugTuning::default(),
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields take defaults
    pub fn from_json(json: &str) -> SimResult<Self> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.tuning = settings.tuning.clamped();
        Ok(settings)
    }

    /// Serialize settings to pretty JSON
    pub fn to_json(&self) -> SimResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {} (seed {})", path.display(), settings.seed);
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tuning_is_neutral() {
        let tuning = DebugTuning::default();
        assert_eq!(tuning.speed_factor, 1.0);
        assert_eq!(tuning.damage_factor, 1.0);
    }

    #[test]
    fn test_tuning_clamped_to_slider_range() {
        let tuning = DebugTuning::default()
            .with_speed_factor(50.0)
            .with_damage_factor(0.0);
        assert_eq!(tuning.speed_factor, 5.0);
        assert_eq!(tuning.damage_factor, 0.1);
    }

    #[test]
    fn test_settings_partial_json() {
        let settings = Settings::from_json(r#"{ "seed": 7 }"#).unwrap();
        assert_eq!(settings.seed, 7);
        assert_eq!(settings.tuning, DebugTuning::default());
    }

    #[test]
    fn test_settings_json_clamps_tuning() {
        let settings =
            Settings::from_json(r#"{ "tuning": { "damage_factor": 99.0 } }"#).unwrap();
        assert_eq!(settings.tuning.damage_factor, 10.0);
        assert_eq!(settings.tuning.speed_factor, 1.0);
    }

    #[test]
    fn test_settings_invalid_json() {
        assert!(Settings::from_json("{ seed: nope }").is_err());
    }

    #[test]
    fn test_settings_round_trip() {
        let settings = Settings {
            seed: 99,
            tuning: DebugTuning::default().with_speed_factor(2.0),
        };
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }
}
