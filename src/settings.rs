//! Visual settings and simulation tunables
//!
//! Persisted as JSON. Missing fields take their defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::renderer::VoxelParams;
use crate::sim::FlowParams;

/// Flyover camera presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ViewPreset {
    #[default]
    High,
    Mid,
    Low,
}

impl ViewPreset {
    pub const ALL: [ViewPreset; 3] = [ViewPreset::High, ViewPreset::Mid, ViewPreset::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewPreset::High => "HIGH",
            ViewPreset::Mid => "MID",
            ViewPreset::Low => "LOW",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "high" => Some(ViewPreset::High),
            "mid" | "medium" => Some(ViewPreset::Mid),
            "low" => Some(ViewPreset::Low),
            _ => None,
        }
    }

    /// Eye height in terrain units
    pub fn camera_height(&self) -> f32 {
        match self {
            ViewPreset::High => 140.0,
            ViewPreset::Mid => 100.0,
            ViewPreset::Low => 60.0,
        }
    }

    /// Horizon screen row (lower rows tilt the view down)
    pub fn horizon(&self) -> i32 {
        match self {
            ViewPreset::High => 12,
            ViewPreset::Mid => 16,
            ViewPreset::Low => 20,
        }
    }

    /// Previous preset, wrapping
    pub fn prev(&self) -> Self {
        match self {
            ViewPreset::High => ViewPreset::Low,
            ViewPreset::Mid => ViewPreset::High,
            ViewPreset::Low => ViewPreset::Mid,
        }
    }

    /// Next preset, wrapping
    pub fn next(&self) -> Self {
        match self {
            ViewPreset::High => ViewPreset::Mid,
            ViewPreset::Mid => ViewPreset::Low,
            ViewPreset::Low => ViewPreset::High,
        }
    }
}

/// Flyover time presets: simulation and orbit speed multipliers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum SpeedPreset {
    Slow,
    #[default]
    Normal,
    Fast,
    Double,
}

impl SpeedPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpeedPreset::Slow => "SLOW",
            SpeedPreset::Normal => "NORMAL",
            SpeedPreset::Fast => "FAST",
            SpeedPreset::Double => "2X",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "slow" => Some(SpeedPreset::Slow),
            "normal" => Some(SpeedPreset::Normal),
            "fast" => Some(SpeedPreset::Fast),
            "2x" | "double" => Some(SpeedPreset::Double),
            _ => None,
        }
    }

    /// Simulation time-scale
    pub fn sim_mult(&self) -> f32 {
        match self {
            SpeedPreset::Slow => 0.3,
            SpeedPreset::Normal => 0.6,
            SpeedPreset::Fast => 1.2,
            SpeedPreset::Double => 2.5,
        }
    }

    /// Orbit speed multiplier
    pub fn orbit_mult(&self) -> f32 {
        match self {
            SpeedPreset::Slow => 0.5,
            SpeedPreset::Normal => 1.0,
            SpeedPreset::Fast => 2.0,
            SpeedPreset::Double => 3.0,
        }
    }

    /// Slower preset, saturating at `Slow`
    pub fn slower(&self) -> Self {
        match self {
            SpeedPreset::Slow | SpeedPreset::Normal => SpeedPreset::Slow,
            SpeedPreset::Fast => SpeedPreset::Normal,
            SpeedPreset::Double => SpeedPreset::Fast,
        }
    }

    /// Faster preset, saturating at `Double`
    pub fn faster(&self) -> Self {
        match self {
            SpeedPreset::Slow => SpeedPreset::Normal,
            SpeedPreset::Normal => SpeedPreset::Fast,
            SpeedPreset::Fast | SpeedPreset::Double => SpeedPreset::Double,
        }
    }
}

/// Errors reading or writing a settings file
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings JSON is invalid: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Settings for the Drift visuals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Water simulation tunables
    pub flow: FlowParams,
    /// Voxel renderer tunables
    pub voxel: VoxelParams,

    // === Ambient ===
    /// Seconds before the ambient visual regenerates terrain
    pub cycle_time: f32,
    /// Fade-out duration at the end of a cycle
    pub fade_time: f32,

    // === Flyover ===
    pub view: ViewPreset,
    pub speed: SpeedPreset,

    /// Fixed RNG seed for reproducible runs (random when None)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            flow: FlowParams::default(),
            voxel: VoxelParams::default(),
            cycle_time: 30.0,
            fade_time: 2.0,
            view: ViewPreset::High,
            speed: SpeedPreset::Normal,
            seed: None,
        }
    }
}

impl Settings {
    /// Parse settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read settings from a JSON file
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Read settings, falling back to defaults when the file is missing or invalid
    pub fn load(path: &Path) -> Self {
        match Self::load_from(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(SettingsError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("{} ({}), using defaults", e, path.display());
                Self::default()
            }
        }
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        fs::write(path, self.to_json()?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_cycle() {
        for view in ViewPreset::ALL {
            assert_eq!(view.next().prev(), view);
            assert_eq!(ViewPreset::from_str(view.as_str()), Some(view));
        }
        assert!(ViewPreset::High.camera_height() > ViewPreset::Low.camera_height());
    }

    #[test]
    fn test_speed_saturates() {
        assert_eq!(SpeedPreset::Slow.slower(), SpeedPreset::Slow);
        assert_eq!(SpeedPreset::Double.faster(), SpeedPreset::Double);
        assert_eq!(SpeedPreset::Normal.faster().slower(), SpeedPreset::Normal);
        assert_eq!(SpeedPreset::from_str("2x"), Some(SpeedPreset::Double));
    }

    #[test]
    fn test_json_round_trip() {
        let mut settings = Settings::default();
        settings.flow.evaporation_rate = 0.0;
        settings.view = ViewPreset::Low;
        settings.seed = Some(7);
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "cycle_time": 12.0, "flow": { "flow_rate": 0.2 } }"#).unwrap();
        assert_eq!(settings.cycle_time, 12.0);
        assert_eq!(settings.flow.flow_rate, 0.2);
        assert_eq!(settings.flow.min_depth, FlowParams::default().min_depth);
        assert_eq!(settings.fade_time, 2.0);
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        assert!(matches!(Settings::from_json("{ nope"), Err(SettingsError::Parse(_))));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let path = std::env::temp_dir().join("drift-settings-does-not-exist.json");
        assert_eq!(Settings::load(&path), Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("drift-settings-{}.json", std::process::id()));
        let settings = Settings {
            cycle_time: 45.0,
            ..Settings::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load_from(&path).unwrap(), settings);
        let _ = fs::remove_file(&path);
    }
}
