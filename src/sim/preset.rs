//! Procedural terrain styles

use serde::{Deserialize, Serialize};

/// Noise and shaping parameters for one terrain style
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresetParams {
    /// Base noise frequency (per cell on a 256-wide reference grid)
    pub scale: f64,
    pub octaves: u32,
    pub persistence: f64,
    /// Fraction of MAX_HEIGHT used as amplitude
    pub height_mult: f64,
    /// Exponent of the radial island falloff
    pub falloff_power: f64,
    /// Offset added to every cell
    pub base_height: f64,
}

/// Terrain style selected at generation time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerrainPreset {
    #[default]
    Default,
    Hills,
    Mountains,
    Plains,
}

impl TerrainPreset {
    pub const ALL: [TerrainPreset; 4] = [
        TerrainPreset::Default,
        TerrainPreset::Hills,
        TerrainPreset::Mountains,
        TerrainPreset::Plains,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TerrainPreset::Default => "default",
            TerrainPreset::Hills => "hills",
            TerrainPreset::Mountains => "mountains",
            TerrainPreset::Plains => "plains",
        }
    }

    /// Upper-case label for on-screen overlays
    pub fn label(&self) -> &'static str {
        match self {
            TerrainPreset::Default => "DEFAULT",
            TerrainPreset::Hills => "HILLS",
            TerrainPreset::Mountains => "MOUNTAINS",
            TerrainPreset::Plains => "PLAINS",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "default" => Some(TerrainPreset::Default),
            "hills" => Some(TerrainPreset::Hills),
            "mountains" => Some(TerrainPreset::Mountains),
            "plains" => Some(TerrainPreset::Plains),
            _ => None,
        }
    }

    /// Lookup by name, falling back to `Default` for unknown names
    pub fn from_name(s: &str) -> Self {
        Self::from_str(s).unwrap_or_else(|| {
            log::warn!("Unknown terrain preset {:?}, using default", s);
            TerrainPreset::Default
        })
    }

    pub fn params(&self) -> PresetParams {
        match self {
            TerrainPreset::Default => PresetParams {
                scale: 0.015,
                octaves: 5,
                persistence: 0.5,
                height_mult: 0.7,
                falloff_power: 2.0,
                base_height: 0.0,
            },
            TerrainPreset::Hills => PresetParams {
                scale: 0.012,
                octaves: 4,
                persistence: 0.4,
                height_mult: 0.4,
                falloff_power: 1.5,
                base_height: 20.0,
            },
            TerrainPreset::Mountains => PresetParams {
                scale: 0.02,
                octaves: 6,
                persistence: 0.55,
                height_mult: 1.0,
                falloff_power: 3.0,
                base_height: -50.0,
            },
            TerrainPreset::Plains => PresetParams {
                scale: 0.008,
                octaves: 3,
                persistence: 0.3,
                height_mult: 0.15,
                falloff_power: 1.2,
                base_height: 30.0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_round_trip() {
        for preset in TerrainPreset::ALL {
            assert_eq!(TerrainPreset::from_str(preset.as_str()), Some(preset));
        }
        assert_eq!(TerrainPreset::from_str("MOUNTAINS"), Some(TerrainPreset::Mountains));
    }

    #[test]
    fn test_unknown_name_falls_back() {
        assert_eq!(TerrainPreset::from_str("volcano"), None);
        assert_eq!(TerrainPreset::from_name("volcano"), TerrainPreset::Default);
    }
}
