//! Sculpting brushes with Gaussian falloff

use serde::{Deserialize, Serialize};

use super::state::DriftSim;
use super::terrain::NEIGHBORS_4;
use crate::consts::{MAX_HEIGHT, MIN_HEIGHT};

/// Radius within which the spring tool removes an existing spring
const SPRING_TOGGLE_RADIUS: f32 = 2.0;

/// Smoothing blend per application (scaled by falloff)
const SMOOTH_FACTOR: f32 = 0.3;

/// Water added per unit of brush strength (scaled by falloff)
const WATER_PER_STRENGTH: f32 = 0.5;

/// Brush tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrushTool {
    Raise,
    Lower,
    Smooth,
    Water,
    Spring,
}

impl BrushTool {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrushTool::Raise => "raise",
            BrushTool::Lower => "lower",
            BrushTool::Smooth => "smooth",
            BrushTool::Water => "water",
            BrushTool::Spring => "spring",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "raise" => Some(BrushTool::Raise),
            "lower" => Some(BrushTool::Lower),
            "smooth" => Some(BrushTool::Smooth),
            "water" => Some(BrushTool::Water),
            "spring" => Some(BrushTool::Spring),
            _ => None,
        }
    }
}

impl DriftSim {
    /// Apply a brush centred on (x, y).
    ///
    /// Terrain and water tools touch every in-bounds cell of the disc of
    /// `radius`, weighted by `exp(-d^2 / (radius^2 / 2))`. The spring tool
    /// toggles: it removes springs within 2 cells, or adds one if none was
    /// removed.
    pub fn apply_brush(&mut self, x: i32, y: i32, tool: BrushTool, radius: i32, strength: f32) {
        if tool == BrushTool::Spring {
            let before = self.springs.len();
            self.remove_spring(x, y, SPRING_TOGGLE_RADIUS);
            if self.springs.len() == before {
                self.add_default_spring(x, y);
            }
            return;
        }

        // Larger discs cover the same cells
        let radius = radius.clamp(0, self.width.max(self.height) as i32);
        let (w, h) = (self.width as i64, self.height as i64);
        let (cx, cy, r) = (x as i64, y as i64, radius as i64);
        if cx + r < 0 || cy + r < 0 || cx - r >= w || cy - r >= h {
            return;
        }
        let sigma_sq = (radius * radius) as f32 / 2.0;

        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let dist_sq = (dx * dx + dy * dy) as f32;
                if dist_sq.sqrt() > radius as f32 {
                    continue;
                }
                let (nx, ny) = (x + dx, y + dy);
                let Some(idx) = self.index(nx, ny) else {
                    continue;
                };
                let falloff = if sigma_sq > 0.0 { (-dist_sq / sigma_sq).exp() } else { 1.0 };

                match tool {
                    BrushTool::Raise => {
                        self.terrain[idx] = (self.terrain[idx] + strength * falloff).clamp(MIN_HEIGHT, MAX_HEIGHT);
                    }
                    BrushTool::Lower => {
                        self.terrain[idx] = (self.terrain[idx] - strength * falloff).clamp(MIN_HEIGHT, MAX_HEIGHT);
                    }
                    BrushTool::Smooth => {
                        let (total, count) = NEIGHBORS_4
                            .iter()
                            .filter_map(|&(ax, ay)| self.index(nx + ax, ny + ay))
                            .fold((self.terrain[idx], 1u32), |(t, c), n| (t + self.terrain[n], c + 1));
                        let mean = total / count as f32;
                        self.terrain[idx] += (mean - self.terrain[idx]) * SMOOTH_FACTOR * falloff;
                    }
                    BrushTool::Water => {
                        self.water[idx] = (self.water[idx] + strength * WATER_PER_STRENGTH * falloff).max(0.0);
                    }
                    BrushTool::Spring => {}
                }
            }
        }
    }

    /// String interface for callers that pass tool names; unknown tools are ignored
    pub fn apply_brush_named(&mut self, x: i32, y: i32, tool: &str, radius: i32, strength: f32) {
        match BrushTool::from_str(tool) {
            Some(tool) => self.apply_brush(x, y, tool, radius, strength),
            None => log::warn!("Unknown brush tool {:?}", tool),
        }
    }
}
