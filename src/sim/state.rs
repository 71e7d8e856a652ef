//! Simulation state: height field, water field and springs
//!
//! Grids are row-major `Vec<f32>` of `width * height` cells. All coordinate
//! based queries are bounds-checked and silently ignore out-of-range cells.

use serde::{Deserialize, Serialize};

use super::terrain::NEIGHBORS_4;
use crate::consts::*;
use crate::palette::{self, Rgb};

/// Tunable water parameters (owned by the simulation so they can be overridden)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowParams {
    /// Fraction of the surface difference moved per step
    pub flow_rate: f32,
    /// Depth below which a cell is treated as dry
    pub min_depth: f32,
    /// Depth removed from every cell per second
    pub evaporation_rate: f32,
    /// Output of a spring placed without an explicit rate
    pub spring_flow_rate: f32,
}

impl Default for FlowParams {
    fn default() -> Self {
        Self {
            flow_rate: FLOW_RATE,
            min_depth: MIN_DEPTH,
            evaporation_rate: EVAPORATION_RATE,
            spring_flow_rate: SPRING_FLOW_RATE,
        }
    }
}

/// A point source injecting water every step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spring {
    pub x: usize,
    pub y: usize,
    /// Depth units per second
    pub flow_rate: f32,
}

/// Terrain + water simulation
#[derive(Debug, Clone)]
pub struct DriftSim {
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) terrain: Vec<f32>,
    pub(crate) water: Vec<f32>,
    /// Jacobi scratch buffer for flow
    pub(crate) water_next: Vec<f32>,
    /// Smoothed flow direction, used for foam/shimmer only
    pub(crate) velocity_x: Vec<f32>,
    pub(crate) velocity_y: Vec<f32>,
    pub(crate) springs: Vec<Spring>,
    pub params: FlowParams,
}

impl Default for DriftSim {
    fn default() -> Self {
        Self::new(GRID_SIZE, GRID_SIZE)
    }
}

impl DriftSim {
    /// Create a flat, dry simulation grid
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_params(width, height, FlowParams::default())
    }

    pub fn with_params(width: usize, height: usize, params: FlowParams) -> Self {
        let n = width * height;
        Self {
            width,
            height,
            terrain: vec![0.0; n],
            water: vec![0.0; n],
            water_next: vec![0.0; n],
            velocity_x: vec![0.0; n],
            velocity_y: vec![0.0; n],
            springs: Vec::new(),
            params,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major terrain heights
    pub fn terrain(&self) -> &[f32] {
        &self.terrain
    }

    /// Row-major water depths
    pub fn water(&self) -> &[f32] {
        &self.water
    }

    pub fn springs(&self) -> &[Spring] {
        &self.springs
    }

    /// Flat index for in-bounds signed coordinates
    #[inline]
    pub fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    pub fn terrain_at(&self, x: i32, y: i32) -> Option<f32> {
        self.index(x, y).map(|i| self.terrain[i])
    }

    pub fn water_at(&self, x: i32, y: i32) -> Option<f32> {
        self.index(x, y).map(|i| self.water[i])
    }

    /// Smoothed flow velocity at a cell
    pub fn velocity_at(&self, x: i32, y: i32) -> Option<(f32, f32)> {
        self.index(x, y).map(|i| (self.velocity_x[i], self.velocity_y[i]))
    }

    /// Overwrite one terrain cell (clamped to the height range)
    pub fn set_terrain(&mut self, x: i32, y: i32, height: f32) {
        if let Some(i) = self.index(x, y) {
            self.terrain[i] = height.clamp(MIN_HEIGHT, MAX_HEIGHT);
        }
    }

    /// Overwrite one water cell (negative depths become zero)
    pub fn set_water(&mut self, x: i32, y: i32, depth: f32) {
        if let Some(i) = self.index(x, y) {
            self.water[i] = depth.max(0.0);
        }
    }

    /// Replace the whole height field with a constant and clear all water
    pub fn fill_terrain(&mut self, height: f32) {
        self.terrain.fill(height.clamp(MIN_HEIGHT, MAX_HEIGHT));
        self.clear_water();
    }

    /// Zero water, scratch and velocity grids and remove every spring
    pub fn clear_water(&mut self) {
        self.water.fill(0.0);
        self.water_next.fill(0.0);
        self.velocity_x.fill(0.0);
        self.velocity_y.fill(0.0);
        self.springs.clear();
    }

    /// Total depth summed over the grid (accumulated in f64)
    pub fn total_water(&self) -> f64 {
        self.water.iter().map(|&d| d as f64).sum()
    }

    /// Number of cells deeper than `min_depth`
    pub fn wet_cells(&self) -> usize {
        let min = self.params.min_depth;
        self.water.iter().filter(|&&d| d > min).count()
    }

    /// Add a constant depth to every wet cell (counteracts evaporation)
    pub fn replenish(&mut self, amount: f32) {
        let min = self.params.min_depth;
        for d in self.water.iter_mut().filter(|d| **d > min) {
            *d = (*d + amount).max(0.0);
        }
    }

    // ---- springs ----

    /// Add a spring; out-of-bounds positions are ignored
    pub fn add_spring(&mut self, x: i32, y: i32, flow_rate: f32) {
        if self.index(x, y).is_none() {
            return;
        }
        self.springs.push(Spring {
            x: x as usize,
            y: y as usize,
            flow_rate,
        });
    }

    /// Add a spring at the configured default rate
    pub fn add_default_spring(&mut self, x: i32, y: i32) {
        self.add_spring(x, y, self.params.spring_flow_rate);
    }

    /// Remove every spring within Euclidean `radius` of (x, y)
    pub fn remove_spring(&mut self, x: i32, y: i32, radius: f32) {
        self.springs.retain(|s| {
            let dx = s.x as f32 - x as f32;
            let dy = s.y as f32 - y as f32;
            (dx * dx + dy * dy).sqrt() > radius
        });
    }

    /// First spring within Manhattan distance `radius`
    pub fn get_spring_at(&self, x: i32, y: i32, radius: i32) -> Option<&Spring> {
        self.springs
            .iter()
            .find(|s| (s.x as i64).abs_diff(x as i64) + (s.y as i64).abs_diff(y as i64) <= radius.max(0) as u64)
    }

    // ---- colour queries ----

    pub fn get_terrain_color(&self, x: i32, y: i32) -> Rgb {
        self.index(x, y)
            .map(|i| palette::terrain_color(self.terrain[i]))
            .unwrap_or(Rgb::BLACK)
    }

    /// Water colour, or None when the cell is dry
    pub fn get_water_color(&self, x: i32, y: i32) -> Option<Rgb> {
        let i = self.index(x, y)?;
        let depth = self.water[i];
        if depth < self.params.min_depth {
            return None;
        }
        Some(palette::water_color(depth))
    }

    /// Terrain with water alpha-blended over it, plus shoreline and flow foam
    pub fn get_combined_color(&self, x: i32, y: i32) -> Rgb {
        let Some(i) = self.index(x, y) else {
            return Rgb::BLACK;
        };
        let terrain = palette::terrain_color(self.terrain[i]);
        let depth = self.water[i];
        let min = self.params.min_depth;
        if depth < min {
            return terrain;
        }

        let mut foam = 0.0;
        let shoreline = NEIGHBORS_4
            .iter()
            .filter_map(|&(dx, dy)| self.index(x + dx, y + dy))
            .any(|n| self.water[n] < min);
        if shoreline {
            foam += 0.4;
        }
        let (vx, vy) = (self.velocity_x[i], self.velocity_y[i]);
        let speed = (vx * vx + vy * vy).sqrt();
        foam += (speed * 0.3).min(0.3);
        let foam = foam.min(0.7);

        let water = palette::foam_blend(palette::water_color(depth), foam);
        let alpha = (0.5 + depth / 10.0).min(1.0);
        palette::alpha_blend(terrain, water, alpha)
    }
}
