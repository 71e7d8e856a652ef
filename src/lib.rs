//! Drift - terrain and water simulation for a 64x64 LED matrix
//!
//! Core modules:
//! - `sim`: Deterministic terrain generation and water flow (no rendering)
//! - `palette`: Height/depth colour ramps and lookup tables
//! - `renderer`: Top-down and voxel-space renderers onto a `Canvas`
//! - `visuals`: Ambient, flyover and sandbox state machines for the arcade host
//! - `settings`: Tunables loaded from JSON

pub mod palette;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod visuals;

pub use palette::Rgb;
pub use settings::{Settings, SpeedPreset, ViewPreset};
pub use sim::{BrushTool, DriftSim, FlowParams, Spring, TerrainPreset};

/// Simulation and display constants
pub mod consts {
    /// Display width/height in pixels (and default grid size)
    pub const GRID_SIZE: usize = 64;
    /// Arcade host frame rate
    pub const FPS: u32 = 30;
    /// Fixed host timestep
    pub const FRAME_DT: f32 = 1.0 / FPS as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Terrain height range
    pub const MAX_HEIGHT: f32 = 350.0;
    pub const MIN_HEIGHT: f32 = -100.0;

    /// Water flow defaults
    pub const FLOW_RATE: f32 = 0.15;
    /// Depth below which a cell counts as dry
    pub const MIN_DEPTH: f32 = 0.01;
    pub const EVAPORATION_RATE: f32 = 0.00005;
    /// Spring output, scaled down for a 64x64 grid
    pub const SPRING_FLOW_RATE: f32 = 3.0;
}

/// Linear interpolation
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Normalise a height into [0, 1] over the terrain range
#[inline]
pub fn normalized_height(height: f32) -> f32 {
    use consts::{MAX_HEIGHT, MIN_HEIGHT};
    (height - MIN_HEIGHT) / (MAX_HEIGHT - MIN_HEIGHT)
}
