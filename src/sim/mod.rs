//! Deterministic terrain and water simulation
//!
//! All grid mutation lives here. This module must be pure and deterministic:
//! - Seeded terrain only
//! - Jacobi-style flow (visiting order never biases a step)
//! - No rendering or platform dependencies

pub mod brush;
pub mod flow;
pub mod noise;
pub mod preset;
pub mod state;
pub mod terrain;

pub use brush::BrushTool;
pub use flow::Transfer;
pub use noise::{fbm, noise2d};
pub use preset::{PresetParams, TerrainPreset};
pub use state::{DriftSim, FlowParams, Spring};
pub use terrain::PEAK_MIN_HEIGHT;
