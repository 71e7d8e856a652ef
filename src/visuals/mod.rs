//! Drift visuals for the 64x64 display
//!
//! Each visual owns a simulation and a seeded RNG. The host feeds input,
//! advances time and hands over a canvas to draw on.

pub mod ambient;
pub mod flyover;
pub mod sandbox;

use rand::Rng;
use rand_pcg::Pcg32;

use crate::renderer::Canvas;
use crate::sim::DriftSim;

pub use ambient::AmbientVisual;
pub use flyover::FlyoverVisual;
pub use sandbox::SandboxVisual;

/// Controller state for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    // Directions held
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    // Directions pressed this frame
    pub up_pressed: bool,
    pub down_pressed: bool,
    pub left_pressed: bool,
    pub right_pressed: bool,
    // Buttons pressed this frame
    pub action_l: bool,
    pub action_r: bool,
    // Buttons held
    pub action_l_held: bool,
    pub action_r_held: bool,
}

impl InputState {
    /// Horizontal direction: -1, 0 or 1
    pub fn dx(&self) -> i32 {
        self.right as i32 - self.left as i32
    }

    /// Vertical direction: -1, 0 or 1 (down is positive)
    pub fn dy(&self) -> i32 {
        self.down as i32 - self.up as i32
    }

    pub fn any_direction(&self) -> bool {
        self.up || self.down || self.left || self.right
    }

    pub fn any_direction_pressed(&self) -> bool {
        self.up_pressed || self.down_pressed || self.left_pressed || self.right_pressed
    }

    /// Drop the one-frame edges, keeping held state
    pub fn clear_edges(&mut self) {
        self.up_pressed = false;
        self.down_pressed = false;
        self.left_pressed = false;
        self.right_pressed = false;
        self.action_l = false;
        self.action_r = false;
    }
}

/// A self-running display program
pub trait Visual {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str {
        ""
    }

    /// Back to the initial state
    fn reset(&mut self);

    /// Returns true if the input was consumed
    fn handle_input(&mut self, _input: &InputState) -> bool {
        false
    }

    /// Advance by `dt` seconds
    fn update(&mut self, dt: f32);

    fn draw(&self, canvas: &mut dyn Canvas);
}

/// Seed for a fresh terrain
pub(crate) fn terrain_seed(rng: &mut Pcg32) -> f64 {
    rng.random_range(0..1_000_000) as f64
}

/// Three or four springs, fewer if there are not enough sites
pub(crate) fn spring_count(rng: &mut Pcg32, sites: usize) -> usize {
    if sites == 0 {
        return 0;
    }
    rng.random_range(sites.min(3)..=sites.min(4))
}

/// Place springs at `sites` with `base_rate * U(lo, hi)` output each
pub(crate) fn place_springs(sim: &mut DriftSim, rng: &mut Pcg32, sites: &[(usize, usize)], lo: f32, hi: f32) {
    let count = spring_count(rng, sites.len());
    let base_rate = sim.params.spring_flow_rate;
    for &(x, y) in &sites[..count] {
        let rate = base_rate * rng.random_range(lo..hi);
        sim.add_spring(x as i32, y as i32, rate);
        log::debug!("Spring at ({}, {}) rate {:.2}", x, y, rate);
    }
}
