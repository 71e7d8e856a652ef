//! 3D voxel flyover of the Drift terrain
//!
//! The camera orbits the island while springs on the slopes feed water into
//! the valleys. Buttons cycle terrain, left/right pick a time speed and
//! up/down pick a camera view.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::{InputState, Visual, place_springs, terrain_seed};
use crate::consts::GRID_SIZE;
use crate::renderer::{Camera, Canvas, VoxelRenderer};
use crate::settings::{Settings, SpeedPreset, ViewPreset};
use crate::sim::{DriftSim, TerrainPreset};

const PRESETS: [TerrainPreset; 4] = [
    TerrainPreset::Mountains,
    TerrainPreset::Default,
    TerrainPreset::Hills,
    TerrainPreset::Plains,
];

/// Camera orbit speed (rad/s), about 42 s per lap
pub const ORBIT_SPEED: f32 = 0.15;

/// Spring output range, as multiples of the default spring rate
const SPRING_MULT_LO: f32 = 2.5;
const SPRING_MULT_HI: f32 = 4.0;

/// Depth added back per wet cell per second
pub const EVAP_RESTORE: f32 = 0.00004;

/// How long an overlay label stays up (seconds)
pub const OVERLAY_TIME: f32 = 2.0;

const SLOPE_SITES: usize = 5;

#[derive(Debug, Clone)]
pub struct FlyoverVisual {
    sim: DriftSim,
    rng: Pcg32,
    renderer: VoxelRenderer,
    default_view: ViewPreset,
    default_speed: SpeedPreset,
    preset_idx: usize,
    view: ViewPreset,
    speed: SpeedPreset,
    cam_angle: f32,
    time: f32,
    overlay_text: &'static str,
    overlay_timer: f32,
}

impl FlyoverVisual {
    pub fn new(settings: &Settings, seed: u64) -> Self {
        let mut visual = Self {
            sim: DriftSim::with_params(GRID_SIZE, GRID_SIZE, settings.flow),
            rng: Pcg32::seed_from_u64(seed),
            renderer: VoxelRenderer::new(GRID_SIZE, GRID_SIZE, settings.voxel),
            default_view: settings.view,
            default_speed: settings.speed,
            preset_idx: 0,
            view: settings.view,
            speed: settings.speed,
            cam_angle: 0.0,
            time: 0.0,
            overlay_text: "",
            overlay_timer: 0.0,
        };
        visual.reset();
        visual
    }

    pub fn sim(&self) -> &DriftSim {
        &self.sim
    }

    pub fn preset(&self) -> TerrainPreset {
        PRESETS[self.preset_idx % PRESETS.len()]
    }

    pub fn view(&self) -> ViewPreset {
        self.view
    }

    pub fn speed(&self) -> SpeedPreset {
        self.speed
    }

    pub fn camera(&self) -> Camera {
        Camera::orbit(self.cam_angle, self.sim.width(), self.sim.height(), self.view)
    }

    /// Label to show and its remaining time, if one is active
    pub fn overlay(&self) -> Option<(&'static str, f32)> {
        (self.overlay_timer > 0.0).then_some((self.overlay_text, self.overlay_timer))
    }

    fn show(&mut self, text: &'static str) {
        self.overlay_text = text;
        self.overlay_timer = OVERLAY_TIME;
    }

    fn new_terrain(&mut self) {
        let preset = self.preset();
        let seed = terrain_seed(&mut self.rng);
        self.sim.generate_terrain(preset, seed);
        let slopes = self.sim.find_slopes(SLOPE_SITES);
        place_springs(&mut self.sim, &mut self.rng, &slopes, SPRING_MULT_LO, SPRING_MULT_HI);
        log::info!(
            "Flyover: {} terrain, {} springs",
            preset.as_str(),
            self.sim.springs().len()
        );
    }
}

impl Visual for FlyoverVisual {
    fn name(&self) -> &'static str {
        "DRIFT 3D"
    }

    fn description(&self) -> &'static str {
        "Terrain flyover"
    }

    fn reset(&mut self) {
        self.time = 0.0;
        self.preset_idx = 0;
        self.view = self.default_view;
        self.speed = self.default_speed;
        self.cam_angle = 0.0;
        self.new_terrain();
        self.overlay_text = "";
        self.overlay_timer = 0.0;
    }

    fn handle_input(&mut self, input: &InputState) -> bool {
        let mut consumed = false;

        if input.action_l || input.action_r {
            self.preset_idx = (self.preset_idx + 1) % PRESETS.len();
            self.new_terrain();
            self.show(self.preset().label());
            consumed = true;
        }

        if input.left_pressed {
            self.speed = self.speed.slower();
            self.show(self.speed.as_str());
            consumed = true;
        }
        if input.right_pressed {
            self.speed = self.speed.faster();
            self.show(self.speed.as_str());
            consumed = true;
        }

        if input.up_pressed {
            self.view = self.view.prev();
            self.show(self.view.as_str());
            consumed = true;
        }
        if input.down_pressed {
            self.view = self.view.next();
            self.show(self.view.as_str());
            consumed = true;
        }

        consumed
    }

    fn update(&mut self, dt: f32) {
        self.time += dt;
        self.overlay_timer = (self.overlay_timer - dt).max(0.0);

        self.cam_angle += ORBIT_SPEED * self.speed.orbit_mult() * dt;
        self.sim.simulate(dt * self.speed.sim_mult());
        self.sim.replenish(EVAP_RESTORE * dt);
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.clear();
        self.renderer.render(&self.sim, &self.camera(), self.time, canvas);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Framebuffer;

    fn press(f: impl FnOnce(&mut InputState)) -> InputState {
        let mut input = InputState::default();
        f(&mut input);
        input
    }

    #[test]
    fn test_starts_on_mountains() {
        let visual = FlyoverVisual::new(&Settings::default(), 1);
        assert_eq!(visual.preset(), TerrainPreset::Mountains);
        assert_eq!(visual.view(), ViewPreset::High);
        assert_eq!(visual.speed(), SpeedPreset::Normal);
        assert!(visual.overlay().is_none());
    }

    #[test]
    fn test_action_cycles_terrain() {
        let mut visual = FlyoverVisual::new(&Settings::default(), 1);
        assert!(visual.handle_input(&press(|i| i.action_r = true)));
        assert_eq!(visual.preset(), TerrainPreset::Default);
        assert_eq!(visual.overlay(), Some(("DEFAULT", OVERLAY_TIME)));
        for _ in 0..3 {
            visual.handle_input(&press(|i| i.action_l = true));
        }
        assert_eq!(visual.preset(), TerrainPreset::Mountains);
    }

    #[test]
    fn test_speed_and_view_controls() {
        let mut visual = FlyoverVisual::new(&Settings::default(), 1);
        visual.handle_input(&press(|i| i.right_pressed = true));
        visual.handle_input(&press(|i| i.right_pressed = true));
        visual.handle_input(&press(|i| i.right_pressed = true));
        assert_eq!(visual.speed(), SpeedPreset::Double);
        assert_eq!(visual.overlay().map(|o| o.0), Some("2X"));

        visual.handle_input(&press(|i| i.up_pressed = true));
        assert_eq!(visual.view(), ViewPreset::Low);
        visual.handle_input(&press(|i| i.down_pressed = true));
        assert_eq!(visual.view(), ViewPreset::High);

        assert!(!visual.handle_input(&InputState::default()));
    }

    #[test]
    fn test_overlay_expires() {
        let mut visual = FlyoverVisual::new(&Settings::default(), 1);
        visual.handle_input(&press(|i| i.left_pressed = true));
        visual.update(1.0);
        assert!(visual.overlay().is_some());
        visual.update(1.5);
        assert!(visual.overlay().is_none());
    }

    #[test]
    fn test_orbit_advances_with_speed() {
        let mut visual = FlyoverVisual::new(&Settings::default(), 1);
        let start = visual.camera();
        visual.update(1.0);
        let moved = visual.camera();
        assert_ne!(start.pos, moved.pos);
        assert_eq!(moved.height, ViewPreset::High.camera_height());
    }

    #[test]
    fn test_draw_paints_terrain_below_sky() {
        let mut visual = FlyoverVisual::new(&Settings::default(), 4);
        visual.update(0.5);
        let mut fb = Framebuffer::new(GRID_SIZE, GRID_SIZE);
        visual.draw(&mut fb);
        let sky = crate::renderer::voxel::sky_gradient(visual.camera().horizon, GRID_SIZE);
        let bottom = fb.row(GRID_SIZE - 1).unwrap();
        assert!(bottom.iter().any(|&c| c != sky[GRID_SIZE - 1]));
    }
}
