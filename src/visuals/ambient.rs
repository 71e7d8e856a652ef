//! Ambient top-down Drift: springs on peaks, terrain regenerated on a timer

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::{Visual, place_springs, terrain_seed};
use crate::consts::GRID_SIZE;
use crate::renderer::{Canvas, draw_springs, draw_topdown};
use crate::settings::Settings;
use crate::sim::{DriftSim, TerrainPreset};

/// Preset rotation, one per cycle
const PRESETS: [TerrainPreset; 4] = [
    TerrainPreset::Default,
    TerrainPreset::Hills,
    TerrainPreset::Mountains,
    TerrainPreset::Plains,
];

/// Brightness ramp at the start of a cycle (seconds)
const FADE_IN_TIME: f32 = 1.0;

/// Peaks considered for springs
const PEAK_SITES: usize = 4;

/// Auto-playing simulation that regenerates itself every cycle
#[derive(Debug, Clone)]
pub struct AmbientVisual {
    sim: DriftSim,
    rng: Pcg32,
    cycle_time: f32,
    fade_time: f32,
    /// Index of the next preset to generate
    preset_idx: usize,
    current: TerrainPreset,
    time: f32,
    cycle_timer: f32,
    fade_alpha: f32,
    fading_out: bool,
    cycles: u32,
}

impl AmbientVisual {
    pub fn new(settings: &Settings, seed: u64) -> Self {
        let mut visual = Self {
            sim: DriftSim::with_params(GRID_SIZE, GRID_SIZE, settings.flow),
            rng: Pcg32::seed_from_u64(seed),
            cycle_time: settings.cycle_time,
            fade_time: settings.fade_time.min(settings.cycle_time),
            preset_idx: 0,
            current: PRESETS[0],
            time: 0.0,
            cycle_timer: 0.0,
            fade_alpha: 1.0,
            fading_out: false,
            cycles: 0,
        };
        visual.reset();
        visual
    }

    pub fn sim(&self) -> &DriftSim {
        &self.sim
    }

    /// Preset of the terrain on screen
    pub fn preset(&self) -> TerrainPreset {
        self.current
    }

    /// Completed regeneration cycles since reset
    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    /// Brightness applied to the frame: fade-in, then fade-out near the cycle end
    pub fn alpha(&self) -> f32 {
        if self.cycle_timer < FADE_IN_TIME {
            self.cycle_timer / FADE_IN_TIME
        } else {
            self.fade_alpha
        }
    }

    fn new_terrain(&mut self) {
        self.current = PRESETS[self.preset_idx % PRESETS.len()];
        self.preset_idx += 1;

        let seed = terrain_seed(&mut self.rng);
        self.sim.generate_terrain(self.current, seed);
        let peaks = self.sim.find_peaks(PEAK_SITES);
        place_springs(&mut self.sim, &mut self.rng, &peaks, 0.7, 1.3);
        log::info!(
            "Ambient drift: {} terrain, {} springs",
            self.current.as_str(),
            self.sim.springs().len()
        );
    }
}

impl Visual for AmbientVisual {
    fn name(&self) -> &'static str {
        "DRIFT"
    }

    fn description(&self) -> &'static str {
        "Flowing water"
    }

    fn reset(&mut self) {
        self.time = 0.0;
        self.preset_idx = 0;
        self.cycles = 0;
        self.new_terrain();
        self.cycle_timer = 0.0;
        self.fade_alpha = 1.0;
        self.fading_out = false;
    }

    fn update(&mut self, dt: f32) {
        self.time += dt;
        self.cycle_timer += dt;
        self.sim.simulate(dt);

        let fade_start = self.cycle_time - self.fade_time;
        if !self.fading_out && self.cycle_timer >= fade_start {
            self.fading_out = true;
        }

        if self.fading_out {
            self.fade_alpha = if self.fade_time > 0.0 {
                (1.0 - (self.cycle_timer - fade_start) / self.fade_time).max(0.0)
            } else {
                0.0
            };
            if self.cycle_timer >= self.cycle_time {
                self.new_terrain();
                self.cycles += 1;
                self.cycle_timer = 0.0;
                self.fading_out = false;
                self.fade_alpha = 1.0;
            }
        }
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.clear();
        let alpha = self.alpha();
        draw_topdown(&self.sim, canvas, 0, alpha);

        let pulse = ((self.time * 5.0).sin() + 1.0) * 40.0 + 80.0;
        draw_springs(&self.sim, canvas, 0, (pulse * alpha.min(1.0)) as u8);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Rgb;
    use crate::renderer::Framebuffer;

    fn run(visual: &mut AmbientVisual, seconds: f32) {
        let steps = (seconds / crate::consts::FRAME_DT).round() as usize;
        for _ in 0..steps {
            visual.update(crate::consts::FRAME_DT);
        }
    }

    #[test]
    fn test_starts_with_default_preset_and_springs() {
        let visual = AmbientVisual::new(&Settings::default(), 3);
        assert_eq!(visual.preset(), TerrainPreset::Default);
        assert!(visual.sim().springs().len() <= 4);
        assert_eq!(visual.alpha(), 0.0);
    }

    #[test]
    fn test_regenerates_after_cycle() {
        let settings = Settings {
            cycle_time: 3.0,
            fade_time: 1.0,
            ..Settings::default()
        };
        let mut visual = AmbientVisual::new(&settings, 11);
        let before = visual.sim().terrain().to_vec();

        run(&mut visual, 1.5);
        assert_eq!(visual.alpha(), 1.0);
        assert_eq!(visual.cycles(), 0);

        // Inside the fade-out window
        run(&mut visual, 1.0);
        assert!(visual.alpha() < 1.0);

        run(&mut visual, 1.0);
        assert_eq!(visual.cycles(), 1);
        assert_eq!(visual.preset(), TerrainPreset::Hills);
        assert_ne!(visual.sim().terrain(), &before[..]);
    }

    #[test]
    fn test_same_seed_same_terrain() {
        let a = AmbientVisual::new(&Settings::default(), 77);
        let b = AmbientVisual::new(&Settings::default(), 77);
        assert_eq!(a.sim().terrain(), b.sim().terrain());
        assert_eq!(a.sim().springs(), b.sim().springs());
    }

    #[test]
    fn test_draw_fills_grid() {
        let mut visual = AmbientVisual::new(&Settings::default(), 5);
        run(&mut visual, 2.0);
        let mut fb = Framebuffer::new(GRID_SIZE, GRID_SIZE);
        visual.draw(&mut fb);
        assert!(fb.pixels().iter().any(|&c| c != Rgb::BLACK));
        for s in visual.sim().springs() {
            let c = fb.get_pixel(s.x, s.y).unwrap();
            assert_eq!(c.0, 0);
            assert_eq!(c.1, c.2);
        }
    }

    #[test]
    fn test_ignores_input() {
        let mut visual = AmbientVisual::new(&Settings::default(), 5);
        let input = super::super::InputState {
            action_l: true,
            ..Default::default()
        };
        assert!(!visual.handle_input(&input));
    }
}
