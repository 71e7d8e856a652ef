//! Drift terrain sandbox
//!
//! Sculpt terrain and place springs with a cursor, watching the water react.
//!
//! Controls:
//!   Joystick  - move cursor (auto-repeats while held)
//!   Action L  - cycle tool: raise / lower / smooth / spring / water
//!   Action R  - apply the tool while held

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::{InputState, Visual};
use crate::consts::GRID_SIZE;
use crate::palette::Rgb;
use crate::renderer::{Canvas, draw_springs, draw_topdown};
use crate::settings::Settings;
use crate::sim::{BrushTool, DriftSim, TerrainPreset};

/// First simulation row; rows above are HUD
pub const SIM_TOP: usize = 6;

/// Tools in cycling order, with their HUD colours
pub const TOOLS: [(BrushTool, Rgb); 5] = [
    (BrushTool::Raise, Rgb(200, 160, 80)),
    (BrushTool::Lower, Rgb(160, 80, 60)),
    (BrushTool::Smooth, Rgb(140, 180, 140)),
    (BrushTool::Spring, Rgb(60, 200, 255)),
    (BrushTool::Water, Rgb(40, 100, 220)),
];

/// Cursor auto-repeat interval (seconds)
const MOVE_REPEAT: f32 = 0.07;

const BRUSH_RADIUS: i32 = 3;
const BRUSH_STRENGTH: f32 = 2.0;

const DIVIDER_COLOR: Rgb = Rgb(40, 40, 40);

/// Springs placed on the first peaks at reset
const INITIAL_SPRINGS: usize = 2;

#[derive(Debug, Clone)]
pub struct SandboxVisual {
    sim: DriftSim,
    rng: Pcg32,
    cursor: (i32, i32),
    tool_idx: usize,
    blink_timer: f32,
    move_timer: f32,
    /// Latest input; edges are cleared once consumed by `update`
    input: InputState,
}

impl SandboxVisual {
    pub fn new(settings: &Settings, seed: u64) -> Self {
        let mut visual = Self {
            sim: DriftSim::with_params(GRID_SIZE, GRID_SIZE, settings.flow),
            rng: Pcg32::seed_from_u64(seed),
            cursor: (0, 0),
            tool_idx: 0,
            blink_timer: 0.0,
            move_timer: 0.0,
            input: InputState::default(),
        };
        visual.reset();
        visual
    }

    pub fn sim(&self) -> &DriftSim {
        &self.sim
    }

    pub fn cursor(&self) -> (i32, i32) {
        self.cursor
    }

    pub fn tool(&self) -> BrushTool {
        TOOLS[self.tool_idx].0
    }

    /// HUD label for the current tool, e.g. "RAISE"
    pub fn tool_label(&self) -> String {
        self.tool().as_str().to_uppercase()
    }

    pub fn tool_color(&self) -> Rgb {
        TOOLS[self.tool_idx].1
    }

    fn move_cursor(&mut self, dx: i32, dy: i32) {
        let w = self.sim.width() as i32;
        let h = self.sim.height() as i32;
        self.cursor.0 = (self.cursor.0 + dx).clamp(0, w - 1);
        self.cursor.1 = (self.cursor.1 + dy).clamp(SIM_TOP as i32, h - 1);
    }
}

impl Visual for SandboxVisual {
    fn name(&self) -> &'static str {
        "DRIFT"
    }

    fn description(&self) -> &'static str {
        "Terrain sandbox"
    }

    fn reset(&mut self) {
        let seed = self.rng.random_range(0.0..1000.0);
        self.sim.generate_terrain(TerrainPreset::Default, seed);
        for (x, y) in self.sim.find_peaks(3).into_iter().take(INITIAL_SPRINGS) {
            self.sim.add_default_spring(x as i32, y as i32);
        }

        self.cursor = (self.sim.width() as i32 / 2, self.sim.height() as i32 / 2);
        self.tool_idx = 0;
        self.blink_timer = 0.0;
        self.move_timer = 0.0;
        self.input = InputState::default();
        log::info!("Sandbox reset with {} springs", self.sim.springs().len());
    }

    fn handle_input(&mut self, input: &InputState) -> bool {
        if input.action_l {
            self.tool_idx = (self.tool_idx + 1) % TOOLS.len();
            log::debug!("Sandbox tool: {}", self.tool().as_str());
        }
        self.input = *input;
        true
    }

    fn update(&mut self, dt: f32) {
        self.blink_timer += dt;

        // Cursor: step on press, then repeat while held
        self.move_timer += dt;
        let input = self.input;
        if input.any_direction() && (input.any_direction_pressed() || self.move_timer >= MOVE_REPEAT) {
            self.move_timer = 0.0;
            self.move_cursor(input.dx(), input.dy());
        }

        if input.action_r_held {
            let (x, y) = self.cursor;
            self.sim.apply_brush(x, y, self.tool(), BRUSH_RADIUS, BRUSH_STRENGTH);
        }

        self.sim.simulate(dt);
        self.input.clear_edges();
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.clear();
        let w = canvas.width().min(self.sim.width()) as i32;

        // HUD: tool swatch (the host draws the label) and divider
        let swatch = self.tool_color();
        for y in 1..4 {
            for x in 1..5 {
                canvas.set_pixel(x, y, swatch);
            }
        }
        for x in 0..w {
            canvas.set_pixel(x, SIM_TOP as i32 - 1, DIVIDER_COLOR);
        }

        draw_topdown(&self.sim, canvas, SIM_TOP, 1.0);

        let pulse = ((self.blink_timer * 6.0).sin() + 1.0) * 60.0 + 100.0;
        draw_springs(&self.sim, canvas, SIM_TOP, pulse as u8);

        // Blinking crosshair
        let color = if (self.blink_timer * 5.0) as i32 % 2 == 0 {
            Rgb::WHITE
        } else {
            self.tool_color()
        };
        let (cx, cy) = self.cursor;
        canvas.set_pixel(cx, cy, color);
        for (dx, dy) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
            let (nx, ny) = (cx + dx, cy + dy);
            if ny >= SIM_TOP as i32 {
                canvas.set_pixel(nx, ny, color);
            }
        }
    }
}
