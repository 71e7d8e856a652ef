//! Top-down colour map of the simulation

use super::Canvas;
use crate::palette::Rgb;
use crate::sim::DriftSim;

/// Draw the combined terrain/water map, one grid cell per pixel.
///
/// Rows above `top_row` are left untouched (HUD area). `alpha` scales
/// brightness for fades.
pub fn draw_topdown(sim: &DriftSim, canvas: &mut dyn Canvas, top_row: usize, alpha: f32) {
    let h = sim.height().min(canvas.height());
    let w = sim.width().min(canvas.width());
    for y in top_row..h {
        for x in 0..w {
            let c = sim.get_combined_color(x as i32, y as i32).scaled(alpha);
            canvas.set_pixel(x as i32, y as i32, c);
        }
    }
}

/// Mark springs as cyan dots of brightness `pulse`
pub fn draw_springs(sim: &DriftSim, canvas: &mut dyn Canvas, top_row: usize, pulse: u8) {
    for s in sim.springs() {
        if s.y >= top_row {
            canvas.set_pixel(s.x as i32, s.y as i32, Rgb(0, pulse, pulse));
        }
    }
}
