//! Voxel-space terrain renderer
//!
//! Comanche-style height-map ray marching: every screen column walks a ray
//! across the grid, projects the sampled surface height to a screen row and
//! fills the span between it and the lowest row painted so far. No 3D
//! geometry is built.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::Canvas;
use crate::palette::{self, FOG_COLOR, Rgb};
use crate::settings::ViewPreset;
use crate::sim::DriftSim;

/// Orbit radius around the grid centre, in cells
pub const CAM_RADIUS: f32 = 38.0;

/// Rays never project closer than this (avoids division blow-up)
const MIN_PROJECTION_DIST: f32 = 0.5;

/// Shimmer amplitude in colour units
const SHIMMER_AMPLITUDE: f32 = 12.0;

/// Ray marching and fog parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoxelParams {
    /// Horizontal field of view (radians)
    pub fov: f32,
    /// Furthest sample distance, in cells
    pub draw_dist: f32,
    pub max_steps: u32,
    /// Projection scale (screen rows per height unit at distance 1, times H)
    pub scale_h: f32,
    /// Step size at the camera; grows linearly toward `step_far`
    pub step_near: f32,
    pub step_far: f32,
    pub fog_start: f32,
    pub fog_end: f32,
}

impl Default for VoxelParams {
    fn default() -> Self {
        Self {
            fov: std::f32::consts::FRAC_PI_3,
            draw_dist: 130.0,
            max_steps: 200,
            scale_h: 220.0,
            step_near: 0.4,
            step_far: 1.4,
            fog_start: 40.0,
            fog_end: 110.0,
        }
    }
}

/// Per-frame camera state in grid coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub pos: Vec2,
    /// Heading (radians)
    pub angle: f32,
    /// Eye height in terrain units
    pub height: f32,
    /// Screen row of the horizon
    pub horizon: i32,
}

impl Camera {
    /// Camera circling the grid centre at `orbit_angle`, looking inward
    pub fn orbit(orbit_angle: f32, grid_w: usize, grid_h: usize, view: ViewPreset) -> Self {
        let center = Vec2::new(grid_w as f32 * 0.5, grid_h as f32 * 0.5);
        let pos = center + Vec2::from_angle(orbit_angle) * CAM_RADIUS;
        let to_center = center - pos;
        Self {
            pos,
            angle: to_center.y.atan2(to_center.x),
            height: view.camera_height(),
            horizon: view.horizon(),
        }
    }
}

/// Terrain height and water depth at a fractional grid position
#[derive(Debug, Clone, Copy, PartialEq)]
struct Sample {
    terrain: f32,
    water: f32,
}

/// Bilinear sample of both grids; None outside the grid
fn sample_bilinear(sim: &DriftSim, p: Vec2) -> Option<Sample> {
    let (w, h) = (sim.width() as i32, sim.height() as i32);
    let (fx0, fy0) = (p.x.floor(), p.y.floor());
    let (ix, iy) = (fx0 as i32, fy0 as i32);
    if ix < 0 || iy < 0 || ix >= w || iy >= h {
        return None;
    }
    let fx = p.x - fx0;
    let fy = p.y - fy0;
    let ix1 = if ix < w - 1 { ix + 1 } else { ix };
    let iy1 = if iy < h - 1 { iy + 1 } else { iy };

    let i00 = (iy * w + ix) as usize;
    let i10 = (iy * w + ix1) as usize;
    let i01 = (iy1 * w + ix) as usize;
    let i11 = (iy1 * w + ix1) as usize;
    let w00 = (1.0 - fx) * (1.0 - fy);
    let w10 = fx * (1.0 - fy);
    let w01 = (1.0 - fx) * fy;
    let w11 = fx * fy;

    let blend = |g: &[f32]| g[i00] * w00 + g[i10] * w10 + g[i01] * w01 + g[i11] * w11;
    Some(Sample {
        terrain: blend(sim.terrain()),
        water: blend(sim.water()),
    })
}

/// Vertical sky gradient for a horizon row: night sky above, fog haze below
pub fn sky_gradient(horizon: i32, rows: usize) -> Vec<Rgb> {
    let horizon = horizon.max(0);
    (0..rows as i32)
        .map(|i| {
            if i <= horizon {
                let t = i as f32 / horizon.max(1) as f32;
                Rgb(
                    (2.0 + 6.0 * t) as u8,
                    (2.0 + 10.0 * t) as u8,
                    (8.0 + 22.0 * t) as u8,
                )
            } else {
                let t = (i - horizon) as f32 / (rows as i32 - horizon - 1).max(1) as f32;
                Rgb(
                    (8.0 + (FOG_COLOR.0 as f32 - 8.0) * t) as u8,
                    (12.0 + (FOG_COLOR.1 as f32 - 12.0) * t) as u8,
                    (30.0 + (FOG_COLOR.2 as f32 - 30.0) * t) as u8,
                )
            }
        })
        .collect()
}

/// Voxel-space renderer with per-column ray tables built once
#[derive(Debug, Clone)]
pub struct VoxelRenderer {
    width: usize,
    height: usize,
    params: VoxelParams,
    /// Ray angle offset from the camera heading, per column
    col_angles: Vec<f32>,
    /// Fisheye correction, per column
    col_cos: Vec<f32>,
}

impl VoxelRenderer {
    pub fn new(width: usize, height: usize, params: VoxelParams) -> Self {
        let col_angles: Vec<f32> = (0..width)
            .map(|c| (c as f32 / width as f32 - 0.5) * params.fov)
            .collect();
        let col_cos = col_angles.iter().map(|a| a.cos()).collect();
        Self {
            width,
            height,
            params,
            col_angles,
            col_cos,
        }
    }

    pub fn params(&self) -> &VoxelParams {
        &self.params
    }

    /// Render the simulation as seen from `camera`; `time` drives water shimmer
    pub fn render(&self, sim: &DriftSim, camera: &Camera, time: f32, canvas: &mut dyn Canvas) {
        let rows = self.height as i32;
        let p = &self.params;

        // Sky backdrop; terrain overwrites it below
        for (row, &color) in sky_gradient(camera.horizon, self.height).iter().enumerate() {
            for c in 0..self.width {
                canvas.set_pixel(c as i32, row as i32, color);
            }
        }

        let proj_k = p.scale_h / self.height as f32;
        let step_growth = (p.step_far - p.step_near) / p.max_steps.max(1) as f32;
        let min_depth = sim.params.min_depth;

        for c in 0..self.width {
            let dir = Vec2::from_angle(camera.angle + self.col_angles[c]);
            let cos_corr = self.col_cos[c];
            // Lowest row not yet painted; spans fill upward from the bottom
            let mut max_y = rows;

            let mut dist = 1.0;
            let mut step = p.step_near;
            let mut steps = 0;

            while dist < p.draw_dist && steps < p.max_steps {
                let g = camera.pos + dir * dist;

                if let Some(s) = sample_bilinear(sim, g) {
                    let (surface, color) = if s.water > min_depth {
                        let shimmer = (g.x * 3.0 + time * 2.5).sin() * (g.y * 2.5 + time * 2.0).sin();
                        let color = palette::water_lut_color(s.water)
                            .offset((shimmer * SHIMMER_AMPLITUDE) as i32);
                        (s.terrain + s.water, color)
                    } else {
                        (s.terrain, palette::terrain_lut_color(s.terrain))
                    };

                    let corr_dist = (dist * cos_corr).max(MIN_PROJECTION_DIST);
                    let screen_y = camera.horizon as f32 + (camera.height - surface) / corr_dist * proj_k;
                    let draw_y = (screen_y as i32).max(0);

                    if draw_y < max_y {
                        let color = palette::fog(color, dist, p.fog_start, p.fog_end);
                        for y in draw_y..max_y {
                            canvas.set_pixel(c as i32, y, color);
                        }
                        max_y = draw_y;
                    }

                    if max_y <= 0 {
                        break;
                    }
                }

                dist += step;
                step += step_growth;
                steps += 1;
            }
        }
    }
}
