//! Pressure-driven water flow
//!
//! Cellular approximation: each wet cell pushes water toward lower-surface
//! neighbours. Reads come from `water`, writes go to `water_next`, so the
//! order cells are visited in does not bias a step.

use super::state::DriftSim;

/// 8 neighbours with distance weights (orthogonal 1, diagonal ~sqrt 2)
const FLOW_NEIGHBORS: [(i32, i32, f32); 8] = [
    (-1, 0, 1.0),
    (1, 0, 1.0),
    (0, -1, 1.0),
    (0, 1, 1.0),
    (-1, -1, 1.414),
    (1, -1, 1.414),
    (-1, 1, 1.414),
    (1, 1, 1.414),
];

/// Largest fraction of a cell's depth one neighbour may receive per step
const MAX_SHARE: f32 = 0.25;

/// Transfers smaller than this are dropped
const MIN_TRANSFER: f32 = 0.0001;

/// Neighbour terrain may rise at most this fraction of the local depth
const WALL_FACTOR: f32 = 0.5;

/// Velocity smoothing when flow occurs / decay when it doesn't
const VELOCITY_KEEP: f32 = 0.8;
const VELOCITY_DECAY: f32 = 0.95;

/// One unit of water moved between two cells during a step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transfer {
    /// Flat index of the source cell
    pub from: usize,
    /// Flat index of the destination cell
    pub to: usize,
    pub amount: f32,
}

impl DriftSim {
    /// Advance the water field by `dt` seconds
    pub fn simulate(&mut self, dt: f32) {
        self.simulate_observed(dt, |_| {});
    }

    /// Advance the water field, reporting every transfer to `observer`.
    ///
    /// Transfers are reported in visiting order, after spring injection and
    /// before evaporation.
    pub fn simulate_observed<F>(&mut self, dt: f32, mut observer: F)
    where
        F: FnMut(Transfer),
    {
        self.inject_springs(dt);
        self.water_next.copy_from_slice(&self.water);
        self.flow(&mut observer);
        self.evaporate(dt);
    }

    fn inject_springs(&mut self, dt: f32) {
        for s in &self.springs {
            if s.x < self.width && s.y < self.height {
                self.water[s.y * self.width + s.x] += s.flow_rate * dt;
            }
        }
    }

    fn flow<F>(&mut self, observer: &mut F)
    where
        F: FnMut(Transfer),
    {
        let (w, h) = (self.width as i32, self.height as i32);
        let params = self.params;
        let mut outflows: [(usize, i32, i32, f32); 8] = [(0, 0, 0, 0.0); 8];

        for y in 0..h {
            for x in 0..w {
                let idx = (y * w + x) as usize;
                let depth = self.water[idx];
                if depth < params.min_depth {
                    continue;
                }

                let t_here = self.terrain[idx];
                let surface = t_here + depth;
                let max_flow = depth * MAX_SHARE;

                let mut count = 0;
                let mut total = 0.0;
                for &(dx, dy, weight) in &FLOW_NEIGHBORS {
                    let (nx, ny) = (x + dx, y + dy);
                    if nx < 0 || ny < 0 || nx >= w || ny >= h {
                        continue;
                    }
                    let ni = (ny * w + nx) as usize;
                    let t_neighbor = self.terrain[ni];
                    let pressure_diff = surface - (t_neighbor + self.water[ni]);
                    if pressure_diff <= 0.0 {
                        continue;
                    }
                    // Wall: don't climb a lip the water hasn't filled yet
                    if t_neighbor - t_here > depth * WALL_FACTOR {
                        continue;
                    }
                    let amount = (pressure_diff * params.flow_rate / weight).min(max_flow);
                    if amount > MIN_TRANSFER {
                        outflows[count] = (ni, dx, dy, amount);
                        count += 1;
                        total += amount;
                    }
                }

                // Never give away more than the cell holds
                let scale = if total > depth { depth / total } else { 1.0 };

                let (mut vx, mut vy) = (0.0, 0.0);
                for &(ni, dx, dy, amount) in &outflows[..count] {
                    let amount = amount * scale;
                    self.water_next[idx] -= amount;
                    self.water_next[ni] += amount;
                    vx += dx as f32 * amount;
                    vy += dy as f32 * amount;
                    observer(Transfer {
                        from: idx,
                        to: ni,
                        amount,
                    });
                }

                if count > 0 {
                    self.velocity_x[idx] = self.velocity_x[idx] * VELOCITY_KEEP + vx * (1.0 - VELOCITY_KEEP);
                    self.velocity_y[idx] = self.velocity_y[idx] * VELOCITY_KEEP + vy * (1.0 - VELOCITY_KEEP);
                } else {
                    self.velocity_x[idx] *= VELOCITY_DECAY;
                    self.velocity_y[idx] *= VELOCITY_DECAY;
                }
            }
        }
    }

    fn evaporate(&mut self, dt: f32) {
        let loss = self.params.evaporation_rate * dt;
        for (d, &next) in self.water.iter_mut().zip(&self.water_next) {
            *d = (next - loss).max(0.0);
        }
    }
}
