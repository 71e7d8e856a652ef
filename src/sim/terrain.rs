//! Terrain generation and surveying (peaks and slopes for spring placement)

use super::noise::fbm;
use super::preset::TerrainPreset;
use super::state::DriftSim;
use crate::consts::{MAX_HEIGHT, MIN_HEIGHT};

/// Reference grid width the preset scales were tuned for
const REFERENCE_WIDTH: f64 = 256.0;

/// Peaks must rise above this to be used as spring sites
pub const PEAK_MIN_HEIGHT: f32 = 20.0;

/// 8-connected neighbourhood
pub(crate) const NEIGHBORS_8: [(i32, i32); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (1, -1),
    (-1, 1),
    (1, 1),
];

/// 4-connected neighbourhood
pub(crate) const NEIGHBORS_4: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

impl DriftSim {
    /// Generate an island height field from fBM noise and radial falloff.
    ///
    /// Deterministic for a given preset and seed. Clears water, velocity and
    /// springs.
    pub fn generate_terrain(&mut self, preset: TerrainPreset, seed: f64) {
        let p = preset.params();
        // Keep features the same relative size as on the reference grid
        let scale = p.scale * (REFERENCE_WIDTH / self.width.max(1) as f64);
        let (w, h) = (self.width, self.height);

        for y in 0..h {
            for x in 0..w {
                let nx = (x as f64 + seed) * scale;
                let ny = (y as f64 + seed) * scale;
                let mut val = fbm(nx, ny, p.octaves, p.persistence);
                // Second, finer variation layer
                val += 0.3 * fbm(nx * 2.0 + 100.0, ny * 2.0 + 100.0, 2, 0.5);

                let dx = (x as f64 / w as f64) * 2.0 - 1.0;
                let dy = (y as f64 / h as f64) * 2.0 - 1.0;
                let dist = (dx * dx + dy * dy).sqrt();
                let falloff = (1.0 - dist.powf(p.falloff_power)).max(0.0);

                let height = p.base_height + val * falloff * MAX_HEIGHT as f64 * p.height_mult;
                self.terrain[y * w + x] = (height as f32).clamp(MIN_HEIGHT, MAX_HEIGHT);
            }
        }

        self.clear_water();
        log::info!(
            "Generated {} terrain ({}x{}, seed {:.0})",
            preset.as_str(),
            w,
            h,
            seed
        );
    }

    /// String interface: unknown names fall back to the default preset
    pub fn generate_terrain_named(&mut self, preset: &str, seed: f64) {
        self.generate_terrain(TerrainPreset::from_name(preset), seed);
    }

    /// Minimum spacing between selected peaks or slopes
    pub fn spring_spacing(&self) -> usize {
        (self.width / 8).max(8)
    }

    /// Find up to `count` spaced local maxima, highest first.
    ///
    /// A peak is strictly higher than all 8 neighbours, lies outside the border
    /// margin and rises above [`PEAK_MIN_HEIGHT`].
    pub fn find_peaks(&self, count: usize) -> Vec<(usize, usize)> {
        let (w, h) = (self.width, self.height);
        let margin = (w / 16).max(2);
        let min_dist = self.spring_spacing() as f32;

        let mut candidates: Vec<(f32, usize, usize)> = Vec::new();
        for y in margin..h.saturating_sub(margin) {
            for x in margin..w.saturating_sub(margin) {
                let height = self.terrain[y * w + x];
                if height <= PEAK_MIN_HEIGHT {
                    continue;
                }
                let is_peak = NEIGHBORS_8.iter().all(|&(dx, dy)| {
                    let n = (y as i32 + dy) as usize * w + (x as i32 + dx) as usize;
                    self.terrain[n] < height
                });
                if is_peak {
                    candidates.push((height, x, y));
                }
            }
        }

        candidates.sort_by(|a, b| b.0.total_cmp(&a.0).then(b.1.cmp(&a.1)).then(b.2.cmp(&a.2)));

        select_spaced(candidates.into_iter().map(|(_, x, y)| (x, y)), count, |a, b| {
            let dx = a.0 as f32 - b.0 as f32;
            let dy = a.1 as f32 - b.1 as f32;
            (dx * dx + dy * dy).sqrt() >= min_dist
        })
    }

    /// Find up to `count` spaced spring sites on mid-height slopes, steepest
    /// first.
    ///
    /// Candidates lie in the 35-65% band of the terrain's own height range and
    /// their steepest 4-neighbour difference exceeds 4% of that range. Flat
    /// terrain yields nothing.
    pub fn find_slopes(&self, count: usize) -> Vec<(usize, usize)> {
        let (w, h) = (self.width, self.height);
        let margin = (w / 12).max(3);
        let min_dist = self.spring_spacing();

        let max_h = self.terrain.iter().copied().fold(f32::MIN, f32::max);
        let min_h = self.terrain.iter().copied().fold(f32::MAX, f32::min);
        let range = max_h - min_h;
        if range < 1.0 {
            return Vec::new();
        }
        let lo = min_h + range * 0.35;
        let hi = min_h + range * 0.65;

        let mut candidates: Vec<(f32, usize, usize)> = Vec::new();
        for y in margin..h.saturating_sub(margin) {
            for x in margin..w.saturating_sub(margin) {
                let height = self.terrain[y * w + x];
                if !(lo..=hi).contains(&height) {
                    continue;
                }
                let gradient = NEIGHBORS_4
                    .iter()
                    .map(|&(dx, dy)| {
                        let n = (y as i32 + dy) as usize * w + (x as i32 + dx) as usize;
                        (self.terrain[n] - height).abs()
                    })
                    .fold(0.0, f32::max);
                if gradient > range * 0.04 {
                    candidates.push((gradient, x, y));
                }
            }
        }

        candidates.sort_by(|a, b| b.0.total_cmp(&a.0).then(b.1.cmp(&a.1)).then(b.2.cmp(&a.2)));

        select_spaced(candidates.into_iter().map(|(_, x, y)| (x, y)), count, |a, b| {
            a.0.abs_diff(b.0) + a.1.abs_diff(b.1) >= min_dist
        })
    }
}

/// Greedily take candidates in order, skipping any too close to one already taken
fn select_spaced<I, F>(candidates: I, count: usize, far_enough: F) -> Vec<(usize, usize)>
where
    I: IntoIterator<Item = (usize, usize)>,
    F: Fn((usize, usize), (usize, usize)) -> bool,
{
    let mut picks: Vec<(usize, usize)> = Vec::with_capacity(count);
    if count == 0 {
        return picks;
    }
    for c in candidates {
        if picks.iter().all(|&p| far_enough(c, p)) {
            picks.push(c);
            if picks.len() >= count {
                break;
            }
        }
    }
    picks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_clears_water_and_springs() {
        let mut sim = DriftSim::new(32, 32);
        sim.set_water(3, 3, 4.0);
        sim.add_spring(5, 5, 1.0);
        sim.generate_terrain(TerrainPreset::Hills, 12.0);
        assert_eq!(sim.total_water(), 0.0);
        assert!(sim.springs().is_empty());
    }

    #[test]
    fn test_generate_deterministic() {
        let mut a = DriftSim::new(64, 64);
        let mut b = DriftSim::new(64, 64);
        a.generate_terrain(TerrainPreset::Mountains, 42.0);
        b.generate_terrain(TerrainPreset::Mountains, 42.0);
        assert_eq!(a.terrain(), b.terrain());

        b.generate_terrain(TerrainPreset::Mountains, 43.0);
        assert_ne!(a.terrain(), b.terrain());
    }

    #[test]
    fn test_island_edges_sit_at_base_height() {
        // Falloff reaches zero at the corners, leaving only the base offset
        let mut sim = DriftSim::new(64, 64);
        sim.generate_terrain(TerrainPreset::Hills, 5.0);
        assert_eq!(sim.terrain_at(0, 0), Some(20.0));
    }

    #[test]
    fn test_named_fallback() {
        let mut a = DriftSim::new(32, 32);
        let mut b = DriftSim::new(32, 32);
        a.generate_terrain_named("no-such-preset", 3.0);
        b.generate_terrain(TerrainPreset::Default, 3.0);
        assert_eq!(a.terrain(), b.terrain());
    }

    #[test]
    fn test_find_peaks_single_hill() {
        let mut sim = DriftSim::new(32, 32);
        sim.fill_terrain(0.0);
        for y in 0..32 {
            for x in 0..32 {
                let d = ((x as f32 - 16.0).powi(2) + (y as f32 - 12.0).powi(2)).sqrt();
                sim.set_terrain(x, y, 100.0 - d * 5.0);
            }
        }
        assert_eq!(sim.find_peaks(4), vec![(16, 12)]);
    }

    #[test]
    fn test_find_peaks_ignores_low_and_margin() {
        let mut sim = DriftSim::new(32, 32);
        sim.fill_terrain(0.0);
        sim.set_terrain(10, 10, 15.0); // below threshold
        sim.set_terrain(1, 20, 200.0); // inside border margin
        sim.set_terrain(20, 20, 50.0);
        assert_eq!(sim.find_peaks(4), vec![(20, 20)]);
    }

    #[test]
    fn test_find_peaks_spacing() {
        let mut sim = DriftSim::new(32, 32);
        sim.fill_terrain(0.0);
        sim.set_terrain(10, 10, 90.0);
        sim.set_terrain(13, 10, 80.0); // too close to the first
        sim.set_terrain(24, 24, 70.0);
        assert_eq!(sim.find_peaks(4), vec![(10, 10), (24, 24)]);
        assert_eq!(sim.find_peaks(1), vec![(10, 10)]);
        assert!(sim.find_peaks(0).is_empty());
    }

    #[test]
    fn test_find_slopes_flat_is_empty() {
        let mut sim = DriftSim::new(32, 32);
        sim.fill_terrain(50.0);
        assert!(sim.find_slopes(4).is_empty());
    }

    #[test]
    fn test_find_slopes_on_ramp() {
        let mut sim = DriftSim::new(32, 32);
        for y in 0..32 {
            for x in 0..32 {
                sim.set_terrain(x, y, ((x as f32 - 8.0) * 15.0).clamp(0.0, 200.0));
            }
        }
        let slopes = sim.find_slopes(3);
        assert!(!slopes.is_empty());
        for &(x, y) in &slopes {
            let h = sim.terrain_at(x as i32, y as i32).unwrap();
            assert!((70.0..=130.0).contains(&h), "slope at height {h}");
        }
        for (i, a) in slopes.iter().enumerate() {
            for b in &slopes[i + 1..] {
                assert!(a.0.abs_diff(b.0) + a.1.abs_diff(b.1) >= sim.spring_spacing());
            }
        }
    }
}
