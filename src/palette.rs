//! Colour ramps for terrain height and water depth
//!
//! Pure functions plus lookup tables built once on first use.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_HEIGHT, MIN_HEIGHT};
use crate::{lerp, normalized_height};

/// 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    /// Scale brightness (fades)
    pub fn scaled(self, alpha: f32) -> Rgb {
        if alpha >= 1.0 {
            return self;
        }
        let a = alpha.max(0.0);
        Rgb(
            (self.0 as f32 * a) as u8,
            (self.1 as f32 * a) as u8,
            (self.2 as f32 * a) as u8,
        )
    }

    /// Add a signed offset to every channel, saturating
    pub fn offset(self, delta: i32) -> Rgb {
        let ch = |c: u8| (c as i32 + delta).clamp(0, 255) as u8;
        Rgb(ch(self.0), ch(self.1), ch(self.2))
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Rgb(r, g, b)
    }
}

/// Water reference colours
pub const SHALLOW: Rgb = Rgb(77, 191, 204);
pub const MID: Rgb = Rgb(38, 115, 191);
pub const DEEP: Rgb = Rgb(13, 38, 102);
pub const FOAM: Rgb = Rgb(230, 242, 255);

/// Depth thresholds for the water ramp
pub const SHALLOW_DEPTH: f32 = 2.0;
pub const MID_DEPTH: f32 = 6.0;
pub const DEEP_DEPTH: f32 = 15.0;

/// Distant terrain fades toward this
pub const FOG_COLOR: Rgb = Rgb(4, 6, 15);

/// Entries in the terrain lookup table (indexed by normalised height)
pub const TERRAIN_LUT_SIZE: usize = 256;
/// Entries in the water lookup table (0.5 depth units per bucket)
pub const WATER_LUT_SIZE: usize = 64;

/// Interpolate two colours, clamping `t` to [0, 1] and truncating channels
pub fn color_lerp(a: Rgb, b: Rgb, t: f32) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    let ch = |x: u8, y: u8| lerp(x as f32, y as f32, t) as u8;
    Rgb(ch(a.0, b.0), ch(a.1, b.1), ch(a.2, b.2))
}

/// Height-based terrain colour: rock, grass, sand, forest, rock, snow
pub fn terrain_color(height: f32) -> Rgb {
    let t = normalized_height(height);

    if t < 0.10 {
        color_lerp(Rgb(31, 28, 26), Rgb(56, 54, 48), t / 0.10)
    } else if t < 0.15 {
        color_lerp(Rgb(56, 54, 48), Rgb(31, 56, 31), (t - 0.10) / 0.05)
    } else if t < 0.30 {
        color_lerp(Rgb(31, 56, 31), Rgb(38, 89, 64), (t - 0.15) / 0.15)
    } else if t < 0.35 {
        color_lerp(Rgb(209, 184, 115), Rgb(166, 140, 89), (t - 0.30) / 0.05)
    } else if t < 0.60 {
        color_lerp(Rgb(46, 140, 38), Rgb(64, 122, 46), (t - 0.35) / 0.25)
    } else if t < 0.75 {
        color_lerp(Rgb(26, 97, 26), Rgb(56, 82, 46), (t - 0.60) / 0.15)
    } else if t < 0.90 {
        color_lerp(Rgb(89, 87, 82), Rgb(133, 128, 122), (t - 0.75) / 0.15)
    } else {
        color_lerp(Rgb(217, 217, 230), Rgb(250, 250, 255), (t - 0.90) / 0.10)
    }
}

/// Depth-based water colour: shallow, mid and deep stops
pub fn water_color(depth: f32) -> Rgb {
    if depth < SHALLOW_DEPTH {
        SHALLOW
    } else if depth < MID_DEPTH {
        color_lerp(SHALLOW, MID, (depth - SHALLOW_DEPTH) / (MID_DEPTH - SHALLOW_DEPTH))
    } else if depth < DEEP_DEPTH {
        color_lerp(MID, DEEP, (depth - MID_DEPTH) / (DEEP_DEPTH - MID_DEPTH))
    } else {
        DEEP
    }
}

/// Blend toward the foam colour by `foam` in [0, 1]
pub fn foam_blend(water: Rgb, foam: f32) -> Rgb {
    color_lerp(water, FOAM, foam)
}

/// Composite `top` over `base` with opacity `alpha`
pub fn alpha_blend(base: Rgb, top: Rgb, alpha: f32) -> Rgb {
    let a = alpha.clamp(0.0, 1.0);
    let ch = |b: u8, t: u8| (b as f32 * (1.0 - a) + t as f32 * a).clamp(0.0, 255.0) as u8;
    Rgb(ch(base.0, top.0), ch(base.1, top.1), ch(base.2, top.2))
}

/// Linear distance fog between `start` and `end`
pub fn fog(color: Rgb, dist: f32, start: f32, end: f32) -> Rgb {
    if dist <= start {
        return color;
    }
    let t = (dist - start) / (end - start);
    if t >= 1.0 {
        return FOG_COLOR;
    }
    color_lerp(color, FOG_COLOR, t)
}

static TERRAIN_LUT: LazyLock<[Rgb; TERRAIN_LUT_SIZE]> = LazyLock::new(|| {
    std::array::from_fn(|i| {
        let h = MIN_HEIGHT + (MAX_HEIGHT - MIN_HEIGHT) * i as f32 / (TERRAIN_LUT_SIZE - 1) as f32;
        terrain_color(h)
    })
});

static WATER_LUT: LazyLock<[Rgb; WATER_LUT_SIZE]> =
    LazyLock::new(|| std::array::from_fn(|i| water_color(i as f32 * 0.5)));

/// Terrain colours for 256 evenly spaced heights over the terrain range
pub fn terrain_lut() -> &'static [Rgb; TERRAIN_LUT_SIZE] {
    &TERRAIN_LUT
}

/// Water colours for depths 0.0, 0.5, .. 31.5
pub fn water_lut() -> &'static [Rgb; WATER_LUT_SIZE] {
    &WATER_LUT
}

/// Terrain LUT entry for a height (clamped)
#[inline]
pub fn terrain_lut_color(height: f32) -> Rgb {
    let i = (normalized_height(height) * (TERRAIN_LUT_SIZE - 1) as f32) as i32;
    TERRAIN_LUT[i.clamp(0, TERRAIN_LUT_SIZE as i32 - 1) as usize]
}

/// Water LUT entry for a depth (clamped)
#[inline]
pub fn water_lut_color(depth: f32) -> Rgb {
    let i = ((depth * 2.0) as usize).min(WATER_LUT_SIZE - 1);
    WATER_LUT[i]
}
