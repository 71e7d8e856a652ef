//! Classic 2D Perlin noise and fractal Brownian motion
//!
//! Uses a fixed permutation table so terrain is reproducible bit-for-bit from
//! a seed. Evaluated in `f64`: seeds are added to grid coordinates and can be
//! large enough to lose precision in `f32`.

/// Ken Perlin's reference permutation
const PERM_BASE: [u8; 256] = [
    151, 160, 137, 91, 90, 15, 131, 13, 201, 95, 96, 53, 194, 233, 7, 225, 140, 36, 103, 30, 69,
    142, 8, 99, 37, 240, 21, 10, 23, 190, 6, 148, 247, 120, 234, 75, 0, 26, 197, 62, 94, 252, 219,
    203, 117, 35, 11, 32, 57, 177, 33, 88, 237, 149, 56, 87, 174, 20, 125, 136, 171, 168, 68, 175,
    74, 165, 71, 134, 139, 48, 27, 166, 77, 146, 158, 231, 83, 111, 229, 122, 60, 211, 133, 230,
    220, 105, 92, 41, 55, 46, 245, 40, 244, 102, 143, 54, 65, 25, 63, 161, 1, 216, 80, 73, 209, 76,
    132, 187, 208, 89, 18, 169, 200, 196, 135, 130, 116, 188, 159, 86, 164, 100, 109, 198, 173,
    186, 3, 64, 52, 217, 226, 250, 124, 123, 5, 202, 38, 147, 118, 126, 255, 82, 85, 212, 207, 206,
    59, 227, 47, 16, 58, 17, 182, 189, 28, 42, 223, 183, 170, 213, 119, 248, 152, 2, 44, 154, 163,
    70, 221, 153, 101, 155, 167, 43, 172, 9, 129, 22, 39, 253, 19, 98, 108, 110, 79, 113, 224, 232,
    178, 185, 112, 104, 218, 246, 97, 228, 251, 34, 242, 193, 238, 210, 144, 12, 191, 179, 162,
    241, 81, 51, 145, 235, 249, 14, 239, 107, 49, 192, 214, 31, 181, 199, 106, 157, 184, 84, 204,
    176, 115, 121, 50, 45, 127, 4, 150, 254, 138, 236, 205, 93, 222, 114, 67, 29, 24, 72, 243, 141,
    128, 195, 78, 66, 215, 61, 156, 180,
];

/// Permutation doubled to 512 entries so `P[X + 1] + Y + 1` never wraps
const PERM: [usize; 512] = {
    let mut table = [0usize; 512];
    let mut i = 0;
    while i < 512 {
        table[i] = PERM_BASE[i & 255] as usize;
        i += 1;
    }
    table
};

/// Quintic fade curve t^3 (t (6t - 15) + 10)
#[inline]
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

/// Pick one of four diagonal gradients from the low two bits of the hash
#[inline]
fn grad(hash: usize, x: f64, y: f64) -> f64 {
    let h = hash & 3;
    let (u, v) = if h < 2 { (x, y) } else { (y, x) };
    let u = if h & 1 == 0 { u } else { -u };
    let v = if h & 2 == 0 { v } else { -v };
    u + v
}

/// 2D Perlin noise, roughly in [-1, 1]
pub fn noise2d(x: f64, y: f64) -> f64 {
    let xf = x.floor();
    let yf = y.floor();
    let xi = (xf as i64 & 255) as usize;
    let yi = (yf as i64 & 255) as usize;
    let x = x - xf;
    let y = y - yf;
    let u = fade(x);
    let v = fade(y);

    let a = PERM[xi] + yi;
    let b = PERM[xi + 1] + yi;

    lerp(
        v,
        lerp(u, grad(PERM[a], x, y), grad(PERM[b], x - 1.0, y)),
        lerp(u, grad(PERM[a + 1], x, y - 1.0), grad(PERM[b + 1], x - 1.0, y - 1.0)),
    )
}

/// Fractal Brownian motion, normalised by the total amplitude
pub fn fbm(x: f64, y: f64, octaves: u32, persistence: f64) -> f64 {
    let mut total = 0.0;
    let mut frequency = 1.0;
    let mut amplitude = 1.0;
    let mut max_value = 0.0;

    for _ in 0..octaves {
        total += noise2d(x * frequency, y * frequency) * amplitude;
        max_value += amplitude;
        amplitude *= persistence;
        frequency *= 2.0;
    }

    if max_value > 0.0 { total / max_value } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noise_zero_on_lattice() {
        // Every gradient term vanishes at integer coordinates
        for i in 0..16 {
            let v = noise2d(i as f64, (i * 3) as f64);
            assert!(v.abs() < 1e-12, "lattice value {v}");
        }
    }

    #[test]
    fn test_noise_bounded() {
        for i in 0..2000 {
            let x = i as f64 * 0.137 - 40.0;
            let y = i as f64 * 0.291 + 7.5;
            let v = noise2d(x, y);
            assert!((-1.0..=1.0).contains(&v), "noise out of range: {v}");
        }
    }

    #[test]
    fn test_noise_wraps_every_256() {
        let a = noise2d(3.3, 4.7);
        let b = noise2d(3.3 + 256.0, 4.7 + 256.0);
        assert!((a - b).abs() < 1e-9);
    }

    #[test]
    fn test_fbm_normalised() {
        for i in 0..500 {
            let x = i as f64 * 0.173;
            let v = fbm(x, x * 0.5 + 11.0, 5, 0.5);
            assert!((-1.0..=1.0).contains(&v));
        }
        assert_eq!(fbm(1.5, 2.5, 0, 0.5), 0.0);
    }

    #[test]
    fn test_single_octave_matches_noise() {
        let (x, y) = (12.34, 56.78);
        assert_eq!(fbm(x, y, 1, 0.5), noise2d(x, y));
    }
}
