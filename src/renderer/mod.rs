//! Software rendering onto a pixel canvas
//!
//! The arcade host owns the real display; renderers only need `Canvas`.

pub mod topdown;
pub mod voxel;

use std::io::{self, Write};

use crate::palette::Rgb;

pub use topdown::{draw_springs, draw_topdown};
pub use voxel::{Camera, VoxelParams, VoxelRenderer};

/// Minimal framebuffer API provided by the host
pub trait Canvas {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    /// Out-of-range coordinates are ignored
    fn set_pixel(&mut self, x: i32, y: i32, color: Rgb);
    fn clear(&mut self);
}

/// In-memory RGB framebuffer, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct Framebuffer {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgb::BLACK; width * height],
        }
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// One row of pixels; None past the last row
    pub fn row(&self, y: usize) -> Option<&[Rgb]> {
        if y >= self.height {
            return None;
        }
        self.pixels.get(y * self.width..(y + 1) * self.width)
    }

    /// Write as binary PPM (P6)
    pub fn write_ppm<W: Write>(&self, mut out: W) -> io::Result<()> {
        write!(out, "P6\n{} {}\n255\n", self.width, self.height)?;
        let bytes: Vec<u8> = self.pixels.iter().flat_map(|c| [c.0, c.1, c.2]).collect();
        out.write_all(&bytes)?;
        out.flush()
    }
}

impl Canvas for Framebuffer {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Rgb) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        self.pixels[y as usize * self.width + x as usize] = color;
    }

    fn clear(&mut self) {
        self.pixels.fill(Rgb::BLACK);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_pixel_bounds() {
        let mut fb = Framebuffer::new(4, 3);
        fb.set_pixel(3, 2, Rgb::WHITE);
        fb.set_pixel(4, 0, Rgb::WHITE);
        fb.set_pixel(-1, 1, Rgb::WHITE);
        assert_eq!(fb.get_pixel(3, 2), Some(Rgb::WHITE));
        assert_eq!(fb.pixels().iter().filter(|&&c| c == Rgb::WHITE).count(), 1);
        fb.clear();
        assert_eq!(fb.get_pixel(3, 2), Some(Rgb::BLACK));
    }

    #[test]
    fn test_row_bounds() {
        let mut fb = Framebuffer::new(4, 3);
        fb.set_pixel(1, 2, Rgb::WHITE);
        assert_eq!(fb.row(2), Some(&[Rgb::BLACK, Rgb::WHITE, Rgb::BLACK, Rgb::BLACK][..]));
        assert_eq!(fb.row(3), None);
        assert_eq!(fb.row(usize::MAX), None);
    }

    #[test]
    fn test_ppm_header_and_size() {
        let mut fb = Framebuffer::new(2, 2);
        fb.set_pixel(1, 0, Rgb(1, 2, 3));
        let mut out = Vec::new();
        fb.write_ppm(&mut out).unwrap();
        let header = b"P6\n2 2\n255\n";
        assert_eq!(&out[..header.len()], header);
        assert_eq!(out.len(), header.len() + 12);
        assert_eq!(&out[header.len() + 3..header.len() + 6], &[1, 2, 3]);
    }
}
