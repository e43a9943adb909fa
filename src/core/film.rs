//! The film collects the final color of every pixel and writes the
//! image to disk once rendering is finished.
//!
//! Worker threads render into their own **FilmTile** and hand it
//! over; the film only ever gets touched by one thread at a time.

// std
use std::path::Path;
// sqtrace
use crate::core::error::Result;
use crate::core::geometry::{Bounds2i, Point2i};
use crate::core::sqtrace::{clamp_t, Spectrum};

/// Pixels are stored row by row, the first row being the top of the
/// image.
pub struct Film {
    pub full_resolution: Point2i,
    pixels: Vec<[f32; 3]>,
}

impl Film {
    pub fn new(xres: u32, yres: u32) -> Self {
        Film {
            full_resolution: Point2i {
                x: xres as i32,
                y: yres as i32,
            },
            pixels: vec![[0.0_f32; 3]; (xres as usize) * (yres as usize)],
        }
    }
    pub fn get_bounds(&self) -> Bounds2i {
        Bounds2i::new(Point2i::default(), self.full_resolution)
    }
    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.full_resolution.x || y >= self.full_resolution.y {
            None
        } else {
            Some((y * self.full_resolution.x + x) as usize)
        }
    }
    /// Store a color, narrowing it to single precision. Pixels outside
    /// the image are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, rgb: &Spectrum) {
        if let Some(offset) = self.offset(x, y) {
            self.pixels[offset] = [rgb[0] as f32, rgb[1] as f32, rgb[2] as f32];
        }
    }
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<[f32; 3]> {
        self.offset(x, y).map(|offset| self.pixels[offset])
    }
    pub fn get_film_tile(&self, pixel_bounds: &Bounds2i) -> FilmTile {
        FilmTile::new(*pixel_bounds)
    }
    pub fn merge_film_tile(&mut self, tile: &FilmTile) {
        for (idx, pixel) in tile.pixel_bounds.into_iter().enumerate() {
            self.set_pixel(pixel.x, pixel.y, &tile.pixels[idx]);
        }
    }
    /// Quantize to 8 bit RGB (clamped to [0, 1], no gamma) and save;
    /// the format follows from the file extension.
    pub fn write_image(&self, path: &Path) -> Result<()> {
        let mut buffer: Vec<u8> = Vec::with_capacity(3 * self.pixels.len());
        for pixel in &self.pixels {
            for c in pixel {
                buffer.push((clamp_t(*c, 0.0_f32, 1.0_f32) * 255.0 + 0.5) as u8);
            }
        }
        image::save_buffer(
            path,
            &buffer,
            self.full_resolution.x as u32,
            self.full_resolution.y as u32,
            image::ColorType::Rgb8,
        )?;
        Ok(())
    }
}

/// A rectangular piece of the image rendered by a single worker.
pub struct FilmTile {
    pub pixel_bounds: Bounds2i,
    pixels: Vec<Spectrum>,
}

impl FilmTile {
    pub fn new(pixel_bounds: Bounds2i) -> Self {
        FilmTile {
            pixel_bounds,
            pixels: vec![Spectrum::default(); pixel_bounds.area().max(0) as usize],
        }
    }
    pub fn set_pixel(&mut self, pixel: &Point2i, l: Spectrum) {
        let width: i32 = self.pixel_bounds.p_max.x - self.pixel_bounds.p_min.x;
        let offset: i32 =
            (pixel.x - self.pixel_bounds.p_min.x) + (pixel.y - self.pixel_bounds.p_min.y) * width;
        if offset >= 0 && (offset as usize) < self.pixels.len() {
            self.pixels[offset as usize] = l;
        }
    }
}
