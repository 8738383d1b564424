//! Binary bitmap representation and image binarization

use crate::raster::RasterImage;
use ndarray::Array2;

/// Pixel value for ink after thresholding
pub const INK: u8 = 0;
/// Pixel value for background after thresholding
pub const BACKGROUND: u8 = 255;

/// A width x height grid of thresholded luminance values, each either INK
/// or BACKGROUND. Indexed as `[y, x]`.
#[derive(Debug, Clone)]
pub struct Bitmap {
    data: Array2<u8>,
}

impl Bitmap {
    /// Create an all-background bitmap
    pub fn blank(width: usize, height: usize) -> Self {
        Self {
            data: Array2::from_elem((height, width), BACKGROUND),
        }
    }

    pub fn width(&self) -> usize {
        self.data.shape()[1]
    }

    pub fn height(&self) -> usize {
        self.data.shape()[0]
    }

    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[[y, x]]
    }

    pub fn is_ink(&self, x: usize, y: usize) -> bool {
        self.data[[y, x]] == INK
    }

    /// Mark a single pixel as ink
    pub fn set_ink(&mut self, x: usize, y: usize) {
        self.data[[y, x]] = INK;
    }

    /// Mark a full row as ink (synthetic staff line)
    pub fn fill_row(&mut self, y: usize) {
        for x in 0..self.width() {
            self.data[[y, x]] = INK;
        }
    }

    /// Mark an inclusive rectangle as ink (synthetic note head)
    pub fn fill_rect(&mut self, x0: usize, y0: usize, x1: usize, y1: usize) {
        for y in y0..=y1.min(self.height() - 1) {
            for x in x0..=x1.min(self.width() - 1) {
                self.data[[y, x]] = INK;
            }
        }
    }

    /// Mark a filled disk as ink
    pub fn fill_disk(&mut self, cx: usize, cy: usize, radius: usize) {
        let r = radius as i64;
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy > r * r {
                    continue;
                }
                let x = cx as i64 + dx;
                let y = cy as i64 + dy;
                if x < 0 || y < 0 || x >= self.width() as i64 || y >= self.height() as i64 {
                    continue;
                }
                self.data[[y as usize, x as usize]] = INK;
            }
        }
    }

    /// Fraction of all pixels that are ink
    pub fn ink_ratio(&self) -> f64 {
        let total = self.data.len();
        if total == 0 {
            return 0.0;
        }
        let ink = self.data.iter().filter(|&&v| v == INK).count();
        ink as f64 / total as f64
    }
}

/// Luminance of an RGB pixel, rounded to the nearest integer
pub fn grayscale(r: u8, g: u8, b: u8) -> u8 {
    (r as f64 * 0.299 + g as f64 * 0.587 + b as f64 * 0.114).round() as u8
}

/// Convert an RGBA raster to a binary bitmap.
///
/// Grayscale values below the threshold become ink, values at or above it
/// become background.
pub fn binarize(raster: &RasterImage, threshold: u8) -> Bitmap {
    let mut bitmap = Bitmap::blank(raster.width, raster.height);
    for y in 0..raster.height {
        for x in 0..raster.width {
            let i = (y * raster.width + x) * 4;
            let gray = grayscale(raster.pixels[i], raster.pixels[i + 1], raster.pixels[i + 2]);
            if gray < threshold {
                bitmap.set_ink(x, y);
            }
        }
    }
    bitmap
}
