//! Validation tests for Pass 0: Image Preprocessing

use score2midi::bitmap::{binarize, grayscale, BACKGROUND, INK};
use score2midi::config::Config;
use score2midi::passes::pass_0;
use score2midi::raster::{RasterImage, ScoreState};

/// Build a raster filled with one RGBA color
fn uniform_raster(width: usize, height: usize, rgba: [u8; 4]) -> RasterImage {
    let mut pixels = Vec::with_capacity(width * height * 4);
    for _ in 0..width * height {
        pixels.extend_from_slice(&rgba);
    }
    RasterImage::from_test_pixels(width, height, pixels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grayscale_weights() {
        // Weighted luminance, rounded to nearest integer
        assert_eq!(grayscale(0, 0, 0), 0);
        assert_eq!(grayscale(255, 255, 255), 255);
        // 100*0.299 + 150*0.587 + 200*0.114 = 140.75 -> 141
        assert_eq!(grayscale(100, 150, 200), 141);
        // Pure channels
        assert_eq!(grayscale(255, 0, 0), 76);
        assert_eq!(grayscale(0, 255, 0), 150);
        assert_eq!(grayscale(0, 0, 255), 29);
    }

    #[test]
    fn test_threshold_is_strict() {
        let config = Config::default();
        assert_eq!(config.image.luminance_threshold, 150);

        // Gray 149 is below the threshold: ink
        let raster = uniform_raster(4, 4, [149, 149, 149, 255]);
        let bitmap = binarize(&raster, config.image.luminance_threshold);
        assert_eq!(bitmap.get(0, 0), INK);

        // Gray 150 is at the threshold: background
        let raster = uniform_raster(4, 4, [150, 150, 150, 255]);
        let bitmap = binarize(&raster, config.image.luminance_threshold);
        assert_eq!(bitmap.get(0, 0), BACKGROUND);
    }

    #[test]
    fn test_alpha_is_ignored() {
        // Fully transparent black still binarizes as ink
        let raster = uniform_raster(4, 4, [0, 0, 0, 0]);
        let bitmap = binarize(&raster, 150);
        assert_eq!(bitmap.get(2, 2), INK);
    }

    #[test]
    fn test_mixed_raster_binarization() {
        let width = 8;
        let height = 2;
        let mut pixels = Vec::new();
        // Top row black, bottom row white
        for _ in 0..width {
            pixels.extend_from_slice(&[0, 0, 0, 255]);
        }
        for _ in 0..width {
            pixels.extend_from_slice(&[255, 255, 255, 255]);
        }
        let raster = RasterImage::from_test_pixels(width, height, pixels);

        let bitmap = binarize(&raster, 150);
        for x in 0..width {
            assert!(bitmap.is_ink(x, 0));
            assert!(!bitmap.is_ink(x, 1));
        }
        assert!((bitmap.ink_ratio() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_pass_0_populates_state() {
        let config = Config::default();
        let raster = uniform_raster(10, 6, [0, 0, 0, 255]);
        let mut state = ScoreState::new(raster, &config);

        pass_0::run(&mut state, &config).unwrap();

        let bitmap = state.bitmap.as_ref().unwrap();
        assert_eq!(bitmap.width(), 10);
        assert_eq!(bitmap.height(), 6);
        assert!((bitmap.ink_ratio() - 1.0).abs() < 1e-9);
    }
}
