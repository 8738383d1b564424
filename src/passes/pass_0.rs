//! Pass 0: Image Preprocessing
//!
//! Converts the RGBA raster into a binary bitmap: per-pixel grayscale
//! conversion followed by a fixed luminance threshold. Total over any
//! well-formed raster; never fails.

use crate::bitmap::binarize;
use crate::config::Config;
use crate::error::Result as ScoreResult;
use crate::raster::ScoreState;

pub fn run(state: &mut ScoreState, config: &Config) -> ScoreResult<()> {
    println!("Pass 0: Image Preprocessing");

    let bitmap = binarize(&state.raster, config.image.luminance_threshold);
    println!(
        "  Binarized {}x{} raster ({:.1}% ink)",
        bitmap.width(),
        bitmap.height(),
        bitmap.ink_ratio() * 100.0
    );
    state.bitmap = Some(bitmap);

    println!("  ✓ Pass 0 complete");
    Ok(())
}
