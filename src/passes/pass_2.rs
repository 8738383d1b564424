//! Pass 2: Clef / Time-Signature Inference
//!
//! The clef and time signature are assigned by a pluggable strategy. The
//! default strategy returns the configured constants (treble, 4/4)
//! regardless of image content; that is the current policy, not a
//! placeholder. A real detector can be substituted without touching the
//! pipeline contract.

use crate::analysis::StaffLine;
use crate::bitmap::Bitmap;
use crate::config::Config;
use crate::error::Result as ScoreResult;
use crate::notation::Clef;
use crate::raster::ScoreState;

/// Strategy interface for clef and time-signature inference
pub trait ClefDetector {
    fn detect(&self, bitmap: &Bitmap, staff_lines: &[StaffLine]) -> (Clef, String);
}

/// Default strategy: fixed clef and time signature from configuration
pub struct FixedClefDetector {
    clef: Clef,
    time_signature: String,
}

impl FixedClefDetector {
    pub fn from_config(config: &Config) -> Self {
        Self {
            clef: Clef::parse(&config.clef.default_clef).unwrap_or(Clef::Treble),
            time_signature: config.clef.default_time_signature.clone(),
        }
    }
}

impl ClefDetector for FixedClefDetector {
    fn detect(&self, _bitmap: &Bitmap, _staff_lines: &[StaffLine]) -> (Clef, String) {
        (self.clef, self.time_signature.clone())
    }
}

pub fn run(state: &mut ScoreState, config: &Config) -> ScoreResult<()> {
    println!("Pass 2: Clef / Time-Signature Inference");
    state.check_deadline()?;

    let bitmap = state.require_bitmap()?;

    let detector = FixedClefDetector::from_config(config);
    let (clef, time_signature) = detector.detect(bitmap, &state.staff_lines);
    println!("  clef: {}, time signature: {}", clef.name(), time_signature);

    state.metadata.clef = clef;
    state.metadata.time_signature = time_signature;

    println!("  ✓ Pass 2 complete");
    Ok(())
}
