//! Pass 4: Note Validation
//!
//! Runs a fixed battery of deterministic checks against every detected
//! note, repeated for the configured number of passes. The checks have no
//! random or image-dependent component, so every pass yields identical
//! outcomes; the repetition exists so the exported report can show the
//! battery was stable. A note is valid when all checks pass, and its
//! validation score is the fraction of checks passed.

use crate::analysis::{DetectedNote, NoteChecks};
use crate::config::{Config, ValidationConfig};
use crate::error::Result as ScoreResult;
use crate::notation::{self, Clef};
use crate::raster::ScoreState;

/// Number of checks in the battery
pub const CHECK_COUNT: usize = 3;

/// Run the validation battery against one note.
pub fn check_note(note: &DetectedNote, clef: Clef, config: &ValidationConfig) -> NoteChecks {
    NoteChecks {
        frequency_ok: note.frequency >= config.min_frequency_hz
            && note.frequency <= config.max_frequency_hz,
        duration_ok: notation::is_canonical_duration(note.duration_ms),
        range_ok: clef.contains(&note.full_name()),
    }
}

pub fn run(state: &mut ScoreState, config: &Config) -> ScoreResult<()> {
    println!("Pass 4: Note Validation");
    state.check_deadline()?;

    let clef = state.metadata.clef;
    let passes = config.validation.passes.max(1);
    let mut results: Vec<Vec<NoteChecks>> = vec![Vec::new(); state.detected_notes.len()];

    for pass in 0..passes {
        state.check_deadline()?;
        for (i, note) in state.detected_notes.iter().enumerate() {
            results[i].push(check_note(note, clef, &config.validation));
        }
        println!("  validation pass {}/{} done", pass + 1, passes);
    }

    let mut valid_count = 0usize;
    for (note, checks) in state.detected_notes.iter_mut().zip(&results) {
        // Deterministic battery: the last pass is representative
        if let Some(last) = checks.last() {
            note.valid = last.all_passed();
            note.validation_score = last.passed() as f32 / CHECK_COUNT as f32;
            if note.valid {
                valid_count += 1;
            }
        }
    }

    println!(
        "  {}/{} notes valid",
        valid_count,
        state.detected_notes.len()
    );

    state.validation_results = results;

    println!("  ✓ Pass 4 complete");
    Ok(())
}
