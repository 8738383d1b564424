//! Pass 5: Statistics Aggregation
//!
//! Folds the validated note list into the aggregate statistics block and
//! fills in the run-level confidence from the per-note circularity scores.
//! Only valid notes contribute to the statistics; a run with no valid
//! notes yields the zeroed block rather than an error, since export is a
//! separate concern.

use crate::analysis::{DetectedNote, MidiStats};
use crate::config::Config;
use crate::error::Result as ScoreResult;
use crate::raster::ScoreState;

/// Compute aggregate statistics over the valid subset of the note list.
pub fn compute_stats(notes: &[DetectedNote]) -> MidiStats {
    let valid: Vec<&DetectedNote> = notes.iter().filter(|n| n.valid).collect();
    if valid.is_empty() {
        return MidiStats::default();
    }

    let mut stats = MidiStats {
        note_count: valid.len(),
        total_duration_ms: valid.iter().map(|n| n.duration_ms).sum(),
        ..MidiStats::default()
    };

    let mut min_note: &DetectedNote = valid[0];
    let mut max_note: &DetectedNote = valid[0];
    for note in &valid {
        if note.frequency < min_note.frequency {
            min_note = note;
        }
        if note.frequency > max_note.frequency {
            max_note = note;
        }
        stats.unique_notes.insert(note.full_name());
    }

    stats.min_frequency_hz = Some(min_note.frequency);
    stats.max_frequency_hz = Some(max_note.frequency);
    stats.min_note = Some(min_note.clone());
    stats.max_note = Some(max_note.clone());

    let velocity_sum: f64 = valid.iter().map(|n| n.confidence as f64 * 127.0).sum();
    stats.average_velocity = (velocity_sum / valid.len() as f64).round() as u8;

    stats
}

/// Mean circularity over all detected notes, valid or not.
pub fn mean_confidence(notes: &[DetectedNote]) -> f32 {
    if notes.is_empty() {
        return 0.0;
    }
    notes.iter().map(|n| n.confidence).sum::<f32>() / notes.len() as f32
}

pub fn run(state: &mut ScoreState, _config: &Config) -> ScoreResult<()> {
    println!("Pass 5: Statistics Aggregation");
    state.check_deadline()?;

    state.stats = compute_stats(&state.detected_notes);
    state.metadata.confidence = mean_confidence(&state.detected_notes);

    println!(
        "  {} valid notes, {:.0} ms total",
        state.stats.note_count, state.stats.total_duration_ms
    );

    println!("  ✓ Pass 5 complete");
    Ok(())
}
