//! Pass 3: Note-Head Detection
//!
//! Scans the bitmap on a coarse grid for circular ink blobs, resolves each
//! accepted blob to a pitch via the staff-line clusters and the active
//! clef, and classifies its rhythmic duration from stem/fill/beam features.
//! Candidates that fail pitch mapping are dropped silently; near-duplicates
//! of already-accepted notes are discarded (first found wins, scanning
//! top-to-bottom then left-to-right). The final list is sorted by x.

use crate::analysis::DetectedNote;
use crate::bitmap::Bitmap;
use crate::config::{Config, DurationConfig};
use crate::error::Result as ScoreResult;
use crate::notation::{self, DurationType};
use crate::raster::ScoreState;

/// Circularity score of a candidate point: the ink fraction of the disk of
/// the given radius around it, clipped to the bitmap bounds.
pub fn circularity_score(bitmap: &Bitmap, cx: usize, cy: usize, radius: usize) -> f32 {
    let r = radius as i64;
    let mut ink = 0usize;
    let mut total = 0usize;

    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy > r * r {
                continue;
            }
            let x = cx as i64 + dx;
            let y = cy as i64 + dy;
            if x < 0 || y < 0 || x >= bitmap.width() as i64 || y >= bitmap.height() as i64 {
                continue;
            }
            if bitmap.is_ink(x as usize, y as usize) {
                ink += 1;
            }
            total += 1;
        }
    }

    if total > 0 {
        ink as f32 / total as f32
    } else {
        0.0
    }
}

/// Stem presence: ink count in a straight downward scan exceeds the
/// configured fraction of the scan length.
pub fn has_stem(bitmap: &Bitmap, x: usize, y: usize, config: &DurationConfig) -> bool {
    let mut stem_pixels = 0usize;
    for dy in 1..config.stem_scan_px {
        if y + dy >= bitmap.height() {
            break;
        }
        if bitmap.is_ink(x, y + dy) {
            stem_pixels += 1;
        }
    }
    stem_pixels as f32 > config.stem_scan_px as f32 * config.stem_ink_ratio
}

/// Fill check: ink fraction of the square neighborhood exceeds the
/// configured ratio.
pub fn is_filled(bitmap: &Bitmap, x: usize, y: usize, config: &DurationConfig) -> bool {
    let r = config.fill_radius_px as i64;
    let mut ink = 0usize;
    let mut total = 0usize;

    for dy in -r..=r {
        for dx in -r..=r {
            let nx = x as i64 + dx;
            let ny = y as i64 + dy;
            if nx < 0 || ny < 0 || nx >= bitmap.width() as i64 || ny >= bitmap.height() as i64 {
                continue;
            }
            if bitmap.is_ink(nx as usize, ny as usize) {
                ink += 1;
            }
            total += 1;
        }
    }

    total > 0 && ink as f32 / total as f32 > config.fill_ink_ratio
}

/// Beam count: of the rows scanned below the head, those whose narrow
/// horizontal band contains any ink, divided by the configured divisor.
pub fn beam_count(bitmap: &Bitmap, x: usize, y: usize, config: &DurationConfig) -> usize {
    let mut ink_rows = 0usize;
    let half = config.beam_half_width_px as i64;

    for dy in 1..config.beam_scan_px {
        if y + dy >= bitmap.height() {
            break;
        }
        for dx in -half..=half {
            let nx = x as i64 + dx;
            if nx < 0 || nx >= bitmap.width() as i64 {
                continue;
            }
            if bitmap.is_ink(nx as usize, y + dy) {
                ink_rows += 1;
                break;
            }
        }
    }

    ink_rows / config.beam_row_divisor
}

/// Classify a note head's rhythmic duration from its visual features.
/// First matching rule wins.
pub fn classify_duration(
    bitmap: &Bitmap,
    x: usize,
    y: usize,
    config: &DurationConfig,
) -> (DurationType, f64) {
    let stem = has_stem(bitmap, x, y, config);
    let filled = is_filled(bitmap, x, y, config);
    let beams = beam_count(bitmap, x, y, config);

    let duration_type = if !stem {
        DurationType::Semibreve
    } else if !filled {
        DurationType::Minima
    } else if beams >= 2 {
        DurationType::Colcheia
    } else if beams == 1 {
        DurationType::Semicolcheia
    } else {
        DurationType::Seminima
    };

    (duration_type, duration_type.ms())
}

/// Whether a candidate sits within the duplicate distance (both axes) of
/// an already-accepted note
pub fn is_duplicate(x: usize, y: usize, notes: &[DetectedNote], distance: usize) -> bool {
    notes
        .iter()
        .any(|n| n.x.abs_diff(x) < distance && n.y.abs_diff(y) < distance)
}

pub fn run(state: &mut ScoreState, config: &Config) -> ScoreResult<()> {
    println!("Pass 3: Note-Head Detection");

    let bitmap = state.require_bitmap()?;
    let detection = &config.note_detection;
    let margin = detection.min_radius_px;
    let step = detection.scan_step_px.max(1);

    let mut notes: Vec<DetectedNote> = Vec::new();

    if bitmap.height() > 2 * margin && bitmap.width() > 2 * margin {
        let mut y = margin;
        while y < bitmap.height() - margin {
            state.check_deadline()?;
            let mut x = margin;
            while x < bitmap.width() - margin {
                if bitmap.is_ink(x, y) {
                    let score = circularity_score(bitmap, x, y, detection.head_radius_px);
                    if score > detection.detection_threshold {
                        if let Some(pitch) =
                            notation::map_position(y, &state.staff_lines, state.metadata.clef)
                        {
                            if !is_duplicate(x, y, &notes, detection.duplicate_distance_px) {
                                let (duration_type, duration_ms) =
                                    classify_duration(bitmap, x, y, &config.duration);
                                let frequency =
                                    notation::frequency(&pitch.full_name()).unwrap_or(0.0);

                                notes.push(DetectedNote {
                                    x,
                                    y,
                                    note: pitch.note,
                                    octave: pitch.octave,
                                    duration_ms,
                                    duration_type,
                                    confidence: score,
                                    frequency,
                                    valid: false,
                                    validation_score: 0.0,
                                });
                            }
                        }
                    }
                }
                x += step;
            }
            y += step;
        }
    }

    // Left-to-right reading order is temporal order
    notes.sort_by_key(|n| n.x);
    println!("  {} notes detected", notes.len());

    state.detected_notes = notes;

    println!("  ✓ Pass 3 complete");
    Ok(())
}
