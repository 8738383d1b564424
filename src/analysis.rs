//! Analysis data model and report export

use crate::config::Config;
use crate::notation::{Clef, DurationType};
use crate::raster::ScoreState;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One physical staff line: the centroid of a group of qualifying scan rows
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StaffLine {
    /// Centroid row (rounded mean of the group)
    pub y: usize,
    /// Mean black-pixel ratio of the group, 0..1
    pub weight: f32,
}

/// A detected note head with its resolved pitch and rhythm.
///
/// Created by the note-head detector; the validator fills in `valid` and
/// `validation_score`, after which the record is read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectedNote {
    /// Pixel position of the accepted candidate
    pub x: usize,
    pub y: usize,
    /// Pitch letter with optional sharp, e.g. "B" or "F#"
    pub note: String,
    pub octave: u8,
    pub duration_ms: f64,
    pub duration_type: DurationType,
    /// Blob circularity score, 0..1
    pub confidence: f32,
    /// Fixed frequency of note+octave from the piano table
    pub frequency: f64,
    pub valid: bool,
    /// Passed checks / 3
    pub validation_score: f32,
}

impl DetectedNote {
    /// Full note name, e.g. "B4"
    pub fn full_name(&self) -> String {
        format!("{}{}", self.note, self.octave)
    }
}

/// Outcome of the three validation checks for one note in one pass
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NoteChecks {
    pub frequency_ok: bool,
    pub duration_ok: bool,
    pub range_ok: bool,
}

impl NoteChecks {
    pub fn passed(&self) -> usize {
        [self.frequency_ok, self.duration_ok, self.range_ok]
            .iter()
            .filter(|&&c| c)
            .count()
    }

    pub fn all_passed(&self) -> bool {
        self.frequency_ok && self.duration_ok && self.range_ok
    }
}

/// Metadata for one analysis run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    pub clef: Clef,
    pub time_signature: String,
    pub tempo_bpm: f64,
    pub key_signature: String,
    pub staff_lines: Vec<StaffLine>,
    /// Mean note-head circularity over the detected notes
    pub confidence: f32,
}

impl AnalysisMetadata {
    pub fn with_defaults(config: &Config) -> Self {
        Self {
            clef: Clef::parse(&config.clef.default_clef).unwrap_or(Clef::Treble),
            time_signature: config.clef.default_time_signature.clone(),
            tempo_bpm: config.midi.bpm,
            key_signature: "C major".to_string(),
            staff_lines: Vec::new(),
            confidence: 0.0,
        }
    }
}

/// Aggregate statistics over validated notes, recomputed wholesale after
/// each validation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MidiStats {
    pub note_count: usize,
    pub total_duration_ms: f64,
    pub min_note: Option<DetectedNote>,
    pub max_note: Option<DetectedNote>,
    pub min_frequency_hz: Option<f64>,
    pub max_frequency_hz: Option<f64>,
    pub unique_notes: BTreeSet<String>,
    pub average_velocity: u8,
}

impl Default for MidiStats {
    fn default() -> Self {
        Self {
            note_count: 0,
            total_duration_ms: 0.0,
            min_note: None,
            max_note: None,
            min_frequency_hz: None,
            max_frequency_hz: None,
            unique_notes: BTreeSet::new(),
            average_velocity: 0,
        }
    }
}

/// Result of one analysis run, handed back to the caller
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub notes: Vec<DetectedNote>,
    pub metadata: AnalysisMetadata,
    pub stats: MidiStats,
}

/// Export analysis results to JSON
pub fn export_analysis(state: &ScoreState, output_dir: &std::path::Path) -> crate::ScoreResult<()> {
    std::fs::create_dir_all(output_dir)?;
    let analysis_path = output_dir.join(&state.config.export.analysis_filename);

    let report = build_analysis_report(state);
    let json = serde_json::to_string_pretty(&report)?;
    std::fs::write(&analysis_path, json)?;

    println!("Exported analysis results to {}", analysis_path.display());
    Ok(())
}

/// Build the full analysis report structure
fn build_analysis_report(state: &ScoreState) -> AnalysisReport {
    AnalysisReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
            .to_string(),
        image_info: ImageInfo {
            width: state.raster.width,
            height: state.raster.height,
            ink_ratio: state.bitmap.as_ref().map(|b| b.ink_ratio()).unwrap_or(0.0),
        },
        metadata: state.metadata.clone(),
        notes: state.detected_notes.clone(),
        validation: build_validation_summary(state),
        stats: state.stats.clone(),
    }
}

fn build_validation_summary(state: &ScoreState) -> ValidationSummary {
    let mut frequency_failures = 0;
    let mut duration_failures = 0;
    let mut range_failures = 0;

    // All passes are identical; the first pass is representative.
    for outcomes in &state.validation_results {
        if let Some(checks) = outcomes.first() {
            if !checks.frequency_ok {
                frequency_failures += 1;
            }
            if !checks.duration_ok {
                duration_failures += 1;
            }
            if !checks.range_ok {
                range_failures += 1;
            }
        }
    }

    ValidationSummary {
        passes: state.config.validation.passes,
        total_notes: state.detected_notes.len(),
        valid_notes: state.valid_notes().len(),
        frequency_failures,
        duration_failures,
        range_failures,
    }
}

/// Top-level JSON report structure
#[derive(Debug, Serialize)]
struct AnalysisReport {
    version: String,
    timestamp: String,
    image_info: ImageInfo,
    metadata: AnalysisMetadata,
    notes: Vec<DetectedNote>,
    validation: ValidationSummary,
    stats: MidiStats,
}

#[derive(Debug, Serialize)]
struct ImageInfo {
    width: usize,
    height: usize,
    ink_ratio: f64,
}

#[derive(Debug, Serialize)]
struct ValidationSummary {
    passes: usize,
    total_notes: usize,
    valid_notes: usize,
    frequency_failures: usize,
    duration_failures: usize,
    range_failures: usize,
}
