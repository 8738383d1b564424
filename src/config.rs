//! Configuration system for the score-to-MIDI processor
//!
//! Every heuristic threshold of the analysis pipeline lives here as a named
//! field so the geometric heuristics stay tunable and testable in isolation.

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub version: String,
    pub image: ImageConfig,
    pub staff: StaffConfig,
    pub clef: ClefConfig,
    pub note_detection: NoteDetectionConfig,
    pub duration: DurationConfig,
    pub validation: ValidationConfig,
    pub analysis: AnalysisConfig,
    pub midi: MidiConfig,
    pub export: ExportConfig,
    pub qa: QaConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            image: ImageConfig::default(),
            staff: StaffConfig::default(),
            clef: ClefConfig::default(),
            note_detection: NoteDetectionConfig::default(),
            duration: DurationConfig::default(),
            validation: ValidationConfig::default(),
            analysis: AnalysisConfig::default(),
            midi: MidiConfig::default(),
            export: ExportConfig::default(),
            qa: QaConfig::default(),
        }
    }
}

/// Image intake and binarization configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Grayscale values below this become ink (0), at/above become background (255)
    pub luminance_threshold: u8,
    pub max_file_size_bytes: u64,
    pub allowed_extensions: Vec<String>,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            luminance_threshold: 150,
            max_file_size_bytes: 10 * 1024 * 1024,
            allowed_extensions: vec![
                "png".to_string(),
                "jpg".to_string(),
                "jpeg".to_string(),
            ],
        }
    }
}

/// Staff-line detection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StaffConfig {
    /// A row qualifies when its black-pixel count exceeds this fraction of width
    pub black_ratio_min: f32,
    /// ...and its longest consecutive run exceeds this fraction of width
    pub run_ratio_min: f32,
    /// Candidate rows within this gap collapse into one cluster
    pub group_gap_px: usize,
    /// Fewer clusters than this aborts the analysis
    pub min_staff_lines: usize,
}

impl Default for StaffConfig {
    fn default() -> Self {
        Self {
            black_ratio_min: 0.5,
            run_ratio_min: 0.3,
            group_gap_px: 10,
            min_staff_lines: 4,
        }
    }
}

/// Defaults used by the fixed clef/time-signature strategy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClefConfig {
    pub default_clef: String,
    pub default_time_signature: String,
}

impl Default for ClefConfig {
    fn default() -> Self {
        Self {
            default_clef: "treble".to_string(),
            default_time_signature: "4/4".to_string(),
        }
    }
}

/// Note-head detection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NoteDetectionConfig {
    /// Minimum circularity score for a candidate to count as a note head
    pub detection_threshold: f32,
    /// Radius of the disk sampled by the circularity score
    pub head_radius_px: usize,
    /// Scan margin; candidates closer to the border are skipped
    pub min_radius_px: usize,
    pub max_radius_px: usize,
    /// Coarse scan grid step in both axes
    pub scan_step_px: usize,
    /// Candidates within this distance (both axes) of an accepted note are duplicates
    pub duplicate_distance_px: usize,
}

impl Default for NoteDetectionConfig {
    fn default() -> Self {
        Self {
            detection_threshold: 0.5,
            head_radius_px: 8,
            min_radius_px: 4,
            max_radius_px: 15,
            scan_step_px: 3,
            duplicate_distance_px: 10,
        }
    }
}

/// Duration classification configuration (stem / fill / beam features)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DurationConfig {
    /// How far below a note head the stem scan reaches
    pub stem_scan_px: usize,
    /// Ink fraction of the stem scan required for stem presence
    pub stem_ink_ratio: f32,
    /// Half-size of the square neighborhood checked for fill
    pub fill_radius_px: usize,
    /// Ink fraction above which a head counts as filled
    pub fill_ink_ratio: f32,
    /// How far below a note head the beam scan reaches
    pub beam_scan_px: usize,
    /// Half-width of the horizontal band checked per beam-scan row
    pub beam_half_width_px: usize,
    /// Ink-bearing rows are divided by this to get the beam count
    pub beam_row_divisor: usize,
}

impl Default for DurationConfig {
    fn default() -> Self {
        Self {
            stem_scan_px: 40,
            stem_ink_ratio: 0.2,
            fill_radius_px: 6,
            fill_ink_ratio: 0.5,
            beam_scan_px: 30,
            beam_half_width_px: 2,
            beam_row_divisor: 10,
        }
    }
}

/// Note validation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Number of (identical, deterministic) validation passes
    pub passes: usize,
    pub min_frequency_hz: f64,
    pub max_frequency_hz: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            passes: 3,
            min_frequency_hz: crate::notation::MIN_PIANO_HZ,
            max_frequency_hz: crate::notation::MAX_PIANO_HZ,
        }
    }
}

/// Whole-pipeline analysis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Wall-clock budget for one analysis attempt
    pub timeout_sec: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self { timeout_sec: 30 }
    }
}

/// MIDI encoding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MidiConfig {
    pub bpm: f64,
    /// Ticks per quarter note
    pub tick_resolution: u16,
    pub velocity: u8,
    pub channel: u8,
    pub program: u8,
}

impl Default for MidiConfig {
    fn default() -> Self {
        Self {
            bpm: 120.0,
            tick_resolution: 480,
            velocity: 85,
            channel: 0,
            program: 0,
        }
    }
}

/// Output filenames
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub midi_filename: String,
    pub analysis_filename: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            midi_filename: "score.mid".to_string(),
            analysis_filename: "analysis.json".to_string(),
        }
    }
}

/// QA artifacts configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QaConfig {
    pub generate_images: bool,
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            generate_images: true,
        }
    }
}

/// Validate configuration parameters
pub fn validate_config(config: &Config) -> anyhow::Result<()> {
    if config.staff.black_ratio_min <= 0.0 || config.staff.black_ratio_min > 1.0 {
        anyhow::bail!("staff.black_ratio_min must be in (0, 1]");
    }
    if config.staff.run_ratio_min <= 0.0 || config.staff.run_ratio_min > 1.0 {
        anyhow::bail!("staff.run_ratio_min must be in (0, 1]");
    }
    if config.staff.min_staff_lines == 0 {
        anyhow::bail!("staff.min_staff_lines must be at least 1");
    }
    if config.note_detection.detection_threshold <= 0.0
        || config.note_detection.detection_threshold > 1.0
    {
        anyhow::bail!("note_detection.detection_threshold must be in (0, 1]");
    }
    if config.note_detection.scan_step_px == 0 {
        anyhow::bail!("note_detection.scan_step_px must be at least 1");
    }
    if config.note_detection.min_radius_px > config.note_detection.max_radius_px {
        anyhow::bail!("note_detection.min_radius_px must not exceed max_radius_px");
    }
    if config.duration.beam_row_divisor == 0 {
        anyhow::bail!("duration.beam_row_divisor must be at least 1");
    }
    if config.validation.passes == 0 {
        anyhow::bail!("validation.passes must be at least 1");
    }
    if config.validation.min_frequency_hz >= config.validation.max_frequency_hz {
        anyhow::bail!("validation frequency range min must be < max");
    }
    if config.midi.bpm <= 0.0 {
        anyhow::bail!("midi.bpm must be positive");
    }
    if config.midi.tick_resolution == 0 {
        anyhow::bail!("midi.tick_resolution must be at least 1");
    }
    if config.midi.velocity > 127 {
        anyhow::bail!("midi.velocity must be 0..=127");
    }
    if config.midi.channel > 15 {
        anyhow::bail!("midi.channel must be 0..=15");
    }
    if config.analysis.timeout_sec == 0 {
        anyhow::bail!("analysis.timeout_sec must be at least 1");
    }
    Ok(())
}

/// Load configuration from JSON file
pub fn load_config<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Config> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = serde_json::from_str(&content)?;
    validate_config(&config)?;
    Ok(config)
}

/// Save configuration to JSON file
pub fn save_config<P: AsRef<std::path::Path>>(config: &Config, path: P) -> anyhow::Result<()> {
    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}
