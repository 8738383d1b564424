//! Raster image intake and pipeline state

use crate::analysis::{AnalysisMetadata, DetectedNote, MidiStats, NoteChecks, StaffLine};
use crate::bitmap::Bitmap;
use crate::config::Config;
use crate::error::{Result as ScoreResult, ScoreError};
use image::GenericImageView;
use std::path::Path;
use std::time::{Duration, Instant};

/// A decoded RGBA raster, 4 bytes per pixel in row-major order
#[derive(Debug, Clone)]
pub struct RasterImage {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u8>,
}

impl RasterImage {
    /// Decode an image file into an RGBA raster
    pub fn load<P: AsRef<Path>>(path: P) -> ScoreResult<Self> {
        let img = image::open(path.as_ref())?;
        let (width, height) = img.dimensions();
        let rgba = img.to_rgba8();
        Ok(Self {
            width: width as usize,
            height: height as usize,
            pixels: rgba.into_raw(),
        })
    }

    /// Build a raster from raw RGBA bytes (synthetic test input)
    pub fn from_test_pixels(width: usize, height: usize, pixels: Vec<u8>) -> Self {
        assert_eq!(pixels.len(), width * height * 4);
        Self {
            width,
            height,
            pixels,
        }
    }
}

/// Validate that an input file looks like a supported score image
pub fn validate_image_file<P: AsRef<Path>>(path: P, config: &Config) -> ScoreResult<()> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(ScoreError::InputValidationError(format!(
            "input file not found: {}",
            path.display()
        )));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    if !config
        .image
        .allowed_extensions
        .iter()
        .any(|e| *e == extension)
    {
        return Err(ScoreError::InputValidationError(format!(
            "unsupported file type '.{}', expected one of {:?}",
            extension, config.image.allowed_extensions
        )));
    }

    let size = std::fs::metadata(path)?.len();
    if size > config.image.max_file_size_bytes {
        return Err(ScoreError::InputValidationError(format!(
            "file too large ({} bytes, max {})",
            size, config.image.max_file_size_bytes
        )));
    }

    Ok(())
}

/// Pipeline state threaded through the analysis passes.
///
/// Each pass fills in its own section; earlier sections are read-only for
/// later passes except the validator, which annotates the detected notes in
/// place.
#[derive(Debug, Clone)]
pub struct ScoreState {
    /// Source raster
    pub raster: RasterImage,
    /// Configuration snapshot for this run
    pub config: Config,
    /// Start of this analysis attempt, for the wall-clock budget
    pub started: Instant,

    // Pass 0: preprocessing
    /// Thresholded binary bitmap
    pub bitmap: Option<Bitmap>,

    // Pass 1: staff-line detection
    /// Staff-line clusters, monotonically increasing in y
    pub staff_lines: Vec<StaffLine>,

    // Pass 2: clef / time-signature inference
    /// Run metadata (clef, time signature, tempo, staff lines, confidence)
    pub metadata: AnalysisMetadata,

    // Pass 3: note-head detection
    /// Detected notes ordered by ascending x
    pub detected_notes: Vec<DetectedNote>,

    // Pass 4: validation
    /// Per-note, per-pass check outcomes, retained for audit
    pub validation_results: Vec<Vec<NoteChecks>>,

    // Pass 5: statistics
    /// Aggregate statistics over valid notes
    pub stats: MidiStats,
}

impl ScoreState {
    /// Create initial state from a decoded raster
    pub fn new(raster: RasterImage, config: &Config) -> Self {
        Self {
            raster,
            metadata: AnalysisMetadata::with_defaults(config),
            config: config.clone(),
            started: Instant::now(),
            bitmap: None,
            staff_lines: Vec::new(),
            detected_notes: Vec::new(),
            validation_results: Vec::new(),
            stats: MidiStats::default(),
        }
    }

    /// Create a state with a prebuilt bitmap (synthetic test input),
    /// skipping pass 0
    pub fn from_test_bitmap(bitmap: Bitmap, config: &Config) -> Self {
        let raster = RasterImage {
            width: bitmap.width(),
            height: bitmap.height(),
            pixels: Vec::new(),
        };
        let mut state = Self::new(raster, config);
        state.bitmap = Some(bitmap);
        state
    }

    /// Bitmap produced by pass 0; later passes fail cleanly when it is
    /// missing instead of panicking
    pub fn require_bitmap(&self) -> ScoreResult<&Bitmap> {
        self.bitmap
            .as_ref()
            .ok_or_else(|| ScoreError::InternalError("no bitmap, pass 0 has not run".to_string()))
    }

    /// Enforce the wall-clock budget; called between passes and inside the
    /// row scans
    pub fn check_deadline(&self) -> ScoreResult<()> {
        let budget = Duration::from_secs(self.config.analysis.timeout_sec);
        if self.started.elapsed() > budget {
            return Err(ScoreError::AnalysisTimeout {
                seconds: self.config.analysis.timeout_sec,
            });
        }
        Ok(())
    }

    /// Notes that survived validation, in x order
    pub fn valid_notes(&self) -> Vec<&DetectedNote> {
        self.detected_notes.iter().filter(|n| n.valid).collect()
    }
}
