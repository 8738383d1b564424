//! Score-to-MIDI Transcription System
//!
//! A deterministic, non-ML image analysis system that extracts a playable
//! MIDI rendition from a photographed or scanned single-staff music score.

pub mod analysis;
pub mod bitmap;
pub mod config;
pub mod error;
pub mod midi;
pub mod notation;
pub mod passes;
pub mod qa;
pub mod raster;

pub use analysis::AnalysisResult;
pub use config::Config;
pub use error::{Result as ScoreResult, ScoreError};
pub use raster::{RasterImage, ScoreState};

use std::path::Path;

/// Main processing pipeline for score-to-MIDI conversion
pub struct ScoreToMidi {
    config: Config,
}

impl ScoreToMidi {
    /// Create a new processor with the given configuration
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Process a score image and generate MIDI output
    pub fn process<P: AsRef<Path>>(&self, input_path: P, output_dir: P) -> ScoreResult<()> {
        // Load and decode the image
        let raster = RasterImage::load(input_path)?;
        let mut state = ScoreState::new(raster, &self.config);

        // Run all passes
        self.run_pipeline(&mut state)?;

        // Export results
        self.export_results(&state, output_dir)?;

        Ok(())
    }

    /// Run the analysis passes over an already-decoded raster and return
    /// the result without exporting anything
    pub fn analyze(&self, raster: RasterImage) -> ScoreResult<AnalysisResult> {
        let mut state = ScoreState::new(raster, &self.config);
        self.run_pipeline(&mut state)?;
        Ok(AnalysisResult {
            notes: state.detected_notes,
            metadata: state.metadata,
            stats: state.stats,
        })
    }

    /// Execute the complete multi-pass pipeline
    fn run_pipeline(&self, state: &mut ScoreState) -> ScoreResult<()> {
        // Pass 0: Image Preprocessing
        passes::pass_0::run(state, &self.config)?;

        // Pass 1: Staff-Line Detection
        passes::pass_1::run(state, &self.config)?;

        // Pass 2: Clef / Time-Signature Inference
        passes::pass_2::run(state, &self.config)?;

        // Pass 3: Note-Head Detection
        passes::pass_3::run(state, &self.config)?;

        // Pass 4: Note Validation
        passes::pass_4::run(state, &self.config)?;

        // Pass 5: Statistics Aggregation
        passes::pass_5::run(state, &self.config)?;

        Ok(())
    }

    /// Export MIDI, analysis, and QA results
    fn export_results<P: AsRef<Path>>(&self, state: &ScoreState, output_dir: P) -> ScoreResult<()> {
        midi::export_midi(state, output_dir.as_ref(), &self.config)?;
        analysis::export_analysis(state, output_dir.as_ref())?;
        if self.config.qa.generate_images {
            qa::generate_artifacts(state, output_dir.as_ref())?;
        }
        Ok(())
    }
}

/// Validate configuration and input files
pub fn validate_input<P: AsRef<Path>>(input_path: P, config: &Config) -> ScoreResult<()> {
    // Check input file exists and looks like a supported image
    raster::validate_image_file(input_path, config)?;

    // Validate configuration
    config::validate_config(config)?;

    Ok(())
}
