//! Validation tests for Pass 5: Statistics Aggregation

use score2midi::analysis::DetectedNote;
use score2midi::bitmap::Bitmap;
use score2midi::config::Config;
use score2midi::notation::DurationType;
use score2midi::passes::pass_5::{self, compute_stats, mean_confidence};
use score2midi::raster::ScoreState;

fn valid_note(name: &str, octave: u8, frequency: f64, duration_ms: f64, confidence: f32) -> DetectedNote {
    DetectedNote {
        x: 50,
        y: 40,
        note: name.to_string(),
        octave,
        duration_ms,
        duration_type: DurationType::Seminima,
        confidence,
        frequency,
        valid: true,
        validation_score: 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_yields_zeroed_stats() {
        let stats = compute_stats(&[]);
        assert_eq!(stats.note_count, 0);
        assert_eq!(stats.total_duration_ms, 0.0);
        assert!(stats.min_note.is_none());
        assert!(stats.max_note.is_none());
        assert!(stats.min_frequency_hz.is_none());
        assert!(stats.max_frequency_hz.is_none());
        assert!(stats.unique_notes.is_empty());
        assert_eq!(stats.average_velocity, 0);
    }

    #[test]
    fn test_invalid_notes_are_excluded() {
        let mut rejected = valid_note("B", 4, 493.88, 500.0, 0.4);
        rejected.valid = false;
        let stats = compute_stats(&[rejected]);
        assert_eq!(stats.note_count, 0);
        assert!(stats.min_note.is_none());
    }

    #[test]
    fn test_aggregation_over_valid_notes() {
        let notes = vec![
            valid_note("B", 4, 493.88, 1000.0, 0.4),
            valid_note("D", 5, 587.33, 2000.0, 0.5),
            valid_note("B", 4, 493.88, 500.0, 0.3),
        ];

        let stats = compute_stats(&notes);
        assert_eq!(stats.note_count, 3);
        assert_eq!(stats.total_duration_ms, 3500.0);
        assert_eq!(stats.min_frequency_hz, Some(493.88));
        assert_eq!(stats.max_frequency_hz, Some(587.33));
        assert_eq!(stats.min_note.as_ref().unwrap().full_name(), "B4");
        assert_eq!(stats.max_note.as_ref().unwrap().full_name(), "D5");

        // Duplicate pitches collapse in the unique set
        assert_eq!(stats.unique_notes.len(), 2);
        assert!(stats.unique_notes.contains("B4"));
        assert!(stats.unique_notes.contains("D5"));

        // round(mean(confidence * 127)) = round(0.4 * 127) = 51
        assert_eq!(stats.average_velocity, 51);
    }

    #[test]
    fn test_single_note_is_both_extremes() {
        let notes = vec![valid_note("A", 4, 440.0, 500.0, 1.0)];
        let stats = compute_stats(&notes);
        assert_eq!(stats.min_note.as_ref().unwrap().full_name(), "A4");
        assert_eq!(stats.max_note.as_ref().unwrap().full_name(), "A4");
        assert_eq!(stats.average_velocity, 127);
    }

    #[test]
    fn test_mean_confidence_ignores_validity() {
        let mut rejected = valid_note("B", 4, 493.88, 500.0, 0.2);
        rejected.valid = false;
        let notes = vec![valid_note("D", 5, 587.33, 500.0, 0.6), rejected];

        assert!((mean_confidence(&notes) - 0.4).abs() < 1e-6);
        assert_eq!(mean_confidence(&[]), 0.0);
    }

    #[test]
    fn test_pass_5_fills_state() {
        let config = Config::default();
        let mut state = ScoreState::from_test_bitmap(Bitmap::blank(100, 100), &config);
        state.detected_notes = vec![
            valid_note("B", 4, 493.88, 1000.0, 0.4),
            valid_note("D", 5, 587.33, 2000.0, 0.6),
        ];

        pass_5::run(&mut state, &config).unwrap();

        assert_eq!(state.stats.note_count, 2);
        assert_eq!(state.stats.total_duration_ms, 3000.0);
        assert!((state.metadata.confidence - 0.5).abs() < 1e-6);
    }
}
