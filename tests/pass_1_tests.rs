//! Validation tests for Pass 1: Staff-Line Detection

use score2midi::bitmap::Bitmap;
use score2midi::config::Config;
use score2midi::error::ScoreError;
use score2midi::passes::pass_1::{self, detect_staff_lines};
use score2midi::raster::{RasterImage, ScoreState};

/// Build a bitmap with full-width ink rows at the given y positions
fn staff_bitmap(width: usize, height: usize, rows: &[usize]) -> Bitmap {
    let mut bitmap = Bitmap::blank(width, height);
    for &y in rows {
        bitmap.fill_row(y);
    }
    bitmap
}

fn state_of(bitmap: Bitmap, config: &Config) -> ScoreState {
    ScoreState::from_test_bitmap(bitmap, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_separated_lines() {
        let config = Config::default();
        let state = state_of(staff_bitmap(200, 100, &[10, 25, 40, 55, 70]), &config);

        let lines = detect_staff_lines(&state, &config.staff).unwrap();
        assert_eq!(lines.len(), 5);
        let ys: Vec<usize> = lines.iter().map(|l| l.y).collect();
        assert_eq!(ys, vec![10, 25, 40, 55, 70]);
        for line in &lines {
            assert!((line.weight - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_adjacent_rows_merge_into_one_cluster() {
        let config = Config::default();
        // A thick line drawn over three adjacent rows
        let state = state_of(staff_bitmap(200, 100, &[10, 11, 12]), &config);

        let lines = detect_staff_lines(&state, &config.staff).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].y, 11);
    }

    #[test]
    fn test_group_gap_boundary() {
        let config = Config::default();
        assert_eq!(config.staff.group_gap_px, 10);

        // Gap of exactly 10 merges
        let state = state_of(staff_bitmap(200, 100, &[10, 20]), &config);
        let lines = detect_staff_lines(&state, &config.staff).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].y, 15);

        // Gap of 11 splits
        let state = state_of(staff_bitmap(200, 100, &[10, 21]), &config);
        let lines = detect_staff_lines(&state, &config.staff).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].y, 10);
        assert_eq!(lines[1].y, 21);
    }

    #[test]
    fn test_sparse_row_does_not_qualify() {
        let config = Config::default();
        let mut bitmap = Bitmap::blank(200, 100);
        // 45% of the width, below the 50% black-ratio floor
        for x in 0..90 {
            bitmap.set_ink(x, 50);
        }
        let state = state_of(bitmap, &config);

        let lines = detect_staff_lines(&state, &config.staff).unwrap();
        assert!(lines.is_empty());
    }

    #[test]
    fn test_broken_row_does_not_qualify() {
        let config = Config::default();
        let mut bitmap = Bitmap::blank(200, 100);
        // 60% black overall but the longest run is only 20% of the width
        for start in [0usize, 60, 120] {
            for x in start..start + 40 {
                bitmap.set_ink(x, 50);
            }
        }
        let state = state_of(bitmap, &config);

        let lines = detect_staff_lines(&state, &config.staff).unwrap();
        assert!(lines.is_empty());
    }

    #[test]
    fn test_pass_1_requires_minimum_staff_lines() {
        let config = Config::default();
        let mut state = state_of(staff_bitmap(200, 100, &[10, 25, 40]), &config);

        match pass_1::run(&mut state, &config) {
            Err(ScoreError::StaffNotFound { found, required }) => {
                assert_eq!(found, 3);
                assert_eq!(required, 4);
            }
            other => panic!("expected StaffNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_pass_1_blank_image() {
        let config = Config::default();
        let mut state = state_of(Bitmap::blank(200, 100), &config);

        match pass_1::run(&mut state, &config) {
            Err(ScoreError::StaffNotFound { found, .. }) => assert_eq!(found, 0),
            other => panic!("expected StaffNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_pass_1_populates_state_and_metadata() {
        let config = Config::default();
        let mut state = state_of(staff_bitmap(200, 100, &[10, 25, 40, 55, 70]), &config);

        pass_1::run(&mut state, &config).unwrap();

        assert_eq!(state.staff_lines.len(), 5);
        assert_eq!(state.metadata.staff_lines, state.staff_lines);
    }

    #[test]
    fn test_deadline_enforced_between_passes() {
        let mut config = Config::default();
        config.analysis.timeout_sec = 0;
        let mut state = state_of(staff_bitmap(200, 100, &[10, 25, 40, 55, 70]), &config);

        match pass_1::run(&mut state, &config) {
            Err(ScoreError::AnalysisTimeout { seconds }) => assert_eq!(seconds, 0),
            other => panic!("expected AnalysisTimeout, got {:?}", other),
        }
    }

    #[test]
    fn test_deadline_enforced_inside_row_scan() {
        let mut config = Config::default();
        config.analysis.timeout_sec = 0;
        let state = state_of(staff_bitmap(200, 100, &[10, 25, 40, 55, 70]), &config);

        // The scan itself aborts, independent of the between-pass check
        match detect_staff_lines(&state, &config.staff) {
            Err(ScoreError::AnalysisTimeout { seconds }) => assert_eq!(seconds, 0),
            other => panic!("expected AnalysisTimeout, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_bitmap_is_an_error() {
        let config = Config::default();
        // State built straight from a raster, without running pass 0
        let raster = RasterImage::from_test_pixels(2, 2, vec![255; 16]);
        let mut state = ScoreState::new(raster, &config);

        match pass_1::run(&mut state, &config) {
            Err(ScoreError::InternalError(_)) => {}
            other => panic!("expected InternalError, got {:?}", other),
        }
    }
}
