//! Pass 1: Staff-Line Detection
//!
//! Scans every row of the binary bitmap for near-horizontal ink runs and
//! collapses neighboring candidate rows into staff-line clusters. The row
//! scan honors the wall-clock deadline. Fewer clusters than the configured
//! minimum aborts the whole analysis.

use crate::analysis::StaffLine;
use crate::config::{Config, StaffConfig};
use crate::error::{Result as ScoreResult, ScoreError};
use crate::raster::ScoreState;

/// One row that qualified as a staff-line candidate
#[derive(Debug, Clone, Copy)]
struct CandidateRow {
    y: usize,
    black_ratio: f32,
}

/// Detect staff-line clusters in the binary bitmap.
///
/// A row qualifies when its black-pixel count exceeds `black_ratio_min` of
/// the width and its longest consecutive run exceeds `run_ratio_min` of the
/// width. Qualifying rows within `group_gap_px` of the previous candidate
/// merge into one cluster whose y is the rounded mean row and whose weight
/// is the mean black ratio.
pub fn detect_staff_lines(state: &ScoreState, config: &StaffConfig) -> ScoreResult<Vec<StaffLine>> {
    let bitmap = state.require_bitmap()?;
    let width = bitmap.width();
    let mut candidates: Vec<CandidateRow> = Vec::new();

    for y in 0..bitmap.height() {
        state.check_deadline()?;

        let mut black_pixels = 0usize;
        let mut consecutive = 0usize;
        let mut max_consecutive = 0usize;

        for x in 0..width {
            if bitmap.is_ink(x, y) {
                black_pixels += 1;
                consecutive += 1;
                max_consecutive = max_consecutive.max(consecutive);
            } else {
                consecutive = 0;
            }
        }

        if black_pixels as f32 > width as f32 * config.black_ratio_min
            && max_consecutive as f32 > width as f32 * config.run_ratio_min
        {
            candidates.push(CandidateRow {
                y,
                black_ratio: black_pixels as f32 / width as f32,
            });
        }
    }

    Ok(group_candidates(&candidates, config.group_gap_px))
}

/// Collapse candidate rows into clusters; a new group starts whenever the
/// gap from the previous candidate exceeds `group_gap_px`.
fn group_candidates(candidates: &[CandidateRow], group_gap_px: usize) -> Vec<StaffLine> {
    let mut groups: Vec<Vec<CandidateRow>> = Vec::new();
    for &candidate in candidates {
        match groups.last_mut() {
            Some(group) if candidate.y - group.last().unwrap().y <= group_gap_px => {
                group.push(candidate);
            }
            _ => groups.push(vec![candidate]),
        }
    }

    groups
        .iter()
        .map(|group| {
            let sum_y: usize = group.iter().map(|c| c.y).sum();
            let mean_y = (sum_y as f64 / group.len() as f64).round() as usize;
            let mean_weight =
                group.iter().map(|c| c.black_ratio).sum::<f32>() / group.len() as f32;
            StaffLine {
                y: mean_y,
                weight: mean_weight,
            }
        })
        .collect()
}

pub fn run(state: &mut ScoreState, config: &Config) -> ScoreResult<()> {
    println!("Pass 1: Staff-Line Detection");
    state.check_deadline()?;

    let staff_lines = detect_staff_lines(state, &config.staff)?;
    println!("  {} staff-line clusters", staff_lines.len());

    if staff_lines.len() < config.staff.min_staff_lines {
        return Err(ScoreError::StaffNotFound {
            found: staff_lines.len(),
            required: config.staff.min_staff_lines,
        });
    }

    state.metadata.staff_lines = staff_lines.clone();
    state.staff_lines = staff_lines;

    println!("  ✓ Pass 1 complete");
    Ok(())
}
