//! QA artifacts generation

use crate::error::ScoreError;
use crate::raster::ScoreState;
use plotters::prelude::*;
use std::fs;

/// Generate QA artifacts (plots, reports)
pub fn generate_artifacts(
    state: &ScoreState,
    output_dir: &std::path::Path,
) -> crate::ScoreResult<()> {
    let qa_dir = output_dir.join("qa");
    fs::create_dir_all(&qa_dir)?;

    println!("Generating QA artifacts...");

    generate_detection_map(state, &qa_dir)?;
    generate_note_timeline(state, &qa_dir)?;
    generate_statistics_report(state, &qa_dir)?;

    println!("QA artifacts generated in {}", qa_dir.display());
    Ok(())
}

/// Detection overview: staff-line clusters and accepted note heads in
/// image coordinates
fn generate_detection_map(
    state: &ScoreState,
    output_dir: &std::path::Path,
) -> crate::ScoreResult<()> {
    let path = output_dir.join("detection_map.png");
    let root = BitMapBackend::new(&path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| {
        ScoreError::QaGenerationError(format!("Failed to fill plot background: {:?}", e))
    })?;

    let width = state.raster.width.max(1);
    let height = state.raster.height.max(1);

    let mut chart = ChartBuilder::on(&root)
        .caption("Staff and Note Detection Map", ("sans-serif", 30))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0..width, 0..height)
        .map_err(|e| ScoreError::QaGenerationError(format!("Failed to build chart: {:?}", e)))?;

    chart
        .configure_mesh()
        .x_desc("X (pixels)")
        .y_desc("Y (pixels)")
        .draw()
        .map_err(|e| ScoreError::QaGenerationError(format!("Failed to draw mesh: {:?}", e)))?;

    // Staff lines as full-width horizontal segments, image y flipped so
    // the plot matches the image orientation
    chart
        .draw_series(state.staff_lines.iter().map(|line| {
            PathElement::new(
                vec![(0, height - line.y), (width, height - line.y)],
                BLACK.stroke_width(2),
            )
        }))
        .map_err(|e| ScoreError::QaGenerationError(format!("Failed to draw series: {:?}", e)))?;

    chart
        .draw_series(state.detected_notes.iter().map(|note| {
            let color = if note.valid { BLUE } else { RED };
            Circle::new((note.x, height - note.y), 5, color.filled())
        }))
        .map_err(|e| ScoreError::QaGenerationError(format!("Failed to draw series: {:?}", e)))?;

    Ok(())
}

/// Note timeline: reading order (x position) against pitch frequency
fn generate_note_timeline(
    state: &ScoreState,
    output_dir: &std::path::Path,
) -> crate::ScoreResult<()> {
    let path = output_dir.join("note_timeline.png");
    let root = BitMapBackend::new(&path, (1200, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| {
        ScoreError::QaGenerationError(format!("Failed to fill plot background: {:?}", e))
    })?;

    let width = state.raster.width.max(1);
    let max_frequency = state
        .detected_notes
        .iter()
        .map(|n| n.frequency)
        .fold(0.0f64, f64::max)
        .max(1.0);

    let mut chart = ChartBuilder::on(&root)
        .caption("Note Timeline", ("sans-serif", 30))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0..width, 0.0f64..max_frequency * 1.1)
        .map_err(|e| ScoreError::QaGenerationError(format!("Failed to build chart: {:?}", e)))?;

    chart
        .configure_mesh()
        .x_desc("X (pixels, reading order)")
        .y_desc("Frequency (Hz)")
        .draw()
        .map_err(|e| ScoreError::QaGenerationError(format!("Failed to draw mesh: {:?}", e)))?;

    chart
        .draw_series(state.detected_notes.iter().map(|note| {
            let color = if note.valid { BLUE } else { RED };
            Circle::new((note.x, note.frequency), 4, color.filled())
        }))
        .map_err(|e| ScoreError::QaGenerationError(format!("Failed to draw series: {:?}", e)))?;

    Ok(())
}

/// Generate statistics report
fn generate_statistics_report(
    state: &ScoreState,
    output_dir: &std::path::Path,
) -> crate::ScoreResult<()> {
    let path = output_dir.join("statistics_report.txt");
    let stats = &state.stats;

    let mut report = String::new();
    report.push_str("SCORE TO MIDI - ANALYSIS REPORT\n");
    report.push_str("===============================\n\n");

    report.push_str(&format!("Clef: {}\n", state.metadata.clef.name()));
    report.push_str(&format!(
        "Time Signature: {}\n",
        state.metadata.time_signature
    ));
    report.push_str(&format!("Tempo: {:.1} BPM\n", state.metadata.tempo_bpm));
    report.push_str(&format!(
        "Staff Lines Detected: {}\n",
        state.staff_lines.len()
    ));
    report.push_str(&format!(
        "Mean Detection Confidence: {:.3}\n\n",
        state.metadata.confidence
    ));

    report.push_str(&format!(
        "Notes Detected: {}\n",
        state.detected_notes.len()
    ));
    report.push_str(&format!("Notes Valid: {}\n", stats.note_count));
    report.push_str(&format!(
        "Total Duration: {:.1}ms\n",
        stats.total_duration_ms
    ));
    report.push_str(&format!("Average Velocity: {}\n", stats.average_velocity));

    if let (Some(min), Some(max)) = (&stats.min_note, &stats.max_note) {
        report.push_str(&format!(
            "Lowest Note: {} ({:.2} Hz)\n",
            min.full_name(),
            min.frequency
        ));
        report.push_str(&format!(
            "Highest Note: {} ({:.2} Hz)\n",
            max.full_name(),
            max.frequency
        ));
    }

    if !state.detected_notes.is_empty() {
        report.push_str("\nDetected Notes (reading order):\n");
        for note in &state.detected_notes {
            report.push_str(&format!(
                "  {} {} {:.0}ms {}\n",
                note.full_name(),
                note.duration_type.name(),
                note.duration_ms,
                if note.valid { "valid" } else { "rejected" }
            ));
        }
    }

    if !stats.unique_notes.is_empty() {
        report.push_str(&format!(
            "Unique Notes: {}\n",
            stats
                .unique_notes
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }

    fs::write(path, report)?;

    Ok(())
}
