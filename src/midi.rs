//! Standard MIDI file encoding and export
//!
//! Produces a Type-0 file with a single track: tempo and program setup,
//! then one NoteOn/NoteOff pair per valid note in left-to-right order.
//! Notes play back-to-back; the NoteOff delta carries the full duration
//! converted from milliseconds to ticks at the configured tempo.

use crate::analysis::DetectedNote;
use crate::config::Config;
use crate::error::{Result as ScoreResult, ScoreError};
use crate::notation;
use crate::raster::ScoreState;
use midly::num::{u15, u24, u28, u4, u7};
use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind};
use std::path::Path;

/// Milliseconds per beat at the reference tempo the duration table is
/// defined against (120 BPM)
const REFERENCE_MS_PER_BEAT: f64 = 500.0;

/// Microseconds per quarter note at the given tempo.
pub fn tempo_us(bpm: f64) -> u32 {
    (60_000_000.0 / bpm).round() as u32
}

/// Convert a duration in milliseconds to ticks at the given resolution.
///
/// The conversion is fixed against the 500 ms reference beat; only the
/// tempo meta event controls playback speed, so the note event deltas are
/// identical at every configured BPM.
pub fn duration_ticks(duration_ms: f64, tick_resolution: u16) -> u32 {
    (duration_ms / REFERENCE_MS_PER_BEAT * tick_resolution as f64).round() as u32
}

/// Encode the valid subset of the note list as a Standard MIDI File.
///
/// Invalid notes are skipped; an empty valid subset is an error so a
/// caller never writes a silent file by accident.
pub fn encode_midi(notes: &[DetectedNote], config: &Config) -> ScoreResult<Vec<u8>> {
    let valid: Vec<&DetectedNote> = notes.iter().filter(|n| n.valid).collect();
    if valid.is_empty() {
        return Err(ScoreError::NoValidNotes);
    }

    let midi = &config.midi;
    let channel = u4::new(midi.channel);
    let mut smf = Smf::new(Header::new(
        Format::SingleTrack,
        Timing::Metrical(u15::new(midi.tick_resolution)),
    ));

    let mut track: Vec<TrackEvent> = Vec::new();
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(tempo_us(midi.bpm)))),
    });
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Midi {
            channel,
            message: MidiMessage::ProgramChange {
                program: u7::new(midi.program),
            },
        },
    });

    for note in &valid {
        let key = match notation::midi_key(&note.note, note.octave) {
            Some(key) => u7::new(key),
            // Range-checked notes always map; anything else is skipped
            None => continue,
        };

        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::NoteOn {
                    key,
                    vel: u7::new(midi.velocity),
                },
            },
        });
        track.push(TrackEvent {
            delta: u28::new(duration_ticks(note.duration_ms, midi.tick_resolution)),
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::NoteOff {
                    key,
                    vel: u7::new(0),
                },
            },
        });
    }

    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });
    smf.tracks.push(track);

    let mut bytes = Vec::new();
    smf.write(&mut bytes)
        .map_err(|e| ScoreError::MidiExportError(e.to_string()))?;
    Ok(bytes)
}

/// Encode and write the MIDI file into the output directory.
pub fn export_midi(state: &ScoreState, output_dir: &Path, config: &Config) -> ScoreResult<()> {
    let bytes = encode_midi(&state.detected_notes, config)?;

    std::fs::create_dir_all(output_dir)?;
    let midi_path = output_dir.join(&config.export.midi_filename);
    std::fs::write(&midi_path, bytes)?;

    println!("Exported MIDI file to {}", midi_path.display());
    Ok(())
}
