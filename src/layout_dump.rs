use crate::ir::{Chord, Instrument};
use crate::layout::DiagramLayout;
use crate::surface::{DrawCommand, RecordingSurface};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub chord: Option<String>,
    pub strings: Vec<String>,
    pub layout: DiagramLayout,
    pub notes: Vec<NoteDump>,
    pub fret_labels: Vec<FretLabelDump>,
    pub commands: Vec<DrawCommand>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteDump {
    pub string: usize,
    pub fret: u32,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub open: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FretLabelDump {
    pub position: usize,
    pub fret: u32,
    pub x: f32,
    pub y: f32,
}

impl LayoutDump {
    pub fn from_layout(
        layout: &DiagramLayout,
        instrument: &Instrument,
        chord: &Chord,
        recording: &RecordingSurface,
    ) -> Self {
        let notes = chord
            .notes
            .iter()
            .map(|note| {
                let (x, y) = layout.note_position(note);
                NoteDump {
                    string: note.string,
                    fret: note.fret,
                    x,
                    y,
                    radius: layout.note_radius(),
                    open: note.is_open(),
                }
            })
            .collect();

        let fret_labels = layout
            .fret_labels()
            .into_iter()
            .map(|(position, fret)| {
                let (x, y) = layout.fret_label_position(position);
                FretLabelDump {
                    position,
                    fret,
                    x,
                    y,
                }
            })
            .collect();

        LayoutDump {
            chord: chord.name.clone(),
            strings: instrument.strings.clone(),
            layout: layout.clone(),
            notes,
            fret_labels,
            commands: recording.commands.clone(),
        }
    }
}

pub fn write_layout_dump(
    path: &Path,
    layout: &DiagramLayout,
    instrument: &Instrument,
    chord: &Chord,
    recording: &RecordingSurface,
) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout, instrument, chord, recording);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
