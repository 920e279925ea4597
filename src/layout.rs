//! Settings resolution and board geometry.
//!
//! Everything the renderers draw is derived from a [`DiagramLayout`]: strings
//! and frets share one `spacing`, the first string sits `start` pixels from the
//! top, and `offset` is the fret number shown at the left edge of the window.

use serde::Serialize;

use crate::config::Settings;
use crate::error::{DiagramError, Result};
use crate::ir::{Chord, Instrument, Note};

/// Nominal width and height are shrunk by this fraction to leave room for
/// string and fret labels.
pub const MARGIN_FRACTION: f32 = 1.0 / 6.0;

/// Vertical nudge that puts a string label's baseline next to its bar.
pub const STRING_LABEL_BASELINE: f32 = 12.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramLayout {
    pub num_strings: usize,
    pub spacing: f32,
    pub start: f32,
    pub offset: u32,
    /// Shrunk drawing width.
    pub width: f32,
    /// Shrunk drawing height.
    pub height: f32,
    /// Nominal canvas size before the margin shrink.
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub stroke_width: f32,
    pub stroke_style: String,
    pub fret_enumeration: u32,
    pub font_family: String,
    pub font_size: f32,
}

/// Derives the layout for `chord` on `instrument`.
///
/// Fails before any geometry is computed when the instrument has no strings,
/// and afterwards when the settings produce a non-positive spacing or a note
/// falls outside the visible board.
pub fn resolve(instrument: &Instrument, chord: &Chord, settings: &Settings) -> Result<DiagramLayout> {
    let num_strings = instrument.num_strings();
    if num_strings == 0 {
        return Err(DiagramError::InvalidInstrument);
    }
    if settings.fret_enumeration == 0 {
        return Err(DiagramError::InvalidSettings {
            name: "fretEnumeration",
            reason: "must be at least 1".to_string(),
        });
    }
    if !settings.stroke_width.is_finite() || settings.stroke_width < 0.0 {
        return Err(DiagramError::InvalidSettings {
            name: "strokeWidth",
            reason: format!("{} is not a usable width", settings.stroke_width),
        });
    }

    let height = settings.height - settings.height * MARGIN_FRACTION;
    let width = settings.width - settings.width * MARGIN_FRACTION;
    let spacing = (height - settings.stroke_width) / (num_strings as f32 + 1.0);
    if !(spacing.is_finite() && spacing > 0.0) {
        return Err(DiagramError::DegenerateLayout {
            height,
            stroke_width: settings.stroke_width,
        });
    }

    let offset = fret_offset(chord.highest_fret(), num_strings);
    let layout = DiagramLayout {
        num_strings,
        spacing,
        start: spacing,
        offset,
        width,
        height,
        canvas_width: settings.width,
        canvas_height: settings.height,
        stroke_width: settings.stroke_width,
        stroke_style: settings.stroke_style.clone(),
        fret_enumeration: settings.fret_enumeration,
        font_family: settings.font_family.clone(),
        font_size: settings.font_size,
    };

    for note in &chord.notes {
        layout.check_note(note)?;
    }

    tracing::debug!(
        num_strings,
        spacing,
        offset,
        notes = chord.notes.len(),
        "resolved diagram layout"
    );
    Ok(layout)
}

/// Lowest visible fret: the window spans `num_strings + 1` frets and slides
/// right only as far as needed to show `highest_fret`.
pub fn fret_offset(highest_fret: u32, num_strings: usize) -> u32 {
    let window = num_strings as u32 + 1;
    highest_fret.saturating_sub(window)
}

impl DiagramLayout {
    /// Number of fret spaces in the window.
    pub fn visible_frets(&self) -> u32 {
        self.num_strings as u32 + 1
    }

    pub fn last_visible_fret(&self) -> u32 {
        self.offset + self.visible_frets()
    }

    pub fn fret_wire_count(&self) -> usize {
        self.num_strings + 2
    }

    pub fn string_y(&self, index: usize) -> f32 {
        self.start + index as f32 * self.spacing
    }

    pub fn string_label_position(&self, index: usize) -> (f32, f32) {
        (
            self.spacing / 2.0,
            self.string_y(index) + STRING_LABEL_BASELINE,
        )
    }

    pub fn fret_wire_x(&self, index: usize) -> f32 {
        self.spacing + index as f32 * self.spacing
    }

    pub fn fret_wire_top(&self) -> f32 {
        self.spacing
    }

    pub fn fret_wire_length(&self) -> f32 {
        self.spacing * (self.num_strings as f32 - 1.0)
    }

    pub fn note_position(&self, note: &Note) -> (f32, f32) {
        let relative = note.fret as f32 - self.offset as f32;
        let x = relative * self.spacing + self.spacing / 2.0 + self.stroke_width / 2.0;
        let y = note.string as f32 * self.spacing;
        (x, y)
    }

    pub fn note_radius(&self) -> f32 {
        self.spacing / 4.0
    }

    /// Window positions `0..=num_strings + 1` paired with their absolute fret
    /// number, keeping only those that land on the enumeration step.
    pub fn fret_labels(&self) -> Vec<(usize, u32)> {
        (0..=self.num_strings + 1)
            .map(|position| (position, position as u32 + self.offset))
            .filter(|(_, fret)| fret % self.fret_enumeration == 0)
            .collect()
    }

    pub fn fret_label_position(&self, position: usize) -> (f32, f32) {
        let x = self.spacing * position as f32 + self.spacing / 2.0;
        let y = self.spacing * self.num_strings as f32 + self.spacing / 1.25;
        (x, y)
    }

    fn check_note(&self, note: &Note) -> Result<()> {
        if note.string >= self.num_strings || note.fret < self.offset {
            return Err(DiagramError::NoteOutOfRange {
                string: note.string,
                fret: note.fret,
                num_strings: self.num_strings,
                offset: self.offset,
                last_fret: self.last_visible_fret(),
            });
        }
        Ok(())
    }
}
