use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiagramError {
    #[error("instrument has no strings")]
    InvalidInstrument,

    #[error("note on string {string} fret {fret} is outside the board ({num_strings} strings, frets {offset}..={last_fret})")]
    NoteOutOfRange {
        string: usize,
        fret: u32,
        num_strings: usize,
        offset: u32,
        last_fret: u32,
    },

    #[error("height {height} leaves no room for strings of width {stroke_width}")]
    DegenerateLayout { height: f32, stroke_width: f32 },

    #[error("invalid setting `{name}`: {reason}")]
    InvalidSettings { name: &'static str, reason: String },

    #[error("failed to parse chord document: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, DiagramError>;
