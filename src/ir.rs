use serde::{Deserialize, Serialize};

/// A fretted instrument, described only by its string labels in drawing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    pub strings: Vec<String>,
}

impl Instrument {
    pub fn new<I, S>(strings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            strings: strings.into_iter().map(Into::into).collect(),
        }
    }

    pub fn ukulele() -> Self {
        Self::new(["G", "C", "E", "A"])
    }

    pub fn guitar() -> Self {
        Self::new(["E", "A", "D", "G", "B", "E"])
    }

    pub fn mandolin() -> Self {
        Self::new(["G", "D", "A", "E"])
    }

    pub fn preset(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "ukulele" | "uke" => Some(Self::ukulele()),
            "guitar" => Some(Self::guitar()),
            "mandolin" => Some(Self::mandolin()),
            _ => None,
        }
    }

    pub fn num_strings(&self) -> usize {
        self.strings.len()
    }
}

impl Default for Instrument {
    fn default() -> Self {
        Self::ukulele()
    }
}

/// A single fretted position. Fret 0 is the open string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub string: usize,
    pub fret: u32,
}

impl Note {
    pub fn new(string: usize, fret: u32) -> Self {
        Self { string, fret }
    }

    pub fn is_open(&self) -> bool {
        self.fret == 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub notes: Vec<Note>,
}

impl Chord {
    pub fn new(notes: Vec<Note>) -> Self {
        Self { name: None, notes }
    }

    pub fn named(name: impl Into<String>, notes: Vec<Note>) -> Self {
        Self {
            name: Some(name.into()),
            notes,
        }
    }

    /// Highest fret used by any note, 0 for an empty chord.
    pub fn highest_fret(&self) -> u32 {
        self.notes.iter().map(|note| note.fret).max().unwrap_or(0)
    }
}
