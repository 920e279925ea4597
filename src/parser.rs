use crate::config::SettingsOverride;
use crate::error::{DiagramError, Result};
use crate::ir::{Chord, Instrument, Note};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

static COMPACT_FRETS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9xX\-]+$").unwrap());
static FRET_SEPARATOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s,/|]+").unwrap());
static FRET_TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:[0-9]{1,2}|[xX\-])$").unwrap());

#[derive(Debug, Clone, Default)]
pub struct ParseOutput {
    pub instrument: Instrument,
    pub chord: Chord,
    pub settings: SettingsOverride,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InstrumentSpec {
    Preset(String),
    Strings(Vec<String>),
    Full(Instrument),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ChordSpec {
    Shorthand(String),
    Notes(Vec<Note>),
    Full(ChordObject),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ChordObject {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    notes: Option<Vec<Note>>,
    #[serde(default)]
    frets: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ChordDocument {
    #[serde(default)]
    instrument: Option<InstrumentSpec>,
    chord: ChordSpec,
    #[serde(default)]
    settings: Option<SettingsOverride>,
}

/// Parses a chord document written in JSON or JSON5.
///
/// The instrument defaults to a ukulele when omitted.
pub fn parse_chord_document(input: &str) -> Result<ParseOutput> {
    let document = match serde_json::from_str::<ChordDocument>(input) {
        Ok(document) => document,
        Err(_) => json5::from_str::<ChordDocument>(input)
            .map_err(|err| DiagramError::Parse(err.to_string()))?,
    };

    let instrument = match document.instrument {
        None => Instrument::default(),
        Some(InstrumentSpec::Preset(name)) => Instrument::preset(&name)
            .ok_or_else(|| DiagramError::Parse(format!("unknown instrument preset `{name}`")))?,
        Some(InstrumentSpec::Strings(strings)) => Instrument { strings },
        Some(InstrumentSpec::Full(instrument)) => instrument,
    };

    let chord = match document.chord {
        ChordSpec::Shorthand(frets) => Chord::new(parse_fret_shorthand(&frets)?),
        ChordSpec::Notes(notes) => Chord::new(notes),
        ChordSpec::Full(ChordObject { name, notes, frets }) => {
            let notes = match (notes, frets) {
                (Some(notes), None) => notes,
                (None, Some(frets)) => parse_fret_shorthand(&frets)?,
                (None, None) => Vec::new(),
                (Some(_), Some(_)) => {
                    return Err(DiagramError::Parse(
                        "chord may define `notes` or `frets`, not both".to_string(),
                    ));
                }
            };
            Chord { name, notes }
        }
    };

    Ok(ParseOutput {
        instrument,
        chord,
        settings: document.settings.unwrap_or_default(),
    })
}

/// Parses fret shorthand such as `2000`, `x32010`, `-32010` or `10 12 12 10`.
///
/// Tokens map to strings in instrument order; `x` or `-` marks a muted string
/// and produces no note. Run-together digits are one fret per string, so frets
/// above 9 need whitespace, `,`, `/` or `|` between them.
pub fn parse_fret_shorthand(input: &str) -> Result<Vec<Note>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let tokens: Vec<&str> = if COMPACT_FRETS_RE.is_match(trimmed) {
        trimmed
            .char_indices()
            .map(|(idx, ch)| &trimmed[idx..idx + ch.len_utf8()])
            .collect()
    } else {
        FRET_SEPARATOR_RE
            .split(trimmed)
            .filter(|token| !token.is_empty())
            .collect()
    };

    let mut notes = Vec::new();
    for (string, token) in tokens.into_iter().enumerate() {
        if !FRET_TOKEN_RE.is_match(token) {
            return Err(DiagramError::Parse(format!(
                "invalid fret `{token}` for string {string}"
            )));
        }
        if is_muted(token) {
            continue;
        }
        let fret = token
            .parse::<u32>()
            .map_err(|err| DiagramError::Parse(format!("invalid fret `{token}`: {err}")))?;
        notes.push(Note::new(string, fret));
    }
    Ok(notes)
}

fn is_muted(token: &str) -> bool {
    token == "-" || token.eq_ignore_ascii_case("x")
}
