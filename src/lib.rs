//! fretboard-renderer — chord diagrams for fretted instruments.
//!
//! Give it an instrument (string names in drawing order) and a chord (string
//! and fret per note) and it lays out a fretboard, slides the fret window to
//! keep high notes visible, and draws everything onto a [`Surface`].
//!
//! ```
//! use fretboard_renderer::{Chord, Instrument, Note, Settings, render_svg};
//!
//! let chord = Chord::named("C", vec![Note::new(0, 0), Note::new(1, 0), Note::new(2, 0), Note::new(3, 3)]);
//! let svg = render_svg(&Instrument::ukulele(), &chord, &Settings::default(), None).unwrap();
//! assert!(svg.contains("<circle"));
//! ```

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod render;
pub mod surface;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Settings, SettingsOverride, load_config};
pub use error::DiagramError;
pub use ir::{Chord, Instrument, Note};
pub use layout::{DiagramLayout, resolve};
pub use parser::{parse_chord_document, parse_fret_shorthand};
pub use render::{RenderOptions, render, render_svg, render_with_options, render_with_settings};
pub use surface::{DrawCommand, Font, Paint, RecordingSurface, Surface, SvgSurface};
