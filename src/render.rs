use crate::config::{Settings, SettingsOverride};
use crate::error::Result as DiagramResult;
use crate::ir::{Chord, Instrument, Note};
use crate::layout::{DiagramLayout, resolve};
use crate::parser::parse_chord_document;
use crate::surface::{Font, Paint, Surface, SvgSurface};
use anyhow::Result;
use std::path::Path;

/// Defaults and page-level options for the string-in, SVG-out entry points.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub settings: Settings,
    pub background: Option<String>,
}

impl RenderOptions {
    pub fn with_background(mut self, background: impl Into<String>) -> Self {
        self.background = Some(background.into());
        self
    }
}

/// Draws `chord` on `instrument` with `overrides` merged over the built-in
/// defaults. Nothing is drawn when layout resolution fails.
pub fn render<S: Surface + ?Sized>(
    surface: &mut S,
    instrument: &Instrument,
    chord: &Chord,
    overrides: Option<&SettingsOverride>,
) -> DiagramResult<DiagramLayout> {
    let settings = match overrides {
        Some(overrides) => Settings::default().merged(overrides),
        None => Settings::default(),
    };
    render_with_settings(surface, instrument, chord, &settings)
}

pub fn render_with_settings<S: Surface + ?Sized>(
    surface: &mut S,
    instrument: &Instrument,
    chord: &Chord,
    settings: &Settings,
) -> DiagramResult<DiagramLayout> {
    let layout = resolve(instrument, chord, settings)?;
    draw_board(surface, instrument, &layout);
    draw_chord(surface, chord, &layout);
    Ok(layout)
}

pub fn draw_board<S: Surface + ?Sized>(surface: &mut S, instrument: &Instrument, layout: &DiagramLayout) {
    let font = label_font(layout);

    for (idx, label) in instrument.strings.iter().enumerate().take(layout.num_strings) {
        let (label_x, label_y) = layout.string_label_position(idx);
        surface.text(label_x, label_y, label, &font);
        surface.rect(
            layout.spacing,
            layout.string_y(idx),
            layout.width,
            layout.stroke_width,
            &layout.stroke_style,
        );
    }

    for idx in 0..layout.fret_wire_count() {
        surface.rect(
            layout.fret_wire_x(idx),
            layout.fret_wire_top(),
            layout.stroke_width,
            layout.fret_wire_length(),
            &layout.stroke_style,
        );
    }
    tracing::trace!(
        strings = layout.num_strings,
        frets = layout.fret_wire_count(),
        "drew board"
    );

    draw_fret_numbers(surface, layout);
}

pub fn draw_fret_numbers<S: Surface + ?Sized>(surface: &mut S, layout: &DiagramLayout) {
    let font = label_font(layout);
    for (position, fret) in layout.fret_labels() {
        let (x, y) = layout.fret_label_position(position);
        surface.text(x, y, &fret.to_string(), &font);
    }
}

pub fn draw_chord<S: Surface + ?Sized>(
    surface: &mut S,
    chord: &Chord,
    layout: &DiagramLayout,
) {
    for note in &chord.notes {
        draw_note(surface, note, layout);
    }
    tracing::trace!(notes = chord.notes.len(), "drew chord");
}

pub fn draw_note<S: Surface + ?Sized>(surface: &mut S, note: &Note, layout: &DiagramLayout) {
    let (x, y) = layout.note_position(note);
    let paint = if note.is_open() {
        Paint::outline(&layout.stroke_style, layout.stroke_width)
    } else {
        Paint::fill(&layout.stroke_style)
    };
    surface.circle(x, y, layout.note_radius(), &paint);
}

fn label_font(layout: &DiagramLayout) -> Font {
    Font {
        family: layout.font_family.clone(),
        size: layout.font_size,
        color: layout.stroke_style.clone(),
    }
}

/// Renders to a standalone SVG document sized to the nominal canvas.
pub fn render_svg(
    instrument: &Instrument,
    chord: &Chord,
    settings: &Settings,
    background: Option<&str>,
) -> DiagramResult<String> {
    let mut surface = SvgSurface::new(settings.width, settings.height);
    if let Some(name) = &chord.name {
        surface = surface.with_title(name.clone());
    }
    if let Some(background) = background {
        surface = surface.with_background(background);
    }
    render_with_settings(&mut surface, instrument, chord, settings)?;
    Ok(surface.finish())
}

/// Parses a chord document and renders it; document settings win over
/// `options.settings`.
pub fn render_with_options(document: &str, options: RenderOptions) -> DiagramResult<String> {
    let parsed = parse_chord_document(document)?;
    let settings = options.settings.merged(&parsed.settings);
    render_svg(
        &parsed.instrument,
        &parsed.chord,
        &settings,
        options.background.as_deref(),
    )
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(
    svg: &str,
    output: &Path,
    width: f32,
    height: f32,
    font_family: &str,
) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = font_family.to_string();
    opt.fontdb_mut().load_system_fonts();
    if let Some(size) = usvg::Size::from_wh(width, height) {
        opt.default_size = size;
    }

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    tracing::debug!(path = %output.display(), width = size.width(), height = size.height(), "wrote png");
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(
    _svg: &str,
    _output: &Path,
    _width: f32,
    _height: f32,
    _font_family: &str,
) -> Result<()> {
    Err(anyhow::anyhow!(
        "PNG output requires the `png` feature"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DiagramError;
    use crate::surface::{DrawCommand, RecordingSurface};

    fn d_chord() -> Chord {
        Chord::named(
            "D",
            vec![
                Note::new(0, 2),
                Note::new(1, 0),
                Note::new(2, 0),
                Note::new(3, 0),
            ],
        )
    }

    #[test]
    fn ukulele_d_chord_emits_expected_primitives() {
        let mut surface = RecordingSurface::new();
        let layout = render(&mut surface, &Instrument::ukulele(), &d_chord(), None).unwrap();
        assert_eq!(layout.offset, 0);

        // 4 string bars + 6 fret wires.
        let rects: Vec<_> = surface.rects().collect();
        assert_eq!(rects.len(), 10);
        let string_bars = rects
            .iter()
            .filter(|cmd| matches!(cmd, DrawCommand::Rect { height, .. } if *height == layout.stroke_width))
            .count();
        assert_eq!(string_bars, 4);

        let circles: Vec<_> = surface.circles().collect();
        assert_eq!(circles.len(), 4);
        let filled: Vec<_> = circles
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Circle { cy, paint, .. } if paint.is_filled() => Some(*cy),
                _ => None,
            })
            .collect();
        assert_eq!(filled, vec![0.0]);

        let labels: Vec<_> = surface
            .texts()
            .filter_map(|cmd| match cmd {
                DrawCommand::Text { content, .. } => Some(content.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(labels, vec!["G", "C", "E", "A", "0", "4"]);
    }

    #[test]
    fn board_is_drawn_before_notes() {
        let mut surface = RecordingSurface::new();
        render(&mut surface, &Instrument::ukulele(), &d_chord(), None).unwrap();
        let first_circle = surface
            .commands
            .iter()
            .position(|cmd| matches!(cmd, DrawCommand::Circle { .. }))
            .unwrap();
        assert_eq!(first_circle, surface.commands.len() - 4);
    }

    #[test]
    fn empty_instrument_draws_nothing() {
        let mut surface = RecordingSurface::new();
        let err = render(
            &mut surface,
            &Instrument::new(Vec::<String>::new()),
            &d_chord(),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, DiagramError::InvalidInstrument));
        assert!(surface.commands.is_empty());
    }

    #[test]
    fn overrides_change_style_and_enumeration() {
        let overrides = SettingsOverride {
            stroke_style: Some("#c00".to_string()),
            fret_enumeration: Some(1),
            ..Default::default()
        };
        let mut surface = RecordingSurface::new();
        render(&mut surface, &Instrument::ukulele(), &d_chord(), Some(&overrides)).unwrap();
        assert!(surface.rects().all(|cmd| matches!(cmd, DrawCommand::Rect { fill, .. } if fill == "#c00")));
        // Every window position 0..=5 is labelled.
        assert_eq!(surface.texts().count(), 4 + 6);
    }

    #[test]
    fn render_svg_includes_title_and_background() {
        let svg = render_svg(
            &Instrument::ukulele(),
            &d_chord(),
            &Settings::default(),
            Some("#fff"),
        )
        .unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("width=\"500\""));
        assert!(svg.contains("<title>D</title>"));
        assert!(svg.contains("fill=\"#fff\""));
        assert_eq!(svg.matches("<circle").count(), 4);
    }

    #[test]
    fn render_with_options_applies_document_settings() {
        let svg = render_with_options(
            r##"{chord: "2000", settings: {strokeStyle: "#123456"}}"##,
            RenderOptions::default(),
        )
        .unwrap();
        assert!(svg.contains("#123456"));
        assert!(!svg.contains("fill=\"#000\""));
    }

    #[cfg(feature = "png")]
    #[test]
    fn write_output_png_rasterizes_board() {
        let svg = render_svg(
            &Instrument::ukulele(),
            &d_chord(),
            &Settings::default(),
            Some("#ffffff"),
        )
        .unwrap();
        let dir = std::env::temp_dir().join(format!("fretr-png-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("d.png");

        write_output_png(&svg, &path, 500.0, 500.0, "Gill Sans").unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G']));
        let pixmap = resvg::tiny_skia::Pixmap::load_png(&path).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (500, 500));
    }

    #[test]
    fn draw_chord_places_markers_from_layout_alone() {
        let chord = Chord::new(vec![Note::new(1, 3), Note::new(2, 0)]);
        let layout =
            crate::layout::resolve(&Instrument::ukulele(), &chord, &Settings::default()).unwrap();
        let mut surface = RecordingSurface::new();
        draw_chord(&mut surface, &chord, &layout);

        let expected: Vec<DrawCommand> = chord
            .notes
            .iter()
            .map(|note| {
                let (cx, cy) = layout.note_position(note);
                let paint = if note.is_open() {
                    Paint::outline("#000", 5.0)
                } else {
                    Paint::fill("#000")
                };
                DrawCommand::Circle {
                    cx,
                    cy,
                    r: layout.note_radius(),
                    paint,
                }
            })
            .collect();
        assert_eq!(surface.commands, expected);
    }
}
