use crate::config::{Config, Settings, SettingsOverride, load_config};
use crate::ir::{Chord, Instrument};
use crate::layout_dump::write_layout_dump;
use crate::parser::{ParseOutput, parse_chord_document, parse_fret_shorthand};
use crate::render::{render_with_settings, write_output_png, write_output_svg};
use crate::surface::{RecordingSurface, SvgSurface};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "fretr", version, about = "Chord diagram renderer in Rust")]
pub struct Args {
    /// Chord document (.json/.json5), or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file with default settings
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Instrument preset (ukulele, guitar, mandolin) or comma-separated string names
    #[arg(long = "instrument")]
    pub instrument: Option<String>,

    /// Fret shorthand such as 2000, x32010 or "10 - 12 10"; skips reading input
    #[arg(long = "frets", allow_hyphen_values = true)]
    pub frets: Option<String>,

    /// Chord name used as the SVG title
    #[arg(long = "name")]
    pub name: Option<String>,

    /// Width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,

    /// Write the resolved layout and draw commands as JSON
    #[arg(long = "dumpLayout")]
    pub dump_layout: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = load_config(args.config.as_deref())?;
    let (parsed, settings) = prepare(&args, &config)?;

    let mut recording = RecordingSurface::new();
    let layout = render_with_settings(&mut recording, &parsed.instrument, &parsed.chord, &settings)?;
    if let Some(path) = args.dump_layout.as_deref() {
        write_layout_dump(path, &layout, &parsed.instrument, &parsed.chord, &recording)?;
    }

    let mut surface = SvgSurface::new(settings.width, settings.height);
    if let Some(name) = &parsed.chord.name {
        surface = surface.with_title(name.clone());
    }
    if let Some(background) = &config.background {
        surface = surface.with_background(background.clone());
    }
    recording.replay(&mut surface);
    let svg = surface.finish();

    match args.output_format {
        OutputFormat::Svg => write_output_svg(&svg, args.output.as_deref()),
        OutputFormat::Png => {
            let output = ensure_output(args.output.as_deref(), "png")?;
            write_output_png(
                &svg,
                output,
                settings.width,
                settings.height,
                &settings.font_family,
            )
        }
    }
}

/// Builds the chord to draw and its final settings from the flags, the
/// input document and the loaded config.
fn prepare(args: &Args, config: &Config) -> Result<(ParseOutput, Settings)> {
    let mut parsed = if let Some(frets) = args.frets.as_deref() {
        ParseOutput {
            instrument: Instrument::default(),
            chord: Chord::new(parse_fret_shorthand(frets)?),
            settings: SettingsOverride::default(),
        }
    } else {
        let input = read_input(args.input.as_deref())?;
        parse_chord_document(&input)?
    };

    if let Some(instrument) = args.instrument.as_deref() {
        parsed.instrument = parse_instrument_arg(instrument)?;
    }
    if parsed.chord.name.is_none() {
        parsed.chord.name = args.name.clone();
    }

    let flags = SettingsOverride {
        width: args.width,
        height: args.height,
        ..Default::default()
    };
    let settings = config.resolve_settings(&parsed.settings, &flags);
    tracing::debug!(
        strings = parsed.instrument.num_strings(),
        notes = parsed.chord.notes.len(),
        width = settings.width,
        height = settings.height,
        "prepared chord"
    );
    Ok((parsed, settings))
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn parse_instrument_arg(value: &str) -> Result<Instrument> {
    if let Some(preset) = Instrument::preset(value) {
        return Ok(preset);
    }
    let strings: Vec<&str> = value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if !value.contains(',') {
        return Err(anyhow::anyhow!(
            "Unknown instrument `{}`; use a preset or comma-separated string names",
            value
        ));
    }
    Ok(Instrument::new(strings))
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => Ok(std::fs::read_to_string(path)?),
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn ensure_output<'a>(output: Option<&'a Path>, ext: &str) -> Result<&'a Path> {
    output.ok_or_else(|| anyhow::anyhow!("Output path required for {} output", ext))
}
