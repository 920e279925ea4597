use fretboard_renderer::{RenderOptions, SettingsOverride, render_with_options};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ChordRenderOptions {
    background: Option<String>,
    width: Option<f32>,
    height: Option<f32>,
    stroke_width: Option<f32>,
    stroke_style: Option<String>,
    fret_enumeration: Option<u32>,
    font_family: Option<String>,
    font_size: Option<f32>,
}

fn build_render_options(options: ChordRenderOptions) -> RenderOptions {
    let settings = SettingsOverride {
        width: options.width,
        height: options.height,
        stroke_width: options.stroke_width,
        stroke_style: options.stroke_style,
        fret_enumeration: options.fret_enumeration,
        font_family: options.font_family,
        font_size: options.font_size,
    };
    let mut render_options = RenderOptions::default();
    render_options.settings.apply(&settings);
    if let Some(background) = options.background {
        render_options = render_options.with_background(background);
    }
    render_options
}

/// Renders a chord document (JSON or JSON5) to an SVG string.
#[wasm_bindgen]
pub fn render_chord_svg(document: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<ChordRenderOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        ChordRenderOptions::default()
    };

    let render_options = build_render_options(options);
    render_with_options(document, render_options).map_err(|error| JsValue::from_str(&error.to_string()))
}

#[cfg(test)]
mod tests {
    use fretboard_renderer::render_with_options;

    use crate::{ChordRenderOptions, build_render_options};

    #[test]
    fn renders_ukulele_chord_with_page_options() {
        let options: ChordRenderOptions =
            serde_json::from_str(r##"{"background": "#fafafa", "strokeStyle": "#222"}"##)
                .expect("options should parse");
        let svg = render_with_options(
            r#"{chord: {name: "Am", frets: "2000"}}"#,
            build_render_options(options),
        )
        .expect("chord should render");

        assert!(svg.contains("<svg"));
        assert!(svg.contains("<title>Am</title>"));
        assert!(svg.contains("#fafafa"));
        assert!(svg.contains("#222"));
    }

    #[test]
    fn misspelled_option_is_rejected() {
        let parsed = serde_json::from_str::<ChordRenderOptions>(r#"{"strokeColour": "#222"}"#);
        assert!(parsed.is_err());
    }
}
