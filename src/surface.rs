//! Drawing surfaces.
//!
//! Renderers only ever talk to a [`Surface`]: filled rectangles (strings and
//! fret wires are thin rectangles), circles and text. [`SvgSurface`] turns the
//! calls into an SVG document, [`RecordingSurface`] keeps them as
//! [`DrawCommand`]s.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Paint {
    /// Solid fill.
    Fill { color: String },
    /// No fill, outline stroked in `color`.
    Outline { color: String, width: f32 },
}

impl Paint {
    pub fn fill(color: impl Into<String>) -> Self {
        Self::Fill {
            color: color.into(),
        }
    }

    pub fn outline(color: impl Into<String>, width: f32) -> Self {
        Self::Outline {
            color: color.into(),
            width,
        }
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, Self::Fill { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Font {
    pub family: String,
    pub size: f32,
    pub color: String,
}

pub trait Surface {
    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, fill: &str);
    fn circle(&mut self, cx: f32, cy: f32, r: f32, paint: &Paint);
    fn text(&mut self, x: f32, y: f32, content: &str, font: &Font);
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DrawCommand {
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: String,
    },
    Circle {
        cx: f32,
        cy: f32,
        r: f32,
        paint: Paint,
    },
    Text {
        x: f32,
        y: f32,
        content: String,
        font: Font,
    },
}

/// Keeps every primitive in call order.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rects(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|cmd| matches!(cmd, DrawCommand::Rect { .. }))
    }

    pub fn circles(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|cmd| matches!(cmd, DrawCommand::Circle { .. }))
    }

    pub fn texts(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|cmd| matches!(cmd, DrawCommand::Text { .. }))
    }

    /// Replays the recorded primitives onto another surface.
    pub fn replay<S: Surface + ?Sized>(&self, target: &mut S) {
        for cmd in &self.commands {
            match cmd {
                DrawCommand::Rect {
                    x,
                    y,
                    width,
                    height,
                    fill,
                } => target.rect(*x, *y, *width, *height, fill),
                DrawCommand::Circle { cx, cy, r, paint } => target.circle(*cx, *cy, *r, paint),
                DrawCommand::Text { x, y, content, font } => target.text(*x, *y, content, font),
            }
        }
    }
}

impl Surface for RecordingSurface {
    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, fill: &str) {
        self.commands.push(DrawCommand::Rect {
            x,
            y,
            width,
            height,
            fill: fill.to_string(),
        });
    }

    fn circle(&mut self, cx: f32, cy: f32, r: f32, paint: &Paint) {
        self.commands.push(DrawCommand::Circle {
            cx,
            cy,
            r,
            paint: paint.clone(),
        });
    }

    fn text(&mut self, x: f32, y: f32, content: &str, font: &Font) {
        self.commands.push(DrawCommand::Text {
            x,
            y,
            content: content.to_string(),
            font: font.clone(),
        });
    }
}

/// Accumulates SVG elements; [`SvgSurface::finish`] wraps them in the root
/// `<svg>` element.
#[derive(Debug, Clone)]
pub struct SvgSurface {
    width: f32,
    height: f32,
    title: Option<String>,
    background: Option<String>,
    elements: Vec<String>,
}

impl SvgSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            title: None,
            background: None,
            elements: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_background(mut self, background: impl Into<String>) -> Self {
        self.background = Some(background.into());
        self
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn finish(self) -> String {
        let width = self.width;
        let height = self.height;
        let mut svg = String::new();
        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
        ));
        if let Some(title) = &self.title {
            svg.push_str(&format!("<title>{}</title>", escape_xml(title)));
        }
        if let Some(background) = &self.background {
            svg.push_str(&format!(
                "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
                escape_xml(background)
            ));
        }
        for element in &self.elements {
            svg.push_str(element);
        }
        svg.push_str("</svg>");
        svg
    }
}

impl Surface for SvgSurface {
    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, fill: &str) {
        self.elements.push(format!(
            "<rect x=\"{x:.2}\" y=\"{y:.2}\" width=\"{width:.2}\" height=\"{height:.2}\" fill=\"{}\"/>",
            escape_xml(fill)
        ));
    }

    fn circle(&mut self, cx: f32, cy: f32, r: f32, paint: &Paint) {
        let style = match paint {
            Paint::Fill { color } => format!("fill=\"{}\"", escape_xml(color)),
            Paint::Outline { color, width } => format!(
                "fill=\"none\" stroke=\"{}\" stroke-width=\"{width:.2}\"",
                escape_xml(color)
            ),
        };
        self.elements.push(format!(
            "<circle cx=\"{cx:.2}\" cy=\"{cy:.2}\" r=\"{r:.2}\" {style}/>"
        ));
    }

    fn text(&mut self, x: f32, y: f32, content: &str, font: &Font) {
        self.elements.push(format!(
            "<text x=\"{x:.2}\" y=\"{y:.2}\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
            escape_xml(&font.family),
            font.size,
            escape_xml(&font.color),
            escape_xml(content)
        ));
    }
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
