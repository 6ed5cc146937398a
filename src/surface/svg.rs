//! SVG backend, used for single-card previews.
//!
//! Card coordinates have their origin bottom-left; the whole drawing is
//! wrapped in a y-flip so shapes can be emitted unchanged. Text and images
//! are flipped back locally so they stay upright.

use std::io::Cursor;

use ::image::{DynamicImage, ImageFormat};
use base64::{engine::general_purpose, Engine as _};
use log::warn;
use svg::node::element::{Group, Image, Line, Rectangle, Text};
use svg::node::Text as TextNode;
use svg::{Document, Node};

use super::{
    Color, FontFace, FontFamily, ImageFit, Paint, Surface, DEFAULT_FONT_SIZE, DEFAULT_LINE_WIDTH,
};
use crate::geometry::Rect;

#[derive(Debug, Clone, Copy)]
struct GraphicsState {
    fill: Color,
    stroke: Color,
    line_width: f32,
    font: FontFace,
    font_size: f32,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            fill: Color::BLACK,
            stroke: Color::BLACK,
            line_width: DEFAULT_LINE_WIDTH,
            font: FontFamily::Helvetica.regular(),
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

/// An open `<g>`: either a saved graphics state or a transform inside one.
struct Frame {
    group: Group,
    saved: Option<GraphicsState>,
}

pub struct SvgSurface {
    width: f32,
    height: f32,
    state: GraphicsState,
    frames: Vec<Frame>,
}

impl SvgSurface {
    pub fn new(width: f32, height: f32) -> Self {
        let root = Group::new().set("transform", format!("matrix(1 0 0 -1 0 {})", height));
        Self {
            width,
            height,
            state: GraphicsState::default(),
            frames: vec![Frame { group: root, saved: None }],
        }
    }

    /// Close every open group and serialise the document.
    pub fn finish(mut self) -> String {
        while self.frames.len() > 1 {
            self.pop_frame();
        }
        let root = self.frames.pop().map(|frame| frame.group).unwrap_or_else(Group::new);
        let background = Rectangle::new()
            .set("width", self.width)
            .set("height", self.height)
            .set("fill", "#ffffff");
        Document::new()
            .set("width", self.width)
            .set("height", self.height)
            .set("viewBox", (0.0, 0.0, self.width, self.height))
            .add(background)
            .add(root)
            .to_string()
    }

    fn append<T: Into<Box<dyn Node>>>(&mut self, node: T) {
        if let Some(frame) = self.frames.last_mut() {
            frame.group.append(node);
        }
    }

    fn pop_frame(&mut self) -> Option<GraphicsState> {
        let frame = self.frames.pop()?;
        self.append(frame.group);
        frame.saved
    }

    fn push_transform(&mut self, transform: String) {
        self.frames.push(Frame {
            group: Group::new().set("transform", transform),
            saved: None,
        });
    }

    fn fill_attr(&self, paint: Paint) -> String {
        match paint {
            Paint::Stroke => "none".to_string(),
            Paint::Fill | Paint::FillStroke => self.state.fill.to_hex(),
        }
    }

    fn stroke_attr(&self, paint: Paint) -> String {
        match paint {
            Paint::Fill => "none".to_string(),
            Paint::Stroke | Paint::FillStroke => self.state.stroke.to_hex(),
        }
    }

    fn font_family(face: FontFace) -> &'static str {
        match face.family {
            FontFamily::Helvetica => "Helvetica, Arial, Liberation Sans, sans-serif",
            FontFamily::Courier => "Courier, Courier New, Liberation Mono, monospace",
        }
    }
}

fn png_data_uri(image: &DynamicImage) -> Option<String> {
    let mut bytes = Vec::new();
    if let Err(e) = image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png) {
        warn!("Skipping image in SVG preview: {}", e);
        return None;
    }
    Some(format!("data:image/png;base64,{}", general_purpose::STANDARD.encode(bytes)))
}

impl Surface for SvgSurface {
    fn set_fill_color(&mut self, color: Color) {
        self.state.fill = color;
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.state.stroke = color;
    }

    fn set_line_width(&mut self, width: f32) {
        self.state.line_width = width;
    }

    fn set_font(&mut self, face: FontFace, size: f32) {
        self.state.font = face;
        self.state.font_size = size;
    }

    fn rect(&mut self, rect: Rect, paint: Paint) {
        let node = Rectangle::new()
            .set("x", rect.x)
            .set("y", rect.y)
            .set("width", rect.width)
            .set("height", rect.height)
            .set("fill", self.fill_attr(paint))
            .set("stroke", self.stroke_attr(paint))
            .set("stroke-width", self.state.line_width);
        self.append(node);
    }

    fn round_rect(&mut self, rect: Rect, radius: f32, paint: Paint) {
        let node = Rectangle::new()
            .set("x", rect.x)
            .set("y", rect.y)
            .set("width", rect.width)
            .set("height", rect.height)
            .set("rx", radius)
            .set("ry", radius)
            .set("fill", self.fill_attr(paint))
            .set("stroke", self.stroke_attr(paint))
            .set("stroke-width", self.state.line_width);
        self.append(node);
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32)) {
        let node = Line::new()
            .set("x1", from.0)
            .set("y1", from.1)
            .set("x2", to.0)
            .set("y2", to.1)
            .set("stroke", self.state.stroke.to_hex())
            .set("stroke-width", self.state.line_width);
        self.append(node);
    }

    fn text(&mut self, text: &str, x: f32, y: f32) {
        let node = Text::new()
            .set("transform", format!("translate({} {}) scale(1 -1)", x, y))
            .set("font-family", Self::font_family(self.state.font))
            .set("font-size", self.state.font_size)
            .set("font-weight", if self.state.font.bold { "bold" } else { "normal" })
            .set("fill", self.state.fill.to_hex())
            .add(TextNode::new(text));
        self.append(node);
    }

    fn image(&mut self, image: &DynamicImage, rect: Rect, fit: ImageFit) {
        let Some(href) = png_data_uri(image) else {
            return;
        };
        let target = match fit {
            ImageFit::Stretch => rect,
            ImageFit::Contain => rect.fit_aspect(image.width() as f32 / image.height() as f32),
        };
        let node = Image::new()
            .set("width", target.width)
            .set("height", target.height)
            .set("preserveAspectRatio", "none")
            .set("transform", format!("translate({} {}) scale(1 -1)", target.x, target.top()))
            .set("href", href);
        self.append(node);
    }

    fn save_state(&mut self) {
        self.frames.push(Frame {
            group: Group::new(),
            saved: Some(self.state),
        });
    }

    fn restore_state(&mut self) {
        while self.frames.len() > 1 {
            if let Some(saved) = self.pop_frame() {
                self.state = saved;
                return;
            }
        }
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.push_transform(format!("translate({} {})", dx, dy));
    }

    fn rotate(&mut self, degrees: f32) {
        self.push_transform(format!("rotate({})", degrees));
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.push_transform(format!("scale({} {})", sx, sy));
    }
}
