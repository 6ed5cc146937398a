//! A surface that records every call instead of drawing.
//!
//! Used by tests and by anything that wants to inspect the vector output of
//! a card without producing a document.

use ::image::DynamicImage;

use super::{Color, FontFace, ImageFit, PagedSurface, Paint, Surface};
use crate::geometry::Rect;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    FillColor(Color),
    StrokeColor(Color),
    LineWidth(f32),
    Font { face: FontFace, size: f32 },
    Rect { rect: Rect, paint: Paint },
    RoundRect { rect: Rect, radius: f32, paint: Paint },
    Line { from: (f32, f32), to: (f32, f32) },
    Text { text: String, x: f32, y: f32 },
    Image { width_px: u32, height_px: u32, pixels: Vec<u8>, rect: Rect, fit: ImageFit },
    SaveState,
    RestoreState,
    Translate { dx: f32, dy: f32 },
    Rotate { degrees: f32 },
    Scale { sx: f32, sy: f32 },
    NewPage,
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<DrawOp> {
        self.ops
    }

    /// All text drawn, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Rectangles together with the fill colour that was current when they were drawn.
    pub fn rects(&self) -> Vec<(Rect, Paint, Option<Color>)> {
        let mut fill = None;
        let mut saved = Vec::new();
        let mut rects = Vec::new();
        for op in &self.ops {
            match op {
                DrawOp::FillColor(color) => fill = Some(*color),
                DrawOp::SaveState => saved.push(fill),
                DrawOp::RestoreState => fill = saved.pop().flatten(),
                DrawOp::Rect { rect, paint } => rects.push((*rect, *paint, fill)),
                _ => {}
            }
        }
        rects
    }

    pub fn page_count(&self) -> usize {
        1 + self.ops.iter().filter(|op| **op == DrawOp::NewPage).count()
    }
}

impl Surface for RecordingSurface {
    fn set_fill_color(&mut self, color: Color) {
        self.ops.push(DrawOp::FillColor(color));
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.ops.push(DrawOp::StrokeColor(color));
    }

    fn set_line_width(&mut self, width: f32) {
        self.ops.push(DrawOp::LineWidth(width));
    }

    fn set_font(&mut self, face: FontFace, size: f32) {
        self.ops.push(DrawOp::Font { face, size });
    }

    fn rect(&mut self, rect: Rect, paint: Paint) {
        self.ops.push(DrawOp::Rect { rect, paint });
    }

    fn round_rect(&mut self, rect: Rect, radius: f32, paint: Paint) {
        self.ops.push(DrawOp::RoundRect { rect, radius, paint });
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32)) {
        self.ops.push(DrawOp::Line { from, to });
    }

    fn text(&mut self, text: &str, x: f32, y: f32) {
        self.ops.push(DrawOp::Text { text: text.to_string(), x, y });
    }

    fn image(&mut self, image: &DynamicImage, rect: Rect, fit: ImageFit) {
        self.ops.push(DrawOp::Image {
            width_px: image.width(),
            height_px: image.height(),
            pixels: image.to_luma8().into_raw(),
            rect,
            fit,
        });
    }

    fn save_state(&mut self) {
        self.ops.push(DrawOp::SaveState);
    }

    fn restore_state(&mut self) {
        self.ops.push(DrawOp::RestoreState);
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.ops.push(DrawOp::Translate { dx, dy });
    }

    fn rotate(&mut self, degrees: f32) {
        self.ops.push(DrawOp::Rotate { degrees });
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.ops.push(DrawOp::Scale { sx, sy });
    }
}

impl PagedSurface for RecordingSurface {
    fn new_page(&mut self) {
        self.ops.push(DrawOp::NewPage);
    }
}
