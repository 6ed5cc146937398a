//! Drawing surface abstraction.
//!
//! Blocks issue an ordered stream of stateful calls against a [`Surface`]:
//! colour, line width and font are global state on the surface, exactly as
//! on a PDF content stream. The card resets that state before every block
//! (see [`reset_state`]), so a block may only rely on the defaults below.

use ::image::{DynamicImage, Rgb, RgbImage};
use serde::Deserialize;

use crate::geometry::Rect;

pub mod pdf;
pub mod recording;
pub mod svg;

pub use pdf::PdfSurface;
pub use recording::{DrawOp, RecordingSurface};
pub use svg::SvgSurface;

/// Font size a surface starts with and returns to between blocks.
pub const DEFAULT_FONT_SIZE: f32 = 12.0;

/// Line width a surface starts with and returns to between blocks.
pub const DEFAULT_LINE_WIDTH: f32 = 1.0;

/// RGB colour with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const YELLOW: Color = Color::rgb(1.0, 1.0, 0.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 0.502, 0.0);
    pub const DODGER_BLUE: Color = Color::rgb(0.118, 0.565, 1.0);
    pub const DEEP_SKY_BLUE: Color = Color::rgb(0.0, 0.749, 1.0);
    pub const LIGHT_GREY: Color = Color::rgb(0.827, 0.827, 0.827);
    pub const DARK_GREY: Color = Color::rgb(0.663, 0.663, 0.663);
    pub const CORAL: Color = Color::rgb(1.0, 0.498, 0.314);

    /// `#rrggbb`, used by the SVG backend.
    pub fn to_hex(&self) -> String {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", channel(self.r), channel(self.g), channel(self.b))
    }

    pub fn to_rgb8(&self) -> [u8; 3] {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [channel(self.r), channel(self.g), channel(self.b)]
    }
}

/// Whether a closed shape is filled, stroked or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    Fill,
    Stroke,
    FillStroke,
}

impl Paint {
    /// Outline always, fill only when `fill` is set.
    pub fn outline_or_filled(fill: bool) -> Self {
        if fill {
            Paint::FillStroke
        } else {
            Paint::Stroke
        }
    }
}

/// How a raster image is mapped onto its target rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFit {
    /// Scale both axes independently to cover the rectangle.
    Stretch,
    /// Preserve the aspect ratio, centred inside the rectangle.
    Contain,
}

/// Font family shared by all text on a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    #[default]
    Helvetica,
    Courier,
}

impl FontFamily {
    pub fn regular(self) -> FontFace {
        FontFace { family: self, bold: false }
    }

    pub fn bold(self) -> FontFace {
        FontFace { family: self, bold: true }
    }
}

/// One concrete face of a builtin font family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontFace {
    pub family: FontFamily,
    pub bold: bool,
}

impl FontFace {
    /// PostScript name, e.g. `Helvetica-Bold`.
    pub fn postscript_name(&self) -> &'static str {
        match (self.family, self.bold) {
            (FontFamily::Helvetica, false) => "Helvetica",
            (FontFamily::Helvetica, true) => "Helvetica-Bold",
            (FontFamily::Courier, false) => "Courier",
            (FontFamily::Courier, true) => "Courier-Bold",
        }
    }
}

/// Vector drawing target.
pub trait Surface {
    fn set_fill_color(&mut self, color: Color);
    fn set_stroke_color(&mut self, color: Color);
    fn set_line_width(&mut self, width: f32);
    fn set_font(&mut self, face: FontFace, size: f32);

    fn rect(&mut self, rect: Rect, paint: Paint);
    fn round_rect(&mut self, rect: Rect, radius: f32, paint: Paint);
    fn line(&mut self, from: (f32, f32), to: (f32, f32));
    /// Draw `text` with its baseline starting at `(x, y)` in the current font and fill colour.
    fn text(&mut self, text: &str, x: f32, y: f32);
    fn image(&mut self, image: &DynamicImage, rect: Rect, fit: ImageFit);

    fn save_state(&mut self);
    fn restore_state(&mut self);
    fn translate(&mut self, dx: f32, dy: f32);
    /// Rotate counter-clockwise by `degrees`.
    fn rotate(&mut self, degrees: f32);
    fn scale(&mut self, sx: f32, sy: f32);
}

/// A surface that can hold more than one page.
pub trait PagedSurface: Surface {
    fn new_page(&mut self);
}

/// Put the surface back into the documented default graphics state.
pub fn reset_state(surface: &mut dyn Surface, family: FontFamily) {
    surface.set_fill_color(Color::BLACK);
    surface.set_stroke_color(Color::BLACK);
    surface.set_line_width(DEFAULT_LINE_WIDTH);
    surface.set_font(family.regular(), DEFAULT_FONT_SIZE);
}

/// Draw a square image rotated around `center`, optionally on a white halo
/// of `padding` points.
pub fn draw_rotated_image(
    surface: &mut dyn Surface,
    image: &DynamicImage,
    center: (f32, f32),
    degrees: f32,
    side_length: f32,
    scale: f32,
    padding: f32,
) {
    surface.save_state();
    surface.translate(center.0, center.1);
    surface.rotate(degrees);
    surface.scale(scale, scale);

    let half = side_length / 2.0;
    if padding > 0.0 {
        surface.set_fill_color(Color::WHITE);
        surface.rect(
            Rect::new(-half - padding, -half - padding, side_length + 2.0 * padding, side_length + 2.0 * padding),
            Paint::FillStroke,
        );
    }

    surface.image(image, Rect::new(-half, -half, side_length, side_length), ImageFit::Stretch);
    surface.restore_state();
}

/// Composite transparent pixels onto an opaque `background`.
pub fn flatten_onto(image: &DynamicImage, background: Color) -> DynamicImage {
    let rgba = image.to_rgba8();
    let bg = background.to_rgb8();
    let mut flattened = RgbImage::new(rgba.width(), rgba.height());

    for (x, y, pixel) in rgba.enumerate_pixels() {
        let alpha = pixel[3] as f32 / 255.0;
        let blend = |fg: u8, bg: u8| (fg as f32 * alpha + bg as f32 * (1.0 - alpha)).round() as u8;
        flattened.put_pixel(
            x,
            y,
            Rgb([blend(pixel[0], bg[0]), blend(pixel[1], bg[1]), blend(pixel[2], bg[2])]),
        );
    }
    DynamicImage::ImageRgb8(flattened)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colours() {
        assert_eq!(Color::BLACK.to_hex(), "#000000");
        assert_eq!(Color::DODGER_BLUE.to_hex(), "#1e90ff");
        assert_eq!(Color::CORAL.to_rgb8(), [255, 127, 80]);
    }

    #[test]
    fn transparency_takes_background_colour() {
        let mut image = ::image::RgbaImage::new(3, 1);
        image.put_pixel(1, 0, ::image::Rgba([0, 0, 0, 255]));
        image.put_pixel(2, 0, ::image::Rgba([0, 0, 0, 128]));
        let image = DynamicImage::ImageRgba8(image);

        let on_red = flatten_onto(&image, Color::RED).to_rgb8();
        assert_eq!(on_red.get_pixel(0, 0), &Rgb([255, 0, 0]));
        assert_eq!(on_red.get_pixel(1, 0), &Rgb([0, 0, 0]));
        assert_eq!(on_red.get_pixel(2, 0), &Rgb([127, 0, 0]));

        let on_white = flatten_onto(&image, Color::WHITE).to_rgb8();
        assert_eq!(on_white.get_pixel(0, 0), &Rgb([255, 255, 255]));
    }

    #[test]
    fn rotated_image_is_wrapped_in_saved_state() {
        let image = DynamicImage::new_luma8(4, 4);
        let mut surface = RecordingSurface::new();
        draw_rotated_image(&mut surface, &image, (50.0, 20.0), 315.0, 10.0, 1.0, 3.0);

        let ops = surface.ops();
        assert_eq!(ops.first(), Some(&DrawOp::SaveState));
        assert_eq!(ops.last(), Some(&DrawOp::RestoreState));
        assert!(ops.contains(&DrawOp::Translate { dx: 50.0, dy: 20.0 }));
        assert!(ops.contains(&DrawOp::Rotate { degrees: 315.0 }));
        assert!(ops.contains(&DrawOp::Rect {
            rect: Rect::new(-8.0, -8.0, 16.0, 16.0),
            paint: Paint::FillStroke,
        }));
        assert!(ops.iter().any(|op| matches!(
            op,
            DrawOp::Image { rect, .. } if *rect == Rect::new(-5.0, -5.0, 10.0, 10.0)
        )));
    }
}
