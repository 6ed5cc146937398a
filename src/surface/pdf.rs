//! printpdf backend.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use ::image::DynamicImage;
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color as PdfColor, ColorBits, ColorSpace, CurTransMat, Image, ImageTransform,
    ImageXObject, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
    Point, Polygon, Pt, Px, Rgb,
};

use super::{
    flatten_onto, Color, FontFace, FontFamily, ImageFit, PagedSurface, Paint, Surface,
    DEFAULT_FONT_SIZE,
};
use crate::error::{NameplateError, Result};
use crate::geometry::{pt_to_mm, Rect};

/// Resolution images are embedded at before scaling to their target size.
const IMAGE_DPI: f32 = 300.0;

/// Bezier handle length for a quarter circle of radius 1.
const KAPPA: f32 = 0.552_284_8;

const LAYER_NAME: &str = "Layer 1";

/// A PDF document whose pages are all the same size.
pub struct PdfSurface {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    page_width: f32,
    page_height: f32,
    fonts: HashMap<FontFace, IndirectFontRef>,
    font: (FontFace, f32),
    saved_fonts: Vec<(FontFace, f32)>,
}

impl PdfSurface {
    /// Create a document with one page of `width` x `height` points.
    pub fn new(title: &str, width: f32, height: f32) -> Result<Self> {
        let (doc, page1, layer1) = PdfDocument::new(
            title,
            Mm(pt_to_mm(width)),
            Mm(pt_to_mm(height)),
            LAYER_NAME,
        );
        let layer = doc.get_page(page1).get_layer(layer1);

        let mut fonts = HashMap::new();
        for (face, builtin) in [
            (FontFamily::Helvetica.regular(), BuiltinFont::Helvetica),
            (FontFamily::Helvetica.bold(), BuiltinFont::HelveticaBold),
            (FontFamily::Courier.regular(), BuiltinFont::Courier),
            (FontFamily::Courier.bold(), BuiltinFont::CourierBold),
        ] {
            let font = doc
                .add_builtin_font(builtin)
                .map_err(|e| NameplateError::PdfError(e.to_string()))?;
            fonts.insert(face, font);
        }

        Ok(Self {
            doc,
            layer,
            page_width: width,
            page_height: height,
            fonts,
            font: (FontFamily::Helvetica.regular(), DEFAULT_FONT_SIZE),
            saved_fonts: Vec::new(),
        })
    }

    pub fn into_bytes(self) -> Result<Vec<u8>> {
        self.doc
            .save_to_bytes()
            .map_err(|e| NameplateError::PdfError(e.to_string()))
    }

    pub fn save(self, output_path: &Path) -> Result<()> {
        let file = File::create(output_path)?;
        let mut writer = BufWriter::new(file);
        self.doc
            .save(&mut writer)
            .map_err(|e| NameplateError::PdfError(e.to_string()))
    }

    fn closed_shape(&self, ring: Vec<(Point, bool)>, paint: Paint) {
        let mode = match paint {
            Paint::Fill => PaintMode::Fill,
            Paint::Stroke => PaintMode::Stroke,
            Paint::FillStroke => PaintMode::FillStroke,
        };
        self.layer.add_polygon(Polygon {
            rings: vec![ring],
            mode,
            winding_order: WindingOrder::NonZero,
        });
    }
}

fn point(x: f32, y: f32) -> Point {
    Point::new(Mm(pt_to_mm(x)), Mm(pt_to_mm(y)))
}

fn pdf_color(color: Color) -> PdfColor {
    PdfColor::Rgb(Rgb::new(color.r, color.g, color.b, None))
}

impl Surface for PdfSurface {
    fn set_fill_color(&mut self, color: Color) {
        self.layer.set_fill_color(pdf_color(color));
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.layer.set_outline_color(pdf_color(color));
    }

    fn set_line_width(&mut self, width: f32) {
        self.layer.set_outline_thickness(width);
    }

    fn set_font(&mut self, face: FontFace, size: f32) {
        self.font = (face, size);
    }

    fn rect(&mut self, rect: Rect, paint: Paint) {
        let ring = vec![
            (point(rect.x, rect.y), false),
            (point(rect.right_edge(), rect.y), false),
            (point(rect.right_edge(), rect.top()), false),
            (point(rect.x, rect.top()), false),
        ];
        self.closed_shape(ring, paint);
    }

    fn round_rect(&mut self, rect: Rect, radius: f32, paint: Paint) {
        let r = radius.min(rect.width / 2.0).min(rect.height / 2.0).max(0.0);
        if r <= 0.0 {
            self.rect(rect, paint);
            return;
        }
        let k = r * KAPPA;
        let (left, bottom, right, top) = (rect.x, rect.y, rect.right_edge(), rect.top());

        // Corner arcs are (handle, handle, end) triples.
        let ring = vec![
            (point(left + r, bottom), false),
            (point(right - r, bottom), false),
            (point(right - r + k, bottom), true),
            (point(right, bottom + r - k), true),
            (point(right, bottom + r), false),
            (point(right, top - r), false),
            (point(right, top - r + k), true),
            (point(right - r + k, top), true),
            (point(right - r, top), false),
            (point(left + r, top), false),
            (point(left + r - k, top), true),
            (point(left, top - r + k), true),
            (point(left, top - r), false),
            (point(left, bottom + r), false),
            (point(left, bottom + r - k), true),
            (point(left + r - k, bottom), true),
            (point(left + r, bottom), false),
        ];
        self.closed_shape(ring, paint);
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32)) {
        let line = Line {
            points: vec![(point(from.0, from.1), false), (point(to.0, to.1), false)],
            is_closed: false,
        };
        self.layer.add_line(line);
    }

    fn text(&mut self, text: &str, x: f32, y: f32) {
        let (face, size) = self.font;
        if let Some(font) = self.fonts.get(&face) {
            self.layer.use_text(text, size, Mm(pt_to_mm(x)), Mm(pt_to_mm(y)), font);
        }
    }

    fn image(&mut self, image: &DynamicImage, rect: Rect, fit: ImageFit) {
        let target = match fit {
            ImageFit::Stretch => rect,
            ImageFit::Contain => rect.fit_aspect(image.width() as f32 / image.height() as f32),
        };

        // The builtin image path has no soft mask.
        let rgb_image = flatten_onto(image, Color::WHITE).to_rgb8();
        let (width_px, height_px) = rgb_image.dimensions();
        let raw_pixels = rgb_image.into_raw();

        let pdf_image = Image::from(ImageXObject {
            width: Px(width_px as usize),
            height: Px(height_px as usize),
            color_space: ColorSpace::Rgb,
            bits_per_component: ColorBits::Bit8,
            interpolate: true,
            image_data: raw_pixels,
            image_filter: None,
            clipping_bbox: None,
            smask: None,
        });

        // Natural size at IMAGE_DPI, then scaled per axis onto the target.
        let natural_width_mm = width_px as f32 / IMAGE_DPI * 25.4;
        let natural_height_mm = height_px as f32 / IMAGE_DPI * 25.4;

        pdf_image.add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(pt_to_mm(target.x))),
                translate_y: Some(Mm(pt_to_mm(target.y))),
                scale_x: Some(pt_to_mm(target.width) / natural_width_mm),
                scale_y: Some(pt_to_mm(target.height) / natural_height_mm),
                dpi: Some(IMAGE_DPI),
                ..Default::default()
            },
        );
    }

    fn save_state(&mut self) {
        self.saved_fonts.push(self.font);
        self.layer.save_graphics_state();
    }

    fn restore_state(&mut self) {
        if let Some(font) = self.saved_fonts.pop() {
            self.font = font;
            self.layer.restore_graphics_state();
        }
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.layer
            .set_ctm(CurTransMat::Translate(Pt(dx), Pt(dy)));
    }

    fn rotate(&mut self, degrees: f32) {
        self.layer.set_ctm(CurTransMat::Rotate(degrees));
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.layer.set_ctm(CurTransMat::Scale(sx, sy));
    }
}

impl PagedSurface for PdfSurface {
    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(
            Mm(pt_to_mm(self.page_width)),
            Mm(pt_to_mm(self.page_height)),
            LAYER_NAME,
        );
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.saved_fonts.clear();
    }
}
