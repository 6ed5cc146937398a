//! Single-card PNG preview: draw onto an SVG surface, rasterize with resvg.

use log::debug;
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{fontdb, Options, Tree};

use crate::assets::Assets;
use crate::card::{Card, CardContext, CardGeometry};
use crate::config::NameplateConfig;
use crate::error::{NameplateError, Result};
use crate::geometry::mm;
use crate::person::Person;
use crate::surface::SvgSurface;

/// The card as a standalone SVG document, card-sized, origin at (0, 0).
pub fn render_svg(person: &Person, config: &NameplateConfig, assets: &Assets) -> Result<String> {
    let context = CardContext {
        person,
        assets,
        font: config.font,
        qr_base_url: &config.qr_base_url,
    };
    let geometry = CardGeometry::from_config(0.0, 0.0, &config.card);

    let mut surface = SvgSurface::new(mm(config.card.width_mm), mm(config.card.height_mm));
    Card::new(&context, geometry)?.draw(&mut surface)?;
    Ok(surface.finish())
}

/// The card rasterized at `config.preview_dpi`, PNG-encoded.
pub fn render_png(person: &Person, config: &NameplateConfig, assets: &Assets) -> Result<Vec<u8>> {
    let svg = render_svg(person, config, assets)?;
    rasterize(&svg, config.preview_dpi / 72.0)
}

fn rasterize(svg: &str, scale: f32) -> Result<Vec<u8>> {
    let mut fonts = fontdb::Database::new();
    fonts.load_system_fonts();

    let tree = Tree::from_str(svg, &Options::default(), &fonts)
        .map_err(|e| NameplateError::PreviewError(format!("Failed to parse SVG: {}", e)))?;

    let size = tree.size();
    let width = (size.width() * scale).ceil() as u32;
    let height = (size.height() * scale).ceil() as u32;
    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| NameplateError::PreviewError(format!("Cannot allocate {}x{} pixmap", width, height)))?;

    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());
    debug!("Rasterized preview at {}x{} px", width, height);

    pixmap
        .encode_png()
        .map_err(|e| NameplateError::PreviewError(e.to_string()))
}
