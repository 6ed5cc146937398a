//! Fixtures shared by unit tests.

use std::path::Path;

use ::image::{DynamicImage, Rgba, RgbaImage};
use tempfile::TempDir;

use crate::assets::Assets;
use crate::card::CardContext;
use crate::person::{Function, Person, Qualification};
use crate::registry::BADGES;
use crate::surface::FontFamily;

pub const QR_BASE_URL: &str = "of56.vercel.app/personnel/";

fn write_png(path: &Path, image: DynamicImage) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    image.save(path).unwrap();
}

/// Asset directory with a 55x73 placeholder and a small icon per badge.
pub fn asset_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let placeholder = RgbaImage::from_pixel(55, 73, Rgba([200, 200, 200, 255]));
    write_png(&dir.path().join("pictures/placeholder.png"), DynamicImage::ImageRgba8(placeholder));
    for badge in BADGES {
        let mut icon = RgbaImage::from_pixel(16, 16, Rgba([0, 0, 0, 0]));
        icon.put_pixel(8, 8, Rgba([0, 0, 0, 255]));
        write_png(&dir.path().join("icons").join(badge.icon), DynamicImage::ImageRgba8(icon));
    }
    dir
}

pub fn assets(dir: &TempDir) -> Assets {
    Assets::from_dir(dir.path(), std::time::Duration::from_secs(1)).unwrap()
}

/// The person from the end-to-end scenario: breathing apparatus only, two vehicles.
pub fn anna() -> Person {
    Person::new("Anna", "Müller", Function::Mannschaft)
        .with_qualification(Qualification::Agt)
        .with_instruction("LF 20", true)
        .with_instruction("DLK", false)
}

pub fn context<'a>(person: &'a Person, assets: &'a Assets) -> CardContext<'a> {
    CardContext {
        person,
        assets,
        font: FontFamily::Helvetica,
        qr_base_url: QR_BASE_URL,
    }
}
