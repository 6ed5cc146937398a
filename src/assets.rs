//! Raster inputs of a card: the placeholder portrait, badge icons, remote
//! photos and QR codes.

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ::image::{DynamicImage, Luma};
use log::{debug, warn};
use qrcode::{EcLevel, QrCode};

use crate::config::NameplateConfig;
use crate::error::{NameplateError, Result};
use crate::registry::BADGES;

/// Upper bound on a downloaded photo.
const MAX_PHOTO_BYTES: u64 = 10 * 1024 * 1024;

/// Pixels per QR module.
const QR_MODULE_PX: u32 = 10;

/// Portrait to draw in the image block.
#[derive(Debug, Clone)]
pub enum Portrait<'a> {
    Photo(DynamicImage),
    Placeholder(&'a DynamicImage),
}

impl Portrait<'_> {
    pub fn image(&self) -> &DynamicImage {
        match self {
            Portrait::Photo(image) => image,
            Portrait::Placeholder(image) => *image,
        }
    }

    pub fn is_photo(&self) -> bool {
        matches!(self, Portrait::Photo(_))
    }
}

/// Images loaded once per run and shared by every card.
pub struct Assets {
    placeholder: DynamicImage,
    icons: HashMap<&'static str, DynamicImage>,
    agent: ureq::Agent,
}

impl Assets {
    pub fn load(config: &NameplateConfig) -> Result<Self> {
        Self::from_dir(&config.asset_dir, Duration::from_secs(config.fetch_timeout_secs))
    }

    pub fn from_dir(dir: &Path, fetch_timeout: Duration) -> Result<Self> {
        let placeholder = load_image(&dir.join("pictures").join("placeholder.png"))?;

        let mut icons = HashMap::new();
        for badge in BADGES {
            let icon = load_image(&dir.join("icons").join(badge.icon))?;
            icons.insert(badge.icon, icon);
        }

        let agent = ureq::AgentBuilder::new().timeout(fetch_timeout).build();
        debug!("Loaded assets from {}", dir.display());
        Ok(Self { placeholder, icons, agent })
    }

    pub fn placeholder(&self) -> &DynamicImage {
        &self.placeholder
    }

    pub fn icon(&self, name: &str) -> Option<&DynamicImage> {
        self.icons.get(name)
    }

    /// Photo from `url`, or the placeholder when there is no URL or the
    /// download fails.
    pub fn portrait(&self, url: Option<&str>) -> Portrait<'_> {
        let Some(url) = url else {
            return Portrait::Placeholder(&self.placeholder);
        };
        match self.fetch_image(url) {
            Ok(image) => Portrait::Photo(image),
            Err(e) => {
                warn!("{}; using placeholder", e);
                Portrait::Placeholder(&self.placeholder)
            }
        }
    }

    fn fetch_image(&self, url: &str) -> Result<DynamicImage> {
        let fetch_error = |reason: String| NameplateError::Fetch {
            url: url.to_string(),
            reason,
        };

        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| fetch_error(e.to_string()))?;

        let mut bytes = Vec::new();
        response
            .into_reader()
            .take(MAX_PHOTO_BYTES)
            .read_to_end(&mut bytes)
            .map_err(|e| fetch_error(format!("Failed to read response: {}", e)))?;

        ::image::load_from_memory(&bytes).map_err(|e| fetch_error(format!("Failed to decode image: {}", e)))
    }
}

fn load_image(path: &Path) -> Result<DynamicImage> {
    let missing = |reason: String| NameplateError::MissingAsset {
        path: PathBuf::from(path),
        reason,
    };
    let bytes = std::fs::read(path).map_err(|e| missing(e.to_string()))?;
    ::image::load_from_memory(&bytes).map_err(|e| missing(e.to_string()))
}

/// Black-on-white QR code for `text`, without quiet zone.
pub fn generate_qr_image(text: &str) -> Result<DynamicImage> {
    let code = QrCode::with_error_correction_level(text.as_bytes(), EcLevel::L)
        .map_err(|e| NameplateError::QrError(e.to_string()))?;

    let image = code
        .render::<Luma<u8>>()
        .quiet_zone(false)
        .module_dimensions(QR_MODULE_PX, QR_MODULE_PX)
        .build();
    Ok(DynamicImage::ImageLuma8(image))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    use ::image::ImageFormat;

    use crate::testing::asset_dir;

    /// Answer one GET on a local port with `body`; returns the URL to fetch.
    fn serve_once(content_type: &'static str, body: Vec<u8>) -> (String, JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/photo.png", listener.local_addr().unwrap());

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let header = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                content_type,
                body.len()
            );
            stream.write_all(header.as_bytes()).unwrap();
            stream.write_all(&body).unwrap();
        });
        (url, handle)
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::new_rgb8(width, height)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn qr_codes_are_deterministic() {
        let first = generate_qr_image("of56.vercel.app/personnel/4711").unwrap();
        let second = generate_qr_image("of56.vercel.app/personnel/4711").unwrap();
        assert_eq!(first.as_bytes(), second.as_bytes());
        assert_eq!(first.width(), first.height());
        assert_eq!(first.width() % QR_MODULE_PX, 0);

        let other = generate_qr_image("of56.vercel.app/personnel/4712").unwrap();
        assert_ne!(first.as_bytes(), other.as_bytes());
    }

    #[test]
    fn loads_placeholder_and_every_icon() {
        let dir = asset_dir();
        let assets = Assets::from_dir(dir.path(), Duration::from_secs(1)).unwrap();
        assert_eq!(assets.placeholder().width(), 55);
        for badge in BADGES {
            assert!(assets.icon(badge.icon).is_some(), "missing {}", badge.icon);
        }
    }

    #[test]
    fn missing_placeholder_is_a_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Assets::from_dir(dir.path(), Duration::from_secs(1)).err().unwrap();
        match err {
            NameplateError::MissingAsset { path, .. } => assert!(path.ends_with("pictures/placeholder.png")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unreachable_photo_falls_back_to_placeholder() {
        let dir = asset_dir();
        let assets = Assets::from_dir(dir.path(), Duration::from_secs(1)).unwrap();
        let portrait = assets.portrait(Some("http://127.0.0.1:9/photo.png"));
        assert!(!portrait.is_photo());
        assert!(!assets.portrait(None).is_photo());
    }

    #[test]
    fn fetched_photo_replaces_placeholder() {
        let dir = asset_dir();
        let assets = Assets::from_dir(dir.path(), Duration::from_secs(5)).unwrap();
        let (url, server) = serve_once("image/png", png_bytes(20, 30));

        let portrait = assets.portrait(Some(&url));
        server.join().unwrap();

        assert!(portrait.is_photo());
        assert_eq!((portrait.image().width(), portrait.image().height()), (20, 30));
    }

    #[test]
    fn undecodable_photo_falls_back_to_placeholder() {
        let dir = asset_dir();
        let assets = Assets::from_dir(dir.path(), Duration::from_secs(5)).unwrap();
        let (url, server) = serve_once("text/html", b"<html>not found</html>".to_vec());

        let portrait = assets.portrait(Some(&url));
        server.join().unwrap();

        assert!(!portrait.is_photo());
        assert_eq!(portrait.image().width(), 55);
    }
}
