//! Run configuration, optionally loaded from a TOML file.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{NameplateError, Result};
use crate::surface::FontFamily;

/// Physical card size in millimetres.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    pub width_mm: f32,
    pub height_mm: f32,
    /// Top and bottom strip covered by the card holder.
    pub padding_mm: f32,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            width_mm: 100.0,
            height_mm: 22.45,
            padding_mm: 1.725,
        }
    }
}

/// A4 grid spacing, in points.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    pub edge_margin_pt: f32,
    pub grid_gap_pt: f32,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            edge_margin_pt: 15.0,
            grid_gap_pt: 0.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NameplateConfig {
    pub card: CardConfig,
    pub sheet: SheetConfig,
    pub font: FontFamily,
    /// Holds `pictures/placeholder.png` and `icons/*.png`.
    pub asset_dir: PathBuf,
    /// Prefix of the text encoded in each QR code; the personnel id is appended.
    pub qr_base_url: String,
    pub fetch_timeout_secs: u64,
    pub preview_dpi: f32,
}

impl Default for NameplateConfig {
    fn default() -> Self {
        Self {
            card: CardConfig::default(),
            sheet: SheetConfig::default(),
            font: FontFamily::Helvetica,
            asset_dir: PathBuf::from("assets"),
            qr_base_url: "of56.vercel.app/personnel/".to_string(),
            fetch_timeout_secs: 10,
            preview_dpi: 200.0,
        }
    }
}

impl NameplateConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| NameplateError::ConfigError(format!("{}: {}", path.display(), e)))?;
        let config: NameplateConfig = toml::from_str(&content)
            .map_err(|e| NameplateError::ConfigError(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let card = &self.card;
        if card.width_mm <= 0.0 || card.height_mm <= 0.0 {
            return Err(NameplateError::ConfigError(format!(
                "card size must be positive, got {}x{} mm",
                card.width_mm, card.height_mm
            )));
        }
        if card.padding_mm < 0.0 || card.padding_mm * 2.0 >= card.height_mm {
            return Err(NameplateError::ConfigError(format!(
                "padding {} mm leaves no content height on a {} mm card",
                card.padding_mm, card.height_mm
            )));
        }
        if self.preview_dpi <= 0.0 {
            return Err(NameplateError::ConfigError("preview_dpi must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_card_holder() {
        let config = NameplateConfig::default();
        assert_eq!(config.card.width_mm, 100.0);
        assert_eq!(config.card.height_mm, 22.45);
        assert_eq!(config.card.padding_mm, 1.725);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "font = \"courier\"\nqr_base_url = \"example.org/p/\"\n\n[card]\nheight_mm = 25.0"
        )
        .unwrap();

        let config = NameplateConfig::load(file.path()).unwrap();
        assert_eq!(config.font, FontFamily::Courier);
        assert_eq!(config.qr_base_url, "example.org/p/");
        assert_eq!(config.card.height_mm, 25.0);
        assert_eq!(config.card.width_mm, 100.0);
        assert_eq!(config.sheet.edge_margin_pt, 15.0);
    }

    #[test]
    fn rejects_padding_that_eats_the_card() {
        let mut config = NameplateConfig::default();
        config.card.padding_mm = 12.0;
        assert!(matches!(config.validate(), Err(NameplateError::ConfigError(_))));
    }
}
