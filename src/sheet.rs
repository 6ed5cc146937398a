//! Places cards on pages: a grid on A4 landscape, or one card per label.

use clap::ValueEnum;
use log::{debug, error, info};

use crate::assets::Assets;
use crate::card::{Card, CardContext, CardGeometry};
use crate::config::NameplateConfig;
use crate::error::Result;
use crate::geometry::mm;
use crate::person::Person;
use crate::surface::{PagedSurface, PdfSurface};

const A4_LANDSCAPE_MM: (f32, f32) = (297.0, 210.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PaperSize {
    /// A4 landscape, cards in a grid
    #[default]
    A4,
    /// Label stock, one card per page
    Label,
}

impl PaperSize {
    /// Page size in points.
    pub fn page_size(&self, config: &NameplateConfig) -> (f32, f32) {
        match self {
            PaperSize::A4 => (mm(A4_LANDSCAPE_MM.0), mm(A4_LANDSCAPE_MM.1)),
            PaperSize::Label => (mm(config.card.width_mm), mm(config.card.height_mm)),
        }
    }
}

/// What to do when a person's card cannot be built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    #[default]
    Abort,
    /// Log the failure and continue with the next person.
    Skip,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedCard {
    pub person: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetReport {
    pub cards_drawn: usize,
    pub pages: usize,
    pub skipped: Vec<SkippedCard>,
}

/// Grid cursor for the A4 layout.
struct Cursor {
    x: f32,
    y: f32,
}

pub struct Sheet<'a> {
    config: &'a NameplateConfig,
    assets: &'a Assets,
    paper: PaperSize,
    policy: ErrorPolicy,
}

impl<'a> Sheet<'a> {
    pub fn new(config: &'a NameplateConfig, assets: &'a Assets, paper: PaperSize, policy: ErrorPolicy) -> Self {
        Self {
            config,
            assets,
            paper,
            policy,
        }
    }

    /// Render all persons into a new PDF document.
    pub fn render_pdf(&self, title: &str, persons: &[Person]) -> Result<(PdfSurface, SheetReport)> {
        let (width, height) = self.paper.page_size(self.config);
        let mut surface = PdfSurface::new(title, width, height)?;
        let report = self.render(persons, &mut surface)?;
        Ok((surface, report))
    }

    /// Render all persons onto `surface`, which must start with one empty page.
    pub fn render<S: PagedSurface>(&self, persons: &[Person], surface: &mut S) -> Result<SheetReport> {
        let (page_width, page_height) = self.paper.page_size(self.config);
        let card_width = mm(self.config.card.width_mm);
        let card_height = mm(self.config.card.height_mm);
        let margin = self.config.sheet.edge_margin_pt;
        let gap = self.config.sheet.grid_gap_pt;
        let first_row = page_height - card_height - margin;

        let mut report = SheetReport {
            pages: 1,
            ..SheetReport::default()
        };
        let mut cursor = Cursor {
            x: margin,
            y: first_row,
        };

        for person in persons {
            let context = CardContext {
                person,
                assets: self.assets,
                font: self.config.font,
                qr_base_url: &self.config.qr_base_url,
            };

            let (x, y, needs_page) = match self.paper {
                PaperSize::Label => (0.0, 0.0, report.cards_drawn > 0),
                PaperSize::A4 if cursor.y < margin => (margin, first_row, true),
                PaperSize::A4 => (cursor.x, cursor.y, false),
            };

            let card = match self.prepare(&context, x, y) {
                Ok(card) => card,
                Err(e) => {
                    let e = e.for_person(person.display_name());
                    if self.policy == ErrorPolicy::Abort {
                        return Err(e);
                    }
                    error!("Skipping card: {}", e);
                    report.skipped.push(SkippedCard {
                        person: person.display_name(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            if needs_page {
                surface.new_page();
                report.pages += 1;
                debug!("Started page {}", report.pages);
            }

            card.draw(surface).map_err(|e| e.for_person(person.display_name()))?;
            report.cards_drawn += 1;

            if self.paper == PaperSize::A4 {
                cursor.x = x + card_width;
                cursor.y = y;
                if cursor.x + card_width > page_width - margin {
                    cursor.x = margin;
                    cursor.y -= card_height + gap;
                }
            }
        }

        info!(
            "Rendered {} cards on {} pages ({} skipped)",
            report.cards_drawn,
            report.pages,
            report.skipped.len()
        );
        Ok(report)
    }

    /// Build and lay out a card without touching the surface.
    fn prepare<'c>(&self, context: &'c CardContext<'c>, x: f32, y: f32) -> Result<Card<'c>> {
        let mut card = Card::new(context, CardGeometry::from_config(x, y, &self.config.card))?;
        card.layout()?;
        Ok(card)
    }
}
