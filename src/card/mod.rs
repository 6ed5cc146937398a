//! One person's card: four blocks in a single row.
//!
//! ```text
//! +-------------------------------------------------------+
//! | Image | Last Name    |                |               |
//! |       | First Name   | Vehicle        | Technical     |
//! |-------|              | instructions   | badge & QR    |
//! | Func. | Role bars    |                |               |
//! +-------------------------------------------------------+
//! ```
//!
//! Widths are resolved in two passes: intrinsic widths first, then the
//! remaining content width is shared evenly by the blocks that have none.
//! Each block then starts at the right edge of the one before it.

use log::debug;

use crate::assets::Assets;
use crate::config::CardConfig;
use crate::error::{NameplateError, Result};
use crate::geometry::{mm, Dimensions, Rect};
use crate::person::Person;
use crate::surface::{reset_state, Color, FontFamily, Paint, Surface};

pub mod blocks;

pub use blocks::{Block, ImageBlock, MainContentBlock, QualificationsBlock, VehicleInstructionsBlock};

/// Font sizes in points.
pub(crate) mod font_size {
    pub const LAST_NAME: f32 = 15.0;
    pub const FIRST_NAME: f32 = 12.0;
    pub const FUNCTION_LABEL: f32 = 6.0;
    pub const PERSONNEL_ID: f32 = 8.0;
}

/// Read-only inputs shared by all blocks of a card.
pub struct CardContext<'a> {
    pub person: &'a Person,
    pub assets: &'a Assets,
    pub font: FontFamily,
    /// The personnel id is appended to this to form the QR payload.
    pub qr_base_url: &'a str,
}

/// Outer card rectangle and the content rectangle inside the holder strips.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardGeometry {
    pub outer: Rect,
    pub content: Rect,
}

impl CardGeometry {
    /// `x`/`y` in points; size and padding in millimetres.
    pub fn new(x: f32, y: f32, width_mm: f32, height_mm: f32, padding_mm: f32) -> Self {
        let outer = Rect::new(x, y, mm(width_mm), mm(height_mm));
        Self {
            outer,
            content: outer.inset_vertical(mm(padding_mm)),
        }
    }

    pub fn from_config(x: f32, y: f32, card: &CardConfig) -> Self {
        Self::new(x, y, card.width_mm, card.height_mm, card.padding_mm)
    }
}

pub struct Card<'a> {
    context: &'a CardContext<'a>,
    geometry: CardGeometry,
    blocks: [Block<'a>; 4],
}

impl<'a> Card<'a> {
    /// Build the blocks. Everything that can fail (missing instructions,
    /// badge geometry, QR encoding, photo lookup) happens here, before any
    /// drawing.
    pub fn new(context: &'a CardContext<'a>, geometry: CardGeometry) -> Result<Self> {
        let content = geometry.content;
        let dims = |x: Option<f32>, width: Option<f32>| Dimensions::new(x, content.y, width, content.height);

        let blocks = [
            Block::Image(ImageBlock::new(context, dims(Some(content.x), None))),
            Block::MainContent(MainContentBlock::new(context, dims(None, None))),
            Block::VehicleInstructions(VehicleInstructionsBlock::new(context, dims(None, None))?),
            Block::Qualifications(QualificationsBlock::new(context, dims(None, Some(content.height)))?),
        ];

        Ok(Self { context, geometry, blocks })
    }

    /// Resolve widths and positions of all blocks and return their rectangles.
    pub fn layout(&mut self) -> Result<Vec<Rect>> {
        let content = self.geometry.content;
        let widths: Vec<Option<f32>> = self.blocks.iter().map(Block::width).collect();
        let resolved = resolve_widths(content.width, &widths)?;

        let mut next_x = Some(content.x);
        for (block, width) in self.blocks.iter_mut().zip(resolved) {
            let x = next_x.ok_or_else(|| NameplateError::Layout(format!("no left edge for {} block", block.name())))?;
            if width < block.min_width() {
                return Err(NameplateError::Layout(format!(
                    "{} block is {:.2}pt wide, needs at least {:.2}pt",
                    block.name(),
                    width,
                    block.min_width()
                )));
            }
            block.set_width(width);
            block.set_x(x);
            next_x = block.right_edge();
        }

        let rects = self
            .blocks
            .iter()
            .map(|block| {
                block
                    .dimensions()
                    .resolved()
                    .ok_or_else(|| NameplateError::Layout(format!("{} block left unresolved", block.name())))
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "Card for {}: block widths {:?}",
            self.context.person.display_name(),
            rects.iter().map(|r| r.width).collect::<Vec<_>>()
        );
        Ok(rects)
    }

    /// Lay out and draw the card. The card is consumed; cards are never reused.
    pub fn draw(mut self, surface: &mut dyn Surface) -> Result<()> {
        self.layout()?;

        for block in &self.blocks {
            reset_state(surface, self.context.font);
            block.draw(surface)?;
        }

        reset_state(surface, self.context.font);
        self.draw_main_borders(surface);
        Ok(())
    }

    fn draw_main_borders(&self, surface: &mut dyn Surface) {
        surface.set_stroke_color(Color::BLACK);
        surface.rect(self.geometry.outer, Paint::Stroke);
        surface.rect(self.geometry.content, Paint::Stroke);
    }
}

/// Fill in missing widths by sharing what is left of `available` evenly.
pub fn resolve_widths(available: f32, widths: &[Option<f32>]) -> Result<Vec<f32>> {
    let used: f32 = widths.iter().flatten().sum();
    let flexible = widths.iter().filter(|width| width.is_none()).count();
    let remaining = available - used;

    if remaining < 0.0 {
        return Err(NameplateError::Layout(format!(
            "blocks need {:.2}pt but only {:.2}pt are available",
            used, available
        )));
    }
    if flexible == 0 {
        return Ok(widths.iter().flatten().copied().collect());
    }

    let share = remaining / flexible as f32;
    Ok(widths.iter().map(|width| width.unwrap_or(share)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::pt_to_mm;
    use crate::person::{Function, Qualification};
    use crate::surface::{DrawOp, RecordingSurface};
    use crate::testing::{anna, asset_dir, assets, context};

    const EPSILON: f32 = 1e-3;

    fn default_geometry() -> CardGeometry {
        CardGeometry::new(0.0, 0.0, 100.0, 22.45, 1.725)
    }

    #[test]
    fn flexible_blocks_share_remaining_width_evenly() {
        let widths = resolve_widths(100.0, &[Some(20.0), None, Some(10.0), None]).unwrap();
        assert_eq!(widths, vec![20.0, 35.0, 10.0, 35.0]);
    }

    #[test]
    fn overfull_row_is_a_layout_error() {
        let err = resolve_widths(50.0, &[Some(40.0), None, Some(20.0)]).unwrap_err();
        assert!(matches!(err, NameplateError::Layout(_)));
    }

    #[test]
    fn geometry_insets_only_vertically() {
        let geometry = CardGeometry::new(15.0, 100.0, 100.0, 22.45, 1.725);
        assert_eq!(geometry.content.x, 15.0);
        assert_eq!(geometry.content.width, geometry.outer.width);
        assert!((geometry.content.y - (100.0 + mm(1.725))).abs() < EPSILON);
        assert!((geometry.content.height - mm(22.45 - 2.0 * 1.725)).abs() < EPSILON);
    }

    #[test]
    fn blocks_fill_content_width_contiguously() {
        let dir = asset_dir();
        let assets = assets(&dir);
        let person = anna();
        let ctx = context(&person, &assets);
        let geometry = default_geometry();
        let mut card = Card::new(&ctx, geometry).unwrap();

        let rects = card.layout().unwrap();
        assert_eq!(rects.len(), 4);

        let total: f32 = rects.iter().map(|r| r.width).sum();
        assert!((total - geometry.content.width).abs() < EPSILON);
        assert_eq!(rects[0].x, geometry.content.x);
        for pair in rects.windows(2) {
            assert!((pair[1].x - pair[0].right_edge()).abs() < EPSILON);
        }
        for rect in &rects {
            assert_eq!(rect.y, geometry.content.y);
            assert_eq!(rect.height, geometry.content.height);
        }
        // The badge stays square.
        assert!((rects[3].width - rects[3].height).abs() < EPSILON);
    }

    #[test]
    fn card_without_instructions_fails_before_drawing() {
        let dir = asset_dir();
        let assets = assets(&dir);
        let person = Person::new("Carl", "Weber", Function::Kraftfahrer);
        let ctx = context(&person, &assets);

        let err = Card::new(&ctx, default_geometry()).err().unwrap();
        match err {
            NameplateError::EmptyInstructions { person } => assert_eq!(person, "Weber, Carl"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn too_narrow_card_reports_layout_error() {
        let dir = asset_dir();
        let assets = assets(&dir);
        let person = anna().with_instruction("Wechselladerfahrzeug mit Abrollbehälter", true);
        let ctx = context(&person, &assets);
        let card = Card::new(&ctx, CardGeometry::new(0.0, 0.0, 30.0, 22.45, 1.725)).unwrap();

        let mut surface = RecordingSurface::new();
        let err = card.draw(&mut surface).unwrap_err();
        assert!(matches!(err, NameplateError::Layout(_)));
        assert!(surface.ops().is_empty());
    }

    #[test]
    fn squeezed_main_block_reports_layout_error() {
        let dir = asset_dir();
        let assets = assets(&dir);
        let person = anna().with_qualification(Qualification::Truppfuehrer);
        let ctx = context(&person, &assets);

        let fixed: f32 = Card::new(&ctx, default_geometry())
            .unwrap()
            .blocks
            .iter()
            .filter_map(Block::width)
            .sum();
        let narrow = CardGeometry::new(0.0, 0.0, pt_to_mm(fixed + 5.0), 22.45, 1.725);
        let mut card = Card::new(&ctx, narrow).unwrap();

        match card.layout().unwrap_err() {
            NameplateError::Layout(message) => assert!(message.contains("main content"), "{message}"),
            other => panic!("unexpected error: {other}"),
        }

        let roomy = CardGeometry::new(0.0, 0.0, pt_to_mm(fixed + MainContentBlock::MIN_WIDTH + 1.0), 22.45, 1.725);
        assert!(Card::new(&ctx, roomy).unwrap().layout().is_ok());
    }

    #[test]
    fn end_to_end_scenario() {
        let dir = asset_dir();
        let assets = assets(&dir);
        let person = anna();
        let ctx = context(&person, &assets);
        let geometry = default_geometry();

        let mut surface = RecordingSurface::new();
        Card::new(&ctx, geometry).unwrap().draw(&mut surface).unwrap();

        // Names stacked, last name first and higher up.
        let text_pos = |wanted: &str| {
            surface.ops().iter().find_map(|op| match op {
                DrawOp::Text { text, x, y } if text == wanted => Some((*x, *y)),
                _ => None,
            })
        };
        let (last_x, last_y) = text_pos("Müller").unwrap();
        let (first_x, first_y) = text_pos("Anna").unwrap();
        assert_eq!(last_x, first_x);
        assert!(last_y > first_y);

        // Trainee label instead of bars.
        let texts = surface.texts();
        assert!(texts.contains(&"Anwärter"));
        assert!(!surface.ops().iter().any(|op| matches!(op, DrawOp::RoundRect { .. })));

        // One filled and one outlined vehicle row.
        let rects = surface.rects();
        let vehicle_rows: Vec<_> = rects
            .iter()
            .filter(|(_, _, fill)| *fill == Some(Color::DEEP_SKY_BLUE))
            .collect();
        assert_eq!(vehicle_rows.len(), 2);
        assert_eq!(vehicle_rows[0].1, Paint::FillStroke);
        assert_eq!(vehicle_rows[1].1, Paint::Stroke);
        assert!(vehicle_rows[0].0.y > vehicle_rows[1].0.y);
        assert!(texts.contains(&"LF 20") && texts.contains(&"DLK"));

        // Only the breathing-apparatus quadrant is filled.
        let filled_badges: Vec<_> = rects
            .iter()
            .filter(|(_, paint, fill)| {
                *paint == Paint::FillStroke
                    && matches!(fill, Some(c) if [Color::YELLOW, Color::RED, Color::GREEN, Color::DODGER_BLUE].contains(c))
            })
            .collect();
        assert_eq!(filled_badges.len(), 1);
        assert_eq!(filled_badges[0].2, Some(Color::RED));

        // No personnel id, so no rotated QR code.
        assert!(!surface.ops().iter().any(|op| matches!(op, DrawOp::Rotate { .. })));

        // Outer and inner borders close the card.
        let borders: Vec<_> = rects.iter().rev().take(2).map(|(rect, _, _)| *rect).collect();
        assert_eq!(borders, vec![geometry.content, geometry.outer]);
    }

    #[test]
    fn personnel_id_adds_rotated_qr_code() {
        let dir = asset_dir();
        let assets = assets(&dir);
        let person = anna()
            .with_personnel_id("4711")
            .with_qualification(Qualification::Truppfuehrer);
        let ctx = context(&person, &assets);

        let mut surface = RecordingSurface::new();
        Card::new(&ctx, default_geometry()).unwrap().draw(&mut surface).unwrap();

        assert!(surface.ops().contains(&DrawOp::Rotate { degrees: 315.0 }));
        assert!(surface.texts().contains(&"4711"));
        assert!(!surface.texts().contains(&"Anwärter"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let dir = asset_dir();
        let assets = assets(&dir);
        let person = anna().with_personnel_id("4711");
        let ctx = context(&person, &assets);

        let render = || {
            let mut surface = RecordingSurface::new();
            Card::new(&ctx, default_geometry()).unwrap().draw(&mut surface).unwrap();
            surface.into_ops()
        };
        assert_eq!(render(), render());
    }

    #[test]
    fn state_is_reset_before_every_block() {
        let dir = asset_dir();
        let assets = assets(&dir);
        let person = anna();
        let ctx = context(&person, &assets);

        let mut surface = RecordingSurface::new();
        Card::new(&ctx, default_geometry()).unwrap().draw(&mut surface).unwrap();

        let resets = surface
            .ops()
            .windows(4)
            .filter(|w| {
                w[0] == DrawOp::FillColor(Color::BLACK)
                    && w[1] == DrawOp::StrokeColor(Color::BLACK)
                    && w[2] == DrawOp::LineWidth(1.0)
                    && matches!(w[3], DrawOp::Font { size, .. } if size == 12.0)
            })
            .count();
        // Four blocks plus the borders.
        assert_eq!(resets, 5);
    }
}
