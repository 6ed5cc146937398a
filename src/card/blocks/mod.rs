//! The four content blocks of a card, left to right.

use crate::error::{NameplateError, Result};
use crate::geometry::Dimensions;
use crate::surface::Surface;

mod image;
mod main_content;
mod qualifications;
mod vehicle;

pub use image::ImageBlock;
pub use main_content::MainContentBlock;
pub use qualifications::QualificationsBlock;
pub use vehicle::VehicleInstructionsBlock;

pub enum Block<'a> {
    Image(ImageBlock<'a>),
    MainContent(MainContentBlock<'a>),
    VehicleInstructions(VehicleInstructionsBlock<'a>),
    Qualifications(QualificationsBlock),
}

impl<'a> Block<'a> {
    pub fn name(&self) -> &'static str {
        match self {
            Block::Image(_) => "image",
            Block::MainContent(_) => "main content",
            Block::VehicleInstructions(_) => "vehicle instructions",
            Block::Qualifications(_) => "qualifications",
        }
    }

    pub fn dimensions(&self) -> &Dimensions {
        match self {
            Block::Image(block) => &block.dimensions,
            Block::MainContent(block) => &block.dimensions,
            Block::VehicleInstructions(block) => &block.dimensions,
            Block::Qualifications(block) => &block.dimensions,
        }
    }

    fn dimensions_mut(&mut self) -> &mut Dimensions {
        match self {
            Block::Image(block) => &mut block.dimensions,
            Block::MainContent(block) => &mut block.dimensions,
            Block::VehicleInstructions(block) => &mut block.dimensions,
            Block::Qualifications(block) => &mut block.dimensions,
        }
    }

    /// Intrinsic width, or `None` for a block that takes a share of the free space.
    pub fn width(&self) -> Option<f32> {
        self.dimensions().width
    }

    /// Narrowest width the block can be drawn at.
    pub fn min_width(&self) -> f32 {
        match self {
            Block::MainContent(_) => MainContentBlock::MIN_WIDTH,
            _ => 0.0,
        }
    }

    pub fn set_width(&mut self, width: f32) {
        self.dimensions_mut().width = Some(width);
    }

    pub fn set_x(&mut self, x: f32) {
        self.dimensions_mut().x = Some(x);
    }

    pub fn right_edge(&self) -> Option<f32> {
        self.dimensions().right_edge()
    }

    pub fn draw(&self, surface: &mut dyn Surface) -> Result<()> {
        let rect = self
            .dimensions()
            .resolved()
            .ok_or_else(|| NameplateError::Layout(format!("{} block drawn before layout", self.name())))?;

        match self {
            Block::Image(block) => block.draw(rect, surface),
            Block::MainContent(block) => block.draw(rect, surface),
            Block::VehicleInstructions(block) => block.draw(rect, surface),
            Block::Qualifications(block) => block.draw(rect, surface),
        }
        Ok(())
    }
}
