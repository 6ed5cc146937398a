use crate::card::CardContext;
use crate::error::{NameplateError, Result};
use crate::geometry::{Dimensions, Rect};
use crate::metrics::text_width;
use crate::person::Instruction;
use crate::surface::{Color, FontFace, Paint, Surface};

const BOX_PADDING: f32 = 2.0;

/// One stacked row per vehicle, filled when the person is instructed on it.
pub struct VehicleInstructionsBlock<'a> {
    context: &'a CardContext<'a>,
    pub(crate) dimensions: Dimensions,
    box_height: f32,
    font_size: f32,
}

impl<'a> VehicleInstructionsBlock<'a> {
    pub fn new(context: &'a CardContext<'a>, mut dimensions: Dimensions) -> Result<Self> {
        let instructions = &context.person.instructions;
        if instructions.is_empty() {
            return Err(NameplateError::EmptyInstructions {
                person: context.person.display_name(),
            });
        }

        let box_height = dimensions.height / instructions.len() as f32;
        let font_size = box_height - BOX_PADDING;
        if font_size <= 0.0 {
            return Err(NameplateError::TooManyInstructions {
                person: context.person.display_name(),
                count: instructions.len(),
            });
        }
        dimensions.width = Some(calculate_width(instructions, context.font.regular(), font_size));

        Ok(Self {
            context,
            dimensions,
            box_height,
            font_size,
        })
    }

    pub(crate) fn draw(&self, rect: Rect, surface: &mut dyn Surface) {
        let face = self.context.font.regular();
        let mut box_y = rect.top() - self.box_height;

        for instruction in &self.context.person.instructions {
            surface.set_fill_color(Color::DEEP_SKY_BLUE);
            surface.rect(
                Rect::new(rect.x, box_y, rect.width, self.box_height),
                Paint::outline_or_filled(instruction.value),
            );

            surface.set_fill_color(Color::BLACK);
            surface.set_font(face, self.font_size);
            surface.text(&instruction.vehicle, rect.x + BOX_PADDING, box_y + BOX_PADDING);

            box_y -= self.box_height;
        }
    }
}

/// Longest vehicle name plus padding on both sides.
fn calculate_width(instructions: &[Instruction], face: FontFace, font_size: f32) -> f32 {
    let longest = instructions
        .iter()
        .map(|instruction| text_width(&instruction.vehicle, face, font_size))
        .fold(0.0_f32, f32::max);
    longest + 2.0 * BOX_PADDING
}
