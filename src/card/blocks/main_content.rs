use crate::card::{font_size, CardContext};
use crate::geometry::{Dimensions, Rect};
use crate::metrics::text_width;
use crate::registry::{highest_leading_rank, LEADING_CODES};
use crate::surface::{Color, Paint, Surface};

const PADDING: f32 = 5.0;
const BAR_HEIGHT: f32 = 12.0;
const BAR_RADIUS: f32 = 5.0;
/// The bar label is this much smaller than the bar on each side.
const BAR_FONT_PADDING: f32 = 2.0;
const TRAINEE_LABEL: &str = "Anwärter";
const TRAINEE_FONT_SIZE: f32 = 12.0;

/// Name, leading-role bars and personnel id. Takes whatever width is left.
pub struct MainContentBlock<'a> {
    context: &'a CardContext<'a>,
    pub(crate) dimensions: Dimensions,
    highest_rank: Option<usize>,
}

impl<'a> MainContentBlock<'a> {
    /// Padding on both sides; the rank bars share what is left.
    pub const MIN_WIDTH: f32 = 2.0 * PADDING;

    pub fn new(context: &'a CardContext<'a>, dimensions: Dimensions) -> Self {
        Self {
            context,
            dimensions,
            highest_rank: highest_leading_rank(context.person),
        }
    }

    pub(crate) fn draw(&self, rect: Rect, surface: &mut dyn Surface) {
        self.write_name(rect, surface);
        match self.highest_rank {
            Some(rank) => self.draw_rank_bars(rect, rank, surface),
            None => self.write_trainee_label(rect, surface),
        }
        self.write_personnel_id(rect, surface);
    }

    fn write_name(&self, rect: Rect, surface: &mut dyn Surface) {
        let person = self.context.person;
        let x = rect.x + PADDING;
        let last_name_y = rect.top() - PADDING - font_size::LAST_NAME;

        surface.set_fill_color(Color::BLACK);
        surface.set_font(self.context.font.bold(), font_size::LAST_NAME);
        surface.text(&person.last_name, x, last_name_y);

        surface.set_font(self.context.font.regular(), font_size::FIRST_NAME);
        surface.text(&person.first_name, x, last_name_y - font_size::FIRST_NAME);
    }

    /// One bar per role above trainee; bars up to the held rank are green.
    fn draw_rank_bars(&self, rect: Rect, rank: usize, surface: &mut dyn Surface) {
        let codes = &LEADING_CODES[1..];
        let bar_x = rect.x + PADDING;
        let bar_y = rect.y + PADDING;
        let bar_width = (rect.width - 2.0 * PADDING) / codes.len() as f32;
        let face = self.context.font.bold();
        let label_size = BAR_HEIGHT - 2.0 * BAR_FONT_PADDING;

        surface.set_stroke_color(Color::DARK_GREY);
        surface.set_line_width(1.0);

        for (index, &code) in codes.iter().enumerate() {
            let held = rank > index;
            let x = bar_x + index as f32 * bar_width;

            surface.set_fill_color(if held { Color::GREEN } else { Color::LIGHT_GREY });
            surface.round_rect(Rect::new(x, bar_y, bar_width, BAR_HEIGHT), BAR_RADIUS, Paint::FillStroke);

            surface.set_fill_color(if held { Color::WHITE } else { Color::BLACK });
            surface.set_font(face, label_size);
            surface.text(
                code,
                x + (bar_width - text_width(code, face, label_size)) / 2.0,
                bar_y + (BAR_HEIGHT - label_size) / 2.0 + 1.0,
            );
        }
    }

    fn write_trainee_label(&self, rect: Rect, surface: &mut dyn Surface) {
        surface.set_fill_color(Color::CORAL);
        surface.set_font(self.context.font.bold(), TRAINEE_FONT_SIZE);
        surface.text(TRAINEE_LABEL, rect.x + PADDING, rect.y + PADDING);
    }

    fn write_personnel_id(&self, rect: Rect, surface: &mut dyn Surface) {
        let Some(id) = self.context.person.personnel_id.as_deref() else {
            return;
        };
        let face = self.context.font.regular();
        let right = rect.right_edge() - PADDING;
        let bottom = rect.y + BAR_HEIGHT + 2.0 * PADDING;

        surface.set_fill_color(Color::BLACK);
        surface.set_font(face, font_size::PERSONNEL_ID);
        surface.text(id, right - text_width(id, face, font_size::PERSONNEL_ID), bottom);
    }
}
