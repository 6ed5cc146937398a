use crate::assets::Portrait;
use crate::card::{font_size, CardContext};
use crate::geometry::{Dimensions, Rect};
use crate::metrics::text_width;
use crate::surface::{Color, ImageFit, Surface};

/// Width to height of a passport photo.
const PHOTO_ASPECT_RATIO: f32 = 550.0 / 732.0;

/// Space above and below the function label.
const LABEL_PADDING: f32 = 1.0;

/// Portrait on top, function label strip underneath.
pub struct ImageBlock<'a> {
    context: &'a CardContext<'a>,
    pub(crate) dimensions: Dimensions,
    portrait: Portrait<'a>,
    image_width: f32,
    image_height: f32,
}

impl<'a> ImageBlock<'a> {
    pub fn new(context: &'a CardContext<'a>, mut dimensions: Dimensions) -> Self {
        let image_height = dimensions.height - label_height();
        let image_width = image_height * PHOTO_ASPECT_RATIO;
        dimensions.width = Some(image_width);

        let portrait = context.assets.portrait(context.person.image_url.as_deref());

        Self {
            context,
            dimensions,
            portrait,
            image_width,
            image_height,
        }
    }

    pub(crate) fn draw(&self, rect: Rect, surface: &mut dyn Surface) {
        self.draw_image(rect, surface);
        self.draw_label(rect, surface);
        self.draw_borders(rect, surface);
    }

    fn draw_image(&self, rect: Rect, surface: &mut dyn Surface) {
        let slot = Rect::new(
            rect.x,
            rect.top() - self.image_height,
            self.image_width,
            self.image_height,
        );
        let fit = if self.portrait.is_photo() {
            ImageFit::Contain
        } else {
            ImageFit::Stretch
        };
        surface.image(self.portrait.image(), slot, fit);
    }

    fn draw_label(&self, rect: Rect, surface: &mut dyn Surface) {
        let label = self.context.person.function.label();
        let face = self.context.font.regular();
        let width = text_width(label, face, font_size::FUNCTION_LABEL);

        surface.set_fill_color(Color::BLACK);
        surface.set_font(face, font_size::FUNCTION_LABEL);
        surface.text(
            label,
            rect.x + (self.image_width - width) / 2.0,
            rect.y + (label_height() - font_size::FUNCTION_LABEL + LABEL_PADDING) / 2.0,
        );
    }

    fn draw_borders(&self, rect: Rect, surface: &mut dyn Surface) {
        let right = rect.x + self.image_width;
        let strip_top = rect.top() - self.image_height;
        surface.line((right, rect.y), (right, rect.top()));
        surface.line((rect.x, strip_top), (right, strip_top));
    }
}

fn label_height() -> f32 {
    font_size::FUNCTION_LABEL + 2.0 * LABEL_PADDING
}
