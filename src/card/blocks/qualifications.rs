use ::image::DynamicImage;

use crate::assets::generate_qr_image;
use crate::card::CardContext;
use crate::error::{NameplateError, Result};
use crate::geometry::{Dimensions, Rect};
use crate::registry::{Badge, Quadrant, BADGES};
use crate::surface::{draw_rotated_image, flatten_onto, Color, ImageFit, Paint, Surface};

const ICON_SCALE: f32 = 0.6;
const ICON_PADDING: f32 = 1.0;
const QR_ANGLE: f32 = 315.0;
const QR_HALO: f32 = 3.0;

struct PlacedBadge {
    badge: Badge,
    /// Present only when the qualification is held.
    icon: Option<DynamicImage>,
}

/// Square badge split into four technical-qualification quadrants, with the
/// personnel QR code standing on its tip in the middle.
pub struct QualificationsBlock {
    pub(crate) dimensions: Dimensions,
    badges: Vec<PlacedBadge>,
    qr_code: Option<DynamicImage>,
}

impl QualificationsBlock {
    pub fn new(context: &CardContext<'_>, dimensions: Dimensions) -> Result<Self> {
        let width = dimensions.width.unwrap_or(0.0);
        if (width - dimensions.height).abs() > f32::EPSILON {
            return Err(NameplateError::NonSquareBlock {
                width,
                height: dimensions.height,
            });
        }

        let badges = BADGES
            .iter()
            .map(|badge| {
                let icon = if context.person.has(badge.qualification) {
                    let icon = context.assets.icon(badge.icon).ok_or_else(|| NameplateError::MissingAsset {
                        path: badge.icon.into(),
                        reason: "icon not loaded".to_string(),
                    })?;
                    Some(flatten_onto(icon, badge.color))
                } else {
                    None
                };
                Ok(PlacedBadge { badge: *badge, icon })
            })
            .collect::<Result<Vec<_>>>()?;

        let qr_code = context
            .person
            .personnel_id
            .as_deref()
            .map(|id| generate_qr_image(&format!("{}{}", context.qr_base_url, id)))
            .transpose()?;

        Ok(Self {
            dimensions,
            badges,
            qr_code,
        })
    }

    pub(crate) fn draw(&self, rect: Rect, surface: &mut dyn Surface) {
        let side_length = rect.width / 2.0;

        for placed in &self.badges {
            let quadrant = quadrant_rect(rect, placed.badge.quadrant);
            surface.set_fill_color(placed.badge.color);
            surface.set_stroke_color(Color::BLACK);
            surface.rect(quadrant, Paint::outline_or_filled(placed.icon.is_some()));

            if let Some(icon) = &placed.icon {
                surface.image(icon, icon_rect(quadrant, placed.badge.quadrant), ImageFit::Contain);
            }
        }

        if let Some(qr_code) = &self.qr_code {
            draw_rotated_image(surface, qr_code, rect.center(), QR_ANGLE, side_length, 1.0, QR_HALO);
        }
    }
}

/// The quarter of `rect` a badge occupies.
pub fn quadrant_rect(rect: Rect, quadrant: Quadrant) -> Rect {
    let side = rect.width / 2.0;
    let x = if quadrant.is_right() { rect.x + side } else { rect.x };
    let y = if quadrant.is_top() { rect.y + side } else { rect.y };
    Rect::new(x, y, side, rect.height / 2.0)
}

/// Icon box anchored in the quadrant's outer corner.
fn icon_rect(quadrant_rect: Rect, quadrant: Quadrant) -> Rect {
    let side = quadrant_rect.width;
    let size = side * ICON_SCALE - ICON_PADDING;
    let offset = side * (1.0 - ICON_SCALE) - ICON_PADDING;
    let x = if quadrant.is_right() {
        quadrant_rect.x + offset
    } else {
        quadrant_rect.x + ICON_PADDING
    };
    let y = if quadrant.is_top() {
        quadrant_rect.y + offset
    } else {
        quadrant_rect.y + ICON_PADDING
    };
    Rect::new(x, y, size, size)
}
