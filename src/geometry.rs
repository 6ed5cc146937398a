//! Rectangles and the millimetre to point conversion.
//!
//! Everything downstream of construction works in points with the origin in
//! the bottom-left corner of the page, like PDF user space.

/// Points per millimetre.
pub const MM_TO_PT: f32 = 2.834;

/// Convert millimetres to points.
pub fn mm(value: f32) -> f32 {
    value * MM_TO_PT
}

/// Convert points back to millimetres for backends that take `Mm`.
pub fn pt_to_mm(value: f32) -> f32 {
    value / MM_TO_PT
}

/// A fully resolved axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right_edge(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Shrink vertically by `padding` on top and bottom; horizontal extent is kept.
    pub fn inset_vertical(&self, padding: f32) -> Rect {
        Rect::new(self.x, self.y + padding, self.width, self.height - 2.0 * padding)
    }

    /// Largest rectangle of the given aspect ratio (width / height) centred inside `self`.
    pub fn fit_aspect(&self, aspect_ratio: f32) -> Rect {
        if self.width / self.height > aspect_ratio {
            let width = self.height * aspect_ratio;
            Rect::new(self.x + (self.width - width) / 2.0, self.y, width, self.height)
        } else {
            let height = self.width / aspect_ratio;
            Rect::new(self.x, self.y + (self.height - height) / 2.0, self.width, height)
        }
    }
}

/// Block geometry during layout. Height and y are known up front, x and
/// width are filled in by the card's resolution pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    pub x: Option<f32>,
    pub y: f32,
    pub width: Option<f32>,
    pub height: f32,
}

impl Dimensions {
    pub fn new(x: Option<f32>, y: f32, width: Option<f32>, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// `x + width`, or `None` while either is unresolved.
    pub fn right_edge(&self) -> Option<f32> {
        Some(self.x? + self.width?)
    }

    /// The resolved rectangle, once layout has run.
    pub fn resolved(&self) -> Option<Rect> {
        Some(Rect::new(self.x?, self.y, self.width?, self.height))
    }
}
