//! Board geometry: measured rectangles and pointer positions.
//!
//! All containment checks use half-open intervals `[origin, origin + extent)`
//! so that two adjacent rectangles never both claim a shared edge.

/// Absolute pointer coordinates in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl Position {
    /// Create a position.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Measured rectangle in board coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl Rect {
    /// Create a rectangle from origin and extent.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Vertical midpoint, used to decide before/after insertion.
    pub fn mid_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Horizontal midpoint.
    pub fn mid_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// `x` lies in `[self.x, self.right())`.
    pub fn contains_x(&self, x: f32) -> bool {
        x >= self.x && x < self.right()
    }

    /// `y` lies in `[self.y, self.bottom())`.
    pub fn contains_y(&self, y: f32) -> bool {
        y >= self.y && y < self.bottom()
    }

    /// Both axes contain the point.
    pub fn contains(&self, position: Position) -> bool {
        self.contains_x(position.x) && self.contains_y(position.y)
    }

    /// Copy shifted by `dx` horizontally.
    pub fn offset_x(&self, dx: f32) -> Self {
        Self {
            x: self.x + dx,
            ..*self
        }
    }
}
