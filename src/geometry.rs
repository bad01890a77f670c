//! Integer points and rectangles used to address pixels
//!
//! Coordinates are signed so callers can pass positions that lie partly or
//! wholly off-screen; clipping happens in the drawing operations.

/// A pixel position
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    /// Column
    pub x: i32,
    /// Row
    pub y: i32,
}

impl Point {
    /// Create a new point
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle, `width` x `height` pixels starting at `origin`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Top-left corner
    pub origin: Point,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Rect {
    /// Create a new rectangle
    pub const fn new(origin: Point, width: u32, height: u32) -> Self {
        Self {
            origin,
            width,
            height,
        }
    }

    /// Rectangle at (0, 0) with the given size
    pub const fn with_size(width: u32, height: u32) -> Self {
        Self::new(Point::new(0, 0), width, height)
    }

    /// Whether the rectangle covers no pixels
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// One past the right-most column
    pub fn right(&self) -> i64 {
        i64::from(self.origin.x) + i64::from(self.width)
    }

    /// One past the bottom row
    pub fn bottom(&self) -> i64 {
        i64::from(self.origin.y) + i64::from(self.height)
    }

    /// Whether `point` lies inside the rectangle
    pub fn contains(&self, point: Point) -> bool {
        let (x, y) = (i64::from(point.x), i64::from(point.y));
        x >= i64::from(self.origin.x)
            && x < self.right()
            && y >= i64::from(self.origin.y)
            && y < self.bottom()
    }

    /// Overlapping area of two rectangles, `None` when they do not overlap
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let left = self.origin.x.max(other.origin.x);
        let top = self.origin.y.max(other.origin.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        let width = right - i64::from(left);
        let height = bottom - i64::from(top);
        if width <= 0 || height <= 0 {
            return None;
        }
        Some(Self::new(Point::new(left, top), width as u32, height as u32))
    }

    /// Every point in the rectangle, row by row
    pub fn points(&self) -> impl Iterator<Item = Point> {
        let Self {
            origin,
            width,
            height,
        } = *self;
        (0..height).flat_map(move |dy| {
            (0..width).map(move |dx| {
                Point::new(
                    origin.x.wrapping_add(dx as i32),
                    origin.y.wrapping_add(dy as i32),
                )
            })
        })
    }
}
