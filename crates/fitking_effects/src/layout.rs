//! Geometry and tile arrangement.

/// A rectangle in page coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    /// X position (left edge).
    pub x: f32,
    /// Y position (top edge).
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rect {
    /// A zero-sized rect at the origin.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    /// Creates a new rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Returns the right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Returns the bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Returns the center point.
    #[must_use]
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// True when the rect has positive area and finite coordinates.
    ///
    /// Freshly created elements have no layout yet; pointer math against
    /// an unmeasurable rect is meaningless.
    #[must_use]
    pub fn is_measurable(&self) -> bool {
        self.width > 0.0
            && self.height > 0.0
            && self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
    }

    /// Translates a page point into this rect's local space.
    #[must_use]
    pub fn to_local(&self, x: f32, y: f32) -> (f32, f32) {
        (x - self.x, y - self.y)
    }

    /// Returns true if the point is inside the rectangle.
    #[must_use]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Returns true if two rectangles intersect.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Returns the overlap of two rectangles, if any.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        if !self.intersects(other) {
            return None;
        }

        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        Some(Self::new(
            x,
            y,
            self.right().min(other.right()) - x,
            self.bottom().min(other.bottom()) - y,
        ))
    }

    /// Scales the rect about its center.
    #[must_use]
    pub fn scale_about_center(&self, factor: f32) -> Self {
        let (cx, cy) = self.center();
        let width = self.width * factor;
        let height = self.height * factor;
        Self::new(cx - width * 0.5, cy - height * 0.5, width, height)
    }
}

/// Fixed-column grid used for card sections.
///
/// Tiles fill rows left to right; column width is shared equally after
/// gaps and padding.
#[derive(Debug, Clone, Copy)]
pub struct Grid {
    /// Number of columns (at least one).
    pub columns: usize,
    /// Gap between tiles on both axes.
    pub gap: f32,
    /// Padding inside the container.
    pub padding: f32,
    /// Height of every tile.
    pub tile_height: f32,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            columns: 3,
            gap: 24.0,
            padding: 16.0,
            tile_height: 220.0,
        }
    }
}

impl Grid {
    /// Grid with `columns` columns and default spacing.
    #[must_use]
    pub fn with_columns(columns: usize) -> Self {
        Self {
            columns: columns.max(1),
            ..Self::default()
        }
    }

    /// Computes the bounds of `count` tiles inside `container`.
    #[must_use]
    pub fn arrange(&self, container: Rect, count: usize) -> Vec<Rect> {
        let columns = self.columns.max(1);
        let inner_width = (container.width - self.padding * 2.0).max(0.0);
        let tile_width =
            ((inner_width - self.gap * (columns - 1) as f32) / columns as f32).max(0.0);

        (0..count)
            .map(|i| {
                let column = i % columns;
                let row = i / columns;
                Rect::new(
                    container.x + self.padding + column as f32 * (tile_width + self.gap),
                    container.y + self.padding + row as f32 * (self.tile_height + self.gap),
                    tile_width,
                    self.tile_height,
                )
            })
            .collect()
    }

    /// Height a container needs to hold `count` tiles, padding included.
    #[must_use]
    pub fn content_height(&self, count: usize) -> f32 {
        let rows = count.div_ceil(self.columns.max(1));
        if rows == 0 {
            return self.padding * 2.0;
        }
        self.padding * 2.0 + rows as f32 * self.tile_height + (rows - 1) as f32 * self.gap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);

        assert!(rect.contains(50.0, 30.0));
        assert!(!rect.contains(5.0, 30.0));
        assert!(!rect.contains(50.0, 80.0));
    }

    #[test]
    fn test_unmeasured_rect() {
        assert!(!Rect::ZERO.is_measurable());
        assert!(!Rect::new(0.0, 0.0, f32::NAN, 10.0).is_measurable());
        assert!(Rect::new(-5.0, 0.0, 1.0, 1.0).is_measurable());
    }

    #[test]
    fn test_grid_wraps_rows() {
        let grid = Grid {
            columns: 2,
            gap: 10.0,
            padding: 0.0,
            tile_height: 50.0,
        };
        let tiles = grid.arrange(Rect::new(0.0, 0.0, 210.0, 500.0), 3);

        assert_eq!(tiles.len(), 3);
        assert_eq!(tiles[0], Rect::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(tiles[1], Rect::new(110.0, 0.0, 100.0, 50.0));
        assert_eq!(tiles[2], Rect::new(0.0, 60.0, 100.0, 50.0));
        assert!((grid.content_height(3) - 110.0).abs() < f32::EPSILON);
        assert!(grid.content_height(0).abs() < f32::EPSILON);
    }
}
