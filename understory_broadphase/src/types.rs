// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types and helpers.

/// Axis-aligned bounding box in 2D integer coordinates.
///
/// The box covers the closed region `[x, x + width] × [y, y + height]` with the
/// origin at the top-left. A zero width and height describes a point proxy.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Aabb {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Horizontal extent (non-negative).
    pub width: i32,
    /// Vertical extent (non-negative).
    pub height: i32,
}

impl Aabb {
    /// Create an AABB from its top-left corner and size.
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create an AABB from min/max corners.
    pub const fn from_min_max(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Self {
            x: min_x,
            y: min_y,
            width: max_x.saturating_sub(min_x),
            height: max_y.saturating_sub(min_y),
        }
    }

    /// Right edge (`x + width`).
    #[inline]
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (`y + height`).
    #[inline]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Whether width and height are both non-negative.
    pub const fn is_valid(&self) -> bool {
        self.width >= 0 && self.height >= 0
    }

    /// Whether the box has no extent on either axis.
    pub const fn is_point(&self) -> bool {
        self.width == 0 && self.height == 0
    }

    /// Center point, rounded toward the top-left.
    pub const fn center(&self) -> (i32, i32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Same size, moved so the top-left corner sits at `(x, y)`.
    #[must_use]
    pub const fn with_position(self, x: i32, y: i32) -> Self {
        Self { x, y, ..self }
    }

    /// Same size, shifted by `(dx, dy)`.
    #[must_use]
    pub const fn translate(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            ..self
        }
    }

    /// Whether the point lies inside or on the boundary.
    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        self.x <= x && x <= self.right() && self.y <= y && y <= self.bottom()
    }

    /// Whether the two boxes overlap. Touching edges count as intersecting.
    pub fn intersects(&self, other: &Self) -> bool {
        !(other.x > self.right()
            || other.right() < self.x
            || other.y > self.bottom()
            || other.bottom() < self.y)
    }

    /// Whether `other` lies strictly inside this box.
    ///
    /// `other` may start on the left/top edges but must end strictly before the
    /// right/bottom edges. Quadrants tile their parent with closed bounds, so a box
    /// touching the far edge of a quadrant is kept by the parent instead.
    pub fn contains(&self, other: &Self) -> bool {
        self.x <= other.x
            && self.y <= other.y
            && other.right() < self.right()
            && other.bottom() < self.bottom()
    }

    /// Exact AABB/circle overlap test.
    ///
    /// Clamps the circle center onto the box to find the nearest point, then
    /// compares squared distances in a widened type.
    pub fn intersects_circle(&self, circle: &Circle) -> bool {
        if circle.radius < 0 {
            return false;
        }
        let nx = circle.x.max(self.x).min(self.right());
        let ny = circle.y.max(self.y).min(self.bottom());
        let dx = i128::from(circle.x) - i128::from(nx);
        let dy = i128::from(circle.y) - i128::from(ny);
        let r = i128::from(circle.radius);
        dx * dx + dy * dy <= r * r
    }

    /// Smallest box covering both.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self::from_min_max(
            self.x.min(other.x),
            self.y.min(other.y),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }
}

/// Circular query region, usually an actor's reach.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Circle {
    /// Center x.
    pub x: i32,
    /// Center y.
    pub y: i32,
    /// Radius. Negative radii match nothing.
    pub radius: i32,
}

impl Circle {
    /// Create a circle from its center and radius.
    pub const fn new(x: i32, y: i32, radius: i32) -> Self {
        Self { x, y, radius }
    }

    /// Bounding square of the circle.
    ///
    /// An `Aabb` extent cannot exceed `i32::MAX`, so for radii above about 2^30
    /// the square is cut short on the right and bottom.
    pub const fn bounds(&self) -> Aabb {
        let r = if self.radius < 0 { 0 } else { self.radius };
        Aabb::from_min_max(
            self.x.saturating_sub(r),
            self.y.saturating_sub(r),
            self.x.saturating_add(r),
            self.y.saturating_add(r),
        )
    }
}

#[cfg(feature = "kurbo")]
impl From<Aabb> for kurbo::Rect {
    fn from(a: Aabb) -> Self {
        Self::new(
            f64::from(a.x),
            f64::from(a.y),
            f64::from(a.right()),
            f64::from(a.bottom()),
        )
    }
}

#[cfg(feature = "kurbo")]
impl Aabb {
    /// Smallest integer box covering `rect`, rounding outward.
    ///
    /// Coordinates outside the `i32` range saturate.
    pub fn from_rect(rect: kurbo::Rect) -> Self {
        let r = rect.abs().expand();
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Rect is already rounded to integers; out-of-range values saturate."
        )]
        let (x0, y0, x1, y1) = (r.x0 as i32, r.y0 as i32, r.x1 as i32, r.y1 as i32);
        Self::from_min_max(x0, y0, x1, y1)
    }
}
