use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

/// Integer pixel point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Integer rectangle given by its four edges.
///
/// `is_set` distinguishes a deliberately empty box at the origin from "no box
/// configured"; a zero-sized box built with [`Bounds::new`] is still set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    #[serde(default)]
    pub is_set: bool,
}

impl Bounds {
    /// The unset box.
    pub const ZERO: Self = Self {
        left: 0,
        top: 0,
        right: 0,
        bottom: 0,
        is_set: false,
    };

    #[must_use]
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
            is_set: true,
        }
    }

    /// Box anchored at `(left, top)` with the given size.
    #[must_use]
    pub const fn from_size(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self::new(left, top, left + width, top + height)
    }

    /// Same inset on every side, used for paddings.
    #[must_use]
    pub const fn uniform(value: i32) -> Self {
        Self::new(value, value, value, value)
    }

    #[must_use]
    pub fn width(self) -> i32 {
        self.right - self.left
    }

    #[must_use]
    pub fn height(self) -> i32 {
        self.bottom - self.top
    }

    #[must_use]
    pub fn is_zero(self) -> bool {
        !self.is_set && self.left == 0 && self.top == 0 && self.right == 0 && self.bottom == 0
    }

    #[must_use]
    pub fn center(self) -> Point {
        Point::new(
            self.left + self.width() / 2,
            self.top + self.height() / 2,
        )
    }

    #[must_use]
    pub fn corners(self) -> [Point; 4] {
        [
            Point::new(self.left, self.top),
            Point::new(self.right, self.top),
            Point::new(self.right, self.bottom),
            Point::new(self.left, self.bottom),
        ]
    }

    /// Closed outline starting and ending at the top-left corner.
    #[must_use]
    pub fn outline(self) -> [Point; 5] {
        let [a, b, c, d] = self.corners();
        [a, b, c, d, a]
    }

    #[must_use]
    pub fn shift(self, dx: i32, dy: i32) -> Self {
        Self {
            left: self.left + dx,
            top: self.top + dy,
            right: self.right + dx,
            bottom: self.bottom + dy,
            is_set: true,
        }
    }

    /// Shrinks by `padding` on each side; never produces negative sizes.
    #[must_use]
    pub fn inset(self, padding: Self) -> Self {
        let left = self.left + padding.left;
        let top = self.top + padding.top;
        Self {
            left,
            top,
            right: (self.right - padding.right).max(left),
            bottom: (self.bottom - padding.bottom).max(top),
            is_set: true,
        }
    }

    #[must_use]
    pub fn intersect(self, other: Self) -> Self {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        Self {
            left,
            top,
            right: self.right.min(other.right).max(left),
            bottom: self.bottom.min(other.bottom).max(top),
            is_set: true,
        }
    }

    /// Smallest box containing both.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        if self.is_zero() {
            return other;
        }
        if other.is_zero() {
            return self;
        }
        Self::new(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right.max(other.right),
            self.bottom.max(other.bottom),
        )
    }

    /// Strict overlap; boxes sharing only an edge do not overlap.
    #[must_use]
    pub fn overlaps(self, other: Self) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }

    #[must_use]
    pub fn contains(self, other: Self) -> bool {
        other.left >= self.left
            && other.top >= self.top
            && other.right <= self.right
            && other.bottom <= self.bottom
    }

    #[must_use]
    pub fn contains_point(self, point: Point) -> bool {
        point.x >= self.left && point.x <= self.right && point.y >= self.top && point.y <= self.bottom
    }
}

/// Normalizes an angle into `[0, 2π)`.
#[must_use]
pub fn normalize_angle(angle: f64) -> f64 {
    let normalized = angle.rem_euclid(TAU);
    if normalized >= TAU { 0.0 } else { normalized }
}

#[cfg(test)]
mod tests {
    use super::{Bounds, Point, normalize_angle};
    use std::f64::consts::{PI, TAU};

    #[test]
    fn angles_normalize_into_one_turn() {
        assert!((normalize_angle(-PI / 2.0) - 1.5 * PI).abs() < 1e-12);
        assert_eq!(normalize_angle(TAU), 0.0);
    }

    #[test]
    fn unset_box_differs_from_zero_origin_box() {
        assert!(Bounds::ZERO.is_zero());
        assert!(!Bounds::new(0, 0, 0, 0).is_zero());
        assert!(!Bounds::default().is_set);
    }

    #[test]
    fn touching_boxes_do_not_overlap() {
        let a = Bounds::new(0, 0, 10, 10);
        let b = Bounds::new(10, 0, 20, 10);
        assert!(!a.overlaps(b));
        assert!(a.overlaps(b.shift(-1, 0)));
    }

    #[test]
    fn inset_clamps_to_empty() {
        let inset = Bounds::new(0, 0, 10, 10).inset(Bounds::uniform(8));
        assert_eq!(inset.width(), 0);
        assert_eq!(inset.height(), 0);
        assert_eq!(inset.left, 8);
    }

    #[test]
    fn outline_is_closed() {
        let outline = Bounds::new(1, 2, 3, 4).outline();
        assert_eq!(outline[0], outline[4]);
        assert_eq!(outline[2], Point::new(3, 4));
    }
}
