//! Axis-aligned rectangle geometry
//!
//! Every entity on the field is a rectangle in logical canvas space:
//! - pos: top-left corner (y grows downward)
//! - size: width and height

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub pos: Vec2,
    /// Width and height
    pub size: Vec2,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Strict AABB overlap (touching edges do not count)
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Point containment, inclusive of the top-left edges
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }

    /// Move the rectangle by a displacement
    #[inline]
    pub fn translate(&mut self, delta: Vec2) {
        self.pos += delta;
    }

    /// Smallest rectangle covering both
    pub fn union(&self, other: &Rect) -> Rect {
        let min = self.pos.min(other.pos);
        let max = Vec2::new(self.right(), self.bottom()).max(Vec2::new(other.right(), other.bottom()));
        Rect { pos: min, size: max - min }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        assert!(a.overlaps(&Rect::new(2.0, 2.0, 2.0, 2.0)));
        // Touching edges are not an overlap
        assert!(!a.overlaps(&Rect::new(10.0, 0.0, 5.0, 5.0)));
        assert!(!a.overlaps(&Rect::new(0.0, 10.0, 5.0, 5.0)));
        assert!(!a.overlaps(&Rect::new(-20.0, -20.0, 5.0, 5.0)));
    }

    #[test]
    fn test_center_and_edges() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.center(), Vec2::new(25.0, 40.0));
        assert_eq!(r.right(), 40.0);
        assert_eq!(r.bottom(), 60.0);
    }

    #[test]
    fn test_contains() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(Vec2::new(0.0, 0.0)));
        assert!(r.contains(Vec2::new(9.9, 9.9)));
        assert!(!r.contains(Vec2::new(10.0, 5.0)));
    }

    #[test]
    fn test_union() {
        let a = Rect::new(0.0, 10.0, 10.0, 10.0);
        let b = Rect::new(5.0, 0.0, 10.0, 5.0);
        assert_eq!(a.union(&b), Rect::new(0.0, 0.0, 15.0, 20.0));
    }
}
