//! Collision primitives for the rectangular field
//!
//! Everything here is pure: balls are tested through their square bounding
//! box, paddles are axis-aligned rectangles, and power-ups are circles.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Box with top-left corner `pos` and extent `size`
    pub fn from_corner(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Overlap test used for ball vs paddle contact.
    ///
    /// Touching horizontally counts as contact (a ball sitting flush against a
    /// paddle face is a hit), but vertical extents must strictly overlap so a
    /// ball grazing the top or bottom edge slides past.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Circular pickup test: centers closer than `reach`
#[inline]
pub fn circles_touch(a: Vec2, b: Vec2, reach: f32) -> bool {
    a.distance(b) < reach
}

/// Normalized contact offset of a ball on a paddle.
///
/// 0 at the paddle center, about -1/+1 at the top/bottom edges. Not clamped:
/// a ball clipping the very edge can land slightly beyond +-1.
#[inline]
pub fn hit_ratio(ball_center_y: f32, paddle: &Aabb) -> f32 {
    let half = paddle.height() / 2.0;
    (ball_center_y - paddle.center().y) / half
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_overlap() {
        let paddle = Aabb::from_corner(Vec2::new(24.0, 100.0), Vec2::new(9.6, 75.0));

        // Overlapping the paddle face
        let ball = Aabb::from_corner(Vec2::new(30.0, 120.0), Vec2::splat(12.0));
        assert!(ball.overlaps(&paddle));
        assert!(paddle.overlaps(&ball));

        // Flush against the paddle's right face counts
        let flush = Aabb::from_corner(Vec2::new(33.6, 120.0), Vec2::splat(12.0));
        assert!(flush.overlaps(&paddle));

        // Resting exactly on top of the paddle does not
        let above = Aabb::from_corner(Vec2::new(30.0, 88.0), Vec2::splat(12.0));
        assert!(!above.overlaps(&paddle));

        // Far away
        let far = Aabb::from_corner(Vec2::new(400.0, 250.0), Vec2::splat(12.0));
        assert!(!far.overlaps(&paddle));
    }

    #[test]
    fn test_circles_touch() {
        assert!(circles_touch(Vec2::ZERO, Vec2::new(15.0, 0.0), 16.0));
        assert!(!circles_touch(Vec2::ZERO, Vec2::new(16.0, 0.0), 16.0));
        assert!(!circles_touch(Vec2::ZERO, Vec2::new(12.0, 12.0), 16.0));
    }

    #[test]
    fn test_hit_ratio() {
        let paddle = Aabb::from_corner(Vec2::new(24.0, 100.0), Vec2::new(9.6, 80.0));
        assert_eq!(hit_ratio(140.0, &paddle), 0.0);
        assert_eq!(hit_ratio(100.0, &paddle), -1.0);
        assert_eq!(hit_ratio(180.0, &paddle), 1.0);
        // Edge shots are not clamped
        assert!(hit_ratio(185.0, &paddle) > 1.0);
    }
}
