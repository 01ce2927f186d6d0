/*
 * Bounds Module
 *
 * Axis-aligned rectangles used for the world limits and for every node of the
 * spatial index. All edges are closed: a point lying exactly on an edge is
 * inside the rectangle.
 */

use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "Corners", into = "Corners")]
pub struct Rectangle {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

// Plain corner values as they appear in parameter files. They are kept as
// written, so reversed corners reach `is_degenerate` instead of being swapped.
#[derive(Serialize, Deserialize)]
struct Corners {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl From<Corners> for Rectangle {
    fn from(c: Corners) -> Self {
        Rectangle {
            min_x: c.min_x,
            min_y: c.min_y,
            max_x: c.max_x,
            max_y: c.max_y,
        }
    }
}

impl From<Rectangle> for Corners {
    fn from(r: Rectangle) -> Self {
        Corners {
            min_x: r.min_x,
            min_y: r.min_y,
            max_x: r.max_x,
            max_y: r.max_y,
        }
    }
}

impl Rectangle {
    // Build a rectangle from two opposite corners; the corners are sorted so
    // min <= max always holds
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            min_x: x0.min(x1),
            min_y: y0.min(y1),
            max_x: x0.max(x1),
            max_y: y0.max(y1),
        }
    }

    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Self::new(a.x, a.y, b.x, b.y)
    }

    pub fn min_x(&self) -> f32 {
        self.min_x
    }

    pub fn min_y(&self) -> f32 {
        self.min_y
    }

    pub fn max_x(&self) -> f32 {
        self.max_x
    }

    pub fn max_y(&self) -> f32 {
        self.max_y
    }

    pub fn min(&self) -> Vec2 {
        Vec2::new(self.min_x, self.min_y)
    }

    pub fn max(&self) -> Vec2 {
        Vec2::new(self.max_x, self.max_y)
    }

    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    // Zero, negative or unbounded width or height
    pub fn is_degenerate(&self) -> bool {
        let finite = [self.min_x, self.min_y, self.max_x, self.max_y]
            .iter()
            .all(|v| v.is_finite());
        !(finite && self.min_x < self.max_x && self.min_y < self.max_y)
    }

    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        self.min_x <= point.x
            && point.x <= self.max_x
            && self.min_y <= point.y
            && point.y <= self.max_y
    }

    // Closest point of the rectangle to `point`
    #[inline]
    pub fn clamp_point(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            point.x.max(self.min_x).min(self.max_x),
            point.y.max(self.min_y).min(self.max_y),
        )
    }

    // True when the circle's center is inside, or when the nearest point of the
    // rectangle is strictly closer than `radius`
    #[inline]
    pub fn intersects_circle(&self, center: Vec2, radius: f32) -> bool {
        if self.contains(center) {
            return true;
        }
        self.clamp_point(center).distance(center) < radius
    }

    // Like `intersects_circle`, but a rectangle whose nearest point lies exactly
    // on the circle still counts. Query pruning uses this so it never drops a
    // point the inclusive distance filter would keep.
    #[inline]
    pub fn within_distance(&self, center: Vec2, radius: f32) -> bool {
        self.contains(center) || self.clamp_point(center).distance(center) <= radius
    }

    pub fn contains_bounds(&self, other: &Rectangle) -> bool {
        self.min_x <= other.min_x
            && other.max_x <= self.max_x
            && self.min_y <= other.min_y
            && other.max_y <= self.max_y
    }
}
