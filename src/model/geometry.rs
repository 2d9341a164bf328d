use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Live node positions for one layout tick, keyed by node id.
pub type PositionSnapshot = HashMap<String, Point>;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
    }
}

/// Axis-aligned rectangle in screen space.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn centered(center: Point, width: f64, height: f64) -> Self {
        let half_w = width / 2.0;
        let half_h = height / 2.0;
        Self {
            left: center.x - half_w,
            top: center.y - half_h,
            right: center.x + half_w,
            bottom: center.y + half_h,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Two rectangles overlap unless one lies entirely to one side of the
    /// other. Shared edges count as separated.
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(self.right <= other.left
            || other.right <= self.left
            || self.bottom <= other.top
            || other.bottom <= self.top)
    }
}

/// A cluster label accepted for rendering.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Placement {
    pub cluster_id: String,
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_size: f64,
    pub rect: Rect,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_overlap() {
        let a = Rect::centered(Point::new(0.0, 0.0), 100.0, 20.0);
        let b = Rect::centered(Point::new(50.0, 0.0), 60.0, 20.0);
        let c = Rect::centered(Point::new(0.0, 40.0), 100.0, 20.0);

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_touching_rects_do_not_overlap() {
        let a = Rect::centered(Point::new(0.0, 0.0), 10.0, 10.0);
        let b = Rect::centered(Point::new(10.0, 0.0), 10.0, 10.0);
        assert!(!a.overlaps(&b));
    }
}
