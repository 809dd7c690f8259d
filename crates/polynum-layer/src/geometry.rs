//! Polygon geometry.
//!
//! Feature counts are small and edits are interactive, so hit-testing is a
//! plain ray cast over the exterior ring with a bounding-box pre-check. No
//! spatial index.

use serde::{Deserialize, Serialize};

/// A 2D point in layer coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A simple polygon: one exterior ring, no holes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    /// Exterior ring vertices. The closing edge back to the first vertex
    /// is implicit.
    pub exterior: Vec<Point>,
}

impl Polygon {
    /// Creates a polygon from an exterior ring.
    ///
    /// Rings with fewer than 3 vertices are degenerate; they are accepted
    /// but never contain any point.
    pub fn new(exterior: Vec<Point>) -> Self {
        Self { exterior }
    }

    /// Creates a regular polygon around `center`.
    pub fn regular(center: Point, radius: f64, sides: u32) -> Self {
        let sides = sides.max(3);
        let mut exterior = Vec::with_capacity(sides as usize);
        for i in 0..sides {
            let theta = 2.0 * std::f64::consts::PI * (i as f64) / (sides as f64);
            exterior.push(Point::new(
                center.x + radius * theta.cos(),
                center.y + radius * theta.sin(),
            ));
        }
        Self { exterior }
    }

    /// Axis-aligned bounding box as `(min_x, min_y, max_x, max_y)`.
    ///
    /// Degenerate polygons return an empty box at the origin.
    pub fn bounding_box(&self) -> (f64, f64, f64, f64) {
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;

        for p in &self.exterior {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        if self.exterior.is_empty() {
            (0.0, 0.0, 0.0, 0.0)
        } else {
            (min_x, min_y, max_x, max_y)
        }
    }

    /// Tests whether `p` lies inside the polygon.
    ///
    /// Ray casting over the exterior ring; points on an edge may land on
    /// either side, which is fine for interactive click selection.
    pub fn contains_point(&self, p: &Point) -> bool {
        let n = self.exterior.len();
        if n < 3 {
            return false;
        }

        let (min_x, min_y, max_x, max_y) = self.bounding_box();
        if p.x < min_x || p.x > max_x || p.y < min_y || p.y > max_y {
            return false;
        }

        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let pi = self.exterior[i];
            let pj = self.exterior[j];
            if ((pi.y > p.y) != (pj.y > p.y))
                && (p.x < (pj.x - pi.x) * (p.y - pi.y) / (pj.y - pi.y) + pi.x)
            {
                inside = !inside;
            }
            j = i;
        }

        inside
    }
}
