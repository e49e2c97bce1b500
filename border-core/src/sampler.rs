//! Arc-length parameterization over rings.

use crate::geom::{Bounds, Point, Ring, Shape};

/// Length queries over an outline. Implemented by parsed [`Shape`]s and by
/// any live geometry that can answer the same questions (a rendered path,
/// a parametric curve).
pub trait Outline {
    fn total_length(&self) -> f64;

    /// Point at `target` along the outline, given its `total` length.
    /// `None` only when the outline has no points.
    fn point_at_length(&self, total: f64, target: f64) -> Option<Point>;

    fn bounds(&self) -> Option<Bounds>;
}

/// Sum of segment lengths inside each ring. Rings are not closed here.
pub fn total_length(rings: &[Ring]) -> f64 {
    rings
        .iter()
        .flat_map(|r| r.windows(2))
        .map(|w| w[0].dist(w[1]))
        .sum()
}

/// Walks the rings until `target_len` is reached and interpolates inside
/// that segment. Overshooting returns the last point of the last ring.
pub fn point_at_length(rings: &[Ring], total_len: f64, target_len: f64) -> Option<Point> {
    let last = rings.iter().rev().find_map(|r| r.last().copied())?;
    if target_len > total_len {
        return Some(last);
    }
    let mut acc = 0.0;
    for ring in rings {
        for w in ring.windows(2) {
            let seg = w[0].dist(w[1]);
            if acc + seg >= target_len {
                let t = if seg == 0.0 {
                    0.0
                } else {
                    (target_len - acc) / seg
                };
                return Some(w[0].lerp(w[1], t));
            }
            acc += seg;
        }
    }
    Some(last)
}

/// `n + 1` points evenly spaced by length, both ends included.
pub fn uniform_samples(outline: &dyn Outline, n: usize) -> Option<Vec<Point>> {
    let n = n.max(1);
    let total = outline.total_length();
    (0..=n)
        .map(|i| outline.point_at_length(total, total * i as f64 / n as f64))
        .collect()
}

impl Outline for Shape {
    fn total_length(&self) -> f64 {
        total_length(&self.rings)
    }

    fn point_at_length(&self, total: f64, target: f64) -> Option<Point> {
        point_at_length(&self.rings, total, target)
    }

    fn bounds(&self) -> Option<Bounds> {
        Shape::bounds(self)
    }
}
