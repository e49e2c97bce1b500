use geo::BoundingRect;
use geo_types::{Coord, LineString, MultiLineString};
use serde::{Deserialize, Serialize};

/// Basic two dimensional point in the shapes' coordinate space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn dist2(self, o: Point) -> f64 {
        let dx = self.x - o.x;
        let dy = self.y - o.y;
        dx * dx + dy * dy
    }

    pub fn dist(self, o: Point) -> f64 {
        self.dist2(o).sqrt()
    }

    pub fn midpoint(self, o: Point) -> Point {
        Point {
            x: (self.x + o.x) / 2.0,
            y: (self.y + o.y) / 2.0,
        }
    }

    /// Linear interpolation, `t = 0` is `self`, `t = 1` is `o`.
    pub fn lerp(self, o: Point, t: f64) -> Point {
        Point {
            x: self.x + (o.x - self.x) * t,
            y: self.y + (o.y - self.y) * t,
        }
    }
}

impl From<(f64, f64)> for Point {
    fn from(v: (f64, f64)) -> Self {
        Point { x: v.0, y: v.1 }
    }
}

impl From<Point> for Coord<f64> {
    fn from(p: Point) -> Self {
        Coord { x: p.x, y: p.y }
    }
}

/// One traced sub-path. Not implicitly closed.
pub type Ring = Vec<Point>;

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn center(&self) -> Point {
        Point {
            x: (self.min_x + self.max_x) / 2.0,
            y: (self.min_y + self.max_y) / 2.0,
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn union(&self, o: &Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(o.min_x),
            min_y: self.min_y.min(o.min_y),
            max_x: self.max_x.max(o.max_x),
            max_y: self.max_y.max(o.max_y),
        }
    }
}

/// A region outline: one or more rings (islands, exclaves).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub rings: Vec<Ring>,
}

impl Shape {
    pub fn new(rings: Vec<Ring>) -> Self {
        Shape { rings }
    }

    /// True when no ring holds a point.
    pub fn is_empty(&self) -> bool {
        self.rings.iter().all(|r| r.is_empty())
    }

    pub fn bounds(&self) -> Option<Bounds> {
        let rect = self.to_multi_line_string().bounding_rect()?;
        Some(Bounds {
            min_x: rect.min().x,
            min_y: rect.min().y,
            max_x: rect.max().x,
            max_y: rect.max().y,
        })
    }

    pub fn to_multi_line_string(&self) -> MultiLineString<f64> {
        MultiLineString::new(
            self.rings
                .iter()
                .filter(|r| !r.is_empty())
                .map(|r| LineString::from(r.iter().map(|&p| Coord::from(p)).collect::<Vec<_>>()))
                .collect(),
        )
    }
}

impl From<Vec<Ring>> for Shape {
    fn from(rings: Vec<Ring>) -> Self {
        Shape { rings }
    }
}
