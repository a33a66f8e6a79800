//! Planar geometry primitives shared by zones, items and the validator.
//!
//! Everything lives in one session space measured in `f64` units. All
//! containment and intersection tests are inclusive: touching counts.

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// Point (or offset) in session space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub const fn origin() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Axis-aligned rectangle given by its inclusive min/max corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    /// Build bounds from any two opposite corners.
    pub fn new(a: Point, b: Point) -> Self {
        Self {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    pub fn from_origin_size(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(Point::new(x, y), Point::new(x + width, y + height))
    }

    /// Smallest bounds enclosing every point, `None` for an empty slice.
    pub fn enclosing(points: &[Point]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut bounds = Self {
            min: *first,
            max: *first,
        };
        for p in rest {
            bounds.min.x = bounds.min.x.min(p.x);
            bounds.min.y = bounds.min.y.min(p.y);
            bounds.max.x = bounds.max.x.max(p.x);
            bounds.max.y = bounds.max.y.max(p.y);
        }
        Some(bounds)
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn is_empty(&self) -> bool {
        !(self.width() > 0.0 && self.height() > 0.0)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

    /// Corner points in counter-clockwise order starting at `min`.
    pub fn corners(&self) -> [Point; 4] {
        [
            self.min,
            Point::new(self.max.x, self.min.y),
            self.max,
            Point::new(self.min.x, self.max.y),
        ]
    }
}

/// Ordered ring of vertices. The closing edge from the last vertex back to the
/// first is implicit.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polygon {
    points: Vec<Point>,
}

impl Polygon {
    /// Minimum vertex count for a polygon that encloses area.
    pub const MIN_VERTICES: usize = 3;

    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn from_pairs(pairs: &[(f64, f64)]) -> Self {
        Self::new(pairs.iter().copied().map(Point::from).collect())
    }

    pub fn rect(width: f64, height: f64) -> Self {
        Self::new(Bounds::from_origin_size(0.0, 0.0, width, height).corners().to_vec())
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Fewer than three vertices cannot enclose area.
    pub fn is_degenerate(&self) -> bool {
        self.points.len() < Self::MIN_VERTICES
    }

    pub fn translated(&self, offset: Point) -> Self {
        Self::new(self.points.iter().map(|p| *p + offset).collect())
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::enclosing(&self.points)
    }

    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// Inclusive point-in-polygon test: points on an edge or vertex count as inside.
    pub fn contains_point(&self, p: Point) -> bool {
        if self.is_degenerate() {
            return false;
        }
        if self.edges().any(|(a, b)| on_segment(a, b, p)) {
            return true;
        }

        // Even-odd ray cast towards +x.
        let mut inside = false;
        for (a, b) in self.edges() {
            if (a.y > p.y) != (b.y > p.y) {
                let x_cross = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if p.x < x_cross {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Exact intersection test. Touching edges or vertices count as intersecting.
    pub fn intersects(&self, other: &Polygon) -> bool {
        if self.is_degenerate() || other.is_degenerate() {
            return false;
        }
        match (self.bounds(), other.bounds()) {
            (Some(a), Some(b)) if !a.intersects(&b) => return false,
            _ => {}
        }

        for (a1, a2) in self.edges() {
            for (b1, b2) in other.edges() {
                if segments_intersect(a1, a2, b1, b2) {
                    return true;
                }
            }
        }

        // No edge crossings: either disjoint or one fully encloses the other.
        self.contains_point(other.points[0]) || other.contains_point(self.points[0])
    }
}

fn orientation(a: Point, b: Point, c: Point) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

fn on_segment(a: Point, b: Point, p: Point) -> bool {
    orientation(a, b, p) == 0.0
        && p.x >= a.x.min(b.x)
        && p.x <= a.x.max(b.x)
        && p.y >= a.y.min(b.y)
        && p.y <= a.y.max(b.y)
}

/// Closed-segment intersection, collinear overlaps and shared endpoints included.
pub fn segments_intersect(p1: Point, p2: Point, q1: Point, q2: Point) -> bool {
    let d1 = orientation(q1, q2, p1);
    let d2 = orientation(q1, q2, p2);
    let d3 = orientation(p1, p2, q1);
    let d4 = orientation(p1, p2, q2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    on_segment(q1, q2, p1)
        || on_segment(q1, q2, p2)
        || on_segment(p1, p2, q1)
        || on_segment(p1, p2, q2)
}
