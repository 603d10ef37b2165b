use serde::{Deserialize, Serialize};

/// A position in surface-local coordinates (surface pixel units).
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Strict proximity test used by the closure rule.
    pub fn is_within(self, other: Point, threshold: f32) -> bool {
        self.distance(other) < threshold
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in surface-local coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn min(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn max(&self) -> Point {
        Point::new(self.x + self.width, self.y + self.height)
    }
}

/// Arithmetic mean of the vertices. `None` for an empty slice.
pub fn centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f32;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Some(Point::new(sx / n, sy / n))
}

/// Triangulates a simple polygon ring (convex or not) with earcut. Returns
/// index triples into `points`; empty if the ring is degenerate.
pub fn triangulate(points: &[Point]) -> Vec<[usize; 3]> {
    if points.len() < 3 {
        return Vec::new();
    }
    let coords: Vec<f64> = points
        .iter()
        .flat_map(|p| [f64::from(p.x), f64::from(p.y)])
        .collect();
    match earcutr::earcut(&coords, &[], 2) {
        Ok(idx) if idx.len() % 3 == 0 => idx.chunks_exact(3).map(|t| [t[0], t[1], t[2]]).collect(),
        _ => Vec::new(),
    }
}

/// Vertex label by position: A, B, C, ... Past Z the next code points are used.
pub fn vertex_label(index: usize) -> char {
    char::from_u32(65 + index as u32).unwrap_or('?')
}
