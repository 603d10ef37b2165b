use crate::geometry::Point;

/// Translates viewport pointer positions into surface-local coordinates.
/// The surface is hit-tested at 1:1, so this is a pure offset.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct CoordinateMapper {
    origin: Point,
}

impl CoordinateMapper {
    /// `origin` is the top-left corner of the surface's bounding box in viewport space.
    pub fn new(origin: Point) -> Self {
        Self { origin }
    }

    pub fn to_surface(&self, viewport: Point) -> Point {
        Point::new(viewport.x - self.origin.x, viewport.y - self.origin.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subtracts_surface_origin() {
        let mapper = CoordinateMapper::new(Point::new(24.0, 80.5));
        let local = mapper.to_surface(Point::new(124.0, 90.5));
        assert_eq!(local, Point::new(100.0, 10.0));
    }

    #[test]
    fn points_left_of_origin_go_negative() {
        let mapper = CoordinateMapper::new(Point::new(10.0, 10.0));
        assert_eq!(mapper.to_surface(Point::new(5.0, 0.0)), Point::new(-5.0, -10.0));
    }
}
