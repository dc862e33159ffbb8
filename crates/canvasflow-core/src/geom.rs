#![forbid(unsafe_code)]

pub type Unit = euclid::UnknownUnit;

pub type Point = euclid::Point2D<f64, Unit>;
pub type Vector = euclid::Vector2D<f64, Unit>;
pub type Size = euclid::Size2D<f64, Unit>;
pub type Rect = euclid::Rect<f64, Unit>;

pub fn point(x: f64, y: f64) -> Point {
    euclid::point2(x, y)
}

pub fn vector(x: f64, y: f64) -> Vector {
    euclid::vec2(x, y)
}

pub fn size(width: f64, height: f64) -> Size {
    euclid::size2(width, height)
}

/// Builds a rectangle from its min/max corners.
pub fn rect_from_extents(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Rect {
    Rect::new(point(min_x, min_y), size(max_x - min_x, max_y - min_y))
}

/// Euclidean distance floored at `1.0`.
///
/// Every force and normalization in the engine divides by a distance; the floor keeps
/// coincident points from producing NaN or infinite coordinates.
pub fn floored_distance(v: Vector) -> f64 {
    v.length().max(1.0)
}
