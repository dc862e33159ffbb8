//! Edge geometry: side attachment points and perpendicular cubic curves.
//!
//! Edges always leave and enter a node perpendicular to the side they attach to, whatever the
//! relative position of the two nodes. This is not a shortest-path router.

use crate::geom::{Point, Vector, point, vector};
use crate::model::Node;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Bottom, Side::Left, Side::Right];

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Top => "top",
            Side::Bottom => "bottom",
            Side::Left => "left",
            Side::Right => "right",
        }
    }

    pub fn parse(s: &str) -> Option<Side> {
        Side::ALL.into_iter().find(|side| side.as_str() == s)
    }

    /// Unit vector pointing away from the node through this side.
    pub fn outward_normal(self) -> Vector {
        match self {
            Side::Top => vector(0.0, -1.0),
            Side::Bottom => vector(0.0, 1.0),
            Side::Left => vector(-1.0, 0.0),
            Side::Right => vector(1.0, 0.0),
        }
    }
}

/// Midpoint of `side` on the node rectangle, in model space.
pub fn attachment_point(node: &Node, side: Side) -> Point {
    let (x, y, w, h) = (node.x, node.y, node.width, node.height);
    match side {
        Side::Top => point(x + w / 2.0, y),
        Side::Bottom => point(x + w / 2.0, y + h),
        Side::Left => point(x, y + h / 2.0),
        Side::Right => point(x + w, y + h / 2.0),
    }
}

/// Control points for a curve from `start` to `end`: each endpoint pushed `curvature` units
/// along the outward normal of its side.
pub fn control_points(
    start: Point,
    end: Point,
    start_side: Side,
    end_side: Side,
    curvature: f64,
) -> (Point, Point) {
    (
        start + start_side.outward_normal() * curvature,
        end + end_side.outward_normal() * curvature,
    )
}

/// A cubic Bézier segment `start -> cp1 -> cp2 -> end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicCurve {
    pub start: Point,
    pub cp1: Point,
    pub cp2: Point,
    pub end: Point,
}

impl CubicCurve {
    /// `B(t) = (1-t)^3 P0 + 3(1-t)^2 t P1 + 3(1-t) t^2 P2 + t^3 P3`.
    pub fn eval(&self, t: f64) -> Point {
        let mt = 1.0 - t;
        let a = mt * mt * mt;
        let b = 3.0 * mt * mt * t;
        let c = 3.0 * mt * t * t;
        let d = t * t * t;
        point(
            a * self.start.x + b * self.cp1.x + c * self.cp2.x + d * self.end.x,
            a * self.start.y + b * self.cp1.y + c * self.cp2.y + d * self.end.y,
        )
    }

    /// `steps + 1` points at evenly spaced `t` in `[0, 1]`. The first and last points are the
    /// curve endpoints exactly. `steps == 0` is treated as a single segment.
    pub fn sample(&self, steps: usize) -> Vec<Point> {
        let steps = steps.max(1);
        let mut out = Vec::with_capacity(steps + 1);
        out.push(self.start);
        for i in 1..steps {
            out.push(self.eval(i as f64 / steps as f64));
        }
        out.push(self.end);
        out
    }

    pub fn translate(&self, by: Vector) -> Self {
        Self {
            start: self.start + by,
            cp1: self.cp1 + by,
            cp2: self.cp2 + by,
            end: self.end + by,
        }
    }
}

/// The vector-renderer descriptor for an edge curve.
pub fn path_command(
    start: Point,
    end: Point,
    start_side: Side,
    end_side: Side,
    curvature: f64,
) -> CubicCurve {
    let (cp1, cp2) = control_points(start, end, start_side, end_side, curvature);
    CubicCurve {
        start,
        cp1,
        cp2,
        end,
    }
}

/// Polyline approximation of the edge curve for renderers without native curves.
pub fn sample_curve(
    start: Point,
    end: Point,
    start_side: Side,
    end_side: Side,
    curvature: f64,
    steps: usize,
) -> Vec<Point> {
    path_command(start, end, start_side, end_side, curvature).sample(steps)
}

/// The curve for an edge between two resolved nodes.
pub fn edge_curve(
    from: &Node,
    to: &Node,
    start_side: Side,
    end_side: Side,
    curvature: f64,
) -> CubicCurve {
    path_command(
        attachment_point(from, start_side),
        attachment_point(to, end_side),
        start_side,
        end_side,
        curvature,
    )
}
