use canvasflow_core::geom::{Rect, Vector, rect_from_extents};
use canvasflow_core::geometry::{CubicCurve, edge_curve};
use canvasflow_core::model::nodes_bounding_box;
use canvasflow_core::palette::{self, Rgb};
use canvasflow_core::{CanvasConfig, Edge, GeometryOptions, Node};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneOptions {
    /// Model units added around the node bounding box so strokes and edge bulges near the
    /// boundary are not clipped.
    pub margin: f64,
    pub geometry: GeometryOptions,
    /// Sketch surfaces are at least this many viewports wide and tall.
    pub sketch_surface_factor: f64,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            margin: 200.0,
            geometry: GeometryOptions::default(),
            sketch_surface_factor: 5.0,
        }
    }
}

impl SceneOptions {
    pub fn from_config(config: &CanvasConfig) -> Self {
        let d = Self::default();
        Self {
            margin: config
                .get_f64("scene.margin")
                .filter(|v| *v >= 0.0)
                .unwrap_or(d.margin),
            geometry: GeometryOptions::from_config(config),
            sketch_surface_factor: config
                .get_f64("scene.sketchSurfaceFactor")
                .filter(|v| *v > 0.0)
                .unwrap_or(d.sketch_surface_factor),
        }
    }
}

/// A node outline. Groups carry a fill.
#[derive(Debug, Clone, PartialEq)]
pub struct RectPrimitive {
    pub node_id: String,
    pub rect: Rect,
    pub stroke: Rgb,
    pub fill: Option<Rgb>,
}

impl RectPrimitive {
    pub fn translated(&self, by: Vector) -> Self {
        Self {
            rect: self.rect.translate(by),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurvePrimitive {
    pub curve: CubicCurve,
    pub stroke: Rgb,
    /// Segment count for backends that approximate the curve with a polyline.
    pub steps: usize,
}

impl CurvePrimitive {
    pub fn translated(&self, by: Vector) -> Self {
        Self {
            curve: self.curve.translate(by),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Rect(RectPrimitive),
    Curve(CurvePrimitive),
}

/// Model-space drawing list: node rectangles first (document order), then edge curves.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub bounds: Rect,
    pub primitives: Vec<Primitive>,
}

/// Node bounding box grown by `margin` on each side, or a zero box when there are no nodes.
pub fn compute_content_bounds(nodes: &[Node], margin: f64) -> Rect {
    match nodes_bounding_box(nodes) {
        Some(bb) => rect_from_extents(
            bb.min_x() - margin,
            bb.min_y() - margin,
            bb.max_x() + margin,
            bb.max_y() + margin,
        ),
        None => Rect::zero(),
    }
}

pub fn assemble_scene(nodes: &[Node], edges: &[Edge], opts: &SceneOptions) -> Scene {
    let mut primitives = Vec::with_capacity(nodes.len() + edges.len());

    for n in nodes {
        let color = palette::node_color(n.color.as_ref());
        primitives.push(Primitive::Rect(RectPrimitive {
            node_id: n.id.clone(),
            rect: n.rect(),
            stroke: color,
            fill: n.is_group().then_some(color),
        }));
    }

    let mut skipped = 0usize;
    for e in edges {
        let from = nodes.iter().find(|n| n.id == e.from_node);
        let to = nodes.iter().find(|n| n.id == e.to_node);
        let (Some(from), Some(to)) = (from, to) else {
            skipped += 1;
            continue;
        };
        primitives.push(Primitive::Curve(CurvePrimitive {
            curve: edge_curve(
                from,
                to,
                e.start_side(),
                e.end_side(),
                opts.geometry.curvature,
            ),
            stroke: palette::edge_color(e.color.as_ref()),
            steps: opts.geometry.curve_steps,
        }));
    }
    if skipped > 0 {
        tracing::debug!(skipped, "edges with missing endpoints not drawn");
    }

    Scene {
        bounds: compute_content_bounds(nodes, opts.margin),
        primitives,
    }
}
