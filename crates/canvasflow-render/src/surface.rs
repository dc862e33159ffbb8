use canvasflow_core::geom::{Point, Rect, Size, Vector, size};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderStyle {
    /// Precise vector paths.
    #[default]
    Vector,
    /// Hand-drawn strokes.
    Sketch,
}

impl std::str::FromStr for RenderStyle {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vector" | "svg" => Ok(Self::Vector),
            "sketch" | "hand-drawn" | "rough" => Ok(Self::Sketch),
            _ => Err(()),
        }
    }
}

/// Where a drawable layer sits in container (model) space and how big it is.
///
/// Primitives are drawn in layer-local coordinates, i.e. model coordinates shifted by
/// [`Surface::offset`]. The layer itself is positioned at `origin`, so a point ends up at the
/// same container position whichever style produced the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub style: RenderStyle,
    pub origin: Point,
    pub size: Size,
}

impl Surface {
    /// A scalable layer covering exactly the content bounds (at least 1×1).
    pub fn vector(bounds: Rect) -> Self {
        Self {
            style: RenderStyle::Vector,
            origin: bounds.origin,
            size: size(bounds.width().max(1.0), bounds.height().max(1.0)),
        }
    }

    /// A fixed-resolution layer at least `factor` viewports large, so panning around the content
    /// does not expose its edge.
    pub fn sketch(bounds: Rect, viewport: Size, factor: f64) -> Self {
        Self {
            style: RenderStyle::Sketch,
            origin: bounds.origin,
            size: size(
                (viewport.width * factor).max(bounds.width()),
                (viewport.height * factor).max(bounds.height()),
            ),
        }
    }

    pub fn for_style(style: RenderStyle, bounds: Rect, viewport: Size, factor: f64) -> Self {
        match style {
            RenderStyle::Vector => Self::vector(bounds),
            RenderStyle::Sketch => Self::sketch(bounds, viewport, factor),
        }
    }

    /// Shift applied to model coordinates before drawing.
    pub fn offset(&self) -> Vector {
        -self.origin.to_vector()
    }

    pub fn to_local(&self, model: Point) -> Point {
        model + self.offset()
    }

    pub fn to_container(&self, local: Point) -> Point {
        local + self.origin.to_vector()
    }
}
