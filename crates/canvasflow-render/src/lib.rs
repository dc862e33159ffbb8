#![forbid(unsafe_code)]

//! Scene assembly and drawing backends.
//!
//! [`scene::assemble_scene`] turns nodes and edges into model-space [`scene::Primitive`]s plus a
//! content bounding box. A [`surface::Surface`] decides where the drawable layer sits and how
//! primitive coordinates are offset into it, and a [`backend::RenderBackend`] draws the offset
//! primitives. Two backends ship: precise vector SVG and hand-drawn SVG through `roughr`.

pub mod backend;
mod fmt;
pub mod scene;
pub mod surface;

pub use backend::sketch::{SketchBackend, SketchOptions};
pub use backend::svg::SvgBackend;
pub use backend::{RenderBackend, draw_scene};
pub use scene::{CurvePrimitive, Primitive, RectPrimitive, Scene, SceneOptions, assemble_scene};
pub use surface::{RenderStyle, Surface};

use canvasflow_core::geom::Size;
use canvasflow_core::{CanvasConfig, Edge, Node};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("sketch renderer options error: {message}")]
    Sketch { message: String },
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderOptions {
    pub scene: SceneOptions,
    pub sketch: SketchOptions,
}

impl RenderOptions {
    pub fn from_config(config: &CanvasConfig) -> Self {
        Self {
            scene: SceneOptions::from_config(config),
            sketch: SketchOptions::from_config(config),
        }
    }
}

/// Assembles and draws a document as a standalone SVG layer in the given style.
///
/// `viewport` only matters for the sketch surface, which is at least `viewport * factor`
/// large.
pub fn render_svg(
    nodes: &[Node],
    edges: &[Edge],
    style: RenderStyle,
    viewport: Size,
    options: &RenderOptions,
) -> Result<String> {
    let scene = assemble_scene(nodes, edges, &options.scene);
    let surface = Surface::for_style(
        style,
        scene.bounds,
        viewport,
        options.scene.sketch_surface_factor,
    );
    tracing::debug!(
        ?style,
        primitives = scene.primitives.len(),
        width = surface.size.width,
        height = surface.size.height,
        "render svg"
    );
    match style {
        RenderStyle::Vector => {
            let mut backend = SvgBackend::new();
            draw_scene(&scene, &surface, &mut backend)?;
            Ok(backend.into_svg())
        }
        RenderStyle::Sketch => {
            let mut backend = SketchBackend::new(options.sketch.clone());
            draw_scene(&scene, &surface, &mut backend)?;
            Ok(backend.into_svg())
        }
    }
}
