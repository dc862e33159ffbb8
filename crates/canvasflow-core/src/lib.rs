#![forbid(unsafe_code)]

//! Headless core for node-and-edge canvases.
//!
//! This crate owns the JSON document model, the edge geometry (side attachment points and
//! cubic curves) and the pan/zoom viewport math. Layout lives in `canvasflow-layout`, drawing
//! in `canvasflow-render`.

pub mod config;
pub mod error;
pub mod geom;
pub mod geometry;
pub mod model;
pub mod palette;
pub mod viewport;

pub use config::{CanvasConfig, FitOptions, GeometryOptions, ZoomLimits};
pub use error::{Error, Result};
pub use geom::{Point, Rect, Size, Vector};
pub use geometry::{CubicCurve, Side};
pub use model::{CanvasDocument, Edge, EdgeSide, Node, NodeKind};
pub use palette::{Color, Rgb};
pub use viewport::Viewport;
