#![forbid(unsafe_code)]

//! `canvasflow` is a headless engine for node-and-edge "infinite canvas" documents.
//!
//! The building blocks live in their own crates:
//! - `canvasflow-core`: document model, palette, edge geometry, viewport math, config
//! - `canvasflow-layout`: force-directed auto-layout and the Manual/Auto controller
//! - `canvasflow-render`: scene assembly plus vector and hand-drawn SVG backends
//!
//! [`Session`] ties them together the way an interactive host uses them: one document, one
//! viewport, one gesture at a time.

pub use canvasflow_core::{CanvasConfig, CanvasDocument, Edge, Node, NodeKind, Side, Viewport};
pub use canvasflow_layout::LayoutMode;
pub use canvasflow_render::RenderStyle;

mod session;

pub use session::{Gesture, Session, SessionOptions};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] canvasflow_core::Error),
    #[error(transparent)]
    Layout(#[from] canvasflow_layout::Error),
    #[error(transparent)]
    Render(#[from] canvasflow_render::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
