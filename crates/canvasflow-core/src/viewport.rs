//! Pan/zoom viewport.
//!
//! The viewport is the affine map `screen = model * scale + translate`. [`Viewport::to_screen`]
//! and [`Viewport::to_model`] are the only places that formula is written; every interaction
//! routes through them.

use crate::config::{FitOptions, ZoomLimits};
use crate::geom::{Point, Size, Vector, point, vector};
use crate::model::{Node, nodes_bounding_box};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportState {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    scale: f64,
    translate: Vector,
    limits: ZoomLimits,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(ZoomLimits::default())
    }
}

impl Viewport {
    pub fn new(limits: ZoomLimits) -> Self {
        Self {
            scale: limits.clamp(1.0),
            translate: vector(0.0, 0.0),
            limits,
        }
    }

    /// Restores a saved state; the scale is clamped to the limits.
    pub fn from_state(state: ViewportState, limits: ZoomLimits) -> Self {
        Self {
            scale: limits.clamp(state.scale),
            translate: vector(state.translate_x, state.translate_y),
            limits,
        }
    }

    pub fn state(&self) -> ViewportState {
        ViewportState {
            scale: self.scale,
            translate_x: self.translate.x,
            translate_y: self.translate.y,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn translate(&self) -> Vector {
        self.translate
    }

    pub fn limits(&self) -> ZoomLimits {
        self.limits
    }

    /// Zoom level as a rounded percentage, as shown to users.
    pub fn zoom_percent(&self) -> i64 {
        (self.scale * 100.0).round() as i64
    }

    pub fn to_screen(&self, model: Point) -> Point {
        model * self.scale + self.translate
    }

    pub fn to_model(&self, screen: Point) -> Point {
        (screen - self.translate) / self.scale
    }

    /// Converts a screen-space delta into model units (the scale only, no translation).
    pub fn delta_to_model(&self, delta: Vector) -> Vector {
        delta / self.scale
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.translate += vector(dx, dy);
    }

    /// Zooms by `factor` keeping the model point under `screen` fixed on screen.
    ///
    /// The resulting scale saturates at the zoom limits. Non-finite or non-positive factors
    /// are ignored.
    pub fn zoom_at_screen_point(&mut self, screen: Point, factor: f64) {
        if !(factor.is_finite() && factor > 0.0) {
            return;
        }
        let anchor = self.to_model(screen);
        self.scale = self.limits.clamp(self.scale * factor);
        self.translate = screen - anchor * self.scale;
    }

    pub fn zoom_at_viewport_center(&mut self, viewport: Size, factor: f64) {
        self.zoom_at_screen_point(point(viewport.width / 2.0, viewport.height / 2.0), factor);
    }

    /// Frames every node inside a `viewport`-sized screen area.
    ///
    /// The scale never exceeds `1.0` (no upscaling) and is clamped to the zoom limits. The
    /// content is centered, then shifted down by `opts.top_offset`. Does nothing when there are
    /// no nodes.
    pub fn fit_to_content(&mut self, nodes: &[Node], viewport: Size, opts: &FitOptions) {
        let Some(bb) = nodes_bounding_box(nodes) else {
            return;
        };
        let padded_w = bb.width() + opts.padding * 2.0;
        let padded_h = bb.height() + opts.padding * 2.0;
        let scale = (viewport.width / padded_w)
            .min((viewport.height - opts.chrome_height) / padded_h)
            .min(1.0);
        self.scale = self.limits.clamp(scale);
        self.translate = vector(
            (viewport.width - bb.width() * self.scale) / 2.0 - bb.min_x() * self.scale,
            (viewport.height - bb.height() * self.scale) / 2.0 - bb.min_y() * self.scale
                + opts.top_offset,
        );
        tracing::debug!(
            scale = self.scale,
            translate_x = self.translate.x,
            translate_y = self.translate.y,
            nodes = nodes.len(),
            "fit viewport to content"
        );
    }
}
