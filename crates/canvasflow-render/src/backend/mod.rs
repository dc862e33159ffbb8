//! Drawing backends.
//!
//! A backend receives primitives already offset into surface-local coordinates; it never sees
//! model coordinates or the viewport transform.

pub mod sketch;
pub mod svg;

use crate::Result;
use crate::scene::{CurvePrimitive, Primitive, RectPrimitive, Scene};
use crate::surface::Surface;

pub trait RenderBackend {
    fn begin(&mut self, surface: &Surface) -> Result<()>;
    fn draw_rect(&mut self, rect: &RectPrimitive) -> Result<()>;
    fn draw_curve(&mut self, curve: &CurvePrimitive) -> Result<()>;
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Draws every primitive of `scene` onto `surface`, in scene order.
pub fn draw_scene<B: RenderBackend + ?Sized>(
    scene: &Scene,
    surface: &Surface,
    backend: &mut B,
) -> Result<()> {
    backend.begin(surface)?;
    let offset = surface.offset();
    for p in &scene.primitives {
        match p {
            Primitive::Rect(r) => backend.draw_rect(&r.translated(offset))?,
            Primitive::Curve(c) => backend.draw_curve(&c.translated(offset))?,
        }
    }
    backend.finish()
}
