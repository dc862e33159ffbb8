//! Precise vector backend: plain SVG `<rect>` and cubic `<path>` elements.

use super::RenderBackend;
use crate::Result;
use crate::fmt::push_num;
use crate::scene::{CurvePrimitive, RectPrimitive};
use crate::surface::Surface;
use canvasflow_core::geometry::CubicCurve;

const STROKE_WIDTH: &str = "2";
pub(crate) const GROUP_FILL_ALPHA: f64 = 0.05;

pub struct SvgBackend {
    out: String,
    buf: ryu_js::Buffer,
}

impl Default for SvgBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SvgBackend {
    pub fn new() -> Self {
        Self {
            out: String::new(),
            buf: ryu_js::Buffer::new(),
        }
    }

    pub fn as_svg(&self) -> &str {
        &self.out
    }

    pub fn into_svg(self) -> String {
        self.out
    }

    fn num(&mut self, v: f64) {
        push_num(&mut self.out, v, &mut self.buf);
    }
}

/// `M sx sy C c1x c1y, c2x c2y, ex ey`.
pub fn cubic_path_d(curve: &CubicCurve) -> String {
    let mut out = String::new();
    let mut buf = ryu_js::Buffer::new();
    push_cubic_path_d(&mut out, curve, &mut buf);
    out
}

fn push_cubic_path_d(out: &mut String, c: &CubicCurve, buf: &mut ryu_js::Buffer) {
    out.push_str("M ");
    push_num(out, c.start.x, buf);
    out.push(' ');
    push_num(out, c.start.y, buf);
    out.push_str(" C ");
    push_num(out, c.cp1.x, buf);
    out.push(' ');
    push_num(out, c.cp1.y, buf);
    out.push_str(", ");
    push_num(out, c.cp2.x, buf);
    out.push(' ');
    push_num(out, c.cp2.y, buf);
    out.push_str(", ");
    push_num(out, c.end.x, buf);
    out.push(' ');
    push_num(out, c.end.y, buf);
}

impl RenderBackend for SvgBackend {
    fn begin(&mut self, surface: &Surface) -> Result<()> {
        self.out.clear();
        self.out
            .push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" class="canvasflow-vector" width=""#);
        self.num(surface.size.width);
        self.out.push_str(r#"" height=""#);
        self.num(surface.size.height);
        self.out.push_str(r#"" viewBox="0 0 "#);
        self.num(surface.size.width);
        self.out.push(' ');
        self.num(surface.size.height);
        self.out.push_str(r#"" data-origin-x=""#);
        self.num(surface.origin.x);
        self.out.push_str(r#"" data-origin-y=""#);
        self.num(surface.origin.y);
        self.out.push_str(r#"">"#);
        Ok(())
    }

    fn draw_rect(&mut self, r: &RectPrimitive) -> Result<()> {
        self.out.push_str(r#"<rect data-node=""#);
        push_escaped(&mut self.out, &r.node_id);
        self.out.push_str(r#"" x=""#);
        self.num(r.rect.origin.x);
        self.out.push_str(r#"" y=""#);
        self.num(r.rect.origin.y);
        self.out.push_str(r#"" width=""#);
        self.num(r.rect.size.width);
        self.out.push_str(r#"" height=""#);
        self.num(r.rect.size.height);
        self.out.push_str(r#"" fill=""#);
        match r.fill {
            Some(c) => self.out.push_str(&c.css_with_alpha(GROUP_FILL_ALPHA)),
            None => self.out.push_str("none"),
        }
        self.out.push_str(r#"" stroke=""#);
        self.out.push_str(&r.stroke.to_string());
        self.out.push_str(r#"" stroke-width=""#);
        self.out.push_str(STROKE_WIDTH);
        self.out.push_str(r#""/>"#);
        Ok(())
    }

    fn draw_curve(&mut self, c: &CurvePrimitive) -> Result<()> {
        self.out.push_str(r#"<path d=""#);
        push_cubic_path_d(&mut self.out, &c.curve, &mut self.buf);
        self.out.push_str(r#"" fill="none" stroke=""#);
        self.out.push_str(&c.stroke.to_string());
        self.out.push_str(r#"" stroke-width=""#);
        self.out.push_str(STROKE_WIDTH);
        self.out.push_str(r#""/>"#);
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.out.push_str("</svg>");
        Ok(())
    }
}

pub(crate) fn push_escaped(out: &mut String, s: &str) {
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
}
