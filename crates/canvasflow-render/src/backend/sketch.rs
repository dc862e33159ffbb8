//! Hand-drawn backend built on `roughr` (the RoughJS port).
//!
//! Node rectangles are roughened outlines (groups also get a rough solid fill underneath); edges
//! are sampled into a polyline and roughened as a path. Every shape gets its own seed derived from
//! `SketchOptions::seed` and the draw order, so the same scene always renders the same strokes.

use super::RenderBackend;
use super::svg::{GROUP_FILL_ALPHA, push_escaped};
use crate::fmt::push_num;
use crate::scene::{CurvePrimitive, RectPrimitive};
use crate::surface::Surface;
use crate::{Error, Result};
use canvasflow_core::CanvasConfig;
use canvasflow_core::palette::Rgb;
use roughr::core::{FillStyle, OpSet, OpType, Options, OptionsBuilder};

#[derive(Debug, Clone, PartialEq)]
pub struct SketchOptions {
    /// Base seed; must be non-zero for reproducible strokes.
    pub seed: u64,
    pub roughness: f32,
    pub stroke_width: f32,
}

impl Default for SketchOptions {
    fn default() -> Self {
        Self {
            seed: 1,
            roughness: 1.0,
            stroke_width: 1.5,
        }
    }
}

impl SketchOptions {
    pub fn from_config(config: &CanvasConfig) -> Self {
        let d = Self::default();
        Self {
            seed: config
                .get_u64("sketch.seed")
                .filter(|v| *v != 0)
                .unwrap_or(d.seed),
            roughness: config
                .get_f64("sketch.roughness")
                .filter(|v| *v >= 0.0)
                .map(|v| v as f32)
                .unwrap_or(d.roughness),
            stroke_width: config
                .get_f64("sketch.strokeWidth")
                .filter(|v| *v > 0.0)
                .map(|v| v as f32)
                .unwrap_or(d.stroke_width),
        }
    }
}

pub struct SketchBackend {
    opts: SketchOptions,
    shapes: u64,
    out: String,
    buf: ryu_js::Buffer,
}

impl SketchBackend {
    pub fn new(opts: SketchOptions) -> Self {
        Self {
            opts,
            shapes: 0,
            out: String::new(),
            buf: ryu_js::Buffer::new(),
        }
    }

    pub fn into_svg(self) -> String {
        self.out
    }

    fn next_seed(&mut self) -> u64 {
        let seed = self.opts.seed.wrapping_add(self.shapes);
        self.shapes += 1;
        // Seed 0 makes roughr fall back to an unseeded RNG.
        if seed == 0 { 1 } else { seed }
    }

    fn shape_options(&mut self, stroke: Rgb, fill: Option<Rgb>) -> Result<Options> {
        let seed = self.next_seed();
        let mut builder = OptionsBuilder::default();
        builder
            .seed(seed)
            .roughness(self.opts.roughness)
            .stroke(srgba(stroke))
            .stroke_width(self.opts.stroke_width);
        if let Some(fill) = fill {
            builder.fill(srgba(fill)).fill_style(FillStyle::Solid);
        }
        builder.build().map_err(|e| Error::Sketch {
            message: e.to_string(),
        })
    }

    fn num(&mut self, v: f64) {
        push_num(&mut self.out, v, &mut self.buf);
    }

    fn push_path(&mut self, set: &OpSet<f64>, paint: Paint) {
        let d = ops_to_svg_path_d(set, &mut self.buf);
        if d.is_empty() {
            return;
        }
        self.out.push_str(r#"<path d=""#);
        self.out.push_str(&d);
        match paint {
            Paint::Fill(color) => {
                self.out.push_str(r#"" stroke="none" fill=""#);
                self.out.push_str(&color.css_with_alpha(GROUP_FILL_ALPHA));
            }
            Paint::Stroke(color) => {
                self.out.push_str(r#"" fill="none" stroke=""#);
                self.out.push_str(&color.to_string());
                self.out.push_str(r#"" stroke-width=""#);
                self.num(f64::from(self.opts.stroke_width));
            }
        }
        self.out.push_str(r#""/>"#);
    }
}

#[derive(Debug, Clone, Copy)]
enum Paint {
    Fill(Rgb),
    Stroke(Rgb),
}

fn srgba(c: Rgb) -> roughr::Srgba {
    let (r, g, b) = c.to_unit();
    roughr::Srgba::new(r, g, b, 1.0)
}

fn ops_to_svg_path_d(opset: &OpSet<f64>, buf: &mut ryu_js::Buffer) -> String {
    let mut out = String::new();
    for op in &opset.ops {
        match op.op {
            OpType::Move => {
                out.push('M');
                push_pairs(&mut out, &op.data[..2], buf);
            }
            OpType::BCurveTo => {
                out.push('C');
                push_pairs(&mut out, &op.data[..6], buf);
            }
            OpType::LineTo => {
                out.push('L');
                push_pairs(&mut out, &op.data[..2], buf);
            }
        }
        out.push(' ');
    }
    out.trim_end().to_string()
}

// `x y, x y, ...`
fn push_pairs(out: &mut String, data: &[f64], buf: &mut ryu_js::Buffer) {
    for (i, pair) in data.chunks(2).enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        push_num(out, pair[0], buf);
        out.push(' ');
        push_num(out, pair[1], buf);
    }
}

fn polyline_path_d(points: &[canvasflow_core::Point], buf: &mut ryu_js::Buffer) -> String {
    let mut out = String::new();
    for (i, p) in points.iter().enumerate() {
        out.push_str(if i == 0 { "M " } else { " L " });
        push_num(&mut out, p.x, buf);
        out.push(' ');
        push_num(&mut out, p.y, buf);
    }
    out
}

impl RenderBackend for SketchBackend {
    fn begin(&mut self, surface: &Surface) -> Result<()> {
        self.out.clear();
        self.shapes = 0;
        self.out
            .push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" class="canvasflow-sketch" width=""#);
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
        let mut options = self.shape_options(r.stroke, r.fill)?;
        let (x, y) = (r.rect.origin.x, r.rect.origin.y);
        let (w, h) = (r.rect.size.width, r.rect.size.height);
        // Outline first so the fill draws from the advanced PRNG state; emit fill below stroke.
        let stroke = roughr::renderer::rectangle::<f64>(x, y, w, h, &mut options);
        self.out.push_str(r#"<g data-node=""#);
        push_escaped(&mut self.out, &r.node_id);
        self.out.push_str(r#"">"#);
        if let Some(fill) = r.fill {
            let poly = vec![vec![
                roughr::Point2D::new(x, y),
                roughr::Point2D::new(x + w, y),
                roughr::Point2D::new(x + w, y + h),
                roughr::Point2D::new(x, y + h),
            ]];
            let fill_set = roughr::renderer::solid_fill_polygon(&poly, &mut options);
            self.push_path(&fill_set, Paint::Fill(fill));
        }
        self.push_path(&stroke, Paint::Stroke(r.stroke));
        self.out.push_str("</g>");
        Ok(())
    }

    fn draw_curve(&mut self, c: &CurvePrimitive) -> Result<()> {
        let mut options = self.shape_options(c.stroke, None)?;
        let d = polyline_path_d(&c.curve.sample(c.steps), &mut self.buf);
        let set = roughr::renderer::svg_path::<f64>(d, &mut options);
        self.push_path(&set, Paint::Stroke(c.stroke));
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.out.push_str("</svg>");
        Ok(())
    }
}
