use crate::Result;
use canvasflow_core::geom::{Point, Size, point, size};
use canvasflow_core::palette::{self, Color};
use canvasflow_core::{
    CanvasConfig, CanvasDocument, FitOptions, Node, NodeKind, Viewport, ZoomLimits,
};
use canvasflow_layout::{ForceLayoutOptions, LayoutController, LayoutMode};
use canvasflow_render::{
    RenderBackend, RenderOptions, RenderStyle, Surface, assemble_scene, draw_scene,
};

const NEW_NODE_WIDTH: f64 = 250.0;
const NEW_NODE_HEIGHT: f64 = 150.0;
const NEW_NODE_COLOR: &str = "1";
const NEW_TEXT: &str = "# New Node\nStart typing...";
const NEW_LINK: &str = "https://obsidian.md";
const NEW_GROUP_LABEL: &str = "New Group";

#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    pub zoom: ZoomLimits,
    pub fit: FitOptions,
    pub wheel_zoom_in: f64,
    pub wheel_zoom_out: f64,
    pub button_zoom_in: f64,
    pub button_zoom_out: f64,
    pub layout: ForceLayoutOptions,
    pub render: RenderOptions,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            zoom: ZoomLimits::default(),
            fit: FitOptions::default(),
            wheel_zoom_in: 1.1,
            wheel_zoom_out: 0.9,
            button_zoom_in: 1.2,
            button_zoom_out: 0.8,
            layout: ForceLayoutOptions::default(),
            render: RenderOptions::default(),
        }
    }
}

impl SessionOptions {
    pub fn from_config(config: &CanvasConfig) -> Self {
        let d = Self::default();
        let factor = |key: &str, fallback: f64| {
            config
                .get_f64(key)
                .filter(|v| *v > 0.0)
                .unwrap_or(fallback)
        };
        Self {
            zoom: ZoomLimits::from_config(config),
            fit: FitOptions::from_config(config),
            wheel_zoom_in: factor("viewport.wheelZoomIn", d.wheel_zoom_in),
            wheel_zoom_out: factor("viewport.wheelZoomOut", d.wheel_zoom_out),
            button_zoom_in: factor("viewport.buttonZoomIn", d.button_zoom_in),
            button_zoom_out: factor("viewport.buttonZoomOut", d.button_zoom_out),
            layout: ForceLayoutOptions::from_config(config),
            render: RenderOptions::from_config(config),
        }
    }
}

/// The pointer gesture in progress. Decided at pointer-down and fixed until pointer-up.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Panning {
        last: Point,
    },
    DraggingNode {
        id: String,
        last: Point,
    },
}

/// One open canvas: the document, its view, the layout mode and the active gesture.
///
/// Every host event maps to one method call that runs to completion; nothing here is shared or
/// deferred.
#[derive(Debug, Clone)]
pub struct Session {
    document: CanvasDocument,
    viewport: Viewport,
    viewport_size: Size,
    layout: LayoutController,
    style: RenderStyle,
    gesture: Gesture,
    options: SessionOptions,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionOptions::default(), size(1280.0, 720.0))
    }
}

impl Session {
    pub fn new(options: SessionOptions, viewport_size: Size) -> Self {
        Self {
            document: CanvasDocument::default(),
            viewport: Viewport::new(options.zoom),
            viewport_size,
            layout: LayoutController::new(options.layout),
            style: RenderStyle::default(),
            gesture: Gesture::Idle,
            options,
        }
    }

    pub fn document(&self) -> &CanvasDocument {
        &self.document
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_size(&self) -> Size {
        self.viewport_size
    }

    pub fn set_viewport_size(&mut self, viewport_size: Size) {
        self.viewport_size = viewport_size;
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn layout_mode(&self) -> LayoutMode {
        self.layout.mode()
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    /// Style used by [`Session::render`] and [`Session::render_svg`].
    pub fn style(&self) -> RenderStyle {
        self.style
    }

    pub fn set_style(&mut self, style: RenderStyle) {
        self.style = style;
    }

    /// Replaces the document with `json` and fits the view to it.
    ///
    /// On error the session is left exactly as it was.
    pub fn load_str(&mut self, json: &str) -> Result<()> {
        let document = CanvasDocument::from_json_str(json)?;
        tracing::debug!(
            nodes = document.nodes.len(),
            edges = document.edges.len(),
            "document loaded"
        );
        self.document = document;
        self.layout.reset();
        self.gesture = Gesture::Idle;
        self.fit_view();
        Ok(())
    }

    pub fn save_string(&self) -> Result<String> {
        Ok(self.document.to_json_string_pretty()?)
    }

    /// Adds a 250×150 node of `kind` centered on the middle of the viewport and returns its id.
    pub fn create_node(&mut self, kind: NodeKind) -> String {
        let center = self.view_center();
        let id = uuid::Uuid::new_v4().simple().to_string();
        let mut node = Node::new(
            id.clone(),
            center.x - NEW_NODE_WIDTH / 2.0,
            center.y - NEW_NODE_HEIGHT / 2.0,
            NEW_NODE_WIDTH,
            NEW_NODE_HEIGHT,
        );
        node.color = Some(Color::new(NEW_NODE_COLOR));
        match &kind {
            NodeKind::Text => node.text = Some(NEW_TEXT.to_string()),
            NodeKind::Link => node.url = Some(NEW_LINK.to_string()),
            NodeKind::Group => node.label = Some(NEW_GROUP_LABEL.to_string()),
            NodeKind::File | NodeKind::Other(_) => {}
        }
        let node = node.with_kind(kind);
        tracing::debug!(id = %node.id, kind = node.kind().as_str(), "node created");
        self.document.nodes.push(node);
        id
    }

    /// Removes the node and every edge that touches it.
    pub fn delete_node(&mut self, id: &str) -> Option<Node> {
        let removed = self.document.remove_node(id)?;
        if matches!(&self.gesture, Gesture::DraggingNode { id: dragged, .. } if dragged == id) {
            self.gesture = Gesture::Idle;
        }
        Some(removed)
    }

    /// Advances the node to the next palette color, returning the new value.
    pub fn cycle_color(&mut self, id: &str) -> Option<String> {
        let node = self.document.node_mut(id)?;
        let next = palette::next_color(node.color.as_ref().and_then(Color::key).as_deref());
        node.color = Some(Color::new(next.clone()));
        Some(next)
    }

    pub fn content(&self, id: &str) -> Option<&str> {
        self.document.node(id).map(Node::content)
    }

    /// Writes the node's editable payload. Returns `false` for unknown ids and file nodes.
    pub fn set_content(&mut self, id: &str, value: &str) -> bool {
        self.document
            .node_mut(id)
            .is_some_and(|n| n.set_content(value))
    }

    pub fn pointer_down_canvas(&mut self, screen: Point) {
        self.gesture = Gesture::Panning { last: screen };
    }

    /// Starts dragging `id`. Unknown ids start no gesture.
    pub fn pointer_down_node(&mut self, id: &str, screen: Point) -> bool {
        if self.document.node(id).is_none() {
            self.gesture = Gesture::Idle;
            return false;
        }
        self.gesture = Gesture::DraggingNode {
            id: id.to_string(),
            last: screen,
        };
        true
    }

    /// Applies the pointer delta since the last event to the active gesture.
    pub fn pointer_move(&mut self, screen: Point) {
        match &mut self.gesture {
            Gesture::Idle => {}
            Gesture::Panning { last } => {
                let delta = screen - *last;
                *last = screen;
                self.viewport.pan_by(delta.x, delta.y);
            }
            Gesture::DraggingNode { id, last } => {
                let delta = self.viewport.delta_to_model(screen - *last);
                *last = screen;
                if let Some(node) = self.document.node_mut(id) {
                    node.set_position(node.position() + delta);
                }
            }
        }
    }

    pub fn pointer_up(&mut self) {
        self.gesture = Gesture::Idle;
    }

    /// Wheel zoom about `screen`: scrolling down zooms out, anything else zooms in.
    pub fn wheel(&mut self, screen: Point, delta_y: f64) {
        let factor = if delta_y > 0.0 {
            self.options.wheel_zoom_out
        } else {
            self.options.wheel_zoom_in
        };
        self.viewport.zoom_at_screen_point(screen, factor);
    }

    pub fn zoom_in(&mut self) {
        let f = self.options.button_zoom_in;
        self.viewport.zoom_at_viewport_center(self.viewport_size, f);
    }

    pub fn zoom_out(&mut self) {
        let f = self.options.button_zoom_out;
        self.viewport.zoom_at_viewport_center(self.viewport_size, f);
    }

    pub fn fit_view(&mut self) {
        self.viewport
            .fit_to_content(&self.document.nodes, self.viewport_size, &self.options.fit);
    }

    pub fn zoom_percent(&self) -> i64 {
        self.viewport.zoom_percent()
    }

    /// Manual ⇄ Auto. Returns whether the mode changed.
    pub fn set_auto_layout(&mut self, auto: bool) -> Result<bool> {
        let CanvasDocument { nodes, edges, .. } = &mut self.document;
        Ok(self.layout.set_auto(auto, nodes, edges)?)
    }

    /// Draws the current document onto `backend` in the session style and returns the surface
    /// it was drawn on.
    pub fn render<B: RenderBackend + ?Sized>(&self, backend: &mut B) -> Result<Surface> {
        let opts = &self.options.render;
        let scene = assemble_scene(&self.document.nodes, &self.document.edges, &opts.scene);
        let surface = Surface::for_style(
            self.style,
            scene.bounds,
            self.viewport_size,
            opts.scene.sketch_surface_factor,
        );
        draw_scene(&scene, &surface, backend)?;
        Ok(surface)
    }

    pub fn render_svg(&self) -> Result<String> {
        Ok(canvasflow_render::render_svg(
            &self.document.nodes,
            &self.document.edges,
            self.style,
            self.viewport_size,
            &self.options.render,
        )?)
    }

    /// Model-space point currently under the middle of the viewport.
    pub fn view_center(&self) -> Point {
        self.viewport.to_model(point(
            self.viewport_size.width / 2.0,
            self.viewport_size.height / 2.0,
        ))
    }
}
