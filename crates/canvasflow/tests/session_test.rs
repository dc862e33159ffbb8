use canvasflow::{Error, Gesture, LayoutMode, NodeKind, RenderStyle, Session, SessionOptions};
use canvasflow_core::geom::{Point, point, size};
use canvasflow_core::palette::Color;
use canvasflow_render::SvgBackend;

const TWO_NODES: &str = r#"{
  "nodes": [
    {"id": "a", "type": "text", "x": 0, "y": 0, "width": 100, "height": 50, "text": "hello", "color": "6"},
    {"id": "b", "type": "link", "x": 10, "y": 10, "width": 100, "height": 50, "url": "https://example.com"}
  ],
  "edges": [],
  "meta": {"version": "1.0"}
}"#;

const TRIANGLE: &str = r#"{
  "nodes": [
    {"id": "a", "type": "text", "x": 0, "y": 0, "width": 100, "height": 100},
    {"id": "b", "type": "group", "x": 400, "y": 0, "width": 100, "height": 100, "label": "G"},
    {"id": "c", "type": "file", "x": 0, "y": 400, "width": 100, "height": 100, "file": "notes.md"}
  ],
  "edges": [
    {"fromNode": "a", "toNode": "b"},
    {"fromNode": "b", "toNode": "c", "fromSide": "bottom", "toSide": "top"},
    {"fromNode": "a", "toNode": "c", "color": "2"}
  ]
}"#;

fn loaded(json: &str) -> Session {
    let mut s = Session::new(SessionOptions::default(), size(1000.0, 1000.0));
    s.load_str(json).unwrap();
    s
}

fn close(a: Point, b: Point) -> bool {
    (a - b).length() < 1e-9
}

#[test]
fn load_fits_the_view_to_the_document() {
    let s = loaded(r#"{"nodes": [{"id": "n", "x": 0, "y": 0, "width": 100, "height": 100}]}"#);
    let state = s.viewport().state();
    assert_eq!(state.scale, 1.0);
    assert_eq!((state.translate_x, state.translate_y), (450.0, 482.0));
    assert_eq!(s.zoom_percent(), 100);
}

#[test]
fn failed_load_leaves_the_session_untouched() {
    let mut s = loaded(TWO_NODES);
    s.pointer_down_canvas(point(0.0, 0.0));
    s.pointer_move(point(30.0, 40.0));
    s.pointer_up();
    let doc = s.document().clone();
    let view = s.viewport().state();

    assert!(matches!(s.load_str("{ not json"), Err(Error::Core(_))));
    let dup = r#"{"nodes": [
        {"id": "x", "x": 0, "y": 0, "width": 1, "height": 1},
        {"id": "x", "x": 5, "y": 5, "width": 1, "height": 1}
    ]}"#;
    assert!(s.load_str(dup).is_err());
    let bad_size = r#"{"nodes": [{"id": "x", "x": 0, "y": 0, "width": 0, "height": 1}]}"#;
    assert!(s.load_str(bad_size).is_err());

    assert_eq!(s.document(), &doc);
    assert_eq!(s.viewport().state(), view);
}

#[test]
fn save_preserves_unknown_fields_and_order() {
    let s = loaded(TWO_NODES);
    let saved: serde_json::Value = serde_json::from_str(&s.save_string().unwrap()).unwrap();
    assert_eq!(saved["meta"]["version"], "1.0");
    assert_eq!(saved["nodes"][0]["id"], "a");
    assert_eq!(saved["nodes"][1]["id"], "b");
    assert_eq!(saved["nodes"][1]["url"], "https://example.com");
    assert_eq!(saved["edges"], serde_json::json!([]));
}

#[test]
fn created_nodes_are_centered_on_the_viewport() {
    let mut s = Session::new(SessionOptions::default(), size(1280.0, 720.0));
    let id = s.create_node(NodeKind::Text);
    let n = s.document().node(&id).unwrap();
    assert_eq!(id.len(), 32);
    assert_eq!((n.x, n.y, n.width, n.height), (515.0, 285.0, 250.0, 150.0));
    assert_eq!(n.color, Some(Color::new("1")));
    assert_eq!(n.content(), "# New Node\nStart typing...");

    let link = s.create_node(NodeKind::Link);
    let group = s.create_node(NodeKind::Group);
    let file = s.create_node(NodeKind::File);
    assert_ne!(link, group);
    assert_eq!(s.content(&link), Some("https://obsidian.md"));
    assert_eq!(s.content(&group), Some("New Group"));
    assert_eq!(s.content(&file), Some(""));
    assert!(s.document().node(&group).unwrap().is_group());

    let saved: serde_json::Value = serde_json::from_str(&s.save_string().unwrap()).unwrap();
    assert_eq!(saved["nodes"][0]["type"], "text");
    assert_eq!(saved["nodes"][3]["type"], "file");
}

#[test]
fn created_nodes_follow_a_zoomed_and_panned_view() {
    let mut s = Session::new(SessionOptions::default(), size(1000.0, 800.0));
    s.pointer_down_canvas(point(0.0, 0.0));
    s.pointer_move(point(-100.0, 50.0));
    s.pointer_up();
    s.zoom_out();
    let center = s.view_center();
    let id = s.create_node(NodeKind::Text);
    let n = s.document().node(&id).unwrap();
    assert!(close(n.rect().center(), center));
}

#[test]
fn delete_removes_touching_edges() {
    let mut s = loaded(TRIANGLE);
    let removed = s.delete_node("b").unwrap();
    assert_eq!(removed.id, "b");
    assert_eq!(s.document().nodes.len(), 2);
    assert_eq!(s.document().edges.len(), 1);
    assert_eq!(s.document().edges[0].to_node, "c");
    assert!(s.delete_node("b").is_none());
}

#[test]
fn deleting_the_dragged_node_ends_the_drag() {
    let mut s = loaded(TRIANGLE);
    assert!(s.pointer_down_node("a", point(0.0, 0.0)));
    s.delete_node("a");
    assert_eq!(s.gesture(), &Gesture::Idle);
    s.pointer_move(point(50.0, 50.0));
}

#[test]
fn color_cycles_through_the_palette() {
    let mut s = loaded(TWO_NODES);
    assert_eq!(s.cycle_color("a").as_deref(), Some("1"));
    assert_eq!(s.cycle_color("a").as_deref(), Some("2"));
    assert_eq!(s.cycle_color("b").as_deref(), Some("1"));
    assert_eq!(s.cycle_color("missing"), None);
}

#[test]
fn numeric_colors_render_and_cycle() {
    let mut s = loaded(
        r#"{"nodes": [{"id": "n", "x": 0, "y": 0, "width": 100, "height": 100, "color": 3}]}"#,
    );
    // "3" is yellow.
    assert!(s.render_svg().unwrap().contains(r#"stroke="rgb(234, 179, 8)""#));
    assert_eq!(s.cycle_color("n").as_deref(), Some("4"));
    assert_eq!(s.document().node("n").unwrap().color, Some(Color::new("4")));
}

#[test]
fn content_edits_follow_the_node_type() {
    let mut s = loaded(TRIANGLE);
    assert!(s.set_content("a", "new text"));
    assert!(s.set_content("b", "Renamed"));
    assert!(!s.set_content("c", "ignored"));
    assert!(!s.set_content("missing", "ignored"));
    assert_eq!(s.content("a"), Some("new text"));
    assert_eq!(s.content("b"), Some("Renamed"));
    assert_eq!(s.document().node("c").unwrap().file.as_deref(), Some("notes.md"));
}

#[test]
fn canvas_drag_pans_the_view() {
    let mut s = loaded(TWO_NODES);
    let before = s.viewport().translate();
    s.pointer_down_canvas(point(100.0, 100.0));
    s.pointer_move(point(110.0, 90.0));
    s.pointer_move(point(130.0, 140.0));
    s.pointer_up();
    s.pointer_move(point(500.0, 500.0));
    let after = s.viewport().translate();
    assert_eq!(after - before, canvasflow_core::geom::vector(30.0, 40.0));
    assert_eq!(s.document().node("a").unwrap().position(), point(0.0, 0.0));
}

#[test]
fn node_drag_moves_by_the_screen_delta_over_scale() {
    let mut s = loaded(TWO_NODES);
    s.zoom_in();
    let scale = s.viewport().scale();
    let view = s.viewport().state();

    assert!(s.pointer_down_node("b", point(200.0, 200.0)));
    s.pointer_move(point(200.0 + 24.0, 200.0 + 48.0));
    s.pointer_up();

    let b = s.document().node("b").unwrap().position();
    assert!(close(b, point(10.0 + 24.0 / scale, 10.0 + 48.0 / scale)));
    assert_eq!(s.viewport().state(), view);
    assert!(!s.pointer_down_node("missing", point(0.0, 0.0)));
    assert_eq!(s.gesture(), &Gesture::Idle);
}

#[test]
fn wheel_zooms_about_the_pointer() {
    let mut s = loaded(TWO_NODES);
    let p = point(321.0, 123.0);
    let anchor = s.viewport().to_model(p);
    let scale = s.viewport().scale();

    s.wheel(p, -120.0);
    assert!((s.viewport().scale() - scale * 1.1).abs() < 1e-12);
    assert!(close(s.viewport().to_model(p), anchor));

    s.wheel(p, 120.0);
    assert!((s.viewport().scale() - scale * 1.1 * 0.9).abs() < 1e-12);
    assert!(close(s.viewport().to_model(p), anchor));
}

#[test]
fn zoom_saturates_at_the_limits() {
    let mut s = loaded(TWO_NODES);
    for _ in 0..40 {
        s.zoom_in();
    }
    assert_eq!(s.viewport().scale(), 3.0);
    assert_eq!(s.zoom_percent(), 300);
    for _ in 0..40 {
        s.zoom_out();
    }
    assert_eq!(s.viewport().scale(), 0.1);
    assert_eq!(s.zoom_percent(), 10);
}

#[test]
fn auto_layout_round_trip_restores_manual_positions() {
    let mut s = loaded(TWO_NODES);
    let manual: Vec<_> = s.document().nodes.iter().map(|n| n.position()).collect();

    assert!(s.set_auto_layout(true).unwrap());
    assert_eq!(s.layout_mode(), LayoutMode::Auto);
    let auto: Vec<_> = s.document().nodes.iter().map(|n| n.position()).collect();
    assert_ne!(auto, manual);
    assert!(!s.set_auto_layout(true).unwrap());

    let added = s.create_node(NodeKind::Group);
    let added_at = s.document().node(&added).unwrap().position();

    assert!(s.set_auto_layout(false).unwrap());
    assert_eq!(s.layout_mode(), LayoutMode::Manual);
    let restored: Vec<_> = s.document().nodes[..2].iter().map(|n| n.position()).collect();
    assert_eq!(restored, manual);
    assert_eq!(s.document().node(&added).unwrap().position(), added_at);
}

#[test]
fn loading_resets_the_layout_mode() {
    let mut s = loaded(TWO_NODES);
    s.set_auto_layout(true).unwrap();
    s.load_str(TRIANGLE).unwrap();
    assert_eq!(s.layout_mode(), LayoutMode::Manual);
    assert!(!s.set_auto_layout(false).unwrap());
}

#[test]
fn renders_in_the_session_style() {
    let mut s = loaded(TRIANGLE);
    assert_eq!(s.style(), RenderStyle::Vector);
    let vector = s.render_svg().unwrap();
    assert!(vector.contains(r#"class="canvasflow-vector""#));
    assert_eq!(vector.matches("<rect ").count(), 3);
    assert_eq!(vector.matches("<path ").count(), 3);
    // Edge colored "2" strokes orange.
    assert!(vector.contains(r#"stroke="rgb(249, 115, 22)""#));

    s.set_style(RenderStyle::Sketch);
    let sketch = s.render_svg().unwrap();
    assert!(sketch.contains(r#"class="canvasflow-sketch""#));
    assert!(!sketch.contains("canvasflow-vector"));
    assert_eq!(sketch, s.render_svg().unwrap());

    s.set_style(RenderStyle::Vector);
    assert_eq!(s.render_svg().unwrap(), vector);
}

#[test]
fn render_reports_the_surface_it_drew_on() {
    let mut s = loaded(TRIANGLE);
    let mut backend = SvgBackend::new();
    let surface = s.render(&mut backend).unwrap();
    assert_eq!(surface.origin, point(-200.0, -200.0));
    assert_eq!(surface.size, size(900.0, 900.0));
    assert!(backend.as_svg().ends_with("</svg>"));

    s.set_style(RenderStyle::Sketch);
    let sketch = s.render(&mut SvgBackend::new()).unwrap();
    assert_eq!(sketch.origin, surface.origin);
    assert_eq!(sketch.size, size(5000.0, 5000.0));
}
