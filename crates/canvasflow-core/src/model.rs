//! JSON canvas document model.
//!
//! The shape is `{ "nodes": [...], "edges": [...] }`. Fields this crate does not interpret are
//! kept in `extra` maps so a load/save cycle passes them through untouched, and node/edge order
//! is the document order.

use crate::error::{Error, Result};
use crate::geom::{Point, Rect, point, rect_from_extents, size};
use crate::geometry::Side;
use crate::palette::Color;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NodeKind {
    #[default]
    Text,
    Link,
    Group,
    File,
    /// A type this crate does not know; kept verbatim.
    Other(String),
}

impl NodeKind {
    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::Text => "text",
            NodeKind::Link => "link",
            NodeKind::Group => "group",
            NodeKind::File => "file",
            NodeKind::Other(s) => s.as_str(),
        }
    }
}

impl From<String> for NodeKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "text" => NodeKind::Text,
            "link" => NodeKind::Link,
            "group" => NodeKind::Group,
            "file" => NodeKind::File,
            _ => NodeKind::Other(value),
        }
    }
}

impl From<NodeKind> for String {
    fn from(value: NodeKind) -> Self {
        match value {
            NodeKind::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl Serialize for NodeKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodeKind {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        String::deserialize(deserializer).map(NodeKind::from)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<NodeKind>,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Node {
    /// A bare node with no payload, color or type field.
    pub fn new(id: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            kind: None,
            x,
            y,
            width,
            height,
            color: None,
            text: None,
            url: None,
            label: None,
            file: None,
            extra: Map::new(),
        }
    }

    pub fn with_kind(mut self, kind: NodeKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// The node type; absent types read as text.
    pub fn kind(&self) -> NodeKind {
        self.kind.clone().unwrap_or_default()
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, Some(NodeKind::Group))
    }

    /// Top-left anchor.
    pub fn position(&self) -> Point {
        point(self.x, self.y)
    }

    pub fn set_position(&mut self, p: Point) {
        self.x = p.x;
        self.y = p.y;
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.position(), size(self.width, self.height))
    }

    /// The editable payload: text, then url, then label.
    pub fn content(&self) -> &str {
        self.text
            .as_deref()
            .or(self.url.as_deref())
            .or(self.label.as_deref())
            .unwrap_or("")
    }

    /// Writes the payload field that matches the node type. File nodes (and unknown types) are
    /// left untouched; returns whether anything was written.
    pub fn set_content(&mut self, value: impl Into<String>) -> bool {
        match self.kind() {
            NodeKind::Text => self.text = Some(value.into()),
            NodeKind::Link => self.url = Some(value.into()),
            NodeKind::Group => self.label = Some(value.into()),
            NodeKind::File | NodeKind::Other(_) => return false,
        }
        true
    }

    fn validate(&self) -> Result<()> {
        if !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
        {
            return Err(Error::InvalidNodeSize {
                id: self.id.clone(),
                width: self.width,
                height: self.height,
            });
        }
        if !(self.x.is_finite() && self.y.is_finite()) {
            return Err(Error::NonFinitePosition {
                id: self.id.clone(),
                x: self.x,
                y: self.y,
            });
        }
        Ok(())
    }
}

/// An edge's `fromSide`/`toSide` value.
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeSide {
    Known(Side),
    /// Anything else; kept verbatim and drawn from the default side.
    Other(Value),
}

impl EdgeSide {
    pub fn side(&self) -> Option<Side> {
        match self {
            EdgeSide::Known(side) => Some(*side),
            EdgeSide::Other(_) => None,
        }
    }
}

impl From<Side> for EdgeSide {
    fn from(value: Side) -> Self {
        EdgeSide::Known(value)
    }
}

impl Serialize for EdgeSide {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            EdgeSide::Known(side) => serializer.serialize_str(side.as_str()),
            EdgeSide::Other(raw) => raw.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for EdgeSide {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Ok(match raw.as_str().and_then(Side::parse) {
            Some(side) => EdgeSide::Known(side),
            None => EdgeSide::Other(raw),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    #[serde(rename = "fromNode")]
    pub from_node: String,
    #[serde(rename = "toNode")]
    pub to_node: String,
    #[serde(rename = "fromSide", default, skip_serializing_if = "Option::is_none")]
    pub from_side: Option<EdgeSide>,
    #[serde(rename = "toSide", default, skip_serializing_if = "Option::is_none")]
    pub to_side: Option<EdgeSide>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Edge {
    pub fn new(from_node: impl Into<String>, to_node: impl Into<String>) -> Self {
        Self {
            from_node: from_node.into(),
            to_node: to_node.into(),
            from_side: None,
            to_side: None,
            color: None,
            extra: Map::new(),
        }
    }

    pub fn with_sides(mut self, from_side: Side, to_side: Side) -> Self {
        self.from_side = Some(from_side.into());
        self.to_side = Some(to_side.into());
        self
    }

    /// Side the edge leaves from; absent or unrecognized values use the right side.
    pub fn start_side(&self) -> Side {
        self.from_side
            .as_ref()
            .and_then(EdgeSide::side)
            .unwrap_or(Side::Right)
    }

    /// Side the edge enters; absent or unrecognized values use the left side.
    pub fn end_side(&self) -> Side {
        self.to_side
            .as_ref()
            .and_then(EdgeSide::side)
            .unwrap_or(Side::Left)
    }

    pub fn touches(&self, node_id: &str) -> bool {
        self.from_node == node_id || self.to_node == node_id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasDocument {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CanvasDocument {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self {
            nodes,
            edges,
            extra: Map::new(),
        }
    }

    /// Parses and validates a document. Nothing is returned unless the whole document is usable.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let doc: CanvasDocument = serde_json::from_str(text)?;
        doc.validate()?;
        Ok(doc)
    }

    pub fn to_json_string_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks unique node ids, positive finite sizes and finite positions.
    ///
    /// Edges are not checked: an edge pointing at a missing node is a tolerated dangling
    /// reference that rendering and layout skip.
    pub fn validate(&self) -> Result<()> {
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        seen.reserve(self.nodes.len());
        for n in &self.nodes {
            n.validate()?;
            if !seen.insert(n.id.as_str()) {
                return Err(Error::DuplicateNodeId { id: n.id.clone() });
            }
        }
        Ok(())
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// Removes a node and every edge touching it.
    pub fn remove_node(&mut self, id: &str) -> Option<Node> {
        let idx = self.nodes.iter().position(|n| n.id == id)?;
        let removed = self.nodes.remove(idx);
        self.edges.retain(|e| !e.touches(id));
        Some(removed)
    }

    /// Edges whose endpoints both exist, paired with their resolved nodes.
    pub fn resolved_edges(&self) -> impl Iterator<Item = (&Edge, &Node, &Node)> + '_ {
        self.edges.iter().filter_map(|e| {
            let from = self.node(&e.from_node)?;
            let to = self.node(&e.to_node)?;
            Some((e, from, to))
        })
    }
}

/// Axis-aligned box around every node rectangle, or `None` for an empty slice.
pub fn nodes_bounding_box(nodes: &[Node]) -> Option<Rect> {
    let first = nodes.first()?;
    let (mut min_x, mut min_y) = (first.x, first.y);
    let (mut max_x, mut max_y) = (first.x + first.width, first.y + first.height);
    for n in &nodes[1..] {
        min_x = min_x.min(n.x);
        min_y = min_y.min(n.y);
        max_x = max_x.max(n.x + n.width);
        max_y = max_y.max(n.y + n.height);
    }
    Some(rect_from_extents(min_x, min_y, max_x, max_y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_type_reads_as_text_and_is_not_written_back() {
        let doc = CanvasDocument::from_json_str(
            r#"{"nodes":[{"id":"a","x":0,"y":0,"width":10,"height":10}]}"#,
        )
        .unwrap();
        assert_eq!(doc.nodes[0].kind(), NodeKind::Text);
        assert!(doc.edges.is_empty());
        let out = doc.to_json_string_pretty().unwrap();
        assert!(!out.contains("\"type\""), "{out}");
    }

    #[test]
    fn unknown_node_types_survive() {
        let doc = CanvasDocument::from_json_str(
            r#"{"nodes":[{"id":"a","type":"sticker","x":0,"y":0,"width":10,"height":10}]}"#,
        )
        .unwrap();
        assert_eq!(doc.nodes[0].kind(), NodeKind::Other("sticker".to_string()));
        assert!(doc.to_json_string_pretty().unwrap().contains("\"sticker\""));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = CanvasDocument::from_json_str(
            r#"{"nodes":[
                {"id":"a","x":0,"y":0,"width":10,"height":10},
                {"id":"a","x":5,"y":5,"width":10,"height":10}
            ]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::DuplicateNodeId { ref id } if id == "a"));
    }

    #[test]
    fn rejects_non_positive_sizes() {
        let err = CanvasDocument::from_json_str(
            r#"{"nodes":[{"id":"a","x":0,"y":0,"width":0,"height":10}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidNodeSize { .. }));
    }

    #[test]
    fn rejects_unparseable_json() {
        assert!(matches!(
            CanvasDocument::from_json_str("{nodes: ["),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn edge_sides_default_right_to_left() {
        let e = Edge::new("a", "b");
        assert_eq!(e.start_side(), Side::Right);
        assert_eq!(e.end_side(), Side::Left);
    }

    #[test]
    fn remove_node_drops_incident_edges() {
        let mut doc = CanvasDocument::new(
            vec![
                Node::new("a", 0.0, 0.0, 10.0, 10.0),
                Node::new("b", 20.0, 0.0, 10.0, 10.0),
                Node::new("c", 40.0, 0.0, 10.0, 10.0),
            ],
            vec![Edge::new("a", "b"), Edge::new("b", "c"), Edge::new("c", "a")],
        );
        assert!(doc.remove_node("b").is_some());
        assert_eq!(doc.edges, vec![Edge::new("c", "a")]);
        assert!(doc.remove_node("missing").is_none());
    }

    #[test]
    fn resolved_edges_skip_dangling_references() {
        let doc = CanvasDocument::new(
            vec![Node::new("a", 0.0, 0.0, 10.0, 10.0)],
            vec![Edge::new("a", "ghost"), Edge::new("a", "a")],
        );
        let resolved: Vec<_> = doc.resolved_edges().map(|(e, _, _)| e.to_node.clone()).collect();
        assert_eq!(resolved, vec!["a".to_string()]);
    }

    #[test]
    fn content_follows_node_type() {
        let mut text = Node::new("t", 0.0, 0.0, 1.0, 1.0).with_kind(NodeKind::Text);
        let mut link = Node::new("l", 0.0, 0.0, 1.0, 1.0).with_kind(NodeKind::Link);
        let mut file = Node::new("f", 0.0, 0.0, 1.0, 1.0).with_kind(NodeKind::File);
        assert!(text.set_content("hello"));
        assert!(link.set_content("https://example.com"));
        assert!(!file.set_content("ignored"));
        assert_eq!(text.content(), "hello");
        assert_eq!(link.content(), "https://example.com");
        assert_eq!(file.content(), "");
    }

    #[test]
    fn bounding_box_covers_all_rectangles() {
        let nodes = vec![
            Node::new("a", -10.0, 5.0, 20.0, 10.0),
            Node::new("b", 30.0, -5.0, 10.0, 50.0),
        ];
        let bb = nodes_bounding_box(&nodes).unwrap();
        assert_eq!((bb.min_x(), bb.min_y(), bb.max_x(), bb.max_y()), (-10.0, -5.0, 40.0, 45.0));
        assert!(nodes_bounding_box(&[]).is_none());
    }
}
