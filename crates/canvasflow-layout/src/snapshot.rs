use canvasflow_core::Node;
use canvasflow_core::geom::Point;
use indexmap::IndexMap;

/// Node positions captured before an auto-layout pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutSnapshot {
    positions: IndexMap<String, Point>,
}

impl LayoutSnapshot {
    pub fn capture(nodes: &[Node]) -> Self {
        let mut positions = IndexMap::with_capacity(nodes.len());
        for n in nodes {
            positions.insert(n.id.clone(), n.position());
        }
        Self { positions }
    }

    /// Writes captured positions back verbatim. Nodes without an entry keep their current
    /// position. Returns how many nodes were restored.
    pub fn restore(&self, nodes: &mut [Node]) -> usize {
        let mut restored = 0;
        for n in nodes.iter_mut() {
            if let Some(p) = self.positions.get(n.id.as_str()) {
                n.set_position(*p);
                restored += 1;
            }
        }
        restored
    }

    pub fn get(&self, id: &str) -> Option<Point> {
        self.positions.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
