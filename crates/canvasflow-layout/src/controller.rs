use crate::error::Result;
use crate::force::{ForceLayout, ForceLayoutOptions};
use crate::snapshot::LayoutSnapshot;
use canvasflow_core::{Edge, Node};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutMode {
    /// Positions as authored or dragged.
    #[default]
    Manual,
    /// Positions assigned by the force-directed pass.
    Auto,
}

/// Manual/Auto layout state machine.
///
/// Entering Auto captures a snapshot of every node position (replacing any earlier one) and
/// runs the layout pass. Leaving Auto restores the snapshot verbatim; nodes created while in
/// Auto keep wherever they are.
#[derive(Debug, Clone, Default)]
pub struct LayoutController {
    mode: LayoutMode,
    snapshot: Option<LayoutSnapshot>,
    options: ForceLayoutOptions,
}

impl LayoutController {
    pub fn new(options: ForceLayoutOptions) -> Self {
        Self {
            mode: LayoutMode::Manual,
            snapshot: None,
            options,
        }
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    pub fn options(&self) -> &ForceLayoutOptions {
        &self.options
    }

    pub fn snapshot(&self) -> Option<&LayoutSnapshot> {
        self.snapshot.as_ref()
    }

    /// Switches to Auto without running the pass, returning it for the caller to step.
    ///
    /// The snapshot is taken before anything moves, so dropping the returned pass and calling
    /// [`LayoutController::disengage`] always gets back to the pre-layout positions. Returns
    /// `Ok(None)` when already in Auto.
    pub fn begin_engage(&mut self, nodes: &[Node], edges: &[Edge]) -> Result<Option<ForceLayout>> {
        if self.mode == LayoutMode::Auto {
            return Ok(None);
        }
        let pass = ForceLayout::new(nodes, edges, self.options)?;
        self.snapshot = Some(LayoutSnapshot::capture(nodes));
        self.mode = LayoutMode::Auto;
        Ok(Some(pass))
    }

    /// Manual -> Auto with a blocking layout pass. Returns whether a transition happened.
    pub fn engage(&mut self, nodes: &mut [Node], edges: &[Edge]) -> Result<bool> {
        let Some(mut pass) = self.begin_engage(nodes, edges)? else {
            return Ok(false);
        };
        tracing::debug!(nodes = nodes.len(), edges = edges.len(), "entering auto layout");
        pass.run();
        pass.apply_to(nodes);
        Ok(true)
    }

    /// Auto -> Manual, restoring the snapshot. Returns whether a transition happened.
    pub fn disengage(&mut self, nodes: &mut [Node]) -> bool {
        if self.mode == LayoutMode::Manual {
            return false;
        }
        let restored = self.snapshot.as_ref().map_or(0, |s| s.restore(nodes));
        tracing::debug!(restored, "leaving auto layout");
        self.mode = LayoutMode::Manual;
        true
    }

    pub fn set_auto(&mut self, auto: bool, nodes: &mut [Node], edges: &[Edge]) -> Result<bool> {
        if auto {
            self.engage(nodes, edges)
        } else {
            Ok(self.disengage(nodes))
        }
    }

    /// Back to Manual with no snapshot, e.g. after a new document was loaded.
    pub fn reset(&mut self) {
        self.mode = LayoutMode::Manual;
        self.snapshot = None;
    }
}
