//! Force-directed placement (Fruchterman-Reingold style, fixed iteration count).
//!
//! Each iteration accumulates one displacement per node from pairwise repulsion
//! (`k^2 / d`) and edge attraction (`d^2 / k`), then moves every node at once by its
//! displacement capped at a linearly cooling temperature.
//!
//! Forces act between node anchors, which are the top-left `(x, y)` corners rather than the
//! rectangle centers. Different-sized nodes therefore settle slightly differently than a
//! center-based model would place them. The trajectories are part of the observable behavior.
//!
//! Cost is `O(n^2)` per iteration for repulsion plus `O(e)` for attraction: fine for tens to
//! low hundreds of nodes. There is no spatial grid or Barnes-Hut cutoff.

use crate::error::{Error, Result};
use canvasflow_core::geom::{Point, Vector, floored_distance, vector};
use canvasflow_core::{CanvasConfig, Edge, Node};
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceLayoutOptions {
    pub iterations: usize,
    /// Ideal distance `k` between nodes.
    pub ideal_distance: f64,
    /// Temperature at iteration `i` is `cooling_rate * (iterations - i)`.
    pub cooling_rate: f64,
}

impl Default for ForceLayoutOptions {
    fn default() -> Self {
        Self {
            iterations: 50,
            ideal_distance: 500.0,
            cooling_rate: 0.1,
        }
    }
}

impl ForceLayoutOptions {
    pub fn from_config(config: &CanvasConfig) -> Self {
        let d = Self::default();
        Self {
            iterations: config
                .get_u64("layout.iterations")
                .map(|v| v as usize)
                .unwrap_or(d.iterations),
            ideal_distance: config
                .get_f64("layout.idealDistance")
                .unwrap_or(d.ideal_distance),
            cooling_rate: config
                .get_f64("layout.coolingRate")
                .unwrap_or(d.cooling_rate),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(Error::InvalidOption {
                name: "iterations",
                value: 0.0,
            });
        }
        if !(self.ideal_distance.is_finite() && self.ideal_distance > 0.0) {
            return Err(Error::InvalidOption {
                name: "ideal_distance",
                value: self.ideal_distance,
            });
        }
        if !(self.cooling_rate.is_finite() && self.cooling_rate > 0.0) {
            return Err(Error::InvalidOption {
                name: "cooling_rate",
                value: self.cooling_rate,
            });
        }
        Ok(())
    }

    fn temperature(&self, iteration: usize) -> f64 {
        self.cooling_rate * (self.iterations - iteration) as f64
    }
}

/// An in-progress layout pass.
///
/// The pass works on its own copy of the node anchors; nothing in the document changes until
/// [`ForceLayout::apply_to`] is called. Stepping it one iteration at a time produces exactly the
/// same result as [`ForceLayout::run`], so a host can interleave iterations with other work or
/// drop the pass midway.
#[derive(Debug, Clone)]
pub struct ForceLayout {
    ids: Vec<String>,
    positions: Vec<Point>,
    edges: Vec<(usize, usize)>,
    // Per-node displacement for the current iteration, indexed like `positions`.
    disps: Vec<Vector>,
    opts: ForceLayoutOptions,
    iteration: usize,
}

impl ForceLayout {
    pub fn new(nodes: &[Node], edges: &[Edge], opts: ForceLayoutOptions) -> Result<Self> {
        opts.validate()?;

        let mut id_to_idx: FxHashMap<&str, usize> = FxHashMap::default();
        id_to_idx.reserve(nodes.len());
        let mut ids = Vec::with_capacity(nodes.len());
        let mut positions = Vec::with_capacity(nodes.len());
        for (idx, n) in nodes.iter().enumerate() {
            // First occurrence wins, matching a linear lookup by id.
            id_to_idx.entry(n.id.as_str()).or_insert(idx);
            ids.push(n.id.clone());
            positions.push(n.position());
        }

        let mut sim_edges = Vec::with_capacity(edges.len());
        let mut dangling = 0usize;
        for e in edges {
            let (Some(&a), Some(&b)) = (
                id_to_idx.get(e.from_node.as_str()),
                id_to_idx.get(e.to_node.as_str()),
            ) else {
                dangling += 1;
                continue;
            };
            // A self-loop pulls a node toward itself with zero net effect.
            if a != b {
                sim_edges.push((a, b));
            }
        }
        if dangling > 0 {
            tracing::debug!(dangling, "skipping edges with missing endpoints");
        }

        Ok(Self {
            ids,
            disps: vec![vector(0.0, 0.0); positions.len()],
            positions,
            edges: sim_edges,
            opts,
            iteration: 0,
        })
    }

    pub fn options(&self) -> &ForceLayoutOptions {
        &self.opts
    }

    /// Completed iterations.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn is_finished(&self) -> bool {
        self.iteration >= self.opts.iterations
    }

    /// Runs one iteration. Returns `false` once the pass is already complete.
    pub fn step(&mut self) -> bool {
        if self.is_finished() {
            return false;
        }

        for d in self.disps.iter_mut() {
            *d = vector(0.0, 0.0);
        }
        self.accumulate_repulsion();
        self.accumulate_attraction();

        let temperature = self.opts.temperature(self.iteration);
        for (p, d) in self.positions.iter_mut().zip(&self.disps) {
            // Unit direction times the capped length. Saved layouts depend on this exact
            // operation order.
            let len = d.length();
            let dist = if len == 0.0 { 1.0 } else { len };
            *p += *d / dist * dist.min(temperature);
        }

        tracing::trace!(iteration = self.iteration, temperature, "force layout iteration");
        self.iteration += 1;
        true
    }

    /// Runs the remaining iterations.
    pub fn run(&mut self) {
        while self.step() {}
    }

    fn accumulate_repulsion(&mut self) {
        let k2 = self.opts.ideal_distance * self.opts.ideal_distance;
        let n = self.positions.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let delta = self.positions[i] - self.positions[j];
                let dist = floored_distance(delta);
                let force = k2 / dist;
                let push = delta / dist * force;
                self.disps[i] += push;
                self.disps[j] -= push;
            }
        }
    }

    fn accumulate_attraction(&mut self) {
        let k = self.opts.ideal_distance;
        for &(a, b) in &self.edges {
            let delta = self.positions[b] - self.positions[a];
            let dist = floored_distance(delta);
            let force = dist * dist / k;
            let pull = delta / dist * force;
            self.disps[a] += pull;
            self.disps[b] -= pull;
        }
    }

    /// Current anchor positions, in node order.
    pub fn positions(&self) -> impl Iterator<Item = (&str, Point)> + '_ {
        self.ids
            .iter()
            .map(String::as_str)
            .zip(self.positions.iter().copied())
    }

    /// Writes the computed positions into `nodes`, matching by id. Nodes the pass does not know
    /// about are left alone. Returns how many nodes moved.
    pub fn apply_to(&self, nodes: &mut [Node]) -> usize {
        let computed: FxHashMap<&str, Point> = self.positions().collect();
        let mut applied = 0;
        for n in nodes.iter_mut() {
            if let Some(p) = computed.get(n.id.as_str()) {
                n.set_position(*p);
                applied += 1;
            }
        }
        applied
    }
}

/// Runs a full blocking layout pass over `nodes` in place.
pub fn force_directed(nodes: &mut [Node], edges: &[Edge], opts: &ForceLayoutOptions) -> Result<()> {
    if nodes.is_empty() {
        return Ok(());
    }
    let mut pass = ForceLayout::new(nodes, edges, *opts)?;
    tracing::debug!(
        nodes = nodes.len(),
        edges = pass.edges.len(),
        iterations = opts.iterations,
        "force layout start"
    );
    pass.run();
    pass.apply_to(nodes);
    tracing::debug!("force layout finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvasflow_core::geom::point;

    #[test]
    fn temperature_cools_linearly_to_one_step() {
        let o = ForceLayoutOptions::default();
        assert!((o.temperature(0) - 5.0).abs() < 1e-12);
        assert!((o.temperature(49) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn rejects_degenerate_options() {
        let bad = [
            ForceLayoutOptions {
                iterations: 0,
                ..Default::default()
            },
            ForceLayoutOptions {
                ideal_distance: 0.0,
                ..Default::default()
            },
            ForceLayoutOptions {
                cooling_rate: f64::NAN,
                ..Default::default()
            },
        ];
        for o in bad {
            assert!(o.validate().is_err(), "{o:?}");
        }
    }

    #[test]
    fn first_step_moves_a_pair_apart_by_the_temperature() {
        let nodes = vec![
            Node::new("a", 0.0, 0.0, 10.0, 10.0),
            Node::new("b", 100.0, 0.0, 10.0, 10.0),
        ];
        let mut pass = ForceLayout::new(&nodes, &[], ForceLayoutOptions::default()).unwrap();
        assert!(pass.step());
        let pos: Vec<_> = pass.positions().map(|(_, p)| p).collect();
        // Repulsion is 2500 units here, far above the 5.0 cap.
        assert!((pos[0] - point(-5.0, 0.0)).length() < 1e-9, "{pos:?}");
        assert!((pos[1] - point(105.0, 0.0)).length() < 1e-9, "{pos:?}");
    }

    #[test]
    fn small_displacements_are_not_capped() {
        // Far apart with k=1: repulsion 1/1000 per pair, well under the cap.
        let nodes = vec![
            Node::new("a", 0.0, 0.0, 10.0, 10.0),
            Node::new("b", 1000.0, 0.0, 10.0, 10.0),
        ];
        let opts = ForceLayoutOptions {
            ideal_distance: 1.0,
            ..Default::default()
        };
        let mut pass = ForceLayout::new(&nodes, &[], opts).unwrap();
        pass.step();
        let a = pass.positions().next().unwrap().1;
        assert!((a.x + 0.001).abs() < 1e-15);
    }

    #[test]
    fn coincident_nodes_stay_finite() {
        let nodes = vec![
            Node::new("a", 5.0, 5.0, 10.0, 10.0),
            Node::new("b", 5.0, 5.0, 10.0, 10.0),
        ];
        let mut pass = ForceLayout::new(&nodes, &[Edge::new("a", "b")], Default::default()).unwrap();
        pass.run();
        for (_, p) in pass.positions() {
            assert!(p.x.is_finite() && p.y.is_finite());
        }
    }

    #[test]
    fn dangling_edges_and_self_loops_are_ignored() {
        let nodes = vec![Node::new("a", 0.0, 0.0, 10.0, 10.0)];
        let edges = vec![Edge::new("a", "ghost"), Edge::new("a", "a")];
        let pass = ForceLayout::new(&nodes, &edges, Default::default()).unwrap();
        assert!(pass.edges.is_empty());
    }

    #[test]
    fn step_stops_after_the_configured_iterations() {
        let nodes = vec![Node::new("a", 0.0, 0.0, 10.0, 10.0)];
        let opts = ForceLayoutOptions {
            iterations: 3,
            ..Default::default()
        };
        let mut pass = ForceLayout::new(&nodes, &[], opts).unwrap();
        assert!(pass.step() && pass.step() && pass.step());
        assert!(!pass.step());
        assert_eq!(pass.iteration(), 3);
        assert!(pass.is_finished());
    }

    #[test]
    fn empty_node_sets_are_a_noop() {
        let mut nodes: Vec<Node> = Vec::new();
        force_directed(&mut nodes, &[Edge::new("a", "b")], &Default::default()).unwrap();
    }
}
