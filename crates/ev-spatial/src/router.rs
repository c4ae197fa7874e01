//! Routing trait and default Dijkstra implementation.
//!
//! The simulation calls routing through the [`Router`] trait so a different
//! search (A*, contraction hierarchies) can be swapped in without touching
//! the agent logic.
//!
//! # Cost units
//!
//! Edge weight is length.  Internally costs are integer **millimetres**
//! (`u64`) so the heap is totally ordered and ties break deterministically;
//! [`Route::length_m`] converts back to metres.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ev_core::{EdgeId, NodeId, Point};

use crate::network::RoadNetwork;
use crate::{SpatialError, SpatialResult};

// ── Route ─────────────────────────────────────────────────────────────────────

/// Result of a routing query.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Nodes visited in order, origin first.  A single node means origin and
    /// destination coincide and there is nothing to travel.
    pub nodes:    Vec<NodeId>,
    /// Edges between consecutive nodes; `edges.len() == nodes.len() - 1`.
    pub edges:    Vec<EdgeId>,
    pub length_m: f64,
}

impl Route {
    /// The zero-length route that stays at `node`.
    pub fn stay(node: NodeId) -> Self {
        Route { nodes: vec![node], edges: Vec::new(), length_m: 0.0 }
    }

    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn destination(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable shortest-path engine over a [`RoadNetwork`].
pub trait Router: Send + Sync {
    /// Shortest route from `from` to `to`.
    ///
    /// `from == to` yields [`Route::stay`].  Disconnected endpoints yield
    /// [`SpatialError::NoRoute`].
    fn route(&self, network: &RoadNetwork, from: NodeId, to: NodeId) -> SpatialResult<Route>;

    /// Nearest of `targets` from `from` and its network distance.
    fn nearest_of(
        &self,
        network: &RoadNetwork,
        from:    NodeId,
        targets: &[NodeId],
    ) -> SpatialResult<(NodeId, f64)>;

    /// Weighted distance between two nodes.
    fn path_distance(&self, network: &RoadNetwork, from: NodeId, to: NodeId) -> SpatialResult<f64> {
        self.route(network, from, to).map(|r| r.length_m)
    }

    /// Snap both points to their nearest nodes and route between them.
    fn shortest_path(&self, network: &RoadNetwork, origin: Point, dest: Point) -> SpatialResult<Route> {
        let from = network.nearest_node(origin).ok_or(SpatialError::EmptyNetwork)?;
        let to   = network.nearest_node(dest).ok_or(SpatialError::EmptyNetwork)?;
        self.route(network, from, to)
    }
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Binary-heap Dijkstra over the CSR graph, weighted by edge length.
#[derive(Clone, Copy, Debug, Default)]
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(&self, network: &RoadNetwork, from: NodeId, to: NodeId) -> SpatialResult<Route> {
        check_node(network, from)?;
        check_node(network, to)?;
        if from == to {
            return Ok(Route::stay(from));
        }
        let search = dijkstra(network, from, |n| n == to);
        match search.reached {
            Some((_, cost)) => Ok(reconstruct(network, &search.prev_edge, from, to, cost)),
            None => Err(SpatialError::NoRoute { from, to }),
        }
    }

    fn path_distance(&self, network: &RoadNetwork, from: NodeId, to: NodeId) -> SpatialResult<f64> {
        check_node(network, from)?;
        check_node(network, to)?;
        dijkstra(network, from, |n| n == to)
            .reached
            .map(|(_, cost)| mm_to_m(cost))
            .ok_or(SpatialError::NoRoute { from, to })
    }

    fn nearest_of(
        &self,
        network: &RoadNetwork,
        from:    NodeId,
        targets: &[NodeId],
    ) -> SpatialResult<(NodeId, f64)> {
        check_node(network, from)?;
        let mut is_target = vec![false; network.node_count()];
        for &t in targets {
            if network.contains_node(t) {
                is_target[t.index()] = true;
            }
        }
        dijkstra(network, from, |n| is_target[n.index()])
            .reached
            .map(|(node, cost)| (node, mm_to_m(cost)))
            .ok_or(SpatialError::NoRoute {
                from,
                to: targets.first().copied().unwrap_or(NodeId::INVALID),
            })
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

struct Search {
    prev_edge: Vec<EdgeId>,
    /// First target popped from the heap, with its cost in millimetres.
    reached:   Option<(NodeId, u64)>,
}

#[inline]
fn edge_cost_mm(network: &RoadNetwork, edge: EdgeId) -> u64 {
    (network.edge_length_m[edge.index()] * 1_000.0).round() as u64
}

#[inline]
fn mm_to_m(cost: u64) -> f64 {
    cost as f64 / 1_000.0
}

fn check_node(network: &RoadNetwork, node: NodeId) -> SpatialResult<()> {
    if network.contains_node(node) { Ok(()) } else { Err(SpatialError::UnknownNode(node)) }
}

/// Run Dijkstra from `from` until the first node satisfying `is_target` is
/// settled.
fn dijkstra(network: &RoadNetwork, from: NodeId, is_target: impl Fn(NodeId) -> bool) -> Search {
    let n = network.node_count();
    let mut dist      = vec![u64::MAX; n];
    let mut prev_edge = vec![EdgeId::INVALID; n];
    dist[from.index()] = 0;

    // Reverse turns the max-heap into a min-heap; NodeId breaks cost ties.
    let mut heap: BinaryHeap<Reverse<(u64, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((0, from)));

    while let Some(Reverse((cost, node))) = heap.pop() {
        if cost > dist[node.index()] {
            continue;
        }
        if is_target(node) {
            return Search { prev_edge, reached: Some((node, cost)) };
        }
        for edge in network.out_edges(node) {
            let next = network.edge_to[edge.index()];
            let new_cost = cost.saturating_add(edge_cost_mm(network, edge));
            if new_cost < dist[next.index()] {
                dist[next.index()] = new_cost;
                prev_edge[next.index()] = edge;
                heap.push(Reverse((new_cost, next)));
            }
        }
    }
    Search { prev_edge, reached: None }
}

fn reconstruct(
    network:   &RoadNetwork,
    prev_edge: &[EdgeId],
    from:      NodeId,
    to:        NodeId,
    cost_mm:   u64,
) -> Route {
    let mut edges = Vec::new();
    let mut cur = to;
    while cur != from {
        let e = prev_edge[cur.index()];
        edges.push(e);
        cur = network.edge_from[e.index()];
    }
    edges.reverse();

    let mut nodes = Vec::with_capacity(edges.len() + 1);
    nodes.push(from);
    nodes.extend(edges.iter().map(|e| network.edge_to[e.index()]));

    Route { nodes, edges, length_m: mm_to_m(cost_mm) }
}
