//! Progress along a computed route.

use ev_core::{EdgeId, NodeId};
use ev_spatial::Route;

use crate::kind::NetworkKind;

/// A route plus how far along it the agent has got.
///
/// `index` is the position in `nodes` of the last node passed, and so also
/// the index in `edges` of the edge being travelled.  It only grows.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteProgress {
    pub nodes:               Vec<NodeId>,
    pub edges:               Vec<EdgeId>,
    pub index:               usize,
    /// Metres travelled along `edges[index]`.
    pub distance_along_edge: f64,
    pub network:             NetworkKind,
}

impl RouteProgress {
    pub fn new(route: Route, network: NetworkKind) -> Self {
        Self {
            nodes: route.nodes,
            edges: route.edges,
            index: 0,
            distance_along_edge: 0.0,
            network,
        }
    }

    /// Resume partway along a route, e.g. after a schedule fast-forward.
    pub fn resume(route: Route, network: NetworkKind, index: usize, distance_along_edge: f64) -> Self {
        Self { index, distance_along_edge, ..Self::new(route, network) }
    }

    /// Edge currently being travelled, or `None` once the last node is reached.
    #[inline]
    pub fn current_edge(&self) -> Option<EdgeId> {
        self.edges.get(self.index).copied()
    }

    /// Last node passed.
    #[inline]
    pub fn last_node(&self) -> NodeId {
        self.nodes[self.index.min(self.nodes.len().saturating_sub(1))]
    }

    #[inline]
    pub fn next_node(&self) -> Option<NodeId> {
        self.nodes.get(self.index + 1).copied()
    }

    pub fn destination(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }

    /// `true` once the final node has been reached.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.index >= self.edges.len()
    }

    /// Step onto the next edge, at its start.
    pub fn pass_node(&mut self) {
        self.index += 1;
        self.distance_along_edge = 0.0;
    }
}
