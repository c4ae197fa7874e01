//! Who is on which directed road segment, and how far along.
//!
//! Keys use node *source* ids rather than `NodeId`s, so an agent routed on
//! a safe network and one still on the full network queue together when
//! they share a street.

use rustc_hash::FxHashMap;

use ev_core::{AgentId, EdgeId, TravelMode};
use ev_mobility::nearest_ahead;
use ev_spatial::RoadNetwork;

/// A directed segment as seen by one travel mode.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct EdgeKey {
    pub mode: TravelMode,
    pub from: u64,
    pub to:   u64,
}

impl EdgeKey {
    pub fn of(network: &RoadNetwork, edge: EdgeId, mode: TravelMode) -> Self {
        Self {
            mode,
            from: network.source_id(network.edge_from[edge.index()]),
            to:   network.source_id(network.edge_to[edge.index()]),
        }
    }
}

/// Per-segment occupant lists: `(agent, distance along the edge)`.
#[derive(Clone, Debug, Default)]
pub struct Occupancy {
    edges: FxHashMap<EdgeKey, Vec<(AgentId, f64)>>,
}

impl Occupancy {
    /// Record `agent` at `distance_m` on `key`, replacing any previous
    /// entry for it on that segment.
    pub fn update(&mut self, key: EdgeKey, agent: AgentId, distance_m: f64) {
        let list = self.edges.entry(key).or_default();
        match list.iter_mut().find(|(a, _)| *a == agent) {
            Some(entry) => entry.1 = distance_m,
            None => list.push((agent, distance_m)),
        }
    }

    pub fn leave(&mut self, key: EdgeKey, agent: AgentId) {
        if let Some(list) = self.edges.get_mut(&key) {
            list.retain(|(a, _)| *a != agent);
            if list.is_empty() {
                self.edges.remove(&key);
            }
        }
    }

    /// Distance of the nearest agent strictly ahead of `distance_m`.
    pub fn leader(&self, key: EdgeKey, agent: AgentId, distance_m: f64) -> Option<f64> {
        self.edges
            .get(&key)
            .and_then(|list| nearest_ahead(list.iter().copied(), agent, distance_m))
    }

    pub fn occupants(&self, key: EdgeKey) -> &[(AgentId, f64)] {
        self.edges.get(&key).map_or(&[], Vec::as_slice)
    }

    /// Total agents on all segments.
    pub fn len(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}
