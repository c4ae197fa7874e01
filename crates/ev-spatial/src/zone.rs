//! The evacuation zone and its exits.
//!
//! The zone is a disk around the hazard.  Its exits are the places where a
//! road segment crosses the disk boundary, each snapped to the nearest node
//! of that mode's network; crossings that snap to the same node collapse
//! into one exit.  Exits are computed once, when the hazard is declared.

use std::collections::BTreeMap;

use ev_core::{NodeId, Point, TravelMode};

use crate::network::RoadNetwork;

// ── Region ────────────────────────────────────────────────────────────────────

/// Anything that can answer "is this point inside?".
pub trait Region {
    fn contains(&self, p: Point) -> bool;
}

impl Region for geo::Polygon<f64> {
    fn contains(&self, p: Point) -> bool {
        geo::Contains::contains(self, &geo::Point::new(p.x, p.y))
    }
}

// ── Disk ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Disk {
    pub centre:   Point,
    pub radius_m: f64,
}

impl Disk {
    pub fn new(centre: Point, radius_m: f64) -> Self {
        Self { centre, radius_m }
    }

    /// Points where segment `a → b` crosses the boundary circle.
    ///
    /// Tangent contact is not a crossing, so a zero-radius disk has none.
    pub fn boundary_crossings(&self, a: Point, b: Point) -> Vec<Point> {
        let (dx, dy) = (b.x - a.x, b.y - a.y);
        let (fx, fy) = (a.x - self.centre.x, a.y - self.centre.y);
        let qa = dx * dx + dy * dy;
        let qb = 2.0 * (fx * dx + fy * dy);
        let qc = fx * fx + fy * fy - self.radius_m * self.radius_m;
        let disc = qb * qb - 4.0 * qa * qc;
        if qa == 0.0 || disc <= 0.0 {
            return Vec::new();
        }
        let sq = disc.sqrt();
        [(-qb - sq) / (2.0 * qa), (-qb + sq) / (2.0 * qa)]
            .into_iter()
            .filter(|t| (0.0..=1.0).contains(t))
            .map(|t| a.lerp(b, t))
            .collect()
    }
}

impl Region for Disk {
    /// Strict interior: points on the boundary are outside.
    fn contains(&self, p: Point) -> bool {
        p.distance_sq(self.centre) < self.radius_m * self.radius_m
    }
}

// ── Exit ──────────────────────────────────────────────────────────────────────

/// A network node used as an evacuation target.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Exit {
    /// Node in the mode's full network.
    pub node:     NodeId,
    pub position: Point,
    /// Where the road actually crosses the boundary.
    pub crossing: Point,
}

/// Boundary crossings of every segment in `network`, one per nearest node,
/// ordered by `NodeId`.
pub fn compute_exits(disk: &Disk, network: &RoadNetwork) -> Vec<Exit> {
    let mut by_node: BTreeMap<NodeId, Exit> = BTreeMap::new();
    for e in 0..network.edge_count() {
        let (from, to) = (network.edge_from[e], network.edge_to[e]);
        // Two-way roads are stored twice; one direction is enough.
        if from > to && network.edge_between(to, from).is_some() {
            continue;
        }
        for crossing in disk.boundary_crossings(network.position(from), network.position(to)) {
            if let Some(node) = network.nearest_node(crossing) {
                by_node.entry(node).or_insert(Exit {
                    node,
                    position: network.position(node),
                    crossing,
                });
            }
        }
    }
    by_node.into_values().collect()
}

// ── EvacuationZone ────────────────────────────────────────────────────────────

/// The declared hazard zone with per-mode exits.  Immutable once built.
#[derive(Clone, Debug)]
pub struct EvacuationZone {
    pub disk: Disk,
    exits:    [Vec<Exit>; 2],
}

impl EvacuationZone {
    /// Declare the zone and compute exits on each mode's full network
    /// (`networks` is indexed by [`TravelMode::index`]).
    pub fn declare(disk: Disk, networks: [&RoadNetwork; 2]) -> Self {
        let exits = [compute_exits(&disk, networks[0]), compute_exits(&disk, networks[1])];
        Self { disk, exits }
    }

    #[inline]
    pub fn centre(&self) -> Point {
        self.disk.centre
    }

    #[inline]
    pub fn radius_m(&self) -> f64 {
        self.disk.radius_m
    }

    pub fn exits_for(&self, mode: TravelMode) -> &[Exit] {
        &self.exits[mode.index()]
    }

    pub fn exit_nodes(&self, mode: TravelMode) -> Vec<NodeId> {
        self.exits_for(mode).iter().map(|x| x.node).collect()
    }
}

impl Region for EvacuationZone {
    fn contains(&self, p: Point) -> bool {
        self.disk.contains(p)
    }
}
