//! The simulated space: road networks, buildings, and the hazard zone.
//!
//! `World` is read-only while agents step.  It changes once per run, when
//! the hazard triggers and [`World::declare_zone`] adds the zone and the
//! safe networks.  The mutable per-tick state (who is on which road) lives
//! in [`Occupancy`][crate::Occupancy] next to it in the model.

use log::info;
use rstar::{PointDistance, RTree, RTreeObject, AABB};

use ev_agent::NetworkKind;
use ev_core::{AgentRng, BuildingId, Point, TimeOfDay, TravelMode};
use ev_schedule::Located;
use ev_spatial::{Building, BuildingKind, Disk, EvacuationZone, Region, RoadNetwork, SpatialError};

use crate::{SimError, SimResult};

/// Tries at drawing a home outside the zone before a diversion gives up.
pub const RANDOM_HOME_ATTEMPTS: usize = 32;

// ── Building index entry ──────────────────────────────────────────────────────

#[derive(Clone)]
struct BuildingEntry {
    point: [f64; 2],
    id:    BuildingId,
    kind:  BuildingKind,
}

impl RTreeObject for BuildingEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for BuildingEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let (dx, dy) = (self.point[0] - point[0], self.point[1] - point[1]);
        dx * dx + dy * dy
    }
}

// ── World ─────────────────────────────────────────────────────────────────────

pub struct World {
    /// Full networks, indexed by [`TravelMode::index`].
    networks: [RoadNetwork; 2],
    /// Networks minus the zone, once the hazard has triggered.
    safe:     [Option<RoadNetwork>; 2],

    buildings:    Vec<Building>,
    by_kind:      [Vec<BuildingId>; 6],
    area_weights: [Vec<f64>; 6],
    building_idx: RTree<BuildingEntry>,

    zone:              Option<EvacuationZone>,
    hazard_started_at: Option<TimeOfDay>,
}

impl World {
    /// Assemble the world and snap every building to both networks.
    ///
    /// Building ids are reassigned to match their position in `buildings`.
    ///
    /// # Errors
    ///
    /// - [`SpatialError::EmptyNetwork`] if either network has no nodes.
    /// - [`SimError::EmptyBuildingCategory`] if there are no homes or no
    ///   workplaces.
    pub fn new(walk: RoadNetwork, drive: RoadNetwork, mut buildings: Vec<Building>) -> SimResult<Self> {
        if walk.is_empty() || drive.is_empty() {
            return Err(SpatialError::EmptyNetwork.into());
        }

        let mut by_kind: [Vec<BuildingId>; 6] = Default::default();
        let mut area_weights: [Vec<f64>; 6] = Default::default();
        for (i, b) in buildings.iter_mut().enumerate() {
            b.id = BuildingId(i as u32);
            b.snap_entrances([&walk, &drive]);
            by_kind[b.kind.index()].push(b.id);
            area_weights[b.kind.index()].push(b.area_m2);
        }
        for kind in [BuildingKind::Home, BuildingKind::Work] {
            if by_kind[kind.index()].is_empty() {
                return Err(SimError::EmptyBuildingCategory(kind));
            }
        }

        let entries = buildings
            .iter()
            .map(|b| BuildingEntry { point: b.centroid.to_array(), id: b.id, kind: b.kind })
            .collect();

        Ok(Self {
            networks: [walk, drive],
            safe: [None, None],
            buildings,
            by_kind,
            area_weights,
            building_idx: RTree::bulk_load(entries),
            zone: None,
            hazard_started_at: None,
        })
    }

    // ── Networks ──────────────────────────────────────────────────────────

    #[inline]
    pub fn network(&self, mode: TravelMode) -> &RoadNetwork {
        &self.networks[mode.index()]
    }

    pub fn safe_network(&self, mode: TravelMode) -> Option<&RoadNetwork> {
        self.safe[mode.index()].as_ref()
    }

    /// The instance a route of kind `kind` was computed on.
    pub fn network_for(&self, mode: TravelMode, kind: NetworkKind) -> Option<&RoadNetwork> {
        match kind {
            NetworkKind::Full => Some(self.network(mode)),
            NetworkKind::Safe => self.safe_network(mode),
        }
    }

    // ── Buildings ─────────────────────────────────────────────────────────

    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    #[inline]
    pub fn building(&self, id: BuildingId) -> &Building {
        &self.buildings[id.index()]
    }

    pub fn buildings_of(&self, kind: BuildingKind) -> &[BuildingId] {
        &self.by_kind[kind.index()]
    }

    /// Draw a building of `kind`.
    ///
    /// Homes are uniform; everything else is weighted by footprint area.
    /// Schools and the generic kinds fall back to workplaces when the town
    /// has none of them.
    pub fn random_building(&self, kind: BuildingKind, rng: &mut AgentRng) -> Option<BuildingId> {
        let kind = match kind {
            BuildingKind::Home | BuildingKind::Work => kind,
            _ if self.by_kind[kind.index()].is_empty() => BuildingKind::Work,
            _ => kind,
        };
        let ids = &self.by_kind[kind.index()];
        if kind == BuildingKind::Home {
            return rng.choose(ids).copied();
        }
        match rng.choose_weighted(&self.area_weights[kind.index()]) {
            Some(i) => Some(ids[i]),
            // Every footprint degenerate: no area to weight by.
            None => rng.choose(ids).copied(),
        }
    }

    /// Building an agent visits for an activity at `place`.  `own` holds the
    /// agent's home, work, and school, in that order.
    pub fn resolve(&self, place: BuildingKind, own: [BuildingId; 3], rng: &mut AgentRng) -> Option<BuildingId> {
        match place {
            BuildingKind::Home | BuildingKind::Work | BuildingKind::School => {
                Some(own[place.index()]).filter(|b| b.is_valid())
            }
            BuildingKind::Supermarket | BuildingKind::Shop | BuildingKind::Recreation => {
                self.random_building(place, rng)
            }
        }
    }

    /// Random standing point inside `building` plus its entrance on the
    /// `mode` network.
    pub fn locate(&self, building: BuildingId, mode: TravelMode, rng: &mut AgentRng) -> Located {
        let b = self.building(building);
        Located { building, point: b.random_point(rng), node: b.entrance(mode) }
    }

    /// Nearest building to `pos` by centroid, optionally of one kind.
    pub fn nearest_building(&self, pos: Point, kind: Option<BuildingKind>) -> Option<BuildingId> {
        self.building_idx
            .nearest_neighbor_iter(&pos.to_array())
            .find(|e| kind.is_none_or(|k| e.kind == k))
            .map(|e| e.id)
    }

    // ── Zone ──────────────────────────────────────────────────────────────

    pub fn zone(&self) -> Option<&EvacuationZone> {
        self.zone.as_ref()
    }

    pub fn hazard_started_at(&self) -> Option<TimeOfDay> {
        self.hazard_started_at
    }

    /// `false` before the hazard triggers.
    pub fn in_zone(&self, p: Point) -> bool {
        self.zone.as_ref().is_some_and(|z| z.contains(p))
    }

    /// Declare the zone, compute its exits, and derive the safe networks.
    /// Later calls return the existing zone unchanged.
    pub fn declare_zone(&mut self, disk: Disk, now: TimeOfDay) -> &EvacuationZone {
        let zone = match self.zone.take() {
            Some(existing) => existing,
            None => self.build_zone(disk, now),
        };
        self.zone.insert(zone)
    }

    fn build_zone(&mut self, disk: Disk, now: TimeOfDay) -> EvacuationZone {
        let [walk, drive] = &self.networks;
        let zone = EvacuationZone::declare(disk, [walk, drive]);
        let safe = [walk.build_safe(&zone.disk), drive.build_safe(&zone.disk)];
        info!(
            "hazard at {} ({now}): radius {} m, exits walk={} car={}, safe nodes walk={} car={}",
            disk.centre,
            disk.radius_m,
            zone.exits_for(TravelMode::Walk).len(),
            zone.exits_for(TravelMode::Car).len(),
            safe[0].node_count(),
            safe[1].node_count(),
        );
        let [safe_walk, safe_drive] = safe;
        self.safe = [Some(safe_walk), Some(safe_drive)];
        self.hazard_started_at = Some(now);
        zone
    }

    /// A home outside the zone other than `exclude`, drawn uniformly with at
    /// most [`RANDOM_HOME_ATTEMPTS`] tries.
    pub fn random_home_outside_zone(&self, exclude: BuildingId, rng: &mut AgentRng) -> Option<BuildingId> {
        let homes = self.buildings_of(BuildingKind::Home);
        (0..RANDOM_HOME_ATTEMPTS)
            .filter_map(|_| rng.choose(homes).copied())
            .find(|&h| h != exclude && !self.in_zone(self.building(h).centroid))
    }
}
