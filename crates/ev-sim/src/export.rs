//! Serializable dump of the scenario geometry and population, for
//! rendering a run after the fact.

use serde::Serialize;

use ev_agent::{Category, Population};
use ev_core::{AgentId, BuildingId, Point, TravelMode};
use ev_spatial::{BuildingKind, EvacuationZone, RoadNetwork};

use crate::World;

#[derive(Clone, Debug, Serialize)]
pub struct NodeExport {
    pub source_id: u64,
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Debug, Serialize)]
pub struct EdgeExport {
    pub from:      u64,
    pub to:        u64,
    pub length_m:  f64,
    pub speed_mps: f64,
    pub way_id:    u64,
}

#[derive(Clone, Debug, Serialize)]
pub struct NetworkExport {
    pub mode:  TravelMode,
    pub nodes: Vec<NodeExport>,
    pub edges: Vec<EdgeExport>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ExitExport {
    pub mode:      TravelMode,
    pub source_id: u64,
    pub position:  Point,
    pub crossing:  Point,
}

#[derive(Clone, Debug, Serialize)]
pub struct ZoneExport {
    pub centre:   Point,
    pub radius_m: f64,
    pub exits:    Vec<ExitExport>,
}

#[derive(Clone, Debug, Serialize)]
pub struct BuildingExport {
    pub id:       BuildingId,
    pub kind:     BuildingKind,
    pub centroid: Point,
    pub area_m2:  f64,
    pub outline:  Vec<Point>,
}

#[derive(Clone, Debug, Serialize)]
pub struct AgentExport {
    pub id:        AgentId,
    pub category:  Category,
    pub walking_speed_mps: f64,
    pub mode:      TravelMode,
}

/// Networks, zone and exits, buildings, and the static part of each agent.
#[derive(Clone, Debug, Serialize)]
pub struct ScenarioExport {
    pub networks:  Vec<NetworkExport>,
    pub zone:      Option<ZoneExport>,
    pub buildings: Vec<BuildingExport>,
    pub agents:    Vec<AgentExport>,
}

impl ScenarioExport {
    pub fn collect(world: &World, population: &Population) -> Self {
        Self {
            networks: TravelMode::ALL
                .into_iter()
                .map(|mode| export_network(mode, world.network(mode)))
                .collect(),
            zone: world.zone().map(|z| export_zone(z, world)),
            buildings: world
                .buildings()
                .iter()
                .map(|b| BuildingExport {
                    id:       b.id,
                    kind:     b.kind,
                    centroid: b.centroid,
                    area_m2:  b.area_m2,
                    outline:  b.footprint.exterior().coords().map(|c| Point::new(c.x, c.y)).collect(),
                })
                .collect(),
            agents: population
                .iter()
                .map(|a| AgentExport {
                    id:       a.id,
                    category: a.category,
                    walking_speed_mps: a.walking_speed_mps,
                    mode:     a.mode,
                })
                .collect(),
        }
    }
}

fn export_network(mode: TravelMode, net: &RoadNetwork) -> NetworkExport {
    NetworkExport {
        mode,
        nodes: net
            .node_pos
            .iter()
            .zip(&net.node_source)
            .map(|(p, &source_id)| NodeExport { source_id, x: p.x, y: p.y })
            .collect(),
        edges: (0..net.edge_count())
            .map(|e| EdgeExport {
                from:      net.node_source[net.edge_from[e].index()],
                to:        net.node_source[net.edge_to[e].index()],
                length_m:  net.edge_length_m[e],
                speed_mps: net.edge_speed_mps[e],
                way_id:    net.edge_way[e],
            })
            .collect(),
    }
}

fn export_zone(zone: &EvacuationZone, world: &World) -> ZoneExport {
    let exits = TravelMode::ALL
        .into_iter()
        .flat_map(|mode| {
            let net = world.network(mode);
            zone.exits_for(mode).iter().map(move |x| ExitExport {
                mode,
                source_id: net.source_id(x.node),
                position:  x.position,
                crossing:  x.crossing,
            })
        })
        .collect();
    ZoneExport { centre: zone.centre(), radius_m: zone.radius_m(), exits }
}
