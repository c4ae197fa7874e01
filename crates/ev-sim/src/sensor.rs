//! Passive traffic counters.
//!
//! A sensor watches one road (every segment sharing a way id) and logs each
//! agent that turns onto it.  An agent reports only when the way it enters
//! differs from the last way it reported, so walking the length of a road
//! made of many segments counts once.

use rustc_hash::FxHashMap;
use serde::Serialize;

use ev_core::{Point, SensorId, TimeOfDay, TravelMode};
use ev_spatial::RoadNetwork;

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct SensorRecord {
    pub time: TimeOfDay,
    pub mode: TravelMode,
}

#[derive(Clone, Debug, Serialize)]
pub struct TrafficSensor {
    pub id:       SensorId,
    pub way_id:   u64,
    /// Where the sensor was requested, not snapped.
    pub position: Point,
    pub records:  Vec<SensorRecord>,
}

impl TrafficSensor {
    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn count_mode(&self, mode: TravelMode) -> usize {
        self.records.iter().filter(|r| r.mode == mode).count()
    }
}

/// All sensors of a run, looked up by way id.
#[derive(Clone, Debug, Default)]
pub struct SensorRegistry {
    sensors: Vec<TrafficSensor>,
    by_way:  FxHashMap<u64, SensorId>,
}

impl SensorRegistry {
    /// Put a sensor on the road nearest `position`.  Returns `None` if the
    /// network has no edges or the road already carries a sensor.
    pub fn place(&mut self, position: Point, network: &RoadNetwork) -> Option<SensorId> {
        let edge = network.nearest_edge(position)?;
        let way_id = network.edge_way[edge.index()];
        if self.by_way.contains_key(&way_id) {
            return None;
        }
        let id = SensorId(self.sensors.len() as u32);
        self.sensors.push(TrafficSensor { id, way_id, position, records: Vec::new() });
        self.by_way.insert(way_id, id);
        Some(id)
    }

    /// Log a pass on `way_id`, if a sensor watches it.
    pub fn report(&mut self, way_id: u64, time: TimeOfDay, mode: TravelMode) {
        if let Some(id) = self.by_way.get(&way_id) {
            self.sensors[id.index()].records.push(SensorRecord { time, mode });
        }
    }

    pub fn get(&self, id: SensorId) -> &TrafficSensor {
        &self.sensors[id.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrafficSensor> {
        self.sensors.iter()
    }

    pub fn len(&self) -> usize {
        self.sensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }
}
