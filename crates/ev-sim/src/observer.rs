//! Observer hooks and the records they receive.

use serde::Serialize;

use ev_agent::{Evacuee, Status};
use ev_core::{AgentId, Tick, TimeOfDay, TravelMode};
use ev_spatial::EvacuationZone;

/// Model-level aggregates after one tick.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct TickSummary {
    pub tick: Tick,
    pub time: TimeOfDay,
    pub number_requiring_evacuation: usize,
    pub number_evacuated: usize,
    /// `true` from the tick the hazard triggers onwards.
    pub evacuation_started: bool,
}

/// One agent's state, for recording and plotting.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct AgentSnapshot {
    pub agent:  AgentId,
    pub tick:   Tick,
    pub x:      f64,
    pub y:      f64,
    pub mode:   TravelMode,
    pub status: Status,
    pub requires_evacuation: bool,
    pub evacuated: bool,
    pub diverted:  bool,
}

impl AgentSnapshot {
    pub fn of(agent: &Evacuee, tick: Tick) -> Self {
        Self {
            agent:  agent.id,
            tick,
            x:      agent.position.x,
            y:      agent.position.y,
            mode:   agent.mode,
            status: agent.status,
            requires_evacuation: agent.requires_evacuation(),
            evacuated: agent.evacuated(),
            diverted:  agent.diverted,
        }
    }
}

/// Callbacks invoked by [`Model::run`][crate::Model::run] at key points in
/// the tick loop.
///
/// All methods default to no-ops; implement only what you need.
///
/// ```rust,ignore
/// struct Progress;
///
/// impl SimObserver for Progress {
///     fn on_tick_end(&mut self, s: &TickSummary) {
///         println!("{} {}/{}", s.time, s.number_evacuated, s.number_requiring_evacuation);
///     }
/// }
/// ```
pub trait SimObserver {
    /// Start of a tick, after the clock has advanced.
    fn on_tick_start(&mut self, _tick: Tick, _time: TimeOfDay) {}

    /// The zone has just been declared; `flagged` agents were inside it.
    fn on_hazard(&mut self, _tick: Tick, _zone: &EvacuationZone, _flagged: usize) {}

    fn on_tick_end(&mut self, _summary: &TickSummary) {}

    /// Every `snapshot_interval` ticks, one record per agent in id order.
    fn on_snapshot(&mut self, _tick: Tick, _agents: &[AgentSnapshot]) {}

    fn on_sim_end(&mut self, _last: &TickSummary) {}
}

/// A [`SimObserver`] that ignores everything.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
