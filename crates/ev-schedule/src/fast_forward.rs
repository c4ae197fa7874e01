//! Fast-forwarding a schedule to the simulation start time.
//!
//! Every agent begins its day at the graph's start activity at midnight.
//! [`initial_state`] replays the day hop by hop (leave time, sampled next
//! activity, travel time along the shortest route) until it reaches the
//! requested start time, and reports whether the agent is then sitting at
//! an activity or partway along a route.
//!
//! The replay is an iterative loop capped at [`MAX_HOPS`] so a cyclic graph
//! cannot spin forever.

use log::warn;

use ev_core::{ActivityId, AgentRng, BuildingId, EdgeId, NodeId, Point, TimeOfDay};
use ev_spatial::{BuildingKind, RoadNetwork, Route, Router};

use crate::graph::ScheduleGraph;
use crate::{ScheduleError, ScheduleResult};

/// Upper bound on activity hops replayed by [`initial_state`].
pub const MAX_HOPS: usize = 64;

// ── Inputs ────────────────────────────────────────────────────────────────────

/// A concrete place an activity resolved to.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Located {
    pub building: BuildingId,
    /// Point inside the footprint where the agent stands.
    pub point:    Point,
    /// Entrance node on the agent's network.
    pub node:     NodeId,
}

/// How the agent travels during the replay.
pub struct Travel<'a, R: Router> {
    pub network:      &'a RoadNetwork,
    pub router:       &'a R,
    /// Cruising speed in m/s.
    pub speed_mps:    f64,
    /// Drivers slow to each edge's speed limit; walkers ignore it.
    pub obeys_limits: bool,
}

impl<R: Router> Travel<'_, R> {
    #[inline]
    fn edge_speed(&self, edge: EdgeId) -> f64 {
        let limit = self.network.edge_speed_mps[edge.index()];
        if self.obeys_limits { self.speed_mps.min(limit) } else { self.speed_mps }
    }

    fn edge_secs(&self, edge: EdgeId) -> f64 {
        let metres = self.network.edge_length_m[edge.index()];
        let speed = self.edge_speed(edge);
        match metres {
            m if m <= 0.0   => 0.0,
            _ if speed > 0.0 => metres / speed,
            _               => f64::INFINITY,
        }
    }

    fn route_secs(&self, route: &Route) -> f64 {
        route.edges.iter().map(|&e| self.edge_secs(e)).sum()
    }
}

// ── Output ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum InitialState {
    /// At an activity, leaving at `leave_time` (which may already have
    /// passed if the activity is terminal).
    AtActivity {
        activity:   ActivityId,
        location:   Located,
        leave_time: TimeOfDay,
    },
    /// Between two activities.
    InTransit {
        /// Where the agent is heading.
        activity:            ActivityId,
        destination:         Located,
        route:               Route,
        /// Index into `route.edges` of the edge currently being travelled.
        route_index:         usize,
        distance_along_edge: f64,
        position:            Point,
    },
}

impl InitialState {
    pub fn position(&self) -> Point {
        match self {
            InitialState::AtActivity { location, .. } => location.point,
            InitialState::InTransit { position, .. }  => *position,
        }
    }
}

// ── Replay ────────────────────────────────────────────────────────────────────

/// Replay `graph` from midnight to `start_time`.
///
/// `resolve` turns a place into a concrete building, point and entrance.
/// A failed resolution or route mid-replay leaves the agent at its current
/// activity.  With a fixed RNG state the result is fully reproducible.
///
/// # Errors
///
/// [`ScheduleError::Unresolvable`] if the start activity cannot be placed.
pub fn initial_state<R, F>(
    graph:       &ScheduleGraph,
    start_time:  TimeOfDay,
    travel:      &Travel<'_, R>,
    rng:         &mut AgentRng,
    mut resolve: F,
) -> ScheduleResult<InitialState>
where
    R: Router,
    F: FnMut(BuildingKind, &mut AgentRng) -> Option<Located>,
{
    let mut current = graph.start();
    let start_place = graph.activity(current).place;
    let mut here = resolve(start_place, rng).ok_or(ScheduleError::Unresolvable(start_place))?;
    let mut arrival = TimeOfDay::MIDNIGHT;
    let mut leave = graph.leave_time(current, arrival, rng);

    let at_activity = |activity, location, leave_time| InitialState::AtActivity {
        activity,
        location,
        leave_time,
    };

    for _ in 0..MAX_HOPS {
        if leave > start_time {
            return Ok(at_activity(current, here, leave));
        }
        let Some(next) = graph.next_activity(current, rng) else {
            return Ok(at_activity(current, here, leave));
        };
        let Some(there) = resolve(graph.activity(next).place, rng) else {
            return Ok(at_activity(current, here, leave));
        };
        let Ok(route) = travel.router.route(travel.network, here.node, there.node) else {
            return Ok(at_activity(current, here, leave));
        };

        let arrive_next = leave.plus(travel.route_secs(&route));
        if arrive_next <= start_time {
            current = next;
            here = there;
            arrival = arrive_next;
            leave = graph.leave_time(current, arrival, rng);
            continue;
        }

        return Ok(mid_route(travel, next, there, route, leave, start_time));
    }

    warn!("schedule {}: fast-forward stopped after {MAX_HOPS} hops", graph.name);
    Ok(at_activity(current, here, leave))
}

/// Walk `route` from `departed` until `now`, edge by edge.
fn mid_route<R: Router>(
    travel:      &Travel<'_, R>,
    activity:    ActivityId,
    destination: Located,
    route:       Route,
    departed:    TimeOfDay,
    now:         TimeOfDay,
) -> InitialState {
    let net = travel.network;
    let mut t = departed;
    let mut route_index = 0;
    while route_index < route.edges.len() {
        let edge_secs = travel.edge_secs(route.edges[route_index]);
        if t.plus(edge_secs) > now {
            break;
        }
        t = t.plus(edge_secs);
        route_index += 1;
    }

    // `arrive_next > now` guarantees at least part of an edge remains.
    let route_index = route_index.min(route.edges.len().saturating_sub(1));
    let edge = route.edges[route_index];
    let distance_along_edge =
        (now.since(t) * travel.edge_speed(edge)).clamp(0.0, net.edge_length_m[edge.index()]);
    let position = net.point_along(edge, distance_along_edge);

    InitialState::InTransit {
        activity,
        destination,
        route,
        route_index,
        distance_along_edge,
        position,
    }
}
