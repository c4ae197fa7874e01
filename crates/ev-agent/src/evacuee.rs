//! The evacuee record.

use ev_core::{ActivityId, AgentId, BuildingId, NodeId, Point, TimeOfDay, TravelMode};

use crate::kind::{Behaviour, Category, NetworkKind, Status};
use crate::route::RouteProgress;

/// Where a moving evacuee is heading.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Destination {
    /// The next schedule activity, at a resolved building.
    Activity { activity: ActivityId, building: BuildingId },
    /// A building reached by diversion or a familiar agent's trip home.
    /// No activity starts on arrival.
    Refuge { building: BuildingId },
    /// A zone exit.  There is no building at the end.
    Exit,
}

impl Destination {
    pub fn building(self) -> Option<BuildingId> {
        match self {
            Destination::Activity { building, .. } | Destination::Refuge { building } => Some(building),
            Destination::Exit => None,
        }
    }
}

/// Everything the simulation knows about one person.
///
/// Evacuees are never removed.  `requires_evacuation` and `evacuated` only
/// ever go from `false` to `true`, and `evacuated` implies
/// `requires_evacuation`; use [`Evacuee::flag_for_evacuation`] and
/// [`Evacuee::mark_evacuated`] rather than writing the fields.
#[derive(Clone, Debug)]
pub struct Evacuee {
    pub id:        AgentId,
    pub category:  Category,
    pub behaviour: Behaviour,
    pub mode:      TravelMode,
    pub walking_speed_mps: f64,

    pub home:   BuildingId,
    pub work:   BuildingId,
    pub school: BuildingId,

    pub position: Point,
    pub status:   Status,
    pub route:    Option<RouteProgress>,
    pub destination: Option<Destination>,
    /// Current schedule activity.  `None` while travelling between them.
    pub activity:    Option<ActivityId>,
    /// When a parked agent next moves on.
    pub leave_time:  TimeOfDay,

    /// Seconds after the hazard before this agent acts on it.
    pub response_delay_secs: f64,

    requires_evacuation: bool,
    evacuated:           bool,
    pub diverted:        bool,
    /// Diversion ran out of options; the agent stays put for good.
    pub stranded:        bool,
    /// A familiar agent whose home lies in the zone, sheltering there.
    pub sheltering:      bool,
    /// Way id of the last road reported to a traffic sensor.
    pub last_reported_way: Option<u64>,
}

impl Evacuee {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id:        AgentId,
        category:  Category,
        behaviour: Behaviour,
        mode:      TravelMode,
        walking_speed_mps: f64,
        home:      BuildingId,
        work:      BuildingId,
        school:    BuildingId,
        response_delay_secs: f64,
    ) -> Self {
        Self {
            id,
            category,
            behaviour,
            mode,
            walking_speed_mps,
            home,
            work,
            school,
            position: Point::default(),
            status: Status::Parked,
            route: None,
            destination: None,
            activity: None,
            leave_time: TimeOfDay::MIDNIGHT,
            response_delay_secs,
            requires_evacuation: false,
            evacuated: false,
            diverted: false,
            stranded: false,
            sheltering: false,
            last_reported_way: None,
        }
    }

    // ── Monotonic flags ───────────────────────────────────────────────────

    #[inline]
    pub fn requires_evacuation(&self) -> bool {
        self.requires_evacuation
    }

    #[inline]
    pub fn evacuated(&self) -> bool {
        self.evacuated
    }

    pub fn flag_for_evacuation(&mut self) {
        self.requires_evacuation = true;
    }

    /// Mark the agent evacuated.  Has no effect unless it was flagged for
    /// evacuation first.  Returns `true` if the flag changed.
    pub fn mark_evacuated(&mut self) -> bool {
        if self.requires_evacuation && !self.evacuated {
            self.evacuated = true;
            return true;
        }
        false
    }

    // ── Movement state ────────────────────────────────────────────────────

    /// `true` if the agent has a route and is not parked.
    #[inline]
    pub fn is_moving(&self) -> bool {
        self.status != Status::Parked && self.route.is_some()
    }

    /// Network the current route runs on; the full one when there is none.
    pub fn network(&self) -> NetworkKind {
        self.route.as_ref().map_or(NetworkKind::Full, |r| r.network)
    }

    /// Node the agent is at or last passed, if it has a route.
    pub fn route_node(&self) -> Option<NodeId> {
        self.route.as_ref().map(RouteProgress::last_node)
    }

    /// Stop, drop the route, and be ready to leave at `now`.
    pub fn park(&mut self, now: TimeOfDay) {
        self.status = Status::Parked;
        self.route = None;
        self.leave_time = now;
    }

    /// Start following `route` towards `destination`.
    pub fn depart(&mut self, route: RouteProgress, destination: Destination, status: Status) {
        self.route = Some(route);
        self.destination = Some(destination);
        self.status = status;
    }
}
