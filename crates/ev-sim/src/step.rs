//! One agent's turn within a tick: decide, then move.
//!
//! ```text
//! prepare ─┬─ Evacuate → route to exit / home on the full network
//!          ├─ Depart   → next schedule activity on the full network
//!          └─ Stay
//! move ──── advance edge by edge until the budget runs out, a leader
//!           blocks, or the route ends
//!             every position update → zone-entry diversion check
//!             route ended           → arrival
//! ```
//!
//! Routing failures never propagate: the agent parks with `leave_time = now`
//! and tries again on a later tick.  Only an exhausted diversion is final.

use log::{debug, trace, warn};

use ev_agent::{Behaviour, Destination, Evacuee, NetworkKind, RouteProgress, Status};
use ev_behavior::{BehaviorModel, DiversionOption, EvacuationTarget, Intent, SimContext};
use ev_core::{AgentRng, BuildingId, EdgeId, Point, TimeOfDay, TravelMode};
use ev_mobility::{advance_on_edge, effective_speed, separation_m};
use ev_spatial::{RoadNetwork, Route, Router};

use crate::{EdgeKey, Occupancy, Schedules, SensorRegistry, World};

/// Everything one agent's step reads or writes besides the agent itself.
pub(crate) struct Step<'a, B: BehaviorModel, R: Router> {
    pub world:     &'a World,
    pub occupancy: &'a mut Occupancy,
    pub sensors:   &'a mut SensorRegistry,
    pub schedules: &'a Schedules,
    pub behavior:  &'a B,
    pub router:    &'a R,
    pub now:       TimeOfDay,
    pub tick_secs: u32,
}

impl<B: BehaviorModel, R: Router> Step<'_, B, R> {
    pub fn run(&mut self, agent: &mut Evacuee, rng: &mut AgentRng) {
        match self.behavior.prepare(agent, &self.context()) {
            Intent::Evacuate { target, on_foot } => self.start_evacuation(agent, rng, target, on_foot),
            Intent::Depart => self.depart(agent, rng),
            Intent::Stay => {}
        }
        if agent.is_moving() {
            self.advance(agent, rng);
        }
    }

    fn context(&self) -> SimContext<'_> {
        match (self.world.zone(), self.world.hazard_started_at()) {
            (Some(zone), Some(started)) => SimContext::hazard(self.now, self.tick_secs, zone, started),
            _ => SimContext::calm(self.now, self.tick_secs),
        }
    }

    // ── Prepare ───────────────────────────────────────────────────────────

    fn start_evacuation(&mut self, agent: &mut Evacuee, rng: &mut AgentRng, target: EvacuationTarget, on_foot: bool) {
        let Some(zone) = self.world.zone() else { return };
        agent.flag_for_evacuation();
        self.leave_edge(agent);
        if on_foot && agent.mode == TravelMode::Car {
            agent.mode = TravelMode::Walk;
        }

        let net = self.world.network(agent.mode);
        let planned = net.nearest_node(agent.position).and_then(|from| match target {
            EvacuationTarget::Home => {
                let to = self.world.building(agent.home).entrance(agent.mode);
                self.router.route(net, from, to).ok().map(|r| (r, Destination::Refuge { building: agent.home }))
            }
            EvacuationTarget::NearestExit => {
                let exits = zone.exit_nodes(agent.mode);
                let (exit, _) = self.router.nearest_of(net, from, &exits).ok()?;
                self.router.route(net, from, exit).ok().map(|r| (r, Destination::Exit))
            }
        });

        let Some((route, destination)) = planned else {
            debug!("{}: no evacuation route from {}, waiting", agent.id, agent.position);
            agent.park(self.now);
            return;
        };
        debug!("{}: evacuating towards {destination:?} ({:.0} m)", agent.id, route.length_m);
        agent.activity = None;
        self.begin_route(agent, rng, net, route, NetworkKind::Full, destination, Status::Evacuating);
    }

    fn depart(&mut self, agent: &mut Evacuee, rng: &mut AgentRng) {
        let graph = self.schedules.for_category(agent.category);
        let next = agent.activity.and_then(|current| graph.next_activity(current, rng));
        let Some(next) = next else {
            // Terminal activity: stay until the hazard says otherwise.
            agent.leave_time = TimeOfDay::NEVER;
            return;
        };

        let own = [agent.home, agent.work, agent.school];
        let net = self.world.network(agent.mode);
        let planned = self
            .world
            .resolve(graph.activity(next).place, own, rng)
            .and_then(|building| {
                let from = net.nearest_node(agent.position)?;
                let to = self.world.building(building).entrance(agent.mode);
                self.router.route(net, from, to).ok().map(|r| (r, building))
            });

        let Some((route, building)) = planned else {
            trace!("{}: could not route to {}, retrying", agent.id, graph.activity(next).name);
            agent.park(self.now);
            return;
        };
        agent.activity = None;
        let destination = Destination::Activity { activity: next, building };
        self.begin_route(agent, rng, net, route, NetworkKind::Full, destination, Status::Travelling);
    }

    /// Put the agent at the start of `route` and set it moving.  A route that
    /// goes nowhere is an arrival on the spot.
    #[allow(clippy::too_many_arguments)]
    fn begin_route(
        &mut self,
        agent:       &mut Evacuee,
        rng:         &mut AgentRng,
        net:         &RoadNetwork,
        route:       Route,
        network:     NetworkKind,
        destination: Destination,
        status:      Status,
    ) {
        let start = route.nodes.first().map(|&n| net.position(n)).unwrap_or(agent.position);
        let trivial = route.is_trivial();
        agent.depart(RouteProgress::new(route, network), destination, status);
        self.set_position(agent, start);
        if trivial {
            self.arrive(agent, rng);
        } else {
            self.enter_edge(agent, net);
        }
    }

    // ── Move ──────────────────────────────────────────────────────────────

    fn advance(&mut self, agent: &mut Evacuee, rng: &mut AgentRng) {
        let mut budget = f64::from(self.tick_secs);
        loop {
            let Some((edge, distance, network)) = current_edge(agent) else {
                self.arrive(agent, rng);
                return;
            };
            let Some(net) = self.world.network_for(agent.mode, network) else {
                agent.park(self.now);
                return;
            };

            let key = EdgeKey::of(net, edge, agent.mode);
            let factor = self.behavior.speed_factor(agent, &self.context());
            let speed = effective_speed(agent.mode, agent.walking_speed_mps, net.edge_speed_mps[edge.index()], factor);
            let leader = self.occupancy.leader(key, agent.id, distance);
            let step = advance_on_edge(
                distance,
                net.edge_length_m[edge.index()],
                speed,
                budget,
                leader,
                separation_m(agent.mode),
            );
            budget -= step.time_used;

            if !step.reached_end {
                if let Some(route) = agent.route.as_mut() {
                    route.distance_along_edge = step.distance_m;
                }
                self.occupancy.update(key, agent.id, step.distance_m);
                self.set_position(agent, net.point_along(edge, step.distance_m));
                if self.entered_zone(agent) {
                    self.divert(agent, rng);
                }
                return;
            }

            self.occupancy.leave(key, agent.id);
            let node = match agent.route.as_mut() {
                Some(route) => {
                    route.pass_node();
                    route.last_node()
                }
                None => return,
            };
            self.set_position(agent, net.position(node));

            if self.entered_zone(agent) {
                self.divert(agent, rng);
                return;
            }
            if agent.route.as_ref().is_none_or(RouteProgress::is_complete) {
                self.arrive(agent, rng);
                return;
            }
            self.enter_edge(agent, net);
            if budget <= 0.0 {
                return;
            }
        }
    }

    /// Crossed into the zone while going about the day, unflagged.
    fn entered_zone(&self, agent: &Evacuee) -> bool {
        agent.status == Status::Travelling
            && !agent.requires_evacuation()
            && self.world.in_zone(agent.position)
            && self.behavior.diverts_on_zone_entry(agent)
    }

    fn set_position(&self, agent: &mut Evacuee, p: Point) {
        agent.position = p;
        if agent.requires_evacuation()
            && !agent.evacuated()
            && agent.behaviour != Behaviour::NonCompliant
            && self.world.zone().is_some()
            && !self.world.in_zone(p)
            && agent.mark_evacuated()
        {
            debug!("{}: evacuated at {p}", agent.id);
        }
    }

    fn enter_edge(&mut self, agent: &mut Evacuee, net: &RoadNetwork) {
        let Some((edge, distance, _)) = current_edge(agent) else { return };
        self.occupancy.update(EdgeKey::of(net, edge, agent.mode), agent.id, distance);
        let way = net.edge_way[edge.index()];
        if agent.last_reported_way != Some(way) {
            self.sensors.report(way, self.now, agent.mode);
            agent.last_reported_way = Some(way);
        }
    }

    fn leave_edge(&mut self, agent: &Evacuee) {
        let Some((edge, _, network)) = current_edge(agent) else { return };
        if let Some(net) = self.world.network_for(agent.mode, network) {
            self.occupancy.leave(EdgeKey::of(net, edge, agent.mode), agent.id);
        }
    }

    // ── Arrival ───────────────────────────────────────────────────────────

    fn arrive(&mut self, agent: &mut Evacuee, rng: &mut AgentRng) {
        self.leave_edge(agent);
        let destination = agent.destination;

        if agent.behaviour == Behaviour::Familiar
            && agent.status == Status::Evacuating
            && destination == Some(Destination::Refuge { building: agent.home })
            && self.world.in_zone(self.world.building(agent.home).centroid)
        {
            debug!("{}: sheltering at home inside the zone", agent.id);
            self.settle_in(agent, rng, agent.home);
            agent.sheltering = true;
            return;
        }

        match destination {
            Some(Destination::Activity { activity, building }) if agent.status != Status::Evacuating => {
                self.settle_in(agent, rng, building);
                agent.activity = Some(activity);
                agent.leave_time = self.schedules.for_category(agent.category).leave_time(activity, self.now, rng);
            }
            Some(Destination::Refuge { building }) if agent.status != Status::Evacuating => {
                self.settle_in(agent, rng, building);
            }
            _ => {
                // Reached an exit, or evacuated to a refuge: carry on to
                // somewhere safe.
                agent.mark_evacuated();
                agent.park(self.now);
                agent.destination = None;
                self.divert(agent, rng);
            }
        }
    }

    fn settle_in(&self, agent: &mut Evacuee, rng: &mut AgentRng, building: BuildingId) {
        agent.park(self.now);
        agent.activity = None;
        let point = self.world.building(building).random_point(rng);
        self.set_position(agent, point);
    }

    // ── Diversion ─────────────────────────────────────────────────────────

    /// Re-route on the safe network: original destination, then home, then
    /// any other home outside the zone.  Strands the agent if all fail.
    fn divert(&mut self, agent: &mut Evacuee, rng: &mut AgentRng) {
        self.leave_edge(agent);
        agent.flag_for_evacuation();
        agent.diverted = true;
        agent.status = Status::Travelling;

        let Some(net) = self.world.safe_network(agent.mode) else {
            self.strand(agent);
            return;
        };
        let Some(from) = net.nearest_node(agent.position) else {
            self.strand(agent);
            return;
        };

        for &option in self.behavior.diversion_plan(agent) {
            let Some(destination) = self.diversion_target(agent, rng, option) else { continue };
            let Some(building) = destination.building() else { continue };
            let Some(to) = net.nearest_node(self.world.building(building).centroid) else { continue };
            if let Ok(route) = self.router.route(net, from, to) {
                debug!("{}: diverted via {option:?} ({:.0} m)", agent.id, route.length_m);
                self.begin_route(agent, rng, net, route, NetworkKind::Safe, destination, Status::Travelling);
                return;
            }
        }
        self.strand(agent);
    }

    fn diversion_target(&self, agent: &Evacuee, rng: &mut AgentRng, option: DiversionOption) -> Option<Destination> {
        match option {
            DiversionOption::OriginalDestination => agent
                .destination
                .filter(|d| d.building().is_some_and(|b| !self.world.in_zone(self.world.building(b).centroid))),
            DiversionOption::Home => {
                let home = self.world.building(agent.home);
                (!self.world.in_zone(home.centroid)).then_some(Destination::Refuge { building: agent.home })
            }
            DiversionOption::RandomHome => self
                .world
                .random_home_outside_zone(agent.home, rng)
                .map(|building| Destination::Refuge { building }),
        }
    }

    fn strand(&self, agent: &mut Evacuee) {
        if !agent.stranded {
            warn!("{}: no reachable destination outside the zone, stranded at {}", agent.id, agent.position);
        }
        agent.stranded = true;
        agent.park(self.now);
    }
}

/// `(edge, distance along it, network)` of a moving agent's route, if
/// the route still has an edge to travel.
fn current_edge(agent: &Evacuee) -> Option<(EdgeId, f64, NetworkKind)> {
    let route = agent.route.as_ref()?;
    route.current_edge().map(|e| (e, route.distance_along_edge, route.network))
}

