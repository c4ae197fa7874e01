//! The `BehaviorModel` trait and the standard evacuation rules.

use ev_agent::{Behaviour, Evacuee, Status};
use ev_core::TravelMode;

use crate::intent::{DiversionOption, EvacuationTarget, Intent};
use crate::SimContext;

/// Radius around the hazard centre inside which curious pedestrians slow down.
pub const CURIOUS_RADIUS_M: f64 = 200.0;
/// Walking-speed multiplier for curious pedestrians near the hazard.
pub const CURIOUS_SPEED_FACTOR: f64 = 0.25;

const DIVERSION_PLAN: [DiversionOption; 3] = [
    DiversionOption::OriginalDestination,
    DiversionOption::Home,
    DiversionOption::RandomHome,
];

/// Pluggable hazard response.
///
/// Every method reads the agent and a [`SimContext`] and returns a decision;
/// none mutate anything.  Applying a decision (routing, moving, flag
/// changes) is the simulation's job.
pub trait BehaviorModel: Send + Sync + 'static {
    /// Decide what a not-yet-evacuating agent does this tick.
    fn prepare(&self, agent: &Evacuee, ctx: &SimContext<'_>) -> Intent;

    /// Where an agent of `behaviour` heads once it starts evacuating.
    fn evacuation_target(&self, behaviour: Behaviour) -> EvacuationTarget {
        match behaviour {
            Behaviour::Familiar => EvacuationTarget::Home,
            Behaviour::Compliant | Behaviour::NonCompliant | Behaviour::Curious => EvacuationTarget::NearestExit,
        }
    }

    /// Whether crossing into the zone diverts this agent.
    fn diverts_on_zone_entry(&self, agent: &Evacuee) -> bool {
        !matches!(agent.behaviour, Behaviour::NonCompliant)
    }

    /// Fallbacks tried in order when the agent is diverted.
    fn diversion_plan(&self, _agent: &Evacuee) -> &'static [DiversionOption] {
        &DIVERSION_PLAN
    }

    /// Multiplier on the agent's base speed this tick.
    fn speed_factor(&self, agent: &Evacuee, ctx: &SimContext<'_>) -> f64 {
        match (agent.behaviour, agent.mode, ctx.zone) {
            (Behaviour::Curious, TravelMode::Walk, Some(zone))
                if agent.position.distance(zone.centre()) < CURIOUS_RADIUS_M =>
            {
                CURIOUS_SPEED_FACTOR
            }
            _ => 1.0,
        }
    }
}

// ── StandardBehavior ──────────────────────────────────────────────────────────

/// The evacuation rules used by default.
///
/// An agent starts evacuating once the hazard is active, its response delay
/// has passed, it is inside the zone, and it is not non-compliant.
/// Otherwise a parked agent whose leave time has passed follows its
/// schedule, unless it has been flagged for evacuation or has nowhere left
/// to go.
#[derive(Clone, Copy, Debug)]
pub struct StandardBehavior {
    /// Agents leaving a building on evacuation leave their car behind.
    pub evacuate_on_foot: bool,
}

impl Default for StandardBehavior {
    fn default() -> Self {
        Self { evacuate_on_foot: true }
    }
}

impl StandardBehavior {
    fn should_evacuate(&self, agent: &Evacuee, ctx: &SimContext<'_>) -> bool {
        if agent.status == Status::Evacuating || agent.behaviour == Behaviour::NonCompliant {
            return false;
        }
        let Some(elapsed) = ctx.secs_since_hazard() else {
            return false;
        };
        elapsed >= agent.response_delay_secs && ctx.in_zone(agent.position)
    }
}

impl BehaviorModel for StandardBehavior {
    fn prepare(&self, agent: &Evacuee, ctx: &SimContext<'_>) -> Intent {
        if agent.sheltering || agent.stranded {
            return Intent::Stay;
        }
        if self.should_evacuate(agent, ctx) {
            return Intent::Evacuate {
                target:  self.evacuation_target(agent.behaviour),
                on_foot: self.evacuate_on_foot && agent.status == Status::Parked,
            };
        }
        if agent.status == Status::Parked && !agent.requires_evacuation() && ctx.now > agent.leave_time {
            return Intent::Depart;
        }
        Intent::Stay
    }
}
