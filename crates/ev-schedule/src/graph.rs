//! Schedule graphs: per-category templates of daily activities.
//!
//! # Model
//!
//! A [`ScheduleGraph`] is a small directed graph.  Each node is an
//! [`Activity`] carried out at a place (a [`BuildingKind`]) with a
//! [`Timing`] rule; each edge is a [`Transition`] weighted by a probability.
//! Weights out of an activity are relative and need not sum to 1.  An
//! activity with no outgoing transitions is terminal: the agent stays there
//! for the rest of the day.
//!
//! Exactly one activity has no incoming transitions.  Every agent starts its
//! day there at midnight.
//!
//! # Leave-time rule
//!
//! ```text
//! jitter     ~ Normal(0, variation)
//! LeaveAt(t)  → t + jitter
//! Duration(d) → arrival + |d + jitter|
//! Passthrough → arrival
//! ```
//!
//! Graphs are immutable once built and shared read-only by every agent of
//! a category.

use std::collections::HashMap;

use ev_core::{ActivityId, AgentRng, TimeOfDay};
use ev_spatial::BuildingKind;

use crate::{ScheduleError, ScheduleResult};

// ── Timing ────────────────────────────────────────────────────────────────────

/// When an agent leaves an activity.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Timing {
    /// Leave at a fixed clock time.
    LeaveAt(TimeOfDay),
    /// Stay this many seconds after arriving.
    Duration(f64),
    /// Leave as soon as the activity is reached.
    Passthrough,
}

// ── Activity ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Activity {
    /// Unique label within the graph, e.g. `"home 2"`.
    pub name:           String,
    pub place:          BuildingKind,
    pub timing:         Timing,
    /// Standard deviation of the leave-time jitter, in seconds.
    pub variation_secs: f64,
}

impl Activity {
    /// An activity whose place is read from the first word of `name`.
    ///
    /// # Errors
    ///
    /// [`ScheduleError::Parse`] if the label names no known building kind.
    pub fn labelled(name: &str, timing: Timing, variation_secs: f64) -> ScheduleResult<Self> {
        let place = BuildingKind::from_label(name)
            .ok_or_else(|| ScheduleError::Parse(format!("activity {name:?} names no known place")))?;
        Ok(Self { name: name.to_string(), place, timing, variation_secs })
    }

    pub fn leave_at(name: &str, at: TimeOfDay, variation_secs: f64) -> ScheduleResult<Self> {
        Self::labelled(name, Timing::LeaveAt(at), variation_secs)
    }

    pub fn lasting(name: &str, duration_secs: f64, variation_secs: f64) -> ScheduleResult<Self> {
        Self::labelled(name, Timing::Duration(duration_secs), variation_secs)
    }
}

// ── Transition ────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transition {
    pub to: ActivityId,
    /// Relative weight.
    pub p:  f64,
}

// ── ScheduleGraph ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduleGraph {
    pub name:   String,
    activities: Vec<Activity>,
    /// Outgoing transitions, indexed by `ActivityId`.
    out:        Vec<Vec<Transition>>,
    start:      ActivityId,
}

impl ScheduleGraph {
    /// Build a graph from its activities and `(from, to, p)` transitions
    /// given by activity name.
    ///
    /// # Errors
    ///
    /// - [`ScheduleError::Parse`] for duplicate names, too many activities,
    ///   or a negative or non-finite weight.
    /// - [`ScheduleError::UnknownActivity`] if a transition names an
    ///   activity that does not exist.
    /// - [`ScheduleError::NoStartActivity`] / [`ScheduleError::AmbiguousStartActivity`]
    ///   unless exactly one activity has no incoming transitions.
    pub fn new(
        name:        impl Into<String>,
        activities:  Vec<Activity>,
        transitions: &[(&str, &str, f64)],
    ) -> ScheduleResult<Self> {
        let name = name.into();
        if activities.len() >= usize::from(u16::MAX) {
            return Err(ScheduleError::Parse(format!("{name}: too many activities")));
        }

        let mut by_name: HashMap<&str, ActivityId> = HashMap::with_capacity(activities.len());
        for (i, a) in activities.iter().enumerate() {
            if by_name.insert(a.name.as_str(), ActivityId(i as u16)).is_some() {
                return Err(ScheduleError::Parse(format!("{name}: duplicate activity {:?}", a.name)));
            }
        }
        let lookup = |label: &str| {
            by_name
                .get(label)
                .copied()
                .ok_or_else(|| ScheduleError::UnknownActivity(label.to_string()))
        };

        let mut out = vec![Vec::new(); activities.len()];
        let mut in_degree = vec![0usize; activities.len()];
        for &(from, to, p) in transitions {
            if !p.is_finite() || p < 0.0 {
                return Err(ScheduleError::Parse(format!("{name}: bad weight {p} on {from} -> {to}")));
            }
            let (from, to) = (lookup(from)?, lookup(to)?);
            out[from.index()].push(Transition { to, p });
            in_degree[to.index()] += 1;
        }

        let starts: Vec<usize> = (0..activities.len()).filter(|&i| in_degree[i] == 0).collect();
        let start = match starts.as_slice() {
            [] => return Err(ScheduleError::NoStartActivity(name)),
            [only] => ActivityId(*only as u16),
            many => {
                let names = many.iter().map(|&i| activities[i].name.clone()).collect();
                return Err(ScheduleError::AmbiguousStartActivity(name, names));
            }
        };

        Ok(Self { name, activities, out, start })
    }

    /// The activity every agent is at when the day begins.
    #[inline]
    pub fn start(&self) -> ActivityId {
        self.start
    }

    #[inline]
    pub fn activity(&self, id: ActivityId) -> &Activity {
        &self.activities[id.index()]
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<ActivityId> {
        self.activities
            .iter()
            .position(|a| a.name == name)
            .map(|i| ActivityId(i as u16))
    }

    pub fn transitions(&self, from: ActivityId) -> &[Transition] {
        &self.out[from.index()]
    }

    /// Draw the time an agent that arrived at `activity` at `arrival` leaves.
    pub fn leave_time(&self, activity: ActivityId, arrival: TimeOfDay, rng: &mut AgentRng) -> TimeOfDay {
        let a = self.activity(activity);
        let jitter = rng.normal(0.0, a.variation_secs);
        match a.timing {
            Timing::LeaveAt(at)      => at.plus(jitter),
            Timing::Duration(secs)   => arrival.plus((secs + jitter).abs()),
            Timing::Passthrough      => arrival,
        }
    }

    /// Sample the activity that follows `current`, weighted by transition
    /// probability.  `None` when `current` is terminal.
    pub fn next_activity(&self, current: ActivityId, rng: &mut AgentRng) -> Option<ActivityId> {
        let options = self.transitions(current);
        let weights: Vec<f64> = options.iter().map(|t| t.p).collect();
        rng.choose_weighted(&weights).map(|i| options[i].to)
    }
}
