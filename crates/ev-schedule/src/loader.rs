//! CSV schedule-template loader.
//!
//! A template is two files: one row per activity, one row per transition.
//!
//! ```csv
//! name,leave_at,duration_mins,variation_mins
//! home,08:00,,15
//! school,15:15,,15
//! supermarket,,45,15
//! home 2,19:00,,60
//! ```
//!
//! ```csv
//! from,to,p
//! home,school,1
//! school,home 2,0.5
//! school,supermarket,0.5
//! supermarket,home 2,1
//! ```
//!
//! At most one of `leave_at` / `duration_mins` may be set; with neither the
//! activity is a pass-through.  The place is the first word of `name`.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use ev_core::TimeOfDay;

use crate::graph::{Activity, ScheduleGraph, Timing};
use crate::{ScheduleError, ScheduleResult};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ActivityRecord {
    name:           String,
    leave_at:       Option<String>,
    duration_mins:  Option<f64>,
    variation_mins: Option<f64>,
}

#[derive(Deserialize)]
struct TransitionRecord {
    from: String,
    to:   String,
    p:    f64,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a template from an activities file and a transitions file.
pub fn load_graph_csv(name: &str, activities: &Path, transitions: &Path) -> ScheduleResult<ScheduleGraph> {
    let a = std::fs::File::open(activities)?;
    let t = std::fs::File::open(transitions)?;
    load_graph_reader(name, a, t)
}

/// Like [`load_graph_csv`] but from any `Read` sources.
pub fn load_graph_reader<A: Read, T: Read>(name: &str, activities: A, transitions: T) -> ScheduleResult<ScheduleGraph> {
    let mut nodes = Vec::new();
    for row in csv::Reader::from_reader(activities).deserialize::<ActivityRecord>() {
        let row = row.map_err(|e| ScheduleError::Parse(e.to_string()))?;
        nodes.push(activity_from(row)?);
    }

    let mut edges = Vec::new();
    for row in csv::Reader::from_reader(transitions).deserialize::<TransitionRecord>() {
        edges.push(row.map_err(|e| ScheduleError::Parse(e.to_string()))?);
    }
    let edges: Vec<(&str, &str, f64)> = edges.iter().map(|e| (e.from.as_str(), e.to.as_str(), e.p)).collect();

    ScheduleGraph::new(name, nodes, &edges)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn activity_from(row: ActivityRecord) -> ScheduleResult<Activity> {
    let leave_at = row.leave_at.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let timing = match (leave_at, row.duration_mins) {
        (Some(_), Some(_)) => {
            return Err(ScheduleError::Parse(format!(
                "activity {:?}: both leave_at and duration_mins set",
                row.name
            )));
        }
        (Some(t), None) => Timing::LeaveAt(
            TimeOfDay::parse(t).map_err(|e| ScheduleError::Parse(e.to_string()))?,
        ),
        (None, Some(mins)) => Timing::Duration(mins * 60.0),
        (None, None) => Timing::Passthrough,
    };
    Activity::labelled(row.name.trim(), timing, row.variation_mins.unwrap_or(0.0) * 60.0)
}
