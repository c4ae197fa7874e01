//! Unit tests for ev-schedule.

use ev_core::{AgentId, AgentRng, BuildingId, NodeId, Point, TimeOfDay};
use ev_spatial::{BuildingKind, DijkstraRouter, RoadNetwork, RoadNetworkBuilder, RoadSpec};

use crate::{Activity, Located, ScheduleGraph, Timing};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn rng() -> AgentRng {
    AgentRng::new(42, AgentId(0))
}

/// home (leave 08:00) → work (leave 17:00) → home 2 (terminal), no jitter.
fn commute() -> ScheduleGraph {
    ScheduleGraph::new(
        "commute",
        vec![
            Activity::leave_at("home", TimeOfDay::hm(8, 0), 0.0).unwrap(),
            Activity::leave_at("work", TimeOfDay::hm(17, 0), 0.0).unwrap(),
            Activity::labelled("home 2", Timing::Passthrough, 0.0).unwrap(),
        ],
        &[("home", "work", 1.0), ("work", "home 2", 1.0)],
    )
    .unwrap()
}

/// Home at x = 0, everything else at x = 1000.
fn two_node_town() -> (RoadNetwork, NodeId, NodeId) {
    let mut b = RoadNetworkBuilder::new();
    let home = b.add_node(Point::new(0.0, 0.0));
    let work = b.add_node(Point::new(1_000.0, 0.0));
    b.add_road(home, work, RoadSpec::way(1));
    (b.build().unwrap(), home, work)
}

fn resolver(home: NodeId, other: NodeId) -> impl FnMut(BuildingKind, &mut AgentRng) -> Option<Located> {
    move |kind, _rng| {
        let (building, node, x) = match kind {
            BuildingKind::Home => (BuildingId(0), home, 0.0),
            _ => (BuildingId(1), other, 1_000.0),
        };
        Some(Located { building, point: Point::new(x, 5.0), node })
    }
}

// ── Graph construction ────────────────────────────────────────────────────────

#[cfg(test)]
mod graph {
    use super::*;
    use crate::ScheduleError;

    #[test]
    fn builtin_templates_start_at_home() {
        for g in [
            crate::templates::child().unwrap(),
            crate::templates::working_adult().unwrap(),
            crate::templates::retired_adult().unwrap(),
        ] {
            assert_eq!(g.activity(g.start()).name, "home", "{}", g.name);
            assert_eq!(g.activity(g.start()).place, BuildingKind::Home);
        }
    }

    #[test]
    fn places_follow_labels() {
        let g = crate::templates::working_adult().unwrap();
        let id = g.find("supermarket 2").unwrap();
        assert_eq!(g.activity(id).place, BuildingKind::Supermarket);
        assert_eq!(g.activity(id).timing, Timing::Duration(45.0 * 60.0));
        assert!(g.transitions(g.find("home 3").unwrap()).is_empty());
    }

    #[test]
    fn unknown_transition_target() {
        let err = ScheduleGraph::new(
            "bad",
            vec![Activity::leave_at("home", TimeOfDay::hm(8, 0), 0.0).unwrap()],
            &[("home", "pub", 1.0)],
        )
        .unwrap_err();
        assert!(matches!(err, ScheduleError::UnknownActivity(ref n) if n == "pub"));
    }

    #[test]
    fn cycle_has_no_start() {
        let err = ScheduleGraph::new(
            "loop",
            vec![
                Activity::leave_at("home", TimeOfDay::hm(8, 0), 0.0).unwrap(),
                Activity::lasting("shop", 600.0, 0.0).unwrap(),
            ],
            &[("home", "shop", 1.0), ("shop", "home", 1.0)],
        )
        .unwrap_err();
        assert!(matches!(err, ScheduleError::NoStartActivity(_)));
    }

    #[test]
    fn two_starts_are_ambiguous() {
        let err = ScheduleGraph::new(
            "split",
            vec![
                Activity::leave_at("home", TimeOfDay::hm(8, 0), 0.0).unwrap(),
                Activity::lasting("shop", 600.0, 0.0).unwrap(),
                Activity::lasting("work", 600.0, 0.0).unwrap(),
            ],
            &[("home", "work", 1.0), ("shop", "work", 1.0)],
        )
        .unwrap_err();
        assert!(matches!(err, ScheduleError::AmbiguousStartActivity(_, ref names) if names.len() == 2));
    }

    #[test]
    fn duplicate_names_rejected() {
        let err = ScheduleGraph::new(
            "dup",
            vec![
                Activity::leave_at("home", TimeOfDay::hm(8, 0), 0.0).unwrap(),
                Activity::leave_at("home", TimeOfDay::hm(9, 0), 0.0).unwrap(),
            ],
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, ScheduleError::Parse(_)));
    }

    #[test]
    fn unknown_place_label() {
        assert!(Activity::lasting("pub", 600.0, 0.0).is_err());
    }
}

// ── Leave times and next activity ─────────────────────────────────────────────

#[cfg(test)]
mod sampling {
    use super::*;

    #[test]
    fn leave_time_rules_without_jitter() {
        let g = ScheduleGraph::new(
            "rules",
            vec![
                Activity::leave_at("home", TimeOfDay::hm(8, 0), 0.0).unwrap(),
                Activity::lasting("shop", 45.0 * 60.0, 0.0).unwrap(),
                Activity::labelled("work", Timing::Passthrough, 0.0).unwrap(),
            ],
            &[("home", "shop", 1.0), ("shop", "work", 1.0)],
        )
        .unwrap();
        let mut r = rng();
        let noon = TimeOfDay::hm(12, 0);
        assert_eq!(g.leave_time(g.find("home").unwrap(), noon, &mut r), TimeOfDay::hm(8, 0));
        assert_eq!(g.leave_time(g.find("shop").unwrap(), noon, &mut r), TimeOfDay::hm(12, 45));
        assert_eq!(g.leave_time(g.find("work").unwrap(), noon, &mut r), noon);
    }

    #[test]
    fn duration_jitter_never_goes_backwards() {
        let g = ScheduleGraph::new(
            "jitter",
            vec![Activity::lasting("shop", 60.0, 3_600.0).unwrap()],
            &[],
        )
        .unwrap();
        let mut r = rng();
        let arrival = TimeOfDay::hm(9, 0);
        for _ in 0..500 {
            assert!(g.leave_time(ev_core::ActivityId(0), arrival, &mut r) >= arrival);
        }
    }

    #[test]
    fn next_activity_terminal_and_forced() {
        let g = commute();
        let mut r = rng();
        assert_eq!(g.next_activity(g.find("home").unwrap(), &mut r), g.find("work"));
        assert_eq!(g.next_activity(g.find("home 2").unwrap(), &mut r), None);
    }

    #[test]
    fn next_activity_follows_weights() {
        let g = crate::templates::working_adult().unwrap();
        let home = g.start();
        let work = g.find("work").unwrap();
        let mut r = rng();
        let to_work = (0..2_000).filter(|_| g.next_activity(home, &mut r) == Some(work)).count();
        // p = 0.8
        assert!((1_450..=1_750).contains(&to_work), "{to_work}");
    }
}

// ── Fast-forward ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod fast_forward {
    use super::*;
    use crate::{initial_state, InitialState, Travel};

    fn run(start: TimeOfDay) -> InitialState {
        let (net, home, work) = two_node_town();
        let travel = Travel { network: &net, router: &DijkstraRouter, speed_mps: 1.0, obeys_limits: false };
        initial_state(&commute(), start, &travel, &mut rng(), resolver(home, work)).unwrap()
    }

    #[test]
    fn before_first_departure_is_at_home() {
        match run(TimeOfDay::hm(7, 0)) {
            InitialState::AtActivity { activity, leave_time, location } => {
                assert_eq!(activity, commute().find("home").unwrap());
                assert_eq!(leave_time, TimeOfDay::hm(8, 0));
                assert_eq!(location.building, BuildingId(0));
            }
            other => panic!("expected AtActivity, got {other:?}"),
        }
    }

    #[test]
    fn midday_is_at_work() {
        match run(TimeOfDay::hm(12, 0)) {
            InitialState::AtActivity { activity, leave_time, .. } => {
                assert_eq!(activity, commute().find("work").unwrap());
                assert_eq!(leave_time, TimeOfDay::hm(17, 0));
            }
            other => panic!("expected AtActivity, got {other:?}"),
        }
    }

    #[test]
    fn mid_commute_is_partway_along_edge() {
        // Left at 08:00 at 1 m/s; five minutes later 300 m along a 1 km road.
        match run(TimeOfDay::hm(8, 5)) {
            InitialState::InTransit { activity, route, route_index, distance_along_edge, position, .. } => {
                assert_eq!(activity, commute().find("work").unwrap());
                assert_eq!(route.edges.len(), 1);
                assert_eq!(route_index, 0);
                assert!((distance_along_edge - 300.0).abs() < 1e-6);
                assert!((position.x - 300.0).abs() < 1e-6);
            }
            other => panic!("expected InTransit, got {other:?}"),
        }
    }

    #[test]
    fn drivers_keep_to_the_speed_limit() {
        // 1 km at 20 mph; a car that could do 30 mph is held to the limit.
        let mut b = RoadNetworkBuilder::new();
        let home = b.add_node(Point::new(0.0, 0.0));
        let work = b.add_node(Point::new(1_000.0, 0.0));
        b.add_road(home, work, RoadSpec::way(1).maxspeed("20 mph"));
        let net = b.build().unwrap();
        let limit = net.edge_speed_mps[0];
        let travel = Travel { network: &net, router: &DijkstraRouter, speed_mps: limit * 1.5, obeys_limits: true };

        let state = initial_state(&commute(), TimeOfDay::hms(8, 0, 30), &travel, &mut rng(), resolver(home, work)).unwrap();
        match state {
            InitialState::InTransit { distance_along_edge, .. } => {
                assert!((distance_along_edge - 30.0 * limit).abs() < 1e-6, "{distance_along_edge}");
            }
            other => panic!("expected InTransit, got {other:?}"),
        }
    }

    #[test]
    fn terminal_activity_keeps_past_leave_time() {
        match run(TimeOfDay::hm(23, 0)) {
            InitialState::AtActivity { activity, leave_time, .. } => {
                assert_eq!(activity, commute().find("home 2").unwrap());
                assert!(leave_time < TimeOfDay::hm(23, 0));
            }
            other => panic!("expected AtActivity, got {other:?}"),
        }
    }

    #[test]
    fn same_seed_same_state() {
        let (net, home, work) = two_node_town();
        let travel = Travel { network: &net, router: &DijkstraRouter, speed_mps: 1.4, obeys_limits: false };
        let graph = crate::templates::working_adult().unwrap();
        for start in [TimeOfDay::hm(7, 45), TimeOfDay::hm(10, 0), TimeOfDay::hm(17, 10)] {
            let a = initial_state(&graph, start, &travel, &mut AgentRng::new(9, AgentId(3)), resolver(home, work)).unwrap();
            let b = initial_state(&graph, start, &travel, &mut AgentRng::new(9, AgentId(3)), resolver(home, work)).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn unplaceable_start_is_an_error() {
        let (net, ..) = two_node_town();
        let travel = Travel { network: &net, router: &DijkstraRouter, speed_mps: 1.0, obeys_limits: false };
        let err = initial_state(&commute(), TimeOfDay::hm(9, 0), &travel, &mut rng(), |_, _| None).unwrap_err();
        assert!(matches!(err, crate::ScheduleError::Unresolvable(BuildingKind::Home)));
    }

    #[test]
    fn cyclic_graph_stops_at_hop_cap() {
        // start → a ⇄ b with zero-length stays; the replay must terminate.
        let g = ScheduleGraph::new(
            "spin",
            vec![
                Activity::labelled("home", Timing::Passthrough, 0.0).unwrap(),
                Activity::labelled("shop", Timing::Passthrough, 0.0).unwrap(),
                Activity::labelled("recreation", Timing::Passthrough, 0.0).unwrap(),
            ],
            &[("home", "shop", 1.0), ("shop", "recreation", 1.0), ("recreation", "shop", 1.0)],
        )
        .unwrap();
        let (net, home, _) = two_node_town();
        let travel = Travel { network: &net, router: &DijkstraRouter, speed_mps: 1.0, obeys_limits: false };
        let state = initial_state(&g, TimeOfDay::hm(9, 0), &travel, &mut rng(), resolver(home, home)).unwrap();
        assert!(matches!(state, InitialState::AtActivity { .. }));
    }
}

// ── CSV loader ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::{Cursor, Write};

    use super::*;
    use crate::{load_graph_csv, load_graph_reader};

    const ACTIVITIES: &str = "\
name,leave_at,duration_mins,variation_mins
home,08:00,,15
school,15:15,,15
supermarket,,45,15
home 2,,,
";

    const TRANSITIONS: &str = "\
from,to,p
home,school,1
school,home 2,0.5
school,supermarket,0.5
supermarket,home 2,1
";

    #[test]
    fn reads_activities_and_transitions() {
        let g = load_graph_reader("csv", Cursor::new(ACTIVITIES), Cursor::new(TRANSITIONS)).unwrap();
        assert_eq!(g.len(), 4);
        assert_eq!(g.activity(g.start()).name, "home");
        let school = g.find("school").unwrap();
        assert_eq!(g.activity(school).timing, Timing::LeaveAt(TimeOfDay::hm(15, 15)));
        assert_eq!(g.activity(school).variation_secs, 900.0);
        assert_eq!(g.transitions(school).len(), 2);
        let market = g.find("supermarket").unwrap();
        assert_eq!(g.activity(market).timing, Timing::Duration(2_700.0));
        assert_eq!(g.activity(g.find("home 2").unwrap()).timing, Timing::Passthrough);
    }

    #[test]
    fn reads_from_files() {
        let mut a = tempfile::NamedTempFile::new().unwrap();
        a.write_all(ACTIVITIES.as_bytes()).unwrap();
        let mut t = tempfile::NamedTempFile::new().unwrap();
        t.write_all(TRANSITIONS.as_bytes()).unwrap();
        let g = load_graph_csv("file", a.path(), t.path()).unwrap();
        assert_eq!(g.name, "file");
        assert_eq!(g.len(), 4);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_graph_csv(
            "none",
            std::path::Path::new("/nonexistent/activities.csv"),
            std::path::Path::new("/nonexistent/transitions.csv"),
        )
        .unwrap_err();
        assert!(matches!(err, crate::ScheduleError::Io(_)));
    }

    #[test]
    fn both_timings_rejected() {
        let bad = "name,leave_at,duration_mins,variation_mins\nhome,08:00,30,0\n";
        let err = load_graph_reader("bad", Cursor::new(bad), Cursor::new("from,to,p\n")).unwrap_err();
        assert!(matches!(err, crate::ScheduleError::Parse(_)));
    }

    #[test]
    fn bad_clock_time_rejected() {
        let bad = "name,leave_at,duration_mins,variation_mins\nhome,25:99,,0\n";
        assert!(load_graph_reader("bad", Cursor::new(bad), Cursor::new("from,to,p\n")).is_err());
    }
}
