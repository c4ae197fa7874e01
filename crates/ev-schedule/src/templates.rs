//! Built-in schedule templates, one per population category.
//!
//! Times and weights describe an ordinary weekday in a small UK town.

use ev_core::TimeOfDay;

use crate::graph::{Activity, ScheduleGraph};
use crate::ScheduleResult;

const MIN: f64 = 60.0;
const HOUR: f64 = 3_600.0;

fn at(h: u32, m: u32) -> TimeOfDay {
    TimeOfDay::hm(h, m)
}

/// School day with an optional after-school club, shopping, or play.
pub fn child() -> ScheduleResult<ScheduleGraph> {
    ScheduleGraph::new(
        "child",
        vec![
            Activity::leave_at("home", at(8, 0), 15.0 * MIN)?,
            Activity::leave_at("school", at(15, 15), 15.0 * MIN)?,
            Activity::leave_at("school 2", at(17, 0), 30.0 * MIN)?,
            Activity::lasting("supermarket", 45.0 * MIN, 15.0 * MIN)?,
            Activity::lasting("recreation", 2.0 * HOUR, HOUR)?,
            Activity::leave_at("home 2", at(19, 0), HOUR)?,
        ],
        &[
            ("home", "school", 1.0),
            ("school", "home 2", 0.5),
            ("school", "school 2", 0.5),
            ("school 2", "supermarket", 0.25),
            ("school 2", "recreation", 0.25),
            ("school 2", "home 2", 0.5),
            ("supermarket", "home 2", 1.0),
            ("recreation", "home 2", 1.0),
        ],
    )
}

/// Commute to work, sometimes via the school run, with lunchtime and
/// evening errands.
pub fn working_adult() -> ScheduleResult<ScheduleGraph> {
    ScheduleGraph::new(
        "working_adult",
        vec![
            Activity::leave_at("home", at(7, 30), HOUR)?,
            Activity::lasting("school", 10.0 * MIN, 5.0 * MIN)?,
            Activity::lasting("shop", 2.0 * HOUR, HOUR)?,
            Activity::leave_at("work", at(13, 0), 90.0 * MIN)?,
            Activity::leave_at("work 2", at(17, 0), 30.0 * MIN)?,
            Activity::lasting("supermarket", 10.0 * MIN, 5.0 * MIN)?,
            Activity::lasting("recreation", 10.0 * MIN, 5.0 * MIN)?,
            Activity::lasting("school 2", 5.0 * MIN, MIN)?,
            Activity::lasting("supermarket 2", 45.0 * MIN, 15.0 * MIN)?,
            Activity::leave_at("home 2", at(19, 0), HOUR)?,
            Activity::lasting("recreation 2", HOUR, 30.0 * MIN)?,
            Activity::leave_at("home 3", at(23, 0), HOUR)?,
        ],
        &[
            ("home", "school", 0.2),
            ("home", "work", 0.8),
            ("school", "shop", 0.1),
            ("school", "work", 0.9),
            ("shop", "work", 1.0),
            ("work", "supermarket", 0.25),
            ("supermarket", "work 2", 1.0),
            ("work", "recreation", 0.25),
            ("recreation", "work 2", 1.0),
            ("work", "work 2", 0.5),
            ("work 2", "supermarket 2", 0.2),
            ("work 2", "school 2", 0.2),
            ("work 2", "home 2", 0.6),
            ("supermarket 2", "home 2", 1.0),
            ("school 2", "supermarket 2", 0.5),
            ("school 2", "home 2", 0.5),
            ("home 2", "recreation 2", 0.1),
            ("home 2", "home 3", 0.9),
            ("recreation 2", "home 3", 1.0),
        ],
    )
}

/// Two outings a day from home, morning and afternoon.
pub fn retired_adult() -> ScheduleResult<ScheduleGraph> {
    ScheduleGraph::new(
        "retired_adult",
        vec![
            Activity::leave_at("home", at(10, 0), HOUR)?,
            Activity::lasting("shop", 2.0 * HOUR, HOUR)?,
            Activity::lasting("supermarket", 45.0 * MIN, 15.0 * MIN)?,
            Activity::lasting("recreation", HOUR, 30.0 * MIN)?,
            Activity::leave_at("home 2", at(14, 0), HOUR)?,
            Activity::lasting("shop 2", 2.0 * HOUR, HOUR)?,
            Activity::lasting("supermarket 2", 45.0 * MIN, 15.0 * MIN)?,
            Activity::lasting("recreation 2", HOUR, 30.0 * MIN)?,
            Activity::leave_at("home 3", at(19, 0), HOUR)?,
        ],
        &[
            ("home", "supermarket", 0.4),
            ("home", "shop", 0.2),
            ("home", "recreation", 0.4),
            ("supermarket", "home 2", 1.0),
            ("shop", "home 2", 1.0),
            ("recreation", "home 2", 1.0),
            ("home 2", "supermarket 2", 0.4),
            ("home 2", "shop 2", 0.2),
            ("home 2", "recreation 2", 0.4),
            ("supermarket 2", "home 3", 1.0),
            ("shop 2", "home 3", 1.0),
            ("recreation 2", "home 3", 1.0),
        ],
    )
}
