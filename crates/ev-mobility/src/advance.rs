//! Movement along a single edge under the no-overtake rule.
//!
//! An agent moving along an edge may not pass anyone ahead of it on the same
//! directed edge in the same mode.  If the nearest such agent is within the
//! distance it could cover this tick, it closes up to one separation behind
//! and stops for the rest of the tick.  It never moves backwards, even when
//! already closer than the separation.

/// Result of one [`advance_on_edge`] call.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EdgeAdvance {
    /// New distance from the start of the edge, in `[0, edge length]`.
    pub distance_m:  f64,
    /// Seconds of the budget consumed.
    pub time_used:   f64,
    /// `true` if the end node was reached; any leftover budget carries on
    /// to the next edge.
    pub reached_end: bool,
    /// `true` if a leader stopped the agent; the tick ends for it.
    pub blocked:     bool,
}

/// Move from `distance_m` along an edge of `edge_length_m` at `speed_mps`
/// for at most `budget_secs`.
///
/// `leader_m` is the position of the nearest agent strictly ahead on the
/// same edge, if any.
pub fn advance_on_edge(
    distance_m:    f64,
    edge_length_m: f64,
    speed_mps:     f64,
    budget_secs:   f64,
    leader_m:      Option<f64>,
    separation_m:  f64,
) -> EdgeAdvance {
    let start = distance_m.clamp(0.0, edge_length_m);
    let budget = budget_secs.max(0.0);
    let reach = if speed_mps > 0.0 { speed_mps * budget } else { 0.0 };

    if let Some(leader) = leader_m.filter(|&l| l > start && l - start < reach) {
        let stop = (leader - separation_m).clamp(start, edge_length_m);
        return EdgeAdvance {
            distance_m:  stop,
            time_used:   (stop - start) / speed_mps,
            reached_end: false,
            blocked:     true,
        };
    }

    let remaining = edge_length_m - start;
    if remaining <= reach {
        let time_used = if speed_mps > 0.0 { remaining / speed_mps } else { 0.0 };
        return EdgeAdvance { distance_m: edge_length_m, time_used, reached_end: true, blocked: false };
    }

    EdgeAdvance { distance_m: start + reach, time_used: budget, reached_end: false, blocked: false }
}

/// Position of the nearest agent strictly ahead of `own_m`, from the
/// `(agent, distance)` pairs sharing the edge.
pub fn nearest_ahead<I, K>(occupants: I, own: K, own_m: f64) -> Option<f64>
where
    I: IntoIterator<Item = (K, f64)>,
    K: PartialEq,
{
    occupants
        .into_iter()
        .filter(|(k, d)| *k != own && *d > own_m)
        .map(|(_, d)| d)
        .min_by(f64::total_cmp)
}
