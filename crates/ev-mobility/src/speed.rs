//! Effective travel speed and queueing separation.

use ev_core::TravelMode;
use ev_spatial::DEFAULT_SPEED_LIMIT_MPS;

/// Vehicles never exceed 30 mph, whatever the posted limit.
pub const VEHICLE_SPEED_CAP_MPS: f64 = DEFAULT_SPEED_LIMIT_MPS;

/// Gap a pedestrian keeps behind the one in front, in metres.
pub const PEDESTRIAN_SEPARATION_M: f64 = 1.0;
/// Gap a car keeps behind the one in front, in metres.
pub const CAR_SEPARATION_M: f64 = 5.0;

/// Speed on one edge, in m/s.
///
/// Cars drive at the edge's limit capped at [`VEHICLE_SPEED_CAP_MPS`];
/// pedestrians walk at their own pace.  `factor` scales the result (the
/// curious-agent penalty).
pub fn effective_speed(mode: TravelMode, walking_speed_mps: f64, edge_limit_mps: f64, factor: f64) -> f64 {
    let base = match mode {
        TravelMode::Car  => edge_limit_mps.min(VEHICLE_SPEED_CAP_MPS),
        TravelMode::Walk => walking_speed_mps,
    };
    (base * factor).max(0.0)
}

pub fn separation_m(mode: TravelMode) -> f64 {
    match mode {
        TravelMode::Walk => PEDESTRIAN_SEPARATION_M,
        TravelMode::Car  => CAR_SEPARATION_M,
    }
}
