//! Scenario parameters, as read from a JSON scenario file.

use serde::{Deserialize, Serialize};

use ev_agent::Category;
use ev_behavior::BehaviourMix;
use ev_core::{Point, SimConfig, TimeOfDay};

use crate::{SimError, SimResult};

/// Share of the population in one category.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategorySpec {
    pub category:   Category,
    /// Relative weight; the weights need not sum to one.
    pub proportion: f64,
    /// Overrides [`Category::default_walking_speed_mps`].
    #[serde(default)]
    pub walking_speed_mps: Option<f64>,
}

impl CategorySpec {
    pub fn walking_speed(&self) -> f64 {
        self.walking_speed_mps
            .unwrap_or_else(|| self.category.default_walking_speed_mps())
    }
}

/// Everything that varies between runs apart from geometry.
///
/// Missing JSON fields take their [`Default`] values, so a scenario file
/// only needs to name what it changes:
///
/// ```json
/// { "num_agents": 500, "zone_radius_m": 800, "hazard_start": "08:30" }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub num_agents:  usize,
    pub seed:        u64,
    pub total_steps: u64,
    pub tick_duration_secs: u32,

    pub simulation_start: TimeOfDay,
    pub hazard_start:     TimeOfDay,
    /// Hazard centre, in the network's projected metres.
    pub hazard_location:  Point,
    pub zone_radius_m:    f64,

    pub behaviour_mix: BehaviourMix,
    /// Percentage of agents with a car, 0–100.
    pub car_use_pc:    f64,
    /// Mean response delay.  `None` means every agent reacts at once.
    pub mean_response_delay_mins: Option<f64>,
    /// Parked agents leave their car behind when they evacuate.
    pub evacuate_on_foot: bool,

    pub categories: Vec<CategorySpec>,
    /// A traffic sensor is placed on the road nearest each point.
    pub sensors:    Vec<Point>,
    /// Deliver agent snapshots every N ticks; 0 disables them.
    pub snapshot_interval: u64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            num_agents:         100,
            seed:               0,
            total_steps:        360,
            tick_duration_secs: SimConfig::DEFAULT_TICK_SECS,
            simulation_start:   TimeOfDay::hm(8, 0),
            hazard_start:       TimeOfDay::hm(8, 10),
            hazard_location:    Point::default(),
            zone_radius_m:      1_000.0,
            behaviour_mix:      BehaviourMix::default(),
            car_use_pc:         0.0,
            mean_response_delay_mins: None,
            evacuate_on_foot:   true,
            categories: vec![
                CategorySpec { category: Category::Child,        proportion: 0.2, walking_speed_mps: None },
                CategorySpec { category: Category::WorkingAdult, proportion: 0.6, walking_speed_mps: None },
                CategorySpec { category: Category::RetiredAdult, proportion: 0.2, walking_speed_mps: None },
            ],
            sensors:           Vec::new(),
            snapshot_interval: 0,
        }
    }
}

impl ScenarioConfig {
    /// Timing and seeding for the tick loop.
    pub fn sim_config(&self) -> SimConfig {
        SimConfig {
            start:              self.simulation_start,
            tick_duration_secs: self.tick_duration_secs,
            total_ticks:        self.total_steps,
            seed:               self.seed,
        }
    }

    pub fn validate(&self) -> SimResult<()> {
        if self.tick_duration_secs == 0 {
            return Err(SimError::Config("tick_duration_secs must be positive".into()));
        }
        if !(self.zone_radius_m.is_finite() && self.zone_radius_m >= 0.0) {
            return Err(SimError::Config(format!("invalid zone radius {}", self.zone_radius_m)));
        }
        if !(0.0..=100.0).contains(&self.car_use_pc) {
            return Err(SimError::Config(format!("car_use_pc {} outside 0..=100", self.car_use_pc)));
        }
        if self.mean_response_delay_mins.is_some_and(|m| !m.is_finite() || m < 0.0) {
            return Err(SimError::Config("mean_response_delay_mins must be non-negative".into()));
        }
        self.behaviour_mix.validate()?;

        let weights = self.category_weights();
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) || weights.iter().sum::<f64>() <= 0.0 {
            return Err(SimError::Config("category proportions must be non-negative and not all zero".into()));
        }
        if let Some(spec) = self.categories.iter().find(|c| c.walking_speed() <= 0.0) {
            return Err(SimError::Config(format!("{} walking speed must be positive", spec.category)));
        }
        Ok(())
    }

    pub(crate) fn category_weights(&self) -> Vec<f64> {
        self.categories.iter().map(|c| c.proportion).collect()
    }
}
