//! The `Model` struct and its tick loop.

use log::info;

use ev_agent::{AgentRngs, Category, Population};
use ev_behavior::BehaviorModel;
use ev_core::{AgentId, Point, SimClock, SimConfig, SimRng, Tick, TimeOfDay};
use ev_schedule::{templates, ScheduleGraph, ScheduleResult};
use ev_spatial::{Disk, Region, Router};

use crate::observer::{AgentSnapshot, SimObserver, TickSummary};
use crate::step::Step;
use crate::{Occupancy, ScenarioExport, SensorRegistry, World};

// ── Schedules ─────────────────────────────────────────────────────────────────

/// One schedule graph per population category, shared by all its agents.
pub struct Schedules {
    graphs: [ScheduleGraph; 3],
}

impl Schedules {
    /// Graphs in [`Category::ALL`] order.
    pub fn new(child: ScheduleGraph, working_adult: ScheduleGraph, retired_adult: ScheduleGraph) -> Self {
        Self { graphs: [child, working_adult, retired_adult] }
    }

    /// The built-in templates.
    pub fn standard() -> ScheduleResult<Self> {
        Ok(Self::new(templates::child()?, templates::working_adult()?, templates::retired_adult()?))
    }

    #[inline]
    pub fn for_category(&self, category: Category) -> &ScheduleGraph {
        &self.graphs[category.index()]
    }
}

// ── Hazard ────────────────────────────────────────────────────────────────────

/// When and where the hazard strikes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Hazard {
    pub location: Point,
    pub radius_m: f64,
    pub start:    TimeOfDay,
}

// ── Model ─────────────────────────────────────────────────────────────────────

/// The evacuation model.
///
/// Each [`step`](Self::step):
///
/// 1. advances the clock by one tick;
/// 2. triggers the hazard once its start time is reached: declares the zone,
///    derives the safe networks, and flags every agent inside the disk;
/// 3. shuffles the activation order with the model's RNG;
/// 4. runs each agent's prepare and move in that order;
/// 5. records a [`TickSummary`].
///
/// Agents later in the order see the positions earlier agents reached this
/// tick, so queueing depends on the order and thus on the seed.  A fixed
/// seed reproduces a run exactly.
///
/// Create via [`ModelBuilder`][crate::ModelBuilder].
pub struct Model<B: BehaviorModel, R: Router> {
    pub config:     SimConfig,
    pub clock:      SimClock,
    pub world:      World,
    pub occupancy:  Occupancy,
    pub sensors:    SensorRegistry,
    pub population: Population,
    pub rngs:       AgentRngs,
    pub schedules:  Schedules,
    pub behavior:   B,
    pub router:     R,
    pub hazard:     Hazard,
    /// Deliver snapshots every N ticks; 0 disables them.
    pub snapshot_interval: u64,

    activation_rng: SimRng,
    order:          Vec<AgentId>,
}

impl<B: BehaviorModel, R: Router> Model<B, R> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        config:     SimConfig,
        world:      World,
        occupancy:  Occupancy,
        sensors:    SensorRegistry,
        population: Population,
        rngs:       AgentRngs,
        schedules:  Schedules,
        behavior:   B,
        router:     R,
        hazard:     Hazard,
        snapshot_interval: u64,
        activation_rng: SimRng,
    ) -> Self {
        let order = population.agent_ids().collect();
        Self {
            clock: config.make_clock(),
            config,
            world,
            occupancy,
            sensors,
            population,
            rngs,
            schedules,
            behavior,
            router,
            hazard,
            snapshot_interval,
            activation_rng,
            order,
        }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Run from the current tick to `config.end_tick()`.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> TickSummary {
        let mut last = self.summary();
        while self.clock.current_tick < self.config.end_tick() {
            last = self.step(observer);
        }
        observer.on_sim_end(&last);
        last
    }

    /// Run exactly `n` ticks, ignoring `end_tick`.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> TickSummary {
        let mut last = self.summary();
        for _ in 0..n {
            last = self.step(observer);
        }
        last
    }

    /// Advance one tick.
    pub fn step<O: SimObserver>(&mut self, observer: &mut O) -> TickSummary {
        self.clock.advance();
        let tick = self.clock.current_tick;
        let now = self.clock.now();
        observer.on_tick_start(tick, now);

        if self.world.zone().is_none() && now >= self.hazard.start {
            self.trigger_hazard(tick, now, observer);
        }

        self.activation_rng.shuffle(&mut self.order);
        let mut step = Step {
            world:     &self.world,
            occupancy: &mut self.occupancy,
            sensors:   &mut self.sensors,
            schedules: &self.schedules,
            behavior:  &self.behavior,
            router:    &self.router,
            now,
            tick_secs: self.clock.tick_duration_secs,
        };
        for &id in &self.order {
            step.run(self.population.get_mut(id), self.rngs.get_mut(id));
        }

        let summary = self.summary();
        observer.on_tick_end(&summary);
        if self.snapshot_interval > 0 && tick.is_multiple_of(self.snapshot_interval) {
            observer.on_snapshot(tick, &self.snapshots());
        }
        summary
    }

    /// Aggregates as of the current tick.
    pub fn summary(&self) -> TickSummary {
        TickSummary {
            tick: self.clock.current_tick,
            time: self.clock.now(),
            number_requiring_evacuation: self.population.number_requiring_evacuation(),
            number_evacuated: self.population.number_evacuated(),
            evacuation_started: self.world.zone().is_some(),
        }
    }

    pub fn snapshots(&self) -> Vec<AgentSnapshot> {
        let tick = self.clock.current_tick;
        self.population.iter().map(|a| AgentSnapshot::of(a, tick)).collect()
    }

    /// Geometry, zone, and population for rendering the run.
    pub fn export(&self) -> ScenarioExport {
        ScenarioExport::collect(&self.world, &self.population)
    }

    pub fn number_requiring_evacuation(&self) -> usize {
        self.population.number_requiring_evacuation()
    }

    pub fn number_evacuated(&self) -> usize {
        self.population.number_evacuated()
    }

    pub fn evacuation_started(&self) -> bool {
        self.world.zone().is_some()
    }

    // ── Hazard ────────────────────────────────────────────────────────────

    fn trigger_hazard<O: SimObserver>(&mut self, tick: Tick, now: TimeOfDay, observer: &mut O) {
        let disk = Disk::new(self.hazard.location, self.hazard.radius_m);
        let zone = self.world.declare_zone(disk, now);

        let mut flagged = 0;
        for agent in self.population.iter_mut() {
            if zone.contains(agent.position) {
                agent.flag_for_evacuation();
                flagged += 1;
            }
        }
        info!("{tick} ({now}): hazard declared, {flagged} agents inside the zone");
        observer.on_hazard(tick, zone, flagged);
    }
}
