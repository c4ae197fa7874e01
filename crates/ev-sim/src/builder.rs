//! Fluent builder for constructing a [`Model`].

use log::{info, warn};

use ev_agent::{Category, Destination, Evacuee, NetworkKind, PopulationBuilder, RouteProgress, Status};
use ev_behavior::{draws_car, response_delay_secs, BehaviorModel, StandardBehavior};
use ev_core::{AgentRng, BuildingId, SimRng, TravelMode};
use ev_mobility::VEHICLE_SPEED_CAP_MPS;
use ev_schedule::{initial_state, InitialState, Travel};
use ev_spatial::{Building, BuildingKind, DijkstraRouter, RoadNetwork, Router};

use crate::model::Hazard;
use crate::{EdgeKey, Model, Occupancy, ScenarioConfig, Schedules, SensorRegistry, SimError, SimResult, World};

/// Seed offset of the activation-order RNG stream.
const ACTIVATION_STREAM: u64 = 1;

/// Fluent builder for [`Model<B, R>`].
///
/// # Required inputs
///
/// - [`ScenarioConfig`]: population mix, hazard, timing, seed
/// - walking and driving [`RoadNetwork`]s
/// - the town's [`Building`]s (at least one home and one workplace)
/// - `B: BehaviorModel` and `R: Router`
///
/// # Optional inputs
///
/// | Method          | Default                   |
/// |-----------------|---------------------------|
/// | `.schedules(s)` | [`Schedules::standard`]   |
///
/// ```rust,ignore
/// let mut model = ModelBuilder::standard(config, walk, drive, buildings).build()?;
/// model.run(&mut NoopObserver);
/// ```
pub struct ModelBuilder<B: BehaviorModel, R: Router> {
    config:    ScenarioConfig,
    walk:      RoadNetwork,
    drive:     RoadNetwork,
    buildings: Vec<Building>,
    schedules: Option<Schedules>,
    behavior:  B,
    router:    R,
}

impl ModelBuilder<StandardBehavior, DijkstraRouter> {
    /// The standard behaviour rules with Dijkstra routing.
    pub fn standard(config: ScenarioConfig, walk: RoadNetwork, drive: RoadNetwork, buildings: Vec<Building>) -> Self {
        let behavior = StandardBehavior { evacuate_on_foot: config.evacuate_on_foot };
        Self::new(config, walk, drive, buildings, behavior, DijkstraRouter)
    }
}

impl<B: BehaviorModel, R: Router> ModelBuilder<B, R> {
    pub fn new(
        config:    ScenarioConfig,
        walk:      RoadNetwork,
        drive:     RoadNetwork,
        buildings: Vec<Building>,
        behavior:  B,
        router:    R,
    ) -> Self {
        Self { config, walk, drive, buildings, schedules: None, behavior, router }
    }

    pub fn schedules(mut self, schedules: Schedules) -> Self {
        self.schedules = Some(schedules);
        self
    }

    /// Validate inputs, create and place the population, and return a
    /// ready-to-run [`Model`].
    ///
    /// # Errors
    ///
    /// Any setup problem: invalid configuration, an empty network, no homes
    /// or workplaces, or a malformed schedule.
    pub fn build(self) -> SimResult<Model<B, R>> {
        let config = self.config;
        config.validate()?;
        let schedules = match self.schedules {
            Some(s) => s,
            None => Schedules::standard()?,
        };
        let world = World::new(self.walk, self.drive, self.buildings)?;
        let sim_config = config.sim_config();

        let mut sensors = SensorRegistry::default();
        for &p in &config.sensors {
            if sensors.place(p, world.network(TravelMode::Car)).is_none() {
                warn!("no sensor placed at {p}: no road nearby or road already watched");
            }
        }

        let category_weights = config.category_weights();
        let router = &self.router;
        let (mut population, rngs) = PopulationBuilder::new(config.num_agents, config.seed)
            .build_with(|id, rng| -> SimResult<Evacuee> {
                let spec = &config.categories[rng.choose_weighted(&category_weights).unwrap_or(0)];
                let category = spec.category;
                let mode = if draws_car(config.car_use_pc, rng) { TravelMode::Car } else { TravelMode::Walk };
                let own = assign_buildings(&world, category, rng)?;
                let mut agent = Evacuee::new(
                    id,
                    category,
                    config.behaviour_mix.sample(rng),
                    mode,
                    spec.walking_speed(),
                    own[0],
                    own[1],
                    own[2],
                    response_delay_secs(config.mean_response_delay_mins, rng),
                );
                place(&mut agent, &world, &schedules, router, &config, rng)?;
                Ok(agent)
            })?;

        let mut occupancy = Occupancy::default();
        for agent in population.iter_mut() {
            let Some(route) = &agent.route else { continue };
            let Some(edge) = route.current_edge() else { continue };
            let net = world.network(agent.mode);
            occupancy.update(EdgeKey::of(net, edge, agent.mode), agent.id, route.distance_along_edge);
            agent.last_reported_way = Some(net.edge_way[edge.index()]);
        }

        info!(
            "model built: {} agents ({} in transit), walk network {} nodes, drive network {} nodes, {} buildings",
            population.len(),
            occupancy.len(),
            world.network(TravelMode::Walk).node_count(),
            world.network(TravelMode::Car).node_count(),
            world.buildings().len(),
        );

        let hazard = Hazard {
            location: config.hazard_location,
            radius_m: config.zone_radius_m,
            start:    config.hazard_start,
        };
        let activation_rng = SimRng::new(config.seed).child(ACTIVATION_STREAM);

        Ok(Model::new(
            sim_config,
            world,
            occupancy,
            sensors,
            population,
            rngs,
            schedules,
            self.behavior,
            self.router,
            hazard,
            config.snapshot_interval,
            activation_rng,
        ))
    }
}

/// Home, work and school for a new agent.  Adults have no school of their
/// own; their workplace stands in.
fn assign_buildings(world: &World, category: Category, rng: &mut AgentRng) -> SimResult<[BuildingId; 3]> {
    let pick = |kind, rng: &mut AgentRng| {
        world
            .random_building(kind, rng)
            .ok_or(SimError::EmptyBuildingCategory(kind))
    };
    let home = pick(BuildingKind::Home, rng)?;
    let work = pick(BuildingKind::Work, rng)?;
    let school = match category {
        Category::Child => pick(BuildingKind::School, rng)?,
        Category::WorkingAdult | Category::RetiredAdult => work,
    };
    Ok([home, work, school])
}

/// Fast-forward the agent's schedule to the simulation start.
fn place<R: Router>(
    agent:     &mut Evacuee,
    world:     &World,
    schedules: &Schedules,
    router:    &R,
    config:    &ScenarioConfig,
    rng:       &mut AgentRng,
) -> SimResult<()> {
    let mode = agent.mode;
    let travel = Travel {
        network:      world.network(mode),
        router,
        speed_mps:    match mode {
            TravelMode::Walk => agent.walking_speed_mps,
            TravelMode::Car  => VEHICLE_SPEED_CAP_MPS,
        },
        obeys_limits: mode == TravelMode::Car,
    };
    let own = [agent.home, agent.work, agent.school];
    let graph = schedules.for_category(agent.category);
    let state = initial_state(graph, config.simulation_start, &travel, rng, |kind, rng| {
        world.resolve(kind, own, rng).map(|b| world.locate(b, mode, rng))
    })?;

    agent.position = state.position();
    match state {
        InitialState::AtActivity { activity, leave_time, .. } => {
            agent.activity = Some(activity);
            agent.leave_time = leave_time;
            agent.status = Status::Parked;
        }
        InitialState::InTransit { activity, destination, route, route_index, distance_along_edge, .. } => {
            let progress = RouteProgress::resume(route, NetworkKind::Full, route_index, distance_along_edge);
            agent.depart(
                progress,
                Destination::Activity { activity, building: destination.building },
                Status::Travelling,
            );
        }
    }
    Ok(())
}
