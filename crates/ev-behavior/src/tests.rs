//! Unit tests for ev-behavior.

#[cfg(test)]
mod helpers {
    use ev_agent::{Behaviour, Category, Evacuee};
    use ev_core::{AgentId, BuildingId, Point, TravelMode};
    use ev_spatial::{Disk, EvacuationZone, RoadNetworkBuilder, RoadSpec};

    pub fn agent(behaviour: Behaviour, at: Point) -> Evacuee {
        let mut a = Evacuee::new(
            AgentId(0),
            Category::WorkingAdult,
            behaviour,
            TravelMode::Walk,
            1.4,
            BuildingId(0),
            BuildingId(1),
            BuildingId(1),
            60.0,
        );
        a.position = at;
        a
    }

    /// Zone of radius 500 m at the origin over a short two-node road.
    pub fn zone() -> EvacuationZone {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(Point::new(0.0, 0.0));
        let c = b.add_node(Point::new(1_000.0, 0.0));
        b.add_road(a, c, RoadSpec::way(1));
        let net = b.build().unwrap();
        EvacuationZone::declare(Disk::new(Point::new(0.0, 0.0), 500.0), [&net, &net])
    }
}

// ── Prepare decisions ─────────────────────────────────────────────────────────

#[cfg(test)]
mod prepare {
    use ev_agent::{Behaviour, Status};
    use ev_core::{Point, TimeOfDay, TravelMode};

    use crate::{BehaviorModel, EvacuationTarget, Intent, SimContext, StandardBehavior};

    const INSIDE: Point = Point::new(100.0, 0.0);
    const OUTSIDE: Point = Point::new(900.0, 0.0);

    fn ctx_at<'a>(zone: &'a ev_spatial::EvacuationZone, now: TimeOfDay) -> SimContext<'a> {
        SimContext::hazard(now, 10, zone, TimeOfDay::hm(9, 0))
    }

    #[test]
    fn waits_for_response_delay() {
        let zone = super::helpers::zone();
        let a = super::helpers::agent(Behaviour::Compliant, INSIDE);
        let model = StandardBehavior::default();
        // Delay is 60 s; 30 s in, still waiting (leave time 00:00 but flagged agents don't depart).
        let mut flagged = a.clone();
        flagged.flag_for_evacuation();
        assert_eq!(model.prepare(&flagged, &ctx_at(&zone, TimeOfDay::hms(9, 0, 30))), Intent::Stay);
        assert_eq!(
            model.prepare(&flagged, &ctx_at(&zone, TimeOfDay::hms(9, 1, 0))),
            Intent::Evacuate { target: EvacuationTarget::NearestExit, on_foot: true }
        );
    }

    #[test]
    fn familiar_heads_home() {
        let zone = super::helpers::zone();
        let a = super::helpers::agent(Behaviour::Familiar, INSIDE);
        let intent = StandardBehavior::default().prepare(&a, &ctx_at(&zone, TimeOfDay::hm(10, 0)));
        assert!(matches!(intent, Intent::Evacuate { target: EvacuationTarget::Home, .. }));
    }

    #[test]
    fn non_compliant_never_evacuates() {
        let zone = super::helpers::zone();
        let mut a = super::helpers::agent(Behaviour::NonCompliant, INSIDE);
        a.flag_for_evacuation();
        assert_eq!(StandardBehavior::default().prepare(&a, &ctx_at(&zone, TimeOfDay::hm(12, 0))), Intent::Stay);
    }

    #[test]
    fn outside_zone_follows_schedule() {
        let zone = super::helpers::zone();
        let mut a = super::helpers::agent(Behaviour::Compliant, OUTSIDE);
        a.leave_time = TimeOfDay::hm(9, 30);
        let model = StandardBehavior::default();
        assert_eq!(model.prepare(&a, &ctx_at(&zone, TimeOfDay::hm(9, 15))), Intent::Stay);
        assert_eq!(model.prepare(&a, &ctx_at(&zone, TimeOfDay::hm(9, 45))), Intent::Depart);
    }

    #[test]
    fn calm_day_departs_on_leave_time() {
        let mut a = super::helpers::agent(Behaviour::Compliant, INSIDE);
        a.leave_time = TimeOfDay::hm(8, 0);
        let model = StandardBehavior::default();
        assert_eq!(model.prepare(&a, &SimContext::calm(TimeOfDay::hm(7, 59), 10)), Intent::Stay);
        assert_eq!(model.prepare(&a, &SimContext::calm(TimeOfDay::hm(8, 1), 10)), Intent::Depart);
    }

    #[test]
    fn moving_agents_keep_their_car() {
        let zone = super::helpers::zone();
        let mut a = super::helpers::agent(Behaviour::Compliant, INSIDE);
        a.mode = TravelMode::Car;
        a.status = Status::Travelling;
        let intent = StandardBehavior::default().prepare(&a, &ctx_at(&zone, TimeOfDay::hm(10, 0)));
        assert_eq!(intent, Intent::Evacuate { target: EvacuationTarget::NearestExit, on_foot: false });
    }

    #[test]
    fn already_evacuating_is_left_alone() {
        let zone = super::helpers::zone();
        let mut a = super::helpers::agent(Behaviour::Compliant, INSIDE);
        a.status = Status::Evacuating;
        assert_eq!(StandardBehavior::default().prepare(&a, &ctx_at(&zone, TimeOfDay::hm(10, 0))), Intent::Stay);
    }

    #[test]
    fn stranded_and_sheltering_stay() {
        let zone = super::helpers::zone();
        let mut a = super::helpers::agent(Behaviour::Compliant, INSIDE);
        a.stranded = true;
        assert_eq!(StandardBehavior::default().prepare(&a, &ctx_at(&zone, TimeOfDay::hm(10, 0))), Intent::Stay);
    }
}

// ── Speed and diversion rules ─────────────────────────────────────────────────

#[cfg(test)]
mod rules {
    use ev_agent::Behaviour;
    use ev_core::{Point, TimeOfDay, TravelMode};

    use crate::{BehaviorModel, DiversionOption, SimContext, StandardBehavior, CURIOUS_SPEED_FACTOR};

    #[test]
    fn curious_pedestrians_slow_near_hazard() {
        let zone = super::helpers::zone();
        let ctx = SimContext::hazard(TimeOfDay::hm(10, 0), 10, &zone, TimeOfDay::hm(9, 0));
        let model = StandardBehavior::default();

        let near = super::helpers::agent(Behaviour::Curious, Point::new(150.0, 0.0));
        assert_eq!(model.speed_factor(&near, &ctx), CURIOUS_SPEED_FACTOR);

        let far = super::helpers::agent(Behaviour::Curious, Point::new(250.0, 0.0));
        assert_eq!(model.speed_factor(&far, &ctx), 1.0);

        let mut driving = near.clone();
        driving.mode = TravelMode::Car;
        assert_eq!(model.speed_factor(&driving, &ctx), 1.0);

        let calm = SimContext::calm(TimeOfDay::hm(10, 0), 10);
        assert_eq!(model.speed_factor(&near, &calm), 1.0);
    }

    #[test]
    fn diversion_order_and_exemption() {
        let model = StandardBehavior::default();
        let a = super::helpers::agent(Behaviour::Compliant, Point::new(0.0, 0.0));
        assert_eq!(
            model.diversion_plan(&a),
            &[DiversionOption::OriginalDestination, DiversionOption::Home, DiversionOption::RandomHome]
        );
        assert!(model.diverts_on_zone_entry(&a));
        let rebel = super::helpers::agent(Behaviour::NonCompliant, Point::new(0.0, 0.0));
        assert!(!model.diverts_on_zone_entry(&rebel));
    }
}

// ── Setup sampling ────────────────────────────────────────────────────────────

#[cfg(test)]
mod sampling {
    use ev_agent::Behaviour;
    use ev_core::{AgentId, AgentRng};

    use crate::{draws_car, response_delay_secs, BehaviourMix};

    #[test]
    fn mix_validation() {
        assert!(BehaviourMix::default().validate().is_ok());
        let zero = BehaviourMix { compliant: 0.0, ..BehaviourMix::default() };
        assert!(zero.validate().is_err());
        let negative = BehaviourMix { curious: -1.0, ..BehaviourMix::default() };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn single_class_mix() {
        let mut rng = AgentRng::new(1, AgentId(0));
        let mix = BehaviourMix::only(Behaviour::NonCompliant);
        assert!((0..100).all(|_| mix.sample(&mut rng) == Behaviour::NonCompliant));
    }

    #[test]
    fn mix_proportions() {
        let mut rng = AgentRng::new(2, AgentId(0));
        let mix = BehaviourMix { compliant: 1.0, non_compliant: 0.0, curious: 0.0, familiar: 3.0 };
        let familiar = (0..4_000).filter(|_| mix.sample(&mut rng) == Behaviour::Familiar).count();
        assert!((2_850..=3_150).contains(&familiar), "{familiar}");
    }

    #[test]
    fn response_delay_is_non_negative() {
        let mut rng = AgentRng::new(3, AgentId(0));
        assert_eq!(response_delay_secs(None, &mut rng), 0.0);
        for _ in 0..1_000 {
            assert!(response_delay_secs(Some(0.5), &mut rng) >= 0.0);
        }
        let mean: f64 = (0..2_000).map(|_| response_delay_secs(Some(30.0), &mut rng)).sum::<f64>() / 2_000.0;
        assert!((mean - 1_800.0).abs() < 20.0, "{mean}");
    }

    #[test]
    fn car_use_extremes() {
        let mut rng = AgentRng::new(4, AgentId(0));
        assert!((0..100).all(|_| !draws_car(0.0, &mut rng)));
        assert!((0..100).all(|_| draws_car(100.0, &mut rng)));
    }
}
