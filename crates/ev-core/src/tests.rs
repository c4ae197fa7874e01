//! Unit tests for ev-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgentId, BuildingId, NodeId};

    #[test]
    fn index_and_try_from() {
        let id = AgentId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(AgentId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn default_is_invalid() {
        assert_eq!(NodeId::default(), NodeId::INVALID);
        assert!(!BuildingId::default().is_valid());
        assert!(BuildingId(0).is_valid());
    }

    #[test]
    fn display() {
        assert_eq!(AgentId(7).to_string(), "AgentId(7)");
    }
}

#[cfg(test)]
mod geo {
    use crate::Point;

    #[test]
    fn pythagorean_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(a.distance_sq(b), 25.0);
    }

    #[test]
    fn lerp_endpoints_and_midpoint() {
        let a = Point::new(400_000.0, 100_000.0);
        let b = Point::new(400_100.0, 100_000.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.25), Point::new(400_025.0, 100_000.0));
    }
}

#[cfg(test)]
mod time {
    use crate::{SimClock, SimConfig, Tick, TimeOfDay};

    #[test]
    fn parse_and_display() {
        assert_eq!(TimeOfDay::parse("07:30").unwrap(), TimeOfDay::hm(7, 30));
        assert_eq!(TimeOfDay::parse("13:05:09").unwrap().secs(), 47_109.0);
        assert_eq!(TimeOfDay::hm(8, 0).to_string(), "08:00");
        assert_eq!(TimeOfDay::hms(8, 0, 5).to_string(), "08:00:05");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(TimeOfDay::parse("8").is_err());
        assert!(TimeOfDay::parse("08:75").is_err());
        assert!(TimeOfDay::parse("aa:00").is_err());
        assert!(TimeOfDay::parse("08:00:00:00").is_err());
    }

    #[test]
    fn clock_advances_in_ten_second_steps() {
        let cfg = SimConfig { start: TimeOfDay::hm(8, 0), ..SimConfig::default() };
        let mut clock = cfg.make_clock();
        assert_eq!(clock.now(), TimeOfDay::hm(8, 0));
        clock.advance();
        clock.advance();
        assert_eq!(clock.current_tick, Tick(2));
        assert_eq!(clock.now(), TimeOfDay::hms(8, 0, 20));
        assert_eq!(clock.tick_secs(), 10.0);
    }

    #[test]
    fn since_is_signed() {
        let a = TimeOfDay::hm(10, 0);
        let b = TimeOfDay::hm(9, 30);
        assert_eq!(a.since(b), 1_800.0);
        assert_eq!(b.since(a), -1_800.0);
        let clock = SimClock::new(a, 10);
        assert_eq!(clock.elapsed_secs(), 0.0);
    }

    #[test]
    fn tick_multiples() {
        assert!(Tick(20).is_multiple_of(10));
        assert!(!Tick(21).is_multiple_of(10));
        assert!(!Tick(5).is_multiple_of(0));
    }
}

#[cfg(test)]
mod rng {
    use crate::{AgentId, AgentRng, SimRng};

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = AgentRng::new(12345, AgentId(3));
        let mut r2 = AgentRng::new(12345, AgentId(3));
        for _ in 0..100 {
            assert_eq!(r1.gen_range(0u32..1_000), r2.gen_range(0u32..1_000));
        }
    }

    #[test]
    fn normal_with_zero_deviation_is_mean() {
        let mut rng = AgentRng::new(0, AgentId(0));
        assert_eq!(rng.normal(600.0, 0.0), 600.0);
        assert_eq!(rng.normal(600.0, -1.0), 600.0);
    }

    #[test]
    fn weighted_choice_respects_zero_weights() {
        let mut rng = SimRng::new(9);
        for _ in 0..200 {
            assert_eq!(rng.choose_weighted(&[0.0, 3.0, 0.0]), Some(1));
        }
        assert_eq!(rng.choose_weighted(&[]), None);
        assert_eq!(rng.choose_weighted(&[0.0, 0.0]), None);
    }

    #[test]
    fn gen_bool_extremes() {
        let mut rng = AgentRng::new(0, AgentId(0));
        assert!(!rng.gen_bool(0.0));
        assert!(rng.gen_bool(1.0));
        assert!(rng.gen_bool(7.0));
    }
}

#[cfg(test)]
mod transport {
    use crate::TravelMode;

    #[test]
    fn indices_are_dense() {
        let idx: Vec<usize> = TravelMode::ALL.iter().map(|m| m.index()).collect();
        assert_eq!(idx, vec![0, 1]);
        assert!(TravelMode::Car.is_vehicle());
        assert_eq!(TravelMode::Walk.to_string(), "walk");
    }
}
