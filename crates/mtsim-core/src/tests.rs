//! Unit tests for mtsim-core primitives.

#[cfg(test)]
mod ids {
    use crate::{ActorId, LaneId, RoadId};

    #[test]
    fn index_roundtrip() {
        let id = LaneId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(LaneId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(LaneId(0) < LaneId(1));
        assert!(RoadId(100) > RoadId(99));
    }

    #[test]
    fn invalid_sentinels() {
        assert!(!ActorId::INVALID.is_valid());
        assert!(LaneId(0).is_valid());
    }

    #[test]
    fn display() {
        assert_eq!(LaneId(7).to_string(), "LaneId(7)");
    }
}

#[cfg(test)]
mod geo {
    use crate::{angle_diff, normalize_angle, unit_vector, OrientedBox, Point2};
    use std::f64::consts::{PI, TAU};

    #[test]
    fn distance_is_euclidean() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(3.0, 4.0);
        assert!((a.distance(b) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn normalize_wraps_negative() {
        assert!((normalize_angle(-0.1) - (TAU - 0.1)).abs() < 1e-9);
        assert!((normalize_angle(TAU + 0.2) - 0.2).abs() < 1e-9);
    }

    #[test]
    fn angle_diff_shortest_path() {
        // Crossing the 0/TAU boundary should give a small signed delta, not
        // a near-TAU one.
        let d = angle_diff(0.05, TAU - 0.05);
        assert!((d - 0.1).abs() < 1e-9, "got {d}");
    }

    #[test]
    fn angle_diff_bounded() {
        for i in 0..20 {
            let a = i as f64 * 0.37;
            let b = (i as f64 * 1.9) % TAU;
            let d = angle_diff(a, b);
            assert!(d > -PI - 1e-9 && d <= PI + 1e-9);
        }
    }

    #[test]
    fn unit_vector_length_one() {
        let v = unit_vector(1.23);
        assert!((v.length() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn disjoint_boxes_do_not_intersect() {
        let a = OrientedBox::new(Point2::new(0.0, 0.0), 0.0, 4.0, 2.0);
        let b = OrientedBox::new(Point2::new(20.0, 0.0), 0.0, 4.0, 2.0);
        assert!(!a.intersects(&b));
    }

    #[test]
    fn overlapping_boxes_intersect() {
        let a = OrientedBox::new(Point2::new(0.0, 0.0), 0.0, 4.0, 2.0);
        let b = OrientedBox::new(Point2::new(1.0, 0.0), 0.0, 4.0, 2.0);
        assert!(a.intersects(&b));
    }

    #[test]
    fn rotated_box_self_intersects() {
        let a = OrientedBox::new(Point2::new(0.0, 0.0), PI / 4.0, 4.0, 2.0);
        assert!(a.intersects(&a));
    }
}

#[cfg(test)]
mod rng {
    use crate::{ActorId, ActorRng};

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = ActorRng::new(12345, ActorId(0));
        let mut r2 = ActorRng::new(12345, ActorId(0));
        for _ in 0..100 {
            let a: f64 = r1.gen_range(0.0..1.0);
            let b: f64 = r2.gen_range(0.0..1.0);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn different_actors_differ() {
        let mut r0 = ActorRng::new(1, ActorId(0));
        let mut r1 = ActorRng::new(1, ActorId(1));
        let a: f64 = r0.gen_range(0.0..1.0);
        let b: f64 = r1.gen_range(0.0..1.0);
        assert_ne!(a, b, "seeds for adjacent actors should diverge");
    }

    #[test]
    fn gen_bool_extremes() {
        let mut rng = ActorRng::new(0, ActorId(0));
        assert!(!rng.gen_bool(0.0));
        assert!(rng.gen_bool(1.0));
    }

    #[test]
    fn speed_factor_floored() {
        let mut rng = ActorRng::new(0, ActorId(0));
        for _ in 0..1000 {
            assert!(rng.gen_speed_factor(1.0, 0.5) >= 0.1);
        }
    }
}

#[cfg(test)]
mod role {
    use crate::Role;

    #[test]
    fn default_is_social() {
        assert_eq!(Role::default(), Role::Social);
    }

    #[test]
    fn display() {
        assert_eq!(Role::EgoAgent.to_string(), "ego_agent");
    }
}
