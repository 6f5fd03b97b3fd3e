//! Robot factory
//!
//! Maps a robot-type identifier to one of a fixed set of parameterized
//! vehicle models.

use std::f64::consts::PI;
use std::sync::Arc;

use crate::common::{RealVectorBounds, RoboticsError, RoboticsResult};
use crate::kinodynamics::car_first_order::{FirstOrderCarConfig, RobotCarFirstOrder};
use crate::kinodynamics::car_second_order::{RobotCarSecondOrder, SecondOrderCarConfig};
use crate::kinodynamics::car_with_trailers::{CarWithTrailersConfig, RobotCarFirstOrderWithTrailers};
use crate::kinodynamics::integrator::{EulerIntegrator, IntegratorConfig};
use crate::kinodynamics::robot::Robot;

/// Every identifier understood by [`create_robot`]
pub const ROBOT_TYPES: &[&str] = &[
    "car_first_order_0",
    "car_second_order_0",
    "car_first_order_with_0_trailers_0",
    "car_first_order_with_1_trailers_0",
    "car_first_order_with_2_trailers_0",
];

fn trailer_config(hitch_lengths: Vec<f64>) -> CarWithTrailersConfig {
    CarWithTrailersConfig {
        v_limit: 0.5,
        phi_limit: PI / 3.0,
        wheelbase: 0.4,
        hitch_lengths,
    }
}

/// Build the robot named `robot_type` with the default integrator
/// (dt = 0.1 s, final partial step dropped).
pub fn create_robot(robot_type: &str, position_bounds: &RealVectorBounds) -> RoboticsResult<Arc<dyn Robot>> {
    create_robot_with_integrator(robot_type, position_bounds, IntegratorConfig::default())
}

/// Build the robot named `robot_type`, integrating with `integrator`.
///
/// Fails with [`RoboticsError::UnknownRobotType`] for an unrecognized
/// identifier and with [`RoboticsError::InvalidParameter`] for bounds that
/// are not planar or an invalid integration step.
pub fn create_robot_with_integrator(
    robot_type: &str,
    position_bounds: &RealVectorBounds,
    integrator: IntegratorConfig,
) -> RoboticsResult<Arc<dyn Robot>> {
    let integrator = EulerIntegrator::new(integrator)?;
    let bounds = position_bounds.clone();

    let robot: Arc<dyn Robot> = match robot_type {
        "car_first_order_0" => Arc::new(
            RobotCarFirstOrder::new(
                bounds,
                FirstOrderCarConfig {
                    v_limit: 0.5,
                    w_limit: 0.5,
                },
            )?
            .with_integrator(integrator)
            .with_name(robot_type),
        ),
        "car_second_order_0" => Arc::new(
            RobotCarSecondOrder::new(
                bounds,
                SecondOrderCarConfig {
                    v_limit: 0.5,
                    w_limit: 0.5,
                    a_limit: 2.0,
                    w_dot_limit: 2.0,
                },
            )?
            .with_integrator(integrator)
            .with_name(robot_type),
        ),
        "car_first_order_with_0_trailers_0" => Arc::new(
            RobotCarFirstOrderWithTrailers::new(bounds, trailer_config(vec![]))?
                .with_integrator(integrator)
                .with_name(robot_type),
        ),
        "car_first_order_with_1_trailers_0" => Arc::new(
            RobotCarFirstOrderWithTrailers::new(bounds, trailer_config(vec![0.5]))?
                .with_integrator(integrator)
                .with_name(robot_type),
        ),
        "car_first_order_with_2_trailers_0" => Arc::new(
            RobotCarFirstOrderWithTrailers::new(bounds, trailer_config(vec![0.5, 0.5]))?
                .with_integrator(integrator)
                .with_name(robot_type),
        ),
        _ => {
            return Err(RoboticsError::UnknownRobotType {
                requested: robot_type.to_string(),
                known: ROBOT_TYPES.to_vec(),
            })
        }
    };

    log::debug!(
        "created robot '{}' with {} part(s), dt = {}",
        robot.name(),
        robot.num_parts(),
        integrator.config().dt
    );
    Ok(robot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinodynamics::state::{StateKind, VehicleState};
    use crate::kinodynamics::state_space::Control;

    fn bounds() -> RealVectorBounds {
        RealVectorBounds::planar(-2.0, 2.0, -2.0, 2.0).unwrap()
    }

    #[test]
    fn test_creates_every_known_type() {
        for &name in ROBOT_TYPES {
            let robot = create_robot(name, &bounds()).unwrap();
            assert_eq!(robot.name(), name);
            assert_eq!(robot.state_space().position_bounds(), &bounds());
        }
    }

    #[test]
    fn test_part_counts_and_kinds() {
        let expected = [
            ("car_first_order_0", 1, StateKind::FirstOrderCar),
            ("car_second_order_0", 1, StateKind::SecondOrderCar),
            ("car_first_order_with_0_trailers_0", 1, StateKind::CarWithTrailers),
            ("car_first_order_with_1_trailers_0", 2, StateKind::CarWithTrailers),
            ("car_first_order_with_2_trailers_0", 3, StateKind::CarWithTrailers),
        ];
        for &(name, parts, kind) in &expected {
            let robot = create_robot(name, &bounds()).unwrap();
            assert_eq!(robot.num_parts(), parts, "{}", name);
            assert_eq!(robot.state_space().kind(), kind, "{}", name);
            assert_eq!(robot.alloc_state().kind(), kind, "{}", name);
        }
    }

    #[test]
    fn test_fixed_control_limits() {
        let robot = create_robot("car_first_order_with_1_trailers_0", &bounds()).unwrap();
        let high = robot.control_space().bounds().high();
        assert_eq!(high[0], 0.5);
        assert!((high[1] - PI / 3.0).abs() < 1e-12);

        let robot = create_robot("car_second_order_0", &bounds()).unwrap();
        assert_eq!(robot.control_space().bounds().high(), &[2.0, 2.0]);
    }

    #[test]
    fn test_rejects_unknown_type() {
        let err = create_robot("not_a_robot", &bounds()).err().unwrap();
        match &err {
            RoboticsError::UnknownRobotType { requested, known } => {
                assert_eq!(requested, "not_a_robot");
                assert_eq!(known.len(), ROBOT_TYPES.len());
            }
            other => panic!("unexpected error: {}", other),
        }
        assert!(err.to_string().contains("car_first_order_0"));
    }

    #[test]
    fn test_rejects_non_planar_bounds() {
        let bounds = RealVectorBounds::symmetric(3, 1.0).unwrap();
        assert!(matches!(
            create_robot("car_first_order_0", &bounds),
            Err(RoboticsError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_random_rollouts_keep_invariants() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(42);
        for &name in ROBOT_TYPES {
            let robot = create_robot(name, &bounds()).unwrap();
            let mut state = robot.alloc_state();
            let mut next = robot.alloc_state();
            for _ in 0..50 {
                let u = robot.control_space().sample_uniform(&mut rng);
                robot.propagate(&state, &u, 0.0, &mut next);
                assert_eq!(next, state, "{}", name);

                let duration = rng.gen_range(0.0..2.0);
                robot.propagate(&state, &u, duration, &mut next);
                let headings = match &next {
                    VehicleState::CarWithTrailers(s) => s.headings().to_vec(),
                    other => vec![other.yaw()],
                };
                for t in headings {
                    assert!(t > -PI && t <= PI, "{}: heading {}", name, t);
                }
                std::mem::swap(&mut state, &mut next);
            }
        }
    }

    #[test]
    fn test_custom_integrator_is_used() {
        let config = IntegratorConfig {
            dt: 0.05,
            ..Default::default()
        };
        let robot = create_robot_with_integrator("car_first_order_0", &bounds(), config).unwrap();
        let start = robot.alloc_state();
        let mut result = robot.alloc_state();
        robot.propagate(&start, &Control::new(0.5, 0.0), 0.05, &mut result);
        assert!((result.x() - 0.025).abs() < 1e-12);

        let bad = IntegratorConfig {
            dt: -0.1,
            ..Default::default()
        };
        assert!(create_robot_with_integrator("car_first_order_0", &bounds(), bad).is_err());
    }
}
