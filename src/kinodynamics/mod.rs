//! Kinodynamic vehicle models
//!
//! This module implements the vehicle models used by a sampling-based
//! kinodynamic planner: state records with heading normalization, fixed-step
//! forward simulation, the pose of every articulated part, and a state
//! validity predicate built on a collision environment.
//!
//! # Components
//!
//! - `state`, `state_space`: state records, state/control bounds and distances
//! - `integrator`: fixed-step Euler integration with a configurable remainder policy
//! - `geometry`: one collision box per articulated part
//! - `robot`: the `Robot` trait shared by all models
//! - `car_first_order`, `car_second_order`, `car_with_trailers`: the models
//! - `factory`: robot construction from a type identifier
//! - `validity`: bounds and collision checking
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use nalgebra::Vector3;
//! use kinodynamic_robots::common::RealVectorBounds;
//! use kinodynamic_robots::kinodynamics::{create_robot, Control, ObstacleEnvironment, StateValidityChecker};
//!
//! let bounds = RealVectorBounds::planar(-5.0, 5.0, -5.0, 5.0).unwrap();
//! let robot = create_robot("car_first_order_with_1_trailers_0", &bounds).unwrap();
//!
//! let mut env = ObstacleEnvironment::new();
//! env.add_box(2.0, 0.0, 0.0, Vector3::new(0.5, 0.5, 1.0));
//! let checker = StateValidityChecker::new(robot.clone(), Arc::new(env));
//!
//! let start = robot.alloc_state();
//! let mut next = robot.alloc_state();
//! robot.propagate(&start, &Control::new(0.5, 0.2), 1.0, &mut next);
//! let accepted = checker.is_valid(&next);
//! ```

pub mod state;
pub mod state_space;
pub mod integrator;
pub mod geometry;
pub mod robot;
pub mod car_first_order;
pub mod car_second_order;
pub mod car_with_trailers;
pub mod factory;
pub mod validity;

// Re-exports
pub use state::{CarState, SecondOrderCarState, StateKind, TrailerState, VehicleState};
pub use state_space::{Control, ControlSpace, StateSpace};
pub use integrator::{EulerIntegrator, IntegratorConfig, RemainderPolicy};
pub use geometry::{planar_transform, ArticulatedGeometry};
pub use robot::Robot;
pub use car_first_order::{FirstOrderCarConfig, RobotCarFirstOrder};
pub use car_second_order::{RobotCarSecondOrder, SecondOrderCarConfig};
pub use car_with_trailers::{CarWithTrailersConfig, RobotCarFirstOrderWithTrailers};
pub use factory::{create_robot, create_robot_with_integrator, ROBOT_TYPES};
pub use validity::{CollisionEnvironment, Obstacle, ObstacleEnvironment, StateValidityChecker};
