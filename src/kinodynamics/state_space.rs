//! State and control spaces
//!
//! A `StateSpace` knows the shape of one robot's states together with the
//! bounds they are checked against; a `ControlSpace` holds the control bounds.
//! Both are built once with the robot and never change afterwards.

use std::f64::consts::PI;

use nalgebra::Vector2;
use rand::Rng;

use crate::common::{angle_distance, RealVectorBounds, RoboticsError, RoboticsResult};
use crate::kinodynamics::state::{
    state_mismatch, CarState, SecondOrderCarState, StateKind, TrailerState, VehicleState,
};

/// Control input: (v, w), (a, w_dot) or (v, phi) depending on the model
pub type Control = Vector2<f64>;

/// Weight of the Euclidean position distance in [`StateSpace::distance`]
pub const POSITION_WEIGHT: f64 = 1.0;
/// Weight of each heading distance
pub const HEADING_WEIGHT: f64 = 0.5;
/// Weight of the linear velocity distance
pub const VELOCITY_WEIGHT: f64 = 0.25;
/// Weight of the angular velocity distance
pub const ANGULAR_VELOCITY_WEIGHT: f64 = 0.25;
/// Number of grid cells per projected dimension
pub const PROJECTION_DIMENSION_SPLITS: f64 = 20.0;

#[derive(Debug, Clone, PartialEq)]
enum Layout {
    FirstOrderCar,
    SecondOrderCar {
        velocity: RealVectorBounds,
        angular_velocity: RealVectorBounds,
    },
    CarWithTrailers {
        num_trailers: usize,
    },
}

/// Shape and bounds of one robot's states
#[derive(Debug, Clone, PartialEq)]
pub struct StateSpace {
    position: RealVectorBounds,
    layout: Layout,
}

fn check_planar(bounds: &RealVectorBounds, what: &str) -> RoboticsResult<()> {
    if bounds.dimension() != 2 {
        return Err(RoboticsError::InvalidParameter(format!(
            "{} bounds must be 2-dimensional, got {}",
            what,
            bounds.dimension()
        )));
    }
    Ok(())
}

fn check_scalar(bounds: &RealVectorBounds, what: &str) -> RoboticsResult<()> {
    if bounds.dimension() != 1 {
        return Err(RoboticsError::InvalidParameter(format!(
            "{} bounds must be 1-dimensional, got {}",
            what,
            bounds.dimension()
        )));
    }
    Ok(())
}

impl StateSpace {
    /// (x, y, theta)
    pub fn first_order_car(position: RealVectorBounds) -> RoboticsResult<Self> {
        check_planar(&position, "position")?;
        Ok(Self {
            position,
            layout: Layout::FirstOrderCar,
        })
    }

    /// (x, y, theta, v, w)
    pub fn second_order_car(
        position: RealVectorBounds,
        velocity: RealVectorBounds,
        angular_velocity: RealVectorBounds,
    ) -> RoboticsResult<Self> {
        check_planar(&position, "position")?;
        check_scalar(&velocity, "velocity")?;
        check_scalar(&angular_velocity, "angular velocity")?;
        Ok(Self {
            position,
            layout: Layout::SecondOrderCar {
                velocity,
                angular_velocity,
            },
        })
    }

    /// (x, y, theta_0, ..., theta_n)
    pub fn car_with_trailers(position: RealVectorBounds, num_trailers: usize) -> RoboticsResult<Self> {
        check_planar(&position, "position")?;
        Ok(Self {
            position,
            layout: Layout::CarWithTrailers { num_trailers },
        })
    }

    pub fn kind(&self) -> StateKind {
        match self.layout {
            Layout::FirstOrderCar => StateKind::FirstOrderCar,
            Layout::SecondOrderCar { .. } => StateKind::SecondOrderCar,
            Layout::CarWithTrailers { .. } => StateKind::CarWithTrailers,
        }
    }

    pub fn position_bounds(&self) -> &RealVectorBounds {
        &self.position
    }

    pub fn velocity_bounds(&self) -> Option<&RealVectorBounds> {
        match &self.layout {
            Layout::SecondOrderCar { velocity, .. } => Some(velocity),
            _ => None,
        }
    }

    pub fn angular_velocity_bounds(&self) -> Option<&RealVectorBounds> {
        match &self.layout {
            Layout::SecondOrderCar {
                angular_velocity, ..
            } => Some(angular_velocity),
            _ => None,
        }
    }

    /// Number of trailer headings carried by states of this space
    pub fn num_trailers(&self) -> usize {
        match self.layout {
            Layout::CarWithTrailers { num_trailers } => num_trailers,
            _ => 0,
        }
    }

    /// A zeroed state of the right shape, to be used as a propagation buffer
    pub fn alloc_state(&self) -> VehicleState {
        match self.layout {
            Layout::FirstOrderCar => CarState::new(0.0, 0.0, 0.0).into(),
            Layout::SecondOrderCar { .. } => SecondOrderCarState::new(0.0, 0.0, 0.0, 0.0, 0.0).into(),
            Layout::CarWithTrailers { num_trailers } => TrailerState::zeroed(num_trailers).into(),
        }
    }

    /// # Panics
    /// If `state` is not of this space's kind, or carries a different number
    /// of trailers.
    pub fn check_shape(&self, state: &VehicleState) {
        if state.kind() != self.kind() {
            state_mismatch(self.kind(), state);
        }
        if let VehicleState::CarWithTrailers(s) = state {
            assert_eq!(
                s.num_trailers(),
                self.num_trailers(),
                "trailer count mismatch: robot has {} trailers, state has {}",
                self.num_trailers(),
                s.num_trailers()
            );
        }
    }

    /// Pure numeric bounds check: position, headings and (second order)
    /// velocities.
    pub fn satisfies_bounds(&self, state: &VehicleState) -> bool {
        self.check_shape(state);
        if !self.position.contains(&[state.x(), state.y()]) {
            return false;
        }
        let heading_ok = |t: f64| t >= -PI && t <= PI;
        match (state, &self.layout) {
            (VehicleState::FirstOrderCar(s), _) => heading_ok(s.theta()),
            (
                VehicleState::SecondOrderCar(s),
                Layout::SecondOrderCar {
                    velocity,
                    angular_velocity,
                },
            ) => {
                heading_ok(s.theta())
                    && velocity.contains_value(0, s.v)
                    && angular_velocity.contains_value(0, s.w)
            }
            (VehicleState::CarWithTrailers(s), _) => s.headings().iter().all(|&t| heading_ok(t)),
            (other, _) => state_mismatch(self.kind(), other),
        }
    }

    /// Clamp position and velocities into their bounds. Headings need no
    /// work, they are wrapped on every write.
    pub fn enforce_bounds(&self, state: &mut VehicleState) {
        self.check_shape(state);
        let x = self.position.clamp(0, state.x());
        let y = self.position.clamp(1, state.y());
        state.set_position(x, y);
        if let (
            VehicleState::SecondOrderCar(s),
            Layout::SecondOrderCar {
                velocity,
                angular_velocity,
            },
        ) = (state, &self.layout)
        {
            s.v = velocity.clamp(0, s.v);
            s.w = angular_velocity.clamp(0, s.w);
        }
    }

    /// Weighted sum of component distances: Euclidean position, shortest-arc
    /// headings and absolute velocity differences.
    pub fn distance(&self, a: &VehicleState, b: &VehicleState) -> f64 {
        self.check_shape(a);
        self.check_shape(b);
        let position = ((a.x() - b.x()).powi(2) + (a.y() - b.y()).powi(2)).sqrt();
        let rest = match (a, b) {
            (VehicleState::FirstOrderCar(sa), VehicleState::FirstOrderCar(sb)) => {
                HEADING_WEIGHT * angle_distance(sa.theta(), sb.theta())
            }
            (VehicleState::SecondOrderCar(sa), VehicleState::SecondOrderCar(sb)) => {
                HEADING_WEIGHT * angle_distance(sa.theta(), sb.theta())
                    + VELOCITY_WEIGHT * (sa.v - sb.v).abs()
                    + ANGULAR_VELOCITY_WEIGHT * (sa.w - sb.w).abs()
            }
            (VehicleState::CarWithTrailers(sa), VehicleState::CarWithTrailers(sb)) => sa
                .headings()
                .iter()
                .zip(sb.headings())
                .map(|(ta, tb)| HEADING_WEIGHT * angle_distance(*ta, *tb))
                .sum(),
            (_, other) => state_mismatch(self.kind(), other),
        };
        POSITION_WEIGHT * position + rest
    }

    /// Default 2-D projection: the tractor position
    pub fn project(&self, state: &VehicleState) -> Vector2<f64> {
        Vector2::new(state.x(), state.y())
    }

    /// Cell sizes of the default projection grid
    pub fn default_cell_sizes(&self) -> Vector2<f64> {
        let extents = self.position.extents();
        Vector2::new(
            extents[0] / PROJECTION_DIMENSION_SPLITS,
            extents[1] / PROJECTION_DIMENSION_SPLITS,
        )
    }
}

/// Bounds of a robot's 2-channel control input
#[derive(Debug, Clone, PartialEq)]
pub struct ControlSpace {
    bounds: RealVectorBounds,
}

impl ControlSpace {
    pub fn new(bounds: RealVectorBounds) -> RoboticsResult<Self> {
        if bounds.dimension() != 2 {
            return Err(RoboticsError::InvalidParameter(format!(
                "control bounds must be 2-dimensional, got {}",
                bounds.dimension()
            )));
        }
        Ok(Self { bounds })
    }

    /// Channel 0 in [-limit0, limit0], channel 1 in [-limit1, limit1]
    pub fn symmetric(limit0: f64, limit1: f64) -> RoboticsResult<Self> {
        Self::new(RealVectorBounds::new(vec![-limit0, -limit1], vec![limit0, limit1])?)
    }

    pub fn bounds(&self) -> &RealVectorBounds {
        &self.bounds
    }

    pub fn contains(&self, control: &Control) -> bool {
        self.bounds.contains(control.as_slice())
    }

    /// Uniform sample inside the bounds
    pub fn sample_uniform<R: Rng + ?Sized>(&self, rng: &mut R) -> Control {
        let lo = self.bounds.low();
        let hi = self.bounds.high();
        Control::new(rng.gen_range(lo[0]..=hi[0]), rng.gen_range(lo[1]..=hi[1]))
    }
}
