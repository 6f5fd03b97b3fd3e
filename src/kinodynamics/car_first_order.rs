//! First-order car
//!
//! Unicycle/bicycle model driven directly by velocity commands:
//!
//! ```text
//! x'     = v cos(theta)
//! y'     = v sin(theta)
//! theta' = w
//! ```
//!
//! with control (v, w) bounded by (+-v_limit, +-w_limit).

use nalgebra::Isometry3;

use crate::common::{RealVectorBounds, RoboticsResult};
use crate::kinodynamics::geometry::{planar_transform, ArticulatedGeometry};
use crate::kinodynamics::integrator::EulerIntegrator;
use crate::kinodynamics::robot::{check_part, Robot};
use crate::kinodynamics::state::{state_mismatch, CarState, StateKind, VehicleState};
use crate::kinodynamics::state_space::{Control, ControlSpace, StateSpace};

/// Configuration for the first-order car
#[derive(Debug, Clone)]
pub struct FirstOrderCarConfig {
    /// Maximum linear velocity [m/s]
    pub v_limit: f64,
    /// Maximum angular velocity [rad/s]
    pub w_limit: f64,
}

impl Default for FirstOrderCarConfig {
    fn default() -> Self {
        Self {
            v_limit: 0.5,
            w_limit: 0.5,
        }
    }
}

/// First-order car with a single box footprint
#[derive(Debug, Clone)]
pub struct RobotCarFirstOrder {
    name: String,
    space: StateSpace,
    controls: ControlSpace,
    geometry: ArticulatedGeometry,
    integrator: EulerIntegrator,
}

impl RobotCarFirstOrder {
    pub fn new(position_bounds: RealVectorBounds, config: FirstOrderCarConfig) -> RoboticsResult<Self> {
        Ok(Self {
            name: "car_first_order".to_string(),
            space: StateSpace::first_order_car(position_bounds)?,
            controls: ControlSpace::symmetric(config.v_limit, config.w_limit)?,
            geometry: ArticulatedGeometry::car(),
            integrator: EulerIntegrator::with_defaults(),
        })
    }

    pub fn with_integrator(mut self, integrator: EulerIntegrator) -> Self {
        self.integrator = integrator;
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    fn car_state<'a>(&self, state: &'a VehicleState) -> &'a CarState {
        state
            .as_first_order_car()
            .unwrap_or_else(|| state_mismatch(StateKind::FirstOrderCar, state))
    }
}

impl Robot for RobotCarFirstOrder {
    fn name(&self) -> &str {
        &self.name
    }

    fn state_space(&self) -> &StateSpace {
        &self.space
    }

    fn control_space(&self) -> &ControlSpace {
        &self.controls
    }

    fn geometry(&self) -> &ArticulatedGeometry {
        &self.geometry
    }

    fn propagate(&self, start: &VehicleState, control: &Control, duration: f64, result: &mut VehicleState) {
        let s = self.car_state(start);
        let (v, w) = (control[0], control[1]);

        let mut q = [s.x, s.y, s.theta()];
        self.integrator.integrate(duration, &mut q, |q, dt| {
            q[0] += v * q[2].cos() * dt;
            q[1] += v * q[2].sin() * dt;
            q[2] += w * dt;
        });

        *result = CarState::new(q[0], q[1], q[2]).into();
    }

    fn get_transform(&self, state: &VehicleState, part: usize) -> Isometry3<f64> {
        check_part(self, part);
        let s = self.car_state(state);
        planar_transform(s.x, s.y, s.theta())
    }
}
