//! Second-order car
//!
//! Velocities are part of the state and the control drives their rates:
//!
//! ```text
//! x'     = v cos(theta)
//! y'     = v sin(theta)
//! theta' = w
//! v'     = a
//! w'     = w_dot
//! ```
//!
//! The model does not clamp v or w while integrating. The state space carries
//! velocity bounds, and checking them is left to the validity checker.

use nalgebra::Isometry3;

use crate::common::{RealVectorBounds, RoboticsResult};
use crate::kinodynamics::geometry::{planar_transform, ArticulatedGeometry};
use crate::kinodynamics::integrator::EulerIntegrator;
use crate::kinodynamics::robot::{check_part, Robot};
use crate::kinodynamics::state::{state_mismatch, SecondOrderCarState, StateKind, VehicleState};
use crate::kinodynamics::state_space::{Control, ControlSpace, StateSpace};

/// Configuration for the second-order car
#[derive(Debug, Clone)]
pub struct SecondOrderCarConfig {
    /// Maximum linear velocity [m/s]
    pub v_limit: f64,
    /// Maximum angular velocity [rad/s]
    pub w_limit: f64,
    /// Maximum linear acceleration [m/s^2]
    pub a_limit: f64,
    /// Maximum angular acceleration [rad/s^2]
    pub w_dot_limit: f64,
}

impl Default for SecondOrderCarConfig {
    fn default() -> Self {
        Self {
            v_limit: 0.5,
            w_limit: 0.5,
            a_limit: 2.0,
            w_dot_limit: 2.0,
        }
    }
}

/// Second-order car with a single box footprint
#[derive(Debug, Clone)]
pub struct RobotCarSecondOrder {
    name: String,
    space: StateSpace,
    controls: ControlSpace,
    geometry: ArticulatedGeometry,
    integrator: EulerIntegrator,
}

impl RobotCarSecondOrder {
    pub fn new(position_bounds: RealVectorBounds, config: SecondOrderCarConfig) -> RoboticsResult<Self> {
        let space = StateSpace::second_order_car(
            position_bounds,
            RealVectorBounds::symmetric(1, config.v_limit)?,
            RealVectorBounds::symmetric(1, config.w_limit)?,
        )?;
        Ok(Self {
            name: "car_second_order".to_string(),
            space,
            controls: ControlSpace::symmetric(config.a_limit, config.w_dot_limit)?,
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

    fn car_state<'a>(&self, state: &'a VehicleState) -> &'a SecondOrderCarState {
        state
            .as_second_order_car()
            .unwrap_or_else(|| state_mismatch(StateKind::SecondOrderCar, state))
    }
}

impl Robot for RobotCarSecondOrder {
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
        let (a, w_dot) = (control[0], control[1]);

        // [x, y, theta, v, w]
        let mut q = [s.x, s.y, s.theta(), s.v, s.w];
        self.integrator.integrate(duration, &mut q, |q, dt| {
            let (theta, v, w) = (q[2], q[3], q[4]);
            q[0] += v * theta.cos() * dt;
            q[1] += v * theta.sin() * dt;
            q[2] += w * dt;
            q[3] += a * dt;
            q[4] += w_dot * dt;
        });

        *result = SecondOrderCarState::new(q[0], q[1], q[2], q[3], q[4]).into();
    }

    fn get_transform(&self, state: &VehicleState, part: usize) -> Isometry3<f64> {
        check_part(self, part);
        let s = self.car_state(state);
        planar_transform(s.x, s.y, s.theta())
    }
}
