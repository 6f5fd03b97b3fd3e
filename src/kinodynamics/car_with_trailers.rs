//! First-order car towing a chain of trailers
//!
//! Tractor kinematics follow the bicycle model with wheelbase L and steering
//! angle phi. Trailer i (1-based) is hitched behind body i-1 at distance
//! `hitch_lengths[i-1]` and turns according to
//!
//! ```text
//! theta_i' = v / hitch_lengths[i-1]
//!            * prod_{j=1}^{i-1} cos(theta_{j-1} - theta_j)
//!            * sin(theta_{i-1} - theta_i)
//! ```
//!
//! Ref:
//!     - S. M. LaValle, "Planning Algorithms", section 13.1.2.4 (trailers)

use itertools::Itertools;
use nalgebra::{Isometry3, Vector2};

use crate::common::{RealVectorBounds, RoboticsError, RoboticsResult};
use crate::kinodynamics::geometry::{planar_transform, ArticulatedGeometry};
use crate::kinodynamics::integrator::EulerIntegrator;
use crate::kinodynamics::robot::{check_part, Robot};
use crate::kinodynamics::state::{state_mismatch, StateKind, TrailerState, VehicleState};
use crate::kinodynamics::state_space::{Control, ControlSpace, StateSpace};

/// Configuration for the car with trailers
#[derive(Debug, Clone)]
pub struct CarWithTrailersConfig {
    /// Maximum tractor speed [m/s]
    pub v_limit: f64,
    /// Maximum steering angle [rad]
    pub phi_limit: f64,
    /// Tractor wheelbase [m]
    pub wheelbase: f64,
    /// Hitch length of every trailer, front to back [m]
    pub hitch_lengths: Vec<f64>,
}

impl Default for CarWithTrailersConfig {
    fn default() -> Self {
        Self {
            v_limit: 0.5,
            phi_limit: std::f64::consts::PI / 3.0,
            wheelbase: 0.4,
            hitch_lengths: vec![0.5],
        }
    }
}

/// Tractor-trailer rig; one box part for the tractor and one per trailer
#[derive(Debug, Clone)]
pub struct RobotCarFirstOrderWithTrailers {
    name: String,
    space: StateSpace,
    controls: ControlSpace,
    geometry: ArticulatedGeometry,
    integrator: EulerIntegrator,
    wheelbase: f64,
    hitch_lengths: Vec<f64>,
}

impl RobotCarFirstOrderWithTrailers {
    pub fn new(position_bounds: RealVectorBounds, config: CarWithTrailersConfig) -> RoboticsResult<Self> {
        if !(config.wheelbase > 0.0) {
            return Err(RoboticsError::InvalidParameter(format!(
                "wheelbase must be positive, got {}",
                config.wheelbase
            )));
        }
        if let Some((i, h)) = config.hitch_lengths.iter().find_position(|h| !(**h > 0.0)) {
            return Err(RoboticsError::InvalidParameter(format!(
                "hitch length of trailer {} must be positive, got {}",
                i + 1,
                h
            )));
        }
        let num_trailers = config.hitch_lengths.len();
        Ok(Self {
            name: format!("car_first_order_with_{}_trailers", num_trailers),
            space: StateSpace::car_with_trailers(position_bounds, num_trailers)?,
            controls: ControlSpace::symmetric(config.v_limit, config.phi_limit)?,
            geometry: ArticulatedGeometry::tractor_with_trailers(num_trailers),
            integrator: EulerIntegrator::with_defaults(),
            wheelbase: config.wheelbase,
            hitch_lengths: config.hitch_lengths,
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

    pub fn num_trailers(&self) -> usize {
        self.hitch_lengths.len()
    }

    fn rig_state<'a>(&self, state: &'a VehicleState) -> &'a TrailerState {
        self.space.check_shape(state);
        state
            .as_car_with_trailers()
            .unwrap_or_else(|| state_mismatch(StateKind::CarWithTrailers, state))
    }

    /// One explicit Euler step of the whole rig.
    ///
    /// Trailers are updated back to front: trailer i only reads headings
    /// 0..=i, so every rate is evaluated on pre-step values.
    fn step(&self, s: &mut TrailerState, v: f64, phi: f64, dt: f64) {
        let theta0 = s.theta(0);
        s.x += v * theta0.cos() * dt;
        s.y += v * theta0.sin() * dt;

        for i in (1..=self.num_trailers()).rev() {
            let coupling: f64 = s
                .headings()
                .iter()
                .tuple_windows()
                .take(i - 1)
                .map(|(prev, next)| (prev - next).cos())
                .product();
            let rate = v / self.hitch_lengths[i - 1] * coupling * (s.theta(i - 1) - s.theta(i)).sin();
            let theta = s.theta(i) + rate * dt;
            s.set_theta(i, theta);
        }

        s.set_theta(0, theta0 + v / self.wheelbase * phi.tan() * dt);
    }

    /// Ground-plane anchor of every body: the tractor sits at (x, y) and each
    /// trailer trails its predecessor by its hitch length along its own heading.
    pub fn part_positions(&self, state: &VehicleState) -> Vec<Vector2<f64>> {
        let s = self.rig_state(state);
        let mut positions = Vec::with_capacity(self.num_trailers() + 1);
        let mut anchor = Vector2::new(s.x, s.y);
        positions.push(anchor);
        for (hitch, theta) in self.hitch_lengths.iter().zip(&s.headings()[1..]) {
            anchor -= Vector2::new(theta.cos(), theta.sin()) * *hitch;
            positions.push(anchor);
        }
        positions
    }
}

impl Robot for RobotCarFirstOrderWithTrailers {
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
        let s = self.rig_state(start);
        let (v, phi) = (control[0], control[1]);

        if let VehicleState::CarWithTrailers(r) = result {
            r.copy_from(s);
        } else {
            *result = VehicleState::CarWithTrailers(s.clone());
        }
        if let VehicleState::CarWithTrailers(r) = result {
            self.integrator
                .integrate(duration, r, |r, dt| self.step(r, v, phi, dt));
        }
    }

    fn get_transform(&self, state: &VehicleState, part: usize) -> Isometry3<f64> {
        check_part(self, part);
        let s = self.rig_state(state);
        if part == 0 {
            return planar_transform(s.x, s.y, s.theta(0));
        }
        let mut anchor = Vector2::new(s.x, s.y);
        for i in 1..=part {
            let theta = s.theta(i);
            anchor -= Vector2::new(theta.cos(), theta.sin()) * self.hitch_lengths[i - 1];
        }
        planar_transform(anchor.x, anchor.y, s.theta(part))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn create_test_robot(hitch_lengths: Vec<f64>) -> RobotCarFirstOrderWithTrailers {
        let bounds = RealVectorBounds::planar(-10.0, 10.0, -10.0, 10.0).unwrap();
        let config = CarWithTrailersConfig {
            hitch_lengths,
            ..Default::default()
        };
        RobotCarFirstOrderWithTrailers::new(bounds, config).unwrap()
    }

    fn propagate(
        robot: &RobotCarFirstOrderWithTrailers,
        start: &VehicleState,
        u: Control,
        duration: f64,
    ) -> TrailerState {
        let mut result = robot.alloc_state();
        robot.propagate(start, &u, duration, &mut result);
        result.as_car_with_trailers().unwrap().clone()
    }

    #[test]
    fn test_rejects_bad_constants() {
        let bounds = RealVectorBounds::planar(-1.0, 1.0, -1.0, 1.0).unwrap();
        let config = CarWithTrailersConfig {
            hitch_lengths: vec![0.5, 0.0],
            ..Default::default()
        };
        assert!(RobotCarFirstOrderWithTrailers::new(bounds.clone(), config).is_err());
        let config = CarWithTrailersConfig {
            wheelbase: -0.4,
            ..Default::default()
        };
        assert!(RobotCarFirstOrderWithTrailers::new(bounds, config).is_err());
    }

    #[test]
    fn test_num_parts() {
        assert_eq!(create_test_robot(vec![]).num_parts(), 1);
        assert_eq!(create_test_robot(vec![0.5]).num_parts(), 2);
        assert_eq!(create_test_robot(vec![0.5, 0.5]).num_parts(), 3);
    }

    #[test]
    fn test_zero_duration_is_identity() {
        let robot = create_test_robot(vec![0.5, 0.4]);
        let start: VehicleState = TrailerState::new(1.0, -1.0, &[0.3, 0.1, -0.2]).into();
        let result = propagate(&robot, &start, Control::new(0.5, 0.4), 0.0);
        assert_eq!(VehicleState::from(result), start);
    }

    #[test]
    fn test_sub_step_duration_is_truncated() {
        let robot = create_test_robot(vec![0.5]);
        let start: VehicleState = TrailerState::new(0.0, 0.0, &[0.0, 0.2]).into();
        let result = propagate(&robot, &start, Control::new(0.5, 0.4), 0.09);
        assert_eq!(VehicleState::from(result), start);
    }

    #[test]
    fn test_aligned_rig_drives_straight() {
        let robot = create_test_robot(vec![0.5, 0.5]);
        let start: VehicleState = TrailerState::zeroed(2).into();
        let result = propagate(&robot, &start, Control::new(0.5, 0.0), 2.0);
        assert!((result.x - 1.0).abs() < 1e-9);
        assert_eq!(result.y, 0.0);
        assert_eq!(result.headings(), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_tractor_turn_rate() {
        let robot = create_test_robot(vec![]);
        let start: VehicleState = TrailerState::zeroed(0).into();
        let phi = 0.3_f64;
        let result = propagate(&robot, &start, Control::new(0.5, phi), 0.1);
        assert!((result.theta(0) - 0.5 / 0.4 * phi.tan() * 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_first_trailer_uses_first_hitch() {
        let robot = create_test_robot(vec![0.25]);
        let start: VehicleState = TrailerState::new(0.0, 0.0, &[0.0, -0.3]).into();
        let result = propagate(&robot, &start, Control::new(1.0, 0.0), 0.1);
        let expected = -0.3 + 1.0 / 0.25 * 0.3_f64.sin() * 0.1;
        assert!((result.theta(1) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_second_trailer_uses_second_hitch() {
        let start: VehicleState = TrailerState::new(0.0, 0.0, &[0.0, 0.0, -0.3]).into();
        let u = Control::new(1.0, 0.0);
        for &h in &[1.0, 0.25] {
            let robot = create_test_robot(vec![0.5, h]);
            let result = propagate(&robot, &start, u, 0.1);
            let expected = -0.3 + 1.0 / h * 0.3_f64.sin() * 0.1;
            assert!((result.theta(2) - expected).abs() < 1e-12);
            assert_eq!(result.theta(1), 0.0);
        }
    }

    #[test]
    fn test_second_trailer_coupling_uses_pre_step_headings() {
        let robot = create_test_robot(vec![0.5, 0.5]);
        let (t0, t1, t2) = (0.4_f64, 0.1_f64, -0.2_f64);
        let start: VehicleState = TrailerState::new(0.0, 0.0, &[t0, t1, t2]).into();
        let result = propagate(&robot, &start, Control::new(0.5, 0.2), 0.1);

        let rate1 = 0.5 / 0.5 * (t0 - t1).sin();
        let rate2 = 0.5 / 0.5 * (t0 - t1).cos() * (t1 - t2).sin();
        assert!((result.theta(1) - (t1 + rate1 * 0.1)).abs() < 1e-12);
        assert!((result.theta(2) - (t2 + rate2 * 0.1)).abs() < 1e-12);
        assert!((result.x - 0.5 * t0.cos() * 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_third_trailer_coupling_multiplies_all_leading_joints() {
        let robot = create_test_robot(vec![0.5, 0.6, 0.4]);
        let (t0, t1, t2, t3) = (0.5_f64, 0.2_f64, -0.1_f64, -0.4_f64);
        let start: VehicleState = TrailerState::new(0.0, 0.0, &[t0, t1, t2, t3]).into();
        let (v, dt) = (0.5, 0.1);
        let result = propagate(&robot, &start, Control::new(v, 0.1), dt);

        let rate1 = v / 0.5 * (t0 - t1).sin();
        let rate2 = v / 0.6 * (t0 - t1).cos() * (t1 - t2).sin();
        let rate3 = v / 0.4 * (t0 - t1).cos() * (t1 - t2).cos() * (t2 - t3).sin();
        assert!((result.theta(1) - (t1 + rate1 * dt)).abs() < 1e-12);
        assert!((result.theta(2) - (t2 + rate2 * dt)).abs() < 1e-12);
        assert!((result.theta(3) - (t3 + rate3 * dt)).abs() < 1e-12);
        // Dropping either cosine factor changes the third trailer's heading.
        let single_factor = t3 + v / 0.4 * (t1 - t2).cos() * (t2 - t3).sin() * dt;
        assert!((result.theta(3) - single_factor).abs() > 1e-6);
    }

    #[test]
    fn test_trailers_follow_tractor_heading() {
        let robot = create_test_robot(vec![0.5, 0.5]);
        let start: VehicleState = TrailerState::new(0.0, 0.0, &[0.5, 0.0, 0.0]).into();
        let result = propagate(&robot, &start, Control::new(0.5, 0.0), 20.0);
        assert!((result.theta(0) - 0.5).abs() < 1e-12);
        assert!((result.theta(1) - 0.5).abs() < 1e-2);
        assert!((result.theta(2) - 0.5).abs() < 1e-2);
    }

    #[test]
    fn test_headings_stay_normalized() {
        let robot = create_test_robot(vec![0.5, 0.5]);
        let start: VehicleState = TrailerState::new(0.0, 0.0, &[3.0, 3.1, -3.1]).into();
        let result = propagate(&robot, &start, Control::new(0.5, PI / 3.0), 5.0);
        for &t in result.headings() {
            assert!(t > -PI && t <= PI);
        }
    }

    #[test]
    fn test_result_buffer_of_other_shape_is_replaced() {
        let robot = create_test_robot(vec![0.5]);
        let start: VehicleState = TrailerState::new(1.0, 2.0, &[0.0, 0.0]).into();
        let mut result: VehicleState = TrailerState::zeroed(4).into();
        robot.propagate(&start, &Control::new(0.0, 0.0), 1.0, &mut result);
        assert_eq!(result, start);
    }

    #[test]
    fn test_aligned_trailer_pose_is_one_hitch_behind() {
        let robot = create_test_robot(vec![0.5]);
        let theta = 0.7_f64;
        let state: VehicleState = TrailerState::new(2.0, 1.0, &[theta, theta]).into();
        let tractor = robot.get_transform(&state, 0);
        let trailer = robot.get_transform(&state, 1);
        let offset = tractor.translation.vector - trailer.translation.vector;
        assert!((offset.norm() - 0.5).abs() < 1e-12);
        assert!((offset.x - 0.5 * theta.cos()).abs() < 1e-12);
        assert!((offset.y - 0.5 * theta.sin()).abs() < 1e-12);
        assert!((trailer.rotation.angle() - theta).abs() < 1e-12);
    }

    #[test]
    fn test_trailer_poses_chain() {
        let robot = create_test_robot(vec![0.5, 0.75]);
        let state: VehicleState = TrailerState::new(1.0, 1.0, &[0.0, 0.0, FRAC_PI_2]).into();
        let second = robot.get_transform(&state, 2);
        // Trailer 1 sits at (0.5, 1.0); trailer 2 hangs 0.75 below it.
        assert!((second.translation.vector.x - 0.5).abs() < 1e-12);
        assert!((second.translation.vector.y - 0.25).abs() < 1e-12);

        let positions = robot.part_positions(&state);
        assert_eq!(positions.len(), 3);
        for (part, p) in positions.iter().enumerate() {
            let t = robot.get_transform(&state, part).translation.vector;
            assert!((t.x - p.x).abs() < 1e-12 && (t.y - p.y).abs() < 1e-12);
        }
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_get_transform_rejects_bad_part() {
        let robot = create_test_robot(vec![0.5]);
        let state = robot.alloc_state();
        robot.get_transform(&state, 2);
    }

    #[test]
    #[should_panic(expected = "trailer count mismatch")]
    fn test_propagate_rejects_wrong_trailer_count() {
        let robot = create_test_robot(vec![0.5]);
        let start: VehicleState = TrailerState::zeroed(2).into();
        let mut result = robot.alloc_state();
        robot.propagate(&start, &Control::new(0.1, 0.0), 1.0, &mut result);
    }
}
