//! The robot abstraction consumed by a kinodynamic planner

use nalgebra::{Isometry3, Vector3};

use crate::kinodynamics::geometry::ArticulatedGeometry;
use crate::kinodynamics::state::VehicleState;
use crate::kinodynamics::state_space::{Control, ControlSpace, StateSpace};

/// A vehicle model: state shape and bounds, control bounds, dynamics and the
/// pose of every articulated part.
///
/// Robots are immutable after construction. All operations take `&self` and
/// write only into caller-owned states, so one instance can be shared by any
/// number of planner threads.
pub trait Robot: Send + Sync {
    /// Factory identifier this robot was built from
    fn name(&self) -> &str;

    fn state_space(&self) -> &StateSpace;

    fn control_space(&self) -> &ControlSpace;

    fn geometry(&self) -> &ArticulatedGeometry;

    /// Simulate `control` for `duration` seconds from `start` and write the
    /// successor into `result`, whatever `result` held before. The control is
    /// not checked against the control bounds.
    ///
    /// # Panics
    /// If `duration` is negative or `start` has the wrong shape for this
    /// robot.
    fn propagate(&self, start: &VehicleState, control: &Control, duration: f64, result: &mut VehicleState);

    /// World pose of part `part` (0 = tractor, i = i-th trailer)
    ///
    /// # Panics
    /// If `part >= num_parts()` or `state` has the wrong shape.
    fn get_transform(&self, state: &VehicleState, part: usize) -> Isometry3<f64>;

    /// Overwrite the (x, y) components of `state`; z is ignored.
    fn set_position(&self, state: &mut VehicleState, position: &Vector3<f64>) {
        self.state_space().check_shape(state);
        state.set_position(position.x, position.y);
    }

    /// Number of independently posed rigid bodies
    fn num_parts(&self) -> usize {
        self.geometry().num_parts()
    }

    /// A zeroed state of the right shape
    fn alloc_state(&self) -> VehicleState {
        self.state_space().alloc_state()
    }
}

/// Panic unless `part` names an existing body
pub(crate) fn check_part(robot: &dyn Robot, part: usize) {
    assert!(
        part < robot.num_parts(),
        "part index {} out of range for robot '{}' with {} parts",
        part,
        robot.name(),
        robot.num_parts()
    );
}
