//! State validity checking against an obstacle environment
//!
//! A state is valid when it satisfies the bounds of the robot's state space
//! and none of the robot's parts, posed by `Robot::get_transform`, touches an
//! obstacle.

use std::sync::Arc;

use nalgebra::{Isometry3, Vector3};
use parry3d_f64::bounding_volume::Aabb;
use parry3d_f64::partitioning::Qbvh;
use parry3d_f64::query;
use parry3d_f64::shape::{Shape, SharedShape};

use crate::kinodynamics::geometry::planar_transform;
use crate::kinodynamics::robot::Robot;
use crate::kinodynamics::state::VehicleState;

/// Collision query over a fixed set of obstacles.
///
/// Implementations must answer concurrent read-only queries.
pub trait CollisionEnvironment: Send + Sync {
    /// True iff any obstacle intersects `shape` placed at `pose`
    fn collides(&self, shape: &dyn Shape, pose: &Isometry3<f64>) -> bool;
}

/// Static obstacle: a shape, its pose and its cached world bounding box
#[derive(Clone)]
pub struct Obstacle {
    shape: SharedShape,
    pose: Isometry3<f64>,
    aabb: Aabb,
}

impl Obstacle {
    pub fn new(shape: SharedShape, pose: Isometry3<f64>) -> Self {
        let aabb = shape.compute_aabb(&pose);
        Self { shape, pose, aabb }
    }

    pub fn shape(&self) -> &dyn Shape {
        &*self.shape
    }

    pub fn pose(&self) -> &Isometry3<f64> {
        &self.pose
    }

    pub fn aabb(&self) -> &Aabb {
        &self.aabb
    }
}

/// Obstacles checked with a bounding-volume hierarchy broad phase followed
/// by an exact intersection test
#[derive(Clone, Default)]
pub struct ObstacleEnvironment {
    obstacles: Vec<Obstacle>,
    // Leaves are indices into `obstacles`
    bvh: Qbvh<usize>,
}

impl ObstacleEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an environment from many obstacles with a single hierarchy build
    pub fn from_obstacles<I>(obstacles: I) -> Self
    where
        I: IntoIterator<Item = Obstacle>,
    {
        let mut env = Self {
            obstacles: obstacles.into_iter().collect(),
            bvh: Qbvh::new(),
        };
        env.rebuild();
        env
    }

    pub fn add_obstacle(&mut self, shape: SharedShape, pose: Isometry3<f64>) -> &mut Self {
        self.obstacles.push(Obstacle::new(shape, pose));
        self.rebuild();
        self
    }

    fn rebuild(&mut self) {
        if self.obstacles.is_empty() {
            self.bvh = Qbvh::new();
            return;
        }
        let leaves = self.obstacles.iter().enumerate().map(|(i, obs)| (i, *obs.aabb()));
        self.bvh.clear_and_rebuild(leaves, 0.0);
    }

    /// Indices of the obstacles whose bounding boxes overlap `aabb`
    pub fn broad_phase(&self, aabb: &Aabb) -> Vec<usize> {
        let mut candidates = Vec::new();
        if !self.obstacles.is_empty() {
            self.bvh.intersect_aabb(aabb, &mut candidates);
        }
        candidates
    }

    /// Box of full extents (length, width, height) resting on the ground
    /// plane, centered at (x, y) and rotated by `yaw`
    pub fn add_box(&mut self, x: f64, y: f64, yaw: f64, extents: Vector3<f64>) -> &mut Self {
        let half = extents / 2.0;
        self.add_obstacle(SharedShape::cuboid(half.x, half.y, half.z), planar_transform(x, y, yaw))
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }
}

impl CollisionEnvironment for ObstacleEnvironment {
    fn collides(&self, shape: &dyn Shape, pose: &Isometry3<f64>) -> bool {
        let aabb = shape.compute_aabb(pose);
        self.broad_phase(&aabb)
            .into_iter()
            .map(|i| &self.obstacles[i])
            .any(|obs| match query::intersection_test(pose, shape, &obs.pose, &*obs.shape) {
                Ok(hit) => hit,
                Err(_) => {
                    log::warn!("unsupported shape pair in intersection test, assuming collision");
                    true
                }
            })
    }
}

/// Bounds plus collision check of vehicle states.
///
/// Holds shared references only; checking never mutates the robot or the
/// environment, so one checker can serve several planner threads.
pub struct StateValidityChecker<E: CollisionEnvironment = ObstacleEnvironment> {
    robot: Arc<dyn Robot>,
    environment: Arc<E>,
}

impl<E: CollisionEnvironment> StateValidityChecker<E> {
    pub fn new(robot: Arc<dyn Robot>, environment: Arc<E>) -> Self {
        Self { robot, environment }
    }

    pub fn robot(&self) -> &Arc<dyn Robot> {
        &self.robot
    }

    pub fn environment(&self) -> &Arc<E> {
        &self.environment
    }

    /// False if `state` violates its bounds or any part collides.
    ///
    /// # Panics
    /// If `state` has the wrong shape for the robot.
    pub fn is_valid(&self, state: &VehicleState) -> bool {
        if !self.robot.state_space().satisfies_bounds(state) {
            log::trace!("state rejected: out of bounds");
            return false;
        }
        let geometry = self.robot.geometry();
        for part in 0..self.robot.num_parts() {
            let pose = self.robot.get_transform(state, part);
            if self.environment.collides(geometry.part(part), &pose) {
                log::trace!("state rejected: part {} in collision", part);
                return false;
            }
        }
        true
    }
}
