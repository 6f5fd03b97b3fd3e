//! Kinodynamic vehicle models for sampling-based motion planning
//!
//! This crate provides first- and second-order car models, a car towing
//! trailers, a factory mapping type identifiers to configured models, and a
//! state validity checker that tests every rigid part against obstacles.

// Core modules
pub mod common;
pub mod utils;

// Vehicle models
pub mod kinodynamics;

// Re-export common types for convenience
pub use common::{Point2D, Pose2D, RealVectorBounds};
pub use common::{RoboticsError, RoboticsResult};
pub use kinodynamics::{create_robot, Control, Robot, StateValidityChecker, VehicleState};
