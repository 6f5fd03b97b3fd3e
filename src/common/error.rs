//! Error types for kinodynamic_robots

use std::fmt;

/// Main error type for vehicle model construction and tooling
#[derive(Debug, Clone, PartialEq)]
pub enum RoboticsError {
    /// The factory was asked for a robot type it does not know
    UnknownRobotType {
        requested: String,
        known: Vec<&'static str>,
    },
    /// Invalid parameter (bounds, integration step, vehicle constants)
    InvalidParameter(String),
    /// Visualization error
    VisualizationError(String),
}

impl fmt::Display for RoboticsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoboticsError::UnknownRobotType { requested, known } => write!(
                f,
                "Unknown robot type '{}' (expected one of: {})",
                requested,
                known.join(", ")
            ),
            RoboticsError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            RoboticsError::VisualizationError(msg) => write!(f, "Visualization error: {}", msg),
        }
    }
}

impl std::error::Error for RoboticsError {}

/// Result type alias for robotics operations
pub type RoboticsResult<T> = Result<T, RoboticsError>;
