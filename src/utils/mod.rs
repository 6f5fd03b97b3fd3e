//! Utility modules for kinodynamic_robots

pub mod visualization;

pub use visualization::{colors, PathStyle, Visualizer};
