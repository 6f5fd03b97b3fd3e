//! Common types and error definitions for kinodynamic_robots
//!
//! This module provides the bounds, angle helpers and error type shared
//! by the vehicle models.

pub mod types;
pub mod error;

pub use types::*;
pub use error::*;
