//! Common types used throughout kinodynamic_robots

use std::f64::consts::PI;

use nalgebra::Isometry3;

use crate::common::error::{RoboticsError, RoboticsResult};

/// 2D point representation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point2D) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// 2D pose (position + orientation)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose2D {
    pub x: f64,
    pub y: f64,
    pub yaw: f64,
}

impl Pose2D {
    pub fn new(x: f64, y: f64, yaw: f64) -> Self {
        Self { x, y, yaw }
    }

    /// Planar part of a rigid transform: translation in the ground plane and
    /// rotation about +Z.
    pub fn from_isometry(iso: &Isometry3<f64>) -> Self {
        let t = iso.translation.vector;
        let (_, _, yaw) = iso.rotation.euler_angles();
        Self::new(t.x, t.y, yaw)
    }
}

/// Normalize angle to (-PI, PI]
///
/// Angles already inside the range are returned bit-for-bit unchanged.
pub fn normalize_angle(angle: f64) -> f64 {
    if angle > -PI && angle <= PI {
        return angle;
    }
    let wrapped = PI - (PI - angle).rem_euclid(2.0 * PI);
    // rem_euclid can round up to exactly 2*PI just above PI
    if wrapped <= -PI {
        wrapped + 2.0 * PI
    } else {
        wrapped
    }
}

/// Length of the shortest arc between two headings, in [0, PI]
pub fn angle_distance(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(2.0 * PI);
    d.min(2.0 * PI - d)
}

/// Per-dimension closed intervals [low, high]
#[derive(Debug, Clone, PartialEq)]
pub struct RealVectorBounds {
    low: Vec<f64>,
    high: Vec<f64>,
}

impl RealVectorBounds {
    pub fn new(low: Vec<f64>, high: Vec<f64>) -> RoboticsResult<Self> {
        if low.len() != high.len() {
            return Err(RoboticsError::InvalidParameter(format!(
                "bounds dimension mismatch: {} low values, {} high values",
                low.len(),
                high.len()
            )));
        }
        for (i, (lo, hi)) in low.iter().zip(high.iter()).enumerate() {
            if !lo.is_finite() || !hi.is_finite() || lo > hi {
                return Err(RoboticsError::InvalidParameter(format!(
                    "bounds for dimension {} are not a valid interval: [{}, {}]",
                    i, lo, hi
                )));
            }
        }
        Ok(Self { low, high })
    }

    /// Same interval [-limit, limit] on every one of `dim` dimensions
    pub fn symmetric(dim: usize, limit: f64) -> RoboticsResult<Self> {
        Self::new(vec![-limit; dim], vec![limit; dim])
    }

    /// Planar position bounds
    pub fn planar(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> RoboticsResult<Self> {
        Self::new(vec![xmin, ymin], vec![xmax, ymax])
    }

    pub fn dimension(&self) -> usize {
        self.low.len()
    }

    pub fn low(&self) -> &[f64] {
        &self.low
    }

    pub fn high(&self) -> &[f64] {
        &self.high
    }

    /// high - low for every dimension
    pub fn extents(&self) -> Vec<f64> {
        self.low.iter().zip(self.high.iter()).map(|(lo, hi)| hi - lo).collect()
    }

    /// Whether `values` lies inside the bounds (inclusive).
    ///
    /// Only the first `dimension()` values are inspected.
    pub fn contains(&self, values: &[f64]) -> bool {
        values.len() >= self.dimension()
            && values
                .iter()
                .zip(self.low.iter().zip(self.high.iter()))
                .all(|(v, (lo, hi))| *v >= *lo && *v <= *hi)
    }

    pub fn contains_value(&self, dim: usize, value: f64) -> bool {
        value >= self.low[dim] && value <= self.high[dim]
    }

    pub fn clamp(&self, dim: usize, value: f64) -> f64 {
        value.max(self.low[dim]).min(self.high[dim])
    }
}
