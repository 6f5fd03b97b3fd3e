//! Articulated collision geometry
//!
//! One rigid collision shape per independently posed body: index 0 is the
//! tractor, index i >= 1 the i-th trailer. Shapes are boxes resting on the
//! ground plane; poses only translate in the plane and rotate about +Z.

use nalgebra::{Isometry3, Point3, Vector3};
use parry3d_f64::shape::{Shape, SharedShape};

use crate::common::Point2D;

/// Full extents (length, width, height) of a car or tractor body [m]
pub const CAR_BODY_EXTENTS: [f64; 3] = [0.5, 0.25, 1.0];
/// Full extents (length, width, height) of a trailer body [m]
pub const TRAILER_BODY_EXTENTS: [f64; 3] = [0.3, 0.25, 1.0];

/// Rigid transform of a body at (x, y) on the ground plane with heading `yaw`
pub fn planar_transform(x: f64, y: f64, yaw: f64) -> Isometry3<f64> {
    Isometry3::new(Vector3::new(x, y, 0.0), Vector3::z() * yaw)
}

fn box_shape(extents: [f64; 3]) -> SharedShape {
    SharedShape::cuboid(extents[0] / 2.0, extents[1] / 2.0, extents[2] / 2.0)
}

/// Collision shapes of all bodies of a vehicle
#[derive(Clone)]
pub struct ArticulatedGeometry {
    parts: Vec<SharedShape>,
}

impl ArticulatedGeometry {
    pub fn new(parts: Vec<SharedShape>) -> Self {
        Self { parts }
    }

    /// A single car body
    pub fn car() -> Self {
        Self::new(vec![box_shape(CAR_BODY_EXTENTS)])
    }

    /// A tractor followed by `num_trailers` trailer bodies
    pub fn tractor_with_trailers(num_trailers: usize) -> Self {
        let mut parts = Vec::with_capacity(num_trailers + 1);
        parts.push(box_shape(CAR_BODY_EXTENTS));
        parts.extend((0..num_trailers).map(|_| box_shape(TRAILER_BODY_EXTENTS)));
        Self::new(parts)
    }

    pub fn num_parts(&self) -> usize {
        self.parts.len()
    }

    /// # Panics
    /// If `part >= num_parts()`.
    pub fn part(&self, part: usize) -> &dyn Shape {
        assert!(
            part < self.parts.len(),
            "part index {} out of range for a vehicle with {} parts",
            part,
            self.parts.len()
        );
        &*self.parts[part]
    }

    /// Ground-plane outline of a box part at `pose`, as a closed polygon
    /// (first corner repeated at the end). Empty for non-box shapes.
    pub fn footprint(&self, part: usize, pose: &Isometry3<f64>) -> Vec<Point2D> {
        let cuboid = match self.part(part).as_cuboid() {
            Some(c) => c,
            None => return Vec::new(),
        };
        let he = cuboid.half_extents;
        let corners = [(he.x, he.y), (-he.x, he.y), (-he.x, -he.y), (he.x, -he.y), (he.x, he.y)];
        corners
            .iter()
            .map(|&(cx, cy)| {
                let p = pose * Point3::new(cx, cy, 0.0);
                Point2D::new(p.x, p.y)
            })
            .collect()
    }
}

impl std::fmt::Debug for ArticulatedGeometry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArticulatedGeometry")
            .field("num_parts", &self.parts.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_part_counts() {
        assert_eq!(ArticulatedGeometry::car().num_parts(), 1);
        assert_eq!(ArticulatedGeometry::tractor_with_trailers(0).num_parts(), 1);
        assert_eq!(ArticulatedGeometry::tractor_with_trailers(2).num_parts(), 3);
    }

    #[test]
    fn test_box_dimensions() {
        let geometry = ArticulatedGeometry::tractor_with_trailers(1);
        let tractor = geometry.part(0).as_cuboid().unwrap();
        assert!((tractor.half_extents - Vector3::new(0.25, 0.125, 0.5)).norm() < 1e-12);
        let trailer = geometry.part(1).as_cuboid().unwrap();
        assert!((trailer.half_extents - Vector3::new(0.15, 0.125, 0.5)).norm() < 1e-12);
    }

    #[test]
    fn test_planar_transform_rotates_about_z() {
        let iso = planar_transform(1.0, 2.0, FRAC_PI_2);
        let p = iso * Point3::new(1.0, 0.0, 0.3);
        assert!((p - Point3::new(1.0, 3.0, 0.3)).norm() < 1e-12);
    }

    #[test]
    fn test_footprint_corners() {
        let geometry = ArticulatedGeometry::car();
        let outline = geometry.footprint(0, &planar_transform(1.0, 0.0, 0.0));
        assert_eq!(outline.len(), 5);
        assert_eq!(outline[0], outline[4]);
        assert!((outline[0].x - 1.25).abs() < 1e-12);
        assert!((outline[0].y - 0.125).abs() < 1e-12);
        assert!((outline[2].x - 0.75).abs() < 1e-12);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_part_out_of_range_panics() {
        ArticulatedGeometry::car().part(1);
    }
}
