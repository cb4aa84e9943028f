//! Ray representation in a surface's local frame.

use optiray_math::{Dir3, Point3, Vec3};

/// A ray defined by origin and direction.
///
/// The direction is stored as given rather than renormalized, so the
/// parameter `t` measures distance in the caller's units only when the
/// caller supplies a unit direction.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Origin point of the ray.
    pub origin: Point3,
    /// Direction of propagation.
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray from origin and direction.
    pub fn new(origin: Point3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Evaluate the ray at parameter `t`: `origin + t * direction`.
    #[inline]
    pub fn at(&self, t: f64) -> Point3 {
        self.origin + t * self.direction
    }
}

/// Result of a ray-surface intersection.
#[derive(Debug, Clone, Copy)]
pub struct Intersection {
    /// Parameter along the ray where the intersection occurs.
    pub t: f64,
    /// Intersection point in the surface's local frame.
    pub point: Point3,
    /// Unit surface normal, oriented to face the incoming ray
    /// (`normal · (−direction) > 0`).
    pub normal: Dir3,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Point3::new(1.0, 2.0, 3.0), Vec3::new(0.0, 0.0, 2.0));
        let p = ray.at(2.5);
        assert!((p - Point3::new(1.0, 2.0, 8.0)).norm() < 1e-12);
    }
}
