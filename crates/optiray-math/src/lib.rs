#![warn(missing_docs)]

//! Math types for the optiray optical tracing kernel.
//!
//! Thin wrappers around nalgebra providing domain-specific types for
//! sequential ray tracing: points, vectors, directions, rotation-matrix
//! builders, rigid frame transforms, and axis-aligned extents.

use nalgebra::{Unit, Vector2, Vector3};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A unit (normalized) direction vector in 3D space.
pub type Dir3 = Unit<Vector3<f64>>;

/// A point in 2D space (meridional plane or surface aperture).
pub type Point2 = nalgebra::Point2<f64>;

/// A vector in 2D space.
pub type Vec2 = Vector2<f64>;

/// A 2x2 matrix.
pub type Matrix2 = nalgebra::Matrix2<f64>;

/// A 3x3 matrix.
pub type Matrix3 = nalgebra::Matrix3<f64>;

// =============================================================================
// Rotation-matrix builders
// =============================================================================

/// Rotation axis selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// The X axis (index 0).
    X,
    /// The Y axis (index 1).
    Y,
    /// The Z axis (index 2).
    Z,
}

impl Axis {
    /// Select an axis by index (0 = X, 1 = Y, 2 = Z).
    ///
    /// # Panics
    ///
    /// Panics on an index outside `0..3`; axis selection is part of the
    /// optical prescription and an invalid index is a caller bug.
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => Axis::X,
            1 => Axis::Y,
            2 => Axis::Z,
            _ => panic!("invalid rotation axis index: {index}"),
        }
    }

    /// The numeric index of this axis.
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Build the 2D rotation matrix for `angle` radians.
///
/// A plane has a single rotation axis, so `axis` must be 0; it is taken
/// anyway to mirror the 3D builder's shape. The matrix rotates a vector
/// counterclockwise for a positive angle: `[cos -sin; sin cos]`.
///
/// # Panics
///
/// Panics on a nonzero axis.
pub fn rotation_matrix_2d(axis: usize, angle: f64) -> Matrix2 {
    assert!(axis == 0, "a plane has a single rotation axis (0), got {axis}");
    let (s, c) = angle.sin_cos();
    Matrix2::new(c, -s, s, c)
}

/// Build the 3D rotation matrix for `angle` radians around `axis`.
///
/// The convention is a right-handed, counterclockwise rotation of the
/// coordinate system when looking toward the origin from the positive end of
/// the axis (equivalently, vectors rotate clockwise). Per axis:
///
/// - `X`: `[1 0 0; 0 c s; 0 -s c]`
/// - `Y`: `[c 0 -s; 0 1 0; s 0 c]`
/// - `Z`: `[c s 0; -s c 0; 0 0 1]`
///
/// where `c = cos(angle)` and `s = sin(angle)`. Composing the matrices for
/// `angle` and `-angle` yields the identity.
pub fn rotation_matrix_3d(axis: Axis, angle: f64) -> Matrix3 {
    let (s, c) = angle.sin_cos();
    match axis {
        Axis::X => Matrix3::new(
            1.0, 0.0, 0.0, //
            0.0, c, s, //
            0.0, -s, c,
        ),
        Axis::Y => Matrix3::new(
            c, 0.0, -s, //
            0.0, 1.0, 0.0, //
            s, 0.0, c,
        ),
        Axis::Z => Matrix3::new(
            c, s, 0.0, //
            -s, c, 0.0, //
            0.0, 0.0, 1.0,
        ),
    }
}

// =============================================================================
// Rigid transform
// =============================================================================

/// A rigid frame transform (rotation followed by translation).
///
/// Places a surface's local frame in the global reference frame. Optical
/// frames carry no scale or shear, so the rotation block and translation
/// vector are stored directly instead of a homogeneous 4x4.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Rotation block applied before translation.
    pub rotation: Matrix3,
    /// Translation applied after rotation.
    pub translation: Vec3,
}

impl Transform {
    /// Identity transform.
    pub fn identity() -> Self {
        Self {
            rotation: Matrix3::identity(),
            translation: Vec3::zeros(),
        }
    }

    /// Translation by `(dx, dy, dz)`.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        Self {
            rotation: Matrix3::identity(),
            translation: Vec3::new(dx, dy, dz),
        }
    }

    /// Rotation about `axis` through the origin by `angle` radians.
    ///
    /// Uses the same per-axis convention as [`rotation_matrix_3d`].
    pub fn rotation(axis: Axis, angle: f64) -> Self {
        Self {
            rotation: rotation_matrix_3d(axis, angle),
            translation: Vec3::zeros(),
        }
    }

    /// Compose: apply `self` first, then `other`.
    pub fn then(&self, other: &Transform) -> Self {
        Self {
            rotation: other.rotation * self.rotation,
            translation: other.rotation * self.translation + other.translation,
        }
    }

    /// Inverse of this transform.
    ///
    /// Rigid transforms always invert: the rotation block transposes and the
    /// translation reverses through it.
    pub fn inverse(&self) -> Self {
        let rt = self.rotation.transpose();
        Self {
            rotation: rt,
            translation: -(rt * self.translation),
        }
    }

    /// Transform a point.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        Point3::from(self.rotation * p.coords + self.translation)
    }

    /// Transform a direction vector (rotation only, no translation).
    pub fn apply_vec(&self, v: &Vec3) -> Vec3 {
        self.rotation * v
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

// =============================================================================
// Axis-aligned extent
// =============================================================================

/// Axis-aligned bounding extent in 3D (min/max corner pair).
///
/// Used as the window over ray intercept points on a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb3 {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl Aabb3 {
    /// Create an extent from min and max corners.
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Create an empty (inverted) extent suitable for expansion.
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Expand this extent to include a point.
    pub fn include_point(&mut self, p: &Point3) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    /// Midpoint of the extent.
    pub fn center(&self) -> Point3 {
        Point3::new(
            0.5 * (self.min.x + self.max.x),
            0.5 * (self.min.y + self.max.y),
            0.5 * (self.min.z + self.max.z),
        )
    }

    /// Test whether a point lies inside the extent (boundary included).
    pub fn contains(&self, p: &Point3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }
}
