#![warn(missing_docs)]

//! Sequential optical ray-tracing kernel facade.
//!
//! Re-exports the optiray kernel crates under one roof:
//!
//! - [`optiray_math`] - points, vectors, rotation-matrix builders, rigid
//!   frame transforms, extents
//! - [`optiray_surface`] - rotationally-symmetric sag profiles (flat,
//!   conic, polynomial asphere)
//! - [`optiray_material`] - dispersion models (Sellmeier)
//! - [`optiray_trace`] - the intersection solver and the trace result store
//!
//! A tracer drives these from outside: for each ray it intersects the next
//! surface in that surface's local frame, looks up the dispersion model for
//! the refracted direction, allocates the continuation ray from the result
//! store, and records it against any element whose save state is enabled.
//!
//! # Example
//!
//! ```
//! use optiray::prelude::*;
//!
//! let lens_front = SagProfile::Conic(Conic::new(20.0, 0.0));
//! let glass = Sellmeier::bk7();
//! let mut result = TraceResult::new(1);
//! let surface = ElementId::new(1);
//! result.set_intercepted_save_state(surface, true);
//!
//! let ray = Ray::new(Point3::new(0.0, 1.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
//! let hit = intersect_sag_profile(&ray, &lens_front).unwrap();
//! let n = glass.refractive_index(0.5876).unwrap();
//! assert!(n > 1.5);
//!
//! let mut record = TraceRay::new(ray.origin, ray.direction, 0.5876, 1.0);
//! record.intercept = Some(hit.point);
//! let key = result.new_ray(record);
//! result.add_intercepted(surface, key);
//! assert!(result.get_intercepted_window(surface).is_ok());
//! ```

pub use optiray_material;
pub use optiray_math;
pub use optiray_surface;
pub use optiray_trace;

/// Commonly used kernel types in one import.
pub mod prelude {
    pub use optiray_material::{MaterialError, Sellmeier};
    pub use optiray_math::{
        rotation_matrix_2d, rotation_matrix_3d, Aabb3, Axis, Dir3, Matrix2, Matrix3, Point2,
        Point3, Transform, Vec2, Vec3,
    };
    pub use optiray_surface::{Asphere, Conic, SagProfile};
    pub use optiray_trace::{
        intersect_sag_profile, ElementId, Intersection, Ray, RayKey, SpotGrid, TraceError,
        TraceRay, TraceResult,
    };
}
