#![warn(missing_docs)]

//! Ray propagation bookkeeping and sag-surface intersection for the optiray
//! kernel.
//!
//! This crate provides the two halves of a sequential trace step:
//!
//! - [`intersect`] - guarded Newton-Raphson intersection of a [`Ray`] with a
//!   rotationally-symmetric sag profile, yielding point and oriented normal
//! - [`TraceResult`] - pooled ownership of every ray produced during a
//!   trace, with per-element record queues and window/centroid/histogram
//!   queries over intercept points
//!
//! # Concurrency
//!
//! Intersection solving is pure and safe to run concurrently on independent
//! rays. A [`TraceResult`] has no internal synchronization: it is owned by
//! one trace at a time, and every mutating operation takes `&mut self`, so
//! the borrow rules enforce the per-store serialization the design requires.
//! Profiles and dispersion models are read-only during tracing and may be
//! shared freely.
//!
//! # Example
//!
//! ```
//! use optiray_math::{Point3, Vec3};
//! use optiray_surface::{Conic, SagProfile};
//! use optiray_trace::{intersect_sag_profile, ElementId, Ray, TraceRay, TraceResult};
//!
//! let profile = SagProfile::Conic(Conic::new(20.0, 0.0));
//! let mut result = TraceResult::new(1);
//! let surface = ElementId::new(1);
//! result.set_intercepted_save_state(surface, true);
//!
//! let ray = Ray::new(Point3::new(0.0, 1.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
//! if let Some(hit) = intersect_sag_profile(&ray, &profile) {
//!     let mut record = TraceRay::new(ray.origin, ray.direction, 0.5876, 1.0);
//!     record.intercept = Some(hit.point);
//!     let key = result.new_ray(record);
//!     result.add_intercepted(surface, key);
//! }
//!
//! assert_eq!(result.get_intercepted(surface).unwrap().len(), 1);
//! ```

mod error;
pub mod intersect;
mod ray;
mod result;

pub use error::TraceError;
pub use intersect::intersect_sag_profile;
pub use ray::{Intersection, Ray};
pub use result::{ElementId, RayKey, SpotGrid, TraceRay, TraceResult};
