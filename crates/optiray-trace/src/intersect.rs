//! Ray-surface intersection by guarded Newton-Raphson root finding.
//!
//! Solves `F(t) = P(t).z − sag(r²(P(t))) = 0` for the first crossing of a
//! ray with a rotationally-symmetric sag profile, in the surface's local
//! frame. A miss, a domain-guard trip, and non-convergence are all ordinary
//! `None` outcomes; the tracer terminates the ray's path on them.

use optiray_math::{Dir3, Point3, Vec3};
use optiray_surface::SagProfile;

use crate::ray::{Intersection, Ray};

/// Maximum Newton iterations before the ray is declared degenerate.
const MAX_ITERATIONS: usize = 32;
/// Absolute convergence tolerance on the axial residual.
const TOLERANCE: f64 = 1e-10;
/// Threshold below which a derivative is treated as vanishing.
const DERIVATIVE_EPSILON: f64 = 1e-14;

/// Intersect a ray with a sag profile.
///
/// Newton iteration starts from the ray's projection onto the local `z = 0`
/// plane (the paraxial estimate), which steers convergence toward the first
/// surface crossing rather than a spurious far root for well-behaved
/// near-axis rays. Returns `None` when:
///
/// - the ray runs parallel to the `z = 0` plane (no paraxial estimate),
/// - the iteration leaves the profile's real domain
///   (`(1+k)·c²·r² > 1`),
/// - the derivative vanishes or the iteration cap is reached
///   (grazing or otherwise degenerate geometry),
/// - the converged root lies behind the ray origin (`t < 0`).
///
/// Flat and spherical profiles take the same path; the closed forms
/// degenerate gracefully at `c = 0` and `k = 0`.
pub fn intersect_sag_profile(ray: &Ray, profile: &SagProfile) -> Option<Intersection> {
    let d = ray.direction;
    if d.z.abs() < DERIVATIVE_EPSILON {
        return None;
    }
    let mut t = -ray.origin.z / d.z;

    for _ in 0..MAX_ITERATIONS {
        let p = ray.at(t);
        let q = p.x * p.x + p.y * p.y;
        let sag = profile.sag(q)?;
        let residual = p.z - sag;

        if residual.abs() < TOLERANCE {
            if t < 0.0 {
                return None;
            }
            let slope = profile.sag_slope(q)?;
            return Some(Intersection {
                t,
                point: p,
                normal: oriented_normal(&p, slope, &d),
            });
        }

        let slope = profile.sag_slope(q)?;
        // F'(t) = d.z − dz/dq · dq/dt, with dq/dt = 2(x·d.x + y·d.y)
        let derivative = d.z - slope * 2.0 * (p.x * d.x + p.y * d.y);
        if derivative.abs() < DERIVATIVE_EPSILON {
            return None;
        }
        t -= residual / derivative;
    }

    None
}

/// Unit normal at a surface point, oriented to face the incoming ray.
///
/// Gradient of the implicit function `z − sag(r)`: with `q' = dz/dq` the
/// unnormalized gradient is `(−2q'·x, −2q'·y, 1)`. The sign is flipped when
/// needed so that `normal · (−incoming) > 0`, giving downstream
/// refraction/reflection a consistent convention.
fn oriented_normal(p: &Point3, slope: f64, incoming: &Vec3) -> Dir3 {
    let mut n = Vec3::new(-2.0 * slope * p.x, -2.0 * slope * p.y, 1.0);
    if n.dot(incoming) > 0.0 {
        n = -n;
    }
    Dir3::new_normalize(n)
}
