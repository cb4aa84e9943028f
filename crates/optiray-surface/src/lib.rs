#![warn(missing_docs)]

//! Rotationally-symmetric sag profiles for the optiray kernel.
//!
//! A sag profile describes surface height along the optical axis as a
//! function of radial distance from the axis in the surface's local frame.
//! Profiles are immutable once built and shared read-only across traces.
//!
//! All evaluation is done over `q = r²` rather than `r` itself: the closed
//! forms stay polynomial in `q`, the axis point is regular, and the
//! intersection solver gets `dz/dq` directly without an `r = 0` special case.

use serde::{Deserialize, Serialize};

/// A pure conic section profile.
///
/// Sag: `z(r) = c·r² / (1 + √(1 − (1+k)·c²·r²))` with curvature `c`
/// (reciprocal of the radius of curvature, zero for a flat) and conic
/// constant `k` (0 sphere, −1 parabola, < −1 hyperbola).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conic {
    /// Curvature `c` (1 / radius of curvature).
    pub curvature: f64,
    /// Conic constant `k`.
    pub conic: f64,
}

impl Conic {
    /// Conic from a radius of curvature.
    ///
    /// # Panics
    ///
    /// Panics on a zero radius; a flat surface is curvature 0, built with
    /// [`Conic::from_curvature`] or [`SagProfile::Flat`].
    pub fn new(radius: f64, conic: f64) -> Self {
        assert!(radius != 0.0, "zero radius of curvature");
        Self {
            curvature: 1.0 / radius,
            conic,
        }
    }

    /// Conic from a curvature (0 degenerates to a flat).
    pub fn from_curvature(curvature: f64, conic: f64) -> Self {
        Self { curvature, conic }
    }

    /// Sag at squared radius `q = r²`, or `None` when `(1+k)·c²·q > 1`
    /// (no real surface point exists at that radius for this conic).
    pub fn sag(&self, q: f64) -> Option<f64> {
        let s2 = 1.0 - (1.0 + self.conic) * self.curvature * self.curvature * q;
        if s2 < 0.0 {
            return None;
        }
        Some(self.curvature * q / (1.0 + s2.sqrt()))
    }

    /// Derivative `dz/dq` at squared radius `q`, or `None` outside the
    /// profile's real domain (the slope is unbounded at the domain edge).
    pub fn sag_slope(&self, q: f64) -> Option<f64> {
        let s2 = 1.0 - (1.0 + self.conic) * self.curvature * self.curvature * q;
        if s2 <= 0.0 {
            return None;
        }
        Some(self.curvature / (2.0 * s2.sqrt()))
    }
}

/// A conic base with even-order polynomial aspheric corrections.
///
/// Sag: conic sag plus `Σ Aᵢ·r^(2i+4)` — coefficient `i` in
/// [`coefficients`](Self::coefficients) multiplies `r⁴, r⁶, r⁸, …` in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asphere {
    /// The underlying conic section.
    pub base: Conic,
    /// Aspheric coefficients `A₄, A₆, A₈, …`, in ascending order.
    pub coefficients: Vec<f64>,
}

impl Asphere {
    /// Asphere from a radius of curvature, conic constant, and coefficients.
    ///
    /// # Panics
    ///
    /// Panics on a zero radius, like [`Conic::new`].
    pub fn new(radius: f64, conic: f64, coefficients: Vec<f64>) -> Self {
        Self {
            base: Conic::new(radius, conic),
            coefficients,
        }
    }

    /// Asphere from a curvature (0 for a polynomial-only profile).
    pub fn from_curvature(curvature: f64, conic: f64, coefficients: Vec<f64>) -> Self {
        Self {
            base: Conic::from_curvature(curvature, conic),
            coefficients,
        }
    }

    /// Sag at squared radius `q = r²`, `None` outside the conic domain.
    pub fn sag(&self, q: f64) -> Option<f64> {
        let mut z = self.base.sag(q)?;
        // A4*q^2 + A6*q^3 + ...
        let mut p = q * q;
        for a in &self.coefficients {
            z += a * p;
            p *= q;
        }
        Some(z)
    }

    /// Derivative `dz/dq` at squared radius `q`, `None` outside the domain.
    pub fn sag_slope(&self, q: f64) -> Option<f64> {
        let mut d = self.base.sag_slope(q)?;
        // d/dq of A_i * q^(i+2) is (i+2) * A_i * q^(i+1)
        let mut p = q;
        for (i, a) in self.coefficients.iter().enumerate() {
            d += (i + 2) as f64 * a * p;
            p *= q;
        }
        Some(d)
    }
}

/// A rotationally-symmetric surface profile.
///
/// Closed set of profile kinds; the intersection solver needs only the
/// uniform sag/slope evaluation, so new kinds are added here deliberately
/// rather than through open-ended dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SagProfile {
    /// Flat surface; sag is identically zero.
    Flat,
    /// Pure conic section.
    Conic(Conic),
    /// Conic with polynomial aspheric corrections.
    Asphere(Asphere),
}

impl SagProfile {
    /// Sag at squared radius `q = r²`.
    ///
    /// `None` means no real surface point exists at that radius; callers
    /// must treat it as a miss, not an error.
    pub fn sag(&self, q: f64) -> Option<f64> {
        match self {
            SagProfile::Flat => Some(0.0),
            SagProfile::Conic(c) => c.sag(q),
            SagProfile::Asphere(a) => a.sag(q),
        }
    }

    /// Derivative `dz/dq` at squared radius `q`.
    pub fn sag_slope(&self, q: f64) -> Option<f64> {
        match self {
            SagProfile::Flat => Some(0.0),
            SagProfile::Conic(c) => c.sag_slope(q),
            SagProfile::Asphere(a) => a.sag_slope(q),
        }
    }

    /// Curvature at the vertex (zero for a flat).
    pub fn curvature(&self) -> f64 {
        match self {
            SagProfile::Flat => 0.0,
            SagProfile::Conic(c) => c.curvature,
            SagProfile::Asphere(a) => a.base.curvature,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_sag_is_zero() {
        let p = SagProfile::Flat;
        for q in [0.0, 1.0, 1e6] {
            assert_eq!(p.sag(q), Some(0.0));
            assert_eq!(p.sag_slope(q), Some(0.0));
        }
    }

    #[test]
    fn test_zero_curvature_conic_degenerates_to_flat() {
        let c = Conic::from_curvature(0.0, 0.0);
        assert_eq!(c.sag(25.0), Some(0.0));
        assert_eq!(c.sag_slope(25.0), Some(0.0));
    }

    #[test]
    fn test_sphere_sag_matches_closed_form() {
        // k = 0 is a sphere of radius R: z = R - sqrt(R^2 - r^2)
        let r_cur = 10.0;
        let c = Conic::new(r_cur, 0.0);
        for r in [0.5, 1.0, 2.0, 5.0] {
            let q = r * r;
            let expected = r_cur - (r_cur * r_cur - q).sqrt();
            assert!((c.sag(q).unwrap() - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_parabola_sag() {
        // k = -1: z = c r^2 / 2 exactly, for any radius
        let c = Conic::from_curvature(0.1, -1.0);
        let q = 400.0;
        assert!((c.sag(q).unwrap() - 0.1 * q / 2.0).abs() < 1e-12);
        assert!(c.sag(1e12).is_some());
    }

    #[test]
    fn test_domain_guard() {
        // (1+k) c^2 q > 1 has no real surface point
        let c = Conic::from_curvature(0.25284872, 1.0);
        let limit = 1.0 / (2.0 * 0.25284872f64.powi(2));
        assert!(c.sag(limit * 0.99).is_some());
        assert!(c.sag(limit * 1.01).is_none());
        assert!(c.sag_slope(limit * 1.01).is_none());
    }

    #[test]
    fn test_asphere_polynomial_terms() {
        // Flat base: sag is the polynomial alone
        let a = Asphere::from_curvature(0.0, 0.0, vec![2.0, -1.0]);
        let q: f64 = 3.0;
        let expected = 2.0 * q.powi(2) - 1.0 * q.powi(3);
        assert!((a.sag(q).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_asphere_slope_matches_finite_difference() {
        let a = Asphere::new(1.0 / 0.25284872, 1.0, vec![-0.005, 0.00001, -0.0000005]);
        let q = 2.0;
        let h = 1e-7;
        let fd = (a.sag(q + h).unwrap() - a.sag(q - h).unwrap()) / (2.0 * h);
        assert!((a.sag_slope(q).unwrap() - fd).abs() < 1e-6);
    }

    #[test]
    fn test_conic_slope_matches_finite_difference() {
        let c = Conic::new(-55.502, 2.61294);
        let q = 150.0;
        let h = 1e-6;
        let fd = (c.sag(q + h).unwrap() - c.sag(q - h).unwrap()) / (2.0 * h);
        assert!((c.sag_slope(q).unwrap() - fd).abs() < 1e-9);
    }

    #[test]
    #[should_panic(expected = "zero radius")]
    fn test_zero_radius_rejected() {
        let _ = Conic::new(0.0, 0.0);
    }

    #[test]
    fn test_profile_serde_round_trip() {
        let p = SagProfile::Asphere(Asphere::new(27.197, -0.81201, vec![5.0791e-6, -6.20262e-9]));
        let json = serde_json::to_string(&p).unwrap();
        let back: SagProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
