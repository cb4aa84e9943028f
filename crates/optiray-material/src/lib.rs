#![warn(missing_docs)]

//! Material dispersion models for the optiray kernel.
//!
//! Dispersion converts a wavelength to a refractive index. Coefficients are
//! configured once when the optical prescription is built and read-only
//! during tracing, so a model can be shared across concurrent traces.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from dispersion evaluation.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum MaterialError {
    /// The wavelength coincides with a resonance term; the Sellmeier
    /// denominator is zero there and the model has no finite value.
    #[error("wavelength {wavelength} lies on a resonance of the dispersion model")]
    Resonance {
        /// The offending wavelength.
        wavelength: f64,
    },

    /// The evaluated squared index came out negative; the wavelength is
    /// outside the model's region of validity.
    #[error("dispersion model yields a non-physical index at wavelength {wavelength}")]
    NonPhysical {
        /// The offending wavelength.
        wavelength: f64,
    },
}

/// Sellmeier dispersion model.
///
/// Evaluates `n² = A + Σᵢ Kᵢ·λ² / (λ² − Lᵢ)` over a fixed-size buffer of
/// `(K, L)` term pairs. The wavelength and the `L` coefficients must use the
/// same length unit (micrometres by glass-catalog convention).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sellmeier {
    constant: f64,
    terms: Vec<(f64, f64)>,
}

impl Sellmeier {
    /// A model with `term_count` zeroed terms and constant term 1.
    ///
    /// All-zero terms evaluate to vacuum (`n = 1`) until configured.
    pub fn new(term_count: usize) -> Self {
        Self {
            constant: 1.0,
            terms: vec![(0.0, 0.0); term_count],
        }
    }

    /// Set the additive constant term `A`.
    pub fn set_constant_term(&mut self, a: f64) {
        self.constant = a;
    }

    /// Set the `(K, L)` pair of term `index`.
    ///
    /// # Panics
    ///
    /// Panics when `index` is outside the term count chosen at construction;
    /// the buffer is fixed-size and an out-of-range index is a caller bug.
    pub fn set_term(&mut self, index: usize, k: f64, l: f64) {
        assert!(
            index < self.terms.len(),
            "dispersion term index {index} out of range ({} terms)",
            self.terms.len()
        );
        self.terms[index] = (k, l);
    }

    /// Number of configurable terms.
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Refractive index at `wavelength`.
    ///
    /// A wavelength sitting exactly on a resonance (`λ² = Lᵢ`) or driving
    /// `n²` negative is reported as an error rather than propagated as an
    /// infinity or NaN.
    pub fn refractive_index(&self, wavelength: f64) -> Result<f64, MaterialError> {
        let w2 = wavelength * wavelength;
        let mut n2 = self.constant;
        for &(k, l) in &self.terms {
            let denom = w2 - l;
            if denom == 0.0 {
                return Err(MaterialError::Resonance { wavelength });
            }
            n2 += k * w2 / denom;
        }
        if n2 < 0.0 {
            return Err(MaterialError::NonPhysical { wavelength });
        }
        Ok(n2.sqrt())
    }

    /// Schott N-BK7 borosilicate crown, wavelength in micrometres.
    pub fn bk7() -> Self {
        let mut m = Self::new(3);
        m.set_constant_term(1.0);
        m.set_term(0, 1.03961212, 0.00600069867);
        m.set_term(1, 0.231792344, 0.0200179144);
        m.set_term(2, 1.01046945, 103.560653);
        m
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconfigured_model_is_vacuum() {
        let m = Sellmeier::new(4);
        assert!((m.refractive_index(0.5876).unwrap() - 1.0).abs() < 1e-15);
    }

    #[test]
    fn test_bk7_spectral_lines() {
        // F, d, C lines against catalog values
        let m = Sellmeier::bk7();
        assert!((m.refractive_index(0.4861327).unwrap() - 1.522376289731).abs() < 1e-9);
        assert!((m.refractive_index(0.5875618).unwrap() - 1.516800034501).abs() < 1e-9);
        assert!((m.refractive_index(0.6562725).unwrap() - 1.514322347261).abs() < 1e-9);
    }

    #[test]
    fn test_resonance_is_flagged() {
        // lambda^2 == L puts the denominator at exactly zero
        let mut m = Sellmeier::new(1);
        m.set_constant_term(0.0);
        m.set_term(0, 0.001, 100.0);
        assert_eq!(
            m.refractive_index(10.0),
            Err(MaterialError::Resonance { wavelength: 10.0 })
        );
    }

    #[test]
    fn test_negative_index_squared_is_flagged() {
        let mut m = Sellmeier::new(1);
        m.set_constant_term(0.0);
        // just past the resonance the term is large and negative
        m.set_term(0, 1.0, 100.0);
        assert_eq!(
            m.refractive_index(9.99),
            Err(MaterialError::NonPhysical { wavelength: 9.99 })
        );
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_term_index_bounds_checked() {
        let mut m = Sellmeier::new(2);
        m.set_term(2, 1.0, 1.0);
    }

    #[test]
    fn test_dispersion_is_monotonic_in_visible() {
        // Normal dispersion: shorter wavelengths refract more
        let m = Sellmeier::bk7();
        let blue = m.refractive_index(0.45).unwrap();
        let green = m.refractive_index(0.55).unwrap();
        let red = m.refractive_index(0.65).unwrap();
        assert!(blue > green && green > red);
    }
}
