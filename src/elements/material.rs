//! Material properties

use serde::{Deserialize, Serialize};

use crate::error::{FrameError, FrameResult};

/// Linear elastic material
///
/// Only the elastic modulus is always required. Poisson's ratio is needed
/// for the shear modulus (3D torsion) and density for mass and weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Modulus of elasticity (Young's modulus) in Pa
    pub e: f64,
    /// Poisson's ratio
    pub nu: Option<f64>,
    /// Density in kg/m³
    pub rho: Option<f64>,
}

impl Material {
    /// Create a material with only an elastic modulus
    pub fn new(e: f64) -> Self {
        Self {
            e,
            nu: None,
            rho: None,
        }
    }

    /// Create an isotropic material with all properties given
    pub fn isotropic(e: f64, nu: f64, rho: f64) -> Self {
        Self {
            e,
            nu: Some(nu),
            rho: Some(rho),
        }
    }

    /// Set Poisson's ratio
    pub fn with_poisson_ratio(mut self, nu: f64) -> Self {
        self.nu = Some(nu);
        self
    }

    /// Set density
    pub fn with_density(mut self, rho: f64) -> Self {
        self.rho = Some(rho);
        self
    }

    /// Structural steel
    pub fn steel() -> Self {
        Self::isotropic(210e9, 0.3, 7850.0)
    }

    /// Aluminium alloy (6061-T6)
    pub fn aluminum() -> Self {
        Self::isotropic(68.9e9, 0.33, 2700.0)
    }

    /// Shear modulus, G = E / (2 * (1 + nu))
    pub fn shear_modulus(&self) -> FrameResult<f64> {
        let nu = self.nu.ok_or(FrameError::MissingProperty("poisson ratio"))?;
        Ok(self.e / (2.0 * (1.0 + nu)))
    }

    /// Density, required for mass matrices and structural weight
    pub fn density(&self) -> FrameResult<f64> {
        self.rho.ok_or(FrameError::MissingProperty("density"))
    }
}
