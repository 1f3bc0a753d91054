//! Section: a material paired with a cross-section shape

use serde::{Deserialize, Serialize};
use std::rc::Rc;

use super::material::Material;
use super::shape::{Shape, Shape2D, Shape3D};
use crate::error::FrameResult;

/// Cross-section of a frame element
///
/// The material is shared and immutable; the shape is owned and is the only
/// part that changes, through [`Section::update_shape_params`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section<S> {
    material: Rc<Material>,
    shape: S,
}

/// Section of a 2D beam
pub type Section2D = Section<Shape2D>;
/// Section of a 3D beam
pub type Section3D = Section<Shape3D>;

impl<S: Shape> Section<S> {
    /// Create a section from a shared material and a shape
    pub fn new(material: Rc<Material>, shape: S) -> Self {
        Self { material, shape }
    }

    /// The section material
    pub fn material(&self) -> &Material {
        &self.material
    }

    /// The cross-section shape
    pub fn shape(&self) -> &S {
        &self.shape
    }

    /// Update shape parameters, recomputing the section properties
    pub fn update_shape_params(&mut self, params: &[(&str, f64)]) -> FrameResult<()> {
        self.shape.update(params)
    }

    /// Mass per unit length, rho * A
    pub fn linear_density(&self) -> FrameResult<f64> {
        Ok(self.material.density()? * self.shape.area())
    }
}
