//! Structural elements module

mod beam2d;
mod beam3d;
mod material;
mod node;
mod section;
mod shape;

pub use beam2d::Beam2D;
pub use beam3d::Beam3D;
pub use material::Material;
pub use node::{Node2D, Node3D};
pub use section::{Section, Section2D, Section3D};
pub use shape::{PlaneProperties, Profile2D, Profile3D, Shape, Shape2D, Shape3D, SpaceProperties};

use crate::error::FrameResult;
use crate::math::{Mat, Vec as FEVec};

/// Interface the frame assembler needs from a two-node beam element
pub trait FrameElement {
    /// Node type the element is built from
    type Node: Copy + std::fmt::Debug;

    /// Degrees of freedom per node
    const NODE_DOFS: usize;

    /// Leading translational DOFs per node
    const TRANSLATION_DOFS: usize;

    /// 0-based indices of the start and end node
    fn node_indices(&self) -> [usize; 2];

    /// Element length
    fn length(&self) -> f64;

    /// Cross-sectional area
    fn area(&self) -> f64;

    /// Mass per unit length of the section
    fn linear_density(&self) -> FrameResult<f64>;

    /// Stiffness matrix in global coordinates
    fn global_stiffness(&self) -> Mat;

    /// End forces in local coordinates from the element's global displacements
    fn local_forces(&self, u_global: &FEVec) -> FEVec;

    /// Governing combined stress for the given local end forces
    fn governing_stress(&self, f_local: &FEVec) -> f64;

    /// Update the shape parameters and re-derive the element matrices
    fn update_shape_params(&mut self, params: &[(&str, f64)]) -> FrameResult<()>;

    /// Global DOF indices of the element, start node first
    fn dofs(&self) -> Vec<usize> {
        let d = Self::NODE_DOFS;
        self.node_indices()
            .iter()
            .flat_map(|&n| (d * n)..(d * n + d))
            .collect()
    }

    /// Element weight, rho * A * L
    fn weight(&self) -> FrameResult<f64> {
        Ok(self.linear_density()? * self.length())
    }
}
