//! Beam2D - planar Euler-Bernoulli frame element (3 DOF per node)

use log::trace;

use super::node::Node2D;
use super::section::Section2D;
use super::shape::Shape;
use super::FrameElement;
use crate::error::{FrameError, FrameResult};
use crate::math::{self, Mat, Mat6, Vec as FEVec, Vec6};

/// A 2D frame element between two nodes
///
/// Length and orientation are fixed at construction. The stiffness (and,
/// with a density, mass) matrices are cached and re-derived every time the
/// section changes.
#[derive(Debug, Clone)]
pub struct Beam2D {
    nodes: [usize; 2],
    section: Section2D,
    length: f64,
    phi: f64,
    transformation: Mat6,
    k_local: Mat6,
    k_global: Mat6,
    m_local: Option<Mat6>,
}

impl Beam2D {
    /// Create a new element
    ///
    /// # Arguments
    /// * `nodes` - 0-based indices of the start and end node in the frame
    /// * `start`, `end` - Positions of those nodes
    /// * `section` - Cross-section of the element
    pub fn new(nodes: [usize; 2], start: &Node2D, end: &Node2D, section: Section2D) -> FrameResult<Self> {
        let length = start.distance_to(end);
        if !length.is_finite() || length < 1e-10 {
            return Err(FrameError::InvalidGeometry(format!(
                "element between nodes {} and {} has zero or non-finite length",
                nodes[0] + 1,
                nodes[1] + 1
            )));
        }
        let phi = start.angle_to(end);

        let mut beam = Self {
            nodes,
            section,
            length,
            phi,
            transformation: math::beam2d_transformation_matrix(phi),
            k_local: Mat6::zeros(),
            k_global: Mat6::zeros(),
            m_local: None,
        };
        beam.update();
        Ok(beam)
    }

    /// Re-derive the element matrices from the current section
    pub fn update(&mut self) {
        let e = self.section.material().e;
        let props = self.section.shape().properties();

        self.k_local = math::beam2d_local_stiffness(e, props.area, props.inertia, self.length);
        self.k_global = self.transformation.transpose() * self.k_local * self.transformation;
        self.m_local = self
            .section
            .material()
            .rho
            .map(|rho| math::beam2d_consistent_mass(rho, props.area, self.length));

        trace!(
            "beam {}-{}: A={:.6e} I={:.6e}",
            self.nodes[0] + 1,
            self.nodes[1] + 1,
            props.area,
            props.inertia
        );
    }

    /// Update the shape parameters and re-derive the element matrices
    pub fn update_shape_params(&mut self, params: &[(&str, f64)]) -> FrameResult<()> {
        self.section.update_shape_params(params)?;
        self.update();
        Ok(())
    }

    /// Cross-section of the element
    pub fn section(&self) -> &Section2D {
        &self.section
    }

    /// Angle of the element axis from global +X (radians)
    pub fn phi(&self) -> f64 {
        self.phi
    }

    /// Global-to-local transformation matrix
    pub fn transformation(&self) -> &Mat6 {
        &self.transformation
    }

    /// Local stiffness matrix
    pub fn k_local(&self) -> &Mat6 {
        &self.k_local
    }

    /// Global stiffness matrix, T^T * K_local * T
    pub fn k_global(&self) -> &Mat6 {
        &self.k_global
    }

    /// Local consistent mass matrix, present when the material has a density
    pub fn m_local(&self) -> Option<&Mat6> {
        self.m_local.as_ref()
    }

    /// Global consistent mass matrix, T^T * M_local * T
    pub fn m_global(&self) -> Option<Mat6> {
        self.m_local
            .map(|m| self.transformation.transpose() * m * self.transformation)
    }

    /// Local end forces [N1, V1, M1, N2, V2, M2] from global displacements
    pub fn end_forces(&self, u_global: &Vec6) -> Vec6 {
        self.k_local * (self.transformation * u_global)
    }

    /// Axial plus extreme-fibre bending stress for the given local end forces
    pub fn stress(&self, f_local: &Vec6) -> f64 {
        let props = self.section.shape().properties();
        let axial = (f_local[0] / props.area).abs();
        let bending = (f_local[2] * props.y_max / props.inertia)
            .abs()
            .max((f_local[5] * props.y_max / props.inertia).abs());
        axial + bending
    }
}

impl FrameElement for Beam2D {
    type Node = Node2D;

    const NODE_DOFS: usize = 3;
    const TRANSLATION_DOFS: usize = 2;

    fn node_indices(&self) -> [usize; 2] {
        self.nodes
    }

    fn length(&self) -> f64 {
        self.length
    }

    fn area(&self) -> f64 {
        self.section.shape().area()
    }

    fn linear_density(&self) -> FrameResult<f64> {
        self.section.linear_density()
    }

    fn global_stiffness(&self) -> Mat {
        Mat::from_column_slice(6, 6, self.k_global.as_slice())
    }

    fn local_forces(&self, u_global: &FEVec) -> FEVec {
        let f = self.end_forces(&Vec6::from_column_slice(u_global.as_slice()));
        FEVec::from_column_slice(f.as_slice())
    }

    fn governing_stress(&self, f_local: &FEVec) -> f64 {
        self.stress(&Vec6::from_column_slice(f_local.as_slice()))
    }

    fn update_shape_params(&mut self, params: &[(&str, f64)]) -> FrameResult<()> {
        Beam2D::update_shape_params(self, params)
    }
}
