//! Beam3D - spatial Euler-Bernoulli frame element (6 DOF per node)

use log::trace;

use super::node::Node3D;
use super::section::Section3D;
use super::shape::Shape;
use super::FrameElement;
use crate::error::FrameResult;
use crate::math::{self, Mat, Mat12, Mat3, Vec as FEVec, Vec12, Vec3};

/// A 3D frame element between two nodes
///
/// The local triad is (t, n1, n2): t runs from the start to the end node,
/// n1 is the user reference vector made orthogonal to t, and n2 = t × n1.
#[derive(Debug, Clone)]
pub struct Beam3D {
    nodes: [usize; 2],
    section: Section3D,
    length: f64,
    shear_modulus: f64,
    rotation: Mat3,
    transformation: Mat12,
    k_local: Mat12,
    k_global: Mat12,
}

impl Beam3D {
    /// Create a new element
    ///
    /// # Arguments
    /// * `nodes` - 0-based indices of the start and end node in the frame
    /// * `start`, `end` - Positions of those nodes
    /// * `reference` - Vector fixing the n1 bending direction; must not be
    ///   parallel to the element axis
    /// * `section` - Cross-section; its material needs a Poisson ratio
    pub fn new(
        nodes: [usize; 2],
        start: &Node3D,
        end: &Node3D,
        reference: Vec3,
        section: Section3D,
    ) -> FrameResult<Self> {
        let axis = end.coords() - start.coords();
        let rotation = math::local_triad(&axis, &reference)?;
        let shear_modulus = section.material().shear_modulus()?;

        let mut beam = Self {
            nodes,
            section,
            length: axis.norm(),
            shear_modulus,
            rotation,
            transformation: math::beam3d_transformation_matrix(&rotation),
            k_local: Mat12::zeros(),
            k_global: Mat12::zeros(),
        };
        beam.update();
        Ok(beam)
    }

    /// Re-derive the element matrices from the current section
    pub fn update(&mut self) {
        let e = self.section.material().e;
        let props = self.section.shape().properties();

        self.k_local = math::beam3d_local_stiffness(
            e,
            self.shear_modulus,
            props.area,
            props.i1,
            props.i2,
            props.j,
            self.length,
        );
        self.k_global = self.transformation.transpose() * self.k_local * self.transformation;

        trace!(
            "beam {}-{}: A={:.6e} I1={:.6e} I2={:.6e} J={:.6e}",
            self.nodes[0] + 1,
            self.nodes[1] + 1,
            props.area,
            props.i1,
            props.i2,
            props.j
        );
    }

    /// Update the shape parameters and re-derive the element matrices
    pub fn update_shape_params(&mut self, params: &[(&str, f64)]) -> FrameResult<()> {
        self.section.update_shape_params(params)?;
        self.update();
        Ok(())
    }

    /// Cross-section of the element
    pub fn section(&self) -> &Section3D {
        &self.section
    }

    /// Direction cosine matrix with rows t, n1, n2
    pub fn rotation(&self) -> &Mat3 {
        &self.rotation
    }

    /// Unit axis t
    pub fn axis(&self) -> Vec3 {
        self.rotation.row(0).transpose()
    }

    /// Local n1 direction
    pub fn n1(&self) -> Vec3 {
        self.rotation.row(1).transpose()
    }

    /// Local n2 direction
    pub fn n2(&self) -> Vec3 {
        self.rotation.row(2).transpose()
    }

    /// Global-to-local transformation matrix
    pub fn transformation(&self) -> &Mat12 {
        &self.transformation
    }

    /// Local stiffness matrix
    pub fn k_local(&self) -> &Mat12 {
        &self.k_local
    }

    /// Global stiffness matrix, T^T * K_local * T
    pub fn k_global(&self) -> &Mat12 {
        &self.k_global
    }

    /// Local end forces from global displacements
    ///
    /// Order per node: [N, V1, V2, T, M_n1, M_n2]
    pub fn end_forces(&self, u_global: &Vec12) -> Vec12 {
        self.k_local * (self.transformation * u_global)
    }

    /// Axial plus biaxial extreme-fibre bending stress, worst end
    pub fn stress(&self, f_local: &Vec12) -> f64 {
        let props = self.section.shape().properties();
        let (c1, c2) = self.section.shape().fibre_distances();
        let axial = (f_local[0] / props.area).abs();
        let bending = [(4, 5), (10, 11)]
            .iter()
            .map(|&(about_n1, about_n2)| {
                (f_local[about_n2] * c1 / props.i1).abs() + (f_local[about_n1] * c2 / props.i2).abs()
            })
            .fold(0.0, f64::max);
        axial + bending
    }
}

impl FrameElement for Beam3D {
    type Node = Node3D;

    const NODE_DOFS: usize = 6;
    const TRANSLATION_DOFS: usize = 3;

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
        Mat::from_column_slice(12, 12, self.k_global.as_slice())
    }

    fn local_forces(&self, u_global: &FEVec) -> FEVec {
        let f = self.end_forces(&Vec12::from_column_slice(u_global.as_slice()));
        FEVec::from_column_slice(f.as_slice())
    }

    fn governing_stress(&self, f_local: &FEVec) -> f64 {
        self.stress(&Vec12::from_column_slice(f_local.as_slice()))
    }

    fn update_shape_params(&mut self, params: &[(&str, f64)]) -> FrameResult<()> {
        Beam3D::update_shape_params(self, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Material, Shape3D};
    use crate::error::FrameError;
    use approx::assert_relative_eq;
    use std::rc::Rc;

    fn section() -> Section3D {
        Section3D::new(Rc::new(Material::steel()), Shape3D::rectangle(0.1, 0.2).unwrap())
    }

    #[test]
    fn test_triad_is_orthonormal() {
        let start = Node3D::new(1.0, -2.0, 0.5);
        let references = [
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(-3.0, 0.2, 7.0),
        ];
        for end in [Node3D::new(4.0, 2.0, -1.0), Node3D::new(1.0, -2.0, 9.0), Node3D::new(0.0, 0.0, 0.0)] {
            for reference in references {
                let beam = match Beam3D::new([0, 1], &start, &end, reference, section()) {
                    Ok(beam) => beam,
                    Err(FrameError::DegenerateOrientation) => continue,
                    Err(e) => panic!("unexpected error: {e}"),
                };
                let (t, n1, n2) = (beam.axis(), beam.n1(), beam.n2());
                for v in [t, n1, n2] {
                    assert_relative_eq!(v.norm(), 1.0, epsilon = 1e-12);
                }
                assert_relative_eq!(t.dot(&n1), 0.0, epsilon = 1e-12);
                assert_relative_eq!(t.dot(&n2), 0.0, epsilon = 1e-12);
                assert_relative_eq!(n1.dot(&n2), 0.0, epsilon = 1e-12);
                assert_relative_eq!(t.cross(&n1), n2, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_reference_is_orthogonalized() {
        let beam = Beam3D::new(
            [0, 1],
            &Node3D::new(0.0, 0.0, 0.0),
            &Node3D::new(2.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            section(),
        )
        .unwrap();
        assert_relative_eq!(beam.n1(), Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(beam.n2(), Vec3::new(0.0, 0.0, 1.0), epsilon = 1e-12);
    }

    #[test]
    fn test_parallel_reference_rejected() {
        let result = Beam3D::new(
            [0, 1],
            &Node3D::new(0.0, 0.0, 0.0),
            &Node3D::new(0.0, 0.0, 3.0),
            Vec3::new(0.0, 0.0, -1.0),
            section(),
        );
        assert!(matches!(result, Err(FrameError::DegenerateOrientation)));
    }

    #[test]
    fn test_missing_poisson_ratio_rejected() {
        let section = Section3D::new(Rc::new(Material::new(210e9)), Shape3D::circle(0.05).unwrap());
        let result = Beam3D::new(
            [0, 1],
            &Node3D::new(0.0, 0.0, 0.0),
            &Node3D::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            section,
        );
        assert!(matches!(result, Err(FrameError::MissingProperty(_))));
    }

    #[test]
    fn test_global_stiffness_symmetric_and_rigid_translation_free() {
        let beam = Beam3D::new(
            [0, 1],
            &Node3D::new(0.0, 1.0, 2.0),
            &Node3D::new(3.0, -1.0, 4.0),
            Vec3::new(0.0, 0.0, 1.0),
            section(),
        )
        .unwrap();
        let k = beam.k_global();
        assert_relative_eq!(*k, k.transpose(), max_relative = 1e-10, epsilon = 1e-3);

        let mut translation = Vec12::zeros();
        for node in 0..2 {
            translation[node * 6] = 0.3;
            translation[node * 6 + 1] = -0.7;
            translation[node * 6 + 2] = 0.2;
        }
        assert!((k * translation).amax() < 1e-6 * k.amax());
    }

    #[test]
    fn test_update_changes_stiffness() {
        let mut beam = Beam3D::new(
            [0, 1],
            &Node3D::new(0.0, 0.0, 0.0),
            &Node3D::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            section(),
        )
        .unwrap();
        beam.update_shape_params(&[("h", 0.4)]).unwrap();
        let e = 210e9;
        let i1 = 0.1 * 0.4_f64.powi(3) / 12.0;
        assert_relative_eq!(beam.k_local()[(1, 1)], 12.0 * e * i1 / 8.0, max_relative = 1e-12);
        assert_relative_eq!(beam.k_local()[(0, 0)], e * 0.04 / 2.0, max_relative = 1e-12);
    }

    #[test]
    fn test_biaxial_stress() {
        let beam = Beam3D::new(
            [0, 1],
            &Node3D::new(0.0, 0.0, 0.0),
            &Node3D::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            section(),
        )
        .unwrap();
        let props = beam.section().shape().properties();
        let mut f = Vec12::zeros();
        f[0] = 500.0;
        f[4] = 20.0;
        f[5] = -30.0;
        f[10] = 1.0;
        f[11] = 2.0;
        let expected = 500.0 / props.area + 30.0 * 0.1 / props.i1 + 20.0 * 0.05 / props.i2;
        assert_relative_eq!(beam.stress(&f), expected, max_relative = 1e-12);
    }
}
