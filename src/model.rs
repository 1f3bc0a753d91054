//! Frame model - the direct stiffness assembler and solver
//!
//! Node and element ids in the public API are 1-based, in insertion order.

use std::collections::BTreeSet;

use log::{debug, info, warn};

use crate::analysis::{AnalysisOptions, DEFAULT_TOLERANCE, SYMMETRY_TOLERANCE};
use crate::elements::{Beam2D, Beam3D, FrameElement, Node2D, Node3D, Section2D, Section3D};
use crate::error::{FrameError, FrameResult};
use crate::math::{self, Mat, Vec as FEVec, Vec3};
use crate::results::{AnalysisResults, AnalysisSummary};

/// A frame structure built from two-node beam elements
#[derive(Debug, Clone)]
pub struct Frame<E: FrameElement> {
    nodes: Vec<E::Node>,
    elements: Vec<E>,
    loads: FEVec,
    fixed_dofs: BTreeSet<usize>,
}

/// Planar frame, 3 DOF per node (u, v, θ)
pub type Frame2D = Frame<Beam2D>;
/// Spatial frame, 6 DOF per node (ux, uy, uz, θx, θy, θz)
pub type Frame3D = Frame<Beam3D>;

impl<E: FrameElement> Default for Frame<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: FrameElement> Frame<E> {
    /// Create a new empty frame
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            elements: Vec::new(),
            loads: FEVec::zeros(0),
            fixed_dofs: BTreeSet::new(),
        }
    }

    // ========================
    // Accessors
    // ========================

    /// Nodes in insertion order
    pub fn nodes(&self) -> &[E::Node] {
        &self.nodes
    }

    /// Elements in insertion order
    pub fn elements(&self) -> &[E] {
        &self.elements
    }

    /// Element by 1-based id
    pub fn element(&self, element_id: usize) -> FrameResult<&E> {
        element_id
            .checked_sub(1)
            .and_then(|i| self.elements.get(i))
            .ok_or(FrameError::ElementNotFound(element_id))
    }

    /// Global load vector
    pub fn loads(&self) -> &FEVec {
        &self.loads
    }

    /// Restrained global DOF indices
    pub fn fixed_dofs(&self) -> &BTreeSet<usize> {
        &self.fixed_dofs
    }

    /// Number of DOFs in the whole system
    pub fn total_dofs(&self) -> usize {
        self.nodes.len() * E::NODE_DOFS
    }

    /// Unrestrained global DOF indices, ascending
    pub fn free_dofs(&self) -> Vec<usize> {
        (0..self.total_dofs())
            .filter(|dof| !self.fixed_dofs.contains(dof))
            .collect()
    }

    // ========================
    // Model Building Methods
    // ========================

    fn push_node(&mut self, node: E::Node) -> usize {
        self.nodes.push(node);
        let total = self.total_dofs();
        self.loads.resize_vertically_mut(total, 0.0);
        self.nodes.len()
    }

    fn node_index(&self, node_id: usize) -> FrameResult<usize> {
        match node_id.checked_sub(1) {
            Some(i) if i < self.nodes.len() => Ok(i),
            _ => Err(FrameError::NodeNotFound(node_id)),
        }
    }

    fn push_element<F>(&mut self, node1_id: usize, node2_id: usize, build: F) -> FrameResult<usize>
    where
        F: FnOnce([usize; 2], &E::Node, &E::Node) -> FrameResult<E>,
    {
        let element = self
            .node_index(node1_id)
            .and_then(|i| Ok([i, self.node_index(node2_id)?]))
            .and_then(|[i, j]| build([i, j], &self.nodes[i], &self.nodes[j]));

        match element {
            Ok(element) => {
                self.elements.push(element);
                Ok(self.elements.len())
            }
            Err(e) => {
                warn!("Skipping element ({}, {}): {}", node1_id, node2_id, e);
                Err(e)
            }
        }
    }

    /// Overwrite the load entries of a node starting at `offset`
    fn set_node_loads(&mut self, node_id: usize, offset: usize, values: &[f64]) -> FrameResult<()> {
        let base = self.node_index(node_id)? * E::NODE_DOFS + offset;
        for (k, &value) in values.iter().enumerate() {
            self.loads[base + k] = value;
        }
        Ok(())
    }

    fn restrain(&mut self, node_ids: &[usize], count: usize) -> FrameResult<()> {
        let indices = node_ids
            .iter()
            .map(|&id| self.node_index(id))
            .collect::<FrameResult<Vec<_>>>()?;
        for i in indices {
            let base = i * E::NODE_DOFS;
            self.fixed_dofs.extend(base..base + count);
        }
        Ok(())
    }

    /// Restrain every DOF of the given nodes
    pub fn add_fixed_sup(&mut self, node_ids: &[usize]) -> FrameResult<()> {
        self.restrain(node_ids, E::NODE_DOFS)
    }

    /// Restrain the translational DOFs of the given nodes, leaving rotations free
    pub fn add_simple_sup(&mut self, node_ids: &[usize]) -> FrameResult<()> {
        self.restrain(node_ids, E::TRANSLATION_DOFS)
    }

    /// Update the shape parameters of one element (1-based id)
    pub fn update_shape_params(&mut self, element_id: usize, params: &[(&str, f64)]) -> FrameResult<()> {
        let element = element_id
            .checked_sub(1)
            .and_then(|i| self.elements.get_mut(i))
            .ok_or(FrameError::ElementNotFound(element_id))?;
        element.update_shape_params(params)
    }

    // ========================
    // Assembly and Solution
    // ========================

    /// Assemble the dense global stiffness matrix
    pub fn assemble_global_stiffness(&self) -> Mat {
        let n = self.total_dofs();
        let mut k = Mat::zeros(n, n);
        for element in &self.elements {
            math::scatter_add(&mut k, &element.dofs(), &element.global_stiffness());
        }
        debug!(
            "Assembled {}x{} stiffness from {} elements",
            n,
            n,
            self.elements.len()
        );
        k
    }

    /// Solve for the global displacement vector
    ///
    /// Entries with magnitude below `tolerance` are set to zero; fixed DOFs
    /// are zero.
    pub fn solve_disp(&self, tolerance: f64) -> FrameResult<FEVec> {
        self.displacements(&self.assemble_global_stiffness(), tolerance)
    }

    /// Solve for the reaction vector R = K * U - F
    ///
    /// U is solved with `DEFAULT_TOLERANCE`; `tolerance` applies to R only.
    pub fn solve_reaction(&self, tolerance: f64) -> FrameResult<FEVec> {
        let k = self.assemble_global_stiffness();
        let u = self.displacements(&k, DEFAULT_TOLERANCE)?;
        Ok(self.reactions(&k, &u, tolerance))
    }

    /// Local end forces of every element, in element order
    pub fn recover_element_local_forces(&self) -> FrameResult<Vec<FEVec>> {
        let u = self.solve_disp(DEFAULT_TOLERANCE)?;
        Ok(self.element_forces(&u))
    }

    /// Governing stress of every element, in element order
    pub fn element_stresses(&self) -> FrameResult<Vec<f64>> {
        let forces = self.recover_element_local_forces()?;
        Ok(self.stresses(&forces))
    }

    /// Maximum governing stress across all elements
    pub fn max_stress(&self) -> FrameResult<f64> {
        if self.elements.is_empty() {
            return Err(FrameError::EmptyModel);
        }
        Ok(self.element_stresses()?.into_iter().fold(0.0, f64::max))
    }

    /// Total weight, sum of rho * A * L over all elements
    pub fn structural_weight(&self) -> FrameResult<f64> {
        self.elements.iter().map(|e| e.weight()).sum()
    }

    /// Run a full linear static analysis
    pub fn analyze(&self, options: &AnalysisOptions) -> FrameResult<AnalysisResults> {
        if self.elements.is_empty() {
            return Err(FrameError::EmptyModel);
        }

        let k = self.assemble_global_stiffness();
        if options.check_symmetry && !math::is_symmetric(&k, SYMMETRY_TOLERANCE) {
            return Err(FrameError::AsymmetricStiffness);
        }

        let u = self.displacements(&k, options.tolerance)?;
        let r = self.reactions(&k, &u, options.reaction_tolerance);
        let forces = self.element_forces(&u);
        let stresses = self.stresses(&forces);
        let summary = self.summarize(&u, &r, &stresses);

        if options.log {
            info!(
                "Analysis complete: {} nodes, {} elements, {} free DOFs",
                summary.num_nodes, summary.num_elements, summary.free_dofs
            );
            info!(
                "Max displacement {:.6e} at node {}, max stress {:.6e} in element {}",
                summary.max_displacement,
                summary.max_disp_node,
                summary.max_stress,
                summary.max_stress_element
            );
        }

        Ok(AnalysisResults {
            node_dofs: E::NODE_DOFS,
            displacements: u.iter().copied().collect(),
            reactions: r.iter().copied().collect(),
            element_forces: forces.iter().map(|f| f.iter().copied().collect()).collect(),
            element_stresses: stresses,
            max_stress: summary.max_stress,
            summary,
        })
    }

    /// Analyze with default options and return the summary only
    pub fn summary(&self) -> FrameResult<AnalysisSummary> {
        Ok(self.analyze(&AnalysisOptions::default())?.summary)
    }

    fn displacements(&self, k: &Mat, tolerance: f64) -> FrameResult<FEVec> {
        let n = self.total_dofs();
        let free = self.free_dofs();
        let mut u = FEVec::zeros(n);
        if free.is_empty() {
            return Ok(u);
        }

        let k_ff = k.select_rows(&free).select_columns(&free);
        let f_f = FEVec::from_iterator(free.len(), free.iter().map(|&i| self.loads[i]));
        debug!("Solving {} free of {} DOFs", free.len(), n);

        let mut u_f = math::solve_linear_system(&k_ff, &f_f).ok_or(FrameError::SingularMatrix)?;
        math::snap_to_zero(&mut u_f, tolerance);

        for (i, &dof) in free.iter().enumerate() {
            u[dof] = u_f[i];
        }
        Ok(u)
    }

    fn reactions(&self, k: &Mat, u: &FEVec, tolerance: f64) -> FEVec {
        let mut r = k * u - &self.loads;
        math::snap_to_zero(&mut r, tolerance);
        r
    }

    fn element_forces(&self, u: &FEVec) -> Vec<FEVec> {
        self.elements
            .iter()
            .map(|element| {
                let dofs = element.dofs();
                let u_e = FEVec::from_iterator(dofs.len(), dofs.iter().map(|&d| u[d]));
                element.local_forces(&u_e)
            })
            .collect()
    }

    fn stresses(&self, forces: &[FEVec]) -> Vec<f64> {
        self.elements
            .iter()
            .zip(forces)
            .map(|(element, f)| element.governing_stress(f))
            .collect()
    }

    fn summarize(&self, u: &FEVec, r: &FEVec, stresses: &[f64]) -> AnalysisSummary {
        let total_dofs = self.total_dofs();
        let mut summary = AnalysisSummary {
            num_nodes: self.nodes.len(),
            num_elements: self.elements.len(),
            total_dofs,
            free_dofs: total_dofs - self.fixed_dofs.len(),
            weight: self.structural_weight().ok(),
            ..Default::default()
        };

        let translation = |v: &FEVec, i: usize| {
            let base = i * E::NODE_DOFS;
            v.rows(base, E::TRANSLATION_DOFS).norm()
        };

        for i in 0..self.nodes.len() {
            let disp = translation(u, i);
            if disp > summary.max_displacement {
                summary.max_displacement = disp;
                summary.max_disp_node = i + 1;
            }
            let rxn = translation(r, i);
            if rxn > summary.max_reaction {
                summary.max_reaction = rxn;
                summary.max_reaction_node = i + 1;
            }
        }

        for (i, &stress) in stresses.iter().enumerate() {
            if stress > summary.max_stress {
                summary.max_stress = stress;
                summary.max_stress_element = i + 1;
            }
        }

        summary
    }
}

impl Frame2D {
    /// Add a node, returning its 1-based id
    pub fn add_node(&mut self, x: f64, y: f64) -> usize {
        self.push_node(Node2D::new(x, y))
    }

    /// Add an element between two nodes, returning its 1-based id
    ///
    /// The element gets its own copy of `section`, so later shape updates
    /// affect this element only.
    pub fn add_element(&mut self, node1_id: usize, node2_id: usize, section: &Section2D) -> FrameResult<usize> {
        self.push_element(node1_id, node2_id, |nodes, start, end| {
            Beam2D::new(nodes, start, end, section.clone())
        })
    }

    /// Set the force acting on a node
    pub fn add_single_force(&mut self, node_id: usize, fx: f64, fy: f64) -> FrameResult<()> {
        self.set_node_loads(node_id, 0, &[fx, fy])
    }

    /// Set the moment acting on a node
    pub fn add_single_moment(&mut self, node_id: usize, m: f64) -> FrameResult<()> {
        self.set_node_loads(node_id, 2, &[m])
    }

    /// Assemble the dense global consistent mass matrix
    pub fn assemble_global_mass(&self) -> FrameResult<Mat> {
        let n = self.total_dofs();
        let mut m = Mat::zeros(n, n);
        for element in &self.elements {
            let m_e = element.m_global().ok_or(FrameError::MissingProperty("density"))?;
            math::scatter_add(&mut m, &element.dofs(), &Mat::from_column_slice(6, 6, m_e.as_slice()));
        }
        Ok(m)
    }
}

impl Frame3D {
    /// Add a node, returning its 1-based id
    pub fn add_node(&mut self, x: f64, y: f64, z: f64) -> usize {
        self.push_node(Node3D::new(x, y, z))
    }

    /// Add an element between two nodes, returning its 1-based id
    ///
    /// `reference` fixes the element's n1 direction and must not be parallel
    /// to the element axis.
    pub fn add_element(
        &mut self,
        node1_id: usize,
        node2_id: usize,
        reference: [f64; 3],
        section: &Section3D,
    ) -> FrameResult<usize> {
        self.push_element(node1_id, node2_id, |nodes, start, end| {
            Beam3D::new(nodes, start, end, Vec3::from(reference), section.clone())
        })
    }

    /// Set the force acting on a node
    pub fn add_single_force(&mut self, node_id: usize, fx: f64, fy: f64, fz: f64) -> FrameResult<()> {
        self.set_node_loads(node_id, 0, &[fx, fy, fz])
    }

    /// Set the moment acting on a node
    pub fn add_single_moment(&mut self, node_id: usize, mx: f64, my: f64, mz: f64) -> FrameResult<()> {
        self.set_node_loads(node_id, 3, &[mx, my, mz])
    }
}
