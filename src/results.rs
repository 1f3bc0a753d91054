//! Result types for frame analysis

use serde::{Deserialize, Serialize};

/// Internal forces at one end of a 2D element, local axes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementForces2D {
    /// Axial force (positive = tension)
    pub axial: f64,
    /// Shear force along the local y axis
    pub shear: f64,
    /// Bending moment
    pub moment: f64,
}

impl ElementForces2D {
    /// Create from the local end force vector [N1, V1, M1, N2, V2, M2], start node
    pub fn from_start_forces(forces: &[f64]) -> Self {
        Self {
            axial: -forces[0],
            shear: forces[1],
            moment: forces[2],
        }
    }

    /// Create from the local end force vector, end node
    pub fn from_end_forces(forces: &[f64]) -> Self {
        Self {
            axial: forces[3],
            shear: -forces[4],
            moment: forces[5],
        }
    }
}

/// Internal forces at one end of a 3D element, local (t, n1, n2) axes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementForces3D {
    /// Axial force (positive = tension)
    pub axial: f64,
    /// Shear force along n1
    pub shear_n1: f64,
    /// Shear force along n2
    pub shear_n2: f64,
    /// Torsion
    pub torsion: f64,
    /// Bending moment about n1
    pub moment_n1: f64,
    /// Bending moment about n2
    pub moment_n2: f64,
}

impl ElementForces3D {
    /// Create from the 12-entry local end force vector, start node
    pub fn from_start_forces(forces: &[f64]) -> Self {
        Self {
            axial: -forces[0],
            shear_n1: forces[1],
            shear_n2: forces[2],
            torsion: -forces[3],
            moment_n1: forces[4],
            moment_n2: forces[5],
        }
    }

    /// Create from the 12-entry local end force vector, end node
    pub fn from_end_forces(forces: &[f64]) -> Self {
        Self {
            axial: forces[6],
            shear_n1: -forces[7],
            shear_n2: -forces[8],
            torsion: forces[9],
            moment_n1: forces[10],
            moment_n2: forces[11],
        }
    }
}

/// Summary of analysis results
///
/// Node and element ids are 1-based; 0 means none was found (no
/// displacement, no reaction or no elements).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Maximum translation magnitude
    pub max_displacement: f64,
    /// Node with maximum translation
    pub max_disp_node: usize,
    /// Maximum reaction force magnitude
    pub max_reaction: f64,
    /// Node with maximum reaction force
    pub max_reaction_node: usize,
    /// Maximum governing element stress
    pub max_stress: f64,
    /// Element with maximum stress
    pub max_stress_element: usize,
    /// Total number of nodes
    pub num_nodes: usize,
    /// Total number of elements
    pub num_elements: usize,
    /// Total DOFs
    pub total_dofs: usize,
    /// Free DOFs (unknown)
    pub free_dofs: usize,
    /// Structural weight, when every material has a density
    pub weight: Option<f64>,
}

/// Full result set of one linear static solve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResults {
    /// DOFs per node (3 for 2D frames, 6 for 3D frames)
    pub node_dofs: usize,
    /// Global displacement vector
    pub displacements: Vec<f64>,
    /// Global reaction vector, K * U - F
    pub reactions: Vec<f64>,
    /// Local end forces per element
    pub element_forces: Vec<Vec<f64>>,
    /// Governing stress per element
    pub element_stresses: Vec<f64>,
    /// Maximum governing stress across all elements
    pub max_stress: f64,
    /// Aggregate figures
    pub summary: AnalysisSummary,
}

impl AnalysisResults {
    /// Displacements of a node (1-based id)
    pub fn node_displacement(&self, node_id: usize) -> Option<&[f64]> {
        self.node_slice(&self.displacements, node_id)
    }

    /// Reactions at a node (1-based id)
    pub fn node_reactions(&self, node_id: usize) -> Option<&[f64]> {
        self.node_slice(&self.reactions, node_id)
    }

    /// Start and end forces of a 2D element (1-based id)
    pub fn forces_2d(&self, element_id: usize) -> Option<[ElementForces2D; 2]> {
        let forces = self.local_forces(element_id, 3)?;
        Some([
            ElementForces2D::from_start_forces(forces),
            ElementForces2D::from_end_forces(forces),
        ])
    }

    /// Start and end forces of a 3D element (1-based id)
    pub fn forces_3d(&self, element_id: usize) -> Option<[ElementForces3D; 2]> {
        let forces = self.local_forces(element_id, 6)?;
        Some([
            ElementForces3D::from_start_forces(forces),
            ElementForces3D::from_end_forces(forces),
        ])
    }

    /// Serialize to a JSON string
    pub fn to_json(&self) -> crate::error::FrameResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn node_slice<'a>(&self, values: &'a [f64], node_id: usize) -> Option<&'a [f64]> {
        let start = node_id.checked_sub(1)? * self.node_dofs;
        values.get(start..start + self.node_dofs)
    }

    fn local_forces(&self, element_id: usize, node_dofs: usize) -> Option<&[f64]> {
        if self.node_dofs != node_dofs {
            return None;
        }
        self.element_forces
            .get(element_id.checked_sub(1)?)
            .map(Vec::as_slice)
    }
}
