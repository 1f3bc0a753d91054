//! Frame Solver - direct stiffness analysis of beam frames
//!
//! This library assembles and solves linear static models of frames built
//! from Euler-Bernoulli beam elements:
//! - 2D frames (3 DOF per node) and 3D frames (6 DOF per node)
//! - Parametric cross-sections (circle, rectangle, box, generalized)
//! - Displacements, reactions, local element forces and combined stresses
//! - Cheap re-solves after a cross-section update, for sizing loops
//!
//! ## Example
//! ```rust
//! use std::rc::Rc;
//! use frame_solver::prelude::*;
//!
//! let steel = Rc::new(Material::new(210e9).with_density(7850.0));
//! let section = Section2D::new(steel, Shape2D::circle(0.05).unwrap());
//!
//! let mut frame = Frame2D::new();
//! frame.add_node(0.0, 0.0);
//! frame.add_node(3.0, 0.0);
//! frame.add_element(1, 2, &section).unwrap();
//! frame.add_fixed_sup(&[1]).unwrap();
//! frame.add_single_force(2, 0.0, -2000.0).unwrap();
//!
//! let u = frame.solve_disp(DEFAULT_TOLERANCE).unwrap();
//! assert!(u[4] < 0.0);
//!
//! // Resize the element and solve again
//! let before = frame.max_stress().unwrap();
//! frame.update_shape_params(1, &[("R", 0.08)]).unwrap();
//! assert!(frame.max_stress().unwrap() < before);
//! ```

pub mod analysis;
pub mod elements;
pub mod error;
pub mod math;
pub mod model;
pub mod results;

// Re-export common types
pub mod prelude {
    pub use crate::analysis::{AnalysisOptions, DEFAULT_TOLERANCE};
    pub use crate::elements::{
        Beam2D, Beam3D, FrameElement, Material, Node2D, Node3D, Profile2D, Profile3D, Section,
        Section2D, Section3D, Shape, Shape2D, Shape3D,
    };
    pub use crate::error::{FrameError, FrameResult};
    pub use crate::model::{Frame, Frame2D, Frame3D};
    pub use crate::results::{AnalysisResults, AnalysisSummary, ElementForces2D, ElementForces3D};
}
