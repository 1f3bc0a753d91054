//! Analysis options

use serde::{Deserialize, Serialize};

/// Absolute tolerance below which solved values are snapped to zero
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Relative tolerance used when checking the assembled stiffness for symmetry
pub const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// Options for a linear static frame analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Displacements with magnitude below this are set to 0
    pub tolerance: f64,
    /// Reactions with magnitude below this are set to 0 (force units)
    pub reaction_tolerance: f64,
    /// Verify the assembled stiffness matrix is symmetric before solving
    pub check_symmetry: bool,
    /// Enable logging/progress output
    pub log: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            reaction_tolerance: DEFAULT_TOLERANCE,
            check_symmetry: false,
            log: false,
        }
    }
}

impl AnalysisOptions {
    /// Create options for linear analysis
    pub fn linear() -> Self {
        Self::default()
    }

    /// Enable logging
    pub fn with_logging(mut self) -> Self {
        self.log = true;
        self
    }

    /// Set the displacement zero-snapping tolerance
    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    /// Set the reaction zero-snapping tolerance
    pub fn with_reaction_tolerance(mut self, tol: f64) -> Self {
        self.reaction_tolerance = tol;
        self
    }

    /// Enable the symmetry check on the assembled stiffness
    pub fn with_symmetry_check(mut self) -> Self {
        self.check_symmetry = true;
        self
    }
}
