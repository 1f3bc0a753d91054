//! Error types for the frame solver

use thiserror::Error;

/// Main error type for frame analysis operations
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("Node {0} does not exist in the frame")]
    NodeNotFound(usize),

    #[error("Element {0} does not exist in the frame")]
    ElementNotFound(usize),

    #[error("Unknown parameter '{key}' for {shape} shape")]
    UnknownParameter { shape: &'static str, key: String },

    #[error("Invalid value {value} for parameter '{key}'")]
    InvalidParameter { key: String, value: f64 },

    #[error("Material property '{0}' is required but was not given")]
    MissingProperty(&'static str),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Orientation vector is parallel to the element axis")]
    DegenerateOrientation,

    #[error("Singular stiffness matrix - model may be unstable or have insufficient supports")]
    SingularMatrix,

    #[error("Assembled stiffness matrix is not symmetric")]
    AsymmetricStiffness,

    #[error("Frame has no elements")]
    EmptyModel,

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type for frame analysis operations
pub type FrameResult<T> = Result<T, FrameError>;
