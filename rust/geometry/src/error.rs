use thiserror::Error;

/// Result type for kernel operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while composing or extruding planar geometry
#[derive(Error, Debug)]
pub enum Error {
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("Non-planar input: {0}")]
    NonPlanar(String),

    #[error("Invalid intersection: {0}")]
    InvalidIntersection(String),

    #[error("Outline is not closed: {0}")]
    NotClosed(String),

    #[error("Outline is finalized and can no longer be modified")]
    Finalized,

    #[error("Invalid extrusion parameters: {0}")]
    InvalidExtrusion(String),

    #[error("Core model error: {0}")]
    CoreError(#[from] iges_lite_core::Error),
}
