use thiserror::Error;

/// Top-level error type for hole detection and closing.
#[derive(Debug, Error)]
pub enum SolidHolesError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("non-finite coordinate in {0}")]
    NonFinite(&'static str),
}

/// Errors related to the mesh topology.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("face needs at least 3 distinct vertices, got {0}")]
    TooFewVertices(usize),

    #[error("invalid topology: {0}")]
    InvalidTopology(String),
}

/// Errors related to detection and closing operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("mesh changed since detection (detected at revision {detected}, now {current})")]
    StaleDetection { detected: u64, current: u64 },
}

/// Convenience type alias for results using [`SolidHolesError`].
pub type Result<T> = std::result::Result<T, SolidHolesError>;
