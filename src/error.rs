use thiserror::Error;

/// Top-level error type for the air-wire engine.
#[derive(Debug, Error)]
pub enum AirWiresError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Triangulation(#[from] TriangulationError),
}

/// Errors raised while populating a point/connection registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("point id {id} is out of range (registry holds {count} points)")]
    PointOutOfRange { id: usize, count: usize },
}

/// Errors raised by a triangulation backend.
#[derive(Debug, Error)]
pub enum TriangulationError {
    #[error("triangulation insert failed: {0}")]
    Insertion(String),
}

/// Convenience type alias for results using [`AirWiresError`].
pub type Result<T> = std::result::Result<T, AirWiresError>;
