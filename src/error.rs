//! Crate error type.

use thiserror::Error;

use crate::Vertex;

/// Errors raised while building networks, synthesising demand or evaluating timings.
#[derive(Debug, Error)]
pub enum Error {
    #[error("vertex {0} not found")]
    VertexNotFound(Vertex),

    #[error("self-loop at vertex {0}")]
    SelfLoop(Vertex),

    #[error("expected {expected} parameters, got {got}")]
    ParameterCount { expected: usize, got: usize },

    #[error("invalid distribution: {0}")]
    InvalidDistribution(String),

    #[error("engine error: {0}")]
    Engine(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Shorthand result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
