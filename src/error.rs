//! Error types for the simulation.

use thiserror::Error;

/// Cell at which the density stopped being positive and finite.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Divergence {
    pub iteration: usize,
    pub x: usize,
    pub y: usize,
    pub density: f64,
}

impl std::fmt::Display for Divergence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "density {} at cell ({}, {}) in iteration {}",
            self.density, self.x, self.y, self.iteration
        )
    }
}

#[derive(Debug, Error)]
pub enum LbmError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Numerical divergence: {0}")]
    Divergence(Divergence),

    #[error("Iteration {0} was abandoned before relaxation")]
    Abandoned(usize),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LbmError>;
