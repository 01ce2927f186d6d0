/*
 * Error Module
 *
 * Errors surfaced by the flock core. Configuration problems are fatal and
 * reported when a simulation is built; index errors are reported per insert
 * and never leave the tree in a half-updated state.
 */

use thiserror::Error;

// Problems with the values a simulation is constructed from
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("world bounds are degenerate: x {min_x}..{max_x}, y {min_y}..{max_y}")]
    DegenerateBounds {
        min_x: f32,
        min_y: f32,
        max_x: f32,
        max_y: f32,
    },

    #[error("node capacity must be at least 1")]
    ZeroCapacity,

    #[error("maximum tree depth must be at least 1")]
    ZeroDepth,

    #[error("{name} must be a finite, non-negative number (got {value})")]
    InvalidValue { name: &'static str, value: f32 },

    #[error("boid {index}: {source}")]
    InvalidBoid {
        index: usize,
        #[source]
        source: Box<ConfigError>,
    },

    #[error("boid {index} starts outside the world at ({x}, {y})")]
    BoidOutOfBounds { index: usize, x: f32, y: f32 },
}

// Errors emitted by the spatial index
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndexError {
    #[error("point ({x}, {y}) lies outside the index bounds")]
    OutOfBounds { x: f32, y: f32 },
}

// Check a scalar that has to be finite and >= 0
pub(crate) fn non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue { name, value })
    }
}
