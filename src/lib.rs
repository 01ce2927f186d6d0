/*
 * Boid Flocking Simulation - Module Definitions
 *
 * This file defines the module structure for the flock core: a region
 * quadtree for neighbour queries and the per-tick steering pipeline that
 * consumes it. Drawing and UI live in the viewer binary.
 */

// Re-export key components for easier access
pub use boid::{Behavior, Boid, Steering};
pub use bounds::Rectangle;
pub use error::{ConfigError, IndexError};
pub use params::SimulationParams;
pub use simulation::Simulation;
pub use spatial_index::{Quadrant, SpatialIndex, SpatialNode};
pub use stats::FlockStats;

// Define modules
pub mod boid;
pub mod bounds;
pub mod error;
pub mod params;
pub mod simulation;
pub mod spatial_index;
pub mod spawn;
pub mod stats;
