/*
 * Flock Statistics Module
 *
 * A snapshot of what the last tick looked like: flock size, how the index
 * partitioned the world, and how crowded the neighbourhoods were. Used for
 * log lines and the viewer's info panel.
 */

use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FlockStats {
    pub tick: u64,
    pub boids: usize,
    pub nodes: usize,
    pub leaves: usize,
    pub depth: usize,
    pub mean_speed: f32,
    // Average candidate count returned by the index per boid
    pub mean_neighbors: f32,
}

impl fmt::Display for FlockStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tick {}: {} boids, {} leaves / {} nodes (depth {}), mean speed {:.2}, mean neighbours {:.1}",
            self.tick,
            self.boids,
            self.leaves,
            self.nodes,
            self.depth,
            self.mean_speed,
            self.mean_neighbors
        )
    }
}
