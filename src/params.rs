/*
 * Simulation Parameters Module
 *
 * This module defines the SimulationParams struct that holds every value a
 * flock is built from: world limits, index tuning, boid behaviour and the
 * run settings used by the binaries. Parameters are plain data; `validate`
 * is the single place that decides whether a set of values is usable.
 */

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::boid::Behavior;
use crate::bounds::Rectangle;
use crate::error::{non_negative, ConfigError};
use crate::spatial_index::DEFAULT_MAX_DEPTH;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    pub num_boids: usize,
    pub world: Rectangle,
    // Radius handed to the spatial index for each boid's candidate neighbours
    pub search_radius: f32,
    pub capacity: usize,
    pub max_depth: usize,
    pub max_speed: f32,
    pub max_force: f32,
    pub separation_distance: f32,
    pub alignment_distance: f32,
    pub cohesion_distance: f32,
    pub max_initial_speed: f32,
    pub steps: u64,
    pub tick_interval_ms: u64,
    pub seed: Option<u64>,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            num_boids: 100,
            world: Rectangle::new(0.0, 0.0, 100.0, 100.0),
            search_radius: 15.0,
            capacity: 4,
            max_depth: DEFAULT_MAX_DEPTH,
            max_speed: 5.0,
            max_force: 0.3,
            separation_distance: 15.0,
            alignment_distance: 10.0,
            cohesion_distance: 10.0,
            max_initial_speed: 2.0,
            steps: 1000,
            tick_interval_ms: 30,
            seed: None,
        }
    }
}

impl SimulationParams {
    pub fn behavior(&self) -> Behavior {
        Behavior {
            max_speed: self.max_speed,
            max_force: self.max_force,
            separation_distance: self.separation_distance,
            alignment_distance: self.alignment_distance,
            cohesion_distance: self.cohesion_distance,
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.world.is_degenerate() {
            return Err(ConfigError::DegenerateBounds {
                min_x: self.world.min_x(),
                min_y: self.world.min_y(),
                max_x: self.world.max_x(),
                max_y: self.world.max_y(),
            });
        }
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.max_depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        non_negative("search_radius", self.search_radius)?;
        non_negative("max_initial_speed", self.max_initial_speed)?;
        self.behavior().validate()
    }

    // Get parameter ranges for UI sliders
    pub fn get_num_boids_range() -> std::ops::RangeInclusive<usize> {
        1..=5000
    }

    pub fn get_max_speed_range() -> std::ops::RangeInclusive<f32> {
        0.0..=20.0
    }

    pub fn get_max_force_range() -> std::ops::RangeInclusive<f32> {
        0.0..=2.0
    }

    pub fn get_distance_range() -> std::ops::RangeInclusive<f32> {
        0.0..=50.0
    }
}
