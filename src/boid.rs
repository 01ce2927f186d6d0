/*
 * Boid Module
 *
 * This module defines the Boid struct and its behavior.
 * Each boid follows three main rules:
 * 1. Separation: Avoid crowding neighbors
 * 2. Alignment: Match the velocity of neighbors
 * 3. Cohesion: Steer towards the average position of neighbors
 *
 * Every rule takes the candidate neighbours returned by the spatial index and
 * filters them again with its own, usually smaller, distance. The candidate
 * list includes the boid itself; it contributes a zero vector but still
 * counts towards the average.
 */

use glam::Vec2;

use crate::bounds::Rectangle;
use crate::error::{non_negative, ConfigError};

// Keeps separation finite when two boids sit on the same spot
pub const SEPARATION_EPSILON: f32 = 1e-7;

// Per-boid behaviour limits and distances
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Behavior {
    pub max_speed: f32,
    pub max_force: f32,
    pub separation_distance: f32,
    pub alignment_distance: f32,
    pub cohesion_distance: f32,
}

impl Behavior {
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("max_speed", self.max_speed)?;
        non_negative("max_force", self.max_force)?;
        non_negative("separation_distance", self.separation_distance)?;
        non_negative("alignment_distance", self.alignment_distance)?;
        non_negative("cohesion_distance", self.cohesion_distance)?;
        Ok(())
    }
}

// The three steering contributions computed for one boid in one tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Steering {
    pub separation: Vec2,
    pub alignment: Vec2,
    pub cohesion: Vec2,
}

impl Steering {
    pub fn total(&self) -> Vec2 {
        self.separation + self.alignment + self.cohesion
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Boid {
    pub position: Vec2,
    pub velocity: Vec2,
    pub max_speed: f32,
    pub max_force: f32,
    pub separation_distance: f32,
    pub alignment_distance: f32,
    pub cohesion_distance: f32,
}

// Rescale `v` to exactly `max` when it is longer, keeping its direction
#[inline]
pub fn limit_magnitude(v: Vec2, max: f32) -> Vec2 {
    let length_squared = v.length_squared();
    if length_squared > max * max {
        v * (max / length_squared.sqrt())
    } else {
        v
    }
}

impl Boid {
    pub fn new(position: Vec2, velocity: Vec2, behavior: Behavior) -> Self {
        Self {
            position,
            velocity,
            max_speed: behavior.max_speed,
            max_force: behavior.max_force,
            separation_distance: behavior.separation_distance,
            alignment_distance: behavior.alignment_distance,
            cohesion_distance: behavior.cohesion_distance,
        }
    }

    pub fn behavior(&self) -> Behavior {
        Behavior {
            max_speed: self.max_speed,
            max_force: self.max_force,
            separation_distance: self.separation_distance,
            alignment_distance: self.alignment_distance,
            cohesion_distance: self.cohesion_distance,
        }
    }

    fn limit_force(&self, force: Vec2) -> Vec2 {
        limit_magnitude(force, self.max_force)
    }

    // Average of the accumulated contributions, clamped; zero if nothing counted
    fn average(&self, sum: Vec2, count: usize) -> Vec2 {
        if count == 0 {
            return Vec2::ZERO;
        }
        self.limit_force(sum / count as f32)
    }

    // Calculate separation force (push away from neighbours that are too close)
    pub fn separation(&self, boids: &[Boid], neighbor_indices: &[usize]) -> Vec2 {
        let mut steering = Vec2::ZERO;
        let mut count = 0;

        for &i in neighbor_indices {
            let away = self.position - boids[i].position;
            let d = away.length();
            if d < self.separation_distance {
                steering += away / (d + SEPARATION_EPSILON);
                count += 1;
            }
        }

        self.average(steering, count)
    }

    // Calculate alignment force (difference to the neighbours' velocity)
    pub fn alignment(&self, boids: &[Boid], neighbor_indices: &[usize]) -> Vec2 {
        let mut steering = Vec2::ZERO;
        let mut count = 0;

        for &i in neighbor_indices {
            let other = &boids[i];
            if self.position.distance(other.position) < self.alignment_distance {
                steering += other.velocity - self.velocity;
                count += 1;
            }
        }

        self.average(steering, count)
    }

    // Calculate cohesion force (towards the local centre of mass)
    pub fn cohesion(&self, boids: &[Boid], neighbor_indices: &[usize]) -> Vec2 {
        let mut steering = Vec2::ZERO;
        let mut count = 0;

        for &i in neighbor_indices {
            let toward = boids[i].position - self.position;
            if toward.length() < self.cohesion_distance {
                steering += toward;
                count += 1;
            }
        }

        self.average(steering, count)
    }

    pub fn steering(&self, boids: &[Boid], neighbor_indices: &[usize]) -> Steering {
        Steering {
            separation: self.separation(boids, neighbor_indices),
            alignment: self.alignment(boids, neighbor_indices),
            cohesion: self.cohesion(boids, neighbor_indices),
        }
    }

    // Integrate one tick: add the forces, cap the speed, move, then reflect
    // off the world edges
    pub fn update(&mut self, separation: Vec2, alignment: Vec2, cohesion: Vec2, bounds: &Rectangle) {
        self.velocity += separation + alignment + cohesion;
        self.velocity = limit_magnitude(self.velocity, self.max_speed);
        self.position += self.velocity;
        self.bounce(bounds);
    }

    pub fn apply(&mut self, steering: &Steering, bounds: &Rectangle) {
        self.update(steering.separation, steering.alignment, steering.cohesion, bounds);
    }

    // Reflect off the edges. Each axis is handled on its own, so a corner hit
    // flips both components. The reflected component is doubled.
    pub fn bounce(&mut self, bounds: &Rectangle) {
        if self.position.x <= bounds.min_x() || self.position.x >= bounds.max_x() {
            self.velocity.x = -2.0 * self.velocity.x;
            self.position.x = self.position.x.clamp(bounds.min_x(), bounds.max_x());
        }

        if self.position.y <= bounds.min_y() || self.position.y >= bounds.max_y() {
            self.velocity.y = -2.0 * self.velocity.y;
            self.position.y = self.position.y.clamp(bounds.min_y(), bounds.max_y());
        }
    }
}
