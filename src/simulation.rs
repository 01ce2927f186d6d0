/*
 * Simulation Module
 *
 * Owns the flock, the world limits and the spatial index, and advances the
 * whole flock one tick at a time.
 *
 * A tick runs in three passes:
 * 1. Rebuild the index from the current positions
 * 2. Query every boid's neighbours and compute its steering, reading only the
 *    pre-tick state
 * 3. Apply the steering and integrate every boid
 *
 * No boid moves before every boid's forces are known, so processing order
 * never changes what a boid sees.
 */

use glam::Vec2;
use rand::Rng;
use tracing::{debug, warn};

use crate::boid::{Boid, Steering};
use crate::bounds::Rectangle;
use crate::error::ConfigError;
use crate::params::SimulationParams;
use crate::spatial_index::SpatialIndex;
use crate::spawn::random_flock;
use crate::stats::FlockStats;

#[derive(Debug, Clone)]
pub struct Simulation {
    boids: Vec<Boid>,
    bounds: Rectangle,
    search_radius: f32,
    index: SpatialIndex<usize>,
    tick: u64,
    // Candidate neighbours summed over the flock during the last tick
    last_neighbor_total: usize,
    // Steering buffer reused between ticks
    steering: Vec<Steering>,
}

impl Simulation {
    pub fn new(boids: Vec<Boid>, params: &SimulationParams) -> Result<Self, ConfigError> {
        params.validate()?;

        for (index, boid) in boids.iter().enumerate() {
            boid.behavior()
                .validate()
                .map_err(|source| ConfigError::InvalidBoid {
                    index,
                    source: Box::new(source),
                })?;
            if !params.world.contains(boid.position) {
                return Err(ConfigError::BoidOutOfBounds {
                    index,
                    x: boid.position.x,
                    y: boid.position.y,
                });
            }
        }

        let mut simulation = Self {
            index: SpatialIndex::with_max_depth(params.world, params.capacity, params.max_depth),
            steering: Vec::with_capacity(boids.len()),
            boids,
            bounds: params.world,
            search_radius: params.search_radius,
            tick: 0,
            last_neighbor_total: 0,
        };
        simulation.rebuild_index();
        Ok(simulation)
    }

    // Seed a random flock from the params and build a simulation around it
    pub fn from_params<R: Rng + ?Sized>(
        params: &SimulationParams,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        params.validate()?;
        let boids = random_flock(params, rng);
        Self::new(boids, params)
    }

    pub fn boids(&self) -> &[Boid] {
        &self.boids
    }

    pub fn positions(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.boids.iter().map(|boid| boid.position)
    }

    pub fn bounds(&self) -> &Rectangle {
        &self.bounds
    }

    pub fn search_radius(&self) -> f32 {
        self.search_radius
    }

    // Index as built at the start of the last tick
    pub fn index(&self) -> &SpatialIndex<usize> {
        &self.index
    }

    pub fn leaf_bounds(&self) -> impl Iterator<Item = Rectangle> + '_ {
        self.index.leaf_bounds()
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    // Candidate neighbours of one boid against the current index
    pub fn neighbors_of(&self, boid: usize) -> Vec<usize> {
        self.index
            .query_circle(self.boids[boid].position, self.search_radius)
    }

    fn rebuild_index(&mut self) {
        let rejected = self.index.rebuild(
            self.boids
                .iter()
                .enumerate()
                .map(|(i, boid)| (i, boid.position)),
        );
        if rejected > 0 {
            warn!(tick = self.tick, rejected, "boids outside the world were left out of the index");
        }
    }

    // Advance the flock by one tick
    pub fn step(&mut self) {
        self.rebuild_index();

        let mut neighbors = Vec::new();
        let mut neighbor_total = 0;
        self.steering.clear();
        for boid in &self.boids {
            neighbors.clear();
            self.index
                .query_circle_into(boid.position, self.search_radius, &mut neighbors);
            neighbor_total += neighbors.len();
            self.steering.push(boid.steering(&self.boids, &neighbors));
        }

        for (boid, steering) in self.boids.iter_mut().zip(&self.steering) {
            boid.apply(steering, &self.bounds);
        }

        self.tick += 1;
        self.last_neighbor_total = neighbor_total;
        debug!(
            tick = self.tick,
            boids = self.boids.len(),
            indexed = self.index.len(),
            neighbors = neighbor_total,
            "advanced flock"
        );
    }

    pub fn run(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.step();
        }
    }

    pub fn stats(&self) -> FlockStats {
        let count = self.boids.len();
        let (mean_speed, mean_neighbors) = if count == 0 {
            (0.0, 0.0)
        } else {
            let speed: f32 = self.boids.iter().map(|b| b.velocity.length()).sum();
            (
                speed / count as f32,
                self.last_neighbor_total as f32 / count as f32,
            )
        };

        FlockStats {
            tick: self.tick,
            boids: count,
            nodes: self.index.node_count(),
            leaves: self.index.leaves().count(),
            depth: self.index.depth(),
            mean_speed,
            mean_neighbors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boid::Behavior;

    fn params() -> SimulationParams {
        SimulationParams::default()
    }

    fn boid(x: f32, y: f32, vx: f32, vy: f32) -> Boid {
        Boid::new(Vec2::new(x, y), Vec2::new(vx, vy), params().behavior())
    }

    #[test]
    fn lone_boid_moves_by_its_velocity() {
        let mut sim = Simulation::new(vec![boid(40.0, 40.0, 1.0, 2.0)], &params()).unwrap();
        sim.step();
        let b = &sim.boids()[0];
        assert_eq!(b.velocity, Vec2::new(1.0, 2.0));
        assert_eq!(b.position, Vec2::new(41.0, 42.0));
        assert_eq!(sim.tick(), 1);
    }

    #[test]
    fn neighbours_include_the_boid_itself() {
        let sim = Simulation::new(
            vec![boid(10.0, 10.0, 0.0, 0.0), boid(12.0, 10.0, 0.0, 0.0), boid(90.0, 90.0, 0.0, 0.0)],
            &params(),
        )
        .unwrap();
        let mut near = sim.neighbors_of(0);
        near.sort_unstable();
        assert_eq!(near, vec![0, 1]);
    }

    #[test]
    fn forces_use_pre_tick_positions_regardless_of_order() {
        let a = boid(50.0, 50.0, 0.0, 0.0);
        let b = boid(53.0, 50.0, 0.0, 0.0);
        let mut forward = Simulation::new(vec![a.clone(), b.clone()], &params()).unwrap();
        let mut backward = Simulation::new(vec![b, a], &params()).unwrap();
        forward.step();
        backward.step();
        assert_eq!(forward.boids()[0], backward.boids()[1]);
        assert_eq!(forward.boids()[1], backward.boids()[0]);
        // Mirror-image pair pushes apart symmetrically
        let left = &forward.boids()[0];
        let right = &forward.boids()[1];
        assert!(left.velocity.x < 0.0);
        assert_eq!(left.velocity.x, -right.velocity.x);
    }

    #[test]
    fn construction_rejects_bad_boids() {
        let mut bad = boid(10.0, 10.0, 0.0, 0.0);
        bad.max_speed = -1.0;
        let err = Simulation::new(vec![boid(1.0, 1.0, 0.0, 0.0), bad], &params()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBoid { index: 1, .. }));

        let err = Simulation::new(vec![boid(150.0, 10.0, 0.0, 0.0)], &params()).unwrap_err();
        assert_eq!(err, ConfigError::BoidOutOfBounds { index: 0, x: 150.0, y: 10.0 });
    }

    #[test]
    fn construction_rejects_bad_params() {
        let p = SimulationParams {
            capacity: 0,
            ..params()
        };
        assert_eq!(Simulation::new(Vec::new(), &p).unwrap_err(), ConfigError::ZeroCapacity);
    }

    #[test]
    fn boids_stay_inside_the_world() {
        let fast = Behavior {
            max_speed: 40.0,
            ..params().behavior()
        };
        let boids = vec![
            Boid::new(Vec2::new(99.0, 1.0), Vec2::new(30.0, -30.0), fast),
            Boid::new(Vec2::new(1.0, 99.0), Vec2::new(-30.0, 30.0), fast),
        ];
        let mut sim = Simulation::new(boids, &params()).unwrap();
        for _ in 0..20 {
            sim.step();
            for b in sim.boids() {
                assert!(sim.bounds().contains(b.position));
            }
        }
    }

    #[test]
    fn stats_describe_the_last_tick() {
        let mut sim = Simulation::new(
            (0..10)
                .map(|i| boid(5.0 + i as f32 * 9.0, 50.0, 1.0, 0.0))
                .collect(),
            &params(),
        )
        .unwrap();
        sim.step();
        let stats = sim.stats();
        assert_eq!(stats.tick, 1);
        assert_eq!(stats.boids, 10);
        assert!(stats.leaves >= 1);
        assert!(stats.nodes >= stats.leaves);
        assert!(stats.mean_neighbors >= 1.0);
        assert!(stats.to_string().starts_with("tick 1: 10 boids"));
    }
}
