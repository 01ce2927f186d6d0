/*
 * Spawn Module
 *
 * Seeds a random flock before a simulation is built. This is the only place
 * randomness enters; the caller owns the generator, so a fixed seed gives a
 * fixed flock.
 */

use glam::Vec2;
use rand::Rng;

use crate::boid::Boid;
use crate::params::SimulationParams;

// Place `num_boids` boids uniformly inside the world, each velocity component
// drawn from [-max_initial_speed, max_initial_speed)
pub fn random_flock<R: Rng + ?Sized>(params: &SimulationParams, rng: &mut R) -> Vec<Boid> {
    let behavior = params.behavior();
    let world = params.world;
    let speed = params.max_initial_speed;

    (0..params.num_boids)
        .map(|_| {
            let x = world.min_x() + rng.gen::<f32>() * world.width();
            let y = world.min_y() + rng.gen::<f32>() * world.height();
            let velocity = if speed > 0.0 {
                Vec2::new(rng.gen_range(-speed..speed), rng.gen_range(-speed..speed))
            } else {
                Vec2::ZERO
            };
            Boid::new(Vec2::new(x, y), velocity, behavior)
        })
        .collect()
}
