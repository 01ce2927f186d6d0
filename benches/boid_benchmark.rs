/*
 * Boid Simulation Benchmark
 *
 * Measures the pieces of a tick separately: building the quadtree, answering
 * neighbour queries (against a brute-force scan for reference), and the full
 * step.
 */

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

use quadflock::{Rectangle, Simulation, SimulationParams, SpatialIndex};

const WORLD_SIZE: f32 = 1000.0;

fn world() -> Rectangle {
    Rectangle::new(0.0, 0.0, WORLD_SIZE, WORLD_SIZE)
}

fn random_positions(n: usize) -> Vec<Vec2> {
    let mut rng = StdRng::seed_from_u64(n as u64);
    (0..n)
        .map(|_| Vec2::new(rng.gen_range(0.0..WORLD_SIZE), rng.gen_range(0.0..WORLD_SIZE)))
        .collect()
}

// Benchmark rebuilding the index from scratch
fn bench_index_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_build");

    for num_boids in [100, 500, 1000, 2000].iter() {
        let positions = random_positions(*num_boids);
        group.bench_with_input(BenchmarkId::from_parameter(num_boids), num_boids, |b, _| {
            let mut index = SpatialIndex::new(world(), 4);
            b.iter(|| {
                index.rebuild(positions.iter().copied().enumerate());
                black_box(index.len());
            });
        });
    }

    group.finish();
}

// Benchmark neighbour queries through the quadtree and by scanning everything
fn bench_neighbor_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("neighbor_queries");
    let radius = 15.0;

    for num_boids in [100, 500, 1000, 2000].iter() {
        let positions = random_positions(*num_boids);
        let mut index = SpatialIndex::new(world(), 4);
        index.rebuild(positions.iter().copied().enumerate());

        group.bench_with_input(BenchmarkId::new("quadtree", num_boids), num_boids, |b, _| {
            let mut found = Vec::new();
            b.iter(|| {
                for p in &positions {
                    found.clear();
                    index.query_circle_into(*p, radius, &mut found);
                    black_box(found.len());
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("brute_force", num_boids), num_boids, |b, _| {
            b.iter(|| {
                for p in &positions {
                    let count = positions.iter().filter(|q| q.distance(*p) <= radius).count();
                    black_box(count);
                }
            });
        });
    }

    group.finish();
}

// Benchmark the overall update loop
fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("step");

    for num_boids in [100, 500, 1000, 2000].iter() {
        let params = SimulationParams {
            num_boids: *num_boids,
            world: world(),
            ..SimulationParams::default()
        };
        let mut rng = StdRng::seed_from_u64(17);
        let mut simulation = Simulation::from_params(&params, &mut rng).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(num_boids), num_boids, |b, _| {
            b.iter(|| {
                simulation.step();
                black_box(simulation.tick());
            });
        });
    }

    group.finish();
}

// Configure the benchmarks
criterion_group! {
    name = benches;
    config = Criterion::default()
        .sample_size(10)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1));
    targets = bench_index_build, bench_neighbor_queries, bench_step
}

criterion_main!(benches);
