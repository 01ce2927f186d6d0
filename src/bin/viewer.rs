/*
 * Boid Flocking Simulation - Viewer
 *
 * A nannou window around the flock core. It draws every boid, optionally the
 * quadtree leaves the last tick was indexed with, and offers egui controls to
 * pause, toggle the partition grid and reseed the flock with new parameters.
 * The simulation advances once per configured tick interval.
 */

use std::time::Duration;

use nannou::prelude::*;
use nannou_egui::{self, egui, Egui};
use ::rand::rngs::StdRng;
use ::rand::SeedableRng;

use quadflock::{Rectangle, Simulation, SimulationParams};

const BOID_RADIUS: f32 = 2.5;
// Never run more than this many ticks in one frame after a stall
const MAX_TICKS_PER_FRAME: u32 = 4;

// Maps world coordinates onto the window, keeping the aspect ratio
struct Viewport {
    center: Vec2,
    scale: f32,
}

impl Viewport {
    fn fit(world: &Rectangle, window_rect: Rect) -> Self {
        let margin = 0.9;
        let scale = (window_rect.w() / world.width()).min(window_rect.h() / world.height()) * margin;
        let c = world.center();
        Self {
            center: vec2(c.x, c.y),
            scale,
        }
    }

    fn world_to_screen(&self, x: f32, y: f32) -> Vec2 {
        (vec2(x, y) - self.center) * self.scale
    }

    fn rect(&self, r: &Rectangle) -> Rect {
        Rect::from_corners(
            self.world_to_screen(r.min_x(), r.min_y()),
            self.world_to_screen(r.max_x(), r.max_y()),
        )
    }
}

struct Model {
    simulation: Simulation,
    params: SimulationParams,
    egui: Egui,
    show_quadtree: bool,
    paused: bool,
    accumulator: Duration,
    rng: StdRng,
}

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    nannou::app(model).update(update).run();
}

fn model(app: &App) -> Model {
    let window_id = app
        .new_window()
        .title("Quadtree Boids")
        .size(900, 900)
        .view(view)
        .raw_event(raw_window_event)
        .build()
        .expect("Failed to build window");

    let window = app.window(window_id).expect("Window vanished after creation");
    let egui = Egui::from_window(&window);

    let params = SimulationParams::default();
    let mut rng = StdRng::seed_from_u64(params.seed.unwrap_or_else(::rand::random));
    let simulation =
        Simulation::from_params(&params, &mut rng).expect("Default parameters are valid");

    Model {
        simulation,
        params,
        egui,
        show_quadtree: false,
        paused: false,
        accumulator: Duration::ZERO,
        rng,
    }
}

fn update(_app: &App, model: &mut Model, update: Update) {
    let reset = update_ui(model);

    if reset {
        match Simulation::from_params(&model.params, &mut model.rng) {
            Ok(simulation) => model.simulation = simulation,
            Err(err) => tracing::warn!(%err, "keeping the current flock"),
        }
        model.accumulator = Duration::ZERO;
    }

    if model.paused {
        return;
    }

    // Step on the configured interval, or once per frame when it is zero
    let interval = model.params.tick_interval();
    if interval.is_zero() {
        model.simulation.step();
        return;
    }
    model.accumulator += update.since_last;
    let mut ticks = 0;
    while model.accumulator >= interval && ticks < MAX_TICKS_PER_FRAME {
        model.simulation.step();
        model.accumulator -= interval;
        ticks += 1;
    }
    if ticks == MAX_TICKS_PER_FRAME {
        model.accumulator = Duration::ZERO;
    }
}

// Draw the control window; returns true when the flock should be reseeded
fn update_ui(model: &mut Model) -> bool {
    let mut reset = false;
    let stats = model.simulation.stats();
    let params = &mut model.params;
    let ctx = model.egui.begin_frame();

    egui::Window::new("Flock Controls")
        .default_pos([10.0, 10.0])
        .show(&ctx, |ui| {
            let label = if model.show_quadtree { "Quadtree: On" } else { "Quadtree: Off" };
            if ui.button(label).clicked() {
                model.show_quadtree = !model.show_quadtree;
            }
            ui.checkbox(&mut model.paused, "Pause Simulation");

            ui.collapsing("Flock (applied on reset)", |ui| {
                ui.add(egui::Slider::new(&mut params.num_boids, SimulationParams::get_num_boids_range()).text("Number of Boids"));
                ui.add(egui::Slider::new(&mut params.max_speed, SimulationParams::get_max_speed_range()).text("Max Speed"));
                ui.add(egui::Slider::new(&mut params.max_force, SimulationParams::get_max_force_range()).text("Max Force"));
                ui.add(egui::Slider::new(&mut params.separation_distance, SimulationParams::get_distance_range()).text("Separation Distance"));
                ui.add(egui::Slider::new(&mut params.alignment_distance, SimulationParams::get_distance_range()).text("Alignment Distance"));
                ui.add(egui::Slider::new(&mut params.cohesion_distance, SimulationParams::get_distance_range()).text("Cohesion Distance"));
                ui.add(egui::Slider::new(&mut params.search_radius, SimulationParams::get_distance_range()).text("Search Radius"));
                ui.add(egui::Slider::new(&mut params.capacity, 1..=32).text("Node Capacity"));
                ui.add(egui::Slider::new(&mut params.tick_interval_ms, 0..=200).text("Tick Interval (ms)"));

                if ui.button("Reset Flock").clicked() {
                    reset = true;
                }
            });

            ui.separator();
            ui.label(format!("Tick: {}", stats.tick));
            ui.label(format!("Boids: {}", stats.boids));
            ui.label(format!("Leaves: {} / Nodes: {}", stats.leaves, stats.nodes));
            ui.label(format!("Tree Depth: {}", stats.depth));
            ui.label(format!("Mean Speed: {:.2}", stats.mean_speed));
            ui.label(format!("Mean Neighbours: {:.1}", stats.mean_neighbors));
        });

    reset
}

fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    draw.background().color(WHITE);

    let viewport = Viewport::fit(model.simulation.bounds(), app.window_rect());

    // World boundary
    let world = viewport.rect(model.simulation.bounds());
    draw.rect()
        .xy(world.xy())
        .wh(world.wh())
        .no_fill()
        .stroke_weight(1.0)
        .stroke(rgba(0.3, 0.3, 0.3, 1.0));

    if model.show_quadtree {
        for leaf in model.simulation.leaf_bounds() {
            let r = viewport.rect(&leaf);
            draw.rect()
                .xy(r.xy())
                .wh(r.wh())
                .no_fill()
                .stroke_weight(1.0)
                .stroke(RED);
        }
    }

    for p in model.simulation.positions() {
        draw.ellipse()
            .xy(viewport.world_to_screen(p.x, p.y))
            .radius(BOID_RADIUS)
            .color(BLUE);
    }

    draw.to_frame(app, &frame).unwrap();
    model.egui.draw_to_frame(&frame).unwrap();
}

// Handle raw window events for egui
fn raw_window_event(_app: &App, model: &mut Model, event: &nannou::winit::event::WindowEvent) {
    model.egui.handle_raw_event(event);
}
