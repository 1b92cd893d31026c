//! Headless physics sandbox
//!
//! Builds a walled arena with scattered bodies, a cooldown zone and a one-shot
//! pickup, then runs the physics world on a fixed timestep and logs what
//! happens. Stands in for the game loop that would normally own the world.
//!
//! Usage: `sandbox [seed] [seconds]`. Settings come from `sandbox.toml` when
//! present.

use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;

use nalgebra::Rotation2;
use physics2d::events::{ARG_ENTITY_A, ARG_ENTITY_B, ARG_OTHER, ARG_TRIGGER};
use physics2d::prelude::*;
use physics2d::physics::{ConvexPolygon, ShapeKind};
use rand::{rngs::StdRng, Rng, SeedableRng};

const CONFIG_PATH: &str = "sandbox.toml";
const BODY_COUNT: u32 = 40;
const WALL_THICKNESS: f32 = 20.0;

const ZONE: Entity = Entity::new(10_000);
const PICKUP: Entity = Entity::new(10_001);
const FIRST_WALL_ID: u32 = 20_000;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    physics2d::foundation::logging::init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().map(|s| s.parse::<u64>()).transpose()?.unwrap_or(7);
    let seconds = args.next().map(|s| s.parse::<f32>()).transpose()?.unwrap_or(10.0);

    let config = if Path::new(CONFIG_PATH).exists() {
        PhysicsConfig::load_from_file(CONFIG_PATH)?
    } else {
        log::info!("{CONFIG_PATH} not found, using defaults");
        PhysicsConfig::default()
    };

    log::info!("Starting physics sandbox (seed {seed}, {seconds}s)");
    let mut world = PhysicsWorld::new(config);
    let arena = build_arena(&mut world);
    scatter_bodies(&mut world, arena, seed);
    place_triggers(&mut world, arena);

    let counters = EventCounters::install(&mut world);
    world.initialize();

    let mut timestep = FixedTimestep::default();
    let mut rng = StdRng::seed_from_u64(seed ^ 0xf00d);
    let mut simulated = 0.0;
    let mut total_ms = 0.0;
    let mut slowest_ms: f32 = 0.0;
    let mut next_sweep = 0;

    while simulated < seconds {
        // Fake a jittery display frame
        let frame_time = rng.gen_range(0.010..0.024);
        simulated += frame_time;

        for _ in 0..timestep.advance(frame_time) {
            let mut stopwatch = Stopwatch::start_new();
            world.step(timestep.step());
            stopwatch.stop();
            let ms = stopwatch.elapsed_millis();
            total_ms += ms;
            slowest_ms = slowest_ms.max(ms);
        }

        if world.step_count() >= next_sweep {
            sweep_floor(&world, arena);
            next_sweep = world.step_count() + 120;
        }
    }

    world.shutdown();
    let steps = world.step_count();
    log::info!(
        "{steps} steps, avg {:.3}ms, worst {slowest_ms:.3}ms",
        total_ms / steps.max(1) as f32
    );
    counters.report();
    Ok(())
}

fn build_arena(world: &mut PhysicsWorld) -> Aabb {
    let config = &world.config().collision;
    let margin = WALL_THICKNESS * 2.0;
    let arena = Aabb::new(
        Vec2::new(margin, margin),
        Vec2::new(config.world_width - margin, config.world_height - margin),
    );
    let center = arena.center();
    let size = arena.max - arena.min;

    let walls = [
        (Vec2::new(center.x, arena.min.y), size.x, WALL_THICKNESS),
        (Vec2::new(center.x, arena.max.y), size.x, WALL_THICKNESS),
        (Vec2::new(arena.min.x, center.y), WALL_THICKNESS, size.y),
        (Vec2::new(arena.max.x, center.y), WALL_THICKNESS, size.y),
    ];
    for (id, (position, width, height)) in (FIRST_WALL_ID..).zip(walls) {
        let wall = PhysicsBody::new(Entity::new(id), position)
            .as_static()
            .with_layers(CollisionLayers::ENVIRONMENT, CollisionLayers::ALL);
        if world
            .add_body(wall, Shape::rectangle(Vec2::zeros(), width, height))
            .is_none()
        {
            log::warn!("could not place wall {id}");
        }
    }
    arena
}

fn scatter_bodies(world: &mut PhysicsWorld, arena: Aabb, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let inner = WALL_THICKNESS * 2.0;

    for id in 0..BODY_COUNT {
        let position = Vec2::new(
            rng.gen_range(arena.min.x + inner..arena.max.x - inner),
            rng.gen_range(arena.center().y..arena.max.y - inner),
        );
        let heading = Rotation2::new(rng.gen_range(0.0..std::f32::consts::TAU));
        let velocity = heading * Vec2::new(rng.gen_range(20.0..150.0), 0.0);

        let shape = match id % 3 {
            0 => Shape::circle(Vec2::zeros(), rng.gen_range(4.0..12.0)),
            1 => Shape::rectangle(
                Vec2::zeros(),
                rng.gen_range(8.0..24.0),
                rng.gen_range(8.0..24.0),
            ),
            _ => Shape::from_kind(
                Vec2::zeros(),
                ShapeKind::Polygon(ConvexPolygon::regular(rng.gen_range(3..7), 10.0)),
            ),
        };
        let body = PhysicsBody::new(Entity::new(id), position)
            .with_velocity(velocity)
            .with_mass(rng.gen_range(0.5..4.0))
            .with_material(0.4, rng.gen_range(0.0..0.6))
            .with_layers(
                CollisionLayers::DEBRIS,
                CollisionLayers::DEBRIS | CollisionLayers::ENVIRONMENT | CollisionLayers::TRIGGER,
            );

        if world.add_body(body, shape).is_none() {
            log::warn!("could not spawn body {id}");
        }
    }
}

fn place_triggers(world: &mut PhysicsWorld, arena: Aabb) {
    let center = arena.center();
    let floor = arena.min.y + WALL_THICKNESS;

    let zone = world.add_trigger(
        ZONE,
        Shape::rectangle(Vec2::new(center.x, floor + 40.0), arena.max.x - arena.min.x, 80.0),
        CollisionLayers::TRIGGER,
        CollisionLayers::DEBRIS,
        TriggerConfig::with_cooldown(0.5),
    );
    let pickup = world.add_trigger(
        PICKUP,
        Shape::circle(Vec2::new(center.x, center.y), 60.0),
        CollisionLayers::TRIGGER,
        CollisionLayers::DEBRIS,
        TriggerConfig::one_shot(),
    );
    if zone.is_none() || pickup.is_none() {
        log::warn!("trigger placement failed");
    }

    world
        .triggers_mut()
        .register_callback(PICKUP, TriggerEventKind::Enter, |event| {
            log::info!("pickup {} collected by {}", event.trigger, event.other);
        });
}

/// Casts a ray across the arena floor and logs the first body it meets
fn sweep_floor(world: &PhysicsWorld, arena: Aabb) {
    let ray = Ray::new(
        Vec2::new(arena.min.x + WALL_THICKNESS, arena.min.y + WALL_THICKNESS * 2.0),
        Vec2::new(1.0, 0.0),
    );
    let width = arena.max.x - arena.min.x;
    match world.collision().ray_cast(&ray, width, CollisionLayers::DEBRIS) {
        Some(hit) => log::debug!("floor ray hit {} at {:.1}", hit.entity, hit.distance),
        None => log::debug!("floor ray clear"),
    }
}

/// Tallies of broadcast events
struct EventCounters {
    collision_enter: Rc<Cell<u32>>,
    collision_exit: Rc<Cell<u32>>,
    trigger_enter: Rc<Cell<u32>>,
    trigger_exit: Rc<Cell<u32>>,
}

impl EventCounters {
    fn install(world: &mut PhysicsWorld) -> Self {
        let counters = Self {
            collision_enter: Rc::default(),
            collision_exit: Rc::default(),
            trigger_enter: Rc::default(),
            trigger_exit: Rc::default(),
        };

        let events = world.events_mut();
        for (event_type, counter) in [
            (EventType::CollisionEnter, &counters.collision_enter),
            (EventType::CollisionExit, &counters.collision_exit),
        ] {
            let counter = Rc::clone(counter);
            events.register_handler(
                event_type,
                Box::new(move |event: &Event| {
                    counter.set(counter.get() + 1);
                    log::trace!(
                        "{:?} {:?} / {:?}",
                        event.event_type,
                        event.get_entity(ARG_ENTITY_A),
                        event.get_entity(ARG_ENTITY_B)
                    );
                    false
                }),
            );
        }
        for (event_type, counter) in [
            (EventType::TriggerEnter, &counters.trigger_enter),
            (EventType::TriggerExit, &counters.trigger_exit),
        ] {
            let counter = Rc::clone(counter);
            events.register_handler(
                event_type,
                Box::new(move |event: &Event| {
                    counter.set(counter.get() + 1);
                    let trigger = event.get_entity(ARG_TRIGGER);
                    if let (Some(trigger), Some(other)) = (trigger, event.get_entity(ARG_OTHER)) {
                        log::debug!("{:?}: {other} at trigger {trigger}", event.event_type);
                    }
                    false
                }),
            );
        }
        counters
    }

    fn report(&self) {
        log::info!(
            "collisions: {} enter / {} exit, triggers: {} enter / {} exit",
            self.collision_enter.get(),
            self.collision_exit.get(),
            self.trigger_enter.get(),
            self.trigger_exit.get()
        );
    }
}
