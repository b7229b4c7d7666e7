//! Pawnmove - headless movement driver
//!
//! Builds a small test arena, walks a pawn through it with scripted input
//! and logs what the controller does each tick. Run with
//! `RUST_LOG=debug` to see landings, jumps and dashes.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use glam::Vec3;
use pawnmove_physics::{
    ActorState, CollisionWorld, ContentFlags, EffectHandle, EffectSystem, InputSnapshot,
    MovementConfig, MovementEvent, PawnController, SimClock,
};

/// Drive a pawn through a test arena
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Movement tunables as JSON; missing fields keep their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of ticks to simulate
    #[arg(short, long, default_value_t = 300)]
    ticks: u32,

    /// Tick length in seconds
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Hold run (and dash whenever the cooldown allows)
    #[arg(long)]
    run: bool,

    /// Hold jump
    #[arg(long)]
    jump: bool,

    /// View yaw in degrees
    #[arg(long, default_value_t = 0.0)]
    yaw: f32,
}

/// Effect system that only logs.
#[derive(Default)]
struct LoggingEffects {
    next: u64,
    live: usize,
}

impl EffectSystem for LoggingEffects {
    fn spawn_effect(&mut self, name: &str, position: Vec3) -> Option<EffectHandle> {
        self.next += 1;
        self.live += 1;
        log::info!("spawn effect {name} #{} at {position:.1}", self.next);
        Some(EffectHandle(self.next))
    }

    fn destroy(&mut self, handle: EffectHandle) -> bool {
        self.live = self.live.saturating_sub(1);
        log::info!("destroy effect #{}", handle.0);
        true
    }
}

fn load_config(path: &Path) -> Result<MovementConfig> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let config: MovementConfig =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    Ok(config)
}

/// Floor, a climbable step, a block too tall to climb, a ramp and a back wall.
fn build_arena() -> CollisionWorld {
    let mut world = CollisionWorld::new();

    world.add_box(Vec3::new(0.0, -8.0, 0.0), Vec3::new(2048.0, 8.0, 2048.0), ContentFlags::SOLID);
    world.add_box(Vec3::new(300.0, 10.0, 0.0), Vec3::new(100.0, 10.0, 256.0), ContentFlags::SOLID);
    // Block top at 50: 30 units above the step, too tall to step onto
    world.add_box(Vec3::new(600.0, 25.0, 0.0), Vec3::new(200.0, 25.0, 256.0), ContentFlags::SOLID);
    world.add_ramp(Vec3::new(0.0, 0.0, 600.0), Vec3::new(200.0, 8.0, 128.0), 20.0, ContentFlags::SOLID);
    world.add_box(Vec3::new(1200.0, 128.0, 0.0), Vec3::new(16.0, 128.0, 512.0), ContentFlags::SOLID);

    world
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if !args.dt.is_finite() || args.dt <= 0.0 {
        bail!("--dt must be a positive number of seconds, got {}", args.dt);
    }

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => MovementConfig::default(),
    };
    let mut controller = PawnController::new(config).context("invalid movement config")?;

    let world = build_arena();
    log::info!("arena ready with {} brushes", world.brush_count());

    let mut actor = ActorState::new(Vec3::ZERO);
    let mut effects = LoggingEffects::default();
    let input = InputSnapshot {
        forward_move: 1.0,
        yaw: args.yaw.to_radians(),
        jump: args.jump,
        run: args.run,
        ..Default::default()
    };

    let mut clock = SimClock::new(0.0, args.dt);
    for tick in 0..args.ticks {
        controller.simulate(&mut actor, &input, clock, &world, &mut effects);

        let events: Vec<MovementEvent> = controller.events().iter().collect();
        if !events.is_empty() {
            log::info!("tick {tick}: {events:?}");
        }
        log::debug!(
            "tick {tick}: pos {:.2} vel {:.2} speed {:.1} grounded {}",
            actor.position,
            actor.velocity,
            actor.horizontal_speed(),
            actor.grounded()
        );

        clock = clock.advance();
    }

    println!("{}", serde_json::to_string_pretty(&actor)?);
    log::info!(
        "{} ticks, {} effects live, {} pending destroy",
        args.ticks,
        effects.live,
        controller.pending_effects()
    );

    Ok(())
}
