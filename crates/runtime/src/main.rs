#![deny(clippy::all, clippy::pedantic)]
//! # Navigation Runtime
//!
//! Headless episode driver: wires a kinematic point-robot world into the
//! navigation environment and rolls random-action episodes, logging rewards
//! and termination. Useful for eyeballing the control loop without a physics
//! engine or renderer attached.

mod world;

use anyhow::Result;
use clap::Parser;
use nav::{Collaborators, NavConfig, NavEnv};

#[derive(Parser)]
#[command(about = "Roll random-action navigation episodes on a point robot")]
struct Args {
    /// Number of episodes to roll.
    #[arg(long, default_value_t = 10)]
    episodes: u32,

    /// Step cap per episode.
    #[arg(long, default_value_t = 300)]
    max_step: u32,

    /// Seed for pose sampling and action noise.
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn demo_config(max_step: u32) -> Result<NavConfig> {
    let mut config = NavConfig::from_json(
        r#"{
            "initial_pos_low": [-1.0, -1.0, 0.0],
            "initial_pos_high": [1.0, 1.0, 0.0],
            "initial_orn_low": [0.0, 0.0, 0.0],
            "initial_orn_high": [0.0, 0.0, 6.2831853],
            "target_pos_low": [-4.0, -4.0, 0.0],
            "target_pos_high": [4.0, 4.0, 0.0],
            "target_orn_low": [0.0, 0.0, 0.0],
            "target_orn_high": [0.0, 0.0, 0.0],
            "additional_states_dim": 3,
            "terminal_reward": 10.0,
            "output": ["sensor", "bump"],
            "task": "pointgoal"
        }"#,
    )?;
    config.max_step = max_step;
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let (actuator, physics) = world::PointWorld::handles();
    let collaborators = Collaborators {
        actuator: Box::new(actuator),
        physics: Box::new(physics),
        camera: None,
        filler: None,
        markers: None,
        costs: None,
    };
    let mut env = NavEnv::new(
        demo_config(args.max_step)?,
        collaborators,
        0.1,
        0.0125,
        args.seed,
    )?;

    let mut action_rng = fastrand::Rng::with_seed(args.seed.wrapping_add(1));
    for episode in 1..=args.episodes {
        env.reset()?;
        let mut total_reward = 0.0_f32;
        let mut steps = 0_u32;
        loop {
            let action = [
                action_rng.f32() * 2.0 - 1.0,
                action_rng.f32() * 2.0 - 1.0,
            ];
            let transition = env.step(&action)?;
            total_reward += transition.reward;
            steps += 1;
            if transition.done {
                break;
            }
        }
        tracing::info!(episode, steps, total_reward, "episode finished");
    }

    Ok(())
}
