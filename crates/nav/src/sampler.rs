//! Randomized initial/goal pose sampling.

use fastrand::Rng;
use glam::Vec3;

use crate::config::NavConfig;
use crate::error::ConfigError;
use crate::types::Pose;

/// Minimum distance between the sampled initial and goal positions.
pub const MIN_SEPARATION: f32 = 1.0;

/// Redraw budget for the goal position before sampling gives up.
const GOAL_RETRIES: usize = 100;

/// Draw an initial and a goal pose for one episode.
///
/// Positions come from the configured discrete candidate list when present,
/// otherwise uniformly from the low/high boxes. The goal is redrawn until it
/// sits at least [`MIN_SEPARATION`] away from the initial position; if the
/// retry budget runs out the draw fails instead of accepting a too-close
/// pair. Orientations are sampled independently of the separation check.
pub fn sample_initial_and_goal(
    config: &NavConfig,
    rng: &mut Rng,
) -> Result<(Pose, Pose), ConfigError> {
    let initial_pos = match &config.valid_pos {
        Some(candidates) => pick(candidates, rng),
        None => uniform_box(config.initial_pos_low, config.initial_pos_high, rng),
    };

    let mut target_pos = initial_pos;
    let mut separated = false;
    for _ in 0..GOAL_RETRIES {
        target_pos = match &config.valid_pos {
            Some(candidates) => pick(candidates, rng),
            None => uniform_box(config.target_pos_low, config.target_pos_high, rng),
        };
        if initial_pos.distance(target_pos) >= MIN_SEPARATION {
            separated = true;
            break;
        }
    }
    if !separated {
        return Err(ConfigError::CandidatesTooCluttered {
            min_separation: MIN_SEPARATION,
        });
    }

    let initial_orn = uniform_box(config.initial_orn_low, config.initial_orn_high, rng);
    let target_orn = uniform_box(config.target_orn_low, config.target_orn_high, rng);

    Ok((
        Pose::new(initial_pos, initial_orn),
        Pose::new(target_pos, target_orn),
    ))
}

fn uniform_box(low: [f32; 3], high: [f32; 3], rng: &mut Rng) -> Vec3 {
    Vec3::new(
        low[0] + rng.f32() * (high[0] - low[0]),
        low[1] + rng.f32() * (high[1] - low[1]),
        low[2] + rng.f32() * (high[2] - low[2]),
    )
}

fn pick(candidates: &[[f32; 3]], rng: &mut Rng) -> Vec3 {
    Vec3::from_array(candidates[rng.usize(0..candidates.len())])
}
