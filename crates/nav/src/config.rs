//! Environment configuration record.
//!
//! Parsed once from JSON (or built directly), validated at construction, and
//! never mutated afterwards. Bounds are per-axis low/high pairs; the `output`
//! list fixes the observation channel set and its order for the lifetime of
//! the environment.

use anyhow::Result;
use serde::Deserialize;

use crate::error::ConfigError;

/// Task variant, fixed at construction. Selects which pose accessor the
/// reward computation reads: root position for `pointgoal`, end-effector
/// position for `reaching`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskMode {
    Pointgoal,
    Reaching,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NavConfig {
    pub initial_pos_low: [f32; 3],
    pub initial_pos_high: [f32; 3],
    pub initial_orn_low: [f32; 3],
    pub initial_orn_high: [f32; 3],
    pub target_pos_low: [f32; 3],
    pub target_pos_high: [f32; 3],
    pub target_orn_low: [f32; 3],
    pub target_orn_high: [f32; 3],
    /// Discrete candidate positions. When present, initial and goal positions
    /// are drawn from this list instead of the boxes above.
    #[serde(default)]
    pub valid_pos: Option<Vec<[f32; 3]>>,
    pub additional_states_dim: usize,
    #[serde(default = "default_dist_tol")]
    pub dist_tol: f32,
    #[serde(default = "default_max_step")]
    pub max_step: u32,
    #[serde(default)]
    pub terminal_reward: f32,
    #[serde(default)]
    pub electricity_cost: f32,
    #[serde(default)]
    pub stall_torque_cost: f32,
    #[serde(default = "default_discount_factor")]
    pub discount_factor: f32,
    /// Ordered observation channel names.
    pub output: Vec<String>,
    #[serde(default = "default_resolution")]
    pub resolution: usize,
    pub task: TaskMode,
    /// Place inspection markers at the initial and goal positions on reset.
    #[serde(default)]
    pub visual_markers: bool,
}

fn default_dist_tol() -> f32 {
    0.5
}

fn default_max_step() -> u32 {
    u32::MAX
}

fn default_discount_factor() -> f32 {
    1.0
}

fn default_resolution() -> usize {
    128
}

impl NavConfig {
    /// Parse a configuration from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the bounds invariants. Every `*_low` bound must be
    /// component-wise `<=` its `*_high` counterpart.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_bounds(
            "initial_pos_low",
            "initial_pos_high",
            self.initial_pos_low,
            self.initial_pos_high,
        )?;
        check_bounds(
            "initial_orn_low",
            "initial_orn_high",
            self.initial_orn_low,
            self.initial_orn_high,
        )?;
        check_bounds(
            "target_pos_low",
            "target_pos_high",
            self.target_pos_low,
            self.target_pos_high,
        )?;
        check_bounds(
            "target_orn_low",
            "target_orn_high",
            self.target_orn_low,
            self.target_orn_high,
        )?;
        if let Some(candidates) = &self.valid_pos {
            if candidates.is_empty() {
                return Err(ConfigError::EmptyCandidateList);
            }
        }
        Ok(())
    }
}

fn check_bounds(
    name: &'static str,
    counterpart: &'static str,
    low: [f32; 3],
    high: [f32; 3],
) -> Result<(), ConfigError> {
    for axis in 0..3 {
        if low[axis] > high[axis] {
            return Err(ConfigError::InvalidBounds {
                name,
                counterpart,
                axis,
            });
        }
    }
    Ok(())
}
