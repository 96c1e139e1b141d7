//! Collaborator trait seams.
//!
//! The physics engine, robot model, renderer, and in-painting network live
//! outside this crate. The episode controller holds explicit handles to them
//! through these traits; there is no ambient engine state. Fallible
//! operations return [`anyhow::Result`] and their errors propagate to the
//! caller unchanged; the controller adds no retry and no translation.

use anyhow::Result;
use glam::Vec3;

use crate::types::{ContactPoint, Image, Pose, RenderMode};

/// Robot actuation and proprioception surface.
pub trait Actuator {
    /// Return the robot to its canonical pose and zero all velocities.
    fn reset_to_canonical_state(&mut self) -> Result<()>;

    /// Teleport the robot base to the given pose.
    fn set_pose(&mut self, pose: Pose) -> Result<()>;

    /// Apply one control action. Action-space bounds are enforced here, not
    /// by the episode controller.
    fn apply_action(&mut self, action: &[f32]) -> Result<()>;

    /// Root position of the robot base.
    fn position(&self) -> Vec3;

    /// Roll/pitch/yaw of the robot base, radians.
    fn orientation_rpy(&self) -> Vec3;

    /// End-effector position, used by the `reaching` task variant.
    fn end_effector_position(&self) -> Vec3;

    /// Declared action dimensionality.
    fn action_dim(&self) -> usize;

    /// Physics body identifier for contact queries.
    fn body_id(&self) -> u64;
}

/// Physics stepping and contact query surface.
pub trait Physics {
    /// Set the fixed sub-step duration in seconds.
    fn set_timestep(&mut self, dt: f32) -> Result<()>;

    /// Integrate forward by exactly one sub-step.
    fn advance_one_substep(&mut self) -> Result<()>;

    /// Contact reports currently touching the given body.
    fn contacts(&self, body_id: u64) -> Result<Vec<ContactPoint>>;
}

/// Robot-mounted camera surface.
pub trait Camera {
    fn render(&mut self, mode: RenderMode) -> Result<Image>;
}

/// Learned image in-painting surface: color image in, color image out.
pub trait Filler {
    fn infer(&self, color: &Image) -> Result<Image>;
}

/// Inspection markers at the initial and goal positions. Purely visual; no
/// physical effect.
pub trait Markers {
    fn place(&mut self, initial: Vec3, goal: Vec3) -> Result<()>;
}

/// Per-step actuation cost terms read from actuator telemetry.
///
/// Both hooks default to zero; the configured `electricity_cost` and
/// `stall_torque_cost` coefficients scale whatever the hooks return.
pub trait CostModel {
    fn electricity(&self, _actuator: &dyn Actuator) -> f32 {
        0.0
    }

    fn stall_torque(&self, _actuator: &dyn Actuator) -> f32 {
        0.0
    }
}

/// Cost model that charges nothing.
pub struct NoCosts;

impl CostModel for NoCosts {}

/// Collaborator set handed to the episode controller at construction.
///
/// `camera` is required when any visual channel is configured, `filler` when
/// `rgb_filled` is configured; both checks happen at construction. `markers`
/// and `costs` are optional everywhere.
pub struct Collaborators {
    pub actuator: Box<dyn Actuator>,
    pub physics: Box<dyn Physics>,
    pub camera: Option<Box<dyn Camera>>,
    pub filler: Option<Box<dyn Filler>>,
    pub markers: Option<Box<dyn Markers>>,
    pub costs: Option<Box<dyn CostModel>>,
}
