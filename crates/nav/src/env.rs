//! Episode controller.
//!
//! [`NavEnv`] owns the episode lifecycle and composes the pose sampler, the
//! potential tracker, and the observation assembler around the collaborator
//! handles. It exposes the two-operation surface a training loop drives:
//! [`NavEnv::reset`] and [`NavEnv::step`].
//!
//! The controller is single-threaded and synchronous. Episode state is
//! exclusively owned here; callers wanting parallel episodes instantiate
//! independent controllers.

use std::collections::{BTreeSet, HashMap};

use anyhow::{anyhow, Result};
use fastrand::Rng;
use glam::Vec3;

use crate::collaborators::{
    Actuator, Camera, Collaborators, CostModel, Filler, Markers, NoCosts, Physics,
};
use crate::config::{NavConfig, TaskMode};
use crate::error::ConfigError;
use crate::observation::{self, Assembler, Channel, ObservationRecord};
use crate::potential::PotentialTracker;
use crate::sampler;
use crate::types::Pose;

/// Auxiliary diagnostics attached to a transition. Currently always empty.
pub type Info = HashMap<String, f32>;

/// Result of one `step` call.
#[derive(Debug, Clone)]
pub struct Transition {
    pub observation: ObservationRecord,
    pub reward: f32,
    pub done: bool,
    pub info: Info,
}

/// Navigation episode controller.
pub struct NavEnv {
    config: NavConfig,
    assembler: Assembler,
    substeps: u32,
    actuator: Box<dyn Actuator>,
    physics: Box<dyn Physics>,
    camera: Option<Box<dyn Camera>>,
    filler: Option<Box<dyn Filler>>,
    markers: Option<Box<dyn Markers>>,
    costs: Box<dyn CostModel>,
    rng: Rng,
    potential: PotentialTracker,
    current_step: u32,
    current_episode: u64,
    /// `(initial, goal)` poses of the running episode; set by `reset`.
    poses: Option<(Pose, Pose)>,
}

impl std::fmt::Debug for NavEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavEnv")
            .field("config", &self.config)
            .field("substeps", &self.substeps)
            .field("current_step", &self.current_step)
            .field("current_episode", &self.current_episode)
            .field("poses", &self.poses)
            .finish_non_exhaustive()
    }
}

impl NavEnv {
    /// Build a controller over the given collaborator set.
    ///
    /// `action_timestep` must be an integer multiple of `physics_timestep`;
    /// the quotient fixes the number of physics sub-steps per control step.
    /// The physics timestep is propagated to the physics collaborator here.
    pub fn new(
        config: NavConfig,
        collaborators: Collaborators,
        action_timestep: f32,
        physics_timestep: f32,
        seed: u64,
    ) -> Result<Self> {
        config.validate()?;
        let channels = observation::resolve_channels(&config.output)?;
        let substeps = substep_count(action_timestep, physics_timestep)?;

        if channels.iter().any(|c| c.needs_camera()) && collaborators.camera.is_none() {
            return Err(ConfigError::MissingCollaborator {
                channel: "rgb/depth/normal/seg",
                collaborator: "camera",
            }
            .into());
        }
        if channels.contains(&Channel::RgbFilled) {
            if collaborators.filler.is_none() {
                return Err(ConfigError::MissingCollaborator {
                    channel: "rgb_filled",
                    collaborator: "in-painting",
                }
                .into());
            }
            if !channels.contains(&Channel::Rgb) {
                return Err(ConfigError::FilledWithoutRgb.into());
            }
        }
        if channels.contains(&Channel::Sensor)
            && config.additional_states_dim != observation::SENSOR_DIM
        {
            return Err(ConfigError::SensorDimMismatch {
                configured: config.additional_states_dim,
                emitted: observation::SENSOR_DIM,
            }
            .into());
        }

        let mut physics = collaborators.physics;
        physics.set_timestep(physics_timestep)?;

        tracing::info!(
            substeps,
            electricity_cost = config.electricity_cost,
            stall_torque_cost = config.stall_torque_cost,
            "navigation environment ready"
        );

        let assembler = Assembler::new(channels, config.resolution, config.additional_states_dim);
        Ok(Self {
            config,
            assembler,
            substeps,
            actuator: collaborators.actuator,
            physics,
            camera: collaborators.camera,
            filler: collaborators.filler,
            markers: collaborators.markers,
            costs: collaborators.costs.unwrap_or_else(|| Box::new(NoCosts)),
            rng: Rng::with_seed(seed),
            potential: PotentialTracker::new(),
            current_step: 0,
            current_episode: 0,
            poses: None,
        })
    }

    /// Begin a new episode and return its first observation.
    ///
    /// Resamples the initial and goal poses, teleports the robot, and zeroes
    /// the step counter and potential. Produces no reward and no termination
    /// flag. A pose-sampling failure aborts the attempt; a fresh `reset` may
    /// succeed on a new draw.
    pub fn reset(&mut self) -> Result<ObservationRecord> {
        self.actuator.reset_to_canonical_state()?;

        let (initial, goal) = sampler::sample_initial_and_goal(&self.config, &mut self.rng)?;
        self.actuator.set_pose(initial)?;
        if self.config.visual_markers {
            if let Some(markers) = self.markers.as_mut() {
                markers.place(initial.position, goal.position)?;
            }
        }

        self.poses = Some((initial, goal));
        self.current_step = 0;
        self.potential.reset();
        self.current_episode += 1;
        tracing::debug!(
            episode = self.current_episode,
            initial = ?initial.position,
            goal = ?goal.position,
            "episode reset"
        );

        let links = dedup_links(self.physics.contacts(self.actuator.body_id())?);
        self.assembler.assemble(
            goal.position,
            self.actuator.as_ref(),
            self.camera.as_deref_mut(),
            self.filler.as_deref(),
            &links,
        )
    }

    /// Advance the episode by one action.
    ///
    /// Runs the fixed number of physics sub-steps, aggregates contacts,
    /// assembles the observation record, applies potential-based reward
    /// shaping plus the configured actuation cost terms, and decides
    /// termination. Reaching the goal overrides the shaped reward with the
    /// terminal reward and ends the episode regardless of the step count.
    pub fn step(&mut self, action: &[f32]) -> Result<Transition> {
        let (initial, goal) = self
            .poses
            .ok_or_else(|| anyhow!("step called before reset"))?;

        self.actuator.apply_action(action)?;

        let mut accumulated: Vec<i32> = Vec::new();
        for _ in 0..self.substeps {
            self.physics.advance_one_substep()?;
            for contact in self.physics.contacts(self.actuator.body_id())? {
                accumulated.push(contact.link_index);
            }
        }
        let links = dedup_links_from(accumulated);

        let observation = self.assembler.assemble(
            goal.position,
            self.actuator.as_ref(),
            self.camera.as_deref_mut(),
            self.filler.as_deref(),
            &links,
        )?;

        let robot_position = self.robot_position();
        let progress = self
            .potential
            .update(goal.position, robot_position, initial.position);
        let electricity =
            self.config.electricity_cost * self.costs.electricity(self.actuator.as_ref());
        let stall =
            self.config.stall_torque_cost * self.costs.stall_torque(self.actuator.as_ref());
        let mut reward = progress + electricity + stall;

        self.current_step += 1;
        let mut done = self.current_step >= self.config.max_step;

        if goal.position.distance(robot_position) < self.config.dist_tol {
            tracing::info!(step = self.current_step, "goal reached");
            reward = self.config.terminal_reward;
            done = true;
        }

        Ok(Transition {
            observation,
            reward,
            done,
            info: Info::new(),
        })
    }

    /// Pose accessor fixed by the task variant.
    fn robot_position(&self) -> Vec3 {
        match self.config.task {
            TaskMode::Pointgoal => self.actuator.position(),
            TaskMode::Reaching => self.actuator.end_effector_position(),
        }
    }

    /// Configured channels, in output order.
    #[must_use]
    pub fn channels(&self) -> &[Channel] {
        self.assembler.channels()
    }

    /// Fixed array shape of every configured channel, in output order.
    #[must_use]
    pub fn observation_shapes(&self) -> Vec<(Channel, Vec<usize>)> {
        self.assembler.shapes()
    }

    /// Action dimensionality declared by the actuator.
    #[must_use]
    pub fn action_dim(&self) -> usize {
        self.actuator.action_dim()
    }

    /// Stored progress potential.
    #[must_use]
    pub fn potential(&self) -> f32 {
        self.potential.value()
    }

    /// Steps taken in the running episode.
    #[must_use]
    pub fn current_step(&self) -> u32 {
        self.current_step
    }

    /// Initial and goal poses of the running episode, once `reset` has run.
    #[must_use]
    pub fn episode_poses(&self) -> Option<(Pose, Pose)> {
        self.poses
    }

    /// Episodes started since construction.
    #[must_use]
    pub fn current_episode(&self) -> u64 {
        self.current_episode
    }

    /// Physics sub-steps executed per control step.
    #[must_use]
    pub fn substeps(&self) -> u32 {
        self.substeps
    }
}

/// Number of physics sub-steps per control step. The quotient must be a
/// positive integer.
fn substep_count(action_timestep: f32, physics_timestep: f32) -> Result<u32, ConfigError> {
    let non_integral = ConfigError::NonIntegralSubsteps {
        action: action_timestep,
        physics: physics_timestep,
    };
    if !(action_timestep > 0.0 && physics_timestep > 0.0) {
        return Err(non_integral);
    }
    let ratio = action_timestep / physics_timestep;
    let rounded = ratio.round();
    if rounded < 1.0 || (ratio - rounded).abs() > 1e-4 * rounded {
        return Err(non_integral);
    }
    Ok(rounded as u32)
}

fn dedup_links(contacts: Vec<crate::types::ContactPoint>) -> Vec<i32> {
    dedup_links_from(contacts.into_iter().map(|c| c.link_index).collect())
}

fn dedup_links_from(links: Vec<i32>) -> Vec<i32> {
    let unique: BTreeSet<i32> = links.into_iter().collect();
    unique.into_iter().collect()
}
