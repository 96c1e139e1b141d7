#![allow(dead_code)]
//! Shared scripted collaborators for the integration tests.
//!
//! One `MockWorld` sits behind `Rc<RefCell<_>>` handles so the actuator and
//! physics adapters observe the same state, the way real collaborators share
//! one engine. Tests keep a handle too and move the robot between steps.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use anyhow::Result;
use nav::{
    Actuator, Camera, Collaborators, ContactPoint, Filler, Image, Markers, NavConfig, NavEnv,
    Physics, Pose, RenderMode, TaskMode, Vec3,
};

pub struct MockWorld {
    pub position: Vec3,
    pub rpy: Vec3,
    pub end_effector: Vec3,
    pub canonical_resets: usize,
    pub set_poses: Vec<Pose>,
    pub actions: Vec<Vec<f32>>,
    pub substeps_taken: usize,
    pub timestep: f32,
    /// Links returned by each successive `contacts` query; empty once drained.
    pub contact_script: VecDeque<Vec<i32>>,
}

impl MockWorld {
    pub fn new() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            position: Vec3::ZERO,
            rpy: Vec3::ZERO,
            end_effector: Vec3::ZERO,
            canonical_resets: 0,
            set_poses: Vec::new(),
            actions: Vec::new(),
            substeps_taken: 0,
            timestep: 0.0,
            contact_script: VecDeque::new(),
        }))
    }
}

pub struct MockActuator(pub Rc<RefCell<MockWorld>>);

impl Actuator for MockActuator {
    fn reset_to_canonical_state(&mut self) -> Result<()> {
        let mut world = self.0.borrow_mut();
        world.canonical_resets += 1;
        world.position = Vec3::ZERO;
        world.rpy = Vec3::ZERO;
        Ok(())
    }

    fn set_pose(&mut self, pose: Pose) -> Result<()> {
        let mut world = self.0.borrow_mut();
        world.position = pose.position;
        world.rpy = pose.rpy;
        world.set_poses.push(pose);
        Ok(())
    }

    fn apply_action(&mut self, action: &[f32]) -> Result<()> {
        self.0.borrow_mut().actions.push(action.to_vec());
        Ok(())
    }

    fn position(&self) -> Vec3 {
        self.0.borrow().position
    }

    fn orientation_rpy(&self) -> Vec3 {
        self.0.borrow().rpy
    }

    fn end_effector_position(&self) -> Vec3 {
        self.0.borrow().end_effector
    }

    fn action_dim(&self) -> usize {
        2
    }

    fn body_id(&self) -> u64 {
        1
    }
}

pub struct MockPhysics(pub Rc<RefCell<MockWorld>>);

impl Physics for MockPhysics {
    fn set_timestep(&mut self, dt: f32) -> Result<()> {
        self.0.borrow_mut().timestep = dt;
        Ok(())
    }

    fn advance_one_substep(&mut self) -> Result<()> {
        self.0.borrow_mut().substeps_taken += 1;
        Ok(())
    }

    fn contacts(&self, _body_id: u64) -> Result<Vec<ContactPoint>> {
        let links = self
            .0
            .borrow_mut()
            .contact_script
            .pop_front()
            .unwrap_or_default();
        Ok(links
            .into_iter()
            .map(|link_index| ContactPoint { link_index })
            .collect())
    }
}

/// Camera returning constant synthetic frames; records requested modes.
pub struct SyntheticCamera {
    pub resolution: usize,
    pub renders: Rc<RefCell<Vec<RenderMode>>>,
}

impl SyntheticCamera {
    pub fn new(resolution: usize) -> Self {
        Self {
            resolution,
            renders: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl Camera for SyntheticCamera {
    fn render(&mut self, mode: RenderMode) -> Result<Image> {
        self.renders.borrow_mut().push(mode);
        let r = self.resolution;
        let image = match mode {
            // RGBA so the assembler has a fourth channel to drop.
            RenderMode::Color => {
                Image::new(r, r, 4, [0.2, 0.4, 0.6, 1.0].repeat(r * r))
            }
            // Camera-frame positions with everything 2.5 units ahead.
            RenderMode::Position3d => Image::new(r, r, 3, [0.0, 0.0, -2.5].repeat(r * r)),
            RenderMode::Normal => Image::new(r, r, 3, [0.0, 0.0, 1.0].repeat(r * r)),
            RenderMode::Segmentation => Image::new(r, r, 1, vec![0.0; r * r]),
        };
        Ok(image)
    }
}

/// In-painting stand-in that inverts every sample.
pub struct InvertFiller;

impl Filler for InvertFiller {
    fn infer(&self, color: &Image) -> Result<Image> {
        Ok(color.map_pixels(color.channels(), |src, dst| {
            for (d, s) in dst.iter_mut().zip(src) {
                *d = 1.0 - s;
            }
        }))
    }
}

/// Marker layer that records every placement.
pub struct RecordingMarkers(pub Rc<RefCell<Vec<(Vec3, Vec3)>>>);

impl Markers for RecordingMarkers {
    fn place(&mut self, initial: Vec3, goal: Vec3) -> Result<()> {
        self.0.borrow_mut().push((initial, goal));
        Ok(())
    }
}

/// Fixed start at the origin, fixed goal two units down the x axis,
/// five-step cap.
pub fn point_config(output: &[&str]) -> NavConfig {
    NavConfig {
        initial_pos_low: [0.0, 0.0, 0.0],
        initial_pos_high: [0.0, 0.0, 0.0],
        initial_orn_low: [0.0, 0.0, 0.0],
        initial_orn_high: [0.0, 0.0, 0.0],
        target_pos_low: [2.0, 0.0, 0.0],
        target_pos_high: [2.0, 0.0, 0.0],
        target_orn_low: [0.0, 0.0, 0.0],
        target_orn_high: [0.0, 0.0, 0.0],
        valid_pos: None,
        additional_states_dim: 3,
        dist_tol: 0.5,
        max_step: 5,
        terminal_reward: 10.0,
        electricity_cost: 0.0,
        stall_torque_cost: 0.0,
        discount_factor: 1.0,
        output: output.iter().map(|s| (*s).to_string()).collect(),
        resolution: 4,
        task: TaskMode::Pointgoal,
        visual_markers: false,
    }
}

/// Wire a `MockWorld` into a controller, attaching a camera and filler when
/// the output list needs them. Four physics sub-steps per control step.
pub fn make_env(config: NavConfig) -> (NavEnv, Rc<RefCell<MockWorld>>) {
    let world = MockWorld::new();
    let needs_camera = config
        .output
        .iter()
        .any(|name| !matches!(name.as_str(), "sensor" | "bump"));
    let needs_filler = config.output.iter().any(|name| name.as_str() == "rgb_filled");
    let collaborators = Collaborators {
        actuator: Box::new(MockActuator(world.clone())),
        physics: Box::new(MockPhysics(world.clone())),
        camera: needs_camera
            .then(|| Box::new(SyntheticCamera::new(config.resolution)) as Box<dyn Camera>),
        filler: needs_filler.then(|| Box::new(InvertFiller) as Box<dyn Filler>),
        markers: None,
        costs: None,
    };
    let env = NavEnv::new(config, collaborators, 0.1, 0.025, 7).unwrap();
    (env, world)
}
