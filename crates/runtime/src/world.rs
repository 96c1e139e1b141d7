//! Kinematic point-robot fixture for the episode driver.
//!
//! A velocity-controlled point moving in the ground plane, just enough world
//! to exercise the control loop end to end. The actuator and physics adapters
//! share one state cell, the way real collaborators share one engine.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use nav::{Actuator, ContactPoint, Physics, Pose, Vec3};

/// Planar velocity commands, clamped to one length unit per second.
const MAX_SPEED: f32 = 1.0;

pub struct PointWorld {
    position: Vec3,
    rpy: Vec3,
    velocity: Vec3,
    dt: f32,
}

impl PointWorld {
    /// Build a world and split it into its actuator and physics handles.
    pub fn handles() -> (PointActuator, PointPhysics) {
        let world = Rc::new(RefCell::new(Self {
            position: Vec3::ZERO,
            rpy: Vec3::ZERO,
            velocity: Vec3::ZERO,
            dt: 0.0,
        }));
        (PointActuator(world.clone()), PointPhysics(world))
    }
}

pub struct PointActuator(Rc<RefCell<PointWorld>>);

impl Actuator for PointActuator {
    fn reset_to_canonical_state(&mut self) -> Result<()> {
        let mut world = self.0.borrow_mut();
        world.position = Vec3::ZERO;
        world.rpy = Vec3::ZERO;
        world.velocity = Vec3::ZERO;
        Ok(())
    }

    fn set_pose(&mut self, pose: Pose) -> Result<()> {
        let mut world = self.0.borrow_mut();
        world.position = pose.position;
        world.rpy = pose.rpy;
        world.velocity = Vec3::ZERO;
        Ok(())
    }

    fn apply_action(&mut self, action: &[f32]) -> Result<()> {
        anyhow::ensure!(action.len() == 2, "expected a 2-dimensional action");
        let mut world = self.0.borrow_mut();
        world.velocity = Vec3::new(
            action[0].clamp(-MAX_SPEED, MAX_SPEED),
            action[1].clamp(-MAX_SPEED, MAX_SPEED),
            0.0,
        );
        Ok(())
    }

    fn position(&self) -> Vec3 {
        self.0.borrow().position
    }

    fn orientation_rpy(&self) -> Vec3 {
        self.0.borrow().rpy
    }

    fn end_effector_position(&self) -> Vec3 {
        self.0.borrow().position
    }

    fn action_dim(&self) -> usize {
        2
    }

    fn body_id(&self) -> u64 {
        0
    }
}

pub struct PointPhysics(Rc<RefCell<PointWorld>>);

impl Physics for PointPhysics {
    fn set_timestep(&mut self, dt: f32) -> Result<()> {
        self.0.borrow_mut().dt = dt;
        Ok(())
    }

    fn advance_one_substep(&mut self) -> Result<()> {
        let mut world = self.0.borrow_mut();
        let displacement = world.velocity * world.dt;
        world.position += displacement;
        Ok(())
    }

    fn contacts(&self, _body_id: u64) -> Result<Vec<ContactPoint>> {
        // An unobstructed plane: the point robot never touches anything.
        Ok(Vec::new())
    }
}
