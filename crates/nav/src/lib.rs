#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
//! # Navigation Environment Core
//!
//! Episodic control loop for embodied-agent navigation tasks. Given a physics
//! simulator, a robot actuator, and a sensor suite, all supplied through
//! narrow collaborator traits, this crate turns one discrete action into one
//! environment transition: action application, fixed-count physics
//! sub-stepping, contact aggregation, multi-channel observation assembly,
//! potential-based reward shaping, and episode termination.
//!
//! ## Key Components
//!
//! -   **Configuration:** [`NavConfig`] holds sampling bounds, tolerances,
//!     reward constants, and the ordered output channel list. It is parsed
//!     once, validated at construction, and never mutated.
//! -   **Episode control:** [`NavEnv`] owns the episode lifecycle and exposes
//!     the two-operation surface every training loop expects: [`NavEnv::reset`]
//!     and [`NavEnv::step`].
//! -   **Collaborators:** the physics engine, renderer, in-painting network,
//!     and robot model stay outside this crate, behind the traits in
//!     [`collaborators`]. The controller holds explicit handles to them; there
//!     is no ambient engine state.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use nav::{Collaborators, NavConfig, NavEnv};
//!
//! let config = NavConfig::from_json(json)?;
//! let mut env = NavEnv::new(config, collaborators, 0.1, 1.0 / 240.0, seed)?;
//! let first = env.reset()?;
//! let transition = env.step(&action)?;
//! ```

pub mod collaborators;
pub mod config;
pub mod env;
pub mod error;
pub mod observation;
pub mod potential;
pub mod sampler;
pub mod types;

pub use collaborators::{
    Actuator, Camera, Collaborators, CostModel, Filler, Markers, NoCosts, Physics,
};
pub use config::{NavConfig, TaskMode};
pub use env::{Info, NavEnv, Transition};
pub use error::ConfigError;
pub use observation::{Channel, ChannelValue, ObservationRecord};
pub use potential::PotentialTracker;
pub use types::{ContactPoint, Image, Pose, RenderMode, Vec3, BASE_LINK};
