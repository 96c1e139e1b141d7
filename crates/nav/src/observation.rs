//! Observation channel resolution and assembly.
//!
//! The configured output names are resolved into a closed, ordered
//! [`Channel`] list once at construction; assembly then walks that list every
//! step with no per-step string matching. The key set and order of every
//! [`ObservationRecord`] are therefore identical across all `reset` and
//! `step` calls for the lifetime of the environment.

use anyhow::{anyhow, Result};
use glam::{Mat3, Vec3};

use crate::collaborators::{Actuator, Camera, Filler};
use crate::error::ConfigError;
use crate::types::{Image, RenderMode, BASE_LINK};

/// Far plane used to normalize depth readings into [0, 1], in length units.
const DEPTH_FAR: f32 = 5.0;

/// Values emitted by the proprioceptive `sensor` channel.
pub(crate) const SENSOR_DIM: usize = 3;

/// One named observation channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Goal-relative position rotated into the body frame.
    Sensor,
    /// Color render, first three channels, range [0, 1].
    Rgb,
    /// Normalized depth from the 3d-position render, one channel.
    Depth,
    /// Surface normal render, passthrough.
    Normal,
    /// Segmentation render, passthrough.
    Seg,
    /// Color render passed through the in-painting collaborator.
    RgbFilled,
    /// Whether any contact this step touched the robot's base link.
    Bump,
}

impl Channel {
    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        match name {
            "sensor" => Ok(Self::Sensor),
            "rgb" => Ok(Self::Rgb),
            "depth" => Ok(Self::Depth),
            "normal" => Ok(Self::Normal),
            "seg" => Ok(Self::Seg),
            "rgb_filled" => Ok(Self::RgbFilled),
            "bump" => Ok(Self::Bump),
            other => Err(ConfigError::UnknownChannel(other.to_string())),
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sensor => "sensor",
            Self::Rgb => "rgb",
            Self::Depth => "depth",
            Self::Normal => "normal",
            Self::Seg => "seg",
            Self::RgbFilled => "rgb_filled",
            Self::Bump => "bump",
        }
    }

    /// Channels that read from the camera collaborator.
    #[must_use]
    pub const fn needs_camera(self) -> bool {
        matches!(
            self,
            Self::Rgb | Self::Depth | Self::Normal | Self::Seg | Self::RgbFilled
        )
    }
}

/// Resolve configured output names into the fixed channel list.
pub fn resolve_channels(names: &[String]) -> Result<Vec<Channel>, ConfigError> {
    names.iter().map(|name| Channel::parse(name)).collect()
}

/// One channel's reading for a single control step.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelValue {
    Vector(Vec<f32>),
    Image(Image),
    Flag(bool),
}

/// Insertion-ordered channel-to-value mapping produced once per `reset` or
/// `step`. Owned by the caller after return; never aliases internal state.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationRecord {
    entries: Vec<(Channel, ChannelValue)>,
}

impl ObservationRecord {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    fn push(&mut self, channel: Channel, value: ChannelValue) {
        self.entries.push((channel, value));
    }

    #[must_use]
    pub fn get(&self, channel: Channel) -> Option<&ChannelValue> {
        self.entries
            .iter()
            .find(|(c, _)| *c == channel)
            .map(|(_, v)| v)
    }

    /// Channel keys in configured order.
    pub fn channels(&self) -> impl Iterator<Item = Channel> + '_ {
        self.entries.iter().map(|(c, _)| *c)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Channel, &ChannelValue)> {
        self.entries.iter().map(|(c, v)| (*c, v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Assembles one [`ObservationRecord`] per control step from the collaborator
/// sensors, walking the channel list fixed at construction.
pub struct Assembler {
    channels: Vec<Channel>,
    resolution: usize,
    sensor_dim: usize,
}

impl Assembler {
    pub(crate) fn new(channels: Vec<Channel>, resolution: usize, sensor_dim: usize) -> Self {
        Self {
            channels,
            resolution,
            sensor_dim,
        }
    }

    pub(crate) fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Fixed array shape of every configured channel, in configured order.
    pub(crate) fn shapes(&self) -> Vec<(Channel, Vec<usize>)> {
        let r = self.resolution;
        self.channels
            .iter()
            .map(|&channel| {
                let shape = match channel {
                    Channel::Sensor => vec![self.sensor_dim],
                    Channel::Rgb | Channel::RgbFilled | Channel::Normal => vec![r, r, 3],
                    Channel::Depth | Channel::Seg => vec![r, r, 1],
                    Channel::Bump => vec![1],
                };
                (channel, shape)
            })
            .collect()
    }

    /// Pull one reading per configured channel and package the record.
    ///
    /// `collision_links` is the deduplicated contact-link set accumulated
    /// over the step's physics sub-steps.
    pub(crate) fn assemble(
        &self,
        goal: Vec3,
        actuator: &dyn Actuator,
        mut camera: Option<&mut (dyn Camera + '_)>,
        filler: Option<&dyn Filler>,
        collision_links: &[i32],
    ) -> Result<ObservationRecord> {
        let mut record = ObservationRecord::with_capacity(self.channels.len());
        let mut color_cache: Option<Image> = None;

        for &channel in &self.channels {
            let value = match channel {
                Channel::Sensor => ChannelValue::Vector(goal_relative_sensor(
                    goal,
                    actuator.position(),
                    actuator.orientation_rpy(),
                )),
                Channel::Rgb => {
                    let rgb = color_channels(&render(&mut camera, RenderMode::Color)?);
                    color_cache = Some(rgb.clone());
                    ChannelValue::Image(rgb)
                }
                Channel::Depth => ChannelValue::Image(depth_from_positions(&render(
                    &mut camera,
                    RenderMode::Position3d,
                )?)),
                Channel::Normal => {
                    ChannelValue::Image(render(&mut camera, RenderMode::Normal)?)
                }
                Channel::Seg => {
                    ChannelValue::Image(render(&mut camera, RenderMode::Segmentation)?)
                }
                Channel::RgbFilled => {
                    let rgb = match &color_cache {
                        Some(cached) => cached.clone(),
                        None => color_channels(&render(&mut camera, RenderMode::Color)?),
                    };
                    let filler = filler
                        .ok_or_else(|| anyhow!("in-painting collaborator is not available"))?;
                    ChannelValue::Image(filler.infer(&rgb)?)
                }
                Channel::Bump => ChannelValue::Flag(collision_links.contains(&BASE_LINK)),
            };
            record.push(channel, value);
        }

        Ok(record)
    }
}

fn render(camera: &mut Option<&mut (dyn Camera + '_)>, mode: RenderMode) -> Result<Image> {
    camera
        .as_deref_mut()
        .ok_or_else(|| anyhow!("camera collaborator is not available"))?
        .render(mode)
}

/// Goal position minus robot position, rotated into the body frame using the
/// robot's current roll/pitch/yaw.
pub(crate) fn goal_relative_sensor(goal: Vec3, position: Vec3, rpy: Vec3) -> Vec<f32> {
    let relative = goal - position;
    let local = world_to_body(rpy) * relative;
    vec![local.x, local.y, local.z]
}

/// Inverse of the body-to-world rotation built from extrinsic x-y-z Euler
/// angles.
fn world_to_body(rpy: Vec3) -> Mat3 {
    let body_to_world =
        Mat3::from_rotation_z(rpy.z) * Mat3::from_rotation_y(rpy.y) * Mat3::from_rotation_x(rpy.x);
    body_to_world.transpose()
}

/// First three channels of a color render.
fn color_channels(image: &Image) -> Image {
    image.map_pixels(3, |src, dst| dst.copy_from_slice(&src[..3]))
}

/// Negated depth channel of a 3d-position render, normalized by the far
/// plane and clamped to [0, 1].
fn depth_from_positions(image: &Image) -> Image {
    image.map_pixels(1, |src, dst| {
        dst[0] = (-src[2] / DEPTH_FAR).clamp(0.0, 1.0);
    })
}
