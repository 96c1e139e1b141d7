//! Plain data types shared across the environment core.

pub use glam::Vec3;

/// Link index reported by the physics engine for the robot's base body.
pub const BASE_LINK: i32 = -1;

/// Position plus roll/pitch/yaw orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    /// Euler angles in radians, extrinsic x-y-z order.
    pub rpy: Vec3,
}

impl Pose {
    #[must_use]
    pub const fn new(position: Vec3, rpy: Vec3) -> Self {
        Self { position, rpy }
    }
}

/// Sensor mode requested from the camera collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Color image, values in [0, 1]. May carry an alpha channel.
    Color,
    /// Per-pixel 3D position in the camera frame; channel 2 holds depth.
    Position3d,
    /// Surface normals.
    Normal,
    /// Instance segmentation labels.
    Segmentation,
}

/// One contact report from the physics collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactPoint {
    pub link_index: i32,
}

/// Row-major `height x width x channels` image buffer of `f32` samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    width: usize,
    height: usize,
    channels: usize,
    data: Vec<f32>,
}

impl Image {
    #[must_use]
    pub fn new(width: usize, height: usize, channels: usize, data: Vec<f32>) -> Self {
        assert_eq!(width * height * channels, data.len());
        Self {
            width,
            height,
            channels,
            data,
        }
    }

    #[must_use]
    pub fn zeros(width: usize, height: usize, channels: usize) -> Self {
        Self {
            width,
            height,
            channels,
            data: vec![0.0; width * height * channels],
        }
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub const fn channels(&self) -> usize {
        self.channels
    }

    #[must_use]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Sample one channel of one pixel.
    #[must_use]
    pub fn get(&self, x: usize, y: usize, channel: usize) -> f32 {
        self.data[(y * self.width + x) * self.channels + channel]
    }

    /// Build a new image by mapping every pixel of `self`.
    pub fn map_pixels(&self, out_channels: usize, mut f: impl FnMut(&[f32], &mut [f32])) -> Self {
        let mut data = vec![0.0; self.width * self.height * out_channels];
        for (src, dst) in self
            .data
            .chunks_exact(self.channels)
            .zip(data.chunks_exact_mut(out_channels))
        {
            f(src, dst);
        }
        Self {
            width: self.width,
            height: self.height,
            channels: out_channels,
            data,
        }
    }
}
