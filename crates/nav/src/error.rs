use thiserror::Error;

/// Invalid or unsatisfiable configuration.
///
/// Fatal to the call that raised it; the caller fixes the configuration and
/// reconstructs. Collaborator failures are not translated into this type;
/// they propagate unchanged as [`anyhow::Error`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{name} exceeds {counterpart} on axis {axis}")]
    InvalidBounds {
        name: &'static str,
        counterpart: &'static str,
        axis: usize,
    },
    #[error("valid_pos candidate list is empty")]
    EmptyCandidateList,
    #[error("unsupported output channel: {0}")]
    UnknownChannel(String),
    #[error("action timestep {action} is not an integer multiple of physics timestep {physics}")]
    NonIntegralSubsteps { action: f32, physics: f32 },
    #[error("candidate positions are too cluttered (< {min_separation} apart)")]
    CandidatesTooCluttered { min_separation: f32 },
    #[error("output channel {channel} requires a {collaborator} collaborator")]
    MissingCollaborator {
        channel: &'static str,
        collaborator: &'static str,
    },
    #[error("rgb_filled requires the rgb channel to be configured")]
    FilledWithoutRgb,
    #[error("additional_states_dim is {configured}, sensor channel emits {emitted} values")]
    SensorDimMismatch { configured: usize, emitted: usize },
}
