//! Potential-based reward shaping.

use glam::Vec3;

/// Scale applied to potential deltas so a typical per-step progress
/// magnitude is about 1.0.
const PROGRESS_SCALE: f32 = 1000.0;

/// Scalar progress potential carried across the steps of one episode.
///
/// The potential is the current goal distance normalized by the episode's
/// starting goal distance, so it begins at 1.0 and reaches 0.0 at the goal.
#[derive(Debug, Clone, Copy)]
pub struct PotentialTracker {
    potential: f32,
}

impl PotentialTracker {
    #[must_use]
    pub const fn new() -> Self {
        Self { potential: 1.0 }
    }

    /// Reinitialize for a new episode.
    pub fn reset(&mut self) {
        self.potential = 1.0;
    }

    #[must_use]
    pub const fn value(&self) -> f32 {
        self.potential
    }

    /// Replace the stored potential with the normalized goal distance of the
    /// current position and return the scaled progress made this step.
    ///
    /// The initial and goal positions must not coincide; the pose sampler's
    /// separation invariant guarantees this, and a violation panics rather
    /// than producing a non-finite reward.
    pub fn update(&mut self, goal: Vec3, current: Vec3, initial: Vec3) -> f32 {
        let span = goal.distance(initial);
        assert!(span > 0.0, "initial and goal positions coincide");
        let new_potential = goal.distance(current) / span;
        let progress = (self.potential - new_potential) * PROGRESS_SCALE;
        self.potential = new_potential;
        progress
    }
}

impl Default for PotentialTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_and_resets_at_one() {
        let mut tracker = PotentialTracker::new();
        assert!((tracker.value() - 1.0).abs() < f32::EPSILON);
        tracker.update(Vec3::new(2.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::ZERO);
        tracker.reset();
        assert!((tracker.value() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn halving_the_goal_distance_scores_five_hundred() {
        let mut tracker = PotentialTracker::new();
        let goal = Vec3::new(2.0, 0.0, 0.0);
        let progress = tracker.update(goal, Vec3::new(1.0, 0.0, 0.0), Vec3::ZERO);
        assert!((progress - 500.0).abs() < 1e-3, "progress={progress}");
        assert!((tracker.value() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn standing_still_scores_zero() {
        let mut tracker = PotentialTracker::new();
        let goal = Vec3::new(2.0, 0.0, 0.0);
        let progress = tracker.update(goal, Vec3::ZERO, Vec3::ZERO);
        assert!(progress.abs() < 1e-6, "progress={progress}");
        assert!((tracker.value() - 1.0).abs() < 1e-6);
    }

    #[test]
    #[should_panic(expected = "coincide")]
    fn coincident_initial_and_goal_panics() {
        let mut tracker = PotentialTracker::new();
        let p = Vec3::new(1.0, 1.0, 0.0);
        tracker.update(p, Vec3::ZERO, p);
    }
}
