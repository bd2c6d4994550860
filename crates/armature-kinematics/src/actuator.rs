//! Constrained rotary actuators.
//!
//! An [`Actuator`] binds one degree of freedom to a single axis of its
//! owning joint's basis. Applying a command clamps the requested delta
//! against the angle limits and writes the residual back into the command,
//! so every later reader (sibling descendants, the self-commit) sees the
//! clamped delta. Clamping is expected control flow and never errors.

use nalgebra::Vector3;

use armature_core::{Axis, ConfigError, GeometryError};

use crate::command::Command;
use crate::joint::Frame;
use crate::rotation::{self, Basis};

// ---------------------------------------------------------------------------
// AngleLimits
// ---------------------------------------------------------------------------

/// Inclusive angle bounds in radians. Either side may be infinite.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AngleLimits {
    min: f64,
    max: f64,
}

impl AngleLimits {
    /// Create limits from radian bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidLimits`] if `min > max`.
    pub fn new(min: f64, max: f64) -> Result<Self, ConfigError> {
        if min > max {
            return Err(ConfigError::InvalidLimits { min, max });
        }
        Ok(Self { min, max })
    }

    /// Create limits from degree bounds, converting once.
    pub fn from_degrees(min_deg: f64, max_deg: f64) -> Result<Self, ConfigError> {
        Self::new(min_deg.to_radians(), max_deg.to_radians())
    }

    /// Limits admitting any angle.
    pub const fn unbounded() -> Self {
        Self {
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
        }
    }

    pub const fn min(&self) -> f64 {
        self.min
    }

    pub const fn max(&self) -> f64 {
        self.max
    }

    /// Clamp `angle` into `[min, max]`.
    pub fn clamp(&self, angle: f64) -> f64 {
        angle.clamp(self.min, self.max)
    }

    /// Whether `angle` lies within the bounds.
    pub fn contains(&self, angle: f64) -> bool {
        self.min <= angle && angle <= self.max
    }
}

impl Default for AngleLimits {
    fn default() -> Self {
        Self::unbounded()
    }
}

// ---------------------------------------------------------------------------
// Actuator
// ---------------------------------------------------------------------------

/// One constrained rotary degree of freedom of a joint.
///
/// The committed `angle` always lies within the limits; it changes only on
/// self-commit, never while the actuator is applied to descendants.
#[derive(Clone, Debug, PartialEq)]
pub struct Actuator {
    axis: Axis,
    angle: f64,
    limits: AngleLimits,
}

impl Actuator {
    /// New actuator at angle zero.
    pub const fn new(axis: Axis, limits: AngleLimits) -> Self {
        Self {
            axis,
            angle: 0.0,
            limits,
        }
    }

    pub const fn axis(&self) -> Axis {
        self.axis
    }

    /// Committed angle in radians.
    pub const fn angle(&self) -> f64 {
        self.angle
    }

    pub const fn limits(&self) -> &AngleLimits {
        &self.limits
    }

    /// Clamp the command's delta on this actuator's axis against the limits.
    ///
    /// Writes the residual back into the command and returns
    /// `(clamped delta, clamped absolute angle)`.
    fn constrain(&self, command: &mut Command) -> (f64, f64) {
        let index = self.axis.index();
        let requested = self.angle + command.rotation[index];
        let clamped = self.limits.clamp(requested);
        command.rotation[index] += clamped - requested;
        (command.rotation[index], clamped)
    }

    /// Apply this actuator's (clamped) delta to one descendant frame.
    ///
    /// Rotates the descendant's basis and location rigidly about
    /// `parent`'s pre-update frame. The actuator's own angle is untouched;
    /// constraint state belongs to the owning joint.
    pub(crate) fn apply_to_descendant(
        &self,
        parent: &Frame,
        location: &mut Vector3<f64>,
        basis: &mut Basis,
        command: &mut Command,
    ) -> Result<(), GeometryError> {
        let (delta, _) = self.constrain(command);
        let q = rotation::axis_angle(&parent.basis.axis(self.axis), delta)?;
        basis.rotate(&q);
        *location = q * (*location - parent.location) + parent.location;
        Ok(())
    }

    /// Self-commit: persist the clamped absolute angle.
    ///
    /// The owning joint's basis and location are invariant under its own
    /// actuation; only strict descendants rotate.
    pub(crate) fn commit(&mut self, command: &mut Command) {
        let (_, clamped) = self.constrain(command);
        self.angle = clamped;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn inverted_limits_rejected() {
        assert_eq!(
            AngleLimits::new(1.0, -1.0),
            Err(ConfigError::InvalidLimits { min: 1.0, max: -1.0 })
        );
    }

    #[test]
    fn degree_limits_convert_once() {
        let limits = AngleLimits::from_degrees(-90.0, 90.0).unwrap();
        assert_relative_eq!(limits.min(), -std::f64::consts::FRAC_PI_2, epsilon = 1e-12);
        assert_relative_eq!(limits.max(), std::f64::consts::FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn unbounded_admits_everything() {
        let limits = AngleLimits::unbounded();
        assert!(limits.contains(1.0e9));
        assert_eq!(limits.clamp(-1.0e9), -1.0e9);
    }

    #[test]
    fn commit_within_limits() {
        let mut actuator = Actuator::new(
            Axis::Z,
            AngleLimits::from_degrees(-45.0, 45.0).unwrap(),
        );
        let mut command = Command::rotation_about(Axis::Z, 10.0_f64.to_radians());
        actuator.commit(&mut command);
        assert_relative_eq!(actuator.angle(), 10.0_f64.to_radians(), epsilon = 1e-15);
        // No clamping: the command delta is untouched.
        assert_relative_eq!(
            command.rotation(Axis::Z),
            10.0_f64.to_radians(),
            epsilon = 1e-15
        );
    }

    #[test]
    fn commit_clamps_and_writes_residual_back() {
        let mut actuator = Actuator::new(
            Axis::Y,
            AngleLimits::from_degrees(-45.0, 45.0).unwrap(),
        );
        let mut command = Command::rotation_about(Axis::Y, 60.0_f64.to_radians());
        actuator.commit(&mut command);

        // Persisted angle is the bound itself, exactly.
        assert_eq!(actuator.angle(), 45.0_f64.to_radians());
        // The command now carries the clamped delta for later readers.
        assert_relative_eq!(
            command.rotation(Axis::Y),
            45.0_f64.to_radians(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn repeated_commits_saturate_at_bound() {
        let mut actuator = Actuator::new(
            Axis::X,
            AngleLimits::from_degrees(f64::NEG_INFINITY, 45.0).unwrap(),
        );
        for _ in 0..4 {
            let mut command = Command::rotation_about(Axis::X, 10.0_f64.to_radians());
            actuator.commit(&mut command);
        }
        let mut fifth = Command::rotation_about(Axis::X, 10.0_f64.to_radians());
        actuator.commit(&mut fifth);

        assert_eq!(actuator.angle(), 45.0_f64.to_radians());
        // Only 5 of the requested 10 degrees were admitted on the fifth push.
        assert_relative_eq!(
            fifth.rotation(Axis::X),
            5.0_f64.to_radians(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn commit_leaves_other_axes_untouched() {
        let mut actuator = Actuator::new(Axis::X, AngleLimits::unbounded());
        let mut command = Command::rotation_about(Axis::Z, 0.3);
        command.set_rotation(Axis::X, 0.1);
        actuator.commit(&mut command);
        assert_relative_eq!(command.rotation(Axis::Z), 0.3, epsilon = 1e-15);
    }
}
