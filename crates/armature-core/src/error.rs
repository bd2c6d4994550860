//! Error taxonomy for skeleton construction and kinematic evaluation.
//!
//! Construction-time problems (bad topology, bad limits, bad axis indices)
//! are [`ConfigError`]; geometric failures detected lazily during evaluation
//! (degenerate axes and alignment targets) are [`GeometryError`]. Constraint
//! clamping and IK non-convergence are normal control flow and never appear
//! here.

use thiserror::Error;

use crate::types::JointId;

/// Top-level error type for the armature crates.
#[derive(Debug, Error)]
pub enum ArmatureError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("geometry error: {0}")]
    Geometry(#[from] GeometryError),
}

/// Invalid robot configuration, rejected at construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid actuator axis index: {0} (must be 0, 1, or 2)")]
    InvalidAxis(usize),

    #[error("invalid angle limits: min {min} > max {max} (radians)")]
    InvalidLimits { min: f64, max: f64 },

    #[error("joint count {joints} does not match edge list length {edges}")]
    EdgeCountMismatch { joints: usize, edges: usize },

    #[error("joint id {got} at position {expected} (ids must be sequential from 0)")]
    NonSequentialId { expected: JointId, got: JointId },

    #[error("edge from joint {parent} references unknown joint {child}")]
    EdgeOutOfRange { parent: JointId, child: JointId },

    #[error("joint {child} has more than one parent ({first} and {second})")]
    MultipleParents {
        child: JointId,
        first: JointId,
        second: JointId,
    },

    #[error("edge list is not a rooted forest: cycle through joint {0}")]
    CyclicTopology(JointId),
}

/// Degenerate geometry detected during evaluation.
///
/// Surfaced as an error rather than silently propagating NaN state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("zero-length rotation axis")]
    DegenerateAxis,

    #[error("joint {0}: basis alignment target has zero length")]
    DegenerateTarget(JointId),

    #[error("joint {0} has neither children nor a parent to orient against")]
    IsolatedJoint(JointId),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn armature_error_from_config_error() {
        let err = ConfigError::InvalidAxis(5);
        let top: ArmatureError = err.into();
        assert!(matches!(top, ArmatureError::Config(_)));
        assert!(top.to_string().contains('5'));
    }

    #[test]
    fn armature_error_from_geometry_error() {
        let err = GeometryError::DegenerateAxis;
        let top: ArmatureError = err.into();
        assert!(matches!(top, ArmatureError::Geometry(_)));
        assert!(top.to_string().contains("zero-length"));
    }

    #[test]
    fn config_error_display_messages() {
        assert_eq!(
            ConfigError::InvalidAxis(4).to_string(),
            "invalid actuator axis index: 4 (must be 0, 1, or 2)"
        );
        assert_eq!(
            ConfigError::InvalidLimits { min: 1.0, max: 0.5 }.to_string(),
            "invalid angle limits: min 1 > max 0.5 (radians)"
        );
        assert_eq!(
            ConfigError::EdgeCountMismatch { joints: 3, edges: 2 }.to_string(),
            "joint count 3 does not match edge list length 2"
        );
        assert_eq!(
            ConfigError::NonSequentialId { expected: 1, got: 7 }.to_string(),
            "joint id 7 at position 1 (ids must be sequential from 0)"
        );
        assert_eq!(
            ConfigError::EdgeOutOfRange { parent: 0, child: 9 }.to_string(),
            "edge from joint 0 references unknown joint 9"
        );
        assert_eq!(
            ConfigError::MultipleParents {
                child: 2,
                first: 0,
                second: 1
            }
            .to_string(),
            "joint 2 has more than one parent (0 and 1)"
        );
        assert_eq!(
            ConfigError::CyclicTopology(1).to_string(),
            "edge list is not a rooted forest: cycle through joint 1"
        );
    }

    #[test]
    fn geometry_error_display_messages() {
        assert_eq!(
            GeometryError::DegenerateAxis.to_string(),
            "zero-length rotation axis"
        );
        assert_eq!(
            GeometryError::DegenerateTarget(3).to_string(),
            "joint 3: basis alignment target has zero length"
        );
        assert_eq!(
            GeometryError::IsolatedJoint(0).to_string(),
            "joint 0 has neither children nor a parent to orient against"
        );
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn errors_are_send_sync() {
        assert_send_sync::<ArmatureError>();
        assert_send_sync::<ConfigError>();
        assert_send_sync::<GeometryError>();
    }

    #[test]
    fn geometry_error_is_copy() {
        let err = GeometryError::DegenerateTarget(1);
        let err2 = err; // Copy
        assert_eq!(err, err2);
    }
}
