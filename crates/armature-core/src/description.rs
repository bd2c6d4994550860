//! Resolved robot description — the boundary with the loading collaborator.
//!
//! The engine does not read configuration files itself. An external loader
//! deserializes (or otherwise assembles) a [`RobotDescription`] and hands it
//! to the kinematics crate, which converts degree-valued angles to radians
//! exactly once at skeleton construction.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{Axis, JointId};

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

const fn default_min_deg() -> f64 {
    f64::NEG_INFINITY
}
const fn default_max_deg() -> f64 {
    f64::INFINITY
}

// ---------------------------------------------------------------------------
// ActuatorDescription
// ---------------------------------------------------------------------------

/// One constrained rotary degree of freedom of a joint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActuatorDescription {
    /// Basis axis index the actuator rotates about (0 = x, 1 = y, 2 = z).
    pub axis: usize,

    /// Lower angle bound in degrees (default: unbounded).
    #[serde(default = "default_min_deg")]
    pub min_deg: f64,

    /// Upper angle bound in degrees (default: unbounded).
    #[serde(default = "default_max_deg")]
    pub max_deg: f64,
}

// ---------------------------------------------------------------------------
// JointDescription
// ---------------------------------------------------------------------------

/// One joint of the robot, in description order.
///
/// `id` must equal the joint's position in [`RobotDescription::joints`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointDescription {
    pub id: JointId,

    /// Initial world location `[x, y, z]`.
    #[serde(default)]
    pub start_location: [f64; 3],

    /// Initial basis rotation `[about x, about y, about z]` in degrees,
    /// applied after the z-axis is aimed along the tree.
    #[serde(default)]
    pub start_angles: [f64; 3],

    /// Ordered actuators owned by this joint.
    #[serde(default)]
    pub actuators: Vec<ActuatorDescription>,
}

// ---------------------------------------------------------------------------
// RobotDescription
// ---------------------------------------------------------------------------

/// The complete resolved robot: joints plus the tree adjacency.
///
/// `edges[i]` lists the children of joint `i`; the edges must form a rooted
/// forest with joint 0 as the conventional root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobotDescription {
    pub joints: Vec<JointDescription>,
    pub edges: Vec<Vec<JointId>>,
}

impl RobotDescription {
    /// Field-level validation. Returns `Err` on invalid values.
    ///
    /// Checks id sequencing, edge arity and range, axis indices, and bound
    /// ordering. Forest/cycle validation happens when the topology is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.joints.len() != self.edges.len() {
            return Err(ConfigError::EdgeCountMismatch {
                joints: self.joints.len(),
                edges: self.edges.len(),
            });
        }
        for (expected, joint) in self.joints.iter().enumerate() {
            if joint.id != expected {
                return Err(ConfigError::NonSequentialId {
                    expected,
                    got: joint.id,
                });
            }
            for actuator in &joint.actuators {
                Axis::from_index(actuator.axis)?;
                if actuator.min_deg > actuator.max_deg {
                    return Err(ConfigError::InvalidLimits {
                        min: actuator.min_deg.to_radians(),
                        max: actuator.max_deg.to_radians(),
                    });
                }
            }
        }
        for (parent, children) in self.edges.iter().enumerate() {
            for &child in children {
                if child >= self.joints.len() {
                    return Err(ConfigError::EdgeOutOfRange { parent, child });
                }
            }
        }
        Ok(())
    }

    /// Number of joints.
    pub const fn len(&self) -> usize {
        self.joints.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
