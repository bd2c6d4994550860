//! Joints: the rigid nodes of the kinematic tree.

use nalgebra::Vector3;

use armature_core::JointId;

use crate::actuator::Actuator;
use crate::rotation::Basis;

// ---------------------------------------------------------------------------
// Frame
// ---------------------------------------------------------------------------

/// A snapshot of a joint's pose: world location plus local basis.
///
/// Command propagation rotates descendants about the *pre-update* frame of
/// the commanded joint, so the frame is captured before any state changes.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// World-space location.
    pub location: Vector3<f64>,
    /// Local orthonormal basis.
    pub basis: Basis,
}

// ---------------------------------------------------------------------------
// Joint
// ---------------------------------------------------------------------------

/// One rigid node of the tree: a world location, a local basis, and an
/// ordered list of constrained actuators.
#[derive(Clone, Debug, PartialEq)]
pub struct Joint {
    pub(crate) id: JointId,
    pub(crate) location: Vector3<f64>,
    pub(crate) basis: Basis,
    pub(crate) actuators: Vec<Actuator>,
}

impl Joint {
    pub(crate) const fn new(
        id: JointId,
        location: Vector3<f64>,
        basis: Basis,
        actuators: Vec<Actuator>,
    ) -> Self {
        Self {
            id,
            location,
            basis,
            actuators,
        }
    }

    pub const fn id(&self) -> JointId {
        self.id
    }

    /// Current world-space location.
    pub const fn location(&self) -> &Vector3<f64> {
        &self.location
    }

    /// Current local basis.
    pub const fn basis(&self) -> &Basis {
        &self.basis
    }

    /// Actuators in application order.
    pub fn actuators(&self) -> &[Actuator] {
        &self.actuators
    }

    /// Snapshot the current pose.
    pub fn frame(&self) -> Frame {
        Frame {
            location: self.location,
            basis: self.basis.clone(),
        }
    }
}
