//! Kinematic joint tree for the armature engine.
//!
//! A [`Skeleton`] owns a tree of rigid [`Joint`]s, each carrying an
//! orthonormal local [`Basis`] and an ordered list of constrained rotary
//! [`Actuator`]s. Per-joint roto-translation [`Command`]s are propagated
//! down the tree by [`Skeleton::process_command`], which rigidly re-orients
//! the joint's whole subtree about the joint's pre-update frame.
//!
//! Solvers evaluate hypothetical commands on disposable shadows
//! ([`Skeleton::shadow`]): value copies of the mutable joint state that
//! share the immutable [`Topology`].

pub mod actuator;
pub mod command;
pub mod joint;
pub mod rotation;
pub mod skeleton;

pub use actuator::{Actuator, AngleLimits};
pub use command::{Command, CommandBuffer};
pub use joint::{Frame, Joint};
pub use rotation::{Basis, axis_angle};
pub use skeleton::{Skeleton, Topology};

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::actuator::{Actuator, AngleLimits};
    pub use crate::command::{Command, CommandBuffer};
    pub use crate::joint::{Frame, Joint};
    pub use crate::rotation::Basis;
    pub use crate::skeleton::{Skeleton, Topology};
    pub use armature_core::{Axis, JointId};
}
