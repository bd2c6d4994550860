//! Per-joint roto-translation commands.
//!
//! A [`Command`] is the 6-component delta for one joint: three
//! rotation deltas (radians, one per basis axis) and a translation delta.
//! Commands are zero-initialized, written by a solver or caller, consumed
//! exactly once by forward-kinematics application, then reset to zero.

use nalgebra::Vector3;

use armature_core::{Axis, JointId};

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// Roto-translation delta for a single joint.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Command {
    /// Rotation deltas in radians, indexed by basis axis.
    pub rotation: Vector3<f64>,
    /// Rigid translation delta applied to the joint and its subtree.
    pub translation: Vector3<f64>,
}

impl Command {
    /// The zero (no-op) command.
    pub fn zeros() -> Self {
        Self::default()
    }

    /// A pure rotation delta about one axis.
    pub fn rotation_about(axis: Axis, angle: f64) -> Self {
        let mut command = Self::default();
        command.rotation[axis.index()] = angle;
        command
    }

    /// A pure translation delta.
    pub fn translation_of(delta: Vector3<f64>) -> Self {
        Self {
            rotation: Vector3::zeros(),
            translation: delta,
        }
    }

    /// Rotation delta on `axis`.
    pub fn rotation(&self, axis: Axis) -> f64 {
        self.rotation[axis.index()]
    }

    /// Set the rotation delta on `axis`.
    pub fn set_rotation(&mut self, axis: Axis, angle: f64) {
        self.rotation[axis.index()] = angle;
    }

    /// Whether every component is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.rotation == Vector3::zeros() && self.translation == Vector3::zeros()
    }

    /// Reset all components to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// ---------------------------------------------------------------------------
// CommandBuffer
// ---------------------------------------------------------------------------

/// One [`Command`] slot per joint, indexed by [`JointId`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CommandBuffer {
    commands: Vec<Command>,
}

impl CommandBuffer {
    /// A zeroed buffer with one slot per joint.
    pub fn zeros(joint_count: usize) -> Self {
        Self {
            commands: vec![Command::default(); joint_count],
        }
    }

    pub const fn len(&self) -> usize {
        self.commands.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Reset every slot to the zero command.
    pub fn reset(&mut self) {
        for command in &mut self.commands {
            command.reset();
        }
    }

    /// Whether every slot is the zero command.
    pub fn is_zero(&self) -> bool {
        self.commands.iter().all(Command::is_zero)
    }
}

impl std::ops::Index<JointId> for CommandBuffer {
    type Output = Command;
    fn index(&self, id: JointId) -> &Command {
        &self.commands[id]
    }
}

impl std::ops::IndexMut<JointId> for CommandBuffer {
    fn index_mut(&mut self, id: JointId) -> &mut Command {
        &mut self.commands[id]
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
