//! The skeleton: a joint tree plus command propagation.
//!
//! [`Topology`] is the immutable tree structure (children, parents, and
//! precomputed pre-order descendant lists), validated once at construction
//! and shared by reference between a skeleton and its shadows. [`Skeleton`]
//! carries the mutable per-joint pose state.

use std::sync::Arc;

use nalgebra::{Unit, Vector3};

use armature_core::{
    ArmatureError, Axis, ConfigError, GeometryError, JointId, RobotDescription,
};

use crate::actuator::{Actuator, AngleLimits};
use crate::command::Command;
use crate::joint::Joint;
use crate::rotation::{Basis, DEGENERATE_EPS};

// ---------------------------------------------------------------------------
// Topology
// ---------------------------------------------------------------------------

/// Validated forest structure over joint ids `0..len`.
///
/// Every parentless joint is a root; joint 0 is conventionally the primary
/// one. Strict-descendant lists are precomputed in pre-order (depth-first,
/// children in edge-list order) so command propagation visits every subtree
/// in a deterministic order without per-call allocation.
#[derive(Debug, PartialEq, Eq)]
pub struct Topology {
    children: Vec<Vec<JointId>>,
    parent: Vec<Option<JointId>>,
    descendants: Vec<Vec<JointId>>,
}

impl Topology {
    /// Build and validate a topology from per-joint child lists.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EdgeOutOfRange`] for a child id out of range,
    /// [`ConfigError::MultipleParents`] if a joint is listed as a child
    /// twice, and [`ConfigError::CyclicTopology`] if the edges contain a
    /// cycle.
    pub fn new(children: Vec<Vec<JointId>>) -> Result<Self, ConfigError> {
        let len = children.len();

        let mut parent: Vec<Option<JointId>> = vec![None; len];
        for (p, kids) in children.iter().enumerate() {
            for &child in kids {
                if child >= len {
                    return Err(ConfigError::EdgeOutOfRange { parent: p, child });
                }
                match parent[child] {
                    None => parent[child] = Some(p),
                    Some(first) => {
                        return Err(ConfigError::MultipleParents {
                            child,
                            first,
                            second: p,
                        });
                    }
                }
            }
        }

        // Every joint must be reachable from some parentless root. With
        // single parents guaranteed above, an unreachable joint can only sit
        // on (or below) a cycle.
        let mut reachable = vec![false; len];
        let mut stack: Vec<JointId> =
            (0..len).filter(|&id| parent[id].is_none()).collect();
        while let Some(id) = stack.pop() {
            if reachable[id] {
                continue;
            }
            reachable[id] = true;
            stack.extend_from_slice(&children[id]);
        }
        if let Some(unreached) = reachable.iter().position(|&r| !r) {
            return Err(ConfigError::CyclicTopology(unreached));
        }

        let descendants = (0..len)
            .map(|id| {
                let mut order = Vec::new();
                collect_preorder(&children, id, &mut order);
                order
            })
            .collect();

        Ok(Self {
            children,
            parent,
            descendants,
        })
    }

    /// Number of joints.
    pub const fn len(&self) -> usize {
        self.parent.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Direct children of `id`, in edge-list order.
    pub fn children(&self, id: JointId) -> &[JointId] {
        &self.children[id]
    }

    /// Parent of `id`, `None` for the root.
    pub fn parent(&self, id: JointId) -> Option<JointId> {
        self.parent[id]
    }

    /// Strict descendants of `id` in pre-order.
    pub fn descendants(&self, id: JointId) -> &[JointId] {
        &self.descendants[id]
    }
}

fn collect_preorder(children: &[Vec<JointId>], id: JointId, order: &mut Vec<JointId>) {
    for &child in &children[id] {
        order.push(child);
        collect_preorder(children, child, order);
    }
}

// ---------------------------------------------------------------------------
// Skeleton
// ---------------------------------------------------------------------------

/// A posed joint tree.
///
/// Mutable pose state (locations, bases, committed actuator angles) lives
/// here; the tree structure is an immutable shared [`Topology`]. Cloning a
/// skeleton (or calling [`Skeleton::shadow`]) copies the pose and shares
/// the topology.
#[derive(Clone, Debug, PartialEq)]
pub struct Skeleton {
    topology: Arc<Topology>,
    joints: Vec<Joint>,
}

impl Skeleton {
    /// Build a skeleton from a resolved description.
    ///
    /// Each joint's basis starts world-aligned, its z-row is aimed at the
    /// mean of its children's locations (leaves aim away from their parent),
    /// and the description's start angles are then applied about the
    /// joint's own axes, x then y then z. Degree-valued inputs are
    /// converted to radians here, once.
    ///
    /// # Errors
    ///
    /// Configuration errors for invalid ids, edges, axes, or limits;
    /// geometry errors for joints that cannot be oriented (no neighbors,
    /// or coincident with every orientation target).
    pub fn from_description(description: &RobotDescription) -> Result<Self, ArmatureError> {
        description.validate()?;
        let topology = Arc::new(Topology::new(description.edges.clone())?);

        let locations: Vec<Vector3<f64>> = description
            .joints
            .iter()
            .map(|joint| Vector3::from(joint.start_location))
            .collect();

        let mut joints = Vec::with_capacity(description.len());
        for (id, joint) in description.joints.iter().enumerate() {
            let aim = aim_target(&topology, &locations, id)?;
            let mut basis = Basis::identity();
            basis.align_z_to(&aim);
            basis.rotate_by_angles(joint.start_angles.map(f64::to_radians));

            let mut actuators = Vec::with_capacity(joint.actuators.len());
            for actuator in &joint.actuators {
                let axis = Axis::from_index(actuator.axis)?;
                let limits = AngleLimits::from_degrees(actuator.min_deg, actuator.max_deg)?;
                actuators.push(Actuator::new(axis, limits));
            }

            joints.push(Joint::new(id, locations[id], basis, actuators));
        }

        Ok(Self { topology, joints })
    }

    /// Number of joints.
    pub const fn len(&self) -> usize {
        self.joints.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// The shared tree structure.
    pub fn topology(&self) -> &Arc<Topology> {
        &self.topology
    }

    /// The joint with id `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    pub fn joint(&self, id: JointId) -> &Joint {
        &self.joints[id]
    }

    /// All joints in id order.
    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    /// World location of joint `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    pub fn location(&self, id: JointId) -> &Vector3<f64> {
        &self.joints[id].location
    }

    /// Local basis of joint `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    pub fn basis(&self, id: JointId) -> &Basis {
        &self.joints[id].basis
    }

    /// A disposable copy for hypothetical evaluation.
    ///
    /// The shadow shares this skeleton's [`Topology`] and copies all
    /// mutable pose state; mutating the shadow never affects the original.
    pub fn shadow(&self) -> Self {
        self.clone()
    }

    /// Apply one roto-translation command at joint `id`.
    ///
    /// The translation moves the joint and its whole subtree rigidly. Each
    /// of the joint's actuators then clamps the command's delta on its axis
    /// (writing the residual back into `command`), rotates every strict
    /// descendant rigidly about the joint's pre-update frame, and finally
    /// commits the clamped absolute angle. The commanded joint's own
    /// location and basis are unchanged by its rotations.
    ///
    /// Rotation deltas on axes with no actuator are ignored.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::DegenerateAxis`] if a basis row has decayed
    /// to zero length, which indicates upstream state corruption.
    pub fn process_command(
        &mut self,
        id: JointId,
        command: &mut Command,
    ) -> Result<(), GeometryError> {
        assert!(id < self.joints.len(), "joint id {id} out of range");
        if command.is_zero() {
            return Ok(());
        }

        let topology = Arc::clone(&self.topology);

        if command.translation != Vector3::zeros() {
            self.joints[id].location += command.translation;
            for &descendant in topology.descendants(id) {
                self.joints[descendant].location += command.translation;
            }
        }

        // Pre-update frame: the commanded joint's own pose is invariant
        // under its rotations, so one snapshot serves every actuator.
        let frame = self.joints[id].frame();
        let actuators = self.joints[id].actuators.clone();

        for (slot, actuator) in actuators.iter().enumerate() {
            for &descendant in topology.descendants(id) {
                let joint = &mut self.joints[descendant];
                actuator.apply_to_descendant(
                    &frame,
                    &mut joint.location,
                    &mut joint.basis,
                    command,
                )?;
            }
            self.joints[id].actuators[slot].commit(command);
        }

        Ok(())
    }
}

fn aim_target(
    topology: &Topology,
    locations: &[Vector3<f64>],
    id: JointId,
) -> Result<Unit<Vector3<f64>>, GeometryError> {
    let children = topology.children(id);
    let target = if children.is_empty() {
        let parent = topology.parent(id).ok_or(GeometryError::IsolatedJoint(id))?;
        locations[id] - locations[parent]
    } else {
        let sum: Vector3<f64> = children.iter().map(|&child| locations[child]).sum();
        sum / children.len() as f64 - locations[id]
    };
    Unit::try_new(target, DEGENERATE_EPS).ok_or(GeometryError::DegenerateTarget(id))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
