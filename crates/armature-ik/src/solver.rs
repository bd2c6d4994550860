//! Coordinate-descent IK with finite-difference gradients.

use nalgebra::Vector3;

use armature_core::{Axis, GeometryError, JointId};
use armature_kinematics::{Command, CommandBuffer, Skeleton};

/// Probe rotation used for finite differences: one degree.
const PROBE_ANGLE: f64 = std::f64::consts::PI / 180.0;

/// Adam first-moment decay.
const BETA1: f64 = 0.9;
/// Adam second-moment decay.
const BETA2: f64 = 0.999;
/// Adam denominator guard.
const EPSILON: f64 = 1.0e-8;

// ---------------------------------------------------------------------------
// Forward kinematics
// ---------------------------------------------------------------------------

/// Apply a full command buffer to the skeleton, one joint at a time in
/// ascending id order, then reset the buffer to zero.
///
/// Zero commands are skipped. Residual writeback from clamping is visible
/// only transiently; after this call the buffer is all zeros either way.
///
/// # Panics
///
/// Panics if the buffer length does not match the joint count.
///
/// # Errors
///
/// Propagates geometry errors from command application.
pub fn forward_kinematics(
    skeleton: &mut Skeleton,
    commands: &mut CommandBuffer,
) -> Result<(), GeometryError> {
    assert_eq!(
        skeleton.len(),
        commands.len(),
        "command buffer length must match joint count"
    );
    for id in 0..skeleton.len() {
        if commands[id].is_zero() {
            continue;
        }
        let mut command = commands[id];
        skeleton.process_command(id, &mut command)?;
    }
    commands.reset();
    Ok(())
}

// ---------------------------------------------------------------------------
// Solver configuration and results
// ---------------------------------------------------------------------------

/// Tuning knobs for [`IkSolver`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IkConfig {
    /// Adam step scale, radians.
    pub learning_rate: f64,
    /// Convergence threshold on the per-axis probe error delta.
    pub tolerance: f64,
    /// Hard cap on full sweeps over the skeleton.
    pub max_sweeps: u32,
}

impl Default for IkConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.01,
            tolerance: 0.01,
            max_sweeps: 1000,
        }
    }
}

/// One positional goal: drive `joint`'s world location toward `position`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IkTarget {
    pub joint: JointId,
    pub position: Vector3<f64>,
}

impl IkTarget {
    pub const fn new(joint: JointId, position: Vector3<f64>) -> Self {
        Self { joint, position }
    }
}

/// Outcome of a solve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IkResult {
    /// Whether every probe's error delta fell within tolerance before the
    /// sweep cap. An unreachable target can still "converge" here: at the
    /// closest attainable pose all probes go flat.
    pub converged: bool,
    /// Completed sweeps.
    pub sweeps: u32,
    /// Sum of squared target distances at the final pose.
    pub final_error: f64,
}

// ---------------------------------------------------------------------------
// Adam moments
// ---------------------------------------------------------------------------

/// Per-axis Adam moment pair. Lives only for the duration of one solve.
#[derive(Clone, Copy, Debug, Default)]
struct AdamState {
    m: f64,
    v: f64,
}

impl AdamState {
    /// Fold in one gradient sample and return the (signed) step in radians.
    ///
    /// The first moment accumulates the *negated* gradient, so the returned
    /// step already points downhill; `sweep` is 1-based for bias correction.
    fn step(&mut self, gradient: f64, sweep: u32, learning_rate: f64) -> f64 {
        self.m = BETA1 * self.m - (1.0 - BETA1) * gradient;
        self.v = BETA2 * self.v + (1.0 - BETA2) * gradient * gradient;
        let m_hat = self.m / (1.0 - BETA1.powi(sweep as i32));
        let v_hat = self.v / (1.0 - BETA2.powi(sweep as i32));
        learning_rate * m_hat / (v_hat.sqrt() + EPSILON)
    }
}

// ---------------------------------------------------------------------------
// IkSolver
// ---------------------------------------------------------------------------

/// Coordinate-descent inverse kinematics.
///
/// One sweep visits every joint in ascending id order and every basis axis
/// in x, y, z order. For each (joint, axis) pair the solver probes a
/// one-degree rotation on a fresh shadow, derives a forward-difference
/// gradient of the total squared target error, and immediately applies the
/// Adam step to the live skeleton through [`Skeleton::process_command`].
/// Axes without an actuator probe flat and step by zero.
#[derive(Clone, Debug, Default)]
pub struct IkSolver {
    config: IkConfig,
}

impl IkSolver {
    pub const fn new(config: IkConfig) -> Self {
        Self { config }
    }

    /// A solver with the default configuration.
    pub fn with_defaults() -> Self {
        Self::default()
    }

    pub const fn config(&self) -> &IkConfig {
        &self.config
    }

    /// Drive `skeleton` toward the targets in place.
    ///
    /// # Panics
    ///
    /// Panics if `targets` is empty or names a joint out of range.
    ///
    /// # Errors
    ///
    /// Propagates geometry errors from probing or stepping.
    pub fn solve(
        &self,
        skeleton: &mut Skeleton,
        targets: &[IkTarget],
    ) -> Result<IkResult, GeometryError> {
        self.solve_with_hook(skeleton, targets, |_, _| {})
    }

    /// Like [`IkSolver::solve`], invoking `hook` once after each completed
    /// sweep with the sweep index (1-based) and the current pose.
    pub fn solve_with_hook<F>(
        &self,
        skeleton: &mut Skeleton,
        targets: &[IkTarget],
        mut hook: F,
    ) -> Result<IkResult, GeometryError>
    where
        F: FnMut(u32, &Skeleton),
    {
        assert!(!targets.is_empty(), "at least one target required");
        for target in targets {
            assert!(
                target.joint < skeleton.len(),
                "target joint {} out of range",
                target.joint
            );
        }

        let mut moments = vec![[AdamState::default(); 3]; skeleton.len()];
        let mut converged = false;
        let mut sweeps = 0;

        for sweep in 1..=self.config.max_sweeps {
            let mut active = false;

            for id in 0..skeleton.len() {
                for axis in Axis::ALL {
                    let error = total_error(skeleton, targets);

                    let mut shadow = skeleton.shadow();
                    let mut probe = Command::rotation_about(axis, PROBE_ANGLE);
                    shadow.process_command(id, &mut probe)?;
                    let probed = total_error(&shadow, targets);

                    if (probed - error).abs() > self.config.tolerance {
                        active = true;
                    }

                    let gradient = (probed - error) / PROBE_ANGLE;
                    let step = moments[id][axis.index()].step(
                        gradient,
                        sweep,
                        self.config.learning_rate,
                    );
                    let mut command = Command::rotation_about(axis, step);
                    skeleton.process_command(id, &mut command)?;
                }
            }

            sweeps = sweep;
            hook(sweep, skeleton);

            if !active {
                converged = true;
                break;
            }
        }

        Ok(IkResult {
            converged,
            sweeps,
            final_error: total_error(skeleton, targets),
        })
    }
}

/// Sum of squared distances from each target joint to its goal.
fn total_error(skeleton: &Skeleton, targets: &[IkTarget]) -> f64 {
    targets
        .iter()
        .map(|target| (skeleton.location(target.joint) - target.position).norm_squared())
        .sum()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    use armature_core::{ActuatorDescription, JointDescription, RobotDescription};

    fn free_actuator(axis: usize) -> ActuatorDescription {
        ActuatorDescription {
            axis,
            min_deg: f64::NEG_INFINITY,
            max_deg: f64::INFINITY,
        }
    }

    /// Two links of length 10 and 5 along +x; joint 2 is the end effector.
    fn arm_description() -> RobotDescription {
        RobotDescription {
            joints: vec![
                JointDescription {
                    id: 0,
                    start_location: [0.0, 0.0, 0.0],
                    start_angles: [0.0, 0.0, 0.0],
                    actuators: vec![free_actuator(0), free_actuator(1), free_actuator(2)],
                },
                JointDescription {
                    id: 1,
                    start_location: [10.0, 0.0, 0.0],
                    start_angles: [0.0, 0.0, 0.0],
                    actuators: vec![free_actuator(0), free_actuator(1), free_actuator(2)],
                },
                JointDescription {
                    id: 2,
                    start_location: [15.0, 0.0, 0.0],
                    start_angles: [0.0, 0.0, 0.0],
                    actuators: Vec::new(),
                },
            ],
            edges: vec![vec![1], vec![2], vec![]],
        }
    }

    fn arm() -> Skeleton {
        Skeleton::from_description(&arm_description()).unwrap()
    }

    fn end_distance(skeleton: &Skeleton, position: Vector3<f64>) -> f64 {
        (skeleton.location(2) - position).norm()
    }

    // -- forward kinematics ------------------------------------------------

    #[test]
    fn fk_zero_buffer_is_a_no_op() {
        let mut skeleton = arm();
        let before = skeleton.clone();
        let mut commands = CommandBuffer::zeros(skeleton.len());
        forward_kinematics(&mut skeleton, &mut commands).unwrap();
        assert_eq!(skeleton, before);
    }

    #[test]
    fn fk_applies_commands_and_resets_the_buffer() {
        let mut skeleton = arm();
        let mut commands = CommandBuffer::zeros(skeleton.len());
        commands[0] = Command::rotation_about(Axis::Y, 90.0_f64.to_radians());

        forward_kinematics(&mut skeleton, &mut commands).unwrap();

        assert!(commands.is_zero());
        // The aimed y-row is world +y; a quarter turn sends +x to -z.
        assert_relative_eq!(skeleton.location(2).z, -15.0, epsilon = 1e-9);
    }

    #[test]
    #[should_panic(expected = "must match joint count")]
    fn fk_rejects_mismatched_buffer() {
        let mut skeleton = arm();
        let mut commands = CommandBuffer::zeros(2);
        let _ = forward_kinematics(&mut skeleton, &mut commands);
    }

    // -- adam --------------------------------------------------------------

    #[test]
    fn first_adam_step_is_a_downhill_learning_rate() {
        let mut state = AdamState::default();
        let step = state.step(5.0, 1, 0.01);
        // Bias correction makes m_hat = -g and v_hat = g^2 on sweep one.
        assert_relative_eq!(step, -0.01, epsilon = 1e-6);

        let mut state = AdamState::default();
        let step = state.step(-5.0, 1, 0.01);
        assert_relative_eq!(step, 0.01, epsilon = 1e-6);
    }

    #[test]
    fn zero_gradient_steps_by_zero() {
        let mut state = AdamState::default();
        assert_eq!(state.step(0.0, 1, 0.01), 0.0);
    }

    // -- solving -----------------------------------------------------------

    #[test]
    fn reaches_a_nearby_target() {
        let mut skeleton = arm();
        let goal = Vector3::new(12.0, 3.0, 0.0);
        let solver = IkSolver::with_defaults();

        let result = solver
            .solve(&mut skeleton, &[IkTarget::new(2, goal)])
            .unwrap();

        assert!(
            end_distance(&skeleton, goal) < 0.1,
            "final distance {} after {} sweeps",
            end_distance(&skeleton, goal),
            result.sweeps
        );
    }

    #[test]
    fn reaches_seeded_random_targets() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let solver = IkSolver::with_defaults();

        for _ in 0..3 {
            let radius: f64 = rng.gen_range(7.0..13.0);
            let azimuth: f64 = rng.gen_range(-1.2..1.2);
            let elevation: f64 = rng.gen_range(-0.8..0.8);
            let goal = radius
                * Vector3::new(
                    elevation.cos() * azimuth.cos(),
                    elevation.cos() * azimuth.sin(),
                    elevation.sin(),
                );

            let mut skeleton = arm();
            solver
                .solve(&mut skeleton, &[IkTarget::new(2, goal)])
                .unwrap();

            assert!(
                end_distance(&skeleton, goal) < 0.1,
                "missed {goal} by {}",
                end_distance(&skeleton, goal)
            );
        }
    }

    #[test]
    fn unreachable_target_leaves_a_large_error() {
        let mut skeleton = arm();
        // Total reach is 15.
        let goal = Vector3::new(30.0, 0.0, 0.0);
        let solver = IkSolver::with_defaults();

        let result = solver
            .solve(&mut skeleton, &[IkTarget::new(2, goal)])
            .unwrap();

        assert!(end_distance(&skeleton, goal) > 14.0);
        assert!(result.final_error > 190.0);
    }

    #[test]
    fn actuator_limits_bind_the_solver() {
        let mut description = arm_description();
        for joint in &mut description.joints {
            for actuator in &mut joint.actuators {
                actuator.min_deg = -30.0;
                actuator.max_deg = 30.0;
            }
        }
        let mut skeleton = Skeleton::from_description(&description).unwrap();

        let solver = IkSolver::with_defaults();
        solver
            .solve(&mut skeleton, &[IkTarget::new(2, Vector3::new(0.0, 0.0, 14.0))])
            .unwrap();

        for joint in skeleton.joints() {
            for actuator in joint.actuators() {
                assert!(
                    actuator.limits().contains(actuator.angle()),
                    "joint {} angle {} escaped its limits",
                    joint.id(),
                    actuator.angle()
                );
            }
        }
    }

    #[test]
    fn hook_fires_once_per_sweep() {
        let mut skeleton = arm();
        let solver = IkSolver::new(IkConfig {
            max_sweeps: 5,
            ..IkConfig::default()
        });

        let mut calls = Vec::new();
        let result = solver
            .solve_with_hook(
                &mut skeleton,
                &[IkTarget::new(2, Vector3::new(0.0, 12.0, 0.0))],
                |sweep, _| calls.push(sweep),
            )
            .unwrap();

        assert_eq!(calls, vec![1, 2, 3, 4, 5]);
        assert_eq!(result.sweeps, 5);
        assert!(!result.converged);
    }

    #[test]
    fn solver_never_translates_the_root() {
        let mut skeleton = arm();
        let solver = IkSolver::with_defaults();
        solver
            .solve(&mut skeleton, &[IkTarget::new(2, Vector3::new(8.0, 4.0, 2.0))])
            .unwrap();
        assert_eq!(*skeleton.location(0), Vector3::zeros());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn target_joint_out_of_range_panics() {
        let mut skeleton = arm();
        let solver = IkSolver::with_defaults();
        let _ = solver.solve(&mut skeleton, &[IkTarget::new(9, Vector3::zeros())]);
    }
}
