//! Gradient-free inverse kinematics over armature skeletons.
//!
//! The solver never differentiates the kinematic chain analytically.
//! Each candidate rotation is probed on a disposable shadow of the live
//! skeleton, the change in target error gives a finite-difference gradient,
//! and a per-axis Adam-style update turns that gradient into a step which
//! is applied through the same constrained command path the rest of the
//! engine uses. Actuator limits therefore bind the solver for free.
//!
//! ```text
//!   Skeleton ──shadow()──▶ probe (+1° on one axis) ──▶ error delta
//!       ▲                                                  │
//!       └───── process_command(step from Adam moments) ◀───┘
//! ```

pub mod solver;

pub use solver::{IkConfig, IkResult, IkSolver, IkTarget, forward_kinematics};
