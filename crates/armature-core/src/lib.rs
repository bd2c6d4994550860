// armature-core: Types, errors, and the robot-description boundary for the
// armature kinematics engine.

pub mod description;
pub mod error;
pub mod types;

pub use description::{ActuatorDescription, JointDescription, RobotDescription};
pub use error::{ArmatureError, ConfigError, GeometryError};
pub use types::{Axis, JointId};
