//! Small vocabulary types shared across the armature crates.

use std::fmt;

use crate::error::ConfigError;

/// Identifier of a joint: its index in the skeleton's joint list.
///
/// Joint 0 is the root of the tree by convention.
pub type JointId = usize;

// ---------------------------------------------------------------------------
// Axis
// ---------------------------------------------------------------------------

/// A local rotation axis of a joint basis.
///
/// Actuator kinds form a closed set; external descriptions select one by
/// index (0 = x, 1 = y, 2 = z) and are converted through
/// [`Axis::from_index`] at construction time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All axes, in sweep order.
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];

    /// Row index of this axis within a basis (0, 1, or 2).
    pub const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    /// Convert a description-level axis index into an [`Axis`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidAxis`] for indices outside `{0, 1, 2}`.
    pub const fn from_index(index: usize) -> Result<Self, ConfigError> {
        match index {
            0 => Ok(Self::X),
            1 => Ok(Self::Y),
            2 => Ok(Self::Z),
            _ => Err(ConfigError::InvalidAxis(index)),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "x"),
            Self::Y => write!(f, "y"),
            Self::Z => write!(f, "z"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_index_roundtrip() {
        for axis in Axis::ALL {
            assert_eq!(Axis::from_index(axis.index()), Ok(axis));
        }
    }

    #[test]
    fn axis_from_bad_index() {
        assert_eq!(Axis::from_index(3), Err(ConfigError::InvalidAxis(3)));
        assert_eq!(Axis::from_index(17), Err(ConfigError::InvalidAxis(17)));
    }

    #[test]
    fn axis_sweep_order() {
        assert_eq!(Axis::ALL.map(Axis::index), [0, 1, 2]);
    }

    #[test]
    fn axis_display() {
        assert_eq!(Axis::X.to_string(), "x");
        assert_eq!(Axis::Y.to_string(), "y");
        assert_eq!(Axis::Z.to_string(), "z");
    }
}
