//! Quaternion helpers and the orthonormal joint basis.
//!
//! All rotations go through `nalgebra`'s [`UnitQuaternion`], so every
//! composed rotation is unit-norm by construction.

use nalgebra::{Matrix3, Unit, UnitQuaternion, Vector3};

use armature_core::{Axis, GeometryError};

/// Norm below which a rotation axis counts as degenerate.
pub(crate) const DEGENERATE_EPS: f64 = 1.0e-12;

/// Build the unit quaternion rotating by `theta` radians about `axis`.
///
/// # Errors
///
/// Returns [`GeometryError::DegenerateAxis`] if `axis` has (near-)zero
/// length; a zero axis is a configuration bug, not a no-op rotation.
pub fn axis_angle(
    axis: &Vector3<f64>,
    theta: f64,
) -> Result<UnitQuaternion<f64>, GeometryError> {
    let axis = Unit::try_new(*axis, DEGENERATE_EPS).ok_or(GeometryError::DegenerateAxis)?;
    Ok(UnitQuaternion::from_axis_angle(&axis, theta))
}

// ---------------------------------------------------------------------------
// Basis
// ---------------------------------------------------------------------------

/// The local coordinate frame of a joint: three mutually orthonormal unit
/// row vectors (local x, y, z axes).
///
/// Rows are only ever transformed by unit quaternions, so orthonormality is
/// preserved up to floating-point error.
#[derive(Clone, Debug, PartialEq)]
pub struct Basis {
    rows: [Vector3<f64>; 3],
}

impl Default for Basis {
    fn default() -> Self {
        Self::identity()
    }
}

impl Basis {
    /// The world-aligned basis.
    pub fn identity() -> Self {
        Self {
            rows: [Vector3::x(), Vector3::y(), Vector3::z()],
        }
    }

    /// The row for `axis`.
    pub fn axis(&self, axis: Axis) -> Vector3<f64> {
        self.rows[axis.index()]
    }

    /// All three rows, x/y/z order.
    pub const fn rows(&self) -> &[Vector3<f64>; 3] {
        &self.rows
    }

    /// The basis as a row-major 3x3 matrix.
    pub fn as_matrix(&self) -> Matrix3<f64> {
        Matrix3::from_rows(&[
            self.rows[0].transpose(),
            self.rows[1].transpose(),
            self.rows[2].transpose(),
        ])
    }

    /// Rotate every row by `q`.
    pub fn rotate(&mut self, q: &UnitQuaternion<f64>) {
        for row in &mut self.rows {
            *row = q * *row;
        }
    }

    /// Apply the minimal rotation mapping the current z-row onto `target`,
    /// to all three rows. The new z-row equals `target` exactly.
    ///
    /// When the z-row and `target` are antiparallel there is no unique
    /// minimal rotation; a half-turn about the current x-row is used.
    pub fn align_z_to(&mut self, target: &Unit<Vector3<f64>>) {
        let z = self.rows[2];
        let q = UnitQuaternion::rotation_between(&z, target).unwrap_or_else(|| {
            UnitQuaternion::from_axis_angle(
                &Unit::new_normalize(self.rows[0]),
                std::f64::consts::PI,
            )
        });
        self.rotate(&q);
        self.rows[2] = target.into_inner();
    }

    /// Rotate the basis about its own x, then y, then z rows by
    /// `angles[0..3]` radians.
    ///
    /// Each step re-derives the axis from the just-updated basis, so the
    /// order matters and the result is not one combined rotation.
    pub fn rotate_by_angles(&mut self, angles: [f64; 3]) {
        for axis in Axis::ALL {
            let q = UnitQuaternion::from_axis_angle(
                &Unit::new_normalize(self.axis(axis)),
                angles[axis.index()],
            );
            self.rotate(&q);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
