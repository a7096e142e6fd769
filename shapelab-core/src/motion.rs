//! Orientation-preserving isometries of the complex plane, `z ↦ a·z + b`
//! with `|a| = 1`.

use serde::{Deserialize, Serialize};

use crate::complex::Complex;
use crate::reflection::normalize_deg;

/// Below this, `|a − 1|` counts as no rotation and `|b|` as no offset.
pub const MOTION_EPS: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    /// Unit-modulus rotation factor.
    pub a: Complex,
    pub b: Complex,
}

/// What a [`Motion`] reduces to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MotionKind {
    Identity,
    Translation { offset: Complex },
    /// Rotation by `angle_deg` in `(-180, 180]` about `center`.
    Rotation { center: Complex, angle_deg: f64 },
}

impl Motion {
    pub fn identity() -> Self {
        Self {
            a: Complex::ONE,
            b: Complex::ZERO,
        }
    }

    /// Counter-clockwise rotation by `angle_deg` about `center`:
    /// `z ↦ c + e^{iθ}(z − c)`.
    pub fn rotation(angle_deg: f64, center: Complex) -> Self {
        let a = Complex::from_polar(1.0, angle_deg.to_radians());
        Self {
            a,
            b: center * (Complex::ONE - a),
        }
    }

    pub fn translation(offset: Complex) -> Self {
        Self {
            a: Complex::ONE,
            b: offset,
        }
    }

    #[inline]
    pub fn apply(&self, z: Complex) -> Complex {
        self.a * z + self.b
    }

    /// `self` followed by `next`.
    pub fn then(&self, next: &Motion) -> Motion {
        Motion {
            a: next.a * self.a,
            b: next.a * self.b + next.b,
        }
    }

    pub fn classify(&self) -> MotionKind {
        let turn = self.a - Complex::ONE;
        if turn.norm() < MOTION_EPS {
            if self.b.norm() < MOTION_EPS {
                MotionKind::Identity
            } else {
                MotionKind::Translation { offset: self.b }
            }
        } else {
            // Fixed point of a·z + b: z = b / (1 − a), with 1 − a ≠ 0 here.
            let center = self.b / (Complex::ONE - self.a);
            MotionKind::Rotation {
                center,
                angle_deg: normalize_deg(self.a.arg().to_degrees()),
            }
        }
    }
}

impl Default for Motion {
    fn default() -> Self {
        Self::identity()
    }
}

/// Rotate about the origin by `alpha_deg`, translate by `offset`, then rotate
/// about the origin by `beta_deg`.
///
/// The result is a rotation by `α + β` about a shifted centre, or a pure
/// translation when `α + β` is a multiple of 360°.
pub fn rotate_translate_rotate(alpha_deg: f64, offset: Complex, beta_deg: f64) -> Motion {
    Motion::rotation(alpha_deg, Complex::ZERO)
        .then(&Motion::translation(offset))
        .then(&Motion::rotation(beta_deg, Complex::ZERO))
}
