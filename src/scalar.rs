use approx::{AbsDiffEq, RelativeEq};
use derive_more::From;
use duplicate::duplicate;
use num::rational::Rational64;
use num::{CheckedAdd, CheckedMul, CheckedSub, Signed, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::Display;
use std::ops::{Add, Mul, Neg, Sub};

use crate::error::WickError;

/// Coefficients below this magnitude are treated as exact zeros.
pub const ZERO_TOLERANCE: f64 = 1e-15;

/// The coefficient of a term: an exact fraction, or a float once any float
/// has entered the arithmetic or the fraction would overflow.
#[derive(Debug, Clone, Copy, From, Serialize, Deserialize)]
pub enum Scalar {
    Rational(Rational64),
    Float(f64),
}

impl Scalar {
    pub fn one() -> Self {
        Scalar::Rational(Rational64::from_integer(1))
    }

    pub fn zero() -> Self {
        Scalar::Rational(Rational64::zero())
    }

    /// # Panics
    ///
    /// On a zero denominator. See [`Scalar::try_fraction`].
    pub fn fraction(numer: i64, denom: i64) -> Self {
        Scalar::Rational(Rational64::new(numer, denom))
    }

    pub fn try_fraction(numer: i64, denom: i64) -> Result<Self, WickError> {
        if denom == 0 {
            return Err(WickError::ZeroDenominator(numer));
        }
        Ok(Scalar::fraction(numer, denom))
    }

    pub fn to_f64(&self) -> f64 {
        match self {
            Scalar::Rational(r) => r.to_f64().unwrap_or(f64::NAN),
            Scalar::Float(f) => *f,
        }
    }

    pub fn abs(&self) -> Self {
        match self {
            Scalar::Rational(r) => Scalar::Rational(r.abs()),
            Scalar::Float(f) => Scalar::Float(f.abs()),
        }
    }

    /// Below [`ZERO_TOLERANCE`] in magnitude.
    pub fn is_negligible(&self) -> bool {
        match self {
            Scalar::Rational(r) => r.is_zero(),
            Scalar::Float(f) => f.abs() <= ZERO_TOLERANCE,
        }
    }

    pub fn is_positive(&self) -> bool {
        match self {
            Scalar::Rational(r) => r.is_positive(),
            Scalar::Float(f) => *f > 0.0,
        }
    }
}

impl Default for Scalar {
    fn default() -> Self {
        Scalar::one()
    }
}

duplicate! {
    [int;
    [i64];
    [i32];
    [i8];]
impl From<int> for Scalar {
    fn from(value: int) -> Self {
        Scalar::Rational(Rational64::from_integer(value as i64))
    }
}
}

impl Mul for Scalar {
    type Output = Scalar;
    fn mul(self, rhs: Scalar) -> Self::Output {
        match (self, rhs) {
            (Scalar::Rational(l), Scalar::Rational(r)) => match l.checked_mul(&r) {
                Some(p) => Scalar::Rational(p),
                None => Scalar::Float(self.to_f64() * rhs.to_f64()),
            },
            (l, r) => Scalar::Float(l.to_f64() * r.to_f64()),
        }
    }
}

impl Add for Scalar {
    type Output = Scalar;
    fn add(self, rhs: Scalar) -> Self::Output {
        match (self, rhs) {
            (Scalar::Rational(l), Scalar::Rational(r)) => match l.checked_add(&r) {
                Some(p) => Scalar::Rational(p),
                None => Scalar::Float(self.to_f64() + rhs.to_f64()),
            },
            (l, r) => Scalar::Float(l.to_f64() + r.to_f64()),
        }
    }
}

impl Neg for Scalar {
    type Output = Scalar;
    fn neg(self) -> Self::Output {
        match self {
            Scalar::Rational(r) => match Rational64::zero().checked_sub(&r) {
                Some(n) => Scalar::Rational(n),
                None => Scalar::Float(-self.to_f64()),
            },
            Scalar::Float(f) => Scalar::Float(-f),
        }
    }
}

impl Sub for Scalar {
    type Output = Scalar;
    fn sub(self, rhs: Scalar) -> Self::Output {
        self + (-rhs)
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Scalar::Rational(l), Scalar::Rational(r)) => l == r,
            (l, r) => l.to_f64() == r.to_f64(),
        }
    }
}

impl PartialOrd for Scalar {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Scalar::Rational(l), Scalar::Rational(r)) => l.partial_cmp(r),
            (l, r) => l.to_f64().partial_cmp(&r.to_f64()),
        }
    }
}

impl AbsDiffEq for Scalar {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        ZERO_TOLERANCE
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        match (self, other) {
            (Scalar::Rational(l), Scalar::Rational(r)) => l == r,
            (l, r) => l.to_f64().abs_diff_eq(&r.to_f64(), epsilon),
        }
    }
}

impl RelativeEq for Scalar {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        match (self, other) {
            (Scalar::Rational(l), Scalar::Rational(r)) => l == r,
            (l, r) => l.to_f64().relative_eq(&r.to_f64(), epsilon, max_relative),
        }
    }
}

impl Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Rational(r) => write!(f, "{}", r),
            Scalar::Float(x) => write!(f, "{:?}", x),
        }
    }
}
