//! AngleDeg: normalized direction in degrees
//!
//! All body/dash/kick directions in the planner are kept in `[-180, 180)`.
//! Arithmetic re-normalizes, so callers never have to wrap by hand.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Neg, Sub};

const EPS: f64 = 1e-9;

/// Direction in degrees, normalized to `[-180, 180)`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct AngleDeg(f64);

impl AngleDeg {
    pub const ZERO: Self = Self(0.0);

    /// Construct and normalize.
    #[inline]
    pub fn new(deg: f64) -> Self {
        Self(normalize_deg(deg))
    }

    #[inline]
    pub fn from_radians(rad: f64) -> Self {
        Self::new(rad.to_degrees())
    }

    #[inline]
    pub fn degrees(self) -> f64 {
        self.0
    }

    #[inline]
    pub fn radians(self) -> f64 {
        self.0.to_radians()
    }

    #[inline]
    pub fn abs(self) -> f64 {
        self.0.abs()
    }

    #[inline]
    pub fn cos(self) -> f64 {
        self.radians().cos()
    }

    #[inline]
    pub fn sin(self) -> f64 {
        self.radians().sin()
    }

    /// Unsigned difference to `other` in `[0, 180]`.
    #[inline]
    pub fn diff(self, other: AngleDeg) -> f64 {
        (self - other).abs()
    }

    /// Whether `self` lies on the left (counter-clockwise) side of `other`.
    #[inline]
    pub fn is_left_of(self, other: AngleDeg) -> bool {
        (self - other).degrees() > 0.0
    }

    /// Rotate toward `target` by at most `max_step` degrees.
    pub fn rotate_toward(self, target: AngleDeg, max_step: f64) -> AngleDeg {
        let delta = (target - self).degrees();
        let step = delta.clamp(-max_step.abs(), max_step.abs());
        self + step
    }

    /// Arc-sine in degrees with the argument clamped to `[-1, 1]`.
    #[inline]
    pub fn asin_deg(ratio: f64) -> f64 {
        ratio.clamp(-1.0, 1.0).asin().to_degrees()
    }
}

/// Wrap any angle into `[-180, 180)`.
#[inline]
pub fn normalize_deg(deg: f64) -> f64 {
    if !deg.is_finite() {
        return 0.0;
    }
    let d = (deg + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if d >= 180.0 - EPS {
        -180.0
    } else {
        d
    }
}

impl From<f64> for AngleDeg {
    fn from(deg: f64) -> Self {
        Self::new(deg)
    }
}

impl From<AngleDeg> for f64 {
    fn from(a: AngleDeg) -> Self {
        a.0
    }
}

impl Add<f64> for AngleDeg {
    type Output = AngleDeg;
    fn add(self, rhs: f64) -> AngleDeg {
        AngleDeg::new(self.0 + rhs)
    }
}

impl Sub<f64> for AngleDeg {
    type Output = AngleDeg;
    fn sub(self, rhs: f64) -> AngleDeg {
        AngleDeg::new(self.0 - rhs)
    }
}

impl Add<AngleDeg> for AngleDeg {
    type Output = AngleDeg;
    fn add(self, rhs: AngleDeg) -> AngleDeg {
        AngleDeg::new(self.0 + rhs.0)
    }
}

impl Sub<AngleDeg> for AngleDeg {
    type Output = AngleDeg;
    fn sub(self, rhs: AngleDeg) -> AngleDeg {
        AngleDeg::new(self.0 - rhs.0)
    }
}

impl Neg for AngleDeg {
    type Output = AngleDeg;
    fn neg(self) -> AngleDeg {
        AngleDeg::new(-self.0)
    }
}

impl fmt::Display for AngleDeg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}deg", self.0)
    }
}
