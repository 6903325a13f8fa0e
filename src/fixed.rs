//! 17.14 Fixed-Point Arithmetic
//!
//! A signed 32-bit value whose low 14 bits are the fraction. Used for
//! load-average style computations where floating point is unavailable.
//!
//! # Layout
//! ```text
//! 31 30                14 13             0
//! ┌──┬──────────────────┬────────────────┐
//! │ S│   integer (17)   │ fraction (14)  │
//! └──┴──────────────────┴────────────────┘
//! ```
//!
//! # Overflow
//! Results must fit in `i32` after scaling. Nothing here guards that:
//! overflow panics in debug builds and wraps in release builds, and
//! division by zero panics.

use core::fmt;
use core::ops::{Add, Div, Mul, Neg, Sub};

/// Number of fraction bits.
pub const FRACTION_BITS: u32 = 14;

/// Scale factor, the fixed-point representation of 1.
pub const F: i32 = 1 << FRACTION_BITS;

/// A 17.14 fixed-point number.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Fixed(i32);

impl Fixed {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(F);

    /// Convert an integer to fixed point.
    #[inline]
    pub const fn from_int(n: i32) -> Self {
        Self(n * F)
    }

    /// `num / den` as a fixed-point value, e.g. `from_ratio(59, 60)`.
    #[inline]
    pub const fn from_ratio(num: i32, den: i32) -> Self {
        Self::from_int(num).div_int(den)
    }

    /// Reinterpret a raw 17.14 bit pattern.
    #[inline]
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    /// The raw 17.14 bit pattern.
    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Convert to an integer, rounding to nearest (halves away from zero).
    #[inline]
    pub const fn round(self) -> i32 {
        round_scaled(self.0 as i64) as i32
    }

    /// Convert to an integer, rounding toward zero.
    #[inline]
    pub const fn trunc(self) -> i32 {
        self.0 / F
    }

    #[inline]
    pub const fn add_int(self, n: i32) -> Self {
        Self(self.0 + n * F)
    }

    #[inline]
    pub const fn sub_int(self, n: i32) -> Self {
        Self(self.0 - n * F)
    }

    /// Fixed × fixed. The product is widened to 64 bits before rescaling.
    #[inline]
    pub const fn mul_fixed(self, other: Self) -> Self {
        Self((self.0 as i64 * other.0 as i64 / F as i64) as i32)
    }

    /// Fixed ÷ fixed. The dividend is widened and prescaled before dividing.
    #[inline]
    pub const fn div_fixed(self, other: Self) -> Self {
        Self((self.0 as i64 * F as i64 / other.0 as i64) as i32)
    }

    #[inline]
    pub const fn mul_int(self, n: i32) -> Self {
        Self(self.0 * n)
    }

    #[inline]
    pub const fn div_int(self, n: i32) -> Self {
        Self(self.0 / n)
    }
}

/// Divide a scaled value by `F`, rounding halves away from zero.
///
/// Done in `i64` so the ±F/2 step cannot overflow at the ends of the range.
#[inline]
const fn round_scaled(scaled: i64) -> i64 {
    let half = (F / 2) as i64;
    if scaled >= 0 {
        (scaled + half) / F as i64
    } else {
        (scaled - half) / F as i64
    }
}

impl Add for Fixed {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Fixed {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Mul for Fixed {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self.mul_fixed(rhs)
    }
}

impl Div for Fixed {
    type Output = Self;

    #[inline]
    fn div(self, rhs: Self) -> Self {
        self.div_fixed(rhs)
    }
}

impl Add<i32> for Fixed {
    type Output = Self;

    #[inline]
    fn add(self, rhs: i32) -> Self {
        self.add_int(rhs)
    }
}

impl Sub<i32> for Fixed {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: i32) -> Self {
        self.sub_int(rhs)
    }
}

impl Mul<i32> for Fixed {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: i32) -> Self {
        self.mul_int(rhs)
    }
}

impl Div<i32> for Fixed {
    type Output = Self;

    #[inline]
    fn div(self, rhs: i32) -> Self {
        self.div_int(rhs)
    }
}

impl Neg for Fixed {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl From<i32> for Fixed {
    fn from(n: i32) -> Self {
        Self::from_int(n)
    }
}

impl fmt::Debug for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fixed({} = {:#x})", self, self.0)
    }
}

/// Two decimal places, as load averages are conventionally shown.
impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hundredths = round_scaled(self.0 as i64 * 100);
        let sign = if hundredths < 0 { "-" } else { "" };
        let abs = hundredths.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}
