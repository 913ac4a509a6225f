//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! All amounts are integer minor units (kopiykas for ₴). Floating point
//! never enters the arithmetic: the persisted value, every calculation,
//! and the API all use minor units. Only display formatting converts to
//! major units.
//!
//! ## Usage
//! ```rust
//! use kolysanka_core::money::Money;
//!
//! // Create from minor units, or from whole hryvnias
//! let price = Money::from_minor(45_000); // 450.00 ₴
//! let same = Money::from_major(450);
//! assert_eq!(price, same);
//!
//! let line = price.multiply_quantity(2);
//! assert_eq!(line.minor(), 90_000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// A monetary value in the smallest currency unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: allows negative values for corrections
/// - **Single-field tuple struct**: zero-cost abstraction over i64
/// - **Transparent serde**: persists as a bare JSON number
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Creates a Money value from whole major units (e.g. hryvnias).
    ///
    /// ## Example
    /// ```rust
    /// use kolysanka_core::money::Money;
    ///
    /// assert_eq!(Money::from_major(450).minor(), 45_000);
    /// ```
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major * 100)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major_part(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use kolysanka_core::money::Money;
    ///
    /// let unit_price = Money::from_major(650);
    /// assert_eq!(unit_price.multiply_quantity(3), Money::from_major(1950));
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Human-readable format: `450.00 ₴`.
///
/// For debugging and logs. The UI layer owns localized formatting.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}{}.{:02} ₴",
            sign,
            self.major_part().abs(),
            self.minor_part()
        )
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Summing an iterator of Money values (cart and order totals).
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}
