//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE DUPLICATED-MATH PROBLEM                                            │
//! │                                                                         │
//! │  Cart summary and checkout summary each computed totals with floats:   │
//! │    550 * 0.0825 = 45.37499999...  → "45.37" on one page                │
//! │                                   → "45.38" on the other               │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents + One Rounding Rule                        │
//! │    55000 cents × 825 bps = 45_375_000 / 10_000 = 4537.5 → 4538         │
//! │    Every call site gets the same penny, every time                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rounding Policy
//! Round half up (away from zero) to the cent, applied once per computed
//! quantity over exact integer intermediates.
//!
//! ## Usage
//! ```rust
//! use rto_core::money::Money;
//!
//! let price = Money::from_cents(25000); // $250.00
//! let line = price * 2u32;              // $500.00
//! assert_eq!(line.to_string(), "$500.00");
//!
//! let parsed = Money::parse("9.99").unwrap();
//! assert_eq!(parsed.cents(), 999);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::Rate;

/// Basis points in 100%.
pub(crate) const BPS_SCALE: i128 = 10_000;

/// Divides and rounds half away from zero. `denominator` must be positive.
pub(crate) fn div_round_half_up(numerator: i128, denominator: i128) -> i128 {
    debug_assert!(denominator > 0);
    let half = denominator / 2;
    if numerator >= 0 {
        (numerator + half) / denominator
    } else {
        -((-numerator + half) / denominator)
    }
}

/// Divides and rounds toward positive infinity. `denominator` must be positive.
pub(crate) fn div_ceil(numerator: i128, denominator: i128) -> i128 {
    debug_assert!(denominator > 0);
    let quotient = numerator / denominator;
    if numerator % denominator > 0 {
        quotient + 1
    } else {
        quotient
    }
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in cents.
///
/// Signed so that intermediate differences (e.g. `total - paid`) can be
/// expressed before being clamped; every public engine output is
/// non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use rto_core::money::Money;
    ///
    /// let price = Money::from_cents(11500); // $115.00
    /// assert_eq!(price.cents(), 11500);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from dollars and cents.
    ///
    /// For negative amounts only the major unit carries the sign:
    /// `from_major_minor(-5, 50)` is -$5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Parses a decimal amount such as `"1200"`, `"9.99"` or `"45.375"`.
    ///
    /// Digits past the second decimal are rounded half up, so `"45.375"`
    /// becomes 45.38. No floating point is involved.
    ///
    /// ```rust
    /// use rto_core::money::Money;
    ///
    /// assert_eq!(Money::parse("1200.00").unwrap().cents(), 120000);
    /// assert_eq!(Money::parse("45.375").unwrap().cents(), 4538);
    /// assert_eq!(Money::parse("$9.99").unwrap().cents(), 999);
    /// assert!(Money::parse("abc").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Money, ValidationError> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: reason.to_string(),
        };

        let trimmed = input.trim();
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let unsigned = unsigned.strip_prefix('$').unwrap_or(unsigned);

        let (whole, fraction) = match unsigned.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (unsigned, ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid("no digits"));
        }
        if !whole.chars().all(|c| c.is_ascii_digit())
            || !fraction.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid("expected a decimal number"));
        }

        let whole_value: i128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid("amount too large"))?
        };

        let mut digits = fraction.bytes().map(|b| i128::from(b - b'0'));
        let tenths = digits.next().unwrap_or(0);
        let hundredths = digits.next().unwrap_or(0);
        let round_up = digits.next().is_some_and(|d| d >= 5);

        let mut cents = whole_value
            .checked_mul(100)
            .and_then(|c| c.checked_add(tenths * 10 + hundredths + i128::from(round_up)))
            .ok_or_else(|| invalid("amount too large"))?;
        if negative {
            cents = -cents;
        }

        i64::try_from(cents)
            .map(Money)
            .map_err(|_| invalid("amount too large"))
    }

    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the dollars portion (truncated toward zero).
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cents portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Addition that returns `None` instead of overflowing.
    #[inline]
    pub const fn checked_add(self, other: Money) -> Option<Money> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Multiplication by a quantity that returns `None` instead of overflowing.
    #[inline]
    pub const fn checked_mul(self, qty: u32) -> Option<Money> {
        match self.0.checked_mul(qty as i64) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Clamps negative amounts to zero.
    #[inline]
    pub const fn max_zero(self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            self
        }
    }

    /// Multiplies by a rate, rounding half up to the cent.
    ///
    /// ## Example
    /// ```rust
    /// use rto_core::money::Money;
    /// use rto_core::types::Rate;
    ///
    /// let subtotal = Money::from_cents(55000);     // $550.00
    /// let tax = subtotal.apply_rate(Rate::from_bps(825)); // 8.25%
    /// // $45.375 → $45.38
    /// assert_eq!(tax.cents(), 4538);
    /// ```
    pub fn apply_rate(&self, rate: Rate) -> Money {
        let scaled = i128::from(self.0) * i128::from(rate.bps());
        Money(div_round_half_up(scaled, BPS_SCALE) as i64)
    }

    /// Returns the amount left after taking `discount` off, rounding half up.
    ///
    /// ```rust
    /// use rto_core::money::Money;
    /// use rto_core::types::Rate;
    ///
    /// let remaining = Money::from_cents(69000);
    /// let price = remaining.apply_discount(Rate::from_bps(1000));
    /// assert_eq!(price.cents(), 62100);
    /// ```
    pub fn apply_discount(&self, discount: Rate) -> Money {
        let kept_bps = BPS_SCALE - i128::from(discount.bps());
        let scaled = i128::from(self.0) * kept_bps;
        Money(div_round_half_up(scaled, BPS_SCALE) as i64)
    }

    /// Formats as a plain two-decimal string (`"45.38"`), no currency symbol.
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.dollars().abs(), self.cents_part())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money as `$12.34`. UI localisation is the caller's job.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, self.dollars().abs(), self.cents_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
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

/// Multiplication by a quantity or month count.
impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        Money(self.0 * i64::from(qty))
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl std::str::FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::parse(s)
    }
}

// =============================================================================
// Decimal (de)serialization
// =============================================================================

/// Serde helpers for money fields carried as decimal dollars on the wire.
///
/// Local storage and the REST backend use dollar amounts (`9.99`), not
/// cents. Deserializing accepts JSON numbers or strings and goes through
/// [`Money::parse`] on the shortest decimal representation, so `9.99`
/// arrives as exactly 999 cents. Serializing writes `"9.99"`.
pub mod decimal {
    use super::Money;
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(money: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&money.to_decimal_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        deserializer.deserialize_any(DecimalVisitor)
    }

    struct DecimalVisitor;

    impl Visitor<'_> for DecimalVisitor {
        type Value = Money;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a decimal amount as a number or string")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
            v.checked_mul(100)
                .map(Money::from_cents)
                .ok_or_else(|| E::custom("amount too large"))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
            i64::try_from(v)
                .map_err(|_| E::custom("amount too large"))
                .and_then(|v| self.visit_i64(v))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
            if !v.is_finite() {
                return Err(E::custom("amount must be finite"));
            }
            Money::parse(&v.to_string()).map_err(E::custom)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
            Money::parse(v).map_err(E::custom)
        }
    }

    /// Same as the parent module for `Option<Money>` fields.
    pub mod option {
        use super::super::Money;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            money: &Option<Money>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match money {
                Some(m) => super::serialize(m, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Money>, D::Error> {
            #[derive(Deserialize)]
            struct Wrapper(#[serde(with = "crate::money::decimal")] Money);

            Option::<Wrapper>::deserialize(deserializer).map(|w| w.map(|Wrapper(m)| m))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(59538)), "$595.38");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::zero()), "$0.00");
    }

    #[test]
    fn test_decimal_string() {
        assert_eq!(Money::from_cents(4538).to_decimal_string(), "45.38");
        assert_eq!(Money::from_cents(999).to_decimal_string(), "9.99");
        assert_eq!(Money::from_cents(5).to_decimal_string(), "0.05");
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("10").unwrap().cents(), 1000);
        assert_eq!(Money::parse("9.9").unwrap().cents(), 990);
        assert_eq!(Money::parse(".5").unwrap().cents(), 50);
        assert_eq!(Money::parse(" 250.00 ").unwrap().cents(), 25000);
        assert_eq!(Money::parse("-5.50").unwrap().cents(), -550);
        assert_eq!(Money::parse("0.004").unwrap().cents(), 0);
        assert_eq!(Money::parse("0.005").unwrap().cents(), 1);

        assert!(Money::parse("").is_err());
        assert!(Money::parse(".").is_err());
        assert!(Money::parse("1.2.3").is_err());
        assert!(Money::parse("12a").is_err());
    }

    #[test]
    fn test_parse_rejects_oversized_amounts() {
        assert!(Money::parse("92233720368547758.07").is_ok());
        assert!(Money::parse("92233720368547758.08").is_err());
        // Fits i128 on its own, overflows once scaled to cents.
        let err = Money::parse("9999999999999999999999999999999999999").unwrap_err();
        assert_eq!(err.to_string(), "amount has invalid format: amount too large");
        assert!(Money::parse(&"9".repeat(60)).is_err());
    }

    #[test]
    fn test_checked_ops() {
        let big = Money::from_cents(i64::MAX / 2 + 1);
        assert_eq!(big.checked_add(big), None);
        assert_eq!(big.checked_mul(2), None);
        assert_eq!(
            Money::from_cents(250).checked_mul(4),
            Some(Money::from_cents(1000))
        );
        assert_eq!(
            Money::from_cents(1).checked_add(Money::from_cents(2)),
            Some(Money::from_cents(3))
        );
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3u32).cents(), 3000);
        assert_eq!((b - a).max_zero(), Money::zero());

        let total: Money = [a, b, b].into_iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_apply_rate_rounds_half_up() {
        // $10.00 at 8.25% = $0.825 → $0.83
        let tax = Money::from_cents(1000).apply_rate(Rate::from_bps(825));
        assert_eq!(tax.cents(), 83);

        // $10.00 at 8.24% = $0.824 → $0.82
        let tax = Money::from_cents(1000).apply_rate(Rate::from_bps(824));
        assert_eq!(tax.cents(), 82);
    }

    #[test]
    fn test_apply_discount() {
        let price = Money::from_cents(10000).apply_discount(Rate::from_bps(1000));
        assert_eq!(price.cents(), 9000);

        // $0.05 at 10% off = $0.045 → $0.05
        let price = Money::from_cents(5).apply_discount(Rate::from_bps(1000));
        assert_eq!(price.cents(), 5);
    }

    #[test]
    fn test_rounding_helpers() {
        assert_eq!(div_round_half_up(5, 10), 1);
        assert_eq!(div_round_half_up(4, 10), 0);
        assert_eq!(div_round_half_up(-5, 10), -1);
        assert_eq!(div_ceil(10, 3), 4);
        assert_eq!(div_ceil(9, 3), 3);
        assert_eq!(div_ceil(0, 3), 0);
    }

    #[test]
    fn test_decimal_serde() {
        #[derive(Serialize, Deserialize)]
        struct Body {
            #[serde(with = "crate::money::decimal")]
            amount: Money,
            #[serde(default, with = "crate::money::decimal::option")]
            extra: Option<Money>,
        }

        let body: Body = serde_json::from_str(r#"{"amount": 9.99}"#).unwrap();
        assert_eq!(body.amount.cents(), 999);
        assert!(body.extra.is_none());

        let body: Body = serde_json::from_str(r#"{"amount": "250", "extra": 3}"#).unwrap();
        assert_eq!(body.amount.cents(), 25000);
        assert_eq!(body.extra, Some(Money::from_cents(300)));

        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"amount":"250.00","extra":"3.00"}"#);
    }
}
