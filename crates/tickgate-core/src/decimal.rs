//! Exact base-10 arithmetic for monetary values.
//!
//! Prices are held as an integer mantissa scaled by a power of ten, never as
//! binary floating point. The parsed scale is preserved, so the canonical
//! string form of `"1.50"` is `"1.50"`, not `"1.5"`.

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::ops::Sub;

use serde::{Deserialize, Serialize};

use crate::error::FormatError;

/// Significant-digit cap. Keeps scale alignment and subtraction inside
/// `i128` range with headroom to spare.
const MAX_DIGITS: usize = 20;

/// Fractional-digit cap.
const MAX_SCALE: u32 = 12;

/// Fixed-point decimal: `mantissa * 10^-scale`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Decimal {
    mantissa: i128,
    scale: u32,
}

impl Decimal {
    pub const ZERO: Self = Self {
        mantissa: 0,
        scale: 0,
    };

    /// Parse a plain decimal string: optional sign, digits, optional
    /// fractional part. Scientific notation is rejected.
    pub fn parse(input: &str) -> Result<Self, FormatError> {
        let trimmed = input.trim();
        let invalid = || FormatError::InvalidPrice {
            value: input.to_owned(),
        };

        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };

        let (int_part, frac_part) = match digits.split_once('.') {
            Some((int_part, frac_part)) => (int_part, frac_part),
            None => (digits, ""),
        };

        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let scale = frac_part.len() as u32;
        if scale > MAX_SCALE {
            return Err(FormatError::PriceScaleTooLarge {
                value: input.to_owned(),
                max_scale: MAX_SCALE,
            });
        }
        if int_part.len() + frac_part.len() > MAX_DIGITS {
            return Err(FormatError::PriceTooManyDigits {
                value: input.to_owned(),
                max_digits: MAX_DIGITS,
            });
        }

        let mut mantissa: i128 = 0;
        for b in int_part.bytes().chain(frac_part.bytes()) {
            mantissa = mantissa * 10 + i128::from(b - b'0');
        }
        if negative {
            mantissa = -mantissa;
        }

        Ok(Self { mantissa, scale })
    }

    pub const fn from_i64(value: i64) -> Self {
        Self {
            mantissa: value as i128,
            scale: 0,
        }
    }

    pub const fn is_positive(&self) -> bool {
        self.mantissa > 0
    }

    pub const fn is_zero(&self) -> bool {
        self.mantissa == 0
    }

    pub const fn abs(self) -> Self {
        Self {
            mantissa: self.mantissa.abs(),
            scale: self.scale,
        }
    }

    /// Dimensionless quotient `self / other`. Returns `None` when `other`
    /// is zero. Ratios are diagnostics, not monetary values, so `f64` is
    /// acceptable here.
    pub fn ratio(&self, other: &Self) -> Option<f64> {
        if other.is_zero() {
            return None;
        }
        Some(self.to_f64() / other.to_f64())
    }

    fn to_f64(self) -> f64 {
        self.mantissa as f64 / 10f64.powi(self.scale as i32)
    }

    /// Both mantissas re-expressed at the larger of the two scales.
    fn aligned(self, other: Self) -> (i128, i128, u32) {
        let scale = self.scale.max(other.scale);
        let lhs = self.mantissa * pow10(scale - self.scale);
        let rhs = other.mantissa * pow10(scale - other.scale);
        (lhs, rhs, scale)
    }
}

fn pow10(exp: u32) -> i128 {
    10i128.pow(exp)
}

impl Sub for Decimal {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        let (lhs, rhs, scale) = self.aligned(other);
        Self {
            mantissa: lhs - rhs,
            scale,
        }
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Decimal {}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        let (lhs, rhs, _) = self.aligned(*other);
        lhs.cmp(&rhs)
    }
}

impl Display for Decimal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.mantissa < 0 {
            f.write_str("-")?;
        }
        let magnitude = self.mantissa.unsigned_abs();
        if self.scale == 0 {
            return write!(f, "{magnitude}");
        }
        let divisor = pow10(self.scale).unsigned_abs();
        let int_part = magnitude / divisor;
        let frac_part = magnitude % divisor;
        write!(
            f,
            "{int_part}.{frac_part:0width$}",
            width = self.scale as usize
        )
    }
}

impl TryFrom<String> for Decimal {
    type Error = FormatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Decimal> for String {
    fn from(value: Decimal) -> Self {
        value.to_string()
    }
}
