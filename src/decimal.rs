//! Arbitrary-precision decimal numbers.
//!
//! Monetary amounts frequently arrive as strings (`"500"`, `"19.99"`) because
//! upstream APIs want to avoid binary floating point. [`Decimal`] keeps those
//! values exact: it stores the digits as a [`BigInt`] together with a base-10
//! scale, so `19.99` is held as `1999 × 10⁻²`.
//!
//! Values are always normalised (trailing fractional zeros are dropped), which
//! means equality is numeric equality:
//!
//! ```rust
//! use serde_param::Decimal;
//!
//! let a: Decimal = "500.00".parse().unwrap();
//! let b = Decimal::from(500);
//! assert_eq!(a, b);
//! assert_eq!(a.to_string(), "500");
//! ```

use num_bigint::{BigInt, Sign};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Largest absolute exponent accepted in scientific notation.
const MAX_EXPONENT: i64 = 4096;

/// An exact decimal number: `digits × 10^-scale`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Decimal {
    digits: BigInt,
    scale: u32,
}

/// Returned when a string is not a decimal literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid decimal literal {0:?}")]
pub struct ParseDecimalError(String);

impl Decimal {
    /// Builds a decimal from unscaled digits and a scale.
    ///
    /// ```rust
    /// use serde_param::Decimal;
    /// use num_bigint::BigInt;
    ///
    /// let d = Decimal::from_parts(BigInt::from(1999), 2);
    /// assert_eq!(d.to_string(), "19.99");
    /// ```
    #[must_use]
    pub fn from_parts(digits: BigInt, scale: u32) -> Self {
        let ten = BigInt::from(10u32);
        let zero = BigInt::from(0u32);
        let mut digits = digits;
        let mut scale = scale;

        if digits == zero {
            return Decimal { digits, scale: 0 };
        }
        while scale > 0 && (&digits % &ten) == zero {
            digits = &digits / &ten;
            scale -= 1;
        }
        Decimal { digits, scale }
    }

    /// The unscaled digits.
    #[must_use]
    pub fn digits(&self) -> &BigInt {
        &self.digits
    }

    /// Number of digits after the decimal point.
    #[must_use]
    pub fn scale(&self) -> u32 {
        self.scale
    }

    #[must_use]
    pub fn is_integer(&self) -> bool {
        self.scale == 0
    }

    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.digits.sign() == Sign::Minus
    }

    /// Returns the value as an `i64` when it is integral and in range.
    #[must_use]
    pub fn to_i64(&self) -> Option<i64> {
        if self.scale != 0 {
            return None;
        }
        i64::try_from(&self.digits).ok()
    }

    /// Nearest `f64`; precision beyond what `f64` can hold is lost.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        self.to_string().parse().unwrap_or(f64::NAN)
    }
}

impl Default for Decimal {
    fn default() -> Self {
        Decimal {
            digits: BigInt::from(0u32),
            scale: 0,
        }
    }
}

impl FromStr for Decimal {
    type Err = ParseDecimalError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseDecimalError(input.to_string());
        let s = input.trim();

        let (negative, s) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };

        let (mantissa, exponent) = match s.find(['e', 'E']) {
            Some(idx) => {
                let exp: i64 = s[idx + 1..].parse().map_err(|_| invalid())?;
                if exp.abs() > MAX_EXPONENT {
                    return Err(invalid());
                }
                (&s[..idx], exp)
            }
            None => (s, 0),
        };

        let (int_part, frac_part) = match mantissa.split_once('.') {
            Some((i, f)) => (i, f),
            None => (mantissa, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let mut text = String::with_capacity(int_part.len() + frac_part.len());
        text.push_str(int_part);
        text.push_str(frac_part);
        let mut digits = BigInt::parse_bytes(text.as_bytes(), 10).ok_or_else(invalid)?;
        if negative {
            digits = -digits;
        }

        let scale = frac_part.len() as i64 - exponent;
        if scale < 0 {
            let factor = BigInt::from(10u32).pow(scale.unsigned_abs() as u32);
            Ok(Decimal::from_parts(digits * factor, 0))
        } else {
            let scale = u32::try_from(scale).map_err(|_| invalid())?;
            Ok(Decimal::from_parts(digits, scale))
        }
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let magnitude = self.digits.magnitude().to_string();
        if self.is_negative() {
            f.write_str("-")?;
        }
        let scale = self.scale as usize;
        if scale == 0 {
            f.write_str(&magnitude)
        } else if magnitude.len() > scale {
            let (int_part, frac_part) = magnitude.split_at(magnitude.len() - scale);
            write!(f, "{}.{}", int_part, frac_part)
        } else {
            write!(f, "0.{}{}", "0".repeat(scale - magnitude.len()), magnitude)
        }
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        Decimal {
            digits: BigInt::from(value),
            scale: 0,
        }
    }
}

impl From<i32> for Decimal {
    fn from(value: i32) -> Self {
        Decimal::from(value as i64)
    }
}

impl From<u32> for Decimal {
    fn from(value: u32) -> Self {
        Decimal::from(value as i64)
    }
}

impl TryFrom<f64> for Decimal {
    type Error = ParseDecimalError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            return Err(ParseDecimalError(value.to_string()));
        }
        // `Display` for f64 prints the shortest round-tripping form without an exponent.
        format!("{}", value).parse()
    }
}

impl Serialize for Decimal {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Decimal {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DecimalVisitor;

        impl<'de> Visitor<'de> for DecimalVisitor {
            type Value = Decimal;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a decimal number or numeric string")
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Decimal, E> {
                Ok(Decimal::from(value))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Decimal, E> {
                Ok(Decimal::from_parts(BigInt::from(value), 0))
            }

            fn visit_f64<E: de::Error>(self, value: f64) -> Result<Decimal, E> {
                Decimal::try_from(value).map_err(E::custom)
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Decimal, E> {
                value.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(DecimalVisitor)
    }
}
