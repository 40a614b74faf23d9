//! Numeric primitives for the calculation routes.
//!
//! Operands arrive as raw path segments and are read with leading-prefix
//! integer parsing. Anything that does not start with a digit becomes
//! not-a-number instead of an error, and not-a-number flows through the
//! arithmetic untouched. Results are doubles; on the wire they follow the
//! usual JSON number rules: integral values print without a fraction and
//! non-finite values print as `null`.

use serde::{Serialize, Serializer};

/// Largest integer a double represents exactly (2^53 - 1).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// A double-precision value with JSON number semantics on serialization.
#[derive(Debug, Clone, Copy)]
pub struct Number(f64);

impl Number {
    /// The not-a-number sentinel produced by unparsable operands.
    pub const NAN: Number = Number(f64::NAN);

    #[must_use]
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    #[must_use]
    pub fn is_nan(self) -> bool {
        self.0.is_nan()
    }

    /// Returns the value as an `i64` when it is finite, integral and within
    /// the exactly representable range.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // range and fraction checked above the cast
    pub fn as_exact_integer(self) -> Option<i64> {
        let v = self.0;
        if v.is_finite() && v.fract() == 0.0 && v.abs() <= MAX_SAFE_INTEGER {
            Some(v as i64)
        } else {
            None
        }
    }

}

impl Serialize for Number {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if let Some(i) = self.as_exact_integer() {
            serializer.serialize_i64(i)
        } else if self.0.is_finite() {
            serializer.serialize_f64(self.0)
        } else {
            serializer.serialize_none()
        }
    }
}

/// Parses the leading integer of `input`.
///
/// Leading whitespace is skipped, one optional sign is accepted, and a
/// `0x`/`0X` prefix switches to base 16. Digits are consumed until the first
/// character that is not a digit of the active base; the rest is ignored.
/// Input without any leading digit yields [`Number::NAN`].
#[must_use]
pub fn parse_int_prefix(input: &str) -> Number {
    let trimmed = input.trim_start();

    let (negative, unsigned) = if let Some(rest) = trimmed.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = trimmed.strip_prefix('+') {
        (false, rest)
    } else {
        (false, trimmed)
    };

    let (radix, digits) = match unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))
    {
        Some(hex) => (16, hex),
        None => (10, unsigned),
    };

    let mut accumulated: Option<f64> = None;
    for c in digits.chars() {
        let Some(digit) = c.to_digit(radix) else {
            break;
        };
        let base = accumulated.unwrap_or(0.0);
        accumulated = Some(base * f64::from(radix) + f64::from(digit));
    }

    match accumulated {
        Some(v) if negative => Number::new(-v),
        Some(v) => Number::new(v),
        None => Number::NAN,
    }
}
