//! Fixed-point accumulation for SUM and AVG
//!
//! Floating-point summation of many small values accumulates visible,
//! order-dependent rounding error. Aggregation instead accumulates an i128
//! mantissa at a fixed scale of four decimal digits, parsed from each
//! number's decimal representation, and rounds once at the end.

use serde_json::Number;

/// Decimal digits kept during accumulation.
const SCALE: u32 = 4;
const SCALE_FACTOR: i128 = 10i128.pow(SCALE);

/// Running fixed-point sum.
#[derive(Debug, Default)]
pub struct DecimalSum {
    total: i128,
}

impl DecimalSum {
    /// Creates a zeroed accumulator
    pub fn new() -> Self {
        Self { total: 0 }
    }

    /// Adds one value to the running total.
    pub fn add(&mut self, n: &Number) {
        self.total = self.total.saturating_add(to_fixed(n));
    }

    /// The exact accumulated value as f64 (no 2-digit rounding).
    pub fn value(&self) -> f64 {
        self.total as f64 / SCALE_FACTOR as f64
    }

    /// The accumulated value rounded half-away-from-zero to 2 decimal places.
    pub fn round2(&self) -> f64 {
        round_half_away(self.total, SCALE - 2) as f64 / 100.0
    }
}

/// Divides a scaled integer by `10^shift`, rounding half away from zero.
fn round_half_away(value: i128, shift: u32) -> i128 {
    let divisor = 10i128.pow(shift);
    let quotient = value / divisor;
    let remainder = value % divisor;
    if remainder.abs() * 2 >= divisor {
        quotient + remainder.signum()
    } else {
        quotient
    }
}

/// Converts a JSON number to the fixed-point mantissa by parsing its decimal
/// string form. Values whose mantissa cannot be represented fall back to a
/// rounded f64 conversion.
fn to_fixed(n: &Number) -> i128 {
    parse_fixed(&n.to_string()).unwrap_or_else(|| {
        let scaled = n.as_f64().unwrap_or(0.0) * SCALE_FACTOR as f64;
        if scaled >= i128::MAX as f64 {
            i128::MAX
        } else if scaled <= i128::MIN as f64 {
            i128::MIN
        } else {
            scaled.round() as i128
        }
    })
}

fn parse_fixed(s: &str) -> Option<i128> {
    let (body, exp) = match s.find(['e', 'E']) {
        Some(i) => (&s[..i], s[i + 1..].parse::<i32>().ok()?),
        None => (s, 0),
    };
    let (body, negative) = match body.strip_prefix('-') {
        Some(rest) => (rest, true),
        None => (body, false),
    };
    let (int_part, frac_part) = match body.split_once('.') {
        Some((i, f)) => (i, f),
        None => (body, ""),
    };

    let mut digits = String::with_capacity(int_part.len() + frac_part.len());
    digits.push_str(int_part);
    digits.push_str(frac_part);
    let mut value: i128 = digits.parse().ok()?;
    if negative {
        value = -value;
    }

    // Shift so the mantissa sits at exactly SCALE fractional digits.
    let scale = frac_part.len() as i32 - exp;
    let shift = SCALE as i32 - scale;
    if shift >= 0 {
        value.checked_mul(10i128.checked_pow(shift as u32)?)
    } else {
        Some(round_half_away(value, (-shift) as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn num(v: f64) -> Number {
        json!(v).as_number().unwrap().clone()
    }

    #[test]
    fn test_sum_is_order_independent() {
        let values = [0.1, 0.2, 0.3, 10.05, 7.45];
        let mut forward = DecimalSum::new();
        for v in values {
            forward.add(&num(v));
        }
        let mut backward = DecimalSum::new();
        for v in values.iter().rev() {
            backward.add(&num(*v));
        }
        assert_eq!(forward.round2(), backward.round2());
        assert_eq!(forward.round2(), 18.1);
    }

    #[test]
    fn test_tenths_sum_exactly() {
        // 0.1 ten times is exactly 1 in fixed point.
        let mut sum = DecimalSum::new();
        for _ in 0..10 {
            sum.add(&num(0.1));
        }
        assert_eq!(sum.round2(), 1.0);
        assert_eq!(sum.value(), 1.0);
    }

    #[test]
    fn test_round2_half_away_from_zero() {
        let mut sum = DecimalSum::new();
        sum.add(&num(2.005));
        assert_eq!(sum.round2(), 2.01);

        let mut neg = DecimalSum::new();
        neg.add(&num(-2.005));
        assert_eq!(neg.round2(), -2.01);
    }

    #[test]
    fn test_integers_and_negatives() {
        let mut sum = DecimalSum::new();
        sum.add(&Number::from(7));
        sum.add(&num(-2.5));
        assert_eq!(sum.round2(), 4.5);
    }

    #[test]
    fn test_parse_exponent_forms() {
        assert_eq!(parse_fixed("1e2"), Some(100 * SCALE_FACTOR));
        assert_eq!(parse_fixed("2.5e-2"), Some(250));
        assert_eq!(parse_fixed("-1.5E1"), Some(-15 * SCALE_FACTOR));
    }

    #[test]
    fn test_extra_digits_rounded() {
        // 0.00005 rounds half away from zero at the 4th digit.
        assert_eq!(parse_fixed("0.00005"), Some(1));
        assert_eq!(parse_fixed("0.00004"), Some(0));
    }

    #[test]
    fn test_huge_value_saturates() {
        let mut sum = DecimalSum::new();
        sum.add(&num(1e300));
        sum.add(&num(1.0));
        // Saturation keeps the accumulator usable, not meaningful.
        assert!(sum.value() > 1e30);
    }
}
