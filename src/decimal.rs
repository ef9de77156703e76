//! Arbitrary-precision scaled decimal values
//!
//! The wire format only ever stores a decimal as an unscaled integer of at
//! most 8 bytes plus a one-byte scale, but the host-facing value the encoder
//! accepts is unbounded precision (mirroring the original `decimal.Decimal`
//! input). This module holds the big-integer representation and the
//! normalization ladder that brings an arbitrary decimal down to something
//! that fits on the wire, or decides it must fall back to a float.

use std::fmt::Display;

use num_bigint::{BigInt, Sign};
use num_traits::{Signed, ToPrimitive, Zero};

use crate::error::Error;

/// A host-facing scaled decimal: `unscaled * 10^scale`, or one of the two
/// non-finite values `decimal.Decimal` itself can represent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decimal {
    /// `unscaled * 10^scale`
    Finite {
        /// Unscaled integer mantissa, of unbounded precision
        unscaled: BigInt,
        /// Power-of-ten exponent applied to `unscaled`
        scale: i32,
    },
    /// Not a number
    Nan,
    /// Positive or negative infinity
    Infinity {
        /// `true` for negative infinity
        negative: bool,
    },
}

impl Decimal {
    /// Construct a finite decimal `unscaled * 10^scale`
    pub fn new(unscaled: impl Into<BigInt>, scale: i32) -> Self {
        Self::Finite {
            unscaled: unscaled.into(),
            scale,
        }
    }

    /// Lossily convert to the nearest `f64`, used for the decimal-to-double
    /// fallback path.
    pub fn to_f64(&self) -> f64 {
        match self {
            Decimal::Nan => f64::NAN,
            Decimal::Infinity { negative: true } => f64::NEG_INFINITY,
            Decimal::Infinity { negative: false } => f64::INFINITY,
            Decimal::Finite { unscaled, scale } => {
                let mantissa = unscaled.to_f64().unwrap_or(f64::NAN);
                mantissa * 10f64.powi(*scale)
            }
        }
    }
}

impl Display for Decimal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decimal::Nan => write!(f, "NaN"),
            Decimal::Infinity { negative: true } => write!(f, "-Infinity"),
            Decimal::Infinity { negative: false } => write!(f, "Infinity"),
            Decimal::Finite { unscaled, scale } => write!(f, "{unscaled}E{scale}"),
        }
    }
}

/// An unscaled integer + scale pair ready to be framed as POSNUM/NEGNUM
pub(crate) struct WireDecimal {
    pub(crate) unscaled: i64,
    pub(crate) scale: i8,
}

/// Normalize an arbitrary-precision `unscaled * 10^scale` into something that
/// fits an i64 mantissa and an i8 scale, following the same 19 → 18 →
/// shift-by-10 → scale-range ladder as the reference implementation.
///
/// Returns `Ok(None)` on the (practically unreachable, but specified) case
/// where normalization cannot bring the scale back into `[-127, 128]`; the
/// caller falls through to the float encoding in that case.
pub(crate) fn normalize_for_wire(
    unscaled: &BigInt,
    scale: i32,
) -> Result<Option<WireDecimal>, Error> {
    let mut u = unscaled.clone();
    let mut e = scale;

    if bit_length(&u) > 63 {
        let (rounded, shift) = round_to_significant_digits(&u, 19);
        u = rounded;
        e += shift;

        if bit_length(&u) > 63 {
            let (rounded, shift) = round_to_significant_digits(&u, 18);
            u = rounded;
            e += shift;

            let threshold = BigInt::from(922_337_203_685_477_581i64);
            if u.abs() < threshold {
                u *= 10;
                e -= 1;
            }

            if bit_length(&u) > 63 {
                tracing::debug!(scale = e, "decimal magnitude still exceeds 63 bits after rounding ladder");
                return Err(Error::range("decimal unscaled value exceeds 63 bits"));
            }
        }
    }

    // `s` mirrors the reference implementation's bookkeeping variable
    // (`s = -e`); the valid wire range for it is [-127, 128].
    let mut s = -e;
    if !(-127..=128).contains(&s) {
        tracing::debug!(scale = e, "decimal scale outside [-127, 128], renormalizing");
        let prec_adj = if s > 128 { -s + 128 } else { -s - 127 };
        u = scale_by_power_of_ten_round_half_up(&u, prec_adj);
        s += prec_adj;
        if u.is_zero() {
            s = 0;
        }
        if bit_length(&u) > 63 {
            return Err(Error::range("decimal unscaled value exceeds 63 bits after scale-range fixup"));
        }
    }
    e = -s;

    if !(-127..=128).contains(&s) {
        return Ok(None);
    }

    let unscaled = u
        .to_i64()
        .ok_or_else(|| Error::range("decimal unscaled value exceeds 63 bits"))?;
    let scale = i8::try_from(e).map_err(|_| Error::range("decimal scale exceeds one byte"))?;
    Ok(Some(WireDecimal { unscaled, scale }))
}

/// Two's-complement-equivalent bit length, matching the reference
/// implementation's `(value + 1).bit_length()` treatment of negative values.
fn bit_length(v: &BigInt) -> u64 {
    if v.sign() == Sign::Minus {
        (v + BigInt::from(1)).magnitude().bits()
    } else {
        v.magnitude().bits()
    }
}

/// Round `v` to at most `digits` significant decimal digits, half away from
/// zero on ties. Returns the rounded value and how many power-of-ten places
/// it was shifted by (add this to the value's exponent to keep the same
/// approximate magnitude).
fn round_to_significant_digits(v: &BigInt, digits: u32) -> (BigInt, i32) {
    let sign = v.sign();
    let magnitude = v.magnitude();
    let ndigits = magnitude.to_string().len() as u32;
    if ndigits <= digits {
        return (v.clone(), 0);
    }

    let shift = ndigits - digits;
    let divisor = BigInt::from(10u32).pow(shift);
    let magnitude = BigInt::from_biguint(Sign::Plus, magnitude.clone());
    let q = &magnitude / &divisor;
    let r = &magnitude % &divisor;
    let mut q = if &r * 2 >= divisor { q + 1 } else { q };
    let mut shift = shift as i32;

    if q.magnitude().to_string().len() as u32 > digits {
        q /= 10;
        shift += 1;
    }

    (BigInt::from_biguint(sign, q.into_parts().1), shift)
}

/// Multiply `v` by `10^power` if `power >= 0`, otherwise divide by
/// `10^(-power)` rounding half away from zero.
fn scale_by_power_of_ten_round_half_up(v: &BigInt, power: i32) -> BigInt {
    if power >= 0 {
        v * BigInt::from(10u32).pow(power as u32)
    } else {
        let divisor = BigInt::from(10u32).pow((-power) as u32);
        let sign = v.sign();
        let magnitude = BigInt::from_biguint(Sign::Plus, v.magnitude().clone());
        let q = &magnitude / &divisor;
        let r = &magnitude % &divisor;
        let q = if &r * 2 >= divisor { q + 1 } else { q };
        BigInt::from_biguint(sign, q.into_parts().1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_zero_round_trips() {
        let normalized = normalize_for_wire(&BigInt::from(123), 0).unwrap().unwrap();
        assert_eq!(normalized.unscaled, 123);
        assert_eq!(normalized.scale, 0);
    }

    #[test]
    fn negative_unscaled_round_trips() {
        let normalized = normalize_for_wire(&BigInt::from(-7), -2).unwrap().unwrap();
        assert_eq!(normalized.unscaled, -7);
        assert_eq!(normalized.scale, -2);
    }

    #[test]
    fn huge_mantissa_is_rounded_to_19_digits() {
        // 20 nines: exceeds 63 bits and 19 significant digits.
        let huge = BigInt::parse_bytes(b"99999999999999999999", 10).unwrap();
        let normalized = normalize_for_wire(&huge, 0).unwrap().unwrap();
        assert!(bit_length(&BigInt::from(normalized.unscaled)) <= 63);
    }

    #[test]
    fn scale_out_of_i8_range_is_fixed_up() {
        let normalized = normalize_for_wire(&BigInt::from(5), -129).unwrap().unwrap();
        assert_eq!(normalized.unscaled, 1);
        assert_eq!(normalized.scale, -128);
    }

    #[test]
    fn zero_unscaled_resets_scale_after_fixup() {
        let normalized = normalize_for_wire(&BigInt::from(0), 200).unwrap().unwrap();
        assert_eq!(normalized.unscaled, 0);
        assert_eq!(normalized.scale, 0);
    }

    #[test]
    fn to_f64_matches_unscaled_times_power() {
        let d = Decimal::new(125, -2);
        assert!((d.to_f64() - 1.25).abs() < 1e-9);
    }

    #[test]
    fn nan_and_infinity_convert() {
        assert!(Decimal::Nan.to_f64().is_nan());
        assert_eq!(Decimal::Infinity { negative: false }.to_f64(), f64::INFINITY);
        assert_eq!(Decimal::Infinity { negative: true }.to_f64(), f64::NEG_INFINITY);
    }
}
