//! # Amounts and Prices
//!
//! Every balance on the ledger is a signed 64-bit count of *stroops*, one
//! ten-millionth of a unit. Humans write decimals. This module converts
//! between the two with exact integer arithmetic (no floats anywhere) and
//! approximates decimal prices as `n/d` with 32-bit terms.
//!
//! ## Canonical form
//!
//! [`from_stroops`] always renders seven fractional digits: `100` units is
//! `"100.0000000"`, one stroop is `"0.0000001"`, and negatives carry a
//! leading `-`. Parsing accepts fewer digits; formatting never drops any.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::{AMOUNT_DECIMALS, STROOPS_PER_UNIT};
use crate::xdr::serde_support::serde_via_string;
use crate::xdr::{XdrCodec, XdrError, XdrReader, XdrResult, XdrWriter};

// ---------------------------------------------------------------------------
// Decimal <-> stroops
// ---------------------------------------------------------------------------

/// A decimal string split into its parts, before scaling.
struct Decimal<'a> {
    negative: bool,
    whole: &'a str,
    fraction: &'a str,
}

fn split_decimal<'a>(field: &'static str, s: &'a str) -> XdrResult<Decimal<'a>> {
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let (whole, fraction) = match digits.split_once('.') {
        Some((w, f)) => (w, f),
        None => (digits, ""),
    };
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction) {
        return Err(XdrError::validation(
            field,
            format!("'{}' is not a decimal number", s),
        ));
    }
    Ok(Decimal {
        negative,
        whole,
        fraction,
    })
}

/// Parses a decimal amount into stroops.
///
/// At most seven fractional digits are accepted; an eighth is a precision
/// error even when it is zero, since silently dropping input is never ok.
///
/// ```
/// use ledger_xdr::amount::to_stroops;
///
/// assert_eq!(to_stroops("100.1234567").unwrap(), 1_001_234_567);
/// assert!(to_stroops("100.12345678").is_err());
/// ```
pub fn to_stroops(s: &str) -> XdrResult<i64> {
    let decimal = split_decimal("amount", s)?;
    if decimal.fraction.len() > AMOUNT_DECIMALS {
        return Err(XdrError::Precision(format!(
            "'{}' has more than {} fractional digits",
            s, AMOUNT_DECIMALS
        )));
    }

    let overflow = || XdrError::Precision(format!("'{}' does not fit in a 64-bit amount", s));

    let mut value: i128 = 0;
    let padded = decimal
        .fraction
        .bytes()
        .chain(std::iter::repeat(b'0'))
        .take(AMOUNT_DECIMALS);
    for digit in decimal.whole.bytes().chain(padded) {
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(i128::from(digit - b'0')))
            .ok_or_else(overflow)?;
    }
    if decimal.negative {
        value = -value;
    }
    i64::try_from(value).map_err(|_| overflow())
}

/// Formats stroops as the canonical seven-digit decimal string.
pub fn from_stroops(stroops: i64) -> String {
    let sign = if stroops < 0 { "-" } else { "" };
    let magnitude = stroops.unsigned_abs();
    let scale = STROOPS_PER_UNIT as u64;
    format!(
        "{}{}.{:0width$}",
        sign,
        magnitude / scale,
        magnitude % scale,
        width = AMOUNT_DECIMALS
    )
}

// ---------------------------------------------------------------------------
// Amount
// ---------------------------------------------------------------------------

/// A quantity of some asset, in stroops.
///
/// Displays and serializes as the canonical decimal string; encodes on the
/// wire as a plain `int64`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// The largest representable amount; the default trust line limit.
    pub const MAX: Amount = Amount(i64::MAX);

    pub const fn from_stroops(stroops: i64) -> Self {
        Self(stroops)
    }

    pub const fn stroops(self) -> i64 {
        self.0
    }

    /// Same as `str::parse`, spelled out for call sites that read better.
    pub fn parse(s: &str) -> XdrResult<Self> {
        to_stroops(s).map(Self)
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Fails unless the amount is strictly positive.
    pub(crate) fn require_positive(self, field: &'static str) -> XdrResult<()> {
        if self.0 <= 0 {
            return Err(XdrError::validation(field, format!("{} must be positive", self)));
        }
        Ok(())
    }

    /// Fails if the amount is below zero.
    pub(crate) fn require_non_negative(self, field: &'static str) -> XdrResult<()> {
        if self.0 < 0 {
            return Err(XdrError::validation(field, format!("{} must not be negative", self)));
        }
        Ok(())
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&from_stroops(self.0))
    }
}

impl FromStr for Amount {
    type Err = XdrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<i64> for Amount {
    fn from(stroops: i64) -> Self {
        Self(stroops)
    }
}

serde_via_string!(Amount);

impl XdrCodec for Amount {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        w.write_i64(self.0);
        Ok(())
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        r.read_i64().map(Self)
    }
}

// ---------------------------------------------------------------------------
// Price
// ---------------------------------------------------------------------------

const MAX_TERM: u128 = i32::MAX as u128;

/// Decimal places kept when inverting the fractional part.
const RECIPROCAL_DIGITS: u32 = 20;

/// Largest input scale we accept; keeps `10^scale` inside `u128`.
const MAX_INPUT_SCALE: u32 = 30;

/// A ratio of two 32-bit integers, `n / d`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Price {
    pub n: i32,
    pub d: i32,
}

impl Price {
    pub fn new(n: i32, d: i32) -> XdrResult<Self> {
        let price = Self { n, d };
        price.validate()?;
        Ok(price)
    }

    pub fn validate(&self) -> XdrResult<()> {
        if self.d <= 0 {
            return Err(XdrError::validation("price", "denominator must be positive"));
        }
        if self.n < 0 {
            return Err(XdrError::validation("price", "numerator must not be negative"));
        }
        Ok(())
    }

    /// Best rational approximation of a decimal string whose terms fit in
    /// `i32`, by continued-fraction convergents.
    ///
    /// Expansion stops at the first exact term or just before a convergent
    /// would overflow; the last convergent that fit is returned.
    ///
    /// ```
    /// use ledger_xdr::amount::Price;
    ///
    /// let p = Price::from_decimal_str("1.25").unwrap();
    /// assert_eq!((p.n, p.d), (5, 4));
    /// ```
    pub fn from_decimal_str(s: &str) -> XdrResult<Self> {
        let decimal = split_decimal("price", s)?;
        if decimal.negative {
            return Err(XdrError::validation("price", format!("'{}' is negative", s)));
        }
        let too_precise = || XdrError::Precision(format!("'{}' has too many digits for a price", s));

        let mut scale = decimal.fraction.len() as u32;
        if scale > MAX_INPUT_SCALE {
            return Err(too_precise());
        }
        let mut value: u128 = 0;
        for digit in decimal.whole.bytes().chain(decimal.fraction.bytes()) {
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(u128::from(digit - b'0')))
                .ok_or_else(too_precise)?;
        }

        // Convergents h/k, seeded with 0/1 and 1/0.
        let (mut h_prev2, mut k_prev2) = (0u128, 1u128);
        let (mut h_prev, mut k_prev) = (1u128, 0u128);

        loop {
            let unit = 10u128.pow(scale);
            let a = value / unit;
            let frac = value % unit;
            if a > MAX_TERM {
                break;
            }

            let h = a * h_prev + h_prev2;
            let k = a * k_prev + k_prev2;
            if h > MAX_TERM || k > MAX_TERM {
                break;
            }
            (h_prev2, k_prev2) = (h_prev, k_prev);
            (h_prev, k_prev) = (h, k);

            if frac == 0 {
                break;
            }

            // value := round_half_up(unit / frac, 20 places)
            let whole = unit / frac;
            if whole > MAX_TERM {
                break;
            }
            let mut rem = unit % frac;
            let mut next = whole;
            for _ in 0..RECIPROCAL_DIGITS {
                rem *= 10;
                next = next * 10 + rem / frac;
                rem %= frac;
            }
            if rem * 2 >= frac {
                next += 1;
            }
            value = next;
            scale = RECIPROCAL_DIGITS;
        }

        if k_prev == 0 {
            return Err(XdrError::Precision(format!(
                "'{}' is too large to express as a price",
                s
            )));
        }
        // Both terms were checked against MAX_TERM above.
        Ok(Self {
            n: h_prev as i32,
            d: k_prev as i32,
        })
    }

    /// The ratio as a float, for display and comparisons only.
    pub fn as_f64(&self) -> f64 {
        f64::from(self.n) / f64::from(self.d)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.n, self.d)
    }
}

impl FromStr for Price {
    type Err = XdrError;

    /// Accepts either `n/d` or a decimal string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((n, d)) => {
                let n = n
                    .trim()
                    .parse()
                    .map_err(|_| XdrError::validation("price", format!("bad numerator in '{}'", s)))?;
                let d = d
                    .trim()
                    .parse()
                    .map_err(|_| XdrError::validation("price", format!("bad denominator in '{}'", s)))?;
                Self::new(n, d)
            }
            None => Self::from_decimal_str(s),
        }
    }
}

impl XdrCodec for Price {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        w.write_i32(self.n);
        w.write_i32(self.d);
        Ok(())
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            n: r.read_i32()?,
            d: r.read_i32()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_stroops_basic() {
        assert_eq!(to_stroops("100").unwrap(), 1_000_000_000);
        assert_eq!(to_stroops("100.1234567").unwrap(), 1_001_234_567);
        assert_eq!(to_stroops("0.0000001").unwrap(), 1);
        assert_eq!(to_stroops(".5").unwrap(), 5_000_000);
        assert_eq!(to_stroops("-1.5").unwrap(), -15_000_000);
        assert_eq!(to_stroops("7.").unwrap(), 70_000_000);
    }

    #[test]
    fn to_stroops_rejects_eighth_digit() {
        assert!(matches!(to_stroops("100.12345678"), Err(XdrError::Precision(_))));
        assert!(matches!(to_stroops("1.00000000"), Err(XdrError::Precision(_))));
    }

    #[test]
    fn to_stroops_rejects_garbage() {
        for bad in ["", "-", ".", "1e5", "1,5", " 1", "1.2.3", "abc", "--1"] {
            assert!(
                matches!(to_stroops(bad), Err(XdrError::Validation { .. })),
                "accepted {:?}",
                bad
            );
        }
    }

    #[test]
    fn to_stroops_range_edges() {
        assert_eq!(to_stroops("922337203685.4775807").unwrap(), i64::MAX);
        assert_eq!(to_stroops("-922337203685.4775808").unwrap(), i64::MIN);
        assert!(matches!(
            to_stroops("922337203685.4775808"),
            Err(XdrError::Precision(_))
        ));
        assert!(matches!(
            to_stroops("99999999999999999999999999999999999999999"),
            Err(XdrError::Precision(_))
        ));
    }

    #[test]
    fn from_stroops_is_fixed_seven_digits() {
        assert_eq!(from_stroops(1_000_000_000), "100.0000000");
        assert_eq!(from_stroops(1), "0.0000001");
        assert_eq!(from_stroops(0), "0.0000000");
        assert_eq!(from_stroops(-15_000_000), "-1.5000000");
        assert_eq!(from_stroops(i64::MIN), "-922337203685.4775808");
    }

    #[test]
    fn canonical_form_round_trips() {
        for s in ["100", "100.1", "0.0000001", "-3.25", "922337203685.4775807"] {
            let canonical = from_stroops(to_stroops(s).unwrap());
            assert_eq!(from_stroops(to_stroops(&canonical).unwrap()), canonical);
        }
    }

    #[test]
    fn amount_serde_as_string() {
        let amount = Amount::parse("12.5").unwrap();
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "\"12.5000000\"");
        assert_eq!(serde_json::from_str::<Amount>(&json).unwrap(), amount);
    }

    #[test]
    fn price_terminating_decimals() {
        assert_eq!(Price::from_decimal_str("1.25").unwrap(), Price { n: 5, d: 4 });
        assert_eq!(Price::from_decimal_str("0.5").unwrap(), Price { n: 1, d: 2 });
        assert_eq!(Price::from_decimal_str("3").unwrap(), Price { n: 3, d: 1 });
        assert_eq!(Price::from_decimal_str("0").unwrap(), Price { n: 0, d: 1 });
    }

    #[test]
    fn price_non_terminating_stays_within_i32() {
        let x = 3.14159265358979_f64;
        let p = Price::from_decimal_str("3.14159265358979").unwrap();
        assert!(p.n > 0 && p.d > 0);
        assert!((p.as_f64() - x).abs() < 1e-9);

        let third = Price::from_decimal_str("0.3333333333333333").unwrap();
        assert!((third.as_f64() - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn price_max_int() {
        let p = Price::from_decimal_str("2147483647").unwrap();
        assert_eq!(p, Price { n: i32::MAX, d: 1 });
    }

    #[test]
    fn price_just_above_max_int_keeps_last_fitting_convergent() {
        let p = Price::from_decimal_str("2147483647.5").unwrap();
        assert_eq!(p, Price { n: i32::MAX, d: 1 });
    }

    #[test]
    fn price_too_large_or_negative() {
        assert!(matches!(
            Price::from_decimal_str("2147483648"),
            Err(XdrError::Precision(_))
        ));
        assert!(matches!(
            Price::from_decimal_str("-1.5"),
            Err(XdrError::Validation { .. })
        ));
    }

    #[test]
    fn price_from_str_accepts_fraction_form() {
        assert_eq!("7/3".parse::<Price>().unwrap(), Price { n: 7, d: 3 });
        assert!("7/0".parse::<Price>().is_err());
        assert_eq!("1.25".parse::<Price>().unwrap(), Price { n: 5, d: 4 });
    }

    #[test]
    fn price_xdr_layout() {
        let bytes = Price { n: 5, d: 4 }.to_xdr().unwrap();
        assert_eq!(bytes, vec![0, 0, 0, 5, 0, 0, 0, 4]);
    }
}
