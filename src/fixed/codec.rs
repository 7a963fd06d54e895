//! Exact conversion between decimal text and [`FixedPoint`].

use std::{fmt, str::FromStr};

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{ToPrimitive, Zero};

use super::FixedPoint;
use crate::limb::Limb;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseFixedError {
    #[error("empty decimal string")]
    Empty,
    #[error("no digits in {0:?}")]
    MissingDigits(String),
    #[error("invalid character {character:?} in {input:?}")]
    InvalidCharacter { input: String, character: char },
    #[error("integer part {integer} does not fit in a signed {bits}-bit limb")]
    IntegerOutOfRange { integer: BigInt, bits: u32 },
    #[error("zero denominator")]
    ZeroDenominator,
}

/**
Split plain decimal text (`-123.456`, no exponent, no `+`) into an exact
fraction `numerator / 10^digits`.
*/
pub fn parse_decimal(input: &str) -> Result<(BigInt, BigUint), ParseFixedError> {
    if input.is_empty() {
        return Err(ParseFixedError::Empty);
    }
    let (sign, unsigned) = match input.strip_prefix('-') {
        Some(rest) => (Sign::Minus, rest),
        None => (Sign::Plus, input),
    };
    let (integer, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    if let Some(character) = integer
        .chars()
        .chain(fraction.chars())
        .find(|c| !c.is_ascii_digit())
    {
        return Err(ParseFixedError::InvalidCharacter {
            input: input.to_owned(),
            character,
        });
    }

    let digits = format!("{integer}{fraction}");
    let magnitude = BigUint::parse_bytes(digits.as_bytes(), 10)
        .ok_or_else(|| ParseFixedError::MissingDigits(input.to_owned()))?;
    let denominator = BigUint::from(10u32).pow(fraction.len() as u32);
    Ok((BigInt::from_biguint(sign, magnitude), denominator))
}

impl<L: Limb, const K: usize> FixedPoint<L, K> {
    /**
    Closest representation at or below `numerator / denominator`.

    The integer limb is the floor of the fraction, so a negative value borrows
    one from its integer part and stores `1 - f` in the fraction limbs: that
    is what makes the limbs a two's-complement pattern of the whole value.
    The remainder is converted to binary by repeated doubling, one bit per
    step, and stops early once it becomes exactly zero.
    */
    pub fn from_ratio(numerator: &BigInt, denominator: &BigUint) -> Result<Self, ParseFixedError> {
        if denominator.is_zero() {
            return Err(ParseFixedError::ZeroDenominator);
        }
        let (integer, remainder) = numerator.div_mod_floor(&BigInt::from(denominator.clone()));
        let integer_limb = integer
            .to_i64()
            .filter(|value| (L::SIGNED_MIN..=L::SIGNED_MAX).contains(value))
            .ok_or_else(|| ParseFixedError::IntegerOutOfRange {
                integer: integer.clone(),
                bits: L::BITS,
            })?;

        let mut limbs = [L::ZERO; K];
        limbs[0] = L::from_signed(integer_limb);

        let (_, mut remainder) = remainder.into_parts();
        for bit in 0..Self::FRACTION_BITS {
            if remainder.is_zero() {
                break;
            }
            remainder <<= 1u32;
            if remainder >= *denominator {
                remainder -= denominator;
                let limb = &mut limbs[1 + (bit / L::BITS) as usize];
                *limb = *limb | (L::ONE << (L::BITS - 1 - bit % L::BITS));
            }
        }

        Ok(Self { limbs })
    }

    pub fn parse(input: &str) -> Result<Self, ParseFixedError> {
        let (numerator, denominator) = parse_decimal(input)?;
        Self::from_ratio(&numerator, &denominator)
    }
}

impl<L: Limb, const K: usize> FromStr for FixedPoint<L, K> {
    type Err = ParseFixedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Exact decimal expansion. Every binary fraction terminates in decimal, so no
/// digit is ever rounded; trailing zeros are trimmed.
impl<L: Limb, const K: usize> fmt::Display for FixedPoint<L, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fraction_bits = Self::FRACTION_BITS;
        let fraction = self.limbs[1..]
            .iter()
            .fold(BigUint::zero(), |acc, limb| (acc << L::BITS) + limb.to_u64());

        // value · 10^B = integer · 10^B + fraction · 5^B
        let scaled = BigInt::from(self.integer_part()) * BigInt::from(BigUint::from(10u32).pow(fraction_bits))
            + BigInt::from(fraction * BigUint::from(5u32).pow(fraction_bits));
        let (sign, magnitude) = scaled.into_parts();

        let digits = format!(
            "{:0>width$}",
            magnitude.to_str_radix(10),
            width = fraction_bits as usize + 1
        );
        let (integer, fraction) = digits.split_at(digits.len() - fraction_bits as usize);
        let fraction = fraction.trim_end_matches('0');

        if sign == Sign::Minus {
            f.write_str("-")?;
        }
        write!(
            f,
            "{}.{}",
            integer,
            if fraction.is_empty() { "0" } else { fraction }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::{Fixed128, Fixed256};

    /// `|x - text| < 1 ulp`, checked with exact integers.
    fn within_one_ulp<L: Limb, const K: usize>(x: FixedPoint<L, K>, text: &str) -> bool {
        let (x_numerator, x_denominator) = parse_decimal(&x.to_string()).unwrap();
        let (numerator, denominator) = parse_decimal(text).unwrap();
        let difference = x_numerator * BigInt::from(denominator.clone())
            - numerator * BigInt::from(x_denominator.clone());
        let bound = BigInt::from(x_denominator * denominator);
        (difference << FixedPoint::<L, K>::FRACTION_BITS as usize).magnitude() < bound.magnitude()
    }

    #[test]
    fn parse_one_and_a_half() {
        let x: Fixed128 = "1.5".parse().unwrap();
        assert_eq!(x.limbs(), &[1, 0x8000_0000, 0, 0]);
    }

    #[test]
    fn parse_negative_borrows_from_integer_part() {
        let x: Fixed128 = "-0.5".parse().unwrap();
        assert_eq!(x.limbs(), &[u32::MAX, 0x8000_0000, 0, 0]);
        assert_eq!(x, -"0.5".parse::<Fixed128>().unwrap());

        let y: Fixed256 = "-2.75".parse().unwrap();
        assert_eq!(y.limbs(), &[(-3i64) as u64, 1 << 62, 0, 0]);
    }

    #[test]
    fn parse_negative_integer_is_exact() {
        assert_eq!("-1.0".parse::<Fixed256>().unwrap(), -Fixed256::one());
        assert_eq!("-1".parse::<Fixed256>().unwrap(), -Fixed256::one());
        assert_eq!("-0".parse::<Fixed256>().unwrap(), Fixed256::zero());
        assert_eq!("7".parse::<Fixed128>().unwrap(), Fixed128::from_integer(7));
        assert_eq!("7.".parse::<Fixed128>().unwrap(), Fixed128::from_integer(7));
    }

    #[test]
    fn parse_truncates_non_terminating_fraction() {
        let tenth: Fixed128 = "0.1".parse().unwrap();
        // 0.1 = 0.000110011001100..., repeating 0011 after the first bit.
        assert_eq!(tenth.limbs(), &[0, 0x1999_9999, 0x9999_9999, 0x9999_9999]);
        assert!(within_one_ulp(tenth, "0.1"));
    }

    #[test]
    fn parse_rejects_out_of_range_integer_part() {
        assert!("2147483647.9".parse::<Fixed128>().is_ok());
        assert!("-2147483648".parse::<Fixed128>().is_ok());
        assert!(matches!(
            "2147483648.0".parse::<Fixed128>(),
            Err(ParseFixedError::IntegerOutOfRange { bits: 32, .. })
        ));
        assert!(matches!(
            "-2147483648.5".parse::<Fixed128>(),
            Err(ParseFixedError::IntegerOutOfRange { .. })
        ));
        assert!("2147483648.0".parse::<Fixed256>().is_ok());
        assert!("99999999999999999999".parse::<Fixed256>().is_err());
    }

    #[test]
    fn parse_rejects_malformed_text() {
        assert_eq!("".parse::<Fixed128>(), Err(ParseFixedError::Empty));
        assert!(matches!("-".parse::<Fixed128>(), Err(ParseFixedError::MissingDigits(_))));
        assert!(matches!(".".parse::<Fixed128>(), Err(ParseFixedError::MissingDigits(_))));
        for text in ["+1.5", "1e5", "1.2.3", "0x10", " 1", "1,5", "--1"] {
            assert!(
                matches!(
                    text.parse::<Fixed128>(),
                    Err(ParseFixedError::InvalidCharacter { .. })
                ),
                "{text} should be rejected"
            );
        }
    }

    #[test]
    fn from_ratio_matches_decimal() {
        let (numerator, denominator) = (BigInt::from(5), BigUint::from(7u32));
        let five_sevenths = Fixed256::from_ratio(&numerator, &denominator).unwrap();
        assert!(within_one_ulp(
            five_sevenths,
            "0.714285714285714285714285714285714285714285714285714285714285714285714"
        ));
        assert_eq!(
            Fixed256::from_ratio(&BigInt::from(1), &BigUint::zero()),
            Err(ParseFixedError::ZeroDenominator)
        );
    }

    #[test]
    fn format_exact_values() {
        assert_eq!("1.5".parse::<Fixed128>().unwrap().to_string(), "1.5");
        assert_eq!("-0.5".parse::<Fixed128>().unwrap().to_string(), "-0.5");
        assert_eq!("-2.25".parse::<Fixed256>().unwrap().to_string(), "-2.25");
        assert_eq!(Fixed256::zero().to_string(), "0.0");
        assert_eq!(Fixed128::from_integer(-3).to_string(), "-3.0");
        assert_eq!(
            Fixed128::ulp(1).to_string(),
            "0.000000000000000000000000000012621774483536188886587657044524579674771302961744368076324462890625"
        );
    }

    #[test]
    fn format_then_parse_round_trips() {
        let mut rng = fastrand::Rng::with_seed(13);
        for _ in 0..200 {
            let x = Fixed128::from_limbs([rng.u32(..), rng.u32(..), rng.u32(..), rng.u32(..)]);
            assert_eq!(x.to_string().parse::<Fixed128>().unwrap(), x);
            let y = Fixed256::from_limbs([rng.u64(..), rng.u64(..), rng.u64(..), rng.u64(..)]);
            assert_eq!(y.to_string().parse::<Fixed256>().unwrap(), y);
        }
    }

    #[test]
    fn parse_then_format_is_within_one_ulp() {
        for text in [
            "0.3602404434376143632361252444495453084826078079585857504883758147401953460592",
            "-0.6413130610648031748603750151793020665794949522823052595561775430644485741727",
            "-1.9999999999999999999999999999999999999999",
            "3.14159265358979323846264338327950288419716939937510",
        ] {
            assert!(within_one_ulp(text.parse::<Fixed128>().unwrap(), text), "{text}");
            assert!(within_one_ulp(text.parse::<Fixed256>().unwrap(), text), "{text}");
        }
    }
}
