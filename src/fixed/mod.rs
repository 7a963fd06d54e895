/*!
Extended-precision two's-complement fixed-point numbers.

A `FixedPoint<L, K>` is `K` limbs stored most significant first. Limb 0 is the
signed integer part and the remaining `K - 1` limbs are binary fraction digits,
so the whole `K · L::BITS` bit pattern, read as one big two's-complement
integer, is the value scaled by `2^(L::BITS · (K - 1))`.

All arithmetic wraps modulo that bit pattern, the same way the primitive
integer types wrap. Negating the minimum value gives the minimum value back.
*/

mod codec;
mod mul;

use std::ops::{Add, Neg, Not, Sub};

use crate::limb::Limb;

pub use codec::{parse_decimal, ParseFixedError};

/// 32-bit limbs, 96 fractional bits (≈28 decimal digits).
pub type Fixed128 = FixedPoint<u32, 4>;

/// 64-bit limbs, 192 fractional bits (≈58 decimal digits).
pub type Fixed256 = FixedPoint<u64, 4>;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct FixedPoint<L, const K: usize> {
    limbs: [L; K],
}

impl<L: Limb, const K: usize> Default for FixedPoint<L, K> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<L: Limb, const K: usize> FixedPoint<L, K> {
    /// Number of fractional bits.
    pub const FRACTION_BITS: u32 = L::BITS * (K as u32 - 1);

    pub fn from_limbs(limbs: [L; K]) -> Self {
        Self { limbs }
    }

    pub fn limbs(&self) -> &[L; K] {
        &self.limbs
    }

    pub fn zero() -> Self {
        Self {
            limbs: [L::ZERO; K],
        }
    }

    pub fn one() -> Self {
        Self::from_integer(1)
    }

    /// `units` steps of the least significant fraction bit.
    pub fn ulp(units: u64) -> Self {
        let mut limbs = [L::ZERO; K];
        limbs[K - 1] = L::from_u64(units);
        Self { limbs }
    }

    /// `value` is truncated to the width of one limb.
    pub fn from_integer(value: i64) -> Self {
        let mut limbs = [L::ZERO; K];
        limbs[0] = L::from_signed(value);
        Self { limbs }
    }

    /// The signed integer limb. For negative values this is the floor, not
    /// the truncation: `-0.5` has integer part `-1`.
    pub fn integer_part(&self) -> i64 {
        self.limbs[0].to_signed()
    }

    pub fn is_negative(&self) -> bool {
        self.integer_part() < 0
    }

    /**
    Add one unit in the last place.

    The carry moves towards the integer limb only while the limb it lands on
    wraps from all-ones to zero.
    */
    pub fn increment(self) -> Self {
        let mut limbs = self.limbs;
        for limb in limbs.iter_mut().rev() {
            *limb = limb.wrapping_add(L::ONE);
            if *limb != L::ZERO {
                break;
            }
        }
        Self { limbs }
    }

    pub fn negate(self) -> Self {
        (!self).increment()
    }

    /**
    Carry-propagating addition.

    The first pass adds limb by limb and records two things per limb: whether
    the limb sum wrapped (it *generates* a carry) and whether it came out
    all-ones (it *propagates* an incoming carry). The second pass walks from
    the least significant limb towards the integer limb delivering carries.

    A limb that wrapped holds at most `MAX - 1`, so no limb can both generate
    and propagate, and every limb receives at most one carry. For four limbs
    this produces exactly the "first carry vector, then a second vector for
    all-ones recipients" result; for longer numbers it keeps rippling as far
    as needed. The carry out of the integer limb is dropped.
    */
    pub fn wrapping_add(self, rhs: Self) -> Self {
        let mut limbs = [L::ZERO; K];
        let mut generates = [false; K];
        for (index, limb) in limbs.iter_mut().enumerate() {
            *limb = self.limbs[index].wrapping_add(rhs.limbs[index]);
            generates[index] = *limb < self.limbs[index];
        }

        let mut carry = false;
        for index in (0..K).rev() {
            let propagates = limbs[index] == L::MAX;
            if carry {
                limbs[index] = limbs[index].wrapping_add(L::ONE);
            }
            carry = generates[index] || (carry && propagates);
        }

        Self { limbs }
    }

    /// Doubles the value, moving the top bit of each limb into the limb above.
    pub fn shl1(self) -> Self {
        let mut limbs = [L::ZERO; K];
        for index in 0..K {
            let incoming = if index + 1 < K {
                self.limbs[index + 1] >> (L::BITS - 1)
            } else {
                L::ZERO
            };
            limbs[index] = (self.limbs[index] << 1) | incoming;
        }
        Self { limbs }
    }
}

impl<L: Limb, const K: usize> Not for FixedPoint<L, K> {
    type Output = Self;

    fn not(self) -> Self {
        Self {
            limbs: self.limbs.map(|limb| !limb),
        }
    }
}

impl<L: Limb, const K: usize> Neg for FixedPoint<L, K> {
    type Output = Self;

    fn neg(self) -> Self {
        self.negate()
    }
}

impl<L: Limb, const K: usize> Add for FixedPoint<L, K> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.wrapping_add(rhs)
    }
}

impl<L: Limb, const K: usize> Sub for FixedPoint<L, K> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.wrapping_add(rhs.negate())
    }
}

/// Distance between two values in units in the last place, if it fits a `u64`.
#[cfg(test)]
pub(crate) fn ulps_between<L: Limb, const K: usize>(
    a: FixedPoint<L, K>,
    b: FixedPoint<L, K>,
) -> Option<u64> {
    let difference = a - b;
    let magnitude = if difference.is_negative() {
        difference.negate()
    } else {
        difference
    };
    let limbs = magnitude.limbs();
    if limbs[..K - 1].iter().any(|limb| *limb != L::ZERO) {
        return None;
    }
    Some(limbs[K - 1].to_u64())
}
