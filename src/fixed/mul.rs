use std::ops::Mul;

use super::FixedPoint;
use crate::limb::{wide_mul, Limb};

/// Added to every product magnitude to offset the truncation of the digits
/// that fall below the last limb.
const ROUNDING_ULPS: u64 = 3;

impl<L: Limb, const K: usize> FixedPoint<L, K> {
    /// Magnitude and whether the value was negative.
    fn magnitude(self) -> (Self, bool) {
        if self.is_negative() {
            (self.negate(), true)
        } else {
            (self, false)
        }
    }

    /**
    Partial product of two digits at limb positions `i` and `j`, where
    `position = i + j`.

    The full product has weight `2^(-BITS·position)`, so its low half lands on
    limb `position` and its high half on limb `position - 1`. Halves that fall
    outside the number are dropped: the high half of the integer product
    overflows, and anything past the last limb is below the precision.
    */
    fn partial_product(a: L, b: L, position: usize) -> Self {
        let mut limbs = [L::ZERO; K];
        let (hi, lo) = wide_mul(a, b);
        if position < K {
            limbs[position] = lo;
        }
        if (1..=K).contains(&position) {
            limbs[position - 1] = hi;
        }
        Self { limbs }
    }

    /**
    Product of two magnitudes, without rounding.

    Digit products are grouped by the limb position they land on and each
    group is summed with the carry-propagating adder before it joins the
    total. Pairs with `i + j > K` cannot reach the last limb and are skipped.
    */
    fn magnitude_product(self, rhs: Self) -> Self {
        let mut total = Self::zero();
        for position in 0..=K {
            let mut group = Self::zero();
            for i in 0..K.min(position + 1) {
                let j = position - i;
                if j >= K {
                    continue;
                }
                group = group + Self::partial_product(self.limbs[i], rhs.limbs[j], position);
            }
            total = total + group;
        }
        total
    }

    pub fn wrapping_mul(self, rhs: Self) -> Self {
        let (u, u_negative) = self.magnitude();
        let (v, v_negative) = rhs.magnitude();
        let product = u.magnitude_product(v) + Self::ulp(ROUNDING_ULPS);
        if u_negative != v_negative {
            product.negate()
        } else {
            product
        }
    }

    /**
    `self * self`, computing each off-diagonal digit pair once.

    The off-diagonal sum is doubled with [`shl1`](Self::shl1). Since the
    adder is exact modulo the bit pattern, the result is bit-for-bit the
    same as [`wrapping_mul`](Self::wrapping_mul) with equal operands.
    */
    pub fn square(self) -> Self {
        let (u, _) = self.magnitude();
        let mut diagonal = Self::zero();
        let mut cross = Self::zero();
        for position in 0..=K {
            for i in 0..K.min(position / 2 + 1) {
                let j = position - i;
                if j >= K {
                    continue;
                }
                let term = Self::partial_product(u.limbs[i], u.limbs[j], position);
                if i == j {
                    diagonal = diagonal + term;
                } else {
                    cross = cross + term;
                }
            }
        }
        diagonal + cross.shl1() + Self::ulp(ROUNDING_ULPS)
    }
}

impl<L: Limb, const K: usize> Mul for FixedPoint<L, K> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.wrapping_mul(rhs)
    }
}
