/*!
Machine words used as the digits of a [`FixedPoint`](crate::fixed::FixedPoint).

A limb is always stored unsigned. Only the most significant limb of a number
is ever read as signed, and [`Limb::to_signed`] does that reinterpretation.

The wide multiply below deliberately avoids a native double-width type so that
the same code serves `u64` limbs, where no wider primitive is assumed.
*/

use std::{
    fmt::Debug,
    hash::Hash,
    ops::{BitAnd, BitOr, Not, Shl, Shr},
};

pub trait Limb:
    Copy
    + Eq
    + Ord
    + Hash
    + Default
    + Debug
    + Send
    + Sync
    + Not<Output = Self>
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + Shl<u32, Output = Self>
    + Shr<u32, Output = Self>
    + 'static
{
    const BITS: u32;
    const ZERO: Self;
    const ONE: Self;
    /// All bits set.
    const MAX: Self;
    const SIGNED_MIN: i64;
    const SIGNED_MAX: i64;

    fn wrapping_add(self, rhs: Self) -> Self;

    fn wrapping_mul(self, rhs: Self) -> Self;

    /// Truncates to the low `BITS` bits.
    fn from_u64(value: u64) -> Self;

    fn to_u64(self) -> u64;

    /// Two's-complement truncation of `value` to `BITS` bits.
    fn from_signed(value: i64) -> Self;

    /// Reads the limb as a two's-complement signed integer.
    fn to_signed(self) -> i64;
}

macro_rules! impl_limb {
    ($unsigned:ty, $signed:ty) => {
        impl Limb for $unsigned {
            const BITS: u32 = <$unsigned>::BITS;
            const ZERO: Self = 0;
            const ONE: Self = 1;
            const MAX: Self = <$unsigned>::MAX;
            const SIGNED_MIN: i64 = <$signed>::MIN as i64;
            const SIGNED_MAX: i64 = <$signed>::MAX as i64;

            #[inline]
            fn wrapping_add(self, rhs: Self) -> Self {
                <$unsigned>::wrapping_add(self, rhs)
            }

            #[inline]
            fn wrapping_mul(self, rhs: Self) -> Self {
                <$unsigned>::wrapping_mul(self, rhs)
            }

            #[inline]
            fn from_u64(value: u64) -> Self {
                value as $unsigned
            }

            #[inline]
            fn to_u64(self) -> u64 {
                self as u64
            }

            #[inline]
            fn from_signed(value: i64) -> Self {
                value as $signed as $unsigned
            }

            #[inline]
            fn to_signed(self) -> i64 {
                self as $signed as i64
            }
        }
    };
}

impl_limb!(u32, i32);
impl_limb!(u64, i64);

/**
Full product of two limbs as a `(high, low)` pair.

Each operand is split into half-words `a = a1·2^h + a0`, `b = b1·2^h + b0`
(with `h = BITS / 2`). None of the four half-word products can overflow a
limb, and the middle terms are folded in one at a time so that every
intermediate sum also fits:

```text
t  = a0·b0                  -> w0 = low half of t, k = high half of t
t  = a1·b0 + k              -> k = low half of t,  w1 = high half of t
t  = a0·b1 + k              -> k = high half of t
hi = a1·b1 + w1 + k
lo = (t << h) + w0
```
*/
#[inline]
pub fn wide_mul<L: Limb>(a: L, b: L) -> (L, L) {
    let half = L::BITS / 2;
    let mask = L::MAX >> half;

    let a0 = a & mask;
    let b0 = b & mask;
    let a1 = a >> half;
    let b1 = b >> half;

    let t = a0.wrapping_mul(b0);
    let w0 = t & mask;
    let k = t >> half;

    let t = a1.wrapping_mul(b0).wrapping_add(k);
    let k = t & mask;
    let w1 = t >> half;

    let t = a0.wrapping_mul(b1).wrapping_add(k);
    let k = t >> half;

    let hi = a1.wrapping_mul(b1).wrapping_add(w1).wrapping_add(k);
    let lo = (t << half).wrapping_add(w0);
    (hi, lo)
}
