use bytemuck::{Pod, Zeroable};

use crate::{fixed::FixedPoint, limb::Limb};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Complex<L, const K: usize> {
    pub real: FixedPoint<L, K>,
    pub imaginary: FixedPoint<L, K>,
}

impl<L: Limb, const K: usize> Complex<L, K> {
    pub fn zero() -> Self {
        Complex {
            real: FixedPoint::zero(),
            imaginary: FixedPoint::zero(),
        }
    }
}

/// [`bytemuck`]-compatible colour of a single pixel, so a whole frame can be
/// handed to the image encoder as bytes.
#[repr(C)]
#[derive(Pod, Zeroable, Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Rgb { r: 0, g: 0, b: 0 };
}
