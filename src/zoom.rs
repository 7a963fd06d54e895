use num_bigint::BigInt;

use crate::{
    fixed::{parse_decimal, FixedPoint, ParseFixedError},
    limb::Limb,
};

/// Frames rendered between increases of the iteration cap.
const FRAMES_PER_ITERATION_STEP: u32 = 100;

/**
The zoom scale shared by every pixel of a frame.

There is exactly one writer: the frame loop calls [`advance`](Self::advance)
before it starts the frame's kernel, and the kernel only reads the returned
value. The scale shrinks geometrically and is never reset.
*/
pub struct ZoomState<L, const K: usize> {
    scale: FixedPoint<L, K>,
    ratio: FixedPoint<L, K>,
}

impl<L: Limb, const K: usize> ZoomState<L, K> {
    /// Starts at scale 1 and shrinks by `1 / zoom` per frame, where `zoom` is
    /// plain decimal text (`"1.4"`).
    pub fn new(zoom: &str) -> Result<Self, ParseFixedError> {
        let (numerator, denominator) = parse_decimal(zoom)?;
        let ratio = FixedPoint::from_ratio(&BigInt::from(denominator), numerator.magnitude())?;
        Ok(Self::with_ratio(ratio))
    }

    pub fn with_ratio(ratio: FixedPoint<L, K>) -> Self {
        ZoomState {
            scale: FixedPoint::one(),
            ratio,
        }
    }

    pub fn scale(&self) -> FixedPoint<L, K> {
        self.scale
    }

    pub fn ratio(&self) -> FixedPoint<L, K> {
        self.ratio
    }

    pub fn advance(&mut self) -> FixedPoint<L, K> {
        self.scale = self.scale * self.ratio;
        self.scale
    }
}

/// Iteration cap for the 1-based `frame`: deeper frames need more iterations
/// to resolve the boundary, so the cap grows by `base` every hundred frames.
pub fn iteration_cap(frame: u32, base: u32) -> u32 {
    (frame / FRAMES_PER_ITERATION_STEP + 1).saturating_mul(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::{ulps_between, Fixed128, Fixed256};

    #[test]
    fn ratio_is_the_exact_reciprocal() {
        let zoom = ZoomState::<u64, 4>::new("1.4").unwrap();
        let expected: Fixed256 = format!("0.{}", "714285".repeat(12)).parse().unwrap();
        assert!(ulps_between(zoom.ratio(), expected).unwrap() <= 1);
        assert_eq!(zoom.scale(), Fixed256::one());
    }

    #[test]
    fn one_frame_shrinks_the_scale_by_the_ratio() {
        let mut zoom = ZoomState::<u64, 4>::new("1.4").unwrap();
        let scale = zoom.advance();
        let expected: Fixed256 = "0.714285714285714285714285714285714285714285714285714285714285714286"
            .parse()
            .unwrap();
        assert!(ulps_between(scale, expected).unwrap() <= 4);
        assert_eq!(zoom.scale(), scale);
    }

    #[test]
    fn scale_shrinks_every_frame() {
        let mut zoom = ZoomState::<u32, 4>::new("2").unwrap();
        let mut previous = zoom.scale();
        for _ in 0..20 {
            let scale = zoom.advance();
            assert!(scale.limbs() < previous.limbs());
            previous = scale;
        }
        // 2^-20 plus the accumulated rounding.
        assert!(ulps_between(previous, Fixed128::from_limbs([0, 1 << 12, 0, 0])).unwrap() < 64);
    }

    #[test]
    fn rejects_malformed_zoom() {
        assert!(ZoomState::<u64, 4>::new("1.4x").is_err());
        assert!(ZoomState::<u64, 4>::new("0").is_err());
    }

    #[test]
    fn iteration_cap_steps_every_hundred_frames() {
        assert_eq!(iteration_cap(1, 4000), 4000);
        assert_eq!(iteration_cap(99, 4000), 4000);
        assert_eq!(iteration_cap(100, 4000), 8000);
        assert_eq!(iteration_cap(250, 4000), 12000);
        assert_eq!(iteration_cap(u32::MAX, u32::MAX), u32::MAX);
    }
}
