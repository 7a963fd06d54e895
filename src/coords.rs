/*!
Per-sample offsets from the zoom centre, computed once before the first frame.

Each frame maps an offset to a point of the complex plane with
`offset × scale + centre`, so the table itself never changes while rendering
and is shared read-only by every worker.
*/

use log::{debug, trace};
use num_bigint::{BigInt, BigUint};
use rayon::prelude::{IntoParallelIterator, ParallelIterator};

use crate::{
    fixed::{FixedPoint, ParseFixedError},
    limb::Limb,
    pixel::Complex,
    screen,
};

pub struct CoordinateTable<L, const K: usize> {
    size: screen::Size,
    offsets: Vec<Complex<L, K>>,
}

impl<L: Limb, const K: usize> CoordinateTable<L, K> {
    /**
    Offsets for every sample of a `size` grid spanning `±half_extent`.

    Row 0 is the top of the image, so imaginary offsets decrease with the row
    index.
    */
    pub fn build(
        size: screen::Size,
        half_extent: Complex<L, K>,
    ) -> Result<Self, ParseFixedError> {
        trace!("begin CoordinateTable::build");

        let reals = axis_offsets(size.width, half_extent.real)?;
        let imaginaries = axis_offsets(size.height, half_extent.imaginary)?;

        let width = size.width as usize;
        let height = size.height as usize;
        let offsets = (0..size.area())
            .into_par_iter()
            .map(|index| Complex {
                real: reals[index % width],
                imaginary: imaginaries[height - 1 - index / width],
            })
            .collect();

        debug!("built {}x{} coordinate table", size.width, size.height);
        trace!("end CoordinateTable::build");
        Ok(CoordinateTable { size, offsets })
    }

    pub fn size(&self) -> screen::Size {
        self.size
    }

    /// Row-major, one entry per sample.
    pub fn offsets(&self) -> &[Complex<L, K>] {
        &self.offsets
    }
}

/// `(2·index/dimension − 1) × half` for every index along one axis.
fn axis_offsets<L: Limb, const K: usize>(
    dimension: u32,
    half: FixedPoint<L, K>,
) -> Result<Vec<FixedPoint<L, K>>, ParseFixedError> {
    let step = FixedPoint::from_ratio(&BigInt::from(1), &BigUint::from(dimension))?;
    let one = FixedPoint::one();
    Ok((0..dimension)
        .into_par_iter()
        .map(|index| half * (step * FixedPoint::from_integer(2 * index as i64) - one))
        .collect())
}

/// Half extents of the initial view: the real axis spans `[-2, 2]` and the
/// imaginary axis keeps the aspect ratio of `size`.
pub fn half_extent<L: Limb, const K: usize>(
    size: screen::Size,
) -> Result<Complex<L, K>, ParseFixedError> {
    Ok(Complex {
        real: FixedPoint::from_integer(2),
        imaginary: FixedPoint::from_ratio(
            &BigInt::from(2 * size.height as u64),
            &BigUint::from(size.width),
        )?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::{ulps_between, Fixed256};

    fn close(a: Fixed256, b: Fixed256) -> bool {
        ulps_between(a, b).map_or(false, |ulps| ulps < 16)
    }

    #[test]
    fn axis_offsets_span_the_half_extent() {
        let offsets = axis_offsets(4, Fixed256::from_integer(2)).unwrap();
        let expected = ["-2", "-1", "0", "1"].map(|text| text.parse::<Fixed256>().unwrap());
        for (offset, expected) in offsets.iter().zip(expected.iter()) {
            assert!(close(*offset, *expected), "{offset} != {expected}");
        }
    }

    #[test]
    fn half_extent_keeps_aspect_ratio() {
        let extent = half_extent::<u64, 4>(screen::Size {
            width: 300,
            height: 200,
        })
        .unwrap();
        assert_eq!(extent.real, Fixed256::from_integer(2));
        let expected: Fixed256 = format!("1.{}", "3".repeat(70)).parse().unwrap();
        assert!(close(extent.imaginary, expected));
    }

    #[test]
    fn table_is_row_major_with_the_top_row_first() {
        let size = screen::Size {
            width: 4,
            height: 2,
        };
        let extent = Complex {
            real: Fixed256::from_integer(2),
            imaginary: Fixed256::one(),
        };
        let table = CoordinateTable::build(size, extent).unwrap();
        assert_eq!(table.size(), size);
        assert_eq!(table.offsets().len(), 8);

        let top_left = table.offsets()[0];
        assert!(close(top_left.real, Fixed256::from_integer(-2)));
        assert!(close(top_left.imaginary, Fixed256::zero()));

        let bottom_right = table.offsets()[7];
        assert!(close(bottom_right.real, Fixed256::one()));
        assert!(close(bottom_right.imaginary, Fixed256::from_integer(-1)));

        for row in table.offsets().chunks(4) {
            assert!(row.iter().all(|offset| offset.imaginary == row[0].imaginary));
        }
    }
}
