/*!
The escape-time iteration, run once per sample.

`render_samples` is a parallel map over the sample grid. Each task reads the
shared coordinate table, palette, centre and scale, and writes only its own
output cell, so no synchronisation is needed inside a frame. The call returns
once every task has finished.
*/

use log::trace;
use rayon::prelude::{IndexedParallelIterator, IntoParallelRefMutIterator, ParallelIterator};

use crate::{
    colour::Palette,
    coords::CoordinateTable,
    fixed::FixedPoint,
    limb::Limb,
    pixel::{Complex, Rgb},
};

/// Bailout radius squared. Only the integer limb of `|z|²` is compared.
const ESCAPE_THRESHOLD: i64 = 4;

/// The point of the plane a sample looks at for the current frame.
pub fn sample_point<L: Limb, const K: usize>(
    offset: &Complex<L, K>,
    center: &Complex<L, K>,
    scale: FixedPoint<L, K>,
) -> Complex<L, K> {
    Complex {
        real: offset.real * scale + center.real,
        imaginary: offset.imaginary * scale + center.imaginary,
    }
}

/**
Number of iterations of `z ← z² + c`, starting from `z = 0`, until
`|z|² >= 4` or `max_iterations` is reached.

The divergence test looks only at the integer limb of `re² + im²`; the
fractional limbs are ignored.
*/
pub fn escape_time<L: Limb, const K: usize>(c: &Complex<L, K>, max_iterations: u32) -> u32 {
    let mut z: Complex<L, K> = Complex::zero();
    let mut real_squared: FixedPoint<L, K> = FixedPoint::zero();
    let mut imaginary_squared: FixedPoint<L, K> = FixedPoint::zero();
    let mut iterations = 0;

    while (real_squared + imaginary_squared).integer_part() < ESCAPE_THRESHOLD
        && iterations < max_iterations
    {
        let product = z.real * z.imaginary;
        z.imaginary = product + product + c.imaginary;
        z.real = real_squared - imaginary_squared + c.real;
        real_squared = z.real.square();
        imaginary_squared = z.imaginary.square();
        iterations += 1;
    }

    iterations
}

/// Colours every sample of `table` for the frame at `scale`.
pub fn render_samples<L: Limb, const K: usize>(
    table: &CoordinateTable<L, K>,
    center: &Complex<L, K>,
    scale: FixedPoint<L, K>,
    max_iterations: u32,
    palette: &Palette,
    colour_offset: u32,
    samples: &mut [Rgb],
) {
    trace!("begin render_samples");
    debug_assert_eq!(samples.len(), table.offsets().len());

    let offsets = table.offsets();
    samples
        .par_iter_mut()
        .enumerate()
        .for_each(|(index, sample)| {
            let c = sample_point(&offsets[index], center, scale);
            let iterations = escape_time(&c, max_iterations);
            *sample = palette.colour(iterations, max_iterations, colour_offset);
        });

    trace!("end render_samples");
}
