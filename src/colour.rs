//! Colouring of escape counts.

use log::debug;

use crate::pixel::Rgb;

/// Control points of the gradient; the first and last two points repeat the
/// neighbouring colours so that the curve wraps smoothly.
const CONTROL_X: [f64; 8] = [-0.1425, 0.0, 0.16, 0.42, 0.6425, 0.8575, 1.0, 1.16];
const CONTROL_R: [f64; 8] = [0.0, 0.0, 32.0, 237.0, 255.0, 0.0, 0.0, 32.0];
const CONTROL_G: [f64; 8] = [2.0, 7.0, 107.0, 255.0, 170.0, 2.0, 7.0, 107.0];
const CONTROL_B: [f64; 8] = [0.0, 100.0, 203.0, 255.0, 0.0, 0.0, 100.0, 203.0];

/// Number of evenly spaced samples taken over the whole control range. Only
/// those with `0 < x <= 1` are kept.
const SAMPLES: usize = 1000;

/// Cyclic colour table indexed by iteration count.
pub struct Palette {
    colours: Vec<Rgb>,
}

impl Palette {
    pub fn generate() -> Self {
        let red = Pchip::new(&CONTROL_X, &CONTROL_R);
        let green = Pchip::new(&CONTROL_X, &CONTROL_G);
        let blue = Pchip::new(&CONTROL_X, &CONTROL_B);

        let start = CONTROL_X[0];
        let step = (CONTROL_X[CONTROL_X.len() - 1] - start) / (SAMPLES - 1) as f64;
        let colours: Vec<Rgb> = (0..SAMPLES)
            .map(|index| start + index as f64 * step)
            .skip_while(|x| *x <= 0.0)
            .take_while(|x| *x <= 1.0)
            .map(|x| Rgb {
                r: red.evaluate(x) as u8,
                g: green.evaluate(x) as u8,
                b: blue.evaluate(x) as u8,
            })
            .collect();

        debug!("generated palette with {} colours", colours.len());
        Palette { colours }
    }

    pub fn len(&self) -> usize {
        self.colours.len()
    }

    /// Pixels that never escaped are black; the rest cycle through the table,
    /// rotated by `offset`.
    pub fn colour(&self, iterations: u32, max_iterations: u32, offset: u32) -> Rgb {
        if iterations >= max_iterations {
            Rgb::BLACK
        } else {
            self.colours[(iterations as usize + offset as usize) % self.colours.len()]
        }
    }
}

/**
Monotone piecewise cubic Hermite interpolation
([PCHIP](https://en.wikipedia.org/wiki/Monotone_cubic_interpolation)).

Interior slopes are the Fritsch–Carlson weighted harmonic mean of the
neighbouring secants, or zero at a local extremum. End slopes use the
one-sided three-point estimate, clamped so the curve can't overshoot.
*/
struct Pchip<'a> {
    x: &'a [f64],
    y: &'a [f64],
    slopes: Vec<f64>,
}

impl<'a> Pchip<'a> {
    fn new(x: &'a [f64], y: &'a [f64]) -> Self {
        debug_assert!(x.len() == y.len() && x.len() >= 3);

        let n = x.len();
        let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
        let m: Vec<f64> = (0..n - 1).map(|k| (y[k + 1] - y[k]) / h[k]).collect();

        let mut slopes = vec![0.0; n];
        for k in 1..n - 1 {
            let (m0, m1) = (m[k - 1], m[k]);
            if m0 == 0.0 || m1 == 0.0 || m0.signum() != m1.signum() {
                continue;
            }
            let w1 = 2.0 * h[k] + h[k - 1];
            let w2 = h[k] + 2.0 * h[k - 1];
            slopes[k] = (w1 + w2) / (w1 / m0 + w2 / m1);
        }
        slopes[0] = end_slope(h[0], h[1], m[0], m[1]);
        slopes[n - 1] = end_slope(h[n - 2], h[n - 3], m[n - 2], m[n - 3]);

        Pchip { x, y, slopes }
    }

    fn evaluate(&self, t: f64) -> f64 {
        let k = self
            .x
            .windows(2)
            .position(|w| t <= w[1])
            .unwrap_or(self.x.len() - 2);
        let h = self.x[k + 1] - self.x[k];
        let s = (t - self.x[k]) / h;
        let (s2, s3) = (s * s, s * s * s);

        (2.0 * s3 - 3.0 * s2 + 1.0) * self.y[k]
            + (s3 - 2.0 * s2 + s) * h * self.slopes[k]
            + (-2.0 * s3 + 3.0 * s2) * self.y[k + 1]
            + (s3 - s2) * h * self.slopes[k + 1]
    }
}

fn end_slope(h0: f64, h1: f64, m0: f64, m1: f64) -> f64 {
    let d = ((2.0 * h0 + h1) * m0 - h0 * m1) / (h0 + h1);
    if sign(d) != sign(m0) {
        0.0
    } else if sign(m0) != sign(m1) && d.abs() > 3.0 * m0.abs() {
        3.0 * m0
    } else {
        d
    }
}

/// Like `f64::signum`, but zero has its own sign.
fn sign(value: f64) -> i8 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}
