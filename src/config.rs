use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::{error::Error, screen};

/// A deep zoom into the Mandelbrot set, rendered in extended-precision
/// fixed-point arithmetic, one PNG per frame.
#[derive(Parser, Debug)]
#[command(name = "deepzoom", version)]
pub struct Cli {
    /// Width of the saved frames in pixels
    #[arg(long, default_value_t = 300)]
    pub width: u32,

    /// Height of the saved frames in pixels
    #[arg(long, default_value_t = 200)]
    pub height: u32,

    /// Samples per pixel along each axis (slower, but smoother edges)
    #[arg(long, default_value_t = 4)]
    pub super_sample: u32,

    /// Real part of the zoom centre, as plain decimal text
    #[arg(
        long,
        allow_hyphen_values = true,
        default_value = "0.3602404434376143632361252444495453084826078079585857504883758147401953460592181003117529367227734263962337"
    )]
    pub center_x: String,

    /// Imaginary part of the zoom centre, as plain decimal text
    #[arg(
        long,
        allow_hyphen_values = true,
        default_value = "-0.641313061064803174860375015179302066579494952282305259556177543064448574172753690255637023068968116237074"
    )]
    pub center_y: String,

    /// Magnification between consecutive frames (greater than 1)
    #[arg(long, default_value_t = 1.4)]
    pub zoom: f64,

    /// Directory the frames are written to, created if missing
    #[arg(long, default_value = "result")]
    pub save_path: PathBuf,

    /// Number of frames to render
    #[arg(long, default_value_t = 500)]
    pub max_frames: u32,

    /// Iteration cap of the first hundred frames; it grows by this much every
    /// hundred frames
    #[arg(long, default_value_t = 4000)]
    pub iterations: u32,

    /// Rotates the palette by this many entries
    #[arg(long, default_value_t = 0)]
    pub colour_offset: u32,

    /// Width of the fixed-point numbers
    #[arg(long, value_enum, default_value_t = Precision::Bits256)]
    pub precision: Precision,

    /// Worker threads (0 uses one per logical CPU)
    #[arg(long, default_value_t = 0)]
    pub threads: usize,
}

#[derive(ValueEnum, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Precision {
    /// 4 × 32-bit limbs, about 28 decimal digits
    #[value(name = "128")]
    Bits128,
    /// 4 × 64-bit limbs, about 58 decimal digits
    #[value(name = "256")]
    Bits256,
}

/// Validated settings for one render run.
#[derive(Clone, Debug)]
pub struct RenderConfig {
    pub size: screen::Size,
    pub super_sample: u32,
    pub center_x: String,
    pub center_y: String,
    /// Decimal text of the per-frame magnification.
    pub zoom: String,
    pub save_path: PathBuf,
    pub max_frames: u32,
    pub iterations: u32,
    pub colour_offset: u32,
    pub precision: Precision,
    pub threads: usize,
}

impl RenderConfig {
    pub fn samples(&self) -> screen::Size {
        self.size.super_sampled(self.super_sample)
    }
}

impl TryFrom<Cli> for RenderConfig {
    type Error = Error;

    fn try_from(cli: Cli) -> Result<Self, Error> {
        if cli.width == 0 || cli.height == 0 {
            return Err(Error::Config(format!(
                "frame size {}x{} is empty",
                cli.width, cli.height
            )));
        }
        if cli.super_sample == 0 {
            return Err(Error::Config("--super-sample must be at least 1".into()));
        }
        cli.width
            .checked_mul(cli.super_sample)
            .zip(cli.height.checked_mul(cli.super_sample))
            .filter(|(width, height)| (*width as u64 * *height as u64) <= i32::MAX as u64)
            .ok_or_else(|| Error::Config("super-sampled frame is too large".into()))?;
        if !(cli.zoom.is_finite() && cli.zoom > 1.0) {
            return Err(Error::Config(format!(
                "--zoom must be greater than 1, got {}",
                cli.zoom
            )));
        }

        let threads = if cli.threads == 0 {
            num_cpus::get()
        } else {
            cli.threads
        };

        Ok(RenderConfig {
            size: screen::Size {
                width: cli.width,
                height: cli.height,
            },
            super_sample: cli.super_sample,
            center_x: cli.center_x,
            center_y: cli.center_y,
            // `Display` for `f64` never uses an exponent.
            zoom: cli.zoom.to_string(),
            save_path: cli.save_path,
            max_frames: cli.max_frames,
            iterations: cli.iterations,
            colour_offset: cli.colour_offset,
            precision: cli.precision,
            threads,
        })
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    fn config(args: &[&str]) -> Result<RenderConfig, Error> {
        let cli = Cli::try_parse_from(std::iter::once("deepzoom").chain(args.iter().copied()))
            .expect("arguments parse");
        RenderConfig::try_from(cli)
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(
            config.size,
            screen::Size {
                width: 300,
                height: 200
            }
        );
        assert_eq!(
            config.samples(),
            screen::Size {
                width: 1200,
                height: 800
            }
        );
        assert_eq!(config.zoom, "1.4");
        assert_eq!(config.precision, Precision::Bits256);
        assert_eq!(config.save_path, PathBuf::from("result"));
        assert_eq!(config.max_frames, 500);
        assert!(config.center_y.starts_with("-0.6413130610648031748"));
        assert!(config.threads >= 1);
    }

    #[test]
    fn negative_center_and_precision() {
        let config = config(&[
            "--center-x",
            "-1.5",
            "--center-y",
            "-0.25",
            "--precision",
            "128",
            "--threads",
            "3",
        ])
        .unwrap();
        assert_eq!(config.center_x, "-1.5");
        assert_eq!(config.center_y, "-0.25");
        assert_eq!(config.precision, Precision::Bits128);
        assert_eq!(config.threads, 3);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(config(&["--zoom", "1"]), Err(Error::Config(_))));
        assert!(matches!(config(&["--zoom", "0.5"]), Err(Error::Config(_))));
        assert!(matches!(config(&["--width", "0"]), Err(Error::Config(_))));
        assert!(matches!(config(&["--super-sample", "0"]), Err(Error::Config(_))));
        assert!(matches!(
            config(&["--width", "100000", "--height", "100000"]),
            Err(Error::Config(_))
        ));
    }
}
