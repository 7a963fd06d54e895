/*!
The frame loop.

Phases run strictly in order. The coordinate table is built once; then, for
every frame, the zoom scale is advanced, every sample is iterated, the samples
are averaged down to the output frame, and the frame is written out. Each
parallel phase returns only when all of its tasks are done, so the scale
update is visible to every sample of the frame that follows it.
*/

use std::fs;

use log::{debug, info};

use crate::{
    colour::Palette,
    config::{Precision, RenderConfig},
    coords::{self, CoordinateTable},
    error::Error,
    fixed::FixedPoint,
    frame::FrameBuffer,
    kernel,
    limb::Limb,
    pixel::Complex,
    zoom::{self, ZoomState},
};

pub struct Renderer<L, const K: usize> {
    config: RenderConfig,
    palette: Palette,
    table: CoordinateTable<L, K>,
    center: Complex<L, K>,
    zoom: ZoomState<L, K>,
    samples: FrameBuffer,
    frame: FrameBuffer,
    frames_rendered: u32,
}

impl<L: Limb, const K: usize> Renderer<L, K> {
    /// Parses every decimal constant and precomputes the coordinate table.
    /// Any error here happens before a single frame is rendered.
    pub fn new(config: RenderConfig) -> Result<Self, Error> {
        let center = Complex {
            real: FixedPoint::parse(&config.center_x).map_err(Error::parse("--center-x"))?,
            imaginary: FixedPoint::parse(&config.center_y).map_err(Error::parse("--center-y"))?,
        };
        let zoom = ZoomState::new(&config.zoom).map_err(Error::parse("--zoom"))?;

        let samples_size = config.samples();
        let extent = coords::half_extent(samples_size).map_err(Error::parse("--width"))?;
        let table = CoordinateTable::build(samples_size, extent).map_err(Error::parse("--width"))?;
        debug!(
            "rendering {}x{} samples with {} fractional bits",
            samples_size.width,
            samples_size.height,
            FixedPoint::<L, K>::FRACTION_BITS
        );

        Ok(Renderer {
            palette: Palette::generate(),
            table,
            center,
            zoom,
            samples: FrameBuffer::new(samples_size),
            frame: FrameBuffer::new(config.size),
            frames_rendered: 0,
            config,
        })
    }

    pub fn scale(&self) -> FixedPoint<L, K> {
        self.zoom.scale()
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    /// Renders the next frame into [`frame`](Self::frame) and returns its
    /// 1-based number.
    pub fn render_next(&mut self) -> u32 {
        self.frames_rendered += 1;
        let frame = self.frames_rendered;

        let scale = self.zoom.advance();
        let max_iterations = zoom::iteration_cap(frame, self.config.iterations);

        kernel::render_samples(
            &self.table,
            &self.center,
            scale,
            max_iterations,
            &self.palette,
            self.config.colour_offset,
            self.samples.pixels_mut(),
        );
        self.frame
            .downsample_from(&self.samples, self.config.super_sample);

        info!("frame {frame}: {max_iterations} iterations, scale {scale}");
        frame
    }

    /// Renders and saves `max_frames` frames.
    pub fn run(&mut self) -> Result<(), Error> {
        fs::create_dir_all(&self.config.save_path)?;
        for _ in 0..self.config.max_frames {
            let frame = self.render_next();
            let path = self.frame.save_png(&self.config.save_path, frame)?;
            debug!("saved {}", path.display());
        }
        Ok(())
    }
}

/// Runs the whole render with the limb width chosen in `config`.
pub fn run_with_precision(config: RenderConfig) -> Result<(), Error> {
    debug!("using {:?} precision", config.precision);
    match config.precision {
        Precision::Bits128 => Renderer::<u32, 4>::new(config)?.run(),
        Precision::Bits256 => Renderer::<u64, 4>::new(config)?.run(),
    }
}
