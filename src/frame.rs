//! Pixel grids: the super-sampled render target and the frame that is saved.

use std::path::{Path, PathBuf};

use image::{ImageError, RgbImage};
use log::trace;
use rayon::prelude::{IndexedParallelIterator, ParallelIterator, ParallelSliceMut};

use crate::{error::Error, pixel::Rgb, screen};

/// Row-major RGB grid, fully overwritten every frame.
pub struct FrameBuffer {
    size: screen::Size,
    pixels: Vec<Rgb>,
}

impl FrameBuffer {
    pub fn new(size: screen::Size) -> Self {
        FrameBuffer {
            size,
            pixels: vec![Rgb::BLACK; size.area()],
        }
    }

    pub fn size(&self) -> screen::Size {
        self.size
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Rgb] {
        &mut self.pixels
    }

    /// Box-average every `factor × factor` block of `samples` into one pixel.
    /// Channel means are truncated.
    pub fn downsample_from(&mut self, samples: &FrameBuffer, factor: u32) {
        trace!("begin downsample_from");
        debug_assert_eq!(samples.size, self.size.super_sampled(factor));

        let width = self.size.width as usize;
        let sample_width = samples.size.width as usize;
        let factor = factor as usize;
        let block = (factor * factor) as u32;

        self.pixels
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, pixel) in row.iter_mut().enumerate() {
                    let (mut r, mut g, mut b) = (0u32, 0u32, 0u32);
                    for sample_row in samples.pixels[y * factor * sample_width..]
                        .chunks(sample_width)
                        .take(factor)
                    {
                        for sample in &sample_row[x * factor..(x + 1) * factor] {
                            r += sample.r as u32;
                            g += sample.g as u32;
                            b += sample.b as u32;
                        }
                    }
                    *pixel = Rgb {
                        r: (r / block) as u8,
                        g: (g / block) as u8,
                        b: (b / block) as u8,
                    };
                }
            });

        trace!("end downsample_from");
    }

    /// Writes `frame_{NNNNN}.png` into `directory` and returns its path.
    pub fn save_png(&self, directory: &Path, frame: u32) -> Result<PathBuf, Error> {
        let path = frame_path(directory, frame);
        let image = RgbImage::from_raw(
            self.size.width,
            self.size.height,
            bytemuck::cast_slice::<Rgb, u8>(&self.pixels).to_vec(),
        )
        .ok_or_else(|| {
            ImageError::from(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "frame buffer does not match its size",
            ))
        })?;
        image.save(&path)?;
        Ok(path)
    }
}

/// Frame numbers are 1-based and zero-padded to five digits.
pub fn frame_path(directory: &Path, frame: u32) -> PathBuf {
    directory.join(format!("frame_{frame:05}.png"))
}
