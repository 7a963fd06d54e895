/*!
Deep zooms into the Mandelbrot set using fixed-point numbers wide enough to
keep resolving the boundary long after `f64` has run out of digits.

[`fixed`] holds the number type and its arithmetic, [`kernel`] the per-sample
escape-time iteration, and [`render`] the frame loop that ties them to the
coordinate table, palette and PNG output.
*/

pub mod colour;
pub mod config;
pub mod coords;
pub mod error;
pub mod fixed;
pub mod frame;
pub mod kernel;
pub mod limb;
pub mod pixel;
pub mod render;
pub mod screen;
pub mod zoom;
