#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Escape-time fractal renderer
//!
//! The Mandelbrot set and its cousins the Julia sets are drawn by
//! taking a point on the complex plane and repeatedly squaring it and
//! adding a constant, measuring how quickly that number goes to
//! infinity.  This "velocity", the number of iterations it takes to
//! escape a circle of some radius, is the number used to color the
//! image.  Points that never escape are the set itself, and get a
//! color of their own.
//!
//! Counting iterations gives an integer, and coloring by integer gives
//! hard bands.  So alongside the count we keep a smoothed estimate,
//! which uses how far past the escape radius the point landed to put
//! a fractional part on the count.
//!
//! The pipeline is: lay a [`Viewport`] over the complex plane, run the
//! kernel over every pixel in parallel ([`evaluate`]), stretch a
//! palette into a color table ([`build_color_table`]), and look each
//! pixel's count up in the table ([`colorize`]).  Zooming hands back
//! a new viewport, and the whole thing runs again.

extern crate crossbeam;
#[macro_use]
extern crate failure;
extern crate itertools;
#[macro_use]
extern crate log;
extern crate num;
extern crate num_cpus;

macro_rules! t {
    ($condition: expr, $_true: expr, $_false: expr) => {
        if $condition {
            $_true
        } else {
            $_false
        }
    };
}

pub mod colorize;
pub mod colormap;
pub mod config;
pub mod errors;
pub mod evaluate;
mod interpolate;
pub mod kernel;
pub mod planes;

pub use colorize::{colorize, ColorMode, PixelBuffer};
pub use colormap::{build_color_table, palette, ColorTable, Interpolation, Palette, Rgb, PALETTES};
pub use config::{render, RenderOptions, RESOLUTIONS};
pub use errors::{FractalError, Result};
pub use evaluate::{evaluate, evaluate_with_threads, Iterations};
pub use kernel::{zoom, Escape, Fractal, FractalKind};
pub use planes::{pixel_to_complex, ComplexGrid, Pixel, Viewport, ZoomAction};

#[cfg(test)]
mod tests {
    use super::*;
    use num::Complex;

    fn corners(width: usize, height: usize) -> [Pixel; 4] {
        [
            Pixel(0, 0),
            Pixel(width - 1, 0),
            Pixel(0, height - 1),
            Pixel(width - 1, height - 1),
        ]
    }

    #[test]
    fn four_by_four_mandelbrot_corners_are_colored() {
        let viewport =
            Viewport::new(4, 4, Complex::new(-2.5, -2.0), Complex::new(1.5, 2.0)).unwrap();
        let fractal = Fractal::new(FractalKind::Mandelbrot, viewport, 50, 100.0).unwrap();
        let iterations = evaluate(&fractal).unwrap();
        let table = build_color_table(0, Interpolation::Linear, 16).unwrap();
        let buffer = colorize(&iterations, &table, ColorMode::Discrete);

        assert_eq!(buffer.as_bytes().len(), 4 * 4 * 3);
        for corner in corners(4, 4).iter() {
            assert_ne!(buffer.get(corner), Some(Rgb(0, 0, 0)), "{:?}", corner);
        }
        // At this resolution even the central samples sit just outside
        // the set, at -1.17±0.67i and 0.17±0.67i.
        assert!(iterations.m().iter().all(|&m| m < 50));
        assert_eq!(iterations.get(&Pixel(1, 1)).map(|e| e.m), Some(4));
        assert_eq!(iterations.get(&Pixel(2, 2)).map(|e| e.m), Some(11));
    }

    #[test]
    fn five_by_five_mandelbrot_center_is_interior() {
        let fractal = Fractal::mandelbrot(5, 5, 50).unwrap();
        let iterations = evaluate(&fractal).unwrap();
        for method in Interpolation::ALL.iter() {
            let table = build_color_table(0, *method, 16).unwrap();
            let buffer = colorize(&iterations, &table, ColorMode::Discrete);
            for corner in corners(5, 5).iter() {
                assert_ne!(buffer.get(corner), Some(Rgb(0, 0, 0)));
            }
            // -1.5+0i and -0.5+0i
            assert_eq!(buffer.get(&Pixel(1, 2)), Some(Rgb(0, 0, 0)));
            assert_eq!(buffer.get(&Pixel(2, 2)), Some(Rgb(0, 0, 0)));
        }
    }
}
