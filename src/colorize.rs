// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turning iteration counts into pixels.

use std::fmt;
use std::str::FromStr;

use colormap::{ColorTable, Rgb};
use errors::FractalError;
use evaluate::Iterations;
use planes::{IntegralPlane, Pixel};

/// The smoothed count is scaled by the width of an RGB channel before
/// it's used as an index, whatever the size of the table.
pub const SMOOTHING_SCALE: f64 = 255.0;

/// Which iteration count picks the color.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ColorMode {
    /// `m mod N`: bands of flat color.
    Discrete,
    /// `floor(ms * 255) mod N`: smooth gradients.
    Smoothed,
}

impl FromStr for ColorMode {
    type Err = FractalError;

    fn from_str(s: &str) -> Result<ColorMode, FractalError> {
        match s.to_lowercase().as_str() {
            "discrete" | "simple" | "0" => Ok(ColorMode::Discrete),
            "smoothed" | "smooth" | "1" => Ok(ColorMode::Smoothed),
            _ => Err(FractalError::UnknownColorMode(s.to_string())),
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            ColorMode::Discrete => "discrete",
            ColorMode::Smoothed => "smoothed",
        })
    }
}

/// A finished image: `width * height` RGB triples, row-major, row 0 at
/// the top, packed three bytes to a pixel.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    integral_plane: IntegralPlane,
    bytes: Vec<u8>,
}

impl PixelBuffer {
    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.integral_plane.0
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.integral_plane.1
    }

    /// The packed RGB bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Hand over the packed RGB bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// The color of one pixel, if it's on the grid.
    pub fn get(&self, pixel: &Pixel) -> Option<Rgb> {
        let IntegralPlane(width, height) = self.integral_plane;
        if pixel.0 >= width || pixel.1 >= height {
            return None;
        }
        let offset = (pixel.1 * width + pixel.0) * 3;
        Some(Rgb(
            self.bytes[offset],
            self.bytes[offset + 1],
            self.bytes[offset + 2],
        ))
    }
}

/// Where in a table of `size` colors a point lands.  The modulus is
/// a floor-mod, so negative smoothed counts still land in the table.
fn table_index(m: u32, ms: f64, mode: ColorMode, size: usize) -> usize {
    match mode {
        ColorMode::Discrete => (m as usize) % size,
        ColorMode::Smoothed => {
            let scaled = (ms * SMOOTHING_SCALE).floor() as i64;
            scaled.rem_euclid(size as i64) as usize
        }
    }
}

/// Paint every pixel.  Points that never escaped get the table's
/// interior color no matter what the mode would have picked.
pub fn colorize(iterations: &Iterations, table: &ColorTable, mode: ColorMode) -> PixelBuffer {
    let sentinel = iterations.max_iter();
    let colors = table.colors();
    let interior = table.interior();

    let mut bytes = Vec::with_capacity(iterations.len() * 3);
    for (&m, &ms) in iterations.m().iter().zip(iterations.ms().iter()) {
        let color = colors[table_index(m, ms, mode, colors.len())];
        let color = t!(m == sentinel, interior, color);
        bytes.extend_from_slice(&color.channels());
    }

    PixelBuffer {
        integral_plane: iterations.integral_plane(),
        bytes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ColorTable {
        ColorTable::new(
            vec![Rgb(10, 0, 0), Rgb(20, 0, 0), Rgb(30, 0, 0), Rgb(40, 0, 0)],
            Rgb(1, 2, 3),
        )
        .unwrap()
    }

    #[test]
    fn discrete_mode_wraps_the_count() {
        assert_eq!(table_index(0, 0.0, ColorMode::Discrete, 4), 0);
        assert_eq!(table_index(6, 0.0, ColorMode::Discrete, 4), 2);
    }

    #[test]
    fn smoothed_mode_scales_by_255_and_floor_mods() {
        // 0.01 * 255 = 2.55 -> 2
        assert_eq!(table_index(0, 0.01, ColorMode::Smoothed, 4), 2);
        // 1.0 * 255 = 255 -> 255 mod 4 = 3
        assert_eq!(table_index(0, 1.0, ColorMode::Smoothed, 4), 3);
        // -0.001 * 255 = -0.255 -> -1 -> 3
        assert_eq!(table_index(0, -0.001, ColorMode::Smoothed, 4), 3);
        assert_eq!(table_index(0, 0.0, ColorMode::Smoothed, 4), 0);
    }

    #[test]
    fn interior_wins_in_every_mode() {
        let iterations =
            Iterations::new(3, 1, 9, vec![9, 9, 1], vec![0.0, 123.456, 1.0 / 255.0]).unwrap();
        for mode in &[ColorMode::Discrete, ColorMode::Smoothed] {
            let buffer = colorize(&iterations, &table(), *mode);
            assert_eq!(buffer.get(&Pixel(0, 0)), Some(Rgb(1, 2, 3)));
            assert_eq!(buffer.get(&Pixel(1, 0)), Some(Rgb(1, 2, 3)));
            assert_eq!(buffer.get(&Pixel(2, 0)), Some(Rgb(20, 0, 0)));
        }
    }

    #[test]
    fn buffer_is_row_major_rgb() {
        let iterations =
            Iterations::new(2, 2, 100, vec![0, 1, 2, 3], vec![0.0; 4]).unwrap();
        let buffer = colorize(&iterations, &table(), ColorMode::Discrete);
        assert_eq!(buffer.width(), 2);
        assert_eq!(buffer.height(), 2);
        assert_eq!(
            buffer.as_bytes(),
            &[10, 0, 0, 20, 0, 0, 30, 0, 0, 40, 0, 0]
        );
        assert_eq!(buffer.get(&Pixel(1, 1)), Some(Rgb(40, 0, 0)));
        assert_eq!(buffer.get(&Pixel(2, 1)), None);
    }

    #[test]
    fn color_mode_parses() {
        assert_eq!("discrete".parse::<ColorMode>(), Ok(ColorMode::Discrete));
        assert_eq!("Smoothed".parse::<ColorMode>(), Ok(ColorMode::Smoothed));
        assert_eq!("1".parse::<ColorMode>(), Ok(ColorMode::Smoothed));
        assert!("banded".parse::<ColorMode>().is_err());
        assert_eq!(ColorMode::Smoothed.to_string(), "smoothed");
    }
}
