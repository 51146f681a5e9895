// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the Viewport struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0
//! (the pixels) and a rectangle on the complex plane with an
//! arbitrary pair of corners defining the leftlower and rightupper
//! corners of the region we're looking at.
//!
//! The integral plane follows the raster convention: row 0 is the
//! *top* of the image.  The complex plane follows the mathematical
//! one: the imaginary axis grows upward.  So the grid is flipped
//! vertically, and row 0 holds the samples taken at `y_max`.  That's
//! a convention, not physics, and the tests below pin it down.

use itertools::iproduct;
use num::Complex;

use errors::{FractalError, Result};

/// Describes the width and height of an integral plane that is
/// assumed to start at 0,0.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct IntegralPlane(pub usize, pub usize);

/// Describes the x, y of a pixel in the integral plane; x is the
/// column, y is the row counted from the top.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Pixel(pub usize, pub usize);

/// The three things a click can do to the view: zoom in on the
/// clicked point, recenter on it, or back away from it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ZoomAction {
    /// Zoom in by a factor of three.
    In,
    /// Recenter without changing the scale.
    Recenter,
    /// Zoom out by (roughly) a factor of three.
    Out,
}

impl ZoomAction {
    /// The scale factor handed to [`Viewport::zoom`] for this action.
    pub fn factor(self) -> f64 {
        match self {
            ZoomAction::In => 3.0,
            ZoomAction::Recenter => 1.0,
            ZoomAction::Out => 0.33,
        }
    }
}

/// The rectangular region of the complex plane currently mapped onto
/// the pixel grid.  Once built, a Viewport is never changed; zooming
/// hands you a new one.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    integral_plane: IntegralPlane,
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

/// The nth of `count` evenly spaced samples between `min` and `max`
/// inclusive.  The last sample is exactly `max`, and a single sample
/// sits on `min`.
fn axis_sample(min: f64, max: f64, count: usize, index: usize) -> f64 {
    if count == 1 {
        return min;
    }
    if index == count - 1 {
        return max;
    }
    let step = (max - min) / ((count - 1) as f64);
    min + (index as f64) * step
}

impl Viewport {
    /// Constructor.  Takes the width and height of the pixel grid and
    /// the two corners of the complex region to lay over it.  Refuses
    /// empty grids and regions whose corners are the wrong way round
    /// or coincide.
    pub fn new(
        width: usize,
        height: usize,
        leftlower: Complex<f64>,
        rightupper: Complex<f64>,
    ) -> Result<Viewport> {
        if width < 1 || height < 1 {
            return Err(FractalError::EmptyResolution { width, height });
        }

        // Written as negations so that NaN bounds fail too.
        if !(rightupper.re > leftlower.re) {
            return Err(FractalError::InvertedBounds {
                axis: "x",
                min: leftlower.re,
                max: rightupper.re,
            });
        }

        if !(rightupper.im > leftlower.im) {
            return Err(FractalError::InvertedBounds {
                axis: "y",
                min: leftlower.im,
                max: rightupper.im,
            });
        }

        Ok(Viewport {
            integral_plane: IntegralPlane(width, height),
            x_min: leftlower.re,
            x_max: rightupper.re,
            y_min: leftlower.im,
            y_max: rightupper.im,
        })
    }

    /// The size of the pixel grid.
    pub fn integral_plane(&self) -> IntegralPlane {
        self.integral_plane
    }

    /// Width of the pixel grid.
    pub fn width(&self) -> usize {
        self.integral_plane.0
    }

    /// Height of the pixel grid.
    pub fn height(&self) -> usize {
        self.integral_plane.1
    }

    /// Left edge of the complex region.
    pub fn x_min(&self) -> f64 {
        self.x_min
    }

    /// Right edge of the complex region.
    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    /// Bottom edge of the complex region.
    pub fn y_min(&self) -> f64 {
        self.y_min
    }

    /// Top edge of the complex region.
    pub fn y_max(&self) -> f64 {
        self.y_max
    }

    /// The left-lower corner of the complex region.
    pub fn leftlower(&self) -> Complex<f64> {
        Complex::new(self.x_min, self.y_min)
    }

    /// The right-upper corner of the complex region.
    pub fn rightupper(&self) -> Complex<f64> {
        Complex::new(self.x_max, self.y_max)
    }

    /// The middle of the complex region.
    pub fn center(&self) -> Complex<f64> {
        Complex::new(
            (self.x_min + self.x_max) * 0.5,
            (self.y_min + self.y_max) * 0.5,
        )
    }

    /// The total number of points in the integral grid.
    pub fn len(&self) -> usize {
        self.integral_plane.0 * self.integral_plane.1
    }

    /// Never true for a Viewport that got through `new`, but clippy
    /// insists on the pair.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The one place a pixel becomes a complex number.  Both the grid
    /// generator and the inverse lookup come through here, so the two
    /// can never drift apart.
    fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        let IntegralPlane(width, height) = self.integral_plane;
        Complex::new(
            axis_sample(self.x_min, self.x_max, width, pixel.0),
            axis_sample(self.y_min, self.y_max, height, height - 1 - pixel.1),
        )
    }

    /// Given a pixel, return the complex number that was (or will be)
    /// evaluated for it.  Pixels outside the grid are an error.
    pub fn pixel_to_complex(&self, px: usize, py: usize) -> Result<Complex<f64>> {
        let IntegralPlane(width, height) = self.integral_plane;
        if px >= width || py >= height {
            return Err(FractalError::PixelOutOfRange {
                px,
                py,
                width,
                height,
            });
        }
        Ok(self.pixel_to_point(&Pixel(px, py)))
    }

    /// Build the complex grid: one point per pixel, row-major, row 0
    /// at the top of the region.
    pub fn grid(&self) -> ComplexGrid {
        let IntegralPlane(width, height) = self.integral_plane;
        let points = iproduct!(0..height, 0..width)
            .map(|(row, column)| self.pixel_to_point(&Pixel(column, row)))
            .collect();
        ComplexGrid {
            integral_plane: self.integral_plane,
            points,
        }
    }

    /// Recenter the region on `center` and divide its width and height
    /// by `factor`.  A factor of 1 only recenters, more than 1 zooms in,
    /// between 0 and 1 zooms out.  The pixel grid is unchanged.
    pub fn zoom(&self, center: Complex<f64>, factor: f64) -> Result<Viewport> {
        if !(factor > 0.0) || !factor.is_finite() {
            return Err(FractalError::ZoomFactor(factor));
        }
        let half_width = (self.x_max - self.x_min) / factor * 0.5;
        let half_height = (self.y_max - self.y_min) / factor * 0.5;
        trace!(
            "zoom by {} around {}: half extent {} x {}",
            factor,
            center,
            half_width,
            half_height
        );
        Viewport::new(
            self.integral_plane.0,
            self.integral_plane.1,
            Complex::new(center.re - half_width, center.im - half_height),
            Complex::new(center.re + half_width, center.im + half_height),
        )
    }

    /// The same region laid over a pixel grid of a different size.
    pub fn resized(&self, width: usize, height: usize) -> Result<Viewport> {
        Viewport::new(width, height, self.leftlower(), self.rightupper())
    }
}

/// Exact inverse lookup of the grid generator, as a free function
/// for callers who'd rather not reach for the method.
pub fn pixel_to_complex(px: usize, py: usize, viewport: &Viewport) -> Result<Complex<f64>> {
    viewport.pixel_to_complex(px, py)
}

/// The complex value of every pixel in a Viewport, row-major.
/// Regenerated for every evaluation; nothing caches it.
#[derive(Clone, Debug)]
pub struct ComplexGrid {
    integral_plane: IntegralPlane,
    points: Vec<Complex<f64>>,
}

impl ComplexGrid {
    /// The size of the pixel grid these points were generated for.
    pub fn integral_plane(&self) -> IntegralPlane {
        self.integral_plane
    }

    /// All of the points, row-major.
    pub fn points(&self) -> &[Complex<f64>] {
        &self.points
    }

    /// The point generated for a pixel, if the pixel is on the grid.
    pub fn get(&self, pixel: &Pixel) -> Option<Complex<f64>> {
        let IntegralPlane(width, height) = self.integral_plane;
        if pixel.0 >= width || pixel.1 >= height {
            return None;
        }
        Some(self.points[pixel.1 * width + pixel.0])
    }

    /// The number of points in the grid.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if the grid has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
