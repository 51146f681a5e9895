// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time kernel.  Both fractals we care about iterate the
//! same recurrence, `z = z² + c`, and differ only in where they start:
//! the Mandelbrot starts every point at zero and uses the point as
//! `c`; a Julia set starts at the point and uses a fixed constant as
//! `c`.
//!
//! Because the Julia set consumes the point itself as `z₀`, it is one
//! iteration "ahead" of the Mandelbrot at every step, so its iteration
//! count is shifted by one and its smoothing offset by one as well.
//! That asymmetry is deliberate.

use num::Complex;

use errors::{FractalError, Result};
use planes::{Pixel, Viewport, ZoomAction};

/// Default bounds of the Mandelbrot view, leftlower and rightupper.
pub const MANDELBROT_BOUNDS: (Complex<f64>, Complex<f64>) = (
    Complex { re: -2.5, im: -2.0 },
    Complex { re: 1.5, im: 2.0 },
);

/// Default bounds of a Julia view, leftlower and rightupper.
pub const JULIA_BOUNDS: (Complex<f64>, Complex<f64>) = (
    Complex { re: -2.0, im: -2.0 },
    Complex { re: 2.0, im: 2.0 },
);

/// Default squared escape radius for the Mandelbrot.
pub const MANDELBROT_ESCAPE_RADIUS_SQ: f64 = 100.0;

/// Default squared escape radius for Julia sets.
pub const JULIA_ESCAPE_RADIUS_SQ: f64 = 10.0;

/// Iteration cap for a Julia companion view.  The companion is
/// redrawn constantly and never zoomed, so it doesn't need more.
pub const JULIA_COMPANION_ITERATIONS: u32 = 200;

// ln(ln(x)) is undefined at or below x = 1, which only happens when
// the escape radius itself is below 1.  Clamp the magnitude here.
const LOG_ARGUMENT_FLOOR: f64 = 1.0 + 1e-9;

/// Which quadratic family a Fractal belongs to.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FractalKind {
    /// `z₀ = 0`, `c = point`.
    Mandelbrot,
    /// `z₀ = point`, `c` fixed.
    Julia(Complex<f64>),
}

impl FractalKind {
    /// The starting `z` and the `c` added at each step, for a point.
    fn start(&self, point: Complex<f64>) -> (Complex<f64>, Complex<f64>) {
        match *self {
            FractalKind::Mandelbrot => (Complex::new(0.0, 0.0), point),
            FractalKind::Julia(constant) => (point, constant),
        }
    }

    /// How many iterations the family has already spent before the
    /// loop begins.
    fn index_shift(&self) -> u32 {
        match *self {
            FractalKind::Mandelbrot => 0,
            FractalKind::Julia(_) => 1,
        }
    }

    /// The constant that makes the smoothed count line up with the
    /// discrete one at the escape boundary.
    fn smoothing_offset(&self) -> f64 {
        match *self {
            FractalKind::Mandelbrot => 2.0,
            FractalKind::Julia(_) => 3.0,
        }
    }
}

/// What the kernel learned about one point: `m` is the iteration at
/// which it escaped (or `max_iter` if it never did) and `ms` is the
/// continuous estimate of the same, zero for points that never
/// escaped.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Escape {
    /// Discrete iteration count.
    pub m: u32,
    /// Smoothed iteration count.
    pub ms: f64,
}

/// The normalized iteration count: the fractional part comes from
/// how far past the escape radius the point landed.
fn smoothed(m: u32, offset: f64, norm_sqr: f64) -> f64 {
    let magnitude = norm_sqr.max(LOG_ARGUMENT_FLOOR).min(::std::f64::MAX);
    f64::from(m) + offset - magnitude.ln().log2()
}

/// A fractal instance: which family, where we're looking, and how
/// hard we look.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Fractal {
    kind: FractalKind,
    viewport: Viewport,
    max_iter: u32,
    escape_radius_sq: f64,
}

impl Fractal {
    /// Constructor.  Validates the iteration cap and escape radius;
    /// the viewport validated itself when it was built.
    pub fn new(
        kind: FractalKind,
        viewport: Viewport,
        max_iter: u32,
        escape_radius_sq: f64,
    ) -> Result<Fractal> {
        if max_iter < 1 {
            return Err(FractalError::MaxIterations);
        }
        if !(escape_radius_sq > 0.0) {
            return Err(FractalError::EscapeRadius(escape_radius_sq));
        }
        Ok(Fractal {
            kind,
            viewport,
            max_iter,
            escape_radius_sq,
        })
    }

    /// The whole Mandelbrot set, at its customary framing.
    pub fn mandelbrot(width: usize, height: usize, max_iter: u32) -> Result<Fractal> {
        let viewport = Viewport::new(width, height, MANDELBROT_BOUNDS.0, MANDELBROT_BOUNDS.1)?;
        Fractal::new(
            FractalKind::Mandelbrot,
            viewport,
            max_iter,
            MANDELBROT_ESCAPE_RADIUS_SQ,
        )
    }

    /// The Julia set for `constant`, at its customary framing.
    pub fn julia(
        width: usize,
        height: usize,
        max_iter: u32,
        constant: Complex<f64>,
    ) -> Result<Fractal> {
        let viewport = Viewport::new(width, height, JULIA_BOUNDS.0, JULIA_BOUNDS.1)?;
        Fractal::new(
            FractalKind::Julia(constant),
            viewport,
            max_iter,
            JULIA_ESCAPE_RADIUS_SQ,
        )
    }

    /// Which family this is.
    pub fn kind(&self) -> FractalKind {
        self.kind
    }

    /// Where we're looking.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// The iteration cap; also the "never escaped" sentinel.
    pub fn max_iter(&self) -> u32 {
        self.max_iter
    }

    /// The squared escape radius.
    pub fn escape_radius_sq(&self) -> f64 {
        self.escape_radius_sq
    }

    /// The same fractal, looking somewhere else.
    pub fn with_viewport(&self, viewport: Viewport) -> Fractal {
        Fractal { viewport, ..*self }
    }

    /// The same fractal with a different iteration cap.
    pub fn with_max_iter(&self, max_iter: u32) -> Result<Fractal> {
        Fractal::new(self.kind, self.viewport, max_iter, self.escape_radius_sq)
    }

    /// The same fractal with a different squared escape radius.
    pub fn with_escape_radius_sq(&self, escape_radius_sq: f64) -> Result<Fractal> {
        Fractal::new(self.kind, self.viewport, self.max_iter, escape_radius_sq)
    }

    /// The same fractal with the viewport recentered on `center` and
    /// scaled by `factor`.
    pub fn zoom(&self, center: Complex<f64>, factor: f64) -> Result<Fractal> {
        Ok(self.with_viewport(self.viewport.zoom(center, factor)?))
    }

    /// What a mouse click does: look up the clicked pixel's coordinate
    /// and zoom around it.
    pub fn click(&self, pixel: &Pixel, action: ZoomAction) -> Result<Fractal> {
        let center = self.viewport.pixel_to_complex(pixel.0, pixel.1)?;
        debug!("{:?} at pixel {:?} -> {}", action, pixel, center);
        self.zoom(center, action.factor())
    }

    /// The Julia set whose constant is the coordinate under `pixel`,
    /// the same size as this view so the two sit side by side as equal
    /// halves of one window.
    pub fn julia_companion(&self, pixel: &Pixel, max_iter: u32) -> Result<Fractal> {
        let constant = self.viewport.pixel_to_complex(pixel.0, pixel.1)?;
        Fractal::julia(
            self.viewport.width(),
            self.viewport.height(),
            max_iter,
            constant,
        )
    }

    /// Run the recurrence for one point.  A pure function of the point
    /// and this instance's parameters.
    pub fn escape(&self, point: Complex<f64>) -> Escape {
        let (mut z, c) = self.kind.start(point);
        for n in 0..self.max_iter {
            z = z * z + c;
            let norm_sqr = z.norm_sqr();
            if norm_sqr > self.escape_radius_sq {
                let m = n + self.kind.index_shift();
                return Escape {
                    m,
                    ms: smoothed(m, self.kind.smoothing_offset(), norm_sqr),
                };
            }
        }
        Escape {
            m: self.max_iter,
            ms: 0.0,
        }
    }
}

/// The Viewport Controller as a free function: a new fractal looking
/// at `center`, scaled by `factor`.
pub fn zoom(fractal: &Fractal, center: Complex<f64>, factor: f64) -> Result<Fractal> {
    fractal.zoom(center, factor)
}
