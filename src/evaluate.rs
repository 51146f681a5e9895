// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The parallel evaluator.  Every point of the grid is independent of
//! every other, so we cut the grid into bands of whole rows, hand each
//! band and its slice of the two output buffers to a scoped thread,
//! and wait.  Nothing is shared but the read-only grid and the
//! fractal's parameters, so the answer is the same however many
//! threads we use.

use crossbeam;
use num_cpus;

use errors::{FractalError, Result};
use kernel::{Escape, Fractal};
use planes::{IntegralPlane, Pixel};

/// The two same-shaped buffers the evaluator produces: the discrete
/// iteration count and the smoothed iteration count of every pixel,
/// row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Iterations {
    integral_plane: IntegralPlane,
    max_iter: u32,
    m: Vec<u32>,
    ms: Vec<f64>,
}

impl Iterations {
    /// Wrap buffers computed elsewhere.  Both must hold exactly
    /// `width * height` values.
    pub fn new(
        width: usize,
        height: usize,
        max_iter: u32,
        m: Vec<u32>,
        ms: Vec<f64>,
    ) -> Result<Iterations> {
        if width < 1 || height < 1 {
            return Err(FractalError::EmptyResolution { width, height });
        }
        let expected = width * height;
        if m.len() != expected || ms.len() != expected {
            return Err(FractalError::BufferShape {
                m: m.len(),
                ms: ms.len(),
                expected,
            });
        }
        Ok(Iterations {
            integral_plane: IntegralPlane(width, height),
            max_iter,
            m,
            ms,
        })
    }

    /// The size of the grid.
    pub fn integral_plane(&self) -> IntegralPlane {
        self.integral_plane
    }

    /// The iteration cap the fractal ran with; `m == max_iter` marks a
    /// point that never escaped.
    pub fn max_iter(&self) -> u32 {
        self.max_iter
    }

    /// Discrete iteration counts, row-major.
    pub fn m(&self) -> &[u32] {
        &self.m
    }

    /// Smoothed iteration counts, row-major.
    pub fn ms(&self) -> &[f64] {
        &self.ms
    }

    /// The result for one pixel, if it's on the grid.
    pub fn get(&self, pixel: &Pixel) -> Option<Escape> {
        let IntegralPlane(width, height) = self.integral_plane;
        if pixel.0 >= width || pixel.1 >= height {
            return None;
        }
        let offset = pixel.1 * width + pixel.0;
        Some(Escape {
            m: self.m[offset],
            ms: self.ms[offset],
        })
    }

    /// The number of pixels.
    pub fn len(&self) -> usize {
        self.m.len()
    }

    /// True if there are no pixels, which `new` never allows.
    pub fn is_empty(&self) -> bool {
        self.m.is_empty()
    }
}

/// Evaluate a fractal over its viewport using every core the machine
/// has.
pub fn evaluate(fractal: &Fractal) -> Result<Iterations> {
    evaluate_with_threads(fractal, num_cpus::get())
}

/// Evaluate a fractal over its viewport with a given number of worker
/// threads.  Zero is treated as one; more threads than rows are not
/// started.
pub fn evaluate_with_threads(fractal: &Fractal, threads: usize) -> Result<Iterations> {
    let grid = fractal.viewport().grid();
    let IntegralPlane(width, height) = grid.integral_plane();
    let threads = threads.max(1).min(height);
    let band = ((height + threads - 1) / threads) * width;

    let mut m = vec![0 as u32; grid.len()];
    let mut ms = vec![0.0 as f64; grid.len()];
    debug!(
        "evaluating {:?} over {}x{} with {} threads, {} points per band",
        fractal.kind(),
        width,
        height,
        threads,
        band
    );

    crossbeam::scope(|spawner| {
        let bands = grid
            .points()
            .chunks(band)
            .zip(m.chunks_mut(band))
            .zip(ms.chunks_mut(band));
        for ((points, m_band), ms_band) in bands {
            spawner.spawn(move |_| {
                for (i, point) in points.iter().enumerate() {
                    let escape = fractal.escape(*point);
                    m_band[i] = escape.m;
                    ms_band[i] = escape.ms;
                }
            });
        }
    })
    .map_err(|_| FractalError::WorkerPanicked)?;

    Iterations::new(width, height, fractal.max_iter(), m, ms)
}
