// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Everything that can go wrong is the caller's fault, and we say so
//! before we spend a single cycle iterating.  The one exception is a
//! worker thread dying on us, which we report rather than unwinding
//! through the caller.

/// The configuration mistakes the renderer knows how to name.  Each
/// variant carries the offending value so the message points at the
/// field the caller got wrong.
#[derive(Debug, Fail, Clone, PartialEq)]
pub enum FractalError {
    /// The pixel grid has no pixels along one axis.
    #[fail(display = "resolution {}x{} must be at least 1x1", width, height)]
    EmptyResolution {
        /// Requested width in pixels.
        width: usize,
        /// Requested height in pixels.
        height: usize,
    },

    /// The lower bound of an axis is not strictly below its upper bound.
    #[fail(display = "{} bounds are inverted or empty: [{}, {}]", axis, min, max)]
    InvertedBounds {
        /// Which axis, "x" or "y".
        axis: &'static str,
        /// The lower bound supplied.
        min: f64,
        /// The upper bound supplied.
        max: f64,
    },

    /// The squared escape radius must be a positive number.
    #[fail(display = "escape_radius_sq must be positive, got {}", _0)]
    EscapeRadius(f64),

    /// At least one iteration has to happen.
    #[fail(display = "max_iter must be at least 1")]
    MaxIterations,

    /// Zooming by a non-positive (or non-finite) factor makes no sense.
    #[fail(display = "zoom factor must be positive, got {}", _0)]
    ZoomFactor(f64),

    /// A pixel lookup fell outside the generated grid.
    #[fail(display = "pixel ({}, {}) is outside the {}x{} grid", px, py, width, height)]
    PixelOutOfRange {
        /// Requested column.
        px: usize,
        /// Requested row.
        py: usize,
        /// Grid width.
        width: usize,
        /// Grid height.
        height: usize,
    },

    /// There are only so many built-in palettes.
    #[fail(display = "unknown palette_id {}; expected 0..{}", id, count)]
    UnknownPalette {
        /// The id asked for.
        id: usize,
        /// How many palettes exist.
        count: usize,
    },

    /// The interpolation method was not one of linear, akima or pchip.
    #[fail(display = "unknown interpolation_method {:?}; expected linear, akima or pchip", _0)]
    UnknownInterpolation(String),

    /// The color mode was not one of discrete or smoothed.
    #[fail(display = "unknown color_mode {:?}; expected discrete or smoothed", _0)]
    UnknownColorMode(String),

    /// The color table cannot hold fewer entries than the palette has
    /// control points.
    #[fail(display = "table_size {} is smaller than the palette's {} control points", size, controls)]
    TableTooSmall {
        /// Requested table size.
        size: usize,
        /// Control points in the chosen palette.
        controls: usize,
    },

    /// The discrete and smoothed buffers handed to the colorizer are
    /// not the same shape as the grid they claim to describe.
    #[fail(display = "iteration buffers hold {} and {} values, expected {}", m, ms, expected)]
    BufferShape {
        /// Length of the discrete buffer.
        m: usize,
        /// Length of the smoothed buffer.
        ms: usize,
        /// width * height.
        expected: usize,
    },

    /// A worker thread panicked during evaluation.
    #[fail(display = "an evaluation worker panicked")]
    WorkerPanicked,
}

/// Shorthand used throughout the crate.
pub type Result<T> = ::std::result::Result<T, FractalError>;
