// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The knobs a caller can turn, gathered in one place, and the one-shot
//! render that uses them.

use crossbeam;
use num::Complex;
use num_cpus;

use colorize::{colorize, ColorMode, PixelBuffer};
use colormap::{palette, ColorTable, Interpolation};
use errors::{FractalError, Result};
use evaluate::{evaluate_with_threads, Iterations};
use kernel::{
    Fractal, FractalKind, JULIA_BOUNDS, JULIA_ESCAPE_RADIUS_SQ, MANDELBROT_BOUNDS,
    MANDELBROT_ESCAPE_RADIUS_SQ,
};
use planes::Viewport;

/// The resolutions a settings menu offers, 4:3 first, then 16:9.
pub const RESOLUTIONS: [(usize, usize); 6] = [
    (1280, 960),
    (1440, 1080),
    (1920, 1440),
    (1280, 720),
    (1600, 900),
    (1920, 1080),
];

/// Everything needed to go from nothing to a pixel buffer.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderOptions {
    /// Width and height in pixels.
    pub resolution: (usize, usize),
    /// Iteration cap.
    pub max_iter: u32,
    /// Squared escape radius; the family's default if `None`.
    pub escape_radius_sq: Option<f64>,
    /// Index into the built-in palettes.
    pub palette_id: usize,
    /// How the palette is stretched into a table.
    pub interpolation: Interpolation,
    /// Which iteration count picks the color.
    pub color_mode: ColorMode,
    /// How many colors the table holds.
    pub table_size: usize,
    /// Render the Julia set for this constant instead of the Mandelbrot.
    pub julia_constant: Option<Complex<f64>>,
    /// Leftlower and rightupper corners; the family's default if `None`.
    pub bounds: Option<(Complex<f64>, Complex<f64>)>,
    /// Worker threads for evaluation.
    pub threads: usize,
}

impl Default for RenderOptions {
    fn default() -> RenderOptions {
        RenderOptions {
            resolution: RESOLUTIONS[0],
            max_iter: 100,
            escape_radius_sq: None,
            palette_id: 0,
            interpolation: Interpolation::Pchip,
            color_mode: ColorMode::Smoothed,
            table_size: 4000,
            julia_constant: None,
            bounds: None,
            threads: num_cpus::get(),
        }
    }
}

impl RenderOptions {
    /// The fractal these options describe.
    pub fn fractal(&self) -> Result<Fractal> {
        let (kind, bounds, escape_radius_sq) = match self.julia_constant {
            Some(constant) => (
                FractalKind::Julia(constant),
                JULIA_BOUNDS,
                JULIA_ESCAPE_RADIUS_SQ,
            ),
            None => (
                FractalKind::Mandelbrot,
                MANDELBROT_BOUNDS,
                MANDELBROT_ESCAPE_RADIUS_SQ,
            ),
        };
        let (leftlower, rightupper) = self.bounds.unwrap_or(bounds);
        let (width, height) = self.resolution;
        let viewport = Viewport::new(width, height, leftlower, rightupper)?;
        Fractal::new(
            kind,
            viewport,
            self.max_iter,
            self.escape_radius_sq.unwrap_or(escape_radius_sq),
        )
    }

    /// Check everything a render will need, without rendering.
    pub fn validate(&self) -> Result<()> {
        self.fractal()?;
        let controls = palette(self.palette_id)?.controls.len();
        if self.table_size < controls {
            return Err(FractalError::TableTooSmall {
                size: self.table_size,
                controls,
            });
        }
        Ok(())
    }
}

/// Evaluate the fractal and build the color table side by side, then
/// colorize.  Every option is checked before either starts.  Returns
/// the fractal that was rendered along with the image, so a caller can
/// zoom from it.
pub fn render(options: &RenderOptions) -> Result<(Fractal, PixelBuffer)> {
    options.validate()?;
    let fractal = options.fractal()?;

    let mut iterations: Option<Result<Iterations>> = None;
    let mut table: Option<Result<ColorTable>> = None;
    crossbeam::scope(|spawner| {
        let handle = spawner.spawn(|_| {
            palette(options.palette_id)
                .and_then(|p| p.table(options.interpolation, options.table_size))
        });
        iterations = Some(evaluate_with_threads(&fractal, options.threads));
        table = handle.join().ok();
    })
    .map_err(|_| FractalError::WorkerPanicked)?;

    let iterations = iterations.ok_or(FractalError::WorkerPanicked)??;
    let table = table.ok_or(FractalError::WorkerPanicked)??;
    Ok((fractal, colorize(&iterations, &table, options.color_mode)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> RenderOptions {
        RenderOptions {
            resolution: (24, 18),
            table_size: 64,
            threads: 3,
            ..RenderOptions::default()
        }
    }

    #[test]
    fn defaults_describe_the_mandelbrot() {
        let options = RenderOptions::default();
        assert_eq!(options.resolution, (1280, 960));
        assert_eq!(options.interpolation, Interpolation::Pchip);
        assert_eq!(options.color_mode, ColorMode::Smoothed);
        let fractal = options.fractal().unwrap();
        assert_eq!(fractal.kind(), FractalKind::Mandelbrot);
        assert_eq!(fractal.escape_radius_sq(), 100.0);
    }

    #[test]
    fn julia_constant_switches_family_defaults() {
        let options = RenderOptions {
            julia_constant: Some(Complex::new(-0.4, 0.6)),
            ..small()
        };
        let fractal = options.fractal().unwrap();
        assert_eq!(fractal.kind(), FractalKind::Julia(Complex::new(-0.4, 0.6)));
        assert_eq!(fractal.escape_radius_sq(), 10.0);
        assert_eq!(fractal.viewport().leftlower(), Complex::new(-2.0, -2.0));
    }

    #[test]
    fn validate_names_the_bad_field() {
        let bad = RenderOptions {
            palette_id: 9,
            ..small()
        };
        assert_eq!(
            bad.validate(),
            Err(FractalError::UnknownPalette { id: 9, count: 5 })
        );
        let bad = RenderOptions {
            table_size: 3,
            ..small()
        };
        assert!(bad.validate().is_err());
        let bad = RenderOptions {
            escape_radius_sq: Some(-1.0),
            ..small()
        };
        assert_eq!(bad.validate(), Err(FractalError::EscapeRadius(-1.0)));
        let bad = RenderOptions {
            resolution: (0, 10),
            ..small()
        };
        assert!(render(&bad).is_err());
    }

    #[test]
    fn render_matches_the_pipeline_run_by_hand() {
        let options = small();
        let (fractal, buffer) = render(&options).unwrap();
        let iterations = evaluate_with_threads(&fractal, 1).unwrap();
        let table = palette(0)
            .unwrap()
            .table(Interpolation::Pchip, 64)
            .unwrap();
        assert_eq!(
            buffer,
            colorize(&iterations, &table, ColorMode::Smoothed)
        );
        assert_eq!(buffer.as_bytes().len(), 24 * 18 * 3);
    }
}
