// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Color tables.  A palette is a short list of control points, each a
//! position in `[0, 1]` and a color.  To render, we stretch a palette
//! into a table of however many colors the caller wants, by sampling
//! evenly spaced positions and interpolating each channel through the
//! control points.

use num::clamp;
use std::fmt;
use std::str::FromStr;

use errors::{FractalError, Result};
use interpolate::Curve;

/// An RGB triple.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// The red, green and blue channels as an array.
    pub fn channels(self) -> [u8; 3] {
        [self.0, self.1, self.2]
    }
}

/// A color anchored at a position along the palette.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ControlPoint {
    /// Where along the palette this color sits, in `[0, 1]`.
    pub position: f64,
    /// The color at that position.
    pub color: Rgb,
}

/// A named set of control points, plus the color given to points that
/// never escape.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Palette {
    /// What the palette is called in a settings menu.
    pub name: &'static str,
    /// The control points, in strictly increasing position.
    pub controls: &'static [ControlPoint],
    /// The color of the set itself.
    pub interior: Rgb,
}

macro_rules! stops {
    ($(($x: expr, $r: expr, $g: expr, $b: expr)),* $(,)*) => {
        &[$(ControlPoint { position: $x, color: Rgb($r, $g, $b) }),*]
    };
}

/// The built-in palettes, indexed by palette id.
pub static PALETTES: [Palette; 5] = [
    // The gradient Wikipedia's Mandelbrot images use.
    Palette {
        name: "blues, whites & oranges",
        controls: stops![
            (0.0, 0, 7, 100),
            (0.16, 32, 107, 203),
            (0.42, 237, 255, 255),
            (0.64, 255, 170, 0),
            (0.86, 0, 2, 0),
            (1.0, 0, 7, 100),
        ],
        interior: Rgb(0, 0, 0),
    },
    Palette {
        name: "orange, white & blue",
        controls: stops![
            (0.0, 253, 252, 223),
            (0.16, 254, 217, 88),
            (0.32, 195, 130, 23),
            (0.48, 82, 16, 30),
            (0.64, 36, 17, 80),
            (0.80, 113, 184, 250),
            (0.96, 17, 3, 64),
        ],
        interior: Rgb(0, 0, 0),
    },
    Palette {
        name: "pink & blue",
        controls: stops![
            (0.0, 129, 25, 31),
            (0.142, 202, 53, 199),
            (0.284, 0, 243, 86),
            (0.426, 254, 144, 215),
            (0.568, 154, 230, 209),
            (0.71, 1, 66, 255),
            (0.852, 0, 146, 61),
            (1.0, 0, 2, 0),
        ],
        interior: Rgb(0, 0, 0),
    },
    Palette {
        name: "lime",
        controls: stops![(0.0, 210, 224, 151), (1.0, 4, 4, 7)],
        interior: Rgb(0, 0, 0),
    },
    Palette {
        name: "aqua & black",
        controls: stops![
            (0.0, 6, 12, 15),
            (0.25, 6, 95, 104),
            (0.50, 7, 152, 138),
            (0.75, 119, 211, 149),
            (1.0, 218, 234, 155),
        ],
        interior: Rgb(0, 0, 0),
    },
];

/// Look up a built-in palette by id.
pub fn palette(id: usize) -> Result<&'static Palette> {
    PALETTES.get(id).ok_or(FractalError::UnknownPalette {
        id,
        count: PALETTES.len(),
    })
}

/// How the gaps between control points get filled in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Interpolation {
    /// Straight lines between control points.
    Linear,
    /// Akima's cubic; curvier, and may overshoot (the result is clamped).
    Akima,
    /// Shape-preserving cubic; never overshoots.
    Pchip,
}

impl Interpolation {
    /// Every method, in id order.
    pub const ALL: [Interpolation; 3] = [
        Interpolation::Linear,
        Interpolation::Akima,
        Interpolation::Pchip,
    ];

    /// Look up a method by its numeric id (0, 1 or 2).
    pub fn from_id(id: usize) -> Result<Interpolation> {
        Interpolation::ALL
            .get(id)
            .cloned()
            .ok_or_else(|| FractalError::UnknownInterpolation(id.to_string()))
    }

    /// Fit this method's curve through the knots.
    fn fit(self, xs: &[f64], ys: &[f64]) -> Curve {
        match self {
            Interpolation::Linear => Curve::linear(xs, ys),
            Interpolation::Akima => Curve::akima(xs, ys),
            Interpolation::Pchip => Curve::pchip(xs, ys),
        }
    }
}

impl FromStr for Interpolation {
    type Err = FractalError;

    fn from_str(s: &str) -> Result<Interpolation> {
        match s.to_lowercase().as_str() {
            "linear" | "0" => Ok(Interpolation::Linear),
            "akima" | "1" => Ok(Interpolation::Akima),
            "pchip" | "2" => Ok(Interpolation::Pchip),
            _ => Err(FractalError::UnknownInterpolation(s.to_string())),
        }
    }
}

impl fmt::Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            Interpolation::Linear => "linear",
            Interpolation::Akima => "akima",
            Interpolation::Pchip => "pchip",
        };
        f.write_str(name)
    }
}

/// A palette stretched out to a fixed number of colors, plus the
/// interior color.  Never empty.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorTable {
    colors: Vec<Rgb>,
    interior: Rgb,
}

impl ColorTable {
    /// Wrap an arbitrary list of colors.  The list must not be empty.
    pub fn new(colors: Vec<Rgb>, interior: Rgb) -> Result<ColorTable> {
        if colors.is_empty() {
            return Err(FractalError::TableTooSmall {
                size: 0,
                controls: 1,
            });
        }
        Ok(ColorTable { colors, interior })
    }

    /// The colors, in order.
    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// The color of points that never escape.
    pub fn interior(&self) -> Rgb {
        self.interior
    }

    /// The number of colors in the table.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false; a ColorTable can't be built empty.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// Interpolated values land wherever they like; colors don't.  Rounds
/// to the nearest level, so a channel can sit one above a table built by
/// truncating.
fn quantize(value: f64) -> u8 {
    clamp(value.round(), 0.0, 255.0) as u8
}

impl Palette {
    /// Stretch this palette into `size` colors using `method`.  `size`
    /// must be at least the number of control points.
    pub fn table(&self, method: Interpolation, size: usize) -> Result<ColorTable> {
        let controls = self.controls;
        if size < controls.len() {
            return Err(FractalError::TableTooSmall {
                size,
                controls: controls.len(),
            });
        }

        let xs: Vec<f64> = controls.iter().map(|c| c.position).collect();
        let (first, last) = (xs[0], xs[xs.len() - 1]);
        let step = (last - first) / ((size - 1) as f64);
        let positions: Vec<f64> = (0..size)
            .map(|j| t!(j == size - 1, last, first + (j as f64) * step))
            .collect();

        let channels: Vec<Vec<u8>> = (0..3)
            .map(|index| {
                let ys: Vec<f64> = controls
                    .iter()
                    .map(|c| f64::from(c.color.channels()[index]))
                    .collect();
                let curve = method.fit(&xs, &ys);
                positions.iter().map(|&x| quantize(curve.at(x))).collect()
            })
            .collect();

        let colors = (0..size)
            .map(|j| Rgb(channels[0][j], channels[1][j], channels[2][j]))
            .collect();
        trace!(
            "built {} colors from palette {:?} with {} interpolation",
            size,
            self.name,
            method
        );
        ColorTable::new(colors, self.interior)
    }
}

/// Build a color table from a built-in palette.  Unknown ids and
/// undersized tables are reported before any interpolation happens.
pub fn build_color_table(
    palette_id: usize,
    method: Interpolation,
    table_size: usize,
) -> Result<ColorTable> {
    palette(palette_id)?.table(method, table_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palettes_are_well_formed() {
        for palette in PALETTES.iter() {
            assert!(palette.controls.len() >= 2, "{}", palette.name);
            assert_eq!(palette.controls[0].position, 0.0);
            for pair in palette.controls.windows(2) {
                assert!(pair[0].position < pair[1].position, "{}", palette.name);
            }
        }
    }

    #[test]
    fn unknown_palette_is_an_error() {
        assert_eq!(
            build_color_table(5, Interpolation::Linear, 16),
            Err(FractalError::UnknownPalette { id: 5, count: 5 })
        );
    }

    #[test]
    fn undersized_table_is_an_error() {
        assert_eq!(
            build_color_table(0, Interpolation::Pchip, 5),
            Err(FractalError::TableTooSmall {
                size: 5,
                controls: 6
            })
        );
        assert!(ColorTable::new(vec![], Rgb(0, 0, 0)).is_err());
    }

    #[test]
    fn interpolation_parses_names_and_ids() {
        assert_eq!("linear".parse::<Interpolation>(), Ok(Interpolation::Linear));
        assert_eq!("AKIMA".parse::<Interpolation>(), Ok(Interpolation::Akima));
        assert_eq!("2".parse::<Interpolation>(), Ok(Interpolation::Pchip));
        assert_eq!(
            "cubic".parse::<Interpolation>(),
            Err(FractalError::UnknownInterpolation("cubic".to_string()))
        );
        assert_eq!(Interpolation::from_id(1), Ok(Interpolation::Akima));
        assert!(Interpolation::from_id(3).is_err());
        for method in Interpolation::ALL.iter() {
            assert_eq!(method.to_string().parse::<Interpolation>(), Ok(*method));
        }
    }

    #[test]
    fn control_colors_are_reproduced_when_samples_land_on_them() {
        // Palettes 3 and 4 have evenly spaced control points, so a table
        // with one entry per control point samples exactly on them.
        for &id in &[3, 4] {
            let palette = palette(id).unwrap();
            let expected: Vec<Rgb> = palette.controls.iter().map(|c| c.color).collect();
            for method in Interpolation::ALL.iter() {
                let table = palette.table(*method, expected.len()).unwrap();
                assert_eq!(table.colors(), &expected[..], "palette {} {}", id, method);
            }
        }
    }

    #[test]
    fn ends_of_every_table_are_the_end_controls() {
        for (id, palette) in PALETTES.iter().enumerate() {
            let first = palette.controls[0].color;
            let last = palette.controls[palette.controls.len() - 1].color;
            for method in Interpolation::ALL.iter() {
                let table = build_color_table(id, *method, 333).unwrap();
                assert_eq!(table.colors()[0], first);
                assert_eq!(table.colors()[332], last);
            }
        }
    }

    #[test]
    fn tables_have_exactly_the_requested_size() {
        for id in 0..PALETTES.len() {
            let minimum = PALETTES[id].controls.len();
            for method in Interpolation::ALL.iter() {
                for &size in &[minimum, minimum + 1, 16, 255, 4000] {
                    let table = build_color_table(id, *method, size).unwrap();
                    assert_eq!(table.len(), size);
                    assert_eq!(table.interior(), Rgb(0, 0, 0));
                }
            }
        }
    }

    #[test]
    fn linear_table_fills_in_between() {
        // lime: (210, 224, 151) -> (4, 4, 7) over three samples.
        let table = build_color_table(3, Interpolation::Linear, 3).unwrap();
        assert_eq!(table.colors()[1], Rgb(107, 114, 79));
    }
}
