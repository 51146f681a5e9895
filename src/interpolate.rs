// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! One-dimensional interpolants through a handful of knots.  A color
//! palette is only a few control points; these curves fill in
//! everything between them, one color channel at a time.
//!
//! The two cubic curves are both piecewise Hermite: they pass through
//! every knot, and differ only in how they choose the slope at each
//! knot.  Akima's slopes follow the local trend of the data and can
//! overshoot; the PCHIP slopes are limited so the curve never leaves
//! the range of its neighbours.

/// A curve fitted through a set of knots with strictly increasing
/// x values.  Evaluating outside the knots extrapolates the end
/// segments.
#[derive(Clone, Debug)]
pub enum Curve {
    /// Straight lines between adjacent knots.
    Linear {
        /// Knot positions.
        xs: Vec<f64>,
        /// Knot values.
        ys: Vec<f64>,
    },
    /// Cubic Hermite segments with the given slope at each knot.
    Hermite {
        /// Knot positions.
        xs: Vec<f64>,
        /// Knot values.
        ys: Vec<f64>,
        /// First derivative at each knot.
        slopes: Vec<f64>,
    },
}

/// The slope of each segment.
fn secants(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    xs.windows(2)
        .zip(ys.windows(2))
        .map(|(x, y)| (y[1] - y[0]) / (x[1] - x[0]))
        .collect()
}

/// `sign` that, unlike `f64::signum`, says zero for zero.
fn sign(v: f64) -> f64 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// The segment holding `x`: the index `i` with `xs[i] <= x <= xs[i+1]`,
/// pinned to the first or last segment outside the knots.  A knot
/// shared by two segments belongs to the one it starts.
fn segment(xs: &[f64], x: f64) -> usize {
    let last = xs.len() - 1;
    xs[1..last].iter().take_while(|&&knot| knot <= x).count()
}

/// Akima's 1970 slopes: each knot's slope is a weighted average of
/// the two secants around it, weighted by how much the secants on the
/// far side disagree.  Two phantom secants are extrapolated at each
/// end so the outer knots have neighbours too.
fn akima_slopes(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len();
    let s = secants(xs, ys);
    if n == 2 {
        return vec![s[0]; 2];
    }

    let mut m = vec![0.0; n + 3];
    m[2..n + 1].copy_from_slice(&s);
    m[1] = 2.0 * m[2] - m[3];
    m[0] = 2.0 * m[1] - m[2];
    m[n + 1] = 2.0 * m[n] - m[n - 1];
    m[n + 2] = 2.0 * m[n + 1] - m[n];

    let dm: Vec<f64> = m.windows(2).map(|w| (w[1] - w[0]).abs()).collect();
    let weights: Vec<(f64, f64)> = (0..n).map(|i| (dm[i + 2], dm[i])).collect();
    let largest = weights
        .iter()
        .map(|&(f1, f2)| f1 + f2)
        .fold(0.0_f64, f64::max);

    weights
        .iter()
        .enumerate()
        .map(|(i, &(f1, f2))| {
            let f12 = f1 + f2;
            if f12 > 1e-9 * largest {
                (f1 * m[i + 1] + f2 * m[i + 2]) / f12
            } else {
                0.5 * (m[i + 3] + m[i])
            }
        })
        .collect()
}

/// The end slope for PCHIP: a three-point estimate, forced to zero if
/// it points the wrong way and capped at three times the end secant
/// when the data turns around.
fn pchip_edge(h0: f64, h1: f64, m0: f64, m1: f64) -> f64 {
    let d = ((2.0 * h0 + h1) * m0 - h0 * m1) / (h0 + h1);
    if sign(d) != sign(m0) {
        0.0
    } else if sign(m0) != sign(m1) && d.abs() > 3.0 * m0.abs() {
        3.0 * m0
    } else {
        d
    }
}

/// Fritsch–Carlson slopes: zero wherever the data has a local extremum
/// or a flat segment, otherwise a weighted harmonic mean of the
/// neighbouring secants.
fn pchip_slopes(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len();
    let s = secants(xs, ys);
    if n == 2 {
        return vec![s[0]; 2];
    }
    let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();

    let mut slopes = vec![0.0; n];
    for k in 1..n - 1 {
        let (before, after) = (s[k - 1], s[k]);
        if before == 0.0 || after == 0.0 || sign(before) != sign(after) {
            continue;
        }
        let w1 = 2.0 * h[k] + h[k - 1];
        let w2 = h[k] + 2.0 * h[k - 1];
        let whmean = (w1 / before + w2 / after) / (w1 + w2);
        slopes[k] = 1.0 / whmean;
    }
    slopes[0] = pchip_edge(h[0], h[1], s[0], s[1]);
    slopes[n - 1] = pchip_edge(h[n - 2], h[n - 3], s[n - 2], s[n - 3]);
    slopes
}

impl Curve {
    /// Straight lines between the knots.
    pub fn linear(xs: &[f64], ys: &[f64]) -> Curve {
        Curve::Linear {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
        }
    }

    /// Akima's cubic.  Smooth, follows the data, may overshoot.
    pub fn akima(xs: &[f64], ys: &[f64]) -> Curve {
        Curve::Hermite {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            slopes: akima_slopes(xs, ys),
        }
    }

    /// The shape-preserving cubic.  Never overshoots.
    pub fn pchip(xs: &[f64], ys: &[f64]) -> Curve {
        Curve::Hermite {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            slopes: pchip_slopes(xs, ys),
        }
    }

    /// Evaluate the curve at `x`.  At a knot, returns the knot's value
    /// exactly.
    pub fn at(&self, x: f64) -> f64 {
        match *self {
            Curve::Linear { ref xs, ref ys } => {
                let i = segment(xs, x);
                let t = (x - xs[i]) / (xs[i + 1] - xs[i]);
                ys[i] * (1.0 - t) + ys[i + 1] * t
            }
            Curve::Hermite {
                ref xs,
                ref ys,
                ref slopes,
            } => {
                let i = segment(xs, x);
                let h = xs[i + 1] - xs[i];
                let t = (x - xs[i]) / h;
                let t2 = t * t;
                let t3 = t2 * t;
                let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
                let h10 = t3 - 2.0 * t2 + t;
                let h01 = -2.0 * t3 + 3.0 * t2;
                let h11 = t3 - t2;
                h00 * ys[i] + h10 * h * slopes[i] + h01 * ys[i + 1] + h11 * h * slopes[i + 1]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const XS: [f64; 6] = [0.0, 0.16, 0.42, 0.64, 0.86, 1.0];
    const YS: [f64; 6] = [0.0, 32.0, 237.0, 255.0, 0.0, 0.0];

    fn curves() -> Vec<Curve> {
        vec![
            Curve::linear(&XS, &YS),
            Curve::akima(&XS, &YS),
            Curve::pchip(&XS, &YS),
        ]
    }

    #[test]
    fn every_curve_passes_through_its_knots() {
        for curve in curves() {
            for (x, y) in XS.iter().zip(YS.iter()) {
                assert_eq!(curve.at(*x), *y, "{:?} at {}", curve, x);
            }
        }
    }

    #[test]
    fn linear_is_linear() {
        let curve = Curve::linear(&[0.0, 1.0, 3.0], &[0.0, 10.0, 30.0]);
        assert!((curve.at(0.5) - 5.0).abs() < 1e-12);
        assert!((curve.at(2.0) - 20.0).abs() < 1e-12);
    }

    #[test]
    fn two_knots_degrade_to_a_line() {
        for curve in vec![
            Curve::akima(&[0.0, 1.0], &[210.0, 4.0]),
            Curve::pchip(&[0.0, 1.0], &[210.0, 4.0]),
        ] {
            assert!((curve.at(0.5) - 107.0).abs() < 1e-9);
        }
    }

    #[test]
    fn pchip_stays_within_its_neighbours() {
        let curve = Curve::pchip(&XS, &YS);
        for segment in 0..XS.len() - 1 {
            let lo = YS[segment].min(YS[segment + 1]);
            let hi = YS[segment].max(YS[segment + 1]);
            for step in 0..=50 {
                let x = XS[segment] + (XS[segment + 1] - XS[segment]) * f64::from(step) / 50.0;
                let y = curve.at(x);
                assert!(y >= lo - 1e-9 && y <= hi + 1e-9, "{} at {}", y, x);
            }
        }
    }

    #[test]
    fn pchip_is_flat_at_local_extrema() {
        assert_eq!(pchip_slopes(&XS, &YS)[3], 0.0);
    }

    #[test]
    fn akima_reproduces_a_straight_line() {
        let xs = [0.0, 0.2, 0.5, 0.7, 1.0];
        let ys: Vec<f64> = xs.iter().map(|x| 3.0 * x + 1.0).collect();
        let curve = Curve::akima(&xs, &ys);
        assert!((curve.at(0.35) - 2.05).abs() < 1e-9);
        assert!((curve.at(0.9) - 3.7).abs() < 1e-9);
    }

    #[test]
    fn akima_slopes_follow_scipy() {
        // Knots 0..4 with values 0, 1, 0, 1, 0 form a zigzag; every
        // neighbouring secant disagrees equally, so the interior
        // slopes are the plain averages, i.e. zero.
        let slopes = akima_slopes(&[0.0, 1.0, 2.0, 3.0, 4.0], &[0.0, 1.0, 0.0, 1.0, 0.0]);
        assert_eq!(&slopes[1..4], &[0.0, 0.0, 0.0]);
    }

    fn assert_curve(curve: &Curve, expected: &[(f64, f64)]) {
        for &(x, y) in expected {
            assert!((curve.at(x) - y).abs() < 1e-6, "{} at {}, wanted {}", curve.at(x), x, y);
        }
    }

    // Reference values for the red channel of the first palette, between
    // knots, as scipy's Akima1DInterpolator and PchipInterpolator give them.
    #[test]
    fn akima_between_uneven_knots() {
        let slopes = akima_slopes(&XS, &YS);
        assert!((slopes[1] - 467.381_417_178_933_4).abs() < 1e-6);
        assert!((slopes[4] - -559.788_223_140_496).abs() < 1e-6);
        assert_curve(
            &Curve::akima(&XS, &YS),
            &[
                (0.08, 4.767_756_271_805_947),
                (0.3, 140.717_947_929_154_63),
                (0.5, 267.774_980_832_187_5),
                (0.75, 132.219_396_338_762_44),
                (0.93, -19.938_339_359_504_14),
            ],
        );
    }

    #[test]
    fn pchip_between_uneven_knots() {
        let slopes = pchip_slopes(&XS, &YS);
        assert!((slopes[1] - 304.670_912_951_167_74).abs() < 1e-6);
        assert!((slopes[2] - 144.982_264_665_757_16).abs() < 1e-6);
        assert_curve(
            &Curve::pchip(&XS, &YS),
            &[
                (0.08, 9.906_581_740_976_645),
                (0.3, 150.345_286_256_490_7),
                (0.5, 247.106_412_661_448_13),
                (0.75, 127.5),
                (0.93, 0.0),
            ],
        );
    }
}
