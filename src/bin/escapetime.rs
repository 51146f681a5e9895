// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate clap;
extern crate env_logger;
extern crate escapetime;
extern crate failure;
extern crate image;
#[macro_use]
extern crate log;
extern crate num;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use escapetime::{render, ColorMode, Interpolation, Pixel, RenderOptions, ZoomAction, RESOLUTIONS};
use failure::Error;
use image::ColorType;
use num::Complex;
use std::str::FromStr;

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn parse_complex(s: &str) -> Option<Complex<f64>> {
    match parse_pair(s, ',') {
        Some((re, im)) => Some(Complex { re, im }),
        None => None,
    }
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_parse<T>(s: &str) -> Result<(), String>
where
    T: FromStr,
    T::Err: ToString,
{
    T::from_str(s).map(|_| ()).map_err(|e| e.to_string())
}

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

fn parse_action(s: &str) -> Option<ZoomAction> {
    match s {
        "in" => Some(ZoomAction::In),
        "center" => Some(ZoomAction::Recenter),
        "out" => Some(ZoomAction::Out),
        _ => None,
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const PRESET: &str = "preset";
const LEFTLOWER: &str = "leftlower";
const RIGHTUPPER: &str = "rightupper";
const THREADS: &str = "threads";
const ITERATIONS: &str = "iterations";
const ESCAPE: &str = "escape-radius-sq";
const PALETTE: &str = "palette";
const INTERPOLATION: &str = "interpolation";
const COLOR_MODE: &str = "color-mode";
const COLORS: &str = "colors";
const JULIA: &str = "julia";
const CLICK: &str = "click";
const ACTION: &str = "action";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("escapetime")
        .version("0.1.0")
        .about("Mandelbrot and Julia set renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file (PNG)"),
        )
        .arg(
            Arg::with_name(SIZE)
                .required(false)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .validator(|s| validate_pair::<u16>(&s, 'x', "Could not parse output image size"))
                .help("Size of output image (default 1280x960)"),
        )
        .arg(
            Arg::with_name(PRESET)
                .required(false)
                .long(PRESET)
                .takes_value(true)
                .validator(|s| {
                    validate_range(
                        &s,
                        0,
                        RESOLUTIONS.len() - 1,
                        "Could not parse preset",
                        "Preset must be between 0 and 5",
                    )
                })
                .help("Preset resolution, overriding --size: 0=1280x960 1=1440x1080 2=1920x1440 3=1280x720 4=1600x900 5=1920x1080"),
        )
        .arg(
            Arg::with_name(LEFTLOWER)
                .required(false)
                .long(LEFTLOWER)
                .short("l")
                .takes_value(true)
                .allow_hyphen_values(true)
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse left lower corner"))
                .help("Left lower corner of the complex region (defaults depend on the fractal)"),
        )
        .arg(
            Arg::with_name(RIGHTUPPER)
                .required(false)
                .long(RIGHTUPPER)
                .short("r")
                .takes_value(true)
                .allow_hyphen_values(true)
                .requires(LEFTLOWER)
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse right upper corner"))
                .help("Right upper corner of the complex region"),
        )
        .arg(
            Arg::with_name(THREADS)
                .required(false)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of threads to use in solver (defaults to one per core)"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .required(false)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("100")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        10_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 10000",
                    )
                })
                .help("Maximum iterations per point"),
        )
        .arg(
            Arg::with_name(ESCAPE)
                .required(false)
                .long(ESCAPE)
                .takes_value(true)
                .validator(|s| validate_parse::<f64>(&s))
                .help("Squared escape radius (defaults to 100 for the Mandelbrot, 10 for Julia sets)"),
        )
        .arg(
            Arg::with_name(PALETTE)
                .required(false)
                .long(PALETTE)
                .short("p")
                .takes_value(true)
                .default_value("0")
                .validator(|s| {
                    validate_range(
                        &s,
                        0,
                        escapetime::PALETTES.len() - 1,
                        "Could not parse palette id",
                        "Palette id must be between 0 and 4",
                    )
                })
                .help("Palette id"),
        )
        .arg(
            Arg::with_name(INTERPOLATION)
                .required(false)
                .long(INTERPOLATION)
                .takes_value(true)
                .default_value("pchip")
                .validator(|s| validate_parse::<Interpolation>(&s))
                .help("Palette interpolation: linear, akima or pchip"),
        )
        .arg(
            Arg::with_name(COLOR_MODE)
                .required(false)
                .long(COLOR_MODE)
                .takes_value(true)
                .default_value("smoothed")
                .validator(|s| validate_parse::<ColorMode>(&s))
                .help("Color by the discrete or the smoothed iteration count"),
        )
        .arg(
            Arg::with_name(COLORS)
                .required(false)
                .long(COLORS)
                .short("c")
                .takes_value(true)
                .default_value("4000")
                .validator(|s| validate_parse::<usize>(&s))
                .help("Number of colors in the color table"),
        )
        .arg(
            Arg::with_name(JULIA)
                .required(false)
                .long(JULIA)
                .short("j")
                .takes_value(true)
                .allow_hyphen_values(true)
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse Julia constant"))
                .help("Render the Julia set for this constant instead of the Mandelbrot"),
        )
        .arg(
            Arg::with_name(CLICK)
                .required(false)
                .long(CLICK)
                .takes_value(true)
                .validator(|s| validate_pair::<usize>(&s, ',', "Could not parse clicked pixel"))
                .help("Pixel to zoom around before rendering"),
        )
        .arg(
            Arg::with_name(ACTION)
                .required(false)
                .long(ACTION)
                .takes_value(true)
                .requires(CLICK)
                .possible_values(&["in", "center", "out"])
                .help("What the click does (default: in)"),
        )
        .get_matches()
}

fn options(matches: &ArgMatches) -> Result<RenderOptions, Error> {
    let resolution = match matches.value_of(PRESET) {
        Some(preset) => RESOLUTIONS[usize::from_str(preset)?],
        None => parse_pair(matches.value_of(SIZE).unwrap_or("1280x960"), 'x')
            .ok_or_else(|| failure::err_msg("Error parsing image dimensions"))?,
    };

    let bounds = match (matches.value_of(LEFTLOWER), matches.value_of(RIGHTUPPER)) {
        (Some(leftlower), Some(rightupper)) => Some((
            parse_complex(leftlower).ok_or_else(|| failure::err_msg("Error parsing left lower point"))?,
            parse_complex(rightupper).ok_or_else(|| failure::err_msg("Error parsing right upper point"))?,
        )),
        (None, None) => None,
        _ => return Err(failure::err_msg("--leftlower and --rightupper go together")),
    };

    let julia_constant = match matches.value_of(JULIA) {
        Some(julia) => Some(parse_complex(julia).ok_or_else(|| failure::err_msg("Error parsing Julia constant"))?),
        None => None,
    };

    let escape_radius_sq = match matches.value_of(ESCAPE) {
        Some(escape) => Some(f64::from_str(escape)?),
        None => None,
    };

    Ok(RenderOptions {
        resolution,
        max_iter: u32::from_str(matches.value_of(ITERATIONS).unwrap_or("100"))?,
        escape_radius_sq,
        palette_id: usize::from_str(matches.value_of(PALETTE).unwrap_or("0"))?,
        interpolation: Interpolation::from_str(matches.value_of(INTERPOLATION).unwrap_or("pchip"))?,
        color_mode: ColorMode::from_str(matches.value_of(COLOR_MODE).unwrap_or("smoothed"))?,
        table_size: usize::from_str(matches.value_of(COLORS).unwrap_or("4000"))?,
        julia_constant,
        bounds,
        threads: match matches.value_of(THREADS) {
            Some(threads) => usize::from_str(threads)?,
            None => num_cpus::get(),
        },
    })
}

/// Apply the click, if there was one, by moving the bounds before the
/// real render.
fn clicked(matches: &ArgMatches, options: RenderOptions) -> Result<RenderOptions, Error> {
    let pixel = match matches.value_of(CLICK) {
        Some(click) => parse_pair::<usize>(click, ',')
            .map(|(px, py)| Pixel(px, py))
            .ok_or_else(|| failure::err_msg("Error parsing clicked pixel"))?,
        None => return Ok(options),
    };
    let action = parse_action(matches.value_of(ACTION).unwrap_or("in"))
        .ok_or_else(|| failure::err_msg("Unknown click action"))?;
    let zoomed = options.fractal()?.click(&pixel, action)?;
    let viewport = zoomed.viewport();
    info!(
        "{:?} at {:?}: now looking at {} .. {}",
        action,
        pixel,
        viewport.leftlower(),
        viewport.rightupper()
    );
    Ok(RenderOptions {
        bounds: Some((viewport.leftlower(), viewport.rightupper())),
        ..options
    })
}

fn write_image(outfile: &str, pixels: Vec<u8>, bounds: (usize, usize)) -> Result<(), Error> {
    image::save_buffer(
        outfile,
        &pixels,
        bounds.0 as u32,
        bounds.1 as u32,
        ColorType::RGB(8),
    )?;
    Ok(())
}

fn run() -> Result<(), Error> {
    let matches = args();
    let options = clicked(&matches, options(&matches)?)?;
    info!(
        "rendering {}x{} with {} iterations, palette {} ({}, {}), {} colors",
        options.resolution.0,
        options.resolution.1,
        options.max_iter,
        options.palette_id,
        options.interpolation,
        options.color_mode,
        options.table_size
    );
    let (fractal, buffer) = render(&options)?;
    debug!("rendered {:?}", fractal.kind());
    let bounds = (buffer.width(), buffer.height());
    write_image(
        matches.value_of(OUTPUT).unwrap_or("fractal.png"),
        buffer.into_bytes(),
        bounds,
    )
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
