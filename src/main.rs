extern crate clap;
extern crate failure;
extern crate mandelzoom;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use failure::Error;
use mandelzoom::config;
use mandelzoom::{render_animation, render_image, Animation, RenderConfig, RenderError, RenderMode};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use std::str::FromStr;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

const ITERATIONS: &str = "iterations";
const SIZE: &str = "size";
const FOCUS: &str = "focus";
const VIDEO: &str = "video";
const SECONDS: &str = "seconds";
const FRAMERATE: &str = "framerate";
const ZOOM_FACTOR: &str = "zoom-factor";
const THREADS: &str = "threads";

const ANIMATION_ROOT: &str = "generated/animation";
const IMAGE_ROOT: &str = "generated/images";
const STILL_NAME: &str = "mandelbrot.png";

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

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("mandelzoom")
        .version("0.1.0")
        .about("Mandelbrot still and zoom-animation renderer")
        .arg(
            Arg::with_name(ITERATIONS)
                .required(false)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("256")
                .help("Escape-time iteration budget per point (a power of two)"),
        )
        .arg(
            Arg::with_name(SIZE)
                .required(false)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("512x512")
                .help("Size of the output image, WIDTHxHEIGHT (powers of two)"),
        )
        .arg(
            Arg::with_name(FOCUS)
                .required(false)
                .long(FOCUS)
                .short("f")
                .takes_value(true)
                .default_value("0.0,0.0")
                .help("Complex point the viewport is centered on, RE,IM"),
        )
        .arg(
            Arg::with_name(VIDEO)
                .required(false)
                .long(VIDEO)
                .help("Render a zoom animation instead of a still"),
        )
        .arg(
            Arg::with_name(SECONDS)
                .required(false)
                .long(SECONDS)
                .takes_value(true)
                .default_value("2")
                .help("Animation length in seconds"),
        )
        .arg(
            Arg::with_name(FRAMERATE)
                .required(false)
                .long(FRAMERATE)
                .takes_value(true)
                .default_value("8")
                .help("Animation frames per second"),
        )
        .arg(
            Arg::with_name(ZOOM_FACTOR)
                .required(false)
                .long(ZOOM_FACTOR)
                .takes_value(true)
                .default_value("1.0")
                .help("Seconds of animation it takes the viewport to halve"),
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
                .help("Number of worker threads (defaults to every hardware thread)"),
        )
        .get_matches()
}

fn load_config(matches: &ArgMatches) -> Result<RenderConfig, RenderError> {
    let iterations = config::parse_count("iterations", matches.value_of(ITERATIONS).unwrap())?;
    let (width, height) = config::parse_dimensions(matches.value_of(SIZE).unwrap())?;
    let focus = config::parse_focus(matches.value_of(FOCUS).unwrap())?;
    let mode = if matches.is_present(VIDEO) {
        RenderMode::Video(Animation {
            seconds: config::parse_count("seconds", matches.value_of(SECONDS).unwrap())?,
            framerate: config::parse_count("framerate", matches.value_of(FRAMERATE).unwrap())?,
            zoom_factor: config::parse_float("zoom factor", matches.value_of(ZOOM_FACTOR).unwrap())?,
        })
    } else {
        RenderMode::Image
    };
    RenderConfig::new(iterations, width, height, focus, mode)
}

fn worker_count(matches: &ArgMatches) -> usize {
    match matches.value_of(THREADS) {
        Some(s) => usize::from_str(s).expect("validator admitted a bad thread count"),
        None => num_cpus::get(),
    }
}

fn prepare_output_roots() -> io::Result<()> {
    fs::create_dir_all(ANIMATION_ROOT)?;
    fs::create_dir_all(IMAGE_ROOT)
}

fn animation_directory() -> Result<PathBuf, Error> {
    let stamp = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
    let directory = Path::new(ANIMATION_ROOT).join(stamp.to_string());
    fs::create_dir_all(&directory)?;
    Ok(directory)
}

fn run(config: &RenderConfig, workers: usize) -> Result<PathBuf, Error> {
    prepare_output_roots()?;
    match config.mode {
        RenderMode::Image => {
            let image = render_image(config, workers)?;
            image.save(STILL_NAME)?;
            Ok(PathBuf::from(STILL_NAME))
        }
        RenderMode::Video(animation) => {
            let directory = animation_directory()?;
            render_animation(config, &animation, workers, &directory)?;
            Ok(directory)
        }
    }
}

fn main() {
    let matches = args();
    let config = match load_config(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            process::exit(1);
        }
    };
    let workers = worker_count(&matches);

    println!(
        "Rendering {}x{} at {} iterations with {} workers",
        config.width, config.height, config.iterations, workers
    );
    if let RenderMode::Video(animation) = config.mode {
        println!(
            "Animation: {} frames at {} fps",
            animation.seconds * animation.framerate,
            animation.framerate
        );
    }

    let start = Instant::now();
    match run(&config, workers) {
        Err(e) => {
            eprintln!("Render failure: {}", e);
            process::exit(1);
        }
        Ok(output) => {
            println!("Rendered in {:?}", start.elapsed());
            println!("Output written to {}", output.display());
        }
    }
}
