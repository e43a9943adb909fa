//! Command line front end: render a scene file to an image, sample
//! its volume on a grid, or probe a single ray.

// std
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
// others
use clap::{Parser, Subcommand, ValueEnum};
use log::{error, info, LevelFilter};
// sqtrace
use rs_sqtrace::core::error::Result;
use rs_sqtrace::core::film::Film;
use rs_sqtrace::core::geometry::{Point3f, Ray, Vector3f};
use rs_sqtrace::core::parser::load_scene;
use rs_sqtrace::core::sqtrace::Float;
use rs_sqtrace::integrators::iotest::{inside_points, Grid};
use rs_sqtrace::integrators::{render, RenderOptions};
use rs_sqtrace::shapes::superquadric::SolverSettings;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Ray trace superquadric scenes.
#[derive(Parser)]
#[command(name = "rs_sqtrace", version = VERSION)]
struct Cli {
    /// logging level, RUST_LOG is honored as well
    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,
    /// Newton's method convergence threshold
    #[arg(long, default_value_t = 1e-6)]
    epsilon: Float,
    /// Newton's method iteration cap
    #[arg(long, default_value_t = 10_000)]
    max_iterations: u32,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a scene to an image file
    Render {
        /// scene description file
        scene: PathBuf,
        #[arg(long, default_value_t = 500)]
        xres: u32,
        #[arg(long, default_value_t = 500)]
        yres: u32,
        /// output image, the format follows from the extension
        #[arg(short, long, default_value = "rt.png")]
        output: PathBuf,
        /// use specified number of threads for rendering (0 = all cores)
        #[arg(short = 't', long, default_value_t = 0)]
        nthreads: usize,
        #[arg(long, default_value_t = 16)]
        tile_size: u32,
        /// do not show a progress bar
        #[arg(long)]
        no_progress: bool,
    },
    /// Write grid points lying inside the scene, one "x y z" per line
    Iotest {
        scene: PathBuf,
        #[arg(long, default_value_t = -10.0, allow_negative_numbers = true)]
        min: Float,
        #[arg(long, default_value_t = 10.0)]
        max: Float,
        #[arg(long, default_value_t = 0.5)]
        step: Float,
        /// output file, stdout if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the closest intersection along one world space ray
    Probe {
        scene: PathBuf,
        #[arg(long, num_args = 3, default_values_t = [0.0, 0.0, -5.0], allow_negative_numbers = true)]
        origin: Vec<Float>,
        #[arg(long, num_args = 3, default_values_t = [0.0, 0.0, 1.0], allow_negative_numbers = true)]
        direction: Vec<Float>,
    },
}

fn init_logger(level: LevelFilter) {
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let solver = SolverSettings {
        epsilon: cli.epsilon,
        max_iterations: cli.max_iterations,
    };
    match cli.command {
        Command::Render {
            scene,
            xres,
            yres,
            output,
            nthreads,
            tile_size,
            no_progress,
        } => {
            let scene = load_scene(&scene, &solver)?;
            let mut film = Film::new(xres, yres);
            let options = RenderOptions {
                nthreads,
                tile_size,
                progress: !no_progress,
            };
            let abort = AtomicBool::new(false);
            let stats = render(&scene, &mut film, &options, &abort)?;
            info!("Writing image {:?} ...", output);
            film.write_image(&output)?;
            info!("{:?}", stats);
        }
        Command::Iotest {
            scene,
            min,
            max,
            step,
            output,
        } => {
            let scene = load_scene(&scene, &solver)?;
            let points = inside_points(&scene, &Grid { min, max, step })?;
            info!("{} grid point(s) inside the scene", points.len());
            match output {
                Some(path) => write_points(&points, File::create(&path)?)?,
                None => write_points(&points, std::io::stdout().lock())?,
            }
        }
        Command::Probe {
            scene,
            origin,
            direction,
        } => {
            let scene = load_scene(&scene, &solver)?;
            let ray = Ray::new(
                Point3f::new(origin[0], origin[1], origin[2]),
                Vector3f::new(direction[0], direction[1], direction[2]),
            );
            let (t, isect) = scene.closest_intersection(&ray);
            if isect.is_hit() {
                let p = isect.p();
                let n = isect.n();
                println!("t = {}", t);
                println!("position = ({}, {}, {})", p.x, p.y, p.z);
                println!("normal = ({}, {}, {})", n.x, n.y, n.z);
            } else {
                println!("no intersection");
            }
        }
    }
    Ok(())
}

fn write_points<W: Write>(points: &[Point3f], out: W) -> Result<()> {
    let mut out = BufWriter::new(out);
    for p in points {
        writeln!(out, "{} {} {}", p.x, p.y, p.z)?;
    }
    out.flush()?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.log_level.clone().into());
    info!("rs_sqtrace version {}", VERSION);
    if let Err(err) = run(cli) {
        error!("{}", err);
        std::process::exit(1);
    }
}
