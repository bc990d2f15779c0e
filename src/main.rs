#[cfg(test)]
mod approx_eq;
mod config;
mod metrics;
mod relativity;
mod render;
mod scene;
mod tui;

use std::path::{Path, PathBuf};

use anyhow::{Result, bail, ensure};
use clap::{Args, Parser, Subcommand};
use config::{Overrides, RenderConfig};
use log::info;
use relativity::special::{Boost, lorentz_factor};

/// Minkowski - Lorentz transformations in spacetime diagrams
#[derive(Parser)]
#[command(name = "minkowski", about = "Renders and explores the Lorentz transformation of a rocket trip between two stars")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Debug, Clone)]
struct RenderArgs {
    /// JSON file with render settings. Command line flags override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Width (in pixels) of the output.
    #[arg(long)]
    width: Option<u32>,

    /// Height (in pixels) of the output.
    #[arg(long)]
    height: Option<u32>,

    /// Frames per second of the animation.
    #[arg(long)]
    fps: Option<u32>,

    /// Rocket speed as a fraction of c, strictly between 0 and 1.
    #[arg(long)]
    rocket_speed: Option<f64>,
}

impl RenderArgs {
    fn resolve(&self) -> Result<RenderConfig> {
        RenderConfig::resolve(
            self.config.as_deref(),
            &Overrides {
                width: self.width,
                height: self.height,
                fps: self.fps,
                rocket_speed: self.rocket_speed,
            },
        )
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Render the full animation to a GIF
    Render {
        #[command(flatten)]
        args: RenderArgs,

        /// Output path of the animation
        #[arg(short, long, default_value = "lorentz.gif")]
        output: PathBuf,
    },
    /// Render a single frame of the animation to a PNG
    Frame {
        #[command(flatten)]
        args: RenderArgs,

        /// Time into the animation, in seconds
        #[arg(short, long)]
        time: f64,

        /// Output path of the image
        #[arg(short, long, default_value = "frame.png")]
        output: PathBuf,
    },
    /// Boost one event (x, ct) into a frame moving at the given velocity
    Boost {
        /// Velocity as a fraction of c
        #[arg(short, long, allow_hyphen_values = true)]
        velocity: f64,

        #[arg(allow_hyphen_values = true)]
        x: f64,

        #[arg(allow_hyphen_values = true)]
        ct: f64,
    },
    /// Sweep rocket speeds and export the trip table to CSV plus a plot
    Metrics {
        /// Number of velocity steps between 0 and 1
        #[arg(long, default_value_t = 100)]
        steps: u32,

        #[arg(long, default_value = "metrics.csv")]
        csv: PathBuf,

        #[arg(long, default_value = "plot.png")]
        plot: PathBuf,
    },
    /// Run the interactive terminal diagram
    Tui {
        #[arg(long, default_value_t = config::DEFAULT_ROCKET_SPEED)]
        rocket_speed: f64,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Render { args, output }) => {
            let config = args.resolve()?;
            let built = scene::ltf::construct(config.rocket_speed, config.frame());
            render::AnimationRenderer::new(&config).render_gif(&built.scene, &output)?;
        }
        Some(Commands::Frame { args, time, output }) => {
            let config = args.resolve()?;
            let built = scene::ltf::construct(config.rocket_speed, config.frame());
            render::AnimationRenderer::new(&config).render_png(&built.scene, time, &output)?;
        }
        Some(Commands::Boost { velocity, x, ct }) => run_boost(velocity, x, ct)?,
        Some(Commands::Metrics { steps, csv, plot }) => run_metrics(steps, &csv, &plot)?,
        Some(Commands::Tui { rocket_speed }) => run_tui(rocket_speed)?,
        None => run_tui(config::DEFAULT_ROCKET_SPEED)?, // default
    }

    Ok(())
}

fn run_boost(velocity: f64, x: f64, ct: f64) -> Result<()> {
    ensure!(
        (-1.0..=1.0).contains(&velocity),
        "velocity must be within [-1, 1] (fraction of c), got {velocity}"
    );
    let boost = Boost::new(velocity);
    let [x_prime, ct_prime, _] = boost.apply([x, ct, 0.0]);
    if !x_prime.is_finite() || !ct_prime.is_finite() {
        bail!("no inertial frame moves at {velocity}c");
    }
    if boost.is_identity() {
        println!("v = 1 is passed through unchanged");
    } else {
        println!("γ = {:.6}", lorentz_factor(velocity));
    }
    println!("x' = {x_prime:.6}");
    println!("ct' = {ct_prime:.6}");
    Ok(())
}

fn run_metrics(steps: u32, csv: &Path, plot: &Path) -> Result<()> {
    ensure!(steps >= 2, "need at least 2 steps, got {steps}");
    let table = metrics::sweep(steps);
    info!("swept {} rocket speeds", table.len());
    metrics::export_csv_file(&table, csv)?;
    metrics::plot_results(&table, plot, "Rocket trip between the stars")?;
    Ok(())
}

fn run_tui(rocket_speed: f64) -> Result<()> {
    ensure!(
        rocket_speed > 0.0 && rocket_speed < 1.0,
        "rocket speed must be strictly between 0 and 1, got {rocket_speed}"
    );
    tui::start(
        rocket_speed,
        Path::new("realtime.csv"),
        Path::new("realtime.png"),
    )
}
