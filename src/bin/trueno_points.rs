//! trueno-points: headless 3D point cloud viewer.
//!
//! Loads points from a CSV file or samples `z = f(x, y)`, then renders one
//! frame to a PNG file or the terminal.
//!
//! Run: `trueno-points --function "sin(x) * cos(y)" --rotate-x 0.5 --output plot.png`

#![cfg_attr(test, allow(clippy::unwrap_used))]

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use std::path::PathBuf;

use trueno_points::config::Config;
use trueno_points::debug;
use trueno_points::expr::FunctionEvaluator;
use trueno_points::framebuffer::Framebuffer;
use trueno_points::geometry::{distance, manhattan_distance, PointCloud};
use trueno_points::io::{load_csv, save_csv};
use trueno_points::output::{PngEncoder, TerminalEncoder, TerminalMode};
use trueno_points::sampler::{default_cloud, demo_cloud, sample, SampleGrid};
use trueno_points::scene::Viewport;
use trueno_points::viewer::Viewer;

/// trueno-points: software-rasterized 3D point cloud viewer
#[derive(Parser, Debug)]
#[command(name = "trueno-points")]
#[command(author = "PAIML Team")]
#[command(version)]
#[command(about = "Render 3D point clouds and sampled functions without a GPU", long_about = None)]
#[command(group(ArgGroup::new("source").args(["csv", "generate", "function"])))]
struct Cli {
    /// Path to CSV file with 3D points
    #[arg(long, value_name = "PATH")]
    csv: Option<PathBuf>,

    /// Write a sample CSV file to PATH and exit
    #[arg(long, value_name = "PATH")]
    generate: Option<PathBuf>,

    /// Function to visualize, e.g. "sin(x) * cos(y)"
    #[arg(long, value_name = "EXPR", allow_hyphen_values = true)]
    function: Option<String>,

    /// Minimum x value for function sampling [default: -5]
    #[arg(long, allow_hyphen_values = true)]
    xmin: Option<f64>,

    /// Maximum x value for function sampling [default: 5]
    #[arg(long, allow_hyphen_values = true)]
    xmax: Option<f64>,

    /// Minimum y value for function sampling [default: -5]
    #[arg(long, allow_hyphen_values = true)]
    ymin: Option<f64>,

    /// Maximum y value for function sampling [default: 5]
    #[arg(long, allow_hyphen_values = true)]
    ymax: Option<f64>,

    /// Grid step for function sampling [default: 0.2]
    #[arg(long)]
    step: Option<f64>,

    /// Write the rendered frame to a PNG file
    #[arg(short, long, value_name = "PNG")]
    output: Option<PathBuf>,

    /// Print a preview to the terminal (default without --output)
    #[arg(long)]
    terminal: bool,

    /// Plain ASCII preview instead of ANSI colors
    #[arg(long)]
    ascii: bool,

    /// Light-on-dark preview for dark terminals
    #[arg(long)]
    invert: bool,

    /// Spread the ASCII ramp over the frame's own brightness range
    #[arg(long)]
    stretch: bool,

    /// Terminal preview width in characters
    #[arg(long, default_value_t = TerminalEncoder::DEFAULT_COLUMNS)]
    columns: u32,

    /// Frame width in pixels [default: 800]
    #[arg(long)]
    width: Option<u32>,

    /// Frame height in pixels [default: 600]
    #[arg(long)]
    height: Option<u32>,

    /// Rotation around the x axis in radians
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    rotate_x: f64,

    /// Rotation around the y axis in radians
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    rotate_y: f64,

    /// Rotation around the z axis in radians
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    rotate_z: f64,

    /// Pixels per world unit, clamped to [5, 500] [default: 50]
    #[arg(long)]
    zoom: Option<f64>,

    /// Config file path
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log to stderr (also TRUENO_POINTS_DEBUG=1)
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        debug::enable();
    } else {
        debug::enable_from_env();
    }
    log::debug!("SIMD backend: {:?}", Framebuffer::backend());

    let config = load_config(&cli)?;

    if let Some(path) = &cli.generate {
        println!("Generating sample CSV file at {}", path.display());
        save_csv(path, &demo_cloud())
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Sample CSV file generated successfully");
        return Ok(());
    }

    let cloud = build_cloud(&cli, &config)?;
    render(&cli, &config, cloud)
}

fn load_config(cli: &Cli) -> Result<Config> {
    match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(Config::default_path()
            .map(Config::load_or_default)
            .unwrap_or_default()),
    }
}

fn build_cloud(cli: &Cli, config: &Config) -> Result<PointCloud> {
    if let Some(text) = &cli.function {
        let s = &config.sampling;
        let grid = SampleGrid::new(
            cli.xmin.unwrap_or(s.x_min),
            cli.xmax.unwrap_or(s.x_max),
            cli.ymin.unwrap_or(s.y_min),
            cli.ymax.unwrap_or(s.y_max),
            cli.step.unwrap_or(s.step),
        )?;

        let evaluator = FunctionEvaluator::new(text.as_str());
        if let Some(err) = evaluator.parse_error() {
            return Err(trueno_points::Error::from(err.clone()))
                .with_context(|| format!("invalid function '{text}'"));
        }

        println!("Generating points from function: {text}");
        println!(
            "Range: x=[{:.2}, {:.2}], y=[{:.2}, {:.2}], step={:.2}",
            grid.x_min(),
            grid.x_max(),
            grid.y_min(),
            grid.y_max(),
            grid.step()
        );
        let cloud = {
            let _timing = debug::TimingGuard::new("sample");
            sample(&evaluator, &grid)
        };
        println!("Generated {} points from function", cloud.len());
        return Ok(cloud);
    }

    if let Some(path) = &cli.csv {
        println!("Loading points from CSV file: {}", path.display());
        let cloud =
            load_csv(path).with_context(|| format!("failed to load {}", path.display()))?;
        println!("Loaded {} points from CSV", cloud.len());
        return Ok(cloud);
    }

    println!("No function or CSV file specified, using default points");
    let cloud = default_cloud();
    if let [p1, p2, p3] = cloud.points() {
        println!("Distance p1 to p2: {:.2}", distance(*p1, *p2));
        println!("Distance p2 to p3: {:.2}", p2.distance_to(*p3));
        println!("Manhattan distance p1 to p3: {:.2}", manhattan_distance(*p1, *p3));
    }
    Ok(cloud)
}

fn render(cli: &Cli, config: &Config, cloud: PointCloud) -> Result<()> {
    let viewport = Viewport::new(
        cli.width.unwrap_or(config.viewport.width),
        cli.height.unwrap_or(config.viewport.height),
    );

    let mut viewer = Viewer::with_style(cloud, config.scene_style());
    let projection = viewer.projection_mut();
    projection.set_rotation(cli.rotate_x, cli.rotate_y, cli.rotate_z);
    if let Some(zoom) = cli.zoom {
        projection.set_scale(zoom);
    }

    let frame = {
        let _timing = debug::TimingGuard::new("render");
        viewer.render(viewport)?
    };

    if let Some(path) = &cli.output {
        PngEncoder::write_to_file(&frame, path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Wrote {}x{} frame to {}", frame.width(), frame.height(), path.display());
    }

    if cli.terminal || cli.output.is_none() {
        let mode = if cli.ascii {
            TerminalMode::Ascii
        } else {
            TerminalMode::HalfBlock
        };
        print!(
            "{}",
            TerminalEncoder::new()
                .mode(mode)
                .columns(cli.columns)
                .invert(cli.invert)
                .stretch(cli.stretch)
                .render(&frame)
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_source_modes_are_exclusive() {
        let result = Cli::try_parse_from(["trueno-points", "--csv", "a.csv", "--function", "x"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_negative_values_parse() {
        let cli = Cli::try_parse_from([
            "trueno-points",
            "--function",
            "-x * y",
            "--xmin",
            "-2.5",
            "--rotate-y",
            "-0.3",
        ])
        .unwrap();
        assert_eq!(cli.function.as_deref(), Some("-x * y"));
        assert_eq!(cli.xmin, Some(-2.5));
        assert_eq!(cli.rotate_y, -0.3);
    }

    #[test]
    fn test_sampling_falls_back_to_config() {
        let cli = Cli::try_parse_from(["trueno-points", "--function", "x + y", "--step", "1"])
            .unwrap();
        let mut config = Config::default();
        config.sampling.x_min = 0.0;
        config.sampling.x_max = 1.0;
        config.sampling.y_min = 0.0;
        config.sampling.y_max = 1.0;

        let cloud = build_cloud(&cli, &config).unwrap();
        assert_eq!(cloud.len(), 4);
    }

    #[test]
    fn test_bad_function_is_fatal() {
        let cli = Cli::try_parse_from(["trueno-points", "--function", "x +"]).unwrap();
        let err = build_cloud(&cli, &Config::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<trueno_points::Error>(),
            Some(trueno_points::Error::Eval(_))
        ));
        assert!(err.to_string().contains("invalid function 'x +'"));
    }

    #[test]
    fn test_preview_flags() {
        let args = ["trueno-points", "--ascii", "--invert", "--stretch"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(cli.ascii && cli.invert && cli.stretch);

        let cli = Cli::try_parse_from(["trueno-points"]).unwrap();
        assert!(!cli.invert && !cli.stretch);
    }

    #[test]
    fn test_default_cloud_without_source() {
        let cli = Cli::try_parse_from(["trueno-points"]).unwrap();
        assert_eq!(build_cloud(&cli, &Config::default()).unwrap().len(), 3);
    }
}
