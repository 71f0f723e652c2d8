//! Glide CLI
//!
//! Command-line tool for trying out easings, tweens and spline paths
//! without a host application.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use glide_animation::{Easing, LoopType, SharedTarget, Spline, SplineKind, TweenScheduler};
use glide_core::Vec3;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;

use config::GlideConfig;

#[derive(Parser)]
#[command(name = "glide")]
#[command(author, version = env!("CARGO_PKG_VERSION"), about = "Glide tweening toolkit", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to ./glide.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scalar tween on a fixed clock and print every frame
    Simulate {
        /// Start value
        #[arg(long, default_value = "0")]
        from: f32,

        /// End value
        #[arg(long, default_value = "1")]
        to: f32,

        /// Duration in seconds
        #[arg(short, long, default_value = "1")]
        duration: f32,

        /// Easing name, e.g. "quad-out" or "cubic-bezier(0.25, 0.1, 0.25, 1)"
        #[arg(short, long)]
        ease: Option<String>,

        /// Frames per second (overrides config)
        #[arg(long)]
        fps: Option<u32>,

        /// Delay before the first frame moves, in seconds
        #[arg(long, default_value = "0")]
        delay: f32,

        /// Loop mode
        #[arg(long, value_enum, default_value = "none")]
        loop_type: LoopArg,

        /// Extra cycles after the first; -1 loops forever
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        loops: i32,

        /// Play from the end value back to the start
        #[arg(long)]
        reverse: bool,
    },

    /// Sample a spline through the given control points
    Path {
        /// Control points as "x,y" or "x,y,z"
        #[arg(required = true, num_args = 2.., allow_hyphen_values = true)]
        points: Vec<String>,

        /// Number of evenly spaced samples to print
        #[arg(short, long, default_value = "11")]
        samples: usize,

        /// Straight segments instead of Catmull-Rom
        #[arg(long)]
        linear: bool,
    },

    /// List the named easings with sample values
    Eases {
        /// Sample points per curve, including both ends
        #[arg(short, long, default_value = "5")]
        samples: usize,
    },

    /// Print the effective configuration as TOML
    Config,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LoopArg {
    None,
    Restart,
    PingPong,
}

impl From<LoopArg> for LoopType {
    fn from(arg: LoopArg) -> Self {
        match arg {
            LoopArg::None => LoopType::None,
            LoopArg::Restart => LoopType::Restart,
            LoopArg::PingPong => LoopType::PingPong,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = GlideConfig::load(cli.config.as_deref())?;
    debug!(?config, "configuration loaded");

    match cli.command {
        Commands::Simulate {
            from,
            to,
            duration,
            ease,
            fps,
            delay,
            loop_type,
            loops,
            reverse,
        } => cmd_simulate(
            &config,
            SimulateArgs {
                from,
                to,
                duration,
                ease,
                fps,
                delay,
                loop_type: loop_type.into(),
                loops,
                reverse,
            },
        ),
        Commands::Path {
            points,
            samples,
            linear,
        } => cmd_path(&config, &points, samples, linear),
        Commands::Eases { samples } => cmd_eases(samples),
        Commands::Config => cmd_config(&config),
    }
}

struct SimulateArgs {
    from: f32,
    to: f32,
    duration: f32,
    ease: Option<String>,
    fps: Option<u32>,
    delay: f32,
    loop_type: LoopType,
    loops: i32,
    reverse: bool,
}

fn cmd_simulate(config: &GlideConfig, args: SimulateArgs) -> Result<()> {
    let fps = args.fps.unwrap_or(config.simulate.fps);
    if fps == 0 {
        bail!("fps must be greater than zero");
    }
    let easing = match args.ease.as_deref() {
        Some(name) => name
            .parse::<Easing>()
            .with_context(|| format!("Invalid easing '{}'", name))?,
        None => config.scheduler.default_ease,
    };

    info!(
        "Simulating {} -> {} over {}s with {} at {} fps",
        args.from, args.to, args.duration, easing, fps
    );

    let (from, to) = if args.reverse {
        (args.to, args.from)
    } else {
        (args.from, args.to)
    };

    let value = Rc::new(RefCell::new(from));
    let mut scheduler = TweenScheduler::with_config(config.scheduler.clone());
    scheduler
        .tween(SharedTarget::new(Rc::clone(&value)), from, to, args.duration)
        .ease(easing)
        .delay(args.delay)
        .loops(args.loop_type, args.loops, 0.0)
        .start()?;

    let dt = 1.0 / fps as f32;
    let mut frame = 0u32;
    println!("{:>6}  {:>9}  {:>12}", "frame", "time", "value");
    while scheduler.active_count() > 0 {
        if frame >= config.simulate.max_frames {
            warn!(
                "Stopped after {} frames; the tween is still running",
                config.simulate.max_frames
            );
            break;
        }
        scheduler.advance(dt);
        frame += 1;
        println!(
            "{:>6}  {:>9.4}  {:>12.6}",
            frame,
            frame as f32 * dt,
            *value.borrow()
        );
    }

    info!("Finished after {} frames", frame);
    Ok(())
}

fn cmd_path(config: &GlideConfig, points: &[String], samples: usize, linear: bool) -> Result<()> {
    let points = points
        .iter()
        .map(|p| parse_point(p))
        .collect::<Result<Vec<_>>>()?;
    if samples < 2 {
        bail!("at least 2 samples are needed");
    }

    let spline = if linear {
        Spline::straight(points)?
    } else {
        Spline::with_resolution(points, config.scheduler.path_resolution)?
    };

    let kind = match spline.kind() {
        SplineKind::CatmullRom => "catmull-rom",
        SplineKind::Linear => "linear",
    };
    info!(
        "{} path through {} points, length {:.4}",
        kind,
        spline.control_points().len(),
        spline.length()
    );

    println!("{:>7}  {:>10}  {:>10}  {:>10}", "t", "x", "y", "z");
    for i in 0..samples {
        let t = i as f32 / (samples - 1) as f32;
        let p = spline.point_on_path(t);
        println!("{:>7.3}  {:>10.4}  {:>10.4}  {:>10.4}", t, p.x, p.y, p.z);
    }
    Ok(())
}

fn cmd_eases(samples: usize) -> Result<()> {
    if samples < 2 {
        bail!("at least 2 samples are needed");
    }
    let ts: Vec<f32> = (0..samples)
        .map(|i| i as f32 / (samples - 1) as f32)
        .collect();

    print!("{:<18}", "easing");
    for t in &ts {
        print!("{:>9.3}", t);
    }
    println!();

    for easing in Easing::ALL {
        if matches!(easing, Easing::CubicBezier(..)) {
            continue;
        }
        print!("{:<18}", easing.to_string());
        for t in &ts {
            print!("{:>9.4}", easing.apply(*t));
        }
        if easing.is_overshooting() {
            print!("  (overshoots)");
        }
        println!();
    }
    Ok(())
}

fn cmd_config(config: &GlideConfig) -> Result<()> {
    print!("{}", config.to_toml()?);
    Ok(())
}

/// Parse "x,y" or "x,y,z"
fn parse_point(s: &str) -> Result<Vec3> {
    let parts = s
        .split(',')
        .map(|c| c.trim().parse::<f32>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .with_context(|| format!("Invalid point '{}'", s))?;
    match parts[..] {
        [x, y] => Ok(Vec3::new(x, y, 0.0)),
        [x, y, z] => Ok(Vec3::new(x, y, z)),
        _ => bail!("Invalid point '{}': expected 2 or 3 components", s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point("1,2").unwrap(), Vec3::new(1.0, 2.0, 0.0));
        assert_eq!(parse_point(" -1.5, 2 ,3").unwrap(), Vec3::new(-1.5, 2.0, 3.0));
        assert!(parse_point("1").is_err());
        assert!(parse_point("1,a").is_err());
        assert!(parse_point("1,2,3,4").is_err());
    }

    #[test]
    fn test_cli_parses_simulate() {
        let cli = Cli::try_parse_from([
            "glide", "simulate", "--to", "10", "--ease", "quad-out", "--loop-type", "ping-pong",
            "--loops", "-1",
        ])
        .unwrap();
        match cli.command {
            Commands::Simulate {
                to,
                ease,
                loop_type,
                loops,
                ..
            } => {
                assert_eq!(to, 10.0);
                assert_eq!(ease.as_deref(), Some("quad-out"));
                assert!(matches!(loop_type, LoopArg::PingPong));
                assert_eq!(loops, -1);
            }
            _ => panic!("expected simulate"),
        }
    }

    #[test]
    fn test_cli_path_needs_two_points() {
        assert!(Cli::try_parse_from(["glide", "path", "0,0"]).is_err());
        assert!(Cli::try_parse_from(["glide", "path", "0,0", "1,1"]).is_ok());
    }
}
