//! hazard - command-line front end for the hazard-nav planner.
//!
//! - `hazard plan` - weight a semantic map file and search one path
//! - `hazard simulate` - walk the scripted world to a target
//! - `hazard init` - write a default configuration

use std::path::{Path as FsPath, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use hazard_nav::{
    render, GridCoord, NavConfig, ObjectId, Planner, ReplanMode, ScriptedWorld, SemanticGrid,
    SemanticLayers, Vec3, WalkStatus, WalkTarget, WalkTo, DEFAULT_CONFIG_YAML,
};

#[derive(Parser)]
#[command(name = "hazard")]
#[command(about = "Semantic-map path planning for embodied agents", version)]
struct Cli {
    /// Configuration file
    #[arg(short, long, global = true, default_value = "hazard.yaml")]
    config: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan one path over a semantic map file
    Plan {
        /// Semantic map JSON with `explored`, `height` and `id` layers
        #[arg(long)]
        map: PathBuf,

        /// Origin cell as ROW,COL
        #[arg(long, value_parser = parse_coord)]
        origin: GridCoord,

        /// Destination cell as ROW,COL
        #[arg(long, value_parser = parse_coord)]
        destination: GridCoord,

        /// Draw the map with the path overlaid
        #[arg(long)]
        render: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Walk the scripted world to a target
    Simulate {
        /// ASCII layout: `.` floor, `#` wall, `A` agent, `1`-`9` objects
        #[arg(long)]
        layout: PathBuf,

        /// Object id, or a world point as X,Z
        #[arg(long, value_parser = parse_target)]
        target: WalkTarget,

        /// Follow each plan for up to K steps instead of replanning every step
        #[arg(long)]
        commit: Option<u32>,

        /// Start unexplored and reveal cells within this radius
        #[arg(long)]
        sensing_radius: Option<u32>,

        /// Print the walk report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a default configuration file
    Init {
        /// Where to write the configuration
        #[arg(long, default_value = "hazard.yaml")]
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    if cli.log_json {
        fmt().json().with_env_filter(filter).with_target(false).init();
    } else {
        fmt().with_env_filter(filter).with_target(false).init();
    }

    match cli.command {
        Commands::Init { path } => init_config(&path),
        Commands::Plan {
            map,
            origin,
            destination,
            render,
            json,
        } => {
            let config = NavConfig::load_or_default(&cli.config)?;
            plan(&config, &map, origin, destination, render, json)
        }
        Commands::Simulate {
            layout,
            target,
            commit,
            sensing_radius,
            json,
        } => {
            let mut config = NavConfig::load_or_default(&cli.config)?;
            if let Some(steps) = commit {
                config.walk.replan = ReplanMode::Commit { steps };
                config.validate()?;
            }
            simulate(&config, &layout, target, sensing_radius, json)
        }
    }
}

fn parse_coord(s: &str) -> std::result::Result<GridCoord, String> {
    let (row, col) = s
        .split_once(',')
        .ok_or_else(|| format!("expected ROW,COL, got {s:?}"))?;
    let row = row.trim().parse().map_err(|e| format!("bad row {row:?}: {e}"))?;
    let col = col.trim().parse().map_err(|e| format!("bad column {col:?}: {e}"))?;
    Ok(GridCoord::new(row, col))
}

fn parse_target(s: &str) -> std::result::Result<WalkTarget, String> {
    if let Some((x, z)) = s.split_once(',') {
        let x = x.trim().parse().map_err(|e| format!("bad x {x:?}: {e}"))?;
        let z = z.trim().parse().map_err(|e| format!("bad z {z:?}: {e}"))?;
        return Ok(WalkTarget::Point(Vec3::planar(x, z)));
    }
    s.trim()
        .parse()
        .map(|id| WalkTarget::Object(ObjectId(id)))
        .map_err(|e| format!("expected an object id or X,Z, got {s:?}: {e}"))
}

fn load_map(path: &FsPath) -> Result<SemanticGrid> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read semantic map from {}", path.display()))?;
    let layers: SemanticLayers = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse semantic map from {}", path.display()))?;
    SemanticGrid::try_from(layers)
        .with_context(|| format!("Invalid semantic map in {}", path.display()))
}

fn plan(
    config: &NavConfig,
    map: &FsPath,
    origin: GridCoord,
    destination: GridCoord,
    draw: bool,
    json: bool,
) -> Result<()> {
    let grid = load_map(map)?;
    tracing::info!(map = %map.display(), rows = grid.rows(), cols = grid.cols(), %origin, %destination, "Planning");

    let planner = Planner::from_config(config);
    let out = planner.plan_detailed(&grid, origin, destination)?;

    if json {
        let value = serde_json::json!({
            "origin": origin,
            "destination": destination,
            "found": out.path.is_some(),
            "cost": out.cost(),
            "path": &out.path,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        match &out.path {
            Some(path) => {
                println!(
                    "Path: {} cells, cost {:.3}",
                    path.len(),
                    out.cost().unwrap_or_default()
                );
                match path.next_step() {
                    Some(next) => println!("Next step: {next}"),
                    None => println!("Already at destination"),
                }
            }
            None => println!("No path from {origin} to {destination}"),
        }
    }

    if draw {
        print!("{}", render::ascii(&grid, out.path.as_ref(), &config.weights));
    }
    Ok(())
}

fn simulate(
    config: &NavConfig,
    layout: &FsPath,
    target: WalkTarget,
    sensing_radius: Option<u32>,
    json: bool,
) -> Result<()> {
    let text = std::fs::read_to_string(layout)
        .with_context(|| format!("Failed to read layout from {}", layout.display()))?;
    let mut world = ScriptedWorld::from_layout(&text, config.frame)
        .with_context(|| format!("Invalid layout in {}", layout.display()))?;
    if let Some(radius) = sensing_radius {
        world = world.with_sensing_radius(radius);
    }

    tracing::info!(layout = %layout.display(), ?target, replan = ?config.walk.replan, "Starting walk");
    let report = WalkTo::new(target, config.walk, Planner::from_config(config)).run(&mut world);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for step in &report.steps {
            println!(
                "[{:>4}] {} -> {} ({:?}{})",
                step.frame,
                step.origin,
                step.next,
                step.status,
                if step.replanned { ", replanned" } else { "" }
            );
        }
        println!();
        match &report.outcome {
            WalkStatus::Success => println!("Arrived after {} frames", report.frames),
            WalkStatus::Failure(reason) => println!("Failed after {} frames: {reason}", report.frames),
            WalkStatus::Running => bail!("walk stopped while still running"),
        }
    }
    Ok(())
}

fn init_config(path: &FsPath) -> Result<()> {
    if path.exists() {
        bail!("{} already exists", path.display());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, DEFAULT_CONFIG_YAML)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    println!("Wrote default configuration to {}", path.display());
    Ok(())
}
