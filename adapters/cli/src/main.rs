#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Debug command-line adapter for inspecting tile worlds.

mod report;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use tileworld_core::{
    CellBounds, Command, Event, GridPos, HeuristicKind, LevelId, Passability, PathQuery, TileCode,
};
use tileworld_rendering::{Axis, CoordinateTransform, RowOrder};
use tileworld_world::{self as world, query, World, WorldConfig};

/// Inspect and edit tile world levels.
#[derive(Parser)]
#[command(name = "tileworld", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Print the class of tile codes and which movers they block
    Classify {
        /// Codes to describe
        #[arg(required = true, allow_negative_numbers = true)]
        codes: Vec<i32>,
    },
    /// Plan a path and draw it over the level
    Path(PathArgs),
    /// List every cell holding a code
    Find {
        #[command(flatten)]
        level: LevelArgs,
        /// Code to search for
        #[arg(long, allow_negative_numbers = true)]
        code: i32,
        /// Restrict the scan to `row_lo,row_hi,col_lo,col_hi`
        #[arg(long, value_parser = report::parse_bounds)]
        bounds: Option<CellBounds>,
    },
    /// Replace one code with another and save the level
    Replace {
        #[command(flatten)]
        level: LevelArgs,
        /// Code to replace
        #[arg(long, allow_negative_numbers = true)]
        old: i32,
        /// Replacement code
        #[arg(long, allow_negative_numbers = true)]
        new: i32,
        /// Restrict the rewrite to `row_lo,row_hi,col_lo,col_hi`
        #[arg(long, value_parser = report::parse_bounds)]
        bounds: Option<CellBounds>,
        /// CSV file receiving the edited level
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Find the first ground cell at or below a cell
    Ground {
        #[command(flatten)]
        level: LevelArgs,
        /// Row the scan starts from
        #[arg(long)]
        row: u32,
        /// Column to scan
        #[arg(long)]
        col: u32,
    },
}

#[derive(Args)]
struct LevelArgs {
    /// Level manifest in TOML
    #[arg(short, long, value_name = "FILE")]
    manifest: PathBuf,
    /// Level to inspect, defaults to the manifest's start level
    #[arg(short, long)]
    level: Option<u32>,
}

#[derive(Args)]
struct PathArgs {
    #[command(flatten)]
    level: LevelArgs,
    /// Start cell as `row,col`
    #[arg(long, value_parser = report::parse_cell)]
    from: GridPos,
    /// Target cell as `row,col`
    #[arg(long, value_parser = report::parse_cell)]
    to: GridPos,
    /// Distance estimate guiding the search
    #[arg(long, value_enum, default_value = "manhattan")]
    heuristic: HeuristicArg,
    /// Heuristic weight; values above 1 trade optimality for speed
    #[arg(long, default_value_t = 1)]
    weight: i32,
    /// Allow diagonal moves
    #[arg(long)]
    diagonals: bool,
    /// Movement profile deciding which codes block
    #[arg(long, value_enum, default_value = "walker")]
    passability: PassabilityArg,
    /// Also print the normalized render coordinates of every step
    #[arg(long)]
    uv: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum HeuristicArg {
    Manhattan,
    Euclidean,
}

impl From<HeuristicArg> for HeuristicKind {
    fn from(value: HeuristicArg) -> Self {
        match value {
            HeuristicArg::Manhattan => HeuristicKind::Manhattan,
            HeuristicArg::Euclidean => HeuristicKind::Euclidean,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PassabilityArg {
    Walker,
    Piercing,
    Grounded,
}

impl From<PassabilityArg> for Passability {
    fn from(value: PassabilityArg) -> Self {
        match value {
            PassabilityArg::Walker => Passability::Walker,
            PassabilityArg::Piercing => Passability::Piercing,
            PassabilityArg::Grounded => Passability::Grounded,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Action::Classify { codes } => {
            for code in codes {
                println!("{}", report::describe(TileCode::new(code)));
            }
        }
        Action::Path(args) => plan_path(args)?,
        Action::Find {
            level,
            code,
            bounds,
        } => {
            let world = open_world(&level)?;
            let cells = query::find_all(&world, TileCode::new(code), bounds);
            print!("{}", report::list_cells(&cells));
            println!("{} match(es)", cells.len());
        }
        Action::Replace {
            level,
            old,
            new,
            bounds,
            output,
        } => {
            let mut world = open_world(&level)?;
            let mut events = Vec::new();
            world::apply(
                &mut world,
                Command::ReplaceTiles {
                    from: TileCode::new(old),
                    to: TileCode::new(new),
                    bounds,
                },
                &mut events,
            )
            .context("failed to replace tiles")?;
            let current = query::current_level(&world);
            world::export_level(&world, current, &output)
                .with_context(|| format!("failed to save level to {}", output.display()))?;

            let count = events
                .iter()
                .find_map(|event| match event {
                    Event::TilesReplaced { count, .. } => Some(*count),
                    _ => None,
                })
                .unwrap_or_default();
            println!("replaced {count} tile(s), saved {}", output.display());
        }
        Action::Ground { level, row, col } => {
            let world = open_world(&level)?;
            match query::ground_below(&world, row, col) {
                Some(ground) => println!("ground at row {ground}"),
                None => println!("no ground below ({row}, {col})"),
            }
        }
    }
    Ok(())
}

fn plan_path(args: PathArgs) -> Result<()> {
    let mut world = open_world(&args.level)?;
    let passability = Passability::from(args.passability);
    let request = PathQuery::new(args.from, args.to)
        .with_heuristic(args.heuristic.into())
        .with_weight(args.weight)
        .with_diagonals(args.diagonals)
        .with_passability(passability);

    let path = world::find_path(&mut world, &request);
    print!(
        "{}",
        report::render_path(query::tile_view(&world), passability, args.from, &path)
    );
    if path.is_empty() {
        println!("no path from {} to {}", args.from, args.to);
        return Ok(());
    }
    println!("{} step(s)", path.len());

    if args.uv {
        let transform = CoordinateTransform::new(query::dimensions(&world));
        for cell in &path {
            let u = transform.index_to_uv(Axis::Column, cell.col(), RowOrder::TopDown, 0.0);
            let v = transform.index_to_uv(Axis::Row, cell.row(), RowOrder::TopDown, 0.0);
            println!("{cell} -> ({u:.4}, {v:.4})");
        }
    }
    Ok(())
}

fn open_world(args: &LevelArgs) -> Result<World> {
    let config = WorldConfig::load(&args.manifest)
        .with_context(|| format!("failed to load manifest {}", args.manifest.display()))?;
    let mut world = World::from_config(&config).context("failed to build world")?;

    if let Some(level) = args.level {
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::SetCurrentLevel {
                level: LevelId::new(level),
            },
            &mut events,
        )
        .with_context(|| format!("cannot select level {level}"))?;
    }

    let current = query::current_level(&world);
    info!(
        "inspecting level {current} ({})",
        query::level_name(&world, current).unwrap_or_default()
    );
    Ok(world)
}
