use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use snake_game::game::{FoodPlacement, GameConfig, GameEngine, Position};
use snake_game::modes::HumanMode;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "snake_game")]
#[command(version, about = "Single-screen Snake for the terminal")]
struct Cli {
    /// JSON file with a game configuration; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Width and height of the square board. Boards of 5 or less also need
    /// --initial-food, since the default food cell (5,5) is off such a board
    #[arg(long)]
    board_size: Option<usize>,

    /// Food cell at the start of every game, as X,Y
    #[arg(long, value_name = "X,Y", value_parser = parse_position)]
    initial_food: Option<Position>,

    /// Milliseconds between two ticks
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Where new food is placed after the snake eats
    #[arg(long, value_enum)]
    food_placement: Option<Placement>,

    /// Seed for a reproducible food sequence
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (the terminal is taken by the game)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Placement {
    /// Any cell, including under the snake
    Uniform,
    /// Only cells the snake does not cover
    AvoidSnake,
}

impl From<Placement> for FoodPlacement {
    fn from(placement: Placement) -> Self {
        match placement {
            Placement::Uniform => FoodPlacement::Uniform,
            Placement::AvoidSnake => FoodPlacement::AvoidSnake,
        }
    }
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn parse_position(raw: &str) -> Result<Position, String> {
    let (x, y) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got {raw:?}"))?;
    let x = x.trim().parse::<i32>().map_err(|err| format!("bad x {x:?}: {err}"))?;
    let y = y.trim().parse::<i32>().map_err(|err| format!("bad y {y:?}: {err}"))?;
    Ok(Position::new(x, y))
}

fn build_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::from_json_file(path)?,
        None => GameConfig::default(),
    };

    if let Some(board_size) = cli.board_size {
        config.board_size = board_size;
    }
    if let Some(food) = cli.initial_food {
        config.initial_food = food;
    }
    if let Some(tick_ms) = cli.tick_ms {
        config.tick_ms = tick_ms;
    }
    if let Some(placement) = cli.food_placement {
        config.food_placement = placement.into();
    }

    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let config = build_config(&cli)?;
    tracing::debug!(?config, "Configuration loaded");

    let engine = match cli.seed {
        Some(seed) => GameEngine::with_seed(config, seed),
        None => GameEngine::new(config),
    };

    let mut human_mode = HumanMode::new(engine);
    human_mode.run().await?;

    Ok(())
}
