//! Doorway: explore a dungeon one room at a time
//!
//! Each invocation loads the session from the data directory, runs one
//! action, writes the rendered map as a PNG and saves the session again.
//! `play` keeps sessions in memory and reads actions from stdin.

mod commands;
mod config;
mod play;

use std::io;
use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};

use dw_core::{DEFAULT_HEIGHT, DEFAULT_SEED, DEFAULT_WIDTH, Scale, SessionId, SessionOptions, SessionStore};

use crate::commands::Context;
use crate::config::Config;

const DEFAULT_SESSION: &str = "default";

/// Doorway - explore the dungeon one room at a time
#[derive(Parser, Debug)]
#[command(name = "doorway")]
#[command(author, version, about = "Doorway - explore the dungeon one room at a time", long_about = None)]
struct Args {
    /// Directory for save files and rendered maps
    #[arg(long = "data-dir", global = true)]
    data_dir: Option<PathBuf>,

    /// Session id (one saved game per id)
    #[arg(short = 's', long = "session", global = true)]
    session: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start a new game, replacing the session's saved one
    New {
        #[command(flatten)]
        game: GameArgs,

        /// Output PNG (default: <data-dir>/<session>.png)
        #[arg(short = 'o', long = "out")]
        out: Option<PathBuf>,
    },

    /// Show the map around the current room
    Map {
        #[arg(short = 'o', long = "out")]
        out: Option<PathBuf>,
    },

    /// Move through a connection of the current room
    Move {
        /// Connection number shown on the map
        index: usize,

        #[arg(short = 'o', long = "out")]
        out: Option<PathBuf>,
    },

    /// Mark every room visited (debugging)
    Reveal {
        #[arg(short = 'o', long = "out")]
        out: Option<PathBuf>,
    },

    /// Interactive loop on stdin
    Play {
        #[command(flatten)]
        game: GameArgs,
    },

    /// List saved sessions
    Saves,

    /// Delete the session's save file
    Delete,
}

/// Parameters for newly created games
#[derive(clap::Args, Debug)]
struct GameArgs {
    /// Map seed
    #[arg(long = "seed", default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Map width in cells
    #[arg(long = "width", default_value_t = DEFAULT_WIDTH)]
    width: u32,

    /// Map height in cells
    #[arg(long = "height", default_value_t = DEFAULT_HEIGHT)]
    height: u32,

    /// Pixels per cell in rendered maps
    #[arg(long = "scale", value_parser = clap::value_parser!(u32).range(1..))]
    scale: Option<u32>,

    /// Seed for room-kind dice (random if omitted)
    #[arg(long = "dice-seed")]
    dice_seed: Option<u64>,
}

impl GameArgs {
    fn options(&self, config: &Config) -> SessionOptions {
        let scale = self
            .scale
            .and_then(Scale::new)
            .or(config.scale)
            .unwrap_or_default();
        SessionOptions {
            width: self.width,
            height: self.height,
            seed: self.seed,
            scale,
            dice_seed: self.dice_seed,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging();

    let config = Config::from_env();
    let data_dir = args
        .data_dir
        .clone()
        .or_else(|| config.data_dir.clone())
        .unwrap_or_else(dw_save::default_save_dir);
    let session = args
        .session
        .clone()
        .or_else(|| config.session.clone())
        .unwrap_or_else(|| DEFAULT_SESSION.to_string());
    let ctx = Context::new(data_dir, SessionId::new(session));

    let mut store = SessionStore::new();
    let (report, out) = match args.command {
        Command::New { game, out } => {
            let report = commands::new_game(&mut store, &ctx, game.options(&config))?;
            (report, out)
        }
        Command::Map { out } => (commands::show_map(&mut store, &ctx)?, out),
        Command::Move { index, out } => (commands::move_to(&mut store, &ctx, index)?, out),
        Command::Reveal { out } => (commands::reveal(&mut store, &ctx)?, out),
        Command::Play { game } => {
            let stdin = io::stdin();
            return play::run(
                &mut store,
                ctx,
                game.options(&config),
                stdin.lock(),
                io::stdout(),
            );
        }
        Command::Saves => {
            for line in commands::saves(&ctx.data_dir)? {
                println!("{line}");
            }
            return Ok(());
        }
        Command::Delete => {
            commands::delete(&mut store, &ctx)?;
            println!("deleted {}", ctx.save_path().display());
            return Ok(());
        }
    };

    println!("{report}");
    let path = commands::write_frame(&store, &ctx, out.as_deref())
        .context("failed to write map")?;
    println!("map: {}", path.display());
    Ok(())
}

/// Log to stderr, filtered by `RUST_LOG` (default: info)
fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();
}
