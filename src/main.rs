//! KoggeChess - Terminal Chess Engine
//!
//! Usage:
//!     koggechess [--play-as-black] [--pvp] [--verbose] [--level N] [--fen FEN] [--seed N]
//!
//! Plays a game against the user on stdin/stdout. Type `help` at the prompt
//! for the list of commands. Set `RUST_LOG` to see engine logs.

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use koggechess::cli::Args;
use koggechess::prompt::Prompt;

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let engine = args.build_engine().context("could not set up the starting position")?;

    println!();
    println!("{}", engine.board().display());
    println!();

    let mut prompt = Prompt::new(engine);
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    prompt.run(stdin.lock(), &mut stdout)?;

    Ok(())
}
