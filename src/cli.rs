//! Command line arguments

use clap::Parser;

use crate::engine::{Engine, DEFAULT_DEPTH};
use crate::error::ChessResult;
use crate::types::Color;

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(about = "KoggeChess: a terminal bitboard chess engine", author, version)]
pub struct Args {
    /// Play the black pieces (the engine takes white)
    #[arg(long)]
    pub play_as_black: bool,

    /// Player versus player, the engine never moves on its own
    #[arg(short, long)]
    pub pvp: bool,

    /// Report search results and played moves
    #[arg(short, long)]
    pub verbose: bool,

    /// Search depth in plies
    #[arg(
        short,
        long,
        value_name = "DEPTH",
        default_value_t = DEFAULT_DEPTH,
        value_parser = clap::value_parser!(u32).range(1..=10)
    )]
    pub level: u32,

    /// Start from this position instead of the initial one
    #[arg(short, long, value_name = "FEN")]
    pub fen: Option<String>,

    /// Seed for the move ordering RNG
    #[arg(short, long)]
    pub seed: Option<u64>,
}

impl Args {
    /// Side the engine plays
    pub fn engine_color(&self) -> Color {
        if self.play_as_black {
            Color::White
        } else {
            Color::Black
        }
    }

    pub fn build_engine(&self) -> ChessResult<Engine> {
        let color = self.engine_color();

        match &self.fen {
            Some(fen) => Engine::new_from_fen(fen, color, self.level, self.verbose, self.pvp, self.seed),
            None => Ok(Engine::new(color, self.level, self.verbose, self.pvp, self.seed)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("koggechess").chain(args.iter().copied()))
    }

    #[test]
    fn command_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.level, 3);
        assert!(!args.pvp);
        assert!(!args.verbose);
        assert_eq!(args.engine_color(), Color::Black);

        let engine = args.build_engine().unwrap();
        assert_eq!(engine.depth(), 3);
        assert_eq!(engine.to_move(), Color::White);
    }

    #[test]
    fn flags_reach_the_engine() {
        let args = parse(&["--play-as-black", "-p", "-v", "-l", "5", "-s", "17"]).unwrap();
        assert_eq!(args.engine_color(), Color::White);
        assert_eq!(args.seed, Some(17));

        let engine = args.build_engine().unwrap();
        assert_eq!(engine.engine_color(), Color::White);
        assert_eq!(engine.depth(), 5);
        assert!(engine.is_pvp());
        assert!(engine.is_verbose());
    }

    #[test]
    fn level_is_bounded() {
        assert!(parse(&["--level", "0"]).is_err());
        assert!(parse(&["--level", "11"]).is_err());
        assert!(parse(&["--level", "10"]).is_ok());
    }

    #[test]
    fn fen_position_is_loaded() {
        let args = parse(&["--fen", "4k3/8/8/8/8/8/8/4K3 b - - 0 1"]).unwrap();
        let engine = args.build_engine().unwrap();
        assert_eq!(engine.to_move(), Color::Black);
        assert_eq!(engine.board().to_fen(), "4k3/8/8/8/8/8/8/4K3");

        let args = parse(&["--fen", "not a fen"]).unwrap();
        assert!(args.build_engine().is_err());
    }
}
