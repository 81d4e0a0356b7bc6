//! KoggeChess - Terminal Bitboard Chess Engine
//!
//! A small chess engine written in Rust with:
//! - Bitboard board representation (nine 64-bit sets)
//! - Set-wise move generation with Kogge-Stone occluded fills
//! - Make/unmake with undo records and legal move filtering
//! - Fixed-depth alpha-beta search with shuffled move order
//! - Material plus mobility evaluation
//! - An interactive terminal prompt
//!
//! Castling, en passant and draw rules are not implemented. The game ends
//! when a king is captured.

pub mod types;
pub mod error;
pub mod bitboard;
pub mod board;
pub mod move_generator;
pub mod evaluation;
pub mod engine;
pub mod search;
pub mod prompt;
pub mod cli;

pub use board::Board;
pub use engine::Engine;
pub use error::{ChessError, ChessResult};
pub use move_generator::MoveGenerator;
pub use types::{Color, Move, Piece};
