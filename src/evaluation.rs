//! KoggeChess - Position Evaluation Module
//!
//! Static evaluation from the point of view of one side:
//! - Material balance
//! - Mobility (pseudo-legal move count difference)
//!
//! There are no piece-square tables. The king carries a large weight so that
//! a captured king dominates every other term.

use crate::bitboard::popcount;
use crate::board::Board;
use crate::move_generator::MoveGenerator;
use crate::types::*;

// ============================================================================
// PIECE VALUES
// ============================================================================

pub const PAWN_VALUE: i32 = 1;
pub const KNIGHT_VALUE: i32 = 3;
pub const BISHOP_VALUE: i32 = 3;
pub const ROOK_VALUE: i32 = 5;
pub const QUEEN_VALUE: i32 = 9;
pub const KING_VALUE: i32 = 200;

/// Mobility is worth a tenth of a pawn per move
const MOBILITY_DIVISOR: i32 = 10;

/// Material weight of a piece type
#[inline]
pub fn piece_value(piece: Piece) -> i32 {
    match piece {
        Piece::Pawn => PAWN_VALUE,
        Piece::Knight => KNIGHT_VALUE,
        Piece::Bishop => BISHOP_VALUE,
        Piece::Rook => ROOK_VALUE,
        Piece::Queen => QUEEN_VALUE,
        Piece::King => KING_VALUE,
    }
}

/// Material of `color` minus material of its opponent
pub fn material_balance(board: &Board, color: Color) -> i32 {
    let enemy = color.opponent();

    Piece::ALL
        .iter()
        .map(|&piece| {
            let own = popcount(board.pieces(piece, color)) as i32;
            let theirs = popcount(board.pieces(piece, enemy)) as i32;
            piece_value(piece) * (own - theirs)
        })
        .sum()
}

/// Pseudo-legal move count of `color` minus that of its opponent
pub fn mobility_balance(board: &Board, color: Color) -> i32 {
    let own = MoveGenerator::pseudo_legal_moves(board, color).len() as i32;
    let theirs = MoveGenerator::pseudo_legal_moves(board, color.opponent()).len() as i32;
    own - theirs
}

/// Evaluate the position for `color`. Positive scores favor `color`.
///
/// The mobility term is the move difference divided by ten, truncated toward
/// zero, so `evaluate(b, White) == -evaluate(b, Black)` always holds.
pub fn evaluate(board: &Board, color: Color) -> i32 {
    debug_assert!(color != Color::Any, "evaluation needs a side");

    material_balance(board, color) + mobility_balance(board, color) / MOBILITY_DIVISOR
}
