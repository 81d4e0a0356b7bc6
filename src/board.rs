//! KoggeChess - Board Representation Module
//!
//! The board is an array of nine bitboards: white pieces, black pieces, all
//! pieces, then one set per piece type. The all-pieces set is never derived
//! on the fly; it must be recombined with [`Board::update_occupancy`] after
//! every bit change.

use std::fmt;

use crate::bitboard::square_bb;
use crate::error::{ChessError, ChessResult};
use crate::types::*;

/// Starting position FEN
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Chess board as nine bitboards
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    bitboards: [u64; BITBOARD_COUNT],
}

impl Board {
    /// Create a new board with the starting position
    pub fn new() -> Self {
        let mut bitboards = [0u64; BITBOARD_COUNT];

        bitboards[Color::White.index()] = 0xFFFF;
        bitboards[Color::Black.index()] = 0xFFFF << 48;
        bitboards[Piece::Pawn.index()] = (0xFF << 48) | (0xFF << 8);
        bitboards[Piece::Knight.index()] = 0x42 | (0x42 << 56);
        bitboards[Piece::Bishop.index()] = 0x24 | (0x24 << 56);
        bitboards[Piece::Rook.index()] = 0x81 | (0x81 << 56);
        bitboards[Piece::Queen.index()] = 0x08 | (0x08 << 56);
        bitboards[Piece::King.index()] = 0x10 | (0x10 << 56);

        let mut board = Board { bitboards };
        board.update_occupancy();
        board
    }

    /// Board with no pieces at all
    pub fn empty() -> Self {
        Board { bitboards: [0; BITBOARD_COUNT] }
    }

    /// Create a board from the piece placement field of a FEN string.
    ///
    /// Only the placement (everything before the first space) is read. The
    /// placement must describe exactly eight ranks of eight squares.
    pub fn from_fen(fen: &str) -> ChessResult<Self> {
        let placement = fen.split_whitespace().next().unwrap_or("");
        let mut board = Board::empty();

        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(ChessError::invalid_fen(
                fen,
                format!("expected 8 ranks, found {}", ranks.len()),
            ));
        }

        for (row, rank_text) in ranks.iter().enumerate() {
            let rank = 7 - row;
            let mut file = 0usize;

            for c in rank_text.chars() {
                if let Some(skip) = c.to_digit(10) {
                    if !(1..=8).contains(&skip) {
                        return Err(ChessError::invalid_fen(fen, format!("bad skip count '{c}'")));
                    }
                    file += skip as usize;
                } else if let Some((piece, color)) = fen_to_piece(c) {
                    if file >= 8 {
                        return Err(ChessError::invalid_fen(
                            fen,
                            format!("rank {} has more than 8 squares", rank + 1),
                        ));
                    }
                    let sq = rank * 8 + file;
                    board.set_bit(piece, sq);
                    board.set_bit(color, sq);
                    file += 1;
                } else {
                    return Err(ChessError::invalid_fen(fen, format!("unexpected character '{c}'")));
                }

                if file > 8 {
                    return Err(ChessError::invalid_fen(
                        fen,
                        format!("rank {} has more than 8 squares", rank + 1),
                    ));
                }
            }

            if file != 8 {
                return Err(ChessError::invalid_fen(
                    fen,
                    format!("rank {} has {} squares", rank + 1, file),
                ));
            }
        }

        board.update_occupancy();
        Ok(board)
    }

    /// Generate the piece placement field of a FEN string
    pub fn to_fen(&self) -> String {
        let mut fen = String::new();

        for rank in (0..8).rev() {
            let mut empty_count = 0;
            for file in 0..8 {
                match self.piece_at(rank * 8 + file) {
                    None => empty_count += 1,
                    Some((piece, color)) => {
                        if empty_count > 0 {
                            fen.push_str(&empty_count.to_string());
                            empty_count = 0;
                        }
                        fen.push(piece_to_fen(piece, color));
                    }
                }
            }
            if empty_count > 0 {
                fen.push_str(&empty_count.to_string());
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen
    }

    // ------------------------------------------------------------------
    // Bitboard access
    // ------------------------------------------------------------------

    /// The bitboard at `index` (a color, a piece type or a raw index)
    #[inline]
    pub fn get(&self, index: impl BitboardIndex) -> u64 {
        self.bitboards[index.index()]
    }

    /// Pieces of a given type and color
    #[inline]
    pub fn pieces(&self, piece: Piece, color: Color) -> u64 {
        self.bitboards[piece.index()] & self.bitboards[color.index()]
    }

    /// All occupied squares
    #[inline]
    pub fn occupied(&self) -> u64 {
        self.bitboards[Color::Any.index()]
    }

    /// King bitboard of `color`. Zero once that king has been captured.
    #[inline]
    pub fn king(&self, color: Color) -> u64 {
        self.pieces(Piece::King, color)
    }

    /// Snapshot of all nine bitboards
    #[inline]
    pub fn bitboards(&self) -> [u64; BITBOARD_COUNT] {
        self.bitboards
    }

    /// Replace one bitboard wholesale. Callers must restore the invariants
    /// themselves; the move generator uses this on private copies.
    #[inline]
    pub(crate) fn set_bitboard(&mut self, index: impl BitboardIndex, value: u64) {
        self.bitboards[index.index()] = value;
    }

    #[inline]
    pub fn test_bit(&self, index: impl BitboardIndex, sq: usize) -> bool {
        self.bitboards[index.index()] & square_bb(sq) != 0
    }

    #[inline]
    pub fn set_bit(&mut self, index: impl BitboardIndex, sq: usize) {
        self.bitboards[index.index()] |= square_bb(sq);
    }

    #[inline]
    pub fn reset_bit(&mut self, index: impl BitboardIndex, sq: usize) {
        self.bitboards[index.index()] &= !square_bb(sq);
    }

    /// Recombine the all-pieces bitboard from the two color sets
    #[inline]
    pub fn update_occupancy(&mut self) {
        self.bitboards[Color::Any.index()] =
            self.bitboards[Color::White.index()] | self.bitboards[Color::Black.index()];
    }

    /// Piece type and color on `sq`, if any
    pub fn piece_at(&self, sq: usize) -> Option<(Piece, Color)> {
        let color = if self.test_bit(Color::White, sq) {
            Color::White
        } else if self.test_bit(Color::Black, sq) {
            Color::Black
        } else {
            return None;
        };

        Piece::ALL
            .iter()
            .find(|&&piece| self.test_bit(piece, sq))
            .map(|&piece| (piece, color))
    }

    /// Piece type of `color` standing on `sq`
    pub fn piece_type_at(&self, sq: usize, color: Color) -> Option<Piece> {
        Piece::ALL
            .iter()
            .copied()
            .find(|&piece| self.pieces(piece, color) & square_bb(sq) != 0)
    }

    /// Check the structural invariants: occupancy is the union of the color
    /// sets, colors and piece types are disjoint, and every piece bit has a
    /// color bit and vice versa.
    pub fn is_consistent(&self) -> bool {
        let white = self.get(Color::White);
        let black = self.get(Color::Black);
        if self.occupied() != white | black || white & black != 0 {
            return false;
        }

        let mut union = 0u64;
        for piece in Piece::ALL {
            let bb = self.get(piece);
            if union & bb != 0 {
                return false;
            }
            union |= bb;
        }

        union == self.occupied()
    }

    // ------------------------------------------------------------------
    // Display
    // ------------------------------------------------------------------

    /// Display the board as a string
    pub fn display(&self) -> String {
        let mut lines = Vec::new();

        for rank in (0..8).rev() {
            let mut row = format!("{} ", rank + 1);
            for file in 0..8 {
                row.push(' ');
                row.push(glyph(self.piece_at(rank * 8 + file)));
            }
            lines.push(row);
        }
        lines.push("   a b c d e f g h".to_string());

        lines.join("\n")
    }
}

/// Unicode glyph for a square's contents
fn glyph(square: Option<(Piece, Color)>) -> char {
    match square {
        None => '·',
        Some((piece, Color::White)) => match piece {
            Piece::Pawn => '♙',
            Piece::Knight => '♘',
            Piece::Bishop => '♗',
            Piece::Rook => '♖',
            Piece::Queen => '♕',
            Piece::King => '♔',
        },
        Some((piece, _)) => match piece {
            Piece::Pawn => '♟',
            Piece::Knight => '♞',
            Piece::Bishop => '♝',
            Piece::Rook => '♜',
            Piece::Queen => '♛',
            Piece::King => '♚',
        },
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}
