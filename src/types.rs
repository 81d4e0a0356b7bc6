//! KoggeChess - Type definitions and constants
//!
//! This module provides the core type definitions for representing colors,
//! piece types, squares and moves. Colors and piece types double as indices
//! into the board's bitboard array.

use std::fmt;
use std::str::FromStr;

use crate::error::ChessError;

/// Number of bitboards held by a board: three color sets and six piece sets
pub const BITBOARD_COUNT: usize = 9;

/// File and rank names for coordinate notation
pub const FILE_NAMES: &[u8; 8] = b"abcdefgh";
pub const RANK_NAMES: &[u8; 8] = b"12345678";

/// Square name lookup, indexed by bit (0 = a1, 63 = h8)
pub const SQUARE_NAMES: [&str; 64] = [
    "a1", "b1", "c1", "d1", "e1", "f1", "g1", "h1",
    "a2", "b2", "c2", "d2", "e2", "f2", "g2", "h2",
    "a3", "b3", "c3", "d3", "e3", "f3", "g3", "h3",
    "a4", "b4", "c4", "d4", "e4", "f4", "g4", "h4",
    "a5", "b5", "c5", "d5", "e5", "f5", "g5", "h5",
    "a6", "b6", "c6", "d6", "e6", "f6", "g6", "h6",
    "a7", "b7", "c7", "d7", "e7", "f7", "g7", "h7",
    "a8", "b8", "c8", "d8", "e8", "f8", "g8", "h8",
];

// ============================================================================
// BITBOARD INDEXING
// ============================================================================

/// Anything that selects one of the board's bitboards
pub trait BitboardIndex: Copy {
    fn index(self) -> usize;
}

impl BitboardIndex for usize {
    #[inline]
    fn index(self) -> usize {
        self
    }
}

/// Side of a piece. `Any` selects the union of both colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    White = 0,
    Black = 1,
    Any = 2,
}

impl Color {
    /// The other side. `Any` has no opponent and maps to itself.
    #[inline]
    pub fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
            Color::Any => Color::Any,
        }
    }

    /// Parse the side-to-move field of a FEN record
    pub fn from_fen_token(token: &str) -> Option<Color> {
        match token {
            "w" => Some(Color::White),
            "b" => Some(Color::Black),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::White => "White",
            Color::Black => "Black",
            Color::Any => "Any",
        }
    }
}

impl BitboardIndex for Color {
    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Piece type. Discriminants continue after the color sets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Piece {
    Pawn = 3,
    Knight = 4,
    Bishop = 5,
    Rook = 6,
    Queen = 7,
    King = 8,
}

impl Piece {
    /// Piece types in bitboard order
    pub const ALL: [Piece; 6] = [
        Piece::Pawn,
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
        Piece::King,
    ];

    /// Promotion targets, in the order promotions are generated
    pub const PROMOTIONS: [Piece; 4] = [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen];

    /// Lowercase letter, as used in FEN for black and as promotion suffix
    pub fn to_char(self) -> char {
        match self {
            Piece::Pawn => 'p',
            Piece::Knight => 'n',
            Piece::Bishop => 'b',
            Piece::Rook => 'r',
            Piece::Queen => 'q',
            Piece::King => 'k',
        }
    }

    /// Prefix used in move notation. Pawns have none.
    pub fn notation_letter(self) -> Option<char> {
        match self {
            Piece::Pawn => None,
            other => Some(other.to_char().to_ascii_uppercase()),
        }
    }

    /// Parse a promotion suffix (`n`, `b`, `r`, `q`)
    pub fn from_promotion_char(c: char) -> Option<Piece> {
        match c {
            'n' => Some(Piece::Knight),
            'b' => Some(Piece::Bishop),
            'r' => Some(Piece::Rook),
            'q' => Some(Piece::Queen),
            _ => None,
        }
    }
}

impl BitboardIndex for Piece {
    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// FEN piece character to piece type and color. Uppercase is white.
pub fn fen_to_piece(c: char) -> Option<(Piece, Color)> {
    let piece = match c.to_ascii_lowercase() {
        'p' => Piece::Pawn,
        'n' => Piece::Knight,
        'b' => Piece::Bishop,
        'r' => Piece::Rook,
        'q' => Piece::Queen,
        'k' => Piece::King,
        _ => return None,
    };
    let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
    Some((piece, color))
}

/// Piece type and color to FEN character
pub fn piece_to_fen(piece: Piece, color: Color) -> char {
    match color {
        Color::White => piece.to_char().to_ascii_uppercase(),
        _ => piece.to_char(),
    }
}

// ============================================================================
// SQUARES
// ============================================================================

/// Convert square index (0-63) to algebraic notation (e.g., "e4")
#[inline]
pub fn square_name(sq: usize) -> &'static str {
    SQUARE_NAMES[sq]
}

/// Convert algebraic notation to square index
pub fn parse_square(name: &str) -> Option<usize> {
    let bytes = name.as_bytes();
    if bytes.len() != 2 {
        return None;
    }

    let file = FILE_NAMES.iter().position(|&f| f == bytes[0])?;
    let rank = RANK_NAMES.iter().position(|&r| r == bytes[1])?;

    Some(rank * 8 + file)
}

// ============================================================================
// MOVES
// ============================================================================

/// A move in coordinate form
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: usize,
    pub to: usize,
    pub promotion: Option<Piece>,
}

impl Move {
    /// Create a new move
    pub fn new(from: usize, to: usize) -> Self {
        Move { from, to, promotion: None }
    }

    /// Create a promotion move
    pub fn with_promotion(from: usize, to: usize, promotion: Piece) -> Self {
        Move { from, to, promotion: Some(promotion) }
    }

    /// Convert move to coordinate notation (e.g., "e2e4", "e7e8q")
    pub fn to_coordinate(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", square_name(self.from), square_name(self.to))?;
        if let Some(promotion) = self.promotion {
            write!(f, "{}", promotion.to_char())?;
        }
        Ok(())
    }
}

/// Parses both bare coordinates (`e7e8q`) and the annotated form written to
/// the move history (`12. Qd1xd7+`). Move numbers, piece letters, capture
/// and check markers are dropped.
impl FromStr for Move {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ChessError::InvalidNotation(s.to_string());

        // "<n>. " prefix
        let body = s.trim().rsplit(' ').next().ok_or_else(invalid)?;
        let body = body.strip_suffix('+').unwrap_or(body);
        let body = body.trim_start_matches(|c: char| "NBRQK".contains(c));
        let coords: String = body.chars().filter(|&c| c != 'x').collect();

        if !coords.is_ascii() || !(4..=5).contains(&coords.len()) {
            return Err(invalid());
        }

        let from = parse_square(&coords[0..2]).ok_or_else(invalid)?;
        let to = parse_square(&coords[2..4]).ok_or_else(invalid)?;
        let promotion = match coords[4..].chars().next() {
            Some(c) => Some(Piece::from_promotion_char(c).ok_or_else(invalid)?),
            None => None,
        };

        Ok(Move { from, to, promotion })
    }
}
