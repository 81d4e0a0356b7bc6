//! KoggeChess - Game Engine Module
//!
//! Owns the live board and the turn state around it:
//! - Applying and taking back moves through a stack of undo records
//! - Legal move filtering (pseudo-legal moves that keep the king safe)
//! - Move notation for the game log
//! - Perft node counting
//!
//! Game over is signalled by a captured king, there is no mate detection.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::board::Board;
use crate::error::{ChessError, ChessResult};
use crate::move_generator::MoveGenerator;
use crate::search::SearchStats;
use crate::types::*;

/// Search depth used when nothing else is configured
pub const DEFAULT_DEPTH: u32 = 3;

/// Everything needed to reverse one applied move exactly
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UndoRecord {
    pub mv: Move,
    /// Side that made the move
    pub color: Color,
    /// Piece type that left the origin square
    pub moved: Piece,
    pub captured: Option<Piece>,
    /// Piece type placed on the destination when a pawn promoted
    pub promoted: Option<Piece>,
    /// Game log text, only filled in for moves made through [`Engine::make_move`]
    pub notation: Option<String>,
}

impl UndoRecord {
    /// Piece type standing on the destination after the move
    #[inline]
    fn placed(&self) -> Piece {
        self.promoted.unwrap_or(self.moved)
    }
}

/// The game engine: board, side to move, history and search settings
pub struct Engine {
    pub(crate) board: Board,
    pub(crate) to_move: Color,
    pub(crate) engine_color: Color,
    pub(crate) ply: usize,
    pub(crate) history: Vec<UndoRecord>,
    pub(crate) depth: u32,
    pub(crate) verbose: bool,
    pub(crate) pvp: bool,
    /// Only used to shuffle move order in the search
    pub(crate) rng: StdRng,
    pub(crate) last_search: Option<SearchStats>,
}

impl Engine {
    /// Engine on the standard starting position. `color` is the side the
    /// engine plays. Without a seed the move ordering RNG is seeded from
    /// the OS.
    pub fn new(color: Color, depth: u32, verbose: bool, pvp: bool, seed: Option<u64>) -> Self {
        Self::with_board(Board::new(), Color::White, color, depth, verbose, pvp, seed)
    }

    /// Engine on a position given in FEN.
    ///
    /// The placement and side-to-move fields are read; castling, en passant
    /// and the clocks are accepted but ignored. A missing side-to-move field
    /// means white.
    pub fn new_from_fen(
        fen: &str,
        color: Color,
        depth: u32,
        verbose: bool,
        pvp: bool,
        seed: Option<u64>,
    ) -> ChessResult<Self> {
        let board = Board::from_fen(fen)?;

        let to_move = match fen.split_whitespace().nth(1) {
            None => Color::White,
            Some(token) => Color::from_fen_token(token)
                .ok_or_else(|| ChessError::invalid_fen(fen, format!("bad side to move '{token}'")))?,
        };

        Ok(Self::with_board(board, to_move, color, depth, verbose, pvp, seed))
    }

    fn with_board(
        board: Board,
        to_move: Color,
        engine_color: Color,
        depth: u32,
        verbose: bool,
        pvp: bool,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Engine {
            board,
            to_move,
            engine_color,
            ply: 0,
            history: Vec::new(),
            depth: depth.max(1),
            verbose,
            pvp,
            rng,
            last_search: None,
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn to_move(&self) -> Color {
        self.to_move
    }

    /// Side the automated player controls
    #[inline]
    pub fn engine_color(&self) -> Color {
        self.engine_color
    }

    /// Number of moves applied so far
    #[inline]
    pub fn ply(&self) -> usize {
        self.ply
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Change the search depth. Zero is ignored.
    pub fn set_depth(&mut self, depth: u32) {
        if depth == 0 {
            warn!("Ignoring search depth 0, keeping {}", self.depth);
            return;
        }
        self.depth = depth;
    }

    #[inline]
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    #[inline]
    pub fn is_pvp(&self) -> bool {
        self.pvp
    }

    /// True when the automated player should move now
    pub fn engine_to_move(&self) -> bool {
        !self.pvp && self.engine_color == self.to_move
    }

    #[inline]
    pub fn king_bitboard(&self, color: Color) -> u64 {
        self.board.king(color)
    }

    /// Statistics of the most recent search, if any
    #[inline]
    pub fn last_search(&self) -> Option<SearchStats> {
        self.last_search
    }

    /// Notation of every move in the game, oldest first
    pub fn move_history(&self) -> Vec<&str> {
        self.history
            .iter()
            .filter_map(|record| record.notation.as_deref())
            .collect()
    }

    /// Placement and side-to-move fields of the current position
    pub fn fen(&self) -> String {
        let side = if self.to_move == Color::Black { 'b' } else { 'w' };
        format!("{} {}", self.board.to_fen(), side)
    }

    pub fn print_board(&self) {
        println!();
        println!("{}", self.board.display());
        println!();
    }

    /// The side whose opponent has lost its king
    pub fn winner(&self) -> Option<Color> {
        if self.board.king(Color::White) == 0 {
            Some(Color::Black)
        } else if self.board.king(Color::Black) == 0 {
            Some(Color::White)
        } else {
            None
        }
    }

    /// Is the king of `color` attacked by an enemy bishop, rook, knight,
    /// pawn or queen? The enemy king is not considered.
    pub fn is_in_check(&self, color: Color) -> bool {
        self.board.king(color) & MoveGenerator::attacked_by(&self.board, color.opponent()) != 0
    }

    // ========================================================================
    // MAKE / UNMAKE
    // ========================================================================

    /// Play a move for the side to move and return its notation.
    ///
    /// Accepts coordinate notation (`e2e4`, `a7a8n`) and the annotated form
    /// produced by this function (`3. Nb1xc3+`). With `verify` the move must
    /// be legal. On error the position is unchanged.
    pub fn make_move(&mut self, notation: &str, verify: bool, verbose: bool) -> ChessResult<String> {
        let mut mv: Move = notation.parse()?;

        // A pawn reaching the last rank without a promotion letter becomes a queen
        if mv.promotion.is_none()
            && is_last_rank(mv.to, self.to_move)
            && self.board.piece_type_at(mv.from, self.to_move) == Some(Piece::Pawn)
        {
            mv.promotion = Some(Piece::Queen);
        }

        if verify && !self.legal_move_list(self.to_move).contains(&mv) {
            warn!("Rejected illegal move {}", notation);
            return Err(ChessError::IllegalMove(notation.trim().to_string()));
        }

        let color = self.to_move;
        let mut record = self.apply(mv, color)?;
        let text = self.format_notation(&record);
        record.notation = Some(text.clone());

        self.history.push(record);
        self.ply += 1;
        self.to_move = color.opponent();

        if verbose {
            info!("{}", text);
        }
        debug!(ply = self.ply, "Played {}", text);

        Ok(text)
    }

    /// Take back the last move. Returns false when there is nothing to undo.
    pub fn take_move(&mut self) -> bool {
        let Some(record) = self.history.pop() else {
            return false;
        };

        self.undo(&record);
        self.ply -= 1;
        self.to_move = record.color;

        debug!(ply = self.ply, "Took back {}", record.mv);
        true
    }

    /// Take back every move of the game
    pub fn restart(&mut self) {
        while self.take_move() {}
    }

    /// Apply `mv` for `color` to the board only. Turn state and history are
    /// left alone, which is what the search and the legality filter want.
    pub(crate) fn apply(&mut self, mv: Move, color: Color) -> ChessResult<UndoRecord> {
        let enemy = color.opponent();

        let moved = self
            .board
            .piece_type_at(mv.from, color)
            .ok_or_else(|| ChessError::EmptySquare(square_name(mv.from).to_string()))?;

        if self.board.test_bit(color, mv.to) {
            return Err(ChessError::IllegalMove(mv.to_string()));
        }

        let captured = self.board.piece_type_at(mv.to, enemy);
        let promoted = (moved == Piece::Pawn && is_last_rank(mv.to, color))
            .then(|| mv.promotion.unwrap_or(Piece::Queen));

        let record = UndoRecord {
            mv,
            color,
            moved,
            captured,
            promoted,
            notation: None,
        };

        if let Some(piece) = captured {
            self.board.reset_bit(piece, mv.to);
            self.board.reset_bit(enemy, mv.to);
        }

        self.board.reset_bit(moved, mv.from);
        self.board.reset_bit(color, mv.from);
        self.board.set_bit(record.placed(), mv.to);
        self.board.set_bit(color, mv.to);
        self.board.update_occupancy();

        debug_assert!(self.board.is_consistent(), "board broken after {mv}");
        Ok(record)
    }

    /// Reverse a record produced by [`Engine::apply`]
    pub(crate) fn undo(&mut self, record: &UndoRecord) {
        let mv = record.mv;

        self.board.reset_bit(record.placed(), mv.to);
        self.board.reset_bit(record.color, mv.to);
        self.board.set_bit(record.moved, mv.from);
        self.board.set_bit(record.color, mv.from);

        if let Some(piece) = record.captured {
            let enemy = record.color.opponent();
            self.board.set_bit(piece, mv.to);
            self.board.set_bit(enemy, mv.to);
        }

        self.board.update_occupancy();

        debug_assert!(self.board.is_consistent(), "board broken undoing {mv}");
    }

    /// Game log text for a freshly applied move: move number before white's
    /// moves, piece letter, `x` on captures, promotion letter, `+` on check.
    fn format_notation(&self, record: &UndoRecord) -> String {
        let mut text = String::new();

        if self.ply % 2 == 0 {
            text.push_str(&format!("{}. ", self.ply / 2 + 1));
        }
        if let Some(letter) = record.moved.notation_letter() {
            text.push(letter);
        }
        text.push_str(square_name(record.mv.from));
        if record.captured.is_some() {
            text.push('x');
        }
        text.push_str(square_name(record.mv.to));
        if let Some(piece) = record.promoted {
            text.push(piece.to_char());
        }
        if self.is_in_check(record.color.opponent()) {
            text.push('+');
        }

        text
    }

    // ========================================================================
    // LEGAL MOVES
    // ========================================================================

    /// Legal moves of the side to move in coordinate notation
    pub fn legal_moves(&mut self) -> Vec<String> {
        self.legal_move_list(self.to_move)
            .iter()
            .map(Move::to_coordinate)
            .collect()
    }

    /// Pseudo-legal moves of `color` that do not leave its king attacked
    pub(crate) fn legal_move_list(&mut self, color: Color) -> Vec<Move> {
        let candidates = MoveGenerator::pseudo_legal_moves(&self.board, color);
        let mut legal = Vec::with_capacity(candidates.len());

        for mv in candidates {
            let Ok(record) = self.apply(mv, color) else {
                continue;
            };
            let safe = !self.is_in_check(color);
            self.undo(&record);

            if safe {
                legal.push(mv);
            }
        }

        legal
    }

    // ========================================================================
    // PERFT
    // ========================================================================

    /// Count the leaves of the legal move tree `depth` plies deep
    pub fn perft(&mut self, depth: u32) -> u64 {
        let color = self.to_move;
        self.perft_from(depth, color)
    }

    fn perft_from(&mut self, depth: u32, color: Color) -> u64 {
        if depth == 0 {
            return 1;
        }

        let moves = self.legal_move_list(color);
        if depth == 1 {
            return moves.len() as u64;
        }

        let mut nodes = 0u64;
        for mv in moves {
            let Ok(record) = self.apply(mv, color) else {
                continue;
            };
            nodes += self.perft_from(depth - 1, color.opponent());
            self.undo(&record);
        }

        nodes
    }
}

/// Is `sq` on the rank where pawns of `color` promote?
#[inline]
fn is_last_rank(sq: usize, color: Color) -> bool {
    match color {
        Color::White => sq >= 56,
        Color::Black => sq < 8,
        Color::Any => sq >= 56 || sq < 8,
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new(Color::Black, DEFAULT_DEPTH, false, false, None)
    }
}
