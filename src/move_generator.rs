//! KoggeChess - Move Generator Module
//!
//! Pseudo-legal move generation over bitboards. Every generator works on a
//! whole set of pieces at once and returns a destination bitboard; sliding
//! pieces use Kogge-Stone occluded fills. Nothing here checks whether the
//! mover's king is left in check, see [`crate::engine::Engine::legal_moves`].
//!
//! All generators take `Color::Any` as well, answering with the union of
//! both sides.

use crate::bitboard::*;
use crate::board::Board;
use crate::types::*;

/// Squares on which a pawn promotes
const PROMOTION_RANKS: u64 = RANK_1 | RANK_8;

/// Move generator for chess positions. Stateless; all functions are pure.
pub struct MoveGenerator;

impl MoveGenerator {
    // ========================================================================
    // NON-SLIDING PIECES
    // ========================================================================

    /// Pushes, double pushes from the home rank and captures for the pawns of `color`
    pub fn pawn_moves(board: &Board, color: Color) -> u64 {
        let empty = !board.occupied();

        match color {
            Color::White => {
                let pawns = board.pieces(Piece::Pawn, Color::White);

                let attacks = (shift_north_east(pawns) | shift_north_west(pawns)) & board.get(Color::Black);
                let single = shift_north(pawns) & empty;
                // Only pawns that just left rank 2 may step again
                let double = shift_north(single & RANK_3) & empty;

                attacks | single | double
            }
            Color::Black => {
                let pawns = board.pieces(Piece::Pawn, Color::Black);

                let attacks = (shift_south_east(pawns) | shift_south_west(pawns)) & board.get(Color::White);
                let single = shift_south(pawns) & empty;
                let double = shift_south(single & RANK_6) & empty;

                attacks | single | double
            }
            Color::Any => Self::pawn_moves(board, Color::White) | Self::pawn_moves(board, Color::Black),
        }
    }

    /// Knight jumps, built from pairs of one-step shifts
    pub fn knight_moves(board: &Board, color: Color) -> u64 {
        if color == Color::Any {
            return Self::knight_moves(board, Color::White) | Self::knight_moves(board, Color::Black);
        }

        let knights = board.pieces(Piece::Knight, color);

        let west_west_north = shift_north_west(shift_west(knights));
        let west_north_north = shift_north_west(shift_north(knights));
        let east_north_north = shift_north_east(shift_north(knights));
        let east_east_north = shift_north_east(shift_east(knights));

        let east_east_south = shift_south_east(shift_east(knights));
        let east_south_south = shift_south_east(shift_south(knights));
        let west_south_south = shift_south_west(shift_south(knights));
        let west_west_south = shift_south_west(shift_west(knights));

        let moves = west_west_north
            | west_north_north
            | east_north_north
            | east_east_north
            | east_east_south
            | east_south_south
            | west_south_south
            | west_west_south;

        moves & !board.get(color)
    }

    /// One step in every direction. No castling.
    pub fn king_moves(board: &Board, color: Color) -> u64 {
        if color == Color::Any {
            return Self::king_moves(board, Color::White) | Self::king_moves(board, Color::Black);
        }

        let king = board.pieces(Piece::King, color);

        let moves = shift_north(king)
            | shift_north_east(king)
            | shift_east(king)
            | shift_south_east(king)
            | shift_south(king)
            | shift_south_west(king)
            | shift_west(king)
            | shift_north_west(king);

        moves & !board.get(color)
    }

    // ========================================================================
    // SLIDING PIECES
    // ========================================================================

    /// Diagonal slides for the `piece` set of `color`. Pass `Piece::Queen` to
    /// get the diagonal half of the queen moves.
    pub fn bishop_moves(board: &Board, color: Color, piece: Piece) -> u64 {
        if color == Color::Any {
            return Self::bishop_moves(board, Color::White, piece)
                | Self::bishop_moves(board, Color::Black, piece);
        }

        let sliders = board.pieces(piece, color);
        let empty = !board.occupied();

        let north_east = north_east_occluded(sliders, empty);
        let south_east = south_east_occluded(sliders, empty);
        let north_west = north_west_occluded(sliders, empty);
        let south_west = south_west_occluded(sliders, empty);

        // One step past the fill lands on the blocker
        let attacks = (shift_north_east(north_east)
            | shift_south_east(south_east)
            | shift_north_west(north_west)
            | shift_south_west(south_west))
            & !board.get(color);

        // The fill still contains the sliders' own squares
        let moves = (north_east | south_east | north_west | south_west) & !board.get(piece);

        moves | attacks
    }

    /// Orthogonal slides for the `piece` set of `color`. Pass `Piece::Queen`
    /// to get the orthogonal half of the queen moves.
    pub fn rook_moves(board: &Board, color: Color, piece: Piece) -> u64 {
        if color == Color::Any {
            return Self::rook_moves(board, Color::White, piece) | Self::rook_moves(board, Color::Black, piece);
        }

        let sliders = board.pieces(piece, color);
        let empty = !board.occupied();

        let north = north_occluded(sliders, empty);
        let south = south_occluded(sliders, empty);
        let east = east_occluded(sliders, empty);
        let west = west_occluded(sliders, empty);

        let attacks = (shift_north(north) | shift_south(south) | shift_east(east) | shift_west(west))
            & !board.get(color);
        let moves = (north | south | east | west) & !board.get(piece);

        moves | attacks
    }

    pub fn queen_moves(board: &Board, color: Color) -> u64 {
        if color == Color::Any {
            return Self::queen_moves(board, Color::White) | Self::queen_moves(board, Color::Black);
        }

        Self::bishop_moves(board, color, Piece::Queen) | Self::rook_moves(board, color, Piece::Queen)
    }

    /// Destinations of every piece of `piece` type and `color`
    pub fn piece_moves(board: &Board, color: Color, piece: Piece) -> u64 {
        match piece {
            Piece::Pawn => Self::pawn_moves(board, color),
            Piece::Knight => Self::knight_moves(board, color),
            Piece::Bishop => Self::bishop_moves(board, color, Piece::Bishop),
            Piece::Rook => Self::rook_moves(board, color, Piece::Rook),
            Piece::Queen => Self::queen_moves(board, color),
            Piece::King => Self::king_moves(board, color),
        }
    }

    /// Squares attacked by `color`: the union of its bishop, rook, knight,
    /// pawn and queen destinations. King moves are not included.
    pub fn attacked_by(board: &Board, color: Color) -> u64 {
        Self::bishop_moves(board, color, Piece::Bishop)
            | Self::rook_moves(board, color, Piece::Rook)
            | Self::knight_moves(board, color)
            | Self::pawn_moves(board, color)
            | Self::queen_moves(board, color)
    }

    // ========================================================================
    // MOVE LISTS
    // ========================================================================

    /// Split the back-rank destinations out of `pawn_moves` and expand each of
    /// them into the four promotion moves (knight, bishop, rook, queen).
    pub fn pawn_promotions(pawn_moves: &mut u64, from: usize) -> Vec<Move> {
        let mut promoting = *pawn_moves & PROMOTION_RANKS;
        *pawn_moves ^= promoting;

        let mut promotions = Vec::with_capacity(promoting.count_ones() as usize * 4);
        while promoting != 0 {
            let to = pop_lsb(&mut promoting);
            for piece in Piece::PROMOTIONS {
                promotions.push(Move::with_promotion(from, to, piece));
            }
        }

        promotions
    }

    /// Generate all pseudo-legal moves (may leave king in check).
    ///
    /// Moves are grouped by piece type in enumeration order, then by origin
    /// square and destination square, lowest bit first. The set-wise
    /// generators cannot tell which piece reached which square, so each piece
    /// is generated alone on a copy whose piece set holds only that piece.
    pub fn pseudo_legal_moves(board: &Board, color: Color) -> Vec<Move> {
        if color == Color::Any {
            let mut moves = Self::pseudo_legal_moves(board, Color::White);
            moves.extend(Self::pseudo_legal_moves(board, Color::Black));
            return moves;
        }

        let mut moves = Vec::with_capacity(64);

        for piece in Piece::ALL {
            let mut pieces = board.pieces(piece, color);

            while pieces != 0 {
                let from = pop_lsb(&mut pieces);

                let mut single = *board;
                single.set_bitboard(piece, square_bb(from));

                let mut destinations = Self::piece_moves(&single, color, piece);
                if piece == Piece::Pawn {
                    moves.extend(Self::pawn_promotions(&mut destinations, from));
                }

                while destinations != 0 {
                    let to = pop_lsb(&mut destinations);
                    moves.push(Move::new(from, to));
                }
            }
        }

        moves
    }

    /// Pseudo-legal moves rendered as coordinate strings (e.g. "e2e4", "a7a8q")
    pub fn pseudo_legal_move_strings(board: &Board, color: Color) -> Vec<String> {
        Self::pseudo_legal_moves(board, color)
            .iter()
            .map(Move::to_coordinate)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVANS_GAMBIT: &str = "r1bqk1nr/pppp1ppp/2n5/2b1p3/1PB1P3/5N2/P1PP1PPP/RNBQK2R b KQkq b3 1 4";

    fn position(fen: &str) -> Board {
        Board::from_fen(fen).unwrap()
    }

    #[test]
    fn evans_gambit_destinations() {
        let board = position(EVANS_GAMBIT);
        assert_eq!(MoveGenerator::bishop_moves(&board, Color::White, Piece::Bishop), 0x20110a000b1220);
        assert_eq!(MoveGenerator::rook_moves(&board, Color::White, Piece::Rook), 0x60);
        assert_eq!(MoveGenerator::king_moves(&board, Color::White), 0x1020);
    }

    #[test]
    fn starting_position_has_twenty_moves_per_side() {
        let board = Board::new();
        assert_eq!(MoveGenerator::pseudo_legal_moves(&board, Color::White).len(), 20);
        assert_eq!(MoveGenerator::pseudo_legal_moves(&board, Color::Black).len(), 20);
        assert_eq!(MoveGenerator::pseudo_legal_moves(&board, Color::Any).len(), 40);
    }

    #[test]
    fn starting_pawn_and_knight_destinations() {
        let board = Board::new();
        assert_eq!(MoveGenerator::pawn_moves(&board, Color::White), 0xFFFF0000);
        assert_eq!(MoveGenerator::pawn_moves(&board, Color::Black), 0xFFFF << 32);
        assert_eq!(MoveGenerator::knight_moves(&board, Color::White), 0xA50000);
        assert_eq!(
            MoveGenerator::knight_moves(&board, Color::Any),
            0xA50000 | 0xA50000u64 << 24
        );
        assert_eq!(MoveGenerator::bishop_moves(&board, Color::White, Piece::Bishop), 0);
        assert_eq!(MoveGenerator::queen_moves(&board, Color::Any), 0);
    }

    #[test]
    fn move_order_follows_piece_type_then_bit_scan() {
        let moves = MoveGenerator::pseudo_legal_move_strings(&Board::new(), Color::White);
        assert_eq!(&moves[..4], &["a2a3", "a2a4", "b2b3", "b2b4"]);
        assert_eq!(&moves[16..], &["b1a3", "b1c3", "g1f3", "g1h3"]);
    }

    #[test]
    fn rook_on_h1_does_not_wrap_east() {
        let board = position("K3k3/8/8/8/8/8/8/7R w - - 0 1");
        let moves = MoveGenerator::rook_moves(&board, Color::White, Piece::Rook);
        assert_eq!(moves, 0x808080808080807F);
        assert_eq!(moves & square_bb(8), 0, "h1 must not reach a2");
    }

    #[test]
    fn rook_on_a2_does_not_wrap_west() {
        let board = position("4k3/8/8/8/8/8/R7/4K3 w - - 0 1");
        let moves = MoveGenerator::rook_moves(&board, Color::White, Piece::Rook);
        assert_eq!(moves, 0x010101010101FE01);
        assert_eq!(moves & square_bb(7), 0, "a2 must not reach h1");
    }

    #[test]
    fn knights_and_kings_on_the_rim_stay_on_the_board() {
        let board = position("7k/8/8/8/8/8/8/K6N w - - 0 1");
        // Knight h1 -> f2, g3 only
        assert_eq!(MoveGenerator::knight_moves(&board, Color::White), square_bb(13) | square_bb(22));
        // King a1 -> a2, b1, b2
        assert_eq!(
            MoveGenerator::king_moves(&board, Color::White),
            square_bb(1) | square_bb(8) | square_bb(9)
        );
    }

    #[test]
    fn sliders_capture_enemy_blockers_only() {
        // Rook d4, enemy pawn d6, own pawn f4
        let board = position("4k3/8/3p4/8/3R1P2/8/8/4K3 w - - 0 1");
        let moves = MoveGenerator::rook_moves(&board, Color::White, Piece::Rook);
        assert_ne!(moves & square_bb(43), 0, "captures d6");
        assert_eq!(moves & square_bb(51), 0, "stops at d6");
        assert_eq!(moves & square_bb(29), 0, "cannot take own pawn on f4");
        assert_ne!(moves & square_bb(28), 0, "reaches e4");
    }

    #[test]
    fn queen_combines_both_slider_patterns() {
        let board = position("4k3/8/8/8/3Q4/8/8/4K3 w - - 0 1");
        let queen = MoveGenerator::queen_moves(&board, Color::White);
        let diagonal = MoveGenerator::bishop_moves(&board, Color::White, Piece::Queen);
        let orthogonal = MoveGenerator::rook_moves(&board, Color::White, Piece::Queen);
        assert_eq!(queen, diagonal | orthogonal);
        assert_eq!(queen.count_ones(), 27);
    }

    #[test]
    fn blocked_pawn_cannot_double_step() {
        let blocked_near = position("4k3/8/8/8/8/4n3/4P3/4K3 w - - 0 1");
        assert_eq!(MoveGenerator::pawn_moves(&blocked_near, Color::White), 0);

        let blocked_far = position("4k3/8/8/8/4n3/8/4P3/4K3 w - - 0 1");
        assert_eq!(MoveGenerator::pawn_moves(&blocked_far, Color::White), square_bb(20));

        let black_blocked = position("4k3/4p3/4N3/8/8/8/8/4K3 b - - 0 1");
        assert_eq!(MoveGenerator::pawn_moves(&black_blocked, Color::Black), 0);
    }

    #[test]
    fn pawns_capture_diagonally_only_onto_enemies() {
        // e2 pushes to e3/e4 and takes d3; f3 is own and only pushes to f4
        let board = position("4k3/8/8/8/8/3p1P2/4P3/4K3 w - - 0 1");
        assert_eq!(
            MoveGenerator::pawn_moves(&board, Color::White),
            square_bb(19) | square_bb(20) | square_bb(28) | square_bb(29)
        );
    }

    #[test]
    fn promotion_expands_every_destination() {
        let board = position("r1r1k3/1P6/8/8/8/8/8/4K3 w - - 0 1");
        let moves = MoveGenerator::pseudo_legal_move_strings(&board, Color::White);
        let pawn_moves: Vec<&String> = moves.iter().filter(|m| m.starts_with("b7")).collect();

        let expected = [
            "b7a8n", "b7a8b", "b7a8r", "b7a8q", "b7b8n", "b7b8b", "b7b8r", "b7b8q", "b7c8n", "b7c8b",
            "b7c8r", "b7c8q",
        ];
        assert_eq!(pawn_moves, expected);
        assert!(!moves.iter().any(|m| m == "b7b8"));
    }

    #[test]
    fn black_promotions_on_first_rank() {
        let board = position("4k3/8/8/8/8/8/6p1/K7 b - - 0 1");
        let moves = MoveGenerator::pseudo_legal_move_strings(&board, Color::Black);
        let pawn_moves: Vec<&String> = moves.iter().filter(|m| m.starts_with("g2")).collect();
        assert_eq!(pawn_moves, ["g2g1n", "g2g1b", "g2g1r", "g2g1q"]);
    }

    #[test]
    fn pawn_promotions_strip_plain_moves() {
        let mut destinations = square_bb(56) | square_bb(40);
        let promotions = MoveGenerator::pawn_promotions(&mut destinations, 48);
        assert_eq!(destinations, square_bb(40));
        assert_eq!(promotions.len(), 4);
        assert!(promotions.iter().all(|m| m.to == 56 && m.promotion.is_some()));
    }

    #[test]
    fn attacked_squares_ignore_the_king() {
        let board = position("4k3/8/8/8/8/8/8/4K3 w - - 0 1");
        assert_eq!(MoveGenerator::attacked_by(&board, Color::White), 0);

        let board = position("4k3/8/8/8/8/8/8/R3K3 w - - 0 1");
        let attacked = MoveGenerator::attacked_by(&board, Color::White);
        assert_ne!(attacked & square_bb(56), 0);
        assert_eq!(attacked & square_bb(5), 0, "rook is blocked by its own king");
    }
}
