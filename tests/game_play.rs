use koggechess::board::{Board, STARTING_FEN};
use koggechess::engine::Engine;
use koggechess::move_generator::MoveGenerator;
use koggechess::prompt::Prompt;
use koggechess::types::{Color, Piece};
use koggechess::ChessError;

fn pvp_engine() -> Engine {
    Engine::new(Color::Black, 2, false, true, Some(99))
}

#[test]
fn evans_gambit_through_the_engine() {
    let mut engine = pvp_engine();
    let log: Vec<String> = ["e2e4", "e7e5", "g1f3", "b8c6", "f1c4", "f8c5", "b2b4"]
        .iter()
        .map(|mv| engine.make_move(mv, true, false).unwrap())
        .collect();

    assert_eq!(log, ["1. e2e4", "e7e5", "2. Ng1f3", "Nb8c6", "3. Bf1c4", "Bf8c5", "4. b2b4"]);
    assert_eq!(engine.board().to_fen(), "r1bqk1nr/pppp1ppp/2n5/2b1p3/1PB1P3/5N2/P1PP1PPP/RNBQK2R");
    assert_eq!(engine.to_move(), Color::Black);

    let board = engine.board();
    assert_eq!(MoveGenerator::bishop_moves(board, Color::White, Piece::Bishop), 0x20110a000b1220);
    assert_eq!(MoveGenerator::rook_moves(board, Color::White, Piece::Rook), 0x60);
    assert_eq!(MoveGenerator::king_moves(board, Color::White), 0x1020);

    // The gambit pawn can be taken
    assert!(engine.legal_moves().contains(&"c5b4".to_string()));
    assert_eq!(engine.make_move("c5b4", true, false).unwrap(), "Bc5xb4");
}

#[test]
fn fen_and_default_constructors_agree() {
    let from_fen = Engine::new_from_fen(STARTING_FEN, Color::Black, 3, false, false, Some(1)).unwrap();
    let default = Engine::new(Color::Black, 3, false, false, Some(1));

    assert_eq!(from_fen.board(), default.board());
    assert_eq!(from_fen.to_move(), default.to_move());
    assert_eq!(from_fen.board().bitboards(), Board::new().bitboards());
    assert_eq!(default.fen(), "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w");
}

#[test]
fn malformed_fen_is_an_error() {
    for fen in [
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP w - - 0 1",
        "rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1",
        "rnbqkbnr/ppppXppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNRR w - - 0 1",
    ] {
        let result = Engine::new_from_fen(fen, Color::Black, 3, false, false, None);
        assert!(matches!(result, Err(ChessError::InvalidFen { .. })), "{fen}");
    }
}

#[test]
fn fools_mate_ends_with_the_king_captured() {
    let mut engine = pvp_engine();
    for mv in ["f2f3", "e7e5", "g2g4", "d8h4"] {
        engine.make_move(mv, true, false).unwrap();
    }

    assert!(engine.is_in_check(Color::White));
    assert_eq!(engine.winner(), None);

    // White is mated, so no legal move is left but pseudo-legal ones are
    assert!(engine.legal_moves().is_empty());
    assert!(!MoveGenerator::pseudo_legal_moves(engine.board(), Color::White).is_empty());

    // Black finds the king capture after any white move
    engine.make_move("a2a3", false, false).unwrap();
    let capture = engine.best_move(1, Color::Black).unwrap();
    assert_eq!(capture, "h4e1");
    assert_eq!(engine.make_move(&capture, true, false).unwrap(), "Qh4xe1");
    assert_eq!(engine.winner(), Some(Color::Black));
}

#[test]
fn self_play_keeps_the_board_consistent() {
    let mut engine = pvp_engine();

    for _ in 0..80 {
        let color = engine.to_move();
        let Some(mv) = engine.best_move(2, color) else {
            break;
        };
        engine.make_move(&mv, false, false).unwrap();

        let board = engine.board();
        assert!(board.is_consistent());
        assert_eq!(board.occupied(), board.get(Color::White) | board.get(Color::Black));

        if engine.winner().is_some() {
            break;
        }
    }

    let plies = engine.ply();
    assert_eq!(engine.move_history().len(), plies);
    engine.restart();
    assert_eq!(*engine.board(), Board::new());
    assert_eq!(engine.to_move(), Color::White);
}

#[test]
fn prompt_session_against_the_engine() {
    let engine = Engine::new(Color::Black, 2, false, false, Some(5));
    let mut prompt = Prompt::new(engine);

    let mut out = Vec::new();
    prompt
        .run("help\ne2e4\nhint\nhistory\nquit\n".as_bytes(), &mut out)
        .unwrap();
    let output = String::from_utf8(out).unwrap();

    assert!(output.contains("print_board (print for short)"));
    assert!(output.contains("1. e2e4"));
    assert!(output.contains("1. e2e4 "));
    assert_eq!(prompt.engine().ply(), 2);
    assert_eq!(prompt.engine().to_move(), Color::White);
}
