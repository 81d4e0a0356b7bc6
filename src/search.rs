//! KoggeChess - Search Module
//!
//! Fixed-depth minimax with alpha-beta pruning, written as a maximizer and a
//! minimizer calling each other. Move order is shuffled with the engine's RNG
//! so equal moves are not always played the same way.
//!
//! The search walks pseudo-legal moves: a move that leaves the own king
//! attacked is answered by its capture one ply deeper, which the king value
//! in the evaluation punishes.

use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use tracing::{debug, info};

use crate::engine::Engine;
use crate::evaluation::evaluate;
use crate::move_generator::MoveGenerator;
use crate::types::*;

/// Figures collected while searching, reported after the fact
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchStats {
    pub best_move: Option<Move>,
    /// Root score from the searching side's point of view
    pub score: i32,
    pub depth: u32,
    pub nodes: u64,
    pub elapsed: Duration,
}

/// Per-search state threaded through the recursion
struct SearchContext {
    root_depth: u32,
    best_move: Option<Move>,
    nodes: u64,
}

impl Engine {
    /// Best move for `color` searching `depth` plies, in coordinate notation.
    ///
    /// Returns `None` when `color` has no pseudo-legal move or `depth` is 0.
    pub fn best_move(&mut self, depth: u32, color: Color) -> Option<String> {
        self.search(depth, color).best_move.map(|mv| mv.to_coordinate())
    }

    /// Run the search and keep its statistics in [`Engine::last_search`]
    pub fn search(&mut self, depth: u32, color: Color) -> SearchStats {
        let start = Instant::now();
        let mut ctx = SearchContext {
            root_depth: depth,
            best_move: None,
            nodes: 0,
        };

        let score = self.alpha_beta_max(&mut ctx, i32::MIN, i32::MAX, color, depth);

        let stats = SearchStats {
            best_move: ctx.best_move,
            score,
            depth,
            nodes: ctx.nodes,
            elapsed: start.elapsed(),
        };

        if self.verbose {
            match stats.best_move {
                Some(mv) => info!("Best move found: {}", mv),
                None => info!("No move found"),
            }
            info!("Nodes visited: {}", stats.nodes);
            info!("Time taken: {} ms", stats.elapsed.as_millis());
        }
        debug!(
            depth,
            score,
            nodes = stats.nodes,
            "Search for {} finished",
            color
        );

        self.last_search = Some(stats);
        stats
    }

    /// Pseudo-legal moves of `color` in random order
    fn shuffled_moves(&mut self, color: Color) -> Vec<Move> {
        let mut moves = MoveGenerator::pseudo_legal_moves(&self.board, color);
        moves.shuffle(&mut self.rng);
        moves
    }

    /// Maximizing side. Scores are always from the root side's view.
    fn alpha_beta_max(
        &mut self,
        ctx: &mut SearchContext,
        mut alpha: i32,
        beta: i32,
        color: Color,
        depth_left: u32,
    ) -> i32 {
        ctx.nodes += 1;

        if depth_left == 0 {
            return evaluate(&self.board, color);
        }

        for mv in self.shuffled_moves(color) {
            let Ok(record) = self.apply(mv, color) else {
                continue;
            };
            let score = self.alpha_beta_min(ctx, alpha, beta, color.opponent(), depth_left - 1);
            self.undo(&record);

            if score >= beta {
                return beta;
            }
            if score > alpha {
                alpha = score;
                if depth_left == ctx.root_depth {
                    ctx.best_move = Some(mv);
                }
            }
        }

        alpha
    }

    /// Minimizing side, `color` is the root side's opponent
    fn alpha_beta_min(
        &mut self,
        ctx: &mut SearchContext,
        alpha: i32,
        mut beta: i32,
        color: Color,
        depth_left: u32,
    ) -> i32 {
        ctx.nodes += 1;

        if depth_left == 0 {
            return -evaluate(&self.board, color);
        }

        for mv in self.shuffled_moves(color) {
            let Ok(record) = self.apply(mv, color) else {
                continue;
            };
            let score = self.alpha_beta_max(ctx, alpha, beta, color.opponent(), depth_left - 1);
            self.undo(&record);

            if score <= alpha {
                return alpha;
            }
            if score < beta {
                beta = score;
            }
        }

        beta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    fn engine_at(fen: &str, seed: u64) -> Engine {
        Engine::new_from_fen(fen, Color::White, 3, false, false, Some(seed)).unwrap()
    }

    /// Plain minimax over pseudo-legal moves, no pruning
    fn minimax(engine: &mut Engine, root: Color, color: Color, depth: u32) -> i32 {
        if depth == 0 {
            return evaluate(engine.board(), root);
        }

        let moves = MoveGenerator::pseudo_legal_moves(engine.board(), color);
        let maximizing = color == root;
        let mut best = if maximizing { i32::MIN } else { i32::MAX };

        for mv in moves {
            let record = engine.apply(mv, color).unwrap();
            let score = minimax(engine, root, color.opponent(), depth - 1);
            engine.undo(&record);

            best = if maximizing { best.max(score) } else { best.min(score) };
        }

        best
    }

    #[test]
    fn alpha_beta_matches_minimax() {
        let positions = [
            "4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1",
            "r3k3/1p6/8/3n4/4B3/8/5P2/2R1K3 w - - 0 1",
            "4k3/8/2n5/8/3Q4/8/8/4K3 b - - 0 1",
        ];

        for (seed, fen) in positions.iter().enumerate() {
            let mut engine = engine_at(fen, seed as u64);
            let color = engine.to_move();
            let before = *engine.board();

            let expected = minimax(&mut engine, color, color, 2);
            let stats = engine.search(2, color);

            assert_eq!(stats.score, expected, "{fen}");
            assert_eq!(*engine.board(), before);

            // The chosen move must achieve the root value
            let mv = stats.best_move.unwrap();
            let record = engine.apply(mv, color).unwrap();
            let reply = minimax(&mut engine, color, color.opponent(), 1);
            engine.undo(&record);
            assert_eq!(reply, expected, "{fen}");
        }
    }

    #[test]
    fn depth_zero_yields_no_move() {
        let mut engine = Engine::new(Color::White, 3, false, false, Some(1));
        assert_eq!(engine.best_move(0, Color::White), None);
        let stats = engine.last_search().unwrap();
        assert_eq!(stats.score, evaluate(&Board::new(), Color::White));
        assert_eq!(stats.nodes, 1);
    }

    #[test]
    fn side_without_pieces_has_no_move() {
        let mut engine = engine_at("4k3/8/8/8/8/8/8/8 w - - 0 1", 3);
        assert_eq!(engine.best_move(2, Color::White), None);
    }

    #[test]
    fn takes_the_hanging_king() {
        let mut engine = engine_at("4k3/8/8/8/8/8/8/4QK2 w - - 0 1", 11);
        assert_eq!(engine.best_move(2, Color::White).as_deref(), Some("e1e8"));
    }

    #[test]
    fn wins_a_free_queen() {
        let mut engine = engine_at("4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1", 5);
        assert_eq!(engine.best_move(2, Color::White).as_deref(), Some("d1d5"));
    }

    #[test]
    fn same_seed_same_move() {
        let mut first = Engine::new(Color::White, 3, false, false, Some(42));
        let mut second = Engine::new(Color::White, 3, false, false, Some(42));
        assert_eq!(first.best_move(2, Color::White), second.best_move(2, Color::White));
    }

    #[test]
    fn search_restores_the_board() {
        let mut engine = Engine::new(Color::Black, 3, false, false, Some(9));
        engine.make_move("e2e4", true, false).unwrap();
        let before = *engine.board();

        let mv = engine.best_move(3, Color::Black).unwrap();
        assert_eq!(*engine.board(), before);
        assert!(engine.legal_moves().contains(&mv));
    }
}
