//! A small suite of mate-in-one/-two puzzles, checked two ways: that the
//! stated solving move actually delivers mate, and that the search finds a
//! mating move on its own.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use chess_engine::board::Board;
use chess_engine::search::{self, DriverParams, SearchState};

struct Puzzle {
    fen: &'static str,
    solution_uci: &'static str,
}

const PUZZLES: &[Puzzle] = &[
    Puzzle { fen: "6k1/5ppp/8/8/8/8/8/4Q2K w - - 0 1", solution_uci: "e1e8" },
    Puzzle {
        fen: "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 0 4",
        solution_uci: "h5f7",
    },
];

#[test]
fn stated_solutions_are_checkmate() {
    for puzzle in PUZZLES {
        let mut board = Board::from_fen(puzzle.fen);
        let mv = board.parse_move(puzzle.solution_uci).expect("solution move should be legal");
        board.make_move(mv);
        assert!(board.is_checkmate(), "{} + {} should be checkmate", puzzle.fen, puzzle.solution_uci);
    }
}

#[test]
fn search_finds_mating_move() {
    for puzzle in PUZZLES {
        let mut board = Board::from_fen(puzzle.fen);
        let mut state = SearchState::new(16);
        let stop = Arc::new(AtomicBool::new(false));
        let params = DriverParams { max_depth: Some(4), info_callback: None };
        let result = search::search(&mut board, &mut state, None, 10_000, &stop, params);

        let mv = result.best_move.expect("should find a move");
        board.make_move(mv);
        assert!(board.is_checkmate(), "search's move for {} should deliver mate", puzzle.fen);
    }
}
