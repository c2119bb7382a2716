//! Position evaluation: terminal-state detection plus a heuristic score for
//! non-terminal positions, dispatched per chess variant.
//!
//! All scores are from the side-to-move's perspective: positive is good for
//! whoever is to move, matching the negamax convention used by the search.

mod standard;
mod variant;

use crate::board::{Board, Variant};
use crate::tt::WIN_SCORE;

/// Outcome of a position if the side to move has no further moves to make
/// (checkmate/stalemate in standard chess, stuck/no-pieces-left in the
/// suicide variants).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TerminalResult {
    Win,
    Loss,
    Draw,
    Unknown,
}

/// Score a position from the side-to-move's perspective. Terminal positions
/// score `+-WIN_SCORE` (adjusted by the caller for mate distance); otherwise
/// the variant-specific heuristic runs.
pub fn evaluate(board: &mut Board) -> i32 {
    match terminal_result(board) {
        TerminalResult::Win => return WIN_SCORE,
        TerminalResult::Loss => return -WIN_SCORE,
        TerminalResult::Draw => return 0,
        TerminalResult::Unknown => {}
    }

    match board.variant() {
        Variant::Standard => standard::heuristic(board),
        Variant::Antichess | Variant::Suicide => variant::heuristic(board),
    }
}

/// Determine whether the side to move has already won, lost, or drawn,
/// without regard to the heuristic score.
pub fn terminal_result(board: &mut Board) -> TerminalResult {
    match board.variant() {
        Variant::Standard => standard::terminal_result(board),
        Variant::Antichess => variant::terminal_result_antichess(board),
        Variant::Suicide => variant::terminal_result_suicide(board),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    #[test]
    fn checkmate_is_a_loss_for_side_to_move() {
        let mut board = Board::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3");
        assert_eq!(terminal_result(&mut board), TerminalResult::Loss);
        assert_eq!(evaluate(&mut board), -WIN_SCORE);
    }

    #[test]
    fn starting_position_is_not_terminal() {
        let mut board = Board::new();
        assert_eq!(terminal_result(&mut board), TerminalResult::Unknown);
    }
}
