//! Evaluation for standard chess: checkmate/stalemate/draw detection plus a
//! tapered material+PST heuristic with mobility and pawn-structure terms.

use crate::board::{Board, Color, Piece};

use super::TerminalResult;

/// Sum of `PHASE_WEIGHTS` over a full starting army for one side
/// (2 knights + 2 bishops + 4 rooks + 4 queens... mirrored for both sides),
/// used as the taper denominator.
const MAX_PHASE: i32 = 24;

pub fn terminal_result(board: &mut Board) -> TerminalResult {
    let side = board.side_to_move();
    let moves = board.generate_moves();
    if moves.is_empty() {
        return if board.is_in_check(side) {
            TerminalResult::Loss
        } else {
            TerminalResult::Draw
        };
    }
    if board.is_theoretical_draw() {
        return TerminalResult::Draw;
    }
    TerminalResult::Unknown
}

pub fn heuristic(board: &mut Board) -> i32 {
    let side = board.side_to_move();
    let opp = side.opponent();

    let phase = (board.game_phase(Color::White) + board.game_phase(Color::Black)).min(MAX_PHASE);
    let mg_diff = board.material_pst_mg(side) - board.material_pst_mg(opp);
    let eg_diff = board.material_pst_eg(side) - board.material_pst_eg(opp);
    let tapered = (mg_diff * phase + eg_diff * (MAX_PHASE - phase)) / MAX_PHASE;

    let (white_mobility, black_mobility) = board.mobility_counts();
    let mobility = if side == Color::White {
        white_mobility - black_mobility
    } else {
        black_mobility - white_mobility
    };

    let pawn_structure = pawn_structure_score(board, side) - pawn_structure_score(board, opp);

    tapered + mobility * 2 + pawn_structure
}

/// Doubled and isolated pawns each cost a small penalty; this is
/// deliberately simple, the PST tables already carry most positional
/// pawn knowledge.
fn pawn_structure_score(board: &Board, color: Color) -> i32 {
    let pawns = board.pieces_of(color, Piece::Pawn);
    let mut score = 0;
    for file in 0..8u32 {
        let file_mask = file_mask(file);
        let count = (pawns.0 & file_mask).count_ones();
        if count > 1 {
            score -= 12 * (count as i32 - 1);
        }
        if count > 0 {
            let neighbors = (if file > 0 { file_mask(file - 1) } else { 0 })
                | (if file < 7 { file_mask(file + 1) } else { 0 });
            if pawns.0 & neighbors == 0 {
                score -= 10;
            }
        }
    }
    score
}

fn file_mask(file: u32) -> u64 {
    const FILE_A: u64 = 0x0101_0101_0101_0101;
    FILE_A << file
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    #[test]
    fn stalemate_is_a_draw() {
        let mut board = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
        assert_eq!(terminal_result(&mut board), TerminalResult::Draw);
    }

    #[test]
    fn material_advantage_scores_positive() {
        let mut board = Board::from_fen("4k3/8/8/8/8/8/4P3/4K2R w K - 0 1");
        assert!(heuristic(&mut board) > 0);
    }

    #[test]
    fn doubled_pawns_are_penalized() {
        let doubled = Board::from_fen("4k3/8/8/8/4P3/8/4P3/4K3 w - - 0 1");
        let healthy = Board::from_fen("4k3/8/8/8/3P4/8/4P3/4K3 w - - 0 1");
        assert!(
            pawn_structure_score(&doubled, Color::White)
                < pawn_structure_score(&healthy, Color::White)
        );
    }
}
