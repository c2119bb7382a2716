//! Evaluation for the giveaway variants (antichess, suicide): a side loses
//! (or, in antichess, wins) by running out of moves or pieces rather than by
//! checkmate, so terminal detection and the heuristic both differ sharply
//! from standard chess.

use crate::board::{Board, Color, Piece};

use super::TerminalResult;

const VALUES: [i32; 6] = [100, 300, 300, 500, 900, 0];

/// Antichess ("giveaway"): captures are forced when available, and a side
/// with no legal move *wins* rather than loses (being stuck is the goal).
pub fn terminal_result_antichess(board: &mut Board) -> TerminalResult {
    let side = board.side_to_move();
    if board.piece_count(side) == 0 {
        return TerminalResult::Win;
    }
    if board.piece_count(side.opponent()) == 0 {
        return TerminalResult::Loss;
    }
    if board.generate_variant_moves().is_empty() {
        return TerminalResult::Win;
    }
    if bishop_fortress_draw(board) {
        return TerminalResult::Draw;
    }
    TerminalResult::Unknown
}

/// Suicide chess: captures are forced, and whoever loses all their pieces
/// first wins outright. Unlike antichess, running out of moves with pieces
/// still on the board isn't an automatic win — it's resolved by whoever
/// has fewer pieces at that point (equal counts draw).
pub fn terminal_result_suicide(board: &mut Board) -> TerminalResult {
    let side = board.side_to_move();
    let side_pieces = board.piece_count(side);
    let opp_pieces = board.piece_count(side.opponent());

    if side_pieces == 0 && opp_pieces == 0 {
        return TerminalResult::Draw;
    }
    if side_pieces == 0 {
        return TerminalResult::Win;
    }
    if opp_pieces == 0 {
        return TerminalResult::Loss;
    }
    if board.generate_variant_moves().is_empty() {
        // Stuck with no legal move: resolved by piece count, not a win —
        // fewer pieces than the opponent still wins, but having more loses.
        return match side_pieces.cmp(&opp_pieces) {
            std::cmp::Ordering::Less => TerminalResult::Win,
            std::cmp::Ordering::Equal => TerminalResult::Draw,
            std::cmp::Ordering::Greater => TerminalResult::Loss,
        };
    }
    if bishop_fortress_draw(board) {
        return TerminalResult::Draw;
    }
    TerminalResult::Unknown
}

/// Opposite-colored lone bishops can never capture each other's pawns or
/// force a stuck position; treated as a known draw rather than searched out.
fn bishop_fortress_draw(board: &Board) -> bool {
    for color in [Color::White, Color::Black] {
        if board.piece_count(color) != 1 || board.pieces_of(color, Piece::Bishop).0 == 0 {
            return false;
        }
    }
    let white_bishop = board.pieces_of(Color::White, Piece::Bishop).0;
    let black_bishop = board.pieces_of(Color::Black, Piece::Bishop).0;
    let light_squares: u64 = 0x55AA_55AA_55AA_55AA;
    (white_bishop & light_squares == 0) != (black_bishop & light_squares == 0)
}

/// Material differential plus opponent mobility (fewer replies for the
/// opponent is good, since both variants punish having options) and a small
/// tempo bonus.
pub fn heuristic(board: &mut Board) -> i32 {
    let side = board.side_to_move();
    let opp = side.opponent();

    let material = material_count(board, side) - material_count(board, opp);

    let info = board.make_null_move();
    let opp_moves = board.generate_variant_moves().len() as i32;
    board.unmake_null_move(info);

    material - opp_moves + 10
}

fn material_count(board: &Board, color: Color) -> i32 {
    [
        Piece::Pawn,
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
        Piece::King,
    ]
    .iter()
    .map(|&p| board.pieces_of(color, p).0.count_ones() as i32 * VALUES[p.index()])
    .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, Variant};

    #[test]
    fn antichess_with_legal_moves_is_unknown() {
        let mut board =
            Board::try_from_fen_with_variant("8/8/8/8/8/8/8/k6K w - - 0 1", Variant::Antichess)
                .unwrap();
        assert_eq!(terminal_result_antichess(&mut board), TerminalResult::Unknown);
    }

    #[test]
    fn suicide_stripped_of_pieces_wins() {
        let mut board =
            Board::try_from_fen_with_variant("8/8/8/8/8/8/8/7k w - - 0 1", Variant::Suicide)
                .unwrap();
        assert_eq!(terminal_result_suicide(&mut board), TerminalResult::Win);
    }
}
