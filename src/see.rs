//! Static-exchange evaluation: approximates the net material gain of a
//! capture sequence on one square by simulating least-valuable-attacker
//! recaptures until one side runs out of attackers.

use crate::board::{Board, Color, Move, Piece};

const VALUES: [i32; 6] = [100, 300, 300, 500, 900, 20000];

fn piece_value(p: Piece) -> i32 {
    VALUES[p.index()]
}

/// Net gain for the side initiating the capture `mv`, simulating the
/// full alternating recapture sequence on `mv.to()` with each side always
/// recapturing with its least valuable attacker.
pub fn see_capture(board: &Board, mv: Move) -> i32 {
    let Some((attacker_color, attacker_piece)) = board.piece_at(mv.from()) else {
        return 0;
    };
    let target = mv.to();

    let captured = match board.piece_at(target) {
        Some((_, p)) => p,
        None => return 0,
    };

    let mut occ = board.all_occupied_bits();
    occ &= !(1u64 << mv.from().bit_index());
    occ |= 1u64 << target.bit_index();

    let mut gains = Vec::with_capacity(8);
    gains.push(piece_value(captured));

    let mut side = attacker_color.opponent();
    let mut on_square = attacker_piece;

    loop {
        let attackers = board.attackers_of(target, side, occ);
        if attackers == crate::board::Bitboard::empty() {
            break;
        }

        let Some((piece, sq)) = least_valuable_attacker(board, side, attackers) else {
            break;
        };

        gains.push(piece_value(on_square) - gains[gains.len() - 1]);
        occ &= !(1u64 << sq.bit_index());
        on_square = piece;
        side = side.opponent();
    }

    for i in (0..gains.len() - 1).rev() {
        gains[i] = gains[i].min(-gains[i + 1]);
    }

    gains[0]
}

fn least_valuable_attacker(
    board: &Board,
    side: Color,
    attackers: crate::board::Bitboard,
) -> Option<(Piece, crate::board::Square)> {
    for piece in [
        Piece::Pawn,
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
        Piece::King,
    ] {
        let bb = board.pieces_of(side, piece).0 & attackers.0;
        if bb != 0 {
            let sq_idx = bb.trailing_zeros() as u8;
            return Some((piece, crate::board::Square(sq_idx)));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Move as Mv;

    #[test]
    fn undefended_pawn_capture_gains_full_value() {
        let board = Board::from_fen("4k3/8/8/8/3p4/8/4P3/4K3 w - - 0 1");
        let mv = Mv::from_lan("e2d3").unwrap();
        assert_eq!(see_capture(&board, mv), 100);
    }

    #[test]
    fn losing_capture_is_negative() {
        // White rook takes a pawn defended by a bishop: loses the exchange.
        let board = Board::from_fen("4k3/8/2b5/8/3p4/8/8/3RK3 w - - 0 1");
        let mv = Mv::from_lan("d1d4").unwrap();
        assert!(see_capture(&board, mv) < 0);
    }

    #[test]
    fn non_capture_move_scores_zero() {
        let board = Board::new();
        let mv = Mv::from_lan("e2e4").unwrap();
        assert_eq!(see_capture(&board, mv), 0);
    }
}
