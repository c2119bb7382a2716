//! Move generation shared by antichess and suicide. Neither variant has
//! castling or a pin concept; when a side to move has any capture
//! available, every other kind of move is illegal (spec §4.4).

use super::attack_tables::{slider_attacks, KING_ATTACKS, KNIGHT_ATTACKS};
use super::{Bitboard, Board, Color, Move, MoveList, Piece, Square, PROMOTION_PIECES_WITH_KING};

impl Board {
    /// Legal moves for antichess/suicide: captures only when any capture
    /// is available, otherwise every pseudo-legal non-capture.
    pub fn generate_variant_moves(&mut self) -> MoveList {
        let color = self.current_color();
        let pseudo = self.generate_pseudo_moves_variant(color);

        let mut captures = MoveList::new();
        for m in pseudo.iter().copied() {
            if self.is_variant_capture(m) {
                captures.push(m);
            }
        }
        if !captures.is_empty() {
            return captures;
        }
        pseudo
    }

    fn is_variant_capture(&self, m: Move) -> bool {
        if self.piece_at(m.to()).is_some() {
            return true;
        }
        let moving = self.piece_at(m.from()).map(|(_, p)| p).unwrap_or(Piece::Pawn);
        self.is_en_passant_move(m, moving)
    }

    fn generate_pseudo_moves_variant(&self, color: Color) -> MoveList {
        let mut moves = MoveList::new();
        let c_idx = color.index();

        let mut pawns = self.pieces[c_idx][Piece::Pawn.index()];
        while let Some(from) = pawns.lsb() {
            pawns.clear(from);
            self.generate_variant_pawn_moves(from, color, &mut moves);
        }

        for &piece in &[Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen, Piece::King] {
            let mut bb = self.pieces[c_idx][piece.index()];
            while let Some(from) = bb.lsb() {
                bb.clear(from);
                let own_occ = self.occupied[c_idx].0;
                let idx = from.bit_index();
                let raw = match piece {
                    Piece::Knight => KNIGHT_ATTACKS[idx],
                    Piece::King => KING_ATTACKS[idx],
                    Piece::Bishop => slider_attacks(idx, self.all_occupied.0, true),
                    Piece::Rook => slider_attacks(idx, self.all_occupied.0, false),
                    Piece::Queen => {
                        slider_attacks(idx, self.all_occupied.0, true)
                            | slider_attacks(idx, self.all_occupied.0, false)
                    }
                    Piece::Pawn => 0,
                };
                let mut targets = Bitboard(raw & !own_occ);
                while let Some(to) = targets.lsb() {
                    targets.clear(to);
                    moves.push(Move::new(from, to, None));
                }
            }
        }

        moves
    }

    fn generate_variant_pawn_moves(&self, from: Square, color: Color, moves: &mut MoveList) {
        let dir: isize = if color == Color::White { 1 } else { -1 };
        let start_rank = if color == Color::White { 1 } else { 6 };
        let promotion_rank = if color == Color::White { 7 } else { 0 };

        let r = from.rank() as isize;
        let f = from.file() as isize;
        let forward_r = r + dir;
        if (0..8).contains(&forward_r) {
            let forward_sq = Square::new(forward_r as usize, f as usize);
            if self.is_empty(forward_sq) {
                push_variant_pawn_move(moves, from, forward_sq, promotion_rank);
                if r == start_rank as isize {
                    let dbl = Square::new((forward_r + dir) as usize, f as usize);
                    if self.is_empty(dbl) {
                        moves.push(Move::new(from, dbl, None));
                    }
                }
            }
            for df in [-1isize, 1] {
                let cf = f + df;
                if !(0..8).contains(&cf) {
                    continue;
                }
                let target = Square::new(forward_r as usize, cf as usize);
                if let Some((target_color, _)) = self.piece_at(target) {
                    if target_color != color {
                        push_variant_pawn_move(moves, from, target, promotion_rank);
                    }
                } else if Some(target) == self.en_passant_target {
                    moves.push(Move::new(from, target, None));
                }
            }
        }
    }

    /// True if `color` has at least one capturing move available. Used by
    /// the driver/eval layer to decide terminal scoring without generating
    /// the full move list.
    pub(crate) fn has_variant_capture(&self, color: Color) -> bool {
        let pseudo = self.generate_pseudo_moves_variant(color);
        pseudo.iter().any(|&m| self.is_variant_capture(m))
    }
}

fn push_variant_pawn_move(moves: &mut MoveList, from: Square, to: Square, promotion_rank: usize) {
    if to.rank() == promotion_rank {
        for &promo in &PROMOTION_PIECES_WITH_KING {
            moves.push(Move::new(from, to, Some(promo)));
        }
    } else {
        moves.push(Move::new(from, to, None));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board as PublicBoard, Variant};

    #[test]
    fn capture_forced_when_available() {
        let mut board = PublicBoard::empty();
        board.set_piece(Square::new(3, 3), Color::White, Piece::Pawn);
        board.set_piece(Square::new(4, 4), Color::Black, Piece::Pawn);
        board.set_piece(Square::new(0, 0), Color::White, Piece::King);
        board.set_piece(Square::new(7, 7), Color::Black, Piece::King);
        board.white_to_move = true;
        board.variant = Variant::Antichess;
        let moves = board.generate_variant_moves();
        assert!(moves.iter().all(|m| m.from() == Square::new(3, 3) && m.to() == Square::new(4, 4)));
    }

    #[test]
    fn promotion_to_king_allowed() {
        let mut board = PublicBoard::empty();
        board.set_piece(Square::new(6, 0), Color::White, Piece::Pawn);
        board.set_piece(Square::new(0, 7), Color::White, Piece::King);
        board.set_piece(Square::new(7, 7), Color::Black, Piece::King);
        board.white_to_move = true;
        board.variant = Variant::Antichess;
        let moves = board.generate_variant_moves();
        assert!(moves
            .iter()
            .any(|m| m.from() == Square::new(6, 0) && m.promotion() == Some(Piece::King)));
    }
}
