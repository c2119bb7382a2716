//! Pseudo-legal move generation and the fast legality filter for standard
//! chess: rather than make/unmake-and-test-check on every pseudo-legal
//! move, we compute the set of checkers and pinned pieces once per call
//! and use them to filter directly.

use super::attack_tables::{slider_attacks, KING_ATTACKS, KNIGHT_ATTACKS, PAWN_ATTACKS, RAYS};
use super::{Bitboard, Board, Color, Move, MoveList, Piece, Square, PROMOTION_PIECES};

const ORTHOGONAL_DIRS: [usize; 4] = [
    super::attack_tables::DIR_N,
    super::attack_tables::DIR_S,
    super::attack_tables::DIR_E,
    super::attack_tables::DIR_W,
];
const DIAGONAL_DIRS: [usize; 4] = [
    super::attack_tables::DIR_NE,
    super::attack_tables::DIR_NW,
    super::attack_tables::DIR_SE,
    super::attack_tables::DIR_SW,
];

fn is_increasing_dir(dir: usize) -> bool {
    use super::attack_tables::{DIR_E, DIR_N, DIR_NE, DIR_NW};
    dir == DIR_N || dir == DIR_E || dir == DIR_NE || dir == DIR_NW
}

fn nearest_blocker(dir: usize, blockers: u64) -> usize {
    if is_increasing_dir(dir) {
        blockers.trailing_zeros() as usize
    } else {
        63 - blockers.leading_zeros() as usize
    }
}

/// Direction index from `from` to `to` if they lie on a common rank, file
/// or diagonal, else `None`.
fn ray_direction(from: Square, to: Square) -> Option<usize> {
    for &dir in ORTHOGONAL_DIRS.iter().chain(DIAGONAL_DIRS.iter()) {
        if RAYS[dir][from.bit_index()] & (1u64 << to.bit_index()) != 0 {
            return Some(dir);
        }
    }
    None
}

impl Board {
    pub(crate) fn opponent_color(&self, color: Color) -> Color {
        color.opponent()
    }

    pub(crate) fn mobility_counts(&self) -> (i32, i32) {
        let mut counts = [0i32; 2];
        for &color in &[Color::White, Color::Black] {
            let c_idx = color.index();
            let mut count = 0i32;
            for &piece in &[Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen] {
                let mut bb = self.pieces[c_idx][piece.index()];
                while let Some(from) = bb.lsb() {
                    bb.clear(from);
                    count += self.pseudo_piece_targets(from, piece, c_idx).popcount() as i32;
                }
            }
            counts[c_idx] = count;
        }
        (counts[0], counts[1])
    }

    fn pseudo_piece_targets(&self, from: Square, piece: Piece, c_idx: usize) -> Bitboard {
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
        Bitboard(raw & !own_occ)
    }

    pub(crate) fn generate_pseudo_moves(&self) -> MoveList {
        let mut moves = MoveList::new();
        let color = self.current_color();
        let c_idx = color.index();

        let mut pawns = self.pieces[c_idx][Piece::Pawn.index()];
        while let Some(from) = pawns.lsb() {
            pawns.clear(from);
            self.generate_pawn_moves(from, color, &mut moves);
        }

        for &piece in &[Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen, Piece::King] {
            let mut bb = self.pieces[c_idx][piece.index()];
            while let Some(from) = bb.lsb() {
                bb.clear(from);
                let mut targets = self.pseudo_piece_targets(from, piece, c_idx);
                while let Some(to) = targets.lsb() {
                    targets.clear(to);
                    moves.push(Move::new(from, to, None));
                }
            }
        }

        self.generate_castling_moves(color, &mut moves);
        moves
    }

    fn generate_pawn_moves(&self, from: Square, color: Color, moves: &mut MoveList) {
        let dir: isize = if color == Color::White { 1 } else { -1 };
        let start_rank = if color == Color::White { 1 } else { 6 };
        let promotion_rank = if color == Color::White { 7 } else { 0 };

        let r = from.rank() as isize;
        let f = from.file() as isize;
        let forward_r = r + dir;
        if (0..8).contains(&forward_r) {
            let forward_sq = Square::new(forward_r as usize, f as usize);
            if self.is_empty(forward_sq) {
                push_pawn_move(moves, from, forward_sq, promotion_rank);
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
                        push_pawn_move(moves, from, target, promotion_rank);
                    }
                } else if Some(target) == self.en_passant_target {
                    moves.push(Move::new(from, target, None));
                }
            }
        }
    }

    fn generate_castling_moves(&self, color: Color, moves: &mut MoveList) {
        if !self.variant.allows_castling() {
            return;
        }
        let back_rank = if color == Color::White { 0 } else { 7 };
        let king_sq = Square::new(back_rank, 4);
        if self.piece_at(king_sq) != Some((color, Piece::King)) {
            return;
        }
        if self.has_castling_right(color, 'K')
            && self.is_empty(Square::new(back_rank, 5))
            && self.is_empty(Square::new(back_rank, 6))
            && self.piece_at(Square::new(back_rank, 7)) == Some((color, Piece::Rook))
        {
            moves.push(Move::new(king_sq, Square::new(back_rank, 6), None));
        }
        if self.has_castling_right(color, 'Q')
            && self.is_empty(Square::new(back_rank, 1))
            && self.is_empty(Square::new(back_rank, 2))
            && self.is_empty(Square::new(back_rank, 3))
            && self.piece_at(Square::new(back_rank, 0)) == Some((color, Piece::Rook))
        {
            moves.push(Move::new(king_sq, Square::new(back_rank, 2), None));
        }
    }

    /// All squares occupied by `attacker_color` pieces that attack `square`,
    /// given `occupancy` as the blocker set (lets callers strip the king off
    /// the board to test squares it might move through/away from).
    pub(crate) fn attackers_of(&self, square: Square, attacker_color: Color, occupancy: u64) -> Bitboard {
        let idx = square.bit_index();
        let c_idx = attacker_color.index();
        let mut attackers = 0u64;

        let pawn_sources = PAWN_ATTACKS[attacker_color.opponent().index()][idx];
        attackers |= self.pieces[c_idx][Piece::Pawn.index()].0 & pawn_sources;
        attackers |= self.pieces[c_idx][Piece::Knight.index()].0 & KNIGHT_ATTACKS[idx];
        attackers |= self.pieces[c_idx][Piece::King.index()].0 & KING_ATTACKS[idx];

        let rook_like =
            self.pieces[c_idx][Piece::Rook.index()].0 | self.pieces[c_idx][Piece::Queen.index()].0;
        let bishop_like = self.pieces[c_idx][Piece::Bishop.index()].0
            | self.pieces[c_idx][Piece::Queen.index()].0;
        attackers |= slider_attacks(idx, occupancy, false) & rook_like;
        attackers |= slider_attacks(idx, occupancy, true) & bishop_like;

        Bitboard(attackers)
    }

    pub(crate) fn is_square_attacked(&self, square: Square, attacker_color: Color) -> bool {
        !self
            .attackers_of(square, attacker_color, self.all_occupied.0)
            .is_empty()
    }

    pub(crate) fn is_in_check(&self, color: Color) -> bool {
        match self.find_king(color) {
            Some(king_sq) => self.is_square_attacked(king_sq, color.opponent()),
            None => false,
        }
    }

    pub(crate) fn find_king(&self, color: Color) -> Option<Square> {
        self.pieces[color.index()][Piece::King.index()].lsb()
    }

    /// Pinned-piece mask and, for each pinned square, the ray (inclusive of
    /// the pinner) it is allowed to move along.
    fn pinned_pieces(&self, king_sq: Square, color: Color) -> Vec<(Square, Bitboard)> {
        let opp = color.opponent();
        let opp_idx = opp.index();
        let rook_like =
            self.pieces[opp_idx][Piece::Rook.index()].0 | self.pieces[opp_idx][Piece::Queen.index()].0;
        let bishop_like = self.pieces[opp_idx][Piece::Bishop.index()].0
            | self.pieces[opp_idx][Piece::Queen.index()].0;
        let own_occ = self.occupied[color.index()].0;
        let king_idx = king_sq.bit_index();

        let mut pins = Vec::new();
        for &dir in ORTHOGONAL_DIRS.iter().chain(DIAGONAL_DIRS.iter()) {
            let relevant_sliders = if ORTHOGONAL_DIRS.contains(&dir) {
                rook_like
            } else {
                bishop_like
            };
            let ray = RAYS[dir][king_idx];
            let blockers = ray & self.all_occupied.0;
            if blockers == 0 {
                continue;
            }
            let first_idx = nearest_blocker(dir, blockers);
            let first_bit = 1u64 << first_idx;
            if first_bit & own_occ == 0 {
                continue; // first blocker is enemy: either a checker or irrelevant
            }
            let beyond = RAYS[dir][first_idx] & ray;
            let second_blockers = beyond & self.all_occupied.0 & !first_bit;
            if second_blockers == 0 {
                continue;
            }
            let second_idx = nearest_blocker(dir, second_blockers);
            if (1u64 << second_idx) & relevant_sliders != 0 {
                let pin_mask = RAYS[dir][king_idx] ^ RAYS[dir][second_idx];
                pins.push((Square::from_index(super::SquareIdx(first_idx as u8)), Bitboard(pin_mask)));
            }
        }
        pins
    }

    /// Legal move generation using precomputed checkers/pins instead of a
    /// make/unmake probe per pseudo-legal move (spec's fast-legality path).
    pub fn generate_moves(&mut self) -> MoveList {
        let color = self.current_color();
        let opponent = color.opponent();
        let mut legal = MoveList::new();

        let king_sq = match self.find_king(color) {
            Some(sq) => sq,
            None => return legal,
        };

        let checkers = self.attackers_of(king_sq, opponent, self.all_occupied.0);
        let num_checkers = checkers.popcount();

        let pins = self.pinned_pieces(king_sq, color);
        let pin_mask_for = |sq: Square| -> Option<Bitboard> {
            pins.iter().find(|(p, _)| *p == sq).map(|(_, mask)| *mask)
        };

        let block_mask = if num_checkers == 1 {
            let checker_sq = checkers.lsb().unwrap();
            match ray_direction(king_sq, checker_sq) {
                Some(dir) => Bitboard(RAYS[dir][king_sq.bit_index()] ^ RAYS[dir][checker_sq.bit_index()]),
                None => {
                    let mut m = Bitboard::empty();
                    m.set(checker_sq);
                    m
                }
            }
        } else {
            Bitboard(u64::MAX)
        };

        let pseudo = self.generate_pseudo_moves();
        let king_occ_without_king = self.all_occupied.0 & !(1u64 << king_sq.bit_index());

        for m in pseudo.iter().copied() {
            if m.from() == king_sq {
                let is_castle = self.is_castling_move(m, Piece::King);
                if is_castle {
                    if num_checkers != 0 {
                        continue;
                    }
                    let step = if m.to().file() == 6 { 1i32 } else { -1i32 };
                    let mid = Square::new(
                        king_sq.rank(),
                        (king_sq.file() as i32 + step) as usize,
                    );
                    if self.is_square_attacked(mid, opponent) || self.is_square_attacked(m.to(), opponent) {
                        continue;
                    }
                    legal.push(m);
                    continue;
                }
                if self.attackers_of(m.to(), opponent, king_occ_without_king).is_empty() {
                    legal.push(m);
                }
                continue;
            }

            if num_checkers >= 2 {
                continue; // double check: only king moves are legal
            }

            if let Some(pin_mask) = pin_mask_for(m.from()) {
                if pin_mask & Bitboard(1u64 << m.to().bit_index()) == Bitboard::empty() {
                    continue;
                }
            }

            if num_checkers == 1 {
                let blocks_or_captures =
                    (block_mask & Bitboard(1u64 << m.to().bit_index())) != Bitboard::empty();
                let is_ep = self.is_en_passant_move(
                    m,
                    self.piece_at(m.from()).map(|(_, p)| p).unwrap_or(Piece::Pawn),
                );
                let captures_checker_en_passant = is_ep && {
                    let checker_sq = checkers.lsb().unwrap();
                    let captured_rank = if color == Color::White {
                        m.to().rank() - 1
                    } else {
                        m.to().rank() + 1
                    };
                    Square::new(captured_rank, m.to().file()) == checker_sq
                };
                if !blocks_or_captures && !captures_checker_en_passant {
                    continue;
                }
            }

            legal.push(m);
        }

        legal
    }

    pub fn is_checkmate(&mut self) -> bool {
        let color = self.current_color();
        self.is_in_check(color) && self.generate_moves().is_empty()
    }

    pub fn is_stalemate(&mut self) -> bool {
        let color = self.current_color();
        !self.is_in_check(color) && self.generate_moves().is_empty()
    }

    /// Captures and promotions only (quiescence search seed set).
    pub(crate) fn generate_tactical_moves(&mut self) -> MoveList {
        let legal = self.generate_moves();
        let mut tactical = MoveList::new();
        for m in legal.iter().copied() {
            let is_capture = self.piece_at(m.to()).is_some()
                || self.is_en_passant_move(m, self.piece_at(m.from()).map(|(_, p)| p).unwrap_or(Piece::Pawn));
            if is_capture || m.promotion().is_some() {
                tactical.push(m);
            }
        }
        tactical
    }

    #[allow(dead_code)]
    pub fn perft(&mut self, depth: usize) -> u64 {
        if depth == 0 {
            return 1;
        }
        let moves = self.generate_moves();
        if depth == 1 {
            return moves.len() as u64;
        }
        let mut nodes = 0u64;
        for m in moves.iter().copied() {
            let info = self.make_move(m);
            nodes += self.perft(depth - 1);
            self.unmake_move(m, info);
        }
        nodes
    }
}

fn push_pawn_move(moves: &mut MoveList, from: Square, to: Square, promotion_rank: usize) {
    if to.rank() == promotion_rank {
        for &promo in &PROMOTION_PIECES {
            moves.push(Move::new(from, to, Some(promo)));
        }
    } else {
        moves.push(Move::new(from, to, None));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board as PublicBoard;

    #[test]
    fn starting_position_has_twenty_moves() {
        let mut board = PublicBoard::new();
        assert_eq!(board.generate_moves().len(), 20);
    }

    #[test]
    fn perft_depth_3_matches_known_value() {
        let mut board = PublicBoard::new();
        assert_eq!(board.perft(1), 20);
        assert_eq!(board.perft(2), 400);
        assert_eq!(board.perft(3), 8902);
    }

    #[test]
    fn pinned_piece_cannot_move_off_pin_ray() {
        // White king e1, white rook e2, black rook e8: rook is pinned.
        let mut board = PublicBoard::empty();
        board.set_piece(Square::new(0, 4), Color::White, Piece::King);
        board.set_piece(Square::new(1, 4), Color::White, Piece::Rook);
        board.set_piece(Square::new(7, 4), Color::Black, Piece::Rook);
        board.set_piece(Square::new(7, 0), Color::Black, Piece::King);
        board.white_to_move = true;
        let moves = board.generate_moves();
        assert!(moves.iter().all(|m| m.from() != Square::new(1, 4) || m.to().file() == 4));
    }

    #[test]
    fn double_check_only_allows_king_moves() {
        let mut board = PublicBoard::empty();
        board.set_piece(Square::new(0, 4), Color::White, Piece::King);
        board.set_piece(Square::new(7, 4), Color::Black, Piece::Rook);
        board.set_piece(Square::new(1, 3), Color::Black, Piece::Knight);
        board.set_piece(Square::new(7, 7), Color::Black, Piece::King);
        board.white_to_move = true;
        let moves = board.generate_moves();
        assert!(moves.iter().all(|m| m.from() == Square::new(0, 4)));
    }
}
