//! Move ordering heuristics: TT move first, then captures/killers/quiets,
//! scored so that a descending sort puts the most promising moves first.

use crate::board::{Board, Move, MoveList, Piece, Variant};
use crate::see::see_capture;

const HISTORY_PIECES: usize = 6;
const HISTORY_SQUARES: usize = 64;
const HISTORY_SIZE: usize = HISTORY_PIECES * HISTORY_SQUARES * HISTORY_SQUARES;

/// Per-ply killer slots plus a global history table, threaded through one
/// search so ordering improves as the tree is explored.
pub struct OrderingContext {
    pub killers: Vec<[Option<Move>; 2]>,
    history: Vec<i32>,
}

impl OrderingContext {
    pub fn new(max_ply: usize) -> Self {
        OrderingContext {
            killers: vec![[None, None]; max_ply + 1],
            history: vec![0i32; HISTORY_SIZE],
        }
    }

    /// Record `m` as a killer at `ply`, shifting the previous killer1 down
    /// to killer2 unless `m` is already the top killer.
    pub fn record_killer(&mut self, ply: usize, m: Move) {
        if ply >= self.killers.len() {
            return;
        }
        let slot = &mut self.killers[ply];
        if slot[0] != Some(m) {
            slot[1] = slot[0];
            slot[0] = Some(m);
        }
    }

    pub fn killer1(&self, ply: usize) -> Option<Move> {
        self.killers.get(ply).and_then(|k| k[0])
    }

    pub fn killer2(&self, ply: usize) -> Option<Move> {
        self.killers.get(ply).and_then(|k| k[1])
    }

    pub fn record_history(&mut self, piece: Piece, m: Move, delta: i32) {
        let idx = history_index(piece, m);
        self.history[idx] = self.history[idx].saturating_add(delta);
    }

    fn history_score(&self, piece: Piece, m: Move) -> i32 {
        self.history[history_index(piece, m)]
    }
}

fn history_index(piece: Piece, m: Move) -> usize {
    piece.index() * HISTORY_SQUARES * HISTORY_SQUARES
        + m.from().bit_index() as usize * HISTORY_SQUARES
        + m.to().bit_index() as usize
}

/// Order `moves` in place for the standard-chess move orderer (spec's
/// SEE-for-captures, killers-just-below-zero, quiets-below-killers scheme).
pub fn order_moves_standard(
    board: &Board,
    ctx: &OrderingContext,
    moves: &mut MoveList,
    ply: usize,
    tt_move: Option<Move>,
) {
    let killer1 = ctx.killer1(ply);
    let killer2 = ctx.killer2(ply);

    let mut scored: Vec<(Move, i32)> = moves
        .iter()
        .map(|mv| {
            let m = *mv;
            let score = if Some(m) == tt_move {
                i32::MAX
            } else if let Some((_, piece)) = board.piece_at(m.from()) {
                if board.is_capture(m, piece) {
                    see_capture(board, m)
                } else if Some(m) == killer1 {
                    -1
                } else if Some(m) == killer2 {
                    -2
                } else {
                    -1000 + ctx.history_score(piece, m)
                }
            } else {
                -1000
            };
            (m, score)
        })
        .collect();

    scored.sort_by(|a, b| b.1.cmp(&a.1));
    rewrite_moves(moves, &scored);
}

/// Order `moves` for the antichess/suicide orderer: tt_move, then killers,
/// then fewest-opponent-replies ("give the opponent as little as possible").
pub fn order_moves_variant(
    board: &mut Board,
    ctx: &OrderingContext,
    moves: &mut MoveList,
    ply: usize,
    tt_move: Option<Move>,
) {
    debug_assert!(board.variant() != Variant::Standard);
    let killer1 = ctx.killer1(ply);
    let killer2 = ctx.killer2(ply);

    let mut scored: Vec<(Move, i32)> = Vec::with_capacity(moves.len());
    for mv in moves.iter() {
        let m = *mv;
        let score = if Some(m) == tt_move {
            i32::MAX
        } else if Some(m) == killer1 {
            i32::MAX - 1
        } else if Some(m) == killer2 {
            i32::MAX - 2
        } else {
            let info = board.make_move(m);
            let replies = board.generate_variant_moves().len() as i32;
            board.unmake_move(m, info);
            -replies
        };
        scored.push((m, score));
    }

    scored.sort_by(|a, b| b.1.cmp(&a.1));
    rewrite_moves(moves, &scored);
}

fn rewrite_moves(moves: &mut MoveList, scored: &[(Move, i32)]) {
    let slice = moves.as_mut_slice();
    for (slot, (m, _)) in slice.iter_mut().zip(scored.iter()) {
        *slot = *m;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    #[test]
    fn tt_move_sorts_first() {
        let board = Board::new();
        let mut moves = board.clone().generate_moves();
        let ctx = OrderingContext::new(64);
        let tt_move = moves.get(5).unwrap();
        order_moves_standard(&board, &ctx, &mut moves, 0, Some(tt_move));
        assert_eq!(moves.get(0), Some(tt_move));
    }

    #[test]
    fn capture_outranks_quiet_when_winning_material() {
        let board = Board::from_fen("4k3/8/8/8/3p4/8/4P3/4K3 w - - 0 1");
        let mut moves = board.clone().generate_moves();
        let ctx = OrderingContext::new(64);
        order_moves_standard(&board, &ctx, &mut moves, 0, None);
        let capture = crate::board::Move::from_lan("e2d3").unwrap();
        assert_eq!(moves.get(0), Some(capture));
    }
}
