//! Principal-variation alpha-beta, the core recursive search.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::board::{Board, Move, Variant};
use crate::eval::evaluate;
use crate::ordering::{order_moves_standard, order_moves_variant};
use crate::tt::{NodeType, WIN_SCORE};

use super::SearchState;

pub struct SearchContext<'a> {
    pub state: &'a mut SearchState,
    pub stop: &'a Arc<AtomicBool>,
    pub hard_deadline_hit: &'a dyn Fn() -> bool,
    pub epoch: u8,
}

/// Any repeated ancestor position (not just the rules' 3-fold) is treated as
/// a draw for search purposes, so the tree doesn't burn depth chasing a line
/// the opponent can simply repeat.
fn has_single_repetition(board: &Board) -> bool {
    let limit = board.halfmove_clock() as usize;
    let history = &board.history;
    let len = history.len();
    if len == 0 {
        return false;
    }
    let key = board.hash();
    let mut d = 4usize;
    while d <= limit && d <= len {
        if history[len - d] == key {
            return true;
        }
        d += 2;
    }
    false
}

/// `pvs(depth, alpha, beta, ply, allow_null) -> score`, from the
/// side-to-move's perspective. Mirrors spec's 11-step algorithm.
pub fn pvs(board: &mut Board, ctx: &mut SearchContext, depth: i32, mut alpha: i32, beta: i32, ply: u32, allow_null: bool) -> i32 {
    ctx.state.stats.nodes += 1;
    if ply > ctx.state.stats.seldepth {
        ctx.state.stats.seldepth = ply;
    }

    if ply > 0 && (board.is_draw() || has_single_repetition(board)) {
        return 0;
    }

    if ctx.stop.load(Ordering::Relaxed) || (ctx.hard_deadline_hit)() {
        return evaluate(board);
    }

    if depth <= 0 {
        return quiescence(board, ctx, alpha, beta, ply);
    }

    let key = board.hash();
    let mut tt_move: Option<Move> = None;
    if let Some(hit) = ctx.state.tt.probe(key, ctx.epoch) {
        tt_move = hit.best_move;
        if hit.depth as i32 >= depth {
            let usable = match hit.node_type {
                NodeType::Exact => true,
                NodeType::FailHigh => hit.score >= beta,
                NodeType::FailLow => hit.score <= alpha,
            };
            if usable || hit.score.abs() >= WIN_SCORE && hit.node_type == NodeType::Exact {
                return hit.score;
            }
        }
    }

    if tt_move.is_none() && depth > 3 {
        pvs(board, ctx, depth - 3, alpha, beta, ply, allow_null);
        if let Some(hit) = ctx.state.tt.probe(key, ctx.epoch) {
            tt_move = hit.best_move;
        }
    }

    let in_check = board.is_in_check(board.side_to_move());
    let is_variant = board.variant() != Variant::Standard;
    let mut moves = if is_variant {
        board.generate_variant_moves()
    } else {
        board.generate_moves()
    };

    if moves.is_empty() {
        return evaluate(board);
    }

    if allow_null
        && !is_variant
        && depth >= 2
        && beta < WIN_SCORE
        && !in_check
        && board.piece_count(board.side_to_move()) + board.piece_count(board.side_to_move().opponent()) > 10
    {
        let info = board.make_null_move();
        let value = -pvs(board, ctx, depth - 2, -beta, -beta + 1, ply + 1, false);
        board.unmake_null_move(info);
        if value >= beta {
            return beta;
        }
    }

    if is_variant {
        order_moves_variant(board, &ctx.state.ordering, &mut moves, ply as usize, tt_move);
    } else {
        order_moves_standard(board, &ctx.state.ordering, &mut moves, ply as usize, tt_move);
    }

    let mut score = i32::MIN + 1;
    let mut node_type = NodeType::FailLow;
    let mut best_move: Option<Move> = None;
    let mut b = beta;
    let params_lmr_min_move = ctx.state.params.lmr_min_move_index;
    let params_lmr_min_depth = ctx.state.params.lmr_min_depth;

    for (i, mv) in moves.iter().enumerate() {
        let mv = *mv;
        let info = board.make_move(mv);

        let mut value;
        let mut did_lmr = false;
        if i >= params_lmr_min_move && depth as u32 >= params_lmr_min_depth {
            value = -pvs(board, ctx, depth - 2, -alpha - 1, -alpha, ply + 1, true);
            did_lmr = true;
        } else {
            value = i32::MIN + 1;
        }

        if !did_lmr || value > alpha {
            value = -pvs(board, ctx, depth - 1, -b, -alpha, ply + 1, true);
        }

        if value >= b && value < beta && i > 0 && depth > 1 {
            value = -pvs(board, ctx, depth - 1, -beta, -alpha, ply + 1, true);
        }

        board.unmake_move(mv, info);

        if value > score {
            score = value;
            if score > alpha {
                best_move = Some(mv);
                node_type = NodeType::Exact;
                alpha = score;
            }
            if alpha >= beta {
                node_type = NodeType::FailHigh;
                let is_quiet = if is_variant {
                    true
                } else {
                    board.piece_at(mv.to()).is_none()
                };
                if Some(mv) != tt_move && is_quiet {
                    ctx.state.ordering.record_killer(ply as usize, mv);
                    if let Some((_, piece)) = board.piece_at(mv.from()) {
                        ctx.state.ordering.record_history(piece, mv, (depth * depth) as i32);
                    }
                }
                break;
            }
        }
        b = alpha + 1;
    }

    if !ctx.stop.load(Ordering::Relaxed) && !(ctx.hard_deadline_hit)() {
        ctx.state.tt.store(key, score, node_type, depth.max(0) as u32, best_move, ctx.epoch);
    }

    score
}

/// Root search restricted to a caller-supplied move list (e.g. a PNS-pruned
/// set of non-losing moves), otherwise identical to `pvs`'s steps 9-11.
pub fn pvs_root_restricted(board: &mut Board, ctx: &mut SearchContext, depth: i32, root_moves: &[Move]) -> (i32, Option<Move>) {
    let mut alpha = i32::MIN + 1;
    let beta = i32::MAX - 1;
    let mut score = i32::MIN + 1;
    let mut best_move: Option<Move> = None;
    let key = board.hash();

    for (i, &mv) in root_moves.iter().enumerate() {
        let info = board.make_move(mv);
        let value = if i == 0 {
            -pvs(board, ctx, depth - 1, -beta, -alpha, 1, true)
        } else {
            let v = -pvs(board, ctx, depth - 1, -alpha - 1, -alpha, 1, true);
            if v > alpha {
                -pvs(board, ctx, depth - 1, -beta, -alpha, 1, true)
            } else {
                v
            }
        };
        board.unmake_move(mv, info);

        if value > score {
            score = value;
            best_move = Some(mv);
            if value > alpha {
                alpha = value;
            }
        }
    }

    if !ctx.stop.load(Ordering::Relaxed) && !(ctx.hard_deadline_hit)() {
        ctx.state.tt.store(key, score, NodeType::Exact, depth.max(0) as u32, best_move, ctx.epoch);
    }

    (score, best_move)
}

const MAX_QSEARCH_PLY: u32 = 32;

/// Quiescence search: keep resolving captures (all moves, in the giveaway
/// variants, since every move is forced once a capture exists) until the
/// position is quiet, to avoid misjudging a position mid-exchange.
fn quiescence(board: &mut Board, ctx: &mut SearchContext, mut alpha: i32, beta: i32, ply: u32) -> i32 {
    ctx.state.stats.nodes += 1;
    let stand_pat = evaluate(board);
    if ply >= MAX_QSEARCH_PLY {
        return stand_pat;
    }
    if stand_pat >= beta {
        return beta;
    }
    if stand_pat > alpha {
        alpha = stand_pat;
    }

    let is_variant = board.variant() != Variant::Standard;
    let moves = if is_variant {
        board.generate_variant_moves()
    } else {
        board.generate_moves()
    };

    for mv in moves.iter() {
        let mv = *mv;
        let is_capture = if is_variant {
            true
        } else {
            match board.piece_at(mv.from()) {
                Some((_, piece)) => board.is_capture(mv, piece),
                None => false,
            }
        };
        if !is_capture {
            continue;
        }
        let info = board.make_move(mv);
        let value = -quiescence(board, ctx, -beta, -alpha, ply + 1);
        board.unmake_move(mv, info);

        if value >= beta {
            return beta;
        }
        if value > alpha {
            alpha = value;
        }
    }

    alpha
}
