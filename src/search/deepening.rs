//! Iterative deepening loop around `pvs`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::board::{Board, Move};
use crate::tt::WIN_SCORE;

use super::pvs::{pvs, pvs_root_restricted, SearchContext};
use super::timer::SearchClock;
use super::{IterationInfo, SearchResult, SearchState};

const DEFAULT_MAX_DEPTH: u32 = 64;

pub struct DeepeningConfig {
    pub max_depth: Option<u32>,
    pub root_moves: Option<Vec<Move>>,
    pub info_callback: Option<Box<dyn FnMut(&IterationInfo)>>,
}

impl Default for DeepeningConfig {
    fn default() -> Self {
        DeepeningConfig {
            max_depth: None,
            root_moves: None,
            info_callback: None,
        }
    }
}

/// Loop `depth = 1..max_depth`, each iteration searching the full window
/// from the root. Stops when the timer lapses after the depth's first root
/// move completes, Win is found, or `max_depth` is reached; a depth whose
/// first root move never finishes is discarded in favor of the previous
/// depth's result.
pub fn iterative_deepen(
    board: &mut Board,
    state: &mut SearchState,
    clock: &Arc<SearchClock>,
    stop: &Arc<AtomicBool>,
    epoch: u8,
    mut config: DeepeningConfig,
) -> SearchResult {
    state.new_search();
    let max_depth = config.max_depth.unwrap_or(DEFAULT_MAX_DEPTH);
    let start = Instant::now();

    let mut result = SearchResult::default();

    for depth in 1..=max_depth {
        if depth > 1 && (clock.hard_expired() || stop.load(Ordering::Relaxed)) {
            break;
        }
        let hard_hit = || clock.hard_expired();
        let mut ctx = SearchContext {
            state: &mut *state,
            stop,
            hard_deadline_hit: &hard_hit,
            epoch,
        };

        let (score, best_move) = if depth == 1 && config.root_moves.is_some() {
            let root_moves = config.root_moves.as_ref().unwrap();
            pvs_root_restricted(board, &mut ctx, depth as i32, root_moves)
        } else {
            let score = pvs(board, &mut ctx, depth as i32, i32::MIN + 1, i32::MAX - 1, 0, true);
            let best = ctx.state.tt.probe(board.hash(), epoch).and_then(|p| p.best_move);
            (score, best)
        };

        // PNS-pruned root list only applies to the first iteration; later
        // iterations let the move orderer (now primed via the TT) search
        // every legal move again.
        if depth == 1 {
            config.root_moves = None;
        }

        if let Some(mv) = best_move {
            result.best_move = Some(mv);
            result.score = score;
            result.depth = depth;
        }

        if let Some(cb) = config.info_callback.as_mut() {
            cb(&IterationInfo {
                depth,
                score,
                nodes: state.stats.nodes,
                elapsed_centis: (start.elapsed().as_millis() / 10) as u64,
                pv: extract_pv(board, state, epoch, depth),
            });
        }

        if score.abs() >= WIN_SCORE {
            break;
        }
        if clock.soft_expired() || clock.hard_expired() || stop.load(Ordering::Relaxed) {
            break;
        }
    }

    result.ponder_move = result
        .best_move
        .and_then(|mv| {
            let info = board.make_move(mv);
            let reply = state.tt.probe(board.hash(), epoch).and_then(|p| p.best_move);
            board.unmake_move(mv, info);
            reply
        });

    result
}

/// Walk the TT from the root, following each position's stored best move,
/// to reconstruct the principal variation. Bounded so a TT cycle (possible
/// once entries start aging out mid-walk) can't loop forever.
fn extract_pv(board: &mut Board, state: &SearchState, epoch: u8, max_len: u32) -> Vec<Move> {
    let mut pv = Vec::new();
    let mut undo = Vec::new();
    let limit = max_len.min(10);

    for _ in 0..limit {
        let Some(hit) = state.tt.probe(board.hash(), epoch) else {
            break;
        };
        let Some(mv) = hit.best_move else { break };
        let info = board.make_move(mv);
        undo.push((mv, info));
        pv.push(mv);
    }

    for (mv, info) in undo.into_iter().rev() {
        board.unmake_move(mv, info);
    }

    pv
}
