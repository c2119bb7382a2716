//! Search driver: spec's top-level `search(params, time_centis) -> Move`.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::board::{Board, Move, Variant};
use crate::egtb::Egtb;
use crate::pns;

use super::deepening::{iterative_deepen, DeepeningConfig};
use super::timer::SearchClock;
use super::{SearchResult, SearchState};

/// Parameters a caller (UCI/XBoard front end) hands to one `go`.
pub struct DriverParams {
    pub max_depth: Option<u32>,
    pub info_callback: Option<Box<dyn FnMut(&super::IterationInfo)>>,
}

impl Default for DriverParams {
    fn default() -> Self {
        DriverParams {
            max_depth: None,
            info_callback: None,
        }
    }
}

/// Runs spec §4.10's six-step driver: EGTB shortcut, single-legal-move
/// shortcut, an optional PNS pre-pass for the giveaway variants, then
/// iterative deepening with whatever time remains.
pub fn search(
    board: &mut Board,
    state: &mut SearchState,
    egtb: Option<&Egtb>,
    time_centis: u64,
    stop: &Arc<AtomicBool>,
    params: DriverParams,
) -> SearchResult {
    let epoch = (board.halfmove_clock() % 256) as u8;

    if let Some(egtb) = egtb {
        if board.piece_count(crate::board::Color::White) + board.piece_count(crate::board::Color::Black) <= 2 {
            if let Some(entry) = egtb.probe(board) {
                return SearchResult {
                    best_move: Some(entry.best_move),
                    ponder_move: None,
                    score: 0,
                    depth: 0,
                };
            }
        }
    }

    let is_variant = board.variant() != Variant::Standard;
    let legal_moves: Vec<Move> = if is_variant {
        board.generate_variant_moves().iter().copied().collect()
    } else {
        board.generate_moves().iter().copied().collect()
    };
    if legal_moves.len() == 1 {
        return SearchResult {
            best_move: Some(legal_moves[0]),
            ponder_move: None,
            score: 0,
            depth: 0,
        };
    }

    let mut remaining_centis = time_centis;
    let mut root_moves = None;
    if is_variant && state.params.enable_pns {
        let pns_budget = Duration::from_millis(
            ((time_centis as f64 * state.params.pns_time_fraction) * 10.0) as u64,
        );
        let pns_start = Instant::now();
        root_moves = pns::driver_search(board, egtb, pns_budget);
        let elapsed_centis = (pns_start.elapsed().as_millis() / 10) as u64;
        remaining_centis = remaining_centis.saturating_sub(elapsed_centis);
    }

    let clock = Arc::new(SearchClock::new(
        Instant::now(),
        Some(Instant::now() + Duration::from_millis(remaining_centis * 10)),
        Some(Instant::now() + Duration::from_millis(remaining_centis * 10 + remaining_centis * 5)),
    ));

    let config = DeepeningConfig {
        max_depth: params.max_depth,
        root_moves,
        info_callback: params.info_callback,
    };

    iterative_deepen(board, state, &clock, stop, epoch, config)
}
