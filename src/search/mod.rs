//! Principal-variation search: the engine's main move finder.
//!
//! Layout mirrors the separation the teacher's nested search used (tables
//! persisted across a game, a clock shared with the caller for external
//! stop signals, configuration separate from both) but rebuilt against this
//! repo's transposition table, evaluator and move orderer, and trimmed to
//! spec's literal algorithm rather than the teacher's full tournament-engine
//! feature set.

mod deepening;
mod driver;
mod pvs;
mod timer;

pub use driver::search;
pub use timer::{SearchClock, TimeAllocation};

use crate::board::{Move, MAX_PLY};
use crate::ordering::OrderingContext;
use crate::tt::TranspositionTable;

/// Default hash table size in megabytes for a fresh `SearchState`.
pub const DEFAULT_TT_MB: usize = 64;

/// Tunable search constants. Spec leaves exact values as engineering
/// judgment; defaults below are conservative, well-trodden choices.
#[derive(Clone, Debug)]
pub struct SearchParams {
    pub null_move_min_depth: u32,
    pub null_move_reduction: u32,
    pub null_move_min_pieces: u32,
    pub lmr_min_move_index: usize,
    pub lmr_min_depth: u32,
    pub iid_min_depth: u32,
    pub enable_pns: bool,
    pub pns_time_fraction: f64,
}

impl Default for SearchParams {
    fn default() -> Self {
        SearchParams {
            null_move_min_depth: 2,
            null_move_reduction: 2,
            null_move_min_pieces: 10,
            lmr_min_move_index: 4,
            lmr_min_depth: 2,
            iid_min_depth: 4,
            enable_pns: true,
            pns_time_fraction: 0.05,
        }
    }
}

/// Nodes visited and other counters collected during one `go`.
#[derive(Default)]
pub struct SearchStats {
    pub nodes: u64,
    pub seldepth: u32,
}

/// State persisted across searches within one game: TT, killers/history,
/// tunable params. A fresh `SearchState` starts a fresh game.
pub struct SearchState {
    pub tt: TranspositionTable,
    pub ordering: OrderingContext,
    pub stats: SearchStats,
    pub params: SearchParams,
}

impl SearchState {
    #[must_use]
    pub fn new(tt_mb: usize) -> Self {
        SearchState {
            tt: TranspositionTable::new(tt_mb),
            ordering: OrderingContext::new(MAX_PLY),
            stats: SearchStats::default(),
            params: SearchParams::default(),
        }
    }

    pub fn new_search(&mut self) {
        self.stats = SearchStats::default();
    }
}

/// Result of a completed search.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    pub ponder_move: Option<Move>,
    pub score: i32,
    pub depth: u32,
}

/// One completed-iteration report, handed to an optional info callback so
/// UCI/XBoard front ends can print `info depth ... pv ...` as the search
/// runs rather than only at the end.
#[derive(Debug, Clone)]
pub struct IterationInfo {
    pub depth: u32,
    pub score: i32,
    pub nodes: u64,
    pub elapsed_centis: u64,
    pub pv: Vec<Move>,
}
