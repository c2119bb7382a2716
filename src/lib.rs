//! A chess/antichess engine: move generation and rules for both variants,
//! PVS search backed by a lock-free transposition table, proof-number
//! search for giveaway endgames, and UCI/XBoard front ends.

pub mod board;
pub mod magic;
pub mod zobrist;

pub mod eval;
pub mod ordering;
pub mod see;
pub mod tt;

pub mod egtb;
pub mod pns;
pub mod search;

pub mod book;
pub mod uci;
pub mod xboard;
