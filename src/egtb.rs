//! Endgame tablebase for few-piece antichess endings.
//!
//! The core treats the EGTB as an opaque oracle: `probe` returns a stored
//! result for a loaded board description, or `None` if nothing is loaded for
//! that material signature. Building and shipping `.egtb` files is outside
//! this crate's scope; `Egtb::load_dir` just reads whatever is present.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::board::{Board, Color, Move, Piece};

const PIECE_PRIMES: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

const PIECE_ORDER: [Piece; 6] = [
    Piece::Pawn,
    Piece::Knight,
    Piece::Bishop,
    Piece::Rook,
    Piece::Queen,
    Piece::King,
];

/// Index into `PIECE_PRIMES`/the fixed iteration order: Black pieces first
/// (pawn..king), then White (king..pawn) — see the module's index formula.
fn piece_index(color: Color, piece: Piece) -> usize {
    let rank = PIECE_ORDER.iter().position(|&p| p == piece).unwrap();
    match color {
        Color::Black => rank,
        Color::White => 11 - rank,
    }
}

/// Product of `piece_primes[piece_index]` over every occupied square;
/// identifies which `.egtb` file (material signature) a position belongs to.
pub fn board_description_id(board: &Board) -> u64 {
    let mut id = 1u64;
    for color in [Color::White, Color::Black] {
        for piece in PIECE_ORDER {
            let count = board.pieces_of(color, piece).0.count_ones();
            for _ in 0..count {
                id *= PIECE_PRIMES[piece_index(color, piece)];
            }
        }
    }
    id
}

/// Flat index within a material signature's table: `side_index * 64^n` plus
/// the occupied squares read off in the fixed piece iteration order, each
/// contributing one base-64 digit.
pub fn egtb_index(board: &Board) -> u64 {
    let mut squares: Vec<(usize, u64)> = Vec::new();
    for color in [Color::Black, Color::White] {
        let pieces: &[Piece] = if color == Color::Black {
            &PIECE_ORDER
        } else {
            const REV: [Piece; 6] = [
                Piece::King,
                Piece::Queen,
                Piece::Rook,
                Piece::Bishop,
                Piece::Knight,
                Piece::Pawn,
            ];
            &REV
        };
        for &piece in pieces {
            let mut bb = board.pieces_of(color, piece).0;
            while bb != 0 {
                let sq = bb.trailing_zeros() as u64;
                squares.push((piece_index(color, piece), sq));
                bb &= bb - 1;
            }
        }
    }

    let num_pieces = squares.len() as u32;
    let mut index = 0u64;
    for (_, sq) in &squares {
        index = index * 64 + sq;
    }
    let half_space = 64u64.pow(num_pieces);
    let side_index = match board.side_to_move() {
        Color::White => 0,
        Color::Black => 1,
    };
    side_index * half_space + index
}

/// Result for the side to move, as stored on disk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EgtbOutcome {
    Win,
    Loss,
    Draw,
}

#[derive(Clone, Copy, Debug)]
pub struct EgtbEntry {
    pub moves_to_end: u16,
    pub best_move: Move,
    pub outcome: EgtbOutcome,
}

/// A loaded set of `.egtb` files, keyed by the material signature they cover.
pub struct Egtb {
    tables: HashMap<u64, Vec<EgtbEntry>>,
}

impl Egtb {
    #[must_use]
    pub fn empty() -> Self {
        Egtb {
            tables: HashMap::new(),
        }
    }

    /// Load every `<id>.egtb` file in `dir`. Missing or malformed files are
    /// skipped; a directory with nothing useful yields an empty table set.
    pub fn load_dir(dir: impl AsRef<Path>) -> Self {
        let mut tables = HashMap::new();
        let Ok(entries) = fs::read_dir(dir) else {
            return Egtb { tables };
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("egtb") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let Ok(id) = stem.parse::<u64>() else {
                continue;
            };
            let Ok(bytes) = fs::read(&path) else {
                continue;
            };
            if let Some(parsed) = parse_egtb_file(&bytes) {
                tables.insert(id, parsed);
            }
        }
        Egtb { tables }
    }

    /// Look up the current position; `None` means no table is loaded for
    /// this material signature, or the position has no recorded entry.
    #[must_use]
    pub fn probe(&self, board: &Board) -> Option<EgtbEntry> {
        let id = board_description_id(board);
        let table = self.tables.get(&id)?;
        let index = egtb_index(board) as usize;
        table.get(index).copied()
    }
}

impl Default for Egtb {
    fn default() -> Self {
        Egtb::empty()
    }
}

/// Entry format: 2 bytes moves-to-end, 2 bytes best move (from/to packed),
/// 1 byte signed result, 3 bytes padding — 8 bytes per entry.
fn parse_egtb_file(bytes: &[u8]) -> Option<Vec<EgtbEntry>> {
    const ENTRY_SIZE: usize = 8;
    if bytes.len() % ENTRY_SIZE != 0 {
        return None;
    }
    let mut entries = Vec::with_capacity(bytes.len() / ENTRY_SIZE);
    for chunk in bytes.chunks_exact(ENTRY_SIZE) {
        let moves_to_end = u16::from_le_bytes([chunk[0], chunk[1]]);
        let move_bits = u16::from_le_bytes([chunk[2], chunk[3]]);
        let result = chunk[4] as i8;
        let outcome = match result {
            1 => EgtbOutcome::Win,
            -1 => EgtbOutcome::Loss,
            0 => EgtbOutcome::Draw,
            _ => return None,
        };
        entries.push(EgtbEntry {
            moves_to_end,
            best_move: Move(move_bits),
            outcome,
        });
    }
    Some(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    #[test]
    fn description_id_is_order_independent() {
        let a = Board::from_fen("8/8/8/5p2/5P2/8/8/8 w - - 0 1");
        let b = Board::from_fen("8/8/8/5P2/5p2/8/8/8 w - - 0 1");
        // Same material (one pawn each side), different squares: same id.
        assert_eq!(board_description_id(&a), board_description_id(&b));
    }

    #[test]
    fn empty_egtb_never_hits() {
        let egtb = Egtb::empty();
        let board = Board::from_fen("8/8/8/5p2/5P2/8/8/8 w - - 0 1");
        assert!(egtb.probe(&board).is_none());
    }

    #[test]
    fn index_accounts_for_side_to_move() {
        let white_to_move = Board::from_fen("8/8/8/5p2/5P2/8/8/8 w - - 0 1");
        let black_to_move = Board::from_fen("8/8/8/5p2/5P2/8/8/8 b - - 0 1");
        assert_ne!(egtb_index(&white_to_move), egtb_index(&black_to_move));
    }
}
