//! Zobrist hashing: a process-wide, read-only table of random keys used to
//! maintain each position's incremental hash (spec §2.2, §9).
//!
//! Keys are generated once from a fixed seed, so the same table (and the
//! same hashes) come out of every run — no mutable global state, just a
//! deterministic construction step, mirroring the magic-number tables.

use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::board::{Color, Piece, Square};

const ZOBRIST_SEED: u64 = 0xC0DE_FACE_B16B_00B5;

pub(crate) struct ZobristKeys {
    pub piece_keys: [[[u64; 64]; 2]; 6],
    pub black_to_move_key: u64,
    /// `[color][0 = kingside, 1 = queenside]`.
    pub castling_keys: [[u64; 2]; 2],
    /// Indexed by en-passant target file.
    pub en_passant_keys: [u64; 8],
}

pub(crate) static ZOBRIST: Lazy<ZobristKeys> = Lazy::new(|| {
    let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);

    let mut piece_keys = [[[0u64; 64]; 2]; 6];
    for piece in piece_keys.iter_mut() {
        for color in piece.iter_mut() {
            for key in color.iter_mut() {
                *key = rng.gen::<u64>();
            }
        }
    }

    let mut castling_keys = [[0u64; 2]; 2];
    for color in castling_keys.iter_mut() {
        for key in color.iter_mut() {
            *key = rng.gen::<u64>();
        }
    }

    let mut en_passant_keys = [0u64; 8];
    for key in en_passant_keys.iter_mut() {
        *key = rng.gen::<u64>();
    }

    ZobristKeys {
        piece_keys,
        black_to_move_key: rng.gen::<u64>(),
        castling_keys,
        en_passant_keys,
    }
});

#[inline]
pub(crate) fn piece_to_zobrist_index(piece: Piece) -> usize {
    piece.index()
}

#[inline]
pub(crate) fn color_to_zobrist_index(color: Color) -> usize {
    color.index()
}

#[inline]
pub(crate) fn square_to_zobrist_index(square: Square) -> usize {
    square.bit_index()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_distinct() {
        assert_ne!(
            ZOBRIST.piece_keys[0][0][0],
            ZOBRIST.piece_keys[0][0][1],
            "two different squares must not share a key"
        );
        assert_ne!(
            ZOBRIST.piece_keys[0][0][0],
            ZOBRIST.piece_keys[1][0][0],
            "two different pieces must not share a key"
        );
    }

    #[test]
    fn table_is_reproducible() {
        // Lazy caches the first build; this just checks the table is
        // internally consistent across repeated reads.
        let a = ZOBRIST.black_to_move_key;
        let b = ZOBRIST.black_to_move_key;
        assert_eq!(a, b);
    }
}
