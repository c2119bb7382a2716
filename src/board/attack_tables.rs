//! Precomputed non-sliding attack tables (knight, king, pawn). Sliding
//! piece attacks are produced by the magic-bitboard tables in
//! [`crate::magic`] instead.

use once_cell::sync::Lazy;

pub(crate) static KNIGHT_ATTACKS: Lazy<[u64; 64]> = Lazy::new(|| {
    let mut attacks = [0u64; 64];
    let deltas = [
        (2, 1),
        (1, 2),
        (-1, 2),
        (-2, 1),
        (-2, -1),
        (-1, -2),
        (1, -2),
        (2, -1),
    ];
    for sq in 0..64 {
        let r = (sq / 8) as isize;
        let f = (sq % 8) as isize;
        let mut mask = 0u64;
        for (dr, df) in deltas {
            let nr = r + dr;
            let nf = f + df;
            if nr >= 0 && nr < 8 && nf >= 0 && nf < 8 {
                let idx = (nr as usize) * 8 + (nf as usize);
                mask |= 1u64 << idx;
            }
        }
        attacks[sq] = mask;
    }
    attacks
});

pub(crate) static KING_ATTACKS: Lazy<[u64; 64]> = Lazy::new(|| {
    let mut attacks = [0u64; 64];
    let deltas = [
        (1, 0),
        (-1, 0),
        (0, 1),
        (0, -1),
        (1, 1),
        (1, -1),
        (-1, 1),
        (-1, -1),
    ];
    for sq in 0..64 {
        let r = (sq / 8) as isize;
        let f = (sq % 8) as isize;
        let mut mask = 0u64;
        for (dr, df) in deltas {
            let nr = r + dr;
            let nf = f + df;
            if nr >= 0 && nr < 8 && nf >= 0 && nf < 8 {
                let idx = (nr as usize) * 8 + (nf as usize);
                mask |= 1u64 << idx;
            }
        }
        attacks[sq] = mask;
    }
    attacks
});

/// `PAWN_ATTACKS[color.index()][sq]`: squares a pawn of that color on `sq`
/// attacks diagonally (not its push squares).
pub(crate) static PAWN_ATTACKS: Lazy<[[u64; 64]; 2]> = Lazy::new(|| {
    let mut attacks = [[0u64; 64]; 2];
    for sq in 0..64 {
        let r = (sq / 8) as isize;
        let f = (sq % 8) as isize;
        let mut white = 0u64;
        let wr = r + 1;
        if (0..8).contains(&wr) {
            for df in [-1, 1] {
                let wf = f + df;
                if (0..8).contains(&wf) {
                    white |= 1u64 << ((wr as usize) * 8 + (wf as usize));
                }
            }
        }
        attacks[0][sq] = white;
        let mut black = 0u64;
        let br = r - 1;
        if (0..8).contains(&br) {
            for df in [-1, 1] {
                let bf = f + df;
                if (0..8).contains(&bf) {
                    black |= 1u64 << ((br as usize) * 8 + (bf as usize));
                }
            }
        }
        attacks[1][sq] = black;
    }
    attacks
});

pub(crate) const DIR_N: usize = 0;
pub(crate) const DIR_S: usize = 1;
pub(crate) const DIR_E: usize = 2;
pub(crate) const DIR_W: usize = 3;
pub(crate) const DIR_NE: usize = 4;
pub(crate) const DIR_NW: usize = 5;
pub(crate) const DIR_SE: usize = 6;
pub(crate) const DIR_SW: usize = 7;

/// Full unblocked rays from each square in each of the 8 directions, used
/// by SEE's x-ray detection and by the pin-detection legality check.
pub(crate) static RAYS: Lazy<[[u64; 64]; 8]> = Lazy::new(|| {
    let mut rays = [[0u64; 64]; 8];
    let dirs = [
        (1, 0),
        (-1, 0),
        (0, 1),
        (0, -1),
        (1, 1),
        (1, -1),
        (-1, 1),
        (-1, -1),
    ];
    for sq in 0..64 {
        let r = (sq / 8) as isize;
        let f = (sq % 8) as isize;
        for (d, (dr, df)) in dirs.iter().enumerate() {
            let mut mask = 0u64;
            let mut nr = r + dr;
            let mut nf = f + df;
            while nr >= 0 && nr < 8 && nf >= 0 && nf < 8 {
                let idx = (nr as usize) * 8 + (nf as usize);
                mask |= 1u64 << idx;
                nr += dr;
                nf += df;
            }
            rays[d][sq] = mask;
        }
    }
    rays
});

pub(crate) fn slider_attacks(from_idx: usize, occupancy: u64, bishop: bool) -> u64 {
    crate::magic::slider_attacks(from_idx, occupancy, bishop)
}
