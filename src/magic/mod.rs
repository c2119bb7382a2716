//! Magic-bitboard sliding attack generation.
//!
//! For each square and each slider family (rook, bishop) we look for a
//! 64-bit "magic" multiplier that, applied to the relevant occupancy bits
//! for that square, perfect-hashes every possible blocker configuration
//! into a dense attack table. The search is brute-force but deterministic:
//! a fixed seed means the same magics (and the same attack tables) are
//! produced on every run, which keeps Zobrist-independent perft results
//! reproducible across platforms.

use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const MAGIC_SEED: u64 = 0x5EED_C0FF_EE15_BEEF;

const DIR_N: (isize, isize) = (1, 0);
const DIR_S: (isize, isize) = (-1, 0);
const DIR_E: (isize, isize) = (0, 1);
const DIR_W: (isize, isize) = (0, -1);
const DIR_NE: (isize, isize) = (1, 1);
const DIR_NW: (isize, isize) = (1, -1);
const DIR_SE: (isize, isize) = (-1, 1);
const DIR_SW: (isize, isize) = (-1, -1);

const ROOK_DIRS: [(isize, isize); 4] = [DIR_N, DIR_S, DIR_E, DIR_W];
const BISHOP_DIRS: [(isize, isize); 4] = [DIR_NE, DIR_NW, DIR_SE, DIR_SW];

fn ray_attacks_with_blockers(sq: usize, dirs: &[(isize, isize)], occupancy: u64) -> u64 {
    let r = (sq / 8) as isize;
    let f = (sq % 8) as isize;
    let mut attacks = 0u64;
    for &(dr, df) in dirs {
        let mut nr = r + dr;
        let mut nf = f + df;
        while (0..8).contains(&nr) && (0..8).contains(&nf) {
            let idx = (nr as usize) * 8 + (nf as usize);
            attacks |= 1u64 << idx;
            if occupancy & (1u64 << idx) != 0 {
                break;
            }
            nr += dr;
            nf += df;
        }
    }
    attacks
}

/// The "relevant occupancy" mask for a slider on `sq`: the full ray,
/// excluding the board edge (an edge blocker is always there, so it never
/// affects which squares are reachable).
fn relevant_mask(sq: usize, dirs: &[(isize, isize)]) -> u64 {
    let r = (sq / 8) as isize;
    let f = (sq % 8) as isize;
    let mut mask = 0u64;
    for &(dr, df) in dirs {
        let mut nr = r + dr;
        let mut nf = f + df;
        loop {
            let next_r = nr + dr;
            let next_f = nf + df;
            if !(0..8).contains(&next_r) || !(0..8).contains(&next_f) {
                break;
            }
            if !(0..8).contains(&nr) || !(0..8).contains(&nf) {
                break;
            }
            let idx = (nr as usize) * 8 + (nf as usize);
            mask |= 1u64 << idx;
            nr = next_r;
            nf = next_f;
        }
    }
    mask
}

fn occupancy_subset(index: usize, mask: u64) -> u64 {
    let mut result = 0u64;
    let mut m = mask;
    let mut i = index;
    while m != 0 {
        let sq = m.trailing_zeros();
        m &= m - 1;
        if i & 1 != 0 {
            result |= 1u64 << sq;
        }
        i >>= 1;
    }
    result
}

struct MagicEntry {
    mask: u64,
    magic: u64,
    shift: u32,
    table: Vec<u64>,
}

impl MagicEntry {
    #[inline]
    fn attacks(&self, occupancy: u64) -> u64 {
        let relevant = occupancy & self.mask;
        let idx = ((relevant.wrapping_mul(self.magic)) >> self.shift) as usize;
        self.table[idx]
    }
}

fn find_magic(sq: usize, dirs: &[(isize, isize)], rng: &mut StdRng) -> MagicEntry {
    let mask = relevant_mask(sq, dirs);
    let bits = mask.count_ones();
    let shift = 64 - bits;
    let size = 1usize << bits;

    let mut occupancies = Vec::with_capacity(size);
    let mut references = Vec::with_capacity(size);
    for index in 0..size {
        let occ = occupancy_subset(index, mask);
        occupancies.push(occ);
        references.push(ray_attacks_with_blockers(sq, dirs, occ));
    }

    loop {
        // Sparse random candidates (AND of a few random u64s) collide far
        // less often than uniformly random ones; this is the standard
        // technique for magic-number search.
        let candidate: u64 = rng.gen::<u64>() & rng.gen::<u64>() & rng.gen::<u64>();
        if (candidate.wrapping_mul(mask)) >> 56 < 6 {
            continue;
        }
        let mut table = vec![u64::MAX; size];
        let mut ok = true;
        for index in 0..size {
            let occ = occupancies[index];
            let attack = references[index];
            let hash = ((occ.wrapping_mul(candidate)) >> shift) as usize;
            if table[hash] == u64::MAX {
                table[hash] = attack;
            } else if table[hash] != attack {
                ok = false;
                break;
            }
        }
        if ok {
            for slot in table.iter_mut() {
                if *slot == u64::MAX {
                    *slot = 0;
                }
            }
            return MagicEntry {
                mask,
                magic: candidate,
                shift,
                table,
            };
        }
    }
}

struct MagicTables {
    rook: Vec<MagicEntry>,
    bishop: Vec<MagicEntry>,
}

static TABLES: Lazy<MagicTables> = Lazy::new(|| {
    let mut rng = StdRng::seed_from_u64(MAGIC_SEED);
    let mut rook = Vec::with_capacity(64);
    let mut bishop = Vec::with_capacity(64);
    for sq in 0..64 {
        rook.push(find_magic(sq, &ROOK_DIRS, &mut rng));
    }
    for sq in 0..64 {
        bishop.push(find_magic(sq, &BISHOP_DIRS, &mut rng));
    }
    MagicTables { rook, bishop }
});

pub fn rook_attacks(sq: usize, occupancy: u64) -> u64 {
    TABLES.rook[sq].attacks(occupancy)
}

pub fn bishop_attacks(sq: usize, occupancy: u64) -> u64 {
    TABLES.bishop[sq].attacks(occupancy)
}

pub fn queen_attacks(sq: usize, occupancy: u64) -> u64 {
    rook_attacks(sq, occupancy) | bishop_attacks(sq, occupancy)
}

pub(crate) fn slider_attacks(from_idx: usize, occupancy: u64, bishop: bool) -> u64 {
    if bishop {
        bishop_attacks(from_idx, occupancy)
    } else {
        rook_attacks(from_idx, occupancy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_rook(sq: usize, occ: u64) -> u64 {
        ray_attacks_with_blockers(sq, &ROOK_DIRS, occ)
    }

    fn naive_bishop(sq: usize, occ: u64) -> u64 {
        ray_attacks_with_blockers(sq, &BISHOP_DIRS, occ)
    }

    #[test]
    fn rook_matches_naive_rays_on_empty_board() {
        for sq in 0..64 {
            assert_eq!(rook_attacks(sq, 0), naive_rook(sq, 0));
        }
    }

    #[test]
    fn bishop_matches_naive_rays_with_blockers() {
        let occ = 0x0000_1000_0010_0000u64;
        for sq in 0..64 {
            assert_eq!(bishop_attacks(sq, occ), naive_bishop(sq, occ));
        }
    }

    #[test]
    fn rook_on_d4_with_blockers_stops_at_first_piece() {
        let d4 = 3 * 8 + 3;
        let occ = 1u64 << (3 * 8 + 6); // blocker on g4
        let attacks = rook_attacks(d4, occ);
        assert!(attacks & (1u64 << (3 * 8 + 6)) != 0);
        assert!(attacks & (1u64 << (3 * 8 + 7)) == 0);
    }
}
