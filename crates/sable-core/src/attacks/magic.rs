//! Slider attacks through magic multiplication.
//!
//! Magic factors are searched for the first time a table is used, with a
//! fixed seed, so every process builds the same tables.

use std::sync::OnceLock;

use super::geometry::{DIRECTIONS, offset};

const ORTHOGONAL: [(i8, i8); 4] = [DIRECTIONS[0], DIRECTIONS[2], DIRECTIONS[4], DIRECTIONS[6]];
const DIAGONAL: [(i8, i8); 4] = [DIRECTIONS[1], DIRECTIONS[3], DIRECTIONS[5], DIRECTIONS[7]];

const ROOK_SEED: u64 = 0x7A3D_1C95_E2B4_F061;
const BISHOP_SEED: u64 = 0x1F0E_8D2C_6B4A_9375;

/// Attacks from `sq` along `dirs`, each ray stopping on the first occupied square.
pub(super) fn slide(sq: usize, dirs: &[(i8, i8); 4], occupied: u64) -> u64 {
    let mut attacks = 0;
    for &(df, dr) in dirs {
        let mut cur = sq;
        while let Some(next) = offset(cur, df, dr) {
            attacks |= 1 << next;
            if occupied & (1 << next) != 0 {
                break;
            }
            cur = next;
        }
    }
    attacks
}

/// Squares whose occupancy can change the attack set: every ray square
/// except the last one before the edge.
fn relevant_mask(sq: usize, dirs: &[(i8, i8); 4]) -> u64 {
    let mut mask = 0;
    for &(df, dr) in dirs {
        let mut cur = sq;
        while let Some(next) = offset(cur, df, dr) {
            if offset(next, df, dr).is_some() {
                mask |= 1 << next;
            }
            cur = next;
        }
    }
    mask
}

/// xorshift64, enough to draw candidate factors.
struct Rng(u64);

impl Rng {
    fn next(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }

    /// Candidates with few set bits succeed far more often.
    fn sparse(&mut self) -> u64 {
        self.next() & self.next() & self.next()
    }
}

#[derive(Debug, Clone, Copy)]
struct Magic {
    mask: u64,
    factor: u64,
    shift: u32,
    offset: usize,
}

impl Magic {
    #[inline(always)]
    fn index(&self, occupied: u64) -> usize {
        self.offset + ((occupied & self.mask).wrapping_mul(self.factor) >> self.shift) as usize
    }
}

pub(super) struct SliderTable {
    magics: Vec<Magic>,
    attacks: Vec<u64>,
}

impl SliderTable {
    fn build(dirs: &[(i8, i8); 4], seed: u64) -> SliderTable {
        let mut rng = Rng(seed);
        let mut magics = Vec::with_capacity(64);
        let mut attacks = Vec::new();
        for sq in 0..64 {
            let (factor, slots) = find_magic(sq, dirs, &mut rng);
            let mask = relevant_mask(sq, dirs);
            magics.push(Magic { mask, factor, shift: 64 - mask.count_ones(), offset: attacks.len() });
            attacks.extend(slots);
        }
        SliderTable { magics, attacks }
    }

    #[inline]
    pub(super) fn get(&self, sq: usize, occupied: u64) -> u64 {
        self.attacks[self.magics[sq].index(occupied)]
    }

    #[cfg(test)]
    pub(super) fn len(&self) -> usize {
        self.attacks.len()
    }
}

/// Draw factors until one maps every occupancy of the mask to a slot that
/// no occupancy with different attacks also uses.
fn find_magic(sq: usize, dirs: &[(i8, i8); 4], rng: &mut Rng) -> (u64, Vec<u64>) {
    let mask = relevant_mask(sq, dirs);
    let shift = 64 - mask.count_ones();
    let size = 1usize << mask.count_ones();

    // Carry-rippler walk over every subset of the mask.
    let mut cases = Vec::with_capacity(size);
    let mut subset = 0u64;
    loop {
        cases.push((subset, slide(sq, dirs, subset)));
        subset = subset.wrapping_sub(mask) & mask;
        if subset == 0 {
            break;
        }
    }

    let mut slots = vec![0u64; size];
    let mut stamp = vec![0u32; size];
    let mut attempt = 0u32;
    loop {
        let factor = rng.sparse();
        if (mask.wrapping_mul(factor) >> 56).count_ones() < 6 {
            continue;
        }
        attempt += 1;
        let fits = cases.iter().all(|&(occupied, attack)| {
            let i = (occupied.wrapping_mul(factor) >> shift) as usize;
            if stamp[i] != attempt {
                stamp[i] = attempt;
                slots[i] = attack;
                true
            } else {
                slots[i] == attack
            }
        });
        if fits {
            return (factor, slots);
        }
    }
}

pub(super) fn rooks() -> &'static SliderTable {
    static TABLE: OnceLock<SliderTable> = OnceLock::new();
    TABLE.get_or_init(|| SliderTable::build(&ORTHOGONAL, ROOK_SEED))
}

pub(super) fn bishops() -> &'static SliderTable {
    static TABLE: OnceLock<SliderTable> = OnceLock::new();
    TABLE.get_or_init(|| SliderTable::build(&DIAGONAL, BISHOP_SEED))
}

#[cfg(test)]
pub(super) fn orthogonal_slide(sq: usize, occupied: u64) -> u64 {
    slide(sq, &ORTHOGONAL, occupied)
}

#[cfg(test)]
pub(super) fn diagonal_slide(sq: usize, occupied: u64) -> u64 {
    slide(sq, &DIAGONAL, occupied)
}
