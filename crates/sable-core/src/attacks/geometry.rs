//! Compile-time step and ray tables.

use crate::bitboard::Bitboard;

/// The eight compass directions as `(file, rank)` steps, clockwise from
/// north. Direction `d` and `(d + 4) % 8` point opposite ways.
pub(super) const DIRECTIONS: [(i8, i8); 8] =
    [(0, 1), (1, 1), (1, 0), (1, -1), (0, -1), (-1, -1), (-1, 0), (-1, 1)];

const KNIGHT_STEPS: [(i8, i8); 8] =
    [(1, 2), (2, 1), (2, -1), (1, -2), (-1, -2), (-2, -1), (-2, 1), (-1, 2)];
const WHITE_PAWN_STEPS: [(i8, i8); 2] = [(-1, 1), (1, 1)];
const BLACK_PAWN_STEPS: [(i8, i8); 2] = [(-1, -1), (1, -1)];

/// The square one step of `(df, dr)` away from `sq`, if it is on the board.
pub(super) const fn offset(sq: usize, df: i8, dr: i8) -> Option<usize> {
    let file = (sq % 8) as i8 + df;
    let rank = (sq / 8) as i8 + dr;
    if file >= 0 && file < 8 && rank >= 0 && rank < 8 {
        Some((rank * 8 + file) as usize)
    } else {
        None
    }
}

/// For every square, the set reached by taking exactly one of `steps`.
const fn step_table(steps: &[(i8, i8)]) -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    let mut sq = 0;
    while sq < 64 {
        let mut bits = 0u64;
        let mut i = 0;
        while i < steps.len() {
            if let Some(to) = offset(sq, steps[i].0, steps[i].1) {
                bits |= 1 << to;
            }
            i += 1;
        }
        table[sq] = Bitboard::new(bits);
        sq += 1;
    }
    table
}

/// Every square from `sq` to the edge in direction `d`, excluding `sq`.
const fn ray(sq: usize, d: usize) -> u64 {
    let mut bits = 0u64;
    let mut cur = sq;
    while let Some(next) = offset(cur, DIRECTIONS[d].0, DIRECTIONS[d].1) {
        bits |= 1 << next;
        cur = next;
    }
    bits
}

/// `between[a][b]` and `line[a][b]` for every aligned pair; empty otherwise.
const fn ray_tables() -> [[[Bitboard; 64]; 64]; 2] {
    let mut tables = [[[Bitboard::EMPTY; 64]; 64]; 2];
    let mut sq = 0;
    while sq < 64 {
        let mut d = 0;
        while d < 8 {
            let through = ray(sq, d) | ray(sq, (d + 4) % 8) | (1 << sq);
            let mut gap = 0u64;
            let mut cur = sq;
            while let Some(next) = offset(cur, DIRECTIONS[d].0, DIRECTIONS[d].1) {
                tables[0][sq][next] = Bitboard::new(gap);
                tables[1][sq][next] = Bitboard::new(through);
                gap |= 1 << next;
                cur = next;
            }
            d += 1;
        }
        sq += 1;
    }
    tables
}

pub(super) static KNIGHT: [Bitboard; 64] = step_table(&KNIGHT_STEPS);
pub(super) static KING: [Bitboard; 64] = step_table(&DIRECTIONS);
pub(super) static PAWN: [[Bitboard; 64]; 2] =
    [step_table(&WHITE_PAWN_STEPS), step_table(&BLACK_PAWN_STEPS)];

static RAYS: [[[Bitboard; 64]; 64]; 2] = ray_tables();

#[inline]
pub(super) fn between(a: usize, b: usize) -> Bitboard {
    RAYS[0][a][b]
}

#[inline]
pub(super) fn line(a: usize, b: usize) -> Bitboard {
    RAYS[1][a][b]
}
