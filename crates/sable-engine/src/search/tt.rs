//! Shared lockless transposition table.
//!
//! Every slot is two `AtomicU64` words: `word0 = key ^ data` and
//! `word1 = data`. A reader recovers the key as `word0 ^ word1`, so a slot
//! torn by two racing writers decodes to a key that matches neither
//! position and is treated as a miss by the caller's key comparison.
//!
//! ```text
//! data:
//!   bits 41-40: bound  (0 = empty)
//!   bits 39-32: depth
//!   bits 31-16: score  (i16, stored relative to the storing node)
//!   bits 15-0:  move
//! ```
//!
//! Replacement is unconditional: the last write to a slot wins. There is no
//! generation counter, so deep entries from earlier in a game may be evicted
//! by shallow ones from the current search.

use std::sync::atomic::{AtomicU64, Ordering};

use sable_core::Move;

use crate::search::params::MATE_BOUND;

const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn check() {
        assert_send_sync::<TranspositionTable>();
    }
    let _ = check;
};

/// What a stored score proves about the true value of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Bound {
    /// Empty slot.
    #[default]
    None = 0,
    Exact = 1,
    /// The search failed high: the true score is at least the stored one.
    LowerBound = 2,
    /// The search failed low: the true score is at most the stored one.
    UpperBound = 3,
}

impl Bound {
    const fn from_bits(bits: u64) -> Bound {
        match bits & 0b11 {
            1 => Bound::Exact,
            2 => Bound::LowerBound,
            3 => Bound::UpperBound,
            _ => Bound::None,
        }
    }
}

/// One decoded table slot.
///
/// `key` is whatever the slot holds; the caller decides hit or miss by
/// comparing it with the probing position's hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TtEntry {
    pub key: u64,
    pub mv: Move,
    /// Score in table form (see [`score_to_tt`]).
    pub score: i32,
    pub bound: Bound,
    pub depth: u8,
}

impl TtEntry {
    fn pack(&self) -> u64 {
        let score = self.score.clamp(i16::MIN as i32, i16::MAX as i32) as i16;
        (self.bound as u64) << 40
            | (self.depth as u64) << 32
            | ((score as u16) as u64) << 16
            | self.mv.raw() as u64
    }

    fn unpack(key: u64, data: u64) -> TtEntry {
        TtEntry {
            key,
            mv: Move::from_raw((data & 0xFFFF) as u16),
            score: ((data >> 16) & 0xFFFF) as u16 as i16 as i32,
            bound: Bound::from_bits(data >> 40),
            depth: ((data >> 32) & 0xFF) as u8,
        }
    }

    /// Whether the stored bound proves a cutoff inside `[alpha, beta]`.
    ///
    /// `score` must already be converted back with [`score_from_tt`].
    #[inline]
    pub fn cuts(&self, score: i32, alpha: i32, beta: i32) -> bool {
        match self.bound {
            Bound::Exact => true,
            Bound::LowerBound => score >= beta,
            Bound::UpperBound => score <= alpha,
            Bound::None => false,
        }
    }
}

/// Convert a search score to table form.
///
/// Mate scores count plies from the root; the table stores them counted from
/// the node itself so a cached mate stays correct on any path.
pub fn score_to_tt(score: i32, ply: usize) -> i32 {
    if score >= MATE_BOUND {
        score + ply as i32
    } else if score <= -MATE_BOUND {
        score - ply as i32
    } else {
        score
    }
}

/// Convert a table score back to root-relative form.
pub fn score_from_tt(score: i32, ply: usize) -> i32 {
    if score >= MATE_BOUND {
        score - ply as i32
    } else if score <= -MATE_BOUND {
        score + ply as i32
    } else {
        score
    }
}

struct Slot {
    word0: AtomicU64,
    word1: AtomicU64,
}

impl Slot {
    const fn empty() -> Slot {
        Slot {
            word0: AtomicU64::new(0),
            word1: AtomicU64::new(0),
        }
    }
}

/// Fixed-size hash-indexed table shared by every search thread.
///
/// All methods take `&self`; writes race benignly (see the module docs).
pub struct TranspositionTable {
    slots: Box<[Slot]>,
}

impl TranspositionTable {
    /// Allocate a table of `mb` megabytes. At least one slot is always present.
    pub fn new(mb: usize) -> TranspositionTable {
        let count = (mb * 1024 * 1024 / std::mem::size_of::<Slot>()).max(1);
        TranspositionTable {
            slots: (0..count).map(|_| Slot::empty()).collect(),
        }
    }

    /// Number of slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[inline]
    fn slot(&self, hash: u64) -> &Slot {
        &self.slots[(hash % self.slots.len() as u64) as usize]
    }

    /// Read the slot for `hash`. Never fails; compare `entry.key` to detect a miss.
    pub fn probe(&self, hash: u64) -> TtEntry {
        let slot = self.slot(hash);
        let word0 = slot.word0.load(Ordering::Relaxed);
        let word1 = slot.word1.load(Ordering::Relaxed);
        TtEntry::unpack(word0 ^ word1, word1)
    }

    /// Overwrite the slot for `entry.key`.
    pub fn store(&self, entry: TtEntry) {
        let slot = self.slot(entry.key);
        let data = entry.pack();
        slot.word0.store(entry.key ^ data, Ordering::Relaxed);
        slot.word1.store(data, Ordering::Relaxed);
    }

    /// Zero every slot. Key zero never matches a real position.
    pub fn clear(&self) {
        for slot in self.slots.iter() {
            slot.word0.store(0, Ordering::Relaxed);
            slot.word1.store(0, Ordering::Relaxed);
        }
    }

    /// Per-mille occupancy estimated from the first thousand slots.
    pub fn hashfull(&self) -> usize {
        let sample = self.slots.len().min(1000);
        let used = self.slots[..sample]
            .iter()
            .filter(|slot| slot.word1.load(Ordering::Relaxed) != 0)
            .count();
        used * 1000 / sample
    }
}

impl std::fmt::Debug for TranspositionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranspositionTable")
            .field("slots", &self.slots.len())
            .finish()
    }
}
