//! Alphabet partitioning over the codepoint domain.
//!
//! Automaton transitions are not indexed by raw codepoints. Instead, every
//! codepoint interval mentioned anywhere in a pattern is fed into
//! [`Alphabet::partition`], which cuts the full domain `[CP_MIN, CP_MAX]`
//! into the minimal ordered sequence of disjoint intervals such that each
//! original interval is an exact union of pieces. The position of a piece in
//! that sequence is the automaton's symbol id, so membership of a codepoint
//! in any class the pattern tests is decided by a single interval lookup.

use std::collections::BTreeSet;

/// Lowest codepoint in the matching domain.
pub const CP_MIN: u32 = 0;

/// Highest codepoint in the matching domain (the last Unicode scalar value).
pub const CP_MAX: u32 = 0x10FFFF;

/// An inclusive range of codepoints `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodepointInterval {
    pub start: u32,
    pub end: u32,
}

impl CodepointInterval {
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end, "interval start must not exceed end");
        Self { start, end }
    }

    /// A one-codepoint interval.
    pub fn single(cp: u32) -> Self {
        Self { start: cp, end: cp }
    }

    #[inline]
    pub fn contains(&self, cp: u32) -> bool {
        self.start <= cp && cp <= self.end
    }
}

/// Merge overlapping or adjacent intervals into a sorted, disjoint list.
pub fn simplify_intervals(mut intervals: Vec<CodepointInterval>) -> Vec<CodepointInterval> {
    if intervals.is_empty() {
        return intervals;
    }

    intervals.sort_by_key(|iv| iv.start);

    let mut out: Vec<CodepointInterval> = Vec::new();
    let mut current = intervals[0];

    for next in intervals.iter().skip(1).copied() {
        if next.start > current.end.saturating_add(1) {
            out.push(current);
            current = next;
            continue;
        }
        if next.end <= current.end {
            continue;
        }
        current.end = next.end;
    }
    out.push(current);
    out
}

/// Complement a set of intervals against the full domain.
///
/// Used for negated character classes and for `.` (everything but `\n`).
/// The result is sorted and disjoint; complementing the full domain yields
/// an empty list.
pub fn negate_intervals(intervals: Vec<CodepointInterval>) -> Vec<CodepointInterval> {
    let merged = simplify_intervals(intervals);

    let mut inverted = Vec::new();
    let mut point = CP_MIN;

    for iv in &merged {
        if iv.start > point {
            inverted.push(CodepointInterval::new(point, iv.start - 1));
        }
        // iv.end == CP_MAX would overflow the cursor; the trailing check below
        // only runs when point stayed in the domain.
        match iv.end.checked_add(1) {
            Some(next) => point = next,
            None => return inverted,
        }
        if point > CP_MAX {
            return inverted;
        }
    }

    inverted.push(CodepointInterval::new(point, CP_MAX));
    inverted
}

/// The partitioned alphabet of one compiled pattern.
///
/// Invariants: intervals are pairwise disjoint, sorted by start, and their
/// union is exactly `[CP_MIN, CP_MAX]`. Built once per pattern, then
/// immutable. The index of an interval is the symbol id used by every
/// automaton in the pipeline.
#[derive(Debug, Clone)]
pub struct Alphabet {
    intervals: Vec<CodepointInterval>,
}

impl Alphabet {
    /// Partition the domain along the boundaries of the given intervals.
    ///
    /// Each interval start opens a boundary at `start` and closes one at
    /// `end + 1`; sweeping the sorted boundary set from `CP_MIN` and cutting
    /// at every boundary yields the minimal partition in which every input
    /// interval is a union of whole pieces.
    pub fn partition(referenced: &[CodepointInterval]) -> Self {
        let mut boundaries: BTreeSet<u32> = BTreeSet::new();
        for iv in referenced {
            boundaries.insert(iv.start);
            if let Some(after) = iv.end.checked_add(1) {
                if after <= CP_MAX {
                    boundaries.insert(after);
                }
            }
        }

        let mut intervals = Vec::with_capacity(boundaries.len() + 1);
        let mut current = CP_MIN;
        for boundary in boundaries {
            if boundary > current {
                intervals.push(CodepointInterval::new(current, boundary - 1));
                current = boundary;
            }
        }
        if current <= CP_MAX {
            intervals.push(CodepointInterval::new(current, CP_MAX));
        }

        Self { intervals }
    }

    /// Number of symbols (partition pieces).
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn intervals(&self) -> &[CodepointInterval] {
        &self.intervals
    }

    /// The symbol id of the partition piece containing `cp`.
    ///
    /// Always succeeds: the partition covers the whole domain, so every
    /// codepoint lives in exactly one piece.
    #[inline]
    pub fn symbol_of(&self, cp: u32) -> usize {
        debug_assert!(cp <= CP_MAX);
        self.intervals
            .partition_point(|iv| iv.end < cp)
    }

    /// All symbol ids whose pieces lie inside the given interval set.
    ///
    /// The partition is fine enough that every piece is either entirely
    /// inside or entirely outside each referenced interval, so testing the
    /// piece's start codepoint suffices.
    pub fn symbols_in(&self, intervals: &[CodepointInterval]) -> Vec<usize> {
        let merged = simplify_intervals(intervals.to_vec());
        let mut symbols = Vec::new();
        for (id, piece) in self.intervals.iter().enumerate() {
            if merged.iter().any(|iv| iv.contains(piece.start)) {
                symbols.push(id);
            }
        }
        symbols
    }
}
