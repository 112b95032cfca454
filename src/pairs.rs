//! Adjacent pair statistics.
//!
//! Counting is a full rescan of the current sequence. Ties between equally
//! frequent pairs go to the pair that occurs first, so the selected pair never
//! depends on hash map iteration order.

use std::collections::HashMap;

use rayon::prelude::*;

use crate::types::{TextIdx, Token, TokenFreq, TokenPair};

/// Occurrence statistics for a single pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairStats {
    /// Number of (possibly overlapping) occurrences.
    pub count: TokenFreq,
    /// Index of the leftmost occurrence.
    pub first: TextIdx,
}

impl PairStats {
    fn new(first: TextIdx) -> Self {
        Self { count: 1, first }
    }

    fn absorb(&mut self, other: PairStats) {
        self.count += other.count;
        self.first = self.first.min(other.first);
    }
}

/// Counts every adjacent pair `(tokens[i], tokens[i + 1])`.
///
/// Overlapping occurrences are all counted: `[5, 5, 5]` yields `(5, 5)` twice.
pub fn count_pairs(tokens: &[Token]) -> HashMap<TokenPair, PairStats> {
    let mut stats: HashMap<TokenPair, PairStats> = HashMap::new();
    for (idx, window) in tokens.windows(2).enumerate() {
        stats
            .entry(TokenPair(window[0], window[1]))
            .and_modify(|s| s.count += 1)
            .or_insert_with(|| PairStats::new(idx));
    }
    stats
}

/// Parallel version of [`count_pairs`].
///
/// Windows are folded into per-worker maps which are then reduced by summing
/// counts and keeping the smallest first index, so the result is identical to
/// the sequential scan.
pub fn count_pairs_par(tokens: &[Token]) -> HashMap<TokenPair, PairStats> {
    tokens
        .par_windows(2)
        .enumerate()
        .fold(HashMap::new, |mut acc: HashMap<TokenPair, PairStats>, (idx, w)| {
            acc.entry(TokenPair(w[0], w[1]))
                .and_modify(|s| s.count += 1)
                .or_insert_with(|| PairStats::new(idx));
            acc
        })
        .reduce(HashMap::new, |mut left, right| {
            for (pair, stats) in right {
                left.entry(pair)
                    .and_modify(|s| s.absorb(stats))
                    .or_insert(stats);
            }
            left
        })
}

/// Returns the most frequent adjacent pair and its count.
///
/// Returns `None` when the sequence holds fewer than two tokens.
pub fn most_frequent_pair(tokens: &[Token]) -> Option<(TokenPair, TokenFreq)> {
    select_max(count_pairs(tokens))
}

/// Same as [`most_frequent_pair`], counting on the rayon pool.
pub fn most_frequent_pair_par(tokens: &[Token]) -> Option<(TokenPair, TokenFreq)> {
    select_max(count_pairs_par(tokens))
}

/// Highest count wins; among equal counts the earliest first occurrence wins.
/// Distinct pairs never share a first index, so this is a total order.
fn select_max(stats: HashMap<TokenPair, PairStats>) -> Option<(TokenPair, TokenFreq)> {
    stats
        .into_iter()
        .max_by(|(_, a), (_, b)| a.count.cmp(&b.count).then_with(|| b.first.cmp(&a.first)))
        .map(|(pair, s)| (pair, s.count))
}
