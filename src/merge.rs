//! Single-rule sequence rewrites shared by training, encoding and decoding.

use crate::types::{Token, TokenPair};

/// Replaces every non-overlapping occurrence of `pair` with `id`.
///
/// The scan is greedy from the left: `[A, A, A]` with pair `(A, A)` becomes
/// `[id, A]`.
pub fn merge_pair(tokens: &[Token], pair: TokenPair, id: Token) -> Vec<Token> {
    let mut merged = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        if i + 1 < tokens.len() && tokens[i] == pair.0 && tokens[i + 1] == pair.1 {
            merged.push(id);
            i += 2;
        } else {
            merged.push(tokens[i]);
            i += 1;
        }
    }
    merged
}

/// Expands every occurrence of `id` back into `pair`.
///
/// Only one level is expanded; nested merges are undone by calling this once
/// per id in descending order.
pub fn unmerge_pair(tokens: &[Token], pair: TokenPair, id: Token) -> Vec<Token> {
    let mut expanded = Vec::with_capacity(tokens.len());
    for &token in tokens {
        if token == id {
            expanded.push(pair.0);
            expanded.push(pair.1);
        } else {
            expanded.push(token);
        }
    }
    expanded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greedy_non_overlap() {
        assert_eq!(merge_pair(&[5, 5, 5], TokenPair(5, 5), 9), vec![9, 5]);
        assert_eq!(merge_pair(&[5, 5, 5, 5], TokenPair(5, 5), 9), vec![9, 9]);
    }

    #[test]
    fn test_merge_no_match() {
        assert_eq!(merge_pair(&[1, 2, 3], TokenPair(3, 1), 7), vec![1, 2, 3]);
    }

    #[test]
    fn test_merge_trailing_half_pair() {
        // Last element matches pair.0 but has no right neighbour.
        assert_eq!(merge_pair(&[1, 2, 1], TokenPair(1, 2), 7), vec![7, 1]);
    }

    #[test]
    fn test_merge_empty() {
        assert!(merge_pair(&[], TokenPair(0, 0), 256).is_empty());
    }

    #[test]
    fn test_unmerge_single_level() {
        let tokens = [256, 1, 257, 256];
        assert_eq!(
            unmerge_pair(&tokens, TokenPair(97, 98), 256),
            vec![97, 98, 1, 257, 97, 98]
        );
    }

    #[test]
    fn test_unmerge_inverts_merge() {
        let tokens = vec![3, 4, 4, 3, 4, 1];
        let merged = merge_pair(&tokens, TokenPair(3, 4), 300);
        assert_eq!(merged, vec![300, 4, 300, 1]);
        assert_eq!(unmerge_pair(&merged, TokenPair(3, 4), 300), tokens);
    }
}
