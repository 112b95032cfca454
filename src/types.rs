//! Type aliases and shared types for BPE training and encoding.
//!
//! These type aliases provide semantic clarity throughout the codebase.

use serde::{Deserialize, Serialize};

/// Represents a token identifier in the vocabulary.
///
/// Ids 0-255 are raw byte values. Ids from [`FIRST_MERGE_ID`] upwards are
/// learned merges, assigned in strictly increasing creation order.
pub type Token = usize;

/// Position of a token in a token sequence.
pub type TextIdx = usize;

/// Frequency count for token pairs during training.
pub type TokenFreq = usize;

/// A sequence of raw bytes.
pub type ByteSeq = Vec<u8>;

/// Number of base tokens, one per byte value.
pub const BYTE_VOCAB_SIZE: usize = 256;

/// Id assigned to the first learned merge.
pub const FIRST_MERGE_ID: Token = BYTE_VOCAB_SIZE;

/// A pair of adjacent tokens.
///
/// Used as a key for tracking pair frequencies during training and as the
/// right-hand side of every merge rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenPair(pub Token, pub Token);

impl From<(Token, Token)> for TokenPair {
    fn from((left, right): (Token, Token)) -> Self {
        Self(left, right)
    }
}

impl From<TokenPair> for (Token, Token) {
    fn from(pair: TokenPair) -> Self {
        (pair.0, pair.1)
    }
}

/// Widens a byte string into its base token sequence.
pub(crate) fn bytes_to_tokens(bytes: &[u8]) -> Vec<Token> {
    bytes.iter().map(|&b| b as Token).collect()
}
