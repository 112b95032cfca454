//! The learned merge table.
//!
//! Rules are stored as an ordered list indexed by `id - 256`, so ascending
//! traversal is training order and descending traversal is the exact reverse.
//! Nothing here relies on hash map iteration order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    error::VocabError,
    types::{BYTE_VOCAB_SIZE, FIRST_MERGE_ID, Token, TokenPair},
};

/// One learned merge: `pair` is replaced by `id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MergeRule {
    pub id: Token,
    pub pair: TokenPair,
}

/// Immutable id → pair table produced by training.
///
/// Keys are exactly `256..256 + len()`, and both halves of every pair refer
/// to a byte or to an earlier rule.
///
/// Serializes as the ordered list of rules; deserializing re-runs the same
/// validation as [`Vocabulary::from_rules`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<MergeRule>", into = "Vec<MergeRule>")]
pub struct Vocabulary {
    rules: Vec<MergeRule>,
}

impl Vocabulary {
    /// Builds a vocabulary from rules in training order.
    ///
    /// # Errors
    ///
    /// Returns [`VocabError::NonContiguousId`] if ids do not run upwards from
    /// 256 without gaps, or [`VocabError::UndefinedChild`] if a pair refers
    /// to a token not defined before it.
    pub fn from_rules(rules: impl IntoIterator<Item = MergeRule>) -> Result<Self, VocabError> {
        let mut checked: Vec<MergeRule> = Vec::new();
        for rule in rules {
            let expected = FIRST_MERGE_ID + checked.len();
            if rule.id != expected {
                return Err(VocabError::NonContiguousId {
                    expected,
                    found: rule.id,
                });
            }
            for child in [rule.pair.0, rule.pair.1] {
                if child >= expected {
                    return Err(VocabError::UndefinedChild { id: rule.id, child });
                }
            }
            checked.push(rule);
        }
        Ok(Self { rules: checked })
    }

    /// Wraps rules produced by the trainer, which are valid by construction.
    pub(crate) fn from_trained(rules: Vec<MergeRule>) -> Self {
        debug_assert!(
            rules
                .iter()
                .enumerate()
                .all(|(i, r)| r.id == FIRST_MERGE_ID + i)
        );
        Self { rules }
    }

    /// Number of learned merges.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no merges were learned, e.g. for `vocab_size <= 256`.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Total number of token ids, base bytes included.
    pub fn vocab_size(&self) -> usize {
        BYTE_VOCAB_SIZE + self.rules.len()
    }

    /// Returns the pair merged into `id`, if `id` is a learned merge.
    pub fn get(&self, id: Token) -> Option<TokenPair> {
        id.checked_sub(FIRST_MERGE_ID)
            .and_then(|idx| self.rules.get(idx))
            .map(|rule| rule.pair)
    }

    /// Whether `id` is a raw byte or a learned merge.
    pub fn contains(&self, id: Token) -> bool {
        id < self.vocab_size()
    }

    /// Rules in training order (ascending id).
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &MergeRule> + ExactSizeIterator {
        self.rules.iter()
    }

    /// Rules as a slice, in training order.
    pub fn rules(&self) -> &[MergeRule] {
        &self.rules
    }

    /// Returns the table as an `id -> (left, right)` map.
    ///
    /// A `BTreeMap` keeps ascending key order, so iterating the map still
    /// visits rules in training order.
    pub fn id_to_pair(&self) -> BTreeMap<Token, (Token, Token)> {
        self.rules
            .iter()
            .map(|rule| (rule.id, rule.pair.into()))
            .collect()
    }
}

impl TryFrom<Vec<MergeRule>> for Vocabulary {
    type Error = VocabError;

    fn try_from(rules: Vec<MergeRule>) -> Result<Self, Self::Error> {
        Self::from_rules(rules)
    }
}

impl From<Vocabulary> for Vec<MergeRule> {
    fn from(vocab: Vocabulary) -> Self {
        vocab.rules
    }
}

impl<'a> IntoIterator for &'a Vocabulary {
    type Item = &'a MergeRule;
    type IntoIter = std::slice::Iter<'a, MergeRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
