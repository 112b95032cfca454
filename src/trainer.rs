//! Naive BPE training.
//!
//! Every step rescans the whole working sequence for pair counts, records the
//! winning pair under the next free id, and rewrites the sequence with that
//! pair merged. Cost is O(merges × sequence length).

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::{
    error::{TrainError, VocabError},
    merge::merge_pair,
    pairs::{most_frequent_pair, most_frequent_pair_par},
    progress::progress_bar,
    types::{BYTE_VOCAB_SIZE, FIRST_MERGE_ID, Token, TokenPair, bytes_to_tokens},
    vocab::{MergeRule, Vocabulary},
};

const DEFAULT_PARALLEL_THRESHOLD: usize = 1 << 16;

fn default_parallel_threshold() -> usize {
    DEFAULT_PARALLEL_THRESHOLD
}

/// Training parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainConfig {
    /// Target vocabulary size, base bytes included.
    pub vocab_size: usize,
    /// Draw a progress bar while merging.
    #[serde(default)]
    pub show_progress: bool,
    /// Sequence length at or above which pair counting runs on rayon.
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
}

impl TrainConfig {
    /// Creates a configuration with progress off and the default parallel
    /// threshold.
    ///
    /// # Arguments
    ///
    /// * `vocab_size` - Target vocabulary size, base bytes included. Values
    ///   of 256 or less request no merges.
    pub fn new(vocab_size: usize) -> Self {
        Self {
            vocab_size,
            show_progress: false,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }

    /// Enables or disables the training progress bar.
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Sets the sequence length at or above which pair counting runs on the
    /// rayon pool. The selected pairs are the same either way.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Number of merges this configuration asks for.
    pub fn num_merges(&self) -> usize {
        self.vocab_size.saturating_sub(BYTE_VOCAB_SIZE)
    }
}

/// Stepwise BPE training state.
///
/// Owns the working sequence and replaces it wholesale after every merge; the
/// learned rules are appended to `merge_history` in id order.
#[derive(Debug)]
pub struct BpeTrainer {
    /// Current token sequence. Replaced, never aliased, on each step.
    tokens: Vec<Token>,

    /// Next available merge token ID.
    next_tok: Token,

    /// Learned rules in creation order.
    merge_history: Vec<MergeRule>,

    parallel_threshold: usize,
}

impl BpeTrainer {
    /// Create a new BPE trainer from an initial token sequence.
    ///
    /// # Arguments
    ///
    /// * `tokens` - Initial sequence of tokens (e.g., bytes 0-255).
    /// * `next_tok` - Next available token ID (e.g., 256 for bytes).
    ///
    /// # Example
    ///
    /// ```
    /// use bytepair::BpeTrainer;
    ///
    /// // a=0, b=1
    /// let mut trainer = BpeTrainer::new(vec![0, 1, 0, 0, 1, 1, 0, 0], 2);
    /// let rule = trainer.merge_step().expect("pairs remain");
    /// assert_eq!(rule.id, 2);
    /// ```
    pub fn new(tokens: Vec<Token>, next_tok: Token) -> Self {
        Self {
            tokens,
            next_tok,
            merge_history: Vec::new(),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }

    /// Create a trainer over a raw byte sequence, assigning merges from 256.
    ///
    /// # Example
    ///
    /// ```
    /// use bytepair::BpeTrainer;
    ///
    /// let mut trainer = BpeTrainer::from_bytes(b"aaabdaaabac");
    /// trainer.train(3).expect("enough pairs");
    /// assert_eq!(trainer.encodings(), &[258, 100, 258, 97, 99]);
    /// ```
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::new(bytes_to_tokens(bytes), FIRST_MERGE_ID)
    }

    /// Sets the sequence length at or above which pair counting runs on rayon.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Perform one merge operation.
    ///
    /// # Returns
    ///
    /// The learned rule, or `None` if fewer than two tokens remain or the id
    /// space is used up.
    pub fn merge_step(&mut self) -> Option<MergeRule> {
        let following = self.next_tok.checked_add(1)?;
        let (pair, freq) = self.select_pair()?;

        let id = self.next_tok;
        self.next_tok = following;

        debug!(
            "merging pair ({}, {}) x{} -> token {}",
            pair.0, pair.1, freq, id
        );

        self.tokens = merge_pair(&self.tokens, pair, id);

        let rule = MergeRule { id, pair };
        self.merge_history.push(rule);
        Some(rule)
    }

    /// Train with `num_merges` further merges.
    ///
    /// # Arguments
    ///
    /// * `num_merges` - Number of merge operations to perform.
    ///
    /// # Errors
    ///
    /// Returns [`TrainError::TrainingExhausted`] if the sequence runs out of
    /// pairs first. Merges learned before that point stay in the trainer.
    pub fn train(&mut self, num_merges: usize) -> Result<(), TrainError> {
        let target = self.next_tok.saturating_add(num_merges);
        for _ in 0..num_merges {
            self.step_or_exhausted(target)?;
        }
        Ok(())
    }

    /// Get the current token sequence.
    pub fn encodings(&self) -> &[Token] {
        &self.tokens
    }

    /// Rules learned so far, in id order.
    pub fn merge_history(&self) -> &[MergeRule] {
        &self.merge_history
    }

    /// Freeze the learned rules into a vocabulary.
    ///
    /// # Errors
    ///
    /// Returns a [`VocabError`] if the trainer was not started on a byte
    /// sequence with ids from 256, e.g. `BpeTrainer::new(tokens, 2)`.
    pub fn into_vocabulary(self) -> Result<Vocabulary, VocabError> {
        Vocabulary::from_rules(self.merge_history)
    }

    fn step_or_exhausted(&mut self, vocab_size: usize) -> Result<MergeRule, TrainError> {
        match self.merge_step() {
            Some(rule) => Ok(rule),
            None => {
                let learned = self.merge_history.len();
                warn!(
                    "no more pairs to merge after {learned} merges (target vocab size {vocab_size})"
                );
                Err(TrainError::TrainingExhausted {
                    vocab_size,
                    learned,
                })
            }
        }
    }

    fn select_pair(&self) -> Option<(TokenPair, usize)> {
        if self.tokens.len() >= self.parallel_threshold {
            most_frequent_pair_par(&self.tokens)
        } else {
            most_frequent_pair(&self.tokens)
        }
    }
}

/// Builds vocabularies from text according to a [`TrainConfig`].
#[derive(Debug, Clone)]
pub struct Trainer {
    cfg: TrainConfig,
}

impl Trainer {
    /// Creates a trainer for the supplied configuration.
    pub fn new(cfg: TrainConfig) -> Self {
        Self { cfg }
    }

    /// Returns an immutable reference to the underlying configuration.
    pub fn config(&self) -> &TrainConfig {
        &self.cfg
    }

    /// Learns merges from the UTF-8 bytes of `text`.
    ///
    /// # Errors
    ///
    /// See [`Trainer::train_bytes`].
    pub fn train(&self, text: &str) -> Result<Vocabulary, TrainError> {
        self.train_bytes(text.as_bytes())
    }

    /// Learns exactly `vocab_size - 256` merges from `bytes`.
    ///
    /// A `vocab_size` of 256 or less learns nothing and returns an empty
    /// vocabulary.
    ///
    /// # Arguments
    ///
    /// * `bytes` - Training sample. It is never modified; merging happens on
    ///   an owned working copy.
    ///
    /// # Returns
    ///
    /// The learned rules, ids `256..vocab_size` in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`TrainError::TrainingExhausted`] if the working sequence drops
    /// below two tokens before the target is reached; no partial vocabulary is
    /// returned. Returns [`TrainError::ProgressBarSetup`] if the progress bar
    /// cannot be built.
    pub fn train_bytes(&self, bytes: &[u8]) -> Result<Vocabulary, TrainError> {
        let num_merges = self.cfg.num_merges();
        if num_merges == 0 {
            debug!(
                "vocab size {} leaves no room for merges",
                self.cfg.vocab_size
            );
            return Ok(Vocabulary::default());
        }

        let pb = progress_bar(num_merges as u64, "Learning merges", self.cfg.show_progress)?;

        let mut trainer =
            BpeTrainer::from_bytes(bytes).with_parallel_threshold(self.cfg.parallel_threshold);

        for _ in 0..num_merges {
            if let Err(e) = trainer.step_or_exhausted(self.cfg.vocab_size) {
                pb.abandon();
                return Err(e);
            }
            pb.inc(1);
        }
        pb.finish_and_clear();

        info!(
            "learned {} merges from {} bytes; {} tokens remain",
            num_merges,
            bytes.len(),
            trainer.encodings().len()
        );

        // from_bytes starts at 256 over byte tokens, so every rule is valid.
        Ok(Vocabulary::from_trained(trainer.merge_history))
    }
}
