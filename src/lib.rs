//! Minimal byte-pair-encoding tokenizer.
//!
//! Training repeatedly rescans a byte sequence for its most frequent adjacent
//! pair and merges it under a fresh id, producing an ordered [`Vocabulary`].
//! Encoding replays those merges in ascending id order; decoding undoes them
//! in descending id order, which makes `decode(encode(t)) == t` exact.
//!
//! ```
//! let vocab = bytepair::train("aaabdaaabac", 259)?;
//! let ids = bytepair::encode("aaabdaaabac", &vocab);
//! assert_eq!(ids, vec![258, 100, 258, 97, 99]);
//! assert_eq!(bytepair::decode(&ids, &vocab)?, "aaabdaaabac");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! With the `python` feature the crate builds as a PyO3 extension module
//! exposing `BytePairEncoder`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(unused_must_use)]

pub mod error;
pub mod merge;
pub mod pairs;
pub mod tokenizer;
pub mod trainer;
pub mod types;
pub mod vocab;

mod progress;
#[cfg(feature = "python")]
mod python;

pub use error::{DecodeError, EncodeError, ErrorMode, TrainError, VocabError};
pub use merge::{merge_pair, unmerge_pair};
pub use pairs::{PairStats, count_pairs, most_frequent_pair};
pub use tokenizer::{Tokenizer, decode, decode_bytes, decode_with, encode, encode_bytes};
pub use trainer::{BpeTrainer, TrainConfig, Trainer};
pub use types::{Token, TokenPair};
pub use vocab::{MergeRule, Vocabulary};

/// Learns `vocab_size - 256` merges from the UTF-8 bytes of `text`.
///
/// # Errors
///
/// Returns [`TrainError::TrainingExhausted`] if the text runs out of pairs
/// before the requested size is reached.
pub fn train(text: &str, vocab_size: usize) -> Result<Vocabulary, TrainError> {
    Trainer::new(TrainConfig::new(vocab_size)).train(text)
}
