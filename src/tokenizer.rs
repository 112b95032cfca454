//! Encoding and decoding against a trained vocabulary.
//!
//! Encoding applies every merge rule once, in ascending id order, to the
//! UTF-8 bytes of the input. Decoding undoes the rules one at a time in
//! descending id order, so each nested merge is expanded only after
//! everything built on top of it has been.
//!
//! Batch variants run independent inputs on Rayon workers; the rule order
//! inside one input never changes.

use indicatif::ParallelProgressIterator;
use rayon::prelude::*;

use crate::{
    error::{DecodeError, EncodeError, ErrorMode, TrainError},
    merge::{merge_pair, unmerge_pair},
    progress::progress_bar,
    trainer::{TrainConfig, Trainer},
    types::{ByteSeq, Token, bytes_to_tokens},
    vocab::Vocabulary,
};

/// Merges the UTF-8 bytes of `text` using `vocab`.
///
/// # Arguments
///
/// * `text` - Input text; its UTF-8 bytes are the starting token sequence.
/// * `vocab` - Trained merge rules, applied once each in ascending id order.
///
/// # Returns
///
/// A mix of raw byte ids and learned ids, never longer than the byte length
/// of `text`.
///
/// # Examples
///
/// ```
/// let vocab = bytepair::train("abab", 257)?;
/// assert_eq!(bytepair::encode("abc", &vocab), vec![256, 99]);
/// # Ok::<(), bytepair::TrainError>(())
/// ```
pub fn encode(text: &str, vocab: &Vocabulary) -> Vec<Token> {
    encode_bytes(text.as_bytes(), vocab)
}

/// Merges an arbitrary byte string using `vocab`.
///
/// Same as [`encode`] but without requiring valid UTF-8 input.
pub fn encode_bytes(bytes: &[u8], vocab: &Vocabulary) -> Vec<Token> {
    let mut tokens = bytes_to_tokens(bytes);
    for rule in vocab {
        // nothing left to merge
        if tokens.len() < 2 {
            break;
        }
        tokens = merge_pair(&tokens, rule.pair, rule.id);
    }
    tokens
}

/// Expands `ids` back into raw bytes.
///
/// # Arguments
///
/// * `ids` - Token sequence, typically produced by [`encode`] with the same
///   vocabulary.
/// * `vocab` - Merge rules, undone once each in descending id order.
///
/// # Returns
///
/// The concatenated byte sequence represented by `ids`.
///
/// # Errors
///
/// Returns [`DecodeError::UnknownToken`] for any id that is neither a byte
/// nor a rule of `vocab`. The check runs before any expansion.
pub fn decode_bytes(ids: &[Token], vocab: &Vocabulary) -> Result<ByteSeq, DecodeError> {
    if let Some(&bad) = ids.iter().find(|&&id| !vocab.contains(id)) {
        return Err(DecodeError::UnknownToken(bad));
    }

    let mut tokens = ids.to_vec();
    for rule in vocab.iter().rev() {
        tokens = unmerge_pair(&tokens, rule.pair, rule.id);
    }

    // Every id below 256 after the full descending pass.
    Ok(tokens.into_iter().map(|t| t as u8).collect())
}

/// Decodes `ids` into a string, rejecting invalid UTF-8.
///
/// # Errors
///
/// Returns [`DecodeError::UnknownToken`] for ids outside the vocabulary and
/// [`DecodeError::InvalidUtf8`] if the expanded bytes are not valid UTF-8.
pub fn decode(ids: &[Token], vocab: &Vocabulary) -> Result<String, DecodeError> {
    decode_with(ids, vocab, ErrorMode::Strict)
}

/// Decodes `ids` into a string using the given UTF-8 error mode.
///
/// # Errors
///
/// Returns [`DecodeError::UnknownToken`] for ids outside the vocabulary, and
/// [`DecodeError::InvalidUtf8`] on invalid UTF-8 in `Strict` mode only.
pub fn decode_with(
    ids: &[Token],
    vocab: &Vocabulary,
    errors: ErrorMode,
) -> Result<String, DecodeError> {
    let bytes = decode_bytes(ids, vocab)?;

    match errors {
        ErrorMode::Strict => Ok(String::from_utf8(bytes)?),
        ErrorMode::Replace => Ok(String::from_utf8_lossy(&bytes).into_owned()),
    }
}

/// A trained byte-pair tokenizer.
///
/// Only obtainable through training or from an already validated
/// [`Vocabulary`]; the vocabulary is never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokenizer {
    vocab: Vocabulary,
}

impl Tokenizer {
    /// Trains on `text` up to `vocab_size` ids.
    ///
    /// # Errors
    ///
    /// Returns [`TrainError::TrainingExhausted`] if `text` is too short to
    /// supply `vocab_size - 256` merges.
    pub fn train(text: &str, vocab_size: usize) -> Result<Self, TrainError> {
        Self::train_with(text, TrainConfig::new(vocab_size))
    }

    /// Trains on `text` with full control over the training parameters.
    ///
    /// # Errors
    ///
    /// See [`Trainer::train_bytes`].
    pub fn train_with(text: &str, cfg: TrainConfig) -> Result<Self, TrainError> {
        let vocab = Trainer::new(cfg).train(text)?;
        Ok(Self { vocab })
    }

    /// Wraps an already validated vocabulary, e.g. one loaded through serde.
    pub fn from_vocabulary(vocab: Vocabulary) -> Self {
        Self { vocab }
    }

    /// The merge rules this tokenizer applies.
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    /// Total number of token ids, base bytes included.
    pub fn vocab_size(&self) -> usize {
        self.vocab.vocab_size()
    }

    /// Encode a text string: UTF-8 bytes → ascending merges.
    ///
    /// # Arguments
    ///
    /// * `text` - Input text to encode as a single continuous byte stream.
    ///
    /// # Returns
    ///
    /// Token sequence after applying every learned merge.
    pub fn encode(&self, text: &str) -> Vec<Token> {
        encode(text, &self.vocab)
    }

    /// Encode raw bytes; see [`encode_bytes`].
    pub fn encode_bytes(&self, bytes: &[u8]) -> Vec<Token> {
        encode_bytes(bytes, &self.vocab)
    }

    /// Decodes a token sequence back into a UTF-8 string.
    ///
    /// # Arguments
    ///
    /// * `ids` - Sequence of token IDs to decode.
    ///
    /// # Errors
    ///
    /// See [`decode`].
    pub fn decode(&self, ids: &[Token]) -> Result<String, DecodeError> {
        decode(ids, &self.vocab)
    }

    /// Decodes with an explicit UTF-8 error mode.
    ///
    /// # Errors
    ///
    /// See [`decode_with`].
    pub fn decode_with(&self, ids: &[Token], errors: ErrorMode) -> Result<String, DecodeError> {
        decode_with(ids, &self.vocab, errors)
    }

    /// Decodes to raw bytes without UTF-8 validation.
    ///
    /// # Errors
    ///
    /// See [`decode_bytes`].
    pub fn decode_bytes(&self, ids: &[Token]) -> Result<ByteSeq, DecodeError> {
        decode_bytes(ids, &self.vocab)
    }

    /// Encode many texts in parallel using Rayon.
    ///
    /// # Arguments
    ///
    /// * `texts` - Slice of text strings to encode.
    /// * `show_progress` - Whether to display a progress bar during encoding.
    ///
    /// # Returns
    ///
    /// Vector of token sequences in the same order as input texts.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::ProgressBarSetup`] if the progress bar template
    /// fails to compile.
    pub fn encode_batch(
        &self,
        texts: &[&str],
        show_progress: bool,
    ) -> Result<Vec<Vec<Token>>, EncodeError> {
        let pb = progress_bar(texts.len() as u64, "Encoding texts", show_progress)?;

        Ok(texts
            .par_iter()
            .progress_with(pb)
            .map(|text| self.encode(text))
            .collect())
    }

    /// Decodes multiple token sequences in parallel.
    ///
    /// # Arguments
    ///
    /// * `token_seqs` - Slice of token sequences to decode.
    /// * `errors` - How to handle invalid UTF-8 in decoded bytes.
    /// * `show_progress` - Whether to display a progress bar during decoding.
    ///
    /// # Returns
    ///
    /// Decoded strings in the same order as input.
    ///
    /// # Errors
    ///
    /// Fails with a [`DecodeError`] if any sequence fails to decode, or with
    /// [`DecodeError::ProgressBarSetup`] if the progress bar cannot be built.
    pub fn decode_batch(
        &self,
        token_seqs: &[&[Token]],
        errors: ErrorMode,
        show_progress: bool,
    ) -> Result<Vec<String>, DecodeError> {
        let pb = progress_bar(token_seqs.len() as u64, "Decoding tokens", show_progress)?;

        token_seqs
            .par_iter()
            .progress_with(pb)
            .map(|tokens| self.decode_with(tokens, errors))
            .collect()
    }
}
