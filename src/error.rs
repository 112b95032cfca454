//! Error types for BPE training, vocabulary loading and codec operations.

use std::str::FromStr;

use indicatif::style::TemplateError;
use thiserror::Error;

use crate::types::Token;

/// Controls how UTF-8 decoding errors are handled.
///
/// Mirrors Python's `bytes.decode(errors=...)` semantics.
/// Unknown token IDs always produce errors regardless of mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorMode {
    /// Raise an error on invalid UTF-8 like Python's "strict".
    #[default]
    Strict,
    /// Replace invalid UTF-8 sequences with U+FFFD (like Python's "replace").
    Replace,
}

impl FromStr for ErrorMode {
    type Err = String;

    /// Parses a Python-style error mode string ("strict" or "replace").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strict" => Ok(Self::Strict),
            "replace" => Ok(Self::Replace),
            _ => Err(format!(
                "invalid error mode: {s:?} (expected \"strict\" or \"replace\")"
            )),
        }
    }
}

/// Errors that can occur while learning merge rules.
#[derive(Debug, Error)]
pub enum TrainError {
    /// The working sequence fell below two tokens before the requested
    /// vocabulary size was reached.
    #[error(
        "training exhausted after {learned} merges: no pair left to reach vocab size {vocab_size}"
    )]
    TrainingExhausted {
        /// Requested vocabulary size, base bytes included.
        vocab_size: usize,
        /// Merges learned before the sequence ran out of pairs.
        learned: usize,
    },
    /// Progress bar template string was invalid.
    #[error("template parsing failed: {0}")]
    ProgressBarSetup(#[from] TemplateError),
}

/// Errors that can occur during token decoding.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Token ID is neither a raw byte nor a learned merge.
    #[error("unknown token id: {0}")]
    UnknownToken(Token),
    /// Decoded bytes are not valid UTF-8.
    #[error("invalid UTF-8 in decoded bytes: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
    /// Progress bar template string was invalid.
    #[error("template parsing failed: {0}")]
    ProgressBarSetup(#[from] TemplateError),
}

/// Errors that can occur during batch text encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Progress bar template string was invalid.
    #[error("template parsing failed: {0}")]
    ProgressBarSetup(#[from] TemplateError),
}

/// Errors raised when assembling a vocabulary from externally supplied rules.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VocabError {
    /// Rule ids must run contiguously upwards from 256.
    #[error("merge ids must be contiguous: expected {expected}, found {found}")]
    NonContiguousId { expected: Token, found: Token },
    /// A rule refers to a token that is not yet defined at its position.
    #[error("merge {id} refers to undefined token {child}")]
    UndefinedChild { id: Token, child: Token },
}
