//! PyO3 bindings exposing the tokenizer as `bytepair.BytePairEncoder`.

use std::collections::BTreeMap;

use pyo3::{exceptions::PyValueError, prelude::*};

use crate::{error::ErrorMode, tokenizer::Tokenizer, types::Token};

fn value_error(e: impl std::fmt::Display) -> PyErr {
    PyValueError::new_err(e.to_string())
}

/// Python wrapper for a trained tokenizer.
///
/// `vocab_size` reports the size requested at construction, even when it is
/// 256 or less and no merges were learned.
#[pyclass]
pub struct BytePairEncoder {
    inner: Tokenizer,
    #[pyo3(get)]
    vocab_size: usize,
}

#[pymethods]
impl BytePairEncoder {
    #[new]
    fn new(text: &str, vocab_size: usize) -> PyResult<Self> {
        let inner = Tokenizer::train(text, vocab_size).map_err(value_error)?;
        Ok(Self { inner, vocab_size })
    }

    /// Learned merges as a dict of `id -> (left, right)`.
    #[getter]
    fn id_to_pair(&self) -> BTreeMap<Token, (Token, Token)> {
        self.inner.vocabulary().id_to_pair()
    }

    fn encode(&self, text: &str) -> Vec<Token> {
        self.inner.encode(text)
    }

    #[pyo3(signature = (ids, errors = "strict"))]
    fn decode(&self, ids: Vec<Token>, errors: &str) -> PyResult<String> {
        let mode: ErrorMode = errors.parse().map_err(PyValueError::new_err)?;
        self.inner.decode_with(&ids, mode).map_err(value_error)
    }

    #[pyo3(signature = (texts, show_progress = false))]
    fn encode_batch(&self, texts: Vec<String>, show_progress: bool) -> PyResult<Vec<Vec<Token>>> {
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        self.inner
            .encode_batch(&refs, show_progress)
            .map_err(value_error)
    }

    #[pyo3(signature = (ids_list, errors = "strict", show_progress = false))]
    fn decode_batch(
        &self,
        ids_list: Vec<Vec<Token>>,
        errors: &str,
        show_progress: bool,
    ) -> PyResult<Vec<String>> {
        let mode: ErrorMode = errors.parse().map_err(PyValueError::new_err)?;
        let refs: Vec<&[Token]> = ids_list.iter().map(Vec::as_slice).collect();
        self.inner
            .decode_batch(&refs, mode, show_progress)
            .map_err(value_error)
    }
}

#[pymodule]
fn bytepair(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<BytePairEncoder>()?;
    Ok(())
}
