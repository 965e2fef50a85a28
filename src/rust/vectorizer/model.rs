use std::sync::Arc;

use log::debug;
use ndarray::{Array1, Array2, ArrayView1};

use super::aggregate::{aggregate, AggregationStrategy};
use super::builder::VectorizerBuilder;
use super::error::VectorizerError;
use super::lookup::TokenLookup;
use super::tokenizer::{Tokenize, TweetTokenizer};
use super::VectorizerInfo;

/// Turns documents into fixed-length vectors by aggregating the embeddings of
/// their known tokens.
///
/// Row `i` of [`vectorize`](DocumentVectorizer::vectorize) always belongs to
/// document `i`. Tokens missing from the lookup are dropped before
/// aggregation, and a document without any known token gets the zero vector.
///
/// The lookup and tokenizer are held behind `Arc`, so cloning a vectorizer is
/// cheap and it can be shared across threads when both parts are `Send + Sync`:
///
/// ```rust
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use dialogvec::{AggregationStrategy, DocumentVectorizer, EmbeddingTable};
/// use std::sync::Arc;
/// use std::thread;
///
/// let table = EmbeddingTable::from_pairs(2, vec![("cat", [1.0_f32, 0.0]), ("dog", [3.0, 0.0])])?;
/// let vectorizer = Arc::new(DocumentVectorizer::builder()
///     .with_lookup(table)
///     .with_strategy(AggregationStrategy::Mean)
///     .build()?);
///
/// let shared = Arc::clone(&vectorizer);
/// let rows = thread::spawn(move || shared.vectorize(&["cat dog"]))
///     .join()
///     .unwrap()?;
/// assert_eq!(rows.row(0).to_vec(), vec![2.0, 0.0]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct DocumentVectorizer<L, T = TweetTokenizer> {
    lookup: Arc<L>,
    tokenizer: Arc<T>,
    strategy: AggregationStrategy,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<DocumentVectorizer<super::lookup::EmbeddingTable>>();
    }
};

impl<L, T> Clone for DocumentVectorizer<L, T> {
    fn clone(&self) -> Self {
        Self {
            lookup: Arc::clone(&self.lookup),
            tokenizer: Arc::clone(&self.tokenizer),
            strategy: self.strategy,
        }
    }
}

impl<L: TokenLookup> DocumentVectorizer<L, TweetTokenizer> {
    /// Creates a new VectorizerBuilder for fluent construction
    pub fn builder() -> VectorizerBuilder<L> {
        VectorizerBuilder::new()
    }

    /// Shortcut for a vectorizer with the default tweet tokenizer
    pub fn new(lookup: L, strategy: AggregationStrategy) -> Result<Self, VectorizerError> {
        Self::builder().with_lookup(lookup).with_strategy(strategy).build()
    }
}

impl<L: TokenLookup, T: Tokenize> DocumentVectorizer<L, T> {
    pub(crate) fn from_parts(lookup: Arc<L>, tokenizer: Arc<T>, strategy: AggregationStrategy) -> Self {
        Self {
            lookup,
            tokenizer,
            strategy,
        }
    }

    pub fn dim(&self) -> usize {
        self.lookup.dim()
    }

    pub fn strategy(&self) -> AggregationStrategy {
        self.strategy
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    pub fn tokenizer(&self) -> &T {
        &self.tokenizer
    }

    /// Returns information about the vectorizer's configuration
    pub fn info(&self) -> VectorizerInfo {
        VectorizerInfo {
            embedding_size: self.dim(),
            strategy: self.strategy,
        }
    }

    /// Tokens of `text` that the lookup knows, in document order
    pub fn known_tokens(&self, text: &str) -> Vec<String> {
        self.tokenizer
            .tokenize(text)
            .into_iter()
            .filter(|token| self.lookup.contains(token))
            .collect()
    }

    /// Vector for a single document, the zero vector when no token is known.
    ///
    /// # Errors
    /// - `DimensionMismatch` if the lookup hands out a vector of the wrong length
    pub fn vectorize_document(&self, text: &str) -> Result<Array1<f32>, VectorizerError> {
        let dim = self.dim();
        let vectors = known_vectors(text, self.lookup.as_ref(), self.tokenizer.as_ref(), dim)?;
        if vectors.is_empty() {
            return Ok(Array1::zeros(dim));
        }
        aggregate(&vectors, self.strategy)
    }

    /// Builds the `(documents.len(), dim)` feature matrix.
    ///
    /// # Errors
    /// - `DimensionMismatch` if the lookup hands out a vector of the wrong length
    pub fn vectorize<S: AsRef<str>>(&self, documents: &[S]) -> Result<Array2<f32>, VectorizerError> {
        vectorize_rows(
            documents,
            self.lookup.as_ref(),
            self.tokenizer.as_ref(),
            self.dim(),
            self.strategy,
        )
    }
}

/// Vectorizes `documents` against `lookup` with the default [`TweetTokenizer`].
///
/// Returns a matrix of shape `(documents.len(), dim)` whose row `i` is the
/// aggregate of the known token vectors of document `i`, or zeros when the
/// document has no known token.
///
/// ```
/// use dialogvec::{vectorize, AggregationStrategy};
/// use std::collections::HashMap;
///
/// let mut lookup: HashMap<String, Vec<f32>> = HashMap::new();
/// lookup.insert("cat".into(), vec![1.0, 0.0]);
/// lookup.insert("dog".into(), vec![3.0, 0.0]);
///
/// let rows = vectorize(&["cat zzz dog", "zzzqqq"], &lookup, 2, AggregationStrategy::Mean)?;
/// assert_eq!(rows.row(0).to_vec(), vec![2.0, 0.0]);
/// assert_eq!(rows.row(1).to_vec(), vec![0.0, 0.0]);
/// # Ok::<(), dialogvec::VectorizerError>(())
/// ```
///
/// # Errors
/// - `ValidationError` if `dim` is zero
/// - `DimensionMismatch` if a non-empty lookup has a different dimension, or
///   hands out a vector of the wrong length
pub fn vectorize<S, L>(
    documents: &[S],
    lookup: &L,
    dim: usize,
    strategy: AggregationStrategy,
) -> Result<Array2<f32>, VectorizerError>
where
    S: AsRef<str>,
    L: TokenLookup + ?Sized,
{
    if dim == 0 {
        return Err(VectorizerError::ValidationError("Embedding dimension must be positive".into()));
    }
    // an empty lookup reports dimension 0 and simply knows no token
    if lookup.dim() != 0 && lookup.dim() != dim {
        return Err(VectorizerError::dimension_mismatch("embedding lookup", dim, lookup.dim()));
    }
    vectorize_rows(documents, lookup, &TweetTokenizer::default(), dim, strategy)
}

fn vectorize_rows<S, L, T>(
    documents: &[S],
    lookup: &L,
    tokenizer: &T,
    dim: usize,
    strategy: AggregationStrategy,
) -> Result<Array2<f32>, VectorizerError>
where
    S: AsRef<str>,
    L: TokenLookup + ?Sized,
    T: Tokenize + ?Sized,
{
    let mut rows = Array2::zeros((documents.len(), dim));
    let mut unknown_only = 0usize;

    for (i, doc) in documents.iter().enumerate() {
        let vectors = known_vectors(doc.as_ref(), lookup, tokenizer, dim)?;
        if vectors.is_empty() {
            unknown_only += 1;
            continue;
        }
        rows.row_mut(i).assign(&aggregate(&vectors, strategy)?);
    }

    debug!(
        "Vectorized {} documents with {} aggregation ({} without known tokens)",
        documents.len(),
        strategy,
        unknown_only
    );
    Ok(rows)
}

fn known_vectors<'l, L, T>(
    text: &str,
    lookup: &'l L,
    tokenizer: &T,
    dim: usize,
) -> Result<Vec<ArrayView1<'l, f32>>, VectorizerError>
where
    L: TokenLookup + ?Sized,
    T: Tokenize + ?Sized,
{
    let mut vectors = Vec::new();
    for token in tokenizer.tokenize(text) {
        if let Some(vector) = lookup.get(&token) {
            if vector.len() != dim {
                return Err(VectorizerError::dimension_mismatch(format!("token '{}'", token), dim, vector.len()));
            }
            vectors.push(vector);
        }
    }
    Ok(vectors)
}
