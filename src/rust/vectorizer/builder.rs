use std::sync::Arc;

use log::info;

use super::aggregate::AggregationStrategy;
use super::error::VectorizerError;
use super::lookup::TokenLookup;
use super::model::DocumentVectorizer;
use super::tokenizer::{Tokenize, TweetTokenizer};
use crate::config::VectorizerConfig;

/// A builder for constructing a DocumentVectorizer with a fluent interface.
#[derive(Debug)]
pub struct VectorizerBuilder<L, T = TweetTokenizer> {
    lookup: Option<Arc<L>>,
    tokenizer: T,
    strategy: AggregationStrategy,
}

impl<L: TokenLookup> Default for VectorizerBuilder<L, TweetTokenizer> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: TokenLookup> VectorizerBuilder<L, TweetTokenizer> {
    /// Creates a builder with the default tweet tokenizer and mean aggregation
    ///
    /// # Example
    /// ```
    /// use dialogvec::{EmbeddingTable, VectorizerBuilder};
    ///
    /// let builder: VectorizerBuilder<EmbeddingTable> = VectorizerBuilder::new();
    /// ```
    pub fn new() -> Self {
        Self {
            lookup: None,
            tokenizer: TweetTokenizer::default(),
            strategy: AggregationStrategy::default(),
        }
    }

    /// Applies the tokenizer options and aggregation strategy of a config
    pub fn with_config(mut self, config: &VectorizerConfig) -> Self {
        self.tokenizer = config.tokenizer;
        self.strategy = config.strategy;
        self
    }
}

impl<L: TokenLookup, T: Tokenize> VectorizerBuilder<L, T> {
    /// Sets the token to vector lookup the vectorizer reads from
    pub fn with_lookup(mut self, lookup: L) -> Self {
        self.lookup = Some(Arc::new(lookup));
        self
    }

    /// Sets a lookup that is already shared with other vectorizers
    pub fn with_shared_lookup(mut self, lookup: Arc<L>) -> Self {
        self.lookup = Some(lookup);
        self
    }

    /// Replaces the tokenizer
    ///
    /// # Example
    /// ```
    /// use dialogvec::{EmbeddingTable, VectorizerBuilder};
    ///
    /// let builder = VectorizerBuilder::<EmbeddingTable>::new()
    ///     .with_tokenizer(|text: &str| -> Vec<String> {
    ///         text.split_whitespace().map(String::from).collect()
    ///     });
    /// ```
    pub fn with_tokenizer<U: Tokenize>(self, tokenizer: U) -> VectorizerBuilder<L, U> {
        VectorizerBuilder {
            lookup: self.lookup,
            tokenizer,
            strategy: self.strategy,
        }
    }

    pub fn with_strategy(mut self, strategy: AggregationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Builds and returns the final DocumentVectorizer instance
    ///
    /// # Returns
    /// * `Result<DocumentVectorizer, VectorizerError>` - The constructed vectorizer if successful, or an error if:
    ///   - No lookup has been set
    ///   - The lookup is empty and therefore has no dimension
    pub fn build(self) -> Result<DocumentVectorizer<L, T>, VectorizerError> {
        let lookup = self
            .lookup
            .ok_or_else(|| VectorizerError::ValidationError("Embedding lookup must be set".into()))?;

        if lookup.dim() == 0 {
            return Err(VectorizerError::ValidationError(
                "Embedding lookup is empty, cannot infer the vector dimension".into(),
            ));
        }

        info!(
            "Built vectorizer with {}-dimensional embeddings and {} aggregation",
            lookup.dim(),
            self.strategy
        );
        Ok(DocumentVectorizer::from_parts(lookup, Arc::new(self.tokenizer), self.strategy))
    }
}
