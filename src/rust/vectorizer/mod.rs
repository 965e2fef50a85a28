mod aggregate;
pub mod builder;
mod entities;
mod error;
mod lookup;
mod model;
mod tokenizer;

pub use aggregate::{aggregate, AggregationStrategy};
pub use builder::VectorizerBuilder;
pub use error::VectorizerError;
pub use lookup::{EmbeddingTable, TokenLookup};
pub use model::{vectorize, DocumentVectorizer};
pub use tokenizer::{Tokenize, TweetTokenizer};

/// Information about the current configuration of a vectorizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VectorizerInfo {
    /// Size of the embedding vectors, and so of every output row
    pub embedding_size: usize,
    /// Reduction applied to each document's token vectors
    pub strategy: AggregationStrategy,
}
