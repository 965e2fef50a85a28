//! Dialogue-line feature extraction for speaker classification.
//!
//! Each line is split with a social-media aware tokenizer, its tokens are
//! looked up in a pre-trained embedding table, and the known token vectors are
//! reduced (max, min or mean) into one fixed-length row. Speaker names are
//! normalized onto a small label set to serve as matching targets.
//!
//! # Basic Usage
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use dialogvec::{AggregationStrategy, DocumentVectorizer, EmbeddingTable, LabelNormalizer};
//!
//! let table = EmbeddingTable::from_pairs(2, vec![
//!     ("cat", [1.0_f32, 0.0]),
//!     ("dog", [3.0, 0.0]),
//! ])?;
//! let vectorizer = DocumentVectorizer::new(table, AggregationStrategy::Mean)?;
//! let labels = LabelNormalizer::default();
//!
//! let lines = ["cat zzz dog", "zzzqqq wwweee"];
//! let speakers = ["Sheldon", "Stuart"];
//!
//! let features = vectorizer.vectorize(&lines)?;
//! let targets = labels.normalize_all(speakers);
//!
//! assert_eq!(features.dim(), (2, 2));
//! assert_eq!(features.row(0).to_vec(), vec![2.0, 0.0]);
//! assert_eq!(features.row(1).to_vec(), vec![0.0, 0.0]);
//! assert_eq!(targets, vec!["Sheldon", "Secondary"]);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod labels;
pub mod vectorizer;

pub use config::VectorizerConfig;
pub use labels::{normalize_label, LabelConfig, LabelNormalizer, MAIN_CHARACTERS, SECONDARY_LABEL};
pub use vectorizer::{
    aggregate, vectorize, AggregationStrategy, DocumentVectorizer, EmbeddingTable, TokenLookup, Tokenize,
    TweetTokenizer, VectorizerBuilder, VectorizerError, VectorizerInfo,
};

pub fn init_logger() {
    env_logger::init();
}
