use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::labels::LabelConfig;
use crate::vectorizer::{AggregationStrategy, TweetTokenizer, VectorizerError};

/// Settings for the feature pipeline, loadable from JSON.
///
/// Every field is optional in the JSON form:
///
/// ```
/// use dialogvec::{AggregationStrategy, VectorizerConfig};
///
/// let config = VectorizerConfig::from_json_str(r#"{
///     "strategy": "max",
///     "tokenizer": { "reduce_len": true },
///     "labels": { "labels": ["Sheldon", "Penny"], "fallback": "Other" }
/// }"#)?;
/// assert_eq!(config.strategy, AggregationStrategy::Max);
/// assert!(config.tokenizer.preserve_case);
/// # Ok::<(), dialogvec::VectorizerError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorizerConfig {
    pub strategy: AggregationStrategy,
    pub tokenizer: TweetTokenizer,
    pub labels: LabelConfig,
}

impl VectorizerConfig {
    pub fn from_json_str(json: &str) -> Result<Self, VectorizerError> {
        let config: Self = serde_json::from_str(json)?;
        // surface empty labels at load time rather than on first use
        config.labels.build()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, VectorizerError> {
        let path = path.as_ref();
        info!("Loading config from {:?}", path);
        Self::from_json_str(&fs::read_to_string(path)?)
    }
}
