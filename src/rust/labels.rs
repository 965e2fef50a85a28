//! Speaker label normalization.
//!
//! Dialogue corpora have a long tail of speakers who appear a handful of times.
//! [`LabelNormalizer`] keeps a fixed set of recognized labels and collapses every
//! other speaker into a single fallback class.

use std::collections::BTreeSet;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::vectorizer::VectorizerError;

/// The main characters recognized by [`LabelNormalizer::default`]
pub const MAIN_CHARACTERS: [&str; 8] = [
    "Sheldon",
    "Penny",
    "Leonard",
    "Raj",
    "Howard",
    "Amy",
    "Bernadette",
    "End",
];

/// Label given to every speaker outside the recognized set
pub const SECONDARY_LABEL: &str = "Secondary";

lazy_static! {
    static ref DEFAULT_NORMALIZER: LabelNormalizer = LabelNormalizer::default();
}

/// Maps `character` onto the main-character label set.
///
/// Exact, case-sensitive matches of [`MAIN_CHARACTERS`] are returned unchanged;
/// everything else becomes [`SECONDARY_LABEL`].
///
/// ```
/// use dialogvec::normalize_label;
///
/// assert_eq!(normalize_label("Penny"), "Penny");
/// assert_eq!(normalize_label("Stuart"), "Secondary");
/// ```
pub fn normalize_label(character: &str) -> &str {
    DEFAULT_NORMALIZER.normalize(character)
}

/// A total, case-sensitive mapping from raw speaker names to a reduced label set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelNormalizer {
    labels: BTreeSet<String>,
    fallback: String,
}

impl Default for LabelNormalizer {
    fn default() -> Self {
        Self {
            labels: MAIN_CHARACTERS.iter().map(|s| s.to_string()).collect(),
            fallback: SECONDARY_LABEL.to_string(),
        }
    }
}

impl LabelNormalizer {
    /// Creates a normalizer over a custom label universe.
    ///
    /// # Errors
    /// - `ValidationError` if the fallback or any recognized label is empty
    pub fn new<I, S>(labels: I, fallback: impl Into<String>) -> Result<Self, VectorizerError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fallback = fallback.into();
        if fallback.is_empty() {
            return Err(VectorizerError::ValidationError("Fallback label cannot be empty".into()));
        }

        let labels: BTreeSet<String> = labels.into_iter().map(Into::into).collect();
        if labels.iter().any(|label| label.is_empty()) {
            return Err(VectorizerError::ValidationError("Recognized labels cannot be empty".into()));
        }

        Ok(Self { labels, fallback })
    }

    pub fn normalize<'a>(&'a self, character: &'a str) -> &'a str {
        if self.labels.contains(character) {
            character
        } else {
            &self.fallback
        }
    }

    /// Normalizes a whole column of speaker names, keeping their order
    pub fn normalize_all<I, S>(&self, characters: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        characters
            .into_iter()
            .map(|c| self.normalize(c.as_ref()).to_string())
            .collect()
    }

    pub fn is_recognized(&self, character: &str) -> bool {
        self.labels.contains(character)
    }

    /// Recognized labels in sorted order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Every label the normalizer can produce, recognized labels first
    pub fn output_labels(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.labels().collect();
        if !self.labels.contains(&self.fallback) {
            out.push(&self.fallback);
        }
        out
    }
}

/// Serializable form of a [`LabelNormalizer`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    pub labels: Vec<String>,
    pub fallback: String,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            labels: MAIN_CHARACTERS.iter().map(|s| s.to_string()).collect(),
            fallback: SECONDARY_LABEL.to_string(),
        }
    }
}

impl LabelConfig {
    pub fn build(&self) -> Result<LabelNormalizer, VectorizerError> {
        LabelNormalizer::new(self.labels.iter().cloned(), self.fallback.clone())
    }
}
