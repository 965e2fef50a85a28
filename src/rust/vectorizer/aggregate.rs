use std::fmt;
use std::str::FromStr;

use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

use super::error::VectorizerError;

/// Pointwise reduction used to collapse a document's token vectors into one vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationStrategy {
    /// Largest value per dimension
    Max,
    /// Smallest value per dimension
    Min,
    /// Arithmetic mean per dimension
    #[default]
    Mean,
}

impl AggregationStrategy {
    pub const ALL: [AggregationStrategy; 3] = [Self::Max, Self::Min, Self::Mean];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Max => "max",
            Self::Min => "min",
            Self::Mean => "mean",
        }
    }
}

impl fmt::Display for AggregationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AggregationStrategy {
    type Err = VectorizerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == s)
            .ok_or_else(|| VectorizerError::UnknownStrategy(s.to_string()))
    }
}

/// Reduces a non-empty list of equal-length vectors to a single vector of that length.
///
/// The reduction runs independently per dimension. A single input vector is
/// returned unchanged by every strategy. A NaN in any input makes that
/// dimension NaN for every strategy.
///
/// # Errors
/// - `EmptyInput` if `vectors` is empty
/// - `DimensionMismatch` if any vector differs in length from the first one
pub fn aggregate(
    vectors: &[ArrayView1<'_, f32>],
    strategy: AggregationStrategy,
) -> Result<Array1<f32>, VectorizerError> {
    let (first, rest) = vectors.split_first().ok_or(VectorizerError::EmptyInput)?;
    let dim = first.len();

    if let Some(pos) = rest.iter().position(|v| v.len() != dim) {
        return Err(VectorizerError::dimension_mismatch(
            format!("vector {} of {}", pos + 2, vectors.len()),
            dim,
            rest[pos].len(),
        ));
    }

    let mut acc = first.to_owned();
    for v in rest {
        match strategy {
            // a stored NaN never compares greater or smaller, so it sticks
            AggregationStrategy::Max => acc.zip_mut_with(v, |a, &b| {
                if b.is_nan() || b > *a {
                    *a = b;
                }
            }),
            AggregationStrategy::Min => acc.zip_mut_with(v, |a, &b| {
                if b.is_nan() || b < *a {
                    *a = b;
                }
            }),
            AggregationStrategy::Mean => acc += v,
        }
    }

    if strategy == AggregationStrategy::Mean {
        acc /= vectors.len() as f32;
    }

    Ok(acc)
}
