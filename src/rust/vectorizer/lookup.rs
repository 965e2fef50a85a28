use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, info, warn};
use ndarray::{Array1, ArrayView1};

use super::error::VectorizerError;

/// Read-only access to pre-trained token vectors.
///
/// Every vector handed out by an implementation is expected to have exactly
/// [`dim`](TokenLookup::dim) elements; the vectorizer checks this on every lookup.
pub trait TokenLookup: Send + Sync {
    /// Dimension shared by every vector in the lookup
    fn dim(&self) -> usize;

    /// Returns the vector for `token`, or `None` for out-of-vocabulary tokens
    fn get(&self, token: &str) -> Option<ArrayView1<'_, f32>>;

    fn contains(&self, token: &str) -> bool {
        self.get(token).is_some()
    }
}

impl TokenLookup for HashMap<String, Array1<f32>> {
    fn dim(&self) -> usize {
        self.values().next().map_or(0, |v| v.len())
    }

    fn get(&self, token: &str) -> Option<ArrayView1<'_, f32>> {
        HashMap::get(self, token).map(|v| v.view())
    }

    fn contains(&self, token: &str) -> bool {
        self.contains_key(token)
    }
}

impl TokenLookup for HashMap<String, Vec<f32>> {
    fn dim(&self) -> usize {
        self.values().next().map_or(0, |v| v.len())
    }

    fn get(&self, token: &str) -> Option<ArrayView1<'_, f32>> {
        HashMap::get(self, token).map(|v| ArrayView1::from(v.as_slice()))
    }

    fn contains(&self, token: &str) -> bool {
        self.contains_key(token)
    }
}

/// An in-memory token to vector table with a fixed dimension.
///
/// Vectors are stored row-major in one contiguous buffer. The dimension is
/// validated on every insert, so a table can never hold a malformed row.
#[derive(Debug, Clone)]
pub struct EmbeddingTable {
    dim: usize,
    index: HashMap<String, usize>,
    values: Vec<f32>,
}

impl EmbeddingTable {
    /// Creates an empty table for vectors of length `dim`.
    ///
    /// # Errors
    /// - `ValidationError` if `dim` is zero
    pub fn new(dim: usize) -> Result<Self, VectorizerError> {
        if dim == 0 {
            return Err(VectorizerError::ValidationError("Embedding dimension must be positive".into()));
        }
        Ok(Self {
            dim,
            index: HashMap::new(),
            values: Vec::new(),
        })
    }

    /// Builds a table from `(token, vector)` pairs.
    ///
    /// # Example
    /// ```
    /// use dialogvec::{EmbeddingTable, TokenLookup};
    ///
    /// let table = EmbeddingTable::from_pairs(2, vec![("cat", [1.0_f32, 0.0]), ("dog", [3.0, 0.0])])?;
    /// assert_eq!(table.len(), 2);
    /// assert!(table.contains("dog"));
    /// # Ok::<(), dialogvec::VectorizerError>(())
    /// ```
    pub fn from_pairs<I, S, V>(dim: usize, pairs: I) -> Result<Self, VectorizerError>
    where
        I: IntoIterator<Item = (S, V)>,
        S: Into<String>,
        V: AsRef<[f32]>,
    {
        let mut table = Self::new(dim)?;
        for (token, vector) in pairs {
            table.insert(token, vector)?;
        }
        Ok(table)
    }

    /// Inserts or replaces the vector for `token`.
    ///
    /// # Errors
    /// - `ValidationError` if the token is empty
    /// - `DimensionMismatch` if the vector length differs from the table dimension
    pub fn insert(&mut self, token: impl Into<String>, vector: impl AsRef<[f32]>) -> Result<(), VectorizerError> {
        let token = token.into();
        let vector = vector.as_ref();

        if token.is_empty() {
            return Err(VectorizerError::ValidationError("Token cannot be empty".into()));
        }
        if vector.len() != self.dim {
            return Err(VectorizerError::dimension_mismatch(format!("token '{}'", token), self.dim, vector.len()));
        }

        match self.index.get(&token) {
            Some(&row) => {
                let start = row * self.dim;
                self.values[start..start + self.dim].copy_from_slice(vector);
            }
            None => {
                self.index.insert(token, self.index.len());
                self.values.extend_from_slice(vector);
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Iterates over the known tokens in no particular order
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    /// Opens and parses a plain-text embedding file. See [`EmbeddingTable::from_reader`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, VectorizerError> {
        let path = path.as_ref();
        info!("Loading embeddings from {:?}", path);
        let table = Self::from_reader(BufReader::new(File::open(path)?))?;
        info!("Loaded {} vectors of dimension {} from {:?}", table.len(), table.dim, path);
        Ok(table)
    }

    /// Parses the GloVe / word2vec text format.
    ///
    /// Each line holds a token followed by its whitespace separated values. An
    /// optional first line `count dim` (word2vec) fixes the dimension up front;
    /// otherwise it is taken from the first vector. Blank lines are skipped and
    /// the first occurrence of a duplicated token wins.
    ///
    /// # Errors
    /// - `ParseError` for a line with a bad value or the wrong number of values
    /// - `ValidationError` if the input holds no vectors
    /// - `Io` if reading fails
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, VectorizerError> {
        let mut table: Option<EmbeddingTable> = None;
        let mut declared_count = None;
        let mut duplicates = 0usize;

        for (idx, line) in reader.lines().enumerate() {
            let line_no = idx + 1;
            let line = line?;
            let mut fields = line.split_whitespace();
            let token = match fields.next() {
                Some(token) => token,
                None => continue,
            };
            let raw_values: Vec<&str> = fields.collect();

            if table.is_none() && declared_count.is_none() {
                if let Some((count, dim)) = parse_header(token, &raw_values) {
                    debug!("Found header declaring {} vectors of dimension {}", count, dim);
                    declared_count = Some(count);
                    table = Some(Self::new(dim).map_err(|e| VectorizerError::ParseError {
                        line: line_no,
                        message: e.to_string(),
                    })?);
                    continue;
                }
            }

            if raw_values.is_empty() {
                return Err(VectorizerError::ParseError {
                    line: line_no,
                    message: format!("token '{}' has no vector values", token),
                });
            }

            let vector = raw_values
                .iter()
                .map(|raw| {
                    raw.parse::<f32>().map_err(|_| VectorizerError::ParseError {
                        line: line_no,
                        message: format!("invalid value '{}' for token '{}'", raw, token),
                    })
                })
                .collect::<Result<Vec<f32>, _>>()?;

            let dim = table.as_ref().map_or(vector.len(), |t| t.dim);
            if vector.len() != dim {
                return Err(VectorizerError::ParseError {
                    line: line_no,
                    message: format!("expected {} values for token '{}', found {}", dim, token, vector.len()),
                });
            }
            let target = table.get_or_insert_with(|| EmbeddingTable {
                dim,
                index: HashMap::new(),
                values: Vec::new(),
            });
            if target.contains(token) {
                duplicates += 1;
                continue;
            }
            target.insert(token, vector)?;
        }

        let table = table
            .filter(|t| !t.is_empty())
            .ok_or_else(|| VectorizerError::ValidationError("Embedding input contains no vectors".into()))?;

        if duplicates > 0 {
            debug!("Skipped {} duplicated tokens", duplicates);
        }
        if let Some(count) = declared_count {
            if count != table.len() + duplicates {
                warn!("Header declared {} vectors but {} were read", count, table.len() + duplicates);
            }
        }
        Ok(table)
    }
}

fn parse_header(first: &str, rest: &[&str]) -> Option<(usize, usize)> {
    match rest {
        [dim] => Some((first.parse().ok()?, dim.parse().ok()?)),
        _ => None,
    }
}

impl TokenLookup for EmbeddingTable {
    fn dim(&self) -> usize {
        self.dim
    }

    fn get(&self, token: &str) -> Option<ArrayView1<'_, f32>> {
        self.index.get(token).map(|&row| {
            let start = row * self.dim;
            ArrayView1::from(&self.values[start..start + self.dim])
        })
    }

    fn contains(&self, token: &str) -> bool {
        self.index.contains_key(token)
    }
}
