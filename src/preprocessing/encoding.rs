//! One-hot encoding for categorical features.
//!
//! The encoder learns each column's vocabulary (its sorted unique
//! categories) during fitting and emits one indicator column per learned
//! category. What happens to a category that was never seen at fit time is
//! governed by [`HandleUnknown`]: the freight preprocessor runs with
//! [`HandleUnknown::Ignore`], so an unseen category becomes an all-zero
//! indicator block instead of an error.

use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use crate::preprocessing::CategoryBlock;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Strategy for handling unknown categories during transform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandleUnknown {
    /// Raise an error when unknown categories are encountered.
    #[default]
    Error,
    /// Ignore unknown categories (their indicator block stays zero).
    Ignore,
}

/// Serializable parameters for a fitted [`OneHotEncoder`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OneHotEncoderParams {
    /// Sorted vocabulary for each input column.
    pub categories_: Vec<Vec<String>>,
    /// Number of input columns.
    pub n_features_in: usize,
    /// Total number of output features.
    pub n_features_out: usize,
    /// Handle unknown strategy.
    pub handle_unknown: HandleUnknown,
}

/// One-hot encoder for categorical features (unfitted).
#[derive(Clone, Debug, Default)]
pub struct OneHotEncoder {
    handle_unknown: HandleUnknown,
}

impl OneHotEncoder {
    /// Create a new OneHotEncoder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the strategy for handling unknown categories.
    pub fn with_handle_unknown(mut self, strategy: HandleUnknown) -> Self {
        self.handle_unknown = strategy;
        self
    }
}

impl Transformer for OneHotEncoder {
    type Input = CategoryBlock;
    type Output = Array2<f64>;
    type Params = OneHotEncoderParams;
    type Fitted = FittedOneHotEncoder;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        if data.n_rows() == 0 {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit OneHotEncoder on empty data".to_string(),
            ));
        }

        let mut categories_ = Vec::with_capacity(data.n_columns());
        for column in data.columns() {
            let unique: BTreeSet<&str> = column.iter().flatten().map(String::as_str).collect();
            categories_.push(unique.into_iter().map(str::to_string).collect::<Vec<_>>());
        }

        let n_features_out = categories_.iter().map(Vec::len).sum();

        Ok(FittedOneHotEncoder {
            categories_,
            n_features_in: data.n_columns(),
            n_features_out,
            handle_unknown: self.handle_unknown,
        })
    }
}

/// Fitted OneHotEncoder ready for inference.
#[derive(Clone, Debug)]
pub struct FittedOneHotEncoder {
    categories_: Vec<Vec<String>>,
    n_features_in: usize,
    n_features_out: usize,
    handle_unknown: HandleUnknown,
}

impl FittedOneHotEncoder {
    /// Get the vocabulary learned for each column.
    pub fn categories(&self) -> &[Vec<String>] {
        &self.categories_
    }

    /// Get the number of output features.
    pub fn n_features_out(&self) -> usize {
        self.n_features_out
    }
}

impl FittedTransformer for FittedOneHotEncoder {
    type Input = CategoryBlock;
    type Output = Array2<f64>;
    type Params = OneHotEncoderParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        if data.n_columns() != self.n_features_in {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: self.n_features_in,
                got_features: data.n_columns(),
            });
        }

        let rows = data.n_rows();
        let mut result = Array2::<f64>::zeros((rows, self.n_features_out));

        let mut offset = 0;
        for (col, (column, vocabulary)) in data
            .columns()
            .iter()
            .zip(self.categories_.iter())
            .enumerate()
        {
            for (row, cell) in column.iter().enumerate() {
                match cell {
                    Some(value) => match vocabulary.binary_search_by(|c| c.as_str().cmp(value)) {
                        Ok(position) => result[[row, offset + position]] = 1.0,
                        Err(_) => {
                            if self.handle_unknown == HandleUnknown::Error {
                                return Err(PreprocessingError::UnknownCategory {
                                    column: col,
                                    value: value.clone(),
                                });
                            }
                            // With Ignore, the block stays zero.
                        }
                    },
                    // A missing cell reaching the encoder also maps to zeros.
                    None => {}
                }
            }
            offset += vocabulary.len();
        }

        Ok(result)
    }

    fn extract_params(&self) -> Self::Params {
        OneHotEncoderParams {
            categories_: self.categories_.clone(),
            n_features_in: self.n_features_in,
            n_features_out: self.n_features_out,
            handle_unknown: self.handle_unknown,
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        Ok(Self {
            categories_: params.categories_,
            n_features_in: params.n_features_in,
            n_features_out: params.n_features_out,
            handle_unknown: params.handle_unknown,
        })
    }

    fn n_features_in(&self) -> usize {
        self.n_features_in
    }
}
