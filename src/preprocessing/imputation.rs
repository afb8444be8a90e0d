//! Imputation transformers for completing missing values.
//!
//! [`SimpleImputer`] fills missing numeric cells (NaN is the missing
//! marker inside a numeric block). [`CategoryImputer`] fills missing
//! categorical cells with the most frequent category observed at fit time,
//! falling back to the [`MISSING_TOKEN`] for a column with no observed
//! value at all.

use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use crate::preprocessing::CategoryBlock;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fill token for a categorical column with no observed value at fit time.
pub const MISSING_TOKEN: &str = "missing";

/// Strategy for imputing missing numeric values.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub enum ImputeStrategy {
    /// Replace missing values with the mean of each column.
    Mean,
    /// Replace missing values with the median of each column.
    #[default]
    Median,
    /// Replace missing values with a constant value.
    Constant(f64),
}

/// Serializable parameters for a fitted [`SimpleImputer`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimpleImputerParams {
    /// Strategy used for imputation.
    pub strategy: ImputeStrategy,
    /// Fill values for each feature.
    pub statistics_: Vec<f64>,
    /// Number of features seen during fit.
    pub n_features: usize,
}

/// Numeric imputation transformer (unfitted).
#[derive(Clone, Debug, Default)]
pub struct SimpleImputer {
    strategy: ImputeStrategy,
}

impl SimpleImputer {
    /// Create a new imputer with the specified strategy.
    pub fn new(strategy: ImputeStrategy) -> Self {
        Self { strategy }
    }
}

/// Compute per-column fill values, ignoring NaN cells.
fn compute_statistics(data: &Array2<f64>, strategy: &ImputeStrategy) -> Vec<f64> {
    let cols = data.ncols();
    let mut stats = vec![0.0; cols];

    for col in 0..cols {
        let column_values: Vec<f64> = data
            .column(col)
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .collect();

        stats[col] = if column_values.is_empty() {
            // A column that is entirely missing falls back to 0.
            0.0
        } else {
            match strategy {
                ImputeStrategy::Mean => {
                    column_values.iter().sum::<f64>() / column_values.len() as f64
                }
                ImputeStrategy::Median => {
                    let mut sorted = column_values.clone();
                    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
                    let n = sorted.len();
                    if n % 2 == 0 {
                        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
                    } else {
                        sorted[n / 2]
                    }
                }
                ImputeStrategy::Constant(value) => *value,
            }
        };
    }

    stats
}

impl Transformer for SimpleImputer {
    type Input = Array2<f64>;
    type Output = Array2<f64>;
    type Params = SimpleImputerParams;
    type Fitted = FittedSimpleImputer;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        if data.nrows() == 0 {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit SimpleImputer on empty data".to_string(),
            ));
        }

        Ok(FittedSimpleImputer {
            strategy: self.strategy.clone(),
            statistics_: compute_statistics(data, &self.strategy),
            n_features: data.ncols(),
        })
    }
}

/// Fitted numeric imputer ready for inference.
#[derive(Clone, Debug)]
pub struct FittedSimpleImputer {
    strategy: ImputeStrategy,
    statistics_: Vec<f64>,
    n_features: usize,
}

impl FittedSimpleImputer {
    /// Get the fill value for each feature.
    pub fn statistics(&self) -> &[f64] {
        &self.statistics_
    }
}

impl FittedTransformer for FittedSimpleImputer {
    type Input = Array2<f64>;
    type Output = Array2<f64>;
    type Params = SimpleImputerParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        if data.ncols() != self.n_features {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: self.n_features,
                got_features: data.ncols(),
            });
        }

        let mut result = data.clone();
        for (col, &fill) in self.statistics_.iter().enumerate() {
            for value in result.column_mut(col) {
                if value.is_nan() {
                    *value = fill;
                }
            }
        }
        Ok(result)
    }

    fn extract_params(&self) -> Self::Params {
        SimpleImputerParams {
            strategy: self.strategy.clone(),
            statistics_: self.statistics_.clone(),
            n_features: self.n_features,
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        Ok(Self {
            strategy: params.strategy,
            statistics_: params.statistics_,
            n_features: params.n_features,
        })
    }

    fn n_features_in(&self) -> usize {
        self.n_features
    }
}

/// Serializable parameters for a fitted [`CategoryImputer`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CategoryImputerParams {
    /// Fill category for each column.
    pub fill_values: Vec<String>,
    /// Number of columns seen during fit.
    pub n_features: usize,
}

/// Categorical imputation transformer (unfitted).
///
/// The fill value for each column is its most frequent category at fit
/// time; ties break toward the lexicographically smallest category so the
/// fitted plan is deterministic.
#[derive(Clone, Debug, Default)]
pub struct CategoryImputer;

impl CategoryImputer {
    pub fn new() -> Self {
        Self
    }
}

impl Transformer for CategoryImputer {
    type Input = CategoryBlock;
    type Output = CategoryBlock;
    type Params = CategoryImputerParams;
    type Fitted = FittedCategoryImputer;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        if data.n_rows() == 0 {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit CategoryImputer on empty data".to_string(),
            ));
        }

        let mut fill_values = Vec::with_capacity(data.n_columns());
        for column in data.columns() {
            // BTreeMap keeps categories ordered, so the max scan below
            // lands on the lexicographically smallest among ties.
            let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
            for cell in column.iter().flatten() {
                *counts.entry(cell.as_str()).or_insert(0) += 1;
            }
            let mut best: Option<(&str, usize)> = None;
            for (value, count) in &counts {
                if best.map_or(true, |(_, c)| *count > c) {
                    best = Some((value, *count));
                }
            }
            let fill = best
                .map(|(value, _)| value.to_string())
                .unwrap_or_else(|| MISSING_TOKEN.to_string());
            fill_values.push(fill);
        }

        Ok(FittedCategoryImputer {
            fill_values,
            n_features: data.n_columns(),
        })
    }
}

/// Fitted categorical imputer ready for inference.
#[derive(Clone, Debug)]
pub struct FittedCategoryImputer {
    fill_values: Vec<String>,
    n_features: usize,
}

impl FittedCategoryImputer {
    /// Get the fill category for each column.
    pub fn fill_values(&self) -> &[String] {
        &self.fill_values
    }
}

impl FittedTransformer for FittedCategoryImputer {
    type Input = CategoryBlock;
    type Output = CategoryBlock;
    type Params = CategoryImputerParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        if data.n_columns() != self.n_features {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: self.n_features,
                got_features: data.n_columns(),
            });
        }

        let columns = data
            .columns()
            .iter()
            .zip(self.fill_values.iter())
            .map(|(column, fill)| {
                column
                    .iter()
                    .map(|cell| Some(cell.clone().unwrap_or_else(|| fill.clone())))
                    .collect()
            })
            .collect();
        CategoryBlock::new(columns)
    }

    fn extract_params(&self) -> Self::Params {
        CategoryImputerParams {
            fill_values: self.fill_values.clone(),
            n_features: self.n_features,
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        Ok(Self {
            fill_values: params.fill_values,
            n_features: params.n_features,
        })
    }

    fn n_features_in(&self) -> usize {
        self.n_features
    }
}
