//! Linear inference model.
//!
//! Training happens outside this crate; what lives here is the fitted
//! surface a persisted model needs: parameters, batch prediction over a
//! preprocessed matrix, and the serializable representation that moves
//! the model in and out of its artifact.

use crate::error::PipelineError;
use crate::serialization::{load_object, save_object};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Serializable representation of linear model parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LinearModelParams {
    pub weights: Vec<f64>,
    pub bias: f64,
}

/// A trained linear regressor: `y = w · x + b`.
#[derive(Clone, Debug)]
pub struct LinearModel {
    weights: Array1<f64>,
    bias: f64,
}

impl LinearModel {
    /// Create a model from trained parameters.
    pub fn new(weights: Vec<f64>, bias: f64) -> Self {
        Self {
            weights: Array1::from(weights),
            bias,
        }
    }

    /// Number of features the model expects.
    pub fn n_features(&self) -> usize {
        self.weights.len()
    }

    /// Predict one value per row of a preprocessed feature matrix.
    pub fn predict_batch(&self, features: &Array2<f64>) -> Result<Array1<f64>, PipelineError> {
        if features.ncols() != self.weights.len() {
            return Err(PipelineError::ShapeMismatch {
                op: "predict",
                expected: self.weights.len(),
                got: features.ncols(),
            });
        }
        Ok(features.dot(&self.weights) + self.bias)
    }

    /// Extract parameters for serialization.
    pub fn extract_params(&self) -> LinearModelParams {
        LinearModelParams {
            weights: self.weights.to_vec(),
            bias: self.bias,
        }
    }

    /// Reconstruct a model from parameters.
    pub fn from_params(params: LinearModelParams) -> Self {
        Self::new(params.weights, params.bias)
    }

    /// Persist the model parameters to an artifact.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), PipelineError> {
        save_object(path, &self.extract_params())
    }

    /// Load a model back from an artifact.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        let params: LinearModelParams = load_object(path)?;
        Ok(Self::from_params(params))
    }
}
