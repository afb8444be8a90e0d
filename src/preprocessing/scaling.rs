//! Standard scaler (z-score normalization).
//!
//! Transforms features by removing the mean and scaling to unit variance:
//! `z = (x - u) / s`, where `u` and `s` are learned from the training
//! data. Either half can be switched off; the one-hot block of the table
//! preprocessor runs with `with_mean(false)` so the indicator columns are
//! scaled without being densified around a shifted origin.

use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Configuration for [`StandardScaler`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StandardScalerConfig {
    /// If true, center the data before scaling.
    pub with_mean: bool,
    /// If true, scale the data to unit variance.
    pub with_std: bool,
}

impl Default for StandardScalerConfig {
    fn default() -> Self {
        Self {
            with_mean: true,
            with_std: true,
        }
    }
}

/// Serializable parameters for a fitted [`StandardScaler`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StandardScalerParams {
    /// Configuration options.
    pub config: StandardScalerConfig,
    /// Mean of each feature (zeros if `with_mean` is false).
    pub mean: Vec<f64>,
    /// Scale divisor for each feature (ones if `with_std` is false).
    pub scale: Vec<f64>,
    /// Number of features seen during fit.
    pub n_features: usize,
}

/// StandardScaler transformer (unfitted).
#[derive(Clone, Debug, Default)]
pub struct StandardScaler {
    config: StandardScalerConfig,
}

impl StandardScaler {
    /// Create a new StandardScaler with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to center data by mean.
    pub fn with_mean(mut self, with_mean: bool) -> Self {
        self.config.with_mean = with_mean;
        self
    }

    /// Set whether to scale data to unit variance.
    pub fn with_std(mut self, with_std: bool) -> Self {
        self.config.with_std = with_std;
        self
    }
}

impl Transformer for StandardScaler {
    type Input = Array2<f64>;
    type Output = Array2<f64>;
    type Params = StandardScalerParams;
    type Fitted = FittedStandardScaler;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        let cols = data.ncols();
        if data.nrows() == 0 {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit StandardScaler on empty data".to_string(),
            ));
        }

        let mean = if self.config.with_mean {
            data.mean_axis(Axis(0)).ok_or_else(|| {
                PreprocessingError::EmptyData("no rows to average".to_string())
            })?
        } else {
            Array1::zeros(cols)
        };

        let scale = if self.config.with_std {
            // Population standard deviation (ddof = 0); constant features
            // get scale 1 so they pass through unchanged.
            data.std_axis(Axis(0), 0.0)
                .mapv(|s| if s == 0.0 { 1.0 } else { s })
        } else {
            Array1::ones(cols)
        };

        Ok(FittedStandardScaler {
            config: self.config.clone(),
            mean,
            scale,
            n_features: cols,
        })
    }
}

/// Fitted StandardScaler ready for inference.
#[derive(Clone, Debug)]
pub struct FittedStandardScaler {
    config: StandardScalerConfig,
    mean: Array1<f64>,
    scale: Array1<f64>,
    n_features: usize,
}

impl FittedStandardScaler {
    /// Get the mean values for each feature.
    pub fn mean(&self) -> &Array1<f64> {
        &self.mean
    }

    /// Get the scale divisor for each feature.
    pub fn scale(&self) -> &Array1<f64> {
        &self.scale
    }
}

impl FittedTransformer for FittedStandardScaler {
    type Input = Array2<f64>;
    type Output = Array2<f64>;
    type Params = StandardScalerParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        if data.ncols() != self.n_features {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: self.n_features,
                got_features: data.ncols(),
            });
        }

        let mut result = data.clone();
        if self.config.with_mean {
            result = result - &self.mean;
        }
        if self.config.with_std {
            result = result / &self.scale;
        }
        Ok(result)
    }

    fn extract_params(&self) -> Self::Params {
        StandardScalerParams {
            config: self.config.clone(),
            mean: self.mean.to_vec(),
            scale: self.scale.to_vec(),
            n_features: self.n_features,
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        Ok(Self {
            config: params.config,
            mean: Array1::from(params.mean),
            scale: Array1::from(params.scale),
            n_features: params.n_features,
        })
    }

    fn n_features_in(&self) -> usize {
        self.n_features
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_standard_scaler_zero_mean_unit_variance() {
        let data = array![[1.0, 10.0], [3.0, 30.0]];
        let fitted = StandardScaler::new().fit(&data).unwrap();

        let scaled = fitted.transform(&data).unwrap();
        // Column 0: mean 2, std 1 -> [-1, 1]
        assert!((scaled[[0, 0]] - (-1.0)).abs() < 1e-12);
        assert!((scaled[[1, 0]] - 1.0).abs() < 1e-12);
        // Column 1: mean 20, std 10 -> [-1, 1]
        assert!((scaled[[0, 1]] - (-1.0)).abs() < 1e-12);
        assert!((scaled[[1, 1]] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_standard_scaler_variance_only() {
        let data = array![[1.0], [0.0]];
        let fitted = StandardScaler::new().with_mean(false).fit(&data).unwrap();

        assert_eq!(fitted.mean().to_vec(), vec![0.0]);
        let scaled = fitted.transform(&data).unwrap();
        // std of [1, 0] is 0.5; values divide without centering.
        assert!((scaled[[0, 0]] - 2.0).abs() < 1e-12);
        assert!((scaled[[1, 0]] - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_standard_scaler_constant_column_passes_through() {
        let data = array![[7.0], [7.0]];
        let fitted = StandardScaler::new().with_mean(false).fit(&data).unwrap();
        assert_eq!(fitted.scale().to_vec(), vec![1.0]);

        let scaled = fitted.transform(&data).unwrap();
        assert!((scaled[[0, 0]] - 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_standard_scaler_transform_new_data_uses_fit_statistics() {
        let train = array![[0.0], [2.0]];
        let fitted = StandardScaler::new().fit(&train).unwrap();

        let test = array![[4.0]];
        let scaled = fitted.transform(&test).unwrap();
        // mean 1, std 1 -> (4 - 1) / 1 = 3
        assert!((scaled[[0, 0]] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_standard_scaler_feature_mismatch() {
        let data = array![[1.0, 2.0]];
        let fitted = StandardScaler::new().fit(&data).unwrap();
        let wrong = array![[1.0]];
        assert!(matches!(
            fitted.transform(&wrong),
            Err(PreprocessingError::FeatureMismatch { .. })
        ));
    }

    #[test]
    fn test_standard_scaler_empty_data() {
        let data = Array2::<f64>::zeros((0, 1));
        assert!(StandardScaler::new().fit(&data).is_err());
    }

    #[test]
    fn test_standard_scaler_params_round_trip() {
        let data = array![[1.0, 10.0], [3.0, 30.0], [5.0, 20.0]];
        let fitted = StandardScaler::new().fit(&data).unwrap();
        let restored = FittedStandardScaler::from_params(fitted.extract_params()).unwrap();

        let a = fitted.transform(&data).unwrap();
        let b = restored.transform(&data).unwrap();
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-12);
        }
    }
}
