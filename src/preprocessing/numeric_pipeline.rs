//! Pipeline for chaining numeric transformers.
//!
//! A [`NumericPipeline`] threads a numeric block through its steps in
//! order, the output of one step feeding the next. The freight
//! preprocessor uses a two-step chain: median imputation, then standard
//! scaling.
//!
//! # Example
//! ```ignore
//! let pipeline = NumericPipeline::new()
//!     .add_imputer(SimpleImputer::new(ImputeStrategy::Median))
//!     .add_scaler(StandardScaler::new());
//!
//! let fitted = pipeline.fit(&data)?;
//! let transformed = fitted.transform(&data)?;
//! ```

use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::imputation::{FittedSimpleImputer, SimpleImputer, SimpleImputerParams};
use crate::preprocessing::scaling::{FittedStandardScaler, StandardScaler, StandardScalerParams};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// A step in the unfitted pipeline.
#[derive(Clone, Debug)]
pub enum NumericStep {
    Imputer(SimpleImputer),
    Scaler(StandardScaler),
}

impl NumericStep {
    fn fit(&self, data: &Array2<f64>) -> Result<FittedNumericStep, PreprocessingError> {
        match self {
            NumericStep::Imputer(t) => t.fit(data).map(FittedNumericStep::Imputer),
            NumericStep::Scaler(t) => t.fit(data).map(FittedNumericStep::Scaler),
        }
    }
}

/// A fitted step ready for inference.
#[derive(Clone, Debug)]
pub enum FittedNumericStep {
    Imputer(FittedSimpleImputer),
    Scaler(FittedStandardScaler),
}

impl FittedNumericStep {
    fn transform(&self, data: &Array2<f64>) -> Result<Array2<f64>, PreprocessingError> {
        match self {
            FittedNumericStep::Imputer(t) => t.transform(data),
            FittedNumericStep::Scaler(t) => t.transform(data),
        }
    }

    fn step_name(&self) -> &'static str {
        match self {
            FittedNumericStep::Imputer(_) => "SimpleImputer",
            FittedNumericStep::Scaler(_) => "StandardScaler",
        }
    }
}

/// Serializable parameters for one fitted step.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum NumericStepParams {
    Imputer(SimpleImputerParams),
    Scaler(StandardScalerParams),
}

/// Serializable parameters for a fitted [`NumericPipeline`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NumericPipelineParams {
    /// Parameters of each step, in application order.
    pub steps: Vec<NumericStepParams>,
    /// Number of features seen during fit.
    pub n_features: usize,
}

/// Pipeline transformer (unfitted).
#[derive(Clone, Debug, Default)]
pub struct NumericPipeline {
    steps: Vec<NumericStep>,
}

impl NumericPipeline {
    /// Create a new empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an imputation step.
    pub fn add_imputer(mut self, imputer: SimpleImputer) -> Self {
        self.steps.push(NumericStep::Imputer(imputer));
        self
    }

    /// Add a scaling step.
    pub fn add_scaler(mut self, scaler: StandardScaler) -> Self {
        self.steps.push(NumericStep::Scaler(scaler));
        self
    }

    /// Get the number of steps in the pipeline.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if the pipeline is empty.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl Transformer for NumericPipeline {
    type Input = Array2<f64>;
    type Output = Array2<f64>;
    type Params = NumericPipelineParams;
    type Fitted = FittedNumericPipeline;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        if self.steps.is_empty() {
            return Err(PreprocessingError::InvalidParameter(
                "Cannot fit an empty pipeline".to_string(),
            ));
        }
        if data.nrows() == 0 {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit pipeline on empty data".to_string(),
            ));
        }

        let mut fitted_steps = Vec::with_capacity(self.steps.len());
        let mut current = data.clone();
        for step in &self.steps {
            let fitted = step.fit(&current)?;
            current = fitted.transform(&current)?;
            fitted_steps.push(fitted);
        }

        Ok(FittedNumericPipeline {
            steps: fitted_steps,
            n_features: data.ncols(),
        })
    }
}

/// Fitted pipeline ready for inference.
#[derive(Clone, Debug)]
pub struct FittedNumericPipeline {
    steps: Vec<FittedNumericStep>,
    n_features: usize,
}

impl FittedNumericPipeline {
    /// Get the number of steps in the pipeline.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if the pipeline is empty.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Get the names of all steps in the pipeline.
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(FittedNumericStep::step_name).collect()
    }

    /// Get a fitted step by position.
    pub fn step(&self, index: usize) -> Option<&FittedNumericStep> {
        self.steps.get(index)
    }
}

impl FittedTransformer for FittedNumericPipeline {
    type Input = Array2<f64>;
    type Output = Array2<f64>;
    type Params = NumericPipelineParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        if data.ncols() != self.n_features {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: self.n_features,
                got_features: data.ncols(),
            });
        }

        let mut result = data.clone();
        for step in &self.steps {
            result = step.transform(&result)?;
        }
        Ok(result)
    }

    fn extract_params(&self) -> Self::Params {
        let steps = self
            .steps
            .iter()
            .map(|step| match step {
                FittedNumericStep::Imputer(t) => NumericStepParams::Imputer(t.extract_params()),
                FittedNumericStep::Scaler(t) => NumericStepParams::Scaler(t.extract_params()),
            })
            .collect();
        NumericPipelineParams {
            steps,
            n_features: self.n_features,
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        let steps = params
            .steps
            .into_iter()
            .map(|step| match step {
                NumericStepParams::Imputer(p) => {
                    FittedSimpleImputer::from_params(p).map(FittedNumericStep::Imputer)
                }
                NumericStepParams::Scaler(p) => {
                    FittedStandardScaler::from_params(p).map(FittedNumericStep::Scaler)
                }
            })
            .collect::<Result<Vec<_>, PreprocessingError>>()?;
        Ok(Self {
            steps,
            n_features: params.n_features,
        })
    }

    fn n_features_in(&self) -> usize {
        self.n_features
    }
}
