//! Core traits for preprocessing transformers.
//!
//! Two central traits:
//! - [`Transformer`]: unfitted, holds hyperparameters, can learn from data.
//! - [`FittedTransformer`]: after fitting; read-only, ready for inference
//!   and serialization.
//!
//! Fitting is the only state change a transformer ever undergoes, and it
//! produces a new value of a different type, so transforming with an unfit
//! transformer is not expressible.

use crate::preprocessing::error::PreprocessingError;
use crate::serialization::SerializableParams;

/// Trait for unfitted transformers with hyperparameters.
///
/// A transformer learns parameters from training data and can then
/// transform new data using those learned parameters.
///
/// # Example
/// ```ignore
/// let imputer = SimpleImputer::new(ImputeStrategy::Median);
/// let fitted = imputer.fit(&train)?;
/// let imputed = fitted.transform(&test)?;
/// ```
pub trait Transformer: Clone {
    /// Input data type for transformation.
    type Input;
    /// Output data type after transformation.
    type Output;
    /// Serializable representation of learned parameters.
    type Params: SerializableParams;
    /// The corresponding fitted transformer type.
    type Fitted: FittedTransformer<
        Params = Self::Params,
        Input = Self::Input,
        Output = Self::Output,
    >;

    /// Fit the transformer to the training data.
    ///
    /// # Errors
    /// Returns [`PreprocessingError`] if the data is empty or incompatible
    /// with the transformer.
    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError>;

    /// Fit the transformer and transform the same data in one step.
    fn fit_transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        let fitted = self.fit(data)?;
        fitted.transform(data)
    }
}

/// Trait for fitted transformers ready for inference.
///
/// A fitted transformer holds learned parameters only; `transform` never
/// mutates them, so a shared reference serves any number of calls.
///
/// # Guarantees
/// - `extract_params()` + `from_params()` is a round-trip.
pub trait FittedTransformer: Clone {
    /// Input data type for transformation.
    type Input;
    /// Output data type after transformation.
    type Output;
    /// Serializable representation of learned parameters.
    type Params: SerializableParams;

    /// Transform data using learned parameters.
    ///
    /// # Errors
    /// Returns [`PreprocessingError`] if the input shape does not match
    /// what the transformer was fit against.
    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError>;

    /// Extract learned parameters as a serializable representation.
    fn extract_params(&self) -> Self::Params;

    /// Reconstruct a fitted transformer from parameters.
    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError>
    where
        Self: Sized;

    /// Save the fitted transformer to a file.
    fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> std::io::Result<()> {
        let params = self.extract_params();
        let bytes = params.to_bytes().map_err(std::io::Error::other)?;
        std::fs::write(path, bytes)
    }

    /// Load a fitted transformer from a file.
    fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, PreprocessingError>
    where
        Self: Sized,
    {
        let bytes = std::fs::read(path)?;
        let params = Self::Params::from_bytes(&bytes)
            .map_err(|e| PreprocessingError::SerializationError(e.to_string()))?;
        Self::from_params(params)
    }

    /// Returns the number of features seen during fit.
    fn n_features_in(&self) -> usize;
}
