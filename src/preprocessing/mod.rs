//! Data preprocessing transformers for the freight pipeline.
//!
//! The transformers here follow one pattern: an unfitted type holding
//! hyperparameters ([`Transformer`]) and a fitted counterpart holding
//! learned statistics ([`FittedTransformer`]), with serializable parameter
//! structs bridging the two across process boundaries.
//!
//! # Available transformers
//!
//! - [`SimpleImputer`]: fill missing numeric cells (mean, median, constant)
//! - [`CategoryImputer`]: fill missing categorical cells with the most
//!   frequent category
//! - [`StandardScaler`]: z-score scaling, optionally variance-only
//! - [`OneHotEncoder`]: indicator columns over a fit-time vocabulary
//! - [`NumericPipeline`]: chain imputation and scaling over a numeric block
//! - [`TablePreprocessor`]: route a table's schema columns through the
//!   numeric and categorical sub-pipelines and concatenate the results
//!
//! # Example
//!
//! ```ignore
//! let preprocessor = TablePreprocessor::for_schema(Schema::freight());
//! let fitted = preprocessor.fit(&train_features)?;
//! let train_matrix = fitted.transform(&train_features)?;
//! let test_matrix = fitted.transform(&test_features)?;
//! fitted.save_to_file("artifacts/preprocessor.bin")?;
//! ```

pub mod column_transformer;
pub mod encoding;
pub mod error;
pub mod imputation;
pub mod numeric_pipeline;
pub mod scaling;
pub mod traits;

pub use column_transformer::{
    FittedTablePreprocessor, TablePreprocessor, TablePreprocessorParams,
};
pub use encoding::{FittedOneHotEncoder, HandleUnknown, OneHotEncoder, OneHotEncoderParams};
pub use error::PreprocessingError;
pub use imputation::{
    CategoryImputer, CategoryImputerParams, FittedCategoryImputer, FittedSimpleImputer,
    ImputeStrategy, SimpleImputer, SimpleImputerParams, MISSING_TOKEN,
};
pub use numeric_pipeline::{
    FittedNumericPipeline, NumericPipeline, NumericPipelineParams, NumericStepParams,
};
pub use scaling::{
    FittedStandardScaler, StandardScaler, StandardScalerConfig, StandardScalerParams,
};
pub use traits::{FittedTransformer, Transformer};

/// Column-major block of raw categorical values.
///
/// Each column is a vector of optional category strings; `None` marks a
/// missing cell. All columns share one row count.
#[derive(Clone, Debug, PartialEq)]
pub struct CategoryBlock {
    columns: Vec<Vec<Option<String>>>,
    n_rows: usize,
}

impl CategoryBlock {
    /// Build a block from columns, checking that all lengths agree.
    pub fn new(columns: Vec<Vec<Option<String>>>) -> Result<Self, PreprocessingError> {
        let n_rows = columns.first().map_or(0, Vec::len);
        for (index, column) in columns.iter().enumerate() {
            if column.len() != n_rows {
                return Err(PreprocessingError::InvalidParameter(format!(
                    "category column {} has {} rows, expected {}",
                    index,
                    column.len(),
                    n_rows
                )));
            }
        }
        Ok(Self { columns, n_rows })
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Vec<Option<String>>] {
        &self.columns
    }
}
