//! The data transformation driver.
//!
//! [`DataTransformation`] runs the full fit/transform/assemble cycle for a
//! paired train/test dataset: split the target off each table, fit a fresh
//! preprocessor on the train features only, transform both splits, reshape
//! each target into a column vector, and concatenate features and target
//! into one dense matrix per split. The fitted preprocessor is persisted
//! to the configured artifact path before the call returns; the returned
//! handle is that path.
//!
//! Test data never reaches `fit`. The train split is transformed by its
//! own call after fitting, the same call shape the test split gets.

use crate::error::PipelineError;
use crate::preprocessing::{FittedTransformer, TablePreprocessor, Transformer};
use crate::schema::Schema;
use crate::serialization::save_object;
use crate::table::RawTable;
use log::info;
use ndarray::{concatenate, Array2, Axis};
use std::path::{Path, PathBuf};

/// Configuration for the transformation driver.
#[derive(Clone, Debug)]
pub struct TransformationConfig {
    /// Where the fitted preprocessor artifact is written.
    pub preprocessor_path: PathBuf,
}

impl Default for TransformationConfig {
    fn default() -> Self {
        Self {
            preprocessor_path: PathBuf::from("artifacts").join("preprocessor.bin"),
        }
    }
}

/// Drives preprocessing of a train/test pair and persists the fitted plan.
#[derive(Clone, Debug, Default)]
pub struct DataTransformation {
    config: TransformationConfig,
}

impl DataTransformation {
    pub fn new(config: TransformationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TransformationConfig {
        &self.config
    }

    /// Read the train and test tables from CSV files and run the cycle.
    pub fn run<P: AsRef<Path>>(
        &self,
        train_path: P,
        test_path: P,
    ) -> Result<(Array2<f64>, Array2<f64>, PathBuf), PipelineError> {
        let schema = Schema::freight();
        let train = RawTable::from_csv(&train_path, &schema)?;
        let test = RawTable::from_csv(&test_path, &schema)?;
        info!(
            "read train ({} rows) and test ({} rows) tables",
            train.n_rows(),
            test.n_rows()
        );
        self.run_tables(&train, &test)
    }

    /// Run the cycle over tables already in memory.
    ///
    /// Returns the assembled train matrix, the assembled test matrix
    /// (each `[features | target]`, fully dense) and the path the fitted
    /// preprocessor was persisted to.
    pub fn run_tables(
        &self,
        train: &RawTable,
        test: &RawTable,
    ) -> Result<(Array2<f64>, Array2<f64>, PathBuf), PipelineError> {
        let schema = Schema::freight();

        let (train_features, train_target) = train.split_target(schema.target())?;
        let (test_features, test_target) = test.split_target(schema.target())?;

        info!("numerical columns: {:?}", schema.numeric_columns());
        info!("categorical columns: {:?}", schema.categorical_columns());

        let preprocessor = TablePreprocessor::for_schema(schema);
        let fitted = preprocessor
            .fit(&train_features)
            .map_err(|source| PipelineError::Preprocessing {
                op: "fit preprocessor",
                source,
            })?;

        let train_matrix =
            fitted
                .transform(&train_features)
                .map_err(|source| PipelineError::Preprocessing {
                    op: "transform train features",
                    source,
                })?;
        let test_matrix =
            fitted
                .transform(&test_features)
                .map_err(|source| PipelineError::Preprocessing {
                    op: "transform test features",
                    source,
                })?;

        info!("train feature matrix shape: {:?}", train_matrix.shape());
        info!("test feature matrix shape: {:?}", test_matrix.shape());

        let train_assembled = assemble(train_matrix, train_target)?;
        let test_assembled = assemble(test_matrix, test_target)?;

        save_object(&self.config.preprocessor_path, &fitted.extract_params())?;
        info!(
            "saved preprocessing object to {}",
            self.config.preprocessor_path.display()
        );

        Ok((
            train_assembled,
            test_assembled,
            self.config.preprocessor_path.clone(),
        ))
    }
}

/// Append the target as the rightmost column of the feature matrix.
fn assemble(features: Array2<f64>, target: Vec<f64>) -> Result<Array2<f64>, PipelineError> {
    let rows = features.nrows();
    if target.len() != rows {
        return Err(PipelineError::ShapeMismatch {
            op: "assemble matrix",
            expected: rows,
            got: target.len(),
        });
    }
    let target = Array2::from_shape_vec((rows, 1), target).map_err(|_| {
        PipelineError::ShapeMismatch {
            op: "reshape target",
            expected: rows,
            got: rows,
        }
    })?;
    concatenate(Axis(1), &[features.view(), target.view()]).map_err(|_| {
        PipelineError::ShapeMismatch {
            op: "assemble matrix",
            expected: rows,
            got: rows,
        }
    })
}
