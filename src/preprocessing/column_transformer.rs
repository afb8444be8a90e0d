//! Column-routed preprocessing plan for shipment tables.
//!
//! [`TablePreprocessor`] is the declarative plan: the schema's numeric
//! columns go through median imputation and standard scaling, the
//! categorical columns through most-frequent imputation, one-hot encoding
//! (unknown categories ignored) and variance-only scaling. Columns the
//! schema does not declare are dropped. The two group outputs are
//! horizontally concatenated, numeric block first, into one dense matrix.
//!
//! Construction is pure configuration and cannot fail; all learning
//! happens in `fit`, which consumes training data only.

use crate::preprocessing::encoding::{FittedOneHotEncoder, HandleUnknown, OneHotEncoder};
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::imputation::{
    CategoryImputer, CategoryImputerParams, FittedCategoryImputer, ImputeStrategy, SimpleImputer,
};
use crate::preprocessing::numeric_pipeline::{FittedNumericPipeline, NumericPipeline};
use crate::preprocessing::scaling::{FittedStandardScaler, StandardScaler};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use crate::preprocessing::{
    CategoryBlock, NumericPipelineParams, OneHotEncoderParams, StandardScalerParams,
};
use crate::schema::Schema;
use crate::table::{ColumnData, RawTable};
use ndarray::{concatenate, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Serializable parameters for a fitted [`TablePreprocessor`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TablePreprocessorParams {
    /// The schema the plan was built for.
    pub schema: Schema,
    /// Fitted numeric sub-pipeline.
    pub numeric: NumericPipelineParams,
    /// Fitted categorical imputer.
    pub cat_imputer: CategoryImputerParams,
    /// Fitted one-hot encoder.
    pub encoder: OneHotEncoderParams,
    /// Fitted variance-only scaler for the one-hot block.
    pub cat_scaler: StandardScalerParams,
    /// Total number of output features.
    pub n_features_out: usize,
}

/// Unfitted column-routed preprocessing plan.
#[derive(Clone, Debug)]
pub struct TablePreprocessor {
    schema: Schema,
}

impl TablePreprocessor {
    /// Build the plan for a schema. Pure configuration; cannot fail.
    pub fn for_schema(schema: Schema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    fn numeric_pipeline() -> NumericPipeline {
        NumericPipeline::new()
            .add_imputer(SimpleImputer::new(ImputeStrategy::Median))
            .add_scaler(StandardScaler::new())
    }
}

/// Extract the named numeric columns into a dense block, NaN for missing.
fn numeric_block(table: &RawTable, names: &[&str]) -> Result<Array2<f64>, PreprocessingError> {
    let rows = table.n_rows();
    let mut block = Array2::from_elem((rows, names.len()), f64::NAN);
    for (index, name) in names.iter().enumerate() {
        let column = table
            .column(name)
            .ok_or_else(|| PreprocessingError::MissingColumn((*name).to_string()))?;
        match column.data() {
            ColumnData::Numeric(cells) => {
                for (row, cell) in cells.iter().enumerate() {
                    if let Some(value) = cell {
                        block[[row, index]] = *value;
                    }
                }
            }
            ColumnData::Categorical(_) => {
                return Err(PreprocessingError::in_column(
                    *name,
                    index,
                    PreprocessingError::InvalidParameter(
                        "expected a numeric column".to_string(),
                    ),
                ))
            }
        }
    }
    Ok(block)
}

/// Extract the named categorical columns into a category block.
fn category_block(table: &RawTable, names: &[&str]) -> Result<CategoryBlock, PreprocessingError> {
    let mut columns = Vec::with_capacity(names.len());
    for (index, name) in names.iter().enumerate() {
        let column = table
            .column(name)
            .ok_or_else(|| PreprocessingError::MissingColumn((*name).to_string()))?;
        match column.data() {
            ColumnData::Categorical(cells) => columns.push(cells.clone()),
            ColumnData::Numeric(_) => {
                return Err(PreprocessingError::in_column(
                    *name,
                    index,
                    PreprocessingError::InvalidParameter(
                        "expected a categorical column".to_string(),
                    ),
                ))
            }
        }
    }
    CategoryBlock::new(columns)
}

fn join_blocks(
    numeric: Array2<f64>,
    categorical: Array2<f64>,
) -> Result<Array2<f64>, PreprocessingError> {
    concatenate(Axis(1), &[numeric.view(), categorical.view()]).map_err(|e| {
        PreprocessingError::InvalidParameter(format!("failed to join feature blocks: {}", e))
    })
}

impl Transformer for TablePreprocessor {
    type Input = RawTable;
    type Output = Array2<f64>;
    type Params = TablePreprocessorParams;
    type Fitted = FittedTablePreprocessor;

    fn fit(&self, table: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        if table.n_rows() == 0 {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit preprocessor on an empty table".to_string(),
            ));
        }

        let numeric_names = self.schema.numeric_columns();
        let categorical_names = self.schema.categorical_columns();

        let block = numeric_block(table, &numeric_names)?;
        let numeric = Self::numeric_pipeline().fit(&block)?;

        let (cat_imputer, encoder, cat_scaler) = if categorical_names.is_empty() {
            empty_categorical_stage()?
        } else {
            let raw = category_block(table, &categorical_names)?;
            let cat_imputer = CategoryImputer::new().fit(&raw)?;
            let imputed = cat_imputer.transform(&raw)?;
            let encoder = OneHotEncoder::new()
                .with_handle_unknown(HandleUnknown::Ignore)
                .fit(&imputed)?;
            let encoded = encoder.transform(&imputed)?;
            let cat_scaler = StandardScaler::new().with_mean(false).fit(&encoded)?;
            (cat_imputer, encoder, cat_scaler)
        };

        let n_features_out = numeric_names.len() + encoder.n_features_out();

        Ok(FittedTablePreprocessor {
            schema: self.schema.clone(),
            numeric,
            cat_imputer,
            encoder,
            cat_scaler,
            n_features_out,
        })
    }
}

/// Fitted stage for a schema with no categorical columns.
fn empty_categorical_stage(
) -> Result<(FittedCategoryImputer, FittedOneHotEncoder, FittedStandardScaler), PreprocessingError>
{
    let imputer = FittedCategoryImputer::from_params(CategoryImputerParams {
        fill_values: Vec::new(),
        n_features: 0,
    })?;
    let encoder = FittedOneHotEncoder::from_params(OneHotEncoderParams {
        categories_: Vec::new(),
        n_features_in: 0,
        n_features_out: 0,
        handle_unknown: HandleUnknown::Ignore,
    })?;
    let scaler = FittedStandardScaler::from_params(StandardScalerParams {
        config: crate::preprocessing::StandardScalerConfig {
            with_mean: false,
            with_std: true,
        },
        mean: Vec::new(),
        scale: Vec::new(),
        n_features: 0,
    })?;
    Ok((imputer, encoder, scaler))
}

/// Fitted column-routed preprocessor, immutable and reusable.
#[derive(Clone, Debug)]
pub struct FittedTablePreprocessor {
    schema: Schema,
    numeric: FittedNumericPipeline,
    cat_imputer: FittedCategoryImputer,
    encoder: FittedOneHotEncoder,
    cat_scaler: FittedStandardScaler,
    n_features_out: usize,
}

impl FittedTablePreprocessor {
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Total number of output features (numeric block plus one-hot block).
    pub fn n_features_out(&self) -> usize {
        self.n_features_out
    }

    /// The fitted numeric sub-pipeline.
    pub fn numeric_pipeline(&self) -> &FittedNumericPipeline {
        &self.numeric
    }

    /// The fitted categorical imputer.
    pub fn category_imputer(&self) -> &FittedCategoryImputer {
        &self.cat_imputer
    }

    /// The fitted one-hot encoder.
    pub fn encoder(&self) -> &FittedOneHotEncoder {
        &self.encoder
    }
}

impl FittedTransformer for FittedTablePreprocessor {
    type Input = RawTable;
    type Output = Array2<f64>;
    type Params = TablePreprocessorParams;

    fn transform(&self, table: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        let rows = table.n_rows();
        let numeric_names = self.schema.numeric_columns();
        let categorical_names = self.schema.categorical_columns();

        let block = numeric_block(table, &numeric_names)?;
        let numeric_out = self.numeric.transform(&block)?;

        let categorical_out = if categorical_names.is_empty() {
            Array2::zeros((rows, 0))
        } else {
            let raw = category_block(table, &categorical_names)?;
            let imputed = self.cat_imputer.transform(&raw)?;
            let encoded = self.encoder.transform(&imputed)?;
            self.cat_scaler.transform(&encoded)?
        };

        join_blocks(numeric_out, categorical_out)
    }

    fn extract_params(&self) -> Self::Params {
        TablePreprocessorParams {
            schema: self.schema.clone(),
            numeric: self.numeric.extract_params(),
            cat_imputer: self.cat_imputer.extract_params(),
            encoder: self.encoder.extract_params(),
            cat_scaler: self.cat_scaler.extract_params(),
            n_features_out: self.n_features_out,
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        Ok(Self {
            schema: params.schema,
            numeric: FittedNumericPipeline::from_params(params.numeric)?,
            cat_imputer: FittedCategoryImputer::from_params(params.cat_imputer)?,
            encoder: FittedOneHotEncoder::from_params(params.encoder)?,
            cat_scaler: FittedStandardScaler::from_params(params.cat_scaler)?,
            n_features_out: params.n_features_out,
        })
    }

    fn n_features_in(&self) -> usize {
        self.schema.columns().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessing::numeric_pipeline::FittedNumericStep;
    use crate::table::TableBuilder;

    fn cat(values: &[&str]) -> Vec<Option<String>> {
        values.iter().map(|v| Some((*v).to_string())).collect()
    }

    /// A two-row feature table over the full freight schema. Categorical
    /// columns other than Country and Shipment Mode hold a constant
    /// placeholder.
    fn freight_features(
        pack_price: Vec<Option<f64>>,
        weight: Vec<Option<f64>>,
        country: &[&str],
        shipment_mode: &[&str],
    ) -> RawTable {
        let n = country.len();
        let filler = cat(&vec!["x"; n]);
        TableBuilder::new()
            .numeric("Pack Price", pack_price)
            .numeric("Weight (Kilograms)", weight)
            .categorical("Country", cat(country))
            .categorical("Fulfill Via", filler.clone())
            .categorical("Vendor INCO Term", filler.clone())
            .categorical("Vendor", filler.clone())
            .categorical("Shipment Mode", cat(shipment_mode))
            .categorical("Sub Classification", filler.clone())
            .categorical("First Line Designation", filler.clone())
            .categorical("Year", filler)
            .build()
            .unwrap()
    }

    #[test]
    fn test_fit_records_numeric_medians() {
        let table = freight_features(
            vec![Some(1.0), Some(3.0), Some(8.0)],
            vec![Some(10.0), None, Some(30.0)],
            &["US", "US", "FR"],
            &["Air", "Air", "Ocean"],
        );
        let fitted = TablePreprocessor::for_schema(Schema::freight())
            .fit(&table)
            .unwrap();

        match fitted.numeric_pipeline().step(0) {
            Some(FittedNumericStep::Imputer(imputer)) => {
                // Pack Price median of [1, 3, 8]; Weight median of [10, 30].
                assert!((imputer.statistics()[0] - 3.0).abs() < 1e-12);
                assert!((imputer.statistics()[1] - 20.0).abs() < 1e-12);
            }
            other => panic!("expected imputer as first numeric step, got {:?}", other),
        }
    }

    #[test]
    fn test_output_width_is_numeric_plus_vocabulary() {
        let table = freight_features(
            vec![Some(1.0), Some(2.0)],
            vec![Some(5.0), Some(6.0)],
            &["US", "FR"],
            &["Air", "Ocean"],
        );
        let fitted = TablePreprocessor::for_schema(Schema::freight())
            .fit(&table)
            .unwrap();

        // Country and Shipment Mode contribute 2 categories each, the six
        // placeholder columns 1 each: 2 numeric + (2 + 2 + 6) one-hot.
        assert_eq!(fitted.n_features_out(), 12);
        let out = fitted.transform(&table).unwrap();
        assert_eq!(out.shape(), &[2, 12]);
    }

    #[test]
    fn test_row_count_always_preserved() {
        let train = freight_features(
            vec![Some(1.0), Some(2.0)],
            vec![Some(5.0), Some(6.0)],
            &["US", "FR"],
            &["Air", "Ocean"],
        );
        let fitted = TablePreprocessor::for_schema(Schema::freight())
            .fit(&train)
            .unwrap();

        let test = freight_features(
            vec![Some(9.0), None, Some(4.0)],
            vec![None, Some(1.0), Some(2.0)],
            &["US", "DE", "FR"],
            &["Ocean", "Truck", "Air"],
        );
        assert_eq!(fitted.transform(&test).unwrap().nrows(), 3);
    }

    #[test]
    fn test_unseen_category_yields_zero_block() {
        let train = freight_features(
            vec![Some(1.0), Some(2.0)],
            vec![Some(5.0), Some(6.0)],
            &["US", "FR"],
            &["Air", "Air"],
        );
        let fitted = TablePreprocessor::for_schema(Schema::freight())
            .fit(&train)
            .unwrap();

        // Country "DE" was never seen at fit time.
        let test = freight_features(vec![Some(1.0)], vec![Some(5.0)], &["DE"], &["Air"]);
        let out = fitted.transform(&test).unwrap();

        // Country is the first categorical column: its indicator block
        // starts right after the two numeric columns.
        let country_width = fitted.encoder().categories()[0].len();
        assert_eq!(country_width, 2);
        for col in 2..2 + country_width {
            assert_eq!(out[[0, col]], 0.0);
        }
    }

    #[test]
    fn test_undeclared_columns_are_dropped() {
        let table = freight_features(
            vec![Some(1.0), Some(2.0)],
            vec![Some(5.0), Some(6.0)],
            &["US", "FR"],
            &["Air", "Ocean"],
        );
        let mut columns: Vec<_> = table.columns().to_vec();
        columns.push(crate::table::Column::categorical(
            "Managed By",
            cat(&["PMO - US", "PMO - US"]),
        ));
        let widened = RawTable::from_columns(columns).unwrap();

        let fitted = TablePreprocessor::for_schema(Schema::freight())
            .fit(&widened)
            .unwrap();
        let narrow = TablePreprocessor::for_schema(Schema::freight())
            .fit(&table)
            .unwrap();
        assert_eq!(fitted.n_features_out(), narrow.n_features_out());
    }

    #[test]
    fn test_missing_schema_column_is_an_error() {
        let table = TableBuilder::new()
            .numeric("Pack Price", vec![Some(1.0)])
            .build()
            .unwrap();
        let result = TablePreprocessor::for_schema(Schema::freight()).fit(&table);
        assert!(matches!(
            result,
            Err(PreprocessingError::MissingColumn(_))
        ));
    }

    #[test]
    fn test_wrong_column_type_reports_the_column() {
        let table = freight_features(
            vec![Some(1.0), Some(2.0)],
            vec![Some(5.0), Some(6.0)],
            &["US", "FR"],
            &["Air", "Ocean"],
        );
        // Rebuild with Pack Price as a categorical column.
        let columns: Vec<_> = table
            .columns()
            .iter()
            .map(|c| {
                if c.name() == "Pack Price" {
                    crate::table::Column::categorical("Pack Price", cat(&["1", "2"]))
                } else {
                    c.clone()
                }
            })
            .collect();
        let broken = RawTable::from_columns(columns).unwrap();

        let result = TablePreprocessor::for_schema(Schema::freight()).fit(&broken);
        match result {
            Err(PreprocessingError::InColumn { name, index: 0, .. }) => {
                assert_eq!(name, "Pack Price");
            }
            other => panic!("expected column-wrapped error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_table_cannot_be_fit() {
        let table = TableBuilder::new().build().unwrap();
        assert!(matches!(
            TablePreprocessor::for_schema(Schema::freight()).fit(&table),
            Err(PreprocessingError::EmptyData(_))
        ));
    }

    #[test]
    fn test_fitted_params_file_round_trip() {
        let table = freight_features(
            vec![Some(1.0), Some(3.0)],
            vec![Some(10.0), None],
            &["US", "FR"],
            &["Air", "Ocean"],
        );
        let fitted = TablePreprocessor::for_schema(Schema::freight())
            .fit(&table)
            .unwrap();

        let path = std::env::temp_dir().join("freightcast_test_preprocessor.bin");
        fitted.save_to_file(&path).unwrap();
        let loaded = FittedTablePreprocessor::load_from_file(&path).unwrap();

        assert_eq!(loaded.n_features_out(), fitted.n_features_out());
        let a = fitted.transform(&table).unwrap();
        let b = loaded.transform(&table).unwrap();
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-12);
        }

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_transform_matches_known_values() {
        // Pack Price [1, 3]: mean 2, std 1 -> [-1, 1].
        // Weight [10, None]: median 10, imputed to [10, 10], constant ->
        // scale clamps to 1 and centering yields [0, 0].
        let table = freight_features(
            vec![Some(1.0), Some(3.0)],
            vec![Some(10.0), None],
            &["US", "US"],
            &["Air", "Air"],
        );
        let fitted = TablePreprocessor::for_schema(Schema::freight())
            .fit(&table)
            .unwrap();
        let out = fitted.transform(&table).unwrap();

        assert!((out[[0, 0]] - (-1.0)).abs() < 1e-12);
        assert!((out[[1, 0]] - 1.0).abs() < 1e-12);
        assert!((out[[0, 1]] - 0.0).abs() < 1e-12);
        assert!((out[[1, 1]] - 0.0).abs() < 1e-12);

        // Every categorical column is constant: each indicator column is
        // all ones, has zero variance, and passes through unscaled.
        for col in 2..fitted.n_features_out() {
            assert_eq!(out[[0, col]], 1.0);
            assert_eq!(out[[1, col]], 1.0);
        }
    }
}
