//! Single-record inference.
//!
//! A [`ShipmentRecord`] holds one scalar value per non-target schema
//! column. [`ShipmentRecord::to_table`] shapes it into a one-row table
//! whose column names match the fit-time schema byte-for-byte, and
//! [`Predictor`] reloads the persisted model and fitted preprocessor (two
//! independent artifacts, never re-fit), transforms the row and returns
//! the predicted freight cost.

use crate::error::PipelineError;
use crate::model::LinearModel;
use crate::preprocessing::{FittedTablePreprocessor, FittedTransformer, TablePreprocessorParams};
use crate::serialization::load_object;
use crate::table::{RawTable, RowBuilder};
use log::{debug, info};
use std::path::PathBuf;

/// Artifact locations for the predictor.
#[derive(Clone, Debug)]
pub struct PredictorConfig {
    /// Where the trained model artifact lives.
    pub model_path: PathBuf,
    /// Where the fitted preprocessor artifact lives.
    pub preprocessor_path: PathBuf,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("artifacts").join("model.bin"),
            preprocessor_path: PathBuf::from("artifacts").join("preprocessor.bin"),
        }
    }
}

/// One shipment's worth of feature values.
#[derive(Clone, Debug)]
pub struct ShipmentRecord {
    pub country: String,
    pub fulfill_via: String,
    pub vendor_inco_term: String,
    pub shipment_mode: String,
    pub sub_classification: String,
    pub vendor: String,
    pub first_line_designation: String,
    pub pack_price: f64,
    pub year: String,
    pub weight_kilograms: f64,
}

impl ShipmentRecord {
    /// Shape the record into a one-row table.
    ///
    /// Column names are the schema's verbatim header strings, spaces and
    /// parentheses included, so the fitted preprocessor routes them
    /// exactly as it did at fit time.
    pub fn to_table(&self) -> RawTable {
        RowBuilder::new()
            .categorical("Country", self.country.as_str())
            .categorical("Fulfill Via", self.fulfill_via.as_str())
            .categorical("Vendor INCO Term", self.vendor_inco_term.as_str())
            .categorical("Shipment Mode", self.shipment_mode.as_str())
            .categorical("Sub Classification", self.sub_classification.as_str())
            .categorical("Vendor", self.vendor.as_str())
            .categorical("First Line Designation", self.first_line_designation.as_str())
            .numeric("Pack Price", self.pack_price)
            .categorical("Year", self.year.as_str())
            .numeric("Weight (Kilograms)", self.weight_kilograms)
            .build()
    }
}

/// Serves single-row predictions from persisted artifacts.
#[derive(Clone, Debug, Default)]
pub struct Predictor {
    config: PredictorConfig,
}

impl Predictor {
    pub fn new(config: PredictorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PredictorConfig {
        &self.config
    }

    /// Predict the freight cost for one record.
    ///
    /// Loads the model and the fitted preprocessor from their artifact
    /// paths, applies the preprocessor's transform (never fit) to the
    /// one-row table and runs the model on the result.
    pub fn predict(&self, record: &ShipmentRecord) -> Result<f64, PipelineError> {
        let model = LinearModel::load_from_file(&self.config.model_path)?;
        let params: TablePreprocessorParams = load_object(&self.config.preprocessor_path)?;
        let preprocessor = FittedTablePreprocessor::from_params(params).map_err(|source| {
            PipelineError::Preprocessing {
                op: "restore preprocessor",
                source,
            }
        })?;
        debug!(
            "loaded model ({}) and preprocessor ({})",
            self.config.model_path.display(),
            self.config.preprocessor_path.display()
        );

        let table = record.to_table();
        let features =
            preprocessor
                .transform(&table)
                .map_err(|source| PipelineError::Preprocessing {
                    op: "transform record",
                    source,
                })?;
        let predictions = model.predict_batch(&features)?;
        let predicted = predictions[0];
        info!("predicted freight cost: {:.2}", predicted);
        Ok(predicted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessing::{TablePreprocessor, Transformer};
    use crate::schema::Schema;
    use crate::serialization::save_object;
    use crate::table::TableBuilder;

    fn sample_record() -> ShipmentRecord {
        ShipmentRecord {
            country: "Vietnam".to_string(),
            fulfill_via: "Direct Drop".to_string(),
            vendor_inco_term: "EXW".to_string(),
            shipment_mode: "Air".to_string(),
            sub_classification: "HIV test".to_string(),
            vendor: "SCMS from RDC".to_string(),
            first_line_designation: "Yes".to_string(),
            pack_price: 3.2,
            year: "2013".to_string(),
            weight_kilograms: 471.0,
        }
    }

    #[test]
    fn test_to_table_matches_schema_names_exactly() {
        let table = sample_record().to_table();
        assert_eq!(table.n_rows(), 1);

        let schema = Schema::freight();
        for def in schema.columns() {
            assert!(
                table.column(&def.name).is_some(),
                "missing column {:?}",
                def.name
            );
        }
        // The target column is not part of an inference record.
        assert!(table.column(schema.target()).is_none());
        assert_eq!(table.columns().len(), schema.columns().len());
    }

    fn cat(values: &[&str]) -> Vec<Option<String>> {
        values.iter().map(|v| Some((*v).to_string())).collect()
    }

    /// Fit a preprocessor on a tiny train table and persist both artifacts.
    fn write_artifacts(tag: &str) -> PredictorConfig {
        let filler = cat(&["x", "y"]);
        let train = TableBuilder::new()
            .numeric("Pack Price", vec![Some(1.0), Some(3.0)])
            .numeric("Weight (Kilograms)", vec![Some(10.0), Some(30.0)])
            .categorical("Country", cat(&["US", "FR"]))
            .categorical("Fulfill Via", filler.clone())
            .categorical("Vendor INCO Term", filler.clone())
            .categorical("Vendor", filler.clone())
            .categorical("Shipment Mode", filler.clone())
            .categorical("Sub Classification", filler.clone())
            .categorical("First Line Designation", filler.clone())
            .categorical("Year", filler)
            .build()
            .unwrap();

        let fitted = TablePreprocessor::for_schema(Schema::freight())
            .fit(&train)
            .unwrap();

        let dir = std::env::temp_dir();
        let config = PredictorConfig {
            model_path: dir.join(format!("freightcast_test_{}_model.bin", tag)),
            preprocessor_path: dir.join(format!("freightcast_test_{}_pre.bin", tag)),
        };
        save_object(&config.preprocessor_path, &fitted.extract_params()).unwrap();

        // A bias-only model keeps the expected prediction independent of
        // the encoded feature values.
        let model = LinearModel::new(vec![0.0; fitted.n_features_out()], 42.5);
        model.save_to_file(&config.model_path).unwrap();

        config
    }

    #[test]
    fn test_predict_end_to_end() {
        let config = write_artifacts("predict");
        let predictor = Predictor::new(config.clone());

        let predicted = predictor.predict(&sample_record()).unwrap();
        assert!((predicted - 42.5).abs() < 1e-12);

        std::fs::remove_file(config.model_path).ok();
        std::fs::remove_file(config.preprocessor_path).ok();
    }

    #[test]
    fn test_predict_with_unseen_categories_does_not_fail() {
        let config = write_artifacts("unseen");
        let predictor = Predictor::new(config.clone());

        // Nothing in this record ever appeared in the fit table.
        let record = sample_record();
        let predicted = predictor.predict(&record).unwrap();
        assert!((predicted - 42.5).abs() < 1e-12);

        std::fs::remove_file(config.model_path).ok();
        std::fs::remove_file(config.preprocessor_path).ok();
    }

    #[test]
    fn test_predict_missing_model_artifact() {
        let dir = std::env::temp_dir();
        let config = PredictorConfig {
            model_path: dir.join("freightcast_test_absent_model.bin"),
            preprocessor_path: dir.join("freightcast_test_absent_pre.bin"),
        };
        std::fs::remove_file(&config.model_path).ok();

        let predictor = Predictor::new(config.clone());
        match predictor.predict(&sample_record()) {
            Err(PipelineError::Artifact { op: "read", path, .. }) => {
                assert_eq!(path, config.model_path);
            }
            other => panic!("expected artifact error, got {:?}", other),
        }
    }

    #[test]
    fn test_default_config_points_at_artifacts() {
        let config = PredictorConfig::default();
        assert_eq!(
            config.model_path,
            PathBuf::from("artifacts").join("model.bin")
        );
        assert_eq!(
            config.preprocessor_path,
            PathBuf::from("artifacts").join("preprocessor.bin")
        );
    }
}
