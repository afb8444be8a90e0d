//! # freightcast
//!
//! A supervised-learning pipeline for tabular freight-cost data, with a
//! strict separation between fitting and inference.
//!
//! ## Core Design Principles
//!
//! - **Fitted Type Safety**: every transformer comes as an unfitted type
//!   holding hyperparameters and a fitted type holding learned statistics;
//!   transforming with an unfit transformer is not expressible.
//! - **Typed Boundary**: tables are validated against a fixed
//!   [`Schema`](schema::Schema) once, at the loading boundary; everything
//!   past it works on typed columns and dense matrices.
//! - **Persistable Artifacts**: fitted preprocessors and models reduce to
//!   plain-data parameter structs that round-trip through bincode
//!   artifacts on disk.
//!
//! ## Quick Start
//!
//! ```ignore
//! use freightcast::transformation::{DataTransformation, TransformationConfig};
//! use freightcast::inference::{Predictor, PredictorConfig, ShipmentRecord};
//!
//! // Fit on train data, transform both splits, persist the preprocessor.
//! let driver = DataTransformation::new(TransformationConfig::default());
//! let (train_matrix, test_matrix, preprocessor_path) =
//!     driver.run("data/train.csv", "data/test.csv")?;
//!
//! // ... train and persist a model on `train_matrix` ...
//!
//! // Later, in another process: serve one prediction.
//! let predictor = Predictor::new(PredictorConfig::default());
//! let cost = predictor.predict(&record)?;
//! ```
//!
//! ## Module Structure
//!
//! - `schema`: the fixed, typed column schema
//! - `table`: raw record tables, CSV ingestion, boundary validation
//! - `preprocessing`: imputation, scaling, encoding and the
//!   column-routed table preprocessor
//! - `model`: the linear inference model
//! - `transformation`: the train/test fit-transform-assemble driver
//! - `inference`: single-record prediction from persisted artifacts
//! - `serialization`: parameter bytes and artifact I/O
//! - `error`: the uniform driver error type

/// The uniform driver error type.
pub mod error;

/// Single-record prediction from persisted artifacts.
pub mod inference;

/// Linear inference model.
pub mod model;

/// Data preprocessing transformers.
pub mod preprocessing;

/// The fixed, typed column schema.
pub mod schema;

/// Parameter serialization and artifact persistence.
pub mod serialization;

/// Raw record tables and CSV ingestion.
pub mod table;

/// The train/test fit-transform-assemble driver.
pub mod transformation;

pub use error::PipelineError;
pub use inference::{Predictor, PredictorConfig, ShipmentRecord};
pub use model::{LinearModel, LinearModelParams};
pub use preprocessing::{
    FittedTablePreprocessor, FittedTransformer, TablePreprocessor, Transformer,
};
pub use schema::{ColumnDef, ColumnKind, Schema};
pub use table::{RawTable, RowBuilder, TableBuilder};
pub use transformation::{DataTransformation, TransformationConfig};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LinearModel;
    use crate::transformation::TransformationConfig;

    #[test]
    fn test_full_cycle_from_csv_to_prediction() {
        let dir = std::env::temp_dir();
        let train_path = dir.join("freightcast_cycle_train.csv");
        let test_path = dir.join("freightcast_cycle_test.csv");
        let header = "Pack Price,Weight (Kilograms),Country,Fulfill Via,Vendor INCO Term,\
                      Vendor,Shipment Mode,Sub Classification,First Line Designation,Year,\
                      Freight Cost (USD)";
        std::fs::write(
            &train_path,
            format!(
                "{}\n2.5,120,Nigeria,Direct Drop,EXW,SCMS,Air,HIV test,Yes,2008,480\n\
                 4.0,,Nigeria,Direct Drop,EXW,SCMS,Ocean,HIV test,Yes,2009,150\n\
                 1.5,60,Zambia,From RDC,DDP,Orgenics,Air,Pediatric,No,2008,300\n",
                header
            ),
        )
        .unwrap();
        std::fs::write(
            &test_path,
            format!(
                "{}\n3.0,90,Zambia,Direct Drop,EXW,SCMS,Air,HIV test,Yes,2009,410\n",
                header
            ),
        )
        .unwrap();

        let preprocessor_path = dir.join("freightcast_cycle_pre.bin");
        let model_path = dir.join("freightcast_cycle_model.bin");

        let driver = DataTransformation::new(TransformationConfig {
            preprocessor_path: preprocessor_path.clone(),
        });
        let (train_matrix, test_matrix, persisted) =
            driver.run(&train_path, &test_path).unwrap();
        assert_eq!(persisted, preprocessor_path);
        assert_eq!(train_matrix.nrows(), 3);
        assert_eq!(test_matrix.nrows(), 1);
        assert_eq!(train_matrix.ncols(), test_matrix.ncols());

        // Stand in for the external trainer with a bias-only model over
        // the assembled feature width.
        let n_features = train_matrix.ncols() - 1;
        LinearModel::new(vec![0.0; n_features], 275.0)
            .save_to_file(&model_path)
            .unwrap();

        let predictor = Predictor::new(PredictorConfig {
            model_path: model_path.clone(),
            preprocessor_path: preprocessor_path.clone(),
        });
        let record = ShipmentRecord {
            country: "Zimbabwe".to_string(), // unseen at fit time
            fulfill_via: "Direct Drop".to_string(),
            vendor_inco_term: "EXW".to_string(),
            shipment_mode: "Air".to_string(),
            sub_classification: "HIV test".to_string(),
            vendor: "SCMS".to_string(),
            first_line_designation: "Yes".to_string(),
            pack_price: 2.0,
            year: "2009".to_string(),
            weight_kilograms: 80.0,
        };
        let predicted = predictor.predict(&record).unwrap();
        assert!((predicted - 275.0).abs() < 1e-12);

        std::fs::remove_file(train_path).ok();
        std::fs::remove_file(test_path).ok();
        std::fs::remove_file(preprocessor_path).ok();
        std::fs::remove_file(model_path).ok();
    }
}
