//! Freight-cost pipeline walkthrough.
//!
//! This example runs the complete workflow:
//! - write a small shipment dataset to CSV
//! - fit the preprocessor on the train split and transform both splits
//! - train a linear model on the assembled train matrix
//! - persist both artifacts, then serve a single-record prediction
//!
//! Run with: cargo run --example train_and_predict

use freightcast::inference::{Predictor, PredictorConfig, ShipmentRecord};
use freightcast::model::LinearModel;
use freightcast::transformation::{DataTransformation, TransformationConfig};
use ndarray::{s, Array1, Array2};
use std::error::Error;

const TRAIN_CSV: &str = "\
Pack Price,Weight (Kilograms),Country,Fulfill Via,Vendor INCO Term,Vendor,Shipment Mode,Sub Classification,First Line Designation,Year,Freight Cost (USD)
3.99,1426,Nigeria,Direct Drop,EXW,SCMS from RDC,Air,HIV test,Yes,2010,4521.5
1.6,192,Zambia,From RDC,DDP,Orgenics,Air,HIV test - Ancillary,Yes,2009,812.0
12.5,3000,Nigeria,Direct Drop,FCA,Aurobindo,Ocean,Adult,No,2011,295.0
0.89,79,Tanzania,From RDC,DDP,Orgenics,Air,Pediatric,Yes,2009,410.25
6.2,,Vietnam,Direct Drop,EXW,Hetero,Air,Adult,No,2012,1780.0
2.35,540,Zambia,From RDC,DDP,SCMS from RDC,Air Charter,HIV test,Yes,2010,1925.75
9.1,2150,Tanzania,Direct Drop,CIP,Aurobindo,Ocean,Adult,No,2011,388.0
4.4,860,Vietnam,Direct Drop,EXW,Hetero,Air,Pediatric,Yes,2012,2240.0
";

const TEST_CSV: &str = "\
Pack Price,Weight (Kilograms),Country,Fulfill Via,Vendor INCO Term,Vendor,Shipment Mode,Sub Classification,First Line Designation,Year,Freight Cost (USD)
5.0,1100,Nigeria,Direct Drop,EXW,SCMS from RDC,Air,Adult,Yes,2011,3105.0
1.2,150,Zambia,From RDC,DDP,Orgenics,Air,HIV test,Yes,2010,640.0
8.75,2600,Vietnam,Direct Drop,CIP,Aurobindo,Ocean,Adult,No,2012,350.0
";

/// Plain batch gradient descent on mean squared error.
fn train_linear(features: &Array2<f64>, target: &Array1<f64>) -> LinearModel {
    let n = features.nrows() as f64;
    let mut weights = Array1::<f64>::zeros(features.ncols());
    let mut bias = 0.0;
    let lr = 0.05;

    for _ in 0..4000 {
        let residual = features.dot(&weights) + bias - target;
        let grad_weights = features.t().dot(&residual) / n;
        let grad_bias = residual.sum() / n;
        weights = weights - grad_weights * lr;
        bias -= lr * grad_bias;
    }

    LinearModel::new(weights.to_vec(), bias)
}

fn mean_absolute_error(predictions: &Array1<f64>, target: &Array1<f64>) -> f64 {
    (predictions - target).mapv(f64::abs).mean().unwrap_or(0.0)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    println!("=== Freight Cost Pipeline ===\n");

    // 1. Write the dataset
    let dir = std::env::temp_dir().join("freightcast_demo");
    std::fs::create_dir_all(&dir)?;
    let train_path = dir.join("train.csv");
    let test_path = dir.join("test.csv");
    std::fs::write(&train_path, TRAIN_CSV)?;
    std::fs::write(&test_path, TEST_CSV)?;
    println!("Wrote train/test CSVs under {:?}", dir);

    // 2. Fit and transform
    let driver = DataTransformation::new(TransformationConfig {
        preprocessor_path: dir.join("preprocessor.bin"),
    });
    let (train_matrix, test_matrix, preprocessor_path) = driver.run(&train_path, &test_path)?;
    println!(
        "\nTransformed matrices: train {:?}, test {:?}",
        train_matrix.shape(),
        test_matrix.shape()
    );
    println!("Preprocessor persisted to {:?}", preprocessor_path);

    // 3. Train on the assembled train matrix (target is rightmost)
    let width = train_matrix.ncols() - 1;
    let x_train = train_matrix.slice(s![.., ..width]).to_owned();
    let y_train = train_matrix.column(width).to_owned();
    let model = train_linear(&x_train, &y_train);

    // 4. Evaluate on the test split
    let x_test = test_matrix.slice(s![.., ..width]).to_owned();
    let y_test = test_matrix.column(width).to_owned();
    let predictions = model.predict_batch(&x_test)?;
    println!(
        "\nTest MAE: {:.2} USD over {} shipments",
        mean_absolute_error(&predictions, &y_test),
        y_test.len()
    );

    // 5. Persist the model and serve a single prediction
    let model_path = dir.join("model.bin");
    model.save_to_file(&model_path)?;

    let predictor = Predictor::new(PredictorConfig {
        model_path,
        preprocessor_path,
    });
    let record = ShipmentRecord {
        country: "Nigeria".to_string(),
        fulfill_via: "Direct Drop".to_string(),
        vendor_inco_term: "EXW".to_string(),
        shipment_mode: "Air".to_string(),
        sub_classification: "HIV test".to_string(),
        vendor: "SCMS from RDC".to_string(),
        first_line_designation: "Yes".to_string(),
        pack_price: 3.5,
        year: "2011".to_string(),
        weight_kilograms: 1200.0,
    };
    let cost = predictor.predict(&record)?;
    println!("\nPredicted freight cost for the new shipment: {:.2} USD", cost);

    Ok(())
}
