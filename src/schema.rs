//! Typed schema for the shipment record table.
//!
//! The schema is fixed configuration: an ordered set of named numeric and
//! categorical columns plus the target column. Column names are stored
//! verbatim, spaces and parentheses included, because they must match the
//! table headers byte-for-byte across fitting and inference.

use serde::{Deserialize, Serialize};

/// Kind of a declared column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    /// Floating-point feature; missing cells are imputed with the median.
    Numeric,
    /// String-valued feature; imputed with the most frequent category and
    /// one-hot encoded.
    Categorical,
}

/// A single declared feature column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    pub kind: ColumnKind,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Ordered feature columns plus the target column name.
///
/// Constant across fit and transform: the same schema instance that routed
/// columns during fitting travels inside the persisted preprocessor and
/// routes the one-row inference table later.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    columns: Vec<ColumnDef>,
    target: String,
}

impl Schema {
    pub fn new(columns: Vec<ColumnDef>, target: impl Into<String>) -> Self {
        Self {
            columns,
            target: target.into(),
        }
    }

    /// The fixed shipment-record schema.
    pub fn freight() -> Self {
        let columns = vec![
            ColumnDef::new("Pack Price", ColumnKind::Numeric),
            ColumnDef::new("Weight (Kilograms)", ColumnKind::Numeric),
            ColumnDef::new("Country", ColumnKind::Categorical),
            ColumnDef::new("Fulfill Via", ColumnKind::Categorical),
            ColumnDef::new("Vendor INCO Term", ColumnKind::Categorical),
            ColumnDef::new("Vendor", ColumnKind::Categorical),
            ColumnDef::new("Shipment Mode", ColumnKind::Categorical),
            ColumnDef::new("Sub Classification", ColumnKind::Categorical),
            ColumnDef::new("First Line Designation", ColumnKind::Categorical),
            ColumnDef::new("Year", ColumnKind::Categorical),
        ];
        Self::new(columns, "Freight Cost (USD)")
    }

    /// All declared feature columns, in schema order.
    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    /// The target column name.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Names of the numeric feature columns, in schema order.
    pub fn numeric_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.kind == ColumnKind::Numeric)
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Names of the categorical feature columns, in schema order.
    pub fn categorical_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.kind == ColumnKind::Categorical)
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Look up a declared feature column by its exact name.
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }
}
