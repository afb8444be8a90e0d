//! Raw record tables.
//!
//! A [`RawTable`] holds labeled columns of optional cells: numeric columns
//! are `Option<f64>` (empty cell = missing), categorical columns are
//! `Option<String>`. Tables enter the pipeline either from a CSV file,
//! validated against the [`Schema`](crate::schema::Schema) at the loading
//! boundary, or from the in-memory builders. Undeclared CSV columns are
//! tolerated and dropped; a declared column that is absent is an error.

use crate::error::PipelineError;
use crate::schema::{ColumnKind, Schema};
use std::path::Path;

/// Cell storage for one column.
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Categorical(Vec<Option<String>>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Categorical(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named column of cells.
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Numeric(values),
        }
    }

    pub fn categorical(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Categorical(values),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// An in-memory table of labeled columns sharing one row count.
#[derive(Clone, Debug, PartialEq)]
pub struct RawTable {
    columns: Vec<Column>,
    n_rows: usize,
}

impl RawTable {
    /// Build a table from columns, checking that all lengths agree.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self, PipelineError> {
        let n_rows = columns.first().map_or(0, Column::len);
        for column in &columns {
            if column.len() != n_rows {
                return Err(PipelineError::ShapeMismatch {
                    op: "build table",
                    expected: n_rows,
                    got: column.len(),
                });
            }
        }
        Ok(Self { columns, n_rows })
    }

    /// Read a table from a CSV file, projecting out the schema's columns.
    ///
    /// Every declared feature column must be present in the header; the
    /// target column is picked up when present (train/test files carry it,
    /// inference input does not). Any other CSV column is dropped. Empty
    /// cells become missing values; a non-empty cell that fails to parse
    /// as the declared type is an error.
    pub fn from_csv<P: AsRef<Path>>(path: P, schema: &Schema) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let csv_err = |source| PipelineError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .from_path(path)
            .map_err(|e| csv_err(e))?;
        let headers = reader.headers().map_err(|e| csv_err(e))?.clone();

        struct Slot {
            name: String,
            kind: ColumnKind,
            index: usize,
        }

        let mut slots = Vec::with_capacity(schema.columns().len() + 1);
        for def in schema.columns() {
            let index = headers
                .iter()
                .position(|h| h == def.name)
                .ok_or_else(|| PipelineError::MissingColumn {
                    column: def.name.clone(),
                })?;
            slots.push(Slot {
                name: def.name.clone(),
                kind: def.kind,
                index,
            });
        }
        if let Some(index) = headers.iter().position(|h| h == schema.target()) {
            slots.push(Slot {
                name: schema.target().to_string(),
                kind: ColumnKind::Numeric,
                index,
            });
        }

        let mut cells: Vec<ColumnData> = slots
            .iter()
            .map(|s| match s.kind {
                ColumnKind::Numeric => ColumnData::Numeric(Vec::new()),
                ColumnKind::Categorical => ColumnData::Categorical(Vec::new()),
            })
            .collect();

        for (row, result) in reader.records().enumerate() {
            let record = result.map_err(|e| csv_err(e))?;
            for (slot, data) in slots.iter().zip(cells.iter_mut()) {
                let cell = record.get(slot.index).unwrap_or("");
                match data {
                    ColumnData::Numeric(values) => {
                        let trimmed = cell.trim();
                        if trimmed.is_empty() {
                            values.push(None);
                        } else {
                            let parsed = trimmed.parse::<f64>().map_err(|_| {
                                PipelineError::InvalidValue {
                                    column: slot.name.clone(),
                                    row,
                                    value: cell.to_string(),
                                }
                            })?;
                            values.push(Some(parsed));
                        }
                    }
                    ColumnData::Categorical(values) => {
                        if cell.is_empty() {
                            values.push(None);
                        } else {
                            values.push(Some(cell.to_string()));
                        }
                    }
                }
            }
        }

        let columns = slots
            .into_iter()
            .zip(cells)
            .map(|(slot, data)| Column {
                name: slot.name,
                data,
            })
            .collect();
        Self::from_columns(columns)
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    /// Look up a column by its exact name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Separate the target column from the feature columns.
    ///
    /// A pure projection: no row is dropped or reordered. The target must
    /// be a numeric column with a value in every row.
    pub fn split_target(&self, target: &str) -> Result<(RawTable, Vec<f64>), PipelineError> {
        let column = self
            .column(target)
            .ok_or_else(|| PipelineError::MissingColumn {
                column: target.to_string(),
            })?;
        let values = match column.data() {
            ColumnData::Numeric(cells) => cells
                .iter()
                .enumerate()
                .map(|(row, cell)| {
                    cell.ok_or_else(|| PipelineError::MissingValue {
                        column: target.to_string(),
                        row,
                    })
                })
                .collect::<Result<Vec<f64>, PipelineError>>()?,
            ColumnData::Categorical(_) => {
                return Err(PipelineError::InvalidValue {
                    column: target.to_string(),
                    row: 0,
                    value: "<categorical column>".to_string(),
                })
            }
        };
        let features = RawTable {
            columns: self
                .columns
                .iter()
                .filter(|c| c.name != target)
                .cloned()
                .collect(),
            n_rows: self.n_rows,
        };
        Ok((features, values))
    }
}

/// Builder for in-memory multi-row tables.
#[derive(Default)]
pub struct TableBuilder {
    columns: Vec<Column>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn numeric(mut self, name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        self.columns.push(Column::numeric(name, values));
        self
    }

    pub fn categorical(mut self, name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        self.columns.push(Column::categorical(name, values));
        self
    }

    pub fn build(self) -> Result<RawTable, PipelineError> {
        RawTable::from_columns(self.columns)
    }
}

/// Builder for a one-row table, used to shape a single inference record.
///
/// Every column holds exactly one cell, so construction cannot fail.
#[derive(Default)]
pub struct RowBuilder {
    columns: Vec<Column>,
}

impl RowBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn numeric(mut self, name: impl Into<String>, value: f64) -> Self {
        self.columns.push(Column::numeric(name, vec![Some(value)]));
        self
    }

    pub fn categorical(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.columns
            .push(Column::categorical(name, vec![Some(value.into())]));
        self
    }

    pub fn build(self) -> RawTable {
        let n_rows = if self.columns.is_empty() { 0 } else { 1 };
        RawTable {
            columns: self.columns,
            n_rows,
        }
    }
}
