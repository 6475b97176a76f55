// src/table.rs
use crate::error::{CleanError, Result};
use arrow::{
    array::{ArrayRef, BooleanArray},
    compute::filter_record_batch,
    datatypes::{Field, FieldRef, Schema, SchemaRef},
    record_batch::{RecordBatch, RecordBatchOptions},
};
use std::{collections::HashSet, sync::Arc};

/// An in-memory dataset: uniquely named columns of equal length.
///
/// Backed by an Arrow `RecordBatch`, so every column is an Arrow array and a
/// missing cell is an Arrow null. Tables are values: the operations below
/// never touch `self` and hand back a new table instead.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    batch: RecordBatch,
}

impl Table {
    /// Wrap a batch, rejecting duplicate column names.
    pub fn new(batch: RecordBatch) -> Result<Self> {
        let schema = batch.schema();
        let mut seen = HashSet::with_capacity(schema.fields().len());
        for field in schema.fields() {
            if !seen.insert(field.name().as_str()) {
                return Err(CleanError::DuplicateColumn {
                    column: field.name().clone(),
                });
            }
        }
        Ok(Self { batch })
    }

    /// Build a table from `(name, values)` pairs. Every column is nullable.
    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, ArrayRef)>,
        S: Into<String>,
    {
        let (fields, arrays): (Vec<FieldRef>, Vec<ArrayRef>) = columns
            .into_iter()
            .map(|(name, array)| {
                let field = Arc::new(Field::new(name, array.data_type().clone(), true));
                (field, array)
            })
            .unzip();
        let rows = arrays.first().map_or(0, |a| a.len());
        let batch = Self::assemble(fields, arrays, rows)?;
        Self::new(batch)
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn num_columns(&self) -> usize {
        self.batch.num_columns()
    }

    pub fn schema(&self) -> SchemaRef {
        self.batch.schema()
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    pub fn into_batch(self) -> RecordBatch {
        self.batch
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.batch
            .schema_ref()
            .fields()
            .iter()
            .map(|f| f.name().as_str())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.batch.column_by_name(name).is_some()
    }

    /// Values of the column called `name`.
    pub fn column(&self, name: &str) -> Result<&ArrayRef> {
        self.batch
            .column_by_name(name)
            .ok_or_else(|| CleanError::missing_column(name))
    }

    /// A copy of this table with column `name` replaced by `values`.
    /// The column keeps its position; its type follows `values`.
    pub fn with_column(&self, name: &str, values: ArrayRef) -> Result<Self> {
        let idx = self
            .batch
            .schema_ref()
            .index_of(name)
            .map_err(|_| CleanError::missing_column(name))?;

        let mut fields: Vec<FieldRef> = self.batch.schema_ref().fields().iter().cloned().collect();
        fields[idx] = Arc::new(Field::new(name, values.data_type().clone(), true));
        let mut columns = self.batch.columns().to_vec();
        columns[idx] = values;

        let batch = Self::assemble(fields, columns, self.num_rows())?;
        Ok(Self { batch })
    }

    /// A copy of this table with every column replaced, names kept in order.
    pub fn with_columns(&self, columns: Vec<ArrayRef>) -> Result<Self> {
        let fields: Vec<FieldRef> = self
            .batch
            .schema_ref()
            .fields()
            .iter()
            .zip(&columns)
            .map(|(f, c)| Arc::new(Field::new(f.name(), c.data_type().clone(), true)))
            .collect();
        let batch = Self::assemble(fields, columns, self.num_rows())?;
        Ok(Self { batch })
    }

    /// A copy of this table with its columns renamed, in order.
    pub fn rename(&self, names: Vec<String>) -> Result<Self> {
        let fields: Vec<FieldRef> = self
            .batch
            .schema_ref()
            .fields()
            .iter()
            .zip(names)
            .map(|(f, name)| Arc::new(f.as_ref().clone().with_name(name)))
            .collect();
        let batch = Self::assemble(fields, self.batch.columns().to_vec(), self.num_rows())?;
        Self::new(batch)
    }

    /// Rows where `mask` is true, in their original order.
    pub fn filter(&self, mask: &BooleanArray) -> Result<Self> {
        let batch = filter_record_batch(&self.batch, mask)?;
        Ok(Self { batch })
    }

    fn assemble(fields: Vec<FieldRef>, columns: Vec<ArrayRef>, rows: usize) -> Result<RecordBatch> {
        let schema = Arc::new(Schema::new(fields));
        let options = RecordBatchOptions::new().with_row_count(Some(rows));
        RecordBatch::try_new_with_options(schema, columns, &options).map_err(Into::into)
    }
}

impl TryFrom<RecordBatch> for Table {
    type Error = CleanError;

    fn try_from(batch: RecordBatch) -> Result<Self> {
        Table::new(batch)
    }
}
