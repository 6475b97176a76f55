// src/clean/mod.rs
//! The cleaning pipeline: five stages, each a function from one table to the
//! next, run in a fixed order by [`clean`].

pub mod active;
pub mod categorical;
pub mod coerce;
pub mod columns;
pub mod dedup;
pub mod schema;
mod utils;

pub use active::filter_active_rows;
pub use categorical::normalize_categorical_values;
pub use coerce::{coerce_types, coerce_types_with, middle_token, MalformedFieldPolicy};
pub use columns::{normalize_column_name, normalize_column_names};
pub use dedup::remove_duplicate_rows;
pub use schema::{validate_schema, PIPELINE_COLUMNS, REQUIRED_COLUMNS};

use crate::error::Result;
use crate::table::Table;
use arrow::datatypes::DataType;
use schema::{CUSTOMER_LIFETIME_VALUE, NUMBER_OF_OPEN_COMPLAINTS};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanOptions {
    pub malformed_fields: MalformedFieldPolicy,
}

/// Row accounting for one run of the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanSummary {
    pub input_rows: usize,
    /// Values in the two coerced columns that did not parse and became missing.
    pub unparseable_values: usize,
    pub incomplete_rows_dropped: usize,
    pub duplicate_rows_dropped: usize,
    pub output_rows: usize,
    /// Columns holding `Int64` in the output.
    pub integer_columns: Vec<String>,
}

/// Run every stage with default options.
pub fn clean(table: &Table) -> Result<Table> {
    clean_with(table, &CleanOptions::default()).map(|(cleaned, _)| cleaned)
}

/// Normalize names, check the schema contract, then run the value stages in
/// order. Any error aborts the whole run.
#[instrument(level = "info", skip_all, fields(rows = table.num_rows(), columns = table.num_columns()))]
pub fn clean_with(table: &Table, options: &CleanOptions) -> Result<(Table, CleanSummary)> {
    let named = normalize_column_names(table)?;
    validate_schema(&named)?;

    let categorical = normalize_categorical_values(&named)?;
    let typed = coerce_types_with(&categorical, options.malformed_fields)?;
    let unparseable_values =
        coerced_missing(&typed)?.saturating_sub(coerced_missing(&categorical)?);

    let active = filter_active_rows(&typed)?;
    let deduped = remove_duplicate_rows(&active)?;

    let summary = CleanSummary {
        input_rows: table.num_rows(),
        unparseable_values,
        incomplete_rows_dropped: typed.num_rows() - active.num_rows(),
        duplicate_rows_dropped: active.num_rows() - deduped.num_rows(),
        output_rows: deduped.num_rows(),
        integer_columns: deduped
            .schema()
            .fields()
            .iter()
            .filter(|f| f.data_type() == &DataType::Int64)
            .map(|f| f.name().clone())
            .collect(),
    };
    info!(
        input = summary.input_rows,
        output = summary.output_rows,
        incomplete = summary.incomplete_rows_dropped,
        duplicates = summary.duplicate_rows_dropped,
        "cleaned table"
    );
    Ok((deduped, summary))
}

fn coerced_missing(table: &Table) -> Result<usize> {
    Ok(utils::missing_count(&[
        table.column(CUSTOMER_LIFETIME_VALUE)?,
        table.column(NUMBER_OF_OPEN_COMPLAINTS)?,
    ]))
}
