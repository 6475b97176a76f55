// src/io/csv.rs
use crate::table::Table;
use anyhow::{anyhow, ensure, Context, Result};
use arrow::{
    compute::concat_batches,
    csv::{reader::Format, ReaderBuilder, WriterBuilder},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use regex::Regex;
use std::{
    fs::File,
    io::{BufWriter, Seek, Write},
    path::Path,
    sync::Arc,
};
use tracing::{debug, instrument, warn};

/// Load a headered CSV with every column read as text.
///
/// Headers are kept verbatim; empty fields become missing values.
#[instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn read_csv<P: AsRef<Path>>(path: P, batch_size: usize) -> Result<Table> {
    let path = path.as_ref();
    ensure!(batch_size > 0, "CSV batch size must be at least 1");
    let mut file =
        File::open(path).with_context(|| format!("Failed to open CSV file: {:?}", path))?;

    // Header row only; column types are not inferred.
    let (header, _) = Format::default()
        .with_header(true)
        .infer_schema(&mut file, Some(0))
        .with_context(|| format!("Failed to read CSV header: {:?}", path))?;
    if header.fields().is_empty() {
        return Err(anyhow!("CSV file has no header row: {:?}", path));
    }
    let fields: Vec<Field> = header
        .fields()
        .iter()
        .map(|f| Field::new(f.name(), DataType::Utf8, true))
        .collect();
    let schema = Arc::new(Schema::new(fields));

    file.rewind().context("rewinding CSV file")?;
    let reader = ReaderBuilder::new(schema.clone())
        .with_header(true)
        .with_batch_size(batch_size)
        .with_quote(b'"')
        .with_delimiter(b',')
        .with_null_regex(Regex::new("^$")?)
        .build(file)
        .context("creating CSV reader")?;

    let batches = reader
        .collect::<Result<Vec<RecordBatch>, _>>()
        .map_err(|e| {
            warn!("CSV parsing failed: {}", e);
            e
        })
        .with_context(|| format!("CSV parse error in {:?}", path))?;
    let batch = concat_batches(&schema, &batches).context("concatenating CSV batches")?;
    debug!(rows = batch.num_rows(), columns = batch.num_columns(), "read CSV");

    Table::new(batch).with_context(|| format!("invalid table in {:?}", path))
}

/// Write `table` as a headered CSV, replacing any existing file.
#[instrument(level = "info", skip(table, path), fields(path = %path.as_ref().display(), rows = table.num_rows()))]
pub fn write_csv<P: AsRef<Path>>(table: &Table, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("creating file {}", path.display()))?;

    let mut writer = WriterBuilder::new()
        .with_header(true)
        .build(BufWriter::new(file));
    writer
        .write(table.batch())
        .with_context(|| format!("writing CSV {}", path.display()))?;
    writer
        .into_inner()
        .flush()
        .with_context(|| format!("flushing CSV {}", path.display()))?;
    Ok(())
}
