// src/io/parquet.rs
use crate::table::Table;
use anyhow::{ensure, Context, Result};
use arrow::{compute::concat_batches, record_batch::RecordBatch};
use parquet::{
    arrow::{arrow_reader::ParquetRecordBatchReaderBuilder, ArrowWriter},
    basic::{BrotliLevel, Compression},
    file::properties::WriterProperties,
};
use std::{fs, fs::File, path::Path};
use tracing::{debug, instrument};

/// Write `table` to a Brotli-compressed Parquet file. Returns the file size.
#[instrument(level = "info", skip(table, path), fields(path = %path.as_ref().display(), rows = table.num_rows()))]
pub fn write_parquet<P: AsRef<Path>>(table: &Table, path: P) -> Result<u64> {
    let path = path.as_ref();
    let file =
        File::create(path).with_context(|| format!("creating file {}", path.display()))?;

    let props = WriterProperties::builder()
        .set_compression(Compression::BROTLI(BrotliLevel::try_new(5)?))
        .build();

    let mut writer = ArrowWriter::try_new(file, table.schema(), Some(props))
        .context("creating parquet writer")?;
    writer.write(table.batch()).context("writing batch to parquet")?;
    writer.close().context("closing parquet writer")?;

    let metadata = fs::metadata(path).context("getting file metadata")?;
    debug!(bytes = metadata.len(), "wrote parquet");
    Ok(metadata.len())
}

/// Load every row group of a Parquet file into one table.
#[instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn read_parquet<P: AsRef<Path>>(path: P, batch_size: usize) -> Result<Table> {
    let path = path.as_ref();
    ensure!(batch_size > 0, "parquet batch size must be at least 1");
    let file =
        File::open(path).with_context(|| format!("Failed to open parquet file: {:?}", path))?;

    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .with_context(|| format!("reading parquet metadata of {:?}", path))?
        .with_batch_size(batch_size);
    let schema = builder.schema().clone();
    let batches = builder
        .build()
        .context("creating parquet reader")?
        .collect::<Result<Vec<RecordBatch>, _>>()
        .with_context(|| format!("decoding {:?}", path))?;

    let batch = concat_batches(&schema, &batches).context("concatenating parquet batches")?;
    Table::new(batch).with_context(|| format!("invalid table in {:?}", path))
}
