// src/io/mod.rs
//! Loading raw tables and persisting cleaned ones. The pipeline itself never
//! touches the filesystem.

pub mod csv;
pub mod parquet;

pub use self::csv::{read_csv, write_csv};
pub use self::parquet::{read_parquet, write_parquet};

use crate::table::Table;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableFormat {
    Csv,
    Parquet,
}

impl TableFormat {
    /// `.parquet` (any case) is Parquet; anything else is CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("parquet") => TableFormat::Parquet,
            _ => TableFormat::Csv,
        }
    }
}

pub fn read_table(path: &Path, batch_size: usize) -> Result<Table> {
    match TableFormat::from_path(path) {
        TableFormat::Csv => read_csv(path, batch_size),
        TableFormat::Parquet => read_parquet(path, batch_size),
    }
}

pub fn write_table(table: &Table, path: &Path, format: TableFormat) -> Result<()> {
    match format {
        TableFormat::Csv => write_csv(table, path),
        TableFormat::Parquet => write_parquet(table, path).map(|_| ()),
    }
}
