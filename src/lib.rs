pub mod clean;
pub mod config;
pub mod error;
pub mod io;
pub mod table;

pub use clean::{
    clean, clean_with, coerce_types, filter_active_rows, normalize_categorical_values,
    normalize_column_names, remove_duplicate_rows, CleanOptions, CleanSummary,
};
pub use error::{CleanError, Result};
pub use table::Table;
