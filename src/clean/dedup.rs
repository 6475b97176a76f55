// src/clean/dedup.rs
use crate::error::Result;
use crate::table::Table;
use arrow::{
    array::BooleanArray,
    row::{RowConverter, SortField},
};
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Keep the first occurrence of every distinct row, in order.
/// Rows compare across all columns; missing equals missing.
#[instrument(level = "debug", skip(table), fields(rows = table.num_rows()))]
pub fn remove_duplicate_rows(table: &Table) -> Result<Table> {
    if table.num_rows() < 2 || table.num_columns() == 0 {
        return Ok(table.clone());
    }

    let fields = table
        .schema()
        .fields()
        .iter()
        .map(|f| SortField::new(f.data_type().clone()))
        .collect();
    let converter = RowConverter::new(fields)?;
    let rows = converter.convert_columns(table.batch().columns())?;

    let mut seen = HashSet::with_capacity(rows.num_rows());
    let keep: Vec<bool> = rows.iter().map(|row| seen.insert(row)).collect();
    let out = table.filter(&BooleanArray::from(keep))?;

    debug!(dropped = table.num_rows() - out.num_rows(), "removed duplicate rows");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{str_values, strings};
    use arrow::array::{ArrayRef, Float64Array, Int64Array};
    use std::sync::Arc;

    fn table() -> Table {
        Table::from_columns([
            ("customer", strings(&[Some("A"), Some("B"), Some("A"), Some("A"), None, None])),
            (
                "amount",
                Arc::new(Int64Array::from(vec![1, 2, 1, 3, 4, 4])) as ArrayRef,
            ),
            (
                "value",
                Arc::new(Float64Array::from(vec![
                    Some(0.5),
                    None,
                    Some(0.5),
                    Some(0.5),
                    None,
                    None,
                ])) as ArrayRef,
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_keeps_first_occurrence_in_order() {
        let out = remove_duplicate_rows(&table()).unwrap();
        assert_eq!(out.num_rows(), 4);
        assert_eq!(
            str_values(&out, "customer"),
            vec![Some("A".into()), Some("B".into()), Some("A".into()), None]
        );
        let amounts = out.column("amount").unwrap();
        let expected: ArrayRef = Arc::new(Int64Array::from(vec![1, 2, 3, 4]));
        assert_eq!(amounts, &expected);
    }

    #[test]
    fn test_idempotent() {
        let once = remove_duplicate_rows(&table()).unwrap();
        let twice = remove_duplicate_rows(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_distinct_rows_untouched() {
        let table = Table::from_columns([("a", strings(&[Some("x"), Some("y")]))]).unwrap();
        assert_eq!(remove_duplicate_rows(&table).unwrap(), table);
    }
}
