// src/clean/columns.rs
use crate::clean::schema::STATE;
use crate::error::Result;
use crate::table::Table;
use tracing::{debug, instrument};

/// Trim, lower-case and underscore a header; `st` becomes `state`.
pub fn normalize_column_name(name: &str) -> String {
    let name = name.trim().to_lowercase().replace(' ', "_");
    if name == "st" {
        STATE.to_string()
    } else {
        name
    }
}

/// Canonicalize every column name. Values are not inspected.
///
/// Fails with `DuplicateColumn` when two headers normalize to the same name.
#[instrument(level = "debug", skip(table), fields(columns = table.num_columns()))]
pub fn normalize_column_names(table: &Table) -> Result<Table> {
    let names: Vec<String> = table
        .column_names()
        .into_iter()
        .map(normalize_column_name)
        .collect();
    let renamed = table
        .column_names()
        .into_iter()
        .zip(&names)
        .filter(|&(old, new)| old != new.as_str())
        .count();
    debug!(renamed, "normalized column names");
    table.rename(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CleanError;
    use crate::test_support::strings;

    #[test]
    fn test_normalize_column_name() {
        assert_eq!(normalize_column_name(" Customer Lifetime Value "), "customer_lifetime_value");
        assert_eq!(normalize_column_name("ST"), "state");
        assert_eq!(normalize_column_name(" st"), "state");
        assert_eq!(normalize_column_name("state"), "state");
        assert_eq!(normalize_column_name("Gender"), "gender");
        assert_eq!(normalize_column_name("stage"), "stage");
    }

    #[test]
    fn test_names_are_canonical() {
        let table = Table::from_columns([
            ("Customer", strings(&[Some("A1")])),
            (" ST ", strings(&[Some("AZ")])),
            ("Number of Open Complaints", strings(&[Some("1/0/00")])),
        ])
        .unwrap();

        let out = normalize_column_names(&table).unwrap();
        assert_eq!(
            out.column_names(),
            vec!["customer", "state", "number_of_open_complaints"]
        );
        for name in out.column_names() {
            assert_eq!(name, name.to_lowercase());
            assert!(!name.contains(' '));
            assert_ne!(name, "st");
        }
        assert_eq!(out.batch().columns(), table.batch().columns());
    }

    #[test]
    fn test_collision_is_an_error() {
        let table = Table::from_columns([
            ("st", strings(&[Some("AZ")])),
            ("State", strings(&[Some("AZ")])),
        ])
        .unwrap();
        assert!(matches!(
            normalize_column_names(&table),
            Err(CleanError::DuplicateColumn { column }) if column == "state"
        ));
    }
}
