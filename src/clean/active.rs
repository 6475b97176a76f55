// src/clean/active.rs
use crate::clean::schema::REQUIRED_COLUMNS;
use crate::clean::utils::parse_f64;
use crate::error::Result;
use crate::table::Table;
use arrow::{
    array::{Array, ArrayRef, AsArray, BooleanArray, Float64Builder, Int64Builder},
    compute::{and, cast, is_not_null},
    datatypes::{DataType, Float64Type},
};
use std::sync::Arc;
use tracing::{debug, instrument};

// 2^63; every f64 below it and at or above -2^63 fits in an i64.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Keep rows with every required column present, then tighten column types:
/// text columns that are entirely numeric become floats, and fully populated
/// numeric columns holding only whole numbers become `Int64`.
#[instrument(level = "debug", skip(table), fields(rows = table.num_rows()))]
pub fn filter_active_rows(table: &Table) -> Result<Table> {
    let mut keep = BooleanArray::from(vec![true; table.num_rows()]);
    for name in REQUIRED_COLUMNS {
        keep = and(&keep, &is_not_null(table.column(name)?)?)?;
    }
    let active = table.filter(&keep)?;
    debug!(
        dropped = table.num_rows() - active.num_rows(),
        "dropped rows missing required values"
    );

    let mut converted = 0;
    let mut narrowed = 0;
    let mut columns = Vec::with_capacity(active.num_columns());
    for column in active.batch().columns() {
        let column = match try_numeric(column) {
            Some(numeric) => {
                converted += 1;
                numeric
            }
            None => column.clone(),
        };
        let column = match narrow_to_integer(&column)? {
            Some(integer) => {
                narrowed += 1;
                integer
            }
            None => column,
        };
        columns.push(column);
    }
    debug!(converted, narrowed, "tightened column types");

    active.with_columns(columns)
}

/// Trial conversion of a text column to `Float64`.
///
/// `None` when the column is not text or any present value fails to parse;
/// the caller keeps the column as it was.
fn try_numeric(values: &ArrayRef) -> Option<ArrayRef> {
    let strings = values.as_string_opt::<i32>()?;
    let mut builder = Float64Builder::with_capacity(strings.len());
    for value in strings.iter() {
        match value {
            None => builder.append_null(),
            Some(v) => {
                let parsed = parse_f64(v)?;
                builder.append_option((!parsed.is_nan()).then_some(parsed));
            }
        }
    }
    Some(Arc::new(builder.finish()))
}

/// Lossless conversion of a fully populated numeric column to `Int64`.
///
/// `None` when the column is already `Int64`, is not numeric, has a missing
/// value, or holds a value with no exact `i64` equivalent.
fn narrow_to_integer(values: &ArrayRef) -> Result<Option<ArrayRef>> {
    let ty = values.data_type();
    if values.null_count() > 0 || !ty.is_numeric() || ty == &DataType::Int64 {
        return Ok(None);
    }

    if ty.is_integer() {
        // out-of-range values cast to null
        let integers = cast(values, &DataType::Int64)?;
        return Ok((integers.null_count() == 0).then_some(integers));
    }

    let floats = cast(values, &DataType::Float64)?;
    let floats = floats.as_primitive::<Float64Type>();
    let mut builder = Int64Builder::with_capacity(floats.len());
    for &v in floats.values().iter() {
        if !is_exact_integer(v) {
            return Ok(None);
        }
        builder.append_value(v as i64);
    }
    Ok(Some(Arc::new(builder.finish())))
}

fn is_exact_integer(v: f64) -> bool {
    v.is_finite() && v.fract() == 0.0 && (-I64_BOUND..I64_BOUND).contains(&v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clean::schema::*;
    use crate::error::CleanError;
    use crate::test_support::{f64_values, init_test_logging, str_values, strings};
    use arrow::array::{Float64Array, Int32Array, UInt64Array};

    fn floats(values: &[Option<f64>]) -> ArrayRef {
        Arc::new(Float64Array::from(values.to_vec()))
    }

    fn active_table(customers: &[Option<&str>], lifetime: &[Option<f64>]) -> Table {
        let n = customers.len();
        Table::from_columns([
            (CUSTOMER, strings(customers)),
            (CUSTOMER_LIFETIME_VALUE, floats(lifetime)),
            (MONTHLY_PREMIUM_AUTO, strings(&vec![Some("50"); n])),
            (NUMBER_OF_OPEN_COMPLAINTS, floats(&vec![Some(0.0); n])),
            (POLICY_TYPE, strings(&vec![Some("Personal"); n])),
            (TOTAL_CLAIM_AMOUNT, strings(&vec![Some("200.5"); n])),
            ("income", strings(&vec![None::<&str>; n])),
        ])
        .unwrap()
    }

    #[test]
    fn test_drops_incomplete_rows() {
        init_test_logging();
        let table = active_table(
            &[Some("A1"), None, Some("C3"), Some("D4")],
            &[Some(1.5), Some(2.0), None, Some(4.0)],
        );
        let out = filter_active_rows(&table).unwrap();

        assert_eq!(out.num_rows(), 2);
        assert!(out.num_rows() <= table.num_rows());
        assert_eq!(str_values(&out, CUSTOMER), vec![Some("A1".into()), Some("D4".into())]);
        for name in REQUIRED_COLUMNS {
            assert_eq!(out.column(name).unwrap().null_count(), 0, "{name}");
        }
    }

    #[test]
    fn test_narrows_whole_number_columns() {
        init_test_logging();
        let out = filter_active_rows(&active_table(
            &[Some("A1"), Some("B2")],
            &[Some(100.0), Some(697953.59)],
        ))
        .unwrap();

        // text stays text
        assert_eq!(out.column(CUSTOMER).unwrap().data_type(), &DataType::Utf8);
        // numeric text, whole numbers
        assert_eq!(out.column(MONTHLY_PREMIUM_AUTO).unwrap().data_type(), &DataType::Int64);
        assert_eq!(out.column(NUMBER_OF_OPEN_COMPLAINTS).unwrap().data_type(), &DataType::Int64);
        // fractional values are never truncated
        assert_eq!(out.column(CUSTOMER_LIFETIME_VALUE).unwrap().data_type(), &DataType::Float64);
        assert_eq!(out.column(TOTAL_CLAIM_AMOUNT).unwrap().data_type(), &DataType::Float64);
        assert_eq!(f64_values(&out, TOTAL_CLAIM_AMOUNT), vec![Some(200.5), Some(200.5)]);
        // all-missing text converts but cannot narrow
        assert_eq!(out.column("income").unwrap().data_type(), &DataType::Float64);
    }

    #[test]
    fn test_mixed_text_column_left_alone() {
        init_test_logging();
        let table = active_table(&[Some("1"), Some("2")], &[Some(1.0), Some(2.0)])
            .with_column(POLICY_TYPE, strings(&[Some("7"), Some("Corporate")]))
            .unwrap();
        let out = filter_active_rows(&table).unwrap();
        assert_eq!(out.column(POLICY_TYPE).unwrap(), table.column(POLICY_TYPE).unwrap());
        assert_eq!(out.column(CUSTOMER).unwrap().data_type(), &DataType::Int64);
    }

    #[test]
    fn test_narrow_to_integer() {
        let ints: ArrayRef = Arc::new(Int32Array::from(vec![1, -2]));
        let narrowed = narrow_to_integer(&ints).unwrap().unwrap();
        assert_eq!(narrowed.data_type(), &DataType::Int64);

        let huge: ArrayRef = Arc::new(UInt64Array::from(vec![u64::MAX]));
        assert!(narrow_to_integer(&huge).unwrap().is_none());

        assert!(narrow_to_integer(&floats(&[Some(1.0), None])).unwrap().is_none());
        assert!(narrow_to_integer(&floats(&[Some(f64::INFINITY)])).unwrap().is_none());
        assert!(narrow_to_integer(&floats(&[Some(1e19)])).unwrap().is_none());
        assert!(narrow_to_integer(&strings(&[Some("1")])).unwrap().is_none());
    }

    #[test]
    fn test_missing_required_column() {
        let table = Table::from_columns([(CUSTOMER, strings(&[Some("A1")]))]).unwrap();
        assert!(matches!(
            filter_active_rows(&table),
            Err(CleanError::MissingColumn { column }) if column == CUSTOMER_LIFETIME_VALUE
        ));
    }
}
