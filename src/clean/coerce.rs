// src/clean/coerce.rs
use crate::clean::schema::{CUSTOMER_LIFETIME_VALUE, NUMBER_OF_OPEN_COMPLAINTS};
use crate::clean::utils::{parse_f64, render_strings};
use crate::error::{CleanError, Result};
use crate::table::Table;
use arrow::array::{Array, Float64Array, Float64Builder, StringArray};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument};

/// What to do with a `/`-delimited complaint count that has no second token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedFieldPolicy {
    /// Abort with `CleanError::MalformedDelimitedField`.
    #[default]
    Fail,
    /// Parse the whole value instead, which leaves it missing.
    Coerce,
}

/// The second `/`-separated token of `value` (`"1/5/00"` gives `"5"`), or the
/// whole of `value` when it has no `/`.
///
/// `None` means a `/` is present but the second token is empty (`"3/"`).
pub fn middle_token(value: &str) -> Option<&str> {
    match value.split('/').nth(1) {
        None => Some(value),
        Some("") => None,
        Some(token) => Some(token),
    }
}

/// Parse `customer_lifetime_value` and `number_of_open_complaints` into
/// floats, failing on malformed delimited complaint counts.
pub fn coerce_types(table: &Table) -> Result<Table> {
    coerce_types_with(table, MalformedFieldPolicy::default())
}

/// Like [`coerce_types`], with an explicit policy for malformed complaint
/// counts. Text that does not parse becomes a missing value.
#[instrument(level = "debug", skip(table), fields(rows = table.num_rows()))]
pub fn coerce_types_with(table: &Table, policy: MalformedFieldPolicy) -> Result<Table> {
    let lifetime_value = render_strings(table.column(CUSTOMER_LIFETIME_VALUE)?)?;
    let complaints = render_strings(table.column(NUMBER_OF_OPEN_COMPLAINTS)?)?;

    let (lifetime_value, bad_values) = parse_column(&lifetime_value, |_, v| Ok(v))?;
    let (complaints, bad_counts) = parse_column(&complaints, |row, v| {
        match (middle_token(v), policy) {
            (Some(token), _) => Ok(token),
            (None, MalformedFieldPolicy::Coerce) => Ok(v),
            (None, MalformedFieldPolicy::Fail) => Err(CleanError::MalformedDelimitedField {
                column: NUMBER_OF_OPEN_COMPLAINTS.to_string(),
                row,
                value: v.to_string(),
            }),
        }
    })?;
    debug!(bad_values, bad_counts, "unparseable values set to missing");

    table
        .with_column(CUSTOMER_LIFETIME_VALUE, Arc::new(lifetime_value))?
        .with_column(NUMBER_OF_OPEN_COMPLAINTS, Arc::new(complaints))
}

/// Parse every present value after `extract` picks the candidate text.
/// Returns the floats and how many present values failed to parse.
fn parse_column<'a, F>(values: &'a StringArray, mut extract: F) -> Result<(Float64Array, usize)>
where
    F: FnMut(usize, &'a str) -> Result<&'a str>,
{
    let mut builder = Float64Builder::with_capacity(values.len());
    let mut unparseable = 0;
    for (row, opt) in values.iter().enumerate() {
        let Some(raw) = opt else {
            builder.append_null();
            continue;
        };
        let parsed = parse_f64(extract(row, raw)?).filter(|v| !v.is_nan());
        if parsed.is_none() {
            unparseable += 1;
        }
        builder.append_option(parsed);
    }
    Ok((builder.finish(), unparseable))
}
