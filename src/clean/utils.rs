// src/clean/utils.rs
use crate::error::Result;
use arrow::{
    array::{Array, ArrayRef, AsArray, StringArray},
    compute::cast,
    datatypes::DataType,
};
use std::collections::HashMap;

/// Render any column as strings. Nulls stay null.
pub fn render_strings(values: &ArrayRef) -> Result<StringArray> {
    if let Some(strings) = values.as_string_opt::<i32>() {
        return Ok(strings.clone());
    }
    let rendered = cast(values, &DataType::Utf8)?;
    Ok(rendered.as_string::<i32>().clone())
}

/// Apply `f` to every present value.
pub fn map_present<F>(values: &StringArray, mut f: F) -> StringArray
where
    F: FnMut(&str) -> String,
{
    values.iter().map(|opt| opt.map(&mut f)).collect()
}

/// Exact-match lookup; unmatched values come back as they went in.
pub fn replace_exact(table: &HashMap<&'static str, &'static str>, value: String) -> String {
    match table.get(value.as_str()) {
        Some(mapped) => (*mapped).to_string(),
        None => value,
    }
}

/// Upper-case the first character of each whitespace-separated word and
/// lower-case the rest. Whitespace is kept as is.
///
/// A leading character whose upper case expands (`ß` -> `SS`) keeps only the
/// first upper-case character, so title-casing lower-cased output is stable.
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut word_start = true;
    for c in value.chars() {
        if c.is_whitespace() {
            word_start = true;
            out.push(c);
        } else if word_start {
            word_start = false;
            let mut upper = c.to_uppercase();
            out.extend(upper.next());
            out.extend(upper.flat_map(char::to_lowercase));
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}

/// Parse trimmed text as a float. `NaN` parses like any other float.
pub fn parse_f64(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok()
}

/// Count of nulls across `values`.
pub fn missing_count(values: &[&ArrayRef]) -> usize {
    values.iter().map(|v| v.null_count()).sum()
}
