// src/clean/categorical.rs
use crate::clean::schema::{CUSTOMER_LIFETIME_VALUE, EDUCATION, GENDER, STATE, VEHICLE_CLASS};
use crate::clean::utils::{map_present, render_strings, replace_exact, title_case};
use crate::error::Result;
use crate::table::Table;
use arrow::array::{Array, ArrayRef, AsArray};
use once_cell::sync::Lazy;
use std::{collections::HashMap, sync::Arc};
use tracing::{debug, instrument};

static GENDERS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("m", "M"),
        ("male", "M"),
        ("f", "F"),
        ("female", "F"),
        ("femal", "F"),
    ])
});

static STATES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([("az", "Arizona"), ("cali", "California"), ("wa", "Washington")])
});

static EDUCATIONS: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| HashMap::from([("Bachelors", "Bachelor")]));

static VEHICLE_CLASSES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Sports Car", "Luxury"),
        ("Luxury SUV", "Luxury"),
        ("Luxury Car", "Luxury"),
    ])
});

/// Standardize the vocabularies of `gender`, `state`, `education`,
/// `customer_lifetime_value` and `vehicle_class`. Other columns are untouched
/// and missing values stay missing.
#[instrument(level = "debug", skip(table), fields(rows = table.num_rows()))]
pub fn normalize_categorical_values(table: &Table) -> Result<Table> {
    let gender = normalize_gender(table.column(GENDER)?)?;
    let state = normalize_state(table.column(STATE)?)?;
    let education = normalize_education(table.column(EDUCATION)?);
    let lifetime_value = strip_percent(table.column(CUSTOMER_LIFETIME_VALUE)?)?;
    let vehicle_class = normalize_vehicle_class(table.column(VEHICLE_CLASS)?)?;

    table
        .with_column(GENDER, gender)?
        .with_column(STATE, state)?
        .with_column(EDUCATION, education)?
        .with_column(CUSTOMER_LIFETIME_VALUE, lifetime_value)?
        .with_column(VEHICLE_CLASS, vehicle_class)
}

fn normalize_gender(values: &ArrayRef) -> Result<ArrayRef> {
    let strings = render_strings(values)?;
    let out = map_present(&strings, |v| replace_exact(&GENDERS, v.trim().to_lowercase()));

    let unmapped = out
        .iter()
        .flatten()
        .filter(|v| *v != "M" && *v != "F")
        .count();
    if unmapped > 0 {
        debug!(unmapped, "gender values outside M/F");
    }
    Ok(Arc::new(out))
}

fn normalize_state(values: &ArrayRef) -> Result<ArrayRef> {
    let strings = render_strings(values)?;
    let out = map_present(&strings, |v| {
        title_case(&replace_exact(&STATES, v.trim().to_lowercase()))
    });
    Ok(Arc::new(out))
}

// Exact match only: no trimming or case folding here.
fn normalize_education(values: &ArrayRef) -> ArrayRef {
    match values.as_string_opt::<i32>() {
        Some(strings) => Arc::new(map_present(strings, |v| {
            replace_exact(&EDUCATIONS, v.to_string())
        })),
        None => values.clone(),
    }
}

// Stays text; `coerce_types` does the numeric conversion.
fn strip_percent(values: &ArrayRef) -> Result<ArrayRef> {
    let strings = render_strings(values)?;
    let out = map_present(&strings, |v| v.replace('%', "").trim().to_string());
    Ok(Arc::new(out))
}

fn normalize_vehicle_class(values: &ArrayRef) -> Result<ArrayRef> {
    let strings = render_strings(values)?;
    let out = map_present(&strings, |v| {
        replace_exact(&VEHICLE_CLASSES, v.trim().to_string())
    });
    debug!(
        luxury = out.iter().flatten().filter(|v| *v == "Luxury").count(),
        nulls = out.null_count(),
        "vehicle classes folded"
    );
    Ok(Arc::new(out))
}
