// src/clean/schema.rs
//! Column names the pipeline reads, and the contract check run before it.

use crate::error::{CleanError, Result};
use crate::table::Table;
use tracing::warn;

pub const CUSTOMER: &str = "customer";
pub const STATE: &str = "state";
pub const GENDER: &str = "gender";
pub const EDUCATION: &str = "education";
pub const CUSTOMER_LIFETIME_VALUE: &str = "customer_lifetime_value";
pub const VEHICLE_CLASS: &str = "vehicle_class";
pub const NUMBER_OF_OPEN_COMPLAINTS: &str = "number_of_open_complaints";
pub const MONTHLY_PREMIUM_AUTO: &str = "monthly_premium_auto";
pub const POLICY_TYPE: &str = "policy_type";
pub const TOTAL_CLAIM_AMOUNT: &str = "total_claim_amount";

/// A row is active only when all of these are present.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    CUSTOMER,
    CUSTOMER_LIFETIME_VALUE,
    MONTHLY_PREMIUM_AUTO,
    NUMBER_OF_OPEN_COMPLAINTS,
    POLICY_TYPE,
    TOTAL_CLAIM_AMOUNT,
];

/// Every column any stage reads, by its normalized name.
pub const PIPELINE_COLUMNS: [&str; 10] = [
    CUSTOMER,
    STATE,
    GENDER,
    EDUCATION,
    CUSTOMER_LIFETIME_VALUE,
    VEHICLE_CLASS,
    NUMBER_OF_OPEN_COMPLAINTS,
    MONTHLY_PREMIUM_AUTO,
    POLICY_TYPE,
    TOTAL_CLAIM_AMOUNT,
];

/// Fail with the first absent pipeline column, in `PIPELINE_COLUMNS` order.
/// Expects names already normalized.
pub fn validate_schema(table: &Table) -> Result<()> {
    let missing: Vec<&str> = PIPELINE_COLUMNS
        .iter()
        .copied()
        .filter(|name| !table.has_column(name))
        .collect();

    match missing.first() {
        None => Ok(()),
        Some(first) => {
            warn!(?missing, "table lacks columns the pipeline reads");
            Err(CleanError::missing_column(first))
        }
    }
}
