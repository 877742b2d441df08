use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::error::ReconcileError;
use crate::model::{CellValue, EPSILON, NormalizedTable, ReconRecord, Status};

/// Reconciles two tables by the chosen key and value columns.
///
/// Each table is projected to (InvoiceID, Value) and the projections are
/// combined with a full outer join: every key present in either table
/// produces at least one record. Duplicate key values are not deduplicated,
/// so a key repeated on both sides multiplies rows like a cross product on
/// that key. The output is all-or-nothing; no partial sequence escapes on
/// failure.
pub fn reconcile(
    first: &NormalizedTable,
    first_key: &str,
    first_value: &str,
    second: &NormalizedTable,
    second_key: &str,
    second_value: &str,
) -> Result<Vec<ReconRecord>, ReconcileError> {
    let left = project(first, first_key, first_value)?;
    let right = project(second, second_key, second_value)?;

    let mut right_by_key: HashMap<&str, Vec<&CellValue>> = HashMap::new();
    for (key, value) in &right {
        right_by_key.entry(key).or_default().push(value);
    }
    let left_keys: HashSet<&str> = left.iter().map(|(key, _)| key.as_str()).collect();

    let mut records = Vec::with_capacity(left.len().max(right.len()));

    // Left rows first, expanded against every matching right row.
    for (key, value1) in &left {
        match right_by_key.get(key.as_str()) {
            Some(matches) => {
                for value2 in matches {
                    records.push(build_record(key, value1.clone(), (*value2).clone()));
                }
            }
            None => records.push(build_record(key, value1.clone(), CellValue::Missing)),
        }
    }

    // Then right rows whose key never appeared on the left.
    for (key, value2) in &right {
        if !left_keys.contains(key.as_str()) {
            records.push(build_record(key, CellValue::Missing, value2.clone()));
        }
    }

    debug!(record_count = records.len(), "reconciliation computed");
    Ok(records)
}

/// Projects a table down to its (key, value) columns, keeping row order and
/// duplicates intact.
fn project(
    table: &NormalizedTable,
    key_column: &str,
    value_column: &str,
) -> Result<Vec<(String, CellValue)>, ReconcileError> {
    let key_index = resolve_column(table, key_column)?;
    let value_index = resolve_column(table, value_column)?;

    Ok(table
        .rows
        .iter()
        .map(|row| (row[key_index].key_string(), row[value_index].clone()))
        .collect())
}

fn resolve_column(table: &NormalizedTable, column: &str) -> Result<usize, ReconcileError> {
    table
        .column_index(column)
        .ok_or_else(|| ReconcileError::ColumnNotFound {
            table: table.name.clone(),
            column: column.to_string(),
        })
}

fn build_record(key: &str, value1: CellValue, value2: CellValue) -> ReconRecord {
    let difference = match (value1.as_number(), value2.as_number()) {
        (Some(a), Some(b)) => Some(a - b),
        _ => None,
    };
    let status = match difference {
        Some(delta) if delta.abs() < EPSILON => Status::Match,
        Some(_) => Status::Mismatch,
        // A missing difference (one-sided key or non-numeric value cell)
        // classifies as Match; the exported status set is fixed, so no
        // separate unmatched state exists.
        None => Status::Match,
    };

    ReconRecord {
        invoice_id: key.to_string(),
        value1,
        value2,
        difference,
        status,
    }
}
