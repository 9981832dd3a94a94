//! Column-level operations: dropping sparse columns and rewriting names.

use crate::error::{BroomError, Result};
use crate::table::Table;

use super::text::{standardize_text, strip_accents};

/// Drop every column whose non-null count is below the minimum implied by `threshold`.
///
/// The minimum is `threshold * rows` truncated to an integer. With a positive
/// threshold a non-empty column also needs at least one populated cell, so a
/// fully null column never survives on a short table where the product
/// truncates to zero.
pub fn remove_sparse_columns(table: &Table, threshold: f64) -> Result<Table> {
    if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
        return Err(BroomError::input_type(
            "remove_sparse_columns",
            format!("threshold must be between 0 and 1, got {}", threshold),
        ));
    }

    let rows = table.row_count();
    let mut minimum = (threshold * rows as f64) as usize;
    if threshold > 0.0 && rows > 0 {
        minimum = minimum.max(1);
    }

    let keep: Vec<usize> = (0..table.column_count())
        .filter(|&i| table.non_null_count(i) >= minimum)
        .collect();

    Ok(table.select_columns(&keep))
}

/// Lowercase every column name and replace spaces with underscores.
pub fn standardize_column_names(table: &Table) -> Table {
    rename_columns(table, standardize_text)
}

/// Strip accents from every column name. Case and whitespace are untouched.
pub fn normalize_column_names(table: &Table) -> Table {
    rename_columns(table, strip_accents)
}

fn rename_columns(table: &Table, rename: impl Fn(&str) -> String) -> Table {
    Table {
        columns: table.columns.iter().map(|c| rename(c.as_str())).collect(),
        rows: table.rows.clone(),
    }
}
