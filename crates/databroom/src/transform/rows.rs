//! Row-level operations.

use crate::error::{BroomError, Result};
use crate::table::{Cell, Table};

/// Drop rows where every cell is null.
pub fn remove_empty_rows(table: &Table) -> Table {
    Table {
        columns: table.columns.clone(),
        rows: table
            .rows
            .iter()
            .filter(|row| row.iter().any(|cell| !cell.is_null()))
            .cloned()
            .collect(),
    }
}

/// Use the values of row `row_index` as column names, optionally removing that row.
///
/// A table without rows is returned unchanged. Null header cells become
/// `column_<n>` with `n` the 1-based column position. Other cells are named
/// the way pandas prints them, so whole floats keep their `.0`.
pub fn promote_headers(table: &Table, row_index: usize, drop_promoted_row: bool) -> Result<Table> {
    if table.is_empty() {
        return Ok(table.clone());
    }

    let header = table.rows.get(row_index).ok_or_else(|| {
        BroomError::input_type(
            "promote_headers",
            format!(
                "row index {} is out of range for a table with {} rows",
                row_index,
                table.row_count()
            ),
        )
    })?;

    let columns = header
        .iter()
        .enumerate()
        .map(|(i, cell)| match cell {
            _ if cell.is_null() => format!("column_{}", i + 1),
            Cell::Float(x) if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e16 => {
                format!("{:.1}", x)
            }
            Cell::Bool(true) => "True".to_string(),
            Cell::Bool(false) => "False".to_string(),
            other => other.to_string(),
        })
        .collect();

    let rows = table
        .rows
        .iter()
        .enumerate()
        .filter(|(i, _)| !drop_promoted_row || *i != row_index)
        .map(|(_, row)| row.clone())
        .collect();

    Ok(Table { columns, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_empty_rows() {
        let table = Table::from_columns(vec![
            ("a", vec![Cell::Int(1), Cell::Null, Cell::Null]),
            ("b", vec![Cell::Null, Cell::Null, Cell::from("x")]),
        ]);
        let cleaned = remove_empty_rows(&table);
        assert_eq!(cleaned.row_count(), 2);
        assert_eq!(cleaned.get(1, 1), Some(&Cell::from("x")));
    }

    #[test]
    fn test_remove_empty_rows_on_empty_table() {
        let table = Table::default();
        assert_eq!(remove_empty_rows(&table), table);
    }

    #[test]
    fn test_promote_first_row() {
        let table = Table::from_columns(vec![
            ("column_1", vec![Cell::from("id"), Cell::Int(1)]),
            ("column_2", vec![Cell::from("name"), Cell::from("Ana")]),
        ]);
        let promoted = promote_headers(&table, 0, true).unwrap();
        assert_eq!(promoted.columns, vec!["id", "name"]);
        assert_eq!(promoted.row_count(), 1);
    }

    #[test]
    fn test_promote_keeps_row_when_asked() {
        let table = Table::from_columns(vec![("c", vec![Cell::Int(1), Cell::Int(2)])]);
        let promoted = promote_headers(&table, 1, false).unwrap();
        assert_eq!(promoted.columns, vec!["2"]);
        assert_eq!(promoted.row_count(), 2);
    }

    #[test]
    fn test_promote_numeric_and_bool_headers() {
        let table = Table::from_columns(vec![
            ("a", vec![Cell::Float(1.0)]),
            ("b", vec![Cell::Float(2.5)]),
            ("c", vec![Cell::Int(3)]),
            ("d", vec![Cell::Bool(true)]),
        ]);
        let promoted = promote_headers(&table, 0, true).unwrap();
        assert_eq!(promoted.columns, vec!["1.0", "2.5", "3", "True"]);
    }

    #[test]
    fn test_promote_null_header_cell() {
        let table = Table::from_columns(vec![
            ("a", vec![Cell::from("x")]),
            ("b", vec![Cell::Null]),
        ]);
        let promoted = promote_headers(&table, 0, true).unwrap();
        assert_eq!(promoted.columns, vec!["x", "column_2"]);
        assert!(promoted.is_empty());
    }

    #[test]
    fn test_promote_out_of_range() {
        let table = Table::from_columns(vec![("a", vec![Cell::Int(1)])]);
        assert!(promote_headers(&table, 3, true).is_err());
    }

    #[test]
    fn test_promote_on_empty_table_is_noop() {
        let table = Table::new(vec!["a".to_string()], Vec::new());
        assert_eq!(promote_headers(&table, 0, true).unwrap(), table);
    }
}
