//! Cell value rewriting. Only text cells are touched.

use crate::table::{Cell, Table};

use super::text::{standardize_text, strip_accents};

/// Strip accents from every text cell in the table.
pub fn normalize_values(table: &Table) -> Table {
    table.map_cells(|_| true, |cell| rewrite_text(cell, strip_accents))
}

/// Strip accents table-wide, then lowercase and underscore text cells.
///
/// When `columns` is given the second step only applies to those columns;
/// names that are not in the table are ignored.
pub fn standardize_values(table: &Table, columns: Option<&[String]>) -> Table {
    let normalized = normalize_values(table);
    let selected: Vec<bool> = normalized
        .columns
        .iter()
        .map(|name| columns.is_none_or(|wanted| wanted.iter().any(|w| w == name)))
        .collect();

    normalized.map_cells(
        |i| selected.get(i).copied().unwrap_or(false),
        |cell| rewrite_text(cell, standardize_text),
    )
}

fn rewrite_text(cell: &Cell, rewrite: fn(&str) -> String) -> Cell {
    match cell {
        Cell::Text(s) => Cell::Text(rewrite(s)),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_columns(vec![
            ("city", vec![Cell::from("São Paulo"), Cell::from("Bogotá")]),
            ("code", vec![Cell::from("Ñ Uno"), Cell::Int(2)]),
        ])
    }

    #[test]
    fn test_normalize_values() {
        let cleaned = normalize_values(&sample());
        assert_eq!(cleaned.get(0, 0), Some(&Cell::from("Sao Paulo")));
        assert_eq!(cleaned.get(0, 1), Some(&Cell::from("N Uno")));
        assert_eq!(cleaned.get(1, 1), Some(&Cell::Int(2)));
    }

    #[test]
    fn test_standardize_all_columns() {
        let cleaned = standardize_values(&sample(), None);
        assert_eq!(cleaned.get(0, 0), Some(&Cell::from("sao_paulo")));
        assert_eq!(cleaned.get(0, 1), Some(&Cell::from("n_uno")));
    }

    #[test]
    fn test_standardize_selected_columns_still_normalizes_all() {
        let columns = vec!["city".to_string(), "missing".to_string()];
        let cleaned = standardize_values(&sample(), Some(&columns));
        assert_eq!(cleaned.get(1, 0), Some(&Cell::from("bogota")));
        assert_eq!(cleaned.get(0, 1), Some(&Cell::from("N Uno")));
    }
}
