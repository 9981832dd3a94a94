//! The in-memory table the cleaning operations work on.

use serde::{Deserialize, Serialize};

use super::cell::Cell;

/// Represents tabular data: named columns over row-major cells.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    /// Column names, in order. Duplicates are allowed.
    pub columns: Vec<String>,
    /// Row data (row-major order). Every row has one cell per column.
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Create a table, padding short rows with nulls and truncating long ones.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Cell::Null);
                row
            })
            .collect();

        Self { columns, rows }
    }

    /// Create a table from named columns of equal or unequal length.
    ///
    /// ```
    /// use databroom::{Cell, Table};
    ///
    /// let table = Table::from_columns(vec![
    ///     ("id", vec![Cell::Int(1), Cell::Int(2)]),
    ///     ("name", vec![Cell::from("Ana"), Cell::Null]),
    /// ]);
    /// assert_eq!(table.shape(), (2, 2));
    /// ```
    pub fn from_columns<S: Into<String>>(columns: Vec<(S, Vec<Cell>)>) -> Self {
        let row_count = columns.iter().map(|(_, cells)| cells.len()).max().unwrap_or(0);
        let mut names = Vec::with_capacity(columns.len());
        let mut rows = vec![Vec::with_capacity(columns.len()); row_count];

        for (name, cells) in columns {
            names.push(name.into());
            let mut cells = cells.into_iter();
            for row in rows.iter_mut() {
                row.push(cells.next().unwrap_or(Cell::Null));
            }
        }

        Self {
            columns: names,
            rows,
        }
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.row_count(), self.column_count())
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get all values for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Cell> {
        self.rows.iter().filter_map(move |row| row.get(index))
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Number of non-null cells in a column.
    pub fn non_null_count(&self, index: usize) -> usize {
        self.column_values(index).filter(|c| !c.is_null()).count()
    }

    /// Number of null cells across the whole table.
    pub fn null_count(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|row| row.iter())
            .filter(|c| c.is_null())
            .count()
    }

    /// Percentage (0-100) of cells that are null. A table without cells reports 0.
    pub fn percent_missing(&self) -> f64 {
        let total = self.row_count() * self.column_count();
        if total == 0 {
            return 0.0;
        }
        self.null_count() as f64 / total as f64 * 100.0
    }

    /// Keep only the columns at `indices`, in that order.
    pub fn select_columns(&self, indices: &[usize]) -> Table {
        let columns = indices
            .iter()
            .filter_map(|&i| self.columns.get(i).cloned())
            .collect();
        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().filter_map(|&i| row.get(i).cloned()).collect())
            .collect();

        Table { columns, rows }
    }

    /// Apply `f` to every cell of the columns selected by `include`.
    pub fn map_cells<F>(&self, include: impl Fn(usize) -> bool, f: F) -> Table
    where
        F: Fn(&Cell) -> Cell,
    {
        let selected: Vec<bool> = (0..self.column_count()).map(include).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .zip(&selected)
                    .map(|(cell, &hit)| if hit { f(cell) } else { cell.clone() })
                    .collect()
            })
            .collect();

        Table {
            columns: self.columns.clone(),
            rows,
        }
    }
}
