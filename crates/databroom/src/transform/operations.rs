//! The closed registry of cleaning operations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BroomError, Result};
use crate::table::Table;

use super::params::{Kwargs, ParamDefault, ParamSpec, Params};
use super::{columns, rows, values};

const THRESHOLD: &[ParamSpec] = &[ParamSpec::new("threshold", ParamDefault::Float(0.9))];
const NO_PARAMS: &[ParamSpec] = &[];
const COLUMNS: &[ParamSpec] = &[ParamSpec::new("columns", ParamDefault::Null)];
const PROMOTE: &[ParamSpec] = &[
    ParamSpec::new("row_index", ParamDefault::Int(0)),
    ParamSpec::new("drop_promoted_row", ParamDefault::Bool(true)),
];

/// A registered table operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleaningOperation {
    /// Drop columns with too few populated cells.
    RemoveSparseColumns,
    /// Drop rows where every cell is null.
    RemoveEmptyRows,
    /// Lowercase column names and replace spaces with underscores.
    StandardizeColumnNames,
    /// Strip accents from column names.
    NormalizeColumnNames,
    /// Strip accents from text cells.
    NormalizeValues,
    /// Strip accents, then lowercase and underscore text cells.
    StandardizeValues,
    /// Turn a data row into the column names.
    PromoteHeaders,
}

impl CleaningOperation {
    /// Every registered operation, in menu order.
    pub const ALL: [CleaningOperation; 7] = [
        CleaningOperation::RemoveSparseColumns,
        CleaningOperation::RemoveEmptyRows,
        CleaningOperation::StandardizeColumnNames,
        CleaningOperation::NormalizeColumnNames,
        CleaningOperation::NormalizeValues,
        CleaningOperation::StandardizeValues,
        CleaningOperation::PromoteHeaders,
    ];

    /// The canonical name used in history records and generated code.
    pub fn name(self) -> &'static str {
        match self {
            CleaningOperation::RemoveSparseColumns => "remove_sparse_columns",
            CleaningOperation::RemoveEmptyRows => "remove_empty_rows",
            CleaningOperation::StandardizeColumnNames => "standardize_column_names",
            CleaningOperation::NormalizeColumnNames => "normalize_column_names",
            CleaningOperation::NormalizeValues => "normalize_values",
            CleaningOperation::StandardizeValues => "standardize_values",
            CleaningOperation::PromoteHeaders => "promote_headers",
        }
    }

    /// Look up an operation by canonical name or legacy alias.
    pub fn from_name(name: &str) -> Option<Self> {
        let op = match name.trim() {
            "remove_sparse_columns" | "remove_empty_cols" => CleaningOperation::RemoveSparseColumns,
            "remove_empty_rows" => CleaningOperation::RemoveEmptyRows,
            "standardize_column_names" | "standarize_column_names" => {
                CleaningOperation::StandardizeColumnNames
            }
            "normalize_column_names" => CleaningOperation::NormalizeColumnNames,
            "normalize_values" => CleaningOperation::NormalizeValues,
            "standardize_values" | "standarize_values" => CleaningOperation::StandardizeValues,
            "promote_headers" => CleaningOperation::PromoteHeaders,
            _ => return None,
        };
        Some(op)
    }

    /// Parameters in positional order, with their defaults.
    pub fn parameters(self) -> &'static [ParamSpec] {
        match self {
            CleaningOperation::RemoveSparseColumns => THRESHOLD,
            CleaningOperation::StandardizeValues => COLUMNS,
            CleaningOperation::PromoteHeaders => PROMOTE,
            CleaningOperation::RemoveEmptyRows
            | CleaningOperation::StandardizeColumnNames
            | CleaningOperation::NormalizeColumnNames
            | CleaningOperation::NormalizeValues => NO_PARAMS,
        }
    }

    /// Get a human-readable description of the operation.
    pub fn description(self) -> &'static str {
        match self {
            CleaningOperation::RemoveSparseColumns => {
                "Remove columns with fewer non-null values than threshold * rows"
            }
            CleaningOperation::RemoveEmptyRows => "Remove rows where every value is missing",
            CleaningOperation::StandardizeColumnNames => {
                "Lowercase column names and replace spaces with underscores"
            }
            CleaningOperation::NormalizeColumnNames => "Remove accents from column names",
            CleaningOperation::NormalizeValues => "Remove accents from text values",
            CleaningOperation::StandardizeValues => {
                "Remove accents, lowercase and underscore text values (optionally in chosen columns)"
            }
            CleaningOperation::PromoteHeaders => "Use a data row as the column headers",
        }
    }

    /// Bind call arguments to this operation's parameters.
    pub fn bind(self, args: &[Value], kwargs: &Kwargs) -> Result<Params> {
        Params::bind(self.name(), self.parameters(), args, kwargs)
    }

    /// Apply the operation with already-bound parameters, producing a new table.
    pub fn apply(self, table: &Table, params: &Params) -> Result<Table> {
        match self {
            CleaningOperation::RemoveSparseColumns => {
                columns::remove_sparse_columns(table, params.f64("threshold")?)
            }
            CleaningOperation::RemoveEmptyRows => Ok(rows::remove_empty_rows(table)),
            CleaningOperation::StandardizeColumnNames => {
                Ok(columns::standardize_column_names(table))
            }
            CleaningOperation::NormalizeColumnNames => Ok(columns::normalize_column_names(table)),
            CleaningOperation::NormalizeValues => Ok(values::normalize_values(table)),
            CleaningOperation::StandardizeValues => {
                let selected = params.string_list("columns")?;
                Ok(values::standardize_values(table, selected.as_deref()))
            }
            CleaningOperation::PromoteHeaders => rows::promote_headers(
                table,
                params.usize("row_index")?,
                params.bool("drop_promoted_row")?,
            ),
        }
    }

    /// Bind and apply in one step.
    pub fn run(self, table: &Table, args: &[Value], kwargs: &Kwargs) -> Result<Table> {
        let params = self.bind(args, kwargs)?;
        self.apply(table, &params)
    }
}

impl fmt::Display for CleaningOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CleaningOperation {
    type Err = BroomError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s).ok_or_else(|| BroomError::UnknownOperation(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;
    use serde_json::json;

    #[test]
    fn test_names_round_trip() {
        for op in CleaningOperation::ALL {
            assert_eq!(CleaningOperation::from_name(op.name()), Some(op));
            assert_eq!(op.to_string().parse::<CleaningOperation>().unwrap(), op);
        }
    }

    #[test]
    fn test_legacy_aliases() {
        assert_eq!(
            CleaningOperation::from_name("remove_empty_cols"),
            Some(CleaningOperation::RemoveSparseColumns)
        );
        assert_eq!(
            CleaningOperation::from_name("standarize_values"),
            Some(CleaningOperation::StandardizeValues)
        );
    }

    #[test]
    fn test_unknown_name() {
        let err = "drop_everything".parse::<CleaningOperation>().unwrap_err();
        assert!(matches!(err, BroomError::UnknownOperation(name) if name == "drop_everything"));
    }

    #[test]
    fn test_run_with_keyword() {
        let table = Table::from_columns(vec![
            ("a", vec![Cell::Int(1), Cell::Int(2)]),
            ("b", vec![Cell::Int(1), Cell::Null]),
        ]);
        let kwargs: Kwargs = [("threshold".to_string(), json!(1.0))].into_iter().collect();
        let result = CleaningOperation::RemoveSparseColumns
            .run(&table, &[], &kwargs)
            .unwrap();
        assert_eq!(result.columns, vec!["a"]);
    }

    #[test]
    fn test_run_rejects_wrong_type() {
        let table = Table::default();
        let err = CleaningOperation::RemoveSparseColumns
            .run(&table, &[json!("high")], &Kwargs::new())
            .unwrap_err();
        assert!(matches!(err, BroomError::InputType { .. }));
    }

    #[test]
    fn test_every_operation_handles_empty_table() {
        let table = Table::default();
        for op in CleaningOperation::ALL {
            let result = op.run(&table, &[], &Kwargs::new()).unwrap();
            assert_eq!(result.row_count(), 0, "{} changed row count", op);
        }
    }
}
