//! History records: what was run, with which arguments, and what it did to the table.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codegen::literal;
use crate::transform::Kwargs;

/// One logged invocation of an operation. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationRecord {
    /// Canonical operation name.
    pub function: String,
    /// Positional arguments after the table, exactly as passed.
    pub args: Vec<Value>,
    /// Keyword arguments, exactly as passed.
    pub kwargs: Kwargs,
    /// `(rows, columns)` before the operation.
    pub shape_before: (usize, usize),
    /// `(rows, columns)` after the operation.
    pub shape_after: (usize, usize),
    /// Percentage of null cells before the operation.
    pub percent_missing_before: f64,
    /// Percentage of null cells after the operation.
    pub percent_missing_after: f64,
    /// When the operation ran.
    pub timestamp: DateTime<Utc>,
}

impl OperationRecord {
    /// The replayable part of this record.
    pub fn step(&self) -> PipelineStep {
        PipelineStep {
            function: self.function.clone(),
            args: self.args.clone(),
            kwargs: self.kwargs.clone(),
        }
    }

    /// Number of rows removed (negative if rows were added).
    pub fn rows_removed(&self) -> isize {
        self.shape_before.0 as isize - self.shape_after.0 as isize
    }

    /// Number of columns removed (negative if columns were added).
    pub fn columns_removed(&self) -> isize {
        self.shape_before.1 as isize - self.shape_after.1 as isize
    }
}

/// Renders the one-line text form:
/// `<timestamp> - <name> called. Parameters: <literal>. Shape from (r, c) to (r, c)`.
impl fmt::Display for OperationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} called. Parameters: {}. Shape from ({}, {}) to ({}, {})",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.function,
            literal::parameters_text(&self.args, &self.kwargs),
            self.shape_before.0,
            self.shape_before.1,
            self.shape_after.0,
            self.shape_after.1,
        )
    }
}

/// A portable pipeline entry: `{function, args, kwargs}`.
///
/// This is the element type of a saved pipeline file and the input to
/// [`CleaningPipeline::run_pipeline`](crate::CleaningPipeline::run_pipeline).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineStep {
    pub function: String,
    #[serde(default)]
    pub args: Vec<Value>,
    #[serde(default)]
    pub kwargs: Kwargs,
}

impl PipelineStep {
    /// Create a step with explicit arguments.
    pub fn new(function: impl Into<String>, args: Vec<Value>, kwargs: Kwargs) -> Self {
        Self {
            function: function.into(),
            args,
            kwargs,
        }
    }

    /// Create a step with no arguments.
    pub fn named(function: impl Into<String>) -> Self {
        Self::new(function, Vec::new(), Kwargs::new())
    }

    /// Add a keyword argument.
    pub fn with_kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.kwargs.insert(name.into(), value.into());
        self
    }
}

impl From<&OperationRecord> for PipelineStep {
    fn from(record: &OperationRecord) -> Self {
        record.step()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn record() -> OperationRecord {
        OperationRecord {
            function: "remove_sparse_columns".to_string(),
            args: Vec::new(),
            kwargs: [("threshold".to_string(), json!(0.9))].into_iter().collect(),
            shape_before: (4, 3),
            shape_after: (4, 2),
            percent_missing_before: 33.3,
            percent_missing_after: 0.0,
            timestamp: Utc.with_ymd_and_hms(2024, 1, 15, 14, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_log_line() {
        assert_eq!(
            record().to_string(),
            "2024-01-15 14:30:00 - remove_sparse_columns called. \
             Parameters: {'threshold': 0.9}. Shape from (4, 3) to (4, 2)"
        );
    }

    #[test]
    fn test_step_projection() {
        let step = record().step();
        assert_eq!(step, PipelineStep::named("remove_sparse_columns").with_kwarg("threshold", 0.9));
        assert_eq!(record().columns_removed(), 1);
        assert_eq!(record().rows_removed(), 0);
    }

    #[test]
    fn test_step_defaults_missing_fields() {
        let step: PipelineStep = serde_json::from_str(r#"{"function": "remove_empty_rows"}"#).unwrap();
        assert_eq!(step, PipelineStep::named("remove_empty_rows"));
    }
}
