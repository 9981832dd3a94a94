//! Call interception: run an operation and log it.

use chrono::Utc;
use log::debug;
use serde_json::Value;

use crate::error::Result;
use crate::table::Table;
use crate::transform::{CleaningOperation, Kwargs};

use super::record::OperationRecord;

/// Appends an [`OperationRecord`] to a log for every successful call it makes.
///
/// The wrapped call's return value is passed through untouched. A failed call
/// propagates its error and leaves the log as it was.
pub struct Recorder<'a> {
    log: &'a mut Vec<OperationRecord>,
}

impl<'a> Recorder<'a> {
    /// Record into `log`.
    pub fn new(log: &'a mut Vec<OperationRecord>) -> Self {
        Self { log }
    }

    /// Run a registered operation on `table` and record it.
    pub fn invoke(
        &mut self,
        operation: CleaningOperation,
        table: &Table,
        args: &[Value],
        kwargs: &Kwargs,
    ) -> Result<Table> {
        self.record(operation.name(), table, args, kwargs, |t| {
            operation.run(t, args, kwargs)
        })
    }

    /// Run any table function under `function_name` and record it.
    pub fn record<F>(
        &mut self,
        function_name: &str,
        table: &Table,
        args: &[Value],
        kwargs: &Kwargs,
        call: F,
    ) -> Result<Table>
    where
        F: FnOnce(&Table) -> Result<Table>,
    {
        let shape_before = table.shape();
        let percent_missing_before = table.percent_missing();

        let result = call(table)?;

        let record = OperationRecord {
            function: function_name.to_string(),
            args: args.to_vec(),
            kwargs: kwargs.clone(),
            shape_before,
            shape_after: result.shape(),
            percent_missing_before,
            percent_missing_after: result.percent_missing(),
            timestamp: Utc::now(),
        };
        debug!("{}", record);
        self.log.push(record);

        Ok(result)
    }
}
