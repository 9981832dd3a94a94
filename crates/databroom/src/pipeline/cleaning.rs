//! The stateful pipeline: original table, current table, and the ordered log.

use log::{debug, info};
use serde_json::Value;

use crate::error::{BroomError, Result};
use crate::history::{OperationRecord, PipelineStep, Recorder};
use crate::table::Table;
use crate::transform::{CleaningOperation, Kwargs};

/// Owns the authoritative table state and the history that produced it.
///
/// `current` is always what replaying `history` against `original` yields.
/// Undo drops the last record and replays the rest from `original`; nothing is
/// ever reverse-applied, since dropped data cannot be recovered from `current`.
#[derive(Debug, Clone)]
pub struct CleaningPipeline {
    original: Table,
    current: Table,
    history: Vec<OperationRecord>,
}

impl CleaningPipeline {
    /// Start a pipeline over `table`. The original snapshot is never modified.
    pub fn new(table: Table) -> Self {
        Self {
            original: table.clone(),
            current: table,
            history: Vec::new(),
        }
    }

    /// The snapshot taken at construction.
    pub fn original(&self) -> &Table {
        &self.original
    }

    /// The current state of the table.
    pub fn current(&self) -> &Table {
        &self.current
    }

    /// A copy of the history; the pipeline's own log cannot be changed through it.
    pub fn history(&self) -> Vec<OperationRecord> {
        self.history.clone()
    }

    /// Number of operations currently applied.
    pub fn operation_count(&self) -> usize {
        self.history.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    /// Names of every registered operation.
    pub fn available_operations() -> Vec<&'static str> {
        CleaningOperation::ALL.iter().map(|op| op.name()).collect()
    }

    /// Run the named operation on the current table and record it.
    ///
    /// On any error the table and history are left exactly as they were.
    pub fn execute(&mut self, operation: &str, args: &[Value], kwargs: &Kwargs) -> Result<&Table> {
        let op = CleaningOperation::from_name(operation)
            .ok_or_else(|| BroomError::UnknownOperation(operation.to_string()))?;

        let result = Recorder::new(&mut self.history).invoke(op, &self.current, args, kwargs)?;
        self.current = result;

        Ok(&self.current)
    }

    /// Shorthand for [`execute`](Self::execute) with keyword arguments only.
    pub fn execute_kwargs(&mut self, operation: &str, kwargs: &Kwargs) -> Result<&Table> {
        self.execute(operation, &[], kwargs)
    }

    /// Drop the most recent record and rebuild `current` by replaying the rest.
    pub fn undo(&mut self) -> Result<&Table> {
        let Some(undone) = self.history.pop() else {
            return Err(BroomError::EmptyHistory("no operations to undo".to_string()));
        };

        match replay(&self.original, &self.history) {
            Ok(table) => {
                debug!("undid {}; {} step(s) remain", undone.function, self.history.len());
                self.current = table;
                Ok(&self.current)
            }
            Err(e) => {
                // Recorded steps replay deterministically, so this only trips on a
                // history that was never produced by this pipeline.
                self.history.push(undone);
                Err(e)
            }
        }
    }

    /// Alias for [`undo`](Self::undo).
    pub fn step_back(&mut self) -> Result<&Table> {
        self.undo()
    }

    /// Restore the original table and clear the history.
    pub fn reset(&mut self) {
        self.current = self.original.clone();
        self.history.clear();
        debug!("pipeline reset to original shape {:?}", self.original.shape());
    }

    /// Execute externally supplied steps in order.
    ///
    /// Stops at the first failing step and returns its error; steps applied
    /// before it stay applied.
    pub fn run_pipeline(&mut self, steps: &[PipelineStep]) -> Result<&Table> {
        for (index, step) in steps.iter().enumerate() {
            self.execute(&step.function, &step.args, &step.kwargs)
                .map_err(|e| {
                    info!("pipeline stopped at step {} ({}): {}", index + 1, step.function, e);
                    e
                })?;
        }
        info!("ran {} pipeline step(s)", steps.len());
        Ok(&self.current)
    }
}

/// Re-apply recorded operations to a fresh copy of `original`, without recording.
pub fn replay(original: &Table, history: &[OperationRecord]) -> Result<Table> {
    let mut table = original.clone();
    for record in history {
        let op = CleaningOperation::from_name(&record.function)
            .ok_or_else(|| BroomError::UnknownOperation(record.function.clone()))?;
        debug!("replaying {}", record.function);
        table = op.run(&table, &record.args, &record.kwargs)?;
    }
    Ok(table)
}
