//! Operation history: records, the recorder that produces them, and pipeline files.
//!
//! # Overview
//!
//! ```text
//! Broom::remove_sparse_columns(0.9)
//!   └─ CleaningPipeline::execute
//!        └─ Recorder::invoke ──► OperationRecord appended
//!
//! save_history(records) ──► pipeline.json ──► load_pipeline() ──► run_pipeline(steps)
//! ```

mod persistence;
mod record;
mod recorder;

pub use persistence::{load_pipeline, save_history, save_pipeline};
pub use record::{OperationRecord, PipelineStep};
pub use recorder::Recorder;
