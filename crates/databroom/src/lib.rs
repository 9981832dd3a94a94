//! Databroom: table cleaning with a replayable history.
//!
//! Every cleaning operation is recorded with its parameters and its effect on
//! the table's shape. The history can be undone step by step, saved as a JSON
//! pipeline and replayed on new data, or translated into an equivalent Python
//! or R script.
//!
//! # Core Principles
//!
//! - **Non-destructive**: the loaded table is kept and never modified
//! - **Replayable**: current state is always the history applied to the original
//! - **Portable**: a history becomes a pipeline file or a standalone script
//!
//! # Example
//!
//! ```no_run
//! use databroom::{Broom, TargetLanguage};
//!
//! let mut broom = Broom::from_file("survey.csv").unwrap();
//! broom
//!     .remove_sparse_columns(0.9).unwrap()
//!     .normalize_column_names().unwrap()
//!     .standardize_column_names().unwrap();
//!
//! broom.save_pipeline("survey_pipeline.json").unwrap();
//! broom
//!     .code_generator(TargetLanguage::Python).unwrap()
//!     .export_code("clean_survey.py").unwrap();
//! ```

pub mod codegen;
pub mod error;
pub mod history;
pub mod input;
pub mod pipeline;
pub mod table;
pub mod transform;

mod output;

pub use codegen::{CodeGenerator, GeneratorConfig, HistoryEntry, TargetLanguage};
pub use error::{BroomError, Result};
pub use history::{OperationRecord, PipelineStep};
pub use input::{Parser, ParserConfig, SourceMetadata};
pub use output::write_table;
pub use pipeline::{Broom, CleaningPipeline};
pub use table::{Cell, Table};
pub use transform::{CleaningOperation, Kwargs};
