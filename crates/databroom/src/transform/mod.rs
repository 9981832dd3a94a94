//! The operation library: pure table-to-table cleaning functions.
//!
//! Every operation takes a [`Table`](crate::Table) plus named parameters and
//! returns a new table. Nothing here knows about history; recording happens in
//! [`crate::history::Recorder`].

mod columns;
mod operations;
mod params;
mod rows;
pub mod text;
mod values;

pub use columns::{normalize_column_names, remove_sparse_columns, standardize_column_names};
pub use operations::CleaningOperation;
pub use params::{Kwargs, ParamDefault, ParamSpec, Params};
pub use rows::{promote_headers, remove_empty_rows};
pub use values::{normalize_values, standardize_values};
