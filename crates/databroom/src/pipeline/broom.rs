//! The fluent facade over a [`CleaningPipeline`].

use std::path::Path;

use log::info;
use serde_json::{json, Value};

use crate::codegen::{CodeGenerator, GeneratorConfig, TargetLanguage};
use crate::error::Result;
use crate::history::{self, OperationRecord, PipelineStep};
use crate::input::{Parser, ParserConfig, SourceMetadata};
use crate::output::write_table;
use crate::table::Table;
use crate::transform::Kwargs;

use super::cleaning::CleaningPipeline;

/// Chainable cleaning session over one table.
///
/// Every operation method records itself and returns `&mut Self`, so calls
/// chain with `?`:
///
/// ```no_run
/// # use databroom::Broom;
/// # fn main() -> databroom::Result<()> {
/// let mut broom = Broom::from_file("survey.csv")?;
/// broom
///     .remove_sparse_columns(0.9)?
///     .remove_empty_rows()?
///     .standardize_column_names()?;
/// println!("{:?}", broom.get_df().shape());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Broom {
    pipeline: CleaningPipeline,
    source: Option<SourceMetadata>,
}

impl Broom {
    /// Start a session over an in-memory table.
    pub fn new(table: Table) -> Self {
        Self {
            pipeline: CleaningPipeline::new(table),
            source: None,
        }
    }

    /// Load a CSV, TSV or JSON file with default parsing.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_file_with_config(path, ParserConfig::default())
    }

    /// Load a file with custom parser settings.
    pub fn from_file_with_config(path: impl AsRef<Path>, config: ParserConfig) -> Result<Self> {
        let (table, source) = Parser::with_config(config).parse_file(path)?;
        info!(
            "loaded {} ({} rows, {} columns)",
            source.file, source.row_count, source.column_count
        );
        Ok(Self {
            pipeline: CleaningPipeline::new(table),
            source: Some(source),
        })
    }

    /// Drop columns with fewer than `threshold * rows` populated cells.
    pub fn remove_sparse_columns(&mut self, threshold: f64) -> Result<&mut Self> {
        self.execute("remove_sparse_columns", &[], kwargs([("threshold", json!(threshold))]))
    }

    pub fn remove_empty_rows(&mut self) -> Result<&mut Self> {
        self.execute("remove_empty_rows", &[], Kwargs::new())
    }

    pub fn standardize_column_names(&mut self) -> Result<&mut Self> {
        self.execute("standardize_column_names", &[], Kwargs::new())
    }

    pub fn normalize_column_names(&mut self) -> Result<&mut Self> {
        self.execute("normalize_column_names", &[], Kwargs::new())
    }

    pub fn normalize_values(&mut self) -> Result<&mut Self> {
        self.execute("normalize_values", &[], Kwargs::new())
    }

    /// Standardize text values, in every column or only in `columns`.
    pub fn standardize_values(&mut self, columns: Option<&[&str]>) -> Result<&mut Self> {
        let kwargs = match columns {
            Some(columns) => kwargs([("columns", json!(columns))]),
            None => Kwargs::new(),
        };
        self.execute("standardize_values", &[], kwargs)
    }

    /// Use row `row_index` as the header.
    pub fn promote_headers(&mut self, row_index: usize, drop_promoted_row: bool) -> Result<&mut Self> {
        self.execute(
            "promote_headers",
            &[],
            kwargs([
                ("row_index", json!(row_index)),
                ("drop_promoted_row", json!(drop_promoted_row)),
            ]),
        )
    }

    /// Run any registered operation by name.
    pub fn execute(&mut self, operation: &str, args: &[Value], kwargs: Kwargs) -> Result<&mut Self> {
        self.pipeline.execute(operation, args, &kwargs)?;
        Ok(self)
    }

    /// Undo the last operation.
    pub fn step_back(&mut self) -> Result<&mut Self> {
        self.pipeline.undo()?;
        Ok(self)
    }

    pub fn can_step_back(&self) -> bool {
        self.pipeline.can_undo()
    }

    /// Return to the loaded table with an empty history.
    pub fn reset(&mut self) -> &mut Self {
        self.pipeline.reset();
        self
    }

    /// The current table.
    pub fn get_df(&self) -> &Table {
        self.pipeline.current()
    }

    /// A copy of the recorded history.
    pub fn get_history(&self) -> Vec<OperationRecord> {
        self.pipeline.history()
    }

    /// The history as one text line per operation.
    pub fn history_lines(&self) -> Vec<String> {
        self.pipeline.history().iter().map(ToString::to_string).collect()
    }

    /// Metadata of the loaded file, if the session started from one.
    pub fn source(&self) -> Option<&SourceMetadata> {
        self.source.as_ref()
    }

    /// Save the replayable history as a JSON pipeline file.
    pub fn save_pipeline(&self, path: impl AsRef<Path>) -> Result<()> {
        history::save_history(&self.pipeline.history(), path)
    }

    /// Apply steps in order, stopping at the first failure.
    pub fn run_pipeline(&mut self, steps: &[PipelineStep]) -> Result<&mut Self> {
        self.pipeline.run_pipeline(steps)?;
        Ok(self)
    }

    /// Load a JSON pipeline file and apply it.
    pub fn run_pipeline_file(&mut self, path: impl AsRef<Path>) -> Result<&mut Self> {
        let steps = history::load_pipeline(path)?;
        self.run_pipeline(&steps)
    }

    /// Write the current table as CSV, TSV or JSON.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        write_table(self.get_df(), path)
    }

    /// A generator loaded with this session's history and source details.
    pub fn code_generator(&self, language: TargetLanguage) -> Result<CodeGenerator> {
        let config = GeneratorConfig {
            source_file: self.source.as_ref().map(|s| s.file.clone()),
            output_file: None,
            source_hash: self.source.as_ref().map(|s| s.hash.clone()),
        };
        let mut generator = CodeGenerator::with_config(language, config);
        generator.load_history(self.pipeline.history())?;
        Ok(generator)
    }
}

impl From<Table> for Broom {
    fn from(table: Table) -> Self {
        Self::new(table)
    }
}

fn kwargs<const N: usize>(pairs: [(&str, Value); N]) -> Kwargs {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}
