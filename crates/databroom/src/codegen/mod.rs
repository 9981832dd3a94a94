//! Code generation: turn a recorded history into a standalone script.
//!
//! The generator accepts structured records, pipeline steps, or the legacy
//! one-line text form and normalizes all of them to steps before anything is
//! generated.
//!
//! # Example
//!
//! ```no_run
//! use databroom::{Broom, CodeGenerator, TargetLanguage};
//!
//! # fn main() -> databroom::Result<()> {
//! let mut broom = Broom::from_file("survey.csv")?;
//! broom.remove_sparse_columns(0.9)?.standardize_column_names()?;
//!
//! let mut generator = CodeGenerator::new(TargetLanguage::R);
//! generator.load_history(broom.get_history())?;
//! generator.export_code("clean_survey.R")?;
//! # Ok(())
//! # }
//! ```

mod language;
pub mod literal;
mod templates;

use std::fs;
use std::path::Path;

use chrono::Local;
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{BroomError, Result};
use crate::history::{OperationRecord, PipelineStep};
use crate::transform::CleaningOperation;

pub use language::{Stage, TargetLanguage};
pub use templates::{render, ScriptContext};

static CALLED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Za-z_]\w*)\s+called").expect("valid regex"));
static SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\.\s*Shape from \((\d+), (\d+)\) to \((\d+), (\d+)\)").expect("valid regex")
});

const PARAMETERS_MARKER: &str = "Parameters:";
const DEFAULT_SOURCE: &str = "data.csv";

/// One raw history entry as handed to [`CodeGenerator::load_history`].
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryEntry {
    Record(OperationRecord),
    Step(PipelineStep),
    /// A legacy log line: `"<name> called... Parameters: {...}. <anything>"`.
    ///
    /// A trailing `Shape from (r, c) to (r, c)` clause is picked up when present.
    Text(String),
}

impl From<OperationRecord> for HistoryEntry {
    fn from(record: OperationRecord) -> Self {
        HistoryEntry::Record(record)
    }
}

impl From<&OperationRecord> for HistoryEntry {
    fn from(record: &OperationRecord) -> Self {
        HistoryEntry::Record(record.clone())
    }
}

impl From<PipelineStep> for HistoryEntry {
    fn from(step: PipelineStep) -> Self {
        HistoryEntry::Step(step)
    }
}

impl From<String> for HistoryEntry {
    fn from(line: String) -> Self {
        HistoryEntry::Text(line)
    }
}

impl From<&str> for HistoryEntry {
    fn from(line: &str) -> Self {
        HistoryEntry::Text(line.to_string())
    }
}

/// Template settings for [`CodeGenerator::export_code`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneratorConfig {
    /// Data file the script loads. Defaults to `data.csv`.
    pub source_file: Option<String>,
    /// When set, the script saves its result here; otherwise the save call is commented out.
    pub output_file: Option<String>,
    /// SHA-256 of the source file, noted in the header.
    pub source_hash: Option<String>,
}

#[derive(Debug, Clone)]
struct LoadedStep {
    step: PipelineStep,
    shapes: Option<((usize, usize), (usize, usize))>,
}

/// Translates a history into Python or R.
#[derive(Debug, Clone)]
pub struct CodeGenerator {
    language: TargetLanguage,
    config: GeneratorConfig,
    steps: Vec<LoadedStep>,
}

impl CodeGenerator {
    pub fn new(language: TargetLanguage) -> Self {
        Self::with_config(language, GeneratorConfig::default())
    }

    pub fn with_config(language: TargetLanguage, config: GeneratorConfig) -> Self {
        Self {
            language,
            config,
            steps: Vec::new(),
        }
    }

    pub fn language(&self) -> TargetLanguage {
        self.language
    }

    pub fn config_mut(&mut self) -> &mut GeneratorConfig {
        &mut self.config
    }

    /// The loaded history, normalized to steps.
    pub fn steps(&self) -> Vec<&PipelineStep> {
        self.steps.iter().map(|s| &s.step).collect()
    }

    /// Replace the loaded history with `entries`.
    ///
    /// Either every entry is accepted or, on a [`BroomError::Parse`], the
    /// previously loaded history is kept as it was.
    pub fn load_history<I, E>(&mut self, entries: I) -> Result<usize>
    where
        I: IntoIterator<Item = E>,
        E: Into<HistoryEntry>,
    {
        let steps = entries
            .into_iter()
            .map(|entry| normalize(entry.into()))
            .collect::<Result<Vec<_>>>()?;

        debug!("loaded {} history entries for {} generation", steps.len(), self.language);
        self.steps = steps;
        Ok(self.steps.len())
    }

    /// Translate the loaded history into one chained expression.
    ///
    /// Operations this language cannot express become placeholder comments;
    /// generation carries on with the remaining steps.
    pub fn generate_code(&self) -> Result<String> {
        if self.steps.is_empty() {
            return Err(BroomError::EmptyHistory(
                "no history loaded; call load_history first".to_string(),
            ));
        }

        let stages: Vec<Stage> = self
            .steps
            .iter()
            .flat_map(|loaded| self.stages_for(&loaded.step))
            .collect();

        Ok(self.language.chain(&stages))
    }

    /// Render the generated chain into a full script and write it to `path`.
    pub fn export_code(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let script = self.render_script()?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| BroomError::io(parent, e))?;
            }
        }
        fs::write(path, script).map_err(|e| BroomError::io(path, e))?;

        info!("exported {} script to {}", self.language, path.display());
        Ok(())
    }

    /// The full script [`export_code`](Self::export_code) would write.
    pub fn render_script(&self) -> Result<String> {
        let steps = self.generate_code()?;
        let context = ScriptContext {
            date: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            source_file: self.config.source_file.as_deref().unwrap_or(DEFAULT_SOURCE),
            source_hash: self.config.source_hash.as_deref(),
            output_file: self.config.output_file.as_deref(),
            steps: &steps,
            step_count: self.steps.len(),
            recorded_shapes: self.recorded_shapes(),
        };
        Ok(render(self.language, &context))
    }

    fn stages_for(&self, step: &PipelineStep) -> Vec<Stage> {
        let translated = CleaningOperation::from_name(&step.function).and_then(|op| {
            match op.bind(&step.args, &step.kwargs) {
                Ok(params) => self.language.translate(op.name(), &params),
                Err(e) => Some(Err(e)),
            }
        });

        match translated {
            Some(Ok(exprs)) => exprs.into_iter().map(Stage::Expr).collect(),
            Some(Err(e)) => {
                warn!("cannot translate {}: {}", step.function, e);
                vec![placeholder(step)]
            }
            None => {
                warn!("no {} translation for '{}'", self.language, step.function);
                vec![placeholder(step)]
            }
        }
    }

    fn recorded_shapes(&self) -> Option<((usize, usize), (usize, usize))> {
        let first = self.steps.first()?.shapes?;
        let last = self.steps.last()?.shapes?;
        if self.steps.iter().all(|s| s.shapes.is_some()) {
            Some((first.0, last.1))
        } else {
            None
        }
    }
}

fn placeholder(step: &PipelineStep) -> Stage {
    Stage::Placeholder(format!(
        "UNIMPLEMENTED: manual translation required for {}({})",
        step.function,
        literal::parameters_text(&step.args, &step.kwargs)
    ))
}

fn normalize(entry: HistoryEntry) -> Result<LoadedStep> {
    match entry {
        HistoryEntry::Record(record) => Ok(LoadedStep {
            shapes: Some((record.shape_before, record.shape_after)),
            step: record.step(),
        }),
        HistoryEntry::Step(step) => Ok(LoadedStep { step, shapes: None }),
        HistoryEntry::Text(line) => parse_text_entry(&line),
    }
}

/// Parse a legacy log line into a step.
fn parse_text_entry(line: &str) -> Result<LoadedStep> {
    let marker = line.find(PARAMETERS_MARKER).ok_or_else(|| {
        BroomError::Parse(format!("history entry has no '{}' marker: {}", PARAMETERS_MARKER, line))
    })?;

    let function = CALLED
        .captures(&line[..marker])
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| BroomError::Parse(format!("history entry names no function: {}", line)))?;

    let rest = &line[marker + PARAMETERS_MARKER.len()..];
    let (args, kwargs, consumed) = literal::parse_parameters_prefix(rest)?;

    let tail = rest[consumed..].trim_start();
    if !tail.is_empty() && !tail.starts_with('.') {
        return Err(BroomError::Parse(format!(
            "unexpected text after parameters in history entry: {}",
            line
        )));
    }

    let shapes = SHAPE.captures(tail).and_then(|caps| {
        let dims: Vec<usize> = (1..=4)
            .filter_map(|i| caps.get(i).and_then(|m| m.as_str().parse().ok()))
            .collect();
        (dims.len() == 4).then(|| ((dims[0], dims[1]), (dims[2], dims[3])))
    });

    Ok(LoadedStep {
        step: PipelineStep::new(function, args, kwargs),
        shapes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn two_steps() -> Vec<PipelineStep> {
        vec![
            PipelineStep::named("remove_sparse_columns").with_kwarg("threshold", 0.9),
            PipelineStep::named("standardize_column_names"),
        ]
    }

    #[test]
    fn test_generate_before_load() {
        let generator = CodeGenerator::new(TargetLanguage::Python);
        assert!(matches!(generator.generate_code(), Err(BroomError::EmptyHistory(_))));
    }

    #[test]
    fn test_python_two_stage_chain() {
        let mut generator = CodeGenerator::new(TargetLanguage::Python);
        generator.load_history(two_steps()).unwrap();

        let code = generator.generate_code().unwrap();
        assert_eq!(
            code,
            "broom = (\n    broom\n    .remove_sparse_columns(threshold=0.9)\n    .standardize_column_names()\n)"
        );
    }

    #[test]
    fn test_r_pipe_chain() {
        let mut generator = CodeGenerator::new(TargetLanguage::R);
        generator.load_history(two_steps()).unwrap();

        let code = generator.generate_code().unwrap();
        assert!(code.starts_with("df_clean <- df %>%\n  select(where("));
        assert!(code.contains("floor(0.9 * length(.x))"));
        assert!(code.ends_with("rename_with(~ str_replace_all(str_to_lower(.x), \" \", \"_\"))"));
    }

    #[test]
    fn test_implicit_threshold_defaults() {
        let mut generator = CodeGenerator::new(TargetLanguage::Python);
        generator.load_history(vec![PipelineStep::named("remove_empty_cols")]).unwrap();
        assert!(generator.generate_code().unwrap().contains(".remove_sparse_columns(threshold=0.9)"));
    }

    #[test]
    fn test_unknown_operation_gets_placeholder() {
        let mut generator = CodeGenerator::new(TargetLanguage::R);
        generator
            .load_history(vec![
                PipelineStep::named("pivot_wider").with_kwarg("names_from", "key"),
                PipelineStep::named("remove_empty_rows"),
            ])
            .unwrap();

        let code = generator.generate_code().unwrap();
        assert!(code.contains(
            "# UNIMPLEMENTED: manual translation required for pivot_wider({'names_from': 'key'})"
        ));
        assert!(code.contains("filter(!if_all(everything(), is.na))"));
    }

    #[test]
    fn test_bad_arguments_get_placeholder() {
        let mut generator = CodeGenerator::new(TargetLanguage::Python);
        generator
            .load_history(vec![PipelineStep::named("remove_empty_rows").with_kwarg("bogus", 1)])
            .unwrap();
        assert!(generator.generate_code().unwrap().contains("# UNIMPLEMENTED"));
    }

    #[test]
    fn test_text_entries() {
        let mut generator = CodeGenerator::new(TargetLanguage::Python);
        generator
            .load_history(vec![
                "2024-01-15 14:30:00 - remove_empty_cols called. Parameters: {'threshold': 0.5}. Shape from (4, 3) to (4, 2)",
                "standardize_values called. Parameters: {'columns': ['a. b']}.",
            ])
            .unwrap();

        let steps = generator.steps();
        assert_eq!(steps[0].function, "remove_empty_cols");
        assert_eq!(steps[0].kwargs["threshold"], json!(0.5));
        assert_eq!(steps[1].kwargs["columns"], json!(["a. b"]));

        let code = generator.generate_code().unwrap();
        assert!(code.contains(".remove_sparse_columns(threshold=0.5)"));
        assert!(code.contains(".standardize_values(columns=['a. b'])"));
    }

    #[test]
    fn test_text_entries_with_free_trailing_text() {
        let mut generator = CodeGenerator::new(TargetLanguage::Python);
        let count = generator
            .load_history(vec![
                "remove_empty_cols called with Parameters: {'threshold': 0.9}. Operation completed successfully.",
                "standardize_column_names called with Parameters: {}. Operation completed successfully.",
                "normalize_column_names called with Parameters: {}. Operation completed successfully.",
            ])
            .unwrap();
        assert_eq!(count, 3);

        let code = generator.generate_code().unwrap();
        assert_eq!(
            code,
            "broom = (\n    broom\n    .remove_sparse_columns(threshold=0.9)\n    .standardize_column_names()\n    .normalize_column_names()\n)"
        );
    }

    #[test]
    fn test_text_entry_trailing_garbage_is_rejected() {
        let mut generator = CodeGenerator::new(TargetLanguage::Python);
        let err = generator
            .load_history(vec!["remove_empty_rows called. Parameters: {} and more"])
            .unwrap_err();
        assert!(matches!(err, BroomError::Parse(_)));
    }

    #[test]
    fn test_deeply_nested_text_entry_is_a_parse_error() {
        let line = format!(
            "remove_empty_rows called. Parameters: {{'a': {}{}}}",
            "[".repeat(2000),
            "]".repeat(2000)
        );
        let mut generator = CodeGenerator::new(TargetLanguage::Python);
        assert!(matches!(generator.load_history(vec![line]), Err(BroomError::Parse(_))));
    }

    #[test]
    fn test_text_entry_without_marker_is_atomic() {
        let mut generator = CodeGenerator::new(TargetLanguage::Python);
        generator.load_history(two_steps()).unwrap();

        let err = generator
            .load_history(vec!["remove_empty_rows called.", "garbage"])
            .unwrap_err();

        assert!(matches!(err, BroomError::Parse(_)));
        assert_eq!(generator.steps().len(), 2);
    }

    #[test]
    fn test_records_and_recorded_shapes() {
        let record = OperationRecord {
            function: "remove_empty_rows".to_string(),
            args: Vec::new(),
            kwargs: Default::default(),
            shape_before: (10, 3),
            shape_after: (8, 3),
            percent_missing_before: 20.0,
            percent_missing_after: 5.0,
            timestamp: Utc.with_ymd_and_hms(2024, 1, 15, 14, 30, 0).unwrap(),
        };
        let line = record.to_string();

        let mut generator = CodeGenerator::with_config(
            TargetLanguage::Python,
            GeneratorConfig {
                source_file: Some("raw.csv".to_string()),
                ..Default::default()
            },
        );
        generator.load_history(vec![HistoryEntry::from(&record), HistoryEntry::from(line)]).unwrap();

        let script = generator.render_script().unwrap();
        assert!(script.contains("# Recorded shape: (10, 3) -> (8, 3)"));
        assert!(script.contains("Broom.from_csv(\"raw.csv\")"));
    }

    #[test]
    fn test_export_code() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scripts").join("pipeline.R");

        let mut generator = CodeGenerator::new(TargetLanguage::R);
        generator.load_history(two_steps()).unwrap();
        generator.export_code(&path).unwrap();

        let script = fs::read_to_string(&path).unwrap();
        assert!(script.contains("# Source: data.csv"));
        assert!(script.contains("library(dplyr)"));
        assert!(script.contains("df_clean <- df %>%"));
        assert!(script.contains("# write_csv(df_clean, \"cleaned_data.csv\")"));
    }
}
