//! Persistence for pipelines - save/load JSON files.
//!
//! A pipeline file is a JSON array of `{function, args, kwargs}` objects with no
//! envelope. Only the replayable part of each record is written; shape and
//! missing-value statistics are recomputed when the pipeline runs again.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use log::info;

use crate::error::{BroomError, Result};

use super::record::{OperationRecord, PipelineStep};

/// Save the replayable steps of `history` to a JSON pipeline file.
///
/// # Example
///
/// ```no_run
/// # use databroom::{Broom, history};
/// # fn example(broom: &Broom) -> databroom::Result<()> {
/// history::save_history(&broom.get_history(), "pipeline.json")?;
/// # Ok(())
/// # }
/// ```
pub fn save_history(history: &[OperationRecord], path: impl AsRef<Path>) -> Result<()> {
    let steps: Vec<PipelineStep> = history.iter().map(PipelineStep::from).collect();
    save_pipeline(&steps, path)
}

/// Save pipeline steps to a JSON file.
///
/// The format is checked before anything touches the filesystem, so a
/// rejected path leaves no partial file behind.
pub fn save_pipeline(steps: &[PipelineStep], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    ensure_json_path(path)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| BroomError::io(parent, e))?;
        }
    }

    let file = File::create(path).map_err(|e| BroomError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, steps)?;
    writer.flush().map_err(|e| BroomError::io(path, e))?;

    info!("saved {} pipeline step(s) to {}", steps.len(), path.display());
    Ok(())
}

/// Load pipeline steps from a JSON file.
///
/// # Example
///
/// ```no_run
/// let steps = databroom::history::load_pipeline("pipeline.json").unwrap();
/// println!("{} steps", steps.len());
/// ```
pub fn load_pipeline(path: impl AsRef<Path>) -> Result<Vec<PipelineStep>> {
    let path = path.as_ref();
    ensure_json_path(path)?;

    let file = File::open(path).map_err(|e| BroomError::io(path, e))?;
    let steps: Vec<PipelineStep> = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        BroomError::Parse(format!(
            "failed to parse pipeline '{}': {}",
            path.display(),
            e
        ))
    })?;

    info!("loaded {} pipeline step(s) from {}", steps.len(), path.display());
    Ok(steps)
}

fn ensure_json_path(path: &Path) -> Result<()> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        Ok(())
    } else {
        Err(BroomError::UnsupportedFormat(format!(
            "pipeline files must be .json, got '{}'",
            path.display()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn steps() -> Vec<PipelineStep> {
        vec![
            PipelineStep::named("remove_sparse_columns").with_kwarg("threshold", 0.9),
            PipelineStep::named("remove_empty_rows"),
            PipelineStep::named("standardize_values").with_kwarg("columns", json!(["a", "b"])),
        ]
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("pipeline.json");

        save_pipeline(&steps(), &path).unwrap();
        assert_eq!(load_pipeline(&path).unwrap(), steps());
    }

    #[test]
    fn test_file_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.json");
        save_pipeline(&steps()[..1], &path).unwrap();

        let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            raw,
            json!([{"function": "remove_sparse_columns", "args": [], "kwargs": {"threshold": 0.9}}])
        );
    }

    #[test]
    fn test_rejects_non_json_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.yaml");

        let err = save_pipeline(&steps(), &path).unwrap_err();
        assert!(matches!(err, BroomError::UnsupportedFormat(_)));
        assert!(!path.exists());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_save_reports_failed_flush() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("full.json");
        std::os::unix::fs::symlink("/dev/full", &path).unwrap();

        let err = save_pipeline(&steps(), &path).unwrap_err();
        assert!(matches!(err, BroomError::Io { .. }));
    }

    #[test]
    fn test_load_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"[{"args": []}]"#).unwrap();

        assert!(matches!(load_pipeline(&path), Err(BroomError::Parse(_))));
    }
}
