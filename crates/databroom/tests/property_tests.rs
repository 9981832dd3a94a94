//! Property-based tests for the operation library and pipeline.
//!
//! # Running Property Tests
//!
//! ```bash
//! cargo test -p databroom --test property_tests
//!
//! # More cases
//! PROPTEST_CASES=10000 cargo test -p databroom --test property_tests
//! ```

use proptest::prelude::*;
use tempfile::TempDir;

use databroom::history::{load_pipeline, save_pipeline};
use databroom::pipeline::replay;
use databroom::transform::{remove_empty_rows, remove_sparse_columns, standardize_column_names};
use databroom::{Cell, CleaningPipeline, PipelineStep, Table};

// =============================================================================
// Test Strategies
// =============================================================================

fn cell() -> impl Strategy<Value = Cell> {
    prop_oneof![
        3 => Just(Cell::Null),
        2 => any::<i64>().prop_map(Cell::Int),
        1 => any::<bool>().prop_map(Cell::Bool),
        3 => "[a-zA-Z áéíóúñÑ]{0,12}".prop_map(Cell::Text),
    ]
}

/// Tables with up to 6 columns and 12 rows. Column names are unique and may
/// contain spaces and accents.
fn table() -> impl Strategy<Value = Table> {
    (0usize..6, 0usize..12).prop_flat_map(|(cols, rows)| {
        (
            prop::collection::vec("[A-Za-zÁÉñ ]{1,10}", cols),
            prop::collection::vec(prop::collection::vec(cell(), cols), rows),
        )
            .prop_map(|(names, rows)| {
                let columns = names
                    .into_iter()
                    .enumerate()
                    .map(|(i, name)| format!("{} {}", name, i))
                    .collect();
                Table::new(columns, rows)
            })
    })
}

/// Thresholds in hundredths, so they survive a JSON round trip exactly.
fn threshold() -> impl Strategy<Value = f64> {
    (0u32..=100).prop_map(|p| p as f64 / 100.0)
}

fn step() -> impl Strategy<Value = PipelineStep> {
    prop_oneof![
        threshold().prop_map(|t| PipelineStep::named("remove_sparse_columns").with_kwarg("threshold", t)),
        Just(PipelineStep::named("remove_empty_rows")),
        Just(PipelineStep::named("standardize_column_names")),
        Just(PipelineStep::named("normalize_column_names")),
        Just(PipelineStep::named("normalize_values")),
        Just(PipelineStep::named("standardize_values")),
    ]
}

// =============================================================================
// Operation Properties
// =============================================================================

proptest! {
    #[test]
    fn sparse_columns_keep_full_and_drop_empty(table in table(), threshold in threshold()) {
        let cleaned = remove_sparse_columns(&table, threshold).unwrap();
        let rows = table.row_count();

        for (i, name) in table.columns.iter().enumerate() {
            let non_null = table.non_null_count(i);
            let kept = cleaned.columns.contains(name);
            if non_null == rows {
                prop_assert!(kept, "full column '{}' was dropped", name);
            }
            if non_null == 0 && rows > 0 && threshold > 0.0 {
                prop_assert!(!kept, "empty column '{}' survived", name);
            }
        }
    }

    #[test]
    fn empty_rows_never_grow_and_retained_rows_have_data(table in table()) {
        let cleaned = remove_empty_rows(&table);
        prop_assert!(cleaned.row_count() <= table.row_count());
        for row in &cleaned.rows {
            prop_assert!(row.iter().any(|cell| !cell.is_null()));
        }
    }

    #[test]
    fn standardize_column_names_is_idempotent(table in table()) {
        let once = standardize_column_names(&table);
        let twice = standardize_column_names(&once);
        prop_assert_eq!(once, twice);
    }
}

// =============================================================================
// Pipeline Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn replay_reproduces_current(table in table(), steps in prop::collection::vec(step(), 0..6)) {
        let mut pipeline = CleaningPipeline::new(table);
        pipeline.run_pipeline(&steps).unwrap();

        let replayed = replay(pipeline.original(), &pipeline.history()).unwrap();
        prop_assert_eq!(&replayed, pipeline.current());
    }

    #[test]
    fn undo_matches_shorter_run(table in table(), steps in prop::collection::vec(step(), 1..6)) {
        let mut pipeline = CleaningPipeline::new(table.clone());
        pipeline.run_pipeline(&steps).unwrap();
        pipeline.undo().unwrap();

        let mut shorter = CleaningPipeline::new(table);
        shorter.run_pipeline(&steps[..steps.len() - 1]).unwrap();

        prop_assert_eq!(pipeline.operation_count(), steps.len() - 1);
        prop_assert_eq!(pipeline.current(), shorter.current());
    }

    #[test]
    fn pipeline_file_round_trip(steps in prop::collection::vec(step(), 0..8)) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pipeline.json");

        save_pipeline(&steps, &path).unwrap();
        prop_assert_eq!(load_pipeline(&path).unwrap(), steps);
    }
}
