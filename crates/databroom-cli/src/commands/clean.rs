//! Clean command - apply operations to a file and export the results.

use std::path::PathBuf;

use colored::Colorize;
use databroom::{Broom, CleaningOperation, Kwargs, Table, TargetLanguage};
use log::debug;
use serde_json::json;

pub struct CleanArgs {
    pub file: PathBuf,
    pub operations: Vec<String>,
    pub threshold: f64,
    pub columns: Option<Vec<String>>,
    pub header_row: usize,
    pub keep_header_row: bool,
    pub pipeline: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub code: Option<PathBuf>,
    pub lang: String,
    pub save_pipeline: Option<PathBuf>,
    pub quiet: bool,
}

pub fn run(args: CleanArgs) -> Result<(), Box<dyn std::error::Error>> {
    // Validate before loading the file
    let language: TargetLanguage = args.lang.parse()?;
    let operations = args
        .operations
        .iter()
        .map(|name| {
            let name = name.replace('-', "_");
            CleaningOperation::from_name(&name)
                .ok_or_else(|| format!("Unknown operation: {}. Run 'databroom list'.", name))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if operations.is_empty() && args.pipeline.is_none() {
        return Err("No operations given. Pass operation names or --pipeline.".into());
    }

    let mut broom = Broom::from_file(&args.file)?;
    let before = broom.get_df().clone();

    if !args.quiet {
        println!(
            "{} {} ({} rows, {} columns)",
            "Cleaning".cyan().bold(),
            args.file.display().to_string().white(),
            before.row_count(),
            before.column_count()
        );
    }

    if let Some(path) = &args.pipeline {
        broom.run_pipeline_file(path)?;
        debug!("replayed pipeline {}", path.display());
    }

    for op in operations {
        broom.execute(op.name(), &[], operation_kwargs(op, &args))?;
    }

    if !args.quiet {
        print_steps(&broom);
        print_summary(&before, broom.get_df());
    }

    if let Some(path) = &args.output {
        broom.write(path)?;
        report(args.quiet, "Saved data to", path);
    }

    if let Some(path) = &args.save_pipeline {
        broom.save_pipeline(path)?;
        report(args.quiet, "Saved pipeline to", path);
    }

    if let Some(path) = &args.code {
        let mut generator = broom.code_generator(language)?;
        generator.config_mut().output_file = args
            .output
            .as_ref()
            .map(|p| p.display().to_string());
        generator.export_code(path)?;
        report(args.quiet, "Saved code to", path);
    }

    Ok(())
}

/// Keyword arguments for `op` taken from the command-line flags.
fn operation_kwargs(op: CleaningOperation, args: &CleanArgs) -> Kwargs {
    let mut kwargs = Kwargs::new();
    match op {
        CleaningOperation::RemoveSparseColumns => {
            kwargs.insert("threshold".to_string(), json!(args.threshold));
        }
        CleaningOperation::StandardizeValues => {
            if let Some(columns) = &args.columns {
                kwargs.insert("columns".to_string(), json!(columns));
            }
        }
        CleaningOperation::PromoteHeaders => {
            kwargs.insert("row_index".to_string(), json!(args.header_row));
            kwargs.insert("drop_promoted_row".to_string(), json!(!args.keep_header_row));
        }
        CleaningOperation::RemoveEmptyRows
        | CleaningOperation::StandardizeColumnNames
        | CleaningOperation::NormalizeColumnNames
        | CleaningOperation::NormalizeValues => {}
    }
    kwargs
}

fn print_steps(broom: &Broom) {
    println!();
    println!("{}", "Steps:".yellow().bold());
    for (i, record) in broom.get_history().iter().enumerate() {
        println!(
            "  {}. {} {:?} -> {:?} ({} rows, {} columns removed)",
            i + 1,
            record.function.green(),
            record.shape_before,
            record.shape_after,
            record.rows_removed(),
            record.columns_removed()
        );
    }
}

fn print_summary(before: &Table, after: &Table) {
    println!();
    println!("{}", "Summary:".yellow().bold());
    println!(
        "  Rows:    {} -> {}",
        before.row_count(),
        after.row_count().to_string().white().bold()
    );
    println!(
        "  Columns: {} -> {}",
        before.column_count(),
        after.column_count().to_string().white().bold()
    );
    println!(
        "  Missing: {:.1}% -> {:.1}%",
        before.percent_missing(),
        after.percent_missing()
    );
}

fn report(quiet: bool, label: &str, path: &std::path::Path) {
    if !quiet {
        println!("{} {}", label.green(), path.display());
    }
}
