//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Databroom: table cleaning with replayable history and code generation
#[derive(Parser)]
#[command(name = "databroom")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Clean a data file with the given operations, in order
    Clean {
        /// Path to the data file (CSV/TSV/JSON)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Operations to apply, e.g. remove_sparse_columns standardize_column_names
        #[arg(value_name = "OPERATION")]
        operations: Vec<String>,

        /// Minimum populated fraction for remove_sparse_columns
        #[arg(short, long, default_value = "0.9")]
        threshold: f64,

        /// Comma-separated columns for standardize_values (default: all)
        #[arg(long, value_delimiter = ',')]
        columns: Option<Vec<String>>,

        /// Row promoted by promote_headers (0-based)
        #[arg(long, default_value = "0")]
        header_row: usize,

        /// Keep the promoted row in the data
        #[arg(long)]
        keep_header_row: bool,

        /// Replay a saved JSON pipeline before the listed operations
        #[arg(short, long, value_name = "PIPELINE")]
        pipeline: Option<PathBuf>,

        /// Write the cleaned table (csv, tsv or json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write a script that reproduces the cleaning
        #[arg(short, long, value_name = "SCRIPT")]
        code: Option<PathBuf>,

        /// Language of the generated script
        #[arg(short, long, default_value = "python")]
        lang: String,

        /// Save the applied steps as a JSON pipeline
        #[arg(long, value_name = "PIPELINE")]
        save_pipeline: Option<PathBuf>,

        /// Only report errors
        #[arg(short, long)]
        quiet: bool,
    },

    /// List the available cleaning operations
    List,

    /// Generate a script from a saved JSON pipeline
    Generate {
        /// Path to the pipeline file
        #[arg(value_name = "PIPELINE")]
        pipeline: PathBuf,

        /// Language of the generated script
        #[arg(short, long, default_value = "python")]
        lang: String,

        /// Output path for the script (default: <pipeline>.py or <pipeline>.R)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Data file the script should load
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// File the script should save its result to
        #[arg(long)]
        save_to: Option<String>,
    },
}
