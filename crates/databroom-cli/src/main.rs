//! Databroom CLI - table cleaning with code generation.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use log::LevelFilter;

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .format_timestamp(None)
        .init();

    let result = match cli.command {
        Commands::Clean {
            file,
            operations,
            threshold,
            columns,
            header_row,
            keep_header_row,
            pipeline,
            output,
            code,
            lang,
            save_pipeline,
            quiet,
        } => commands::clean::run(commands::clean::CleanArgs {
            file,
            operations,
            threshold,
            columns,
            header_row,
            keep_header_row,
            pipeline,
            output,
            code,
            lang,
            save_pipeline,
            quiet,
        }),

        Commands::List => commands::list::run(cli.verbose),

        Commands::Generate {
            pipeline,
            lang,
            output,
            source,
            save_to,
        } => commands::generate::run(pipeline, lang, output, source, save_to),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
