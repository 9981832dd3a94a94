//! Generate command - turn a saved pipeline into a script.

use std::path::PathBuf;

use colored::Colorize;
use databroom::history::load_pipeline;
use databroom::{CodeGenerator, GeneratorConfig, TargetLanguage};

pub fn run(
    pipeline: PathBuf,
    lang: String,
    output: Option<PathBuf>,
    source: Option<PathBuf>,
    save_to: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let language: TargetLanguage = lang.parse()?;
    let steps = load_pipeline(&pipeline)?;

    let config = GeneratorConfig {
        source_file: source.map(|p| p.display().to_string()),
        output_file: save_to,
        source_hash: None,
    };
    let mut generator = CodeGenerator::with_config(language, config);
    generator.load_history(steps)?;

    let output =
        output.unwrap_or_else(|| pipeline.with_extension(generator.language().extension()));
    generator.export_code(&output)?;

    println!(
        "{} {} step(s) as {} to {}",
        "Generated".green().bold(),
        generator.steps().len(),
        generator.language(),
        output.display()
    );
    Ok(())
}
