//! List command - show the registered cleaning operations.

use colored::Colorize;
use databroom::codegen::literal::python_literal;
use databroom::CleaningOperation;

pub fn run(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", "Available operations:".cyan().bold());
    println!();

    for op in CleaningOperation::ALL {
        println!("  {}", op.name().green().bold());
        println!("      {}", op.description());

        let params = op.parameters();
        if !params.is_empty() {
            let rendered = params
                .iter()
                .map(|p| format!("{}={}", p.name, python_literal(&p.default.to_value())))
                .collect::<Vec<_>>()
                .join(", ");
            println!("      {} {}", "Parameters:".dimmed(), rendered);
        }
    }

    if verbose {
        println!();
        println!(
            "{} remove_empty_cols, standarize_column_names, standarize_values",
            "Also accepted (legacy names):".dimmed()
        );
    }

    Ok(())
}
