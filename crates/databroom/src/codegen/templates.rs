//! Script templates wrapped around a generated chain.

use std::path::Path;

use super::language::TargetLanguage;
use super::literal::r_string;

/// Everything a script template needs.
#[derive(Debug, Clone)]
pub struct ScriptContext<'a> {
    /// Generation timestamp, already formatted.
    pub date: String,
    /// File the cleaned data came from.
    pub source_file: &'a str,
    pub source_hash: Option<&'a str>,
    /// Where the script should write its result; `None` emits a commented example.
    pub output_file: Option<&'a str>,
    /// The generated chain.
    pub steps: &'a str,
    pub step_count: usize,
    /// First recorded shape and last recorded shape, when every step carried them.
    pub recorded_shapes: Option<((usize, usize), (usize, usize))>,
}

/// Render a complete script for `language`.
pub fn render(language: TargetLanguage, ctx: &ScriptContext<'_>) -> String {
    match language {
        TargetLanguage::Python => python_script(ctx),
        TargetLanguage::R => r_script(ctx),
    }
}

fn extension(file: &str) -> String {
    Path::new(file)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default()
}

fn recorded_comment(ctx: &ScriptContext<'_>, prefix: &str) -> String {
    match ctx.recorded_shapes {
        Some((before, after)) => format!(
            "{}Recorded shape: ({}, {}) -> ({}, {})\n",
            prefix, before.0, before.1, after.0, after.1
        ),
        None => String::new(),
    }
}

fn python_script(ctx: &ScriptContext<'_>) -> String {
    let source = python_str(ctx.source_file);
    let loader = match extension(ctx.source_file).as_str() {
        "json" => "from_json",
        "xlsx" | "xls" => "from_excel",
        _ => "from_csv",
    };
    let hash_line = ctx
        .source_hash
        .map(|h| format!("Source SHA-256: {}\n", h))
        .unwrap_or_default();

    let save = match ctx.output_file {
        Some(out) => python_save(out),
        None => format!("# {}", python_save("cleaned_data.csv")),
    };

    format!(
        r#""""
Data cleaning pipeline generated by databroom.

Generated: {date}
Source: {source_file}
{hash_line}Steps: {count}
"""

from databroom.core.broom import Broom

# Load data
broom = Broom.{loader}({source})
shape_before = broom.get_df().shape

# Cleaning steps
{steps}

# Results
df = broom.get_df()
{recorded}print(f"Shape before: {{shape_before}}")
print(f"Shape after:  {{df.shape}}")
print(f"Missing values: {{int(df.isna().sum().sum())}}")

# Save
{save}
"#,
        date = ctx.date,
        source_file = ctx.source_file,
        hash_line = hash_line,
        count = ctx.step_count,
        loader = loader,
        source = source,
        steps = ctx.steps,
        recorded = recorded_comment(ctx, "# "),
        save = save,
    )
}

fn python_save(out: &str) -> String {
    let path = python_str(out);
    match extension(out).as_str() {
        "json" => format!("df.to_json({}, orient=\"records\", indent=2)", path),
        "tsv" => format!("df.to_csv({}, sep=\"\\t\", index=False)", path),
        "xlsx" => format!("df.to_excel({}, index=False)", path),
        _ => format!("df.to_csv({}, index=False)", path),
    }
}

fn python_str(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

fn r_script(ctx: &ScriptContext<'_>) -> String {
    let source = r_string(ctx.source_file);
    let reader = match extension(ctx.source_file).as_str() {
        "tsv" => format!("read_tsv({})", source),
        "json" => format!("as_tibble(jsonlite::fromJSON({}))", source),
        "xlsx" | "xls" => format!("readxl::read_excel({})", source),
        _ => format!("read_csv({})", source),
    };
    let hash_line = ctx
        .source_hash
        .map(|h| format!("# Source SHA-256: {}\n", h))
        .unwrap_or_default();

    let save = match ctx.output_file {
        Some(out) => r_save(out),
        None => format!("# {}", r_save("cleaned_data.csv")),
    };

    format!(
        r#"# Data cleaning pipeline generated by databroom
#
# Generated: {date}
# Source: {source_file}
{hash_line}# Steps: {count}

library(dplyr)
library(readr)
library(stringr)
library(stringi)
library(janitor)

# Load data
df <- {reader}
shape_before <- dim(df)

# Cleaning steps
{steps}

# Results
{recorded}cat("Shape before:", shape_before, "\n")
cat("Shape after: ", dim(df_clean), "\n")
cat("Missing values:", sum(is.na(df_clean)), "\n")

# Save
{save}
"#,
        date = ctx.date,
        source_file = ctx.source_file,
        hash_line = hash_line,
        count = ctx.step_count,
        reader = reader,
        steps = ctx.steps,
        recorded = recorded_comment(ctx, "# "),
        save = save,
    )
}

fn r_save(out: &str) -> String {
    let path = r_string(out);
    match extension(out).as_str() {
        "json" => format!("jsonlite::write_json(df_clean, {}, pretty = TRUE)", path),
        "tsv" => format!("write_tsv(df_clean, {})", path),
        "xlsx" => format!("writexl::write_xlsx(df_clean, {})", path),
        _ => format!("write_csv(df_clean, {})", path),
    }
}
