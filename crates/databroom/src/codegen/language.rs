//! Target languages and the per-operation translation tables.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BroomError, Result};
use crate::transform::Params;

use super::literal::{python_literal, r_literal, r_string};

/// Output language for generated cleaning scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetLanguage {
    /// Method chaining on a `Broom` object.
    Python,
    /// A tidyverse `%>%` pipe over a data frame.
    R,
}

/// One piece of a generated chain.
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    /// Code that becomes part of the chain.
    Expr(String),
    /// A comment standing in for an operation with no translation.
    Placeholder(String),
}

type Translation = fn(&Params) -> Result<Vec<String>>;

const PYTHON_METHODS: &[&str] = &[
    "remove_sparse_columns",
    "remove_empty_rows",
    "standardize_column_names",
    "normalize_column_names",
    "normalize_values",
    "standardize_values",
    "promote_headers",
];

const R_VERBS: &[(&str, Translation)] = &[
    ("remove_sparse_columns", r_remove_sparse_columns),
    ("remove_empty_rows", r_remove_empty_rows),
    ("standardize_column_names", r_standardize_column_names),
    ("normalize_column_names", r_normalize_column_names),
    ("normalize_values", r_normalize_values_stage),
    ("standardize_values", r_standardize_values),
    ("promote_headers", r_promote_headers),
];

const R_ASCII: &str = r#"iconv(stri_trans_nfkd(.x), "UTF-8", "ASCII", sub = "")"#;
const R_SNAKE: &str = r#"str_replace_all(str_to_lower(.x), " ", "_")"#;

impl TargetLanguage {
    pub const ALL: [TargetLanguage; 2] = [TargetLanguage::Python, TargetLanguage::R];

    pub fn name(self) -> &'static str {
        match self {
            TargetLanguage::Python => "python",
            TargetLanguage::R => "r",
        }
    }

    /// Conventional script file extension.
    pub fn extension(self) -> &'static str {
        match self {
            TargetLanguage::Python => "py",
            TargetLanguage::R => "R",
        }
    }

    /// Translate one bound operation, or `None` when this language has no mapping for it.
    pub fn translate(self, operation: &str, params: &Params) -> Option<Result<Vec<String>>> {
        match self {
            TargetLanguage::Python => PYTHON_METHODS
                .contains(&operation)
                .then(|| Ok(vec![python_method(operation, params)])),
            TargetLanguage::R => R_VERBS
                .iter()
                .find(|(name, _)| *name == operation)
                .map(|(_, translate)| translate(params)),
        }
    }

    /// Join stages into a single assignment expression.
    ///
    /// Only expressions are joined with the chaining operator; placeholders sit
    /// on their own comment lines so they never leave a dangling operator.
    pub fn chain(self, stages: &[Stage]) -> String {
        match self {
            TargetLanguage::Python => {
                let mut lines = vec!["broom = (".to_string(), "    broom".to_string()];
                for stage in stages {
                    match stage {
                        Stage::Expr(expr) => lines.push(format!("    .{}", expr)),
                        Stage::Placeholder(text) => lines.push(format!("    # {}", text)),
                    }
                }
                lines.push(")".to_string());
                lines.join("\n")
            }
            TargetLanguage::R => {
                let mut lines = vec!["df_clean <- df".to_string()];
                let mut last_expr = 0;
                for stage in stages {
                    match stage {
                        Stage::Expr(expr) => {
                            lines[last_expr].push_str(" %>%");
                            lines.push(format!("  {}", expr));
                            last_expr = lines.len() - 1;
                        }
                        Stage::Placeholder(text) => lines.push(format!("  # {}", text)),
                    }
                }
                lines.join("\n")
            }
        }
    }
}

impl fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TargetLanguage {
    type Err = BroomError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "python" | "py" => Ok(TargetLanguage::Python),
            "r" => Ok(TargetLanguage::R),
            other => Err(BroomError::UnsupportedFormat(format!(
                "unknown target language '{}' (expected python or r)",
                other
            ))),
        }
    }
}

fn python_method(operation: &str, params: &Params) -> String {
    let arguments = params
        .iter()
        .map(|(name, value)| format!("{}={}", name, python_literal(value)))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{}({})", operation, arguments)
}

fn r_remove_empty_rows(_: &Params) -> Result<Vec<String>> {
    Ok(vec!["filter(!if_all(everything(), is.na))".to_string()])
}

fn r_standardize_column_names(_: &Params) -> Result<Vec<String>> {
    Ok(vec![format!("rename_with(~ {})", R_SNAKE)])
}

fn r_normalize_column_names(_: &Params) -> Result<Vec<String>> {
    Ok(vec![format!("rename_with(~ {})", R_ASCII)])
}

fn r_normalize_values_stage(_: &Params) -> Result<Vec<String>> {
    Ok(vec![r_normalize_values()])
}

fn r_normalize_values() -> String {
    format!("mutate(across(where(is.character), ~ {}))", R_ASCII)
}

fn r_remove_sparse_columns(params: &Params) -> Result<Vec<String>> {
    let threshold = params.f64("threshold")?;
    if threshold <= 0.0 {
        return Ok(vec!["select(everything())".to_string()]);
    }
    Ok(vec![format!(
        "select(where(~ length(.x) == 0 || sum(!is.na(.x)) >= max(floor({} * length(.x)), 1)))",
        threshold
    )])
}

fn r_standardize_values(params: &Params) -> Result<Vec<String>> {
    let selection = match params.string_list("columns")? {
        None => "where(is.character)".to_string(),
        Some(columns) => {
            let names = columns.iter().map(|c| r_string(c)).collect::<Vec<_>>().join(", ");
            format!("any_of(c({})) & where(is.character)", names)
        }
    };
    Ok(vec![
        r_normalize_values(),
        format!("mutate(across({}, ~ {}))", selection, R_SNAKE),
    ])
}

fn r_promote_headers(params: &Params) -> Result<Vec<String>> {
    let row = params.usize("row_index")? + 1;
    let remove = r_literal(&Value::Bool(params.bool("drop_promoted_row")?));
    Ok(vec![format!(
        "row_to_names(row_number = {}, remove_row = {}, remove_rows_above = FALSE)",
        row, remove
    )])
}
