//! CSV/TSV/JSON loader with delimiter detection.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use indexmap::IndexMap;
use log::debug;
use sha2::{Digest, Sha256};

use super::source::SourceMetadata;
use crate::error::{BroomError, Result};
use crate::table::{Cell, Table};

/// Delimiters to try when auto-detecting, in tie-break order.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Records sampled for delimiter detection.
const DETECT_SAMPLE: usize = 10;

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Whether the file has a header row.
    pub has_header: bool,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            max_rows: None,
            quote: b'"',
        }
    }
}

/// Loads tabular data files into a [`Table`].
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a file and return the table and its metadata.
    ///
    /// `.json` files are read as an array of row objects; anything else is
    /// treated as delimited text.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(Table, SourceMetadata)> {
        let path = path.as_ref();

        let mut file = File::open(path).map_err(|e| BroomError::io(path, e))?;
        let size_bytes = file
            .metadata()
            .map_err(|e| BroomError::io(path, e))?
            .len();

        let mut contents = Vec::new();
        file.read_to_end(&mut contents)
            .map_err(|e| BroomError::io(path, e))?;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let (table, format) = if is_json {
            (self.parse_json(&contents)?, "json".to_string())
        } else {
            let delimiter = match self.config.delimiter {
                Some(d) => d,
                None => self.detect_delimiter(&contents)?,
            };
            let format = match delimiter {
                b'\t' => "tsv",
                b',' => "csv",
                b';' => "csv-semicolon",
                b'|' => "psv",
                _ => "delimited",
            };
            (self.parse_bytes(&contents, delimiter)?, format.to_string())
        };

        debug!(
            "loaded {} as {} with shape {:?}",
            path.display(),
            format,
            table.shape()
        );

        let metadata = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            size_bytes,
            format,
            table.row_count(),
            table.column_count(),
        );

        Ok((table, metadata))
    }

    /// Parse delimited bytes directly.
    pub fn parse_bytes(&self, bytes: &[u8], delimiter: u8) -> Result<Table> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let mut records = reader.records();

        let headers: Vec<String> = if self.config.has_header {
            match records.next() {
                Some(record) => record?.iter().map(|s| s.to_string()).collect(),
                None => return Err(BroomError::EmptyData("No header row found".to_string())),
            }
        } else {
            Vec::new()
        };

        let mut rows = Vec::new();
        for (row_idx, result) in records.enumerate() {
            if self.config.max_rows.is_some_and(|max| row_idx >= max) {
                break;
            }
            let record = result?;
            rows.push(record.iter().map(Cell::infer).collect::<Vec<_>>());
        }

        let headers = if self.config.has_header {
            headers
        } else {
            let width = rows.iter().map(Vec::len).max().unwrap_or(0);
            (0..width).map(|i| format!("column_{}", i + 1)).collect()
        };

        if headers.is_empty() {
            return Err(BroomError::EmptyData("No columns found".to_string()));
        }

        Ok(Table::new(headers, rows))
    }

    /// Pick the delimiter that splits the leading records most consistently.
    ///
    /// Each candidate is scored on the field counts the csv reader gives for a
    /// sample of records, so delimiters inside quoted values never count. A
    /// consistent width beats a wider one; ties go to the earlier candidate.
    pub fn detect_delimiter(&self, bytes: &[u8]) -> Result<u8> {
        let sample = self
            .config
            .max_rows
            .map_or(DETECT_SAMPLE, |max| (max + 1).min(DETECT_SAMPLE));

        let mut best: Option<((bool, usize), u8)> = None;
        let mut saw_records = false;
        for &delimiter in DELIMITERS {
            let widths: Vec<usize> = csv::ReaderBuilder::new()
                .delimiter(delimiter)
                .has_headers(false)
                .quote(self.config.quote)
                .flexible(true)
                .from_reader(bytes)
                .records()
                .take(sample)
                .map_while(|record| record.ok())
                .map(|record| record.len())
                .collect();
            saw_records |= !widths.is_empty();

            let Some(&first) = widths.first() else {
                continue;
            };
            if first < 2 {
                continue;
            }
            let score = (widths.iter().all(|&w| w == first), first);
            if best.map_or(true, |(top, _)| score > top) {
                best = Some((score, delimiter));
            }
        }

        if !saw_records {
            return Err(BroomError::EmptyData("No lines to analyze".to_string()));
        }
        let delimiter = best.map_or(b',', |(_, d)| d);
        debug!("detected delimiter {:?}", delimiter as char);
        Ok(delimiter)
    }

    /// Parse a JSON array of row objects. Column order follows first appearance.
    pub fn parse_json(&self, bytes: &[u8]) -> Result<Table> {
        let records: Vec<IndexMap<String, serde_json::Value>> = serde_json::from_slice(bytes)?;

        let mut columns: Vec<String> = Vec::new();
        for record in &records {
            for key in record.keys() {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }

        if columns.is_empty() {
            return Err(BroomError::EmptyData("No columns found".to_string()));
        }

        let limit = self.config.max_rows.unwrap_or(usize::MAX);
        let rows = records
            .iter()
            .take(limit)
            .map(|record| {
                columns
                    .iter()
                    .map(|c| record.get(c).map(Cell::from_json).unwrap_or(Cell::Null))
                    .collect()
            })
            .collect();

        Ok(Table::new(columns, rows))
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}
