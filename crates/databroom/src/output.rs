//! Writing cleaned tables back to disk.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;

use crate::error::{BroomError, Result};
use crate::table::Table;

/// Write a table to `path`, choosing the format from the extension.
///
/// `.csv` and `.tsv` are written as delimited text with a header row, `.json`
/// as an array of row objects. Any other extension is rejected.
pub fn write_table(table: &Table, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => write_delimited(table, path, b',')?,
        "tsv" => write_delimited(table, path, b'\t')?,
        "json" => write_json(table, path)?,
        _ => {
            return Err(BroomError::UnsupportedFormat(format!(
                "cannot write table to '{}' (expected .csv, .tsv or .json)",
                path.display()
            )));
        }
    }

    info!("wrote table with shape {:?} to {}", table.shape(), path.display());
    Ok(())
}

fn write_delimited(table: &Table, path: &Path, delimiter: u8) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(path)?;

    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(|cell| cell.to_string()))?;
    }
    writer.flush().map_err(|e| BroomError::io(path, e))?;

    Ok(())
}

fn write_json(table: &Table, path: &Path) -> Result<()> {
    let records: Vec<serde_json::Map<String, serde_json::Value>> = table
        .rows
        .iter()
        .map(|row| {
            table
                .columns
                .iter()
                .cloned()
                .zip(row.iter().map(|cell| cell.to_json()))
                .collect()
        })
        .collect();

    let file = File::create(path).map_err(|e| BroomError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &records)?;
    writer.flush().map_err(|e| BroomError::io(path, e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Parser;
    use crate::table::Cell;

    fn sample() -> Table {
        Table::from_columns(vec![
            ("id", vec![Cell::Int(1), Cell::Int(2)]),
            ("name", vec![Cell::from("Ana"), Cell::Null]),
        ])
    }

    #[test]
    fn test_csv_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        write_table(&sample(), &path).unwrap();
        let (table, metadata) = Parser::new().parse_file(&path).unwrap();

        assert_eq!(table, sample());
        assert_eq!(metadata.format, "csv");
    }

    #[test]
    fn test_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");

        write_table(&sample(), &path).unwrap();
        let (table, _) = Parser::new().parse_file(&path).unwrap();

        assert_eq!(table, sample());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_json_write_reports_failed_flush() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("full.json");
        std::os::unix::fs::symlink("/dev/full", &path).unwrap();

        let err = write_table(&sample(), &path).unwrap_err();
        assert!(matches!(err, BroomError::Io { .. }));
    }

    #[test]
    fn test_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_table(&sample(), dir.path().join("out.xlsx")).unwrap_err();
        assert!(matches!(err, BroomError::UnsupportedFormat(_)));
    }
}
