//! CSV export of the current result set

use crate::model::result::{cell, ResultRow};
use anyhow::{Context, Result};
use chrono::Local;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Write rows as CSV with a header line made of `fields`
pub fn write_csv<W: Write>(
    writer: W,
    fields: &[String],
    rows: &[&ResultRow],
    delimiter: u8,
) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    csv_writer.write_record(fields)?;
    for row in rows {
        csv_writer.write_record(fields.iter().map(|f| cell(row, f).to_string()))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Export rows into `dir` under a timestamped file name
pub fn export_results(
    dir: &Path,
    fields: &[String],
    rows: &[&ResultRow],
    delimiter: u8,
) -> Result<PathBuf> {
    let file_name = format!("gbd-results-{}.csv", Local::now().format("%Y%m%d-%H%M%S"));
    let path = dir.join(file_name);

    let file = File::create(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_csv(file, fields, rows, delimiter)?;

    tracing::info!(path = %path.display(), rows = rows.len(), "exported results");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::api::parse_rows;

    #[test]
    fn test_write_csv_uses_field_order() {
        let rows = parse_rows(r#"[{"hash": "a1", "clauses": 10}, {"clauses": 3, "hash": "b2"}]"#)
            .unwrap();
        let refs: Vec<_> = rows.iter().collect();
        let fields = vec!["hash".to_string(), "clauses".to_string()];

        let mut out = Vec::new();
        write_csv(&mut out, &fields, &refs, b',').unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "hash,clauses\na1,10\nb2,3\n"
        );
    }

    #[test]
    fn test_write_csv_missing_cells_and_delimiter() {
        let rows = parse_rows(r#"[{"a": 1, "b": "x y"}, {"a": 2}]"#).unwrap();
        let refs: Vec<_> = rows.iter().collect();
        let fields = vec!["a".to_string(), "b".to_string()];

        let mut out = Vec::new();
        write_csv(&mut out, &fields, &refs, b';').unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a;b\n1;x y\n2;\n");
    }

    #[test]
    fn test_export_results_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let rows = parse_rows(r#"[{"a": 1}]"#).unwrap();
        let refs: Vec<_> = rows.iter().collect();

        let path = export_results(dir.path(), &["a".to_string()], &refs, b',').unwrap();
        assert!(path.starts_with(dir.path()));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "a\n1\n");
    }
}
