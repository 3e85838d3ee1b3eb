use std::fs;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader};
use thiserror::Error;

use super::table::Table;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to open workbook: {0}")]
    Workbook(String),
    #[error("workbook has no worksheets: {0}")]
    EmptyWorkbook(PathBuf),
    #[error("failed to parse csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to parse embeddings: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported table format: {0}")]
    UnsupportedFormat(String),
    #[error("row count {rows} does not match embedding count {embeddings}")]
    EmbeddingCount { rows: usize, embeddings: usize },
    #[error("embedding {row} has dimension {found}, expected {expected}")]
    EmbeddingDimension {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("embeddings must not be empty vectors")]
    EmptyEmbedding,
}

/// Loads the first worksheet of a spreadsheet, or a CSV file, by extension.
pub fn load_table(path: &Path) -> Result<Table, DatasetError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "xlsx" | "xlsm" | "xls" | "ods" => load_workbook(path),
        "csv" => load_csv(path),
        other => Err(DatasetError::UnsupportedFormat(format!(
            "{} ({})",
            path.display(),
            if other.is_empty() { "no extension" } else { other }
        ))),
    }
}

/// Loads a JSON array of row embeddings.
pub fn load_embeddings(path: &Path) -> Result<Vec<Vec<f32>>, DatasetError> {
    let contents = fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&contents)?)
}

fn load_workbook(path: &Path) -> Result<Table, DatasetError> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| DatasetError::Workbook(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| DatasetError::EmptyWorkbook(path.to_path_buf()))?
        .map_err(|e| DatasetError::Workbook(e.to_string()))?;

    let mut rows = range.rows();
    let headers = rows
        .next()
        .map(|row| row.iter().map(cell_text).collect())
        .unwrap_or_default();
    let data = rows
        .map(|row| row.iter().map(cell_text).collect())
        .collect();

    Ok(Table::new(headers, data))
}

fn load_csv(path: &Path) -> Result<Table, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let headers = reader
        .headers()?
        .iter()
        .map(|h| Some(h.to_string()))
        .collect();

    let mut data = Vec::new();
    for record in reader.records() {
        let record = record?;
        data.push(record.iter().map(|v| Some(v.to_string())).collect());
    }

    Ok(Table::new(headers, data))
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) => Some(s.clone()),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => Some(format!("{}", *f as i64)),
        Data::Float(f) => Some(f.to_string()),
        Data::Int(i) => Some(i.to_string()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_csv_with_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("survey.csv");
        fs::write(&path, "Respondent,Age,\n1,25-34,yes\n2,,no\n").unwrap();

        let table = load_table(&path).unwrap();

        assert_eq!(table.headers(), &["Respondent", "Age", "Unnamed: 2"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.row(1).unwrap()[1], None);
    }

    #[test]
    fn rejects_unknown_extension() {
        let err = load_table(Path::new("survey.parquet")).unwrap_err();
        assert!(matches!(err, DatasetError::UnsupportedFormat(_)));
    }

    #[test]
    fn loads_embedding_arrays() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("emb.json");
        fs::write(&path, "[[0.1, 0.2], [0.3, -0.4]]").unwrap();

        let embeddings = load_embeddings(&path).unwrap();
        assert_eq!(embeddings, vec![vec![0.1, 0.2], vec![0.3, -0.4]]);
    }

    #[test]
    fn missing_embeddings_file_reports_path() {
        let err = load_embeddings(Path::new("/nonexistent/emb.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/emb.json"));
    }

    #[test]
    fn integral_floats_render_without_fraction() {
        assert_eq!(cell_text(&Data::Float(42.0)), Some("42".to_string()));
        assert_eq!(cell_text(&Data::Float(0.5)), Some("0.5".to_string()));
        assert_eq!(cell_text(&Data::Empty), None);
    }
}
