//! Survey datasets: spreadsheet rows paired with their precomputed embeddings.

mod loader;
mod stats;
mod table;

use std::fmt;
use std::str::FromStr;

use anyhow::Context;
use serde::Serialize;

use crate::core::config::{AppPaths, Settings};
use crate::core::errors::ApiError;

pub use loader::{load_embeddings, load_table, DatasetError};
pub use stats::{summarize, DatasetStats};
pub use table::Table;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    #[default]
    Sustainability,
    Christmas,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 2] = [DatasetKind::Sustainability, DatasetKind::Christmas];

    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetKind::Sustainability => "sustainability",
            DatasetKind::Christmas => "christmas",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatasetKind {
    type Err = ApiError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sustainability" => Ok(DatasetKind::Sustainability),
            "christmas" => Ok(DatasetKind::Christmas),
            other => Err(ApiError::BadRequest(format!(
                "Unknown dataset '{}': expected 'sustainability' or 'christmas'",
                other
            ))),
        }
    }
}

/// A table whose rows each carry one embedding of a shared dimension.
#[derive(Debug, Clone)]
pub struct Dataset {
    kind: DatasetKind,
    table: Table,
    embeddings: Vec<Vec<f32>>,
}

impl Dataset {
    pub fn new(
        kind: DatasetKind,
        table: Table,
        embeddings: Vec<Vec<f32>>,
    ) -> Result<Self, DatasetError> {
        if table.len() != embeddings.len() {
            return Err(DatasetError::EmbeddingCount {
                rows: table.len(),
                embeddings: embeddings.len(),
            });
        }

        if let Some(first) = embeddings.first() {
            let expected = first.len();
            if expected == 0 {
                return Err(DatasetError::EmptyEmbedding);
            }
            if let Some((row, found)) = embeddings
                .iter()
                .enumerate()
                .map(|(row, e)| (row, e.len()))
                .find(|(_, len)| *len != expected)
            {
                return Err(DatasetError::EmbeddingDimension {
                    row,
                    expected,
                    found,
                });
            }
        }

        Ok(Self {
            kind,
            table,
            embeddings,
        })
    }

    pub fn kind(&self) -> DatasetKind {
        self.kind
    }

    pub fn embeddings(&self) -> &[Vec<f32>] {
        &self.embeddings
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn dimension(&self) -> Option<usize> {
        self.embeddings.first().map(Vec::len)
    }

    pub fn row_text(&self, index: usize) -> Option<String> {
        self.table.row_text(index)
    }

    pub fn stats(&self) -> DatasetStats {
        summarize(&self.table)
    }
}

/// Both survey datasets, loaded once at startup and read-only afterwards.
#[derive(Debug, Clone)]
pub struct DatasetRegistry {
    sustainability: Dataset,
    christmas: Dataset,
}

impl DatasetRegistry {
    pub fn new(sustainability: Dataset, christmas: Dataset) -> Self {
        Self {
            sustainability,
            christmas,
        }
    }

    pub fn load(paths: &AppPaths, settings: &Settings) -> anyhow::Result<Self> {
        let sustainability = load_dataset(paths, settings, DatasetKind::Sustainability)?;
        let christmas = load_dataset(paths, settings, DatasetKind::Christmas)?;
        Ok(Self::new(sustainability, christmas))
    }

    pub fn get(&self, kind: DatasetKind) -> &Dataset {
        match kind {
            DatasetKind::Sustainability => &self.sustainability,
            DatasetKind::Christmas => &self.christmas,
        }
    }
}

fn load_dataset(
    paths: &AppPaths,
    settings: &Settings,
    kind: DatasetKind,
) -> anyhow::Result<Dataset> {
    let source = settings.source(kind);
    let table_path = paths.resolve_data_path(&source.table);
    let embeddings_path = paths.resolve_data_path(&source.embeddings);

    let table = load_table(&table_path)
        .with_context(|| format!("loading {} table from {}", kind, table_path.display()))?;
    let embeddings = load_embeddings(&embeddings_path).with_context(|| {
        format!(
            "loading {} embeddings from {}",
            kind,
            embeddings_path.display()
        )
    })?;
    let dataset = Dataset::new(kind, table, embeddings)
        .with_context(|| format!("validating {} dataset", kind))?;

    tracing::info!(
        "Loaded {} dataset: {} rows, dimension {:?}",
        kind,
        dataset.len(),
        dataset.dimension()
    );
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    fn two_row_table() -> Table {
        Table::new(
            vec![Some("Age".to_string())],
            vec![vec![Some("25".to_string())], vec![Some("40".to_string())]],
        )
    }

    #[test]
    fn dataset_kind_parses_case_insensitively() {
        assert_eq!(
            " Christmas ".parse::<DatasetKind>().unwrap(),
            DatasetKind::Christmas
        );
        assert_eq!(
            "sustainability".parse::<DatasetKind>().unwrap(),
            DatasetKind::Sustainability
        );
        assert!("easter".parse::<DatasetKind>().is_err());
    }

    #[test]
    fn dataset_requires_one_embedding_per_row() {
        let err = Dataset::new(DatasetKind::Christmas, two_row_table(), vec![vec![1.0]])
            .unwrap_err();
        assert!(matches!(
            err,
            DatasetError::EmbeddingCount {
                rows: 2,
                embeddings: 1
            }
        ));
    }

    #[test]
    fn dataset_requires_uniform_dimension() {
        let err = Dataset::new(
            DatasetKind::Christmas,
            two_row_table(),
            vec![vec![1.0, 0.0], vec![1.0]],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DatasetError::EmbeddingDimension {
                row: 1,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn registry_loads_configured_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("s.csv"), "Age,Region\n25,North\n").unwrap();
        fs::write(dir.path().join("s.json"), "[[1.0, 0.0]]").unwrap();
        fs::write(dir.path().join("c.csv"), "Age\n30\n41\n").unwrap();
        fs::write(dir.path().join("c.json"), "[[0.5], [0.25]]").unwrap();

        let settings = Settings::from_config(&json!({
            "datasets": {
                "sustainability": { "table": "s.csv", "embeddings": "s.json" },
                "christmas": { "table": "c.csv", "embeddings": "c.json" }
            }
        }));
        let paths = AppPaths::from_root(dir.path());

        let registry = DatasetRegistry::load(&paths, &settings).unwrap();
        assert_eq!(registry.get(DatasetKind::Sustainability).len(), 1);
        assert_eq!(registry.get(DatasetKind::Christmas).dimension(), Some(1));
    }

    #[test]
    fn registry_load_names_the_failing_dataset() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("s.csv"), "Age\n25\n").unwrap();
        fs::write(dir.path().join("s.json"), "[[1.0], [2.0]]").unwrap();

        let settings = Settings::from_config(&json!({
            "datasets": {
                "sustainability": { "table": "s.csv", "embeddings": "s.json" }
            }
        }));
        let paths = AppPaths::from_root(dir.path());

        let err = DatasetRegistry::load(&paths, &settings).unwrap_err();
        assert!(format!("{:#}", err).contains("sustainability"));
    }
}
