use std::collections::HashMap;

/// A loaded survey sheet: normalized headers plus rows of optional cell text.
///
/// Every row has exactly `headers().len()` cells; a `None` cell is a missing value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Table {
    /// Builds a table from a raw header row and data rows.
    ///
    /// Blank headers become `Unnamed: <column>` and repeated headers get `.1`, `.2`, ...
    /// suffixes, so every column has a unique label. Short rows are padded with
    /// missing cells; rows wider than the header widen the table.
    pub fn new(raw_headers: Vec<Option<String>>, rows: Vec<Vec<Option<String>>>) -> Self {
        let width = rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(raw_headers.len()))
            .max()
            .unwrap_or(0);

        let mut seen: HashMap<String, usize> = HashMap::new();
        let headers = (0..width)
            .map(|index| {
                let base = raw_headers
                    .get(index)
                    .cloned()
                    .flatten()
                    .map(|h| h.trim().to_string())
                    .filter(|h| !h.is_empty())
                    .unwrap_or_else(|| format!("Unnamed: {}", index));
                let count = seen.entry(base.clone()).or_insert(0);
                let label = if *count == 0 {
                    base
                } else {
                    format!("{}.{}", base, count)
                };
                *count += 1;
                label
            })
            .collect::<Vec<_>>();

        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, None);
                row.into_iter()
                    .map(|cell| cell.filter(|value| !value.is_empty()))
                    .collect()
            })
            .collect();

        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn row(&self, index: usize) -> Option<&[Option<String>]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Renders one row as a `label    value` block, one line per column.
    ///
    /// Labels are left-aligned to the widest label, values right-aligned to the
    /// widest value, and missing cells print as `NaN`. This is the text the row
    /// embeddings were computed from, so the layout must stay stable.
    pub fn row_text(&self, index: usize) -> Option<String> {
        let row = self.rows.get(index)?;
        let values = row
            .iter()
            .map(|cell| cell.as_deref().unwrap_or("NaN"))
            .collect::<Vec<_>>();

        let label_width = self
            .headers
            .iter()
            .map(|h| h.chars().count())
            .max()
            .unwrap_or(0);
        let value_width = values.iter().map(|v| v.chars().count()).max().unwrap_or(0);

        let lines = self
            .headers
            .iter()
            .zip(values)
            .map(|(label, value)| {
                format!(
                    "{:<label_width$}    {:>value_width$}",
                    label,
                    value,
                    label_width = label_width,
                    value_width = value_width
                )
            })
            .collect::<Vec<_>>();

        Some(lines.join("\n"))
    }
}
