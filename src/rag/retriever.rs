use crate::core::errors::ApiError;
use crate::dataset::Dataset;
use crate::vector_math::top_k_indices;

/// Returns the text of the `top_n` rows most similar to `query_embedding`, best first.
pub fn find_relevant_texts(
    dataset: &Dataset,
    query_embedding: &[f32],
    top_n: usize,
) -> Result<Vec<String>, ApiError> {
    if dataset.is_empty() || top_n == 0 {
        return Ok(Vec::new());
    }

    if let Some(dimension) = dataset.dimension() {
        if dimension != query_embedding.len() {
            return Err(ApiError::Internal(format!(
                "Query embedding has dimension {}, but the {} dataset uses {}",
                query_embedding.len(),
                dataset.kind(),
                dimension
            )));
        }
    }

    let indices = top_k_indices(query_embedding, dataset.embeddings(), top_n)?;
    let texts = indices
        .into_iter()
        .filter_map(|idx| dataset.row_text(idx))
        .collect::<Vec<_>>();

    tracing::debug!(
        "Retrieved {} of {} rows from {} dataset",
        texts.len(),
        dataset.len(),
        dataset.kind()
    );
    Ok(texts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{DatasetKind, Table};

    fn dataset() -> Dataset {
        let table = Table::new(
            vec![Some("Answer".to_string())],
            vec![
                vec![Some("recycle".to_string())],
                vec![Some("turkey".to_string())],
                vec![Some("compost".to_string())],
            ],
        );
        Dataset::new(
            DatasetKind::Sustainability,
            table,
            vec![vec![0.9, 0.1], vec![0.0, 1.0], vec![1.0, 0.0]],
        )
        .unwrap()
    }

    #[test]
    fn returns_best_rows_first() {
        let texts = find_relevant_texts(&dataset(), &[1.0, 0.0], 2).unwrap();
        assert_eq!(texts, vec!["Answer    compost", "Answer    recycle"]);
    }

    #[test]
    fn top_n_larger_than_dataset_returns_all_rows() {
        let texts = find_relevant_texts(&dataset(), &[1.0, 0.0], 5).unwrap();
        assert_eq!(texts.len(), 3);
        assert_eq!(texts[2], "Answer    turkey");
    }

    #[test]
    fn dimension_mismatch_is_an_error() {
        let err = find_relevant_texts(&dataset(), &[1.0, 0.0, 0.0], 2).unwrap_err();
        assert!(err.to_string().contains("dimension 3"));
    }
}
