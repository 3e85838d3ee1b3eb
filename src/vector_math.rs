use std::cmp::Ordering;

use ndarray::{Array1, ArrayView1};

use crate::core::errors::ApiError;

pub fn cosine_similarity(query: &[f32], candidate: &[f32]) -> Result<f32, ApiError> {
    if query.is_empty() || candidate.is_empty() {
        return Err(ApiError::BadRequest(
            "Vectors must not be empty".to_string(),
        ));
    }
    if query.len() != candidate.len() {
        return Err(ApiError::Internal(format!(
            "Vector length mismatch: {} != {}",
            query.len(),
            candidate.len()
        )));
    }

    // f64 accumulation keeps large components from overflowing the norm.
    let query_vec = widen(query);
    let candidate_vec = widen(candidate);

    let dot = query_vec.dot(&candidate_vec);
    let denom = l2_norm(&query_vec) * l2_norm(&candidate_vec);
    if !denom.is_finite() || denom <= f64::EPSILON {
        return Ok(0.0);
    }

    Ok((dot / denom).clamp(-1.0, 1.0) as f32)
}

/// Scores every candidate against `query`, best first. Equal scores keep input order.
pub fn rank_descending_by_cosine(
    query: &[f32],
    candidates: &[Vec<f32>],
) -> Result<Vec<(usize, f32)>, ApiError> {
    let mut scores = Vec::with_capacity(candidates.len());
    for (idx, candidate) in candidates.iter().enumerate() {
        let score = cosine_similarity(query, candidate)?;
        scores.push((idx, score));
    }

    scores.sort_by(|left, right| right.1.partial_cmp(&left.1).unwrap_or(Ordering::Equal));
    Ok(scores)
}

pub fn top_k_indices(
    query: &[f32],
    candidates: &[Vec<f32>],
    k: usize,
) -> Result<Vec<usize>, ApiError> {
    let ranked = rank_descending_by_cosine(query, candidates)?;
    Ok(ranked.into_iter().take(k).map(|(idx, _)| idx).collect())
}

fn widen(values: &[f32]) -> Array1<f64> {
    ArrayView1::from(values).mapv(f64::from)
}

fn l2_norm(values: &Array1<f64>) -> f64 {
    values.dot(values).sqrt()
}
