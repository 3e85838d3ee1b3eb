//! Retrieval over the survey datasets and generation of answers from the retrieved rows.

pub mod context;
pub mod prompt;
pub mod retriever;
mod service;

pub use retriever::find_relevant_texts;
pub use service::{DatasetStatsReport, RagOptions, RagService, RELATED_TOPICS};
