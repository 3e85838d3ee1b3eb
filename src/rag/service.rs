use std::sync::Arc;

use serde::Serialize;

use super::context::{comparison_context, demographics_context, join_rows};
use super::prompt::{answer_request, sentiment_request};
use super::retriever::find_relevant_texts;
use crate::core::config::Settings;
use crate::core::errors::ApiError;
use crate::dataset::{DatasetKind, DatasetRegistry, DatasetStats};
use crate::llm::LlmProvider;

pub const RELATED_TOPICS: [&str; 5] = [
    "Sustainable Shopping",
    "Eco-Friendly Gifts",
    "Consumer Spending",
    "Holiday Activities",
    "Budgeting & Financial Planning",
];

/// Limits applied to every query.
#[derive(Debug, Clone)]
pub struct RagOptions {
    pub top_k: usize,
    pub max_input_length: usize,
    pub max_tokens: u32,
    pub sentiment_max_tokens: u32,
}

impl RagOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            top_k: settings.retrieval.top_k,
            max_input_length: settings.retrieval.max_input_length,
            max_tokens: settings.llm.max_tokens,
            sentiment_max_tokens: settings.llm.sentiment_max_tokens,
        }
    }
}

impl Default for RagOptions {
    fn default() -> Self {
        Self::from_settings(&Settings::from_config(&serde_json::Value::Null))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetStatsReport {
    pub sustainability: DatasetStats,
    pub christmas: DatasetStats,
}

/// Embeds a question, pulls the closest survey rows and asks the chat model about them.
///
/// Every operation embeds the query once, even when it searches both datasets.
#[derive(Clone)]
pub struct RagService {
    llm: Arc<dyn LlmProvider>,
    datasets: Arc<DatasetRegistry>,
    options: RagOptions,
}

impl RagService {
    pub fn new(
        llm: Arc<dyn LlmProvider>,
        datasets: Arc<DatasetRegistry>,
        options: RagOptions,
    ) -> Self {
        Self {
            llm,
            datasets,
            options,
        }
    }

    pub fn llm(&self) -> &Arc<dyn LlmProvider> {
        &self.llm
    }

    pub fn datasets(&self) -> &DatasetRegistry {
        &self.datasets
    }

    pub fn options(&self) -> &RagOptions {
        &self.options
    }

    /// Answers from the top rows of both datasets.
    pub async fn analyze(&self, query: &str) -> Result<String, ApiError> {
        let query = self.validate_query(query)?;
        let rows = self.rows_from_both(query).await?;
        self.answer(query, &join_rows(&rows)).await
    }

    /// Like [`analyze`](Self::analyze), framed as a comparison of findings.
    pub async fn compare(&self, query: &str) -> Result<String, ApiError> {
        let query = self.validate_query(query)?;
        let rows = self.rows_from_both(query).await?;
        self.answer(query, &comparison_context(&rows)).await
    }

    /// Answers from one dataset (sustainability or christmas insights).
    pub async fn insights(&self, query: &str, kind: DatasetKind) -> Result<String, ApiError> {
        self.custom_query(query, kind).await
    }

    pub async fn custom_query(&self, query: &str, kind: DatasetKind) -> Result<String, ApiError> {
        let query = self.validate_query(query)?;
        let embedding = self.embed_query(query).await?;
        let rows = self.retrieve(kind, &embedding, self.options.top_k)?;
        self.answer(query, &join_rows(&rows)).await
    }

    /// Returns the closest rows without calling the chat model.
    pub async fn retrieve_entries(
        &self,
        query: &str,
        kind: DatasetKind,
        top_n: Option<usize>,
    ) -> Result<Vec<String>, ApiError> {
        let query = self.validate_query(query)?;
        let embedding = self.embed_query(query).await?;
        self.retrieve(kind, &embedding, top_n.unwrap_or(self.options.top_k))
    }

    pub async fn compare_demographics(&self, query: &str) -> Result<String, ApiError> {
        let query = self.validate_query(query)?;
        let embedding = self.embed_query(query).await?;
        let sustainability =
            self.retrieve(DatasetKind::Sustainability, &embedding, self.options.top_k)?;
        let christmas = self.retrieve(DatasetKind::Christmas, &embedding, self.options.top_k)?;
        self.answer(query, &demographics_context(&sustainability, &christmas))
            .await
    }

    pub async fn sentiment_analysis(
        &self,
        query: &str,
        kind: DatasetKind,
    ) -> Result<String, ApiError> {
        let query = self.validate_query(query)?;
        let embedding = self.embed_query(query).await?;
        let rows = self.retrieve(kind, &embedding, self.options.top_k)?;
        let request = sentiment_request(&join_rows(&rows), self.options.sentiment_max_tokens);
        let response = self.llm.chat(request).await?;
        tracing::debug!("Sentiment response: {}", response);
        Ok(response)
    }

    pub fn related_topics(&self) -> Vec<String> {
        RELATED_TOPICS.iter().map(|topic| topic.to_string()).collect()
    }

    pub fn dataset_stats(&self) -> DatasetStatsReport {
        DatasetStatsReport {
            sustainability: self.datasets.get(DatasetKind::Sustainability).stats(),
            christmas: self.datasets.get(DatasetKind::Christmas).stats(),
        }
    }

    fn validate_query<'a>(&self, query: &'a str) -> Result<&'a str, ApiError> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(ApiError::BadRequest("Query text must not be empty".to_string()));
        }
        let length = trimmed.chars().count();
        if length > self.options.max_input_length {
            return Err(ApiError::BadRequest(format!(
                "Query text is {} characters, limit is {}",
                length, self.options.max_input_length
            )));
        }
        Ok(trimmed)
    }

    async fn embed_query(&self, query: &str) -> Result<Vec<f32>, ApiError> {
        let mut embeddings = self.llm.embed(&[query.to_string()]).await?;
        if embeddings.len() != 1 {
            return Err(ApiError::Upstream(format!(
                "Expected one query embedding, got {}",
                embeddings.len()
            )));
        }
        Ok(embeddings.swap_remove(0))
    }

    async fn rows_from_both(&self, query: &str) -> Result<Vec<String>, ApiError> {
        let embedding = self.embed_query(query).await?;
        let mut rows = self.retrieve(DatasetKind::Sustainability, &embedding, self.options.top_k)?;
        rows.extend(self.retrieve(DatasetKind::Christmas, &embedding, self.options.top_k)?);
        Ok(rows)
    }

    fn retrieve(
        &self,
        kind: DatasetKind,
        embedding: &[f32],
        top_n: usize,
    ) -> Result<Vec<String>, ApiError> {
        let rows = find_relevant_texts(self.datasets.get(kind), embedding, top_n)?;
        tracing::info!("Retrieved {} rows from {} dataset", rows.len(), kind);
        Ok(rows)
    }

    async fn answer(&self, query: &str, context: &str) -> Result<String, ApiError> {
        let request = answer_request(query, context, self.options.max_tokens);
        let response = self.llm.chat(request).await?;
        tracing::debug!("Response: {}", response);
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::dataset::{Dataset, Table};
    use crate::llm::ChatRequest;

    /// Embeds text containing "green" as [1, 0] and anything else as [0, 1];
    /// answers every chat with a fixed string and records the requests.
    #[derive(Default)]
    struct ScriptedProvider {
        embed_calls: Mutex<Vec<Vec<String>>>,
        chats: Mutex<Vec<ChatRequest>>,
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn health_check(&self) -> Result<bool, ApiError> {
            Ok(true)
        }

        async fn chat(&self, request: ChatRequest) -> Result<String, ApiError> {
            self.chats.lock().unwrap().push(request);
            Ok("scripted answer".to_string())
        }

        async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, ApiError> {
            self.embed_calls.lock().unwrap().push(inputs.to_vec());
            Ok(inputs
                .iter()
                .map(|text| {
                    if text.contains("green") {
                        vec![1.0, 0.0]
                    } else {
                        vec![0.0, 1.0]
                    }
                })
                .collect())
        }
    }

    fn dataset(kind: DatasetKind, answers: &[(&str, [f32; 2])]) -> Dataset {
        let table = Table::new(
            vec![Some("Answer".to_string())],
            answers
                .iter()
                .map(|(text, _)| vec![Some(text.to_string())])
                .collect(),
        );
        let embeddings = answers.iter().map(|(_, e)| e.to_vec()).collect();
        Dataset::new(kind, table, embeddings).unwrap()
    }

    fn service(top_k: usize) -> (RagService, Arc<ScriptedProvider>) {
        let provider = Arc::new(ScriptedProvider::default());
        let registry = DatasetRegistry::new(
            dataset(
                DatasetKind::Sustainability,
                &[("solar", [0.9, 0.1]), ("diesel", [0.1, 0.9]), ("wind", [1.0, 0.0])],
            ),
            dataset(
                DatasetKind::Christmas,
                &[("tree", [0.8, 0.2]), ("turkey", [0.0, 1.0])],
            ),
        );
        let options = RagOptions {
            top_k,
            ..RagOptions::default()
        };
        let service = RagService::new(provider.clone(), Arc::new(registry), options);
        (service, provider)
    }

    #[tokio::test]
    async fn analyze_embeds_once_and_uses_both_datasets() {
        let (service, provider) = service(2);

        let answer = service.analyze("  green gifts? ").await.unwrap();

        assert_eq!(answer, "scripted answer");
        assert_eq!(
            *provider.embed_calls.lock().unwrap(),
            vec![vec!["green gifts?".to_string()]]
        );
        let chats = provider.chats.lock().unwrap();
        assert_eq!(chats.len(), 1);
        assert_eq!(chats[0].max_tokens, Some(150));
        assert_eq!(
            chats[0].messages[1].content,
            "Based on the question: 'green gifts?', here's the analysis:\n\
             Answer    wind\n\nAnswer    solar\n\nAnswer    tree\n\nAnswer    turkey\n\nAnswer:"
        );
    }

    #[tokio::test]
    async fn compare_prefixes_context() {
        let (service, provider) = service(1);

        service.compare("green").await.unwrap();

        let chats = provider.chats.lock().unwrap();
        assert!(chats[0].messages[1]
            .content
            .contains("here's the analysis:\nComparison of findings:\n\nAnswer    wind\n\nAnswer    tree\n"));
    }

    #[tokio::test]
    async fn insights_stay_within_one_dataset() {
        let (service, provider) = service(2);

        service
            .insights("green energy", DatasetKind::Sustainability)
            .await
            .unwrap();

        let chats = provider.chats.lock().unwrap();
        assert_eq!(
            chats[0].messages[1].content,
            "Based on the question: 'green energy', here's the analysis:\n\
             Answer    wind\n\nAnswer    solar\n\nAnswer:"
        );
        assert_eq!(provider.embed_calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn retrieve_entries_skips_generation() {
        let (service, provider) = service(5);

        let rows = service
            .retrieve_entries("what about roast dinners", DatasetKind::Christmas, Some(1))
            .await
            .unwrap();

        assert_eq!(rows, vec!["Answer    turkey".to_string()]);
        assert!(provider.chats.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn sentiment_uses_sentiment_budget() {
        let (service, provider) = service(1);

        service
            .sentiment_analysis("green", DatasetKind::Sustainability)
            .await
            .unwrap();

        let chats = provider.chats.lock().unwrap();
        assert_eq!(chats[0].max_tokens, Some(1000));
        assert_eq!(
            chats[0].messages[1].content,
            "Analyze the sentiment of the following context: Answer    wind"
        );
    }

    #[tokio::test]
    async fn demographics_lists_both_datasets() {
        let (service, provider) = service(1);

        service.compare_demographics("green").await.unwrap();

        let chats = provider.chats.lock().unwrap();
        assert!(chats[0].messages[1].content.contains(
            "Sustainability Data:\n['Answer    wind']\n\nChristmas Data:\n['Answer    tree']"
        ));
    }

    #[tokio::test]
    async fn empty_and_oversized_queries_are_rejected() {
        let (mut service, provider) = service(1);
        service.options.max_input_length = 10;

        assert!(matches!(
            service.analyze("   ").await,
            Err(ApiError::BadRequest(_))
        ));
        assert!(matches!(
            service.custom_query("this is far too long", DatasetKind::Christmas).await,
            Err(ApiError::BadRequest(_))
        ));
        assert!(provider.embed_calls.lock().unwrap().is_empty());
    }

    #[test]
    fn stats_cover_both_datasets() {
        let (service, _) = service(1);
        let report = service.dataset_stats();

        assert_eq!(report.sustainability.rows, 3);
        assert_eq!(report.christmas.rows, 2);
        assert_eq!(service.related_topics().len(), 5);
    }
}
