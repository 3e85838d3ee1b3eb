use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::core::config::{AppPaths, ConfigService, Settings};
use crate::dataset::DatasetRegistry;
use crate::llm::OpenAiProvider;
use crate::rag::{RagOptions, RagService};

pub mod error;

use error::InitializationError;

/// Global application state shared across all routes.
///
/// Everything here is read-only after startup: the datasets and their
/// embeddings are loaded once and never updated in place.
#[derive(Clone)]
pub struct AppState {
    pub paths: Arc<AppPaths>,
    pub config: ConfigService,
    pub settings: Arc<Settings>,
    pub rag: RagService,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Initializes the application state.
    ///
    /// This process includes:
    /// 1. Loading configuration from `paths`
    /// 2. Loading both survey tables and their embedding files
    /// 3. Creating the hosted LLM client
    pub fn initialize_with_paths(paths: Arc<AppPaths>) -> Result<Arc<Self>, InitializationError> {
        let config = ConfigService::new(paths.clone());
        let raw_config = config
            .load_config()
            .map_err(|e| InitializationError::Config(e.into()))?;
        let mut settings = Settings::from_config(&raw_config);
        settings.apply_env_overrides();

        let datasets = DatasetRegistry::load(paths.as_ref(), &settings)
            .map_err(InitializationError::Datasets)?;

        let llm = OpenAiProvider::from_settings(&settings.llm)
            .map_err(|e| InitializationError::Llm(e.into()))?;

        let rag = RagService::new(
            Arc::new(llm),
            Arc::new(datasets),
            RagOptions::from_settings(&settings),
        );

        Ok(Self::from_parts(paths, config, settings, rag))
    }

    /// Assembles state from already-built parts.
    pub fn from_parts(
        paths: Arc<AppPaths>,
        config: ConfigService,
        settings: Settings,
        rag: RagService,
    ) -> Arc<Self> {
        Arc::new(AppState {
            paths,
            config,
            settings: Arc::new(settings),
            rag,
            started_at: Utc::now(),
        })
    }
}
