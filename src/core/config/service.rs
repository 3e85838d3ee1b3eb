use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Map, Value};

use super::paths::AppPaths;
use super::validation::validate_config;
use crate::core::errors::ApiError;

const REDACT_PLACEHOLDER: &str = "****";

const SENSITIVE_PATTERNS: [&str; 12] = [
    "api_key",
    "secret",
    "password",
    "_token",
    "token_",
    "credential",
    "private_key",
    "auth_",
    "_auth",
    "access_key",
    "access_token",
    "bearer",
];

const SENSITIVE_WHITELIST: [&str; 4] = [
    "max_tokens",
    "sentiment_max_tokens",
    "total_tokens",
    "tokens",
];

#[derive(Clone)]
pub struct ConfigService {
    paths: Arc<AppPaths>,
}

impl ConfigService {
    pub fn new(paths: Arc<AppPaths>) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &AppPaths {
        &self.paths
    }

    pub fn config_path(&self) -> PathBuf {
        if let Ok(path) = env::var("SURVEY_RAG_CONFIG_PATH") {
            return PathBuf::from(path);
        }

        let user_config = self.paths.user_data_dir.join("config.yml");
        if user_config.exists() {
            return user_config;
        }

        self.paths.project_root.join("config.yml")
    }

    pub fn secrets_path(&self) -> PathBuf {
        self.paths.secrets_path.clone()
    }

    /// Loads `config.yml` with `secrets.yaml` merged on top and validates the result.
    pub fn load_config(&self) -> Result<Value, ApiError> {
        let mut config = read_yaml_object(&self.config_path());
        merge_into(&mut config, read_yaml_object(&self.secrets_path()));
        validate_config(&config)?;
        Ok(config)
    }

    pub fn redact_sensitive_values(&self, value: &Value) -> Value {
        redact(value)
    }
}

/// Missing, unreadable or non-mapping files all count as an empty mapping.
fn read_yaml_object(path: &Path) -> Value {
    let empty = || Value::Object(Map::new());
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            if path.exists() {
                tracing::warn!("Cannot read config {}: {}", path.display(), err);
            }
            return empty();
        }
    };

    match serde_yaml::from_str::<Value>(&contents) {
        Ok(value) if value.is_object() => value,
        Ok(_) => empty(),
        Err(err) => {
            tracing::warn!("Ignoring unparseable config {}: {}", path.display(), err);
            empty()
        }
    }
}

/// Mappings merge key by key; anything else in `overlay` replaces `target`.
fn merge_into(target: &mut Value, overlay: Value) {
    match (target, overlay) {
        (Value::Object(target_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match target_map.get_mut(&key) {
                    Some(existing) => merge_into(existing, value),
                    None => {
                        target_map.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

fn redact(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, val)| {
                    let val = if is_sensitive_key(key) && !val.is_null() {
                        Value::String(REDACT_PLACEHOLDER.to_string())
                    } else {
                        redact(val)
                    };
                    (key.clone(), val)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(redact).collect()),
        _ => value.clone(),
    }
}

fn is_sensitive_key(key: &str) -> bool {
    let key = key.to_lowercase();
    !SENSITIVE_WHITELIST.contains(&key.as_str())
        && SENSITIVE_PATTERNS.iter().any(|pattern| key.contains(pattern))
}
