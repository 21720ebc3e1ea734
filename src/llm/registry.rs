//! Model registry for managing available LLM providers

use super::models::{find_model, FactoryOptions};
use super::{all_models, LlmService, LoggingService, ModelDef, Provider};
use std::collections::HashMap;
use std::sync::Arc;

/// Sampling temperature used when none is configured
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

const PREFERRED_DEFAULT: &str = "gemini-1.5-flash";

/// Configuration for LLM providers
#[derive(Debug, Clone, Default)]
pub struct LlmConfig {
    pub gemini_api_key: Option<String>,
    /// Gateway URL that proxies provider APIs and handles auth
    pub gateway: Option<String>,
    /// Default model ID
    pub default_model: Option<String>,
    pub temperature: Option<f32>,
}

impl LlmConfig {
    pub fn from_env() -> Self {
        Self {
            gemini_api_key: std::env::var(Provider::Gemini.api_key_env_var()).ok(),
            gateway: std::env::var("LLM_GATEWAY").ok(),
            default_model: std::env::var("DEFAULT_MODEL").ok(),
            temperature: std::env::var("LLM_TEMPERATURE")
                .ok()
                .and_then(|t| t.parse().ok())
                .or(Some(DEFAULT_TEMPERATURE)),
        }
    }
}

/// Registry of available LLM models
pub struct ModelRegistry {
    services: HashMap<String, Arc<dyn LlmService>>,
    default_model: String,
}

impl ModelRegistry {
    /// Create an empty registry for testing purposes
    #[cfg(test)]
    pub fn new_empty() -> Self {
        Self {
            services: HashMap::new(),
            default_model: PREFERRED_DEFAULT.to_string(),
        }
    }

    pub fn new(config: &LlmConfig) -> Self {
        let mut services: HashMap<String, Arc<dyn LlmService>> = HashMap::new();

        for model_def in all_models() {
            if let Some(service) = Self::try_create_model(model_def, config) {
                services.insert(model_def.id.to_string(), service);
            }
        }

        let default_model = config
            .default_model
            .clone()
            .filter(|id| {
                let known = services.contains_key(id);
                if !known {
                    tracing::warn!(model = %id, "Configured default model is unavailable");
                }
                known
            })
            .or_else(|| {
                if services.contains_key(PREFERRED_DEFAULT) {
                    Some(PREFERRED_DEFAULT.to_string())
                } else {
                    let mut ids: Vec<_> = services.keys().cloned().collect();
                    ids.sort();
                    ids.into_iter().next()
                }
            })
            .unwrap_or_else(|| PREFERRED_DEFAULT.to_string());

        Self {
            services,
            default_model,
        }
    }

    /// Try to create a model service, validating prerequisites
    fn try_create_model(model_def: &ModelDef, config: &LlmConfig) -> Option<Arc<dyn LlmService>> {
        // In gateway mode the gateway handles the actual authentication
        let api_key = if config.gateway.is_some() {
            "implicit".to_string()
        } else {
            match model_def.provider {
                Provider::Gemini => config.gemini_api_key.as_ref()?,
            }
            .clone()
        };

        if config.gateway.is_none() && api_key.trim().is_empty() {
            return None;
        }

        let options = FactoryOptions {
            api_key: &api_key,
            gateway: config.gateway.as_deref(),
            temperature: config.temperature,
        };

        match (model_def.factory)(options) {
            Ok(service) => Some(Arc::new(LoggingService::new(service))),
            Err(e) => {
                tracing::warn!(model = %model_def.id, error = %e, "Skipping model");
                None
            }
        }
    }

    /// Get a model by ID
    pub fn get(&self, model_id: &str) -> Option<Arc<dyn LlmService>> {
        self.services.get(model_id).cloned()
    }

    /// Get the default model
    pub fn default(&self) -> Option<Arc<dyn LlmService>> {
        self.get(&self.default_model)
    }

    /// Get the default model ID
    pub fn default_model_id(&self) -> &str {
        &self.default_model
    }

    /// List all available model IDs
    pub fn available_models(&self) -> Vec<String> {
        let mut models: Vec<_> = self.services.keys().cloned().collect();
        models.sort();
        models
    }

    /// Definitions of the models that were successfully created
    pub fn available_model_defs(&self) -> Vec<&'static ModelDef> {
        self.available_models()
            .iter()
            .filter_map(|id| find_model(id))
            .collect()
    }

    /// Check if any models are available
    pub fn has_models(&self) -> bool {
        !self.services.is_empty()
    }
}
