//! Centralized model definitions
//!
//! Every model the registry can build is listed here with its factory.

use super::gemini::GeminiModel;
use super::{GeminiService, LlmService};
use std::sync::Arc;

/// LLM provider enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Gemini,
}

impl Provider {
    /// Get the display name for this provider
    pub fn display_name(self) -> &'static str {
        match self {
            Provider::Gemini => "Google Gemini",
        }
    }

    /// Get the environment variable name for this provider's API key
    pub fn api_key_env_var(self) -> &'static str {
        match self {
            Provider::Gemini => "GEMINI_API_KEY",
        }
    }
}

/// Settings shared by every model factory
#[derive(Debug, Clone, Copy)]
pub struct FactoryOptions<'a> {
    pub api_key: &'a str,
    pub gateway: Option<&'a str>,
    pub temperature: Option<f32>,
}

/// Model definition with metadata
#[derive(Debug, Clone)]
pub struct ModelDef {
    /// User-facing model ID (e.g., "gemini-1.5-flash")
    pub id: &'static str,
    /// Provider for this model
    pub provider: Provider,
    /// Human-readable description
    pub description: &'static str,
    /// Factory function to create the service
    pub factory: fn(FactoryOptions<'_>) -> Result<Arc<dyn LlmService>, String>,
}

fn gemini_factory(
    model: GeminiModel,
    options: FactoryOptions<'_>,
) -> Result<Arc<dyn LlmService>, String> {
    if options.api_key.is_empty() {
        return Err(format!(
            "{} requires {} or a gateway",
            model.model_id(),
            Provider::Gemini.api_key_env_var()
        ));
    }
    let service = GeminiService::new(
        options.api_key.to_string(),
        model,
        options.gateway,
        options.temperature,
    )
    .map_err(|e| e.message)?;
    Ok(Arc::new(service))
}

/// Get all available model definitions
pub fn all_models() -> &'static [ModelDef] {
    &[
        ModelDef {
            id: "gemini-1.5-flash",
            provider: Provider::Gemini,
            description: "Gemini 1.5 Flash (fast, default)",
            factory: |options| gemini_factory(GeminiModel::Gemini15Flash, options),
        },
        ModelDef {
            id: "gemini-1.5-pro",
            provider: Provider::Gemini,
            description: "Gemini 1.5 Pro (more capable, slower)",
            factory: |options| gemini_factory(GeminiModel::Gemini15Pro, options),
        },
    ]
}

/// Look up a model definition by ID
pub fn find_model(id: &str) -> Option<&'static ModelDef> {
    all_models().iter().find(|m| m.id == id)
}
