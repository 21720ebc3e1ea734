//! HTTP API for the chat service

mod assets;
mod handlers;
mod types;

pub use handlers::create_router;

use crate::llm::ModelRegistry;
use crate::report::PdfRenderer;
use crate::runtime::{RegistryLlmClient, SessionManager};
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionManager>,
    pub llm_registry: Arc<ModelRegistry>,
}

impl AppState {
    /// Production wiring: Gemini through the registry, PDF reports
    pub fn new(llm_registry: Arc<ModelRegistry>) -> Self {
        let llm_client = Arc::new(RegistryLlmClient::with_default_model(Arc::clone(&llm_registry)));
        let sessions = Arc::new(SessionManager::new(llm_client, Arc::new(PdfRenderer::default())));
        Self::from_parts(sessions, llm_registry)
    }

    pub fn from_parts(sessions: Arc<SessionManager>, llm_registry: Arc<ModelRegistry>) -> Self {
        Self {
            sessions,
            llm_registry,
        }
    }
}
