use std::sync::Arc;

use crate::credentials::CredentialStore;
use crate::feedback::session::SessionRegistry;
use crate::llm_client::FeedbackModel;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable model backend. Default: `GeminiClient`.
    pub model: Arc<dyn FeedbackModel>,
    /// The user's API key; read on every submission, rewritten on every edit.
    pub credentials: CredentialStore,
    pub sessions: Arc<SessionRegistry>,
}
