use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CredentialStatus {
    pub configured: bool,
    /// Masked tail of the key; the key itself is never returned.
    pub hint: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCredential {
    pub api_key: String,
}

/// GET /api/v1/credential
pub async fn handle_get_credential(State(state): State<AppState>) -> Json<CredentialStatus> {
    Json(CredentialStatus {
        configured: state.credentials.is_configured().await,
        hint: state.credentials.hint().await,
    })
}

/// PUT /api/v1/credential
///
/// Stores the key as given (an empty string clears it) and rewrites the credential file.
pub async fn handle_put_credential(
    State(state): State<AppState>,
    Json(req): Json<UpdateCredential>,
) -> Result<StatusCode, AppError> {
    let configured = !req.api_key.trim().is_empty();
    state.credentials.set(req.api_key).await?;
    info!(configured, "API key updated");
    Ok(StatusCode::NO_CONTENT)
}
