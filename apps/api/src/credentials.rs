//! Credential store for the single Gemini API key, persisted to a small JSON file.
//!
//! Loaded once at startup and rewritten on every change. No encryption, no expiry.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::RwLock;
use tracing::info;

/// Key under which the API key is stored in the credential file.
pub const CREDENTIAL_KEY: &str = "gemini-api-key";

#[derive(Clone)]
pub struct CredentialStore {
    path: PathBuf,
    api_key: Arc<RwLock<String>>,
}

impl CredentialStore {
    /// Reads the credential file. A missing file (or one without the key) means
    /// "no key yet" and `seed` fills the store without writing it to disk.
    /// A stored empty key is an explicit clear and is never replaced by `seed`.
    pub async fn load(path: impl Into<PathBuf>, seed: Option<String>) -> Result<Self> {
        let path = path.into();
        let stored = read_credential_file(&path).await?;

        let api_key = match (stored, seed) {
            (Some(key), _) => key,
            (None, Some(seed)) => {
                info!("No stored credential; using GEMINI_API_KEY from environment");
                seed
            }
            (None, None) => String::new(),
        };

        info!(
            "Credential store loaded from {} (key configured: {})",
            path.display(),
            !api_key.trim().is_empty()
        );

        Ok(Self {
            path,
            api_key: Arc::new(RwLock::new(api_key)),
        })
    }

    pub async fn get(&self) -> String {
        self.api_key.read().await.clone()
    }

    /// Replaces the key and rewrites the credential file.
    pub async fn set(&self, api_key: String) -> Result<()> {
        let mut current = self.api_key.write().await;
        write_credential_file(&self.path, &api_key).await?;
        *current = api_key;
        Ok(())
    }

    pub async fn is_configured(&self) -> bool {
        !self.api_key.read().await.trim().is_empty()
    }

    /// Last four characters of the key behind a mask, e.g. `****abcd`.
    pub async fn hint(&self) -> Option<String> {
        mask_key(&self.api_key.read().await)
    }
}

async fn read_credential_file(path: &Path) -> Result<Option<String>> {
    let contents = match tokio::fs::read_to_string(path).await {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read {}", path.display()));
        }
    };

    let entries: BTreeMap<String, String> = serde_json::from_str(&contents)
        .with_context(|| format!("Credential file {} is not valid JSON", path.display()))?;

    Ok(entries.get(CREDENTIAL_KEY).cloned())
}

/// Writes to a sibling temp file then renames, so a crash never leaves a half-written file.
async fn write_credential_file(path: &Path, api_key: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let mut entries = BTreeMap::new();
    entries.insert(CREDENTIAL_KEY, api_key);
    let body = serde_json::to_string_pretty(&entries).context("Failed to encode credentials")?;

    let tmp = path.with_extension("tmp");
    tokio::fs::write(&tmp, body)
        .await
        .with_context(|| format!("Failed to write {}", tmp.display()))?;
    tokio::fs::rename(&tmp, path)
        .await
        .with_context(|| format!("Failed to replace {}", path.display()))?;
    Ok(())
}

fn mask_key(key: &str) -> Option<String> {
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    let chars: Vec<char> = key.chars().collect();
    let visible: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    Some(format!("****{visible}"))
}
