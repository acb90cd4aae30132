//! Remote per-user history store.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::HistoryEntry;

/// Errors from the remote history store.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history store request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("history store returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("history entry has no user id")]
    MissingUser,
}

/// Append-only store of history entries, keyed by the entry's user id.
#[async_trait]
pub trait RemoteHistoryStore: Send + Sync {
    /// Append one entry; returns the id the store assigned to it.
    async fn append(&self, entry: &HistoryEntry, token: Option<&str>)
        -> Result<String, HistoryError>;
}

#[derive(Deserialize)]
struct AppendResponse {
    #[serde(default)]
    id: Option<String>,
}

/// HTTP history store posting to `{base}/users/{user_id}/analysis_history`.
pub struct HttpHistoryStore {
    client: Client,
    base_url: String,
}

impl HttpHistoryStore {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn collection_url(&self, user_id: &str) -> String {
        format!(
            "{}/users/{}/analysis_history",
            self.base_url,
            urlencoding::encode(user_id)
        )
    }
}

#[async_trait]
impl RemoteHistoryStore for HttpHistoryStore {
    async fn append(
        &self,
        entry: &HistoryEntry,
        token: Option<&str>,
    ) -> Result<String, HistoryError> {
        let user_id = entry.user_id().ok_or(HistoryError::MissingUser)?;
        let url = self.collection_url(user_id);

        debug!(url = %url, entry_id = entry.id(), "appending history entry");
        let mut request = self.client.post(&url).json(entry);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(HistoryError::Server {
                status: status.as_u16(),
                body,
            });
        }

        // Stores that do not echo an id keep the entry's own.
        let body = resp.text().await.unwrap_or_default();
        let id = serde_json::from_str::<AppendResponse>(&body)
            .ok()
            .and_then(|r| r.id)
            .unwrap_or_else(|| entry.id().to_string());

        info!(id = %id, "analysis saved to remote history");
        Ok(id)
    }
}
