//! Analysis history.
//!
//! Entries go to the remote per-user store when a user is signed in, and to a
//! capped local list otherwise or when the remote append fails. Recording never
//! fails the calling flow: problems are logged and the analysis carries on.

mod auth;
mod local;
mod remote;

pub use auth::AuthState;
pub use local::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use remote::{HistoryError, HttpHistoryStore, RemoteHistoryStore};

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::models::{AnalysisResult, HistoryEntry};

/// Maximum number of entries kept in the local list.
pub const MAX_HISTORY_ENTRIES: usize = 50;

/// Storage key of the local list.
pub const HISTORY_STORAGE_KEY: &str = "analysisHistory";

/// Where an entry ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Appended to the remote store under the given id.
    Remote { id: String },
    /// Prepended to the local list.
    Local,
    /// Neither backend accepted the entry (already logged).
    Failed,
}

/// History recorder over an injected local store and optional remote store.
#[derive(Clone)]
pub struct HistoryStore {
    local: Arc<dyn KeyValueStore>,
    remote: Option<Arc<dyn RemoteHistoryStore>>,
}

impl HistoryStore {
    pub fn new(local: Arc<dyn KeyValueStore>, remote: Option<Arc<dyn RemoteHistoryStore>>) -> Self {
        Self { local, remote }
    }

    /// Local-only history.
    pub fn local_only(local: Arc<dyn KeyValueStore>) -> Self {
        Self::new(local, None)
    }

    /// Record a successful analysis.
    pub async fn record(&self, result: &AnalysisResult, auth: &AuthState) -> RecordOutcome {
        let entry = HistoryEntry::from_result(result, Utc::now());
        self.record_entry(entry, auth).await
    }

    /// Record a prepared entry; see [`HistoryStore::record`].
    pub async fn record_entry(&self, entry: HistoryEntry, auth: &AuthState) -> RecordOutcome {
        if let (Some(remote), Some(user_id)) = (&self.remote, auth.user_id()) {
            match remote.append(&entry.for_user(user_id), auth.token()).await {
                Ok(id) => return RecordOutcome::Remote { id },
                Err(e) => {
                    error!(error = %e, entry_id = entry.id(), "error saving to remote history, using local list");
                }
            }
        }

        match self.push_local(entry) {
            Ok(()) => {
                info!("analysis saved to local history");
                RecordOutcome::Local
            }
            Err(e) => {
                error!(error = %e, "error saving to history");
                RecordOutcome::Failed
            }
        }
    }

    /// Local entries, most recent first. Unreadable data yields an empty list.
    pub fn local_entries(&self) -> Vec<HistoryEntry> {
        match self.stored_entries() {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "could not read local history");
                Vec::new()
            }
        }
    }

    /// Find a local entry by id.
    pub fn find(&self, id: &str) -> Option<HistoryEntry> {
        self.local_entries().into_iter().find(|e| e.id() == id)
    }

    /// Absent or malformed data reads as empty; a failed read is an error, so
    /// the list is never overwritten from a read that did not happen.
    fn stored_entries(&self) -> Result<Vec<HistoryEntry>, StorageError> {
        let raw = match self.local.get(HISTORY_STORAGE_KEY)? {
            Some(raw) => raw,
            None => return Ok(Vec::new()),
        };

        match serde_json::from_str(&raw) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!(error = %e, "discarding malformed local history");
                Ok(Vec::new())
            }
        }
    }

    fn push_local(&self, entry: HistoryEntry) -> Result<(), StorageError> {
        let mut entries = self.stored_entries()?;
        let entry = entry.with_unique_id(|id| entries.iter().any(|e| e.id() == id));
        entries.insert(0, entry);
        entries.truncate(MAX_HISTORY_ENTRIES);

        let json = serde_json::to_string(&entries)?;
        self.local.set(HISTORY_STORAGE_KEY, &json)?;
        debug!(count = entries.len(), "local history written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnalysisStatus;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn result(name: &str) -> AnalysisResult {
        AnalysisResult {
            status: AnalysisStatus::Success,
            analysis_type: "summary".into(),
            result: Some(format!("analysis of {}", name)),
            document_name: Some(name.to_string()),
            document_length: None,
            compliance: None,
            message: None,
        }
    }

    fn entry_at(n: i64) -> HistoryEntry {
        let base = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        HistoryEntry::from_result(&result(&format!("doc-{}", n)), base + Duration::seconds(n))
    }

    #[derive(Default)]
    struct RecordingRemote {
        calls: AtomicUsize,
        fail: bool,
        seen: Mutex<Vec<(HistoryEntry, Option<String>)>>,
    }

    #[async_trait]
    impl RemoteHistoryStore for RecordingRemote {
        async fn append(
            &self,
            entry: &HistoryEntry,
            token: Option<&str>,
        ) -> Result<String, HistoryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen
                .lock()
                .unwrap()
                .push((entry.clone(), token.map(String::from)));
            if self.fail {
                Err(HistoryError::Server {
                    status: 503,
                    body: "unavailable".into(),
                })
            } else {
                Ok("remote-1".into())
            }
        }
    }

    fn signed_in() -> AuthState {
        AuthState::SignedIn {
            user_id: "uid-42".into(),
            token: Some("tok".into()),
        }
    }

    #[tokio::test]
    async fn test_anonymous_records_locally() {
        let store = HistoryStore::local_only(Arc::new(MemoryStore::new()));
        let outcome = store.record(&result("a.pdf"), &AuthState::Anonymous).await;
        assert_eq!(outcome, RecordOutcome::Local);

        let entries = store.local_entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].filename(), "a.pdf");
        assert!(entries[0].user_id().is_none());
    }

    #[tokio::test]
    async fn test_cap_evicts_oldest() {
        let store = HistoryStore::local_only(Arc::new(MemoryStore::new()));
        for n in 0..51 {
            store.record_entry(entry_at(n), &AuthState::Anonymous).await;
        }

        let entries = store.local_entries();
        assert_eq!(entries.len(), MAX_HISTORY_ENTRIES);
        assert_eq!(entries[0].filename(), "doc-50");
        assert_eq!(entries[49].filename(), "doc-1");
        assert!(entries.iter().all(|e| e.filename() != "doc-0"));
    }

    #[tokio::test]
    async fn test_remote_success_skips_local() {
        let local = Arc::new(MemoryStore::new());
        let remote = Arc::new(RecordingRemote::default());
        let store = HistoryStore::new(local.clone(), Some(remote.clone()));

        let outcome = store.record(&result("b.pdf"), &signed_in()).await;
        assert_eq!(
            outcome,
            RecordOutcome::Remote {
                id: "remote-1".into()
            }
        );
        assert!(store.local_entries().is_empty());
        assert_eq!(local.get(HISTORY_STORAGE_KEY).unwrap(), None);

        let seen = remote.seen.lock().unwrap();
        assert_eq!(seen[0].0.user_id(), Some("uid-42"));
        assert_eq!(seen[0].1.as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn test_remote_failure_falls_back_once() {
        let remote = Arc::new(RecordingRemote {
            fail: true,
            ..Default::default()
        });
        let store = HistoryStore::new(Arc::new(MemoryStore::new()), Some(remote.clone()));

        let outcome = store.record(&result("c.pdf"), &signed_in()).await;
        assert_eq!(outcome, RecordOutcome::Local);
        assert_eq!(remote.calls.load(Ordering::SeqCst), 1);

        let entries = store.local_entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].filename(), "c.pdf");
        assert!(entries[0].user_id().is_none());
    }

    #[tokio::test]
    async fn test_anonymous_never_calls_remote() {
        let remote = Arc::new(RecordingRemote::default());
        let store = HistoryStore::new(Arc::new(MemoryStore::new()), Some(remote.clone()));

        store.record(&result("d.pdf"), &AuthState::Anonymous).await;
        assert_eq!(remote.calls.load(Ordering::SeqCst), 0);
        assert_eq!(store.local_entries().len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_local_data_is_replaced() {
        let local = Arc::new(MemoryStore::new());
        local.set(HISTORY_STORAGE_KEY, "{not json").unwrap();
        let store = HistoryStore::local_only(local);

        assert!(store.local_entries().is_empty());
        let outcome = store.record(&result("e.pdf"), &AuthState::Anonymous).await;
        assert_eq!(outcome, RecordOutcome::Local);
        assert_eq!(store.local_entries().len(), 1);
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let store = HistoryStore::local_only(Arc::new(MemoryStore::new()));
        let entry = entry_at(3);
        let id = entry.id().to_string();
        store.record_entry(entry, &AuthState::Anonymous).await;
        store.record_entry(entry_at(4), &AuthState::Anonymous).await;

        assert_eq!(store.find(&id).unwrap().filename(), "doc-3");
        assert!(store.find("missing").is_none());
    }

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        }
    }

    #[derive(Default)]
    struct UnreadableStore {
        sets: AtomicUsize,
    }

    impl KeyValueStore for UnreadableStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "denied",
            )))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            self.sets.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_read_failure_never_overwrites_list() {
        let local = Arc::new(UnreadableStore::default());
        let store = HistoryStore::local_only(local.clone());

        let outcome = store.record(&result("g.pdf"), &AuthState::Anonymous).await;
        assert_eq!(outcome, RecordOutcome::Failed);
        assert_eq!(local.sets.load(Ordering::SeqCst), 0);
        assert!(store.local_entries().is_empty());
    }

    #[tokio::test]
    async fn test_same_millisecond_entries_get_distinct_ids() {
        let store = HistoryStore::local_only(Arc::new(MemoryStore::new()));
        let first = entry_at(7);
        let base_id = first.id().to_string();
        store.record_entry(first, &AuthState::Anonymous).await;
        store.record_entry(entry_at(7), &AuthState::Anonymous).await;
        store.record_entry(entry_at(7), &AuthState::Anonymous).await;

        let ids: Vec<String> = store
            .local_entries()
            .iter()
            .map(|e| e.id().to_string())
            .collect();
        assert_eq!(
            ids,
            vec![
                format!("{}-2", base_id),
                format!("{}-1", base_id),
                base_id.clone()
            ]
        );
        assert_eq!(store.find(&base_id).unwrap().id(), base_id);
        assert!(store.find(&format!("{}-1", base_id)).is_some());
    }

    #[tokio::test]
    async fn test_signed_in_without_remote_records_locally() {
        let store = HistoryStore::local_only(Arc::new(MemoryStore::new()));
        let outcome = store.record(&result("h.pdf"), &signed_in()).await;
        assert_eq!(outcome, RecordOutcome::Local);

        let entries = store.local_entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].filename(), "h.pdf");
        assert!(entries[0].user_id().is_none());
    }

    #[tokio::test]
    async fn test_storage_failure_is_swallowed() {
        let store = HistoryStore::local_only(Arc::new(BrokenStore));
        let outcome = store.record(&result("f.pdf"), &AuthState::Anonymous).await;
        assert_eq!(outcome, RecordOutcome::Failed);
    }
}
