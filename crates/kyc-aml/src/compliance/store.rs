use std::collections::HashMap;
use std::sync::Mutex;

use super::domain::{SubjectId, VerificationRecord};

/// Storage abstraction for verification records so the workflow can be
/// exercised against test doubles.
pub trait VerificationStore: Send + Sync {
    /// Replace the subject's record atomically; last writer wins.
    fn upsert(&self, record: VerificationRecord) -> Result<(), StoreError>;
    fn fetch(&self, subject: SubjectId) -> Result<Option<VerificationRecord>, StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("verification store unavailable: {0}")]
    Unavailable(String),
}

/// Process-scoped store backing the service: one record per subject, held in
/// memory for the lifetime of the process.
#[derive(Default)]
pub struct MemoryVerificationStore {
    records: Mutex<HashMap<SubjectId, VerificationRecord>>,
}

impl VerificationStore for MemoryVerificationStore {
    fn upsert(&self, record: VerificationRecord) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("verification store mutex poisoned");
        guard.insert(record.subject_id, record);
        Ok(())
    }

    fn fetch(&self, subject: SubjectId) -> Result<Option<VerificationRecord>, StoreError> {
        let guard = self.records.lock().expect("verification store mutex poisoned");
        Ok(guard.get(&subject).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::domain::VerificationStatus;
    use chrono::Utc;

    fn record(subject: i64, document_url: &str) -> VerificationRecord {
        VerificationRecord {
            subject_id: SubjectId(subject),
            document_type: "passport".to_string(),
            document_url: document_url.to_string(),
            status: VerificationStatus::Verified,
            submitted_at: Utc::now(),
        }
    }

    #[test]
    fn fetch_returns_none_for_unknown_subject() {
        let store = MemoryVerificationStore::default();
        let found = store.fetch(SubjectId(7)).expect("fetch succeeds");
        assert!(found.is_none());
    }

    #[test]
    fn upsert_replaces_the_previous_record_wholesale() {
        let store = MemoryVerificationStore::default();
        store.upsert(record(7, "doc://first")).expect("insert");
        store.upsert(record(7, "doc://second")).expect("replace");

        let stored = store
            .fetch(SubjectId(7))
            .expect("fetch succeeds")
            .expect("record present");
        assert_eq!(stored.document_url, "doc://second");
    }

    #[test]
    fn records_for_different_subjects_do_not_interfere() {
        let store = MemoryVerificationStore::default();
        store.upsert(record(1, "doc://a")).expect("insert");
        store.upsert(record(2, "doc://b")).expect("insert");

        let first = store.fetch(SubjectId(1)).expect("fetch").expect("present");
        assert_eq!(first.document_url, "doc://a");
    }
}
