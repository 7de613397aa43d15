use async_trait::async_trait;
use dashmap::DashMap;

use agentgate_audit::{ActionLogEntry, AuditError, AuditStore, LogStatus};
use agentgate_core::TenantId;

/// In-memory action log using `DashMap`. Suitable for development and
/// testing.
///
/// Entries are stored by entry id with a secondary index from
/// `(tenant, idempotency_key)` to entry ids for the dispatcher's replay
/// lookup.
pub struct MemoryAuditStore {
    /// Primary store: entry id -> `ActionLogEntry`.
    entries: DashMap<String, ActionLogEntry>,
    /// Secondary index: `tenant\x00key` -> entry ids.
    key_index: DashMap<String, Vec<String>>,
}

impl MemoryAuditStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            key_index: DashMap::new(),
        }
    }

    fn index_key(tenant: &TenantId, key: &str) -> String {
        format!("{tenant}\u{0}{key}")
    }
}

impl Default for MemoryAuditStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuditStore for MemoryAuditStore {
    async fn record(&self, entry: ActionLogEntry) -> Result<(), AuditError> {
        let id = entry.id.clone();
        if let Some(key) = entry.idempotency_key.as_deref() {
            self.key_index
                .entry(Self::index_key(&entry.tenant, key))
                .or_default()
                .push(id.clone());
        }
        self.entries.insert(id, entry);
        Ok(())
    }

    async fn find_by_idempotency_key(
        &self,
        tenant: &TenantId,
        key: &str,
    ) -> Result<Option<ActionLogEntry>, AuditError> {
        let ids = self.key_index.get(&Self::index_key(tenant, key));
        let Some(ids) = ids else {
            return Ok(None);
        };

        // Most recent successful entry wins; other statuses never
        // suppress a retry.
        let mut best: Option<ActionLogEntry> = None;
        for id in ids.value() {
            if let Some(entry) = self.entries.get(id) {
                let entry = entry.value();
                if entry.status != LogStatus::Success {
                    continue;
                }
                if best
                    .as_ref()
                    .is_none_or(|b| entry.created_at > b.created_at)
                {
                    best = Some(entry.clone());
                }
            }
        }
        Ok(best)
    }

    async fn logs_for_tenant(
        &self,
        tenant: &TenantId,
        limit: usize,
    ) -> Result<Vec<ActionLogEntry>, AuditError> {
        let mut matching: Vec<ActionLogEntry> = self
            .entries
            .iter()
            .filter(|entry| &entry.value().tenant == tenant)
            .map(|entry| entry.value().clone())
            .collect();

        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching.truncate(limit);
        Ok(matching)
    }
}

#[cfg(test)]
mod tests {
    use agentgate_core::{ActionName, RequestId};

    use super::*;

    fn make_entry(tenant: &str, status: LogStatus, key: Option<&str>) -> ActionLogEntry {
        let mut entry = ActionLogEntry::new(
            TenantId::new(tenant),
            None,
            ActionName::new("erp.create"),
            serde_json::json!({"name": "Acme"}),
            status,
            RequestId::new("req-1"),
        );
        if let Some(key) = key {
            entry = entry.with_idempotency_key(key);
        }
        entry
    }

    #[tokio::test]
    async fn record_and_list() {
        let store = MemoryAuditStore::new();
        store
            .record(make_entry("t1", LogStatus::Success, None))
            .await
            .unwrap();
        store
            .record(make_entry("t1", LogStatus::Error, None))
            .await
            .unwrap();

        let logs = store
            .logs_for_tenant(&TenantId::new("t1"), 10)
            .await
            .unwrap();
        assert_eq!(logs.len(), 2);
    }

    #[tokio::test]
    async fn logs_are_tenant_scoped_and_limited() {
        let store = MemoryAuditStore::new();
        for _ in 0..5 {
            store
                .record(make_entry("t1", LogStatus::Success, None))
                .await
                .unwrap();
        }
        store
            .record(make_entry("t2", LogStatus::Success, None))
            .await
            .unwrap();

        let logs = store
            .logs_for_tenant(&TenantId::new("t1"), 3)
            .await
            .unwrap();
        assert_eq!(logs.len(), 3);
        assert!(logs.iter().all(|e| e.tenant.as_str() == "t1"));
    }

    #[tokio::test]
    async fn finds_success_entry_by_key() {
        let store = MemoryAuditStore::new();
        let entry = make_entry("t1", LogStatus::Success, Some("key-1"))
            .with_result(serde_json::json!({"id": 1}));
        store.record(entry.clone()).await.unwrap();

        let found = store
            .find_by_idempotency_key(&TenantId::new("t1"), "key-1")
            .await
            .unwrap();
        assert_eq!(found.unwrap().id, entry.id);
    }

    #[tokio::test]
    async fn error_entries_do_not_satisfy_lookup() {
        let store = MemoryAuditStore::new();
        store
            .record(make_entry("t1", LogStatus::Error, Some("key-1")))
            .await
            .unwrap();

        let found = store
            .find_by_idempotency_key(&TenantId::new("t1"), "key-1")
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn key_lookup_is_tenant_scoped() {
        let store = MemoryAuditStore::new();
        store
            .record(make_entry("t1", LogStatus::Success, Some("key-1")))
            .await
            .unwrap();

        let found = store
            .find_by_idempotency_key(&TenantId::new("t2"), "key-1")
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn most_recent_success_wins() {
        let store = MemoryAuditStore::new();
        let first = make_entry("t1", LogStatus::Success, Some("key-1"))
            .with_result(serde_json::json!({"attempt": 1}));
        store.record(first).await.unwrap();

        let mut second = make_entry("t1", LogStatus::Success, Some("key-1"))
            .with_result(serde_json::json!({"attempt": 2}));
        second.created_at += chrono::Duration::seconds(5);
        store.record(second.clone()).await.unwrap();

        let found = store
            .find_by_idempotency_key(&TenantId::new("t1"), "key-1")
            .await
            .unwrap();
        assert_eq!(found.unwrap().id, second.id);
    }
}
