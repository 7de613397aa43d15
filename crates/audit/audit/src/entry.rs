use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use agentgate_core::{ActionName, RequestId, TenantId, UserId};

/// Final status of a logged dispatch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogStatus {
    /// The handler ran and returned a result.
    Success,
    /// The dispatch ended in an error (unknown action, invalid input, or
    /// handler fault) or an authorization denial.
    Error,
    /// The dispatch is still in flight.
    Pending,
}

/// The immutable record of one dispatch attempt.
///
/// Serves double duty as the audit trail and as the idempotency cache: a
/// prior `Success` entry with the same tenant and idempotency key
/// short-circuits re-execution. Entries are never mutated once finalized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionLogEntry {
    /// Unique identifier for this entry (UUID v4).
    pub id: String,

    /// Tenant the dispatch ran under.
    pub tenant: TenantId,

    /// The calling user, absent for system dispatches.
    pub user: Option<UserId>,

    /// Name of the dispatched action.
    pub action_name: ActionName,

    /// The raw input params as submitted.
    pub input: serde_json::Value,

    /// The handler's result payload on success.
    pub result: Option<serde_json::Value>,

    /// Outcome of the dispatch.
    pub status: LogStatus,

    /// Human-readable error detail when `status` is `Error`.
    pub error_message: Option<String>,

    /// Dispatcher-side wall-clock duration, including validation.
    pub duration_ms: u64,

    /// Caller-supplied idempotency key, if any.
    pub idempotency_key: Option<String>,

    /// Correlation id of the originating request.
    pub request_id: RequestId,

    /// When the entry was written.
    pub created_at: DateTime<Utc>,
}

impl ActionLogEntry {
    /// Create an entry with a fresh UUID-v4 id and `created_at` set to now.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tenant: TenantId,
        user: Option<UserId>,
        action_name: ActionName,
        input: serde_json::Value,
        status: LogStatus,
        request_id: RequestId,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tenant,
            user,
            action_name,
            input,
            result: None,
            status,
            error_message: None,
            duration_ms: 0,
            idempotency_key: None,
            request_id,
            created_at: Utc::now(),
        }
    }

    /// Attach a result payload.
    #[must_use]
    pub fn with_result(mut self, result: serde_json::Value) -> Self {
        self.result = Some(result);
        self
    }

    /// Attach an error message.
    #[must_use]
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    /// Set the measured duration.
    #[must_use]
    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Attach the caller's idempotency key.
    #[must_use]
    pub fn with_idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_entry(status: LogStatus) -> ActionLogEntry {
        ActionLogEntry::new(
            TenantId::new("t1"),
            Some(UserId::new("u1")),
            ActionName::new("erp.create"),
            serde_json::json!({"name": "Acme"}),
            status,
            RequestId::new("req-1"),
        )
    }

    #[test]
    fn new_entry_defaults() {
        let entry = make_entry(LogStatus::Pending);
        assert!(!entry.id.is_empty());
        assert!(entry.result.is_none());
        assert!(entry.error_message.is_none());
        assert!(entry.idempotency_key.is_none());
        assert_eq!(entry.duration_ms, 0);
    }

    #[test]
    fn builders_compose() {
        let entry = make_entry(LogStatus::Success)
            .with_result(serde_json::json!({"id": "c-1"}))
            .with_duration_ms(12)
            .with_idempotency_key("key-1");
        assert_eq!(entry.result.unwrap()["id"], "c-1");
        assert_eq!(entry.duration_ms, 12);
        assert_eq!(entry.idempotency_key.as_deref(), Some("key-1"));
    }

    #[test]
    fn entry_serde_roundtrip() {
        let entry = make_entry(LogStatus::Error).with_error("VALIDATION_ERROR: name is required");
        let json = serde_json::to_string(&entry).unwrap();
        let back: ActionLogEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, entry.id);
        assert_eq!(back.status, LogStatus::Error);
        assert_eq!(back.error_message, entry.error_message);
    }

    #[test]
    fn status_wire_names() {
        assert_eq!(
            serde_json::to_string(&LogStatus::Success).unwrap(),
            "\"success\""
        );
        assert_eq!(serde_json::to_string(&LogStatus::Error).unwrap(), "\"error\"");
    }
}
