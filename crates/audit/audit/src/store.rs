use async_trait::async_trait;

use agentgate_core::TenantId;

use crate::entry::ActionLogEntry;
use crate::error::AuditError;

/// Trait for action log storage backends.
///
/// The log is append-only: implementations never update or delete entries.
/// Implementations must be `Send + Sync` to be shared across async tasks.
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Persist a log entry.
    async fn record(&self, entry: ActionLogEntry) -> Result<(), AuditError>;

    /// Find a prior **successful** entry for this tenant and idempotency
    /// key. Entries with any other status are ignored so that a failed
    /// attempt never suppresses a retry.
    async fn find_by_idempotency_key(
        &self,
        tenant: &TenantId,
        key: &str,
    ) -> Result<Option<ActionLogEntry>, AuditError>;

    /// Return up to `limit` entries for a tenant, newest first.
    async fn logs_for_tenant(
        &self,
        tenant: &TenantId,
        limit: usize,
    ) -> Result<Vec<ActionLogEntry>, AuditError>;
}
