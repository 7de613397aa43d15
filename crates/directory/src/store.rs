use async_trait::async_trait;

use agentgate_core::TenantId;

use crate::error::DirectoryError;
use crate::model::{TenantSecrets, WorkflowMapping};

/// Trait for resolving tenant-configured external workflow endpoints and
/// credential bundles.
///
/// Action handlers that call out to tenant-configured systems hold an
/// `Arc<dyn TenantDirectory>`; the dispatcher itself has no dependency on
/// this trait. Only active records resolve.
#[async_trait]
pub trait TenantDirectory: Send + Sync {
    /// Resolve the active workflow endpoint for `(tenant, provider, key)`.
    async fn resolve_workflow(
        &self,
        tenant: &TenantId,
        provider: &str,
        workflow_key: &str,
    ) -> Result<Option<WorkflowMapping>, DirectoryError>;

    /// Resolve the active credential bundle for `(tenant, provider)`.
    async fn resolve_secrets(
        &self,
        tenant: &TenantId,
        provider: &str,
    ) -> Result<Option<TenantSecrets>, DirectoryError>;
}
