use async_trait::async_trait;

use agentgate_core::TenantId;

use crate::error::PolicyStoreError;
use crate::version::TenantPolicyVersion;

/// Trait for tenant policy version storage backends.
///
/// The surface is deliberately a set of simple keyed reads and writes; the
/// active-version invariant (at most one per tenant) is maintained by
/// [`TenantPolicyService`](crate::service::TenantPolicyService), not by the
/// backend.
#[async_trait]
pub trait PolicyStore: Send + Sync {
    /// Return the tenant's currently active version, if any.
    async fn active_version(
        &self,
        tenant: &TenantId,
    ) -> Result<Option<TenantPolicyVersion>, PolicyStoreError>;

    /// Return all versions for a tenant, newest first.
    async fn list_versions(
        &self,
        tenant: &TenantId,
    ) -> Result<Vec<TenantPolicyVersion>, PolicyStoreError>;

    /// Look up a version by id, scoped to the tenant.
    async fn get_version(
        &self,
        id: &str,
        tenant: &TenantId,
    ) -> Result<Option<TenantPolicyVersion>, PolicyStoreError>;

    /// Insert a new version row.
    async fn insert_version(&self, version: TenantPolicyVersion) -> Result<(), PolicyStoreError>;

    /// Flip a version's active flag. Fails with
    /// [`PolicyStoreError::VersionNotFound`] if the id does not exist for
    /// the tenant.
    async fn set_active(
        &self,
        id: &str,
        tenant: &TenantId,
        active: bool,
    ) -> Result<(), PolicyStoreError>;
}
