use std::sync::Arc;

use tracing::warn;

use agentgate_core::{TenantId, UserId};
use agentgate_policy::PolicySet;

use crate::error::PolicyStoreError;
use crate::store::PolicyStore;
use crate::version::TenantPolicyVersion;

/// Computes effective policies and maintains the one-active-version
/// invariant over a [`PolicyStore`] backend.
///
/// The platform default rule set is supplied at construction and layered
/// before the tenant's active override, so a tenant deny can override a
/// platform allow under deny-first evaluation.
pub struct TenantPolicyService {
    store: Arc<dyn PolicyStore>,
    defaults: PolicySet,
}

impl TenantPolicyService {
    /// Create a service over a backend with the given platform defaults.
    pub fn new(store: Arc<dyn PolicyStore>, defaults: PolicySet) -> Self {
        Self { store, defaults }
    }

    /// The platform default rule set.
    pub fn defaults(&self) -> &PolicySet {
        &self.defaults
    }

    /// The effective policy for a tenant: platform defaults followed by
    /// the tenant's active override rules.
    ///
    /// The read path never raises: a storage error degrades to the
    /// defaults-only set, which is the more restrictive outcome.
    pub async fn effective_policy(&self, tenant: &TenantId) -> PolicySet {
        match self.store.active_version(tenant).await {
            Ok(Some(version)) => self.defaults.concat(&version.rules),
            Ok(None) => self.defaults.clone(),
            Err(e) => {
                warn!(tenant = %tenant, error = %e, "policy read failed, using platform defaults");
                self.defaults.clone()
            }
        }
    }

    /// Replace the tenant's active override: deactivate the current active
    /// version (if any), then insert the new rules as a fresh active
    /// version. Every prior version is retained.
    ///
    /// The two writes are sequential with no transaction; a crash between
    /// them leaves the tenant with zero active versions, which fails
    /// closed to the platform defaults until corrected.
    pub async fn upsert_policy(
        &self,
        tenant: &TenantId,
        rules: PolicySet,
        label: impl Into<String>,
        actor: Option<UserId>,
    ) -> Result<TenantPolicyVersion, PolicyStoreError> {
        if let Some(current) = self.store.active_version(tenant).await? {
            self.store.set_active(&current.id, tenant, false).await?;
        }

        let version = TenantPolicyVersion::new(tenant.clone(), rules, label, actor);
        self.store.insert_version(version.clone()).await?;
        Ok(version)
    }

    /// Activate a stored version, deactivating all siblings first.
    pub async fn activate_version(
        &self,
        id: &str,
        tenant: &TenantId,
    ) -> Result<(), PolicyStoreError> {
        for version in self.store.list_versions(tenant).await? {
            if version.is_active && version.id != id {
                self.store.set_active(&version.id, tenant, false).await?;
            }
        }
        self.store.set_active(id, tenant, true).await
    }

    /// Deactivate a stored version, leaving the tenant on defaults only.
    pub async fn deactivate_version(
        &self,
        id: &str,
        tenant: &TenantId,
    ) -> Result<(), PolicyStoreError> {
        self.store.set_active(id, tenant, false).await
    }

    /// All stored versions for a tenant, newest first.
    pub async fn list_versions(
        &self,
        tenant: &TenantId,
    ) -> Result<Vec<TenantPolicyVersion>, PolicyStoreError> {
        self.store.list_versions(tenant).await
    }

    /// Look up a single version by id.
    pub async fn get_version(
        &self,
        id: &str,
        tenant: &TenantId,
    ) -> Result<Option<TenantPolicyVersion>, PolicyStoreError> {
        self.store.get_version(id, tenant).await
    }
}

impl std::fmt::Debug for TenantPolicyService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TenantPolicyService")
            .field("defaults", &self.defaults.len())
            .finish_non_exhaustive()
    }
}
