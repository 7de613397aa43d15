use async_trait::async_trait;
use dashmap::DashMap;

use agentgate_core::TenantId;
use agentgate_policy_store::{PolicyStore, PolicyStoreError, TenantPolicyVersion};

/// In-memory policy version store using `DashMap`. Suitable for
/// development and testing.
///
/// Versions are kept per tenant in insertion order; queries clone rows out
/// of the map so callers never observe partial mutation.
pub struct MemoryPolicyStore {
    versions: DashMap<String, Vec<TenantPolicyVersion>>,
}

impl MemoryPolicyStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            versions: DashMap::new(),
        }
    }
}

impl Default for MemoryPolicyStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PolicyStore for MemoryPolicyStore {
    async fn active_version(
        &self,
        tenant: &TenantId,
    ) -> Result<Option<TenantPolicyVersion>, PolicyStoreError> {
        Ok(self
            .versions
            .get(tenant.as_str())
            .and_then(|rows| rows.iter().find(|v| v.is_active).cloned()))
    }

    async fn list_versions(
        &self,
        tenant: &TenantId,
    ) -> Result<Vec<TenantPolicyVersion>, PolicyStoreError> {
        let mut rows = self
            .versions
            .get(tenant.as_str())
            .map(|rows| rows.clone())
            .unwrap_or_default();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn get_version(
        &self,
        id: &str,
        tenant: &TenantId,
    ) -> Result<Option<TenantPolicyVersion>, PolicyStoreError> {
        Ok(self
            .versions
            .get(tenant.as_str())
            .and_then(|rows| rows.iter().find(|v| v.id == id).cloned()))
    }

    async fn insert_version(&self, version: TenantPolicyVersion) -> Result<(), PolicyStoreError> {
        self.versions
            .entry(version.tenant.as_str().to_owned())
            .or_default()
            .push(version);
        Ok(())
    }

    async fn set_active(
        &self,
        id: &str,
        tenant: &TenantId,
        active: bool,
    ) -> Result<(), PolicyStoreError> {
        let mut rows = self
            .versions
            .get_mut(tenant.as_str())
            .ok_or_else(|| PolicyStoreError::VersionNotFound(id.to_owned()))?;
        let version = rows
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or_else(|| PolicyStoreError::VersionNotFound(id.to_owned()))?;
        version.is_active = active;
        Ok(())
    }
}
