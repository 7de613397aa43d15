use async_trait::async_trait;
use dashmap::DashMap;

use agentgate_core::TenantId;

use crate::error::DirectoryError;
use crate::model::{TenantSecrets, WorkflowMapping};
use crate::store::TenantDirectory;

/// In-memory tenant directory using `DashMap`. Suitable for development
/// and testing.
pub struct MemoryDirectory {
    /// `tenant\x00provider\x00workflow_key` -> mapping.
    workflows: DashMap<String, WorkflowMapping>,
    /// `tenant\x00provider` -> secrets.
    secrets: DashMap<String, TenantSecrets>,
}

impl MemoryDirectory {
    /// Create a new empty directory.
    pub fn new() -> Self {
        Self {
            workflows: DashMap::new(),
            secrets: DashMap::new(),
        }
    }

    /// Insert or replace a workflow mapping.
    pub fn put_workflow(&self, mapping: WorkflowMapping) {
        let key = Self::workflow_key(&mapping.tenant, &mapping.provider, &mapping.workflow_key);
        self.workflows.insert(key, mapping);
    }

    /// Insert or replace a credential bundle.
    pub fn put_secrets(&self, secrets: TenantSecrets) {
        let key = Self::secrets_key(&secrets.tenant, &secrets.provider);
        self.secrets.insert(key, secrets);
    }

    fn workflow_key(tenant: &TenantId, provider: &str, workflow_key: &str) -> String {
        format!("{tenant}\u{0}{provider}\u{0}{workflow_key}")
    }

    fn secrets_key(tenant: &TenantId, provider: &str) -> String {
        format!("{tenant}\u{0}{provider}")
    }
}

impl Default for MemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TenantDirectory for MemoryDirectory {
    async fn resolve_workflow(
        &self,
        tenant: &TenantId,
        provider: &str,
        workflow_key: &str,
    ) -> Result<Option<WorkflowMapping>, DirectoryError> {
        Ok(self
            .workflows
            .get(&Self::workflow_key(tenant, provider, workflow_key))
            .filter(|m| m.is_active)
            .map(|m| m.value().clone()))
    }

    async fn resolve_secrets(
        &self,
        tenant: &TenantId,
        provider: &str,
    ) -> Result<Option<TenantSecrets>, DirectoryError> {
        Ok(self
            .secrets
            .get(&Self::secrets_key(tenant, provider))
            .filter(|s| s.is_active)
            .map(|s| s.value().clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(tenant: &str, active: bool) -> WorkflowMapping {
        WorkflowMapping {
            tenant: TenantId::new(tenant),
            provider: "n8n".into(),
            workflow_key: "invoice.sync".into(),
            endpoint: "https://flows.example.com/hook/abc".into(),
            is_active: active,
        }
    }

    #[tokio::test]
    async fn resolves_active_workflow() {
        let dir = MemoryDirectory::new();
        dir.put_workflow(mapping("t1", true));

        let found = dir
            .resolve_workflow(&TenantId::new("t1"), "n8n", "invoice.sync")
            .await
            .unwrap();
        assert_eq!(found.unwrap().endpoint, "https://flows.example.com/hook/abc");
    }

    #[tokio::test]
    async fn inactive_workflow_does_not_resolve() {
        let dir = MemoryDirectory::new();
        dir.put_workflow(mapping("t1", false));

        let found = dir
            .resolve_workflow(&TenantId::new("t1"), "n8n", "invoice.sync")
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn workflow_lookup_is_tenant_scoped() {
        let dir = MemoryDirectory::new();
        dir.put_workflow(mapping("t1", true));

        let found = dir
            .resolve_workflow(&TenantId::new("t2"), "n8n", "invoice.sync")
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn resolves_active_secrets_only() {
        let dir = MemoryDirectory::new();
        dir.put_secrets(TenantSecrets {
            tenant: TenantId::new("t1"),
            provider: "n8n".into(),
            credentials: serde_json::json!({"api_key": "k-123"}),
            is_active: true,
        });
        dir.put_secrets(TenantSecrets {
            tenant: TenantId::new("t2"),
            provider: "n8n".into(),
            credentials: serde_json::json!({"api_key": "k-456"}),
            is_active: false,
        });

        let active = dir
            .resolve_secrets(&TenantId::new("t1"), "n8n")
            .await
            .unwrap();
        assert_eq!(active.unwrap().credentials["api_key"], "k-123");

        let inactive = dir
            .resolve_secrets(&TenantId::new("t2"), "n8n")
            .await
            .unwrap();
        assert!(inactive.is_none());
    }
}
