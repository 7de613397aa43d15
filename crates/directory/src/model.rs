use serde::{Deserialize, Serialize};

use agentgate_core::TenantId;

/// A tenant-configured external workflow endpoint.
///
/// Action handlers that call out to tenant-configured automation resolve
/// the endpoint by `(tenant, provider, workflow_key)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowMapping {
    /// Owning tenant.
    pub tenant: TenantId,
    /// External automation provider, e.g. `"n8n"` or `"zapier"`.
    pub provider: String,
    /// Logical workflow key, e.g. `"invoice.sync"`.
    pub workflow_key: String,
    /// Endpoint URL the handler invokes.
    pub endpoint: String,
    /// Inactive mappings do not resolve.
    pub is_active: bool,
}

/// A tenant's credential bundle for an external provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantSecrets {
    /// Owning tenant.
    pub tenant: TenantId,
    /// External provider the credentials belong to.
    pub provider: String,
    /// Opaque credential payload (API keys, tokens); handlers interpret it.
    pub credentials: serde_json::Value,
    /// Inactive bundles do not resolve.
    pub is_active: bool,
}
