use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use agentgate_core::{TenantId, UserId};
use agentgate_policy::PolicySet;

/// An immutable, versioned snapshot of a tenant's policy override.
///
/// Changes are append-only: upserting a tenant's policy inserts a new
/// version and deactivates the previous one, so every version is retained
/// for audit and rollback. At most one version per tenant is active at any
/// time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantPolicyVersion {
    /// Unique version identifier (UUID v4).
    pub id: String,

    /// Tenant the override belongs to.
    pub tenant: TenantId,

    /// The override rules, appended after the platform defaults.
    pub rules: PolicySet,

    /// Human-readable version label, e.g. `"v3"` or `"strict-q3"`.
    pub label: String,

    /// Whether this is the tenant's currently active override.
    pub is_active: bool,

    /// When the version was created.
    pub created_at: DateTime<Utc>,

    /// The user that created it, absent for system migrations.
    pub created_by: Option<UserId>,
}

impl TenantPolicyVersion {
    /// Create a new active version with a fresh UUID-v4 id.
    #[must_use]
    pub fn new(
        tenant: impl Into<TenantId>,
        rules: PolicySet,
        label: impl Into<String>,
        created_by: Option<UserId>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tenant: tenant.into(),
            rules,
            label: label.into(),
            is_active: true,
            created_at: Utc::now(),
            created_by,
        }
    }
}
