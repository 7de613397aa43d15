use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{RequestId, TenantId, UserId};

/// Per-call execution context threaded through authorization and dispatch.
///
/// Built fresh for every request from the identity provider's resolved
/// `(user, roles)` pair. Never persisted directly; audit entries reference
/// it by `request_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionContext {
    /// Tenant on whose behalf the action runs.
    pub tenant: TenantId,

    /// Resolved platform user, absent for scheduled jobs and system calls.
    pub user: Option<UserId>,

    /// Role names granted to the caller by the identity provider.
    pub roles: Vec<String>,

    /// Correlation id for this request.
    pub request_id: RequestId,

    /// When the context was constructed.
    pub timestamp: DateTime<Utc>,
}

impl ExecutionContext {
    /// Create a context for a tenant with a fresh UUID-v4 request id.
    #[must_use]
    pub fn new(tenant: impl Into<TenantId>) -> Self {
        Self {
            tenant: tenant.into(),
            user: None,
            roles: Vec::new(),
            request_id: RequestId::new(Uuid::new_v4().to_string()),
            timestamp: Utc::now(),
        }
    }

    /// Attach the calling user.
    #[must_use]
    pub fn with_user(mut self, user: impl Into<UserId>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Attach the caller's resolved role list.
    #[must_use]
    pub fn with_roles(mut self, roles: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.roles = roles.into_iter().map(Into::into).collect();
        self
    }

    /// Override the generated request id (e.g. with an upstream trace id).
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<RequestId>) -> Self {
        self.request_id = request_id.into();
        self
    }
}
