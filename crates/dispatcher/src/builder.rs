use std::sync::Arc;

use dashmap::DashMap;

use agentgate_audit::AuditStore;
use agentgate_policy_store::TenantPolicyService;

use crate::action::Action;
use crate::dispatcher::{Dispatcher, IdempotencyMode};
use crate::error::DispatcherError;
use crate::metrics::DispatchMetrics;
use crate::registry::ActionRegistry;

/// Builder for [`Dispatcher`].
///
/// All collaborators are passed in explicitly; nothing is read from
/// global state. A policy service and an audit store are required, every
/// other knob has a default.
#[derive(Default)]
pub struct DispatcherBuilder {
    registry: ActionRegistry,
    policy: Option<TenantPolicyService>,
    audit: Option<Arc<dyn AuditStore>>,
    idempotency: IdempotencyMode,
}

impl DispatcherBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tenant policy service used for authorization.
    #[must_use]
    pub fn policy(mut self, policy: TenantPolicyService) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Set the audit store. It also serves as the idempotency cache.
    #[must_use]
    pub fn audit(mut self, audit: Arc<dyn AuditStore>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Register an action.
    #[must_use]
    pub fn action(mut self, action: Arc<dyn Action>) -> Self {
        self.registry.register(action);
        self
    }

    /// Register many actions at once.
    #[must_use]
    pub fn actions(mut self, actions: impl IntoIterator<Item = Arc<dyn Action>>) -> Self {
        for action in actions {
            self.registry.register(action);
        }
        self
    }

    /// Set how concurrent dispatches sharing an idempotency key behave.
    /// Defaults to [`IdempotencyMode::Tolerant`].
    #[must_use]
    pub fn idempotency_mode(mut self, mode: IdempotencyMode) -> Self {
        self.idempotency = mode;
        self
    }

    /// Build the dispatcher.
    ///
    /// # Errors
    ///
    /// Returns [`DispatcherError::Configuration`] if the policy service or
    /// audit store was not provided.
    pub fn build(self) -> Result<Dispatcher, DispatcherError> {
        let policy = self
            .policy
            .ok_or_else(|| DispatcherError::Configuration("policy service is required".into()))?;
        let audit = self
            .audit
            .ok_or_else(|| DispatcherError::Configuration("audit store is required".into()))?;

        Ok(Dispatcher {
            registry: self.registry,
            policy,
            audit,
            idempotency: self.idempotency,
            metrics: Arc::new(DispatchMetrics::default()),
            inflight: DashMap::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use agentgate_audit_memory::MemoryAuditStore;
    use agentgate_policy::platform_defaults;
    use agentgate_policy_store_memory::MemoryPolicyStore;

    use super::*;

    fn policy_service() -> TenantPolicyService {
        TenantPolicyService::new(Arc::new(MemoryPolicyStore::new()), platform_defaults())
    }

    #[test]
    fn build_without_policy_fails() {
        let err = DispatcherBuilder::new()
            .audit(Arc::new(MemoryAuditStore::new()))
            .build()
            .unwrap_err();
        assert!(matches!(err, DispatcherError::Configuration(_)));
    }

    #[test]
    fn build_without_audit_fails() {
        let err = DispatcherBuilder::new()
            .policy(policy_service())
            .build()
            .unwrap_err();
        assert!(matches!(err, DispatcherError::Configuration(_)));
    }

    #[test]
    fn minimal_build_succeeds() {
        let dispatcher = DispatcherBuilder::new()
            .policy(policy_service())
            .audit(Arc::new(MemoryAuditStore::new()))
            .build()
            .expect("builder should succeed");
        assert!(dispatcher.registry().is_empty());
    }
}
