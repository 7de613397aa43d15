use std::sync::Arc;
use std::time::Instant;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use agentgate_audit::{ActionLogEntry, AuditStore, LogStatus};
use agentgate_core::{
    ActionFailure, ActionName, ActionOutcome, ErrorCode, ExecutionContext, TenantId,
};
use agentgate_policy::{evaluate, AccessRequest, Decision};
use agentgate_policy_store::TenantPolicyService;

use crate::metrics::DispatchMetrics;
use crate::registry::ActionRegistry;
use crate::validate::{validate_params, ValidateFailure};

/// How concurrent dispatches sharing an idempotency key are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdempotencyMode {
    /// Read-then-act: two concurrent calls with the same key and no prior
    /// success can both execute the handler. Acceptable for low-volume
    /// internal traffic.
    #[default]
    Tolerant,
    /// Serialize dispatches per `(tenant, key)` with an in-process lock so
    /// the second caller observes the first caller's success entry.
    Strict,
}

/// A single dispatch request, used for batching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchRequest {
    /// Name of the registered action to invoke.
    pub action: ActionName,
    /// Raw input params.
    pub params: serde_json::Value,
    /// Optional caller-supplied idempotency key.
    pub idempotency_key: Option<String>,
}

/// The central dispatcher that runs the action pipeline.
///
/// The pipeline for each dispatch:
/// 1. On an idempotency-key hit with a prior success, return the cached
///    result without re-invoking the handler.
/// 2. Resolve the action by name.
/// 3. Authorize the caller's roles against the tenant's effective policy.
/// 4. Validate params against the action's input schema.
/// 5. Invoke the handler, catching any error at the boundary.
///
/// Every executed path writes exactly one audit entry before returning;
/// audit-write failures are logged to the process log and swallowed so a
/// logging outage never alters the primary result.
pub struct Dispatcher {
    // Note: manual `Debug` impl below because trait objects lack `Debug`.
    pub(crate) registry: ActionRegistry,
    pub(crate) policy: TenantPolicyService,
    pub(crate) audit: Arc<dyn AuditStore>,
    pub(crate) idempotency: IdempotencyMode,
    pub(crate) metrics: Arc<DispatchMetrics>,
    pub(crate) inflight: DashMap<String, Arc<Mutex<()>>>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("actions", &self.registry.list())
            .field("idempotency", &self.idempotency)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Dispatch a single action through the full pipeline.
    #[instrument(
        skip(self, params),
        fields(
            tenant = %ctx.tenant,
            action = action_name,
            request = %ctx.request_id,
        )
    )]
    pub async fn dispatch(
        &self,
        ctx: &ExecutionContext,
        action_name: &str,
        params: serde_json::Value,
        idempotency_key: Option<&str>,
    ) -> ActionOutcome {
        self.metrics.increment_dispatched();

        match (self.idempotency, idempotency_key) {
            (IdempotencyMode::Strict, Some(key)) => {
                let lock_key = format!("{}\u{0}{key}", ctx.tenant);
                let lock = self
                    .inflight
                    .entry(lock_key.clone())
                    .or_insert_with(|| Arc::new(Mutex::new(())))
                    .clone();
                let guard = lock.lock().await;
                let outcome = self
                    .dispatch_inner(ctx, action_name, params, idempotency_key)
                    .await;
                drop(guard);
                // Reclaim the entry once no other dispatch holds the lock.
                self.inflight
                    .remove_if(&lock_key, |_, l| Arc::strong_count(l) == 1);
                outcome
            }
            _ => {
                self.dispatch_inner(ctx, action_name, params, idempotency_key)
                    .await
            }
        }
    }

    /// Dispatch a batch of requests sequentially, collecting outcomes.
    pub async fn dispatch_batch(
        &self,
        ctx: &ExecutionContext,
        requests: Vec<DispatchRequest>,
    ) -> Vec<ActionOutcome> {
        let mut outcomes = Vec::with_capacity(requests.len());
        for request in requests {
            outcomes.push(
                self.dispatch(
                    ctx,
                    request.action.as_str(),
                    request.params,
                    request.idempotency_key.as_deref(),
                )
                .await,
            );
        }
        outcomes
    }

    /// Evaluate the tenant's effective policy for an access request.
    ///
    /// Exposed so callers can gate before dispatching, and so an
    /// enforcement layer with entity access can inspect unresolved
    /// conditions (e.g. `owner_only`) on the decision.
    pub async fn authorize(
        &self,
        ctx: &ExecutionContext,
        request: &AccessRequest<'_>,
    ) -> Decision {
        let policy = self.policy.effective_policy(&ctx.tenant).await;
        evaluate(&ctx.roles, request, &policy)
    }

    /// Return a reference to the dispatch metrics.
    pub fn metrics(&self) -> &DispatchMetrics {
        &self.metrics
    }

    /// Return the action registry.
    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    /// Return the tenant policy service.
    pub fn policy(&self) -> &TenantPolicyService {
        &self.policy
    }

    // -- Private helpers ------------------------------------------------------

    async fn dispatch_inner(
        &self,
        ctx: &ExecutionContext,
        action_name: &str,
        params: serde_json::Value,
        idempotency_key: Option<&str>,
    ) -> ActionOutcome {
        let start = Instant::now();

        // 1. Idempotent replay: a prior success with this key short-circuits
        //    re-execution. Lookup failures fall through to execution.
        if let Some(key) = idempotency_key {
            match self.audit.find_by_idempotency_key(&ctx.tenant, key).await {
                Ok(Some(prior)) => {
                    info!(entry = %prior.id, "idempotency key hit, returning cached result");
                    self.metrics.increment_replayed();
                    return ActionOutcome::Replayed {
                        data: prior.result.unwrap_or(serde_json::Value::Null),
                    };
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(error = %e, "idempotency lookup failed, proceeding with execution");
                }
            }
        }

        // 2. Resolve the action.
        let Some(action) = self.registry.get(action_name) else {
            let failure = ActionFailure::new(
                ErrorCode::ActionNotFound,
                format!("action not found: {action_name}"),
            );
            self.log_error(ctx, action_name, &params, &failure.message, idempotency_key, start)
                .await;
            self.metrics.increment_failed();
            return ActionOutcome::Failed(failure);
        };

        // 3. Authorize against the tenant's effective policy.
        let policy = self.policy.effective_policy(&ctx.tenant).await;
        let mut access = AccessRequest::new().action(action_name);
        if let Some(resource) = action.resource() {
            access = access.resource(resource);
        }
        if let Decision::Denied { reason, matched } = evaluate(&ctx.roles, &access, &policy) {
            self.log_error(
                ctx,
                action_name,
                &params,
                &format!("authorization denied: {reason}"),
                idempotency_key,
                start,
            )
            .await;
            self.metrics.increment_denied();
            return ActionOutcome::Denied {
                reason,
                matched_rule: matched.and_then(|rule| serde_json::to_value(rule).ok()),
            };
        }

        // 4. Validate params against the action's input schema.
        match validate_params(&action.input_schema(), &params) {
            Ok(()) => {}
            Err(ValidateFailure::Input(message)) => {
                let failure = ActionFailure::new(ErrorCode::ValidationError, message);
                self.log_error(ctx, action_name, &params, &failure.message, idempotency_key, start)
                    .await;
                self.metrics.increment_failed();
                return ActionOutcome::Failed(failure);
            }
            Err(ValidateFailure::Schema(message)) => {
                // A broken schema is an action configuration fault, not a
                // client error.
                let failure = ActionFailure::new(
                    ErrorCode::ActionFailed,
                    format!("invalid input schema for {action_name}: {message}"),
                );
                self.log_error(ctx, action_name, &params, &failure.message, idempotency_key, start)
                    .await;
                self.metrics.increment_failed();
                return ActionOutcome::Failed(failure);
            }
        }

        // 5. Invoke the handler, catching errors at the boundary.
        match action.execute(ctx, &params).await {
            Ok(data) => {
                let mut entry = ActionLogEntry::new(
                    ctx.tenant.clone(),
                    ctx.user.clone(),
                    ActionName::new(action_name),
                    params,
                    LogStatus::Success,
                    ctx.request_id.clone(),
                )
                .with_result(data.clone())
                .with_duration_ms(elapsed_ms(start));
                if let Some(key) = idempotency_key {
                    entry = entry.with_idempotency_key(key);
                }
                self.record(entry).await;
                self.metrics.increment_completed();
                ActionOutcome::Completed { data }
            }
            Err(e) => {
                let failure = ActionFailure::new(ErrorCode::ActionFailed, e.to_string());
                self.log_error(ctx, action_name, &params, &failure.message, idempotency_key, start)
                    .await;
                self.metrics.increment_failed();
                ActionOutcome::Failed(failure)
            }
        }
    }

    /// Write the single Error audit entry for a failed or denied dispatch.
    async fn log_error(
        &self,
        ctx: &ExecutionContext,
        action_name: &str,
        params: &serde_json::Value,
        message: &str,
        idempotency_key: Option<&str>,
        start: Instant,
    ) {
        let mut entry = ActionLogEntry::new(
            ctx.tenant.clone(),
            ctx.user.clone(),
            ActionName::new(action_name),
            params.clone(),
            LogStatus::Error,
            ctx.request_id.clone(),
        )
        .with_error(message)
        .with_duration_ms(elapsed_ms(start));
        if let Some(key) = idempotency_key {
            entry = entry.with_idempotency_key(key);
        }
        self.record(entry).await;
    }

    /// Append to the audit log; failures go to the process log and never
    /// alter the primary result.
    async fn record(&self, entry: ActionLogEntry) {
        if let Err(e) = self.audit.record(entry).await {
            warn!(error = %e, "audit recording failed");
        }
    }
}

/// Tenant-scoped audit passthroughs used by operational surfaces.
impl Dispatcher {
    /// Return up to `limit` audit entries for a tenant, newest first.
    pub async fn logs_for_tenant(
        &self,
        tenant: &TenantId,
        limit: usize,
    ) -> Result<Vec<ActionLogEntry>, agentgate_audit::AuditError> {
        self.audit.logs_for_tenant(tenant, limit).await
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
