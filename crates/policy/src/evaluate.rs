use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{Effect, PolicyRule, PolicySet};

/// The resource/action pair an authorization decision is requested for.
///
/// Both fields are optional: a rule filter only constrains the match when
/// the request supplies the corresponding field.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessRequest<'a> {
    /// Target resource type, e.g. `"project"`.
    pub resource: Option<&'a str>,
    /// Target action name, e.g. `"projects.list"`.
    pub action: Option<&'a str>,
}

impl<'a> AccessRequest<'a> {
    /// Request with neither resource nor action specified.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target resource type.
    #[must_use]
    pub fn resource(mut self, resource: &'a str) -> Self {
        self.resource = Some(resource);
        self
    }

    /// Set the target action name.
    #[must_use]
    pub fn action(mut self, action: &'a str) -> Self {
        self.action = Some(action);
        self
    }
}

/// A condition an allow rule carries that the evaluator cannot resolve.
///
/// The evaluator grants the capability but the enforcement layer must
/// verify the condition against the target entity before honoring it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedCondition {
    /// The caller must own the target entity.
    OwnerOnly,
}

/// Result of evaluating a policy set for a caller.
#[derive(Debug, Clone)]
pub enum Decision {
    /// An allow rule matched and no deny rule did.
    Allowed {
        /// The allow rule that granted access.
        matched: PolicyRule,
        /// Conditions the caller must still verify with entity data.
        unresolved: Vec<UnresolvedCondition>,
    },
    /// A deny rule matched, or no allow rule did.
    Denied {
        /// Human-readable reason for diagnostics.
        reason: String,
        /// The deny rule that matched, absent on an implicit default deny.
        matched: Option<PolicyRule>,
    },
}

impl Decision {
    /// `true` if access was granted (possibly with unresolved conditions).
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }

    /// Unresolved conditions on an allowed decision, empty otherwise.
    #[must_use]
    pub fn unresolved(&self) -> &[UnresolvedCondition] {
        match self {
            Self::Allowed { unresolved, .. } => unresolved,
            Self::Denied { .. } => &[],
        }
    }
}

/// Evaluate a policy set for a caller's roles against an access request.
///
/// Targeted deny rules are scanned as a full pass before any allow rule is
/// considered, regardless of where they appear in the set, so a tenant
/// override deny can never be bypassed by an earlier platform allow. Within
/// each pass the first structural match wins.
///
/// A deny rule with wildcard roles and no resource/action filter is a
/// written-out default deny: it cannot target anything, so it fires only
/// after the allow pass finds no grant, serving as evidence for the
/// denial. If nothing matches at all the result is an implicit default
/// deny.
#[must_use]
pub fn evaluate(roles: &[String], request: &AccessRequest<'_>, policy: &PolicySet) -> Decision {
    // Deny pass: first matching targeted deny short-circuits.
    for rule in policy.iter().filter(|r| is_targeted_deny(r)) {
        if rule_matches(rule, roles, request) {
            debug!(?rule, "deny rule matched");
            return Decision::Denied {
                reason: "explicitly denied by policy".into(),
                matched: Some(rule.clone()),
            };
        }
    }

    // Allow pass: first matching allow wins; conditions the evaluator
    // cannot resolve are surfaced to the caller.
    for rule in policy.iter().filter(|r| r.effect == Effect::Allow) {
        if rule_matches(rule, roles, request) {
            let mut unresolved = Vec::new();
            if let Some(conditions) = &rule.conditions {
                if conditions.owner_only {
                    unresolved.push(UnresolvedCondition::OwnerOnly);
                }
                // tenant_match is enforced by row-level tenant scoping in
                // the storage layer.
            }
            debug!(?rule, ?unresolved, "allow rule matched");
            return Decision::Allowed {
                matched: rule.clone(),
                unresolved,
            };
        }
    }

    // No grant: attribute the denial to a written-out default deny when
    // one is present.
    if let Some(rule) = policy
        .iter()
        .find(|r| r.effect == Effect::Deny && !is_targeted_deny(r))
    {
        return Decision::Denied {
            reason: "denied by default policy rule".into(),
            matched: Some(rule.clone()),
        };
    }

    Decision::Denied {
        reason: "no matching allow rule".into(),
        matched: None,
    }
}

/// A deny rule participates in the deny pass unless it is a catch-all:
/// wildcard roles and no resource/action filter.
fn is_targeted_deny(rule: &PolicyRule) -> bool {
    rule.effect == Effect::Deny
        && !(rule.roles.iter().any(|r| r == "*")
            && rule.resources.is_none()
            && rule.actions.is_none())
}

/// Role match plus resource/action filter match.
fn rule_matches(rule: &PolicyRule, roles: &[String], request: &AccessRequest<'_>) -> bool {
    role_matches(&rule.roles, roles)
        && filter_matches(rule.resources.as_deref(), request.resource)
        && filter_matches(rule.actions.as_deref(), request.action)
}

/// `"*"` matches any role list; otherwise any single shared role suffices.
fn role_matches(rule_roles: &[String], caller_roles: &[String]) -> bool {
    rule_roles
        .iter()
        .any(|r| r == "*" || caller_roles.iter().any(|c| c == r))
}

/// A filter constrains the match only when both the rule specifies it and
/// the request supplies the corresponding field.
fn filter_matches(filter: Option<&[String]>, value: Option<&str>) -> bool {
    match (filter, value) {
        (Some(patterns), Some(value)) => patterns.iter().any(|p| pattern_matches(p, value)),
        _ => true,
    }
}

/// Exact match, `"*"`, a namespaced `"ns.*"` pattern, or a verb-suffix
/// `"*.verb"` pattern.
///
/// Patterns split on the first `.`. With a `"*"` tail the namespace
/// segment must match exactly: `"erp.*"` matches `"erp.create"` but not
/// `"erp"` or `"other.create"`. With a `"*"` namespace the tail must
/// match exactly: `"*.list"` matches `"projects.list"` and `"erp.list"`
/// but not `"projects.delete"` or a bare `"list"`.
fn pattern_matches(pattern: &str, value: &str) -> bool {
    if pattern == "*" || pattern == value {
        return true;
    }
    match (pattern.split_once('.'), value.split_once('.')) {
        (Some((pat_ns, "*")), Some((val_ns, val_tail))) => pat_ns == val_ns && !val_tail.is_empty(),
        (Some(("*", pat_tail)), Some((_, val_tail))) => !pat_tail.is_empty() && pat_tail == val_tail,
        _ => false,
    }
}
