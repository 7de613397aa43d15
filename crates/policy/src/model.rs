use serde::{Deserialize, Serialize};

/// Whether a matching rule grants or refuses access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    Allow,
    Deny,
}

/// Conditions attached to an allow rule.
///
/// `owner_only` cannot be resolved from roles alone; the evaluator surfaces
/// it as an unresolved condition and a layer with access to the target
/// entity must verify ownership before honoring the action. `tenant_match`
/// is enforced by the storage layer's row-level tenant scoping and is a
/// no-op during evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConditions {
    /// Restrict the grant to the caller's own tenant rows.
    #[serde(default)]
    pub tenant_match: bool,

    /// Restrict the grant to entities owned by the caller.
    #[serde(default)]
    pub owner_only: bool,
}

/// A single allow/deny statement keyed by role, optionally scoped to
/// resource types and/or action names.
///
/// Immutable once part of a persisted policy set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyRule {
    /// Roles this rule applies to. `"*"` matches any caller.
    pub roles: Vec<String>,

    /// Resource-type filter. Absent means the rule matches any resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<String>>,

    /// Action-name filter. Absent means the rule matches any action.
    /// Entries may be exact names, `"*"`, or namespaced patterns like
    /// `"erp.*"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<String>>,

    /// Grant or refuse.
    pub effect: Effect,

    /// Optional conditions evaluated on allow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<RuleConditions>,
}

impl PolicyRule {
    /// Create an allow rule for the given roles with no filters.
    #[must_use]
    pub fn allow(roles: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::new(roles, Effect::Allow)
    }

    /// Create a deny rule for the given roles with no filters.
    #[must_use]
    pub fn deny(roles: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::new(roles, Effect::Deny)
    }

    fn new(roles: impl IntoIterator<Item = impl Into<String>>, effect: Effect) -> Self {
        Self {
            roles: roles.into_iter().map(Into::into).collect(),
            resources: None,
            actions: None,
            effect,
            conditions: None,
        }
    }

    /// Scope the rule to the given resource types.
    #[must_use]
    pub fn on_resources(mut self, resources: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.resources = Some(resources.into_iter().map(Into::into).collect());
        self
    }

    /// Scope the rule to the given action names or patterns.
    #[must_use]
    pub fn on_actions(mut self, actions: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.actions = Some(actions.into_iter().map(Into::into).collect());
        self
    }

    /// Attach an `owner_only` condition.
    #[must_use]
    pub fn owner_only(mut self) -> Self {
        self.conditions = Some(RuleConditions {
            owner_only: true,
            ..self.conditions.unwrap_or_default()
        });
        self
    }

    /// Attach a `tenant_match` condition.
    #[must_use]
    pub fn tenant_match(mut self) -> Self {
        self.conditions = Some(RuleConditions {
            tenant_match: true,
            ..self.conditions.unwrap_or_default()
        });
        self
    }
}

/// An ordered sequence of policy rules.
///
/// Order matters only within the same effect class: the evaluator runs a
/// full deny pass before considering any allow rule, and within each pass
/// the first structural match wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolicySet(Vec<PolicyRule>);

impl PolicySet {
    /// Create an empty policy set. Evaluating it denies everything.
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a rule.
    pub fn push(&mut self, rule: PolicyRule) {
        self.0.push(rule);
    }

    /// Iterate the rules in order.
    pub fn iter(&self) -> std::slice::Iter<'_, PolicyRule> {
        self.0.iter()
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` if the set has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Return a new set with `other`'s rules appended after this set's.
    ///
    /// Used to layer a tenant override after the platform defaults, so a
    /// tenant deny can override a platform allow under deny-first
    /// evaluation.
    #[must_use]
    pub fn concat(&self, other: &PolicySet) -> PolicySet {
        let mut rules = self.0.clone();
        rules.extend(other.0.iter().cloned());
        PolicySet(rules)
    }
}

impl FromIterator<PolicyRule> for PolicySet {
    fn from_iter<I: IntoIterator<Item = PolicyRule>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Vec<PolicyRule>> for PolicySet {
    fn from(rules: Vec<PolicyRule>) -> Self {
        Self(rules)
    }
}

impl<'a> IntoIterator for &'a PolicySet {
    type Item = &'a PolicyRule;
    type IntoIter = std::slice::Iter<'a, PolicyRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
