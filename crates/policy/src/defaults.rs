use crate::model::{PolicyRule, PolicySet};

/// Platform default rules, layered before any tenant override.
///
/// Administrators and owners get full access; members get the operational
/// surface minus the `admin.*` namespace; viewers get the read verbs only
/// (default deny covers the rest).
#[must_use]
pub fn platform_defaults() -> PolicySet {
    PolicySet::from_iter([
        PolicyRule::allow(["admin", "owner"]),
        PolicyRule::deny(["member", "viewer"]).on_actions(["admin.*"]),
        PolicyRule::allow(["member"]),
        PolicyRule::allow(["viewer"]).on_actions(["*.list", "*.get"]),
    ])
}
