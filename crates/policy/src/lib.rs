pub mod defaults;
pub mod evaluate;
pub mod model;

pub use defaults::platform_defaults;
pub use evaluate::{evaluate, AccessRequest, Decision, UnresolvedCondition};
pub use model::{Effect, PolicyRule, PolicySet, RuleConditions};
