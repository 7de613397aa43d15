use async_trait::async_trait;
use thiserror::Error;

use agentgate_core::ExecutionContext;

/// Error returned by an action handler.
///
/// The dispatcher catches it at the boundary and normalizes it to an
/// `ACTION_FAILED` result, so a handler fault can never crash the
/// pipeline or leak a non-uniform error shape.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ActionError(String);

impl ActionError {
    /// Create a handler error with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// A named, schema-validated unit of business logic invocable through the
/// dispatcher.
///
/// Implementations are registered once at startup and dispatched by name.
/// Handlers receive the raw (already validated) JSON params and the
/// caller's execution context; entity and data services they need are
/// captured at construction.
#[async_trait]
pub trait Action: Send + Sync {
    /// Unique registration name, e.g. `"erp.create_company"`.
    fn name(&self) -> &str;

    /// Human-readable description for tool listings.
    fn description(&self) -> &str {
        ""
    }

    /// Resource type this action targets, matched against policy rule
    /// resource filters. `None` leaves resource filters unconstrained.
    fn resource(&self) -> Option<&str> {
        None
    }

    /// JSON Schema document the input params must satisfy.
    fn input_schema(&self) -> serde_json::Value;

    /// Run the action. Params have already passed schema validation.
    async fn execute(
        &self,
        ctx: &ExecutionContext,
        params: &serde_json::Value,
    ) -> Result<serde_json::Value, ActionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_error_display() {
        let err = ActionError::new("company already exists");
        assert_eq!(err.to_string(), "company already exists");
    }

    struct Noop;

    #[async_trait]
    impl Action for Noop {
        fn name(&self) -> &str {
            "noop"
        }

        fn input_schema(&self) -> serde_json::Value {
            serde_json::json!({"type": "object"})
        }

        async fn execute(
            &self,
            _ctx: &ExecutionContext,
            _params: &serde_json::Value,
        ) -> Result<serde_json::Value, ActionError> {
            Ok(serde_json::Value::Null)
        }
    }

    #[test]
    fn trait_defaults() {
        let action = Noop;
        assert_eq!(action.description(), "");
        assert!(action.resource().is_none());
    }
}
