use serde::{Deserialize, Serialize};

/// Outcome of dispatching an action through the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ActionOutcome {
    /// The handler ran and returned a result payload.
    Completed { data: serde_json::Value },
    /// A prior successful run with the same idempotency key was found; the
    /// cached result is returned and the handler was not invoked.
    Replayed { data: serde_json::Value },
    /// Authorization denied the action. This is a typed decision, not a
    /// fault; `matched_rule` carries the denying rule for diagnostics.
    Denied {
        reason: String,
        matched_rule: Option<serde_json::Value>,
    },
    /// The action was not executed to completion.
    Failed(ActionFailure),
}

impl ActionOutcome {
    /// Result payload for `Completed` and `Replayed` outcomes.
    #[must_use]
    pub fn data(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Completed { data } | Self::Replayed { data } => Some(data),
            Self::Denied { .. } | Self::Failed(_) => None,
        }
    }

    /// `true` for `Completed` and `Replayed`.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed { .. } | Self::Replayed { .. })
    }

    /// Failure detail, if the outcome is `Failed`.
    #[must_use]
    pub fn failure(&self) -> Option<&ActionFailure> {
        match self {
            Self::Failed(f) => Some(f),
            _ => None,
        }
    }
}

/// Error detail when an action is not executed to completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionFailure {
    /// Stable error code callers can gate on.
    pub code: ErrorCode,
    /// Human-readable message. May carry detail; the shape never does.
    pub message: String,
}

impl ActionFailure {
    /// Create a failure with the given code and message.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Stable error codes surfaced to dispatcher callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// No action is registered under the requested name.
    ActionNotFound,
    /// Input params failed schema validation; the handler was not invoked.
    ValidationError,
    /// The handler returned an error.
    ActionFailed,
}

impl ErrorCode {
    /// Wire representation, e.g. `ACTION_NOT_FOUND`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ActionNotFound => "ACTION_NOT_FOUND",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::ActionFailed => "ACTION_FAILED",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completed_exposes_data() {
        let outcome = ActionOutcome::Completed {
            data: serde_json::json!({"id": 42}),
        };
        assert!(outcome.is_success());
        assert_eq!(outcome.data().unwrap()["id"], 42);
    }

    #[test]
    fn replayed_counts_as_success() {
        let outcome = ActionOutcome::Replayed {
            data: serde_json::Value::Null,
        };
        assert!(outcome.is_success());
        assert!(outcome.data().is_some());
    }

    #[test]
    fn failed_exposes_failure() {
        let outcome = ActionOutcome::Failed(ActionFailure::new(
            ErrorCode::ActionNotFound,
            "action not found: nonexistent",
        ));
        assert!(!outcome.is_success());
        assert!(outcome.data().is_none());
        assert_eq!(outcome.failure().unwrap().code, ErrorCode::ActionNotFound);
    }

    #[test]
    fn error_code_wire_names() {
        assert_eq!(ErrorCode::ActionNotFound.as_str(), "ACTION_NOT_FOUND");
        assert_eq!(ErrorCode::ValidationError.as_str(), "VALIDATION_ERROR");
        assert_eq!(ErrorCode::ActionFailed.as_str(), "ACTION_FAILED");
        let json = serde_json::to_string(&ErrorCode::ValidationError).unwrap();
        assert_eq!(json, "\"VALIDATION_ERROR\"");
    }

    #[test]
    fn outcome_serde_roundtrip() {
        let outcome = ActionOutcome::Denied {
            reason: "no matching allow rule".into(),
            matched_rule: None,
        };
        let json = serde_json::to_string(&outcome).unwrap();
        let back: ActionOutcome = serde_json::from_str(&json).unwrap();
        assert!(matches!(back, ActionOutcome::Denied { .. }));
    }
}
