use thiserror::Error;

use crate::model::ModelError;
use crate::sandbox::SandboxError;
use crate::state_machine::{Decision, State};

/// Error taxonomy for the crafting core.
///
/// `AmbiguousTransition` and `NoGuardSatisfied` are authoring defects in the
/// transition table and must fail fast; `InvalidDecision` is a data-quality
/// error from the model and is surfaced so the caller can re-prompt; `Model`
/// and `Sandbox` are transient step-level failures that leave the process in
/// its pre-call state.
#[derive(Debug, Error)]
pub enum CraftError {
    #[error("invalid decision for state {state}: {token}")]
    InvalidDecision { state: State, token: String },

    #[error("no guard satisfied for ({state}, {token}); guard coverage has a gap")]
    NoGuardSatisfied { state: State, token: Decision },

    #[error("ambiguous transition table: ({state}, {token}) declared twice without guards")]
    AmbiguousTransition { state: State, token: Decision },

    #[error("turn exceeded {limit} internal steps without producing output")]
    MaxInternalStepsExceeded { limit: u32 },

    #[error("model error: {0}")]
    Model(#[from] ModelError),

    #[error("sandbox error: {0}")]
    Sandbox(#[from] SandboxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_decision_display() {
        let err = CraftError::InvalidDecision {
            state: State::Review,
            token: "approve".into(),
        };
        assert_eq!(err.to_string(), "invalid decision for state review: approve");
    }

    #[test]
    fn no_guard_satisfied_display() {
        let err = CraftError::NoGuardSatisfied {
            state: State::ScriptAnalysisAndRefinement,
            token: Decision::Iterate,
        };
        assert!(err.to_string().contains("guard coverage has a gap"));
    }

    #[test]
    fn max_internal_steps_display() {
        let err = CraftError::MaxInternalStepsExceeded { limit: 12 };
        assert_eq!(
            err.to_string(),
            "turn exceeded 12 internal steps without producing output"
        );
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CraftError>();
    }
}
