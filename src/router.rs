//! Routes raw model replies according to the current state's action kind.

use crate::error::CraftError;
use crate::model::Completion;
use crate::state_machine::{ActionKind, Decision, StateInfo};

/// A model reply after routing: durable task output, or a decision token that
/// only steers the transition table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interpreted {
    Task(String),
    Decision(Decision),
}

/// Interpret `completion` for the given state.
///
/// Decision states require a structured choice whose token parses and is in
/// `valid` (the state's outgoing tokens); anything else is an
/// `InvalidDecision`: never coerced, never defaulted. Task states take the
/// reply text verbatim.
pub fn interpret(
    info: &StateInfo,
    completion: Completion,
    valid: &[Decision],
) -> Result<Interpreted, CraftError> {
    match info.action_kind {
        ActionKind::Task => match completion {
            Completion::Text(text) => Ok(Interpreted::Task(text)),
            Completion::Choice(token) => Err(CraftError::InvalidDecision {
                state: info.state,
                token: format!("unexpected structured choice in task state: {token}"),
            }),
        },
        ActionKind::Decision => match completion {
            Completion::Choice(token) => {
                let decision =
                    Decision::parse(&token).ok_or_else(|| CraftError::InvalidDecision {
                        state: info.state,
                        token: token.clone(),
                    })?;
                if valid.contains(&decision) {
                    Ok(Interpreted::Decision(decision))
                } else {
                    Err(CraftError::InvalidDecision {
                        state: info.state,
                        token,
                    })
                }
            }
            Completion::Text(text) => Err(CraftError::InvalidDecision {
                state: info.state,
                token: format!("free text instead of a structured choice: {text}"),
            }),
        },
    }
}
