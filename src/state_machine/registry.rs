//! Static registry mapping each workflow state to its prompt metadata.
//!
//! The registry is read-only data: lookups are total over the closed
//! [`State`] enum and safe for unsynchronized concurrent reads. The
//! instruction renderer is a pure function of the state metadata and the
//! token list, so rendering the same snapshot twice yields identical text.

use super::state::{ActionKind, Decision, State};

/// Prompt metadata for one workflow state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateInfo {
    pub state: State,
    pub action_kind: ActionKind,
    /// Human-readable summary, also returned to the caller with turn output.
    pub description: &'static str,
    /// What the model is expected to do in this state.
    pub expected_behavior: &'static str,
    /// The shape the reply must take.
    pub response_format: &'static str,
}

/// Registry entries, one per state, in `State::ALL` order.
static REGISTRY: [StateInfo; 10] = [
    StateInfo {
        state: State::RequirementProposal,
        action_kind: ActionKind::Task,
        description: "Propose a clear and detailed requirement for the tool.",
        expected_behavior: "Based on the user's request, propose specific functionalities \
                            and any constraints or preferences mentioned by the user.",
        response_format: "Free-form response detailing the proposed requirements.",
    },
    StateInfo {
        state: State::Review,
        action_kind: ActionKind::Decision,
        description: "Review the proposed design and decide to implement or refine.",
        expected_behavior: "Evaluate the proposal against the user's feedback. Decide \
                            whether it is ready to implement or needs refinement.",
        response_format: "Choose exactly one of the available actions.",
    },
    StateInfo {
        state: State::ProposalRefinement,
        action_kind: ActionKind::Task,
        description: "Refine the proposed design based on feedback.",
        expected_behavior: "Address the points raised in the feedback and make the \
                            necessary improvements to the proposal.",
        response_format: "Free-form response detailing the refined design.",
    },
    StateInfo {
        state: State::ScriptDesignAndExecution,
        action_kind: ActionKind::Task,
        description: "Write the script implementing the approved design.",
        expected_behavior: "Using the approved design, produce a complete, runnable \
                            script. It will be executed immediately, so include \
                            everything needed to run it.",
        response_format: "A single fenced code block containing the full script.",
    },
    StateInfo {
        state: State::ScriptExecutionEvaluation,
        action_kind: ActionKind::Decision,
        description: "Evaluate the captured execution results.",
        expected_behavior: "Compare the execution output against the expected outcome \
                            and decide whether the results meet expectations.",
        response_format: "Choose exactly one of the available actions.",
    },
    StateInfo {
        state: State::ScriptAnalysisAndRefinement,
        action_kind: ActionKind::Task,
        description: "Analyze the failed execution and plan the next iteration.",
        expected_behavior: "Based on the execution results, explain what went wrong and \
                            propose specific changes for the next attempt.",
        response_format: "Detailed analysis and a concrete plan for this iteration.",
    },
    StateInfo {
        state: State::FinalizeSuccess,
        action_kind: ActionKind::Task,
        description: "Summarize the successfully crafted tool.",
        expected_behavior: "Provide a comprehensive summary of the tool: purpose, key \
                            features, usage instructions, and any limitations.",
        response_format: "Comprehensive final summary of the completed tool.",
    },
    StateInfo {
        state: State::FinalizeTimeup,
        action_kind: ActionKind::Task,
        description: "Summarize the development after the iteration budget ran out.",
        expected_behavior: "Summarize what was attempted, the current state of the \
                            script, the remaining problems, and suggested next steps.",
        response_format: "Honest summary of progress and outstanding issues.",
    },
    StateInfo {
        state: State::FinalReview,
        action_kind: ActionKind::Decision,
        description: "Conduct a final review of the tool with the user.",
        expected_behavior: "Based on the user's reaction to the summary, decide whether \
                            the tool needs further refinement or crafting is done.",
        response_format: "Choose exactly one of the available actions.",
    },
    StateInfo {
        state: State::End,
        action_kind: ActionKind::Decision,
        description: "The crafting process is finished.",
        expected_behavior: "If the user wants to build something new, start a fresh \
                            project.",
        response_format: "Choose exactly one of the available actions.",
    },
];

/// Look up the registry entry for a state. Total: every state in the closed
/// enum has an entry, and the table is indexed by declaration order.
pub fn describe(state: State) -> &'static StateInfo {
    &REGISTRY[state as usize]
}

/// Render the system instruction for a state.
///
/// `tokens` is the ordered list of decision tokens currently valid from the
/// state (declaration order from the transition table), so the "available
/// actions" listing is reproducible.
pub fn render_instruction(info: &StateInfo, tokens: &[Decision]) -> String {
    let available_actions = tokens
        .iter()
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "You are part of a tool development process managed by a state machine. \
         Your role is to assist in developing a tool based on user requirements. \
         Follow these guidelines and adhere to the response format strictly:\n\
         \n\
         Current State: {state}\n\
         State Description: {description}\n\
         \n\
         Available Actions: {available_actions}\n\
         \n\
         Action Type: {action_kind}\n\
         Required Action:\n\
         - If the action type is 'task': perform the task described in the Expected Behavior.\n\
         - If the action type is 'decision': select exactly one of the Available Actions.\n\
         \n\
         Expected Behavior:\n\
         {expected_behavior}\n\
         \n\
         Response Format:\n\
         {response_format}",
        state = info.state,
        description = info.description,
        available_actions = available_actions,
        action_kind = info.action_kind,
        expected_behavior = info.expected_behavior,
        response_format = info.response_format,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_state_has_an_entry_with_matching_state() {
        for state in State::ALL {
            let info = describe(state);
            assert_eq!(info.state, state);
            assert!(!info.description.is_empty());
        }
    }

    #[test]
    fn decision_states_are_marked_decision() {
        for state in [
            State::Review,
            State::ScriptExecutionEvaluation,
            State::FinalReview,
            State::End,
        ] {
            assert_eq!(describe(state).action_kind, ActionKind::Decision);
        }
    }

    #[test]
    fn task_states_are_marked_task() {
        for state in [
            State::RequirementProposal,
            State::ProposalRefinement,
            State::ScriptDesignAndExecution,
            State::ScriptAnalysisAndRefinement,
            State::FinalizeSuccess,
            State::FinalizeTimeup,
        ] {
            assert_eq!(describe(state).action_kind, ActionKind::Task);
        }
    }

    #[test]
    fn render_instruction_is_idempotent() {
        let info = describe(State::Review);
        let tokens = [Decision::RefineDesign, Decision::ImplementDesign];
        let first = render_instruction(info, &tokens);
        let second = render_instruction(info, &tokens);
        assert_eq!(first, second);
    }

    #[test]
    fn render_instruction_lists_tokens_in_order() {
        let info = describe(State::Review);
        let rendered =
            render_instruction(info, &[Decision::RefineDesign, Decision::ImplementDesign]);
        assert!(rendered.contains("Available Actions: refine_design, implement_design"));
        assert!(rendered.contains("Current State: review"));
        assert!(rendered.contains("Action Type: decision"));
    }

    #[test]
    fn render_instruction_lists_task_auto_token() {
        let info = describe(State::RequirementProposal);
        let rendered = render_instruction(info, &[Decision::ProposeDesign]);
        assert!(rendered.contains("Available Actions: propose_design"));
    }
}
