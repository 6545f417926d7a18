//! The interaction controller: drives one external turn through as many
//! internal state transitions as it takes to produce user-visible output.
//!
//! Decision states never produce output, so the controller loops (render the
//! state instruction, dispatch to the model, route the reply, apply the
//! transition) until a task's text terminates the turn. The
//! one exception is the script design state, whose sandboxed execution
//! result is substituted as the next input instead of ending the turn. The
//! loop is bounded by `max_internal_steps` so a cycle of decision states
//! becomes a detectable error instead of unbounded recursion.

use tracing::debug;

use crate::error::CraftError;
use crate::model::{CompletionRequest, Message, ModelClient};
use crate::router::{Interpreted, interpret};
use crate::sandbox::{Sandbox, extract_script, format_execution_report};
use crate::state_machine::{
    ActionKind, Decision, Process, State, TransitionTable, describe, render_instruction,
};
use crate::store::ProcessStore;

/// What a completed turn hands back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutput {
    /// The task text to show the user.
    pub visible_output: String,
    /// Description of the state the process ended the turn in.
    pub state_description: String,
}

/// Owns the workflow mechanics for a single process at a time.
pub struct InteractionController<M, S> {
    model: M,
    sandbox: S,
    table: TransitionTable,
    max_internal_steps: u32,
}

impl<M: ModelClient, S: Sandbox> InteractionController<M, S> {
    pub fn new(model: M, sandbox: S, max_internal_steps: u32) -> Self {
        Self {
            model,
            sandbox,
            table: TransitionTable::tool_crafting(),
            max_internal_steps,
        }
    }

    /// Drive one logical turn to completion.
    ///
    /// On error the process keeps the state it last successfully entered; no
    /// partial transition is ever applied.
    pub async fn run_turn(
        &self,
        process: &mut Process,
        input: &str,
    ) -> Result<TurnOutput, CraftError> {
        let mut input = input.to_string();

        for step in 0..self.max_internal_steps {
            let state = process.current_state;
            let info = describe(state);
            let tokens = self.table.outgoing(state);
            let system = render_instruction(info, &tokens);

            let request = CompletionRequest {
                system: Some(system),
                messages: compose_messages(process, &input),
                choices: (info.action_kind == ActionKind::Decision)
                    .then(|| tokens.iter().map(|t| t.as_str().to_string()).collect()),
            };

            debug!(%state, step, kind = %info.action_kind, "dispatching model request");
            let completion = self.model.complete(&request).await?;

            match interpret(info, completion, &tokens)? {
                Interpreted::Decision(token) => {
                    let next = self.table.apply(state, token, process)?;
                    debug!(from = %state, %token, to = %next, "decision transition");
                    process.enter(next);
                    // Same input carries into the next state.
                }
                Interpreted::Task(text) => {
                    if state == State::ScriptDesignAndExecution {
                        // Execute before touching the transcript so a sandbox
                        // failure leaves the process exactly as it was.
                        let script = extract_script(&text);
                        let result = self.sandbox.run(&script).await?;
                        debug!(succeeded = result.succeeded, "script executed");

                        process.append_exchange(&input, &text);
                        process.last_run_succeeded = Some(result.succeeded);
                        let next = self.table.apply(state, Decision::EvalScript, process)?;
                        process.enter(next);
                        // The captured output becomes the next input; the
                        // turn continues into the evaluation state.
                        input = format_execution_report(&result);
                    } else {
                        process.append_exchange(&input, &text);
                        if let Some(token) = auto_token(state) {
                            let next = self.table.apply(state, token, process)?;
                            debug!(from = %state, %token, to = %next, "task bookkeeping transition");
                            process.enter(next);
                        }
                        return Ok(TurnOutput {
                            visible_output: text,
                            state_description: describe(process.current_state)
                                .description
                                .to_string(),
                        });
                    }
                }
            }
        }

        Err(CraftError::MaxInternalStepsExceeded {
            limit: self.max_internal_steps,
        })
    }
}

/// Transcript plus the current input, in model wire form.
fn compose_messages(process: &Process, input: &str) -> Vec<Message> {
    let mut messages: Vec<Message> = process
        .transcript
        .iter()
        .map(|entry| Message {
            role: entry.role.as_str().to_string(),
            content: entry.content.clone(),
        })
        .collect();
    messages.push(Message {
        role: "user".to_string(),
        content: input.to_string(),
    });
    messages
}

/// The deterministic transition a task state applies after its output is
/// recorded. Decision states steer through the model instead and have none.
fn auto_token(state: State) -> Option<Decision> {
    match state {
        State::RequirementProposal => Some(Decision::ProposeDesign),
        State::ProposalRefinement => Some(Decision::ProposeRefinedDesign),
        State::ScriptDesignAndExecution => Some(Decision::EvalScript),
        State::ScriptAnalysisAndRefinement => Some(Decision::Iterate),
        State::FinalizeSuccess | State::FinalizeTimeup => Some(Decision::SummarizeDevelopment),
        State::Review
        | State::ScriptExecutionEvaluation
        | State::FinalReview
        | State::End => None,
    }
}

/// Consumer-facing facade: per-identity processes with serialized turns.
pub struct CraftService<M, S> {
    controller: InteractionController<M, S>,
    store: ProcessStore,
}

impl<M: ModelClient, S: Sandbox> CraftService<M, S> {
    pub fn new(controller: InteractionController<M, S>, store: ProcessStore) -> Self {
        Self { controller, store }
    }

    /// Run one turn for `identity`, creating its process on first use.
    ///
    /// Turns for the same identity queue behind each other on the process
    /// lock; turns for distinct identities run in parallel.
    pub async fn process_turn(
        &self,
        identity: &str,
        input: &str,
    ) -> Result<TurnOutput, CraftError> {
        let handle = self.store.get_or_create(identity).await;
        let mut process = handle.lock().await;
        self.controller.run_turn(&mut process, input).await
    }

    /// Atomically delete the process for `identity`. Returns whether one
    /// existed.
    pub async fn reset(&self, identity: &str) -> bool {
        self.store.remove(identity).await
    }
}
