use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::state::State;

/// Who produced a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One role-tagged entry in a process transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub role: Role,
    pub content: String,
}

/// A single tool-crafting conversation: current workflow position, iteration
/// bookkeeping, and the append-only transcript of task exchanges.
///
/// Decision steps never touch the transcript; only task inputs and outputs
/// are durable history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Process {
    pub id: String,
    pub current_state: State,
    /// Completed design attempts in the current design/evaluate/refine loop.
    pub iteration_count: u32,
    /// Budget for the loop; enforced by transition guards, never clamped.
    pub max_iterations: u32,
    /// Outcome flag set by the most recent sandboxed execution, readable by
    /// guards and prompt rendering.
    pub last_run_succeeded: Option<bool>,
    pub transcript: Vec<TranscriptEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Process {
    pub fn new(max_iterations: u32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            current_state: State::RequirementProposal,
            iteration_count: 0,
            max_iterations,
            last_run_succeeded: None,
            transcript: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Move the process into `next`, running the state-entry hooks:
    /// entering the design state consumes one iteration from the budget,
    /// entering either finalize state resets the counter.
    pub fn enter(&mut self, next: State) {
        match next {
            State::ScriptDesignAndExecution => self.iteration_count += 1,
            State::FinalizeSuccess | State::FinalizeTimeup => self.iteration_count = 0,
            _ => {}
        }
        self.current_state = next;
        self.updated_at = Utc::now();
    }

    /// True once the iteration budget is used up. Guard input only.
    pub fn budget_exhausted(&self) -> bool {
        self.iteration_count >= self.max_iterations
    }

    /// Record one task exchange (triggering input plus model output).
    pub fn append_exchange(&mut self, input: &str, output: &str) {
        self.transcript.push(TranscriptEntry {
            role: Role::User,
            content: input.to_string(),
        });
        self.transcript.push(TranscriptEntry {
            role: Role::Assistant,
            content: output.to_string(),
        });
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn process_creation_defaults() {
        let process = Process::new(5);
        assert_eq!(process.current_state, State::RequirementProposal);
        assert_eq!(process.iteration_count, 0);
        assert_eq!(process.max_iterations, 5);
        assert_eq!(process.last_run_succeeded, None);
        assert!(process.transcript.is_empty());
    }

    #[test]
    fn entering_design_state_increments_iteration() {
        let mut process = Process::new(5);
        process.enter(State::ScriptDesignAndExecution);
        assert_eq!(process.iteration_count, 1);
        process.enter(State::ScriptExecutionEvaluation);
        assert_eq!(process.iteration_count, 1);
        process.enter(State::ScriptDesignAndExecution);
        assert_eq!(process.iteration_count, 2);
    }

    #[test]
    fn entering_finalize_resets_iteration() {
        let mut process = Process::new(5);
        process.enter(State::ScriptDesignAndExecution);
        process.enter(State::ScriptDesignAndExecution);
        assert_eq!(process.iteration_count, 2);

        process.enter(State::FinalizeSuccess);
        assert_eq!(process.iteration_count, 0);

        process.enter(State::ScriptDesignAndExecution);
        process.enter(State::FinalizeTimeup);
        assert_eq!(process.iteration_count, 0);
    }

    #[test]
    fn budget_exhausted_at_limit() {
        let mut process = Process::new(2);
        assert!(!process.budget_exhausted());
        process.enter(State::ScriptDesignAndExecution);
        assert!(!process.budget_exhausted());
        process.enter(State::ScriptDesignAndExecution);
        assert!(process.budget_exhausted());
    }

    #[test]
    fn zero_budget_is_exhausted_immediately() {
        let process = Process::new(0);
        assert!(process.budget_exhausted());
    }

    #[test]
    fn append_exchange_records_pair_in_order() {
        let mut process = Process::new(5);
        process.append_exchange("build a CSV validator", "Proposed requirements: ...");
        assert_eq!(process.transcript.len(), 2);
        assert_eq!(process.transcript[0].role, Role::User);
        assert_eq!(process.transcript[0].content, "build a CSV validator");
        assert_eq!(process.transcript[1].role, Role::Assistant);
    }

    #[test]
    fn process_serialization_roundtrip() {
        let mut process = Process::new(3);
        process.append_exchange("hi", "hello");
        let json = serde_json::to_string(&process).unwrap();
        let parsed: Process = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, process.id);
        assert_eq!(parsed.current_state, State::RequirementProposal);
        assert_eq!(parsed.transcript.len(), 2);
    }
}
