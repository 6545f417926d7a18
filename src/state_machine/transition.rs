use crate::error::CraftError;

use super::process::Process;
use super::state::{Decision, State};

/// A pure predicate over process counters that disambiguates transitions
/// sharing the same (source, token) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// The design/evaluate/refine loop has used its whole budget.
    BudgetExhausted,
    /// The loop still has iterations left.
    BudgetRemaining,
}

impl Guard {
    /// Evaluate the guard against a process snapshot. Reads counters only,
    /// no side effects.
    pub fn holds(&self, process: &Process) -> bool {
        match self {
            Guard::BudgetExhausted => process.budget_exhausted(),
            Guard::BudgetRemaining => !process.budget_exhausted(),
        }
    }
}

/// One edge of the workflow graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRule {
    pub source: State,
    pub token: Decision,
    pub dest: State,
    pub guard: Option<Guard>,
}

/// The directed graph of (state, decision token) → next state.
///
/// Declaration order is significant: `outgoing` lists tokens in it, and
/// `apply` evaluates guards in it.
#[derive(Debug, Clone)]
pub struct TransitionTable {
    rules: Vec<TransitionRule>,
}

impl TransitionTable {
    /// Build a table, rejecting ambiguous rule sets: two rules with the same
    /// source and token are only allowed when every such rule carries a guard.
    pub fn new(rules: Vec<TransitionRule>) -> Result<Self, CraftError> {
        for (i, rule) in rules.iter().enumerate() {
            let duplicates = rules
                .iter()
                .enumerate()
                .any(|(j, other)| {
                    i != j && other.source == rule.source && other.token == rule.token
                });
            if duplicates && rule.guard.is_none() {
                return Err(CraftError::AmbiguousTransition {
                    state: rule.source,
                    token: rule.token,
                });
            }
        }
        Ok(Self { rules })
    }

    /// The canonical tool-crafting workflow.
    pub fn tool_crafting() -> Self {
        let rules = vec![
            rule(State::RequirementProposal, Decision::ProposeDesign, State::Review),
            rule(State::Review, Decision::RefineDesign, State::ProposalRefinement),
            rule(State::ProposalRefinement, Decision::ProposeRefinedDesign, State::Review),
            rule(State::Review, Decision::ImplementDesign, State::ScriptDesignAndExecution),
            rule(
                State::ScriptDesignAndExecution,
                Decision::EvalScript,
                State::ScriptExecutionEvaluation,
            ),
            rule(
                State::ScriptExecutionEvaluation,
                Decision::ResultsMetExpectations,
                State::FinalizeSuccess,
            ),
            rule(
                State::ScriptExecutionEvaluation,
                Decision::ResultsNotMetExpectations,
                State::ScriptAnalysisAndRefinement,
            ),
            guarded(
                State::ScriptAnalysisAndRefinement,
                Decision::Iterate,
                State::FinalizeTimeup,
                Guard::BudgetExhausted,
            ),
            guarded(
                State::ScriptAnalysisAndRefinement,
                Decision::Iterate,
                State::ScriptDesignAndExecution,
                Guard::BudgetRemaining,
            ),
            rule(State::FinalizeSuccess, Decision::SummarizeDevelopment, State::FinalReview),
            rule(State::FinalizeTimeup, Decision::SummarizeDevelopment, State::FinalReview),
            rule(State::FinalReview, Decision::RefineTool, State::ScriptDesignAndExecution),
            rule(State::FinalReview, Decision::EndToolCrafting, State::End),
            rule(State::End, Decision::NewProject, State::RequirementProposal),
        ];
        // The canonical rule set is validated by the constructor and covered
        // by tests; a failure here is an authoring defect in this file.
        Self::new(rules).expect("canonical transition table is ambiguous")
    }

    /// Decision tokens leaving `state`, in declaration order, deduplicated.
    pub fn outgoing(&self, state: State) -> Vec<Decision> {
        let mut tokens = Vec::new();
        for rule in self.rules.iter().filter(|r| r.source == state) {
            if !tokens.contains(&rule.token) {
                tokens.push(rule.token);
            }
        }
        tokens
    }

    /// Resolve the destination for `(state, token)` against a process
    /// snapshot.
    ///
    /// Guards are evaluated in declaration order and the first satisfied rule
    /// wins. A token with no rules is an `InvalidDecision`; rules whose
    /// guards all fail indicate a gap in guard coverage and surface as the
    /// fatal `NoGuardSatisfied`.
    pub fn apply(
        &self,
        state: State,
        token: Decision,
        process: &Process,
    ) -> Result<State, CraftError> {
        let mut matched_any = false;
        for rule in self
            .rules
            .iter()
            .filter(|r| r.source == state && r.token == token)
        {
            matched_any = true;
            match rule.guard {
                None => return Ok(rule.dest),
                Some(guard) if guard.holds(process) => return Ok(rule.dest),
                Some(_) => {}
            }
        }

        if matched_any {
            Err(CraftError::NoGuardSatisfied { state, token })
        } else {
            Err(CraftError::InvalidDecision {
                state,
                token: token.as_str().to_string(),
            })
        }
    }
}

fn rule(source: State, token: Decision, dest: State) -> TransitionRule {
    TransitionRule {
        source,
        token,
        dest,
        guard: None,
    }
}

fn guarded(source: State, token: Decision, dest: State, guard: Guard) -> TransitionRule {
    TransitionRule {
        source,
        token,
        dest,
        guard: Some(guard),
    }
}
