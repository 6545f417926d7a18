use std::fmt;

use serde::{Deserialize, Serialize};

/// The states of the tool-crafting workflow.
///
/// Each crafting process starts in `RequirementProposal` and terminates in
/// `End` (from which `new_project` restarts the machine). The design/evaluate/
/// refine loop (`ScriptDesignAndExecution` ⇄ `ScriptExecutionEvaluation` ⇄
/// `ScriptAnalysisAndRefinement`) is bounded by the process iteration budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum State {
    RequirementProposal,
    Review,
    ProposalRefinement,
    ScriptDesignAndExecution,
    ScriptExecutionEvaluation,
    ScriptAnalysisAndRefinement,
    FinalizeSuccess,
    FinalizeTimeup,
    FinalReview,
    End,
}

impl State {
    /// All workflow states, in workflow order.
    pub const ALL: [State; 10] = [
        State::RequirementProposal,
        State::Review,
        State::ProposalRefinement,
        State::ScriptDesignAndExecution,
        State::ScriptExecutionEvaluation,
        State::ScriptAnalysisAndRefinement,
        State::FinalizeSuccess,
        State::FinalizeTimeup,
        State::FinalReview,
        State::End,
    ];

    /// The wire/prompt identifier for this state.
    pub fn as_str(&self) -> &'static str {
        match self {
            State::RequirementProposal => "requirement_proposal",
            State::Review => "review",
            State::ProposalRefinement => "proposal_refinement",
            State::ScriptDesignAndExecution => "script_design_and_execution",
            State::ScriptExecutionEvaluation => "script_execution_evaluation",
            State::ScriptAnalysisAndRefinement => "script_analysis_and_refinement",
            State::FinalizeSuccess => "finalize_success",
            State::FinalizeTimeup => "finalize_timeup",
            State::FinalReview => "final_review",
            State::End => "end",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a state's model reply is interpreted: free text to keep, or a forced
/// choice from the state's enumerated token set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Task,
    Decision,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Task => write!(f, "task"),
            ActionKind::Decision => write!(f, "decision"),
        }
    }
}

/// Decision tokens accepted by the transition table.
///
/// For decision states these are the choices offered to the model; for task
/// states the single outgoing token is applied by the controller as
/// deterministic bookkeeping after the task completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    ProposeDesign,
    RefineDesign,
    ProposeRefinedDesign,
    ImplementDesign,
    EvalScript,
    ResultsMetExpectations,
    ResultsNotMetExpectations,
    Iterate,
    SummarizeDevelopment,
    RefineTool,
    EndToolCrafting,
    NewProject,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::ProposeDesign => "propose_design",
            Decision::RefineDesign => "refine_design",
            Decision::ProposeRefinedDesign => "propose_refined_design",
            Decision::ImplementDesign => "implement_design",
            Decision::EvalScript => "eval_script",
            Decision::ResultsMetExpectations => "results_met_expectations",
            Decision::ResultsNotMetExpectations => "results_not_met_expectations",
            Decision::Iterate => "iterate",
            Decision::SummarizeDevelopment => "summarize_development",
            Decision::RefineTool => "refine_tool",
            Decision::EndToolCrafting => "end_tool_crafting",
            Decision::NewProject => "new_project",
        }
    }

    /// Parse a model-supplied token. Returns `None` for anything outside the
    /// closed token set; the caller decides how to surface that.
    pub fn parse(token: &str) -> Option<Decision> {
        match token.trim() {
            "propose_design" => Some(Decision::ProposeDesign),
            "refine_design" => Some(Decision::RefineDesign),
            "propose_refined_design" => Some(Decision::ProposeRefinedDesign),
            "implement_design" => Some(Decision::ImplementDesign),
            "eval_script" => Some(Decision::EvalScript),
            "results_met_expectations" => Some(Decision::ResultsMetExpectations),
            "results_not_met_expectations" => Some(Decision::ResultsNotMetExpectations),
            "iterate" => Some(Decision::Iterate),
            "summarize_development" => Some(Decision::SummarizeDevelopment),
            "refine_tool" => Some(Decision::RefineTool),
            "end_tool_crafting" => Some(Decision::EndToolCrafting),
            "new_project" => Some(Decision::NewProject),
            _ => None,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
