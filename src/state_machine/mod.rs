mod process;
pub mod registry;
mod state;
mod transition;

pub use process::{Process, Role, TranscriptEntry};
pub use registry::{StateInfo, describe, render_instruction};
pub use state::{ActionKind, Decision, State};
pub use transition::{Guard, TransitionRule, TransitionTable};
