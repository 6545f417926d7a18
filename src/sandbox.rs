//! Sandboxed execution of generated scripts.
//!
//! A failing script is a normal [`ExecutionResult`]; only environment-level
//! failures (inability to spawn the shell) surface as [`SandboxError`].

use std::path::PathBuf;

use thiserror::Error;
use tokio::process::Command;

/// Captured outcome of running a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
    pub succeeded: bool,
}

/// Environment-level execution failure.
#[derive(Debug, Error)]
pub enum SandboxError {
    #[error("failed to spawn sandboxed command: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Executes a script payload and captures its output.
pub trait Sandbox: Send + Sync {
    fn run(
        &self,
        script: &str,
    ) -> impl Future<Output = Result<ExecutionResult, SandboxError>> + Send;
}

/// Runs scripts through a shell (`bash -c` by default), optionally inside a
/// fixed working directory.
pub struct ShellSandbox {
    shell: String,
    workdir: Option<PathBuf>,
}

impl ShellSandbox {
    pub fn new(shell: String) -> Self {
        Self {
            shell,
            workdir: None,
        }
    }

    pub fn with_workdir(shell: String, workdir: PathBuf) -> Self {
        Self {
            shell,
            workdir: Some(workdir),
        }
    }
}

impl Default for ShellSandbox {
    fn default() -> Self {
        Self::new("bash".to_string())
    }
}

impl Sandbox for ShellSandbox {
    async fn run(&self, script: &str) -> Result<ExecutionResult, SandboxError> {
        let mut command = Command::new(&self.shell);
        command.arg("-c").arg(script);
        if let Some(dir) = &self.workdir {
            command.current_dir(dir);
        }

        let output = command.output().await?;
        Ok(ExecutionResult {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            succeeded: output.status.success(),
        })
    }
}

/// Extract the script payload from a model reply.
///
/// Takes the body of the first fenced code block, tolerating a language tag
/// on the fence line. Replies without a fence are treated as bare scripts.
pub fn extract_script(text: &str) -> String {
    let mut lines = text.lines();
    let mut body: Option<Vec<&str>> = None;

    while let Some(line) = lines.next() {
        if line.trim_start().starts_with("```") {
            let mut collected = Vec::new();
            for inner in lines.by_ref() {
                if inner.trim_start().starts_with("```") {
                    return collected.join("\n");
                }
                collected.push(inner);
            }
            // Unterminated fence: keep what we collected.
            body = Some(collected);
            break;
        }
    }

    match body {
        Some(collected) => collected.join("\n"),
        None => text.trim().to_string(),
    }
}

/// Format a captured execution for feeding back into the evaluation state.
pub fn format_execution_report(result: &ExecutionResult) -> String {
    format!(
        "The script was executed. Succeeded: {}.\n\nstdout:\n{}\n\nstderr:\n{}",
        result.succeeded, result.stdout, result.stderr
    )
}
