//! Command-line interface built on clap.

use clap::{Parser, Subcommand};

/// toolcraft: LLM-driven tool-crafting orchestrator.
#[derive(Debug, Parser)]
#[command(name = "toolcraft", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Budget for the design/evaluate/refine loop.
    #[arg(long, global = true)]
    pub max_iterations: Option<u32>,

    /// Enable verbose output.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start an interactive crafting session.
    Craft {
        /// Initial request (what tool to craft). Prompted for when omitted.
        prompt: Option<String>,
    },

    /// Print the workflow states and their transitions.
    States,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_craft_subcommand() {
        let cli = Cli::parse_from(["toolcraft", "craft", "build a CSV validator"]);
        match cli.command {
            Command::Craft { prompt } => {
                assert_eq!(prompt.unwrap(), "build a CSV validator");
            }
            _ => panic!("expected Craft command"),
        }
    }

    #[test]
    fn cli_parses_global_flags() {
        let cli = Cli::parse_from(["toolcraft", "--max-iterations", "3", "--verbose", "states"]);
        assert!(cli.verbose);
        assert_eq!(cli.max_iterations, Some(3));
        assert!(matches!(cli.command, Command::States));
    }

    #[test]
    fn cli_craft_prompt_is_optional() {
        let cli = Cli::parse_from(["toolcraft", "craft"]);
        match cli.command {
            Command::Craft { prompt } => assert!(prompt.is_none()),
            _ => panic!("expected Craft command"),
        }
    }

    #[test]
    fn cli_verify() {
        Cli::command().debug_assert();
    }
}
