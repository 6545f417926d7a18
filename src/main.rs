mod cli;
mod config;
mod controller;
mod error;
mod logging;
mod model;
mod router;
mod sandbox;
mod state_machine;
mod store;
mod ui;

use std::io::{BufRead, Write};

use anyhow::{Result, bail};
use clap::Parser;

use cli::{Cli, Command};
use config::ToolcraftConfig;
use controller::{CraftService, InteractionController};
use model::AnthropicClient;
use sandbox::ShellSandbox;
use state_machine::{State, TransitionTable, describe};
use store::ProcessStore;

/// The single conversation identity used by the interactive CLI. Hosts that
/// serve multiple conversations supply their own identities.
const LOCAL_IDENTITY: &str = "local";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut config = ToolcraftConfig::load()?;
    if let Some(max) = cli.max_iterations {
        config.max_iterations = max;
    }

    match cli.command {
        Command::States => {
            print_states();
            Ok(())
        }
        Command::Craft { prompt } => craft(config, prompt).await,
    }
}

async fn craft(config: ToolcraftConfig, prompt: Option<String>) -> Result<()> {
    if config.api_key.is_empty() {
        bail!("no API key configured; set ANTHROPIC_API_KEY or api_key in toolcraft.toml");
    }

    let client = AnthropicClient::new(
        config.api_key.clone(),
        config.model.clone(),
        config.max_tokens,
    );
    let sandbox = ShellSandbox::new(config.shell.clone());
    let service = CraftService::new(
        InteractionController::new(client, sandbox, config.max_internal_steps),
        ProcessStore::new(config.max_iterations),
    );

    println!("toolcraft session: type a request, /reset to start over, /quit to leave");
    let stdin = std::io::stdin();
    let mut next_input = prompt;

    loop {
        let input = match next_input.take() {
            Some(text) => text,
            None => {
                print!("you> ");
                std::io::stdout().flush()?;
                let mut line = String::new();
                if stdin.lock().read_line(&mut line)? == 0 {
                    break;
                }
                let line = line.trim().to_string();
                if line.is_empty() {
                    continue;
                }
                match line.as_str() {
                    "/quit" => break,
                    "/reset" => {
                        service.reset(LOCAL_IDENTITY).await;
                        println!("history cleared");
                        continue;
                    }
                    _ => line,
                }
            }
        };

        let progress = ui::TurnProgress::start();
        match service.process_turn(LOCAL_IDENTITY, &input).await {
            Ok(output) => progress.complete(&output),
            Err(err) => progress.fail(&err),
        }
    }

    Ok(())
}

fn print_states() {
    let table = TransitionTable::tool_crafting();
    for state in State::ALL {
        let info = describe(state);
        let actions = table
            .outgoing(state)
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        println!("{state} [{}]", info.action_kind);
        println!("    {}", info.description);
        println!("    actions: {actions}");
    }
}
