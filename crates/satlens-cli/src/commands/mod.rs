//! Command implementations

mod analyze;
mod chat;
mod config;
mod formats;
mod health;
mod history;
mod report;
mod track;

use crate::cli::{Cli, Commands};
use crate::config_loader::load_config;
use crate::output::OutputWriter;
use anyhow::Result;
use satlens_client::{ApiClient, ClientConfig};
use satlens_core::config::{ChatMode, CliConfigOverrides, LayeredConfig};

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);

    let chat_mode = match &cli.command {
        Commands::Chat(args) if args.demo => Some(ChatMode::Demo),
        _ => None,
    };
    let overrides = CliConfigOverrides {
        api_url: cli.api_url,
        gpt_model: cli.gpt_model,
        chat_mode,
    };
    let config = load_config(cli.config.as_deref(), overrides)?;

    match cli.command {
        Commands::Analyze(args) => analyze::execute(args, &config, &output).await,
        Commands::Track(args) => track::execute(args, &config, &output).await,
        Commands::Chat(args) => chat::execute(args, &config, &output).await,
        Commands::Report(args) => report::execute(args, &config, &output).await,
        Commands::History(args) => history::execute(args, &config, &output).await,
        Commands::Formats => formats::execute(&config, &output).await,
        Commands::Health => health::execute(&config, &output).await,
        Commands::Config => config::execute(&config, &output),
    }
}

/// HTTP client for the configured backend
fn api_client(config: &LayeredConfig) -> ApiClient {
    let mut client_config = ClientConfig::new(&config.api_url.value);
    if let Some(model) = &config.gpt_model.value {
        client_config = client_config.with_gpt_model(model.clone());
    }
    ApiClient::new(client_config)
}
