//! mistral: a small command-line front end for the Mistral API.
//!
//! Usage:
//!   mistral --key <KEY> models                         List available models
//!   mistral --key <KEY> chat-completion [--stream]     Interactive chat session

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use futures::StreamExt;
use mistral_client::types::{ChatRequest, Message};
use mistral_client::MistralClient;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

/// A utility for interacting with the Mistral API
#[derive(Parser, Debug)]
#[command(name = "mistral")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Your API key
    #[arg(short, long, env = "MISTRAL_API_KEY", hide_env_values = true)]
    key: String,

    /// Model to use
    #[arg(short, long, global = true, default_value = "mistral-large-latest")]
    model: String,

    /// System prompt, given inline or as a path to a file
    #[arg(short, long, global = true)]
    system_prompt: Option<String>,

    /// Optional client config file (YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Returns available models
    Models,

    /// Completes a chat request
    ChatCompletion {
        /// Stream chat output
        #[arg(long)]
        stream: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut builder = MistralClient::builder().api_key(cli.key.clone());
    if let Some(path) = &cli.config {
        builder = builder.config_file(path);
    }
    let client = builder.build().context("Failed to build client")?;

    match cli.command.unwrap_or(Commands::Models) {
        Commands::Models => list_models(&client).await,
        Commands::ChatCompletion { stream } => {
            let system = cli.system_prompt.as_deref().map(read_value).transpose()?;
            chat(&client, &cli.model, system, stream).await
        }
    }
}

async fn list_models(client: &MistralClient) -> Result<()> {
    let models = client.models().await.context("Failed to list models")?;
    for id in models.ids() {
        println!("{}", id);
    }
    Ok(())
}

async fn chat(
    client: &MistralClient,
    model: &str,
    system: Option<String>,
    stream: bool,
) -> Result<()> {
    let mut messages = Vec::new();
    let mut out = std::io::stdout();

    writeln!(out, "\nUsing {}\n", model)?;
    if let Some(system) = system {
        writeln!(out, "System Prompt:\n{}\n", system)?;
        messages.push(Message::system(system));
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("exit") {
            writeln!(out, "Exiting...")?;
            break;
        }

        messages.push(Message::user(input));
        let request = ChatRequest::new(model, messages.clone());

        let reply = if stream {
            let mut events = client.chat_completions_stream(&request.stream(true)).await?;
            let mut text = String::new();
            while let Some(chunk) = events.next().await {
                let delta = chunk?.delta_content().unwrap_or_default().to_string();
                write!(out, "{}", delta)?;
                out.flush()?;
                text.push_str(&delta);
            }
            text
        } else {
            let response = client.chat_completions(&request).await?;
            let text = response.content().unwrap_or_default().to_string();
            write!(out, "{}", text)?;
            text
        };
        writeln!(out)?;
        messages.push(Message::assistant(reply));
    }
    Ok(())
}

/// Treat `input` as a file path if one exists there, otherwise as the value itself.
fn read_value(input: &str) -> Result<String> {
    let path = Path::new(input);
    if path.is_file() {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read system prompt from {}", path.display()))
    } else {
        Ok(input.to_string())
    }
}
