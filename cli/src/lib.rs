//! Command-line front end for managing client registrations.
//!
//! Parses arguments, turns each subcommand into one [`ClientManager`] call and
//! renders the result. Credentials are attached by building the reqwest
//! client with a default `Authorization` header.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use ironclad_client::{
    CancellationToken, Client, ClientError, ClientManager, IroncladClient, Page, ReqwestTransport,
};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;

/// Manage client registrations on an Ironclad identity server.
#[derive(Debug, Parser)]
#[command(name = "ironclad-clients", version)]
pub struct Cli {
    /// Base URL of the identity server
    #[arg(long, env = "IRONCLAD_AUTHORITY", default_value = "http://localhost:5005")]
    pub authority: String,

    /// Bearer token sent with every request
    #[arg(long, env = "IRONCLAD_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Output format for returned resources
    #[arg(long, value_enum, default_value = "json-pretty")]
    pub format: OutputFormat,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    JsonPretty,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List client summaries
    List {
        /// Zero-based offset of the first client
        #[arg(long, default_value_t = 0)]
        start: usize,
        /// Page size; 0 uses the server default of 20
        #[arg(long, default_value_t = 0)]
        size: usize,
    },
    /// Show one client
    Get { client_id: String },
    /// Register a client from a JSON document
    Register {
        #[arg(long)]
        file: PathBuf,
    },
    /// Replace a client with the JSON document's contents
    Modify {
        #[arg(long)]
        file: PathBuf,
    },
    /// Remove a client
    Unregister { client_id: String },
}

/// What a command produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Resource(Value),
    Message(String),
}

impl Output {
    pub fn render(&self, format: OutputFormat) -> anyhow::Result<String> {
        match self {
            Output::Message(message) => Ok(message.clone()),
            Output::Resource(value) => Ok(match format {
                OutputFormat::Json => serde_json::to_string(value)?,
                OutputFormat::JsonPretty => serde_json::to_string_pretty(value)?,
            }),
        }
    }
}

/// Build the client for `cli`, attaching the bearer token when given.
pub fn connect(cli: &Cli) -> anyhow::Result<IroncladClient> {
    let mut headers = HeaderMap::new();
    if let Some(token) = &cli.token {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}")).context("invalid token")?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }
    let http = reqwest::Client::builder()
        .default_headers(headers)
        .build()
        .context("failed to build HTTP client")?;
    Ok(IroncladClient::with_transport(
        &cli.authority,
        ReqwestTransport::from_client(http),
    ))
}

pub async fn execute(
    manager: &dyn ClientManager,
    command: &Command,
    cancel: &CancellationToken,
) -> anyhow::Result<Output> {
    match command {
        Command::List { start, size } => {
            let set = manager
                .get_client_summaries(Page::new(*start, *size), cancel)
                .await?;
            Ok(Output::Resource(serde_json::to_value(set)?))
        }
        Command::Get { client_id } => {
            let client = manager.get_client(client_id, cancel).await?;
            Ok(Output::Resource(serde_json::to_value(client)?))
        }
        Command::Register { file } => {
            let client = load_client(file).await?;
            manager.register_client(&client, cancel).await?;
            Ok(Output::Message(format!("registered client '{}'", client.id)))
        }
        Command::Modify { file } => {
            let client = load_client(file).await?;
            manager.modify_client(&client, cancel).await?;
            Ok(Output::Message(format!("modified client '{}'", client.id)))
        }
        Command::Unregister { client_id } => {
            manager
                .unregister_client(&Client::new(client_id.as_str()), cancel)
                .await?;
            Ok(Output::Message(format!("unregistered client '{client_id}'")))
        }
    }
}

async fn load_client(path: &Path) -> anyhow::Result<Client> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("{} is not a valid client document", path.display()))
}

/// Process exit code for a failed command.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<ClientError>() {
        Some(ClientError::Request { .. }) => 2,
        Some(ClientError::Cancelled) => 130,
        _ => 1,
    }
}
