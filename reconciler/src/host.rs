//! Boundary with the orchestration host.
//!
//! The host hands over a JSON argument document and reads back a JSON result
//! document on stdout.

use connect_config::{AppConfig, ConfigError};
use connect_models::{ModuleResponse, OperationResult, PruneParams, UpsertParams};
use connect_observability::{log_check_mode_skipped, EventCategory, RunContext};
use std::io::Read;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

use crate::client::ConnectClient;
use crate::error::ConnectError;
use crate::prune::ConnectorPruner;
use crate::upsert::ConnectorUpserter;

pub const USAGE: &str = "usage: connect-reconciler <upsert|prune> [ARGS_FILE]";

#[derive(Error, Debug)]
pub enum HostError {
    #[error("{}", USAGE)]
    Usage,

    #[error("Unknown operation '{0}', expected 'upsert' or 'prune'")]
    UnknownCommand(String),

    #[error("Failed to read arguments from {source_name}: {source}")]
    ReadArgs {
        source_name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid module arguments: {0}")]
    InvalidArgs(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Client(#[from] ConnectError),
}

impl HostError {
    /// Failure document for errors raised before any operation ran.
    pub fn into_response(self) -> ModuleResponse {
        let message = self.to_string();
        ModuleResponse::failure(message.clone(), OperationResult::new(false, message))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Upsert,
    Prune,
}

impl Command {
    pub fn category(self) -> EventCategory {
        match self {
            Command::Upsert => EventCategory::Upsert,
            Command::Prune => EventCategory::Prune,
        }
    }
}

impl FromStr for Command {
    type Err = HostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upsert" => Ok(Command::Upsert),
            "prune" => Ok(Command::Prune),
            other => Err(HostError::UnknownCommand(other.to_string())),
        }
    }
}

/// Parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: Command,
    /// Argument document path; stdin when absent.
    pub args_file: Option<PathBuf>,
}

impl Invocation {
    pub fn from_args<I>(args: I) -> Result<Self, HostError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let command = args.next().ok_or(HostError::Usage)?.parse()?;
        let args_file = args.next().map(PathBuf::from);
        if args.next().is_some() {
            return Err(HostError::Usage);
        }
        Ok(Self { command, args_file })
    }

    pub fn read_arguments(&self) -> Result<String, HostError> {
        match &self.args_file {
            Some(path) => std::fs::read_to_string(path).map_err(|source| HostError::ReadArgs {
                source_name: path.display().to_string(),
                source,
            }),
            None => {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .map_err(|source| HostError::ReadArgs {
                        source_name: "stdin".to_string(),
                        source,
                    })?;
                Ok(buf)
            }
        }
    }
}

/// Runs one operation from its raw argument document.
///
/// Always yields a fully populated response; operation errors become failure
/// documents.
pub async fn run(command: Command, arguments: &str, config: &AppConfig) -> ModuleResponse {
    let ctx = RunContext::new(&config.service_name);
    info!(run_id = %ctx.run_id, operation = ?command, "starting reconciliation");

    match dispatch(command, arguments, config, &ctx).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

async fn dispatch(
    command: Command,
    arguments: &str,
    config: &AppConfig,
    ctx: &RunContext,
) -> Result<ModuleResponse, HostError> {
    let response: ModuleResponse = match command {
        Command::Upsert => {
            let params: UpsertParams = serde_json::from_str(arguments)?;
            if params.check_mode {
                return Ok(check_mode_response(command, ctx));
            }
            let client = ConnectClient::new(config.http_client.clone(), &params.connect_url)?;
            ConnectorUpserter::new(&client, ctx)
                .upsert(&params.name, &params.config)
                .await
                .into()
        }
        Command::Prune => {
            let params: PruneParams = serde_json::from_str(arguments)?;
            if params.check_mode {
                return Ok(check_mode_response(command, ctx));
            }
            let client = ConnectClient::new(config.http_client.clone(), &params.connect_url)?;
            ConnectorPruner::new(&client, ctx)
                .prune(&params.active_connectors)
                .await
                .into()
        }
    };
    Ok(response)
}

fn check_mode_response(command: Command, ctx: &RunContext) -> ModuleResponse {
    log_check_mode_skipped(ctx, command.category());
    ModuleResponse::success(OperationResult::unchanged())
}

/// Exit status matching a response document.
pub fn exit_code(response: &ModuleResponse) -> u8 {
    if response.is_failure() {
        1
    } else {
        0
    }
}
