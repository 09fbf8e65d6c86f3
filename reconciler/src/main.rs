use std::io::Write;
use std::process::ExitCode;

use anyhow::Context;
use connect_config::{AppConfig, DEFAULT_SERVICE_NAME};
use connect_models::ModuleResponse;
use connect_observability::{init_tracing, log_timed, TracingConfig};
use connect_reconciler::host::{self, HostError, Invocation};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let config = AppConfig::from_env();
    init_tracing(tracing_config(config.as_ref().ok()));

    let response = match config.map_err(HostError::from).and_then(prepare) {
        Ok((invocation, arguments, config)) => {
            log_timed!(
                "reconcile",
                host::run(invocation.command, &arguments, &config).await
            )
        }
        Err(err) => {
            tracing::error!(error = %err, "could not start reconciliation");
            err.into_response()
        }
    };

    if let Err(err) = emit(&response) {
        tracing::error!(error = %err, "failed to write result document");
        return ExitCode::FAILURE;
    }
    ExitCode::from(host::exit_code(&response))
}

fn tracing_config(config: Option<&AppConfig>) -> TracingConfig {
    match config {
        Some(config) => TracingConfig::for_service(config.service_name.clone())
            .with_environment(config.environment.clone()),
        None => TracingConfig::for_service(DEFAULT_SERVICE_NAME),
    }
}

fn prepare(config: AppConfig) -> Result<(Invocation, String, AppConfig), HostError> {
    let invocation = Invocation::from_args(std::env::args().skip(1))?;
    let arguments = invocation.read_arguments()?;
    Ok((invocation, arguments, config))
}

fn emit(response: &ModuleResponse) -> anyhow::Result<()> {
    let document = serde_json::to_string(response).context("serializing result document")?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", document).context("writing result document")?;
    stdout.flush()?;
    Ok(())
}
