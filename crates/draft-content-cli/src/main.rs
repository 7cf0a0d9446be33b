// crates/draft-content-cli/src/main.rs
// ============================================================================
// Module: Draft Content CLI Entry Point
// Description: Command dispatcher for serving and checking the service config.
// Purpose: Start the Draft Content API and validate configuration offline.
// Dependencies: clap, draft-content-api, draft-content-config, thiserror, tokio.
// ============================================================================

//! ## Overview
//! The `draft-content-api` binary serves the HTTP service until it receives
//! ctrl-c or SIGTERM, validates configuration files without starting the
//! server, and prints a complete example configuration.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use draft_content_api::DraftContentServer;
use draft_content_api::LogEvent;
use draft_content_api::log::build_log_sink;
use draft_content_config::DraftContentApiConfig;
use draft_content_config::config_toml_example;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "draft-content-api", version, disable_help_subcommand = true)]
struct Cli {
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Draft Content API server.
    Serve(ServeCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments for `serve`.
#[derive(Args, Debug)]
struct ServeCommand {
    /// Config file path (defaults to `DRAFT_CONTENT_API_CONFIG` or ./draft-content-api.toml).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Overrides `server.bind` from the config file.
    #[arg(long, value_name = "ADDR")]
    bind: Option<SocketAddr>,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a Draft Content API configuration file.
    Validate(ConfigValidateCommand),
    /// Print a complete example configuration.
    Example,
}

/// Arguments for `config validate`.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Config file path (defaults to `DRAFT_CONTENT_API_CONFIG` or ./draft-content-api.toml).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI failures reported on stderr before exiting non-zero.
#[derive(Debug, Error)]
enum CliError {
    /// Configuration could not be loaded or validated.
    #[error("config load failed: {0}")]
    Config(String),
    /// The server could not be initialized.
    #[error("server init failed: {0}")]
    Init(String),
    /// The server stopped with an error.
    #[error("server failed: {0}")]
    Serve(String),
    /// Writing to stdout or stderr failed.
    #[error("failed to write to {stream}: {error}")]
    Output {
        /// Stream name.
        stream: &'static str,
        /// Underlying I/O error text.
        error: String,
    },
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run(Cli::parse()).await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
async fn run(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Commands::Serve(command) => command_serve(command).await,
        Commands::Config {
            command,
        } => command_config(command),
    }
}

// ============================================================================
// SECTION: Serve
// ============================================================================

/// Loads configuration and serves until a shutdown signal arrives.
async fn command_serve(command: ServeCommand) -> CliResult<ExitCode> {
    let config = DraftContentApiConfig::load(command.config.as_deref())
        .map_err(|err| CliError::Config(err.to_string()))?;
    let log = build_log_sink(&config.logging).map_err(|err| CliError::Init(err.to_string()))?;
    let mut server = DraftContentServer::with_log_sink(&config, Arc::clone(&log))
        .map_err(|err| CliError::Init(err.to_string()))?;
    if let Some(bind) = command.bind {
        server = server.with_bind_addr(bind);
    }
    log.record(
        &LogEvent::info("startup", "starting draft content api")
            .with_field("system_code", config.app.system_code.clone())
            .with_field("app_name", config.app.name.clone())
            .with_field("bind", server.bind_addr().to_string()),
    );
    server.serve(shutdown_signal()).await.map_err(|err| CliError::Serve(err.to_string()))?;
    log.record(&LogEvent::info("shutdown", "draft content api stopped"));
    Ok(ExitCode::SUCCESS)
}

/// Resolves on ctrl-c, or on SIGTERM where available.
async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => command_config_validate(&command),
        ConfigCommand::Example => {
            write_stdout_line(config_toml_example().trim_end())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Executes the config validation command.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let _config = validate_config(command)?;
    write_stdout_line("config is valid")?;
    Ok(ExitCode::SUCCESS)
}

/// Loads and validates the config named by `command`.
fn validate_config(command: &ConfigValidateCommand) -> CliResult<DraftContentApiConfig> {
    DraftContentApiConfig::load(command.config.as_deref())
        .map_err(|err| CliError::Config(err.to_string()))
}

// ============================================================================
// SECTION: Output
// ============================================================================

/// Writes a line to stdout.
fn write_stdout_line(message: &str) -> CliResult<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}").map_err(|err| CliError::Output {
        stream: "stdout",
        error: err.to_string(),
    })
}

/// Writes a line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Reports an error on stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
