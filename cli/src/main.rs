use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use riding_core::{ApiError, ClientConfig, RidingClient};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "riding")]
#[command(about = "Command-line client for the riding-record backend", long_about = None)]
struct Cli {
    /// Backend base path, e.g. http://localhost:8000/api
    #[arg(short, long)]
    base_url: Option<String>,

    /// Budget for admin and query calls, in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Budget for record generation, in seconds
    #[arg(long)]
    generate_timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in as administrator
    Login {
        #[arg(short, long, env = "RIDING_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// List configured accounts with cached results
    Accounts,
    /// Generate records for several accounts
    BatchGenerate {
        #[arg(required = true)]
        usernames: Vec<String>,
    },
    /// Re-check every enabled account
    CheckAll,
    /// Check one account's riding record
    Check {
        username: String,
        #[arg(short, long, env = "RIDING_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Generate a riding record for one account
    Generate {
        username: String,
        #[arg(short, long, env = "RIDING_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    if matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json")) {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }
}

fn resolve_config(cli: &Cli) -> anyhow::Result<ClientConfig> {
    let mut config = ClientConfig::from_env().context("invalid client configuration")?;
    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(secs) = cli.timeout_secs {
        config.timeout = Duration::from_secs(secs);
    }
    if let Some(secs) = cli.generate_timeout_secs {
        config.generate_timeout = Duration::from_secs(secs);
    }
    Ok(config)
}

async fn dispatch(client: &RidingClient, command: Commands) -> Result<Value, ApiError> {
    match command {
        Commands::Login { password } => client.admin_login(&password).await,
        Commands::Accounts => client.list_accounts().await,
        Commands::BatchGenerate { usernames } => client.batch_generate(&usernames).await,
        Commands::CheckAll => client.check_all().await,
        Commands::Check { username, password } => {
            client.check_riding_record(&username, &password).await
        }
        Commands::Generate { username, password } => {
            client.generate_riding_record(&username, &password).await
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    tracing::debug!(base_url = %config.base_url, "client configured");
    let client = RidingClient::from_config(&config);

    match dispatch(&client, cli.command).await {
        Ok(payload) => {
            println!("{}", serde_json::to_string_pretty(&payload)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("Error: {err}");
            Ok(ExitCode::FAILURE)
        }
    }
}
