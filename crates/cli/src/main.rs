//! `cwsctl`: command-line client for the workstation daemon.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Resolve settings**: settings file (`--config`), then environment
//!    (`CWSD_URL`, `CWS_API_KEY`, `AWS_PROFILE`, `AWS_REGION`), then flags.
//! 2. **Wire observability**: `tracing-subscriber` with an `EnvFilter`, text
//!    or JSON output, and an optional OTLP exporter (see [`telemetry`]).
//! 3. **Construct the client** and check daemon compatibility before any
//!    command that manages resources.
//! 4. **Run the command**, including `request`, the raw escape hatch for
//!    routes without a typed wrapper.

mod telemetry;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use api::{DaemonControl, InstanceLifecycle, RequestContext};
use clap::{Parser, Subcommand};
use daemon_client::{ClientSettings, HttpClient};

use crate::telemetry::LogFormat;

#[derive(Debug, Parser)]
#[command(name = "cwsctl", version, about = "Manage cloud workstations through the local daemon")]
struct Cli {
    /// Daemon base URL [default: http://localhost:8947]
    #[arg(long)]
    daemon_url: Option<String>,

    /// TOML settings file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Cloud credentials profile
    #[arg(long)]
    profile: Option<String>,

    /// Cloud region
    #[arg(long)]
    region: Option<String>,

    /// Daemon API key
    #[arg(long)]
    api_key: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Log output format on stderr
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Do not verify daemon compatibility before running the command
    #[arg(long, default_value_t = false)]
    skip_version_check: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check that the daemon is reachable
    Ping,
    /// Show daemon status
    Status,
    /// Compare client and daemon versions
    VersionCheck,
    /// List workstation instances
    Instances {
        /// Ask the daemon to re-query the cloud provider
        #[arg(long, default_value_t = false)]
        refresh: bool,
    },
    /// Send an arbitrary request to the daemon
    Request {
        /// HTTP method (GET, POST, PUT, DELETE, ...)
        method: String,
        /// Path, e.g. /api/v1/status
        path: String,
        /// JSON request body
        #[arg(long)]
        json: Option<String>,
    },
}

impl Command {
    /// Commands that act on daemon resources are gated on compatibility.
    fn needs_version_check(&self) -> bool {
        !matches!(self, Self::Ping | Self::VersionCheck)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _telemetry = telemetry::init(cli.log_format)?;

    let settings = resolve_settings(&cli)?;
    let client = HttpClient::from_settings(&settings).context("failed to create daemon client")?;
    tracing::debug!(base_url = client.base_url(), "using daemon");

    let ctx = RequestContext::background();
    {
        let ctx = ctx.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                ctx.cancel();
            }
        });
    }

    if cli.command.needs_version_check() && !cli.skip_version_check {
        client
            .check_version_compatibility(&ctx, env!("CARGO_PKG_VERSION"))
            .await
            .context("daemon compatibility check failed")?;
    }

    run(&client, &ctx, cli.command).await
}

fn resolve_settings(cli: &Cli) -> anyhow::Result<ClientSettings> {
    let settings = match &cli.config {
        Some(path) => ClientSettings::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => ClientSettings::default(),
    };
    let mut settings = settings.with_env();

    if let Some(url) = &cli.daemon_url {
        settings.base_url = url.clone();
    }
    if let Some(profile) = &cli.profile {
        settings.options.profile = profile.clone();
    }
    if let Some(region) = &cli.region {
        settings.options.region = region.clone();
    }
    if let Some(api_key) = &cli.api_key {
        settings.options.api_key = api_key.clone();
    }
    if let Some(secs) = cli.timeout_secs {
        settings.transport.timeout = Duration::from_secs(secs);
    }
    settings
        .transport
        .validate()
        .context("invalid transport settings")?;
    Ok(settings)
}

async fn run(client: &HttpClient, ctx: &RequestContext, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Ping => {
            client.ping(ctx).await.context("daemon is not responding")?;
            println!("daemon is running at {}", client.base_url());
        }
        Command::Status => {
            let status = client.status(ctx).await?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        Command::VersionCheck => {
            let client_version = env!("CARGO_PKG_VERSION");
            client
                .check_version_compatibility(ctx, client_version)
                .await?;
            println!("client v{client_version} is compatible with the daemon");
        }
        Command::Instances { refresh } => {
            let list = client.list_instances(ctx, refresh).await?;
            if list.instances.is_empty() {
                println!("no instances");
            }
            for instance in &list.instances {
                println!(
                    "{:<24} {:<12} {:<16} {}",
                    instance.name, instance.state, instance.instance_type, instance.public_ip
                );
            }
            if list.total_cost > 0.0 {
                println!("total daily cost: ${:.2}", list.total_cost);
            }
        }
        Command::Request { method, path, json } => {
            let body = json
                .as_deref()
                .map(serde_json::from_str::<serde_json::Value>)
                .transpose()
                .context("--json is not valid JSON")?;
            let bytes = client
                .raw_request(ctx, &method, &path, body.as_ref())
                .await?;
            print_body(&bytes)?;
        }
    }
    Ok(())
}

/// Pretty-prints JSON bodies; anything else is written as text.
fn print_body(bytes: &[u8]) -> anyhow::Result<()> {
    if bytes.is_empty() {
        return Ok(());
    }
    match serde_json::from_slice::<serde_json::Value>(bytes) {
        Ok(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        Err(_) => match std::str::from_utf8(bytes) {
            Ok(text) => println!("{text}"),
            Err(_) => bail!("daemon returned {} bytes of binary data", bytes.len()),
        },
    }
    Ok(())
}
