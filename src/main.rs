//! fabric-harness command-line front end.
//!
//! ```text
//! settings file / flags
//!     → lifecycle::startup (resolve settings, build client handle)
//!     → init           : report the resolved identities
//!     → check-orderer  : channel config query + expected orderer check
//!     → events         : print chaincode events until Ctrl+C
//! ```
//!
//! Every failure is logged and turned into exit status 1.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use fabric_harness::client::{consume_events, Client, StopReason};
use fabric_harness::config::ObservabilityConfig;
use fabric_harness::lifecycle::signals::shutdown_on_ctrl_c;
use fabric_harness::lifecycle::startup::{resolve_config, start, Overrides};
use fabric_harness::lifecycle::Shutdown;
use fabric_harness::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "fabric-harness")]
#[command(about = "Client harness for a permissioned blockchain network", long_about = None)]
struct Cli {
    /// Harness settings file (TOML).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Connection profile; overrides the settings file.
    #[arg(short, long)]
    profile: Option<PathBuf>,

    #[arg(long)]
    org: Option<String>,

    #[arg(long)]
    admin: Option<String>,

    #[arg(long)]
    user: Option<String>,

    /// Emit JSON log lines.
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the SDK clients and report the resolved identities
    Init,
    /// Query the channel configuration and check the expected orderer
    CheckOrderer {
        #[arg(long, default_value = "peer0.org1.example.com")]
        peer: String,
    },
    /// Print chaincode events until interrupted
    Events {
        /// Chaincode id; defaults to the configured chaincode.
        #[arg(long)]
        chaincode: Option<String>,

        /// Event name filter (regular expression).
        #[arg(long, default_value = ".*")]
        event: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let overrides = Overrides {
        profile_path: cli.profile.clone(),
        org: cli.org.clone(),
        admin: cli.admin.clone(),
        user: cli.user.clone(),
    };
    let resolved = resolve_config(cli.config.as_deref(), overrides);

    let mut observability = resolved
        .as_ref()
        .map(|c| c.observability.clone())
        .unwrap_or_else(|_| ObservabilityConfig::default());
    observability.json |= cli.json_logs;
    if let Err(e) = init_logging(&observability) {
        eprintln!("failed to initialize logging: {}", e);
    }

    let config = match resolved {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    let client = match start(&config) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialize client");
            return ExitCode::FAILURE;
        }
    };

    let code = run(&client, cli.command).await;
    client.close();
    code
}

async fn run(client: &Client, command: Commands) -> ExitCode {
    match command {
        Commands::Init => {
            println!("organization : {}", client.org_name());
            println!("admin        : {}", client.resource_client().identity());
            println!("user         : {}", client.channel_client().identity());
            println!("channel      : {}", client.channel_id());
            println!("chaincode    : {} ({})", client.chaincode_id(), client.chaincode_path());
            if let Some(root) = client.chaincode_root() {
                println!("chaincode root: {}", root.display());
            }
            println!("joined       : {:?}", client.resource_client().joined_channels());
            ExitCode::SUCCESS
        }
        Commands::CheckOrderer { peer } => {
            match client.get_channel_config(client.channel_id(), &peer).await {
                Ok(cfg) => {
                    println!("channel {} orderers: {:?}", cfg.channel_id, cfg.orderers());
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    tracing::error!(error = %e, "Channel config check failed");
                    ExitCode::FAILURE
                }
            }
        }
        Commands::Events { chaincode, event } => {
            let chaincode = chaincode.unwrap_or_else(|| client.chaincode_id().to_string());
            let (registration, stream) = match client.register_chaincode_event(&chaincode, &event) {
                Ok(subscription) => subscription,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to register chaincode event");
                    return ExitCode::FAILURE;
                }
            };
            tracing::info!(chaincode = %chaincode, filter = %event, "Listening for chaincode events");

            let shutdown = Shutdown::new();
            let signal = shutdown.signal();
            let trigger = shutdown.clone();
            tokio::spawn(async move { shutdown_on_ctrl_c(&trigger).await });

            let (count, reason) = consume_events(stream, signal, |e| {
                println!(
                    "block={} tx={} event={} payload={}",
                    e.block_number,
                    e.tx_id,
                    e.event_name,
                    String::from_utf8_lossy(&e.payload)
                );
            })
            .await;

            client.unregister_chaincode_event(registration);
            if reason == StopReason::StreamClosed {
                tracing::warn!("Event stream closed by the network");
            }
            tracing::info!(events = count, "Stopped listening");
            ExitCode::SUCCESS
        }
    }
}
