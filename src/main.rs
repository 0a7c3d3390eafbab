//! Binary entrypoint for the meshresponder CLI.
//!
//! Commands:
//! - `start [--port <path>] [--channel <n>]` - connect and answer `hi` on the target channel
//! - `init` - write a starter `config.toml`
//! - `probe [--port <path>]` - connect, sync and print own identity plus radio telemetry as JSON
//!
//! See the library crate docs for module-level details: `meshresponder::`.
use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};
use std::time::Duration;

use meshresponder::config::{Config, MAX_CHANNEL_INDEX};
use meshresponder::meshtastic::{connect, MeshTransport, WriterTuning};
use meshresponder::responder::{
    run_until_shutdown, ConnectionGuard, Dispatcher, StopReason, TelemetrySnapshot,
};

#[derive(Parser)]
#[command(name = "meshresponder")]
#[command(about = "Answers 'hi' on a Meshtastic channel with a link report")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to the radio and start answering
    Start {
        /// Meshtastic device port (e.g., /dev/ttyUSB0)
        #[arg(short, long)]
        port: Option<String>,

        /// Channel index to answer on (overrides config)
        #[arg(long)]
        channel: Option<u32>,
    },
    /// Write a default configuration file
    Init,
    /// Connect, wait for the radio config and print what the responder would quote
    Probe {
        /// Meshtastic device port (e.g., /dev/ttyUSB0)
        #[arg(short, long)]
        port: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            init_logging(&None, cli.verbose);
            Config::create_default(&cli.config).await?;
            info!("Configuration file created at {}", cli.config);
        }
        Commands::Start { port, channel } => {
            let mut config = load_config(&cli.config).await?;
            init_logging(&Some(config.clone()), cli.verbose);
            if let Some(ch) = channel {
                if ch > MAX_CHANNEL_INDEX {
                    return Err(anyhow!("--channel must be 0..={}, got {}", MAX_CHANNEL_INDEX, ch));
                }
                config.responder.target_channel = ch;
            }
            if let Some(p) = port {
                config.meshtastic.port = p;
            }
            info!("Starting meshresponder v{}", env!("CARGO_PKG_VERSION"));
            run_responder(config).await?;
        }
        Commands::Probe { port } => {
            let mut config = load_config(&cli.config).await?;
            init_logging(&Some(config.clone()), cli.verbose);
            if let Some(p) = port {
                config.meshtastic.port = p;
            }
            probe(config).await?;
        }
    }

    Ok(())
}

/// A missing config file is not an error; defaults apply.
async fn load_config(path: &str) -> Result<Config> {
    if tokio::fs::try_exists(path).await.unwrap_or(false) {
        Config::load(path).await
    } else {
        Ok(Config::default())
    }
}

async fn run_responder(config: Config) -> Result<()> {
    let mesh = &config.meshtastic;
    let tuning = WriterTuning {
        min_send_gap_ms: mesh.min_send_gap_ms,
    };
    let (link, mut events) = connect(&mesh.port, mesh.baud_rate, tuning)
        .await
        .map_err(|e| anyhow!("Failed to connect to {}: {}", mesh.port, e))?;
    let mut connection = ConnectionGuard::new(link);

    connection
        .wait_for_sync(Duration::from_secs(mesh.startup_sync_timeout_secs))
        .await;
    let snapshot = TelemetrySnapshot::capture(&connection.radio_config());
    let own = connection.own_node_identity();
    match &own {
        Some(id) => info!("Own node {} (0x{:08x})", id.user_id, id.node_num),
        None => warn!("Own node number unknown; self-origin check disabled"),
    }
    if snapshot.is_empty() {
        warn!("No radio telemetry available; replies will only carry packet data");
    } else {
        info!("Radio telemetry: {:?}", snapshot);
    }

    let mut dispatcher = Dispatcher::new(&config.responder, own.map(|id| id.node_num), snapshot);

    info!(
        "Connected to {}. Listening on channel {} for 'Hi'… (Ctrl+C to exit)",
        mesh.port, config.responder.target_channel
    );
    let reason =
        run_until_shutdown(&mut dispatcher, &mut connection, &mut events, interrupt_signal()).await;
    connection.shutdown().await;

    if reason == StopReason::EventStreamClosed {
        return Err(anyhow!("Radio link on {} went away", mesh.port));
    }
    Ok(())
}

async fn probe(config: Config) -> Result<()> {
    let mesh = &config.meshtastic;
    let (link, _events) = connect(
        &mesh.port,
        mesh.baud_rate,
        WriterTuning {
            min_send_gap_ms: mesh.min_send_gap_ms,
        },
    )
    .await
    .map_err(|e| anyhow!("Failed to connect to {}: {}", mesh.port, e))?;
    let mut connection = ConnectionGuard::new(link);

    let synced = connection
        .wait_for_sync(Duration::from_secs(mesh.startup_sync_timeout_secs))
        .await;
    let summary = serde_json::json!({
        "port": mesh.port,
        "config_synced": synced,
        "own_node": connection.own_node_identity(),
        "telemetry": TelemetrySnapshot::capture(&connection.radio_config()),
        "target_channel": config.responder.target_channel,
    });
    connection.shutdown().await;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// Resolves on Ctrl-C. If the handler cannot be installed the listener runs
/// until the radio link ends instead of stopping at once.
async fn interrupt_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Cannot listen for Ctrl-C ({}); stop the process another way", e);
        std::future::pending::<()>().await;
    }
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // CLI verbosity overrides the configured level
    let base_level = match verbosity {
        0 => config
            .as_ref()
            .and_then(|c| c.logging.level.parse::<log::LevelFilter>().ok())
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);

    let log_file = config.as_ref().and_then(|cfg| cfg.logging.file.as_ref()).and_then(|file| {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(file)
            .ok()
    });

    if let Some(f) = log_file {
        let write_mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
        // Mirror to the console only when someone is watching
        let is_tty = atty::is(atty::Stream::Stdout);
        builder.format(move |fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            let line = format!("{} [{}] {}", ts, record.level(), record.args());
            if let Ok(mut guard) = write_mutex.lock() {
                let _ = writeln!(guard, "{}", line);
            }
            if is_tty {
                writeln!(fmt, "{}", line)
            } else {
                Ok(())
            }
        });
    } else {
        builder.format(|fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            writeln!(fmt, "{} [{}] {}", ts, record.level(), record.args())
        });
    }
    let _ = builder.try_init();
}
