use anyhow::Result;
use clap::{Parser, ValueEnum};
use do_cost_exporter::config::{Config, DEFAULT_PORT};
use do_cost_exporter::digitalocean::client::{DoClient, DEFAULT_API_URL};
use do_cost_exporter::exporter::{Exporter, POLL_INTERVAL};
use do_cost_exporter::publisher::PrometheusPublisher;
use do_cost_exporter::server;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// DigitalOcean Billing Exporter
#[derive(Parser, Debug)]
#[command(name = "do-cost-exporter", version, about, long_about = None)]
struct Args {
    /// DigitalOcean API token
    #[arg(long, env = "DO_API_TOKEN", hide_env_values = true)]
    api_token: Option<String>,

    /// Port to expose Prometheus metrics
    #[arg(long, env = "EXPORTER_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// DigitalOcean API base URL
    #[arg(long, env = "DO_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let (non_blocking, guard) = tracing_appender::non_blocking(std::io::stdout());

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .init();

    tracing::debug!("Log level: {:?}", level);

    Some(guard)
}

/// Cancel the returned token on Ctrl+C or SIGTERM
fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};

            match signal(SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    tokio::select! {
                        _ = tokio::signal::ctrl_c() => tracing::info!("Received SIGINT, shutting down"),
                        _ = sigterm.recv() => tracing::info!("Received SIGTERM, shutting down"),
                    }
                }
                Err(e) => {
                    tracing::warn!("SIGTERM handler unavailable: {}", e);
                    let _ = tokio::signal::ctrl_c().await;
                    tracing::info!("Received SIGINT, shutting down");
                }
            }
        }

        #[cfg(not(unix))]
        {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Received Ctrl+C, shutting down");
        }

        token_clone.cancel();
    });

    token
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Checked before logging, binding or any API call
    let config = match Config::resolve(args.api_token, args.port, &args.api_url) {
        Ok(config) => config,
        Err(err) => {
            println!("{err:#}");
            std::process::exit(1);
        }
    };

    let _log_guard = setup_logging(args.log_level);
    tracing::info!("Starting with {:?}", config);

    let publisher = Arc::new(PrometheusPublisher::new());
    let listener = server::bind(config.port).await?;

    let cancel = install_signal_handler();
    let server_task = tokio::spawn(server::serve(
        listener,
        publisher.handle(),
        cancel.clone(),
    ));

    let client = DoClient::new(&config.api_token, config.api_url.clone())?;
    let exporter = Exporter::new(client, publisher);
    exporter.run(POLL_INTERVAL, cancel.clone()).await;

    cancel.cancel();
    server_task.await??;

    Ok(())
}
