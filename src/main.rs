//! EMY display server entry point.

use clap::{Parser, Subcommand, ValueEnum};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use emy_display::api::{create_router, AppState};
use emy_display::config::Config;
use emy_display::error::AppError;
use emy_display::metrics;
use emy_display::upstream::EmyClient;
use emy_display::utils::{error_chain, shutdown_signal};

/// EMY patient monitoring display server.
#[derive(Parser, Debug)]
#[command(name = "emy-display")]
#[command(about = "Serves the EMY display and proxies the upstream patient feed")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log output format.
    #[arg(long, global = true, env = "LOG_FORMAT", value_enum, ignore_case = true, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP server port (overrides PORT).
    #[arg(short, long)]
    port: Option<u16>,
}

/// Log output format.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per event.
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve {
        /// HTTP server port (overrides PORT).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check configuration validity.
    CheckConfig,

    /// Fetch the upstream EMY feed once and report the result.
    Fetch,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env first so it feeds both CLI env fallbacks and Config::load
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("emy_display=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let json = args.log_format == LogFormat::Json;

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| {
            fmt::layer()
                .json()
                .with_file(true)
                .with_line_number(true)
        }))
        .with((!json).then(|| fmt::layer().with_file(true).with_line_number(true)))
        .init();

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(),
        Some(Command::Fetch) => cmd_fetch().await,
        Some(Command::Serve { port }) => cmd_serve(port.or(args.port)).await,
        None => cmd_serve(args.port).await,
    }
}

/// Load and validate configuration, logging the failure reason.
fn load_config() -> Result<Config, AppError> {
    let config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    config.validate().map_err(|e| {
        error!("Invalid configuration: {}", e);
        AppError::InvalidConfig(e)
    })?;

    Ok(config)
}

/// Check configuration validity.
fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("EMY DISPLAY - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Upstream: {}", config.emypatient);
    println!(
        "  TLS Verification: {}",
        if config.accept_invalid_certs { "DISABLED" } else { "Enabled" }
    );
    println!("  Timeout: {}ms (connect {}ms)", config.timeout_ms, config.connect_timeout_ms);
    println!("  Listen: {}", config.bind_addr());
    println!("  Title: {}", config.app_title);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Fetch the upstream feed once.
async fn cmd_fetch() -> anyhow::Result<()> {
    let config = load_config()?;
    let client = EmyClient::new(&config).map_err(AppError::from)?;

    println!("Fetching {} ...", client.url());
    match client.fetch_patients().await {
        Ok(records) => {
            println!("OK: {} record(s)", records.len());
            Ok(())
        }
        Err(e) => {
            println!("FAILED ({}): {}", e.kind(), error_chain(&e));
            Err(AppError::from(e).into())
        }
    }
}

/// Run the HTTP server until SIGINT/SIGTERM.
async fn cmd_serve(port_override: Option<u16>) -> anyhow::Result<()> {
    info!("Loading configuration...");
    let mut config = load_config()?;

    if let Some(port) = port_override {
        config.port = port;
    }

    info!("Configuration loaded successfully");
    info!("Upstream: {}", config.emypatient);
    if config.accept_invalid_certs {
        warn!("Upstream TLS certificate verification is disabled");
    }

    let mut app_state = AppState::new(&config).map_err(AppError::from)?;
    match metrics::install_prometheus() {
        Ok(handle) => app_state = app_state.with_metrics(handle),
        Err(e) => warn!("Metrics disabled: {}", e),
    }

    let addr = config.bind_addr();
    let listener = TcpListener::bind(addr).await.map_err(AppError::from)?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, create_router(app_state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::from)?;

    info!("Server shut down gracefully");
    Ok(())
}
