// src/main.rs - Thermostat host: sampling loop plus HTTP API
use clap::Parser;
use hearth_rs::config::{self, Config};
use hearth_rs::control::{Controller, spawn_sampling_loop};
use hearth_rs::{hardware, web};
use std::path::PathBuf;
use tokio::sync::broadcast;

#[derive(Debug, Parser)]
#[command(name = "hearth-host", version, about = "Space heater thermostat host")]
struct Args {
    /// TOML configuration file; built-in simulated defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Override `web.bind`
    #[arg(long)]
    bind: Option<String>,
    /// trace, debug, info, warn or error
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let args = Args::parse();

    // Initialize logging
    let level = args.log_level.parse::<tracing::Level>().unwrap_or(tracing::Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();

    tracing::info!("Starting hearth thermostat host");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let mut config = match &args.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            config::load_config(path).map_err(|e| {
                tracing::error!("Failed to load config from '{}': {}", path.display(), e);
                Box::new(e) as Box<dyn std::error::Error + Send + Sync + 'static>
            })?
        }
        None => {
            tracing::info!("No configuration file given, running with simulated hardware");
            Config::default()
        }
    };
    if let Some(bind) = args.bind {
        config.web.bind = bind;
    }
    config.validate()?;

    tracing::info!(
        "Sampling every {:?}, port timeout {:?}, history {} readings",
        config.control.sample_interval(),
        config.control.port_timeout(),
        config.control.history_capacity
    );

    let (sensor, heater) = hardware::build_ports(&config)?;
    let controller = Controller::new(&config.control, sensor, heater);

    let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);
    let sampler = spawn_sampling_loop(controller.clone(), config.control.sample_interval(), shutdown_rx);

    let app = web::api::create_router(controller.clone());
    let listener = tokio::net::TcpListener::bind(&config.web.bind).await?;
    tracing::info!("Web API listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(web::shutdown_signal(tokio::signal::ctrl_c()))
        .await?;

    let _ = shutdown_tx.send(());
    if let Err(e) = sampler.await {
        tracing::error!("Sampling loop ended abnormally: {}", e);
    }
    if config.control.heater_off_on_shutdown {
        if let Err(e) = controller.shutdown().await {
            tracing::error!("Could not switch the heater off: {}", e);
        }
    }

    tracing::info!("Thermostat host stopped");
    Ok(())
}
