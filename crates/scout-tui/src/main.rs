mod action;
mod app;
mod app_state;
mod component;
mod components;
mod core;
mod theme;
mod widgets;

use std::sync::Arc;

use scout_proto::api::ApiClient;
use scout_proto::session::SessionStore;

use crate::core::dataset::DatasetSelector;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let data_dir = scout_proto::platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;

    let log_path = data_dir.join("scout.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Allow RUST_LOG override; default to debug for app code but suppress noisy
    // connection-level DEBUG from HTTP client internals (hyper_util, reqwest).
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // Print log path to stderr so the operator can tail it immediately.
    eprintln!("scout log: {}", log_path.display());

    tracing::info!("scout starting…");

    let config = scout_proto::config::Config::load().unwrap_or_default();
    let svc = Arc::new(ApiClient::new(&config.api)?);
    let session = SessionStore::new(data_dir.join("session.json"));

    // Ask the service which catalog is active so a restarted client lines up
    // with the server instead of assuming the demo catalog.
    let selector = DatasetSelector::init(&*svc, session.upload_seen()).await;

    let app = app::App::new(svc, session, selector, config.paths.downloads_dir.clone());
    app.run().await?;

    Ok(())
}
