mod action;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tracknotify_core::{
    load_config_or_default, validate_config, HttpTrackingClient, TelegramNotifier,
    TrackingPipeline,
};

use action::{report_failure, set_output, ActionInputs};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        report_failure(&format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Optional config file
    let config_path = std::env::var("TRACKNOTIFY_CONFIG").ok().map(PathBuf::from);
    let config = load_config_or_default(config_path.as_deref())
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;
    validate_config(&config).context("Configuration validation failed")?;

    info!("Tracking service: {}", config.tracking.base_url);

    let inputs = ActionInputs::from_env()?;

    let tracking = HttpTrackingClient::new(&config.tracking)
        .context("Failed to create tracking client")?;
    let notifier = TelegramNotifier::new(&config.telegram, inputs.telegram_token.clone())
        .context("Failed to create Telegram notifier")?;

    let pipeline = TrackingPipeline::new(
        config.pipeline.clone(),
        Arc::new(tracking),
        Arc::new(notifier),
    )
    .with_parse_mode(config.telegram.parse_mode.clone());

    let summary = pipeline
        .run_raw(&inputs.data, &inputs.last_x_items, &inputs.telegram_id)
        .await?;

    let output_file = std::env::var_os("GITHUB_OUTPUT").map(PathBuf::from);
    set_output(output_file.as_deref(), "done", &summary.done.to_string())?;

    Ok(())
}
