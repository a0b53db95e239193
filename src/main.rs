use anyhow::{Context, Result};
use sitedash::{app, config::Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sitedash=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;
    if config.api_key.is_none() {
        tracing::warn!("GOOGLE_API_KEY is not set; /api/sheets will answer 500 until it is");
    }

    app::run(config).await
}
